//! Well-known providers that can be enabled by id alone.

use statuswatch_types::{ParserKind, ServiceDescriptor};

/// A built-in provider definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    pub url: &'static str,
    pub parser: ParserKind,
}

impl CatalogEntry {
    /// Descriptor for this provider, enabled.
    pub fn descriptor(&self) -> ServiceDescriptor {
        ServiceDescriptor::new(self.id, self.display_name, self.url, self.parser)
    }
}

const fn statuspage(id: &'static str, display_name: &'static str, url: &'static str) -> CatalogEntry {
    CatalogEntry {
        id,
        display_name,
        url,
        parser: ParserKind::Statuspage,
    }
}

/// Providers known without configuration, ordered by id.
pub const BUILTIN: &[CatalogEntry] = &[
    statuspage("anthropic", "Anthropic", "https://status.anthropic.com/api/v2/summary.json"),
    statuspage("atlassian", "Atlassian", "https://status.atlassian.com/api/v2/summary.json"),
    statuspage("cloudflare", "Cloudflare", "https://www.cloudflarestatus.com/api/v2/summary.json"),
    statuspage("discord", "Discord", "https://discordstatus.com/api/v2/summary.json"),
    statuspage("dropbox", "Dropbox", "https://status.dropbox.com/api/v2/summary.json"),
    statuspage("github", "GitHub", "https://www.githubstatus.com/api/v2/summary.json"),
    statuspage("openai", "OpenAI", "https://status.openai.com/api/v2/summary.json"),
    statuspage("reddit", "Reddit", "https://www.redditstatus.com/api/v2/summary.json"),
    statuspage("twilio", "Twilio", "https://status.twilio.com/api/v2/summary.json"),
    statuspage("vercel", "Vercel", "https://www.vercel-status.com/api/v2/summary.json"),
];

/// Look up a built-in provider by id.
pub fn lookup(id: &str) -> Option<&'static CatalogEntry> {
    BUILTIN.iter().find(|entry| entry.id == id)
}
