//! Host commands and their text responses.

use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;

use statuswatch_core::{MonitorError, StatusMonitor, StatusView};

use crate::config::Settings;

/// Incidents shown per service in the overview.
const OVERVIEW_INCIDENTS: usize = 2;

/// Incidents shown for a single forced check.
const CHECK_INCIDENTS: usize = 3;

pub const HELP: &str = "\
Commands:
  status        show the last known status of every monitored service
  check <id>    fetch one service now and show the result
  help          show this message
  quit          stop monitoring and exit";

/// A command read from the host's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Check(String),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: check <service id>")]
    MissingServiceId,
}

impl FromStr for Command {
    type Err = CommandError;

    /// Parse one input line. A leading `/` is accepted, as chat hosts use.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();

        match name.as_str() {
            "status" | "servicestatus" => Ok(Command::Status),
            "check" | "servicetest" => words
                .next()
                .map(|id| Command::Check(id.to_string()))
                .ok_or(CommandError::MissingServiceId),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(name)),
        }
    }
}

/// Parse an input line, ignoring blank ones.
pub fn parse(line: &str) -> Option<Result<Command, CommandError>> {
    if line.trim().is_empty() {
        None
    } else {
        Some(line.parse())
    }
}

/// Run a command against the monitor and render the reply.
pub async fn execute(monitor: &StatusMonitor, command: &Command) -> String {
    match command {
        Command::Status => format_status_list(&monitor.snapshot()),
        Command::Check(id) => {
            let result = monitor.force_check(id).await;
            let configured: Vec<&str> = monitor.services().map(|s| s.descriptor.id.as_str()).collect();
            format_check_result(id, &result, &configured)
        }
        Command::Help => HELP.to_string(),
        Command::Quit => "Bye.".to_string(),
    }
}

/// Overview of every enabled service.
pub fn format_status_list(views: &[StatusView]) -> String {
    if views.is_empty() {
        return "No services are being monitored.".to_string();
    }

    let mut out = String::from("📊 Current service status:\n");
    for view in views {
        let _ = writeln!(out, "\n[{}]", view.display_name);
        if !view.is_checked() {
            let _ = writeln!(out, "  {} not yet checked", view.severity.symbol());
            continue;
        }

        let _ = writeln!(
            out,
            "  {} {}",
            view.severity.symbol(),
            view.summary.as_deref().unwrap_or(view.severity.label())
        );
        write_incidents(&mut out, view, OVERVIEW_INCIDENTS, "  ", '•');
    }

    out.trim_end().to_string()
}

/// Reply to a forced check.
pub fn format_check_result(
    service_id: &str,
    result: &Result<StatusView, MonitorError>,
    configured: &[&str],
) -> String {
    let view = match result {
        Ok(view) => view,
        Err(e) if e.is_configuration() => {
            return format!(
                "'{}' is not a configured service.\nConfigured services: {}",
                service_id,
                if configured.is_empty() { "none".to_string() } else { configured.join(", ") }
            );
        }
        Err(e) => return format!("❌ Check failed: {}", e),
    };

    let mut out = format!(
        "{} [{}] {}\n",
        view.severity.symbol(),
        view.display_name,
        view.severity.label()
    );
    if let Some(summary) = &view.summary {
        let _ = writeln!(out, "Details: {}", summary);
    }
    write_incidents(&mut out, view, CHECK_INCIDENTS, "", '-');
    if let Some(url) = &view.page_url {
        let _ = writeln!(out, "Status page: {}", url);
    }
    if let Some(at) = view.last_checked_at {
        let _ = writeln!(out, "Checked at: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    out.trim_end().to_string()
}

fn write_incidents(out: &mut String, view: &StatusView, limit: usize, indent: &str, bullet: char) {
    if view.incidents.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}Active incidents:", indent);
    for incident in view.incidents.iter().take(limit) {
        let _ = writeln!(out, "{}  {} {} ({})", indent, bullet, incident.name, incident.status);
    }
    let more = view.incidents.len().saturating_sub(limit);
    if more > 0 {
        let _ = writeln!(out, "{}  ... and {} more", indent, more);
    }
}

/// Report for `statuswatch validate`.
pub fn format_settings_report(settings: &Settings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "interval: {}s", settings.interval.as_secs());
    let _ = writeln!(out, "request timeout: {}s", settings.request_timeout.as_secs_f32());
    let _ = writeln!(out, "notifier: {}", settings.notifier);
    let _ = writeln!(
        out,
        "targets: {}",
        if settings.targets.is_empty() {
            "none".to_string()
        } else {
            settings.targets.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
        }
    );

    let _ = writeln!(out, "\nservices:");
    if settings.services.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for service in &settings.services {
        let _ = writeln!(
            out,
            "  {:<14} {:<10} {:<22} every {}s  {}",
            service.id,
            if service.enabled { "enabled" } else { "disabled" },
            service.parser.as_str(),
            service.effective_interval(settings.interval).as_secs(),
            service.status_endpoint_url
        );
    }

    if !settings.rejected.is_empty() {
        let _ = writeln!(out, "\nrejected:");
        for rejected in &settings.rejected {
            let _ = writeln!(out, "  {:<14} {}", rejected.id, rejected.reason);
        }
    }

    out.trim_end().to_string()
}
