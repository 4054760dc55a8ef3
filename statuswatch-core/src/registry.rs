//! In-memory status registry.
//!
//! One slot per service id, each behind its own lock. The outer map lock is
//! only held long enough to find or create a slot, so writes for different
//! services never wait on each other.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use statuswatch_types::{NormalizedStatus, RegistryEntry, Severity, TransitionEvent, TransitionKind};

use crate::detector;

/// Orders the checks of one service by when they started.
///
/// Tickets come from a per-service counter, so their order survives wall
/// clock steps. A result carrying an older ticket than the one last applied
/// is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckTicket(u64);

/// Per-service state.
#[derive(Debug, Default)]
struct Slot {
    state: Mutex<SlotState>,
    next_ticket: AtomicU64,
    /// Consecutive failed fetches since the last success.
    failures: AtomicU64,
}

#[derive(Debug, Default)]
struct SlotState {
    entry: Option<RegistryEntry>,
    /// Ticket of the last stored observation; 0 before the first one.
    applied: u64,
}

impl Slot {
    fn issue(&self) -> CheckTicket {
        CheckTicket(self.next_ticket.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl SlotState {
    fn store(&mut self, service_id: &str, ticket: CheckTicket, status: NormalizedStatus, checked_at: DateTime<Utc>) {
        match self.entry.as_mut() {
            Some(existing) => {
                existing.last_status = Some(status);
                existing.last_checked_at = checked_at;
            }
            None => self.entry = Some(RegistryEntry::new(service_id, status, checked_at)),
        }
        self.applied = ticket.0;
    }
}

/// Last known status of every service, shared by pollers and forced checks.
///
/// The registry is process-wide and memory-only: it starts empty and entries
/// appear on a service's first successful fetch.
#[derive(Debug, Default)]
pub struct StatusRegistry {
    slots: RwLock<BTreeMap<String, Arc<Slot>>>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with slots reserved for the given services.
    ///
    /// Entries stay empty until the first successful fetch; reserving slots
    /// just avoids taking the map write lock from inside the poll loops.
    pub fn with_services<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let slots = ids
            .into_iter()
            .map(|id| (id.to_string(), Arc::new(Slot::default())))
            .collect();
        Self {
            slots: RwLock::new(slots),
        }
    }

    fn slot(&self, service_id: &str) -> Arc<Slot> {
        // Fast path: check if it exists
        {
            let slots = self.slots.read();
            if let Some(slot) = slots.get(service_id) {
                return slot.clone();
            }
        }

        // Slow path: create it
        let mut slots = self.slots.write();
        slots
            .entry(service_id.to_string())
            .or_insert_with(|| Arc::new(Slot::default()))
            .clone()
    }

    fn existing(&self, service_id: &str) -> Option<Arc<Slot>> {
        self.slots.read().get(service_id).cloned()
    }

    /// Current entry for a service, if it has ever been fetched successfully.
    pub fn get(&self, service_id: &str) -> Option<RegistryEntry> {
        self.existing(service_id)
            .and_then(|slot| slot.state.lock().entry.clone())
    }

    /// Take a ticket for a check that is about to fetch.
    ///
    /// Pass it to [`observe`](Self::observe) with the result.
    pub fn begin_check(&self, service_id: &str) -> CheckTicket {
        self.slot(service_id).issue()
    }

    /// Overwrite the last status and check time of a service.
    ///
    /// The write counts as the newest check, whatever `checked_at` says.
    /// Returns `false` without changing anything when the status is `Unknown`.
    pub fn put(&self, service_id: &str, status: NormalizedStatus, checked_at: DateTime<Utc>) -> bool {
        if status.severity == Severity::Unknown {
            return false;
        }

        let slot = self.slot(service_id);
        let mut state = slot.state.lock();
        let ticket = slot.issue();
        state.store(service_id, ticket, status, checked_at);
        true
    }

    /// Classify a freshly fetched status and record it, atomically.
    ///
    /// The previous status is read, compared and replaced under the
    /// service's lock, so a scheduled poll and a forced check racing on the
    /// same service can never both report the same transition. A result
    /// whose check started before the one already recorded (or `Unknown`) is
    /// reported as `Unchanged` and not stored. `fetched_at` plays no part in
    /// the ordering.
    pub fn observe(&self, service_id: &str, ticket: CheckTicket, status: NormalizedStatus) -> TransitionEvent {
        let slot = self.slot(service_id);
        let mut state = slot.state.lock();

        let previous_status = state.entry.as_ref().and_then(|e| e.last_status.clone());
        let stale = ticket.0 <= state.applied;

        if stale || status.severity == Severity::Unknown {
            return TransitionEvent {
                service_id: service_id.to_string(),
                previous_status,
                new_status: status,
                kind: TransitionKind::Unchanged,
            };
        }

        let kind = detector::classify(previous_status.as_ref(), &status);
        let checked_at = status.fetched_at;
        state.store(service_id, ticket, status.clone(), checked_at);
        slot.failures.store(0, Ordering::Relaxed);

        TransitionEvent {
            service_id: service_id.to_string(),
            previous_status,
            new_status: status,
            kind,
        }
    }

    /// Record that a notification went out. Has no effect on detection.
    pub fn mark_notified(&self, service_id: &str, at: DateTime<Utc>) {
        if let Some(slot) = self.existing(service_id) {
            if let Some(entry) = slot.state.lock().entry.as_mut() {
                entry.last_notified_at = Some(at);
            }
        }
    }

    /// Count a failed fetch; returns the consecutive failure count.
    pub fn record_failure(&self, service_id: &str) -> u64 {
        self.slot(service_id).failures.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Consecutive failed fetches since the last success.
    pub fn failures(&self, service_id: &str) -> u64 {
        self.existing(service_id)
            .map(|slot| slot.failures.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Forget the failure count, e.g. when a poll cycle (re)starts.
    pub fn reset_failures(&self, service_id: &str) {
        if let Some(slot) = self.existing(service_id) {
            slot.failures.store(0, Ordering::Relaxed);
        }
    }

    /// All populated entries, ordered by service id.
    pub fn entries(&self) -> Vec<RegistryEntry> {
        self.slots
            .read()
            .values()
            .filter_map(|slot| slot.state.lock().entry.clone())
            .collect()
    }

    /// Number of services with an entry.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
