//! Lock-state reconciliation
//!
//! The status endpoint keeps reporting the pre-command lock state for a
//! while after a lock/unlock command succeeds. Each vehicle therefore keeps
//! two independent observations:
//!
//! - **authoritative**: written by every status poll
//! - **assumed**: written optimistically when a lock/unlock is dispatched
//!
//! [`ReconciliationEntry::resolve_at`] picks between them. An assumed state
//! wins only while it is newer than the authoritative one and younger than
//! the trust window ([`TRUST_WINDOW_SECS`]).
//!
//! Entries are never evicted; there is one per vehicle on the account.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::VehicleId;

/// How long, in seconds, an assumed lock state is preferred over older service data
pub const TRUST_WINDOW_SECS: i64 = 300;

/// [`TRUST_WINDOW_SECS`] as a duration
pub fn trust_window() -> Duration {
    Duration::seconds(TRUST_WINDOW_SECS)
}

/// One lock-state reading and when it was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockObservation {
    pub locked: bool,
    pub at: DateTime<Utc>,
}

/// Per-vehicle cache record holding both lock-state sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationEntry {
    /// Last state reported by the status endpoint
    pub authoritative: Option<LockObservation>,
    /// Last state set by a lock/unlock command
    pub assumed: Option<LockObservation>,
}

impl ReconciliationEntry {
    /// Resolve the caller-facing lock state as of `now`.
    ///
    /// | authoritative | assumed | result |
    /// |---|---|---|
    /// | - | - | `None` |
    /// | - | set | assumed |
    /// | set | - | authoritative |
    /// | set | set | assumed if newer and inside the trust window, else authoritative |
    pub fn resolve_at(&self, now: DateTime<Utc>) -> Option<bool> {
        match (self.authoritative, self.assumed) {
            (None, None) => None,
            (None, Some(assumed)) => Some(assumed.locked),
            (Some(authoritative), None) => Some(authoritative.locked),
            (Some(authoritative), Some(assumed)) => {
                let newer = assumed.at > authoritative.at;
                let fresh = now.signed_duration_since(assumed.at) < trust_window();
                if newer && fresh {
                    Some(assumed.locked)
                } else {
                    Some(authoritative.locked)
                }
            }
        }
    }
}

/// Owned map of vehicle id to [`ReconciliationEntry`], scoped to one client
///
/// Writes replace one half of an entry; nothing is read-modify-written, so
/// concurrent callers on the same vehicle only race on which write lands last.
#[derive(Debug, Default)]
pub struct StateReconciler {
    entries: RwLock<HashMap<VehicleId, ReconciliationEntry>>,
}

impl StateReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the lock state reported by a status poll
    pub fn record_authoritative(&self, vehicle_id: &VehicleId, locked: bool, at: DateTime<Utc>) {
        debug!(vehicle = %vehicle_id, locked, %at, "Recording authoritative lock state");
        self.entries
            .write()
            .entry(vehicle_id.clone())
            .or_default()
            .authoritative = Some(LockObservation { locked, at });
    }

    /// Record the lock state implied by a lock/unlock command issued at `at`
    pub fn record_assumed(&self, vehicle_id: &VehicleId, locked: bool, at: DateTime<Utc>) {
        debug!(vehicle = %vehicle_id, locked, %at, "Recording assumed lock state");
        self.entries
            .write()
            .entry(vehicle_id.clone())
            .or_default()
            .assumed = Some(LockObservation { locked, at });
    }

    /// Snapshot of the entry for a vehicle (empty if never touched)
    pub fn entry(&self, vehicle_id: &VehicleId) -> ReconciliationEntry {
        self.entries
            .read()
            .get(vehicle_id)
            .copied()
            .unwrap_or_default()
    }

    /// Resolve the lock state against the current wall clock
    pub fn resolve(&self, vehicle_id: &VehicleId) -> Option<bool> {
        self.resolve_at(vehicle_id, Utc::now())
    }

    /// Resolve the lock state as if evaluated at `now`
    pub fn resolve_at(&self, vehicle_id: &VehicleId, now: DateTime<Utc>) -> Option<bool> {
        self.entry(vehicle_id).resolve_at(now)
    }

    /// Number of vehicles with an entry
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap()
    }

    fn obs(locked: bool, offset_secs: i64) -> LockObservation {
        LockObservation {
            locked,
            at: t0() + Duration::seconds(offset_secs),
        }
    }

    #[rstest]
    #[case(None, None, None)]
    #[case(None, Some(obs(true, 0)), Some(true))]
    #[case(None, Some(obs(false, 0)), Some(false))]
    #[case(Some(obs(true, 0)), None, Some(true))]
    #[case(Some(obs(false, 0)), None, Some(false))]
    #[case(Some(obs(false, 0)), Some(obs(true, 10)), Some(true))]
    #[case(Some(obs(false, 10)), Some(obs(true, 0)), Some(false))]
    #[case(Some(obs(false, 10)), Some(obs(true, 10)), Some(false))]
    fn test_resolution_table(
        #[case] authoritative: Option<LockObservation>,
        #[case] assumed: Option<LockObservation>,
        #[case] expected: Option<bool>,
    ) {
        let entry = ReconciliationEntry {
            authoritative,
            assumed,
        };
        assert_eq!(entry.resolve_at(t0() + Duration::seconds(20)), expected);
    }

    #[test]
    fn test_trust_window() {
        let reconciler = StateReconciler::new();
        let id = VehicleId::Numeric(1);
        let assumed_at = t0() + Duration::seconds(1);

        reconciler.record_authoritative(&id, false, t0());
        reconciler.record_assumed(&id, true, assumed_at);

        let fresh = t0() + Duration::milliseconds(1001);
        assert_eq!(reconciler.resolve_at(&id, fresh), Some(true));

        let just_inside = assumed_at + Duration::seconds(299);
        assert_eq!(reconciler.resolve_at(&id, just_inside), Some(true));

        let at_boundary = assumed_at + trust_window();
        assert_eq!(reconciler.resolve_at(&id, at_boundary), Some(false));

        let expired = assumed_at + Duration::seconds(301);
        assert_eq!(reconciler.resolve_at(&id, expired), Some(false));
    }

    #[test]
    fn test_newer_authoritative_overrides_assumed() {
        let reconciler = StateReconciler::new();
        let id = VehicleId::from("abc");

        reconciler.record_assumed(&id, true, t0());
        reconciler.record_authoritative(&id, false, t0() + Duration::seconds(5));

        assert_eq!(
            reconciler.resolve_at(&id, t0() + Duration::seconds(6)),
            Some(false)
        );
    }

    #[test]
    fn test_later_command_wins() {
        let reconciler = StateReconciler::new();
        let id = VehicleId::Numeric(7);

        reconciler.record_assumed(&id, false, t0());
        reconciler.record_assumed(&id, true, t0() + Duration::seconds(1));

        assert_eq!(reconciler.resolve_at(&id, t0()), Some(true));
        assert_eq!(reconciler.entry(&id).authoritative, None);
    }

    #[test]
    fn test_vehicles_are_independent() {
        let reconciler = StateReconciler::new();
        let a = VehicleId::Numeric(1);
        let b = VehicleId::Numeric(2);

        reconciler.record_authoritative(&a, true, t0());
        assert_eq!(reconciler.resolve(&a), Some(true));
        assert_eq!(reconciler.resolve(&b), None);
        assert_eq!(reconciler.len(), 1);
    }

    #[test]
    fn test_unknown_vehicle_resolves_to_none() {
        let reconciler = StateReconciler::new();
        assert!(reconciler.is_empty());
        assert_eq!(reconciler.resolve(&VehicleId::Numeric(9)), None);
    }
}
