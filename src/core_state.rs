//! Shared console state behind the API layer.
//!
//! Single-process, event-driven model: every mutation happens inside a
//! short lock held for one handler step. The in-flight set is the
//! double-submission guard for prescription generation, a UI-level guard
//! rather than a persistence lock.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::auth::SessionStore;
use crate::ordonnance::PrescriptionRegistry;
use crate::services::MockDirectory;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("lock poisoned")]
    LockPoisoned,
}

pub struct CoreState {
    pub directory: MockDirectory,
    sessions: Mutex<SessionStore>,
    registry: Mutex<PrescriptionRegistry>,
    in_flight: Mutex<HashSet<String>>,
}

impl CoreState {
    pub fn new(directory: MockDirectory, sessions: SessionStore) -> Self {
        Self {
            directory,
            sessions: Mutex::new(sessions),
            registry: Mutex::new(PrescriptionRegistry::new()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn lock_sessions(&self) -> Result<MutexGuard<'_, SessionStore>, CoreError> {
        self.sessions.lock().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn lock_registry(&self) -> Result<MutexGuard<'_, PrescriptionRegistry>, CoreError> {
        self.registry.lock().map_err(|_| CoreError::LockPoisoned)
    }

    /// Claim the submission slot for this signer. Returns `false` when a
    /// generation is already outstanding (double-click guard).
    pub fn begin_submission(&self, signer: &str) -> Result<bool, CoreError> {
        let mut in_flight = self.in_flight.lock().map_err(|_| CoreError::LockPoisoned)?;
        Ok(in_flight.insert(signer.to_string()))
    }

    /// Release the submission slot, whatever the outcome was.
    pub fn end_submission(&self, signer: &str) -> Result<(), CoreError> {
        let mut in_flight = self.in_flight.lock().map_err(|_| CoreError::LockPoisoned)?;
        in_flight.remove(signer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> (CoreState, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let sessions = SessionStore::load(&tmp.path().join("sessions.json"));
        (
            CoreState::new(MockDirectory::instant(), sessions),
            tmp,
        )
    }

    #[test]
    fn submission_slot_is_exclusive_per_signer() {
        let (core, _tmp) = state();

        assert!(core.begin_submission("l.benali@clinique-elazhar.dz").unwrap());
        assert!(!core.begin_submission("l.benali@clinique-elazhar.dz").unwrap());
        // Another signer is unaffected
        assert!(core.begin_submission("k.meziane@clinique-elazhar.dz").unwrap());

        core.end_submission("l.benali@clinique-elazhar.dz").unwrap();
        assert!(core.begin_submission("l.benali@clinique-elazhar.dz").unwrap());
    }
}
