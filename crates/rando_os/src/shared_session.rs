#![forbid(unsafe_code)]

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rando_contracts::{ConsistencyError, OptionValue, RangeError, ScopeId, SessionError};
use rando_engines::multiworld::build_argument_vector;
use rando_engines::scope_manager::ScopeTransition;
use rando_engines::session::Session;
use tracing::warn;

/// A session that one editor and any number of readers can share.
///
/// Every read sees a consistent snapshot: a serialization never observes a
/// participant count and scope sequence that disagree, because a count change
/// happens entirely under the write lock.
#[derive(Debug)]
pub struct SharedSession {
    inner: RwLock<Session>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.read_guard())
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.write_guard())
    }

    pub fn set_participant_count(&self, target: u32) -> Result<ScopeTransition, RangeError> {
        self.write(|s| s.set_participant_count(target))
    }

    pub fn set_value(&self, id: ScopeId, key: &str, value: OptionValue) -> Result<(), SessionError> {
        self.write(|s| s.set_value(id, key, value))
    }

    pub fn build_argument_vector(&self, input_path: &str) -> Result<Vec<String>, ConsistencyError> {
        self.read(|s| build_argument_vector(s, input_path))
    }

    pub fn snapshot(&self) -> Session {
        self.read(Session::clone)
    }

    pub fn into_inner(self) -> Session {
        match self.inner.into_inner() {
            Ok(session) => session,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    // Session edits never leave partial state, so a poisoned guard is still consistent.
    fn read_guard(&self) -> RwLockReadGuard<'_, Session> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("session lock poisoned; recovering");
                self.inner.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Session> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("session lock poisoned; recovering");
                self.inner.clear_poison();
                poisoned.into_inner()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rando_contracts::ParticipantIndex;
    use rando_engines::builtin_catalog::builtin_catalog;
    use rando_engines::multiworld::MULTIWORLD_CONFIG_FLAG;

    fn shared() -> SharedSession {
        SharedSession::new(Session::new(builtin_catalog().unwrap()).unwrap())
    }

    fn declared_count(args: &[String]) -> usize {
        args.iter()
            .find_map(|a| a.strip_prefix("--multiworld="))
            .map(|n| n.parse().unwrap())
            .unwrap_or(1)
    }

    fn nested_count(args: &[String]) -> usize {
        let prefix = format!("--{MULTIWORLD_CONFIG_FLAG}=");
        args.iter().filter(|a| a.starts_with(&prefix)).count()
    }

    #[test]
    fn at_shared_01_edits_are_visible_to_later_reads() {
        let s = shared();
        s.set_participant_count(2).unwrap();
        let p2 = ScopeId::Participant(ParticipantIndex::new(2).unwrap());
        s.set_value(p2, "boomerang", OptionValue::Choice("Trade".to_string()))
            .unwrap();
        let args = s.build_argument_vector("rom.gbc").unwrap();
        assert!(args.contains(&"--multiworld-config=--boomerang=trade".to_string()));
        assert_eq!(s.snapshot().participant_count(), 2);
    }

    #[test]
    fn at_shared_02_failed_edit_leaves_session_untouched() {
        let s = shared();
        let before = s.snapshot();
        assert!(s.set_participant_count(9).is_err());
        assert_eq!(s.into_inner(), before);
    }

    #[test]
    fn at_shared_03_readers_never_see_a_torn_count() {
        let s = shared();
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for round in 0..200u32 {
                    s.set_participant_count(round % 8 + 1).unwrap();
                }
            });
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let args = s.build_argument_vector("rom.gbc").unwrap();
                        let declared = declared_count(&args);
                        let nested = nested_count(&args);
                        if declared == 1 {
                            assert_eq!(nested, 0);
                        } else {
                            assert_eq!(nested, declared);
                        }
                    }
                });
            }
        });
    }
}
