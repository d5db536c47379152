#![forbid(unsafe_code)]

use std::cmp::Ordering;

use rando_contracts::{OptionValue, ParticipantIndex, RangeError, MIN_PARTICIPANTS};
use tracing::debug;

use crate::session::Session;

/// What a participant-count change did to the scope sequence, so a view can
/// add or drop the matching pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeTransition {
    Unchanged,
    Grown { created: Vec<ParticipantIndex> },
    Shrunk { removed: Vec<ParticipantIndex> },
}

impl Session {
    /// Grows or shrinks the participant scopes to `target`.
    ///
    /// Going from 1 to more participants also materializes scope 1, seeded like
    /// the others from the current shared values. Shrinking pops from the tail;
    /// shrinking to 1 drops every dedicated scope. Out of range targets fail
    /// and change nothing.
    pub fn set_participant_count(&mut self, target: u32) -> Result<ScopeTransition, RangeError> {
        let max = self.schema.max_participants();
        let out_of_range = RangeError {
            requested: target,
            min: MIN_PARTICIPANTS,
            max,
        };
        let target = match u8::try_from(target) {
            Ok(t) if (MIN_PARTICIPANTS..=max).contains(&t) => t,
            _ => return Err(out_of_range),
        };
        let index = |n: u8| ParticipantIndex::new(n).map_err(|_| out_of_range);

        let current = self.participant_count;
        let transition = match target.cmp(&current) {
            Ordering::Equal => return Ok(ScopeTransition::Unchanged),
            Ordering::Greater => {
                let mut created = Vec::new();
                if current == 1 {
                    created.push(index(1)?);
                }
                for n in (current + 1)..=target {
                    created.push(index(n)?);
                }
                for _ in &created {
                    let seeded = self.seeded_participant_scope();
                    self.dedicated.push(seeded);
                }
                ScopeTransition::Grown { created }
            }
            Ordering::Less => {
                let keep = if target == 1 { 0 } else { usize::from(target) };
                let mut removed = Vec::new();
                while self.dedicated.len() > keep {
                    let n = self.dedicated.len() as u8;
                    self.dedicated.pop();
                    removed.push(index(n)?);
                }
                ScopeTransition::Shrunk { removed }
            }
        };

        self.participant_count = target;
        let count_key = self
            .schema
            .participant_count_option()
            .map(|o| o.key().to_string());
        if let Some(key) = count_key {
            self.global.set(key, OptionValue::Count(target));
        }
        debug!(
            from = current,
            to = target,
            dedicated = self.dedicated.len(),
            "participant count changed"
        );
        Ok(transition)
    }
}
