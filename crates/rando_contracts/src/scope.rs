#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use crate::option::OptionValue;
use crate::{ContractViolation, Validate};

pub const MIN_PARTICIPANTS: u8 = 1;
pub const MAX_PARTICIPANTS: u8 = 8;

/// 1-based participant slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantIndex(u8);

impl ParticipantIndex {
    pub fn new(v: u8) -> Result<Self, ContractViolation> {
        let p = Self(v);
        p.validate()?;
        Ok(p)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Position of this participant's scope in a zero-based sequence.
    pub const fn slot(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl Validate for ParticipantIndex {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0 < MIN_PARTICIPANTS || self.0 > MAX_PARTICIPANTS {
            return Err(ContractViolation::InvalidRange {
                field: "participant_index",
                min: MIN_PARTICIPANTS as i64,
                max: MAX_PARTICIPANTS as i64,
                got: self.0 as i64,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ParticipantIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScopeId {
    Global,
    Participant(ParticipantIndex),
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global scope"),
            Self::Participant(p) => write!(f, "participant {p} scope"),
        }
    }
}

/// Option key to current value, for one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    values: BTreeMap<String, OptionValue>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: OptionValue) -> Option<OptionValue> {
        self.values.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, OptionValue)> for Scope {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
