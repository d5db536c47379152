#![forbid(unsafe_code)]

pub mod catalog;
pub mod common;
pub mod option;
pub mod scope;

pub use catalog::{AugmentOutcome, OptionSchema};
pub use common::{
    ConsistencyError, ContractViolation, RangeError, SchemaError, SchemaVersion, SessionError,
    Validate,
};
pub use option::{ChoiceEntry, OptionKey, OptionKind, OptionSpec, OptionValue, ScopeClass};
pub use scope::{ParticipantIndex, Scope, ScopeId, MAX_PARTICIPANTS, MIN_PARTICIPANTS};
