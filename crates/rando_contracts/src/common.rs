#![forbid(unsafe_code)]

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scope::ScopeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaVersion(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("{field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
    #[error("{field}: {got} is outside [{min}, {max}]")]
    InvalidRange {
        field: &'static str,
        min: i64,
        max: i64,
        got: i64,
    },
}

pub trait Validate {
    fn validate(&self) -> Result<(), ContractViolation>;
}

/// Malformed option catalog. Fatal at startup: no session can be built from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("catalog schema_version {got} does not match {expected}")]
    VersionMismatch { expected: u32, got: u32 },
    #[error("catalog is not valid JSON: {0}")]
    Malformed(String),
    #[error("option '{key}' violates contract: {violation}")]
    InvalidOption {
        key: String,
        violation: ContractViolation,
    },
    #[error("option key '{key}' is declared more than once")]
    DuplicateKey { key: String },
    #[error("option '{key}' repeats choice label '{label}'")]
    DuplicateChoiceLabel { key: String, label: String },
    #[error("option '{key}' repeats choice value '{value}'")]
    DuplicateChoiceValue { key: String, value: String },
    #[error("option '{key}' has no choices")]
    EmptyChoices { key: String },
    #[error("option '{key}' default '{default}' is not one of its choice values")]
    DefaultNotInChoices { key: String, default: String },
    #[error("option '{key}' has an invalid numeric range: {reason}")]
    InvalidNumericRange { key: String, reason: &'static str },
    #[error("option '{key}': participant count must be a single global option bounded by 1..=8")]
    MisplacedParticipantCount { key: String },
    #[error("unknown option '{key}'")]
    UnknownOption { key: String },
    #[error("option '{key}' is not an asset choice")]
    NotAssetChoice { key: String },
}

/// Participant count requested outside the allowed bounds. The session is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("participant count {requested} is outside [{min}, {max}]")]
pub struct RangeError {
    pub requested: u32,
    pub min: u8,
    pub max: u8,
}

/// The session and the schema it is serialized against disagree. Aborts serialization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("option '{key}' stores label '{label}' which is not in its choice set")]
    UnresolvedChoice { key: String, label: String },
    #[error("scope holds no value for option '{key}'")]
    MissingValue { key: String },
    #[error("option '{key}' holds a value of the wrong kind")]
    KindMismatch { key: String },
}

/// A rejected edit. Session state is unchanged when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{0} does not exist")]
    UnknownScope(ScopeId),
    #[error("unknown option '{key}'")]
    UnknownOption { key: String },
    #[error("option '{key}' cannot be edited in {scope}")]
    NotInScope { key: String, scope: ScopeId },
    #[error("value for option '{key}' has the wrong kind")]
    KindMismatch { key: String },
    #[error("option '{key}' has no choice labelled '{label}'")]
    UnknownChoice { key: String, label: String },
    #[error("value {value} for option '{key}' is outside [{min}, {max}]")]
    OutOfBounds {
        key: String,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },
    #[error(transparent)]
    Range(#[from] RangeError),
}
