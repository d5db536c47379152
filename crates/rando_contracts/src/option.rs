#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::scope::MAX_PARTICIPANTS;
use crate::{ContractViolation, SchemaError, SessionError, Validate};

const KEY_MAX_LEN: usize = 64;
const LABEL_MAX_LEN: usize = 128;

/// Flag name on the generator command line and lookup key in every scope.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionKey(String);

impl OptionKey {
    pub fn new(v: impl Into<String>) -> Result<Self, ContractViolation> {
        let k = Self(v.into());
        k.validate()?;
        Ok(k)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validate for OptionKey {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "option_key",
                reason: "must not be empty",
            });
        }
        if self.0.len() > KEY_MAX_LEN {
            return Err(ContractViolation::InvalidValue {
                field: "option_key",
                reason: "exceeds max length",
            });
        }
        if self.0.starts_with('-') {
            return Err(ContractViolation::InvalidValue {
                field: "option_key",
                reason: "must not start with '-'",
            });
        }
        if !self
            .0
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ContractViolation::InvalidValue {
                field: "option_key",
                reason: "must contain only ascii alphanumerics, '-' or '_'",
            });
        }
        Ok(())
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoiceEntry {
    /// Display text. Doubles as the lookup key from a stored selection back to `value`.
    pub label: String,
    /// Passed to the generator. May be empty, in which case nothing is emitted.
    pub value: String,
}

impl ChoiceEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl Validate for ChoiceEntry {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.label.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "choice_entry.label",
                reason: "must not be empty",
            });
        }
        if self.label.len() > LABEL_MAX_LEN {
            return Err(ContractViolation::InvalidValue {
                field: "choice_entry.label",
                reason: "exceeds max length",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeClass {
    Global,
    PerParticipant,
}

impl ScopeClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::PerParticipant => "per-participant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OptionKind {
    Boolean {
        default: bool,
    },
    Text {
        default: String,
    },
    NumericRange {
        min: Decimal,
        max: Decimal,
        step: Decimal,
        default: Decimal,
    },
    /// Lower bound is always 1 and a fresh session always starts at 1.
    ParticipantCount {
        max: u8,
    },
    SingleChoice {
        choices: Vec<ChoiceEntry>,
        default_value: String,
    },
    /// A single choice whose set is extended after construction by an asset provider.
    AssetChoice {
        choices: Vec<ChoiceEntry>,
        default_value: String,
    },
}

impl OptionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean { .. } => "boolean",
            Self::Text { .. } => "text",
            Self::NumericRange { .. } => "numeric-range",
            Self::ParticipantCount { .. } => "participant-count",
            Self::SingleChoice { .. } => "single-choice",
            Self::AssetChoice { .. } => "asset-choice",
        }
    }

    pub fn choices(&self) -> Option<&[ChoiceEntry]> {
        match self {
            Self::SingleChoice { choices, .. } | Self::AssetChoice { choices, .. } => {
                Some(choices)
            }
            _ => None,
        }
    }
}

/// Current value of one option inside one scope.
///
/// Choice-like options hold the selected *label*; the serializer maps it back
/// to the underlying value through the live choice set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum OptionValue {
    Flag(bool),
    Text(String),
    Number(Decimal),
    Count(u8),
    Choice(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Number(v) => write!(f, "{v}"),
            Self::Count(v) => write!(f, "{v}"),
            Self::Choice(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub key: OptionKey,
    pub label: String,
    pub scope: ScopeClass,
    pub kind: OptionKind,
}

impl OptionSpec {
    pub fn new(
        key: OptionKey,
        label: impl Into<String>,
        scope: ScopeClass,
        kind: OptionKind,
    ) -> Result<Self, SchemaError> {
        let s = Self {
            key,
            label: label.into(),
            scope,
            kind,
        };
        s.check()?;
        Ok(s)
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Contract checks plus the kind-level invariants: unique choice labels and
    /// values, default inside the choice set or numeric range.
    pub fn check(&self) -> Result<(), SchemaError> {
        self.validate().map_err(|violation| SchemaError::InvalidOption {
            key: self.key.as_str().to_string(),
            violation,
        })?;
        let key = || self.key.as_str().to_string();

        match &self.kind {
            OptionKind::Boolean { .. } | OptionKind::Text { .. } => Ok(()),
            OptionKind::NumericRange {
                min,
                max,
                step,
                default,
            } => {
                if *step <= Decimal::ZERO {
                    return Err(SchemaError::InvalidNumericRange {
                        key: key(),
                        reason: "step must be > 0",
                    });
                }
                if min > max {
                    return Err(SchemaError::InvalidNumericRange {
                        key: key(),
                        reason: "min must be <= max",
                    });
                }
                if default < min || default > max {
                    return Err(SchemaError::InvalidNumericRange {
                        key: key(),
                        reason: "default must lie within [min, max]",
                    });
                }
                if quantize(*default, *min, *step) != *default {
                    return Err(SchemaError::InvalidNumericRange {
                        key: key(),
                        reason: "default must lie on the step grid",
                    });
                }
                Ok(())
            }
            OptionKind::ParticipantCount { max } => {
                if self.scope != ScopeClass::Global || *max == 0 || *max > MAX_PARTICIPANTS {
                    return Err(SchemaError::MisplacedParticipantCount { key: key() });
                }
                Ok(())
            }
            OptionKind::SingleChoice {
                choices,
                default_value,
            }
            | OptionKind::AssetChoice {
                choices,
                default_value,
            } => {
                if choices.is_empty() {
                    return Err(SchemaError::EmptyChoices { key: key() });
                }
                check_choice_set(self.key.as_str(), choices)?;
                if !choices.iter().any(|c| &c.value == default_value) {
                    return Err(SchemaError::DefaultNotInChoices {
                        key: key(),
                        default: default_value.clone(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Value a scope holds for this option before any edit.
    pub fn initial_value(&self) -> Result<OptionValue, SchemaError> {
        match &self.kind {
            OptionKind::Boolean { default } => Ok(OptionValue::Flag(*default)),
            OptionKind::Text { default } => Ok(OptionValue::Text(default.clone())),
            OptionKind::NumericRange { default, .. } => Ok(OptionValue::Number(*default)),
            OptionKind::ParticipantCount { .. } => Ok(OptionValue::Count(1)),
            OptionKind::SingleChoice { default_value, .. }
            | OptionKind::AssetChoice { default_value, .. } => self
                .label_for_value(default_value)
                .map(|label| OptionValue::Choice(label.to_string()))
                .ok_or_else(|| SchemaError::DefaultNotInChoices {
                    key: self.key.as_str().to_string(),
                    default: default_value.clone(),
                }),
        }
    }

    pub fn label_for_value(&self, value: &str) -> Option<&str> {
        self.kind
            .choices()?
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.label.as_str())
    }

    pub fn value_for_label(&self, label: &str) -> Option<&str> {
        self.kind
            .choices()?
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.value.as_str())
    }

    /// Kind-membership check for an edit. Numbers are quantized to the step grid.
    pub fn admit(&self, value: OptionValue) -> Result<OptionValue, SessionError> {
        let key = || self.key.as_str().to_string();
        match (&self.kind, value) {
            (OptionKind::Boolean { .. }, v @ OptionValue::Flag(_)) => Ok(v),
            (OptionKind::Text { .. }, v @ OptionValue::Text(_)) => Ok(v),
            (OptionKind::ParticipantCount { .. }, v @ OptionValue::Count(_)) => Ok(v),
            (OptionKind::NumericRange { min, max, step, .. }, OptionValue::Number(n)) => {
                if n < *min || n > *max {
                    return Err(SessionError::OutOfBounds {
                        key: key(),
                        value: n,
                        min: *min,
                        max: *max,
                    });
                }
                Ok(OptionValue::Number(quantize(n, *min, *step).min(*max)))
            }
            (
                OptionKind::SingleChoice { choices, .. } | OptionKind::AssetChoice { choices, .. },
                OptionValue::Choice(label),
            ) => {
                if choices.iter().any(|c| c.label == label) {
                    Ok(OptionValue::Choice(label))
                } else {
                    Err(SessionError::UnknownChoice { key: key(), label })
                }
            }
            _ => Err(SessionError::KindMismatch { key: key() }),
        }
    }
}

impl Validate for OptionSpec {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.key.validate()?;
        if self.label.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "option_spec.label",
                reason: "must not be empty",
            });
        }
        if self.label.len() > LABEL_MAX_LEN {
            return Err(ContractViolation::InvalidValue {
                field: "option_spec.label",
                reason: "exceeds max length",
            });
        }
        if let Some(choices) = self.kind.choices() {
            for choice in choices {
                choice.validate()?;
            }
        }
        Ok(())
    }
}

pub(crate) fn check_choice_set(key: &str, choices: &[ChoiceEntry]) -> Result<(), SchemaError> {
    let mut labels = BTreeSet::new();
    let mut values = BTreeSet::new();
    for choice in choices {
        if !labels.insert(choice.label.as_str()) {
            return Err(SchemaError::DuplicateChoiceLabel {
                key: key.to_string(),
                label: choice.label.clone(),
            });
        }
        if !values.insert(choice.value.as_str()) {
            return Err(SchemaError::DuplicateChoiceValue {
                key: key.to_string(),
                value: choice.value.clone(),
            });
        }
    }
    Ok(())
}

fn quantize(value: Decimal, min: Decimal, step: Decimal) -> Decimal {
    let steps = ((value - min) / step)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    (min + steps * step).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice_spec(choices: Vec<ChoiceEntry>, default_value: &str) -> OptionSpec {
        OptionSpec {
            key: OptionKey::new("logic").unwrap(),
            label: "Logic".to_string(),
            scope: ScopeClass::PerParticipant,
            kind: OptionKind::SingleChoice {
                choices,
                default_value: default_value.to_string(),
            },
        }
    }

    fn forward_factor() -> OptionSpec {
        OptionSpec::new(
            OptionKey::new("forwardfactor").unwrap(),
            "Forward Factor",
            ScopeClass::Global,
            OptionKind::NumericRange {
                min: Decimal::new(1, 1),
                max: Decimal::new(1000, 1),
                step: Decimal::new(1, 1),
                default: Decimal::new(5, 1),
            },
        )
        .unwrap()
    }

    #[test]
    fn at_option_01_key_rejects_separators_and_whitespace() {
        assert!(OptionKey::new("dungeon-items").is_ok());
        assert!(OptionKey::new("").is_err());
        assert!(OptionKey::new("seed=1").is_err());
        assert!(OptionKey::new("two words").is_err());
        assert!(OptionKey::new("--seed").is_err());
    }

    #[test]
    fn at_option_02_choice_set_rejects_duplicate_label_and_value() {
        let dup_label = choice_spec(
            vec![ChoiceEntry::new("Normal", "a"), ChoiceEntry::new("Normal", "b")],
            "a",
        );
        assert!(matches!(
            dup_label.check(),
            Err(SchemaError::DuplicateChoiceLabel { .. })
        ));

        let dup_value = choice_spec(
            vec![ChoiceEntry::new("A", "x"), ChoiceEntry::new("B", "x")],
            "x",
        );
        assert!(matches!(
            dup_value.check(),
            Err(SchemaError::DuplicateChoiceValue { .. })
        ));
    }

    #[test]
    fn at_option_03_default_must_be_a_choice_value() {
        let spec = choice_spec(
            vec![ChoiceEntry::new("Casual", "casual"), ChoiceEntry::new("Normal", "normal")],
            "Normal",
        );
        assert_eq!(
            spec.check(),
            Err(SchemaError::DefaultNotInChoices {
                key: "logic".to_string(),
                default: "Normal".to_string(),
            })
        );
    }

    #[test]
    fn at_option_04_initial_choice_value_is_the_default_label() {
        let spec = choice_spec(
            vec![ChoiceEntry::new("Casual", "casual"), ChoiceEntry::new("Normal", "normal")],
            "normal",
        );
        assert_eq!(
            spec.initial_value().unwrap(),
            OptionValue::Choice("Normal".to_string())
        );
        assert_eq!(spec.value_for_label("Casual"), Some("casual"));
        assert_eq!(spec.value_for_label("casual"), None);
    }

    #[test]
    fn at_option_05_numeric_edit_is_bounded_and_quantized() {
        let spec = forward_factor();
        assert_eq!(
            spec.admit(OptionValue::Number(Decimal::new(1234, 3))).unwrap(),
            OptionValue::Number(Decimal::new(12, 1))
        );
        assert!(matches!(
            spec.admit(OptionValue::Number(Decimal::new(1, 2))),
            Err(SessionError::OutOfBounds { .. })
        ));
        assert!(matches!(
            spec.admit(OptionValue::Flag(true)),
            Err(SessionError::KindMismatch { .. })
        ));
    }

    #[test]
    fn at_option_06_numeric_default_off_grid_is_rejected() {
        let err = OptionSpec::new(
            OptionKey::new("forwardfactor").unwrap(),
            "Forward Factor",
            ScopeClass::Global,
            OptionKind::NumericRange {
                min: Decimal::new(1, 1),
                max: Decimal::new(1000, 1),
                step: Decimal::new(1, 1),
                default: Decimal::new(55, 2),
            },
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidNumericRange { .. }));
    }

    #[test]
    fn at_option_07_participant_count_must_be_global() {
        let err = OptionSpec::new(
            OptionKey::new("multiworld").unwrap(),
            "Multiworld",
            ScopeClass::PerParticipant,
            OptionKind::ParticipantCount { max: 8 },
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::MisplacedParticipantCount { .. }));
    }

    #[test]
    fn at_option_08_choice_edit_requires_known_label() {
        let spec = choice_spec(
            vec![ChoiceEntry::new("Casual", "casual"), ChoiceEntry::new("Normal", "normal")],
            "normal",
        );
        assert!(spec.admit(OptionValue::Choice("Casual".to_string())).is_ok());
        assert_eq!(
            spec.admit(OptionValue::Choice("Hell".to_string())),
            Err(SessionError::UnknownChoice {
                key: "logic".to_string(),
                label: "Hell".to_string(),
            })
        );
    }
}
