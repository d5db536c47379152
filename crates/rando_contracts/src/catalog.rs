#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::option::{check_choice_set, ChoiceEntry, OptionKind, OptionSpec, ScopeClass};
use crate::scope::MAX_PARTICIPANTS;
use crate::{SchemaError, SchemaVersion, Validate};

pub const CATALOG_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

/// Ordered option catalog. Declaration order is display order and emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSchema {
    schema_version: SchemaVersion,
    options: Vec<OptionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentOutcome {
    pub key: String,
    /// Entries present before augmenting.
    pub base_count: usize,
    pub appended: usize,
}

impl OptionSchema {
    pub fn v1(options: Vec<OptionSpec>) -> Result<Self, SchemaError> {
        let s = Self {
            schema_version: CATALOG_CONTRACT_VERSION,
            options,
        };
        s.validate()?;
        Ok(s)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        let s: Self =
            serde_json::from_str(raw).map_err(|e| SchemaError::Malformed(e.to_string()))?;
        s.validate()?;
        Ok(s)
    }

    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        serde_json::to_string_pretty(self).map_err(|e| SchemaError::Malformed(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.schema_version != CATALOG_CONTRACT_VERSION {
            return Err(SchemaError::VersionMismatch {
                expected: CATALOG_CONTRACT_VERSION.0,
                got: self.schema_version.0,
            });
        }
        // Keys are unique across both classes: the global scope also carries the
        // shared form of every per-participant option.
        let mut keys = BTreeSet::new();
        let mut participant_counts = 0usize;
        for option in &self.options {
            option.check()?;
            if !keys.insert(option.key()) {
                return Err(SchemaError::DuplicateKey {
                    key: option.key().to_string(),
                });
            }
            if matches!(option.kind, OptionKind::ParticipantCount { .. }) {
                participant_counts += 1;
                if participant_counts > 1 {
                    return Err(SchemaError::MisplacedParticipantCount {
                        key: option.key().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn get(&self, key: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.key() == key)
    }

    pub fn global_options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options_in(ScopeClass::Global)
    }

    pub fn participant_options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options_in(ScopeClass::PerParticipant)
    }

    pub fn options_in(&self, class: ScopeClass) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter().filter(move |o| o.scope == class)
    }

    pub fn participant_count_option(&self) -> Option<&OptionSpec> {
        self.options
            .iter()
            .find(|o| matches!(o.kind, OptionKind::ParticipantCount { .. }))
    }

    /// Upper bound for the participant count: the catalog's own bound, or 8.
    pub fn max_participants(&self) -> u8 {
        match self.participant_count_option().map(|o| &o.kind) {
            Some(OptionKind::ParticipantCount { max }) => *max,
            _ => MAX_PARTICIPANTS,
        }
    }

    pub fn asset_choice_keys(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(|o| matches!(o.kind, OptionKind::AssetChoice { .. }))
            .map(OptionSpec::key)
    }

    /// Appends entries to an asset-choice option, keeping prior order.
    ///
    /// A label or value that collides with an existing entry is reported as an
    /// error and nothing is appended; callers disambiguate labels beforehand.
    pub fn augment(
        &mut self,
        key: &str,
        extra: Vec<ChoiceEntry>,
    ) -> Result<AugmentOutcome, SchemaError> {
        let option = self
            .options
            .iter_mut()
            .find(|o| o.key.as_str() == key)
            .ok_or_else(|| SchemaError::UnknownOption {
                key: key.to_string(),
            })?;
        let OptionKind::AssetChoice { choices, .. } = &mut option.kind else {
            return Err(SchemaError::NotAssetChoice {
                key: key.to_string(),
            });
        };

        let base_count = choices.len();
        let mut merged = choices.clone();
        merged.extend(extra);
        check_choice_set(key, &merged)?;
        for entry in &merged[base_count..] {
            entry
                .validate()
                .map_err(|violation| SchemaError::InvalidOption {
                    key: key.to_string(),
                    violation,
                })?;
        }
        let appended = merged.len() - base_count;
        *choices = merged;

        Ok(AugmentOutcome {
            key: key.to_string(),
            base_count,
            appended,
        })
    }
}
