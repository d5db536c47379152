#![forbid(unsafe_code)]

use rando_contracts::{
    OptionSchema, OptionValue, Scope, ScopeClass, ScopeId, SchemaError, SessionError,
};

/// Editable settings for one generation run.
///
/// The global scope holds every global option plus the shared ("common") form
/// of every per-participant option. Dedicated participant scopes exist only
/// while more than one participant is configured; with a single participant the
/// global scope stands in for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) schema: OptionSchema,
    pub(crate) global: Scope,
    pub(crate) dedicated: Vec<Scope>,
    pub(crate) participant_count: u8,
}

impl Session {
    pub fn new(schema: OptionSchema) -> Result<Self, SchemaError> {
        schema.validate()?;
        let mut global = Scope::new();
        for option in schema.options() {
            global.set(option.key(), option.initial_value()?);
        }
        Ok(Self {
            schema,
            global,
            dedicated: Vec::new(),
            participant_count: 1,
        })
    }

    pub fn schema(&self) -> &OptionSchema {
        &self.schema
    }

    pub fn participant_count(&self) -> u8 {
        self.participant_count
    }

    pub fn global_scope(&self) -> &Scope {
        &self.global
    }

    /// Scopes materialized for participants 1..=N; empty while N == 1.
    pub fn dedicated_scopes(&self) -> &[Scope] {
        &self.dedicated
    }

    /// One scope per participant. With a single participant this is the
    /// global scope's shared per-participant values.
    pub fn participant_scopes(&self) -> Vec<Scope> {
        if self.dedicated.is_empty() {
            vec![self.seeded_participant_scope()]
        } else {
            self.dedicated.clone()
        }
    }

    pub fn scope(&self, id: ScopeId) -> Result<&Scope, SessionError> {
        match id {
            ScopeId::Global => Ok(&self.global),
            ScopeId::Participant(p) => self
                .dedicated
                .get(p.slot())
                .ok_or(SessionError::UnknownScope(id)),
        }
    }

    pub fn value(&self, id: ScopeId, key: &str) -> Result<&OptionValue, SessionError> {
        let scope = self.scope(id)?;
        scope.get(key).ok_or_else(|| match id {
            ScopeId::Global => SessionError::UnknownOption {
                key: key.to_string(),
            },
            ScopeId::Participant(_) => SessionError::NotInScope {
                key: key.to_string(),
                scope: id,
            },
        })
    }

    /// Sets one option in one scope. A participant-count value routes through
    /// the scope manager so scope creation stays in step with N.
    pub fn set_value(
        &mut self,
        id: ScopeId,
        key: &str,
        value: OptionValue,
    ) -> Result<(), SessionError> {
        self.scope(id)?;
        let option = self
            .schema
            .get(key)
            .ok_or_else(|| SessionError::UnknownOption {
                key: key.to_string(),
            })?;
        if matches!(id, ScopeId::Participant(_)) && option.scope != ScopeClass::PerParticipant {
            return Err(SessionError::NotInScope {
                key: key.to_string(),
                scope: id,
            });
        }

        let admitted = option.admit(value)?;
        if let OptionValue::Count(n) = admitted {
            self.set_participant_count(u32::from(n))?;
            return Ok(());
        }

        let scope = match id {
            ScopeId::Global => &mut self.global,
            ScopeId::Participant(p) => self
                .dedicated
                .get_mut(p.slot())
                .ok_or(SessionError::UnknownScope(id))?,
        };
        scope.set(key, admitted);
        Ok(())
    }

    /// A fresh participant scope seeded from the current shared values.
    pub(crate) fn seeded_participant_scope(&self) -> Scope {
        self.schema
            .participant_options()
            .filter_map(|option| {
                self.global
                    .get(option.key())
                    .map(|v| (option.key().to_string(), v.clone()))
            })
            .collect()
    }
}
