#![forbid(unsafe_code)]

use rando_contracts::ConsistencyError;
use rando_engines::multiworld::build_argument_vector;
use rando_engines::session::Session;
use thiserror::Error;
use tracing::{debug, info};

use crate::shared_session::SharedSession;

/// The external generator. Receives the finished argument vector and blocks
/// until it is done; what it produces is opaque here.
pub trait GeneratorInvocation {
    type Error: std::error::Error + 'static;

    fn invoke(&self, args: &[String]) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateWiringConfig {
    pub generator_enabled: bool,
}

impl GenerateWiringConfig {
    pub fn live() -> Self {
        Self {
            generator_enabled: true,
        }
    }

    pub fn dry_run() -> Self {
        Self {
            generator_enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    NotInvokedDryRun(Vec<String>),
    Invoked(Vec<String>),
}

impl GenerateOutcome {
    pub fn args(&self) -> &[String] {
        match self {
            Self::NotInvokedDryRun(args) | Self::Invoked(args) => args,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError<E: std::error::Error + 'static> {
    #[error("cannot build generator arguments: {0}")]
    Consistency(#[from] ConsistencyError),
    #[error("generator failed: {0}")]
    Generator(#[source] E),
}

/// Serializes a session and hands the result to the generator. Failures are
/// returned as-is; nothing is retried and the session is never modified.
#[derive(Debug, Clone)]
pub struct GenerateWiring<G>
where
    G: GeneratorInvocation,
{
    config: GenerateWiringConfig,
    generator: G,
}

impl<G> GenerateWiring<G>
where
    G: GeneratorInvocation,
{
    pub fn new(config: GenerateWiringConfig, generator: G) -> Self {
        Self { config, generator }
    }

    pub fn run(
        &self,
        session: &Session,
        input_path: &str,
    ) -> Result<GenerateOutcome, GenerateError<G::Error>> {
        let args = build_argument_vector(session, input_path)?;
        self.dispatch(args)
    }

    /// Builds the vector under the read lock. The lock is released before the
    /// generator runs.
    pub fn run_shared(
        &self,
        session: &SharedSession,
        input_path: &str,
    ) -> Result<GenerateOutcome, GenerateError<G::Error>> {
        let args = session.build_argument_vector(input_path)?;
        self.dispatch(args)
    }

    fn dispatch(&self, args: Vec<String>) -> Result<GenerateOutcome, GenerateError<G::Error>> {
        if !self.config.generator_enabled {
            debug!(tokens = args.len(), "generator disabled; returning arguments");
            return Ok(GenerateOutcome::NotInvokedDryRun(args));
        }
        info!(tokens = args.len(), "invoking generator");
        self.generator
            .invoke(&args)
            .map_err(GenerateError::Generator)?;
        Ok(GenerateOutcome::Invoked(args))
    }
}
