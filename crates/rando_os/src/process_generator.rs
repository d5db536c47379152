#![forbid(unsafe_code)]

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::debug;

use crate::generate::GeneratorInvocation;

#[derive(Debug, Error)]
pub enum ProcessGeneratorError {
    #[error("failed to start generator {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("generator {program} exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

/// Runs the generator as a child process and waits for it.
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl ProcessGenerator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before the session's own, e.g. a script path when
    /// `program` is an interpreter.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }
}

impl GeneratorInvocation for ProcessGenerator {
    type Error = ProcessGeneratorError;

    fn invoke(&self, args: &[String]) -> Result<(), Self::Error> {
        let program = self.program.display().to_string();
        debug!(program = %program, args = args.len(), "spawning generator");
        let status = Command::new(&self.program)
            .args(&self.leading_args)
            .args(args)
            .status()
            .map_err(|source| ProcessGeneratorError::Spawn {
                program: program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(ProcessGeneratorError::Failed { program, status });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn at_process_01_zero_exit_is_success() {
        let generator = ProcessGenerator::new("sh").with_leading_args(["-c", "exit 0", "sh"]);
        generator
            .invoke(&["--race".to_string(), "rom.gbc".to_string()])
            .unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn at_process_02_nonzero_exit_is_reported() {
        let generator = ProcessGenerator::new("sh").with_leading_args(["-c", "exit 3", "sh"]);
        let err = generator.invoke(&["rom.gbc".to_string()]).unwrap_err();
        match err {
            ProcessGeneratorError::Failed { status, .. } => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn at_process_03_arguments_reach_the_child_in_order() {
        let generator = ProcessGenerator::new("sh").with_leading_args([
            "-c",
            r#"[ "$1" = "--multiworld=2" ] && [ "$2" = "" ]"#,
            "sh",
        ]);
        generator
            .invoke(&["--multiworld=2".to_string(), String::new()])
            .unwrap();
    }

    #[test]
    fn at_process_04_missing_program_is_a_spawn_error() {
        let generator = ProcessGenerator::new("rando-generator-that-does-not-exist");
        let err = generator.invoke(&[]).unwrap_err();
        assert!(matches!(err, ProcessGeneratorError::Spawn { .. }));
    }
}
