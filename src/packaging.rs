//! Post-build packaging hook.
//!
//! Runs the configured build and package commands one after another. A
//! failing step is reported and stops the sequence, but never fails the
//! caller: packaging sits at the tail of a host build that must not crash
//! because of it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::process::Command;

use crate::{log_error, log_info};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PackagingStep {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl PackagingStep {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

impl fmt::Display for PackagingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackagingOutcome {
    Completed,
    Failed { step: usize, command: String },
}

/// Run `steps` in order inside `working_dir`, stopping at the first failure
pub async fn run_packaging(steps: &[PackagingStep], working_dir: &Path) -> PackagingOutcome {
    for (index, step) in steps.iter().enumerate() {
        log_info!("Running {}", step);

        let status = Command::new(&step.program)
            .args(&step.args)
            .current_dir(working_dir)
            .status()
            .await;

        let failure = match status {
            Ok(status) if status.success() => None,
            Ok(status) => Some(format!("exited with {status}")),
            Err(e) => Some(format!("could not be started: {e}")),
        };

        if let Some(reason) = failure {
            log_error!("Packaging step `{}` {}", step, reason);
            return PackagingOutcome::Failed {
                step: index,
                command: step.to_string(),
            };
        }
    }

    log_info!("Packaging completed");
    PackagingOutcome::Completed
}
