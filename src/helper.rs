use crate::insert::{HelperOutput, HelperRunner};
use anyhow::Result;
use std::process::Command;
use tracing::debug;

/// Runs the configured review helper as a subprocess.
///
/// Arguments are passed directly to the process without going through a
/// shell, so the URL needs no quoting. On success the inserted text is
/// the helper's stdout; on failure stdout and stderr are combined so the
/// user sees whatever the helper had to say.
pub struct SubprocessHelper {
    command: String,
}

impl SubprocessHelper {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl HelperRunner for SubprocessHelper {
    fn run_review(&self, url: &str) -> Result<HelperOutput> {
        debug!(command = %self.command, url, "invoking review helper");

        let output = match Command::new(&self.command).arg("review").arg(url).output() {
            Ok(output) => output,
            // A missing or non-executable helper reports through the same
            // failure path as a non-zero exit.
            Err(err) => {
                return Ok(HelperOutput {
                    success: false,
                    text: format!("'{}' failed to start: {err}", self.command),
                });
            }
        };

        let success = output.status.success();
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        let text = if success {
            stdout
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut combined = stdout;
            if !stderr.trim().is_empty() {
                if !combined.trim().is_empty() {
                    combined.push('\n');
                }
                combined.push_str(stderr.trim_end());
            }
            combined
        };

        debug!(success, exit_code = ?output.status.code(), "helper finished");

        Ok(HelperOutput { success, text })
    }
}

pub fn check_command_exists(command: &str) -> Result<(), String> {
    let check = if cfg!(windows) {
        Command::new("where").arg(command).output()
    } else {
        Command::new("which").arg(command).output()
    };

    match check {
        Ok(output) if output.status.success() => Ok(()),
        _ => Err(format!("'{command}' not found in PATH")),
    }
}
