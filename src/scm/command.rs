use super::ScmManager;
use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{Level, debug, span};

/// Runs a manager's status command and returns its combined output.
pub trait StatusCommand {
    /// Runs the status command for `manager` with `directory` as the
    /// working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable is missing, cannot be spawned, or
    /// exits unsuccessfully.
    fn run(&self, manager: ScmManager, directory: &Path) -> Result<String>;
}

/// Spawns the real `svn`, `hg` or `git` executable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessCommand;

impl StatusCommand for ProcessCommand {
    fn run(&self, manager: ScmManager, directory: &Path) -> Result<String> {
        let program = manager
            .program()
            .ok_or_else(|| anyhow!("No status command for unmanaged directories"))?;
        let args = manager.status_args();

        let span = span!(Level::DEBUG, "scm_status_command", program, ?args);
        let _guard = span.enter();

        let executable =
            which::which(program).with_context(|| format!("{program} executable not found"))?;

        // No timeout: a hung VCS tool blocks the listing until it exits.
        let output = Command::new(&executable)
            .args(args)
            .current_dir(directory)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {program} status"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "{program} status failed ({}): {}",
                output.status,
                stderr.trim()
            ));
        }

        debug!(
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Status command finished"
        );

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
        }
        Ok(combined)
    }
}
