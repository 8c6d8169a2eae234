use std::process::Stdio;

use tracing::{debug, trace};

use crate::{
    error::CloudError,
    util::{cmd_program, display_command},
};

/// Runs the `aws` command line client.
///
/// Credentials are resolved by the CLI itself (environment, `~/.aws/credentials`,
/// or the instance IAM role).
#[derive(Clone, Debug)]
pub struct AwsCli {
    program: String,
    /// Leading arguments placed before every call's own arguments.
    args: Vec<String>,
}

impl AwsCli {
    /// Split a whitespace-separated command line such as `aws --profile fleet`.
    ///
    /// Returns `None` for a blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    /// Run the program to completion and return its stdout.
    ///
    /// A non-zero exit is an error carrying the captured stderr.
    pub async fn run(&self, args: &[String]) -> Result<String, CloudError> {
        let args = [self.args.as_slice(), args].concat();
        let mut cmd = cmd_program(&self.program, &args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        trace!(target: "ctag.cloud.proc", program = %self.program, ?args, "spawn");
        let output = cmd
            .output()
            .await
            .map_err(|e| CloudError::Spawn(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            let command = display_command(&self.program, &args);
            return match output.status.code() {
                Some(code) => {
                    debug!(target: "ctag.cloud.proc", code, "exit non-zero");
                    Err(CloudError::NonZeroExit {
                        command,
                        code,
                        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    })
                }
                None => Err(CloudError::KilledBySignal(command)),
            };
        }

        debug!(target: "ctag.cloud.proc", "exit success");
        String::from_utf8(output.stdout).map_err(|e| CloudError::InvalidOutput(e.to_string()))
    }
}
