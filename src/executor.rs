//! External command execution.
//!
//! Everything the crate delegates to other programs goes through the
//! [`CommandExecutor`] capability. [`SystemExecutor`] spawns real processes;
//! tests substitute recording doubles or plain closures.

use log::{debug, trace};
use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::ExecError;

/// What happens to a child's standard output and error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Inherit the caller's stdout/stderr.
    Forward,
    /// Collect stdout into [`Outcome::stdout`] and discard stderr.
    Capture,
}

/// A single external program call.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Bytes written to the child's standard input, which is then closed.
    pub input: Option<Vec<u8>>,
    pub output: OutputMode,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            input: None,
            output: OutputMode::Forward,
        }
    }

    pub fn with_input(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn captured(mut self) -> Self {
        self.output = OutputMode::Capture;
        self
    }

    /// First argument, which for container CLIs is the subcommand.
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

// Input may hold credentials, so only its size is ever printed.
impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field(
                "input",
                &self.input.as_ref().map(|bytes| format!("<{} bytes>", bytes.len())),
            )
            .field("output", &self.output)
            .finish()
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Captured standard output; always empty in [`OutputMode::Forward`].
    pub stdout: String,
}

impl Outcome {
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
        }
    }
}

/// Runs external programs on behalf of the syncer.
///
/// A non-zero exit must be reported as [`ExecError::Status`].
pub trait CommandExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<Outcome, ExecError>;
}

impl<F> CommandExecutor for F
where
    F: Fn(&Invocation) -> Result<Outcome, ExecError>,
{
    fn execute(&self, invocation: &Invocation) -> Result<Outcome, ExecError> {
        self(invocation)
    }
}

/// Executor backed by `std::process::Command`. Blocks until the child exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<Outcome, ExecError> {
        debug!("Executing command: {:?}", invocation);

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);

        command.stdin(if invocation.input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        match invocation.output {
            OutputMode::Forward => {
                command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            OutputMode::Capture => {
                command.stdout(Stdio::piped()).stderr(Stdio::null());
            }
        }

        let mut child = command.spawn().map_err(|source| ExecError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        if let Some(input) = &invocation.input {
            if let Some(mut stdin) = child.stdin.take() {
                let written = stdin.write_all(input);
                // Dropping the handle closes the pipe so the child sees EOF.
                drop(stdin);
                if let Err(source) = written {
                    // A child that exits early closes the pipe; its exit status is the real cause.
                    let status = child.wait().map_err(|source| ExecError::Wait {
                        program: invocation.program.clone(),
                        source,
                    })?;
                    if !status.success() {
                        return Err(ExecError::Status {
                            program: invocation.program.clone(),
                            code: status.code(),
                        });
                    }
                    return Err(ExecError::Input {
                        program: invocation.program.clone(),
                        source,
                    });
                }
            }
        }

        let output = child.wait_with_output().map_err(|source| ExecError::Wait {
            program: invocation.program.clone(),
            source,
        })?;

        trace!(
            "{} finished with {} ({} bytes captured)",
            invocation.program,
            output.status,
            output.stdout.len()
        );

        if !output.status.success() {
            return Err(ExecError::Status {
                program: invocation.program.clone(),
                code: output.status.code(),
            });
        }

        Ok(Outcome {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_debug_hides_input() {
        let invocation = Invocation::new("docker", ["login", "ghcr.io"]).with_input("s3cr3t-token");
        let rendered = format!("{:?}", invocation);
        assert!(!rendered.contains("s3cr3t-token"));
        assert!(rendered.contains("<12 bytes>"));
        assert!(rendered.contains("ghcr.io"));
    }

    #[test]
    fn test_invocation_builders() {
        let invocation = Invocation::new("git", ["config", "--get", "user.name"]).captured();
        assert_eq!(invocation.output, OutputMode::Capture);
        assert_eq!(invocation.subcommand(), Some("config"));
        assert_eq!(invocation.input, None);
        assert_eq!(Invocation::new("true", Vec::<String>::new()).subcommand(), None);
    }

    #[test]
    fn test_closure_executor() {
        let executor = |invocation: &Invocation| -> Result<Outcome, ExecError> {
            Ok(Outcome::with_stdout(invocation.args.join(" ")))
        };
        let outcome = executor
            .execute(&Invocation::new("echo", ["a", "b"]))
            .unwrap();
        assert_eq!(outcome.stdout, "a b");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_executor_captures_stdout() {
        let outcome = SystemExecutor::new()
            .execute(&Invocation::new("sh", ["-c", "printf hello"]).captured())
            .unwrap();
        assert_eq!(outcome.stdout, "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_executor_feeds_stdin() {
        let outcome = SystemExecutor::new()
            .execute(
                &Invocation::new("sh", ["-c", "cat"])
                    .with_input("piped-value")
                    .captured(),
            )
            .unwrap();
        assert_eq!(outcome.stdout, "piped-value");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_executor_reports_exit_status() {
        let err = SystemExecutor::new()
            .execute(&Invocation::new("sh", ["-c", "exit 3"]))
            .unwrap_err();
        match err {
            ExecError::Status { program, code } => {
                assert_eq!(program, "sh");
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    // Larger than any pipe buffer, so writing fails once the child is gone
    #[cfg(unix)]
    fn oversized_input() -> Vec<u8> {
        vec![b'x'; 4 * 1024 * 1024]
    }

    #[cfg(unix)]
    #[test]
    fn test_system_executor_prefers_exit_status_over_broken_stdin() {
        let err = SystemExecutor::new()
            .execute(&Invocation::new("sh", ["-c", "exit 4"]).with_input(oversized_input()))
            .unwrap_err();
        match err {
            ExecError::Status { program, code } => {
                assert_eq!(program, "sh");
                assert_eq!(code, Some(4));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_system_executor_reports_unread_input() {
        let err = SystemExecutor::new()
            .execute(&Invocation::new("sh", ["-c", "exit 0"]).with_input(oversized_input()))
            .unwrap_err();
        match err {
            ExecError::Input { program, .. } => assert_eq!(program, "sh"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_system_executor_reports_missing_program() {
        let err = SystemExecutor::new()
            .execute(&Invocation::new("ghcr-sync-no-such-program", ["pull"]))
            .unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }
}
