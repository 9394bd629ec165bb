use std::fmt;

/// Failure of a single external command invocation.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to execute {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write standard input of {program}")]
    Input {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for {program}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{} {}", .program, describe_exit(.code))]
    Status { program: String, code: Option<i32> },
}

fn describe_exit(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

/// The externally delegated steps of a sync, in execution order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    Pull,
    Tag,
    Login,
    Push,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pull => "pull",
            Stage::Tag => "tag",
            Stage::Login => "login",
            Stage::Push => "push",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("invalid sync job: {0}")]
    InvalidJob(String),
    #[error("failed to pull source image")]
    PullFailed(#[source] ExecError),
    #[error("failed to tag image")]
    TagFailed(#[source] ExecError),
    #[error("failed to login to GHCR")]
    LoginFailed(#[source] ExecError),
    #[error("failed to push image to GHCR")]
    PushFailed(#[source] ExecError),
}

impl SyncError {
    /// Stage that failed, or `None` when the job was rejected before any command ran.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SyncError::InvalidJob(_) => None,
            SyncError::PullFailed(_) => Some(Stage::Pull),
            SyncError::TagFailed(_) => Some(Stage::Tag),
            SyncError::LoginFailed(_) => Some(Stage::Login),
            SyncError::PushFailed(_) => Some(Stage::Push),
        }
    }

    pub(crate) fn at(stage: Stage, cause: ExecError) -> Self {
        match stage {
            Stage::Pull => SyncError::PullFailed(cause),
            Stage::Tag => SyncError::TagFailed(cause),
            Stage::Login => SyncError::LoginFailed(cause),
            Stage::Push => SyncError::PushFailed(cause),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_error_messages() {
        let err = ExecError::Status {
            program: "docker".to_string(),
            code: Some(125),
        };
        assert_eq!(err.to_string(), "docker exited with status 125");

        let err = ExecError::Status {
            program: "docker".to_string(),
            code: None,
        };
        assert_eq!(err.to_string(), "docker was terminated by a signal");

        let err = ExecError::Wait {
            program: "docker".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::Interrupted),
        };
        assert_eq!(err.to_string(), "failed to wait for docker");
    }

    #[test]
    fn test_sync_error_carries_stage_and_cause() {
        for stage in [Stage::Pull, Stage::Tag, Stage::Login, Stage::Push] {
            let err = SyncError::at(
                stage,
                ExecError::Status {
                    program: "docker".to_string(),
                    code: Some(1),
                },
            );
            assert_eq!(err.stage(), Some(stage));
            let source = std::error::Error::source(&err).expect("cause should be attached");
            assert_eq!(source.to_string(), "docker exited with status 1");
        }

        assert_eq!(SyncError::InvalidJob("empty".to_string()).stage(), None);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Pull.to_string(), "pull");
        assert_eq!(Stage::Push.to_string(), "push");
    }
}
