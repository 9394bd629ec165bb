use clap::ValueEnum;

use crate::executor::Invocation;
use crate::job::Token;

/// Container engines with a docker-compatible CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, ValueEnum)]
pub enum Engine {
    #[default]
    Docker,
    Podman,
    Nerdctl,
}

impl Engine {
    pub fn program(self) -> &'static str {
        match self {
            Engine::Docker => "docker",
            Engine::Podman => "podman",
            Engine::Nerdctl => "nerdctl",
        }
    }
}

/// Builds the container CLI invocations a sync is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCli {
    program: String,
}

impl ContainerCli {
    /// Uses `program` verbatim, either a name resolved through `PATH` or a path.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn pull(&self, reference: &str) -> Invocation {
        Invocation::new(self.program.as_str(), ["pull", reference])
    }

    pub fn tag(&self, source: &str, target: &str) -> Invocation {
        Invocation::new(self.program.as_str(), ["tag", source, target])
    }

    /// The token is handed over on stdin, keeping it out of the process list.
    pub fn login(&self, host: &str, user: &str, token: &Token) -> Invocation {
        Invocation::new(
            self.program.as_str(),
            ["login", host, "-u", user, "--password-stdin"],
        )
        .with_input(token.expose())
    }

    pub fn push(&self, reference: &str) -> Invocation {
        Invocation::new(self.program.as_str(), ["push", reference])
    }
}

impl From<Engine> for ContainerCli {
    fn from(engine: Engine) -> Self {
        Self::new(engine.program())
    }
}

impl Default for ContainerCli {
    fn default() -> Self {
        Engine::default().into()
    }
}
