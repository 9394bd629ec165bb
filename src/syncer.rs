//! Copying one image into GHCR.
//!
//! [`ImageSyncer`] runs a [`SyncJob`] as a fixed sequence of container CLI calls:
//! 1. **Pull** the source reference.
//! 2. **Tag** it with the derived GHCR reference.
//! 3. **Resolve** the login identity (see [`crate::identity`]).
//! 4. **Login** to `ghcr.io`, with the token on stdin.
//! 5. **Push** the GHCR reference.
//!
//! The first failing stage aborts the sync with the matching [`SyncError`]
//! variant. Nothing is retried and completed stages are not rolled back.

use log::debug;

use crate::engine::ContainerCli;
use crate::error::{Result, Stage, SyncError};
use crate::executor::{CommandExecutor, Invocation};
use crate::identity::{resolve_identity, user_name_query};
use crate::job::SyncJob;
use crate::notifier::Notifier;
use crate::reference::GHCR_HOST;

/// Orchestrates the GHCR copy through an injected [`CommandExecutor`].
///
/// Holds no per-sync state, so one syncer can run any number of jobs in turn.
/// It never spawns threads and every stage blocks until its command exits.
pub struct ImageSyncer<E: CommandExecutor> {
    executor: E,
    cli: ContainerCli,
    actor: Option<String>,
    identity_query: Invocation,
    notifier: Notifier,
}

impl<E: CommandExecutor> ImageSyncer<E> {
    /// Syncer using `docker`, no actor, the git user-name query and stdout progress.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            cli: ContainerCli::default(),
            actor: None,
            identity_query: user_name_query(),
            notifier: Notifier::default(),
        }
    }

    pub fn with_cli(mut self, cli: ContainerCli) -> Self {
        self.cli = cli;
        self
    }

    /// Login identity supplied by the environment, usually `GITHUB_ACTOR`.
    pub fn with_actor(mut self, actor: Option<String>) -> Self {
        self.actor = actor;
        self
    }

    /// Replaces the secondary lookup consulted when no actor is set.
    pub fn with_identity_query(mut self, query: Invocation) -> Self {
        self.identity_query = query;
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn cli(&self) -> &ContainerCli {
        &self.cli
    }

    /// Runs pull, tag, login and push for `job`, stopping at the first failure.
    pub fn sync(&self, job: &SyncJob) -> Result<()> {
        let source = job.source_reference();
        let target = job.target_reference();

        self.notifier.step(&format!("Pulling source image: {}", source));
        self.run(Stage::Pull, &self.cli.pull(source))?;

        self.notifier.step(&format!("Tagging image for GHCR: {}", target));
        self.run(Stage::Tag, &self.cli.tag(source, target))?;

        let identity = self.login_identity();

        self.notifier.step(&format!("Logging in to GHCR as {}", identity));
        self.run(Stage::Login, &self.cli.login(GHCR_HOST, &identity, job.token()))?;

        self.notifier.step(&format!("Pushing image to GHCR: {}", target));
        self.run(Stage::Push, &self.cli.push(target))?;

        Ok(())
    }

    fn run(&self, stage: Stage, invocation: &Invocation) -> Result<()> {
        debug!("Running {} stage", stage);
        self.executor
            .execute(invocation)
            .map(|_| ())
            .map_err(|cause| SyncError::at(stage, cause))
    }

    fn login_identity(&self) -> String {
        resolve_identity(self.actor.as_deref(), || {
            match self.executor.execute(&self.identity_query) {
                Ok(outcome) => Some(outcome.stdout),
                Err(err) => {
                    debug!("User name lookup failed, using fallback identity: {}", err);
                    None
                }
            }
        })
    }
}
