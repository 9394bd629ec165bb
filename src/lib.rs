pub mod engine;
pub mod error;
pub mod executor;
pub mod identity;
pub mod job;
pub mod notifier;
pub mod reference;
pub mod syncer;

// Re-exports for easy access
pub use engine::{ContainerCli, Engine};
pub use error::{ExecError, Stage, SyncError};
pub use executor::{CommandExecutor, Invocation, Outcome, OutputMode, SystemExecutor};
pub use job::{SyncJob, Token};
pub use notifier::Notifier;
pub use reference::resolve_target;
pub use syncer::ImageSyncer;
