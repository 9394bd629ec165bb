//! Who logs in to GHCR.
//!
//! The CI-supplied actor wins. Without one, a locally configured user name is
//! queried, and failing that a fixed identity is used. None of these steps can
//! fail a sync.

use crate::executor::Invocation;

/// Environment variable CI sets to the user that triggered the run.
pub const ACTOR_ENV_VAR: &str = "GITHUB_ACTOR";

/// Identity used when nothing else is available.
pub const DEFAULT_IDENTITY: &str = "github-actions";

/// Picks the login identity. `query` runs at most once, and only when `actor`
/// is absent or blank.
pub fn resolve_identity<F>(actor: Option<&str>, query: F) -> String
where
    F: FnOnce() -> Option<String>,
{
    if let Some(actor) = non_blank(actor) {
        return actor.to_string();
    }

    query()
        .as_deref()
        .and_then(|name| non_blank(Some(name)))
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_IDENTITY.to_string())
}

/// Default secondary lookup: the user name from git configuration.
pub fn user_name_query() -> Invocation {
    Invocation::new("git", ["config", "--get", "user.name"]).captured()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
