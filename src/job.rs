use std::fmt;

use crate::error::{Result, SyncError};
use crate::reference::resolve_target;

/// Registry credential. Formatting never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// One image copy: where from, where to, and the credential for the target.
#[derive(Debug, Clone)]
pub struct SyncJob {
    source_reference: String,
    target_reference: String,
    token: Token,
}

impl SyncJob {
    /// Builds a job copying `source` into the GHCR organization `target_org`.
    ///
    /// Blank inputs are rejected up front; the target reference is derived with
    /// [`resolve_target`].
    pub fn new(source: &str, target_org: &str, token: Token) -> Result<Self> {
        if source.trim().is_empty() {
            return Err(SyncError::InvalidJob(
                "source image reference is empty".to_string(),
            ));
        }
        if target_org.trim().is_empty() {
            return Err(SyncError::InvalidJob(
                "target organization is empty".to_string(),
            ));
        }
        if token.is_blank() {
            return Err(SyncError::InvalidJob("GHCR token is empty".to_string()));
        }

        Ok(Self {
            source_reference: source.to_string(),
            target_reference: resolve_target(source, target_org),
            token,
        })
    }

    pub fn source_reference(&self) -> &str {
        &self.source_reference
    }

    pub fn target_reference(&self) -> &str {
        &self.target_reference
    }

    pub fn token(&self) -> &Token {
        &self.token
    }
}
