//! Operation outcomes and the replace policy.

use std::fmt;
use std::str::FromStr;

/// Result of a write-side coordinator operation.
///
/// Missing or duplicate records are expected outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExists,
    Updated,
    NotFound,
    Ok,
}

impl Outcome {
    /// Human-readable text sent back to clients.
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Created => "Created",
            Outcome::AlreadyExists => "Already Exists",
            Outcome::Updated | Outcome::Ok => "Ok",
            Outcome::NotFound => "Not Found",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// What `replace` does to a cache entry after a successful durable update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacePolicy {
    /// Delete the cache entry so the next read repopulates it.
    #[default]
    Invalidate,
    /// Leave the cache untouched; a warm entry keeps serving the old value
    /// until the record is removed.
    LeaveStale,
}

impl ReplacePolicy {
    pub fn from_invalidate_flag(invalidate: bool) -> Self {
        if invalidate {
            ReplacePolicy::Invalidate
        } else {
            ReplacePolicy::LeaveStale
        }
    }
}

impl FromStr for ReplacePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Self::from_invalidate_flag(true)),
            "false" | "0" | "no" => Ok(Self::from_invalidate_flag(false)),
            "invalidate" => Ok(ReplacePolicy::Invalidate),
            "leave-stale" | "stale" => Ok(ReplacePolicy::LeaveStale),
            other => Err(format!("unknown replace policy '{}'", other)),
        }
    }
}
