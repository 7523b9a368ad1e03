use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The result of an idempotent order write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveOrderResult {
    /// Every row of the aggregate was written in this call.
    Inserted,
    /// A header row already existed for the `order_uid`, so nothing was written. This is the success case for
    /// redelivered or concurrently delivered duplicates.
    AlreadyExists,
}

impl SaveOrderResult {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted)
    }
}

impl Display for SaveOrderResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inserted => write!(f, "inserted"),
            Self::AlreadyExists => write!(f, "already exists"),
        }
    }
}
