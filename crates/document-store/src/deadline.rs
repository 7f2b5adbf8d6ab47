//! Deadline-scoped store calls.
//!
//! Every store operation a service issues goes through [`with_deadline`]. On
//! expiry the in-flight future is dropped, which releases whatever it was
//! holding (pool connection, lock guard), and the caller gets
//! [`StoreError::Timeout`]. Nothing is retried.

use std::future::Future;
use std::time::Duration;

use crate::{Result, StoreError};

/// Deadlines applied to store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// Single-document inserts and updates.
    pub write: Duration,
    /// Single-document reads.
    pub read: Duration,
    /// Multi-collection joins and full-collection listings.
    pub aggregate: Duration,
}

impl Deadlines {
    pub const DEFAULT_WRITE: Duration = Duration::from_secs(10);
    pub const DEFAULT_READ: Duration = Duration::from_secs(100);
    pub const DEFAULT_AGGREGATE: Duration = Duration::from_secs(100);

    /// Uses the same deadline for every kind of operation.
    pub fn uniform(limit: Duration) -> Self {
        Self {
            write: limit,
            read: limit,
            aggregate: limit,
        }
    }
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            write: Self::DEFAULT_WRITE,
            read: Self::DEFAULT_READ,
            aggregate: Self::DEFAULT_AGGREGATE,
        }
    }
}

/// Runs a store operation under a deadline.
pub async fn with_deadline<T, F>(operation: &'static str, limit: Duration, op: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => {
            metrics::counter!("store_timeouts", "operation" => operation).increment(1);
            tracing::warn!(operation, ?limit, "store operation timed out");
            Err(StoreError::Timeout {
                operation,
                after: limit,
            })
        }
    }
}
