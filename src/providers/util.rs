use crate::core::error::{FetchError, FetchResult};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Runs an async operation with an upper time bound
///
/// # Parameters
/// - `operation`: Future producing the fetch result
/// - `bound`: Maximum time to wait for it
///
/// # Returns
/// The operation's result, or `FetchError::Timeout` once the bound elapses.
/// On timeout the operation future is dropped, which aborts any request it
/// still has open.
pub async fn with_timeout<Fut, T>(operation: Fut, bound: Duration) -> FetchResult<T>
where
    Fut: Future<Output = FetchResult<T>>,
{
    match tokio::time::timeout(bound, operation).await {
        Ok(result) => result,
        Err(_) => {
            debug!("Operation exceeded {:?}, cancelled", bound);
            Err(FetchError::Timeout(bound))
        }
    }
}
