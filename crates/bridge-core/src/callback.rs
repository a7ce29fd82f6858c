//! Callback adapter for callers that want success/failure callbacks instead
//! of a future.

use crate::domain::error::BridgeError;
use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::warn;

/// Drive `future` on the current runtime and hand its outcome to exactly one
/// of the two callbacks.
///
/// Outside a tokio runtime nothing is spawned: `on_failure` runs in place
/// with [`BridgeError::NoRuntime`] and `None` is returned.
pub fn spawn_with_callbacks<Fut, T, E, S, F>(
    future: Fut,
    on_success: S,
    on_failure: F,
) -> Option<JoinHandle<()>>
where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: From<BridgeError> + Send + 'static,
    S: FnOnce(T) + Send + 'static,
    F: FnOnce(E) + Send + 'static,
{
    let runtime = match Handle::try_current() {
        Ok(runtime) => runtime,
        Err(e) => {
            warn!(error = %e, "No runtime for callback request");
            on_failure(E::from(BridgeError::NoRuntime(e.to_string())));
            return None;
        }
    };

    Some(runtime.spawn(async move {
        match future.await {
            Ok(value) => on_success(value),
            Err(err) => on_failure(err),
        }
    }))
}
