//! Runtime abstraction layer for async operations
//!
//! Lookups are spawned through an [`AsyncSpawner`] handed to each controller,
//! so the library works with whatever executor the host UI already runs.

use crate::{MarkerError, Result};
use futures::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Boxed future as accepted by [`AsyncSpawner::spawn_boxed`]
pub type BoxedTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a detached future. Its output reaches the caller through a channel.
    fn spawn_boxed(&self, future: BoxedTask);
}

/// Default spawner implementations
pub mod spawners {
    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::super::{AsyncSpawner, BoxedTask};

        /// Tokio-based async spawner; must be used from inside a tokio runtime
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(&self, future: BoxedTask) {
                ::tokio::spawn(future);
            }
        }
    }
}

/// Spawner used when a controller is built without an explicit one
pub fn default_spawner() -> Option<Arc<dyn AsyncSpawner>> {
    #[cfg(feature = "tokio-runtime")]
    {
        Some(Arc::new(spawners::tokio_impl::TokioSpawner))
    }

    #[cfg(not(feature = "tokio-runtime"))]
    {
        None
    }
}

/// Bound `future` by `limit` when one is configured.
///
/// Without the tokio runtime there is no timer to race against; the limit is
/// ignored and the lookup waits for the provider.
pub async fn with_timeout<F, T>(limit: Option<Duration>, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        None => future.await,
        Some(limit) => {
            #[cfg(feature = "tokio-runtime")]
            {
                match ::tokio::time::timeout(limit, future).await {
                    Ok(result) => result,
                    Err(_) => Err(MarkerError::Timeout(limit)),
                }
            }

            #[cfg(not(feature = "tokio-runtime"))]
            {
                log::warn!("lookup timeout of {:?} ignored: no timer runtime", limit);
                future.await
            }
        }
    }
}
