//! Cancellable request groups.
//!
//! A screen owns one [`RequestScope`] and hands [`ScopeHandle`]s (usually via
//! [`MobileApiClient::scoped`](super::MobileApiClient::scoped)) to the work
//! it starts. Cancelling the scope, or dropping it when the screen goes
//! away, aborts whatever is still in flight and resolves those calls with
//! [`ApiError::Cancelled`]. Handles never keep calls alive on their own.

use futures::future::{AbortHandle, AbortRegistration, Abortable};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::client::ApiError;

#[derive(Default)]
struct ScopeState {
    handles: Mutex<HashMap<u64, AbortHandle>>,
    next_id: AtomicU64,
    cancelled: AtomicBool,
}

impl ScopeState {
    fn register(self: &Arc<Self>) -> Result<(AbortRegistration, Registered), ApiError> {
        let (handle, registration) = AbortHandle::new_pair();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // checked under the lock so a concurrent cancel() either sees this
        // handle or we see its flag
        let mut handles = self.handles.lock().unwrap_or_else(|e| e.into_inner());
        if self.cancelled.load(Ordering::SeqCst) {
            return Err(ApiError::Cancelled);
        }
        handles.insert(id, handle);
        Ok((
            registration,
            Registered {
                state: self.clone(),
                id,
            },
        ))
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let handles = std::mem::take(&mut *self.handles.lock().unwrap_or_else(|e| e.into_inner()));
        if !handles.is_empty() {
            tracing::debug!(count = handles.len(), "Aborting in-flight requests");
        }
        for handle in handles.into_values() {
            handle.abort();
        }
    }
}

/// Removes a finished or abandoned call from the scope.
struct Registered {
    state: Arc<ScopeState>,
    id: u64,
}

impl Drop for Registered {
    fn drop(&mut self) {
        self.state
            .handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.id);
    }
}

/// Non-owning reference to a [`RequestScope`].
#[derive(Clone)]
pub struct ScopeHandle {
    state: Arc<ScopeState>,
}

impl ScopeHandle {
    /// The returned future does not borrow the handle, so it can be spawned.
    pub fn run<F, T>(&self, future: F) -> impl Future<Output = Result<T, ApiError>>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let registered = self.state.register();
        async move {
            let (registration, _registered) = registered?;
            match Abortable::new(future, registration).await {
                Ok(result) => result,
                Err(_) => Err(ApiError::Cancelled),
            }
        }
    }

    pub fn cancel(&self) {
        self.state.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }
}

/// Owner of a request group. Dropping it cancels the group.
#[derive(Default)]
pub struct RequestScope {
    state: Arc<ScopeState>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            state: self.state.clone(),
        }
    }

    pub fn run<F, T>(&self, future: F) -> impl Future<Output = Result<T, ApiError>>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.handle().run(future)
    }

    pub fn in_flight(&self) -> usize {
        self.state.handles.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn cancel(&self) {
        self.state.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.state.cancel();
    }
}
