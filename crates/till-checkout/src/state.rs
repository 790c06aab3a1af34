//! # Shared State
//!
//! Thread-safe wrapper for the service's mutable state.
//!
//! ## Thread Safety
//! Each piece of state sits in `Arc<Mutex<T>>` because:
//! 1. Any front end thread may call the service
//! 2. Only one caller should modify a given piece of state at a time
//! 3. Every operation takes the lock once, so it is atomic to callers
//!
//! ## Lock Order
//! ```text
//! session ──► journal ──► inventory ──► cashiers
//! ```
//! Operations that need more than one lock take them in this order.

use std::sync::{Arc, Mutex};

use tracing::error;

use crate::error::{ServiceError, ServiceResult};

/// Shared, mutex-guarded state.
#[derive(Debug, Default)]
pub struct Shared<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Shared {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    /// Executes a function with read access to the state.
    ///
    /// ## Usage
    /// ```rust
    /// use till_checkout::state::Shared;
    ///
    /// let counter = Shared::new(41);
    /// assert_eq!(counter.with(|n| n + 1).unwrap(), 42);
    /// ```
    pub fn with<F, R>(&self, f: F) -> ServiceResult<R>
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.inner.lock().map_err(|_| poisoned())?;
        Ok(f(&guard))
    }

    /// Executes a function with write access to the state.
    pub fn with_mut<F, R>(&self, f: F) -> ServiceResult<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.inner.lock().map_err(|_| poisoned())?;
        Ok(f(&mut guard))
    }
}

fn poisoned() -> ServiceError {
    error!("State lock poisoned");
    ServiceError::internal("State lock poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_with_mut_is_visible_to_clones() {
        let state = Shared::new(Vec::<i32>::new());
        let other = state.clone();

        state.with_mut(|v| v.push(1)).unwrap();
        assert_eq!(other.with(|v| v.len()).unwrap(), 1);
    }

    #[test]
    fn test_concurrent_updates() {
        let state = Shared::new(0_i64);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        state.with_mut(|n| *n += 1).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(state.with(|n| *n).unwrap(), 800);
    }

    #[test]
    fn test_poisoned_lock_is_internal_error() {
        let state = Shared::new(0_i32);
        let clone = state.clone();
        let _ = thread::spawn(move || {
            clone
                .with_mut(|_| panic!("boom"))
                .unwrap();
        })
        .join();

        let err = state.with(|n| *n).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Internal);
    }
}
