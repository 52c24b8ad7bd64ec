//! Liveness of listener owners.
//!
//! A listener may be bound to an owner that can disappear while the listener
//! is still registered. The bus asks the owner's [`Liveness`] before every
//! invocation and prunes the listener once the owner is gone.
//!
//! Two implementations are provided:
//!
//! - [`Weak<T>`]: the owner is alive while a strong `Arc<T>` exists.
//! - [`Lifeline`]: an explicit flag the owner severs on its own teardown path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Answers whether a listener's owner still exists.
///
/// Must be cheap and synchronous; it runs once per eligible listener per
/// broadcast.
pub trait Liveness: Send + Sync {
    /// Returns `true` while the owner exists.
    fn is_alive(&self) -> bool;
}

impl<T: Send + Sync> Liveness for Weak<T> {
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }
}

/// An explicit liveness flag.
///
/// Clones share the same flag. Once severed it never becomes alive again.
///
/// ```rust,ignore
/// let lifeline = Lifeline::new();
/// bus.register_with_owner(channel, Arc::new(lifeline.clone()), callback, None, MatchMode::Exact);
///
/// // later, on the owner's destruction path
/// lifeline.sever();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Lifeline {
    severed: Arc<AtomicBool>,
}

impl Lifeline {
    /// Creates a live flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the owner as gone.
    pub fn sever(&self) {
        self.severed.store(true, Ordering::Release);
    }

    /// Returns `true` once [`sever`](Self::sever) has been called.
    pub fn is_severed(&self) -> bool {
        self.severed.load(Ordering::Acquire)
    }

    /// Returns a guard that severs this lifeline when dropped.
    pub fn guard(&self) -> LifelineGuard {
        LifelineGuard {
            lifeline: self.clone(),
        }
    }
}

impl Liveness for Lifeline {
    fn is_alive(&self) -> bool {
        !self.is_severed()
    }
}

/// Severs its [`Lifeline`] on drop.
///
/// Embed one in the owning struct to tie listener liveness to the owner's
/// lifetime.
#[derive(Debug)]
pub struct LifelineGuard {
    lifeline: Lifeline,
}

impl Drop for LifelineGuard {
    fn drop(&mut self) {
        self.lifeline.sever();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_tracks_strong_count() {
        let owner = Arc::new(5u32);
        let weak = Arc::downgrade(&owner);
        assert!(weak.is_alive());
        drop(owner);
        assert!(!weak.is_alive());
    }

    #[test]
    fn test_lifeline_guard_severs_on_drop() {
        let lifeline = Lifeline::new();
        let observer = lifeline.clone();
        {
            let _guard = lifeline.guard();
            assert!(observer.is_alive());
        }
        assert!(!observer.is_alive());
        assert!(observer.is_severed());
    }
}
