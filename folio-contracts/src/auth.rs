//! Auth state contract: observe the current user.

use folio_model::AuthUser;
use std::fmt;

/// Callback invoked with the current user, or `None` when signed out.
pub type AuthCallback = Box<dyn Fn(Option<&AuthUser>) + Send + Sync>;

/// Source of "who is signed in" for the shell.
pub trait AuthProvider: Send + Sync {
    /// Snapshot of the current user.
    fn current_user(&self) -> Option<AuthUser>;

    /// Register `callback` for auth changes. Implementations invoke it once
    /// with the current state before returning.
    fn on_change(&self, callback: AuthCallback) -> AuthSubscription;
}

/// Handle returned by [`AuthProvider::on_change`].
///
/// Unsubscribes when [`AuthSubscription::unsubscribe`] is called or on drop.
pub struct AuthSubscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl AuthSubscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Subscription that owns nothing.
    pub fn detached() -> Self {
        Self { unsubscribe: None }
    }

    pub fn is_active(&self) -> bool {
        self.unsubscribe.is_some()
    }

    /// Stop receiving updates. Calling this twice is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for AuthSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSubscription")
            .field("active", &self.is_active())
            .finish()
    }
}
