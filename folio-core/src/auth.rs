//! In-process auth state and the view gate built on it.

use folio_contracts::auth::{AuthCallback, AuthProvider, AuthSubscription};
use folio_model::AuthUser;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::debug;

type SharedCallback = Arc<dyn Fn(Option<&AuthUser>) + Send + Sync>;

#[derive(Default)]
struct HubState {
    user: Option<AuthUser>,
    next_id: u64,
    listeners: Vec<(u64, SharedCallback)>,
}

/// Holds the current user and fans changes out to subscribers.
#[derive(Clone, Default)]
pub struct AuthHub {
    state: Arc<Mutex<HubState>>,
}

impl fmt::Debug for AuthHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("AuthHub")
            .field("user", &state.user)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl AuthHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: AuthUser) -> Self {
        let hub = Self::new();
        hub.lock().user = Some(user);
        hub
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn sign_in(&self, user: AuthUser) {
        debug!(uid = %user.uid, "user signed in");
        self.publish(Some(user));
    }

    pub fn sign_out(&self) {
        debug!("user signed out");
        self.publish(None);
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn publish(&self, user: Option<AuthUser>) {
        // Callbacks run outside the lock so they may call back into the hub.
        let listeners: Vec<SharedCallback> = {
            let mut state = self.lock();
            state.user = user.clone();
            state.listeners.iter().map(|(_, cb)| cb.clone()).collect()
        };
        for listener in listeners {
            listener(user.as_ref());
        }
    }
}

impl AuthProvider for AuthHub {
    fn current_user(&self) -> Option<AuthUser> {
        self.lock().user.clone()
    }

    fn on_change(&self, callback: AuthCallback) -> AuthSubscription {
        let callback: SharedCallback = Arc::from(callback);
        let (id, current) = {
            let mut state = self.lock();
            state.next_id += 1;
            let id = state.next_id;
            state.listeners.push((id, callback.clone()));
            (id, state.user.clone())
        };
        callback(current.as_ref());

        let state = Arc::downgrade(&self.state);
        AuthSubscription::new(move || {
            if let Some(state) = state.upgrade() {
                let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
                state.listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }
}

/// Which top-level view the shell should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView {
    Authenticated,
    Login,
}

/// Tracks the shell view for the lifetime of its subscription.
#[derive(Debug)]
pub struct AccessGate {
    view: watch::Receiver<GateView>,
    _subscription: AuthSubscription,
}

impl AccessGate {
    pub fn new(provider: &dyn AuthProvider) -> Self {
        let (tx, view) = watch::channel(GateView::Login);
        let subscription = provider.on_change(Box::new(move |user| {
            let next = if user.is_some() {
                GateView::Authenticated
            } else {
                GateView::Login
            };
            tx.send_replace(next);
        }));
        Self {
            view,
            _subscription: subscription,
        }
    }

    pub fn view(&self) -> GateView {
        *self.view.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.view() == GateView::Authenticated
    }

    pub fn watch(&self) -> watch::Receiver<GateView> {
        self.view.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn subscriber_sees_current_state_immediately() {
        let hub = AuthHub::signed_in(AuthUser::new("u1"));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = hub.on_change(Box::new(move |user| {
            sink.lock().unwrap().push(user.map(|u| u.uid.clone()));
        }));

        hub.sign_out();
        hub.sign_in(AuthUser::new("u2").with_email("u2@example.com"));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("u1".to_string()), None, Some("u2".to_string())]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery_and_is_idempotent() {
        let hub = AuthHub::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut sub = hub.on_change(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(hub.listener_count(), 1);

        sub.unsubscribe();
        sub.unsubscribe();
        hub.sign_in(AuthUser::new("u1"));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let hub = AuthHub::new();
        {
            let _sub = hub.on_change(Box::new(|_| {}));
            assert_eq!(hub.listener_count(), 1);
        }
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn gate_switches_between_views() {
        let hub = AuthHub::new();
        let gate = AccessGate::new(&hub);
        assert_eq!(gate.view(), GateView::Login);

        hub.sign_in(AuthUser::new("u1"));
        assert!(gate.is_authenticated());

        hub.sign_out();
        assert_eq!(gate.view(), GateView::Login);

        drop(gate);
        assert_eq!(hub.listener_count(), 0);
    }
}
