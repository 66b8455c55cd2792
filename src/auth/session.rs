use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    SignedIn { user_id: String },
}

impl SessionState {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::SignedIn { user_id } => Some(user_id),
            Self::SignedOut => None,
        }
    }
}

/// Process-local view of who is signed in for one connection.
///
/// Subscribers observe every transition; dropping or unsubscribing a
/// subscription releases it.
#[derive(Debug, Clone)]
pub struct SessionContext {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(SessionState::SignedOut)
    }
}

impl SessionContext {
    pub fn new(initial: SessionState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self::new(SessionState::SignedIn {
            user_id: user_id.into(),
        })
    }

    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        self.tx.send_replace(SessionState::SignedIn {
            user_id: user_id.into(),
        });
    }

    pub fn sign_out(&self) {
        self.tx.send_replace(SessionState::SignedOut);
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: Some(self.tx.subscribe()),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

pub struct SessionSubscription {
    rx: Option<watch::Receiver<SessionState>>,
}

impl SessionSubscription {
    /// Wait for the next transition. Pends forever once unsubscribed, so it
    /// can stay in a `select!` arm.
    pub async fn changed(&mut self) -> Option<SessionState> {
        let Some(rx) = self.rx.as_mut() else {
            return std::future::pending().await;
        };
        match rx.changed().await {
            Ok(()) => Some(rx.borrow_and_update().clone()),
            Err(_) => {
                self.rx = None;
                None
            }
        }
    }

    pub fn unsubscribe(&mut self) {
        self.rx = None;
    }

    pub fn is_subscribed(&self) -> bool {
        self.rx.is_some()
    }
}
