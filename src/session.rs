//! Session context shared across the app.
//!
//! Replaces ad hoc global auth state with a single context object created at
//! app root. All mutation goes through one reducer-style [`Session::apply`]
//! call; reads are snapshots.

use crate::auth::models::UserProfile;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    SignedIn(UserProfile),
    ProfileUpdated(UserProfile),
    SignedOut,
}

#[derive(Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single mutation path for session state.
    pub fn apply(&self, event: SessionEvent) {
        let mut state = self.state.write().unwrap();
        match event {
            SessionEvent::SignedIn(profile) => {
                tracing::debug!(uid = %profile.uid, "session signed in");
                state.user = Some(profile);
            }
            SessionEvent::ProfileUpdated(profile) => {
                if state.user.is_none() {
                    tracing::warn!("profile update ignored: no signed-in session");
                    return;
                }
                state.user = Some(profile);
            }
            SessionEvent::SignedOut => {
                state.user = None;
            }
        }
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.read().unwrap().user.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.state.read().unwrap().user.is_some()
    }
}
