//! Signed-in state. Financial data outlives sessions; only the identity
//! comes and goes.

use crate::{
    domain::User,
    errors::{Result, TrackerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated(User),
}

impl Session {
    pub fn from_persisted(user: Option<User>) -> Self {
        match user {
            Some(user) => Session::Authenticated(user),
            None => Session::Unauthenticated,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    /// Fails with [`TrackerError::NotAuthenticated`] outside a session.
    pub fn require_user(&self) -> Result<&User> {
        self.user().ok_or(TrackerError::NotAuthenticated)
    }

    /// Unauthenticated -> Authenticated. A second login without logging out
    /// first is rejected.
    pub fn login(&mut self, user: User) -> Result<&User> {
        if self.is_authenticated() {
            return Err(TrackerError::Validation(
                "a session is already active".into(),
            ));
        }
        *self = Session::Authenticated(user);
        self.require_user()
    }

    /// Authenticated -> Unauthenticated. Returns the user that was signed in.
    pub fn logout(&mut self) -> Option<User> {
        match std::mem::take(self) {
            Session::Authenticated(user) => Some(user),
            Session::Unauthenticated => None,
        }
    }
}
