use crate::api::{
    RpcError,
    models::{PermissionSet, Profile, ProfileData},
};

use super::error::SessionError;

/// What the unauthenticated screen should offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthGate {
    /// Opened outside the chat client. Not an error; stays until restart.
    NoHostContext { open_via: String },
    /// The one automatic exchange is about to start.
    AutoPending,
    AuthInFlight,
    /// The automatic attempt was spent; only a manual connect remains.
    AwaitingRetry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPhase {
    Loading,
    Authenticated,
    Unauthenticated(AuthGate),
    ProfileError,
}

/// Read-only view of the session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub data: Option<ProfileData>,
    pub phase: AuthPhase,
    pub last_error: Option<SessionError>,
    pub auth_error: Option<SessionError>,
    pub needs_host_link: bool,
    pub is_requesting_link: bool,
    pub link_error: Option<SessionError>,
}

impl Session {
    pub fn profile(&self) -> Option<&Profile> {
        self.data.as_ref().map(|d| &d.profile)
    }

    pub fn permissions(&self) -> Option<&PermissionSet> {
        self.data.as_ref().map(|d| &d.permissions)
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }

    /// Authenticated, but the account has no chat identity linked yet.
    pub fn needs_platform_link(&self) -> bool {
        self.profile().is_some_and(Profile::needs_platform_link)
    }
}

#[derive(Debug, Default)]
pub(crate) struct SessionInner {
    pub data: Option<ProfileData>,
    pub profile_loading: bool,
    pub profile_error: Option<RpcError>,
    pub authenticating: bool,
    pub auto_auth_attempted: bool,
    pub auth_error: Option<SessionError>,
    pub needs_host_link: bool,
    pub requesting_link: bool,
    pub link_error: Option<SessionError>,
    pub last_known_user_id: Option<String>,
}

impl SessionInner {
    pub fn phase(&self, has_host: bool, open_via: &str) -> AuthPhase {
        if self.profile_loading {
            return AuthPhase::Loading;
        }
        if self.data.is_some() {
            return AuthPhase::Authenticated;
        }
        match &self.profile_error {
            Some(err) if err.is_unauthenticated() => {
                let gate = if !has_host {
                    AuthGate::NoHostContext {
                        open_via: open_via.to_string(),
                    }
                } else if self.authenticating {
                    AuthGate::AuthInFlight
                } else if self.auto_auth_attempted {
                    AuthGate::AwaitingRetry
                } else {
                    AuthGate::AutoPending
                };
                AuthPhase::Unauthenticated(gate)
            }
            Some(_) => AuthPhase::ProfileError,
            None => AuthPhase::Loading,
        }
    }

    pub fn snapshot(&self, has_host: bool, open_via: &str) -> Session {
        let last_error = self
            .profile_error
            .as_ref()
            .filter(|e| !e.is_unauthenticated())
            .cloned()
            .map(SessionError::Rpc);

        Session {
            data: self.data.clone(),
            phase: self.phase(has_host, open_via),
            last_error,
            auth_error: self.auth_error.clone(),
            needs_host_link: self.needs_host_link,
            is_requesting_link: self.requesting_link,
            link_error: self.link_error.clone(),
        }
    }

    /// Drops everything tied to the signed-in user and lands on the sign-in gate.
    ///
    /// The guard is spent so a later unauthenticated reload does not sign the user
    /// straight back in.
    pub fn sign_out(&mut self) {
        *self = SessionInner {
            profile_error: Some(RpcError::unauthenticated("signed out")),
            auto_auth_attempted: true,
            ..SessionInner::default()
        };
    }
}
