use std::sync::{Arc, PoisonError, RwLock};

use flume::Sender;
use tracing::{debug, info, warn};

use crate::{
    api::{ClubApi, models::PermissionSet},
    config::ClientConfig,
    event::Event,
};

use super::{
    error::SessionError,
    host::{HostBridge, InitData},
    state::{Session, SessionInner},
    tokens::TokenStore,
};

/// Owns the authentication state machine.
///
/// Every operation catches remote failures and folds them into state. Locks are
/// only held between suspension points, never across a remote call.
pub struct SessionController {
    api: Arc<dyn ClubApi>,
    tokens: Arc<dyn TokenStore>,
    init_data: Option<InitData>,
    host_bot_url: String,
    state: RwLock<SessionInner>,
    event_tx: Sender<Event>,
}

impl SessionController {
    pub fn new(
        api: Arc<dyn ClubApi>,
        tokens: Arc<dyn TokenStore>,
        host: &dyn HostBridge,
        config: &ClientConfig,
        event_tx: Sender<Event>,
    ) -> Self {
        Self {
            api,
            tokens,
            init_data: host.probe().init_data().cloned(),
            host_bot_url: config.host_bot_url.clone(),
            state: RwLock::new(SessionInner::default()),
            event_tx,
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot(self.init_data.is_some(), &self.host_bot_url)
    }

    pub fn permissions(&self) -> Option<PermissionSet> {
        self.snapshot().permissions().copied()
    }

    pub fn is_embedded(&self) -> bool {
        self.init_data.is_some()
    }

    /// Id of the last profile seen, kept across failed reloads.
    pub fn best_known_user_id(&self) -> Option<String> {
        self.read(|s| s.last_known_user_id.clone())
    }

    fn read<R>(&self, f: impl FnOnce(&SessionInner) -> R) -> R {
        f(&*self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn update<R>(&self, f: impl FnOnce(&mut SessionInner) -> R) -> R {
        let out = f(&mut *self.state.write().unwrap_or_else(PoisonError::into_inner));
        let _ = self.event_tx.send(Event::SessionChanged);
        out
    }

    /// Reloads the profile. The first unauthenticated result seen while embedded
    /// kicks off the one automatic identity exchange of this process.
    pub async fn load_profile(&self) {
        if !self.refresh_profile().await {
            return;
        }
        let Some(init_data) = self.init_data.clone() else {
            return;
        };
        let fire = self.update(|s| !std::mem::replace(&mut s.auto_auth_attempted, true));
        if fire {
            info!("session_auto_auth");
            let _ = self.authenticate_with_host(&init_data).await;
        }
    }

    /// Returns true when the backend reported the caller as unauthenticated.
    async fn refresh_profile(&self) -> bool {
        self.update(|s| {
            s.profile_loading = true;
            s.profile_error = None;
        });

        let result = self.api.fetch_profile().await;

        self.update(|s| {
            s.profile_loading = false;
            match result {
                Ok(data) => {
                    info!(user_id = data.profile.id.as_str(), "session_profile_loaded");
                    s.last_known_user_id = Some(data.profile.id.clone());
                    s.data = Some(data);
                    false
                }
                Err(err) => {
                    s.data = None;
                    let unauthenticated = err.is_unauthenticated();
                    if unauthenticated {
                        info!("session_unauthenticated");
                    } else {
                        warn!(code = err.code.as_str(), "session_profile_failed: {}", err);
                    }
                    s.profile_error = Some(err);
                    unauthenticated
                }
            }
        })
    }

    /// Exchanges the host identity blob for a token pair and reloads the profile.
    ///
    /// A no-op while an exchange is running or a profile is already loaded.
    pub async fn authenticate_with_host(&self, init_data: &InitData) -> Result<(), SessionError> {
        let started = self.update(|s| {
            if s.authenticating || s.data.is_some() {
                return false;
            }
            s.authenticating = true;
            s.auth_error = None;
            s.needs_host_link = false;
            true
        });
        if !started {
            debug!("session_auth_skipped");
            return Ok(());
        }

        match self.exchange(init_data).await {
            Ok(()) => {
                self.refresh_profile().await;
                self.update(|s| s.authenticating = false);
                Ok(())
            }
            Err(err) => {
                warn!("session_auth_failed: {}", err);
                let membership = matches!(err, SessionError::MembershipRequired(_));
                let user_id = self.update(|s| {
                    s.auth_error = Some(err.clone());
                    if membership {
                        s.needs_host_link = true;
                    }
                    s.last_known_user_id.clone()
                });

                if membership {
                    let _ = self.request_login_link(user_id).await;
                }

                self.update(|s| s.authenticating = false);
                Err(err)
            }
        }
    }

    async fn exchange(&self, init_data: &InitData) -> Result<(), SessionError> {
        let session = self
            .api
            .exchange_host_identity(init_data.as_str())
            .await
            .map_err(SessionError::from_exchange)?;

        let pair = session
            .tokens
            .and_then(|t| t.complete())
            .ok_or(SessionError::TokenExchangeIncomplete)?;

        self.tokens.set_pair(pair);
        info!("session_tokens_issued");
        Ok(())
    }

    /// User-triggered retry of the host exchange.
    pub async fn connect(&self) -> Result<(), SessionError> {
        match self.init_data.clone() {
            Some(init_data) => self.authenticate_with_host(&init_data).await,
            None => {
                debug!("session_connect_without_host");
                Err(SessionError::NoHostContext)
            }
        }
    }

    /// Asks the backend for a bot login link and publishes it as [`Event::OpenLink`].
    ///
    /// Only one request runs at a time; a second call while one is pending returns
    /// `Ok(None)` without contacting the backend.
    pub async fn request_login_link(
        &self,
        user_id: Option<String>,
    ) -> Result<Option<String>, SessionError> {
        let started = self.update(|s| {
            if s.requesting_link {
                return false;
            }
            s.requesting_link = true;
            s.link_error = None;
            true
        });
        if !started {
            debug!("session_login_link_in_flight");
            return Ok(None);
        }

        let result = self.api.request_login_link(user_id.as_deref()).await;

        match result {
            Ok(link) => {
                self.update(|s| s.requesting_link = false);
                if link.is_empty() {
                    return Ok(None);
                }
                info!("session_login_link_ready");
                let _ = self.event_tx.send(Event::OpenLink(link.clone()));
                Ok(Some(link))
            }
            Err(err) => {
                warn!(code = err.code.as_str(), "session_login_link_failed: {}", err);
                let err = SessionError::LoginLink(err);
                self.update(|s| {
                    s.requesting_link = false;
                    s.link_error = Some(err.clone());
                });
                Err(err)
            }
        }
    }

    /// Signs out remotely and drops all local session data, whatever the backend says.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let result = self.api.logout().await;

        self.tokens.clear();
        self.update(SessionInner::sign_out);

        result.map_err(|err| {
            warn!(code = err.code.as_str(), "session_logout_failed: {}", err);
            SessionError::Rpc(err)
        })
    }
}
