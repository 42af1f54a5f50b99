use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use flume::{Receiver, Sender};
use tracing::{info, warn};

use crate::{
    api::{ClubApi, models::SongDraft},
    config::ClientConfig,
    event::Event,
    session::{HostBridge, HostContext, SessionController, TokenStore},
    songs::{HostSignal, SongList},
};

/// User intents issued by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    // Session
    LoadProfile,
    Connect,
    RequestLoginLink,
    Logout,

    // Song list
    SetQuery(String),
    SetIncludeFull(bool),
    SetIncludeOpen(bool),
    LoadMore,
    Refresh,
    Select(Option<String>),
    Host(HostSignal),

    // Writes; all but `CreateSong` act on the selected song
    CreateSong(SongDraft),
    UpdateSong(SongDraft),
    DeleteSong,
    JoinRole(String),
    LeaveRole(String),
}

/// What the signed-in user may do, for gating controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub can_create: bool,
    pub can_feature: bool,
    pub can_edit_any: bool,
}

/// Wires the session and the song list onto one event channel.
#[derive(Clone)]
pub struct Club {
    pub session: Arc<SessionController>,
    pub songs: Arc<SongList>,
    pub event_rx: Receiver<Event>,
    host: Arc<dyn HostBridge>,
    list_mounted: Arc<AtomicBool>,
}

impl Club {
    pub fn new(
        api: Arc<dyn ClubApi>,
        tokens: Arc<dyn TokenStore>,
        host: Arc<dyn HostBridge>,
        config: &ClientConfig,
    ) -> Self {
        let (event_tx, event_rx) = flume::unbounded();
        Self::with_channel(api, tokens, host, config, event_tx, event_rx)
    }

    pub fn with_channel(
        api: Arc<dyn ClubApi>,
        tokens: Arc<dyn TokenStore>,
        host: Arc<dyn HostBridge>,
        config: &ClientConfig,
        event_tx: Sender<Event>,
        event_rx: Receiver<Event>,
    ) -> Self {
        let session = Arc::new(SessionController::new(
            api.clone(),
            tokens,
            host.as_ref(),
            config,
            event_tx.clone(),
        ));
        let songs = Arc::new(SongList::new(api, event_tx));

        Self {
            session,
            songs,
            event_rx,
            host,
            list_mounted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Announces the app to the host (when embedded) and loads the session.
    pub async fn start(&self) {
        if let HostContext::Embedded(_) = self.host.probe() {
            self.host.ready();
            self.host.expand();
        } else {
            info!("club_standalone_launch");
        }

        self.session.load_profile().await;
        self.sync_songs_with_session().await;
    }

    pub fn capabilities(&self) -> Capabilities {
        self.session
            .permissions()
            .map(|p| Capabilities {
                can_create: p.can_create_songs(),
                can_feature: p.can_feature_songs(),
                can_edit_any: p.can_edit_any_song(),
            })
            .unwrap_or_default()
    }

    /// The song list exists only while signed in: mount it on the first
    /// authenticated snapshot, drop it when the session goes away.
    async fn sync_songs_with_session(&self) {
        let authenticated = self.session.snapshot().is_authenticated();
        if authenticated && !self.list_mounted.swap(true, Ordering::SeqCst) {
            let _ = self.songs.refresh().await;
        } else if !authenticated && self.list_mounted.swap(false, Ordering::SeqCst) {
            self.songs.clear();
        }
    }

    pub async fn handle_intent(&self, intent: Intent) {
        match intent {
            Intent::LoadProfile => {
                self.session.load_profile().await;
                self.sync_songs_with_session().await;
            }
            Intent::Connect => {
                let _ = self.session.connect().await;
                self.sync_songs_with_session().await;
            }
            Intent::RequestLoginLink => {
                let user_id = self.session.best_known_user_id();
                let _ = self.session.request_login_link(user_id).await;
            }
            Intent::Logout => {
                let _ = self.session.logout().await;
                self.sync_songs_with_session().await;
            }
            Intent::SetQuery(query) => {
                let _ = self.songs.set_query(query).await;
            }
            Intent::SetIncludeFull(include) => self.songs.set_include_full(include),
            Intent::SetIncludeOpen(include) => self.songs.set_include_open(include),
            Intent::LoadMore => {
                let _ = self.songs.load_more().await;
            }
            Intent::Refresh => {
                let _ = self.songs.refresh().await;
            }
            Intent::Select(id) => self.songs.select_item(id).await,
            Intent::Host(signal) => {
                if self.list_mounted.load(Ordering::SeqCst) {
                    self.songs.on_host_signal(signal).await;
                }
            }
            Intent::CreateSong(draft) => {
                let _ = self.songs.create_song(draft).await;
            }
            Intent::UpdateSong(draft) => {
                if let Some(id) = self.selected_or_warn("update") {
                    let _ = self.songs.update_song(&id, draft).await;
                }
            }
            Intent::DeleteSong => {
                if let Some(id) = self.selected_or_warn("delete") {
                    let _ = self.songs.delete_song(&id).await;
                }
            }
            Intent::JoinRole(role) => {
                if let Some(id) = self.selected_or_warn("join_role") {
                    let _ = self.songs.join_role(&id, &role).await;
                }
            }
            Intent::LeaveRole(role) => {
                if let Some(id) = self.selected_or_warn("leave_role") {
                    let _ = self.songs.leave_role(&id, &role).await;
                }
            }
        }
    }

    fn selected_or_warn(&self, op: &'static str) -> Option<String> {
        let id = self.songs.selected_id();
        if id.is_none() {
            warn!(op, "club_intent_without_selection");
        }
        id
    }
}
