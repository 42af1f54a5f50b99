use std::sync::{Arc, PoisonError, RwLock};

use flume::Sender;
use tracing::{debug, info, warn};

use crate::{
    api::{
        ClubApi, RpcError,
        models::{SongDetail, SongDraft},
    },
    event::Event,
};

use super::{
    state::{DetailState, ListInner, SongListState},
    visibility::HostSignal,
};

struct PageRequest {
    epoch: u64,
    query: String,
    cursor: Option<String>,
}

/// Cursor-paginated song list with an on-demand detail view.
///
/// Replies that arrive after the state moved on (a newer reset, a different
/// selection) are dropped instead of committed.
pub struct SongList {
    api: Arc<dyn ClubApi>,
    state: RwLock<ListInner>,
    event_tx: Sender<Event>,
}

impl SongList {
    pub fn new(api: Arc<dyn ClubApi>, event_tx: Sender<Event>) -> Self {
        Self {
            api,
            state: RwLock::new(ListInner::default()),
            event_tx,
        }
    }

    pub fn snapshot(&self) -> SongListState {
        self.read(|s| s.view.clone())
    }

    fn read<R>(&self, f: impl FnOnce(&ListInner) -> R) -> R {
        f(&*self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn update<R>(&self, event: Event, f: impl FnOnce(&mut ListInner) -> R) -> R {
        let out = f(&mut *self.state.write().unwrap_or_else(PoisonError::into_inner));
        let _ = self.event_tx.send(event);
        out
    }

    /// Like `update`, but `None` means nothing changed and no event is sent.
    fn try_update<R>(
        &self,
        event: Event,
        f: impl FnOnce(&mut ListInner) -> Option<R>,
    ) -> Option<R> {
        let out = f(&mut *self.state.write().unwrap_or_else(PoisonError::into_inner));
        if out.is_some() {
            let _ = self.event_tx.send(event);
        }
        out
    }

    /// Changes the server-side query. Always a full reset: old cursors are meaningless
    /// under a new query.
    pub async fn set_query(&self, text: impl Into<String>) -> Result<(), RpcError> {
        let text = text.into();
        self.update(Event::SongsChanged, |s| s.view.filter.query = text);
        self.fetch_page(true).await
    }

    pub fn set_include_full(&self, include: bool) {
        self.update(Event::SongsChanged, |s| s.view.filter.include_full = include);
    }

    pub fn set_include_open(&self, include: bool) {
        self.update(Event::SongsChanged, |s| s.view.filter.include_open = include);
    }

    pub async fn refresh(&self) -> Result<(), RpcError> {
        self.fetch_page(true).await
    }

    pub async fn load_more(&self) -> Result<(), RpcError> {
        self.fetch_page(false).await
    }

    /// Requests the first page (`reset`) or the page after the last known cursor.
    ///
    /// An append is skipped when the list is exhausted or another append is still
    /// running. On failure the loaded items stay as they are.
    pub async fn fetch_page(&self, reset: bool) -> Result<(), RpcError> {
        let request = self.try_update(Event::SongsChanged, |s| {
            let page = &mut s.view.page;
            let cursor = if reset {
                s.epoch += 1;
                page.next_page_token = None;
                page.is_loading = true;
                page.is_fetching_more = false;
                None
            } else {
                if page.is_fetching_more {
                    return None;
                }
                let cursor = page.next_page_token.clone()?;
                page.is_fetching_more = true;
                Some(cursor)
            };
            page.error = None;
            Some(PageRequest {
                epoch: s.epoch,
                query: s.view.filter.query.clone(),
                cursor,
            })
        });
        let Some(request) = request else {
            debug!("song_page_skipped");
            return Ok(());
        };

        let result = self
            .api
            .list_songs(&request.query, request.cursor.as_deref().unwrap_or(""))
            .await;

        self.try_update(Event::SongsChanged, |s| {
            if s.epoch != request.epoch {
                debug!(epoch = request.epoch, current = s.epoch, "song_page_discarded");
                return None;
            }
            let page = &mut s.view.page;
            page.is_loading = false;
            page.is_fetching_more = false;
            match result {
                Ok(res) => {
                    page.next_page_token = res.next_cursor();
                    if reset {
                        page.items = res.songs;
                    } else {
                        page.items.extend(res.songs);
                    }
                    debug!(
                        items = page.items.len(),
                        exhausted = page.next_page_token.is_none(),
                        "song_page_loaded"
                    );
                    Some(Ok(()))
                }
                Err(err) => {
                    warn!(code = err.code.as_str(), "song_page_failed: {}", err);
                    page.error = Some(err.clone());
                    Some(Err(err))
                }
            }
        })
        .unwrap_or(Ok(()))
    }

    /// Feeds a host lifecycle signal; returns true if it triggered a refresh.
    pub async fn on_host_signal(&self, signal: HostSignal) -> bool {
        let refresh = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.visibility.observe(signal)
        };
        if refresh {
            info!("song_list_foreground_refresh");
            let _ = self.fetch_page(true).await;
        }
        refresh
    }

    /// Opens the detail for `id`, or closes it without a network call for `None`.
    pub async fn select_item(&self, id: Option<String>) {
        match id {
            None => self.update(Event::SongDetailChanged, |s| {
                s.detail_seq += 1;
                s.view.detail = DetailState::default();
            }),
            Some(id) => {
                self.update(Event::SongDetailChanged, |s| {
                    let detail = &mut s.view.detail;
                    if detail.selected_id.as_deref() != Some(id.as_str()) {
                        detail.detail = None;
                    }
                    detail.selected_id = Some(id.clone());
                });
                let _ = self.fetch_detail(id).await;
            }
        }
    }

    /// Reloads the currently selected song's detail, if any.
    pub async fn refresh_detail(&self) -> Result<(), RpcError> {
        match self.selected_id() {
            Some(id) => self.fetch_detail(id).await,
            None => Ok(()),
        }
    }

    pub fn selected_id(&self) -> Option<String> {
        self.read(|s| s.view.detail.selected_id.clone())
    }

    async fn fetch_detail(&self, id: String) -> Result<(), RpcError> {
        let seq = self.update(Event::SongDetailChanged, |s| {
            s.detail_seq += 1;
            s.view.detail.is_loading = true;
            s.view.detail.error = None;
            s.detail_seq
        });

        let result = self.api.fetch_song_detail(&id).await;

        self.try_update(Event::SongDetailChanged, |s| {
            let current = s.view.detail.selected_id.as_deref() == Some(id.as_str());
            if s.detail_seq != seq || !current {
                debug!(song_id = id.as_str(), "song_detail_discarded");
                return None;
            }
            let detail = &mut s.view.detail;
            detail.is_loading = false;
            match result {
                Ok(loaded) => {
                    debug!(song_id = id.as_str(), "song_detail_loaded");
                    detail.detail = Some(loaded);
                    Some(Ok(()))
                }
                Err(err) => {
                    warn!(song_id = id.as_str(), code = err.code.as_str(), "song_detail_failed: {}", err);
                    detail.detail = None;
                    detail.error = Some(err.clone());
                    Some(Err(err))
                }
            }
        })
        .unwrap_or(Ok(()))
    }

    pub async fn create_song(&self, draft: SongDraft) -> Result<SongDetail, RpcError> {
        let result = self.api.create_song(draft).await;
        self.after_mutation("create", None, result).await
    }

    pub async fn update_song(&self, id: &str, draft: SongDraft) -> Result<SongDetail, RpcError> {
        let result = self.api.update_song(id, draft).await;
        self.after_mutation("update", Some(id), result).await
    }

    pub async fn join_role(&self, song_id: &str, role: &str) -> Result<SongDetail, RpcError> {
        let result = self.api.join_role(song_id, role).await;
        self.after_mutation("join_role", Some(song_id), result).await
    }

    pub async fn leave_role(&self, song_id: &str, role: &str) -> Result<SongDetail, RpcError> {
        let result = self.api.leave_role(song_id, role).await;
        self.after_mutation("leave_role", Some(song_id), result).await
    }

    pub async fn delete_song(&self, id: &str) -> Result<(), RpcError> {
        let result = self.api.delete_song(id).await;
        if result.is_ok() && self.selected_id().as_deref() == Some(id) {
            self.select_item(None).await;
        }
        self.after_mutation("delete", None, result).await
    }

    /// Writes are never patched in locally: on success the open detail (when it is the
    /// affected song) and then the whole list are reloaded from the server.
    async fn after_mutation<T: Send>(
        &self,
        op: &'static str,
        song_id: Option<&str>,
        result: Result<T, RpcError>,
    ) -> Result<T, RpcError> {
        match result {
            Ok(value) => {
                info!(op, "song_mutation_applied");
                self.update(Event::SongsChanged, |s| s.view.mutation_error = None);
                if let Some(id) = song_id {
                    if self.selected_id().as_deref() == Some(id) {
                        let _ = self.fetch_detail(id.to_string()).await;
                    }
                }
                let _ = self.fetch_page(true).await;
                Ok(value)
            }
            Err(err) => {
                warn!(op, code = err.code.as_str(), "song_mutation_failed: {}", err);
                self.update(Event::SongsChanged, |s| s.view.mutation_error = Some(err.clone()));
                Err(err)
            }
        }
    }

    /// Forgets everything, e.g. after sign-out. In-flight replies are dropped.
    pub fn clear(&self) {
        self.update(Event::SongsChanged, |s| {
            s.epoch += 1;
            s.detail_seq += 1;
            s.view = SongListState::default();
        });
    }
}
