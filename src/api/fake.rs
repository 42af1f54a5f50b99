//! Scripted backend used by the controller tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{
    ClubApi, RpcError,
    models::{HostSession, ProfileData, SongDetail, SongDraft, SongPage},
};

enum Reply<T> {
    Now(T),
    Held(oneshot::Receiver<T>),
}

/// Queue of replies for one remote operation, consumed in call order.
pub struct Script<T> {
    replies: Mutex<VecDeque<Reply<T>>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
        }
    }
}

impl<T: Send> Script<T> {
    pub fn push(&self, value: T) {
        self.replies.lock().unwrap().push_back(Reply::Now(value));
    }

    /// Queues a reply that only resolves once the returned sender fires.
    pub fn hold(&self) -> oneshot::Sender<T> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply::Held(rx));
        tx
    }

    async fn next(&self, op: &str) -> T {
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Now(value)) => value,
            Some(Reply::Held(rx)) => rx.await.expect("held reply dropped"),
            None => panic!("unscripted call to {op}"),
        }
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub profile: Script<Result<ProfileData, RpcError>>,
    pub exchange: Script<Result<HostSession, RpcError>>,
    pub login_link: Script<Result<String, RpcError>>,
    pub logout: Script<Result<(), RpcError>>,
    pub list: Script<Result<SongPage, RpcError>>,
    pub detail: Script<Result<SongDetail, RpcError>>,
    pub create: Script<Result<SongDetail, RpcError>>,
    pub update: Script<Result<SongDetail, RpcError>>,
    pub delete: Script<Result<(), RpcError>>,
    pub join: Script<Result<SongDetail, RpcError>>,
    pub leave: Script<Result<SongDetail, RpcError>>,

    pub log: Mutex<Vec<&'static str>>,
    pub profile_calls: Mutex<usize>,
    pub exchange_calls: Mutex<Vec<String>>,
    pub link_calls: Mutex<Vec<Option<String>>>,
    pub list_calls: Mutex<Vec<(String, String)>>,
    pub detail_calls: Mutex<Vec<String>>,
}

impl FakeApi {
    async fn reply<T: Send>(&self, script: &Script<T>, op: &'static str) -> T {
        self.log.lock().unwrap().push(op);
        script.next(op).await
    }

    /// Operation names in call order.
    pub fn log(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }

    pub fn profile_calls(&self) -> usize {
        *self.profile_calls.lock().unwrap()
    }

    pub fn exchange_calls(&self) -> Vec<String> {
        self.exchange_calls.lock().unwrap().clone()
    }

    pub fn link_calls(&self) -> Vec<Option<String>> {
        self.link_calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<(String, String)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClubApi for FakeApi {
    async fn fetch_profile(&self) -> Result<ProfileData, RpcError> {
        *self.profile_calls.lock().unwrap() += 1;
        self.reply(&self.profile, "fetch_profile").await
    }

    async fn exchange_host_identity(&self, init_data: &str) -> Result<HostSession, RpcError> {
        self.exchange_calls.lock().unwrap().push(init_data.to_string());
        self.reply(&self.exchange, "exchange_host_identity").await
    }

    async fn request_login_link(&self, user_id: Option<&str>) -> Result<String, RpcError> {
        self.link_calls
            .lock()
            .unwrap()
            .push(user_id.map(str::to_string));
        self.reply(&self.login_link, "request_login_link").await
    }

    async fn logout(&self) -> Result<(), RpcError> {
        self.reply(&self.logout, "logout").await
    }

    async fn list_songs(&self, query: &str, page_token: &str) -> Result<SongPage, RpcError> {
        self.list_calls
            .lock()
            .unwrap()
            .push((query.to_string(), page_token.to_string()));
        self.reply(&self.list, "list_songs").await
    }

    async fn fetch_song_detail(&self, id: &str) -> Result<SongDetail, RpcError> {
        self.detail_calls.lock().unwrap().push(id.to_string());
        self.reply(&self.detail, "fetch_song_detail").await
    }

    async fn create_song(&self, _draft: SongDraft) -> Result<SongDetail, RpcError> {
        self.reply(&self.create, "create_song").await
    }

    async fn update_song(&self, _id: &str, _draft: SongDraft) -> Result<SongDetail, RpcError> {
        self.reply(&self.update, "update_song").await
    }

    async fn delete_song(&self, _id: &str) -> Result<(), RpcError> {
        self.reply(&self.delete, "delete_song").await
    }

    async fn join_role(&self, _song_id: &str, _role: &str) -> Result<SongDetail, RpcError> {
        self.reply(&self.join, "join_role").await
    }

    async fn leave_role(&self, _song_id: &str, _role: &str) -> Result<SongDetail, RpcError> {
        self.reply(&self.leave, "leave_role").await
    }
}

/// Lets spawned tasks run until they park on a held reply.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
