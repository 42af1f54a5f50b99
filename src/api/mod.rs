pub mod error;
#[cfg(test)]
pub mod fake;
pub mod models;

use async_trait::async_trait;

pub use error::{RpcCode, RpcError};
use models::{HostSession, ProfileData, SongDetail, SongDraft, SongPage};

/// Remote procedure calls exposed by the club backend.
///
/// The transport behind it (and any token refresh or timeout policy) belongs to the
/// implementor. Every call either yields its payload or an [`RpcError`].
#[async_trait]
pub trait ClubApi: Send + Sync {
    async fn fetch_profile(&self) -> Result<ProfileData, RpcError>;

    async fn exchange_host_identity(&self, init_data: &str) -> Result<HostSession, RpcError>;

    /// Returns the login link, which may be empty.
    async fn request_login_link(&self, user_id: Option<&str>) -> Result<String, RpcError>;

    async fn logout(&self) -> Result<(), RpcError>;

    /// An empty `page_token` requests the first page.
    async fn list_songs(&self, query: &str, page_token: &str) -> Result<SongPage, RpcError>;

    async fn fetch_song_detail(&self, id: &str) -> Result<SongDetail, RpcError>;

    async fn create_song(&self, draft: SongDraft) -> Result<SongDetail, RpcError>;

    async fn update_song(&self, id: &str, draft: SongDraft) -> Result<SongDetail, RpcError>;

    async fn delete_song(&self, id: &str) -> Result<(), RpcError>;

    async fn join_role(&self, song_id: &str, role: &str) -> Result<SongDetail, RpcError>;

    async fn leave_role(&self, song_id: &str, role: &str) -> Result<SongDetail, RpcError>;
}
