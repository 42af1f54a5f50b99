use crate::session::tokens::TokenPair;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub telegram_id: Option<i64>,
}

impl Profile {
    /// Accounts created outside the chat client have no Telegram identity yet.
    pub fn needs_platform_link(&self) -> bool {
        self.telegram_id.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SongPermissions {
    pub edit_own_songs: bool,
    pub edit_any_songs: bool,
    pub edit_featured_songs: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventPermissions {
    pub edit_events: bool,
    pub edit_tracklists: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionSet {
    pub songs: SongPermissions,
    pub events: EventPermissions,
}

impl PermissionSet {
    pub fn can_create_songs(&self) -> bool {
        self.songs.edit_own_songs || self.songs.edit_any_songs
    }

    pub fn can_edit_any_song(&self) -> bool {
        self.songs.edit_any_songs
    }

    pub fn can_feature_songs(&self) -> bool {
        self.songs.edit_featured_songs
    }
}

/// Profile and permissions always travel together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileData {
    pub profile: Profile,
    pub permissions: PermissionSet,
}

/// Tokens as the backend hands them out; either one may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuedTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl IssuedTokens {
    pub fn complete(self) -> Option<TokenPair> {
        match (self.access_token, self.refresh_token) {
            (Some(access_token), Some(refresh_token)) => Some(TokenPair {
                access_token,
                refresh_token,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSession {
    pub tokens: Option<IssuedTokens>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SongLinkKind {
    #[default]
    Generic,
    YouTube,
    YandexMusic,
    SoundCloud,
}

impl SongLinkKind {
    pub fn label(&self) -> &'static str {
        match self {
            SongLinkKind::Generic => "link",
            SongLinkKind::YouTube => "YouTube",
            SongLinkKind::YandexMusic => "Yandex Music",
            SongLinkKind::SoundCloud => "SoundCloud",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongLink {
    pub kind: SongLinkKind,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongSummary {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub thumbnail_url: Option<String>,
    pub link: Option<SongLink>,
    pub available_role_count: u32,
    pub assigned_role_count: u32,
    pub featured: bool,
    pub owner_id: String,
}

impl SongSummary {
    pub fn is_full(&self) -> bool {
        self.assigned_role_count >= self.available_role_count
    }

    pub fn role_count_label(&self) -> String {
        format!("{}/{}", self.assigned_role_count, self.available_role_count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub role: String,
    pub user_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongDetail {
    pub song: SongSummary,
    pub description: Option<String>,
    pub available_roles: Vec<String>,
    pub assignments: Vec<RoleAssignment>,
    pub permissions: PermissionSet,
}

impl SongDetail {
    pub fn can_edit(&self) -> bool {
        self.permissions.can_create_songs()
    }

    pub fn assignees<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a RoleAssignment> {
        self.assignments.iter().filter(move |a| a.role == role)
    }

    pub fn is_assigned(&self, user_id: &str, role: &str) -> bool {
        self.assignees(role).any(|a| a.user_id == user_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongPage {
    pub songs: Vec<SongSummary>,
    pub next_page_token: Option<String>,
}

impl SongPage {
    /// An empty token means the same as no token: the listing is exhausted.
    pub fn next_cursor(&self) -> Option<String> {
        self.next_page_token.clone().filter(|t| !t.is_empty())
    }
}

/// Payload for creating or replacing a song.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongDraft {
    pub title: String,
    pub artist: String,
    pub description: Option<String>,
    pub link: Option<SongLink>,
    pub thumbnail_url: Option<String>,
    pub available_roles: Vec<String>,
    pub featured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(assigned: u32, available: u32) -> SongSummary {
        SongSummary {
            assigned_role_count: assigned,
            available_role_count: available,
            ..SongSummary::default()
        }
    }

    #[test]
    fn fullness_counts_overbooked_songs_as_full() {
        assert!(song(2, 2).is_full());
        assert!(song(3, 2).is_full());
        assert!(!song(1, 3).is_full());
        assert!(song(0, 0).is_full());
        assert_eq!(song(1, 3).role_count_label(), "1/3");
    }

    #[test]
    fn issued_tokens_require_both_halves() {
        let partial = IssuedTokens {
            access_token: Some("a".to_string()),
            refresh_token: None,
        };
        assert!(partial.complete().is_none());

        let full = IssuedTokens {
            access_token: Some("a".to_string()),
            refresh_token: Some("r".to_string()),
        };
        let pair = full.complete().expect("complete pair");
        assert_eq!(pair.access_token, "a");
        assert_eq!(pair.refresh_token, "r");
    }

    #[test]
    fn empty_page_token_means_exhausted() {
        let page = SongPage {
            songs: vec![],
            next_page_token: Some(String::new()),
        };
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn song_capabilities_follow_permission_flags() {
        let mut perms = PermissionSet::default();
        assert!(!perms.can_create_songs());
        perms.songs.edit_own_songs = true;
        assert!(perms.can_create_songs());
        assert!(!perms.can_edit_any_song());
        assert!(!perms.can_feature_songs());
    }
}
