use crate::api::{
    RpcError,
    models::{SongDetail, SongSummary},
};

use super::{
    filter::{FilterState, apply_client_filter},
    visibility::VisibilityTracker,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Server order. Appended to by "load more", replaced by a reset.
    pub items: Vec<SongSummary>,
    pub next_page_token: Option<String>,
    pub is_loading: bool,
    pub is_fetching_more: bool,
    pub error: Option<RpcError>,
}

impl ListPage {
    pub fn has_next_page(&self) -> bool {
        self.next_page_token.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailState {
    pub selected_id: Option<String>,
    pub detail: Option<SongDetail>,
    pub is_loading: bool,
    pub error: Option<RpcError>,
}

impl DetailState {
    /// The detail worth showing: loaded, settled and matching the selection.
    pub fn open(&self) -> Option<&SongDetail> {
        if self.is_loading || self.error.is_some() {
            return None;
        }
        self.detail
            .as_ref()
            .filter(|d| self.selected_id.as_deref() == Some(d.song.id.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongListState {
    pub filter: FilterState,
    pub page: ListPage,
    pub detail: DetailState,
    pub mutation_error: Option<RpcError>,
}

impl SongListState {
    pub fn visible_items(&self) -> Vec<&SongSummary> {
        apply_client_filter(
            &self.page.items,
            self.filter.include_full,
            self.filter.include_open,
        )
    }
}

#[derive(Debug, Default)]
pub(crate) struct ListInner {
    pub view: SongListState,
    /// Bumped by every reset; page replies from an older epoch are dropped.
    pub epoch: u64,
    /// Bumped by every detail request and deselection.
    pub detail_seq: u64,
    pub visibility: VisibilityTracker,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: &str) -> SongDetail {
        SongDetail {
            song: SongSummary {
                id: id.to_string(),
                ..SongSummary::default()
            },
            ..SongDetail::default()
        }
    }

    #[test]
    fn open_detail_requires_matching_settled_selection() {
        let mut state = DetailState {
            selected_id: Some("a".to_string()),
            detail: Some(detail("a")),
            ..DetailState::default()
        };
        assert_eq!(state.open().map(|d| d.song.id.as_str()), Some("a"));

        state.is_loading = true;
        assert!(state.open().is_none());

        state.is_loading = false;
        state.selected_id = Some("b".to_string());
        assert!(state.open().is_none());
    }
}
