use crate::api::models::SongSummary;

/// Local-only filter settings. Changing `query` goes through the server, the two
/// flags never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub include_full: bool,
    pub include_open: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            include_full: true,
            include_open: true,
        }
    }
}

pub fn apply_client_filter(
    items: &[SongSummary],
    include_full: bool,
    include_open: bool,
) -> Vec<&SongSummary> {
    if include_full && include_open {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|song| {
            let full = song.is_full();
            (include_full && full) || (include_open && !full)
        })
        .collect()
}
