/// Notifications published to the presentation layer.
///
/// State changes carry no payload; subscribers pull a fresh snapshot from the
/// controller that emitted them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SessionChanged,
    SongsChanged,
    SongDetailChanged,

    // Side effects
    OpenLink(String),
}
