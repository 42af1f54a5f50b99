use std::sync::Arc;

use arc_swap::ArcSwapOption;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Holds the credentials the transport attaches to outgoing calls.
///
/// The session controller is the only writer.
pub trait TokenStore: Send + Sync {
    fn set_pair(&self, pair: TokenPair);
    fn pair(&self) -> Option<Arc<TokenPair>>;
    fn clear(&self);

    fn access_token(&self) -> Option<String> {
        self.pair().map(|p| p.access_token.clone())
    }
}

/// Process-memory store; nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    pair: ArcSwapOption<TokenPair>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn set_pair(&self, pair: TokenPair) {
        self.pair.store(Some(Arc::new(pair)));
    }

    fn pair(&self) -> Option<Arc<TokenPair>> {
        self.pair.load_full()
    }

    fn clear(&self) {
        self.pair.store(None);
    }
}
