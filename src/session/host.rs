use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

/// Opaque identity proof handed over by the chat client that embeds the app.
#[derive(Clone, PartialEq, Eq)]
pub struct InitData(String);

impl InitData {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// The blob is a credential; keep it out of logs.
impl fmt::Debug for InitData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InitData({} bytes)", self.0.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostContext {
    Embedded(InitData),
    Standalone,
}

impl HostContext {
    pub fn init_data(&self) -> Option<&InitData> {
        match self {
            HostContext::Embedded(data) => Some(data),
            HostContext::Standalone => None,
        }
    }
}

/// Capability probe for the embedding chat client.
pub trait HostBridge: Send + Sync {
    fn probe(&self) -> HostContext;
    fn ready(&self);
    fn expand(&self);
}

/// Host whose identity blob was handed over at launch (argument, env or config).
pub struct LaunchHost {
    init_data: Option<InitData>,
    ready: AtomicBool,
    expanded: AtomicBool,
}

impl LaunchHost {
    pub fn new(init_data: Option<String>) -> Self {
        Self {
            init_data: init_data.and_then(InitData::new),
            ready: AtomicBool::new(false),
            expanded: AtomicBool::new(false),
        }
    }

    pub fn standalone() -> Self {
        Self::new(None)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.load(Ordering::Relaxed)
    }
}

impl HostBridge for LaunchHost {
    fn probe(&self) -> HostContext {
        match &self.init_data {
            Some(data) => HostContext::Embedded(data.clone()),
            None => HostContext::Standalone,
        }
    }

    fn ready(&self) {
        if !self.ready.swap(true, Ordering::Relaxed) {
            info!("host_ready");
        }
    }

    fn expand(&self) {
        if !self.expanded.swap(true, Ordering::Relaxed) {
            info!("host_expanded");
        }
    }
}
