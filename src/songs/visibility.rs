/// Lifecycle signals forwarded from the host window or terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    Hidden,
    Visible,
    FocusLost,
    FocusGained,
}

/// Arms on a genuine hide and fires once on the next return to the foreground.
/// Focus churn while visible never arms it.
#[derive(Debug, Default)]
pub struct VisibilityTracker {
    was_hidden: bool,
}

impl VisibilityTracker {
    /// Returns true when the signal should trigger a refresh.
    pub fn observe(&mut self, signal: HostSignal) -> bool {
        match signal {
            HostSignal::Hidden => {
                self.was_hidden = true;
                false
            }
            HostSignal::FocusLost => false,
            HostSignal::Visible | HostSignal::FocusGained => std::mem::take(&mut self.was_hidden),
        }
    }
}
