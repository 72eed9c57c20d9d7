//! Entry surface: the floating button or popup that reveals the chat panel.

use pagechat_common::EntryPoint;

use crate::coordinator::SessionState;

/// Enabled state of the question input and its submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub input_enabled: bool,
    pub submit_enabled: bool,
}

impl Controls {
    /// Enabled only when the session is ready and no answer is pending.
    pub fn for_state(state: &SessionState, chat_pending: bool) -> Self {
        let enabled = state.is_ready() && !chat_pending;
        Self {
            input_enabled: enabled,
            submit_enabled: enabled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntrySurface {
    entry: EntryPoint,
    panel_open: bool,
}

impl EntrySurface {
    pub fn new(entry: EntryPoint) -> Self {
        Self {
            entry,
            panel_open: false,
        }
    }

    /// Button embedded in the page; the panel starts closed.
    pub fn floating() -> Self {
        Self::new(EntryPoint::Floating)
    }

    /// Detached popup; opened by the caller as soon as it exists.
    pub fn popup() -> Self {
        Self::new(EntryPoint::Popup)
    }

    pub fn entry(&self) -> EntryPoint {
        self.entry
    }

    /// Show the panel. Returns whether indexing should be started.
    ///
    /// Indexing is wanted while the session has none running or done:
    /// `Idle` on first reveal, `Failed` when the user re-opens to retry.
    pub fn reveal(&mut self, state: &SessionState) -> bool {
        self.panel_open = true;
        matches!(state, SessionState::Idle | SessionState::Failed(_))
    }

    pub fn hide(&mut self) {
        self.panel_open = false;
    }

    /// Flip panel visibility. Returns whether indexing should be started.
    pub fn toggle(&mut self, state: &SessionState) -> bool {
        if self.panel_open {
            self.hide();
            false
        } else {
            self.reveal(state)
        }
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// The floating button hides while its panel is open; a popup has none.
    pub fn is_button_visible(&self) -> bool {
        self.entry == EntryPoint::Floating && !self.panel_open
    }

    pub fn controls(&self, state: &SessionState, chat_pending: bool) -> Controls {
        Controls::for_state(state, chat_pending)
    }
}
