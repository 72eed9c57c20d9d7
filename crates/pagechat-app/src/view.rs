//! Terminal projection of a page context.

use std::io::{self, Write};

use pagechat_session::{Conversation, ConversationUpdate, PageContext};

/// Writes status changes and conversation updates as plain lines.
pub struct TerminalView<W: Write> {
    out: W,
    last_status: Option<String>,
    last_input_enabled: Option<bool>,
    last_panel_open: Option<bool>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_status: None,
            last_input_enabled: None,
            last_panel_open: None,
        }
    }

    /// Print whatever changed since the previous refresh.
    pub fn refresh(&mut self, ctx: &mut PageContext) -> io::Result<()> {
        let panel_open = ctx.surface().is_panel_open();
        if self.last_panel_open != Some(panel_open) {
            let line = if panel_open { "panel opened" } else { "panel closed" };
            writeln!(self.out, "[{line}]")?;
            self.last_panel_open = Some(panel_open);
        }

        let status = ctx.status_text();
        if self.last_status.as_deref() != Some(status.as_str()) {
            writeln!(self.out, "[status] {status}")?;
            self.last_status = Some(status);
        }

        for update in ctx.drain_updates() {
            let index = match update {
                ConversationUpdate::Appended(i) | ConversationUpdate::Replaced(i) => i,
            };
            if let Some(message) = ctx.conversation().get(index) {
                writeln!(self.out, "{}", Conversation::render_message(message))?;
            }
        }

        let input_enabled = ctx.controls().input_enabled;
        if self.last_input_enabled != Some(input_enabled) {
            let line = if input_enabled {
                "input enabled"
            } else {
                "input disabled"
            };
            writeln!(self.out, "[{line}]")?;
            self.last_input_enabled = Some(input_enabled);
        }

        self.out.flush()
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "[notice] {text}")?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
