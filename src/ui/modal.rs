use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::Backend, buffer::Buffer, Terminal};
use tracing::debug;

use super::dialogs::{draw_preference_dialog, DialogOutcome, PreferenceDialog};
use super::theme::StyleRules;
use crate::error::PrefsError;

/// Runs a dialog until it closes, blocking the caller
pub trait DialogRunner {
    fn exec(&mut self, dialog: PreferenceDialog) -> Result<DialogOutcome, PrefsError>;
}

/// Shows the dialog on the terminal over a frozen copy of the host screen
pub struct TerminalDialogRunner<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    background: Buffer,
    style: StyleRules,
}

impl<'a, B: Backend> TerminalDialogRunner<'a, B> {
    /// `background` is the last frame the host drew; `style` is the installed style
    pub fn new(terminal: &'a mut Terminal<B>, background: Buffer, style: StyleRules) -> Self {
        Self {
            terminal,
            background,
            style,
        }
    }
}

impl<B: Backend> DialogRunner for TerminalDialogRunner<'_, B> {
    fn exec(&mut self, mut dialog: PreferenceDialog) -> Result<DialogOutcome, PrefsError> {
        debug!("Preferences dialog opened");
        loop {
            self.terminal.draw(|frame| {
                let area = frame.area();
                // Stale after a resize; the dialog is drawn on a cleared screen then
                if self.background.area == area {
                    frame.buffer_mut().merge(&self.background);
                }
                draw_preference_dialog(frame, &dialog, area, &self.style);
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(outcome) = dialog.handle_key(key.code) {
                    return Ok(outcome);
                }
            }
        }
    }
}

/// Feeds a fixed key sequence to the dialog
#[cfg(test)]
pub struct KeyScriptRunner {
    keys: std::collections::VecDeque<crossterm::event::KeyCode>,
}

#[cfg(test)]
impl KeyScriptRunner {
    pub fn new(keys: Vec<crossterm::event::KeyCode>) -> Self {
        Self { keys: keys.into() }
    }
}

#[cfg(test)]
impl DialogRunner for KeyScriptRunner {
    fn exec(&mut self, mut dialog: PreferenceDialog) -> Result<DialogOutcome, PrefsError> {
        while let Some(code) = self.keys.pop_front() {
            if let Some(outcome) = dialog.handle_key(code) {
                return Ok(outcome);
            }
        }
        panic!("key script ended before the dialog closed");
    }
}
