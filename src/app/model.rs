//! UI-only state: the path prompt, the error popup and the tone sliders.
//!
//! Playback state lives in the transport; `App` holds what exists only
//! because there is a screen.

use std::path::PathBuf;

/// Lowest and highest value of the bass and treble sliders.
pub const TONE_MIN: i8 = -12;
pub const TONE_MAX: i8 = 12;

/// What a submitted path prompt adds to the playlist.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PromptKind {
    File,
    Folder,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::File => " open file (enter adds, esc cancels) ",
            PromptKind::Folder => " open folder (enter adds, esc cancels) ",
        }
    }
}

/// A one-line text input for a file or folder path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPrompt {
    pub kind: PromptKind,
    pub buffer: String,
}

impl PathPrompt {
    /// The typed path, with a leading `~` expanded. `None` when blank.
    pub fn path(&self) -> Option<PathBuf> {
        let text = self.buffer.trim();
        if text.is_empty() {
            return None;
        }
        // Pasted paths often arrive quoted.
        let text = text
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .or_else(|| text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')))
            .unwrap_or(text);

        match text.strip_prefix("~/") {
            Some(rest) => std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(rest))
                .or_else(|| Some(PathBuf::from(text))),
            None => Some(PathBuf::from(text)),
        }
    }
}

/// Bass and treble, shown as sliders. They do not touch the audio.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ToneControls {
    pub bass: i8,
    pub treble: i8,
}

impl ToneControls {
    pub fn adjust_bass(&mut self, delta: i8) {
        self.bass = self.bass.saturating_add(delta).clamp(TONE_MIN, TONE_MAX);
    }

    pub fn adjust_treble(&mut self, delta: i8) {
        self.treble = self.treble.saturating_add(delta).clamp(TONE_MIN, TONE_MAX);
    }
}

/// The main UI model.
#[derive(Debug, Default)]
pub struct App {
    prompt: Option<PathPrompt>,
    error: Option<String>,
    /// Last informational message, shown in the status line.
    pub status: Option<String>,
    pub tone: ToneControls,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> Option<&PathPrompt> {
        self.prompt.as_ref()
    }

    /// Open an empty prompt, replacing any prompt already open.
    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(PathPrompt {
            kind,
            buffer: String::new(),
        });
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.buffer.push(c);
        }
    }

    pub fn push_prompt_str(&mut self, text: &str) {
        if let Some(prompt) = self.prompt.as_mut() {
            // Pastes may carry a trailing newline.
            prompt.buffer.push_str(text.trim_end_matches(['\r', '\n']));
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.buffer.pop();
        }
    }

    /// Close the prompt and return what was typed into it.
    pub fn take_prompt(&mut self) -> Option<(PromptKind, PathBuf)> {
        let prompt = self.prompt.take()?;
        prompt.path().map(|path| (prompt.kind, path))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }
}
