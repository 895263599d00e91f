//! Host editor seam.
//!
//! The session only needs two things from an editor: the active document's
//! version and a way to run the native undo. [`TextBuffer`] and
//! [`ScratchEditor`] provide an in-memory host for the CLI and for tests.

use crate::error::EditorError;

/// A document whose version changes whenever its content does.
pub trait Document {
    fn version(&self) -> u64;

    /// Run the editor's native undo. A no-op when history is exhausted.
    fn undo(&mut self) -> Result<(), EditorError>;
}

/// Whatever owns the documents, e.g. an editor window.
pub trait EditorHost {
    /// The focused document, if any.
    fn active_document(&mut self) -> Option<&mut dyn Document>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    Insert { at: usize, text: String },
    Delete { at: usize, text: String },
}

/// Plain-text document with a linear undo history.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    history: Vec<Edit>,
    version: u64,
    read_only: bool,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer with `edits` single-line insertions already in its history.
    pub fn with_history(edits: usize) -> Self {
        let mut buffer = Self::new();
        for i in 0..edits {
            buffer.insert(&format!("line {}\n", i + 1));
        }
        buffer
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Append `text` as one undoable edit.
    pub fn insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = self.text.len();
        self.text.push_str(text);
        self.history.push(Edit::Insert {
            at,
            text: text.to_string(),
        });
        self.version += 1;
    }

    /// Remove up to `chars` characters from the end as one undoable edit.
    pub fn delete_back(&mut self, chars: usize) {
        let at = self
            .text
            .char_indices()
            .rev()
            .nth(chars.saturating_sub(1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        if chars == 0 || at == self.text.len() {
            return;
        }
        let removed = self.text.split_off(at);
        self.history.push(Edit::Delete { at, text: removed });
        self.version += 1;
    }
}

impl Document for TextBuffer {
    fn version(&self) -> u64 {
        self.version
    }

    fn undo(&mut self) -> Result<(), EditorError> {
        if self.read_only {
            return Err(EditorError("document is read-only".into()));
        }
        let Some(edit) = self.history.pop() else {
            return Ok(());
        };
        match edit {
            Edit::Insert { at, .. } => self.text.truncate(at),
            Edit::Delete { at, text } => self.text.insert_str(at, &text),
        }
        self.version += 1;
        Ok(())
    }
}

/// Editor with at most one open buffer.
#[derive(Debug, Clone, Default)]
pub struct ScratchEditor {
    buffer: Option<TextBuffer>,
}

impl ScratchEditor {
    pub fn new(buffer: Option<TextBuffer>) -> Self {
        Self { buffer }
    }

    pub fn buffer(&self) -> Option<&TextBuffer> {
        self.buffer.as_ref()
    }

    pub fn buffer_mut(&mut self) -> Option<&mut TextBuffer> {
        self.buffer.as_mut()
    }

    pub fn close(&mut self) -> Option<TextBuffer> {
        self.buffer.take()
    }
}

impl EditorHost for ScratchEditor {
    fn active_document(&mut self) -> Option<&mut dyn Document> {
        self.buffer.as_mut().map(|b| b as &mut dyn Document)
    }
}
