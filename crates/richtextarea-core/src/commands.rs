//! Command Interface Layer
//!
//! Wraps the offset mapper, range-edit engine, and history manager behind a
//! unified command pattern so a host binding drives the engine through one
//! entry point.
//!
//! # Overview
//!
//! Commands come in two families:
//!
//! - **Edit commands**: insert text, add an emoji, toggle bold, backspace,
//!   forward delete, replace the whole content, undo, redo
//! - **Cursor commands**: set or collapse the selection, place the caret
//!   from an image click
//!
//! Every edit is atomic: it either produces the new document and selection
//! or fails leaving both untouched. Successful edits record a history
//! snapshot; the timestamp is an explicit argument so debouncing stays
//! deterministic.
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use richtextarea_core::{Command, CommandExecutor, EditCommand};
//!
//! let mut executor = CommandExecutor::new();
//! executor
//!     .execute(
//!         Command::Edit(EditCommand::InsertText {
//!             text: "Hello!".to_string(),
//!         }),
//!         Instant::now(),
//!     )
//!     .unwrap();
//! assert_eq!(executor.value(), "Hello!");
//! ```

use std::time::Instant;

use richtextarea_emoji::EmojiCatalog;

use crate::edit::{
    ClickHalf, caret_for_image_click, delete_backward, delete_forward, insert, insert_fragment,
    toggle_bold,
};
use crate::emoji::EmojiResolver;
use crate::history::{History, Snapshot};
use crate::markup::{self, MarkupError};
use crate::offset::snap;
use crate::sanitize::{PlainTextSanitizer, Sanitizer};
use crate::segment::{Document, Segment};
use crate::selection::{Selection, is_in_bold};

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Replace the selection with unprocessed text (typing or paste).
    InsertText {
        /// Text to run through the sanitize/expand pipeline.
        text: String,
    },
    /// Replace the selection with one emoji image placeholder.
    AddEmoji {
        /// The emoji sequence to insert.
        emoji: String,
    },
    /// Toggle bold over the current selection.
    ToggleBold,
    /// Delete one unit before the caret, or the selection.
    Backspace,
    /// Delete one unit after the caret, or the selection.
    DeleteForward,
    /// Replace the whole content through the insert pipeline.
    SetContent {
        /// The new unprocessed text value.
        text: String,
    },
    /// Restore the previous history snapshot.
    Undo,
    /// Restore the next history snapshot.
    Redo,
}

/// Cursor and selection commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorCommand {
    /// Set the selection; endpoints are snapped and sorted.
    SetSelection {
        /// Anchor offset.
        start: usize,
        /// Focus offset.
        end: usize,
    },
    /// Collapse the selection to a caret.
    Collapse {
        /// Target caret offset.
        offset: usize,
    },
    /// Place the caret from a pointer click on an image placeholder.
    ClickImage {
        /// Child-index path of the clicked image.
        path: Vec<usize>,
        /// Which half of the image was hit.
        half: ClickHalf,
    },
}

/// All commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text editing commands
    Edit(EditCommand),
    /// Cursor commands
    Cursor(CursorCommand),
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, no return value
    Success,
    /// Success, returns the resulting selection
    Selection {
        /// The selection after the command.
        selection: Selection,
        /// Whether that selection is bold.
        is_in_bold: bool,
    },
}

/// Command error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The input is disabled and rejects edits
    Disabled,
    /// The emoji resolver does not recognize the sequence
    UnknownEmoji(String),
    /// No image placeholder at the given path
    ImageNotFound {
        /// The path that failed to resolve.
        path: Vec<usize>,
    },
    /// A history snapshot failed to parse
    Snapshot(MarkupError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Disabled => {
                write!(f, "the input is disabled")
            }
            CommandError::UnknownEmoji(emoji) => {
                write!(f, "unrecognized emoji sequence: {:?}", emoji)
            }
            CommandError::ImageNotFound { path } => {
                write!(f, "no image placeholder at path {:?}", path)
            }
            CommandError::Snapshot(err) => {
                write!(f, "history snapshot is not valid markup: {}", err)
            }
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Snapshot(err) => Some(err),
            _ => None,
        }
    }
}

/// Command executor: document, selection, and history behind one dispatch.
pub struct CommandExecutor {
    /// The document
    doc: Document,
    /// Current selection over logical offsets
    selection: Selection,
    /// Undo history
    history: History,
    /// Input sanitizer for unprocessed text
    sanitizer: Box<dyn Sanitizer + Send>,
    /// Emoji resolver for the insert pipeline
    resolver: Box<dyn EmojiResolver + Send>,
    /// Command history
    command_history: Vec<Command>,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    /// Create an executor with the default sanitizer and emoji catalog.
    pub fn new() -> Self {
        Self::with_components(
            Box::new(PlainTextSanitizer),
            Box::new(EmojiCatalog::default()),
        )
    }

    /// Create an executor with custom sanitizer and emoji resolver.
    pub fn with_components(
        sanitizer: Box<dyn Sanitizer + Send>,
        resolver: Box<dyn EmojiResolver + Send>,
    ) -> Self {
        let mut history = History::new();
        // The initial snapshot makes the empty state reachable by undo.
        history.record(Snapshot::new(String::new(), (0, 0)), Instant::now(), true);
        Self {
            doc: Document::new(),
            selection: Selection::caret(0),
            history,
            sanitizer,
            resolver,
            command_history: Vec::new(),
        }
    }

    /// The current document.
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// The current selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Replace the selection, snapping and sorting the endpoints.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Selection::new(
            snap(&self.doc, selection.start),
            snap(&self.doc, selection.end),
        );
    }

    /// The host-facing value: plain text with emoji alt text, newlines, and
    /// `<b>…</b>` bold markers.
    pub fn value(&self) -> String {
        self.doc.pure_text()
    }

    /// The serialized markup of the document.
    pub fn markup(&self) -> String {
        markup::serialize(&self.doc)
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Executed commands, oldest first.
    pub fn command_history(&self) -> &[Command] {
        &self.command_history
    }

    /// Execute a command at `now`.
    pub fn execute(
        &mut self,
        command: Command,
        now: Instant,
    ) -> Result<CommandResult, CommandError> {
        self.command_history.push(command.clone());
        match command {
            Command::Edit(edit_cmd) => self.execute_edit(edit_cmd, now),
            Command::Cursor(cursor_cmd) => self.execute_cursor(cursor_cmd),
        }
    }

    /// Batch execute commands; the first error aborts the rest.
    pub fn execute_batch(
        &mut self,
        commands: Vec<Command>,
        now: Instant,
    ) -> Result<Vec<CommandResult>, CommandError> {
        let mut results = Vec::new();
        for command in commands {
            results.push(self.execute(command, now)?);
        }
        Ok(results)
    }

    fn execute_edit(
        &mut self,
        command: EditCommand,
        now: Instant,
    ) -> Result<CommandResult, CommandError> {
        match command {
            EditCommand::InsertText { text } => {
                let outcome = insert(
                    &self.doc,
                    self.selection,
                    &text,
                    self.sanitizer.as_ref(),
                    self.resolver.as_ref(),
                );
                self.adopt(outcome.doc, Selection::caret(outcome.caret), now, false);
                Ok(CommandResult::Success)
            }
            EditCommand::AddEmoji { emoji } => {
                // The whole argument must be one emoji sequence; a hit on a
                // substring would silently drop the surrounding text.
                let hit = self
                    .resolver
                    .first_hit(&emoji)
                    .filter(|hit| hit.start == 0 && hit.end == emoji.len())
                    .ok_or_else(|| CommandError::UnknownEmoji(emoji.clone()))?;
                let fragment = vec![Segment::Image {
                    alt: hit.alt,
                    src: hit.src,
                }];
                let outcome = insert_fragment(&self.doc, self.selection, fragment);
                self.adopt(outcome.doc, Selection::caret(outcome.caret), now, false);
                Ok(CommandResult::Success)
            }
            EditCommand::ToggleBold => {
                let outcome = toggle_bold(&self.doc, self.selection);
                let changed = outcome.doc != self.doc;
                let result = CommandResult::Selection {
                    selection: outcome.selection,
                    is_in_bold: outcome.is_in_bold,
                };
                if changed {
                    self.adopt(outcome.doc, outcome.selection, now, false);
                } else {
                    self.selection = outcome.selection;
                }
                Ok(result)
            }
            EditCommand::Backspace => {
                let outcome = delete_backward(&self.doc, self.selection);
                self.adopt(outcome.doc, Selection::caret(outcome.caret), now, false);
                Ok(CommandResult::Success)
            }
            EditCommand::DeleteForward => {
                let outcome = delete_forward(&self.doc, self.selection);
                self.adopt(outcome.doc, Selection::caret(outcome.caret), now, false);
                Ok(CommandResult::Success)
            }
            EditCommand::SetContent { text } => {
                let outcome = insert(
                    &Document::new(),
                    Selection::caret(0),
                    &text,
                    self.sanitizer.as_ref(),
                    self.resolver.as_ref(),
                );
                self.adopt(outcome.doc, Selection::caret(outcome.caret), now, true);
                Ok(CommandResult::Success)
            }
            EditCommand::Undo => {
                let Some(snapshot) = self.history.undo() else {
                    return Ok(CommandResult::Success);
                };
                self.restore(&snapshot)?;
                Ok(CommandResult::Success)
            }
            EditCommand::Redo => {
                let Some(snapshot) = self.history.redo() else {
                    return Ok(CommandResult::Success);
                };
                self.restore(&snapshot)?;
                Ok(CommandResult::Success)
            }
        }
    }

    fn execute_cursor(&mut self, command: CursorCommand) -> Result<CommandResult, CommandError> {
        match command {
            CursorCommand::SetSelection { start, end } => {
                self.set_selection(Selection::new(start, end));
            }
            CursorCommand::Collapse { offset } => {
                self.set_selection(Selection::caret(offset));
            }
            CursorCommand::ClickImage { path, half } => {
                let offset = caret_for_image_click(&self.doc, &path, half)
                    .ok_or(CommandError::ImageNotFound { path })?;
                self.selection = Selection::caret(offset);
            }
        }
        Ok(CommandResult::Selection {
            selection: self.selection,
            is_in_bold: is_in_bold(&self.doc, self.selection),
        })
    }

    /// Install an edited document and record a history snapshot.
    fn adopt(&mut self, doc: Document, selection: Selection, now: Instant, forced: bool) {
        self.doc = doc;
        self.selection = selection;
        let snapshot = Snapshot::new(
            markup::serialize(&self.doc),
            (self.selection.start, self.selection.end),
        );
        self.history.record(snapshot, now, forced);
    }

    /// Restore a history snapshot; a parse failure leaves state untouched.
    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), CommandError> {
        let doc = markup::parse(&snapshot.content).map_err(CommandError::Snapshot)?;
        let (start, end) = snapshot.selection;
        self.selection = Selection::new(snap(&doc, start), snap(&doc, end));
        self.doc = doc;
        Ok(())
    }
}
