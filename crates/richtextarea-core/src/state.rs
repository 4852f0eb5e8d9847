//! Input State Interface
//!
//! Host-facing layer over the command executor: the `value` surface,
//! placeholder and disabled handling, focus tracking, keyboard accelerator
//! resolution, and versioned change notifications.
//!
//! # Overview
//!
//! The state manager adopts a unidirectional data flow:
//!
//! 1. The host binding forwards input events as high-level calls
//!    (`insert_text`, `toggle_bold`, `backspace`, …)
//! 2. The manager dispatches them as commands, detects whether the value or
//!    selection actually changed, and bumps the version number
//! 3. Subscribed callbacks receive a [`StateChange`] per real change
//! 4. The host reads back `value()`, `selection()`, and drives
//!    [`tick`](TextAreaStateManager::tick) once per frame to reconcile the
//!    live caret
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use richtextarea_core::TextAreaStateManager;
//!
//! let mut manager = TextAreaStateManager::new();
//! manager.subscribe(|change| {
//!     println!("version {} -> {}", change.old_version, change.new_version);
//! });
//! manager.insert_text("hi", Instant::now()).unwrap();
//! assert_eq!(manager.value(), "hi");
//! ```

use std::time::Instant;

use crate::commands::{
    Command, CommandError, CommandExecutor, CommandResult, CursorCommand, EditCommand,
};
use crate::edit::ClickHalf;
use crate::selection::{
    ApplyStatus, CaretApplier, Selection, SelectionHost, SelectionQuery, is_in_bold, query,
};

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// The host-facing value changed
    ValueChanged,
    /// The selection or its bold state changed
    SelectionChanged,
}

/// State change record
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type
    pub change_type: StateChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
    /// The new host-facing value, for value changes
    pub value: Option<String>,
    /// The selection after the change
    pub selection: Selection,
    /// Whether that selection is bold
    pub is_in_bold: bool,
}

/// State change callback function type
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Undo/redo accelerators resolvable from a key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accelerator {
    /// Undo the latest change
    Undo,
    /// Redo the latest undone change
    Redo,
}

/// Resolve a keyboard chord to an accelerator.
///
/// The platform modifier is Cmd on a Mac and Ctrl elsewhere. `Z` undoes,
/// `Shift+Z` redoes, and `Y` redoes on non-Mac platforms only.
pub fn accelerator_for(
    key: &str,
    ctrl: bool,
    meta: bool,
    shift: bool,
    mac: bool,
) -> Option<Accelerator> {
    let modifier = if mac { meta } else { ctrl };
    if !modifier {
        return None;
    }
    match key {
        "z" | "Z" if shift => Some(Accelerator::Redo),
        "z" | "Z" => Some(Accelerator::Undo),
        "y" | "Y" if !mac => Some(Accelerator::Redo),
        _ => None,
    }
}

/// Input state manager: command executor plus the host-facing surface.
pub struct TextAreaStateManager {
    /// Command executor
    executor: CommandExecutor,
    /// Frame-retried caret writer
    applier: CaretApplier,
    /// State version number
    version: u64,
    /// State change callback list
    callbacks: Vec<StateChangeCallback>,
    /// Placeholder shown while the value is empty
    placeholder: String,
    /// Whether edits are rejected
    disabled: bool,
    /// Logical focus flag mirrored from the host
    focused: bool,
}

impl Default for TextAreaStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAreaStateManager {
    /// Create a manager with the default executor components.
    pub fn new() -> Self {
        Self::with_executor(CommandExecutor::new())
    }

    /// Create a manager over a preconfigured executor.
    pub fn with_executor(executor: CommandExecutor) -> Self {
        Self {
            executor,
            applier: CaretApplier::default(),
            version: 0,
            callbacks: Vec::new(),
            placeholder: String::new(),
            disabled: false,
            focused: false,
        }
    }

    /// The underlying executor.
    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// The host-facing value.
    pub fn value(&self) -> String {
        self.executor.value()
    }

    /// Replace the whole value through the insert pipeline.
    pub fn set_value(&mut self, text: &str, now: Instant) -> Result<(), CommandError> {
        self.execute(
            Command::Edit(EditCommand::SetContent {
                text: text.to_string(),
            }),
            now,
        )
        .map(|_| ())
    }

    /// The current selection.
    pub fn selection(&self) -> Selection {
        self.executor.selection()
    }

    /// Whether the current selection is bold.
    pub fn is_in_bold(&self) -> bool {
        is_in_bold(self.executor.doc(), self.executor.selection())
    }

    /// The placeholder text.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Whether the placeholder should currently be rendered.
    pub fn placeholder_visible(&self) -> bool {
        self.executor.doc().is_empty() && !self.placeholder.is_empty()
    }

    /// Whether edits are rejected.
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Enable or disable editing.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Whether the input believes it has focus.
    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Mark the input focused.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Mark the input blurred.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Current state version; bumps once per real change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        self.executor.can_undo()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        self.executor.can_redo()
    }

    /// Subscribe to state changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Replace the selection with unprocessed text.
    pub fn insert_text(&mut self, text: &str, now: Instant) -> Result<(), CommandError> {
        self.execute(
            Command::Edit(EditCommand::InsertText {
                text: text.to_string(),
            }),
            now,
        )
        .map(|_| ())
    }

    /// Insert one emoji image placeholder at the selection.
    pub fn add_emoji(&mut self, emoji: &str, now: Instant) -> Result<(), CommandError> {
        self.execute(
            Command::Edit(EditCommand::AddEmoji {
                emoji: emoji.to_string(),
            }),
            now,
        )
        .map(|_| ())
    }

    /// Toggle bold over the selection; returns whether it is bold now.
    pub fn toggle_bold(&mut self, now: Instant) -> Result<bool, CommandError> {
        match self.execute(Command::Edit(EditCommand::ToggleBold), now)? {
            CommandResult::Selection { is_in_bold, .. } => Ok(is_in_bold),
            CommandResult::Success => Ok(false),
        }
    }

    /// Delete one unit before the caret, or the selection.
    pub fn backspace(&mut self, now: Instant) -> Result<(), CommandError> {
        self.execute(Command::Edit(EditCommand::Backspace), now)
            .map(|_| ())
    }

    /// Delete one unit after the caret, or the selection.
    pub fn delete_forward(&mut self, now: Instant) -> Result<(), CommandError> {
        self.execute(Command::Edit(EditCommand::DeleteForward), now)
            .map(|_| ())
    }

    /// Restore the previous history snapshot.
    pub fn undo(&mut self, now: Instant) -> Result<(), CommandError> {
        self.execute(Command::Edit(EditCommand::Undo), now).map(|_| ())
    }

    /// Restore the next history snapshot.
    pub fn redo(&mut self, now: Instant) -> Result<(), CommandError> {
        self.execute(Command::Edit(EditCommand::Redo), now).map(|_| ())
    }

    /// Set the selection from logical offsets.
    pub fn set_selection(
        &mut self,
        start: usize,
        end: usize,
        now: Instant,
    ) -> Result<(), CommandError> {
        self.execute(Command::Cursor(CursorCommand::SetSelection { start, end }), now)
            .map(|_| ())
    }

    /// Place the caret from a pointer click on an image placeholder.
    pub fn click_image(
        &mut self,
        path: Vec<usize>,
        half: ClickHalf,
        now: Instant,
    ) -> Result<(), CommandError> {
        self.execute(Command::Cursor(CursorCommand::ClickImage { path, half }), now)
            .map(|_| ())
    }

    /// Run a key chord through the accelerator table, executing the matched
    /// undo or redo. Returns whether the chord was consumed.
    pub fn handle_accelerator(
        &mut self,
        key: &str,
        ctrl: bool,
        meta: bool,
        shift: bool,
        mac: bool,
        now: Instant,
    ) -> Result<bool, CommandError> {
        match accelerator_for(key, ctrl, meta, shift, mac) {
            Some(Accelerator::Undo) => self.undo(now).map(|_| true),
            Some(Accelerator::Redo) => self.redo(now).map(|_| true),
            None => Ok(false),
        }
    }

    /// Read the live selection from the host, adopt it, and report it.
    pub fn query_live(&mut self, host: &dyn SelectionHost) -> SelectionQuery {
        let result = query(self.executor.doc(), host);
        let before = self.snapshot_state();
        self.executor.set_selection(result.selection);
        self.notify_diffs(&before);
        result
    }

    /// Run one frame of caret reconciliation against the host.
    pub fn tick(&mut self, host: &mut dyn SelectionHost) -> ApplyStatus {
        self.applier.tick(self.executor.doc(), host)
    }

    /// Execute a command with disabled gating, no-op detection, and change
    /// notifications.
    pub fn execute(
        &mut self,
        command: Command,
        now: Instant,
    ) -> Result<CommandResult, CommandError> {
        if self.disabled && matches!(command, Command::Edit(_)) {
            return Err(CommandError::Disabled);
        }
        let before = self.snapshot_state();
        let result = self.executor.execute(command, now)?;
        self.notify_diffs(&before);
        Ok(result)
    }

    fn snapshot_state(&self) -> (String, Selection, bool) {
        (
            self.executor.value(),
            self.executor.selection(),
            self.is_in_bold(),
        )
    }

    fn notify_diffs(&mut self, before: &(String, Selection, bool)) {
        let value = self.executor.value();
        let selection = self.executor.selection();
        let in_bold = self.is_in_bold();

        if value != before.0 {
            self.emit(StateChange {
                change_type: StateChangeType::ValueChanged,
                old_version: self.version,
                new_version: self.version + 1,
                value: Some(value.clone()),
                selection,
                is_in_bold: in_bold,
            });
            // A changed document means the live caret must be re-applied.
            self.applier.set_target(selection.start);
        }
        if selection != before.1 || in_bold != before.2 {
            self.emit(StateChange {
                change_type: StateChangeType::SelectionChanged,
                old_version: self.version,
                new_version: self.version + 1,
                value: None,
                selection,
                is_in_bold: in_bold,
            });
        }
    }

    fn emit(&mut self, change: StateChange) {
        self.version = change.new_version;
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}
