#![warn(missing_docs)]
//! Rich Textarea Core - Headless Rich-Text Input Engine
//!
//! # Overview
//!
//! `richtextarea-core` is a headless engine for a single-line-of-markup rich
//! text input: plain text runs, line breaks, inline emoji images, and bold
//! spans. It owns the document model, the mapping between absolute logical
//! offsets and tree positions, selection reconciliation against a live view,
//! range editing, and a debounced undo history. It never touches a real DOM;
//! a view binding implements one small trait and forwards input events.
//!
//! # Core Features
//!
//! - **Offset Mapping**: absolute logical offsets ⇄ node paths, exact
//!   round-trip over every valid caret position
//! - **Selection Reconciliation**: normalized selection reads, bold-state
//!   queries, and a bounded frame-retried caret writer
//! - **Range Editing**: atomic insert/delete/replace, emoji expansion,
//!   bold toggle with span splitting, grapheme-aware deletion
//! - **Undo History**: debounced, bounded snapshots with branch discard
//! - **State Tracking**: version numbers and change notifications
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Command Interface & State Management       │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Range-Edit Engine & History                │  ← Mutations
//! ├─────────────────────────────────────────────┤
//! │  Selection Reconciler (SelectionHost)       │  ← Live-View Seam
//! ├─────────────────────────────────────────────┤
//! │  Offset Mapper (DomPoint ⇄ offset)          │  ← Coordinates
//! ├─────────────────────────────────────────────┤
//! │  Segment Document Model & Markup            │  ← Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Using the Command Interface
//!
//! ```rust
//! use std::time::Instant;
//! use richtextarea_core::{Command, CommandExecutor, CursorCommand, EditCommand};
//!
//! let mut executor = CommandExecutor::new();
//!
//! executor.execute(Command::Edit(EditCommand::InsertText {
//!     text: "Hello 🎉".to_string(),
//! }), Instant::now()).unwrap();
//!
//! executor.execute(Command::Cursor(CursorCommand::SetSelection {
//!     start: 0,
//!     end: 5,
//! }), Instant::now()).unwrap();
//!
//! assert_eq!(executor.value(), "Hello 🎉");
//! assert_eq!(executor.doc().image_count(), 1);
//! ```
//!
//! ## Using State Management
//!
//! ```rust
//! use std::time::Instant;
//! use richtextarea_core::TextAreaStateManager;
//!
//! let mut manager = TextAreaStateManager::new();
//!
//! manager.subscribe(|change| {
//!     println!("State changed: {:?}", change.change_type);
//! });
//!
//! manager.insert_text("Hello", Instant::now()).unwrap();
//! assert_eq!(manager.value(), "Hello");
//! ```
//!
//! # Module Description
//!
//! - [`segment`] - Segment document model and logical widths
//! - [`markup`] - Serialization syntax and derived width constants
//! - [`offset`] - Offset Mapper (absolute offsets ⇄ tree positions)
//! - [`selection`] - Selection Reconciler and bounded caret applier
//! - [`edit`] - Range-Edit Engine
//! - [`emoji`] - Emoji resolver seam over `richtextarea-emoji`
//! - [`sanitize`] - Input sanitization seam
//! - [`history`] - Debounced, bounded undo history
//! - [`commands`] - Unified command interface
//! - [`state`] - State management and change notifications
//!
//! # Unicode Support
//!
//! - UTF-8 internal storage; the logical offset space counts characters
//! - Backspace and forward delete operate on grapheme clusters
//! - Emoji sequences (ZWJ joins, skin tones, flags, keycaps) resolve to
//!   inline images through `richtextarea-emoji`

pub mod commands;
pub mod edit;
pub mod emoji;
pub mod history;
pub mod markup;
pub mod offset;
pub mod sanitize;
pub mod segment;
pub mod selection;
pub mod state;

pub use commands::{
    Command, CommandError, CommandExecutor, CommandResult, CursorCommand, EditCommand,
};
pub use edit::{BoldOutcome, ClickHalf, EditOutcome};
pub use emoji::{EmojiHit, EmojiResolver, NoEmoji};
pub use history::{History, Snapshot};
pub use markup::MarkupError;
pub use offset::DomPoint;
pub use sanitize::{PlainTextSanitizer, Sanitizer};
pub use segment::{Document, Segment};
pub use selection::{
    ApplyStatus, CaretApplier, Selection, SelectionHost, SelectionQuery, SelectionReadError,
};
pub use state::{
    Accelerator, StateChange, StateChangeCallback, StateChangeType, TextAreaStateManager,
    accelerator_for,
};
