//! retropad core - headless kernel of a classic single-document notepad.
//!
//! # Overview
//!
//! `retropad-core` holds everything a notepad front end needs except drawing: the text buffer
//! with its selection and one level of undo, literal find/replace over character offsets,
//! BOM-aware loading and saving, an INI-backed font preference, the dialog state machine and
//! the menu model. A shell feeds it key presses and renders what it reports.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  AppContext + Command dispatch              │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Dialogs / Menu model                       │  ← Modal state
//! ├─────────────────────────────────────────────┤
//! │  Document (Rope, selection, undo)           │  ← Editing
//! ├─────────────────────────────────────────────┤
//! │  Search │ File I/O + encodings │ Settings   │  ← Services
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use retropad_core::{SearchOptions, locate, replace_all};
//!
//! let text = "abcabc";
//! let found = locate(text, "abc", SearchOptions::down(true), 4).unwrap().unwrap();
//! assert_eq!((found.start, found.end), (0, 3));
//!
//! let replaced = replace_all("AAA", "a", "b", false).unwrap();
//! assert_eq!(replaced.text, "bbb");
//! assert_eq!(replaced.count, 3);
//! ```
//!
//! # Module Description
//!
//! - [`search`] - literal find/replace with wraparound
//! - [`document`] - rope buffer, selection, caret movement and undo
//! - [`encoding`] / [`file_io`] - BOM detection, decoding and saving
//! - [`line_ending`] - CRLF/LF detection and restoration
//! - [`settings`] - INI settings store and font descriptor
//! - [`clipboard`] - desktop clipboard with an in-process fallback
//! - [`dialog`] - dialog and message box state
//! - [`commands`] / [`menu`] - menu commands and the menu bar
//! - [`app`] - application context and command dispatch

pub mod app;
pub mod clipboard;
pub mod commands;
pub mod dialog;
pub mod document;
pub mod encoding;
pub mod file_io;
pub mod line_ending;
pub mod menu;
pub mod search;
pub mod settings;

pub use app::{APP_TITLE, AppContext, SearchState, UNTITLED_NAME};
pub use clipboard::Clipboard;
pub use commands::{Command, CommandState};
pub use dialog::{
    ConfirmAnswer, Dialog, FieldFocus, FindAction, FindDialog, FontDialog, GoToDialog, Message,
    MessageKind, PendingAction, ReplaceDialog, TextField,
};
pub use document::{Document, Selection};
pub use encoding::TextEncoding;
pub use file_io::{FileError, LoadedFile};
pub use line_ending::LineEnding;
pub use menu::{MENU_BAR, Menu, MenuEntry, MenuItem, ResolvedItem};
pub use search::{
    Replaced, SearchDirection, SearchError, SearchMatch, SearchOptions, find_all, locate,
    replace_all,
};
pub use settings::{FontDescriptor, SettingsError, SettingsStore};
