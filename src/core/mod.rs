//! This module constitutes the core, terminal-agnostic editing engine of tabula.
//! It holds the row store and its rendering, syntax classification, the edit
//! engine with its undo log, selection and clipboard, search, file I/O and the
//! buffer manager that ties them together.

pub mod app;
pub mod buffer;
pub mod cursor;
pub mod edit;
pub mod file;
pub mod input;
pub mod prompt;
pub mod row;
pub mod search;
pub mod selection;
pub mod syntax;
pub mod undo;
pub mod wrap;
