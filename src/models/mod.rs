//! Domain models for quicknotes.
//!
//! - [`Note`]: the typed record produced by the store layer.
//! - [`NoteForm`]: an untrusted add/edit submission, turned into a
//!   [`ValidNote`] by [`NoteForm::validate`].

mod note;

pub use note::*;
