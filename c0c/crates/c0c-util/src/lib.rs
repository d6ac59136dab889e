//! c0c-util - Shared compiler infrastructure
//!
//! This crate holds the pieces every phase of the compiler needs:
//! the diagnostic types and the handler that collects them while the
//! front end keeps going after an error.
//!
//! The compiler distinguishes two failure modes:
//!
//! - Recoverable errors (a bad token, a type mismatch, a duplicate
//!   name). These become a [`Diagnostic`] in the [`Handler`] and the
//!   parser resynchronises and continues, so one run can report many
//!   problems.
//! - Fatal errors (truncated program, trailing bytes after `main`, a
//!   stray `!`). These are typed errors that propagate up to the driver
//!   through `Result`; they are defined next to the scanner that raises
//!   them.

pub mod diagnostic;

pub use diagnostic::{Diagnostic, Handler, SourceSnippet};
