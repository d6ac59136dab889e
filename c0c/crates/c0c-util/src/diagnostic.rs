//! Diagnostic collection and rendering.
//!
//! Recoverable compile errors are buffered in a [`Handler`] so that the
//! parser can resynchronise and keep going; the driver prints them all
//! at once when the front end is done. Rendering follows the usual
//! compiler convention: a `file:line:col:` header, the offending source
//! line, and a caret/tilde underline beneath the offending word.

use std::cell::RefCell;
use std::fmt;
use std::fmt::Write as _;

/// How many diagnostics are printed before the rest is summarised.
const MAX_PRINTED_ERRORS: usize = 6;

/// A snapshot of the scanner position used to anchor a diagnostic.
///
/// `col` is the 0-based column of the first character of the offending
/// word; `width` is the number of characters the word spans (used for
/// the tilde underline).
///
/// # Examples
///
/// ```
/// use c0c_util::SourceSnippet;
///
/// let snip = SourceSnippet::new(3, 4, "int x = y;", 1);
/// assert_eq!(snip.line_no, 3);
/// assert_eq!(snip.col, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSnippet {
    /// 1-based line number.
    pub line_no: u32,
    /// 0-based column of the offending word.
    pub col: usize,
    /// The source line, without its terminator.
    pub line: String,
    /// Character width of the offending word (at least 1).
    pub width: usize,
}

impl SourceSnippet {
    /// Creates a snippet anchored at `line_no:col` spanning `width`
    /// characters of `line`.
    pub fn new(line_no: u32, col: usize, line: impl Into<String>, width: usize) -> Self {
        Self {
            line_no,
            col,
            line: line.into(),
            width: width.max(1),
        }
    }
}

/// A single compile error with its source location.
///
/// # Examples
///
/// ```
/// use c0c_util::{Diagnostic, SourceSnippet};
///
/// let diag = Diagnostic::error("type not match", SourceSnippet::new(1, 0, "x = 'c';", 1));
/// assert_eq!(diag.message, "type not match");
/// ```
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Main diagnostic message.
    pub message: String,
    /// Where in the source the error was detected.
    pub snippet: SourceSnippet,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>, snippet: SourceSnippet) -> Self {
        Self {
            message: message.into(),
            snippet,
        }
    }

    /// Renders this diagnostic the way it appears on the console.
    fn render(&self, filename: &str, out: &mut String) {
        let snip = &self.snippet;
        let _ = writeln!(
            out,
            "{}:{}:{}: error: {}",
            filename, snip.line_no, snip.col, self.message
        );
        let _ = writeln!(out, "{}", snip.line.trim_end_matches(['\r', '\n']));
        for _ in 0..snip.col {
            out.push(' ');
        }
        out.push('^');
        for _ in 1..snip.width {
            out.push('~');
        }
        out.push('\n');
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: error: {}",
            self.snippet.line_no, self.snippet.col, self.message
        )
    }
}

/// Collects diagnostics across the whole compilation.
///
/// The handler is shared by the scanner and the parser, so it hands out
/// `&self` methods and keeps its buffer behind a `RefCell`.
///
/// # Examples
///
/// ```
/// use c0c_util::{Handler, SourceSnippet};
///
/// let handler = Handler::new();
/// assert!(!handler.has_errors());
/// handler.error("wrong statement", SourceSnippet::new(1, 0, "f(;", 1));
/// assert_eq!(handler.error_count(), 1);
/// ```
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Creates an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error diagnostic.
    pub fn error(&self, message: impl Into<String>, snippet: SourceSnippet) {
        self.emit(Diagnostic::error(message, snippet));
    }

    /// Records a pre-built diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Returns true if any error has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.borrow().is_empty()
    }

    /// Number of recorded errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Returns a copy of every recorded diagnostic.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Renders the buffered diagnostics for the console.
    ///
    /// At most [`MAX_PRINTED_ERRORS`] diagnostics are rendered in full;
    /// anything beyond that is folded into a summary line. Returns
    /// `None` when the buffer is empty.
    pub fn render(&self, filename: &str) -> Option<String> {
        let diagnostics = self.diagnostics.borrow();
        if diagnostics.is_empty() {
            return None;
        }
        let mut out = String::from("compile terminated with error(s):\n");
        for diag in diagnostics.iter().take(MAX_PRINTED_ERRORS) {
            diag.render(filename, &mut out);
        }
        if diagnostics.len() > MAX_PRINTED_ERRORS {
            let _ = writeln!(
                out,
                "omitted {} more error(s)",
                diagnostics.len() - MAX_PRINTED_ERRORS
            );
        }
        Some(out)
    }
}
