//! c0c-lex - Lexical analyzer for the C0 source language.
//!
//! The scanner produces one token at a time, on demand: the parser asks
//! for the next token with [`Scanner::advance`] and then inspects the
//! cursor state ([`Scanner::sym`] plus the payload accessors). There is
//! no token vector; the whole front end is single-pass.
//!
//! Token rules (see also the keyword table in [`token`]):
//!
//! - identifiers and keywords match `[A-Za-z_][A-Za-z0-9_]*` and are
//!   folded to lower case before keyword lookup, so the language is
//!   case-insensitive;
//! - integer literals are unsigned decimal; any sign in front of them
//!   belongs to the grammar, not the token;
//! - character literals admit `+ - * / _`, letters and digits;
//! - string literals admit ASCII 32, 33 and 35..=126;
//! - `==`, `!=`, `<=`, `>=` are the only two-character operators, and a
//!   `!` that is not followed by `=` is a fatal error.
//!
//! Running out of input in the middle of a program is fatal
//! ([`FatalError::ProgramIncomplete`]); everything else the scanner can
//! diagnose is recoverable and goes through the shared
//! [`Handler`](c0c_util::Handler).

mod error;
mod reader;
mod scanner;
pub mod token;

pub use error::{FatalError, ScanResult};
pub use reader::LineReader;
pub use scanner::Scanner;
pub use token::{TokenKind, TokenSet};
