//! The on-demand scanner.
//!
//! The scanner owns the whole cursor state of the front end: the
//! current token kind, the decoded payload of value-bearing tokens,
//! and the line/column bookkeeping the diagnostics are anchored to.
//! `advance()` moves the cursor forward by exactly one token.

use c0c_util::{Handler, SourceSnippet};

use crate::error::{FatalError, ScanResult};
use crate::reader::LineReader;
use crate::token::TokenKind;

/// Blank characters skipped between tokens: space, tab, newline.
/// `\r` never reaches the scanner; the line reader strips it.
fn is_blank(byte: u8) -> bool {
    byte == b' ' || byte == b'\t' || byte == b'\n'
}

/// Characters admitted inside a character literal.
fn is_char_literal_body(byte: u8) -> bool {
    matches!(byte, b'+' | b'-' | b'*' | b'/' | b'_') || byte.is_ascii_alphanumeric()
}

/// Characters admitted inside a string literal: ASCII 32, 33, 35..=126
/// (printable without the double quote).
fn is_string_body(byte: u8) -> bool {
    byte == 32 || byte == 33 || (35..=126).contains(&byte)
}

/// Single-pass scanner over one source file.
///
/// # Examples
///
/// ```
/// use c0c_lex::{Scanner, TokenKind};
/// use c0c_util::Handler;
///
/// let diag = Handler::new();
/// let mut scanner = Scanner::new("int x;", &diag);
/// scanner.advance().unwrap();
/// assert_eq!(scanner.sym(), TokenKind::Int);
/// scanner.advance().unwrap();
/// assert_eq!(scanner.sym(), TokenKind::Ident);
/// assert_eq!(scanner.ident(), "x");
/// ```
pub struct Scanner<'a> {
    reader: LineReader<'a>,
    diag: &'a Handler,

    // Cursor state; see the token rules in the crate docs.
    sym: TokenKind,
    ident: String,
    num: i32,
    char_value: u8,
    string_value: String,

    // Position state. `line` always carries a trailing '\n' sentinel;
    // `pos` indexes the next unread byte; `ch` is the last byte read.
    line: Vec<u8>,
    pos: usize,
    line_no: u32,
    word_pos: usize,
    ch: u8,

    // One-shot non-fatal mode used after `main` closes: end of input
    // is then an ordinary condition, not a truncated program.
    trailing: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over `source`, reporting recoverable lexical
    /// errors to `diag`.
    pub fn new(source: &'a str, diag: &'a Handler) -> Self {
        Self {
            reader: LineReader::new(source),
            diag,
            sym: TokenKind::Ident,
            ident: String::new(),
            num: 0,
            char_value: 0,
            string_value: String::new(),
            line: Vec::new(),
            pos: 0,
            line_no: 0,
            word_pos: 0,
            ch: b' ',
            trailing: false,
        }
    }

    /// Kind of the current token.
    pub fn sym(&self) -> TokenKind {
        self.sym
    }

    /// Text of the current identifier (lower-cased).
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Value of the current integer literal.
    pub fn num(&self) -> i32 {
        self.num
    }

    /// Value of the current character literal.
    pub fn char_value(&self) -> u8 {
        self.char_value
    }

    /// Content of the current string literal.
    pub fn string_value(&self) -> &str {
        &self.string_value
    }

    /// 1-based number of the current line.
    pub fn line_no(&self) -> u32 {
        self.line_no
    }

    /// A snippet anchored at the current token, for diagnostics.
    pub fn snippet(&self) -> SourceSnippet {
        let text = String::from_utf8_lossy(&self.line);
        let width = self.pos.saturating_sub(self.word_pos + 1);
        SourceSnippet::new(
            self.line_no,
            self.word_pos,
            text.trim_end_matches('\n'),
            width,
        )
    }

    /// Advances the cursor to describe the next token.
    ///
    /// Skips blanks and anything it had to diagnose (unsupported
    /// characters are reported and stepped over). Fails only on the
    /// fatal conditions of [`FatalError`].
    pub fn advance(&mut self) -> ScanResult<()> {
        loop {
            while is_blank(self.ch) {
                self.next_ch()?;
            }
            self.word_pos = self.pos.saturating_sub(1);
            if self.ch.is_ascii_digit() {
                return self.read_unsigned_integer();
            }
            if self.ch.is_ascii_alphabetic() || self.ch == b'_' {
                return self.read_identifier();
            }
            match self.ch {
                b'"' => return self.read_string(),
                b'\'' => return self.read_character(),
                b'>' => {
                    self.next_ch()?;
                    if self.ch == b'=' {
                        self.sym = TokenKind::Geq;
                        self.next_ch()?;
                    } else {
                        self.sym = TokenKind::Gtr;
                    }
                    return Ok(());
                }
                b'<' => {
                    self.next_ch()?;
                    if self.ch == b'=' {
                        self.sym = TokenKind::Leq;
                        self.next_ch()?;
                    } else {
                        self.sym = TokenKind::Lss;
                    }
                    return Ok(());
                }
                b'=' => {
                    self.next_ch()?;
                    if self.ch == b'=' {
                        self.sym = TokenKind::Eql;
                        self.next_ch()?;
                    } else {
                        self.sym = TokenKind::Assign;
                    }
                    return Ok(());
                }
                b'!' => {
                    self.next_ch()?;
                    if self.ch != b'=' {
                        self.diag
                            .error("operator ! is not allowed", self.snippet());
                        return Err(FatalError::StrayBang);
                    }
                    self.sym = TokenKind::Neq;
                    self.next_ch()?;
                    return Ok(());
                }
                other => match TokenKind::from_punct(other) {
                    Some(kind) => {
                        self.sym = kind;
                        self.next_ch()?;
                        return Ok(());
                    }
                    None => {
                        self.diag.error("unsupported character", self.snippet());
                        self.next_ch()?;
                        // retry from the next character
                    }
                },
            }
        }
    }

    /// Scans the bytes after the program proper. Any non-blank byte is
    /// a fatal error; clean end of input is success.
    pub fn check_trailing(&mut self) -> ScanResult<()> {
        self.trailing = true;
        loop {
            if !is_blank(self.ch) {
                self.word_pos = self.pos.saturating_sub(1);
                self.diag
                    .error("redundant code after main function", self.snippet());
                return Err(FatalError::RedundantCode);
            }
            if !self.next_ch()? {
                return Ok(());
            }
        }
    }

    /// Reads the next byte into `ch`, fetching a new line when the
    /// current one is spent.
    ///
    /// Returns `Ok(false)` only in trailing mode when the input is
    /// exhausted; during normal scanning that condition is fatal.
    fn next_ch(&mut self) -> ScanResult<bool> {
        if self.pos == self.line.len() {
            match self.reader.next_line() {
                Some(text) => {
                    self.line.clear();
                    self.line.extend_from_slice(text.as_bytes());
                    self.line.push(b'\n');
                    self.pos = 0;
                    self.line_no += 1;
                }
                None => {
                    if self.trailing {
                        return Ok(false);
                    }
                    self.diag.error("program incomplete", self.snippet());
                    return Err(FatalError::ProgramIncomplete);
                }
            }
        }
        self.ch = self.line[self.pos];
        self.pos += 1;
        Ok(true)
    }

    fn read_identifier(&mut self) -> ScanResult<()> {
        // Identifiers are not case-sensitive: fold before keyword lookup.
        self.ident.clear();
        while self.ch.is_ascii_alphanumeric() || self.ch == b'_' {
            self.ident.push(self.ch.to_ascii_lowercase() as char);
            self.next_ch()?;
        }
        self.sym = TokenKind::keyword(&self.ident).unwrap_or(TokenKind::Ident);
        Ok(())
    }

    fn read_unsigned_integer(&mut self) -> ScanResult<()> {
        let mut value: i32 = 0;
        while self.ch.is_ascii_digit() {
            value = value
                .wrapping_mul(10)
                .wrapping_add(i32::from(self.ch - b'0'));
            self.next_ch()?;
        }
        self.num = value;
        self.sym = TokenKind::IntLit;
        Ok(())
    }

    fn read_character(&mut self) -> ScanResult<()> {
        self.next_ch()?;
        if !is_char_literal_body(self.ch) {
            self.diag
                .error("invalid character in character literal", self.snippet());
        }
        self.char_value = self.ch;
        self.next_ch()?;
        if self.ch != b'\'' {
            self.diag.error(
                "missing closing single quotation mark for character",
                self.snippet(),
            );
        }
        self.sym = TokenKind::CharLit;
        self.next_ch()?;
        Ok(())
    }

    fn read_string(&mut self) -> ScanResult<()> {
        self.string_value.clear();
        self.next_ch()?;
        while self.ch != b'"' {
            if self.ch == b'\n' {
                // Continue on the next line so later errors still surface.
                self.diag.error("missing '\"' for string", self.snippet());
                break;
            }
            if !is_string_body(self.ch) {
                self.diag
                    .error("invalid character in string", self.snippet());
                self.next_ch()?;
                continue;
            }
            self.string_value.push(self.ch as char);
            self.next_ch()?;
        }
        self.sym = TokenKind::StrLit;
        self.next_ch()?;
        Ok(())
    }
}
