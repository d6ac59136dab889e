//! Line-oriented input with uniform line-ending handling.

/// Yields source lines one at a time, treating `\n`, `\r` and `\r\n`
/// all as a single line terminator.
///
/// The returned lines do not include their terminator; the scanner
/// appends its own `\n` sentinel so that every line ends the same way.
///
/// # Examples
///
/// ```
/// use c0c_lex::LineReader;
///
/// let mut reader = LineReader::new("a\r\nb\rc\n");
/// assert_eq!(reader.next_line(), Some("a"));
/// assert_eq!(reader.next_line(), Some("b"));
/// assert_eq!(reader.next_line(), Some("c"));
/// assert_eq!(reader.next_line(), None);
/// ```
pub struct LineReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> LineReader<'a> {
    /// Creates a reader over the full source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Returns the next line, or `None` once the input is exhausted.
    ///
    /// A terminator at the very end of the input does not produce an
    /// extra empty line.
    pub fn next_line(&mut self) -> Option<&'a str> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let start = self.pos;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\n' => {
                    let line = &self.bytes[start..self.pos];
                    self.pos += 1;
                    return Some(as_str(line));
                }
                b'\r' => {
                    let line = &self.bytes[start..self.pos];
                    self.pos += 1;
                    if self.pos < self.bytes.len() && self.bytes[self.pos] == b'\n' {
                        self.pos += 1;
                    }
                    return Some(as_str(line));
                }
                _ => self.pos += 1,
            }
        }
        Some(as_str(&self.bytes[start..]))
    }
}

fn as_str(bytes: &[u8]) -> &str {
    // The reader is constructed from a &str and splits at ASCII
    // terminators only, so every slice stays valid UTF-8.
    std::str::from_utf8(bytes).expect("line slices are valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &str) -> Vec<String> {
        let mut reader = LineReader::new(source);
        let mut out = Vec::new();
        while let Some(line) = reader.next_line() {
            out.push(line.to_string());
        }
        out
    }

    #[test]
    fn test_lf_lines() {
        assert_eq!(lines("a\nb\nc\n"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(lines("a\r\nb\r\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_bare_cr_lines() {
        assert_eq!(lines("a\rb\r"), vec!["a", "b"]);
    }

    #[test]
    fn test_mixed_terminators() {
        assert_eq!(lines("a\r\nb\nc\rd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_missing_final_terminator() {
        assert_eq!(lines("a\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(lines(""), Vec::<String>::new());
    }

    #[test]
    fn test_empty_lines_preserved() {
        assert_eq!(lines("a\n\nb\n"), vec!["a", "", "b"]);
    }
}
