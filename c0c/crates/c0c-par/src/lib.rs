//! c0c-par - Recursive-descent parser with fused semantic analysis.
//!
//! The front end is single-pass: there is no AST. Each non-terminal is
//! a method on [`Parser`] that inspects the scanner's current token,
//! performs its semantic checks inline (symbol-table maintenance, type
//! checks, constant folding) and emits quadruples as it goes.
//!
//! Error recovery follows a two-set discipline. At a synchronisation
//! point the parser compares the current token against an *expected*
//! set; on a mismatch it records a diagnostic and skips tokens until
//! one from *expected ∪ follow* shows up. The `sync!` macro adds the
//! early-return behaviour layered on top: when recovery only reached a
//! follow-set token, the current non-terminal gives up (consuming one
//! extra token) and its caller carries on from there.
//!
//! Expressions return a pair of (operand text, data type). When every
//! operand of an arithmetic node is a literal, the arithmetic happens
//! at compile time with 32-bit two's-complement wraparound and a folded
//! literal is returned instead of emitting a quadruple.

mod expr;
mod messages;
mod parser;
mod stmt;

pub use parser::{FrontendOutput, Parser};

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use c0c_mid::Quad;
    use c0c_util::Handler;

    /// Parses `source` expecting a clean compile; returns the quads.
    pub fn parse_ok(source: &str) -> Vec<Quad> {
        let diag = Handler::new();
        let parser = Parser::new(source, &diag);
        let out = parser.parse().expect("unexpected fatal error");
        let rendered = diag.render("test.c0").unwrap_or_default();
        assert!(!diag.has_errors(), "unexpected diagnostics:\n{rendered}");
        out.quads
    }

    /// Parses `source` expecting at least one diagnostic; returns the
    /// recorded messages.
    pub fn parse_errors(source: &str) -> Vec<String> {
        let diag = Handler::new();
        let parser = Parser::new(source, &diag);
        let _ = parser.parse();
        let messages: Vec<String> = diag
            .diagnostics()
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert!(!messages.is_empty(), "expected diagnostics, got none");
        messages
    }

    /// Renders quads one per line, the same way `mid_code.txt` looks.
    pub fn printed(quads: &[Quad]) -> Vec<String> {
        quads.iter().map(|q| q.to_string()).collect()
    }
}
