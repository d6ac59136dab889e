//! The IR sink, including the switch-case deferral machinery.
//!
//! A switch statement wants its dispatch compares first, the case
//! bodies after, and the end label last:
//!
//! ```text
//!     compare v against 1, if equal goto body_1
//!     compare v against 2, if equal goto body_2
//!   default_label:
//!     default body
//!     goto end
//!   body_1:            <- held back while parsing
//!     case-1 body      <- held back
//!     goto end         <- held back
//!   body_2:            <- held back
//!     case-2 body      <- held back
//!     goto end         <- held back
//!   end:
//! ```
//!
//! A single-pass parser cannot go back and move the bodies, but it can
//! hold them: each switch pushes a deferred buffer, each case body is
//! emitted inside a `begin_defer`/`end_defer` bracket so it lands in
//! that buffer, and when the switch closes the buffer is replayed into
//! whatever sink is active at that point and popped.
//!
//! The write target is selected by the defer depth, not by the top of
//! the buffer stack: while an outer case body is being deferred
//! (depth 1), an inner switch may already have pushed its own buffer,
//! and the inner switch's dispatch compares still belong to the outer
//! body. Writing to `buffers[depth - 1]` keeps that correct at any
//! nesting.

use crate::quad::{Op, Quad};

/// The three correlated labels of one if/else cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfLabels {
    /// Label of the then-branch, `$IF_<k>`.
    pub then_label: String,
    /// Label of the else-branch, `$ELSE_<k>`.
    pub else_label: String,
    /// Label after the whole cluster, `$IF_<k>_END`.
    pub end_label: String,
}

/// Append-only quadruple sink with a stack of deferred buffers.
///
/// # Examples
///
/// ```
/// use c0c_mid::{MidBuffer, Op};
///
/// let mut mid = MidBuffer::new();
/// mid.emit(Op::Label, "$LABEL_0", "", "");
/// mid.push_deferred();
/// mid.begin_defer();
/// mid.emit(Op::Goto, "$LABEL_0", "", "");
/// mid.end_defer();
/// mid.emit(Op::End, "", "", "");
/// mid.flush_deferred();
///
/// let printed: Vec<String> = mid.quads().iter().map(|q| q.to_string()).collect();
/// assert_eq!(printed, ["label $LABEL_0", "end", "goto $LABEL_0"]);
/// ```
#[derive(Default)]
pub struct MidBuffer {
    quads: Vec<Quad>,
    buffers: Vec<Vec<Quad>>,
    depth: usize,
    temp_count: u32,
    label_count: u32,
    if_count: u32,
}

impl MidBuffer {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one quadruple to the active sink.
    pub fn emit(
        &mut self,
        op: Op,
        a: impl Into<String>,
        b: impl Into<String>,
        res: impl Into<String>,
    ) {
        self.emit_quad(Quad::new(op, a, b, res));
    }

    /// Emits a pre-built quadruple to the active sink.
    pub fn emit_quad(&mut self, quad: Quad) {
        if self.depth != 0 {
            self.buffers[self.depth - 1].push(quad);
        } else {
            self.quads.push(quad);
        }
    }

    /// Pushes a fresh deferred buffer (start of a switch).
    pub fn push_deferred(&mut self) {
        self.buffers.push(Vec::new());
    }

    /// Starts routing emissions into the deferred buffers.
    pub fn begin_defer(&mut self) {
        self.depth += 1;
        debug_assert!(self.depth <= self.buffers.len());
    }

    /// Stops the innermost deferral bracket.
    pub fn end_defer(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
    }

    /// Replays the top deferred buffer into the active sink and pops it.
    pub fn flush_deferred(&mut self) {
        let buffered = self.buffers.pop().expect("no deferred buffer to flush");
        for quad in buffered {
            self.emit_quad(quad);
        }
    }

    /// Fresh temporary name, `$t_<n>`.
    pub fn gen_temp(&mut self) -> String {
        let name = format!("$t_{}", self.temp_count);
        self.temp_count += 1;
        name
    }

    /// Fresh plain label, `$LABEL_<n>`.
    pub fn gen_label(&mut self) -> String {
        let name = format!("$LABEL_{}", self.label_count);
        self.label_count += 1;
        name
    }

    /// The label triple for the next if/else cluster.
    pub fn gen_if_labels(&mut self) -> IfLabels {
        self.if_count += 1;
        IfLabels {
            then_label: format!("$IF_{}", self.if_count),
            else_label: format!("$ELSE_{}", self.if_count),
            end_label: format!("$IF_{}_END", self.if_count),
        }
    }

    /// The primary stream emitted so far.
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Consumes the sink, returning the primary stream.
    pub fn into_quads(self) -> Vec<Quad> {
        debug_assert_eq!(self.depth, 0);
        debug_assert!(self.buffers.is_empty());
        self.quads
    }
}
