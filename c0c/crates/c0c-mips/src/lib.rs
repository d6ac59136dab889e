//! c0c-mips - Lowering the quadruple IR to MARS-compatible MIPS.
//!
//! The runtime model is deliberately simple. All values occupy one
//! 4-byte word, `char` included, so the frame layout and the fused
//! compare/branch logic stay uniform. `$v0` is the universal
//! accumulator and `$v1` the secondary operand; there is no register
//! allocator.
//!
//! Stack frame of one function, top down:
//!
//! ```text
//! |----- saved $ra -----|   at (F-4)($sp)
//! |----- parameter 1 ---|
//! |----- parameter 2 ---|
//! |----- variable 1 ----|   locals and arrays, in source order
//! |----- …          ----|
//! |----- temp 1     ----|
//! |----- …          ----|   at 0($sp)
//! ```
//!
//! Arguments are written by the caller directly into the callee's
//! future frame (negative offsets off the caller's `$sp`), so after
//! the callee's own prologue they already sit where its parameters
//! were laid out and no copying is needed.

mod lower;
mod peephole;

pub use lower::MipsLowerer;
pub use peephole::{filter_listing, filter_redundant_moves};
