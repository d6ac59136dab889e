//! c0c-mid - The quadruple intermediate representation.
//!
//! The IR is a flat, forward-only stream of quadruples `(op, a, b,
//! res)` where the operand slots are plain strings: literal tokens
//! (`3`, `'x'`), user names, synthesized temporaries (`$t_<n>`), labels
//! (`$LABEL_<n>`, `$IF_<n>`, `$STRING_<n>`, …) and type tags (`int`,
//! `char`, `void`, `str`). Constants are inlined before they ever reach
//! the stream, so there is no constant-definition operation.
//!
//! Global and local variables get different operations (`GVAR` vs
//! `VAR`) because they are allocated differently: globals become static
//! words in the data segment, locals become stack-frame slots.
//!
//! [`MidBuffer`] is the only writer: it appends to the primary stream
//! or, while a switch statement is being compiled, to a deferred buffer
//! that is replayed when the switch closes (see [`buffer`]).

pub mod buffer;
pub mod quad;

pub use buffer::{IfLabels, MidBuffer};
pub use quad::{const_operand, Op, Quad};
