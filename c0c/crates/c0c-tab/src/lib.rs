//! c0c-tab - Symbol table, function signatures, and the string pool.
//!
//! The table has exactly two scope tiers. Globals live for the whole
//! compile; locals are cleared after each function (the parser clears
//! them when a function body closes, and the MIPS lowerer repopulates
//! them with frame addresses when it lays out that function's frame).
//!
//! Constants are inlined at their use sites, so a `Const` entry only
//! carries its literal value and never needs a runtime address.

mod pool;
mod table;

pub use pool::StringPool;
pub use table::{DataType, DuplicateName, Entry, EntryKind, Scope, SymbolTable};
