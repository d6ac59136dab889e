//! The two-tier symbol table and the function-parameter registry.

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Scope tier an identifier belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

/// What kind of entity an identifier names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Const,
    Variable,
    Function,
    Array,
}

/// Data type of a value or of a function's return value.
///
/// `Void` is only valid for functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    Void,
    Int,
    Char,
}

impl DataType {
    /// The type tag carried in the intermediate code (`"int"`,
    /// `"char"`, `"void"`).
    pub fn tag(self) -> &'static str {
        match self {
            DataType::Void => "void",
            DataType::Int => "int",
            DataType::Char => "char",
        }
    }

    /// Parses an intermediate-code type tag back into a type.
    pub fn from_tag(tag: &str) -> Option<DataType> {
        Some(match tag {
            "void" => DataType::Void,
            "int" => DataType::Int,
            "char" => DataType::Char,
            _ => return None,
        })
    }
}

/// One symbol-table entry.
///
/// `value` is the literal value for constants and the element count for
/// arrays; `addr` is the frame-relative byte offset from `$sp` assigned
/// to local entities by the frame-layout pass. Both are meaningless for
/// the other kinds and left at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub scope: Scope,
    pub kind: EntryKind,
    pub dtype: DataType,
    pub value: i32,
    pub addr: i32,
}

impl Entry {
    /// Entry for a named constant holding `value`.
    pub fn constant(scope: Scope, dtype: DataType, value: i32) -> Self {
        Self {
            scope,
            kind: EntryKind::Const,
            dtype,
            value,
            addr: 0,
        }
    }

    /// Entry for a scalar variable.
    pub fn variable(scope: Scope, dtype: DataType) -> Self {
        Self {
            scope,
            kind: EntryKind::Variable,
            dtype,
            value: 0,
            addr: 0,
        }
    }

    /// Entry for an array of `len` elements.
    pub fn array(scope: Scope, dtype: DataType, len: i32) -> Self {
        Self {
            scope,
            kind: EntryKind::Array,
            dtype,
            value: len,
            addr: 0,
        }
    }

    /// Entry for a function returning `dtype`.
    pub fn function(dtype: DataType) -> Self {
        Self {
            scope: Scope::Global,
            kind: EntryKind::Function,
            dtype,
            value: 0,
            addr: 0,
        }
    }
}

/// Insertion failure: the name already exists in that scope tier.
///
/// The table does not talk to the diagnostics sink itself; the caller
/// turns this into the scope-appropriate error message.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("duplicate {scope:?} identifier")]
pub struct DuplicateName {
    pub scope: Scope,
}

/// Two-tier symbol table plus the per-function parameter registry.
///
/// # Examples
///
/// ```
/// use c0c_tab::{DataType, Entry, Scope, SymbolTable};
///
/// let mut tab = SymbolTable::new();
/// tab.insert("x", Entry::variable(Scope::Global, DataType::Int)).unwrap();
/// tab.insert("x", Entry::variable(Scope::Local, DataType::Char)).unwrap();
///
/// // local shadows global
/// assert_eq!(tab.find("x").unwrap().dtype, DataType::Char);
/// tab.clear_local();
/// assert_eq!(tab.find("x").unwrap().dtype, DataType::Int);
/// ```
#[derive(Default)]
pub struct SymbolTable {
    global: FxHashMap<String, Entry>,
    local: FxHashMap<String, Entry>,
    params: FxHashMap<String, Vec<DataType>>,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry` under `name` in the tier given by its scope.
    ///
    /// A duplicate within the tier is rejected and the new entry
    /// discarded; the previous entry stays authoritative.
    pub fn insert(&mut self, name: &str, entry: Entry) -> Result<(), DuplicateName> {
        let tier = match entry.scope {
            Scope::Global => &mut self.global,
            Scope::Local => &mut self.local,
        };
        if tier.contains_key(name) {
            return Err(DuplicateName { scope: entry.scope });
        }
        tier.insert(name.to_string(), entry);
        Ok(())
    }

    /// Looks up `name`, local tier first, then global.
    pub fn find(&self, name: &str) -> Option<Entry> {
        self.local
            .get(name)
            .or_else(|| self.global.get(name))
            .copied()
    }

    /// Drops every local entry. Called when a function is done.
    pub fn clear_local(&mut self) {
        self.local.clear();
    }

    /// Appends a parameter type to `func`'s signature, in source order.
    pub fn push_param(&mut self, func: &str, dtype: DataType) {
        self.params.entry(func.to_string()).or_default().push(dtype);
    }

    /// The registered parameter types of `func` (empty when none).
    pub fn params(&self, func: &str) -> &[DataType] {
        self.params.get(func).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find() {
        let mut tab = SymbolTable::new();
        tab.insert("n", Entry::variable(Scope::Global, DataType::Int))
            .unwrap();
        let entry = tab.find("n").unwrap();
        assert_eq!(entry.kind, EntryKind::Variable);
        assert_eq!(entry.scope, Scope::Global);
    }

    #[test]
    fn test_find_missing() {
        let tab = SymbolTable::new();
        assert_eq!(tab.find("nope"), None);
    }

    #[test]
    fn test_duplicate_in_same_tier_rejected() {
        let mut tab = SymbolTable::new();
        tab.insert("x", Entry::variable(Scope::Global, DataType::Int))
            .unwrap();
        let err = tab
            .insert("x", Entry::variable(Scope::Global, DataType::Char))
            .unwrap_err();
        assert_eq!(err.scope, Scope::Global);
        // the first entry survives
        assert_eq!(tab.find("x").unwrap().dtype, DataType::Int);
    }

    #[test]
    fn test_same_name_in_both_tiers() {
        let mut tab = SymbolTable::new();
        tab.insert("x", Entry::variable(Scope::Global, DataType::Int))
            .unwrap();
        tab.insert("x", Entry::variable(Scope::Local, DataType::Char))
            .unwrap();
        assert_eq!(tab.find("x").unwrap().scope, Scope::Local);
    }

    #[test]
    fn test_clear_local() {
        let mut tab = SymbolTable::new();
        tab.insert("a", Entry::variable(Scope::Local, DataType::Int))
            .unwrap();
        tab.insert("g", Entry::variable(Scope::Global, DataType::Int))
            .unwrap();
        tab.clear_local();
        assert_eq!(tab.find("a"), None);
        assert!(tab.find("g").is_some());
    }

    #[test]
    fn test_const_entry_carries_value() {
        let entry = Entry::constant(Scope::Global, DataType::Char, b'k' as i32);
        assert_eq!(entry.kind, EntryKind::Const);
        assert_eq!(entry.value, b'k' as i32);
    }

    #[test]
    fn test_array_entry_carries_length() {
        let entry = Entry::array(Scope::Local, DataType::Int, 12);
        assert_eq!(entry.value, 12);
    }

    #[test]
    fn test_params_in_source_order() {
        let mut tab = SymbolTable::new();
        tab.push_param("sum", DataType::Int);
        tab.push_param("sum", DataType::Char);
        assert_eq!(tab.params("sum"), &[DataType::Int, DataType::Char]);
        assert!(tab.params("other").is_empty());
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(DataType::Int.tag(), "int");
        assert_eq!(DataType::from_tag("char"), Some(DataType::Char));
        assert_eq!(DataType::from_tag("str"), None);
    }
}
