//! Diagnostic messages of the semantic checks.
//!
//! Kept in one place so tests can match on them.

pub const WRONG_TYPE_OF_MAIN: &str = "wrong type of main function";
pub const DUPLICATE_GLOBAL: &str = "duplicate global identifier";
pub const DUPLICATE_LOCAL: &str = "duplicate local identifier";
pub const UNDEFINED_IDENTIFIER: &str = "reference of undefined identifier";
pub const EXPECT_NON_VOID_FUNCTION: &str = "expected function call with a return value";
pub const NOT_A_FUNCTION: &str = "call of a non-function identifier";
pub const TYPE_NOT_MATCH: &str = "type not match";
pub const WRONG_STATEMENT: &str = "wrong statement";
pub const EXPECT_ARGUMENTS: &str = "expected arguments for function call";
pub const LESS_ARGUMENTS: &str = "too few arguments";
pub const MORE_ARGUMENTS: &str = "too many arguments";
pub const WRONG_TYPE_OF_ARGUMENT: &str = "wrong type of argument";
pub const COMPARE_TYPE_NOT_MATCH: &str = "comparison type not match";
pub const EXPECT_INT_CONDITION: &str = "expected int type in single expression condition";
pub const SWITCH_TYPE_NOT_MATCH: &str = "switched value and cased value type not match";
pub const WRONG_RETURN_TYPE: &str = "wrong type of return value";
pub const WRONG_VARIABLE_TYPE: &str = "variable type can't be void";
pub const WRONG_TYPE_OF_SCANF: &str = "scanf arguments must be int or char variables";
pub const SCANF_NO_ARGUMENTS: &str = "expected at least one argument for scanf";
pub const ARRAY_SIZE_ZERO: &str = "array size must be greater than 0";
pub const EXPECT_INT_ARRAY_INDEX: &str = "array index type should be int";
pub const LEFT_VALUE_NOT_VARIABLE: &str = "left value of assignment must be a variable";
pub const EXPECT_ARRAY_ELEMENT: &str = "expected an array element, not the entire array";
pub const ARRAY_INDEX_OVERFLOW: &str = "array index overflow";
pub const NOT_AN_ARRAY: &str = "array access on a non-array identifier";
