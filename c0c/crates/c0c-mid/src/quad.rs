//! Quadruple operations, the quad struct, and its text format.

use std::fmt;

/// Operation of a quadruple. The slot meaning per operation is fixed;
/// see the match in [`Quad::fmt`] for the printed shape of each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    /// Function header: `a` = return-type tag, `b` = name.
    Func,
    /// Parameter declaration: `a` = type tag, `b` = name.
    Para,
    /// Global variable: `a` = type tag, `b` = name, `res` = array
    /// length or empty.
    GVar,
    /// Local variable, same slots as [`Op::GVar`].
    Var,
    /// Argument push: `a` = type tag, `b` = value operand.
    Push,
    /// Call: `a` = function name, `b` = decimal arity.
    Call,
    /// Return: `a` = value operand or empty.
    Ret,
    /// Store `$v0` into `res` after a call.
    GetRet,
    /// Array write: `a[b] = res`.
    WArray,
    /// Array read: `res = a[b]`.
    RArray,
    /// Output: `a` = category (`str`/`int`/`char`), `b` = operand.
    Write,
    /// Input: `a` = type tag, `b` = variable name.
    Read,
    /// Comparison feeding the next branch: `a` = left, `b` = operator
    /// text or empty (truthiness form), `res` = right or empty.
    Compare,
    /// End of function.
    End,
    Label,
    Goto,
    /// Branch to `a` when the preceding compare is false.
    Bz,
    /// Branch to `a` when the preceding compare is true.
    Bnz,
    /// Temporary declaration: `a` = type tag, `b` = temp name. Needed
    /// so the frame-layout pass can size the frame.
    Temp,
}

/// One IR instruction. Empty strings mean "slot unused".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quad {
    pub op: Op,
    pub a: String,
    pub b: String,
    pub res: String,
}

impl Quad {
    pub fn new(
        op: Op,
        a: impl Into<String>,
        b: impl Into<String>,
        res: impl Into<String>,
    ) -> Self {
        Self {
            op,
            a: a.into(),
            b: b.into(),
            res: res.into(),
        }
    }
}

impl fmt::Display for Quad {
    /// One quadruple per line, missing fields elided.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Op::Assign => write!(f, "{} = {}", self.res, self.a),
            Op::Add => write!(f, "{} = {} + {}", self.res, self.a, self.b),
            Op::Sub => write!(f, "{} = {} - {}", self.res, self.a, self.b),
            Op::Mul => write!(f, "{} = {} * {}", self.res, self.a, self.b),
            Op::Div => write!(f, "{} = {} / {}", self.res, self.a, self.b),
            Op::WArray => write!(f, "{}[{}] = {}", self.a, self.b, self.res),
            Op::RArray => write!(f, "{} = {}[{}]", self.res, self.a, self.b),
            Op::Compare => {
                if self.b.is_empty() {
                    write!(f, "{}", self.a)
                } else {
                    write!(f, "{} {} {}", self.a, self.b, self.res)
                }
            }
            Op::Func => write!(f, "{} {}()", self.a, self.b),
            Op::Para => write!(f, "para {} {}", self.a, self.b),
            Op::GVar | Op::Var => {
                if self.res.is_empty() {
                    write!(f, "var {} {}", self.a, self.b)
                } else {
                    write!(f, "var {} {} {}", self.a, self.b, self.res)
                }
            }
            Op::Push => write!(f, "push {} {}", self.a, self.b),
            Op::Call => write!(f, "call {}", self.a),
            Op::Ret => {
                if self.a.is_empty() {
                    write!(f, "ret")
                } else {
                    write!(f, "ret {}", self.a)
                }
            }
            Op::GetRet => write!(f, "getret {}", self.res),
            Op::Write => write!(f, "printf {} {}", self.a, self.b),
            Op::Read => write!(f, "scanf {} {}", self.a, self.b),
            Op::End => write!(f, "end"),
            Op::Label => write!(f, "label {}", self.a),
            Op::Goto => write!(f, "goto {}", self.a),
            Op::Bz => write!(f, "bz {}", self.a),
            Op::Bnz => write!(f, "bnz {}", self.a),
            Op::Temp => write!(f, "temp {} {}", self.a, self.b),
        }
    }
}

/// Decodes a constant operand, if `text` is one.
///
/// A constant operand is either a single-quoted character (`'x'`, whose
/// value is the character's ASCII code) or a decimal integer literal
/// with an optional leading `-`.
///
/// # Examples
///
/// ```
/// use c0c_mid::const_operand;
///
/// assert_eq!(const_operand("42"), Some(42));
/// assert_eq!(const_operand("-7"), Some(-7));
/// assert_eq!(const_operand("'a'"), Some(97));
/// assert_eq!(const_operand("$t_0"), None);
/// assert_eq!(const_operand("count"), None);
/// ```
pub fn const_operand(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b'\'') => bytes.get(1).map(|&b| i32::from(b)),
        Some(b) if b.is_ascii_digit() || *b == b'-' => text.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(op: Op, a: &str, b: &str, res: &str) -> String {
        Quad::new(op, a, b, res).to_string()
    }

    #[test]
    fn test_format_assign_and_arith() {
        assert_eq!(quad(Op::Assign, "7", "", "x"), "x = 7");
        assert_eq!(quad(Op::Add, "a", "b", "$t_0"), "$t_0 = a + b");
        assert_eq!(quad(Op::Sub, "0", "a", "$t_1"), "$t_1 = 0 - a");
        assert_eq!(quad(Op::Mul, "a", "4", "$t_2"), "$t_2 = a * 4");
        assert_eq!(quad(Op::Div, "a", "2", "$t_3"), "$t_3 = a / 2");
    }

    #[test]
    fn test_format_arrays() {
        assert_eq!(quad(Op::WArray, "a", "0", "1"), "a[0] = 1");
        assert_eq!(quad(Op::RArray, "a", "$t_0", "$t_1"), "$t_1 = a[$t_0]");
    }

    #[test]
    fn test_format_compare_forms() {
        assert_eq!(quad(Op::Compare, "x", "==", "3"), "x == 3");
        assert_eq!(quad(Op::Compare, "x", "", ""), "x");
    }

    #[test]
    fn test_format_function_shapes() {
        assert_eq!(quad(Op::Func, "int", "sum", ""), "int sum()");
        assert_eq!(quad(Op::Para, "int", "a", ""), "para int a");
        assert_eq!(quad(Op::Push, "int", "1", ""), "push int 1");
        assert_eq!(quad(Op::Call, "sum", "2", ""), "call sum");
        assert_eq!(quad(Op::Ret, "$t_0", "", ""), "ret $t_0");
        assert_eq!(quad(Op::Ret, "", "", ""), "ret");
        assert_eq!(quad(Op::GetRet, "", "", "$t_1"), "getret $t_1");
        assert_eq!(quad(Op::End, "", "", ""), "end");
    }

    #[test]
    fn test_format_vars() {
        assert_eq!(quad(Op::GVar, "int", "x", ""), "var int x");
        assert_eq!(quad(Op::Var, "int", "a", "3"), "var int a 3");
        assert_eq!(quad(Op::Temp, "int", "$t_0", ""), "temp int $t_0");
    }

    #[test]
    fn test_format_io() {
        assert_eq!(quad(Op::Write, "str", "$STRING_0", ""), "printf str $STRING_0");
        assert_eq!(quad(Op::Write, "int", "x", ""), "printf int x");
        assert_eq!(quad(Op::Read, "char", "c", ""), "scanf char c");
    }

    #[test]
    fn test_format_control_flow() {
        assert_eq!(quad(Op::Label, "$LABEL_0", "", ""), "label $LABEL_0");
        assert_eq!(quad(Op::Goto, "$IF_1_END", "", ""), "goto $IF_1_END");
        assert_eq!(quad(Op::Bz, "$ELSE_1", "", ""), "bz $ELSE_1");
        assert_eq!(quad(Op::Bnz, "$LABEL_2", "", ""), "bnz $LABEL_2");
    }

    #[test]
    fn test_const_operand_integers() {
        assert_eq!(const_operand("0"), Some(0));
        assert_eq!(const_operand("123"), Some(123));
        assert_eq!(const_operand("-123"), Some(-123));
        assert_eq!(const_operand("2147483647"), Some(i32::MAX));
    }

    #[test]
    fn test_const_operand_characters() {
        assert_eq!(const_operand("'0'"), Some(48));
        assert_eq!(const_operand("'z'"), Some(122));
    }

    #[test]
    fn test_const_operand_rejects_names() {
        assert_eq!(const_operand("x"), None);
        assert_eq!(const_operand("$t_3"), None);
        assert_eq!(const_operand("$LABEL_1"), None);
        assert_eq!(const_operand(""), None);
        assert_eq!(const_operand("-"), None);
    }
}
