//! Expression productions and constant folding.
//!
//! Every expression non-terminal returns the operand text naming its
//! result (a literal, an identifier, or a fresh temporary) together
//! with its data type. Arithmetic over two constant operands is folded
//! in-process with 32-bit two's-complement wraparound; only when at
//! least one operand is non-constant does a TEMP + arithmetic quad
//! pair get emitted.

use c0c_lex::{ScanResult, TokenKind};
use c0c_mid::{const_operand, Op, Quad};
use c0c_tab::{DataType, Entry, EntryKind};

use crate::messages;
use crate::parser::{sync, ts, Parser};

/// Fallback operand returned after an error so parsing can continue.
fn poisoned() -> (String, DataType) {
    ("0".to_string(), DataType::Int)
}

impl<'a> Parser<'a> {
    /// `[ '+' | '-' ] term { ('+'|'-') term }`.
    pub(crate) fn expression(&mut self) -> ScanResult<(String, DataType)> {
        let (mut res, mut res_t);
        if self.sc.sym() == TokenKind::Plus || self.sc.sym() == TokenKind::Minus {
            let negated = self.sc.sym() == TokenKind::Minus;
            self.sc.advance()?;
            let (operand, _) = self.term()?;
            // a sign promotes the operand to int either way
            res_t = DataType::Int;
            if negated {
                if let Some(value) = const_operand(&operand) {
                    res = value.wrapping_neg().to_string();
                } else {
                    res = self.mid.gen_temp();
                    self.mid.emit(Op::Temp, "int", &res, "");
                    self.mid.emit(Op::Sub, "0", operand, &res);
                }
            } else if let Some(value) = const_operand(&operand) {
                res = value.to_string();
            } else {
                res = operand;
            }
        } else {
            let (operand, operand_t) = self.term()?;
            res = operand;
            res_t = operand_t;
        }
        while self.sc.sym() == TokenKind::Plus || self.sc.sym() == TokenKind::Minus {
            let op = if self.sc.sym() == TokenKind::Plus {
                Op::Add
            } else {
                Op::Sub
            };
            self.sc.advance()?;
            let (rhs, _) = self.term()?;
            match (const_operand(&res), const_operand(&rhs)) {
                (Some(a), Some(b)) => {
                    let folded = if op == Op::Add {
                        a.wrapping_add(b)
                    } else {
                        a.wrapping_sub(b)
                    };
                    res = folded.to_string();
                }
                _ => {
                    let dest = self.mid.gen_temp();
                    self.mid.emit(Op::Temp, "int", &dest, "");
                    self.mid.emit(op, &res, rhs, &dest);
                    res = dest;
                }
            }
            res_t = DataType::Int;
        }
        Ok((res, res_t))
    }

    /// `factor { ('*'|'/') factor }`.
    fn term(&mut self) -> ScanResult<(String, DataType)> {
        let (mut res, mut res_t) = self.factor()?;
        while self.sc.sym() == TokenKind::Star || self.sc.sym() == TokenKind::Slash {
            let op = if self.sc.sym() == TokenKind::Star {
                Op::Mul
            } else {
                Op::Div
            };
            self.sc.advance()?;
            let (rhs, _) = self.factor()?;
            let folded = match (const_operand(&res), const_operand(&rhs)) {
                // division by a literal zero is left to the emitted code
                (Some(a), Some(b)) if !(op == Op::Div && b == 0) => Some(if op == Op::Mul {
                    a.wrapping_mul(b)
                } else {
                    a.wrapping_div(b)
                }),
                _ => None,
            };
            match folded {
                Some(value) => res = value.to_string(),
                None => {
                    let dest = self.mid.gen_temp();
                    self.mid.emit(Op::Temp, "int", &dest, "");
                    self.mid.emit(op, &res, rhs, &dest);
                    res = dest;
                }
            }
            res_t = DataType::Int;
        }
        Ok((res, res_t))
    }

    /// `ident | ident[expr] | ident(args) | char-literal |
    /// ( expression ) | signed-int-literal`.
    fn factor(&mut self) -> ScanResult<(String, DataType)> {
        sync!(self, [Ident, CharLit, LParen, Plus, Minus, IntLit], poisoned());
        match self.sc.sym() {
            TokenKind::Ident => {
                let id = self.sc.ident().to_string();
                self.sc.advance()?;
                let entry = match self.tab.find(&id) {
                    None => {
                        self.error(messages::UNDEFINED_IDENTIFIER);
                        return Ok(poisoned());
                    }
                    Some(e) => e,
                };
                if entry.kind == EntryKind::Function {
                    return self.non_void_function_call(&id, entry);
                }
                if self.sc.sym() == TokenKind::LParen {
                    self.error(messages::NOT_A_FUNCTION);
                    return Ok(poisoned());
                }
                if entry.kind == EntryKind::Array {
                    return self.array_read(&id, entry);
                }
                if entry.kind == EntryKind::Const {
                    // constants are inlined as literal operands
                    if entry.dtype == DataType::Char {
                        Ok((
                            format!("'{}'", entry.value as u8 as char),
                            DataType::Char,
                        ))
                    } else {
                        Ok((entry.value.to_string(), DataType::Int))
                    }
                } else {
                    Ok((id, entry.dtype))
                }
            }
            TokenKind::CharLit => {
                let text = format!("'{}'", self.sc.char_value() as char);
                self.sc.advance()?;
                Ok((text, DataType::Char))
            }
            TokenKind::LParen => {
                self.sc.advance()?;
                let (res, _) = self.expression()?;
                // a parenthesised expression always yields int
                sync!(self, [RParen], (res, DataType::Int));
                self.sc.advance()?;
                Ok((res, DataType::Int))
            }
            _ => {
                let value = self.signed_integer()?;
                Ok((value.to_string(), DataType::Int))
            }
        }
    }

    /// An integer literal with an optional sign, decoded into `i32`.
    pub(crate) fn signed_integer(&mut self) -> ScanResult<i32> {
        let mut negative = false;
        if self.sc.sym() == TokenKind::Plus || self.sc.sym() == TokenKind::Minus {
            negative = self.sc.sym() == TokenKind::Minus;
            self.sc.advance()?;
        }
        sync!(self, [IntLit], 0);
        let value = if negative {
            self.sc.num().wrapping_neg()
        } else {
            self.sc.num()
        };
        self.sc.advance()?;
        Ok(value)
    }

    /// `ident [ expr ]` as a value; yields a fresh temporary.
    pub(crate) fn array_read(
        &mut self,
        id: &str,
        entry: Entry,
    ) -> ScanResult<(String, DataType)> {
        if self.sc.sym() != TokenKind::LBracket {
            self.error(messages::EXPECT_ARRAY_ELEMENT);
        }
        sync!(self, [LBracket], poisoned());
        self.sc.advance()?;
        let (index, index_t) = self.expression()?;
        if index_t != DataType::Int {
            self.error(messages::EXPECT_INT_ARRAY_INDEX);
        }
        if let Some(value) = const_operand(&index) {
            if value < 0 || value >= entry.value {
                self.error(messages::ARRAY_INDEX_OVERFLOW);
            }
        }
        let res = self.mid.gen_temp();
        self.mid.emit(Op::Temp, entry.dtype.tag(), &res, "");
        self.mid.emit(Op::RArray, id, index, &res);
        sync!(self, [RBracket], (res, entry.dtype));
        self.sc.advance()?;
        Ok((res, entry.dtype))
    }

    /// A call in expression position; the callee must return a value,
    /// which lands in a fresh temporary via GETRET.
    pub(crate) fn non_void_function_call(
        &mut self,
        id: &str,
        entry: Entry,
    ) -> ScanResult<(String, DataType)> {
        if entry.dtype == DataType::Void {
            self.error(messages::EXPECT_NON_VOID_FUNCTION);
            return Ok(poisoned());
        }
        let params = self.tab.params(id).to_vec();
        if self.sc.sym() == TokenKind::LParen {
            self.arguments_list(&params)?;
        } else if !params.is_empty() {
            self.error(messages::EXPECT_ARGUMENTS);
            return Ok(poisoned());
        }
        self.mid.emit(Op::Call, id, params.len().to_string(), "");
        let res = self.mid.gen_temp();
        self.mid.emit(Op::Temp, entry.dtype.tag(), &res, "");
        self.mid.emit(Op::GetRet, "", "", &res);
        Ok((res, entry.dtype))
    }

    /// `( expr { , expr } )` checked against the registered signature.
    ///
    /// The PUSH quads are buffered and emitted only after every
    /// argument expression has been evaluated, so they always sit
    /// contiguously in front of the CALL.
    pub(crate) fn arguments_list(&mut self, params: &[DataType]) -> ScanResult<()> {
        let mut pushes: Vec<Quad> = Vec::new();
        let mut count = 0usize;
        self.sc.advance()?; // past `(`
        loop {
            let (value, dtype) = self.expression()?;
            count += 1;
            if count > params.len() {
                self.error(messages::MORE_ARGUMENTS);
                return Ok(());
            }
            if params[count - 1] != dtype {
                self.error(messages::WRONG_TYPE_OF_ARGUMENT);
                return Ok(());
            }
            pushes.push(Quad::new(Op::Push, dtype.tag(), value, ""));
            if self.sc.sym() != TokenKind::Comma {
                break;
            }
            self.sc.advance()?;
        }
        for quad in pushes {
            self.mid.emit_quad(quad);
        }
        if count < params.len() {
            self.error(messages::LESS_ARGUMENTS);
            return Ok(());
        }
        sync!(self, [RParen]);
        self.sc.advance()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{parse_errors, parse_ok, printed};
    use c0c_mid::Op;

    #[test]
    fn test_constant_folding_simple() {
        // k + 4 folds to 7, leaving one ASSIGN and no ADD
        let quads = parse_ok("const int k = 3;\nint x;\nvoid main(){ x = k + 4; }");
        assert_eq!(
            printed(&quads),
            ["var int x", "void main()", "x = 7", "end"]
        );
        assert!(quads.iter().all(|q| q.op != Op::Add));
    }

    #[test]
    fn test_constant_folding_precedence() {
        let quads = parse_ok("int x;\nvoid main(){ x = 2 + 3 * 4 - 6 / 2; }");
        assert!(printed(&quads).contains(&"x = 11".to_string()));
    }

    #[test]
    fn test_constant_folding_parenthesised() {
        let quads = parse_ok("int x;\nvoid main(){ x = (2 + 3) * 4; }");
        assert!(printed(&quads).contains(&"x = 20".to_string()));
    }

    #[test]
    fn test_constant_folding_unary_minus() {
        let quads = parse_ok("int x;\nvoid main(){ x = -3 + 10; }");
        assert!(printed(&quads).contains(&"x = 7".to_string()));
    }

    #[test]
    fn test_constant_folding_char_literals() {
        // 'a' is 97; 'a' * 2 folds as an int
        let quads = parse_ok("int x;\nvoid main(){ x = 'a' * 2; }");
        assert!(printed(&quads).contains(&"x = 194".to_string()));
    }

    #[test]
    fn test_folding_wraps_around() {
        let quads = parse_ok("int x;\nvoid main(){ x = 2147483647 + 1; }");
        assert!(printed(&quads).contains(&"x = -2147483648".to_string()));
    }

    #[test]
    fn test_division_by_zero_not_folded() {
        let quads = parse_ok("int x;\nvoid main(){ x = 4 / 0; }");
        assert!(quads.iter().any(|q| q.op == Op::Div));
    }

    #[test]
    fn test_non_constant_spills_to_temp() {
        let quads = parse_ok("int x; int y;\nvoid main(){ x = y + 1; }");
        assert_eq!(
            printed(&quads),
            [
                "var int x",
                "var int y",
                "void main()",
                "temp int $t_0",
                "$t_0 = y + 1",
                "x = $t_0",
                "end",
            ]
        );
    }

    #[test]
    fn test_unary_minus_on_variable() {
        let quads = parse_ok("int x; int y;\nvoid main(){ x = -y; }");
        let text = printed(&quads);
        assert!(text.contains(&"$t_0 = 0 - y".to_string()));
    }

    #[test]
    fn test_parenthesised_char_promotes_to_int() {
        // ('p') is int, so assigning it to a char variable is an error
        let errors = parse_errors("char c;\nvoid main(){ c = ('p'); }");
        assert!(errors.iter().any(|m| m == "type not match"));
    }

    #[test]
    fn test_char_variable_keeps_type() {
        let quads = parse_ok("char c; char d;\nvoid main(){ c = d; }");
        assert!(printed(&quads).contains(&"c = d".to_string()));
    }

    #[test]
    fn test_array_read_yields_temp() {
        let quads = parse_ok(
            "void main(){ int a[3]; int x; a[0] = 1; x = a[0] + a[1]; }",
        );
        let text = printed(&quads);
        assert!(text.contains(&"$t_0 = a[0]".to_string()));
        assert!(text.contains(&"$t_1 = a[1]".to_string()));
        assert!(text.contains(&"$t_2 = $t_0 + $t_1".to_string()));
    }

    #[test]
    fn test_whole_array_in_expression_rejected() {
        let errors = parse_errors("int a[3]; int x;\nvoid main(){ x = a; }");
        assert!(errors
            .iter()
            .any(|m| m == "expected an array element, not the entire array"));
    }

    #[test]
    fn test_call_in_expression_gets_return_value() {
        let quads = parse_ok(
            "int twice(int n){ return(n * 2); }\nvoid main(){ int x; x = twice(4); }",
        );
        assert_eq!(
            printed(&quads),
            [
                "int twice()",
                "para int n",
                "temp int $t_0",
                "$t_0 = n * 2",
                "ret $t_0",
                "end",
                "void main()",
                "var int x",
                "push int 4",
                "call twice",
                "temp int $t_1",
                "getret $t_1",
                "x = $t_1",
                "end",
            ]
        );
    }

    #[test]
    fn test_void_call_in_expression_rejected() {
        let errors = parse_errors(
            "void nop(int a){ return; }\nint x;\nvoid main(){ x = nop(1); }",
        );
        assert!(errors
            .iter()
            .any(|m| m == "expected function call with a return value"));
    }

    #[test]
    fn test_too_many_arguments() {
        let errors = parse_errors(
            "int f(int a){ return(a); }\nvoid main(){ f(1, 2); }",
        );
        assert!(errors.iter().any(|m| m == "too many arguments"));
    }

    #[test]
    fn test_too_few_arguments() {
        let errors = parse_errors(
            "int f(int a, int b){ return(a); }\nvoid main(){ f(1); }",
        );
        assert!(errors.iter().any(|m| m == "too few arguments"));
    }

    #[test]
    fn test_wrong_argument_type() {
        let errors = parse_errors(
            "int f(int a){ return(a); }\nvoid main(){ f('c'); }",
        );
        assert!(errors.iter().any(|m| m == "wrong type of argument"));
    }

    #[test]
    fn test_undefined_identifier_in_expression() {
        let errors = parse_errors("int x;\nvoid main(){ x = nope; }");
        assert!(errors
            .iter()
            .any(|m| m == "reference of undefined identifier"));
    }

    #[test]
    fn test_signed_integer_wrapping() {
        // -(-2147483648) wraps back to itself
        let quads = parse_ok("int x;\nvoid main(){ x = -2147483648; }");
        assert!(printed(&quads).contains(&"x = -2147483648".to_string()));
    }
}
