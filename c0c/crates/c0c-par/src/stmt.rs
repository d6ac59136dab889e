//! Statement productions: blocks, if/else, do-while, switch-case,
//! printf/scanf, return, assignments and call statements.

use c0c_lex::{ScanResult, TokenKind, TokenSet};
use c0c_mid::{const_operand, Op};
use c0c_tab::{DataType, EntryKind};

use crate::messages;
use crate::parser::{sync, ts, Parser};

impl<'a> Parser<'a> {
    /// `{ stmt } '}'`, consuming the closing brace.
    pub(crate) fn statements_list(&mut self) -> ScanResult<()> {
        while self.sc.sym() != TokenKind::RBrace {
            self.statement()?;
        }
        self.sc.advance()?;
        Ok(())
    }

    /// Dispatches one statement on its first token.
    pub(crate) fn statement(&mut self) -> ScanResult<()> {
        match self.sc.sym() {
            TokenKind::Semicolon => self.sc.advance(), // empty statement
            TokenKind::LBrace => {
                self.sc.advance()?;
                self.statements_list()
            }
            TokenKind::If => self.if_else_statement(),
            TokenKind::Do => self.do_while_statement(),
            TokenKind::Switch => self.switch_case_statement(),
            TokenKind::Printf => self.printf_statement(),
            TokenKind::Scanf => self.scanf_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Ident => {
                // assignment or call; the symbol table decides
                let id = self.sc.ident().to_string();
                self.sc.advance()?;
                match self.sc.sym() {
                    TokenKind::LBracket => self.array_assignment_statement(&id),
                    TokenKind::Assign => self.assignment_statement(&id),
                    TokenKind::LParen | TokenKind::Semicolon => {
                        self.function_call_statement(&id)
                    }
                    _ => {
                        self.error(messages::WRONG_STATEMENT);
                        Ok(())
                    }
                }
            }
            _ => self.sync(
                ts![Semicolon, LBrace, If, Do, Switch, Printf, Scanf, Return, Ident],
                TokenSet::EMPTY,
            ),
        }
    }

    /// `if ( condition ) stmt else stmt`. The else arm is mandatory.
    fn if_else_statement(&mut self) -> ScanResult<()> {
        let labels = self.mid.gen_if_labels();

        self.sc.advance()?;
        sync!(self, [LParen]);
        self.sc.advance()?;
        self.condition()?;
        sync!(self, [RParen]);
        self.sc.advance()?;
        // branch away when the condition does not hold
        self.mid.emit(Op::Bz, &labels.else_label, "", "");
        self.mid.emit(Op::Label, &labels.then_label, "", "");
        self.statement()?;
        self.mid.emit(Op::Goto, &labels.end_label, "", "");
        sync!(self, [Else]);
        self.sc.advance()?;
        self.mid.emit(Op::Label, &labels.else_label, "", "");
        self.statement()?;
        self.mid.emit(Op::Label, &labels.end_label, "", "");
        Ok(())
    }

    /// A condition leaves its outcome for the branch that follows; it
    /// emits exactly one COMPARE and no value.
    fn condition(&mut self) -> ScanResult<()> {
        let (left, left_t) = self.expression()?;
        if let Some(op_text) = self.sc.sym().compare_text() {
            self.sc.advance()?;
            let (right, right_t) = self.expression()?;
            if left_t != right_t {
                self.error(messages::COMPARE_TYPE_NOT_MATCH);
            }
            self.mid.emit(Op::Compare, left, op_text, right);
        } else {
            // bare expression: truthiness form, int only
            if left_t != DataType::Int {
                self.error(messages::EXPECT_INT_CONDITION);
            }
            self.mid.emit(Op::Compare, left, "", "");
        }
        Ok(())
    }

    /// `do stmt while ( condition )`.
    fn do_while_statement(&mut self) -> ScanResult<()> {
        let begin_label = self.mid.gen_label();

        self.sc.advance()?;
        self.mid.emit(Op::Label, &begin_label, "", "");
        self.statement()?;
        sync!(self, [While]);
        self.sc.advance()?;
        sync!(self, [LParen]);
        self.sc.advance()?;
        self.condition()?;
        // loop back while the condition holds
        self.mid.emit(Op::Bnz, &begin_label, "", "");
        sync!(self, [RParen]);
        self.sc.advance()?;
        Ok(())
    }

    /// `switch ( expr ) { case …: stmt … default: stmt }`.
    ///
    /// Dispatch compares are emitted up front; the case bodies are
    /// deferred and replayed after the default clause so the printed
    /// order is dispatches, default, bodies, end label.
    fn switch_case_statement(&mut self) -> ScanResult<()> {
        let end_label = self.mid.gen_label();

        self.sc.advance()?;
        sync!(self, [LParen]);
        self.sc.advance()?;
        let (switched, switched_t) = self.expression()?;
        sync!(self, [RParen]);
        self.sc.advance()?;
        sync!(self, [LBrace]);
        self.sc.advance()?;
        self.mid.push_deferred();
        loop {
            self.case_item(&switched, switched_t, &end_label)?;
            if self.sc.sym() == TokenKind::RBrace {
                break;
            }
        }
        self.mid.flush_deferred();
        self.mid.emit(Op::Label, &end_label, "", "");
        self.sc.advance()?; // past `}`
        Ok(())
    }

    /// One `case value:` or `default:` clause.
    ///
    /// The case value must be a signed integer literal or a character
    /// literal agreeing with the switched expression's type; named
    /// constants are not admitted here. Duplicate case values are
    /// accepted; only the first matching dispatch is ever taken.
    fn case_item(
        &mut self,
        switched: &str,
        switched_t: DataType,
        end_label: &str,
    ) -> ScanResult<()> {
        sync!(self, [Case, Default]);
        if self.sc.sym() == TokenKind::Case {
            self.sc.advance()?;
            sync!(self, [CharLit, Minus, Plus, IntLit]);
            let (cased_val, cased_t) = if self.sc.sym() == TokenKind::CharLit {
                let text = format!("'{}'", self.sc.char_value() as char);
                self.sc.advance()?;
                (text, DataType::Char)
            } else {
                (self.signed_integer()?.to_string(), DataType::Int)
            };
            if switched_t != cased_t {
                self.error(messages::SWITCH_TYPE_NOT_MATCH);
                return Ok(());
            }
            sync!(self, [Colon]);
            self.sc.advance()?;
            let case_label = self.mid.gen_label();
            // dispatch goes straight out
            self.mid.emit(Op::Compare, switched, "==", cased_val);
            self.mid.emit(Op::Bnz, &case_label, "", "");
            // the body is held back until the switch closes
            self.mid.begin_defer();
            self.mid.emit(Op::Label, &case_label, "", "");
            self.statement()?;
            self.mid.emit(Op::Goto, end_label, "", "");
            self.mid.end_defer();
        } else {
            // default clause, emitted in place between the dispatches
            // and the replayed bodies
            self.sc.advance()?;
            sync!(self, [Colon]);
            self.sc.advance()?;
            let default_label = self.mid.gen_label();
            self.mid.emit(Op::Label, &default_label, "", "");
            self.statement()?;
            self.mid.emit(Op::Goto, end_label, "", "");
        }
        Ok(())
    }

    /// `printf ( "s" )`, `printf ( "s", expr )` or `printf ( expr )`.
    fn printf_statement(&mut self) -> ScanResult<()> {
        self.sc.advance()?;
        sync!(self, [LParen]);
        self.sc.advance()?;
        if self.sc.sym() == TokenKind::StrLit {
            let label = self.strings.label(self.sc.string_value());
            self.mid.emit(Op::Write, "str", label, "");
            self.sc.advance()?;
            if self.sc.sym() == TokenKind::Comma {
                self.sc.advance()?;
                let (value, dtype) = self.expression()?;
                self.mid.emit(Op::Write, write_tag(dtype), value, "");
            }
        } else {
            let (value, dtype) = self.expression()?;
            self.mid.emit(Op::Write, write_tag(dtype), value, "");
        }
        sync!(self, [RParen]);
        self.sc.advance()?;
        sync!(self, [Semicolon]);
        self.sc.advance()?;
        Ok(())
    }

    /// `scanf ( ident { , ident } )`; every argument must be an int or
    /// char variable.
    fn scanf_statement(&mut self) -> ScanResult<()> {
        self.sc.advance()?;
        sync!(self, [LParen]);
        self.sc.advance()?;
        if self.sc.sym() == TokenKind::RParen {
            self.error(messages::SCANF_NO_ARGUMENTS);
            self.sc.advance()?;
            sync!(self, [Semicolon]);
            self.sc.advance()?;
            return Ok(());
        }
        loop {
            sync!(self, [Ident]);
            let id = self.sc.ident().to_string();
            self.sc.advance()?;
            let entry = self.tab.find(&id);
            match entry {
                None => self.error(messages::UNDEFINED_IDENTIFIER),
                Some(e)
                    if e.kind != EntryKind::Variable
                        || (e.dtype != DataType::Int && e.dtype != DataType::Char) =>
                {
                    self.error(messages::WRONG_TYPE_OF_SCANF)
                }
                _ => {}
            }
            let tag = match entry {
                Some(e) if e.dtype == DataType::Char => "char",
                _ => "int",
            };
            self.mid.emit(Op::Read, tag, &id, "");
            if self.sc.sym() != TokenKind::Comma {
                break;
            }
            self.sc.advance()?;
        }
        sync!(self, [RParen]);
        self.sc.advance()?;
        sync!(self, [Semicolon]);
        self.sc.advance()?;
        Ok(())
    }

    /// `return ;` or `return ( expr ) ;`, checked against the enclosing
    /// function's return type.
    fn return_statement(&mut self) -> ScanResult<()> {
        self.sc.advance()?;
        sync!(self, [LParen, Semicolon]);
        let ret_t = if self.sc.sym() == TokenKind::LParen {
            self.sc.advance()?;
            let (value, dtype) = self.expression()?;
            self.mid.emit(Op::Ret, value, "", "");
            sync!(self, [RParen]);
            self.sc.advance()?;
            dtype
        } else {
            self.mid.emit(Op::Ret, "", "", "");
            DataType::Void
        };
        if ret_t != self.current_function.dtype {
            self.error(messages::WRONG_RETURN_TYPE);
        }
        sync!(self, [Semicolon]);
        self.sc.advance()?;
        Ok(())
    }

    /// `ident = expr ;` with the cursor on `=`.
    fn assignment_statement(&mut self, id: &str) -> ScanResult<()> {
        self.sc.advance()?;
        let entry = match self.tab.find(id) {
            None => {
                self.error(messages::UNDEFINED_IDENTIFIER);
                return Ok(());
            }
            Some(e) => e,
        };
        if entry.kind != EntryKind::Variable {
            self.error(messages::LEFT_VALUE_NOT_VARIABLE);
            return Ok(());
        }
        let (rvalue, rvalue_t) = self.expression()?;
        if rvalue_t != entry.dtype {
            self.error(messages::TYPE_NOT_MATCH);
            return Ok(());
        }
        self.mid.emit(Op::Assign, rvalue, "", id);
        sync!(self, [Semicolon]);
        self.sc.advance()?;
        Ok(())
    }

    /// `ident [ expr ] = expr ;` with the cursor on `[`.
    fn array_assignment_statement(&mut self, id: &str) -> ScanResult<()> {
        let entry = match self.tab.find(id) {
            None => {
                self.error(messages::UNDEFINED_IDENTIFIER);
                return Ok(());
            }
            Some(e) => e,
        };
        if entry.kind != EntryKind::Array {
            self.error(messages::NOT_AN_ARRAY);
            return Ok(());
        }
        self.sc.advance()?; // past `[`
        let (index, index_t) = self.expression()?;
        if index_t != DataType::Int {
            self.error(messages::EXPECT_INT_ARRAY_INDEX);
        }
        // constant subscripts are bounds-checked at compile time
        if let Some(value) = const_operand(&index) {
            if value < 0 || value >= entry.value {
                self.error(messages::ARRAY_INDEX_OVERFLOW);
            }
        }
        sync!(self, [RBracket]);
        self.sc.advance()?;
        sync!(self, [Assign]);
        self.sc.advance()?;
        let (rvalue, rvalue_t) = self.expression()?;
        if rvalue_t != entry.dtype {
            self.error(messages::TYPE_NOT_MATCH);
        }
        self.mid.emit(Op::WArray, id, index, rvalue);
        sync!(self, [Semicolon]);
        self.sc.advance()?;
        Ok(())
    }

    /// A call used as a statement; the return value, if any, is
    /// dropped, so no GETRET is emitted.
    fn function_call_statement(&mut self, id: &str) -> ScanResult<()> {
        let entry = match self.tab.find(id) {
            None => {
                self.error(messages::UNDEFINED_IDENTIFIER);
                return Ok(());
            }
            Some(e) => e,
        };
        if entry.kind != EntryKind::Function {
            self.error(messages::NOT_A_FUNCTION);
            return Ok(());
        }
        let params = self.tab.params(id).to_vec();
        if self.sc.sym() == TokenKind::LParen {
            self.arguments_list(&params)?;
        } else if !params.is_empty() {
            self.error(messages::EXPECT_ARGUMENTS);
            return Ok(());
        }
        self.mid.emit(Op::Call, id, params.len().to_string(), "");
        if !self.sync_or_bail(ts![Semicolon], TokenSet::EMPTY)? {
            return Ok(());
        }
        self.sc.advance()?;
        Ok(())
    }
}

/// WRITE category tag for a printed expression.
fn write_tag(dtype: DataType) -> &'static str {
    match dtype {
        DataType::Int => "int",
        _ => "char",
    }
}
