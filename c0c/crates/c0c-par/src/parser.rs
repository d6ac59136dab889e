//! The parser core: state, synchronisation helpers, and the
//! program-level productions (const definitions, global variables,
//! function definitions, `main`).

use c0c_lex::{FatalError, ScanResult, Scanner, TokenKind, TokenSet};
use c0c_mid::{MidBuffer, Op, Quad};
use c0c_tab::{DataType, Entry, Scope, StringPool, SymbolTable};
use c0c_util::Handler;

use crate::messages;

/// Builds a [`TokenSet`] from bare kind names.
macro_rules! ts {
    ($($kind:ident),+ $(,)?) => {
        c0c_lex::TokenSet::of(&[$(c0c_lex::TokenKind::$kind),+])
    };
}

/// Synchronises on an expected set and bails out of the calling
/// non-terminal when recovery only reached a follow-set token.
///
/// `sync!(self, [A, B])` uses the statement-recovery follow set
/// (`}` and `;`); `sync!(self, [A, B], ret)` returns `Ok(ret)` on
/// bail-out instead of `Ok(())`.
macro_rules! sync {
    ($self:ident, [$($kind:ident),+ $(,)?]) => {
        sync!($self, [$($kind),+], ())
    };
    ($self:ident, [$($kind:ident),+ $(,)?], $ret:expr) => {
        if !$self.guard(ts![$($kind),+])? {
            return Ok($ret);
        }
    };
}

pub(crate) use sync;
pub(crate) use ts;

/// Tokens a failed statement-level recovery stops at.
const STMT_RECOVERY: TokenSet = ts![RBrace, Semicolon];

/// Everything the parser produces for the back end.
pub struct FrontendOutput {
    /// The quadruple stream, in final order.
    pub quads: Vec<Quad>,
    /// Symbol table with the global tier populated (locals cleared).
    pub table: SymbolTable,
    /// Deduplicated string literals.
    pub strings: StringPool,
}

/// The single-pass front end: scanner, symbol table, string pool and
/// IR sink threaded together.
pub struct Parser<'a> {
    pub(crate) sc: Scanner<'a>,
    pub(crate) diag: &'a Handler,
    pub(crate) tab: SymbolTable,
    pub(crate) strings: StringPool,
    pub(crate) mid: MidBuffer,
    /// Return type of the function being parsed, for `return` checks.
    pub(crate) current_function: Entry,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `source` reporting to `diag`.
    pub fn new(source: &'a str, diag: &'a Handler) -> Self {
        Self {
            sc: Scanner::new(source, diag),
            diag,
            tab: SymbolTable::new(),
            strings: StringPool::new(),
            mid: MidBuffer::new(),
            current_function: Entry::function(DataType::Void),
        }
    }

    /// Parses a whole program.
    ///
    /// The grammar is `const-defs { global-decl } main-func`; the loop
    /// ends only once `main`'s definition has been consumed, and the
    /// scanner then verifies nothing but blanks follow it.
    pub fn parse(mut self) -> Result<FrontendOutput, FatalError> {
        self.sc.advance()?;
        self.const_definitions(Scope::Global)?;
        loop {
            self.sync(ts![Int, Char, Void], TokenSet::EMPTY)?;
            let dtype = match self.sc.sym() {
                TokenKind::Int => DataType::Int,
                TokenKind::Char => DataType::Char,
                _ => DataType::Void,
            };
            self.sc.advance()?;
            if self.sc.sym() == TokenKind::Main {
                if dtype != DataType::Void {
                    self.error(messages::WRONG_TYPE_OF_MAIN);
                }
                self.main_function()?;
                break;
            }
            self.sync(ts![Ident], ts![Int, Char, Void])?;
            if self.sc.sym() != TokenKind::Ident {
                continue;
            }
            let id = self.sc.ident().to_string();
            self.sc.advance()?;
            self.sync(
                ts![Comma, Semicolon, LBracket, LBrace, LParen],
                TokenSet::EMPTY,
            )?;
            match self.sc.sym() {
                TokenKind::Comma | TokenKind::Semicolon | TokenKind::LBracket => {
                    self.global_variable_item(dtype, id)?;
                }
                _ => {
                    self.function_definition(dtype, &id)?;
                    self.tab.clear_local();
                }
            }
        }
        self.sc.check_trailing()?;
        Ok(FrontendOutput {
            quads: self.mid.into_quads(),
            table: self.tab,
            strings: self.strings,
        })
    }

    // ------------------------------------------------------------------
    // Synchronisation helpers
    // ------------------------------------------------------------------

    /// Records a diagnostic at the current token.
    pub(crate) fn error(&self, message: &str) {
        self.diag.error(message, self.sc.snippet());
    }

    /// Skips tokens until one from `stop` is current.
    fn skip(&mut self, stop: TokenSet) -> ScanResult<()> {
        while !stop.contains(self.sc.sym()) {
            self.sc.advance()?;
        }
        Ok(())
    }

    /// The plain two-set synchronisation: on a mismatch, diagnose and
    /// skip to `expected ∪ follow`.
    pub(crate) fn sync(&mut self, expected: TokenSet, follow: TokenSet) -> ScanResult<()> {
        if !expected.contains(self.sc.sym()) {
            self.error(&format!(
                "expected {} before {}",
                expected.describe(),
                self.sc.sym().describe()
            ));
            self.skip(expected.union(follow))?;
        }
        Ok(())
    }

    /// Synchronises and reports whether the caller may proceed.
    ///
    /// When recovery stopped on a follow-set token instead of an
    /// expected one, one more token is consumed and `Ok(false)` tells
    /// the calling non-terminal to bail out.
    pub(crate) fn sync_or_bail(
        &mut self,
        expected: TokenSet,
        follow: TokenSet,
    ) -> ScanResult<bool> {
        self.sync(expected, follow)?;
        if !expected.contains(self.sc.sym()) {
            self.sc.advance()?;
            return Ok(false);
        }
        Ok(true)
    }

    /// [`Parser::sync_or_bail`] against the statement-recovery set.
    pub(crate) fn guard(&mut self, expected: TokenSet) -> ScanResult<bool> {
        self.sync_or_bail(expected, STMT_RECOVERY)
    }

    /// Reports a duplicate-name insertion with the scope-appropriate
    /// message.
    pub(crate) fn insert_or_diag(&mut self, name: &str, entry: Entry) {
        if self.tab.insert(name, entry).is_err() {
            self.error(match entry.scope {
                Scope::Global => messages::DUPLICATE_GLOBAL,
                Scope::Local => messages::DUPLICATE_LOCAL,
            });
        }
    }

    // ------------------------------------------------------------------
    // Const and variable definitions
    // ------------------------------------------------------------------

    /// `{ 'const' (int|char) ident '=' literal { ',' … } ';' }`
    pub(crate) fn const_definitions(&mut self, scope: Scope) -> ScanResult<()> {
        while self.sc.sym() == TokenKind::Const {
            self.const_definition(scope)?;
        }
        Ok(())
    }

    /// One `const` definition line. The literal value is stored in the
    /// symbol table only; uses are inlined, so no IR is emitted.
    fn const_definition(&mut self, scope: Scope) -> ScanResult<()> {
        self.sc.advance()?;
        sync!(self, [Int, Char]);
        let dtype = if self.sc.sym() == TokenKind::Int {
            DataType::Int
        } else {
            DataType::Char
        };
        loop {
            self.sc.advance()?; // past the type keyword or a comma
            sync!(self, [Ident]);
            let id = self.sc.ident().to_string();
            self.sc.advance()?;
            sync!(self, [Assign]);
            self.sc.advance()?;
            let entry = if dtype == DataType::Int {
                let value = self.signed_integer()?;
                Entry::constant(scope, DataType::Int, value)
            } else {
                sync!(self, [CharLit]);
                let value = i32::from(self.sc.char_value());
                self.sc.advance()?;
                Entry::constant(scope, DataType::Char, value)
            };
            self.insert_or_diag(&id, entry);
            if self.sc.sym() != TokenKind::Comma {
                break;
            }
        }
        // A following `const` means the terminator was forgotten; the
        // recovery already reported it, continue with the next line.
        self.sync(ts![Semicolon], ts![Semicolon, RBrace, Const])?;
        if self.sc.sym() == TokenKind::Const {
            return Ok(());
        }
        sync!(self, [Semicolon]);
        self.sc.advance()?;
        Ok(())
    }

    /// Global variable definitions after `type ident`, covering the
    /// `[n]` array suffix and the comma-separated tail.
    fn global_variable_item(&mut self, dtype: DataType, id: String) -> ScanResult<()> {
        if dtype == DataType::Void {
            self.error(messages::WRONG_VARIABLE_TYPE);
        }
        let tag = dtype.tag();
        let mut id = id;
        loop {
            // the cursor sits on the token after the identifier
            if self.sc.sym() == TokenKind::LBracket {
                self.sc.advance()?;
                sync!(self, [IntLit]);
                let size = self.sc.num();
                if size == 0 {
                    self.error(messages::ARRAY_SIZE_ZERO);
                }
                self.insert_or_diag(&id, Entry::array(Scope::Global, dtype, size));
                self.mid.emit(Op::GVar, tag, &id, size.to_string());
                self.sc.advance()?;
                sync!(self, [RBracket]);
                self.sc.advance()?;
            } else {
                self.insert_or_diag(&id, Entry::variable(Scope::Global, dtype));
                self.mid.emit(Op::GVar, tag, &id, "");
            }
            if self.sc.sym() != TokenKind::Comma {
                break;
            }
            self.sc.advance()?;
            sync!(self, [Ident]);
            id = self.sc.ident().to_string();
            self.sc.advance()?;
        }
        sync!(self, [Semicolon]);
        self.sc.advance()?;
        Ok(())
    }

    /// Local variable definition lines at the top of a function body.
    pub(crate) fn local_variable_definitions(&mut self) -> ScanResult<()> {
        while self.sc.sym() == TokenKind::Int || self.sc.sym() == TokenKind::Char {
            let dtype = if self.sc.sym() == TokenKind::Int {
                DataType::Int
            } else {
                DataType::Char
            };
            let tag = dtype.tag();
            loop {
                self.sc.advance()?; // past the type keyword or a comma
                sync!(self, [Ident]);
                let id = self.sc.ident().to_string();
                self.sc.advance()?;
                if self.sc.sym() == TokenKind::LBracket {
                    self.sc.advance()?;
                    sync!(self, [IntLit]);
                    let size = self.sc.num();
                    self.insert_or_diag(&id, Entry::array(Scope::Local, dtype, size));
                    self.mid.emit(Op::Var, tag, &id, size.to_string());
                    self.sc.advance()?;
                    sync!(self, [RBracket]);
                    self.sc.advance()?;
                } else {
                    self.insert_or_diag(&id, Entry::variable(Scope::Local, dtype));
                    self.mid.emit(Op::Var, tag, &id, "");
                }
                if self.sc.sym() != TokenKind::Comma {
                    break;
                }
            }
            sync!(self, [Semicolon]);
            self.sc.advance()?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Function definitions
    // ------------------------------------------------------------------

    /// A named function definition after `type ident`, cursor on `(`
    /// or `{`.
    fn function_definition(&mut self, dtype: DataType, id: &str) -> ScanResult<()> {
        let entry = Entry::function(dtype);
        self.insert_or_diag(id, entry);
        self.current_function = entry;
        self.mid.emit(Op::Func, dtype.tag(), id, "");

        if self.sc.sym() == TokenKind::LParen {
            self.parameters_list(id)?;
        }
        self.sync(ts![LBrace], TokenSet::EMPTY)?;
        self.sc.advance()?;
        self.const_definitions(Scope::Local)?;
        self.local_variable_definitions()?;
        self.statements_list()?;
        self.mid.emit(Op::End, "", "", "");
        Ok(())
    }

    /// `void main ( ) { … }`. The cursor sits on `main`.
    fn main_function(&mut self) -> ScanResult<()> {
        let entry = Entry::function(DataType::Void);
        self.insert_or_diag("main", entry);
        self.current_function = entry;
        self.mid.emit(Op::Func, "void", "main", "");

        self.sc.advance()?;
        sync!(self, [LParen]);
        self.sc.advance()?;
        sync!(self, [RParen]);
        self.sc.advance()?;
        sync!(self, [LBrace]);
        self.sc.advance()?;
        self.const_definitions(Scope::Local)?;
        self.local_variable_definitions()?;
        // No advance after the closing brace: the program may end here
        // and the trailing check owns the rest of the input.
        while self.sc.sym() != TokenKind::RBrace {
            self.statement()?;
        }
        self.mid.emit(Op::End, "", "", "");
        Ok(())
    }

    /// Formal parameters: `( (int|char) ident { ',' … } )`. Each
    /// parameter lands in the local table, the signature registry, and
    /// the IR (as `PARA`), all in source order.
    fn parameters_list(&mut self, func: &str) -> ScanResult<()> {
        while self.sc.sym() != TokenKind::RParen {
            self.sc.advance()?; // past `(` or `,`
            if !self.sync_or_bail(ts![Int, Char], ts![RParen])? {
                return Ok(());
            }
            let dtype = if self.sc.sym() == TokenKind::Int {
                DataType::Int
            } else {
                DataType::Char
            };
            self.sc.advance()?;
            if !self.sync_or_bail(ts![Ident], ts![RParen])? {
                return Ok(());
            }
            let name = self.sc.ident().to_string();
            self.insert_or_diag(&name, Entry::variable(Scope::Local, dtype));
            self.tab.push_param(func, dtype);
            self.mid.emit(Op::Para, dtype.tag(), &name, "");
            self.sc.advance()?;
            sync!(self, [Comma, RParen]);
            if self.sc.sym() != TokenKind::Comma {
                break;
            }
        }
        self.sc.advance()?; // past `)`
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{parse_errors, parse_ok, printed};
    use c0c_mid::Op;

    #[test]
    fn test_empty_main() {
        let quads = parse_ok("void main(){}");
        assert_eq!(printed(&quads), ["void main()", "end"]);
    }

    #[test]
    fn test_global_variables_and_arrays() {
        let quads = parse_ok("int x; char c; int a[3];\nvoid main(){}");
        assert_eq!(
            printed(&quads),
            ["var int x", "var char c", "var int a 3", "void main()", "end"]
        );
    }

    #[test]
    fn test_comma_separated_globals() {
        let quads = parse_ok("int x, y[2], z;\nvoid main(){}");
        assert_eq!(
            printed(&quads),
            ["var int x", "var int y 2", "var int z", "void main()", "end"]
        );
    }

    #[test]
    fn test_const_is_table_only() {
        // consts produce no IR at all
        let quads = parse_ok("const int k = 3;\nconst char c = 'x';\nvoid main(){}");
        assert_eq!(printed(&quads), ["void main()", "end"]);
    }

    #[test]
    fn test_negative_const() {
        let quads = parse_ok("const int k = -5;\nint x;\nvoid main(){ x = k; }");
        assert!(printed(&quads).contains(&"x = -5".to_string()));
    }

    #[test]
    fn test_function_definition_shape() {
        let quads = parse_ok(
            "int sum(int a, int b){ return(a+b); }\nvoid main(){ sum(1,2); }",
        );
        let text = printed(&quads);
        assert_eq!(
            text,
            [
                "int sum()",
                "para int a",
                "para int b",
                "temp int $t_0",
                "$t_0 = a + b",
                "ret $t_0",
                "end",
                "void main()",
                "push int 1",
                "push int 2",
                "call sum",
                "end",
            ]
        );
    }

    #[test]
    fn test_para_quads_match_signature() {
        // PARA count and types mirror the registered signature
        let quads = parse_ok(
            "int f(int a, char b, int c){ return(a); }\nvoid main(){ f(1,'x',2); }",
        );
        let paras: Vec<String> = quads
            .iter()
            .filter(|q| q.op == Op::Para)
            .map(|q| q.a.clone())
            .collect();
        assert_eq!(paras, ["int", "char", "int"]);
    }

    #[test]
    fn test_every_call_has_arity_pushes() {
        let quads = parse_ok(
            "int f(int a, int b){ return(a+b); }\n\
             void main(){ int x; x = f(f(1,2), 3); }",
        );
        for (i, quad) in quads.iter().enumerate() {
            if quad.op == Op::Call {
                let arity: usize = quad.b.parse().unwrap();
                // walk back over the contiguous PUSH run
                let pushes = quads[..i]
                    .iter()
                    .rev()
                    .take_while(|q| q.op == Op::Push)
                    .count();
                assert!(
                    pushes >= arity,
                    "call {} has {} pushes, needs {}",
                    quad.a,
                    pushes,
                    arity
                );
            }
        }
    }

    #[test]
    fn test_case_insensitive_identifiers() {
        let quads = parse_ok("int Counter;\nVOID MAIN(){ COUNTER = 1; }");
        assert!(printed(&quads).contains(&"counter = 1".to_string()));
    }

    #[test]
    fn test_wrong_type_of_main() {
        let errors = parse_errors("int main(){}");
        assert!(errors.iter().any(|m| m == "wrong type of main function"));
    }

    #[test]
    fn test_duplicate_global() {
        let errors = parse_errors("int x; int x;\nvoid main(){}");
        assert!(errors.iter().any(|m| m == "duplicate global identifier"));
    }

    #[test]
    fn test_duplicate_local() {
        let errors = parse_errors("void main(){ int a; char a; }");
        assert!(errors.iter().any(|m| m == "duplicate local identifier"));
    }

    #[test]
    fn test_duplicate_parameter() {
        let errors = parse_errors("int f(int a, char a){ return(a); }\nvoid main(){}");
        assert!(errors.iter().any(|m| m == "duplicate local identifier"));
    }

    #[test]
    fn test_void_variable_rejected() {
        let errors = parse_errors("void x;\nvoid main(){}");
        assert!(errors.iter().any(|m| m == "variable type can't be void"));
    }

    #[test]
    fn test_array_size_zero() {
        let errors = parse_errors("int a[0];\nvoid main(){}");
        assert!(errors
            .iter()
            .any(|m| m == "array size must be greater than 0"));
    }

    #[test]
    fn test_locals_cleared_between_functions() {
        // `a` is local to f; main cannot see it
        let errors = parse_errors(
            "int f(int a){ return(a); }\nvoid main(){ a = 1; }",
        );
        assert!(errors
            .iter()
            .any(|m| m == "reference of undefined identifier"));
    }

    #[test]
    fn test_local_shadows_global() {
        let quads = parse_ok(
            "char x;\nint f(int x){ return(x); }\nvoid main(){ f(3); }",
        );
        // returning the int parameter passes the type check
        assert!(printed(&quads).contains(&"ret x".to_string()));
    }

    #[test]
    fn test_missing_main_type_recovers() {
        let errors = parse_errors("main(){}");
        assert!(errors.iter().any(|m| m.starts_with("expected int|char|void")));
    }
}
