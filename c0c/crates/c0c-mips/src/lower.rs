//! The IR-to-MIPS lowering pass.

use c0c_mid::{const_operand, Op, Quad};
use c0c_tab::{DataType, Entry, EntryKind, Scope, StringPool, SymbolTable};

/// Uniform slot size: `int` and `char` both take one word.
const SLOT: i32 = 4;

/// Lowers a quadruple stream into one MIPS assembly listing.
///
/// The lowerer walks the stream left to right. Globals and pooled
/// strings become the `.data` section; each `FUNC … END` region gets a
/// frame-layout pass (which repopulates the local symbol table with
/// `$sp`-relative addresses) and is then translated quad by quad.
pub struct MipsLowerer<'a> {
    quads: &'a [Quad],
    tab: &'a mut SymbolTable,
    strings: &'a StringPool,
    lines: Vec<String>,
    indent: usize,
    pos: usize,
    /// Frame size of the function currently being lowered.
    frame_size: i32,
    /// Next argument slot below the caller's `$sp`; reset to -4 at
    /// function entry and after every call.
    prev_para_addr: i32,
}

impl<'a> MipsLowerer<'a> {
    pub fn new(quads: &'a [Quad], tab: &'a mut SymbolTable, strings: &'a StringPool) -> Self {
        Self {
            quads,
            tab,
            strings,
            lines: Vec::new(),
            indent: 0,
            pos: 0,
            frame_size: 0,
            prev_para_addr: -SLOT,
        }
    }

    /// Runs the whole lowering and returns the assembly text.
    pub fn lower(mut self) -> String {
        self.emit(".data");
        self.indent = 8;
        self.gen_global_variables();
        self.gen_strings();
        self.indent = 0;
        self.emit(".text");
        self.indent = 8;
        // bootstrap: run main, then ask the simulator to exit
        self.emit("jal\tmain");
        self.emit("li\t$v0, 10");
        self.emit("syscall");
        self.indent = 0;
        while self.pos < self.quads.len() {
            match self.quads[self.pos].op {
                Op::Func => self.gen_function(),
                _ => self.pos += 1,
            }
        }
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    fn emit(&mut self, text: &str) {
        let mut line = " ".repeat(self.indent);
        line.push_str(text);
        self.lines.push(line);
    }

    // ------------------------------------------------------------------
    // Data segment
    // ------------------------------------------------------------------

    /// Every GVAR becomes a zero-initialised word (or a run of words
    /// for arrays).
    fn gen_global_variables(&mut self) {
        let quads = self.quads;
        for quad in quads.iter().filter(|q| q.op == Op::GVar) {
            let line = if quad.res.is_empty() {
                format!("{}:\t.word\t0", quad.b)
            } else {
                format!("{}:\t.word\t0:{}", quad.b, quad.res)
            };
            self.emit(&line);
        }
    }

    fn gen_strings(&mut self) {
        let mut lines = Vec::new();
        for (content, label) in self.strings.iter() {
            lines.push(format!("{}: .asciiz \"{}\"", label, content));
        }
        for line in lines {
            self.emit(&line);
        }
    }

    // ------------------------------------------------------------------
    // Frame layout
    // ------------------------------------------------------------------

    /// Sizes the current function's frame and assigns every PARA, VAR
    /// and TEMP a `$sp`-relative address, stacked downward from just
    /// below the saved `$ra`, in the order they appear in the IR.
    fn layout_frame(&mut self) {
        self.tab.clear_local();
        let mut size = SLOT; // saved $ra on top
        for quad in self.function_body() {
            if let Some(elems) = frame_slot(quad) {
                size += SLOT * elems;
            }
        }
        self.frame_size = size;
        self.prev_para_addr = -SLOT;

        let mut addr = size - SLOT;
        let body: Vec<Quad> = self.function_body().cloned().collect();
        for quad in &body {
            let Some(elems) = frame_slot(quad) else {
                continue;
            };
            let dtype = DataType::from_tag(&quad.a).unwrap_or(DataType::Int);
            addr -= SLOT * elems;
            let mut entry = if quad.res.is_empty() {
                Entry::variable(Scope::Local, dtype)
            } else {
                Entry::array(Scope::Local, dtype, elems)
            };
            entry.addr = addr;
            // the front end already rejected duplicates
            let _ = self.tab.insert(&quad.b, entry);
        }
    }

    /// The quads of the current function, from just after FUNC to END.
    fn function_body(&self) -> impl Iterator<Item = &Quad> {
        self.quads[self.pos + 1..]
            .iter()
            .take_while(|q| q.op != Op::End)
    }

    // ------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------

    fn gen_function(&mut self) {
        let name = self.quads[self.pos].b.clone();
        self.emit(&format!("{}:", name));
        self.layout_frame();
        self.pos += 1;

        self.indent = 8;
        self.emit(&format!("addiu\t$sp, $sp, {}", -self.frame_size));
        self.emit(&format!("sw\t$ra, {}($sp)", self.frame_size - SLOT));

        while self.quads[self.pos].op != Op::End {
            let quad = self.quads[self.pos].clone();
            match quad.op {
                Op::Add | Op::Sub | Op::Mul | Op::Div => self.gen_arith(&quad),
                Op::WArray | Op::RArray => self.gen_array(&quad),
                Op::Push => self.gen_push(&quad),
                Op::Call => self.gen_call(&quad),
                Op::Write => self.gen_write(&quad),
                Op::Read => self.gen_read(&quad),
                Op::Assign => self.gen_assign(&quad),
                Op::GetRet => self.gen_getret(&quad),
                Op::Goto => self.gen_goto(&quad),
                Op::Label => self.gen_label(&quad),
                Op::Ret => self.gen_ret(&quad),
                Op::Compare => self.gen_compare(&quad),
                // frame-layout bookkeeping, no code of their own
                Op::Var | Op::Para | Op::Temp => {}
                Op::Func | Op::GVar | Op::End | Op::Bz | Op::Bnz => {}
            }
            self.pos += 1;
        }
        self.gen_epilogue();
        self.indent = 0;
        self.pos += 1; // past END
    }

    fn gen_epilogue(&mut self) {
        self.emit(&format!("lw\t$ra, {}($sp)", self.frame_size - SLOT));
        self.emit(&format!("addiu\t$sp, $sp, {}", self.frame_size));
        self.emit("jr\t$ra");
    }

    // ------------------------------------------------------------------
    // Individual operations
    // ------------------------------------------------------------------

    /// Arguments go straight into the callee's future frame: each PUSH
    /// stores one word further below the caller's `$sp`.
    fn gen_push(&mut self, quad: &Quad) {
        self.prev_para_addr -= SLOT;
        self.load_to_reg("$v0", &quad.b);
        self.emit(&format!("sw\t$v0, {}($sp)", self.prev_para_addr));
    }

    fn gen_call(&mut self, quad: &Quad) {
        self.emit(&format!("jal\t{}", quad.a));
        self.prev_para_addr = -SLOT;
    }

    fn gen_write(&mut self, quad: &Quad) {
        match quad.a.as_str() {
            "str" => {
                self.emit(&format!("la\t$a0, {}", quad.b));
                self.emit("li\t$v0, 4");
            }
            "int" => {
                self.load_to_reg("$a0", &quad.b);
                self.emit("li\t$v0, 1");
            }
            _ => {
                self.load_to_reg("$a0", &quad.b);
                self.emit("li\t$v0, 11");
            }
        }
        self.emit("syscall");
    }

    fn gen_read(&mut self, quad: &Quad) {
        if quad.a == "int" {
            self.emit("li\t$v0, 5");
        } else {
            self.emit("li\t$v0, 12");
        }
        self.emit("syscall");
        let addr = self.variable_addr(&quad.b);
        self.emit(&format!("sw\t$v0, {}", addr));
    }

    /// Left operand loads into `$v0`; a literal right operand is used
    /// as an immediate, anything else loads into `$v1`.
    fn gen_arith(&mut self, quad: &Quad) {
        let mnemonic = match quad.op {
            Op::Add => "addu",
            Op::Sub => "subu",
            Op::Mul => "mul",
            _ => "div",
        };
        self.load_to_reg("$v0", &quad.a);
        let operand2 = match const_operand(&quad.b) {
            Some(value) => value.to_string(),
            None => {
                self.load_to_reg("$v1", &quad.b);
                "$v1".to_string()
            }
        };
        self.emit(&format!("{}\t$v0, $v0, {}", mnemonic, operand2));
        let addr = self.variable_addr(&quad.res);
        self.emit(&format!("sw\t$v0, {}", addr));
    }

    fn gen_assign(&mut self, quad: &Quad) {
        self.load_to_reg("$v0", &quad.a);
        let addr = self.variable_addr(&quad.res);
        self.emit(&format!("sw\t$v0, {}", addr));
    }

    fn gen_getret(&mut self, quad: &Quad) {
        let addr = self.variable_addr(&quad.res);
        self.emit(&format!("sw\t$v0, {}", addr));
    }

    fn gen_goto(&mut self, quad: &Quad) {
        self.emit(&format!("j\t{}", quad.a));
    }

    /// Labels stick out four spaces to the left of the body.
    fn gen_label(&mut self, quad: &Quad) {
        self.indent -= 4;
        self.emit(&format!("{}:", quad.a));
        self.indent += 4;
    }

    /// A valued return loads `$v0` first; either way the epilogue runs
    /// here, and the function's END emits its own epilogue again for
    /// the fall-through path.
    fn gen_ret(&mut self, quad: &Quad) {
        if !quad.a.is_empty() {
            self.load_to_reg("$v0", &quad.a);
        }
        self.gen_epilogue();
    }

    /// Element offset lands in `$v0` (constant subscripts are scaled
    /// at compile time), then the access goes through the array's base:
    /// the global label or the frame address.
    fn gen_array(&mut self, quad: &Quad) {
        let Some(entry) = self.tab.find(&quad.a) else {
            return;
        };
        debug_assert_eq!(entry.kind, EntryKind::Array);

        match const_operand(&quad.b) {
            Some(index) => self.emit(&format!("li\t$v0, {}", index * SLOT)),
            None => {
                self.load_to_reg("$v0", &quad.b);
                self.emit("mul\t$v0, $v0, 4");
            }
        }

        if entry.scope == Scope::Global {
            if quad.op == Op::RArray {
                self.emit(&format!("lw\t$v1, {}($v0)", quad.a));
                let addr = self.variable_addr(&quad.res);
                self.emit(&format!("sw\t$v1, {}", addr));
            } else {
                self.load_to_reg("$v1", &quad.res);
                self.emit(&format!("sw\t$v1, {}($v0)", quad.a));
            }
            return;
        }

        self.emit("addu\t$v0, $v0, $sp");
        if quad.op == Op::RArray {
            self.emit(&format!("lw\t$v1, {}($v0)", entry.addr));
            let addr = self.variable_addr(&quad.res);
            self.emit(&format!("sw\t$v1, {}", addr));
        } else {
            self.load_to_reg("$v1", &quad.res);
            self.emit(&format!("sw\t$v1, {}($v0)", entry.addr));
        }
    }

    /// Consumes a COMPARE together with the BZ/BNZ that always follows
    /// it. "COMPARE … BZ" means "branch when the comparison is false".
    fn gen_compare(&mut self, quad: &Quad) {
        self.pos += 1;
        let branch = &self.quads[self.pos];
        debug_assert!(branch.op == Op::Bz || branch.op == Op::Bnz);
        let on_zero = branch.op == Op::Bz;
        let target = branch.a.clone();

        let left = const_operand(&quad.a);
        let right = const_operand(&quad.res);

        // Both sides constant: fold to an unconditional jump or nothing.
        if let Some(a) = left {
            if quad.b.is_empty() || right.is_some() {
                let value = if quad.b.is_empty() {
                    a
                } else {
                    i32::from(compare_const(a, &quad.b, right.unwrap_or(0)))
                };
                if (on_zero && value == 0) || (!on_zero && value != 0) {
                    self.emit(&format!("j\t{}", target));
                }
                return;
            }
        }

        // Single-operand truthiness form.
        if quad.b.is_empty() {
            self.load_to_reg("$v0", &quad.a);
            let mnemonic = if on_zero { "beq" } else { "bne" };
            self.emit(&format!("{}\t$v0, $zero, {}", mnemonic, target));
            return;
        }

        // A literal 0 on either side becomes $zero and skips a load.
        let operand1 = if left == Some(0) {
            "$zero".to_string()
        } else {
            self.load_to_reg("$v0", &quad.a);
            "$v0".to_string()
        };
        let operand2 = if right == Some(0) {
            "$zero".to_string()
        } else {
            self.load_to_reg("$v1", &quad.res);
            "$v1".to_string()
        };

        if quad.b == "==" || quad.b == "!=" {
            let mnemonic = if (quad.b == "==") ^ on_zero {
                "beq"
            } else {
                "bne"
            };
            self.emit(&format!("{}\t{}, {}, {}", mnemonic, operand1, operand2, target));
            return;
        }

        // Ordering comparisons against zero use the one-register forms.
        if operand2 == "$zero" {
            let mnemonic = zero_branch(&quad.b, on_zero);
            self.emit(&format!("{}\t{}, {}", mnemonic, operand1, target));
            return;
        }
        if operand1 == "$zero" {
            // 0 `op` x is x `mirrored-op` 0
            let mnemonic = zero_branch(&mirror_compare(&quad.b), on_zero);
            self.emit(&format!("{}\t{}, {}", mnemonic, operand2, target));
            return;
        }

        self.emit(&format!("subu\t$v0, {}, {}", operand1, operand2));
        let mnemonic = zero_branch(&quad.b, on_zero);
        self.emit(&format!("{}\t$v0, {}", mnemonic, target));
    }

    // ------------------------------------------------------------------
    // Operand helpers
    // ------------------------------------------------------------------

    /// Loads a literal (`li`), a global (`lw reg, name`) or a local
    /// (`lw reg, addr($sp)`) into `reg`.
    fn load_to_reg(&mut self, reg: &str, operand: &str) {
        if let Some(value) = const_operand(operand) {
            self.emit(&format!("li\t{}, {}", reg, value));
            return;
        }
        let Some(entry) = self.tab.find(operand) else {
            return;
        };
        if entry.scope == Scope::Global {
            self.emit(&format!("lw\t{}, {}", reg, operand));
        } else {
            self.emit(&format!("lw\t{}, {}($sp)", reg, entry.addr));
        }
    }

    /// Address expression of a variable: its label for globals, the
    /// frame offset for locals.
    fn variable_addr(&self, operand: &str) -> String {
        match self.tab.find(operand) {
            Some(entry) if entry.scope == Scope::Local => format!("{}($sp)", entry.addr),
            _ => operand.to_string(),
        }
    }
}

/// Words a PARA/VAR/TEMP quad contributes to the frame (arrays carry
/// their length in `res`); `None` for other quads.
fn frame_slot(quad: &Quad) -> Option<i32> {
    if !matches!(quad.op, Op::Para | Op::Var | Op::Temp) {
        return None;
    }
    if quad.res.is_empty() {
        Some(1)
    } else {
        Some(quad.res.parse().unwrap_or(1))
    }
}

fn compare_const(a: i32, op: &str, b: i32) -> bool {
    match op {
        "==" => a == b,
        "!=" => a != b,
        "<" => a < b,
        "<=" => a <= b,
        ">" => a > b,
        _ => a >= b,
    }
}

/// `a op b` rewritten as `b (mirror op) a`.
fn mirror_compare(op: &str) -> String {
    match op {
        "<" => ">",
        "<=" => ">=",
        ">" => "<",
        ">=" => "<=",
        other => other,
    }
    .to_string()
}

/// Branch mnemonic for `value op 0`, negated when branching on a false
/// comparison (`on_zero`).
fn zero_branch(op: &str, on_zero: bool) -> &'static str {
    match op {
        "<" => {
            if on_zero {
                "bgez"
            } else {
                "bltz"
            }
        }
        "<=" => {
            if on_zero {
                "bgtz"
            } else {
                "blez"
            }
        }
        ">" => {
            if on_zero {
                "blez"
            } else {
                "bgtz"
            }
        }
        _ => {
            if on_zero {
                "bltz"
            } else {
                "bgez"
            }
        }
    }
}
