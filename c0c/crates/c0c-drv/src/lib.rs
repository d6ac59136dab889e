//! c0c-drv - Compiler driver.
//!
//! Orchestrates the pipeline: read the source file, run the fused
//! front end (scanner + parser + IR emission), gate on diagnostics,
//! then lower to MIPS and write the two text artifacts. Exit status is
//! communicated through [`CompileOutcome`]; the binary maps it to the
//! process exit code (0 on success, 1 on any compile error).
//!
//! Both output files are fully written before the driver returns;
//! nothing is persisted beyond them.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use c0c_lex::FatalError;
use c0c_mid::Quad;
use c0c_mips::{filter_listing, MipsLowerer};
use c0c_par::Parser;
use c0c_util::Handler;

/// What to compile and where to put the artifacts.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Source file.
    pub input: PathBuf,
    /// Quadruple listing, one per line.
    pub mid_out: PathBuf,
    /// MARS-compatible assembly listing.
    pub mips_out: PathBuf,
    /// Optional extra listing with the redundant lw/sw filter applied.
    pub opt_mips_out: Option<PathBuf>,
}

impl CompileOptions {
    /// Options with the conventional output names in the working
    /// directory.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            mid_out: PathBuf::from("mid_code.txt"),
            mips_out: PathBuf::from("mips_code.txt"),
            opt_mips_out: None,
        }
    }
}

/// How a compile run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileOutcome {
    /// Both artifacts were written.
    Success,
    /// Diagnostics were printed; no artifacts were written.
    CompileError,
}

/// Runs the whole pipeline for one source file.
///
/// Compile errors (including the fatal scanner conditions) are printed
/// to standard output and reported as [`CompileOutcome::CompileError`];
/// `Err` is reserved for I/O problems around the compiler proper.
pub fn compile(opts: &CompileOptions) -> Result<CompileOutcome> {
    let filename = opts.input.display().to_string();
    let source = fs::read_to_string(&opts.input)
        .with_context(|| format!("cannot read source file `{}`", filename))?;

    debug!(file = %filename, bytes = source.len(), "front end starting");
    let diag = Handler::new();
    let parsed = Parser::new(&source, &diag).parse();

    if let Err(fatal) = &parsed {
        match fatal {
            FatalError::ProgramIncomplete => debug!("input exhausted mid-program"),
            FatalError::RedundantCode => debug!("trailing bytes after main"),
            FatalError::StrayBang => debug!("stray '!' in input"),
        }
    }
    let mut front = match parsed {
        Ok(front) if !diag.has_errors() => front,
        _ => {
            if let Some(rendered) = diag.render(&filename) {
                print!("{}", rendered);
            }
            return Ok(CompileOutcome::CompileError);
        }
    };

    info!(quads = front.quads.len(), "front end done");
    fs::write(&opts.mid_out, render_mid_code(&front.quads))
        .with_context(|| format!("cannot write `{}`", opts.mid_out.display()))?;

    let asm = MipsLowerer::new(&front.quads, &mut front.table, &front.strings).lower();
    fs::write(&opts.mips_out, &asm)
        .with_context(|| format!("cannot write `{}`", opts.mips_out.display()))?;
    info!(lines = asm.lines().count(), "assembly written");

    if let Some(path) = &opts.opt_mips_out {
        fs::write(path, filter_listing(&asm))
            .with_context(|| format!("cannot write `{}`", path.display()))?;
    }
    Ok(CompileOutcome::Success)
}

/// The quadruple listing, one instruction per line.
fn render_mid_code(quads: &[Quad]) -> String {
    let mut out = String::new();
    for quad in quads {
        let _ = writeln!(out, "{}", quad);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("prog.c0");
        fs::write(&src, "int x;\nvoid main(){ x = 1 + 2; }\n").unwrap();

        let opts = CompileOptions {
            input: src,
            mid_out: dir.path().join("mid_code.txt"),
            mips_out: dir.path().join("mips_code.txt"),
            opt_mips_out: None,
        };
        let outcome = compile(&opts).unwrap();
        assert_eq!(outcome, CompileOutcome::Success);

        let mid = fs::read_to_string(&opts.mid_out).unwrap();
        assert!(mid.contains("x = 3"));
        let asm = fs::read_to_string(&opts.mips_out).unwrap();
        assert!(asm.contains("main:"));
    }

    #[test]
    fn test_compile_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("prog.c0");
        fs::write(&src, "int x; int x;\nvoid main(){}\n").unwrap();

        let opts = CompileOptions {
            input: src,
            mid_out: dir.path().join("mid_code.txt"),
            mips_out: dir.path().join("mips_code.txt"),
            opt_mips_out: None,
        };
        let outcome = compile(&opts).unwrap();
        assert_eq!(outcome, CompileOutcome::CompileError);
        assert!(!opts.mid_out.exists());
        assert!(!opts.mips_out.exists());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let opts = CompileOptions::new("definitely-not-there.c0");
        assert!(compile(&opts).is_err());
    }

    #[test]
    fn test_render_mid_code_lines() {
        use c0c_mid::Op;
        let quads = vec![
            Quad::new(Op::Func, "void", "main", ""),
            Quad::new(Op::End, "", "", ""),
        ];
        assert_eq!(render_mid_code(&quads), "void main()\nend\n");
    }
}
