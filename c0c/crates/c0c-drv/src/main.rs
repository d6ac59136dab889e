//! The `c0c` command line: compile one C0 source file to a quadruple
//! listing and a MARS-compatible MIPS listing in the working directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use c0c_drv::{compile, CompileOptions, CompileOutcome};

/// Compiler for the C0 language, targeting the MARS MIPS simulator.
#[derive(Parser, Debug)]
#[command(name = "c0c")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compile C0 source to quadruple IR and MIPS assembly")]
struct Cli {
    /// Source file to compile
    #[arg(default_value = "hello_world.txt")]
    input: PathBuf,

    /// Where to write the quadruple listing
    #[arg(long, default_value = "mid_code.txt")]
    mid_out: PathBuf,

    /// Where to write the MIPS listing
    #[arg(long, default_value = "mips_code.txt")]
    mips_out: PathBuf,

    /// Also write a listing with redundant lw/sw pairs filtered out
    #[arg(long)]
    opt_mips_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let opts = CompileOptions {
        input: cli.input,
        mid_out: cli.mid_out,
        mips_out: cli.mips_out,
        opt_mips_out: cli.opt_mips_out,
    };
    match compile(&opts) {
        Ok(CompileOutcome::Success) => {
            println!("compile success!");
            println!("mid code at: {}", opts.mid_out.display());
            println!("mips code at: {}", opts.mips_out.display());
            println!(
                "run it with: java -jar mars.jar nc {}",
                opts.mips_out.display()
            );
            ExitCode::SUCCESS
        }
        Ok(CompileOutcome::CompileError) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
