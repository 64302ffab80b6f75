use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use minilang::backend::codegen::{CodeGenerator, NameListPolicy, cpp_runtime};
use minilang::backend::interpreter::Interpreter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// Translate the program to C++.
    Generate,
    /// Run the program directly.
    Interpret,
}

/// Compiles MiniLang programs to C++ or runs them directly.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// MiniLang source file.
    source: PathBuf,

    #[arg(short, long, value_enum, default_value_t = BackendKind::Generate)]
    backend: BackendKind,

    /// Where to write the generated C++ source.
    #[arg(short, long, default_value = "compiled.cpp")]
    output: PathBuf,

    /// Also write Builtins.hpp and Builtins.cpp next to the output.
    #[arg(long)]
    emit_runtime: bool,

    /// Function whose return type is std::string (repeatable).
    #[arg(long = "text-function", value_name = "NAME")]
    text_functions: Vec<String>,

    /// Function whose parameters are std::string (repeatable).
    #[arg(long = "text-parameters", value_name = "NAME")]
    text_parameters: Vec<String>,

    /// Log pipeline stages to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let source = fs::read_to_string(&args.source)
        .with_context(|| format!("Cannot open file: {}", args.source.display()))?;
    let program = minilang::parse_source(&source)?;

    match args.backend {
        BackendKind::Interpret => {
            let mut interpreter = Interpreter::new();
            interpreter.interpret(&program)?;
        }
        BackendKind::Generate => {
            let mut policy = NameListPolicy::default();
            for name in &args.text_functions {
                policy = policy.with_text_function(name.as_str());
            }
            for name in &args.text_parameters {
                policy = policy.with_text_parameters(name.as_str());
            }
            let code = CodeGenerator::with_policy(policy).generate(&program)?;

            fs::write(&args.output, code).with_context(|| {
                format!("Cannot write output file {}", args.output.display())
            })?;
            if args.emit_runtime {
                let dir = output_dir(&args.output);
                cpp_runtime::write_runtime_files(dir).with_context(|| {
                    format!("Cannot write runtime files to {}", dir.display())
                })?;
            }

            let output = args.output.display();
            println!("C++ source code generated to {output}");
            println!(
                "Now compile it with your C++ compiler (e.g., g++ -std=c++17 {output} Builtins.cpp -o program)"
            );
        }
    }
    Ok(())
}

fn output_dir(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
