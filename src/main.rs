use std::{env, path::PathBuf, process::ExitCode};

use clap::Parser;
use glint::driver::{run_file, run_prompt, Options, Status};

/// Tree-walking interpreter for the glint scripting language.
#[derive(Parser, Debug)]
#[command(name = "glint", version, about, long_about = None)]
struct Args {
    /// Print the token stream before running.
    #[arg(long)]
    tokens: bool,

    /// Print the parsed syntax tree before running.
    #[arg(long)]
    ast: bool,

    /// Disable colored prompts and diagnostics.
    #[arg(long)]
    no_color: bool,

    /// Script to run. Starts a REPL when omitted.
    script: Option<PathBuf>,
}

/// Enable with `RUST_LOG=glint=debug` or `RUST_LOG=glint=trace`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set
    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                Status::Usage.into()
            } else {
                Status::Success.into()
            };
        }
    };
    init_tracing();

    let options = Options {
        dump_tokens: args.tokens,
        dump_ast: args.ast,
        color: !args.no_color && env::var_os("NO_COLOR").is_none(),
    };

    let res = match &args.script {
        Some(path) => run_file(path, options),
        None => run_prompt(options),
    };

    match res {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("error: {err}");
            err.status().into()
        }
    }
}
