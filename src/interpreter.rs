use crate::diagnostic::{Diagnostics, SyntaxError};
use crate::expr::{RuntimeError, Val};
use crate::parser::Parser;
use crate::scanner::scan;
use crate::scope::Environment;
use crate::statement::{exec_all, ExecInterruption, Stmt};
use std::io::{self, Stdout, Write};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InterpretErr {
    #[error("{}", render_all(.0))]
    Syntax(Vec<SyntaxError>),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("failed to write program output: {0}")]
    Output(#[from] io::Error),
}

fn render_all(errs: &[SyntaxError]) -> String {
    errs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Executes programs against one global environment, so bindings survive
/// between calls to `run`.
pub struct Interpreter<W: Write = Stdout> {
    global_scope: Environment,
    out: W,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter::with_output(io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W) -> Self {
        Interpreter {
            global_scope: Environment::new(),
            out,
        }
    }

    /// Runs `program` until it finishes or hits its first runtime error,
    /// which is reported to `diagnostics`. Output failures are returned.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.len()))]
    pub fn interpret(&mut self, program: &[Stmt], diagnostics: &mut Diagnostics) -> io::Result<()> {
        let res = exec_all(program, &mut self.global_scope, &mut self.out);
        self.out.flush()?;
        match res {
            Ok(()) => Ok(()),
            Err(ExecInterruption::Err(err)) => {
                diagnostics.report_runtime(err);
                Ok(())
            }
            Err(ExecInterruption::Output(err)) => Err(err),
        }
    }

    /// Scans, parses and interprets `code`, stopping after any phase that
    /// reported an error.
    pub fn run_with(&mut self, code: &str, diagnostics: &mut Diagnostics) -> io::Result<()> {
        let tokens = scan(code, diagnostics);
        let program = Parser::new(&tokens, diagnostics).parse();
        if diagnostics.had_error() {
            debug!("syntax errors, not interpreting");
            return Ok(());
        }
        self.interpret(&program, diagnostics)
    }

    pub fn run(&mut self, code: &str) -> Result<(), InterpretErr> {
        let mut diagnostics = Diagnostics::new();
        self.run_with(code, &mut diagnostics)?;
        if diagnostics.had_error() {
            return Err(InterpretErr::Syntax(diagnostics.syntax_errors().cloned().collect()));
        }
        match diagnostics.runtime_error() {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }

    pub fn get_global(&self, id: &str) -> Option<Val> {
        self.global_scope.get_global(id)
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
