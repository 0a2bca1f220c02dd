//! Batch and interactive front ends around [`Interpreter`].

use std::{
    borrow::Cow,
    fs,
    io::{self, stdin, IsTerminal, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use nu_ansi_term::{Color, Style};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::validate::MatchingBracketValidator;
use rustyline::{
    Cmd, Completer, ConditionalEventHandler, Editor, Event, EventContext, EventHandler, Helper,
    Hinter, KeyEvent, Movement, RepeatCount, Validator,
};
use thiserror::Error;
use tracing::debug;

use crate::diagnostic::Diagnostics;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::scanner::scan;

/// Process exit statuses, following the BSD `sysexits` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Success = 0,
    Usage = 64,
    Syntax = 65,
    Runtime = 70,
    Unreadable = 74,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status as u8)
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read '{}': {source}", path.display())]
    ReadFile { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

impl CliError {
    pub fn status(&self) -> Status {
        match self {
            Self::ReadFile { .. } => Status::Unreadable,
            Self::Io(_) | Self::Readline(_) => Status::Runtime,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Print every token before parsing.
    pub dump_tokens: bool,
    /// Print the parsed statements before running them.
    pub dump_ast: bool,
    pub color: bool,
}

impl Options {
    fn paint<'s>(&self, style: Style, text: &'s str) -> Cow<'s, str> {
        if self.color {
            Cow::Owned(style.paint(text).to_string())
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// One interpreter plus the sink its diagnostics are rendered to.
pub struct Session<W: Write, E: Write> {
    interpreter: Interpreter<W>,
    options: Options,
    errors: E,
}

impl Session<io::Stdout, io::Stderr> {
    pub fn stdio(options: Options) -> Self {
        Session::new(Interpreter::new(), options, io::stderr())
    }
}

impl<W: Write, E: Write> Session<W, E> {
    pub fn new(interpreter: Interpreter<W>, options: Options, errors: E) -> Self {
        Session {
            interpreter,
            options,
            errors,
        }
    }

    pub fn interpreter(&self) -> &Interpreter<W> {
        &self.interpreter
    }

    pub fn errors(&self) -> &E {
        &self.errors
    }

    /// Runs one unit of source: a whole file or one REPL entry.
    pub fn run(&mut self, source: &str) -> io::Result<Status> {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan(source, &mut diagnostics);
        if self.options.dump_tokens {
            let out = self.interpreter.output_mut();
            for token in &tokens {
                writeln!(out, "{token}")?;
            }
        }

        let program = Parser::new(&tokens, &mut diagnostics).parse();
        if diagnostics.had_error() {
            self.report(&mut diagnostics)?;
            return Ok(Status::Syntax);
        }
        if self.options.dump_ast {
            let out = self.interpreter.output_mut();
            for stmt in &program {
                writeln!(out, "{stmt}")?;
            }
        }

        self.interpreter.interpret(&program, &mut diagnostics)?;
        if diagnostics.had_runtime_error() {
            self.report(&mut diagnostics)?;
            return Ok(Status::Runtime);
        }
        Ok(Status::Success)
    }

    fn report(&mut self, diagnostics: &mut Diagnostics) -> io::Result<()> {
        let style = Color::LightRed.normal();
        for diagnostic in diagnostics.take() {
            let text = diagnostic.to_string();
            writeln!(self.errors, "{}", self.options.paint(style, &text))?;
        }
        self.errors.flush()
    }
}

pub fn run_file(path: &Path, options: Options) -> Result<Status, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_owned(),
        source,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "running file");
    Ok(Session::stdio(options).run(&content)?)
}

struct TabEventHandler;
impl ConditionalEventHandler for TabEventHandler {
    fn handle(&self, _: &Event, _n: RepeatCount, _: bool, _: &EventContext) -> Option<Cmd> {
        Some(Cmd::Indent(Movement::WholeLine))
    }
}

#[derive(Helper, Completer, Hinter, Validator)]
struct PromptHelper {
    #[rustyline(Completer)]
    completer: (),
    #[rustyline(Validator)]
    validator: MatchingBracketValidator,
    color: bool,
}

impl Highlighter for PromptHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(&'s self, prompt: &'p str, _default: bool) -> Cow<'b, str> {
        if self.color {
            Cow::Owned(Color::LightYellow.bold().paint(prompt).to_string())
        } else {
            Cow::Borrowed(prompt)
        }
    }
}

/// Interactive loop. When stdin is not a terminal the whole of it is run as a
/// single program instead.
pub fn run_prompt(options: Options) -> Result<Status, CliError> {
    let mut session = Session::stdio(options.clone());
    if !stdin().is_terminal() {
        let program = io::read_to_string(stdin().lock())?;
        return Ok(session.run(&program)?);
    }

    let h = PromptHelper {
        completer: (),
        validator: MatchingBracketValidator::new(),
        color: options.color,
    };
    let mut rl = Editor::new()?;
    rl.set_helper(Some(h));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabEventHandler)),
    );

    let arrow = options.paint(Color::LightGreen.bold(), "-> ").into_owned();
    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(Status::Success),
            Err(err) => return Err(err.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" {
            return Ok(Status::Success);
        }

        let _ = rl.add_history_entry(line);
        print!("{arrow}");
        io::stdout().flush()?;
        // Errors are shown and forgotten; bindings stay for the next line.
        session.run(line)?;
        println!();
    }
}
