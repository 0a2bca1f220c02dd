use std::{borrow::Cow, fmt, rc::Rc};

use thiserror::Error;
use tracing::debug;

use crate::expr::RuntimeError;
use crate::token::Token;

/// Where on its line a syntax error was found.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Scanner errors carry no token.
    Unknown,
    End,
    At(Rc<str>),
}

impl Location {
    pub fn of(token: &Token) -> Self {
        if token.is_eof() {
            Location::End
        } else {
            Location::At(token.lexeme.clone())
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => Ok(()),
            Self::End => write!(f, " at end"),
            Self::At(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub location: Location,
    pub message: Cow<'static, str>,
}

impl SyntaxError {
    pub fn at(token: &Token, message: impl Into<Cow<'static, str>>) -> Self {
        SyntaxError {
            line: token.line,
            location: Location::of(token),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum Diagnostic {
    #[error(transparent)]
    Syntax(SyntaxError),
    #[error(transparent)]
    Runtime(RuntimeError),
}

/// Collects everything the scanner, parser and interpreter report for one
/// unit of source. The driver checks the flags between phases.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reported: Vec<Diagnostic>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, line: usize, location: Location, message: impl Into<Cow<'static, str>>) {
        self.syntax(SyntaxError {
            line,
            location,
            message: message.into(),
        });
    }

    pub fn syntax(&mut self, err: SyntaxError) {
        debug!(line = err.line, message = %err.message, "syntax error");
        self.had_error = true;
        self.reported.push(Diagnostic::Syntax(err));
    }

    pub fn report_runtime(&mut self, err: RuntimeError) {
        debug!(line = err.line(), message = %err.kind, "runtime error");
        self.had_runtime_error = true;
        self.reported.push(Diagnostic::Runtime(err));
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reported.iter()
    }

    pub fn syntax_errors(&self) -> impl Iterator<Item = &SyntaxError> {
        self.reported.iter().filter_map(|d| match d {
            Diagnostic::Syntax(err) => Some(err),
            Diagnostic::Runtime(_) => None,
        })
    }

    pub fn runtime_error(&self) -> Option<&RuntimeError> {
        self.reported.iter().find_map(|d| match d {
            Diagnostic::Runtime(err) => Some(err),
            Diagnostic::Syntax(_) => None,
        })
    }

    /// Hands out everything reported so far and clears the error flags.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.had_error = false;
        self.had_runtime_error = false;
        std::mem::take(&mut self.reported)
    }
}
