use crate::expr::{ExprRef, RuntimeError, Val};
use crate::scope::Environment;
use crate::token::Token;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Print(ExprRef),
    Expr(ExprRef),
    Declare(Token, Option<ExprRef>),
    Block(Vec<Stmt>),
}

/// Anything that stops a statement list part way through.
#[derive(Debug, Error)]
pub enum ExecInterruption {
    #[error(transparent)]
    Err(#[from] RuntimeError),
    #[error("failed to write program output: {0}")]
    Output(#[from] io::Error),
}

impl Stmt {
    pub fn exec(&self, scope: &mut Environment, out: &mut dyn Write) -> Result<(), ExecInterruption> {
        match self {
            Self::Print(expr) => {
                let val = expr.eval(scope)?;
                writeln!(out, "{}", val)?;
            }
            Self::Expr(expr) => {
                expr.eval(scope)?;
            }
            Self::Declare(name, val) => {
                let val = match val {
                    Some(val) => val.eval(scope)?,
                    None => Val::Nil,
                };
                scope.define(name.lexeme.clone(), val);
            }
            Self::Block(stmts) => {
                scope.with_child(|child| exec_all(stmts, child, out))?;
            }
        }
        Ok(())
    }
}

/// Executes `stmts` in order, stopping at the first interruption.
pub fn exec_all(stmts: &[Stmt], scope: &mut Environment, out: &mut dyn Write) -> Result<(), ExecInterruption> {
    for stmt in stmts.iter() {
        stmt.exec(scope, out)?;
    }
    Ok(())
}
