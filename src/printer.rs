//! Parenthesized prefix rendering of syntax trees, e.g. `(* (- 123) (group 45.67))`.

use std::fmt::{self, Display, Formatter};

use crate::expr::{Expr, Val};
use crate::statement::Stmt;

fn parenthesize(f: &mut Formatter<'_>, name: &str, parts: &[&dyn Display]) -> fmt::Result {
    write!(f, "({name}")?;
    for part in parts {
        write!(f, " {part}")?;
    }
    write!(f, ")")
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(Val::String(s)) => write!(f, "\"{s}\""),
            Self::Literal(val) => write!(f, "{val}"),
            Self::Grouping(inner) => parenthesize(f, "group", &[inner]),
            Self::Unary(_, op, x) => parenthesize(f, &op.lexeme, &[x]),
            Self::Binary(x, _, op, y) => parenthesize(f, &op.lexeme, &[x, y]),
            Self::Variable(name) => write!(f, "{}", name.lexeme),
            Self::Assignment(name, val) => parenthesize(f, "=", &[&name.lexeme, val]),
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Print(expr) => parenthesize(f, "print", &[expr]),
            Self::Expr(expr) => parenthesize(f, "expr", &[expr]),
            Self::Declare(name, Some(init)) => parenthesize(f, "var", &[&name.lexeme, init]),
            Self::Declare(name, None) => parenthesize(f, "var", &[&name.lexeme]),
            Self::Block(stmts) => {
                let parts: Vec<&dyn Display> = stmts.iter().map(|s| s as &dyn Display).collect();
                parenthesize(f, "block", &parts)
            }
        }
    }
}
