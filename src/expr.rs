use std::{cmp::Ordering, fmt, rc::Rc};

use thiserror::Error;

use crate::scope::Environment;
use crate::token::Token;

#[derive(Debug, PartialEq, Clone)]
pub enum Val {
    String(Rc<str>),
    Num(f64),
    Bool(bool),
    Nil,
}

impl Val {
    pub fn truthy(&self) -> bool {
        match self {
            Val::String(str) => !str.is_empty(),
            Val::Num(x) => *x != 0.0,
            Val::Bool(x) => *x,
            Val::Nil => false,
        }
    }

    /// Values of different kinds are never equal; `Nil` only equals `Nil`.
    pub fn equals(&self, other: &Val) -> bool {
        self == other
    }
}

// Rust's float formatting already drops a trailing ".0", so 4.0 prints as 4.
impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::String(x) => write!(f, "{}", x),
            Self::Num(x) => write!(f, "{}", x),
            Self::Bool(x) => write!(f, "{}", x),
            Self::Nil => write!(f, "nil"),
        }
    }
}

pub type ExprRef = Box<Expr>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
}

/// The operator tokens are kept alongside the operator for error lines and
/// printing.
#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Literal(Val),
    Grouping(ExprRef),
    Unary(UnaryOp, Token, ExprRef),
    Binary(ExprRef, BinaryOp, Token, ExprRef),
    Variable(Token),
    Assignment(Token, ExprRef),
}

impl Expr {
    pub fn eval(&self, scope: &mut Environment) -> Result<Val, RuntimeError> {
        match self {
            Self::Literal(v) => Ok(v.clone()),
            Self::Grouping(inner) => inner.eval(scope),
            Self::Unary(op, tok, x) => {
                let r = x.eval(scope)?;
                match (*op, r) {
                    (UnaryOp::Not, r) => Ok(Val::Bool(!r.truthy())),
                    (UnaryOp::Negate, Val::Num(a)) => Ok(Val::Num(-a)),
                    (UnaryOp::Negate, _) => Err(RuntimeError::new(tok, ErrorKind::OperandMustBeNumber)),
                }
            }
            Self::Binary(x, op, tok, y) => {
                let l = x.eval(scope)?;
                let r = y.eval(scope)?;
                binary(*op, tok, l, r)
            }
            Self::Variable(name) => scope.get(name),
            Self::Assignment(name, val) => {
                let r = val.eval(scope)?;
                scope.assign(name, r.clone())?;
                Ok(r)
            }
        }
    }
}

fn binary(op: BinaryOp, tok: &Token, l: Val, r: Val) -> Result<Val, RuntimeError> {
    let fail = |kind| Err(RuntimeError::new(tok, kind));
    match (op, l, r) {
        (BinaryOp::Add, Val::Num(a), Val::Num(b)) => Ok(Val::Num(a + b)),
        // Either side being a string turns `+` into concatenation of both
        // stringified operands.
        (BinaryOp::Add, a @ Val::String(_), b) | (BinaryOp::Add, a, b @ Val::String(_)) => {
            Ok(Val::String(format!("{a}{b}").into()))
        }
        (BinaryOp::Add, ..) => fail(ErrorKind::AddOperands),

        (BinaryOp::Subtract, Val::Num(a), Val::Num(b)) => Ok(Val::Num(a - b)),
        (BinaryOp::Subtract, ..) => fail(ErrorKind::OperandsMustBeNumbers),

        (BinaryOp::Divide, Val::Num(_), Val::Num(b)) if b == 0.0 => fail(ErrorKind::DivideByZero),
        (BinaryOp::Divide, Val::Num(a), Val::Num(b)) => Ok(Val::Num(a / b)),
        (BinaryOp::Divide, ..) => fail(ErrorKind::OperandsMustBeNumbers),

        (BinaryOp::Multiply, Val::Num(a), Val::Num(b)) => Ok(Val::Num(a * b)),
        (BinaryOp::Multiply, Val::Num(n), Val::String(s)) | (BinaryOp::Multiply, Val::String(s), Val::Num(n)) => {
            match repeat(&s, n) {
                Some(res) => Ok(Val::String(res.into())),
                None => fail(ErrorKind::RepetitionTooLarge),
            }
        }
        (BinaryOp::Multiply, ..) => fail(ErrorKind::MultiplyOperands),

        (
            op @ (BinaryOp::Greater | BinaryOp::GreaterEqual | BinaryOp::Less | BinaryOp::LessEqual),
            l,
            r,
        ) => {
            let ordering = match (&l, &r) {
                (Val::Num(a), Val::Num(b)) => a.partial_cmp(b),
                (Val::String(a), Val::String(b)) => Some(a.cmp(b)),
                _ => return fail(ErrorKind::CompareOperands),
            };
            Ok(Val::Bool(compare(op, ordering)))
        }

        (BinaryOp::Equal, l, r) => Ok(Val::Bool(l.equals(&r))),
        (BinaryOp::NotEqual, l, r) => Ok(Val::Bool(!l.equals(&r))),
    }
}

// NaN compares false under every operator.
fn compare(op: BinaryOp, ordering: Option<Ordering>) -> bool {
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        BinaryOp::Greater => ordering.is_gt(),
        BinaryOp::GreaterEqual => ordering.is_ge(),
        BinaryOp::Less => ordering.is_lt(),
        _ => ordering.is_le(),
    }
}

/// `floor(count)` copies of `s` separated by single spaces, or `None` when
/// the result cannot be allocated.
fn repeat(s: &str, count: f64) -> Option<String> {
    // Negative and NaN counts saturate to zero.
    let count = count.floor() as usize;
    if count == 0 {
        return Some(String::new());
    }
    let len = (s.len() + 1).checked_mul(count)? - 1;
    let mut res = String::new();
    res.try_reserve_exact(len).ok()?;
    for i in 0..count {
        if i > 0 {
            res.push(' ');
        }
        res.push_str(s);
    }
    Some(res)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or two strings.")]
    AddOperands,
    #[error("Operands must be two numbers or a string and a number.")]
    MultiplyOperands,
    #[error("Operands must be strings or numbers.")]
    CompareOperands,
    #[error("Can not divide by 0")]
    DivideByZero,
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(Rc<str>),
    #[error("Repetition result is too large.")]
    RepetitionTooLarge,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {}] {kind}", .token.line)]
pub struct RuntimeError {
    /// The operator or name the failure is attributed to.
    pub token: Token,
    pub kind: ErrorKind,
}

impl RuntimeError {
    pub fn new(token: &Token, kind: ErrorKind) -> Self {
        RuntimeError {
            token: token.clone(),
            kind,
        }
    }

    pub fn line(&self) -> usize {
        self.token.line
    }
}
