use std::{fmt, rc::Rc};

use crate::expr::Val;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub data: TokenType,
    /// Exact source text the token was scanned from.
    pub lexeme: Rc<str>,
    pub line: usize,
}

impl Token {
    pub fn new(data: TokenType, lexeme: impl Into<Rc<str>>, line: usize) -> Self {
        Token {
            data,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// Decoded value of a `Number` or `String` token.
    pub fn literal(&self) -> Option<Val> {
        match &self.data {
            TokenType::Number(x) => Some(Val::Num(*x)),
            TokenType::String(s) => Some(Val::String(s.clone())),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.data == TokenType::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.data.name(), self.lexeme)?;
        match self.literal() {
            Some(Val::String(s)) => write!(f, "{s}"),
            // Number literals keep their fractional part, e.g. `2.0`.
            Some(Val::Num(x)) => write!(f, "{x:?}"),
            Some(val) => write!(f, "{val}"),
            None => write!(f, "nil"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Star,
    Slash,
    Semicolon,

    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    Identifier(Rc<str>),
    String(Rc<str>),
    Number(f64),

    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenType {
    pub fn keyword(word: &str) -> Option<TokenType> {
        let kind = match word {
            "and" => TokenType::And,
            "class" => TokenType::Class,
            "else" => TokenType::Else,
            "false" => TokenType::False,
            "for" => TokenType::For,
            "fun" => TokenType::Fun,
            "if" => TokenType::If,
            "nil" => TokenType::Nil,
            "or" => TokenType::Or,
            "print" => TokenType::Print,
            "return" => TokenType::Return,
            "super" => TokenType::Super,
            "this" => TokenType::This,
            "true" => TokenType::True,
            "var" => TokenType::Var,
            "while" => TokenType::While,
            _ => return None,
        };
        Some(kind)
    }

    /// Tokens that can start a declaration or statement. The parser
    /// resynchronizes in front of these after a syntax error.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LeftParen => "LEFT_PAREN",
            Self::RightParen => "RIGHT_PAREN",
            Self::LeftBrace => "LEFT_BRACE",
            Self::RightBrace => "RIGHT_BRACE",
            Self::Comma => "COMMA",
            Self::Dot => "DOT",
            Self::Minus => "MINUS",
            Self::Plus => "PLUS",
            Self::Star => "STAR",
            Self::Slash => "SLASH",
            Self::Semicolon => "SEMICOLON",
            Self::Bang => "BANG",
            Self::BangEqual => "BANG_EQUAL",
            Self::Equal => "EQUAL",
            Self::EqualEqual => "EQUAL_EQUAL",
            Self::Greater => "GREATER",
            Self::GreaterEqual => "GREATER_EQUAL",
            Self::Less => "LESS",
            Self::LessEqual => "LESS_EQUAL",
            Self::Identifier(_) => "IDENTIFIER",
            Self::String(_) => "STRING",
            Self::Number(_) => "NUMBER",
            Self::And => "AND",
            Self::Class => "CLASS",
            Self::Else => "ELSE",
            Self::False => "FALSE",
            Self::Fun => "FUN",
            Self::For => "FOR",
            Self::If => "IF",
            Self::Nil => "NIL",
            Self::Or => "OR",
            Self::Print => "PRINT",
            Self::Return => "RETURN",
            Self::Super => "SUPER",
            Self::This => "THIS",
            Self::True => "TRUE",
            Self::Var => "VAR",
            Self::While => "WHILE",
            Self::Eof => "EOF",
        }
    }
}
