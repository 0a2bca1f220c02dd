use tracing::debug;

use crate::diagnostic::{Diagnostics, Location};
use crate::token::*;

struct Scanner<'a> {
    str: &'a [char],
    index: usize,
    // Start of the lexeme being scanned.
    start: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(str: &'a [char]) -> Self {
        Self {
            str,
            index: 0,
            start: 0,
            line: 1,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.str.get(self.index).copied();
        if c.is_some() {
            self.index += 1;
        }
        c
    }

    // "match" is a keyword in the metalanguage already.
    fn match_next(&mut self, c: char) -> bool {
        let res = self.peek() == Some(c);
        if res {
            self.index += 1;
        }
        res
    }

    fn peek(&self) -> Option<char> {
        self.str.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.str.get(self.index + 1).copied()
    }

    fn lexeme(&self) -> String {
        self.str[self.start..self.index].iter().collect()
    }

    fn token(&self, data: TokenType) -> Token {
        Token::new(data, self.lexeme(), self.line)
    }

    fn pick(&mut self, next: char, matched: TokenType, otherwise: TokenType) -> TokenType {
        if self.match_next(next) {
            matched
        } else {
            otherwise
        }
    }

    /// Consumes a string body after the opening quote. Returns `None` if the
    /// input ends first.
    fn string(&mut self, diagnostics: &mut Diagnostics) -> Option<TokenType> {
        let start_line = self.line;
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.peek().is_none() {
            diagnostics.report(start_line, Location::Unknown, "Unterminated string.");
            return None;
        }

        // Closing quote.
        self.advance();
        let body: String = self.str[self.start + 1..self.index - 1].iter().collect();
        Some(TokenType::String(body.into()))
    }

    fn number(&mut self) -> TokenType {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // A trailing '.' stays out of the number unless a digit follows.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Only ASCII digits and at most one interior '.' were consumed.
        TokenType::Number(self.lexeme().parse().unwrap_or_default())
    }

    fn identifier(&mut self) -> TokenType {
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }

        let word = self.lexeme();
        TokenType::keyword(&word).unwrap_or_else(|| TokenType::Identifier(word.into()))
    }

    fn block_comment(&mut self, diagnostics: &mut Diagnostics) {
        let start_line = self.line;
        loop {
            match self.peek() {
                None => {
                    diagnostics.report(start_line, Location::Unknown, "Unfinished comment");
                    return;
                }
                Some('*') if self.peek_next() == Some('/') => {
                    self.advance();
                    self.advance();
                    return;
                }
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    self.advance();
                }
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Scans `code` into tokens, always terminated by a single `Eof` token.
/// Lexical errors go to `diagnostics` and scanning carries on past them.
pub fn scan(code: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    let chars = code.chars().collect::<Vec<_>>();
    let mut scanner = Scanner::new(&chars);
    let mut result = vec![];

    loop {
        scanner.start = scanner.index;
        let Some(c) = scanner.advance() else {
            break;
        };

        let tok = match c {
            '(' => TokenType::LeftParen,
            ')' => TokenType::RightParen,
            '{' => TokenType::LeftBrace,
            '}' => TokenType::RightBrace,
            ',' => TokenType::Comma,
            '.' => TokenType::Dot,
            '+' => TokenType::Plus,
            '-' => TokenType::Minus,
            '*' => TokenType::Star,
            ';' => TokenType::Semicolon,
            '/' => {
                if scanner.match_next('/') {
                    while !matches!(scanner.peek(), Some('\n') | None) {
                        scanner.advance();
                    }
                    continue;
                }
                if scanner.match_next('*') {
                    scanner.block_comment(diagnostics);
                    continue;
                }
                TokenType::Slash
            }
            '>' => scanner.pick('=', TokenType::GreaterEqual, TokenType::Greater),
            '=' => scanner.pick('=', TokenType::EqualEqual, TokenType::Equal),
            '<' => scanner.pick('=', TokenType::LessEqual, TokenType::Less),
            '!' => scanner.pick('=', TokenType::BangEqual, TokenType::Bang),
            '\n' => {
                scanner.line += 1;
                continue;
            }
            '\r' | '\t' | ' ' => continue,
            '"' => match scanner.string(diagnostics) {
                Some(tok) => tok,
                None => continue,
            },
            c if c.is_ascii_digit() => scanner.number(),
            c if is_ident_start(c) => scanner.identifier(),
            _ => {
                diagnostics.report(scanner.line, Location::Unknown, "Unexpected character.");
                continue;
            }
        };

        result.push(scanner.token(tok));
    }

    result.push(Token::new(TokenType::Eof, "", scanner.line));
    debug!(tokens = result.len(), lines = scanner.line, "scanned");
    result
}
