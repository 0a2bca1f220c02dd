use glint::diagnostic::Diagnostics;
use glint::expr::Val;
use glint::scanner::scan;
use glint::token::TokenType;
use pretty_assertions::assert_eq;

fn kinds(code: &str) -> Vec<TokenType> {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan(code, &mut diagnostics);
    assert!(!diagnostics.had_error(), "unexpected errors scanning {code:?}");
    tokens.into_iter().map(|t| t.data).collect()
}

#[test]
fn arithmetic() {
    assert_eq!(
        kinds("1 + 2 * 3"),
        [
            TokenType::Number(1.0),
            TokenType::Plus,
            TokenType::Number(2.0),
            TokenType::Star,
            TokenType::Number(3.0),
            TokenType::Eof,
        ]
    );
}

#[test]
fn two_char_operators() {
    assert_eq!(
        kinds("! != = == < <= > >= /"),
        [
            TokenType::Bang,
            TokenType::BangEqual,
            TokenType::Equal,
            TokenType::EqualEqual,
            TokenType::Less,
            TokenType::LessEqual,
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::Slash,
            TokenType::Eof,
        ]
    );
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds("var _tmp2 = nil; print orchid or and_"),
        [
            TokenType::Var,
            TokenType::Identifier("_tmp2".into()),
            TokenType::Equal,
            TokenType::Nil,
            TokenType::Semicolon,
            TokenType::Print,
            TokenType::Identifier("orchid".into()),
            TokenType::Or,
            TokenType::Identifier("and_".into()),
            TokenType::Eof,
        ]
    );
}

#[test]
fn trailing_dot_is_not_part_of_number() {
    assert_eq!(
        kinds("12.5 7."),
        [
            TokenType::Number(12.5),
            TokenType::Number(7.0),
            TokenType::Dot,
            TokenType::Eof,
        ]
    );
}

#[test]
fn lexemes_and_literals() {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan("\"hi there\" 3.25", &mut diagnostics);
    assert_eq!(&*tokens[0].lexeme, "\"hi there\"");
    assert_eq!(tokens[0].literal(), Some(Val::String("hi there".into())));
    assert_eq!(&*tokens[1].lexeme, "3.25");
    assert_eq!(tokens[1].literal(), Some(Val::Num(3.25)));
    assert_eq!(tokens[2].literal(), None);
    assert_eq!(tokens[0].to_string(), "STRING \"hi there\" hi there");
    assert_eq!(tokens[1].to_string(), "NUMBER 3.25 3.25");
    assert_eq!(tokens[2].to_string(), "EOF  nil");
}

#[test]
fn whole_number_literal_keeps_fraction() {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan("7 0.5", &mut diagnostics);
    assert_eq!(tokens[0].to_string(), "NUMBER 7 7.0");
    assert_eq!(tokens[1].to_string(), "NUMBER 0.5 0.5");
}

#[test]
fn comments_and_lines() {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan("// one\n/* two\nthree */ a\n\"x\ny\" b", &mut diagnostics);
    let lines: Vec<_> = tokens.iter().map(|t| (t.lexeme.to_string(), t.line)).collect();
    assert_eq!(
        lines,
        [
            ("a".to_string(), 3),
            ("\"x\ny\"".to_string(), 5),
            ("b".to_string(), 5),
            ("".to_string(), 5),
        ]
    );
}

#[test]
fn errors_do_not_stop_the_scan() {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan("a $ b\n\"open", &mut diagnostics);
    let kinds: Vec<_> = tokens.into_iter().map(|t| t.data).collect();
    assert_eq!(
        kinds,
        [
            TokenType::Identifier("a".into()),
            TokenType::Identifier("b".into()),
            TokenType::Eof,
        ]
    );
    let rendered: Vec<_> = diagnostics.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        [
            "[line 1] Error: Unexpected character.",
            "[line 2] Error: Unterminated string.",
        ]
    );
}
