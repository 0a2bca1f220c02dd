use glint::diagnostic::Diagnostics;
use glint::parser::Parser;
use glint::scanner::scan;
use glint::statement::Stmt;
use pretty_assertions::assert_eq;

fn parse(code: &str) -> (Vec<Stmt>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan(code, &mut diagnostics);
    let program = Parser::new(&tokens, &mut diagnostics).parse();
    (program, diagnostics)
}

fn render(code: &str) -> Vec<String> {
    let (program, diagnostics) = parse(code);
    assert!(!diagnostics.had_error(), "unexpected syntax errors in {code:?}");
    program.iter().map(ToString::to_string).collect()
}

#[test]
fn precedence_and_associativity() {
    assert_eq!(
        render("1 + 2 * 3 - 4 / 5;"),
        ["(expr (- (+ 1 (* 2 3)) (/ 4 5)))"]
    );
    assert_eq!(
        render("print !-1 == 2 > 3 != false;"),
        ["(print (!= (== (! (- 1)) (> 2 3)) false))"]
    );
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(render("a = b = c + 1;"), ["(expr (= a (= b (+ c 1))))"]);
}

#[test]
fn declarations_and_blocks() {
    assert_eq!(
        render("var a; var b = \"s\"; { print a; { b; } }"),
        [
            "(var a)",
            "(var b \"s\")",
            "(block (print a) (block (expr b)))",
        ]
    );
}

#[test]
fn grouping_is_kept() {
    assert_eq!(render("(1 + 2) * nil;"), ["(expr (* (group (+ 1 2)) nil))"]);
}

#[test]
fn layout_does_not_change_the_tree() {
    let compact = render("var x=1+2;print x*(x-1);");
    let spread = render("var x =\n  1 + 2; // sum\nprint /* product */ x * (x - 1);\n");
    assert_eq!(compact, spread);
}

#[test]
fn recovery_resumes_at_statement_keyword() {
    let (program, diagnostics) = parse("var a = ) 1 print 2;");
    assert!(diagnostics.had_error());
    assert_eq!(diagnostics.syntax_errors().count(), 1);
    let rendered: Vec<_> = program.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["(print 2)"]);
}

#[test]
fn recovery_resumes_after_semicolon() {
    let (program, diagnostics) = parse("var ; var b = 2; { 1 + ; print 3; }");
    let rendered: Vec<_> = program.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["(var b 2)", "(block (print 3))"]);
    assert_eq!(diagnostics.syntax_errors().count(), 2);
}

#[test]
fn invalid_target_keeps_statement() {
    let (program, diagnostics) = parse("1 = 2;");
    assert!(diagnostics.had_error());
    assert_eq!(program.len(), 1);
}
