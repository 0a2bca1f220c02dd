use glint::expr::Val;
use glint::interpreter::Interpreter;
use pretty_assertions::assert_eq;

fn output(code: &str) -> String {
    let mut interp = Interpreter::with_output(Vec::new());
    interp.run(code).unwrap();
    String::from_utf8(interp.into_output()).unwrap()
}

#[test]
fn volume() {
    let mut interp = Interpreter::with_output(Vec::new());
    interp
        .run(
            "
// How loud?
var volume = 11;

// Silence.
volume = 0;

// Calculate size of 3x4x5 cuboid.
{
  var volume = 3 * 4 * 5;
  print volume;
}
",
        )
        .unwrap();

    assert_eq!(interp.get_global("volume"), Some(Val::Num(0.0)));
    assert_eq!(interp.output().as_slice(), b"60\n");
}

#[test]
fn globals() {
    let mut interp = Interpreter::with_output(Vec::new());
    interp
        .run(
            "
var result;
var global = \"outside\";
{
  var local = \"inside\";
  result = global + local;
}",
        )
        .unwrap();

    assert_eq!(interp.get_global("result"), Some(Val::String("outsideinside".into())));
}

#[test]
fn comment() {
    let mut interp = Interpreter::with_output(Vec::new());
    interp
        .run(
            "
var result;
// result = 42;
/* result = 7;
   result = 8; */
result = 6;
",
        )
        .unwrap();

    assert_eq!(interp.get_global("result"), Some(Val::Num(6.0)));
}

#[test]
fn precedence() {
    assert_eq!(output("print 1 + 2 * 3;"), "7\n");
    assert_eq!(output("print (1 + 2) * 3;"), "9\n");
    assert_eq!(output("print 10 - 4 - 3;"), "3\n");
    assert_eq!(output("print 8 / 4 / 2;"), "1\n");
    assert_eq!(output("print -2 * -3;"), "6\n");
    assert_eq!(output("print 1 < 2 == true;"), "true\n");
}

#[test]
fn mixed_plus_concatenates() {
    assert_eq!(output("print \"a\" + 1;"), "a1\n");
    assert_eq!(output("print 1 + \"a\";"), "1a\n");
    assert_eq!(output("print \"x\" + nil + true;"), "xniltrue\n");
    assert_eq!(output("print 2.5 + \"!\";"), "2.5!\n");
}

#[test]
fn string_repetition() {
    assert_eq!(output("print 3 * \"x\";"), "x x x\n");
    assert_eq!(output("print \"ab\" * 2;"), "ab ab\n");
    assert_eq!(output("print \"x\" * 0;"), "\n");
    assert_eq!(output("print \"x\" * 2.9;"), "x x\n");
    assert_eq!(output("print \"x\" * -1;"), "\n");
}

#[test]
fn shadowing_keeps_outer_binding() {
    assert_eq!(output("var a = 1; { var a = 2; print a; } print a;"), "2\n1\n");
}

#[test]
fn assignment_reaches_enclosing_scope() {
    assert_eq!(output("var a = 1; { { a = 2; } } print a;"), "2\n");
}

#[test]
fn redeclaration_overwrites() {
    assert_eq!(output("var a = 1; var a; print a;"), "nil\n");
}

#[test]
fn chained_assignment() {
    let mut interp = Interpreter::with_output(Vec::new());
    interp.run("var a; var b; a = b = 3;").unwrap();
    assert_eq!(interp.get_global("a"), Some(Val::Num(3.0)));
    assert_eq!(interp.get_global("b"), Some(Val::Num(3.0)));
}

#[test]
fn stringify_numbers() {
    assert_eq!(output("print 4.0;"), "4\n");
    assert_eq!(output("print 4.5;"), "4.5\n");
    assert_eq!(output("print nil;"), "nil\n");
    assert_eq!(output("print -0.25;"), "-0.25\n");
}

#[test]
fn equality_across_kinds() {
    assert_eq!(output("print (1 == \"1\");"), "false\n");
    assert_eq!(output("print (1 == 1.0);"), "true\n");
    assert_eq!(output("print nil == nil;"), "true\n");
    assert_eq!(output("print nil != false;"), "true\n");
    assert_eq!(output("print \"a\" == \"a\";"), "true\n");
}

#[test]
fn truthiness() {
    assert_eq!(output("print !nil;"), "true\n");
    assert_eq!(output("print !0;"), "true\n");
    assert_eq!(output("print !\"\";"), "true\n");
    assert_eq!(output("print !\"a\";"), "false\n");
    assert_eq!(output("print !!3;"), "true\n");
}

#[test]
fn string_comparison() {
    assert_eq!(output("print \"apple\" < \"banana\";"), "true\n");
    assert_eq!(output("print \"b\" >= \"b\";"), "true\n");
    assert_eq!(output("print 3 <= 2;"), "false\n");
}

#[test]
fn multiline_string_literal() {
    assert_eq!(output("print \"one\ntwo\";"), "one\ntwo\n");
}

#[test]
fn globals_persist_between_runs() {
    let mut interp = Interpreter::with_output(Vec::new());
    interp.run("var count = 1;").unwrap();
    interp.run("count = count + 1;").unwrap();
    assert_eq!(interp.get_global("count"), Some(Val::Num(2.0)));
}
