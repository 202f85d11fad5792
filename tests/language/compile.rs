//! Rule compilation tests

use worldbible_foundation::ErrorKind;
use worldbible_language::compile;

fn error_kind(source: &str) -> ErrorKind {
    compile(source).unwrap_err().kind
}

#[test]
fn well_formed_rules_compile() {
    for source in [
        "(when (empty? (description self)) (report \"missing description\"))",
        "(let [n (count (relationships self))] (if (> n 10) (report (str n \" links\")) nil))",
        "(each [r (relationships self)] (when (nil? (target r)) (report \"dangling\")))",
        "(any? [e (elements-of \"event\")] (includes? (attr e :participants) (name self)))",
        "(do (report \"a\") (report (element (id self)) \"b\"))",
    ] {
        assert!(compile(source).is_ok(), "{source}");
    }
}

#[test]
fn syntax_errors_carry_a_position() {
    let err = compile("(when (= 1 1)\n  (report \"x\"").unwrap_err();
    let ErrorKind::ParseError { line, .. } = err.kind else {
        panic!("expected a parse error, got {:?}", err.kind);
    };
    assert!(line >= 1);
}

#[test]
fn unknown_names_are_rejected() {
    assert!(matches!(error_kind("(launch-missiles self)"), ErrorKind::UndefinedSymbol(_)));
    assert!(matches!(error_kind("(report unbound)"), ErrorKind::UndefinedSymbol(_)));
}

#[test]
fn wrong_arity_is_rejected() {
    assert!(matches!(error_kind("(name)"), ErrorKind::ArityMismatch { .. }));
    assert!(matches!(error_kind("(not= 1 2 3)"), ErrorKind::ArityMismatch { .. }));
}
