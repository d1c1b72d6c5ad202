//! Tests for the reconstruction of patterns from verification functions.

mod common;

use common::{ident, ModelBuilder};
use mmc_ast::{Expression, JoinedStrValue, Statement};
use mmc_ir::{reconstruct_pattern, PatternOutcome};

/// `return match(pattern, text) is not None`
fn matching(m: &mut ModelBuilder, pattern: Expression, text: Expression) -> Statement {
    let call = m.tree.function_call(ident("match"), vec![pattern, text]);
    let check = m.tree.is_not_none(call);
    m.tree.ret(Some(check))
}

fn malformed_message(outcome: PatternOutcome) -> String {
    match outcome {
        PatternOutcome::Malformed(error) => error.message().to_string(),
        other => panic!("expected a malformed pattern function, got: {other:?}"),
    }
}

#[test]
fn test_constant_pattern() {
    let mut m = ModelBuilder::new();
    let pattern = m.tree.str("^[0-9]+$");
    let text = m.tree.name(ident("x"));
    let body = vec![matching(&mut m, pattern, text)];
    let function = m.function("matches_digits", &[("x", "str")], Some("bool"), body);

    assert_eq!(
        reconstruct_pattern(&function),
        PatternOutcome::Matched("^[0-9]+$".to_string())
    );
}

#[test]
fn test_pattern_over_assignments() {
    let mut m = ModelBuilder::new();

    let digit_name = m.tree.name(ident("digit"));
    let digit_value = m.tree.str("[0-9]");
    let assign_digit = m.tree.assignment(digit_name, digit_value);

    let pattern_name = m.tree.name(ident("pattern"));
    let digit = m.tree.name(ident("digit"));
    let formatted = m.tree.formatted_value(digit);
    let joined = m.tree.joined_str(vec![
        JoinedStrValue::Text("^".to_string()),
        JoinedStrValue::Formatted(formatted),
        JoinedStrValue::Text("{4}$".to_string()),
    ]);
    let assign_pattern = m.tree.assignment(pattern_name, joined);

    let pattern = m.tree.name(ident("pattern"));
    let text = m.tree.name(ident("text"));
    let ret = matching(&mut m, pattern, text);

    let function = m.function(
        "matches_year",
        &[("text", "str")],
        Some("bool"),
        vec![assign_digit, assign_pattern, ret],
    );

    assert_eq!(
        reconstruct_pattern(&function),
        PatternOutcome::Matched("^[0-9]{4}$".to_string())
    );
}

#[test]
fn test_other_signatures_are_not_pattern_functions() {
    let mut m = ModelBuilder::new();
    let pattern = m.tree.str("^a$");
    let text = m.tree.name(ident("y"));
    let body = vec![matching(&mut m, pattern, text)];
    let function = m.function("count", &[("y", "str")], Some("int"), body);

    assert_eq!(
        reconstruct_pattern(&function),
        PatternOutcome::NotAPatternFunction
    );

    let value = m.tree.bool(true);
    let body = vec![m.tree.ret(Some(value))];
    let function = m.function("always", &[("y", "str")], Some("bool"), body);
    assert_eq!(
        reconstruct_pattern(&function),
        PatternOutcome::NotAPatternFunction
    );
}

#[test]
fn test_swapped_arguments_are_malformed() {
    let mut m = ModelBuilder::new();
    let text = m.tree.name(ident("x"));
    let pattern = m.tree.str("^a$");
    let body = vec![matching(&mut m, text, pattern)];
    let function = m.function("matches_a", &[("x", "str")], Some("bool"), body);

    let message = malformed_message(reconstruct_pattern(&function));
    assert!(message.starts_with("The second argument to match"));
}

#[test]
fn test_text_as_pattern_is_malformed() {
    let mut m = ModelBuilder::new();
    let pattern = m.tree.name(ident("x"));
    let text = m.tree.name(ident("x"));
    let body = vec![matching(&mut m, pattern, text)];
    let function = m.function("matches_itself", &[("x", "str")], Some("bool"), body);

    let message = malformed_message(reconstruct_pattern(&function));
    assert!(message.starts_with("The first argument to match"));
}

#[test]
fn test_missing_is_not_none_is_malformed() {
    let mut m = ModelBuilder::new();
    let pattern = m.tree.str("^a$");
    let text = m.tree.name(ident("x"));
    let call = m.tree.function_call(ident("match"), vec![pattern, text]);
    let body = vec![m.tree.ret(Some(call))];
    let function = m.function("matches_a", &[("x", "str")], Some("bool"), body);

    let message = malformed_message(reconstruct_pattern(&function));
    assert!(message.contains("return match(...) is not None"));
}

#[test]
fn test_invalid_regex_is_malformed() {
    let mut m = ModelBuilder::new();
    let pattern = m.tree.str("^[0-9+$");
    let text = m.tree.name(ident("x"));
    let body = vec![matching(&mut m, pattern, text)];
    let function = m.function("matches_broken", &[("x", "str")], Some("bool"), body);

    match reconstruct_pattern(&function) {
        PatternOutcome::Malformed(error) => {
            assert_eq!(
                error.message(),
                "The pattern \"^[0-9+$\" is not a valid regular expression"
            );
            assert_eq!(error.underlying().len(), 1);
        }
        other => panic!("expected a malformed pattern function, got: {other:?}"),
    }
}

#[test]
fn test_unsupported_statement_is_malformed() {
    let mut m = ModelBuilder::new();
    let target = m.tree.name(ident("count"));
    let value = m.tree.int(3);
    let assignment = m.tree.assignment(target, value);

    let pattern = m.tree.name(ident("count"));
    let text = m.tree.name(ident("x"));
    let ret = matching(&mut m, pattern, text);
    let function = m.function(
        "matches_count",
        &[("x", "str")],
        Some("bool"),
        vec![assignment, ret],
    );

    let message = malformed_message(reconstruct_pattern(&function));
    assert!(message.starts_with("Only string constants"));
}

#[test]
fn test_concatenated_pattern() {
    let mut m = ModelBuilder::new();
    let target = m.tree.name(ident("digits"));
    let start = m.tree.str("[0-9]");
    let repeat = m.tree.str("+");
    let value = m.tree.add(start, repeat);
    let assignment = m.tree.assignment(target, value);

    let anchor = m.tree.str("^");
    let digits = m.tree.name(ident("digits"));
    let prefix = m.tree.add(anchor, digits);
    let end = m.tree.str("$");
    let pattern = m.tree.add(prefix, end);
    let text = m.tree.name(ident("x"));
    let ret = matching(&mut m, pattern, text);
    let function = m.function(
        "matches_digits",
        &[("x", "str")],
        Some("bool"),
        vec![assignment, ret],
    );

    assert_eq!(
        reconstruct_pattern(&function),
        PatternOutcome::Matched("^[0-9]+$".to_string())
    );
}
