//! Tests for the type-annotation pass.

mod common;

use common::{analyze, analyze_in, ident, messages, our_type, Model};
use mmc_ast::visitor::Transformer;
use mmc_ast::Comparator;
use mmc_semantic::{
    populate_base_environment, Canonicalizer, Environment, InferredPrimitive, InferredType,
    TypeInferrer,
};

fn optional(ty: InferredType) -> InferredType {
    InferredType::Optional(Box::new(ty))
}

fn document() -> Model {
    let mut m = Model::new();
    m.enumeration("Kind", &[("Leaf", "leaf"), ("Node", "node")]);
    m.class("Item", &[], &[]);
    m.class(
        "Document",
        &[],
        &[
            ("items", "List[Item]"),
            ("label", "Optional[str]"),
            ("kind", "Kind"),
        ],
    );
    m.verification("is_valid", &[("text", "str")], Some("bool"));
    m
}

#[test]
fn test_len_is_length() {
    let mut m = document();
    let this = m.tree.name(ident("self"));
    let items = m.tree.member(this, ident("items"));
    let call = m.tree.function_call(ident("len"), vec![items]);
    let call_id = call.id();
    let zero = m.tree.int(0);
    let expr = m.tree.comparison(call, Comparator::Gt, zero);

    let table = m.build();
    let annotations = analyze_in(&table, "Document", &expr).unwrap();
    assert_eq!(
        annotations.type_map[&call_id],
        InferredType::Primitive(InferredPrimitive::Length)
    );
    assert_eq!(annotations.type_map[&expr.id()], InferredType::BOOL);
}

#[test]
fn test_member_types() {
    let mut m = document();
    let this = m.tree.name(ident("self"));
    let this_id = this.id();
    let label = m.tree.member(this, ident("label"));
    let label_id = label.id();
    let expr = m.tree.is_none(label);

    let table = m.build();
    let annotations = analyze_in(&table, "Document", &expr).unwrap();
    assert_eq!(annotations.type_map[&this_id], our_type(&table, "Document"));
    assert_eq!(annotations.type_map[&label_id], optional(InferredType::STR));
}

#[test]
fn test_implication_narrows_optional_values() {
    let mut m = document();
    let this = m.tree.name(ident("self"));
    let label = m.tree.member(this, ident("label"));
    let asserted_id = label.id();
    let antecedent = m.tree.is_not_none(label);

    let this = m.tree.name(ident("self"));
    let label = m.tree.member(this, ident("label"));
    let narrowed_id = label.id();
    let call = m.tree.function_call(ident("is_valid"), vec![label]);
    let expr = m.tree.implication(antecedent, call);

    let table = m.build();
    let annotations = analyze_in(&table, "Document", &expr).unwrap();
    assert_eq!(annotations.type_map[&asserted_id], optional(InferredType::STR));
    assert_eq!(annotations.type_map[&narrowed_id], InferredType::STR);
}

#[test]
fn test_narrowing_ends_with_the_consequent() {
    let mut m = document();
    let this = m.tree.name(ident("self"));
    let label = m.tree.member(this, ident("label"));
    let antecedent = m.tree.is_not_none(label);
    let this = m.tree.name(ident("self"));
    let label = m.tree.member(this, ident("label"));
    let consequent = m.tree.is_not_none(label);
    let implication = m.tree.implication(antecedent, consequent);

    let this = m.tree.name(ident("self"));
    let label = m.tree.member(this, ident("label"));
    let after_id = label.id();
    let after = m.tree.is_none(label);
    let expr = m.tree.or(vec![implication, after]);

    let table = m.build();
    let annotations = analyze_in(&table, "Document", &expr).unwrap();
    assert_eq!(annotations.type_map[&after_id], optional(InferredType::STR));
}

#[test]
fn test_conjunction_narrows_later_conjuncts() {
    let mut m = document();
    let this = m.tree.name(ident("self"));
    let label = m.tree.member(this, ident("label"));
    let check = m.tree.is_not_none(label);
    let this = m.tree.name(ident("self"));
    let label = m.tree.member(this, ident("label"));
    let narrowed_id = label.id();
    let call = m.tree.function_call(ident("len"), vec![label]);
    let zero = m.tree.int(0);
    let comparison = m.tree.comparison(call, Comparator::Gt, zero);
    let expr = m.tree.and(vec![check, comparison]);

    let table = m.build();
    let annotations = analyze_in(&table, "Document", &expr).unwrap();
    assert_eq!(annotations.type_map[&narrowed_id], InferredType::STR);
}

#[test]
fn test_enumeration_literals() {
    let mut m = document();
    let this = m.tree.name(ident("self"));
    let kind = m.tree.member(this, ident("kind"));
    let enumeration = m.tree.name(ident("Kind"));
    let enumeration_id = enumeration.id();
    let literal = m.tree.member(enumeration, ident("Leaf"));
    let literal_id = literal.id();
    let expr = m.tree.comparison(kind, Comparator::Eq, literal);

    let table = m.build();
    let annotations = analyze_in(&table, "Document", &expr).unwrap();
    let kind = table.find("Kind").unwrap();
    assert_eq!(annotations.type_map[&literal_id], InferredType::OurType(kind));
    assert!(matches!(
        annotations.type_map[&enumeration_id],
        InferredType::EnumerationAsType(_)
    ));
}

#[test]
fn test_missing_literal() {
    let mut m = document();
    let enumeration = m.tree.name(ident("Kind"));
    let expr = m.tree.member(enumeration, ident("Branch"));

    let table = m.build();
    let errors = analyze(&table, &[], &expr).unwrap_err();
    assert_eq!(
        messages(&errors),
        ["The literal Branch could not be found in the enumeration Kind"]
    );
}

#[test]
fn test_sibling_errors_are_accumulated() {
    let mut m = document();
    let this = m.tree.name(ident("self"));
    let first = m.tree.member(this, ident("title"));
    let this = m.tree.name(ident("self"));
    let second = m.tree.member(this, ident("author"));
    let expr = m.tree.or(vec![first, second]);

    let table = m.build();
    let errors = analyze_in(&table, "Document", &expr).unwrap_err();
    assert_eq!(
        messages(&errors),
        [
            "The member title could not be found in the class Document",
            "The member author could not be found in the class Document",
        ]
    );
}

#[test]
fn test_both_sides_of_an_implication_are_reported() {
    let mut m = document();
    let first = m.tree.name(ident("unknown_a"));
    let first_id = first.id();
    let antecedent = m.tree.is_not_none(first);
    let second = m.tree.name(ident("unknown_b"));
    let second_id = second.id();
    let consequent = m.tree.is_none(second);
    let expr = m.tree.implication(antecedent, consequent);

    let table = m.build();
    let errors = analyze(&table, &[], &expr).unwrap_err();
    let nodes: Vec<_> = errors.iter().map(|error| error.node()).collect();
    assert_eq!(nodes, [Some(first_id), Some(second_id)]);
}

#[test]
fn test_method_call_errors_follow_the_source_order() {
    let mut m = document();
    let this = m.tree.name(ident("self"));
    let argument = m.tree.name(ident("unknown"));
    let argument_id = argument.id();
    let call = m.tree.method_call(this, ident("missing"), vec![argument]);

    let table = m.build();
    let errors = analyze_in(&table, "Document", &call).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors[0].message(),
        "The member missing could not be found in the class Document"
    );
    assert_eq!(errors[1].node(), Some(argument_id));
}

#[test]
fn test_iteration_over_a_non_list() {
    let mut m = document();
    let this = m.tree.name(ident("self"));
    let label = m.tree.member(this, ident("label"));
    let generator = m.tree.for_each(ident("c"), label);
    let condition = m.tree.bool(true);
    let expr = m.tree.any(generator, condition);

    let table = m.build();
    let errors = analyze_in(&table, "Document", &expr).unwrap_err();
    assert_eq!(
        messages(&errors),
        ["Expected an iteration over a list, but got: Optional[str]"]
    );
}

#[test]
fn test_calling_a_non_function() {
    let mut m = document();
    let expr = m.tree.function_call(ident("self"), vec![]);

    let table = m.build();
    let errors = analyze_in(&table, "Document", &expr).unwrap_err();
    assert_eq!(
        messages(&errors),
        ["Expected the variable self to be a function, but got Document"]
    );
}

#[test]
fn test_unknown_name_is_not_looked_up_globally() {
    let mut m = document();
    let expr = m.tree.name(ident("Document"));

    let table = m.build();
    let errors = analyze(&table, &[], &expr).unwrap_err();
    assert!(errors[0]
        .message()
        .starts_with("We do not know how to infer the type of the variable with the identifier Document"));
}

#[test]
fn test_assignments_bind_new_variables() {
    let mut m = document();
    let this = m.tree.name(ident("self"));
    let items = m.tree.member(this, ident("items"));
    let count = m.tree.function_call(ident("len"), vec![items]);
    let target = m.tree.name(ident("count"));
    let target_id = target.id();
    let statement = m.tree.assignment(target, count);

    let table = m.build();
    let base = populate_base_environment(&table);
    let mut scope = Environment::child(&base);
    scope.set(ident("self"), our_type(&table, "Document"));

    let mut canonicalizer = Canonicalizer::new();
    canonicalizer.transform_statement(&statement);
    let mut inferrer = TypeInferrer::new(&table, &scope, &canonicalizer.representations);
    assert_eq!(
        inferrer.transform_statement(&statement),
        Some(InferredType::NONE)
    );
    let length = InferredType::Primitive(InferredPrimitive::Length);
    assert_eq!(inferrer.environment().find("count"), Some(&length));
    assert_eq!(inferrer.type_map[&target_id], length);
}

#[test]
fn test_unassignable_value() {
    let mut m = document();
    let this = m.tree.name(ident("self"));
    let target = m.tree.member(this, ident("label"));
    let value = m.tree.int(1);
    let statement = m.tree.assignment(target, value);

    let table = m.build();
    let base = populate_base_environment(&table);
    let mut scope = Environment::child(&base);
    scope.set(ident("self"), our_type(&table, "Document"));

    let mut canonicalizer = Canonicalizer::new();
    canonicalizer.transform_statement(&statement);
    let mut inferrer = TypeInferrer::new(&table, &scope, &canonicalizer.representations);
    assert_eq!(inferrer.transform_statement(&statement), None);
    assert_eq!(
        messages(&inferrer.errors),
        ["We inferred the target type of the assignment to be Optional[str], while the \
          value type is inferred to be int. We do not know how to model this assignment."]
    );
}
