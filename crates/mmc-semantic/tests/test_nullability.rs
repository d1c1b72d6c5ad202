//! Tests for the inference of optional and pointer values.

mod common;

use common::{analyze, analyze_in, ident, messages, our_type, Model};
use mmc_ast::visitor::Transformer;
use mmc_ast::Comparator;
use mmc_semantic::{
    populate_base_environment, Canonicalizer, Environment, InferredType, NullabilityInferrer,
    OptionalPolicy, TypeInferrer,
};

#[test]
fn test_loop_variable_is_not_optional() {
    let mut m = Model::new();
    m.class("Baz", &[], &[]);
    m.class("Foo", &[], &[("bar", "Optional[List[Baz]]")]);

    let foo = m.tree.name(ident("foo"));
    let bar = m.tree.member(foo, ident("bar"));
    let bar_id = bar.id();
    let generator = m.tree.for_each(ident("b"), bar);
    let variable_id = generator.variable().id;
    let b = m.tree.name(ident("b"));
    let b_id = b.id();
    let condition = m.tree.is_not_none(b);
    let expr = m.tree.all(generator, condition);

    let table = m.build();
    let foo = our_type(&table, "Foo");
    let annotations = analyze(&table, &[("foo", foo)], &expr).unwrap();

    assert!(annotations.is_optional_map[&bar_id]);
    assert!(!annotations.is_optional_map[&variable_id]);
    assert!(!annotations.is_optional_map[&b_id]);
    assert!(!annotations.is_optional_map[&expr.id()]);
    assert_eq!(annotations.type_map[&variable_id], our_type(&table, "Baz"));
}

#[test]
fn test_quantifier_does_not_leak_its_variable() {
    let mut m = Model::new();
    m.class("Numbers", &[], &[("xs", "List[int]")]);

    let this = m.tree.name(ident("self"));
    let xs = m.tree.member(this, ident("xs"));
    let generator = m.tree.for_each(ident("y"), xs);
    let y = m.tree.name(ident("y"));
    let zero = m.tree.int(0);
    let condition = m.tree.comparison(y, Comparator::Gt, zero);
    let expr = m.tree.all(generator, condition);

    let table = m.build();
    let base = populate_base_environment(&table);
    let mut scope = Environment::child(&base);
    scope.set(ident("self"), our_type(&table, "Numbers"));

    let mut canonicalizer = Canonicalizer::new();
    canonicalizer.transform_expression(&expr);
    let mut types = TypeInferrer::new(&table, &scope, &canonicalizer.representations);
    assert_eq!(types.transform_expression(&expr), Some(InferredType::BOOL));
    assert_eq!(types.environment().find("y"), None);

    let mut optional = NullabilityInferrer::new(&table, &scope, &types.type_map, OptionalPolicy);
    assert_eq!(optional.transform_expression(&expr), Ok(false));
    assert_eq!(optional.environment().find("y"), None);
}

#[test]
fn test_variable_is_unresolved_after_the_quantifier() {
    let mut m = Model::new();
    m.class("Numbers", &[], &[("xs", "List[int]")]);

    let this = m.tree.name(ident("self"));
    let xs = m.tree.member(this, ident("xs"));
    let generator = m.tree.for_each(ident("y"), xs);
    let y = m.tree.name(ident("y"));
    let zero = m.tree.int(0);
    let condition = m.tree.comparison(y, Comparator::Gt, zero);
    let quantifier = m.tree.all(generator, condition);
    let leaked = m.tree.name(ident("y"));
    let leaked_id = leaked.id();
    let expr = m.tree.and(vec![quantifier, leaked]);

    let table = m.build();
    let errors = analyze_in(&table, "Numbers", &expr).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].node(), Some(leaked_id));
}

#[test]
fn test_shadowing_a_variable_is_rejected() {
    let mut m = Model::new();
    m.class("Numbers", &[], &[("xs", "List[int]")]);

    let this = m.tree.name(ident("self"));
    let xs = m.tree.member(this, ident("xs"));
    let inner_generator = m.tree.for_each(ident("x"), xs);
    let x = m.tree.name(ident("x"));
    let zero = m.tree.int(0);
    let inner_condition = m.tree.comparison(x, Comparator::Gt, zero);
    let inner = m.tree.all(inner_generator, inner_condition);

    let this = m.tree.name(ident("self"));
    let xs = m.tree.member(this, ident("xs"));
    let outer_generator = m.tree.for_each(ident("x"), xs);
    let expr = m.tree.any(outer_generator, inner);

    let table = m.build();
    let errors = analyze_in(&table, "Numbers", &expr).unwrap_err();
    assert_eq!(
        messages(&errors),
        ["The variable x has been already defined before"]
    );
}

#[test]
fn test_pointer_policy() {
    let mut m = Model::new();
    m.enumeration("Kind", &[("Leaf", "leaf")]);
    m.class("Code", &["str"], &[]);
    m.class("Blob", &["bytearray"], &[]);
    m.class("Item", &[], &[]);
    m.class(
        "Record",
        &[],
        &[
            ("count", "Optional[int]"),
            ("name", "Optional[str]"),
            ("data", "Optional[bytearray]"),
            ("kind", "Optional[Kind]"),
            ("code", "Optional[Code]"),
            ("blob", "Optional[Blob]"),
            ("item", "Optional[Item]"),
            ("items", "Optional[List[Item]]"),
            ("total", "int"),
        ],
    );

    let properties = [
        "count", "name", "data", "kind", "code", "blob", "item", "items", "total",
    ];
    let mut members = Vec::new();
    let mut checks = Vec::new();
    for property in properties {
        let this = m.tree.name(ident("self"));
        let member = m.tree.member(this, ident(property));
        members.push(member.id());
        checks.push(m.tree.is_none(member));
    }
    let expr = m.tree.or(checks);

    let table = m.build();
    let annotations = analyze_in(&table, "Record", &expr).unwrap();

    let pointers: Vec<bool> = members
        .iter()
        .map(|id| annotations.is_pointer_map[id])
        .collect();
    assert_eq!(
        pointers,
        [true, true, false, true, true, false, false, false, false]
    );

    let optionals: Vec<bool> = members
        .iter()
        .map(|id| annotations.is_optional_map[id])
        .collect();
    assert_eq!(
        optionals,
        [true, true, true, true, true, true, true, true, false]
    );
}

#[test]
fn test_calls_take_the_nullability_of_their_return() {
    let mut m = Model::new();
    m.class("Document", &[], &[]);
    m.method("Document", "title", Some("Optional[str]"));
    m.method("Document", "page_count", Some("int"));
    m.method("Document", "touch", None);
    m.verification("find_label", &[("text", "str")], Some("Optional[str]"));

    let this = m.tree.name(ident("self"));
    let title = m.tree.method_call(this, ident("title"), vec![]);
    let title_id = title.id();
    let this = m.tree.name(ident("self"));
    let pages = m.tree.method_call(this, ident("page_count"), vec![]);
    let pages_id = pages.id();
    let this = m.tree.name(ident("self"));
    let touch = m.tree.method_call(this, ident("touch"), vec![]);
    let touch_id = touch.id();
    let text = m.tree.str("abc");
    let label = m.tree.function_call(ident("find_label"), vec![text]);
    let label_id = label.id();

    let checks = vec![
        m.tree.is_none(title),
        m.tree.is_none(pages),
        m.tree.is_none(touch),
        m.tree.is_none(label),
    ];
    let expr = m.tree.or(checks);

    let table = m.build();
    let annotations = analyze_in(&table, "Document", &expr).unwrap();
    assert!(annotations.is_optional_map[&title_id]);
    assert!(!annotations.is_optional_map[&pages_id]);
    assert!(!annotations.is_optional_map[&touch_id]);
    assert!(annotations.is_optional_map[&label_id]);
    assert!(annotations.is_pointer_map[&label_id]);
}

#[test]
fn test_index_takes_the_nullability_of_the_items() {
    let mut m = Model::new();
    m.class("Table", &[], &[("cells", "List[Optional[str]]")]);

    let this = m.tree.name(ident("self"));
    let cells = m.tree.member(this, ident("cells"));
    let cells_id = cells.id();
    let zero = m.tree.int(0);
    let cell = m.tree.index(cells, zero);
    let cell_id = cell.id();
    let expr = m.tree.is_none(cell);

    let table = m.build();
    let annotations = analyze_in(&table, "Table", &expr).unwrap();
    assert!(!annotations.is_optional_map[&cells_id]);
    assert!(annotations.is_optional_map[&cell_id]);
    assert!(annotations.is_pointer_map[&cell_id]);
}

#[test]
fn test_first_error_is_returned_and_all_are_collected() {
    let mut m = Model::new();
    m.class("Empty", &[], &[]);

    let first = m.tree.name(ident("first"));
    let first_id = first.id();
    let second = m.tree.name(ident("second"));
    let second_id = second.id();
    let expr = m.tree.or(vec![first, second]);

    let table = m.build();
    let base = populate_base_environment(&table);
    let mut typed = Environment::child(&base);
    typed.set(ident("first"), InferredType::BOOL);
    typed.set(ident("second"), InferredType::BOOL);

    let mut canonicalizer = Canonicalizer::new();
    canonicalizer.transform_expression(&expr);
    let mut types = TypeInferrer::new(&table, &typed, &canonicalizer.representations);
    types.transform_expression(&expr);
    assert!(types.errors.is_empty());

    // Neither variable is visible to the nullability pass.
    let mut inferrer = NullabilityInferrer::new(&table, &base, &types.type_map, OptionalPolicy);
    let error = inferrer.transform_expression(&expr).unwrap_err();
    assert_eq!(error.node(), Some(first_id));

    let nodes: Vec<_> = inferrer.errors.iter().map(|error| error.node()).collect();
    assert_eq!(nodes, [Some(first_id), Some(second_id)]);
    assert!(!inferrer.nullability.contains_key(&expr.id()));
}
