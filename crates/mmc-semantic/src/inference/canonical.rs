//! Canonical textual representation of the nodes.
//!
//! Two nodes with the same representation denote the same value in an
//! invariant, which is how `x is not None` in an antecedent is matched with
//! the later uses of `x`.

use mmc_ast::visitor::Transformer;
use mmc_ast::{
    Add, All, And, Any, Assignment, Comparison, Constant, ConstantValue, Expression, ForEach,
    ForRange, FormattedValue, FunctionCall, Implication, Index, IsIn, IsNone, IsNotNone,
    JoinedStr, JoinedStrValue, Member, MethodCall, Name, Not, Or, Return, Sub,
};
use mmc_core::NodeId;
use std::collections::HashMap;

/// Records the representation of every node it transforms.
#[derive(Debug, Default)]
pub struct Canonicalizer {
    pub representations: HashMap<NodeId, String>,
}

impl Canonicalizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, node: NodeId, representation: String) -> String {
        self.representations.insert(node, representation.clone());
        representation
    }

    fn operand(&mut self, expr: &Expression) -> String {
        let representation = self.transform_expression(expr);
        if needs_no_brackets(expr) {
            representation
        } else {
            format!("({representation})")
        }
    }

    fn joined(&mut self, values: &[Expression], separator: &str) -> String {
        values
            .iter()
            .map(|value| self.operand(value))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn call(&mut self, callee: String, args: &[Expression]) -> String {
        let args = args
            .iter()
            .map(|arg| self.transform_expression(arg))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{callee}({args})")
    }
}

fn needs_no_brackets(expr: &Expression) -> bool {
    matches!(
        expr,
        Expression::Member(_)
            | Expression::MethodCall(_)
            | Expression::Name(_)
            | Expression::FunctionCall(_)
            | Expression::Constant(_)
            | Expression::JoinedStr(_)
            | Expression::Any(_)
            | Expression::All(_)
    )
}

fn constant(value: &ConstantValue) -> String {
    match value {
        ConstantValue::Bool(true) => "True".to_string(),
        ConstantValue::Bool(false) => "False".to_string(),
        ConstantValue::Int(value) => value.to_string(),
        ConstantValue::Float(value) => format!("{value:?}"),
        ConstantValue::Str(value) => format!("{value:?}"),
        ConstantValue::Bytes(value) => format!("b{:?}", String::from_utf8_lossy(value)),
    }
}

impl Transformer<String> for Canonicalizer {
    fn transform_member(&mut self, node: &Member) -> String {
        let instance = self.operand(&node.instance);
        self.record(node.id, format!("{instance}.{}", node.name))
    }

    fn transform_index(&mut self, node: &Index) -> String {
        let collection = self.operand(&node.collection);
        let index = self.transform_expression(&node.index);
        self.record(node.id, format!("{collection}[{index}]"))
    }

    fn transform_comparison(&mut self, node: &Comparison) -> String {
        let left = self.operand(&node.left);
        let right = self.operand(&node.right);
        self.record(node.id, format!("{left} {} {right}", node.op))
    }

    fn transform_is_in(&mut self, node: &IsIn) -> String {
        let member = self.operand(&node.member);
        let container = self.operand(&node.container);
        self.record(node.id, format!("{member} in {container}"))
    }

    fn transform_implication(&mut self, node: &Implication) -> String {
        let antecedent = self.operand(&node.antecedent);
        let consequent = self.operand(&node.consequent);
        self.record(node.id, format!("{antecedent} ⇒ {consequent}"))
    }

    fn transform_method_call(&mut self, node: &MethodCall) -> String {
        let member = self.transform_member(&node.member);
        let representation = self.call(member, &node.args);
        self.record(node.id, representation)
    }

    fn transform_function_call(&mut self, node: &FunctionCall) -> String {
        let name = self.transform_name(&node.name);
        let representation = self.call(name, &node.args);
        self.record(node.id, representation)
    }

    fn transform_constant(&mut self, node: &Constant) -> String {
        self.record(node.id, constant(&node.value))
    }

    fn transform_is_none(&mut self, node: &IsNone) -> String {
        let value = self.operand(&node.value);
        self.record(node.id, format!("{value} is None"))
    }

    fn transform_is_not_none(&mut self, node: &IsNotNone) -> String {
        let value = self.operand(&node.value);
        self.record(node.id, format!("{value} is not None"))
    }

    fn transform_not(&mut self, node: &Not) -> String {
        let operand = self.operand(&node.operand);
        self.record(node.id, format!("not {operand}"))
    }

    fn transform_name(&mut self, node: &Name) -> String {
        self.record(node.id, node.identifier.to_string())
    }

    fn transform_and(&mut self, node: &And) -> String {
        let representation = self.joined(&node.values, " and ");
        self.record(node.id, representation)
    }

    fn transform_or(&mut self, node: &Or) -> String {
        let representation = self.joined(&node.values, " or ");
        self.record(node.id, representation)
    }

    fn transform_add(&mut self, node: &Add) -> String {
        let left = self.operand(&node.left);
        let right = self.operand(&node.right);
        self.record(node.id, format!("{left} + {right}"))
    }

    fn transform_sub(&mut self, node: &Sub) -> String {
        let left = self.operand(&node.left);
        let right = self.operand(&node.right);
        self.record(node.id, format!("{left} - {right}"))
    }

    fn transform_formatted_value(&mut self, node: &FormattedValue) -> String {
        let value = self.transform_expression(&node.value);
        self.record(node.id, value)
    }

    fn transform_joined_str(&mut self, node: &JoinedStr) -> String {
        let mut parts = String::new();
        for value in &node.values {
            match value {
                JoinedStrValue::Text(text) => parts.push_str(&format!("{text:?}")),
                JoinedStrValue::Formatted(formatted) => {
                    let formatted = self.transform_formatted_value(formatted);
                    parts.push_str(&format!("{{{formatted}}}"));
                }
            }
        }
        self.record(node.id, parts)
    }

    fn transform_for_each(&mut self, node: &ForEach) -> String {
        let variable = self.transform_name(&node.variable);
        let iteration = self.operand(&node.iteration);
        self.record(node.id, format!("for {variable} in {iteration}"))
    }

    fn transform_for_range(&mut self, node: &ForRange) -> String {
        let variable = self.transform_name(&node.variable);
        let start = self.transform_expression(&node.start);
        let end = self.transform_expression(&node.end);
        self.record(
            node.id,
            format!("for {variable} in range({start}, {end})"),
        )
    }

    fn transform_any(&mut self, node: &Any) -> String {
        let generator = self.transform_generator(&node.generator);
        let condition = self.operand(&node.condition);
        self.record(node.id, format!("any({condition} {generator})"))
    }

    fn transform_all(&mut self, node: &All) -> String {
        let generator = self.transform_generator(&node.generator);
        let condition = self.operand(&node.condition);
        self.record(node.id, format!("all({condition} {generator})"))
    }

    fn transform_assignment(&mut self, node: &Assignment) -> String {
        let target = self.operand(&node.target);
        let value = self.transform_expression(&node.value);
        self.record(node.id, format!("{target} = {value}"))
    }

    fn transform_return(&mut self, node: &Return) -> String {
        let representation = match &node.value {
            Some(value) => format!("return {}", self.transform_expression(value)),
            None => "return".to_string(),
        };
        self.record(node.id, representation)
    }
}
