//! Dispatch over the closed node set.
//!
//! [`Transformer`] has one required method per node kind and a provided,
//! exhaustive dispatcher. A transformer missing a node kind does not compile.
//!
//! [`Visitor`] descends into all children by default, sub-expressions left to
//! right as written. Override a method to act on a node kind and call the
//! matching `walk_*` function to keep descending.

use crate::tree::*;
use mmc_core::NodeId;

/// Transforms nodes into values of type `T`.
pub trait Transformer<T> {
    /// Dispatches `expr` to the method of its kind.
    fn transform_expression(&mut self, expr: &Expression) -> T {
        match expr {
            Expression::Member(node) => self.transform_member(node),
            Expression::Index(node) => self.transform_index(node),
            Expression::Comparison(node) => self.transform_comparison(node),
            Expression::IsIn(node) => self.transform_is_in(node),
            Expression::Implication(node) => self.transform_implication(node),
            Expression::MethodCall(node) => self.transform_method_call(node),
            Expression::FunctionCall(node) => self.transform_function_call(node),
            Expression::Constant(node) => self.transform_constant(node),
            Expression::IsNone(node) => self.transform_is_none(node),
            Expression::IsNotNone(node) => self.transform_is_not_none(node),
            Expression::Not(node) => self.transform_not(node),
            Expression::Name(node) => self.transform_name(node),
            Expression::And(node) => self.transform_and(node),
            Expression::Or(node) => self.transform_or(node),
            Expression::Add(node) => self.transform_add(node),
            Expression::Sub(node) => self.transform_sub(node),
            Expression::FormattedValue(node) => self.transform_formatted_value(node),
            Expression::JoinedStr(node) => self.transform_joined_str(node),
            Expression::Any(node) => self.transform_any(node),
            Expression::All(node) => self.transform_all(node),
        }
    }

    fn transform_generator(&mut self, generator: &Generator) -> T {
        match generator {
            Generator::ForEach(node) => self.transform_for_each(node),
            Generator::ForRange(node) => self.transform_for_range(node),
        }
    }

    fn transform_statement(&mut self, stmt: &Statement) -> T {
        match stmt {
            Statement::Assignment(node) => self.transform_assignment(node),
            Statement::Return(node) => self.transform_return(node),
        }
    }

    fn transform_member(&mut self, node: &Member) -> T;
    fn transform_index(&mut self, node: &Index) -> T;
    fn transform_comparison(&mut self, node: &Comparison) -> T;
    fn transform_is_in(&mut self, node: &IsIn) -> T;
    fn transform_implication(&mut self, node: &Implication) -> T;
    fn transform_method_call(&mut self, node: &MethodCall) -> T;
    fn transform_function_call(&mut self, node: &FunctionCall) -> T;
    fn transform_constant(&mut self, node: &Constant) -> T;
    fn transform_is_none(&mut self, node: &IsNone) -> T;
    fn transform_is_not_none(&mut self, node: &IsNotNone) -> T;
    fn transform_not(&mut self, node: &Not) -> T;
    fn transform_name(&mut self, node: &Name) -> T;
    fn transform_and(&mut self, node: &And) -> T;
    fn transform_or(&mut self, node: &Or) -> T;
    fn transform_add(&mut self, node: &Add) -> T;
    fn transform_sub(&mut self, node: &Sub) -> T;
    fn transform_formatted_value(&mut self, node: &FormattedValue) -> T;
    fn transform_joined_str(&mut self, node: &JoinedStr) -> T;
    fn transform_for_each(&mut self, node: &ForEach) -> T;
    fn transform_for_range(&mut self, node: &ForRange) -> T;
    fn transform_any(&mut self, node: &Any) -> T;
    fn transform_all(&mut self, node: &All) -> T;
    fn transform_assignment(&mut self, node: &Assignment) -> T;
    fn transform_return(&mut self, node: &Return) -> T;
}

/// Visits all nodes of a tree.
pub trait Visitor {
    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }

    fn visit_generator(&mut self, generator: &Generator) {
        walk_generator(self, generator);
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_member(&mut self, node: &Member) {
        walk_member(self, node);
    }

    fn visit_name(&mut self, _node: &Name) {}

    fn visit_formatted_value(&mut self, node: &FormattedValue) {
        walk_formatted_value(self, node);
    }

    fn visit_constant(&mut self, _node: &Constant) {}

    fn visit_function_call(&mut self, node: &FunctionCall) {
        walk_function_call(self, node);
    }

    fn visit_method_call(&mut self, node: &MethodCall) {
        walk_method_call(self, node);
    }
}

pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::Member(node) => visitor.visit_member(node),
        Expression::Index(node) => {
            visitor.visit_expression(&node.collection);
            visitor.visit_expression(&node.index);
        }
        Expression::Comparison(node) => {
            visitor.visit_expression(&node.left);
            visitor.visit_expression(&node.right);
        }
        Expression::IsIn(node) => {
            visitor.visit_expression(&node.member);
            visitor.visit_expression(&node.container);
        }
        Expression::Implication(node) => {
            visitor.visit_expression(&node.antecedent);
            visitor.visit_expression(&node.consequent);
        }
        Expression::MethodCall(node) => visitor.visit_method_call(node),
        Expression::FunctionCall(node) => visitor.visit_function_call(node),
        Expression::Constant(node) => visitor.visit_constant(node),
        Expression::IsNone(node) => visitor.visit_expression(&node.value),
        Expression::IsNotNone(node) => visitor.visit_expression(&node.value),
        Expression::Not(node) => visitor.visit_expression(&node.operand),
        Expression::Name(node) => visitor.visit_name(node),
        Expression::And(node) => {
            for value in &node.values {
                visitor.visit_expression(value);
            }
        }
        Expression::Or(node) => {
            for value in &node.values {
                visitor.visit_expression(value);
            }
        }
        Expression::Add(node) => {
            visitor.visit_expression(&node.left);
            visitor.visit_expression(&node.right);
        }
        Expression::Sub(node) => {
            visitor.visit_expression(&node.left);
            visitor.visit_expression(&node.right);
        }
        Expression::FormattedValue(node) => visitor.visit_formatted_value(node),
        Expression::JoinedStr(node) => {
            for value in &node.values {
                match value {
                    JoinedStrValue::Text(_) => {}
                    JoinedStrValue::Formatted(formatted) => visitor.visit_formatted_value(formatted),
                }
            }
        }
        Expression::Any(node) => {
            visitor.visit_generator(&node.generator);
            visitor.visit_expression(&node.condition);
        }
        Expression::All(node) => {
            visitor.visit_generator(&node.generator);
            visitor.visit_expression(&node.condition);
        }
    }
}

pub fn walk_generator<V: Visitor + ?Sized>(visitor: &mut V, generator: &Generator) {
    match generator {
        Generator::ForEach(node) => {
            visitor.visit_name(&node.variable);
            visitor.visit_expression(&node.iteration);
        }
        Generator::ForRange(node) => {
            visitor.visit_name(&node.variable);
            visitor.visit_expression(&node.start);
            visitor.visit_expression(&node.end);
        }
    }
}

pub fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Assignment(node) => {
            visitor.visit_expression(&node.target);
            visitor.visit_expression(&node.value);
        }
        Statement::Return(node) => {
            if let Some(value) = &node.value {
                visitor.visit_expression(value);
            }
        }
    }
}

pub fn walk_member<V: Visitor + ?Sized>(visitor: &mut V, node: &Member) {
    visitor.visit_expression(&node.instance);
}

pub fn walk_formatted_value<V: Visitor + ?Sized>(visitor: &mut V, node: &FormattedValue) {
    visitor.visit_expression(&node.value);
}

pub fn walk_function_call<V: Visitor + ?Sized>(visitor: &mut V, node: &FunctionCall) {
    visitor.visit_name(&node.name);
    for arg in &node.args {
        visitor.visit_expression(arg);
    }
}

pub fn walk_method_call<V: Visitor + ?Sized>(visitor: &mut V, node: &MethodCall) {
    visitor.visit_member(&node.member);
    for arg in &node.args {
        visitor.visit_expression(arg);
    }
}

/// Collects the IDs of all expression and generator nodes below and including
/// `expr`, in visiting order.
#[must_use]
pub fn collect_ids(expr: &Expression) -> Vec<NodeId> {
    struct Collector(Vec<NodeId>);

    impl Visitor for Collector {
        fn visit_expression(&mut self, expr: &Expression) {
            // Recorded in their own hooks.
            match expr {
                Expression::Member(_) | Expression::Name(_) | Expression::FormattedValue(_) => {}
                _ => self.0.push(expr.id()),
            }
            walk_expression(self, expr);
        }

        fn visit_generator(&mut self, generator: &Generator) {
            self.0.push(generator.id());
            walk_generator(self, generator);
        }

        fn visit_member(&mut self, node: &Member) {
            self.0.push(node.id);
            walk_member(self, node);
        }

        fn visit_formatted_value(&mut self, node: &FormattedValue) {
            self.0.push(node.id);
            walk_formatted_value(self, node);
        }

        fn visit_name(&mut self, node: &Name) {
            self.0.push(node.id);
        }
    }

    let mut collector = Collector(Vec::new());
    collector.visit_expression(expr);
    collector.0
}
