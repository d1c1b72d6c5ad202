//! Builder utilities for constructing parse trees and declarations.
//!
//! The builder is the single place node IDs are allocated. The external
//! parser (and the tests) build every node through it so that IDs are unique
//! within one compilation and, when a source text is attached, every node's
//! span lands in the [`PositionTable`].

use crate::decl::{
    ArgumentDecl, ContractDecl, EnumerationDecl, EnumerationLiteralDecl, InvariantDecl,
    PropertyDecl, RawTypeAnnotation, SnapshotDecl,
};
use crate::tree::*;
use mmc_core::{Identifier, NodeId, PositionTable, Span};

/// Allocates node IDs and assembles nodes.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    next_id: u32,
    positions: Option<PositionTable>,
    pending_span: Option<Span>,
}

impl TreeBuilder {
    /// Creates a builder that records no positions
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder that records spans into a table over `source`
    #[must_use]
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            next_id: 0,
            positions: Some(PositionTable::new(source)),
            pending_span: None,
        }
    }

    /// Allocates a fresh node ID
    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        if let (Some(positions), Some(span)) = (self.positions.as_mut(), self.pending_span.take())
        {
            positions.record(id, span);
        }
        id
    }

    /// Attaches `span` to the next allocated node.
    ///
    /// Nodes are allocated parent-last, so call this right before building
    /// the node the span belongs to.
    pub fn at(&mut self, span: Span) -> &mut Self {
        self.pending_span = Some(span);
        self
    }

    /// Records `span` for an already allocated node
    pub fn record(&mut self, node: NodeId, span: Span) {
        if let Some(positions) = self.positions.as_mut() {
            positions.record(node, span);
        }
    }

    /// Number of nodes allocated so far
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.next_id as usize
    }

    /// Returns the recorded positions, if a source was attached
    #[must_use]
    pub fn into_positions(self) -> Option<PositionTable> {
        self.positions
    }

    pub fn name_node(&mut self, identifier: Identifier) -> Name {
        Name {
            id: self.fresh(),
            identifier,
        }
    }

    pub fn name(&mut self, identifier: Identifier) -> Expression {
        Expression::Name(self.name_node(identifier))
    }

    pub fn member_node(&mut self, instance: Expression, name: Identifier) -> Member {
        Member {
            id: self.fresh(),
            instance: Box::new(instance),
            name,
        }
    }

    pub fn member(&mut self, instance: Expression, name: Identifier) -> Expression {
        Expression::Member(self.member_node(instance, name))
    }

    pub fn index(&mut self, collection: Expression, index: Expression) -> Expression {
        Expression::Index(Index {
            id: self.fresh(),
            collection: Box::new(collection),
            index: Box::new(index),
        })
    }

    pub fn comparison(
        &mut self,
        left: Expression,
        op: Comparator,
        right: Expression,
    ) -> Expression {
        Expression::Comparison(Comparison {
            id: self.fresh(),
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn is_in(&mut self, member: Expression, container: Expression) -> Expression {
        Expression::IsIn(IsIn {
            id: self.fresh(),
            member: Box::new(member),
            container: Box::new(container),
        })
    }

    pub fn implication(&mut self, antecedent: Expression, consequent: Expression) -> Expression {
        Expression::Implication(Implication {
            id: self.fresh(),
            antecedent: Box::new(antecedent),
            consequent: Box::new(consequent),
        })
    }

    /// Builds `instance.method(args...)`
    pub fn method_call(
        &mut self,
        instance: Expression,
        method: Identifier,
        args: Vec<Expression>,
    ) -> Expression {
        let member = self.member_node(instance, method);
        Expression::MethodCall(MethodCall {
            id: self.fresh(),
            member,
            args,
        })
    }

    pub fn function_call(&mut self, name: Identifier, args: Vec<Expression>) -> Expression {
        let name = self.name_node(name);
        Expression::FunctionCall(FunctionCall {
            id: self.fresh(),
            name,
            args,
        })
    }

    pub fn constant(&mut self, value: ConstantValue) -> Expression {
        Expression::Constant(Constant {
            id: self.fresh(),
            value,
        })
    }

    pub fn str(&mut self, value: impl Into<String>) -> Expression {
        self.constant(ConstantValue::Str(value.into()))
    }

    pub fn int(&mut self, value: i64) -> Expression {
        self.constant(ConstantValue::Int(value))
    }

    pub fn bool(&mut self, value: bool) -> Expression {
        self.constant(ConstantValue::Bool(value))
    }

    pub fn is_none(&mut self, value: Expression) -> Expression {
        Expression::IsNone(IsNone {
            id: self.fresh(),
            value: Box::new(value),
        })
    }

    pub fn is_not_none(&mut self, value: Expression) -> Expression {
        Expression::IsNotNone(IsNotNone {
            id: self.fresh(),
            value: Box::new(value),
        })
    }

    pub fn not(&mut self, operand: Expression) -> Expression {
        Expression::Not(Not {
            id: self.fresh(),
            operand: Box::new(operand),
        })
    }

    pub fn and(&mut self, values: Vec<Expression>) -> Expression {
        Expression::And(And {
            id: self.fresh(),
            values,
        })
    }

    pub fn or(&mut self, values: Vec<Expression>) -> Expression {
        Expression::Or(Or {
            id: self.fresh(),
            values,
        })
    }

    pub fn add(&mut self, left: Expression, right: Expression) -> Expression {
        Expression::Add(Add {
            id: self.fresh(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn sub(&mut self, left: Expression, right: Expression) -> Expression {
        Expression::Sub(Sub {
            id: self.fresh(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn formatted_value(&mut self, value: Expression) -> FormattedValue {
        FormattedValue {
            id: self.fresh(),
            value: Box::new(value),
        }
    }

    pub fn joined_str(&mut self, values: Vec<JoinedStrValue>) -> Expression {
        Expression::JoinedStr(JoinedStr {
            id: self.fresh(),
            values,
        })
    }

    /// Builds `for variable in iteration`
    pub fn for_each(&mut self, variable: Identifier, iteration: Expression) -> Generator {
        let variable = self.name_node(variable);
        Generator::ForEach(ForEach {
            id: self.fresh(),
            variable,
            iteration: Box::new(iteration),
        })
    }

    /// Builds `for variable in range(start, end)`
    pub fn for_range(
        &mut self,
        variable: Identifier,
        start: Expression,
        end: Expression,
    ) -> Generator {
        let variable = self.name_node(variable);
        Generator::ForRange(ForRange {
            id: self.fresh(),
            variable,
            start: Box::new(start),
            end: Box::new(end),
        })
    }

    pub fn any(&mut self, generator: Generator, condition: Expression) -> Expression {
        Expression::Any(Any {
            id: self.fresh(),
            generator,
            condition: Box::new(condition),
        })
    }

    pub fn all(&mut self, generator: Generator, condition: Expression) -> Expression {
        Expression::All(All {
            id: self.fresh(),
            generator,
            condition: Box::new(condition),
        })
    }

    pub fn assignment(&mut self, target: Expression, value: Expression) -> Statement {
        Statement::Assignment(Assignment {
            id: self.fresh(),
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn ret(&mut self, value: Option<Expression>) -> Statement {
        Statement::Return(Return {
            id: self.fresh(),
            value,
        })
    }

    pub fn atomic(&mut self, name: Identifier) -> RawTypeAnnotation {
        RawTypeAnnotation::Atomic {
            id: self.fresh(),
            name,
        }
    }

    pub fn subscripted(
        &mut self,
        name: Identifier,
        subscripts: Vec<RawTypeAnnotation>,
    ) -> RawTypeAnnotation {
        RawTypeAnnotation::Subscripted {
            id: self.fresh(),
            name,
            subscripts,
        }
    }

    pub fn property(&mut self, name: Identifier, type_annotation: RawTypeAnnotation) -> PropertyDecl {
        PropertyDecl {
            id: self.fresh(),
            name,
            type_annotation,
        }
    }

    pub fn argument(&mut self, name: Identifier, type_annotation: RawTypeAnnotation) -> ArgumentDecl {
        ArgumentDecl {
            id: self.fresh(),
            name,
            type_annotation,
        }
    }

    pub fn invariant(&mut self, description: Option<String>, body: Expression) -> InvariantDecl {
        InvariantDecl {
            id: self.fresh(),
            description,
            body,
        }
    }

    /// Builds an enumeration from `(name, value)` literal pairs
    pub fn enumeration(
        &mut self,
        name: Identifier,
        literals: Vec<(Identifier, String)>,
    ) -> EnumerationDecl {
        let literals = literals
            .into_iter()
            .map(|(name, value)| EnumerationLiteralDecl {
                id: self.fresh(),
                name,
                value,
            })
            .collect();
        EnumerationDecl {
            id: self.fresh(),
            name,
            literals,
            is_superset_of: Vec::new(),
        }
    }

    pub fn contract(
        &mut self,
        args: Vec<Identifier>,
        description: Option<String>,
        body: Expression,
    ) -> ContractDecl {
        ContractDecl {
            id: self.fresh(),
            args,
            description,
            body,
        }
    }

    pub fn snapshot(
        &mut self,
        args: Vec<Identifier>,
        name: Identifier,
        body: Expression,
    ) -> SnapshotDecl {
        SnapshotDecl {
            id: self.fresh(),
            args,
            name,
            body,
        }
    }
}
