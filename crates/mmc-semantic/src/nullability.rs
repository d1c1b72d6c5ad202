//! Whether the values of the nodes may be absent in a statically typed target.
//!
//! The [`NullabilityInferrer`] walks an expression after its types have been
//! inferred and decides per node with a [`NullabilityPolicy`]:
//!
//! - [`OptionalPolicy`] marks every value of an `Optional` type
//! - [`PointerPolicy`] marks the optional values a target represents by a
//!   pointer, e.g. `*string` or `*int` in Go
//!
//! Both policies share one set of rules. Members and calls take the
//! nullability of the declared property or return type, loop variables that
//! of the items they iterate over. Comparisons, connectives, arithmetic and
//! string interpolation are never nullable.
//!
//! A transform keeps visiting the siblings of a failed node. It returns the
//! first error among them, while all errors are collected in
//! [`NullabilityInferrer::errors`].

use crate::environment::Environment;
use crate::types::{InferredPrimitive, InferredType};
use mmc_ast::visitor::Transformer;
use mmc_ast::{
    Add, All, And, Any, Assignment, Comparison, Constant, Expression, ForEach, ForRange,
    FormattedValue, FunctionCall, Generator, Implication, Index, IsIn, IsNone, IsNotNone,
    JoinedStr, JoinedStrValue, Member, MethodCall, Name, Not, Or, Return, Sub,
};
use mmc_core::{Error, Errors, NodeId};
use mmc_ir::{PrimitiveType, Symbol, SymbolTable};
use std::collections::HashMap;
use tracing::trace;

/// Decides whether a value of an inferred type is nullable in a target.
pub trait NullabilityPolicy {
    fn is_nullable(&self, ty: &InferredType) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalPolicy;

impl NullabilityPolicy for OptionalPolicy {
    fn is_nullable(&self, ty: &InferredType) -> bool {
        ty.is_optional()
    }
}

/// Optional primitives (except `bytearray`), enumerations and constrained
/// primitives thereof have no null value of their own in a target, so they
/// are represented by a pointer.
#[derive(Debug, Clone, Copy)]
pub struct PointerPolicy<'t> {
    table: &'t SymbolTable,
}

impl<'t> PointerPolicy<'t> {
    pub fn new(table: &'t SymbolTable) -> Self {
        Self { table }
    }
}

impl NullabilityPolicy for PointerPolicy<'_> {
    fn is_nullable(&self, ty: &InferredType) -> bool {
        let InferredType::Optional(value) = ty else {
            return false;
        };
        match &**value {
            InferredType::Primitive(primitive) => !matches!(
                primitive,
                InferredPrimitive::Bytearray | InferredPrimitive::None
            ),
            InferredType::OurType(Symbol::Enumeration(_)) => true,
            InferredType::OurType(Symbol::ConstrainedPrimitive(id)) => {
                self.table.constrained_primitive(*id).constrainee != PrimitiveType::Bytearray
            }
            _ => false,
        }
    }
}

type Outcome = Result<bool, Error>;

/// Infers the nullability of the nodes it transforms under the policy `P`.
pub struct NullabilityInferrer<'t, 'e, P> {
    table: &'t SymbolTable,
    environment: Environment<'e>,
    type_map: &'t HashMap<NodeId, InferredType>,
    policy: P,
    pub nullability: HashMap<NodeId, bool>,
    pub errors: Errors,
}

impl<'t, 'e, P: NullabilityPolicy> NullabilityInferrer<'t, 'e, P> {
    /// Creates an inferrer over the types a [`TypeInferrer`] recorded.
    ///
    /// [`TypeInferrer`]: crate::TypeInferrer
    pub fn new(
        table: &'t SymbolTable,
        environment: &'e Environment<'e>,
        type_map: &'t HashMap<NodeId, InferredType>,
        policy: P,
    ) -> Self {
        Self {
            table,
            environment: Environment::child(environment),
            type_map,
            policy,
            nullability: HashMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn environment(&self) -> &Environment<'e> {
        &self.environment
    }

    fn record(&mut self, node: NodeId, nullable: bool) -> Outcome {
        self.nullability.insert(node, nullable);
        Ok(nullable)
    }

    fn fail(&mut self, node: NodeId, message: String) -> Outcome {
        let error = Error::at(node, message);
        self.errors.push(error.clone());
        Err(error)
    }

    fn type_of(&mut self, node: NodeId) -> Result<InferredType, Error> {
        match self.type_map.get(&node) {
            Some(ty) => Ok(ty.clone()),
            None => {
                let error = Error::at(
                    node,
                    "Expected the type of the node to have been inferred beforehand",
                );
                self.errors.push(error.clone());
                Err(error)
            }
        }
    }

    /// Visits all `exprs` and returns the first error, if any.
    fn transform_all_of<'x>(
        &mut self,
        exprs: impl IntoIterator<Item = &'x Expression>,
    ) -> Result<(), Error> {
        let mut first = None;
        for expr in exprs {
            if let Err(error) = self.transform_expression(expr) {
                first.get_or_insert(error);
            }
        }
        first.map_or(Ok(()), Err)
    }

    fn never_nullable<'x>(
        &mut self,
        node: NodeId,
        operands: impl IntoIterator<Item = &'x Expression>,
    ) -> Outcome {
        self.transform_all_of(operands)?;
        self.record(node, false)
    }

    fn bind_loop_variable(&mut self, variable: &Name) -> Outcome {
        let ty = self.type_of(variable.id)?;
        let nullable = self.policy.is_nullable(&ty);
        trace!(variable = %variable.identifier, nullable, "loop variable");
        self.environment.set(variable.identifier.clone(), ty);
        self.record(variable.id, nullable)
    }

    fn check_not_bound(&mut self, variable: &Name) -> Result<(), Error> {
        if self.environment.contains(variable.identifier.as_str()) {
            self.fail(
                variable.id,
                format!(
                    "The variable {} has been already defined before",
                    variable.identifier
                ),
            )?;
        }
        Ok(())
    }

    fn transform_quantifier(
        &mut self,
        node: NodeId,
        generator: &Generator,
        condition: &Expression,
    ) -> Outcome {
        self.transform_generator(generator)?;
        let condition = self.transform_expression(condition);
        self.environment
            .remove(generator.variable().identifier.as_str());
        condition?;
        self.record(node, false)
    }
}

impl<P: NullabilityPolicy> Transformer<Outcome> for NullabilityInferrer<'_, '_, P> {
    fn transform_member(&mut self, node: &Member) -> Outcome {
        self.transform_expression(&node.instance)?;
        let instance = self.type_of(node.instance.id())?;
        let table = self.table;

        match instance {
            InferredType::EnumerationAsType(_) => self.record(node.id, false),
            InferredType::OurType(Symbol::Class(id)) => {
                let class = table.class(id);
                if let Some(property) = class.property(node.name.as_str()) {
                    let ty = InferredType::from_annotation(&property.type_annotation);
                    let nullable = self.policy.is_nullable(&ty);
                    self.record(node.id, nullable)
                } else if class.method(node.name.as_str()).is_some() {
                    self.record(node.id, false)
                } else {
                    self.fail(
                        node.id,
                        format!(
                            "The member {} not found in the class {}",
                            node.name, class.name
                        ),
                    )
                }
            }
            InferredType::OurType(symbol) => self.fail(
                node.id,
                format!(
                    "Expected the instance of a member access to be a class, but got: {}",
                    table.symbol_name(symbol)
                ),
            ),
            other => self.fail(
                node.id,
                format!(
                    "Unexpected {}; expected the instance of a member access \
                     to be annotated with our type",
                    other.display(table)
                ),
            ),
        }
    }

    fn transform_index(&mut self, node: &Index) -> Outcome {
        self.transform_all_of([&*node.collection, &*node.index])?;
        let collection = self.type_of(node.collection.id())?;

        match collection.beneath_optional() {
            InferredType::List(items) => {
                let nullable = self.policy.is_nullable(items);
                self.record(node.id, nullable)
            }
            other => {
                let message = format!(
                    "Expected the collection to be a list in the index, but got: {}",
                    other.display(self.table)
                );
                self.fail(node.id, message)
            }
        }
    }

    fn transform_comparison(&mut self, node: &Comparison) -> Outcome {
        self.never_nullable(node.id, [&*node.left, &*node.right])
    }

    fn transform_is_in(&mut self, node: &IsIn) -> Outcome {
        self.never_nullable(node.id, [&*node.member, &*node.container])
    }

    fn transform_implication(&mut self, node: &Implication) -> Outcome {
        self.never_nullable(node.id, [&*node.antecedent, &*node.consequent])
    }

    fn transform_method_call(&mut self, node: &MethodCall) -> Outcome {
        let instance = self.transform_expression(&node.member.instance);
        let arguments = self.transform_all_of(&node.args);
        instance?;
        arguments?;

        let member = self.type_of(node.member.id)?;
        let InferredType::Method { class, name } = &member else {
            let message = format!(
                "Expected the member in a method call to be a method, but got: {}",
                member.display(self.table)
            );
            return self.fail(node.id, message);
        };
        let nullable = self
            .table
            .class(*class)
            .method(name.as_str())
            .and_then(|method| method.returns.as_ref())
            .is_some_and(|returns| {
                self.policy
                    .is_nullable(&InferredType::from_annotation(returns))
            });

        self.record(node.member.id, false)?;
        self.record(node.id, nullable)
    }

    fn transform_function_call(&mut self, node: &FunctionCall) -> Outcome {
        let arguments = self.transform_all_of(&node.args);

        let nullable = match self.type_of(node.name.id)? {
            InferredType::Verification(id) => self
                .table
                .verification_function(id)
                .returns
                .as_ref()
                .is_some_and(|returns| {
                    self.policy
                        .is_nullable(&InferredType::from_annotation(returns))
                }),
            InferredType::Builtin(function) => self.policy.is_nullable(&function.returns()),
            other => {
                let message = format!(
                    "Expected the variable {} to be a function, but got {}",
                    node.name.identifier,
                    other.display(self.table)
                );
                return self.fail(node.name.id, message);
            }
        };

        arguments?;
        self.record(node.id, nullable)
    }

    fn transform_constant(&mut self, node: &Constant) -> Outcome {
        self.record(node.id, false)
    }

    fn transform_is_none(&mut self, node: &IsNone) -> Outcome {
        self.never_nullable(node.id, [&*node.value])
    }

    fn transform_is_not_none(&mut self, node: &IsNotNone) -> Outcome {
        self.never_nullable(node.id, [&*node.value])
    }

    fn transform_not(&mut self, node: &Not) -> Outcome {
        self.never_nullable(node.id, [&*node.operand])
    }

    fn transform_name(&mut self, node: &Name) -> Outcome {
        match self.environment.find(node.identifier.as_str()) {
            Some(ty) => {
                let nullable = self.policy.is_nullable(ty);
                self.record(node.id, nullable)
            }
            None => self.fail(
                node.id,
                format!(
                    "We do not know how to infer the type of the variable with \
                     the identifier {} from the given environment. Mind that we do \
                     not consider the module scope nor handle all built-in functions \
                     due to simplicity! If you believe this needs to work, please \
                     notify the developers.",
                    node.identifier
                ),
            ),
        }
    }

    fn transform_and(&mut self, node: &And) -> Outcome {
        self.never_nullable(node.id, &node.values)
    }

    fn transform_or(&mut self, node: &Or) -> Outcome {
        self.never_nullable(node.id, &node.values)
    }

    fn transform_add(&mut self, node: &Add) -> Outcome {
        self.never_nullable(node.id, [&*node.left, &*node.right])
    }

    fn transform_sub(&mut self, node: &Sub) -> Outcome {
        self.never_nullable(node.id, [&*node.left, &*node.right])
    }

    fn transform_formatted_value(&mut self, node: &FormattedValue) -> Outcome {
        self.never_nullable(node.id, [&*node.value])
    }

    fn transform_joined_str(&mut self, node: &JoinedStr) -> Outcome {
        let mut first = None;
        for value in &node.values {
            if let JoinedStrValue::Formatted(formatted) = value
                && let Err(error) = self.transform_formatted_value(formatted)
            {
                first.get_or_insert(error);
            }
        }
        if let Some(error) = first {
            return Err(error);
        }
        self.record(node.id, false)
    }

    fn transform_for_each(&mut self, node: &ForEach) -> Outcome {
        self.check_not_bound(&node.variable)?;
        self.transform_expression(&node.iteration)?;
        self.bind_loop_variable(&node.variable)?;
        self.record(node.id, false)
    }

    fn transform_for_range(&mut self, node: &ForRange) -> Outcome {
        self.check_not_bound(&node.variable)?;
        self.transform_all_of([&*node.start, &*node.end])?;
        self.bind_loop_variable(&node.variable)?;
        self.record(node.id, false)
    }

    fn transform_any(&mut self, node: &Any) -> Outcome {
        self.transform_quantifier(node.id, &node.generator, &node.condition)
    }

    fn transform_all(&mut self, node: &All) -> Outcome {
        self.transform_quantifier(node.id, &node.generator, &node.condition)
    }

    fn transform_assignment(&mut self, node: &Assignment) -> Outcome {
        self.transform_expression(&node.value)?;

        match node.target.as_name() {
            Some(name) if !self.environment.contains(name.identifier.as_str()) => {
                let ty = self.type_of(name.id)?;
                let nullable = self.policy.is_nullable(&ty);
                self.environment.set(name.identifier.clone(), ty);
                self.record(name.id, nullable)?;
            }
            _ => {
                self.transform_expression(&node.target)?;
            }
        }
        self.record(node.id, false)
    }

    fn transform_return(&mut self, node: &Return) -> Outcome {
        if let Some(value) = &node.value {
            self.transform_expression(value)?;
        }
        self.record(node.id, false)
    }
}
