//! Type-annotation pass over the expressions of a meta-model.
//!
//! The [`TypeInferrer`] assigns an [`InferredType`] to every node it can and
//! records an error for every node it can not. Siblings are always visited so
//! that a single pass reports as many problems as possible.
//!
//! Optional values are narrowed inside the consequent of an implication
//! whose antecedent asserts them to be present, e.g. the `self.label` in
//! `self.label is not None ⇒ len(self.label) > 0` is a `str`. Values are
//! matched by their canonical representation, see [`Canonicalizer`].

mod canonical;
mod non_null;

pub use canonical::Canonicalizer;

use crate::environment::Environment;
use crate::types::{assignable, InferredPrimitive, InferredType};
use mmc_ast::visitor::Transformer;
use mmc_ast::{
    Add, All, And, Any, Assignment, Comparison, Constant, ConstantValue, Expression, ForEach,
    ForRange, FormattedValue, FunctionCall, Generator, Implication, Index, IsIn, IsNone,
    IsNotNone, JoinedStr, JoinedStrValue, Member, MethodCall, Name, Not, Or, Return, Sub,
};
use mmc_core::{Error, Errors, NodeId};
use mmc_ir::{Symbol, SymbolTable};
use non_null::NonNull;
use std::collections::HashMap;

/// Infers the types of the nodes it transforms.
///
/// A transform returns `None` if the type of the node could not be inferred;
/// the cause is then recorded in [`TypeInferrer::errors`].
pub struct TypeInferrer<'t, 'e> {
    table: &'t SymbolTable,
    environment: Environment<'e>,
    representations: &'t HashMap<NodeId, String>,
    non_null: NonNull,
    pub type_map: HashMap<NodeId, InferredType>,
    pub errors: Errors,
}

impl<'t, 'e> TypeInferrer<'t, 'e> {
    /// Creates an inferrer whose bindings live in a scope nested in
    /// `environment`.
    ///
    /// `representations` must hold the canonical representation of every
    /// node that is going to be transformed.
    pub fn new(
        table: &'t SymbolTable,
        environment: &'e Environment<'e>,
        representations: &'t HashMap<NodeId, String>,
    ) -> Self {
        Self {
            table,
            environment: Environment::child(environment),
            representations,
            non_null: NonNull::default(),
            type_map: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// The scope holding the bindings introduced so far
    pub fn environment(&self) -> &Environment<'e> {
        &self.environment
    }

    fn record(&mut self, node: NodeId, ty: InferredType) -> Option<InferredType> {
        self.type_map.insert(node, ty.clone());
        Some(ty)
    }

    fn fail(&mut self, node: NodeId, message: String) -> Option<InferredType> {
        self.errors.push(Error::at(node, message));
        None
    }

    fn strip_if_non_null(&self, node: NodeId, ty: InferredType) -> InferredType {
        match ty {
            InferredType::Optional(value)
                if self
                    .representations
                    .get(&node)
                    .is_some_and(|key| self.non_null.at_least_once(key)) =>
            {
                *value
            }
            other => other,
        }
    }

    fn assume_non_null(&mut self, value: &Expression) -> Option<String> {
        let key = self.representations.get(&value.id())?.clone();
        self.non_null.increment(&key);
        Some(key)
    }

    fn release(&mut self, keys: Vec<String>) {
        for key in keys {
            self.non_null.decrement(&key);
        }
    }

    fn transform_all_of<'x>(&mut self, exprs: impl IntoIterator<Item = &'x Expression>) -> bool {
        let mut success = true;
        for expr in exprs {
            success &= self.transform_expression(expr).is_some();
        }
        success
    }

    fn shadows(&mut self, variable: &Name) -> bool {
        if self.environment.contains(variable.identifier.as_str()) {
            self.errors.push(Error::at(
                variable.id,
                format!(
                    "The variable {} has been already defined before",
                    variable.identifier
                ),
            ));
            true
        } else {
            false
        }
    }

    fn transform_quantifier(
        &mut self,
        node: NodeId,
        generator: &Generator,
        condition: &Expression,
    ) -> Option<InferredType> {
        self.transform_generator(generator)?;
        let condition = self.transform_expression(condition);
        self.environment
            .remove(generator.variable().identifier.as_str());
        condition?;
        self.record(node, InferredType::BOOL)
    }
}

impl Transformer<Option<InferredType>> for TypeInferrer<'_, '_> {
    fn transform_member(&mut self, node: &Member) -> Option<InferredType> {
        let instance = self.transform_expression(&node.instance)?;
        let table = self.table;

        let ty = match instance {
            InferredType::OurType(Symbol::Class(id)) => {
                let class = table.class(id);
                if let Some(property) = class.property(node.name.as_str()) {
                    InferredType::from_annotation(&property.type_annotation)
                } else if class.method(node.name.as_str()).is_some() {
                    InferredType::Method {
                        class: id,
                        name: node.name.clone(),
                    }
                } else {
                    return self.fail(
                        node.id,
                        format!(
                            "The member {} could not be found in the class {}",
                            node.name, class.name
                        ),
                    );
                }
            }
            InferredType::EnumerationAsType(id) => {
                let enumeration = table.enumeration(id);
                if enumeration.literal(node.name.as_str()).is_none() {
                    return self.fail(
                        node.id,
                        format!(
                            "The literal {} could not be found in the enumeration {}",
                            node.name, enumeration.name
                        ),
                    );
                }
                InferredType::OurType(Symbol::Enumeration(id))
            }
            other => {
                return self.fail(
                    node.id,
                    format!(
                        "Expected an instance type to be either an enumeration-as-type \
                         or a class, but got: {}",
                        other.display(table)
                    ),
                );
            }
        };

        let ty = self.strip_if_non_null(node.id, ty);
        self.record(node.id, ty)
    }

    fn transform_index(&mut self, node: &Index) -> Option<InferredType> {
        let collection = self.transform_expression(&node.collection);
        let index = self.transform_expression(&node.index);
        let collection = collection?;
        index?;

        let InferredType::List(items) = collection.beneath_optional() else {
            return self.fail(
                node.id,
                format!(
                    "Expected the collection to be a list in the index, but got: {}",
                    collection.display(self.table)
                ),
            );
        };
        let ty = self.strip_if_non_null(node.id, (**items).clone());
        self.record(node.id, ty)
    }

    fn transform_comparison(&mut self, node: &Comparison) -> Option<InferredType> {
        if !self.transform_all_of([&*node.left, &*node.right]) {
            return None;
        }
        self.record(node.id, InferredType::BOOL)
    }

    fn transform_is_in(&mut self, node: &IsIn) -> Option<InferredType> {
        if !self.transform_all_of([&*node.member, &*node.container]) {
            return None;
        }
        self.record(node.id, InferredType::BOOL)
    }

    fn transform_implication(&mut self, node: &Implication) -> Option<InferredType> {
        let antecedent = self.transform_expression(&node.antecedent);

        let mut keys = Vec::new();
        match &*node.antecedent {
            Expression::IsNotNone(antecedent) => {
                keys.extend(self.assume_non_null(&antecedent.value));
            }
            Expression::And(antecedent) => {
                for value in &antecedent.values {
                    if let Expression::IsNotNone(value) = value {
                        keys.extend(self.assume_non_null(&value.value));
                    }
                }
            }
            _ => {}
        }

        let consequent = self.transform_expression(&node.consequent);
        self.release(keys);
        antecedent?;
        consequent?;
        self.record(node.id, InferredType::BOOL)
    }

    fn transform_method_call(&mut self, node: &MethodCall) -> Option<InferredType> {
        let member = self.transform_member(&node.member);
        let arguments = self.transform_all_of(&node.args);
        let member = member?;
        if !arguments {
            return None;
        }

        let InferredType::Method { class, name } = &member else {
            return self.fail(
                node.id,
                format!(
                    "Expected the member in a method call to be a method, but got: {}",
                    member.display(self.table)
                ),
            );
        };
        let returns = self
            .table
            .class(*class)
            .method(name.as_str())
            .and_then(|method| method.returns.as_ref())
            .map_or(InferredType::NONE, InferredType::from_annotation);

        let ty = self.strip_if_non_null(node.id, returns);
        self.record(node.id, ty)
    }

    fn transform_function_call(&mut self, node: &FunctionCall) -> Option<InferredType> {
        let result = match self.transform_name(&node.name) {
            None => None,
            Some(InferredType::Verification(id)) => Some(
                self.table
                    .verification_function(id)
                    .returns
                    .as_ref()
                    .map_or(InferredType::NONE, InferredType::from_annotation),
            ),
            Some(InferredType::Builtin(function)) => Some(function.returns()),
            Some(other) => {
                let message = format!(
                    "Expected the variable {} to be a function, but got {}",
                    node.name.identifier,
                    other.display(self.table)
                );
                self.fail(node.name.id, message)
            }
        };

        // The arguments are visited even if the callee is unknown.
        let arguments = self.transform_all_of(&node.args);

        let result = result?;
        if !arguments {
            return None;
        }
        let ty = self.strip_if_non_null(node.id, result);
        self.record(node.id, ty)
    }

    fn transform_constant(&mut self, node: &Constant) -> Option<InferredType> {
        let primitive = match node.value {
            ConstantValue::Bool(_) => InferredPrimitive::Bool,
            ConstantValue::Int(_) => InferredPrimitive::Int,
            ConstantValue::Float(_) => InferredPrimitive::Float,
            ConstantValue::Str(_) => InferredPrimitive::Str,
            ConstantValue::Bytes(_) => InferredPrimitive::Bytearray,
        };
        self.record(node.id, InferredType::Primitive(primitive))
    }

    fn transform_is_none(&mut self, node: &IsNone) -> Option<InferredType> {
        self.transform_expression(&node.value)?;
        self.record(node.id, InferredType::BOOL)
    }

    fn transform_is_not_none(&mut self, node: &IsNotNone) -> Option<InferredType> {
        self.transform_expression(&node.value)?;
        self.record(node.id, InferredType::BOOL)
    }

    fn transform_not(&mut self, node: &Not) -> Option<InferredType> {
        self.transform_expression(&node.operand)?;
        self.record(node.id, InferredType::BOOL)
    }

    fn transform_name(&mut self, node: &Name) -> Option<InferredType> {
        let Some(ty) = self.environment.find(node.identifier.as_str()).cloned() else {
            return self.fail(
                node.id,
                format!(
                    "We do not know how to infer the type of the variable with \
                     the identifier {} from the given environment. Mind that we do \
                     not consider the module scope nor handle all built-in functions \
                     due to simplicity! If you believe this needs to work, please \
                     notify the developers.",
                    node.identifier
                ),
            );
        };
        let ty = self.strip_if_non_null(node.id, ty);
        self.record(node.id, ty)
    }

    fn transform_and(&mut self, node: &And) -> Option<InferredType> {
        // Conjuncts asserting a value present narrow the conjuncts after them.
        let mut keys = Vec::new();
        let mut success = true;
        for value in &node.values {
            if self.transform_expression(value).is_none() {
                success = false;
                break;
            }
            if let Expression::IsNotNone(value) = value {
                keys.extend(self.assume_non_null(&value.value));
            }
        }
        self.release(keys);

        if !success {
            return None;
        }
        self.record(node.id, InferredType::BOOL)
    }

    fn transform_or(&mut self, node: &Or) -> Option<InferredType> {
        if !self.transform_all_of(&node.values) {
            return None;
        }
        self.record(node.id, InferredType::BOOL)
    }

    fn transform_add(&mut self, node: &Add) -> Option<InferredType> {
        let left = self.transform_expression(&node.left);
        let right = self.transform_expression(&node.right);
        let left = left?;
        right?;
        self.record(node.id, left)
    }

    fn transform_sub(&mut self, node: &Sub) -> Option<InferredType> {
        let left = self.transform_expression(&node.left);
        let right = self.transform_expression(&node.right);
        let left = left?;
        right?;
        self.record(node.id, left)
    }

    fn transform_formatted_value(&mut self, node: &FormattedValue) -> Option<InferredType> {
        self.transform_expression(&node.value)?;
        self.record(node.id, InferredType::STR)
    }

    fn transform_joined_str(&mut self, node: &JoinedStr) -> Option<InferredType> {
        let mut success = true;
        for value in &node.values {
            if let JoinedStrValue::Formatted(formatted) = value {
                success &= self.transform_formatted_value(formatted).is_some();
            }
        }
        if !success {
            return None;
        }
        self.record(node.id, InferredType::STR)
    }

    fn transform_for_each(&mut self, node: &ForEach) -> Option<InferredType> {
        if self.shadows(&node.variable) {
            return None;
        }

        let iteration = self.transform_expression(&node.iteration)?;
        let InferredType::List(items) = iteration.beneath_optional() else {
            return self.fail(
                node.iteration.id(),
                format!(
                    "Expected an iteration over a list, but got: {}",
                    iteration.display(self.table)
                ),
            );
        };
        let items = (**items).clone();

        self.type_map.insert(node.variable.id, items.clone());
        self.environment
            .set(node.variable.identifier.clone(), items);
        self.record(node.id, InferredType::NONE)
    }

    fn transform_for_range(&mut self, node: &ForRange) -> Option<InferredType> {
        if self.shadows(&node.variable) {
            return None;
        }

        if !self.transform_all_of([&*node.start, &*node.end]) {
            return None;
        }

        self.type_map.insert(node.variable.id, InferredType::INT);
        self.environment
            .set(node.variable.identifier.clone(), InferredType::INT);
        self.record(node.id, InferredType::NONE)
    }

    fn transform_any(&mut self, node: &Any) -> Option<InferredType> {
        self.transform_quantifier(node.id, &node.generator, &node.condition)
    }

    fn transform_all(&mut self, node: &All) -> Option<InferredType> {
        self.transform_quantifier(node.id, &node.generator, &node.condition)
    }

    fn transform_assignment(&mut self, node: &Assignment) -> Option<InferredType> {
        let (target, is_new_variable) = match node.target.as_name() {
            Some(name) => match self.environment.find(name.identifier.as_str()) {
                Some(ty) => (Some(ty.clone()), false),
                None => (None, true),
            },
            None => (self.transform_expression(&node.target), false),
        };

        let value = self.transform_expression(&node.value)?;

        if is_new_variable {
            if let Some(name) = node.target.as_name() {
                self.type_map.insert(name.id, value.clone());
                self.environment.set(name.identifier.clone(), value);
            }
            return self.record(node.id, InferredType::NONE);
        }

        let target = target?;
        if !assignable(&target, &value, self.table) {
            return self.fail(
                node.id,
                format!(
                    "We inferred the target type of the assignment to be {}, while \
                     the value type is inferred to be {}. We do not know how to model \
                     this assignment.",
                    target.display(self.table),
                    value.display(self.table)
                ),
            );
        }
        if let Some(name) = node.target.as_name() {
            self.type_map.insert(name.id, target);
        }
        self.record(node.id, InferredType::NONE)
    }

    fn transform_return(&mut self, node: &Return) -> Option<InferredType> {
        if let Some(value) = &node.value {
            self.transform_expression(value)?;
        }
        self.record(node.id, InferredType::NONE)
    }
}
