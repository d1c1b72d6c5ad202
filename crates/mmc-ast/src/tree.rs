//! Expression and statement nodes.
//!
//! The node set is closed. Every consumer dispatches over it with an
//! exhaustive `match` (see [`crate::visitor`]), so adding a node kind breaks
//! the build of every consumer until it is handled.
//!
//! Nodes own their children and are never mutated once built. Analyses
//! annotate them through side tables keyed by [`NodeId`].

use mmc_core::{Identifier, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access of a property or a method of an instance: `instance.name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: NodeId,
    pub instance: Box<Expression>,
    pub name: Identifier,
}

/// Subscript of a collection: `collection[index]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub id: NodeId,
    pub collection: Box<Expression>,
    pub index: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        };
        f.write_str(symbol)
    }
}

/// Binary comparison: `left op right`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub id: NodeId,
    pub left: Box<Expression>,
    pub op: Comparator,
    pub right: Box<Expression>,
}

/// Containment test: `member in container`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsIn {
    pub id: NodeId,
    pub member: Box<Expression>,
    pub container: Box<Expression>,
}

/// Implication `antecedent ⇒ consequent`, written `not A or B` in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implication {
    pub id: NodeId,
    pub antecedent: Box<Expression>,
    pub consequent: Box<Expression>,
}

/// Call of a method: `instance.method(args...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub id: NodeId,
    pub member: Member,
    pub args: Vec<Expression>,
}

/// Call of a function by name: `name(args...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub id: NodeId,
    pub name: Name,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstantValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub id: NodeId,
    pub value: ConstantValue,
}

/// `value is None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsNone {
    pub id: NodeId,
    pub value: Box<Expression>,
}

/// `value is not None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsNotNone {
    pub id: NodeId,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Not {
    pub id: NodeId,
    pub operand: Box<Expression>,
}

/// Reference to a variable, an argument or a function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Name {
    pub id: NodeId,
    pub identifier: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct And {
    pub id: NodeId,
    pub values: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Or {
    pub id: NodeId,
    pub values: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Add {
    pub id: NodeId,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sub {
    pub id: NodeId,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// A value interpolated into a joined string: `{value}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedValue {
    pub id: NodeId,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinedStrValue {
    Text(String),
    Formatted(FormattedValue),
}

/// String interpolation: `f"abc{x}def"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedStr {
    pub id: NodeId,
    pub values: Vec<JoinedStrValue>,
}

/// Iteration over a collection: `for variable in iteration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForEach {
    pub id: NodeId,
    pub variable: Name,
    pub iteration: Box<Expression>,
}

/// Iteration over an integer range: `for variable in range(start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForRange {
    pub id: NodeId,
    pub variable: Name,
    pub start: Box<Expression>,
    pub end: Box<Expression>,
}

/// The loop of a quantifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Generator {
    ForEach(ForEach),
    ForRange(ForRange),
}

impl Generator {
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::ForEach(node) => node.id,
            Self::ForRange(node) => node.id,
        }
    }

    /// Returns the loop variable bound by this generator.
    #[must_use]
    pub fn variable(&self) -> &Name {
        match self {
            Self::ForEach(node) => &node.variable,
            Self::ForRange(node) => &node.variable,
        }
    }
}

/// Existential quantifier: `any(condition for variable in ...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Any {
    pub id: NodeId,
    pub generator: Generator,
    pub condition: Box<Expression>,
}

/// Universal quantifier: `all(condition for variable in ...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct All {
    pub id: NodeId,
    pub generator: Generator,
    pub condition: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Member(Member),
    Index(Index),
    Comparison(Comparison),
    IsIn(IsIn),
    Implication(Implication),
    MethodCall(MethodCall),
    FunctionCall(FunctionCall),
    Constant(Constant),
    IsNone(IsNone),
    IsNotNone(IsNotNone),
    Not(Not),
    Name(Name),
    And(And),
    Or(Or),
    Add(Add),
    Sub(Sub),
    FormattedValue(FormattedValue),
    JoinedStr(JoinedStr),
    Any(Any),
    All(All),
}

impl Expression {
    /// Returns the identity of this expression node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Member(node) => node.id,
            Self::Index(node) => node.id,
            Self::Comparison(node) => node.id,
            Self::IsIn(node) => node.id,
            Self::Implication(node) => node.id,
            Self::MethodCall(node) => node.id,
            Self::FunctionCall(node) => node.id,
            Self::Constant(node) => node.id,
            Self::IsNone(node) => node.id,
            Self::IsNotNone(node) => node.id,
            Self::Not(node) => node.id,
            Self::Name(node) => node.id,
            Self::And(node) => node.id,
            Self::Or(node) => node.id,
            Self::Add(node) => node.id,
            Self::Sub(node) => node.id,
            Self::FormattedValue(node) => node.id,
            Self::JoinedStr(node) => node.id,
            Self::Any(node) => node.id,
            Self::All(node) => node.id,
        }
    }

    /// Returns the name if this expression is a bare [`Name`].
    #[must_use]
    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// Assignment to a local name: `target = value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: NodeId,
    pub target: Box<Expression>,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Return {
    pub id: NodeId,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Assignment(Assignment),
    Return(Return),
}

impl Statement {
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Assignment(node) => node.id,
            Self::Return(node) => node.id,
        }
    }
}
