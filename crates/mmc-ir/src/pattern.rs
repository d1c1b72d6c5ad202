//! Reconstruction of regular expressions from pattern verification functions.
//!
//! A pattern verification function has the shape
//!
//! ```text
//! def matches_digits(text: str) -> bool:
//!     digit = "[0-9]"
//!     pattern = f"^{digit}+$"
//!     return match(pattern, text) is not None
//! ```
//!
//! The statements before the `return` are evaluated over a `name → string`
//! store. Only string constants, names, concatenations with `+` and joined
//! strings over names may be assigned; anything else is rejected rather than
//! guessed at.

use mmc_ast::{ConstantValue, Expression, FunctionDecl, JoinedStrValue, RawTypeAnnotation, Statement};
use mmc_core::{Error, Identifier, NodeId};
use std::collections::HashMap;

/// The outcome of trying to understand a function as a pattern verification.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternOutcome {
    /// The function matches its argument against this pattern.
    Matched(String),
    /// The function is not shaped like a pattern verification at all.
    NotAPatternFunction,
    /// The function is clearly meant as a pattern verification but does not
    /// fit the supported shape.
    Malformed(Error),
}

/// Tries to recover the pattern a verification function matches against.
#[must_use]
pub fn reconstruct_pattern(function: &FunctionDecl) -> PatternOutcome {
    let [argument] = function.arguments.as_slice() else {
        return PatternOutcome::NotAPatternFunction;
    };
    if !is_atomic(&argument.type_annotation, "str") {
        return PatternOutcome::NotAPatternFunction;
    }
    if !function
        .returns
        .as_ref()
        .is_some_and(|returns| is_atomic(returns, "bool"))
    {
        return PatternOutcome::NotAPatternFunction;
    }

    let Some((Statement::Return(ret), preceding)) = function.body.split_last() else {
        return PatternOutcome::NotAPatternFunction;
    };

    let call = match &ret.value {
        Some(Expression::FunctionCall(call)) if call.name.identifier == "match" => {
            return PatternOutcome::Malformed(Error::at(
                ret.id,
                "The match function returns a match object, but this function is \
                 expected to return a boolean. Did you maybe want to write \
                 `return match(...) is not None`?",
            ));
        }
        Some(Expression::IsNotNone(is_not_none)) => match is_not_none.value.as_ref() {
            Expression::FunctionCall(call) if call.name.identifier == "match" => call,
            _ => return PatternOutcome::NotAPatternFunction,
        },
        _ => return PatternOutcome::NotAPatternFunction,
    };

    // From here on the function looks like a pattern verification, so every
    // deviation is reported.
    let (pattern_expr, text_expr) = match call.args.as_slice() {
        [pattern, text] => (pattern, text),
        args if args.len() < 2 => {
            return PatternOutcome::Malformed(Error::at(
                call.id,
                format!(
                    "The match function expects two arguments (the pattern and \
                     the text to be matched), but got {} argument(s)",
                    args.len()
                ),
            ));
        }
        _ => {
            return PatternOutcome::Malformed(Error::at(
                call.id,
                "Calls to the match function with more than two arguments are not \
                 supported since flags such as multi-line matching can not be \
                 transpiled to other languages and schemas",
            ));
        }
    };

    if !text_expr
        .as_name()
        .is_some_and(|name| name.identifier == argument.name)
    {
        return PatternOutcome::Malformed(Error::at(
            text_expr.id(),
            format!(
                "The second argument to match, the text to be matched, needs to be \
                 the argument {} of the verification function",
                argument.name
            ),
        ));
    }

    if pattern_expr
        .as_name()
        .is_some_and(|name| name.identifier == argument.name)
    {
        return PatternOutcome::Malformed(Error::at(
            pattern_expr.id(),
            format!(
                "The first argument to match, the pattern, must not be the argument {} \
                 of the verification function",
                argument.name
            ),
        ));
    }

    let mut interpreter = Interpreter::new(&argument.name);
    for statement in preceding {
        if let Err(error) = interpreter.execute(statement) {
            return PatternOutcome::Malformed(error);
        }
    }

    let pattern = match interpreter.evaluate(pattern_expr) {
        Ok(pattern) => pattern,
        Err(error) => return PatternOutcome::Malformed(error),
    };

    if let Err(error) = regex_syntax::Parser::new().parse(&pattern) {
        return PatternOutcome::Malformed(Error::with_underlying(
            Some(pattern_expr.id()),
            format!("The pattern {pattern:?} is not a valid regular expression"),
            vec![Error::leaf(error.to_string())],
        ));
    }

    PatternOutcome::Matched(pattern)
}

fn is_atomic(annotation: &RawTypeAnnotation, expected: &str) -> bool {
    matches!(annotation, RawTypeAnnotation::Atomic { name, .. } if name == expected)
}

/// Constant folding over string assignments.
struct Interpreter<'a> {
    argument: &'a Identifier,
    store: HashMap<Identifier, String>,
}

impl<'a> Interpreter<'a> {
    fn new(argument: &'a Identifier) -> Self {
        Self {
            argument,
            store: HashMap::new(),
        }
    }

    fn execute(&mut self, statement: &Statement) -> Result<(), Error> {
        let Statement::Assignment(assignment) = statement else {
            return Err(Error::at(
                statement.id(),
                "Expected only assignments before the final return in a pattern \
                 verification function",
            ));
        };

        let Some(target) = assignment.target.as_name() else {
            return Err(Error::at(
                assignment.target.id(),
                "Expected the assignment target to be a name in a pattern \
                 verification function",
            ));
        };

        if target.identifier == *self.argument {
            return Err(Error::at(
                target.id,
                format!(
                    "The argument {} of a pattern verification function must not be \
                     re-assigned",
                    self.argument
                ),
            ));
        }

        let value = self.evaluate(&assignment.value)?;
        self.store.insert(target.identifier.clone(), value);
        Ok(())
    }

    fn evaluate(&self, expr: &Expression) -> Result<String, Error> {
        match expr {
            Expression::Constant(constant) => match &constant.value {
                ConstantValue::Str(value) => Ok(value.clone()),
                _ => Err(unsupported(constant.id)),
            },
            Expression::Name(name) => self.lookup(name.id, &name.identifier),
            Expression::JoinedStr(joined) => {
                let mut result = String::new();
                for value in &joined.values {
                    match value {
                        JoinedStrValue::Text(text) => result.push_str(text),
                        JoinedStrValue::Formatted(formatted) => match formatted.value.as_ref() {
                            Expression::Name(name) => {
                                result.push_str(&self.lookup(name.id, &name.identifier)?);
                            }
                            other => return Err(unsupported(other.id())),
                        },
                    }
                }
                Ok(result)
            }
            Expression::Add(add) => {
                let mut result = self.evaluate(&add.left)?;
                result.push_str(&self.evaluate(&add.right)?);
                Ok(result)
            }
            other => Err(unsupported(other.id())),
        }
    }

    fn lookup(&self, node: NodeId, identifier: &Identifier) -> Result<String, Error> {
        self.store.get(identifier).cloned().ok_or_else(|| {
            Error::at(
                node,
                format!(
                    "The variable {identifier} has not been assigned a string constant \
                     before its use in the pattern"
                ),
            )
        })
    }
}

fn unsupported(node: NodeId) -> Error {
    Error::at(
        node,
        "Only string constants, names, concatenations and formatted strings over \
         names are supported in a pattern verification function",
    )
}
