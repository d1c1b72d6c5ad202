//! Diagnostic tree and result aliases for the meta-model compiler.

use crate::{NodeId, PositionResolver};
use miette::Diagnostic;
use std::fmt::Write as _;
use thiserror::Error;

/// A diagnostic, possibly explained by underlying causes.
///
/// Errors form a tree: a [`Error::Leaf`] carries no causes, a [`Error::Node`]
/// carries one or more. Errors are never mutated after creation; callers
/// decide whether to treat them as fatal or to accumulate them.
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum Error {
    #[error("{message}")]
    #[diagnostic(code(mmc::semantic))]
    Leaf {
        message: String,
        node: Option<NodeId>,
    },

    #[error("{message}")]
    #[diagnostic(code(mmc::semantic))]
    Node {
        message: String,
        node: Option<NodeId>,
        #[related]
        underlying: Vec<Error>,
    },
}

/// Result type alias using the compiler [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors accumulated by a pass which reports as many problems as it can.
pub type Errors = Vec<Error>;

impl Error {
    /// Creates a leaf error without a source node.
    pub fn leaf(message: impl Into<String>) -> Self {
        Self::Leaf {
            message: message.into(),
            node: None,
        }
    }

    /// Creates a leaf error pointing at `node`.
    pub fn at(node: NodeId, message: impl Into<String>) -> Self {
        Self::Leaf {
            message: message.into(),
            node: Some(node),
        }
    }

    /// Creates an error explained by `underlying`.
    ///
    /// An empty `underlying` list yields a leaf.
    pub fn with_underlying(
        node: Option<NodeId>,
        message: impl Into<String>,
        underlying: Vec<Error>,
    ) -> Self {
        let message = message.into();
        if underlying.is_empty() {
            Self::Leaf { message, node }
        } else {
            Self::Node {
                message,
                node,
                underlying,
            }
        }
    }

    /// Returns the message of this error without its causes.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Leaf { message, .. } | Self::Node { message, .. } => message,
        }
    }

    /// Returns the source node this error refers to, if any.
    #[must_use]
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Leaf { node, .. } | Self::Node { node, .. } => *node,
        }
    }

    /// Returns the underlying causes in the order they were reported.
    #[must_use]
    pub fn underlying(&self) -> &[Error] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Node { underlying, .. } => underlying,
        }
    }

    /// Renders the whole tree, resolving source positions through `resolver`.
    #[must_use]
    pub fn render(&self, resolver: &dyn PositionResolver) -> String {
        Renderer::new(resolver).render(self)
    }

    /// Iterates over this error and all its causes, depth-first.
    pub fn walk(&self) -> impl Iterator<Item = &Error> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let error = stack.pop()?;
            stack.extend(error.underlying().iter().rev());
            Some(error)
        })
    }
}

/// Pretty-printer for error trees.
///
/// Each error is printed on its own line, prefixed with `line L, column C: `
/// when its node resolves. Causes follow their parent, indented by two spaces
/// per level.
pub struct Renderer<'a> {
    resolver: &'a dyn PositionResolver,
}

impl<'a> Renderer<'a> {
    pub fn new(resolver: &'a dyn PositionResolver) -> Self {
        Self { resolver }
    }

    /// Renders `error` and all its causes.
    #[must_use]
    pub fn render(&self, error: &Error) -> String {
        let mut out = String::new();
        self.write(error, 0, &mut out);
        out
    }

    fn write(&self, error: &Error, depth: usize, out: &mut String) {
        if !out.is_empty() {
            out.push('\n');
        }
        for _ in 0..depth {
            out.push_str("  ");
        }

        if let Some(location) = error.node().and_then(|node| self.resolver.resolve(node)) {
            // Writing into a String cannot fail.
            let _ = write!(out, "line {}, column {}: ", location.line, location.column);
        }

        // Multi-line messages keep the indentation of their error.
        for (i, line) in error.message().split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
                for _ in 0..depth {
                    out.push_str("  ");
                }
            }
            out.push_str(line);
        }

        for cause in error.underlying() {
            self.write(cause, depth + 1, out);
        }
    }
}
