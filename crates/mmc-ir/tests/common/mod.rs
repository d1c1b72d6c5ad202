//! Common test utilities for building meta-models.

#![allow(dead_code)]

use mmc_ast::{
    ClassDecl, ConstructorDecl, ConstructorStatementDecl, ConstructorValue, ContractsDecl,
    DefaultDecl, Expression, FunctionDecl, MetaModelDecl, MethodDecl, RawTypeAnnotation,
    Statement, SymbolDecl, TreeBuilder,
};
use mmc_core::{Error, Errors, Identifier};
use mmc_ir::{build, BuildOptions, SymbolTable};

pub fn ident(name: &str) -> Identifier {
    Identifier::new(name).unwrap()
}

/// Returns the top-level messages of `errors`.
pub fn messages(errors: &[Error]) -> Vec<String> {
    errors.iter().map(|error| error.message().to_string()).collect()
}

/// Assembles a meta-model declaration by declaration.
#[derive(Default)]
pub struct ModelBuilder {
    pub tree: TreeBuilder,
    pub model: MetaModelDecl,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses annotations such as `Optional[List[Item]]`.
    pub fn annotation(&mut self, text: &str) -> RawTypeAnnotation {
        let text = text.trim();
        match text.find('[') {
            None => self.tree.atomic(ident(text)),
            Some(open) => {
                let name = ident(&text[..open]);
                let inner = &text[open + 1..text.len() - 1];
                let subscripts = split_top_level(inner)
                    .into_iter()
                    .map(|part| self.annotation(part))
                    .collect();
                self.tree.subscripted(name, subscripts)
            }
        }
    }

    /// Declares a class with the given parents and properties.
    pub fn class(
        &mut self,
        name: &str,
        parents: &[&str],
        properties: &[(&str, &str)],
    ) -> &mut ClassDecl {
        let properties = properties
            .iter()
            .map(|(property, annotation)| {
                let annotation = self.annotation(annotation);
                self.tree.property(ident(property), annotation)
            })
            .collect();
        let decl = ClassDecl {
            id: self.tree.fresh(),
            name: ident(name),
            is_abstract: false,
            inheritances: parents.iter().map(|parent| ident(parent)).collect(),
            properties,
            methods: Vec::new(),
            invariants: Vec::new(),
            constructor: None,
            serialization: None,
        };
        self.model.symbols.push(SymbolDecl::Class(decl));
        match self.model.symbols.last_mut() {
            Some(SymbolDecl::Class(decl)) => decl,
            _ => unreachable!(),
        }
    }

    pub fn enumeration(&mut self, name: &str, literals: &[(&str, &str)]) {
        let literals = literals
            .iter()
            .map(|(literal, value)| (ident(literal), value.to_string()))
            .collect();
        let decl = self.tree.enumeration(ident(name), literals);
        self.model.symbols.push(SymbolDecl::Enumeration(decl));
    }

    /// Marks the enumeration `name` as a superset of `subsets`.
    pub fn superset(&mut self, name: &str, subsets: &[&str]) {
        let decl = self
            .model
            .symbols
            .iter_mut()
            .find_map(|symbol| match symbol {
                SymbolDecl::Enumeration(decl) if decl.name == name => Some(decl),
                _ => None,
            })
            .unwrap();
        decl.is_superset_of = subsets.iter().map(|subset| ident(subset)).collect();
    }

    /// A method without a return value, guarded by `contracts`.
    pub fn method(
        &mut self,
        name: &str,
        arguments: &[(&str, &str)],
        contracts: ContractsDecl,
    ) -> MethodDecl {
        let function = self.function(name, arguments, None, Vec::new());
        MethodDecl {
            id: function.id,
            name: function.name,
            arguments: function.arguments,
            returns: None,
            contracts,
            body: Vec::new(),
        }
    }

    pub fn function(
        &mut self,
        name: &str,
        arguments: &[(&str, &str)],
        returns: Option<&str>,
        body: Vec<Statement>,
    ) -> FunctionDecl {
        let arguments = arguments
            .iter()
            .map(|(argument, annotation)| {
                let annotation = self.annotation(annotation);
                self.tree.argument(ident(argument), annotation)
            })
            .collect();
        let returns = returns.map(|returns| self.annotation(returns));
        FunctionDecl {
            id: self.tree.fresh(),
            name: ident(name),
            arguments,
            returns,
            contracts: ContractsDecl::default(),
            body,
        }
    }

    /// Declares a verification function.
    pub fn verification(
        &mut self,
        name: &str,
        arguments: &[(&str, &str)],
        returns: Option<&str>,
        body: Vec<Statement>,
    ) {
        let function = self.function(name, arguments, returns, body);
        self.model.verification_functions.push(function);
    }

    pub fn constructor(
        &mut self,
        arguments: &[(&str, &str)],
        body: Vec<ConstructorStatementDecl>,
    ) -> ConstructorDecl {
        let arguments = arguments
            .iter()
            .map(|(argument, annotation)| {
                let annotation = self.annotation(annotation);
                self.tree.argument(ident(argument), annotation)
            })
            .collect();
        ConstructorDecl {
            id: self.tree.fresh(),
            arguments,
            contracts: ContractsDecl::default(),
            body,
        }
    }

    /// A constructor taking one argument per property and assigning each.
    pub fn plain_constructor(&mut self, properties: &[(&str, &str)]) -> ConstructorDecl {
        let body = properties
            .iter()
            .map(|(property, _)| self.assign(property, property))
            .collect();
        self.constructor(properties, body)
    }

    pub fn assign(&mut self, property: &str, argument: &str) -> ConstructorStatementDecl {
        ConstructorStatementDecl::Assign {
            id: self.tree.fresh(),
            property: ident(property),
            value: ConstructorValue::Argument(ident(argument)),
        }
    }

    pub fn assign_or_default(
        &mut self,
        property: &str,
        argument: &str,
        default: DefaultDecl,
    ) -> ConstructorStatementDecl {
        ConstructorStatementDecl::Assign {
            id: self.tree.fresh(),
            property: ident(property),
            value: ConstructorValue::ArgumentOrDefault {
                argument: ident(argument),
                default,
            },
        }
    }

    pub fn call_super(&mut self, super_name: &str) -> ConstructorStatementDecl {
        ConstructorStatementDecl::CallSuper {
            id: self.tree.fresh(),
            super_name: ident(super_name),
        }
    }

    /// Adds an invariant to the most recently declared class named `class`.
    pub fn invariant(&mut self, class: &str, body: Expression) {
        let invariant = self.tree.invariant(None, body);
        let decl = self
            .model
            .symbols
            .iter_mut()
            .rev()
            .find_map(|symbol| match symbol {
                SymbolDecl::Class(decl) if decl.name == class => Some(decl),
                _ => None,
            })
            .unwrap();
        decl.invariants.push(invariant);
    }

    pub fn build(&self) -> Result<SymbolTable, Errors> {
        build(&self.model, &BuildOptions::default())
    }
}

fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}
