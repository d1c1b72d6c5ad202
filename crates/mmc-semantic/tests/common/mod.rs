//! Common test utilities for the analysis of expressions.

#![allow(dead_code)]

use mmc_ast::{
    ClassDecl, ConstructorDecl, ConstructorStatementDecl, ConstructorValue, ContractsDecl,
    Expression, FunctionDecl, MetaModelDecl, MethodDecl, RawTypeAnnotation, Statement,
    SymbolDecl, TreeBuilder,
};
use mmc_core::{Errors, Identifier};
use mmc_ir::{build, BuildOptions, Symbol, SymbolTable};
use mmc_semantic::{
    annotate_expression, populate_base_environment, Environment, InferredType,
    InvariantAnnotations,
};

pub fn ident(name: &str) -> Identifier {
    Identifier::new(name).unwrap()
}

/// Assembles a meta-model together with the expressions to analyse.
#[derive(Default)]
pub struct Model {
    pub tree: TreeBuilder,
    pub model: MetaModelDecl,
}

impl Model {
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
                let inner = self.annotation(&text[open + 1..text.len() - 1]);
                self.tree.subscripted(name, vec![inner])
            }
        }
    }

    /// Declares a class. If any property is required, the class gets a
    /// constructor taking and assigning every property.
    pub fn class(
        &mut self,
        name: &str,
        parents: &[&str],
        properties: &[(&str, &str)],
    ) -> &mut ClassDecl {
        let declared = properties
            .iter()
            .map(|(property, annotation)| {
                let annotation = self.annotation(annotation);
                self.tree.property(ident(property), annotation)
            })
            .collect();
        let constructor = properties
            .iter()
            .any(|(_, annotation)| !annotation.starts_with("Optional["))
            .then(|| self.constructor(properties));
        let decl = ClassDecl {
            id: self.tree.fresh(),
            name: ident(name),
            is_abstract: false,
            inheritances: parents.iter().map(|parent| ident(parent)).collect(),
            properties: declared,
            methods: Vec::new(),
            invariants: Vec::new(),
            constructor,
            serialization: None,
        };
        self.model.symbols.push(SymbolDecl::Class(decl));
        match self.model.symbols.last_mut() {
            Some(SymbolDecl::Class(decl)) => decl,
            _ => unreachable!(),
        }
    }

    fn constructor(&mut self, properties: &[(&str, &str)]) -> ConstructorDecl {
        let arguments = properties
            .iter()
            .map(|(property, annotation)| {
                let annotation = self.annotation(annotation);
                self.tree.argument(ident(property), annotation)
            })
            .collect();
        let body = properties
            .iter()
            .map(|(property, _)| ConstructorStatementDecl::Assign {
                id: self.tree.fresh(),
                property: ident(property),
                value: ConstructorValue::Argument(ident(property)),
            })
            .collect();
        ConstructorDecl {
            id: self.tree.fresh(),
            arguments,
            contracts: ContractsDecl::default(),
            body,
        }
    }

    /// Adds a method without arguments to the most recent class `class`.
    pub fn method(&mut self, class: &str, name: &str, returns: Option<&str>) {
        let returns = returns.map(|returns| self.annotation(returns));
        let method = MethodDecl {
            id: self.tree.fresh(),
            name: ident(name),
            arguments: Vec::new(),
            returns,
            contracts: ContractsDecl::default(),
            body: Vec::new(),
        };
        self.class_decl(class).methods.push(method);
    }

    pub fn enumeration(&mut self, name: &str, literals: &[(&str, &str)]) {
        let literals = literals
            .iter()
            .map(|(literal, value)| (ident(literal), value.to_string()))
            .collect();
        let decl = self.tree.enumeration(ident(name), literals);
        self.model.symbols.push(SymbolDecl::Enumeration(decl));
    }

    /// Declares an implementation-specific verification function.
    pub fn verification(&mut self, name: &str, arguments: &[(&str, &str)], returns: Option<&str>) {
        let arguments = arguments
            .iter()
            .map(|(argument, annotation)| {
                let annotation = self.annotation(annotation);
                self.tree.argument(ident(argument), annotation)
            })
            .collect();
        let returns = returns.map(|returns| self.annotation(returns));
        let body: Vec<Statement> = Vec::new();
        self.model.verification_functions.push(FunctionDecl {
            id: self.tree.fresh(),
            name: ident(name),
            arguments,
            returns,
            contracts: ContractsDecl::default(),
            body,
        });
    }

    pub fn invariant(&mut self, class: &str, body: Expression) {
        let invariant = self.tree.invariant(None, body);
        self.class_decl(class).invariants.push(invariant);
    }

    fn class_decl(&mut self, class: &str) -> &mut ClassDecl {
        self.model
            .symbols
            .iter_mut()
            .rev()
            .find_map(|symbol| match symbol {
                SymbolDecl::Class(decl) if decl.name == class => Some(decl),
                _ => None,
            })
            .unwrap()
    }

    pub fn build(&self) -> SymbolTable {
        match build(&self.model, &BuildOptions::default()) {
            Ok(table) => table,
            Err(errors) => panic!("expected the meta-model to build, got: {errors:#?}"),
        }
    }
}

/// The type of the instances of the symbol `name`.
pub fn our_type(table: &SymbolTable, name: &str) -> InferredType {
    InferredType::OurType(table.find(name).unwrap())
}

/// Annotates `expr` with the variables `bindings` in scope.
pub fn analyze(
    table: &SymbolTable,
    bindings: &[(&str, InferredType)],
    expr: &Expression,
) -> Result<InvariantAnnotations, Errors> {
    let base = populate_base_environment(table);
    let mut scope = Environment::child(&base);
    for (name, ty) in bindings {
        scope.set(ident(name), ty.clone());
    }
    annotate_expression(table, &scope, expr)
}

/// Annotates `expr` with `self` bound to the class `class`.
pub fn analyze_in(
    table: &SymbolTable,
    class: &str,
    expr: &Expression,
) -> Result<InvariantAnnotations, Errors> {
    let this = match table.find(class) {
        Some(symbol @ Symbol::Class(_)) => InferredType::OurType(symbol),
        other => panic!("expected {class} to be a class, got: {other:?}"),
    };
    analyze(table, &[("self", this)], expr)
}

pub fn messages(errors: &Errors) -> Vec<String> {
    errors.iter().map(|error| error.message().to_string()).collect()
}
