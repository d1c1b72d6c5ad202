//! Pre- and postconditions of methods, constructors and functions.

use crate::types::{Contract, Contracts, Snapshot};
use mmc_ast::{ArgumentDecl, ContractDecl, ContractsDecl, Expression};
use mmc_core::{Error, Errors, Identifier};

pub(super) fn convert(decl: &ContractsDecl) -> Contracts {
    let contract = |decl: &ContractDecl| Contract {
        args: decl.args.clone(),
        description: decl.description.clone(),
        body: decl.body.clone(),
        node: decl.id,
    };

    Contracts {
        preconditions: decl.preconditions.iter().map(contract).collect(),
        snapshots: decl
            .snapshots
            .iter()
            .map(|snapshot| Snapshot {
                args: snapshot.args.clone(),
                name: snapshot.name.clone(),
                body: snapshot.body.clone(),
                node: snapshot.id,
            })
            .collect(),
        postconditions: decl.postconditions.iter().map(contract).collect(),
    }
}

/// Checks that the contracts only take arguments of the signature they
/// guard. Postconditions may additionally take `OLD` and `result`.
pub(super) fn check_arguments(
    decl: &ContractsDecl,
    arguments: &[ArgumentDecl],
    owner: &str,
    errors: &mut Errors,
) {
    let sites = decl
        .preconditions
        .iter()
        .map(|contract| (contract.id, &contract.args, false))
        .chain(
            decl.snapshots
                .iter()
                .map(|snapshot| (snapshot.id, &snapshot.args, false)),
        )
        .chain(
            decl.postconditions
                .iter()
                .map(|contract| (contract.id, &contract.args, true)),
        );

    for (node, args, is_postcondition) in sites {
        for arg in args {
            if !is_known(arg, arguments, is_postcondition) {
                errors.push(Error::at(
                    node,
                    format!("The argument {arg} of a contract is not an argument of {owner}"),
                ));
            }
        }
    }
}

fn is_known(arg: &Identifier, arguments: &[ArgumentDecl], is_postcondition: bool) -> bool {
    *arg == "self"
        || (is_postcondition && (*arg == "OLD" || *arg == "result"))
        || arguments.iter().any(|argument| argument.name == *arg)
}

/// Bodies of all contracts and snapshots, as declared.
pub(super) fn bodies(decl: &ContractsDecl) -> impl Iterator<Item = &Expression> {
    decl.preconditions
        .iter()
        .map(|contract| &contract.body)
        .chain(decl.snapshots.iter().map(|snapshot| &snapshot.body))
        .chain(decl.postconditions.iter().map(|contract| &contract.body))
}
