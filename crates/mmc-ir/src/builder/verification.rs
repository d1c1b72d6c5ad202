use crate::pattern::{reconstruct_pattern, PatternOutcome};
use crate::types::Verification;
use mmc_ast::FunctionDecl;
use mmc_core::Error;

/// Decides how backends have to implement a verification function.
pub(super) fn classify(function: &FunctionDecl) -> Result<Verification, Error> {
    match reconstruct_pattern(function) {
        PatternOutcome::Matched(pattern) => {
            tracing::trace!(function = %function.name, %pattern, "recognised a pattern verification");
            Ok(Verification::Pattern { pattern })
        }
        PatternOutcome::NotAPatternFunction => Ok(Verification::ImplementationSpecific),
        PatternOutcome::Malformed(error) => Err(Error::with_underlying(
            Some(function.id),
            format!(
                "The verification function {} looks like a pattern verification, \
                 but it does not follow the supported shape",
                function.name
            ),
            vec![error],
        )),
    }
}
