//! Witness solving: given a compiled artifact and a witness prefix
//! (public || secret wires), derive every internal wire's value.

mod hint_dispatch;
mod r1cs;
mod sparse;

use ccs_field::{Field, PrimeField};

use crate::builder::CompiledCircuit;
use crate::error::Result;
use crate::hint::HintRegistry;

/// Solves a compiled circuit of either backend against a witness prefix,
/// returning the full witness vector `[public | secret | internal]`.
pub fn solve<F: Field + PrimeField>(
    compiled: &CompiledCircuit<F>,
    registry: &HintRegistry,
    witness_prefix: &[F],
) -> Result<Vec<F>> {
    match compiled {
        CompiledCircuit::R1cs(artifact) => r1cs::solve(artifact, registry, witness_prefix),
        CompiledCircuit::Sparse(artifact) => sparse::solve(artifact, registry, witness_prefix),
    }
}
