//! Constraint-system compiler and witness solver for arithmetic circuits
//! over prime fields, targeting both R1CS and PLONK-style SparseR1CS.
//!
//! A user builds a circuit against [`CircuitBuilder`], compiles it into a
//! [`CompiledCircuit`], then at proving time hands a witness prefix to
//! [`solve`] to derive the full witness vector.

mod artifact;
mod builder;
mod coeff;
mod config;
mod constraint;
mod error;
mod hint;
mod layout;
mod linear;
mod log;
mod serialize;
mod solver;
mod term;
mod visibility;
mod witness_io;

pub use artifact::Artifact;
pub use builder::{CircuitBuilder, CompiledCircuit};
pub use coeff::{CoeffTable, COEFF_MINUS_ONE, COEFF_ONE, COEFF_TWO, COEFF_ZERO};
pub use config::{BackendKind, CircuitConfig, CurveId};
pub use constraint::{R1csConstraint, SparseR1c};
pub use error::{Error, Result};
pub use hint::{HintArg, HintDescriptor, HintFn, HintId, HintRegistry};
pub use linear::LinearExpression;
pub use log::LogEntry;
pub use term::{Term, TERM_DELIMITER};
pub use visibility::Visibility;

use ccs_field::{Field, PrimeField};

/// Solves a compiled circuit against a witness prefix.
pub fn solve<F: Field + PrimeField>(
    compiled: &CompiledCircuit<F>,
    registry: &HintRegistry,
    witness_prefix: &[F],
) -> Result<Vec<F>> {
    solver::solve(compiled, registry, witness_prefix)
}

/// Serializes a compiled R1CS artifact to deterministic CBOR.
pub fn encode_r1cs<F: Field>(artifact: &Artifact<F, R1csConstraint>) -> Result<Vec<u8>> {
    serialize::encode(artifact)
}

/// Deserializes a compiled R1CS artifact from CBOR, bounding array/map sizes
/// by `config.max_cbor_elements`.
pub fn decode_r1cs<F: Field>(
    bytes: &[u8],
    config: &CircuitConfig,
) -> Result<Artifact<F, R1csConstraint>> {
    serialize::decode(bytes, config.max_cbor_elements)
}

/// Serializes a compiled SparseR1CS artifact to deterministic CBOR.
pub fn encode_sparse<F: Field>(artifact: &Artifact<F, SparseR1c>) -> Result<Vec<u8>> {
    serialize::encode(artifact)
}

/// Deserializes a compiled SparseR1CS artifact from CBOR, bounding array/map
/// sizes by `config.max_cbor_elements`.
pub fn decode_sparse<F: Field>(
    bytes: &[u8],
    config: &CircuitConfig,
) -> Result<Artifact<F, SparseR1c>> {
    serialize::decode(bytes, config.max_cbor_elements)
}

/// Encodes a witness prefix or full witness vector per the external wire
/// format: a 4-byte big-endian length followed by canonical
/// big-endian field elements.
pub fn encode_witness<F: PrimeField>(elements: &[F]) -> Vec<u8> {
    witness_io::encode(elements)
}

/// Decodes a witness buffer produced by [`encode_witness`], checking its
/// declared length against `expected_len` if given.
pub fn decode_witness<F: PrimeField>(bytes: &[u8], expected_len: Option<usize>) -> Result<Vec<F>> {
    witness_io::decode(bytes, expected_len)
}
