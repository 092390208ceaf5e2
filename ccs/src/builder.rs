use std::collections::HashMap;

use ccs_field::Field;
use num::BigUint;
use tracing::instrument;
use uuid::Uuid;

use crate::artifact::Artifact;
use crate::coeff::{CoeffTable, COEFF_MINUS_ONE, COEFF_ONE, COEFF_ZERO};
use crate::config::{BackendKind, CircuitConfig, CurveId};
use crate::constraint::{R1csConstraint, SparseR1c};
use crate::error::Result;
use crate::hint::{HintArg, HintDescriptor, HintFn, HintId, HintRegistry};
use crate::layout;
use crate::linear::LinearExpression;
use crate::log::LogEntry;
use crate::term::Term;
use crate::visibility::Visibility;

/// A circuit compiled down to one of the two constraint forms. The builder
/// decides which at construction time; both sides expose the same `Artifact`
/// shape, just parameterized over a different constraint type.
pub enum CompiledCircuit<F: Field> {
    R1cs(Artifact<F, R1csConstraint>),
    Sparse(Artifact<F, SparseR1c>),
}

/// Records the operations issued by a user-supplied circuit definition and
/// lowers them into a [`CompiledCircuit`].
///
/// Accumulates gates/constraints against sequentially allocated wire ids
/// and defers any global renumbering to a final lowering pass, rather than
/// resolving ids eagerly as gates are added.
pub struct CircuitBuilder<F: Field> {
    config: CircuitConfig,
    curve_id: CurveId,
    backend: BackendKind,
    coeffs: CoeffTable<F>,

    next_public: u32,
    next_secret: u32,
    next_internal: u32,

    r1cs: Vec<R1csConstraint>,
    sparse: Vec<SparseR1c>,

    hints: Vec<HintDescriptor>,
    hint_registry: HintRegistry,
    bit_decompose_hint: Option<HintId>,

    logs: Vec<LogEntry>,
    debug_info: HashMap<usize, LogEntry>,
}

impl<F: Field> CircuitBuilder<F> {
    pub fn new(config: CircuitConfig, curve_id: CurveId, backend: BackendKind) -> Self {
        tracing::trace!(%curve_id, %backend, "new circuit builder");
        let mut builder = CircuitBuilder {
            config,
            curve_id,
            backend,
            coeffs: CoeffTable::new(),
            next_public: 0,
            next_secret: 0,
            next_internal: 0,
            r1cs: Vec::new(),
            sparse: Vec::new(),
            hints: Vec::new(),
            hint_registry: HintRegistry::new(),
            bit_decompose_hint: None,
            logs: Vec::new(),
            debug_info: HashMap::new(),
        };
        // Public wire 0 is always the reserved ONE wire.
        let one_wire = builder.alloc_public();
        debug_assert_eq!(one_wire, 0);
        builder
    }

    fn alloc_public(&mut self) -> u32 {
        let id = self.next_public;
        self.next_public += 1;
        id
    }

    fn alloc_secret(&mut self) -> u32 {
        let id = self.next_secret;
        self.next_secret += 1;
        id
    }

    fn alloc_internal(&mut self) -> u32 {
        let id = self.next_internal;
        self.next_internal += 1;
        assert!(
            self.next_internal as usize <= self.config.max_internal_wires,
            "circuit exceeded CircuitConfig::max_internal_wires ({})",
            self.config.max_internal_wires
        );
        id
    }

    /// The reserved ONE wire (public wire 0, value always 1).
    pub fn one(&self) -> Term {
        Term::pack(COEFF_ONE, 0, Visibility::Public)
    }

    pub fn public_input(&mut self) -> Term {
        let id = self.alloc_public();
        Term::pack(COEFF_ONE, id, Visibility::Public)
    }

    pub fn secret_input(&mut self) -> Term {
        let id = self.alloc_secret();
        Term::pack(COEFF_ONE, id, Visibility::Secret)
    }

    /// A constant term carrying no wire at all.
    pub fn constant(&mut self, value: F) -> Term {
        let id = self.coeffs.insert(value);
        Term::pack(id, 0, Visibility::Virtual)
    }

    pub fn register_hint(&mut self, f: Box<dyn HintFn>) -> Result<()> {
        self.hint_registry.register(f)
    }

    /// Records a user-supplied circuit log line, rendered lazily by the log
    /// pipeline if ever needed for diagnostics.
    pub fn log(&mut self, format: impl Into<String>, to_resolve: Vec<Term>) {
        if self.config.retain_debug_info {
            self.logs.push(LogEntry::new(format, to_resolve));
        }
    }

    /// Attaches a debug-rendering entry to the constraint most recently
    /// pushed for the active backend, so an `UnsatisfiedConstraint` at that
    /// index carries a human-readable rendering of the failing equation.
    pub fn attach_debug(&mut self, entry: LogEntry) {
        if !self.config.retain_debug_info {
            return;
        }
        let index = match self.backend {
            BackendKind::R1cs => self.r1cs.len().saturating_sub(1),
            BackendKind::SparseR1cs => self.sparse.len().saturating_sub(1),
        };
        self.debug_info.insert(index, entry);
    }

    pub fn add(&self, a: &LinearExpression, b: &LinearExpression) -> LinearExpression {
        let mut out = a.clone();
        out.0.extend_from_slice(&b.0);
        out
    }

    pub fn sub(&mut self, a: &LinearExpression, b: &LinearExpression) -> LinearExpression {
        let mut out = a.clone();
        out.0.extend_from_slice(&b.negated(&mut self.coeffs).0);
        out
    }

    /// Reduces an arbitrary linear expression to a single [`Term`] by
    /// chaining two-term addition gates (`qL=1, qR=1, qO=-1`), as required
    /// before a SparseR1C gate's L/R/O slot can reference it.
    fn flatten_to_term(&mut self, expr: &LinearExpression) -> Term {
        if expr.is_empty() {
            return Term::pack(COEFF_ZERO, 0, Visibility::Virtual);
        }
        let mut terms = expr.0.clone();
        while terms.len() > 1 {
            let t0 = terms.remove(0);
            let t1 = terms.remove(0);
            let z = self.alloc_internal();
            let z_term = Term::pack(COEFF_ONE, z, Visibility::Internal);
            let o_term = Term::pack(COEFF_MINUS_ONE, z, Visibility::Internal);
            self.sparse.push(SparseR1c::new(
                t0,
                t1,
                o_term,
                [
                    Term::pack(COEFF_ZERO, 0, Visibility::Virtual),
                    Term::pack(COEFF_ZERO, 0, Visibility::Virtual),
                ],
                COEFF_ZERO,
            ));
            terms.insert(0, z_term);
        }
        terms[0]
    }

    #[instrument(level = "trace", skip(self, a, b))]
    pub fn mul(&mut self, a: &LinearExpression, b: &LinearExpression) -> Term {
        let z = self.alloc_internal();
        let z_term = Term::pack(COEFF_ONE, z, Visibility::Internal);
        match self.backend {
            BackendKind::R1cs => {
                self.r1cs.push(R1csConstraint::new(
                    a.clone(),
                    b.clone(),
                    LinearExpression::from_term(z_term),
                ));
            }
            BackendKind::SparseR1cs => {
                let ta = self.flatten_to_term(a);
                let tb = self.flatten_to_term(b);
                let zero = Term::pack(COEFF_ZERO, 0, Visibility::Virtual);
                self.sparse.push(SparseR1c::new(
                    zero,
                    zero,
                    Term::pack(COEFF_MINUS_ONE, z, Visibility::Internal),
                    [ta, tb],
                    COEFF_ZERO,
                ));
            }
        }
        z_term
    }

    /// Allocates `z` and emits `a * z = 1`. The caller must ensure `a != 0`.
    pub fn inv(&mut self, a: &LinearExpression) -> Term {
        let z = self.alloc_internal();
        let z_term = Term::pack(COEFF_ONE, z, Visibility::Internal);
        match self.backend {
            BackendKind::R1cs => {
                self.r1cs.push(R1csConstraint::new(
                    a.clone(),
                    LinearExpression::from_term(z_term),
                    LinearExpression::from_term(self.one()),
                ));
            }
            BackendKind::SparseR1cs => {
                let ta = self.flatten_to_term(a);
                let zero = Term::pack(COEFF_ZERO, 0, Visibility::Virtual);
                self.sparse.push(SparseR1c::new(
                    zero,
                    zero,
                    zero,
                    [ta, z_term],
                    COEFF_MINUS_ONE,
                ));
            }
        }
        z_term
    }

    pub fn div(&mut self, a: &LinearExpression, b: &LinearExpression) -> Term {
        let b_inv = self.inv(b);
        self.mul(a, &LinearExpression::from_term(b_inv))
    }

    #[instrument(level = "trace", skip(self, a, b))]
    pub fn assert_equal(&mut self, a: &LinearExpression, b: &LinearExpression) {
        let diff = self.sub(a, b);
        match self.backend {
            BackendKind::R1cs => {
                self.r1cs.push(R1csConstraint::new(
                    diff,
                    LinearExpression::from_term(self.one()),
                    LinearExpression::new(),
                ));
            }
            BackendKind::SparseR1cs => {
                let t = self.flatten_to_term(&diff);
                let zero = Term::pack(COEFF_ZERO, 0, Visibility::Virtual);
                self.sparse
                    .push(SparseR1c::new(t, zero, zero, [zero, zero], COEFF_ZERO));
            }
        }
    }

    #[instrument(level = "trace", skip(self, a))]
    pub fn assert_is_boolean(&mut self, a: &LinearExpression) {
        match self.backend {
            BackendKind::R1cs => {
                let one_minus_a = self.sub(&LinearExpression::from_term(self.one()), a);
                self.r1cs.push(R1csConstraint::new(
                    a.clone(),
                    one_minus_a,
                    LinearExpression::new(),
                ));
            }
            BackendKind::SparseR1cs => {
                let ta = self.flatten_to_term(a);
                let wire = ta.wire_id();
                let zero = Term::pack(COEFF_ZERO, 0, Visibility::Virtual);
                self.sparse.push(SparseR1c::new(
                    ta,
                    zero,
                    zero,
                    [
                        Term::pack(COEFF_MINUS_ONE, wire, ta.visibility()),
                        Term::pack(COEFF_ONE, wire, ta.visibility()),
                    ],
                    COEFF_ZERO,
                ));
            }
        }
    }

    /// Asserts `0 <= ⟨a⟩ <= bound` for a compile-time constant `bound`, by
    /// decomposing `bound - ⟨a⟩` into 64 boolean wires and checking their
    /// weighted sum reconstructs it. If `a > bound`, the difference wraps to
    /// a field element with no short bit decomposition and the weighted-sum
    /// check fails.
    pub fn assert_is_less_or_equal(&mut self, a: &LinearExpression, bound: u64) {
        const NBITS: usize = 64;
        let bound_term = self.constant(F::from_canonical_u64(bound));
        let diff = self.sub(&LinearExpression::from_term(bound_term), a);

        let hint_id = self.bit_decompose_hint_id();
        let outputs = self.new_hint(hint_id, vec![HintArg::Linear(diff.clone())], NBITS);

        let mut weighted = LinearExpression::new();
        let mut pow2 = F::ONE;
        for bit_term in &outputs {
            self.assert_is_boolean(&LinearExpression::from_term(*bit_term));
            let coeff_id = self.coeffs.insert(pow2);
            weighted.push(bit_term.with_coeff_id(coeff_id));
            pow2 = pow2.double();
        }
        self.assert_equal(&weighted, &diff);
    }

    fn bit_decompose_hint_id(&mut self) -> HintId {
        if let Some(id) = self.bit_decompose_hint {
            return id;
        }
        let id = Uuid::from_u128(0xCC5_0000_0064_0001_0000_0000_0000_0000u128);
        // Idempotent: only the first call for a given builder registers it.
        let _ = self.hint_registry.register(Box::new(BitDecompose64));
        self.bit_decompose_hint = Some(id);
        id
    }

    /// Allocates `n_outputs` internal wires and records a hint descriptor
    /// computing them from `inputs`, returning the allocated wires in order.
    pub fn new_hint(&mut self, id: HintId, inputs: Vec<HintArg>, n_outputs: usize) -> Vec<Term> {
        let wires: Vec<u32> = (0..n_outputs).map(|_| self.alloc_internal()).collect();
        let terms: Vec<Term> = wires
            .iter()
            .map(|&w| Term::pack(COEFF_ONE, w, Visibility::Internal))
            .collect();
        self.hints.push(HintDescriptor { id, inputs, wires });
        terms
    }

    #[instrument(level = "info", skip(self), fields(curve_id = %self.curve_id, backend_kind = %self.backend))]
    pub fn compile(self) -> Result<CompiledCircuit<F>> {
        let np = self.next_public as usize;
        let ns = self.next_secret as usize;
        let ni = self.next_internal as usize;

        let (logs, debug_info) = if self.config.retain_debug_info {
            (
                self.logs
                    .iter()
                    .map(|e| layout::shift_log_entry(e, np, ns))
                    .collect(),
                self.debug_info
                    .iter()
                    .map(|(&i, e)| (i, layout::shift_log_entry(e, np, ns)))
                    .collect(),
            )
        } else {
            (Vec::new(), HashMap::new())
        };

        let mut hints = HashMap::new();
        for h in &self.hints {
            let shifted = layout::shift_hint(h, np, ns);
            hints.insert(shifted.primary_wire(), shifted);
        }

        match self.backend {
            BackendKind::R1cs => {
                let constraints = self
                    .r1cs
                    .iter()
                    .map(|c| layout::shift_r1cs_constraint(c, np, ns))
                    .collect();
                Ok(CompiledCircuit::R1cs(Artifact {
                    num_public: np,
                    num_secret: ns,
                    num_internal: ni,
                    constraints,
                    hints,
                    coeffs: self.coeffs,
                    logs,
                    debug_info,
                    curve_id: self.curve_id,
                }))
            }
            BackendKind::SparseR1cs => {
                let constraints = self
                    .sparse
                    .iter()
                    .map(|c| layout::shift_sparse_constraint(c, np, ns))
                    .collect();
                Ok(CompiledCircuit::Sparse(Artifact {
                    num_public: np,
                    num_secret: ns,
                    num_internal: ni,
                    constraints,
                    hints,
                    coeffs: self.coeffs,
                    logs,
                    debug_info,
                    curve_id: self.curve_id,
                }))
            }
        }
    }

    pub fn hint_registry(&self) -> &HintRegistry {
        &self.hint_registry
    }

    pub fn into_hint_registry(self) -> HintRegistry {
        self.hint_registry
    }
}

/// Decomposes a single field element into 64 little-endian boolean wires.
struct BitDecompose64;

impl HintFn for BitDecompose64 {
    fn uuid(&self) -> HintId {
        Uuid::from_u128(0xCC5_0000_0064_0001_0000_0000_0000_0000u128)
    }

    fn nb_outputs(&self, _curve: &CurveId, _n_inputs: usize) -> usize {
        64
    }

    fn call(&self, _curve: &CurveId, inputs: &[BigUint], outputs: &mut [BigUint]) -> Result<()> {
        let value = inputs.first().cloned().unwrap_or_default();
        for (i, out) in outputs.iter_mut().enumerate() {
            *out = BigUint::from(value.bit(i as u64) as u8);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccs_field::Fr;

    fn new_builder(backend: BackendKind) -> CircuitBuilder<Fr> {
        CircuitBuilder::new(
            CircuitConfig::default(),
            CurveId::new("bn254"),
            backend,
        )
    }

    #[test]
    fn one_wire_is_public_zero() {
        let b: CircuitBuilder<Fr> = new_builder(BackendKind::R1cs);
        let one = b.one();
        assert_eq!(one.wire_id(), 0);
        assert_eq!(one.visibility(), Visibility::Public);
    }

    #[test]
    fn mul_allocates_internal_wire_and_emits_constraint() {
        let mut b = new_builder(BackendKind::R1cs);
        let x = b.public_input();
        let y = b.secret_input();
        let z = b.mul(
            &LinearExpression::from_term(x),
            &LinearExpression::from_term(y),
        );
        assert_eq!(z.visibility(), Visibility::Internal);
        let CompiledCircuit::R1cs(artifact) = b.compile().unwrap() else {
            panic!("expected r1cs artifact");
        };
        assert_eq!(artifact.constraints.len(), 1);
        assert_eq!(artifact.num_internal, 1);
    }

    #[test]
    fn sparse_mul_flattens_multi_term_operands() {
        let mut b = new_builder(BackendKind::SparseR1cs);
        let x = b.public_input();
        let y = b.secret_input();
        let sum = b.add(
            &LinearExpression::from_term(x),
            &LinearExpression::from_term(y),
        );
        let _ = b.mul(&sum, &LinearExpression::from_term(y));
        let CompiledCircuit::Sparse(artifact) = b.compile().unwrap() else {
            panic!("expected sparse artifact");
        };
        // One addition gate to flatten `sum`, one multiplication gate.
        assert_eq!(artifact.constraints.len(), 2);
    }
}
