use ccs::{
    BackendKind, CircuitBuilder, CircuitConfig, CompiledCircuit, CurveId, Error, HintArg, HintFn,
    HintId, HintRegistry, LinearExpression,
};
use ccs_field::{Field, Fr, PrimeField};
use num::BigUint;
use uuid::Uuid;

fn builder(backend: BackendKind) -> CircuitBuilder<Fr> {
    CircuitBuilder::new(CircuitConfig::default(), CurveId::new("bn254"), backend)
}

fn both_backends() -> [BackendKind; 2] {
    [BackendKind::R1cs, BackendKind::SparseR1cs]
}

/// S1 Identity: `assert_equal(x, x)` with one public input. Any witness solves.
#[test]
fn s1_identity() {
    for backend in both_backends() {
        let mut b = builder(backend);
        let x = LinearExpression::from_term(b.public_input());
        b.assert_equal(&x, &x);
        let compiled = b.compile().unwrap();
        let registry = HintRegistry::new();

        for value in [7u64, 0u64] {
            let prefix = [Fr::ONE, Fr::from_canonical_u64(value)];
            let witness = ccs::solve(&compiled, &registry, &prefix).unwrap();
            assert_eq!(witness.len(), 2);
        }
    }
}

/// S2 Square: `y = x*x`, x secret, y public.
#[test]
fn s2_square() {
    for backend in both_backends() {
        let mut b = builder(backend);
        let y = b.public_input();
        let x = b.secret_input();
        let x_expr = LinearExpression::from_term(x);
        let z = b.mul(&x_expr, &x_expr);
        b.assert_equal(&LinearExpression::from_term(y), &LinearExpression::from_term(z));
        let compiled = b.compile().unwrap();
        let registry = HintRegistry::new();

        let prefix_ok = [Fr::ONE, Fr::from_canonical_u64(9), Fr::from_canonical_u64(3)];
        assert!(ccs::solve(&compiled, &registry, &prefix_ok).is_ok());

        let prefix_bad = [Fr::ONE, Fr::from_canonical_u64(9), Fr::from_canonical_u64(4)];
        let err = ccs::solve(&compiled, &registry, &prefix_bad).unwrap_err();
        assert!(matches!(err, Error::UnsatisfiedConstraint { .. }));
    }
}

struct InvertHint;

impl HintFn for InvertHint {
    fn uuid(&self) -> HintId {
        Uuid::from_u128(0x5111_0000_0000_0000_0000_0000_0000_0001)
    }

    fn nb_outputs(&self, _curve: &CurveId, _n_inputs: usize) -> usize {
        1
    }

    fn call(&self, _curve: &CurveId, inputs: &[BigUint], outputs: &mut [BigUint]) -> ccs::Result<()> {
        let x = Fr::from_noncanonical_biguint(inputs[0].clone());
        outputs[0] = x.inverse().to_canonical_biguint();
        Ok(())
    }
}

/// S3 Hint inverse: `y = inv(x)` via a hint, paired with `x*y = 1`.
#[test]
fn s3_hint_inverse() {
    for backend in both_backends() {
        let mut b = builder(backend);
        let x = b.secret_input();
        b.register_hint(Box::new(InvertHint)).unwrap();
        let y_terms = b.new_hint(
            InvertHint.uuid(),
            vec![HintArg::Term(x)],
            1,
        );
        let y = y_terms[0];
        let one = b.one();
        let z = b.mul(&LinearExpression::from_term(x), &LinearExpression::from_term(y));
        b.assert_equal(&LinearExpression::from_term(z), &LinearExpression::from_term(one));
        let compiled = b.compile().unwrap();
        let mut registry = HintRegistry::new();
        registry.register(Box::new(InvertHint)).unwrap();

        let prefix = [Fr::ONE, Fr::from_canonical_u64(3)];
        let witness = ccs::solve(&compiled, &registry, &prefix).unwrap();
        let y_value = witness[2];
        assert_eq!(y_value * Fr::from_canonical_u64(3), Fr::ONE);
    }
}

/// S4 Boolean: `assert_is_boolean(b)`.
#[test]
fn s4_boolean() {
    for backend in both_backends() {
        let mut b = builder(backend);
        let bit = b.public_input();
        b.assert_is_boolean(&LinearExpression::from_term(bit));
        let compiled = b.compile().unwrap();
        let registry = HintRegistry::new();

        for value in [0u64, 1u64] {
            let prefix = [Fr::ONE, Fr::from_canonical_u64(value)];
            assert!(ccs::solve(&compiled, &registry, &prefix).is_ok());
        }

        let prefix_bad = [Fr::ONE, Fr::from_canonical_u64(2)];
        let err = ccs::solve(&compiled, &registry, &prefix_bad).unwrap_err();
        assert!(matches!(err, Error::UnsatisfiedConstraint { .. }));
    }
}

/// S6 Duplicate hint registration is rejected.
#[test]
fn s6_duplicate_hint_registration() {
    let mut b = builder(BackendKind::R1cs);
    b.register_hint(Box::new(InvertHint)).unwrap();
    let err = b.register_hint(Box::new(InvertHint)).unwrap_err();
    assert!(matches!(err, Error::DuplicateHint(_)));
}

#[test]
fn compiles_to_expected_backend_variant() {
    let b = builder(BackendKind::R1cs);
    assert!(matches!(b.compile().unwrap(), CompiledCircuit::R1cs(_)));
    let b = builder(BackendKind::SparseR1cs);
    assert!(matches!(b.compile().unwrap(), CompiledCircuit::Sparse(_)));
}
