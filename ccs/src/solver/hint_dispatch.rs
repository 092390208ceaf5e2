use ccs_field::{Field, PrimeField};
use num::BigUint;

use crate::coeff::CoeffTable;
use crate::config::CurveId;
use crate::error::{Error, Result};
use crate::hint::{HintArg, HintDescriptor, HintRegistry};
use crate::linear::LinearExpression;
use crate::term::Term;
use crate::visibility::Visibility;

/// Invokes the hint producing `wire_id`, if any, unless it has already run.
///
/// Returns `Ok(true)` if `wire_id` is a hint output (whether or not this call
/// actually ran the function — it may have been dispatched earlier through
/// one of its sibling outputs), `Ok(false)` if it isn't a hint output at all.
pub fn dispatch_if_needed<F: Field + PrimeField>(
    wire_id: u32,
    hints: &std::collections::HashMap<u32, HintDescriptor>,
    registry: &HintRegistry,
    coeffs: &CoeffTable<F>,
    curve: &CurveId,
    values: &mut [F],
    solved: &mut [bool],
) -> Result<bool> {
    let Some(hint) = hints.get(&wire_id) else {
        return Ok(false);
    };

    // A hint is invoked at most once: the first output's solved flag gates
    // re-entry for every sibling output.
    if solved[hint.primary_wire() as usize] {
        return Ok(true);
    }

    let inputs = hint
        .inputs
        .iter()
        .map(|arg| resolve_hint_arg(arg, coeffs, values, solved))
        .collect::<Result<Vec<_>>>()?;

    let f = registry
        .get(hint.id)
        .ok_or(Error::MissingHintFunction(hint.id))?;

    let expected = f.nb_outputs(curve, inputs.len());
    if expected != hint.wires.len() {
        return Err(Error::HintOutputMismatch {
            uuid: hint.id,
            expected,
            actual: hint.wires.len(),
        });
    }

    let mut outputs = vec![BigUint::default(); expected];
    f.call(curve, &inputs, &mut outputs).map_err(|e| match e {
        Error::HintFailed { .. } => e,
        other => Error::HintFailed {
            uuid: hint.id,
            message: other.to_string(),
        },
    })?;

    tracing::trace!(uuid = %hint.id, n_outputs = expected, "dispatched hint");

    for (&wire, out) in hint.wires.iter().zip(outputs) {
        values[wire as usize] = F::from_noncanonical_biguint(out);
        solved[wire as usize] = true;
    }

    Ok(true)
}

fn resolve_hint_arg<F: Field + PrimeField>(
    arg: &HintArg,
    coeffs: &CoeffTable<F>,
    values: &[F],
    solved: &[bool],
) -> Result<BigUint> {
    match arg {
        HintArg::Term(t) => resolve_term(*t, coeffs, values, solved),
        HintArg::Linear(expr) => resolve_linear(expr, coeffs, values, solved),
        HintArg::Constant(c) => Ok(F::from_noncanonical_biguint(c.clone()).to_canonical_biguint()),
    }
}

fn resolve_term<F: Field + PrimeField>(
    t: Term,
    coeffs: &CoeffTable<F>,
    values: &[F],
    solved: &[bool],
) -> Result<BigUint> {
    let value = if t.visibility() == Visibility::Virtual {
        coeffs.get(t.coeff_id())
    } else {
        let w = t.wire_id() as usize;
        if !solved[w] {
            return Err(Error::Structural(format!(
                "hint input references unsolved wire {w}"
            )));
        }
        coeffs.get(t.coeff_id()) * values[w]
    };
    Ok(value.to_canonical_biguint())
}

fn resolve_linear<F: Field + PrimeField>(
    expr: &LinearExpression,
    coeffs: &CoeffTable<F>,
    values: &[F],
    solved: &[bool],
) -> Result<BigUint> {
    let mut acc = F::ZERO;
    for &t in expr.terms() {
        if t.visibility() != Visibility::Virtual {
            let w = t.wire_id() as usize;
            if !solved[w] {
                return Err(Error::Structural(format!(
                    "hint input references unsolved wire {w}"
                )));
            }
        }
        let x = if t.visibility() == Visibility::Virtual {
            F::ONE
        } else {
            values[t.wire_id() as usize]
        };
        acc += coeffs.get(t.coeff_id()) * x;
    }
    Ok(acc.to_canonical_biguint())
}
