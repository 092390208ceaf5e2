use ccs_field::{Field, PrimeField};

use crate::artifact::Artifact;
use crate::coeff::CoeffTable;
use crate::constraint::SparseR1c;
use crate::error::{Error, Result};
use crate::hint::HintRegistry;
use crate::term::Term;
use crate::visibility::Visibility;

use super::hint_dispatch;

/// Solves a SparseR1CS artifact against a witness prefix, producing the full
/// witness vector.
#[tracing::instrument(level = "info", skip_all, fields(np = artifact.num_public, ns = artifact.num_secret, ni = artifact.num_internal))]
pub fn solve<F: Field + PrimeField>(
    artifact: &Artifact<F, SparseR1c>,
    registry: &HintRegistry,
    witness_prefix: &[F],
) -> Result<Vec<F>> {
    let prefix_len = artifact.prefix_len();
    if witness_prefix.len() != prefix_len {
        return Err(Error::InvalidWitnessSize {
            expected: prefix_len,
            actual: witness_prefix.len(),
        });
    }

    let total = artifact.total_wires();
    let mut values = vec![F::ZERO; total];
    let mut solved = vec![false; total];
    values[..prefix_len].copy_from_slice(witness_prefix);
    solved[..prefix_len].iter_mut().for_each(|s| *s = true);

    // A single batched inversion over the whole coefficient table amortizes
    // the O-path division to one multiplication per constraint.
    let neg_inv = artifact.coeffs.neg_inverses();

    for (i, constraint) in artifact.constraints.iter().enumerate() {
        solve_one(i, constraint, artifact, registry, &neg_inv, &mut values, &mut solved)?;
    }

    let nb_solved = solved.iter().filter(|&&s| s).count();
    if nb_solved != total {
        return Err(Error::Structural(format!(
            "solver completed with {nb_solved}/{total} wires solved"
        )));
    }

    Ok(values)
}

fn raw_wire_value<F: Field>(t: Term, values: &[F]) -> F {
    if t.visibility() == Visibility::Virtual {
        F::ONE
    } else {
        values[t.wire_id() as usize]
    }
}

fn is_unsolved<F: Field>(t: Term, solved: &[bool]) -> bool {
    t.visibility() != Visibility::Virtual && !solved[t.wire_id() as usize]
}

/// A term's contribution to the gate equation: `coeff * wire_value`.
fn term_value<F: Field>(t: Term, coeffs: &CoeffTable<F>, values: &[F]) -> F {
    coeffs.get(t.coeff_id()) * raw_wire_value(t, values)
}

fn solve_one<F: Field + PrimeField>(
    index: usize,
    c: &SparseR1c,
    artifact: &Artifact<F, SparseR1c>,
    registry: &HintRegistry,
    neg_inv: &[F],
    values: &mut [F],
    solved: &mut [bool],
) -> Result<()> {
    let coeffs = &artifact.coeffs;
    let c_l = coeffs.get(c.l.coeff_id());
    let c_r = coeffs.get(c.r.coeff_id());
    let c_o = coeffs.get(c.o.coeff_id());
    let c_m0 = coeffs.get(c.m[0].coeff_id());
    let c_m1 = coeffs.get(c.m[1].coeff_id());
    let u3 = c_m0 * c_m1;

    // Hint dispatch: every non-virtual wire this gate references may be a
    // hint output awaiting its call, including M's operands, which are
    // independent wire references from L/R in this representation.
    for t in [c.l, c.r, c.o, c.m[0], c.m[1]] {
        if is_unsolved::<F>(t, solved) {
            hint_dispatch::dispatch_if_needed(
                t.wire_id(),
                &artifact.hints,
                registry,
                coeffs,
                &artifact.curve_id,
                values,
                solved,
            )?;
        }
    }

    if is_unsolved::<F>(c.m[0], solved) || is_unsolved::<F>(c.m[1], solved) {
        return Err(Error::Solver {
            index,
            reason: "constraint's multiplicative operand is not uniquely determined".to_string(),
        });
    }

    let l_unsolved = is_unsolved::<F>(c.l, solved);
    let r_unsolved = is_unsolved::<F>(c.r, solved);
    let o_unsolved = is_unsolved::<F>(c.o, solved);
    let count = l_unsolved as u8 + r_unsolved as u8 + o_unsolved as u8;
    if count > 1 {
        return Err(Error::Solver {
            index,
            reason: "constraint has more than one unsolved wire".to_string(),
        });
    }

    let k = coeffs.get(c.k);

    if l_unsolved {
        let x_r = raw_wire_value(c.r, values);
        let x_o = raw_wire_value(c.o, values);
        let denom = c_l + u3 * x_r;
        if denom.is_zero() {
            return Err(unsatisfied(artifact, index, values, solved));
        }
        let numerator = c_r * x_r + c_o * x_o + k;
        let x_l = -numerator / denom;
        values[c.l.wire_id() as usize] = x_l;
        solved[c.l.wire_id() as usize] = true;
    } else if r_unsolved {
        let x_l = raw_wire_value(c.l, values);
        let x_o = raw_wire_value(c.o, values);
        let denom = c_r + u3 * x_l;
        if denom.is_zero() {
            return Err(unsatisfied(artifact, index, values, solved));
        }
        let numerator = c_l * x_l + c_o * x_o + k;
        let x_r = -numerator / denom;
        values[c.r.wire_id() as usize] = x_r;
        solved[c.r.wire_id() as usize] = true;
    } else if o_unsolved {
        if c_o.is_zero() {
            return Err(Error::Solver {
                index,
                reason: "output wire is not governed by this constraint (zero coefficient)"
                    .to_string(),
            });
        }
        let x_l = raw_wire_value(c.l, values);
        let x_r = raw_wire_value(c.r, values);
        let mul_term = term_value(c.m[0], coeffs, values) * term_value(c.m[1], coeffs, values);
        let inner = mul_term + c_l * x_l + c_r * x_r + k;
        // cO*xO + inner = 0  =>  xO = -inner/cO = inner * negInv[cO], since
        // negInv[i] = -coeffs[i]^-1 (precomputed in `neg_inv`).
        let x_o = inner * neg_inv[c.o.coeff_id() as usize];
        values[c.o.wire_id() as usize] = x_o;
        solved[c.o.wire_id() as usize] = true;
    }

    let x_l = raw_wire_value(c.l, values);
    let x_r = raw_wire_value(c.r, values);
    let x_o = raw_wire_value(c.o, values);
    let mul_term = term_value(c.m[0], coeffs, values) * term_value(c.m[1], coeffs, values);
    let lhs = c_l * x_l + c_r * x_r + c_o * x_o + mul_term + k;
    if lhs.is_nonzero() {
        tracing::warn!(index, "unsatisfied sparse r1cs constraint");
        return Err(unsatisfied(artifact, index, values, solved));
    }

    Ok(())
}

fn unsatisfied<F: Field + PrimeField>(
    artifact: &Artifact<F, SparseR1c>,
    index: usize,
    values: &[F],
    solved: &[bool],
) -> Error {
    let opt_values: Vec<Option<F>> = values
        .iter()
        .zip(solved)
        .map(|(&v, &s)| s.then_some(v))
        .collect();
    let debug = artifact
        .debug_info
        .get(&index)
        .map(|e| e.render(&artifact.coeffs, &opt_values));
    Error::UnsatisfiedConstraint { index, debug }
}
