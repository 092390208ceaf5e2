use ccs_field::{Field, PrimeField};

use crate::artifact::Artifact;
use crate::constraint::R1csConstraint;
use crate::error::{Error, Result};
use crate::hint::HintRegistry;
use crate::visibility::Visibility;

use super::hint_dispatch;

#[derive(Copy, Clone)]
enum Side {
    L,
    R,
    O,
}

/// Solves an R1CS artifact against a witness prefix, producing the full
/// witness vector.
#[tracing::instrument(level = "info", skip_all, fields(np = artifact.num_public, ns = artifact.num_secret, ni = artifact.num_internal))]
pub fn solve<F: Field + PrimeField>(
    artifact: &Artifact<F, R1csConstraint>,
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

    for (i, constraint) in artifact.constraints.iter().enumerate() {
        solve_one(
            i,
            constraint,
            artifact,
            registry,
            &mut values,
            &mut solved,
        )?;
    }

    let nb_solved = solved.iter().filter(|&&s| s).count();
    if nb_solved != total {
        return Err(Error::Structural(format!(
            "solver completed with {nb_solved}/{total} wires solved"
        )));
    }

    Ok(values)
}

fn solve_one<F: Field + PrimeField>(
    index: usize,
    c: &R1csConstraint,
    artifact: &Artifact<F, R1csConstraint>,
    registry: &HintRegistry,
    values: &mut [F],
    solved: &mut [bool],
) -> Result<()> {
    for side in [&c.l, &c.r, &c.o] {
        for &t in side.terms() {
            if t.visibility() == Visibility::Virtual || solved[t.wire_id() as usize] {
                continue;
            }
            hint_dispatch::dispatch_if_needed(
                t.wire_id(),
                &artifact.hints,
                registry,
                &artifact.coeffs,
                &artifact.curve_id,
                values,
                solved,
            )?;
        }
    }

    let mut unknown: Option<(Side, usize)> = None;
    let mut ambiguous = false;
    for (side, expr) in [(Side::L, &c.l), (Side::R, &c.r), (Side::O, &c.o)] {
        for (idx, &t) in expr.terms().iter().enumerate() {
            if t.visibility() == Visibility::Virtual {
                continue;
            }
            if !solved[t.wire_id() as usize] {
                if unknown.is_some() {
                    ambiguous = true;
                }
                unknown = Some((side, idx));
            }
        }
    }
    if ambiguous {
        return Err(Error::Solver {
            index,
            reason: "constraint has more than one unsolved wire".to_string(),
        });
    }

    match unknown {
        None => {
            let l = c.l.evaluate(&artifact.coeffs, values);
            let r = c.r.evaluate(&artifact.coeffs, values);
            let o = c.o.evaluate(&artifact.coeffs, values);
            if l * r != o {
                tracing::warn!(index, "unsatisfied r1cs constraint");
                return Err(Error::UnsatisfiedConstraint {
                    index,
                    debug: render_debug(artifact, index, values, solved),
                });
            }
            Ok(())
        }
        Some((side, idx)) => {
            let (x, wire) = solve_for_unknown(side, idx, c, artifact, values)?;
            match x {
                Some(x) => {
                    values[wire as usize] = x;
                    solved[wire as usize] = true;
                    Ok(())
                }
                None => {
                    let o = c.o.evaluate(&artifact.coeffs, values);
                    if o.is_nonzero() {
                        Err(Error::UnsatisfiedConstraint {
                            index,
                            debug: render_debug(artifact, index, values, solved),
                        })
                    } else {
                        Err(Error::Solver {
                            index,
                            reason: "degenerate constraint: unknown wire is not uniquely defined"
                                .to_string(),
                        })
                    }
                }
            }
        }
    }
}

/// Returns `(Some(x), wire)` on a successful closed-form solve, or
/// `(None, wire)` when the constraint is degenerate (the governing side
/// evaluates to zero, so the unknown's coefficient cancels out).
fn solve_for_unknown<F: Field + PrimeField>(
    side: Side,
    idx: usize,
    c: &R1csConstraint,
    artifact: &Artifact<F, R1csConstraint>,
    values: &[F],
) -> Result<(Option<F>, u32)> {
    let coeffs = &artifact.coeffs;
    match side {
        Side::L => {
            let term = c.l.terms()[idx];
            let l0 = coeffs.get(term.coeff_id());
            if l0.is_zero() {
                return Err(Error::Solver {
                    index: usize::MAX,
                    reason: "unknown L term has zero coefficient".to_string(),
                });
            }
            let l1 = c.l.evaluate_excluding(coeffs, values, idx);
            let r = c.r.evaluate(coeffs, values);
            let o = c.o.evaluate(coeffs, values);
            if r.is_zero() {
                return Ok((None, term.wire_id()));
            }
            let x = (o / r - l1) / l0;
            Ok((Some(x), term.wire_id()))
        }
        Side::R => {
            let term = c.r.terms()[idx];
            let r0 = coeffs.get(term.coeff_id());
            if r0.is_zero() {
                return Err(Error::Solver {
                    index: usize::MAX,
                    reason: "unknown R term has zero coefficient".to_string(),
                });
            }
            let r1 = c.r.evaluate_excluding(coeffs, values, idx);
            let l = c.l.evaluate(coeffs, values);
            let o = c.o.evaluate(coeffs, values);
            if l.is_zero() {
                return Ok((None, term.wire_id()));
            }
            let x = (o / l - r1) / r0;
            Ok((Some(x), term.wire_id()))
        }
        Side::O => {
            let term = c.o.terms()[idx];
            let o0 = coeffs.get(term.coeff_id());
            let o1 = c.o.evaluate_excluding(coeffs, values, idx);
            let l = c.l.evaluate(coeffs, values);
            let r = c.r.evaluate(coeffs, values);
            if o0.is_zero() {
                return Err(Error::Solver {
                    index: usize::MAX,
                    reason: "unknown output term has zero coefficient".to_string(),
                });
            }
            let x = (l * r - o1) / o0;
            Ok((Some(x), term.wire_id()))
        }
    }
}

fn render_debug<F: Field + PrimeField>(
    artifact: &Artifact<F, R1csConstraint>,
    index: usize,
    values: &[F],
    solved: &[bool],
) -> Option<String> {
    let entry = artifact.debug_info.get(&index)?;
    let opt_values: Vec<Option<F>> = values
        .iter()
        .zip(solved)
        .map(|(&v, &s)| s.then_some(v))
        .collect();
    Some(entry.render(&artifact.coeffs, &opt_values))
}
