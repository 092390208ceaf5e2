//! Wire-id renumbering from the builder's per-namespace local ids into the
//! canonical post-layout global id space `[public | secret | internal]`.
//!
//! This module only ever consumes a pre-layout representation (local ids,
//! produced fresh by [`crate::builder::CircuitBuilder`]) and only ever
//! produces a post-layout [`crate::artifact::Artifact`]; there is no entry
//! point that accepts an already-laid-out artifact, so the transformation
//! cannot be accidentally re-applied to its own output.

use crate::constraint::{R1csConstraint, SparseR1c};
use crate::hint::{HintArg, HintDescriptor};
use crate::linear::LinearExpression;
use crate::log::LogEntry;
use crate::term::{Term, TERM_DELIMITER};
use crate::visibility::Visibility;

/// `shift(old_id, visibility)`: public ids are untouched, secret ids are
/// offset past the public range, internal ids past both.
pub fn shift_wire_id(old_id: u32, visibility: Visibility, num_public: usize, num_secret: usize) -> u32 {
    match visibility {
        Visibility::Public => old_id,
        Visibility::Secret => old_id + num_public as u32,
        Visibility::Internal => old_id + (num_public + num_secret) as u32,
        Visibility::Virtual | Visibility::Unset => old_id,
    }
}

pub fn shift_term(t: Term, num_public: usize, num_secret: usize) -> Term {
    if t.is_delimiter() {
        return t;
    }
    let new_wire = shift_wire_id(t.wire_id(), t.visibility(), num_public, num_secret);
    t.with_wire_id(new_wire)
}

pub fn shift_linear(expr: &LinearExpression, num_public: usize, num_secret: usize) -> LinearExpression {
    LinearExpression(
        expr.0
            .iter()
            .map(|&t| shift_term(t, num_public, num_secret))
            .collect(),
    )
}

pub fn shift_log_entry(entry: &LogEntry, num_public: usize, num_secret: usize) -> LogEntry {
    LogEntry {
        format: entry.format.clone(),
        to_resolve: entry
            .to_resolve
            .iter()
            .map(|&t| {
                if t == TERM_DELIMITER {
                    t
                } else {
                    shift_term(t, num_public, num_secret)
                }
            })
            .collect(),
    }
}

pub fn shift_hint_arg(arg: &HintArg, num_public: usize, num_secret: usize) -> HintArg {
    match arg {
        HintArg::Term(t) => HintArg::Term(shift_term(*t, num_public, num_secret)),
        HintArg::Linear(expr) => HintArg::Linear(shift_linear(expr, num_public, num_secret)),
        HintArg::Constant(c) => HintArg::Constant(c.clone()),
    }
}

/// Shifts a hint descriptor's inputs and output wires. Output wires are
/// always internal, per the data model's hint contract.
pub fn shift_hint(hint: &HintDescriptor, num_public: usize, num_secret: usize) -> HintDescriptor {
    HintDescriptor {
        id: hint.id,
        inputs: hint
            .inputs
            .iter()
            .map(|a| shift_hint_arg(a, num_public, num_secret))
            .collect(),
        wires: hint
            .wires
            .iter()
            .map(|&w| shift_wire_id(w, Visibility::Internal, num_public, num_secret))
            .collect(),
    }
}

pub fn shift_r1cs_constraint(
    c: &R1csConstraint,
    num_public: usize,
    num_secret: usize,
) -> R1csConstraint {
    R1csConstraint {
        l: shift_linear(&c.l, num_public, num_secret),
        r: shift_linear(&c.r, num_public, num_secret),
        o: shift_linear(&c.o, num_public, num_secret),
    }
}

pub fn shift_sparse_constraint(
    c: &SparseR1c,
    num_public: usize,
    num_secret: usize,
) -> SparseR1c {
    SparseR1c {
        l: shift_term(c.l, num_public, num_secret),
        r: shift_term(c.r, num_public, num_secret),
        o: shift_term(c.o, num_public, num_secret),
        m: [
            shift_term(c.m[0], num_public, num_secret),
            shift_term(c.m[1], num_public, num_secret),
        ],
        k: c.k,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_ids_pass_through() {
        assert_eq!(shift_wire_id(5, Visibility::Public, 2, 3), 5);
    }

    #[test]
    fn secret_ids_offset_by_public_count() {
        assert_eq!(shift_wire_id(0, Visibility::Secret, 2, 3), 2);
        assert_eq!(shift_wire_id(2, Visibility::Secret, 2, 3), 4);
    }

    #[test]
    fn internal_ids_offset_by_public_and_secret_count() {
        // Matches scenario S5: Np=2, Ns=1, internal wire 0 lands at id 3.
        assert_eq!(shift_wire_id(0, Visibility::Internal, 2, 1), 3);
    }

    #[test]
    fn delimiter_terms_pass_through_untouched() {
        let entry = LogEntry::new("{}", vec![TERM_DELIMITER]);
        let shifted = shift_log_entry(&entry, 2, 1);
        assert_eq!(shifted.to_resolve[0], TERM_DELIMITER);
    }
}
