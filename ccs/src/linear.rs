use ccs_field::Field;
use serde::{Deserialize, Serialize};

use crate::coeff::CoeffTable;
use crate::term::Term;
use crate::visibility::Visibility;

/// An ordered sequence of [`Term`]s representing `Σ cᵢ·wᵢ`.
///
/// Empty linear expressions evaluate to zero. Order is preserved end to end
/// since the log renderer and the lowering pass both walk terms positionally.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinearExpression(pub Vec<Term>);

impl LinearExpression {
    pub fn new() -> Self {
        LinearExpression(Vec::new())
    }

    pub fn from_term(term: Term) -> Self {
        LinearExpression(vec![term])
    }

    pub fn push(&mut self, term: Term) {
        self.0.push(term);
    }

    pub fn terms(&self) -> &[Term] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Sum of the negation of `other`'s terms; used by `sub(a, b) = a + (-b)`.
    pub fn negated<F: Field>(&self, coeffs: &mut CoeffTable<F>) -> Self {
        let terms = self
            .0
            .iter()
            .map(|&t| {
                let negated_coeff = -coeffs.get(t.coeff_id());
                let id = coeffs.insert(negated_coeff);
                t.with_coeff_id(id)
            })
            .collect();
        LinearExpression(terms)
    }

    /// Evaluates `Σ cᵢ·values[wᵢ]` assuming every referenced wire is solved.
    /// Virtual terms contribute their coefficient directly (no wire lookup).
    pub fn evaluate<F: Field>(&self, coeffs: &CoeffTable<F>, values: &[F]) -> F {
        let mut acc = F::ZERO;
        for &t in &self.0 {
            let c = coeffs.get(t.coeff_id());
            if c.is_zero() {
                continue;
            }
            let x = if t.visibility() == Visibility::Virtual {
                F::ONE
            } else {
                values[t.wire_id() as usize]
            };
            acc += c * x;
        }
        acc
    }

    /// The portion of this expression's evaluation that excludes the term at
    /// `skip_idx`: used to isolate `L₁` in `⟨L⟩ = L₀·x + L₁`.
    pub fn evaluate_excluding<F: Field>(
        &self,
        coeffs: &CoeffTable<F>,
        values: &[F],
        skip_idx: usize,
    ) -> F {
        let mut acc = F::ZERO;
        for (idx, &t) in self.0.iter().enumerate() {
            if idx == skip_idx {
                continue;
            }
            let c = coeffs.get(t.coeff_id());
            if c.is_zero() {
                continue;
            }
            let x = if t.visibility() == Visibility::Virtual {
                F::ONE
            } else {
                values[t.wire_id() as usize]
            };
            acc += c * x;
        }
        acc
    }
}

impl Term {
    /// Returns a copy of this term with the coefficient id rewritten.
    pub(crate) fn with_coeff_id(mut self, new_coeff_id: u32) -> Self {
        let (_, wire_id, visibility) = self.unpack();
        self = Term::pack(new_coeff_id, wire_id, visibility);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccs_field::Fr;

    #[test]
    fn empty_evaluates_to_zero() {
        let coeffs: CoeffTable<Fr> = CoeffTable::new();
        let expr = LinearExpression::new();
        assert_eq!(expr.evaluate(&coeffs, &[]), Fr::ZERO);
    }

    #[test]
    fn evaluate_sums_weighted_terms() {
        let mut coeffs: CoeffTable<Fr> = CoeffTable::new();
        let c5 = coeffs.insert(Fr::from_canonical_u64(5));
        let t0 = Term::pack(c5, 0, Visibility::Public);
        let t1 = Term::pack(crate::coeff::COEFF_ONE, 1, Visibility::Public);
        let expr = LinearExpression(vec![t0, t1]);
        let values = [Fr::from_canonical_u64(2), Fr::from_canonical_u64(3)];
        // 5*2 + 1*3 = 13
        assert_eq!(expr.evaluate(&coeffs, &values), Fr::from_canonical_u64(13));
    }
}
