use std::collections::HashMap;

use ccs_field::Field;
use serde::{Deserialize, Serialize};

use crate::term::MAX_COEFF_ID;

/// Reserved coefficient-table slots. Arithmetic on these four values must be
/// short-circuited rather than routed through the generic field ops.
pub const COEFF_ZERO: u32 = 0;
pub const COEFF_ONE: u32 = 1;
pub const COEFF_MINUS_ONE: u32 = 2;
pub const COEFF_TWO: u32 = 3;

/// Deduplicated table of field elements referenced by a circuit's constraints.
///
/// The four reserved indices `{0, 1, -1, 2}` always occupy the first four
/// slots so that the solver can special-case them without a table lookup.
#[derive(Clone, Debug, Serialize)]
#[serde(bound(serialize = "F: Field"))]
pub struct CoeffTable<F: Field> {
    values: Vec<F>,
    #[serde(skip)]
    index: HashMap<F, u32>,
}

/// Deserializes only `values`, then rebuilds the dedup index — the wire
/// format never carries it, so every deserialization must reconstruct it
/// rather than leave callers to remember to.
impl<'de, F: Field> Deserialize<'de> for CoeffTable<F> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(bound(deserialize = "F: Field"))]
        struct Shadow<F: Field> {
            values: Vec<F>,
        }
        let shadow = Shadow::<F>::deserialize(deserializer)?;
        let mut table = CoeffTable {
            values: shadow.values,
            index: HashMap::new(),
        };
        table.rebuild_index();
        Ok(table)
    }
}

impl<F: Field> CoeffTable<F> {
    pub fn new() -> Self {
        let values = vec![F::ZERO, F::ONE, F::NEG_ONE, F::TWO];
        let mut index = HashMap::new();
        for (i, v) in values.iter().enumerate() {
            index.entry(*v).or_insert(i as u32);
        }
        CoeffTable { values, index }
    }

    /// Rebuilds the dedup index after deserialization, where it is skipped.
    fn rebuild_index(&mut self) {
        if self.index.len() == self.values.len() {
            return;
        }
        self.index.clear();
        for (i, v) in self.values.iter().enumerate() {
            self.index.entry(*v).or_insert(i as u32);
        }
    }

    /// Interns `value`, returning its coefficient id. Reserved values are
    /// recognized without growing the table.
    pub fn insert(&mut self, value: F) -> u32 {
        if let Some(&id) = self.index.get(&value) {
            return id;
        }
        let id = self.values.len() as u32;
        assert!(id <= MAX_COEFF_ID, "coefficient table overflowed");
        self.values.push(value);
        self.index.insert(value, id);
        id
    }

    pub fn get(&self, id: u32) -> F {
        self.values[id as usize]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// `-coeffs[i]^-1` for every `i`, computed with a single batched
    /// inversion over the table. Zero entries are left at zero.
    pub fn neg_inverses(&self) -> Vec<F> {
        let nonzero_positions: Vec<usize> = (0..self.values.len())
            .filter(|&i| self.values[i].is_nonzero())
            .collect();
        let nonzero_values: Vec<F> = nonzero_positions.iter().map(|&i| self.values[i]).collect();
        let inverses = F::batch_multiplicative_inverse(&nonzero_values);

        let mut out = vec![F::ZERO; self.values.len()];
        for (&pos, inv) in nonzero_positions.iter().zip(inverses) {
            out[pos] = -inv;
        }
        out
    }
}

impl<F: Field> Default for CoeffTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccs_field::Fr;

    #[test]
    fn reserved_slots_are_fixed() {
        let t: CoeffTable<Fr> = CoeffTable::new();
        assert_eq!(t.get(COEFF_ZERO), Fr::ZERO);
        assert_eq!(t.get(COEFF_ONE), Fr::ONE);
        assert_eq!(t.get(COEFF_MINUS_ONE), Fr::NEG_ONE);
        assert_eq!(t.get(COEFF_TWO), Fr::TWO);
    }

    #[test]
    fn insert_dedups() {
        let mut t: CoeffTable<Fr> = CoeffTable::new();
        let a = t.insert(Fr::from_canonical_u64(777));
        let b = t.insert(Fr::from_canonical_u64(777));
        assert_eq!(a, b);
        assert_eq!(t.insert(Fr::ONE), COEFF_ONE);
    }

    #[test]
    fn neg_inverse_matches_invariant() {
        let mut t: CoeffTable<Fr> = CoeffTable::new();
        let id = t.insert(Fr::from_canonical_u64(5));
        let neg_inv = t.neg_inverses();
        for (i, &c) in t.values().iter().enumerate() {
            if c.is_nonzero() {
                assert_eq!(neg_inv[i] * c + Fr::ONE, Fr::ZERO);
            } else {
                assert_eq!(neg_inv[i], Fr::ZERO);
            }
        }
        assert!(t.get(id).is_nonzero());
    }
}
