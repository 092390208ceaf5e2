use serde::{Deserialize, Serialize};

use crate::linear::LinearExpression;
use crate::term::Term;

/// `⟨L⟩·⟨R⟩ = ⟨O⟩` in the prime field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct R1csConstraint {
    pub l: LinearExpression,
    pub r: LinearExpression,
    pub o: LinearExpression,
}

impl R1csConstraint {
    pub fn new(l: LinearExpression, r: LinearExpression, o: LinearExpression) -> Self {
        R1csConstraint { l, r, o }
    }
}

/// `cL·xL + cR·xR + cO·xO + cM0·cM1·(xL·xR) + K = 0`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SparseR1c {
    pub l: Term,
    pub r: Term,
    pub o: Term,
    pub m: [Term; 2],
    pub k: u32,
}

impl SparseR1c {
    pub fn new(l: Term, r: Term, o: Term, m: [Term; 2], k: u32) -> Self {
        SparseR1c { l, r, o, m, k }
    }
}
