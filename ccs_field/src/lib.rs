//! Finite field arithmetic underlying every coefficient and term in a
//! compiled constraint system.

mod fr;
mod ops;
mod types;

pub use fr::Fr;
pub use ops::Square;
pub use types::{Field, PrimeField, Sample};
