use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use itertools::Itertools;
use num::bigint::BigUint;
use num::{Integer, One};
use serde::{Deserialize, Serialize};

use crate::types::{Field, PrimeField as native_pf, Sample};

/// The scalar field of the BN254 curve, used as the sole field a compiled
/// circuit's terms and coefficients are expressed over.
///
/// Canonical values are kept as four 64-bit limbs but all arithmetic routes
/// through `BigUint` rather than a hand-rolled Montgomery reduction, trading
/// raw speed for an implementation simple enough to trust as a compiler's
/// scalar domain.
#[derive(Copy, Clone, Serialize, Deserialize)]
pub struct Fr(pub [u64; 4]);

fn biguint_from_array(arr: [u64; 4]) -> BigUint {
    BigUint::from_slice(&[
        arr[0] as u32,
        (arr[0] >> 32) as u32,
        arr[1] as u32,
        (arr[1] >> 32) as u32,
        arr[2] as u32,
        (arr[2] >> 32) as u32,
        arr[3] as u32,
        (arr[3] >> 32) as u32,
    ])
}

impl Fr {
    pub fn from_noncanonical_str(n: &str) -> Self {
        Self::from_noncanonical_biguint(BigUint::from_str(n).unwrap())
    }
}

impl Default for Fr {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Fr {
    fn eq(&self, other: &Self) -> bool {
        self.to_canonical_biguint() == other.to_canonical_biguint()
    }
}

impl Eq for Fr {}

impl Hash for Fr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_canonical_biguint().hash(state)
    }
}

impl Display for Fr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.to_canonical_biguint(), f)
    }
}

impl Debug for Fr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.to_canonical_biguint(), f)
    }
}

impl Sample for Fr {
    #[inline]
    fn sample<R>(rng: &mut R) -> Self
    where
        R: rand::RngCore + ?Sized,
    {
        use num::bigint::RandBigInt;
        Self::from_noncanonical_biguint(rng.gen_biguint_below(&Self::order()))
    }
}

impl Field for Fr {
    const ZERO: Self = Self([0; 4]);

    const ONE: Self = Self([1, 0, 0, 0]);

    const TWO: Self = Self([2, 0, 0, 0]);

    const NEG_ONE: Self = Self([
        4891460686036598784u64,
        2896914383306846353u64,
        13281191951274694749u64,
        3486998266802970665u64,
    ]);

    const BITS: usize = 254;

    fn order() -> BigUint {
        BigUint::from_str(
            "21888242871839275222246405745257275088548364400416034343698204186575808495617",
        )
        .unwrap()
    }

    fn characteristic() -> BigUint {
        Self::order()
    }

    fn try_inverse(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }

        // Fermat's little theorem: a^(p-2) = a^-1 mod p.
        Some(self.exp_biguint(&(Self::order() - BigUint::one() - BigUint::one())))
    }

    fn from_noncanonical_biguint(n: BigUint) -> Self {
        Self(
            n.mod_floor(&Self::order())
                .to_u64_digits()
                .into_iter()
                .pad_using(4, |_| 0)
                .collect::<Vec<_>>()[..]
                .try_into()
                .expect("error converting to u64 array"),
        )
    }

    fn from_canonical_u64(n: u64) -> Self {
        Self([n, 0, 0, 0])
    }

    fn from_noncanonical_u128(n: u128) -> Self {
        Self([n as u64, (n >> 64) as u64, 0, 0])
    }

    fn from_noncanonical_u64(n: u64) -> Self {
        Self::from_canonical_u64(n)
    }

    fn from_noncanonical_i64(n: i64) -> Self {
        if n >= 0 {
            Self::from_canonical_u64(n as u64)
        } else {
            -Self::from_canonical_u64((-n) as u64)
        }
    }
}

impl native_pf for Fr {
    fn to_canonical_biguint(&self) -> BigUint {
        let mut result = biguint_from_array(self.0);
        if result >= Self::order() {
            result -= Self::order();
        }
        result
    }
}

impl Neg for Fr {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        if self.is_zero() {
            Self::ZERO
        } else {
            Self::from_noncanonical_biguint(Self::order() - self.to_canonical_biguint())
        }
    }
}

impl Add for Fr {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let mut result = self.to_canonical_biguint() + rhs.to_canonical_biguint();
        if result >= Self::order() {
            result -= Self::order();
        }
        Self::from_noncanonical_biguint(result)
    }
}

impl AddAssign for Fr {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Fr {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Sub for Fr {
    type Output = Self;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

impl SubAssign for Fr {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for Fr {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_noncanonical_biguint(
            (self.to_canonical_biguint() * rhs.to_canonical_biguint()).mod_floor(&Self::order()),
        )
    }
}

impl MulAssign for Fr {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Product for Fr {
    #[inline]
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.reduce(|acc, x| acc * x).unwrap_or(Self::ONE)
    }
}

impl Div for Fr {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, rhs: Self) -> Self::Output {
        self * rhs.inverse()
    }
}

impl DivAssign for Fr {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::Fr;
    use crate::types::{Field, PrimeField, Sample};

    #[test]
    fn zero_and_one() {
        assert!(Fr::ZERO.is_zero());
        assert!(Fr::ONE.is_one());
        assert_eq!(Fr::ONE + Fr::ONE, Fr::TWO);
    }

    #[test]
    fn additive_inverse() {
        let a = Fr::from_canonical_u64(12345);
        assert_eq!(a + (-a), Fr::ZERO);
    }

    #[test]
    fn multiplicative_inverse() {
        let a = Fr::from_canonical_u64(7);
        let inv = a.inverse();
        assert_eq!(a * inv, Fr::ONE);
    }

    #[test]
    fn neg_one_is_order_minus_one() {
        assert_eq!(Fr::NEG_ONE + Fr::ONE, Fr::ZERO);
    }

    #[test]
    fn division_round_trips() {
        let a = Fr::rand();
        let b = Fr::from_canonical_u64(9876543210);
        let q = a / b;
        assert_eq!(q * b, a);
    }

    #[test]
    fn canonical_round_trip_through_bytes() {
        let a = Fr::from_canonical_u64(424242);
        let bytes = a.to_be_bytes();
        assert_eq!(Fr::from_be_bytes(&bytes), a);
    }
}
