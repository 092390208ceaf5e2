use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num::bigint::BigUint;
use num::{Integer, One};
use rand::rngs::OsRng;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ops::Square;

/// Uniform random sampling over a field.
pub trait Sample: Sized {
    fn sample<R>(rng: &mut R) -> Self
    where
        R: rand::RngCore + ?Sized;

    #[inline]
    fn rand() -> Self {
        Self::sample(&mut OsRng)
    }

    #[inline]
    fn rand_vec(n: usize) -> Vec<Self> {
        (0..n).map(|_| Self::rand()).collect()
    }
}

/// A finite field used as the scalar domain of a constraint system.
///
/// Trimmed of the FFT/extension-field machinery (two-adicity, cosets,
/// Frobenius) that a constraint-system compiler has no use for.
pub trait Field:
    'static
    + Copy
    + Eq
    + Hash
    + Neg<Output = Self>
    + Add<Self, Output = Self>
    + AddAssign<Self>
    + Sum
    + Sub<Self, Output = Self>
    + SubAssign<Self>
    + Mul<Self, Output = Self>
    + MulAssign<Self>
    + Square
    + Product
    + Div<Self, Output = Self>
    + DivAssign<Self>
    + Debug
    + Default
    + Display
    + Sample
    + Send
    + Sync
    + Serialize
    + DeserializeOwned
{
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;
    const NEG_ONE: Self;

    /// The bit length of the field order.
    const BITS: usize;

    fn order() -> BigUint;
    fn characteristic() -> BigUint;

    #[inline]
    fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    #[inline]
    fn is_nonzero(&self) -> bool {
        *self != Self::ZERO
    }

    #[inline]
    fn is_one(&self) -> bool {
        *self == Self::ONE
    }

    #[inline]
    fn double(&self) -> Self {
        *self + *self
    }

    #[inline]
    fn cube(&self) -> Self {
        self.square() * *self
    }

    fn triple(&self) -> Self {
        *self * (Self::ONE + Self::TWO)
    }

    /// Compute the multiplicative inverse of this field element.
    fn try_inverse(&self) -> Option<Self>;

    fn inverse(&self) -> Self {
        self.try_inverse().expect("Tried to invert zero")
    }

    /// Batch-inverts a slice of field elements using Montgomery's trick: a single
    /// inversion of the running product, then one multiplication per element to
    /// recover the individual inverses.
    fn batch_multiplicative_inverse(x: &[Self]) -> Vec<Self> {
        const WIDTH: usize = 4;

        let n = x.len();
        if n == 0 {
            return Vec::new();
        } else if n == 1 {
            return vec![x[0].inverse()];
        } else if n == 2 {
            let x01 = x[0] * x[1];
            let x01inv = x01.inverse();
            return vec![x01inv * x[1], x01inv * x[0]];
        } else if n == 3 {
            let x01 = x[0] * x[1];
            let x012 = x01 * x[2];
            let x012inv = x012.inverse();
            let x01inv = x012inv * x[2];
            return vec![x01inv * x[1], x01inv * x[0], x012inv * x01];
        }
        debug_assert!(n >= WIDTH);

        let mut buf: Vec<Self> = Vec::with_capacity(n);
        let mut cumul_prod: [Self; WIDTH] = x[..WIDTH].try_into().unwrap();
        buf.extend(cumul_prod);
        for (i, &xi) in x[WIDTH..].iter().enumerate() {
            cumul_prod[i % WIDTH] *= xi;
            buf.push(cumul_prod[i % WIDTH]);
        }
        debug_assert_eq!(buf.len(), n);

        let mut a_inv = {
            let c01 = cumul_prod[0] * cumul_prod[1];
            let c23 = cumul_prod[2] * cumul_prod[3];
            let c0123 = c01 * c23;
            let c0123inv = c0123.inverse();
            let c01inv = c0123inv * c23;
            let c23inv = c0123inv * c01;
            [
                c01inv * cumul_prod[1],
                c01inv * cumul_prod[0],
                c23inv * cumul_prod[3],
                c23inv * cumul_prod[2],
            ]
        };

        for i in (WIDTH..n).rev() {
            buf[i] = buf[i - WIDTH] * a_inv[i % WIDTH];
            a_inv[i % WIDTH] *= x[i];
        }
        for i in (0..WIDTH).rev() {
            buf[i] = a_inv[i];
        }

        for (&bi, &xi) in buf.iter().zip(x) {
            debug_assert_eq!(bi * xi, Self::ONE);
        }

        buf
    }

    /// Returns `n % Self::characteristic()`.
    fn from_noncanonical_biguint(n: BigUint) -> Self;

    /// Returns `n`. Assumes that `n` is already in canonical form, i.e. `n < Self::order()`.
    fn from_canonical_u64(n: u64) -> Self;

    fn from_canonical_u32(n: u32) -> Self {
        Self::from_canonical_u64(n as u64)
    }

    fn from_canonical_u16(n: u16) -> Self {
        Self::from_canonical_u64(n as u64)
    }

    fn from_canonical_u8(n: u8) -> Self {
        Self::from_canonical_u64(n as u64)
    }

    fn from_canonical_usize(n: usize) -> Self {
        Self::from_canonical_u64(n as u64)
    }

    fn from_bool(b: bool) -> Self {
        Self::from_canonical_u64(b as u64)
    }

    /// Returns `n % Self::characteristic()`.
    fn from_noncanonical_u128(n: u128) -> Self;

    fn from_noncanonical_u64(n: u64) -> Self;

    fn from_noncanonical_i64(n: i64) -> Self;

    fn exp_u64(&self, power: u64) -> Self {
        let mut current = *self;
        let mut product = Self::ONE;

        let mut p = power;
        while p != 0 {
            if p & 1 != 0 {
                product *= current;
            }
            current = current.square();
            p >>= 1;
        }
        product
    }

    /// Exponentiation by an arbitrary-precision exponent, processed 64 bits at a time.
    fn exp_biguint(&self, power: &BigUint) -> Self {
        let mut result = Self::ONE;
        for &digit in power.to_u64_digits().iter().rev() {
            for _ in 0..64 {
                result = result.square();
            }
            result *= self.exp_u64(digit);
        }
        result
    }

    /// Returns whether `x -> x^power` is a permutation of this field, i.e. `gcd(power, p - 1) = 1`.
    fn is_monomial_permutation_u64(power: u64) -> bool {
        match power {
            0 => false,
            1 => true,
            _ => (Self::order() - 1u32).gcd(&BigUint::from(power)).is_one(),
        }
    }
}

pub trait PrimeField: Field {
    fn to_canonical_biguint(&self) -> BigUint;

    /// Big-endian encoding of the canonical representative, zero-padded to the
    /// byte width of the field order. Used for the witness wire prefix/output
    /// encoding.
    fn to_be_bytes(&self) -> Vec<u8> {
        let byte_len = (Self::BITS + 7) / 8;
        let digits = self.to_canonical_biguint().to_bytes_be();
        let mut out = vec![0u8; byte_len - digits.len()];
        out.extend(digits);
        out
    }

    fn from_be_bytes(bytes: &[u8]) -> Self {
        Self::from_noncanonical_biguint(BigUint::from_bytes_be(bytes))
    }
}
