use std::fmt;

use serde::{Deserialize, Serialize};

use crate::visibility::Visibility;

const COEFF_BITS: u32 = 30;
const WIRE_BITS: u32 = 29;
const VIS_BITS: u32 = 3;

const COEFF_MASK: u64 = (1 << COEFF_BITS) - 1;
const WIRE_MASK: u64 = (1 << WIRE_BITS) - 1;
const VIS_MASK: u64 = (1 << VIS_BITS) - 1;

const WIRE_SHIFT: u32 = COEFF_BITS;
const VIS_SHIFT: u32 = COEFF_BITS + WIRE_BITS;

/// The largest coefficient id or wire id a [`Term`] can address.
pub const MAX_COEFF_ID: u32 = COEFF_MASK as u32;
pub const MAX_WIRE_ID: u32 = WIRE_MASK as u32;

/// A single packed word carrying `(coeff_id, wire_id, visibility)`.
///
/// Packs a routed value's coefficient, wire, and visibility into a single
/// `u64` rather than a small struct, since a compiled circuit can hold tens
/// of millions of terms and the packed form halves the working set.
///
/// `Visibility` only ever occupies values `0..=4`; the all-ones bit pattern
/// (`Visibility` tag `0b111`) can therefore never be produced by [`Term::pack`]
/// and is reserved as [`TERM_DELIMITER`], a sentinel used by the log renderer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Term(u64);

/// Sentinel value distinguishable from every [`Term`] produced by [`Term::pack`].
pub const TERM_DELIMITER: Term = Term(u64::MAX);

impl Term {
    #[inline]
    pub fn pack(coeff_id: u32, wire_id: u32, visibility: Visibility) -> Self {
        assert!(coeff_id <= MAX_COEFF_ID, "coeff id overflows packed term");
        assert!(wire_id <= MAX_WIRE_ID, "wire id overflows packed term");
        let word = (coeff_id as u64 & COEFF_MASK)
            | ((wire_id as u64 & WIRE_MASK) << WIRE_SHIFT)
            | ((visibility.as_u8() as u64 & VIS_MASK) << VIS_SHIFT);
        Term(word)
    }

    #[inline]
    pub fn is_delimiter(self) -> bool {
        self == TERM_DELIMITER
    }

    #[inline]
    pub fn coeff_id(self) -> u32 {
        (self.0 & COEFF_MASK) as u32
    }

    #[inline]
    pub fn wire_id(self) -> u32 {
        ((self.0 >> WIRE_SHIFT) & WIRE_MASK) as u32
    }

    #[inline]
    pub fn visibility(self) -> Visibility {
        Visibility::from_u8(((self.0 >> VIS_SHIFT) & VIS_MASK) as u8)
    }

    #[inline]
    pub fn unpack(self) -> (u32, u32, Visibility) {
        (self.coeff_id(), self.wire_id(), self.visibility())
    }

    /// Rewrites only the wire-id field, leaving `coeff_id` and `visibility` untouched.
    #[inline]
    pub fn set_wire_id(&mut self, new_wire_id: u32) {
        assert!(new_wire_id <= MAX_WIRE_ID, "wire id overflows packed term");
        self.0 = (self.0 & !(WIRE_MASK << WIRE_SHIFT)) | ((new_wire_id as u64) << WIRE_SHIFT);
    }

    /// Returns a copy of this term with the wire id rewritten; see [`Term::set_wire_id`].
    #[inline]
    #[must_use]
    pub fn with_wire_id(mut self, new_wire_id: u32) -> Self {
        self.set_wire_id(new_wire_id);
        self
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_delimiter() {
            return write!(f, "Term(delimiter)");
        }
        let (c, w, v) = self.unpack();
        write!(f, "Term(coeff={c}, wire={w}, vis={v:?})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_round_trip() {
        for (c, w, v) in [
            (0u32, 0u32, Visibility::Public),
            (1, 0, Visibility::Public),
            (12345, 999_999, Visibility::Secret),
            (MAX_COEFF_ID, MAX_WIRE_ID, Visibility::Internal),
            (7, 42, Visibility::Virtual),
            (0, 0, Visibility::Unset),
        ] {
            let t = Term::pack(c, w, v);
            assert_eq!(t.unpack(), (c, w, v));
        }
    }

    #[test]
    fn set_wire_id_preserves_other_fields() {
        let t = Term::pack(17, 3, Visibility::Secret);
        let t2 = t.with_wire_id(9001);
        assert_eq!(t2.coeff_id(), 17);
        assert_eq!(t2.visibility(), Visibility::Secret);
        assert_eq!(t2.wire_id(), 9001);
    }

    #[test]
    fn delimiter_is_distinguishable() {
        assert!(TERM_DELIMITER.is_delimiter());
        for (c, w, v) in [
            (MAX_COEFF_ID, MAX_WIRE_ID, Visibility::Internal),
            (0, 0, Visibility::Public),
        ] {
            assert!(!Term::pack(c, w, v).is_delimiter());
        }
    }

    #[test]
    fn equality_is_bitwise() {
        let a = Term::pack(3, 4, Visibility::Public);
        let b = Term::pack(3, 4, Visibility::Public);
        assert_eq!(a, b);
    }
}
