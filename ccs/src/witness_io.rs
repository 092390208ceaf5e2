//! Wire encoding for witness vectors: a 4-byte big-endian length prefix
//! followed by that many field elements, each in canonical big-endian form
//! Used for both the solver's input prefix and its full-witness output.

use ccs_field::PrimeField;

use crate::error::{Error, Result};

fn fr_size<F: PrimeField>() -> usize {
    (F::BITS + 7) / 8
}

/// Encodes `elements` as `[4-byte big-endian length][elements..., each canonical-BE]`.
pub fn encode<F: PrimeField>(elements: &[F]) -> Vec<u8> {
    let size = fr_size::<F>();
    let mut out = Vec::with_capacity(4 + elements.len() * size);
    out.extend_from_slice(&(elements.len() as u32).to_be_bytes());
    for e in elements {
        out.extend(e.to_be_bytes());
    }
    out
}

/// Decodes the wire format produced by [`encode`].
///
/// `expected_len`, if given, is checked against the decoded length prefix
/// before any field elements are parsed — a mismatch is the fatal input
/// error the external interface calls for.
pub fn decode<F: PrimeField>(bytes: &[u8], expected_len: Option<usize>) -> Result<Vec<F>> {
    if bytes.len() < 4 {
        return Err(Error::Input("witness buffer shorter than length prefix".to_string()));
    }
    let len = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as usize;
    if let Some(expected) = expected_len {
        if len != expected {
            return Err(Error::InvalidWitnessSize {
                expected,
                actual: len,
            });
        }
    }

    let size = fr_size::<F>();
    let body = &bytes[4..];
    if body.len() != len * size {
        return Err(Error::Input(format!(
            "witness buffer declares {len} elements but carries {} bytes, expected {}",
            body.len(),
            len * size
        )));
    }

    Ok(body.chunks_exact(size).map(F::from_be_bytes).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccs_field::{Field, Fr};

    #[test]
    fn round_trips_through_bytes() {
        let elements = vec![Fr::from_canonical_u64(1), Fr::from_canonical_u64(9), Fr::from_canonical_u64(3)];
        let bytes = encode(&elements);
        let decoded: Vec<Fr> = decode(&bytes, Some(3)).unwrap();
        assert_eq!(decoded, elements);
    }

    #[test]
    fn rejects_length_mismatch() {
        let elements = vec![Fr::from_canonical_u64(1), Fr::from_canonical_u64(9)];
        let bytes = encode(&elements);
        let err = decode::<Fr>(&bytes, Some(3)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidWitnessSize { expected: 3, actual: 2 }
        ));
    }
}
