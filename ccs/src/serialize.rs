//! Deterministic CBOR encode/decode for compiled artifacts.
//!
//! Decoding pre-scans the document as a generic [`serde_cbor::Value`] tree to
//! enforce `MaxArrayElements = MaxMapPairs` before paying the cost of
//! building the typed artifact, so an oversized or adversarial document is
//! rejected without ever allocating the structures it describes.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_cbor::Value;

use crate::error::{Error, Result};

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_cbor::to_vec(value).map_err(|e| Error::Structural(format!("cbor encode error: {e}")))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8], max_elements: u32) -> Result<T> {
    let value: Value =
        serde_cbor::from_slice(bytes).map_err(|e| Error::Structural(format!("cbor decode error: {e}")))?;
    check_bounds(&value, max_elements)?;
    serde_cbor::value::from_value(value).map_err(|e| Error::Structural(format!("cbor decode error: {e}")))
}

fn check_bounds(value: &Value, max_elements: u32) -> Result<()> {
    match value {
        Value::Array(items) => {
            if items.len() as u64 > max_elements as u64 {
                return Err(Error::Structural(format!(
                    "cbor array exceeds MaxArrayElements ({max_elements})"
                )));
            }
            for item in items {
                check_bounds(item, max_elements)?;
            }
            Ok(())
        }
        Value::Map(pairs) => {
            if pairs.len() as u64 > max_elements as u64 {
                return Err(Error::Structural(format!(
                    "cbor map exceeds MaxMapPairs ({max_elements})"
                )));
            }
            for (k, v) in pairs {
                check_bounds(k, max_elements)?;
                check_bounds(v, max_elements)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccs_field::Fr;

    use crate::artifact::Artifact;
    use crate::coeff::CoeffTable;
    use crate::config::CurveId;
    use crate::constraint::R1csConstraint;
    use crate::linear::LinearExpression;

    fn sample_artifact() -> Artifact<Fr, R1csConstraint> {
        Artifact {
            num_public: 1,
            num_secret: 0,
            num_internal: 0,
            constraints: vec![R1csConstraint::new(
                LinearExpression::new(),
                LinearExpression::new(),
                LinearExpression::new(),
            )],
            hints: Default::default(),
            coeffs: CoeffTable::new(),
            logs: Vec::new(),
            debug_info: Default::default(),
            curve_id: CurveId::new("bn254"),
        }
    }

    #[test]
    fn round_trips_byte_for_byte() {
        let artifact = sample_artifact();
        let bytes = encode(&artifact).unwrap();
        let decoded: Artifact<Fr, R1csConstraint> = decode(&bytes, 1 << 27).unwrap();
        let bytes2 = encode(&decoded).unwrap();
        assert_eq!(bytes, bytes2);
    }

    #[test]
    fn rejects_document_exceeding_bound() {
        let artifact = sample_artifact();
        let bytes = encode(&artifact).unwrap();
        let err = decode::<Artifact<Fr, R1csConstraint>>(&bytes, 0).unwrap_err();
        assert!(matches!(err, Error::Structural(_)));
    }
}
