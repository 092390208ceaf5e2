use std::collections::HashMap;

use ccs_field::Field;
use serde::{Deserialize, Serialize};

use crate::coeff::CoeffTable;
use crate::config::CurveId;
use crate::hint::HintDescriptor;
use crate::log::LogEntry;

/// A compiled, immutable constraint system over `F`, parameterized over its
/// constraint representation `C` (either [`crate::constraint::R1csConstraint`]
/// or [`crate::constraint::SparseR1c`]).
///
/// Wire ids are partitioned `[0, Np) | [Np, Np+Ns) | [Np+Ns, Np+Ns+Ni)`; index
/// 0 of the public range is always the reserved ONE wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "F: Field, C: Serialize + for<'a> Deserialize<'a>")]
pub struct Artifact<F: Field, C> {
    pub num_public: usize,
    pub num_secret: usize,
    pub num_internal: usize,
    pub constraints: Vec<C>,
    pub hints: HashMap<u32, HintDescriptor>,
    pub coeffs: CoeffTable<F>,
    pub logs: Vec<LogEntry>,
    pub debug_info: HashMap<usize, LogEntry>,
    pub curve_id: CurveId,
}

impl<F: Field, C> Artifact<F, C> {
    /// Total wire count `Np + Ns + Ni`: the length of a full witness vector.
    pub fn total_wires(&self) -> usize {
        self.num_public + self.num_secret + self.num_internal
    }

    /// Length of the caller-supplied witness prefix, `Np + Ns`.
    pub fn prefix_len(&self) -> usize {
        self.num_public + self.num_secret
    }
}
