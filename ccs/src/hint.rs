use std::collections::HashMap;
use std::fmt;

use num::BigUint;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::CurveId;
use crate::error::{Error, Result};
use crate::linear::LinearExpression;
use crate::term::Term;

/// Identifies a registered hint function.
pub type HintId = Uuid;

/// One input to a hint invocation.
///
/// The R1CS lowering path historically accepted several input shapes (a bare
/// [`Term`], a [`LinearExpression`], or an opaque constant); this crate treats
/// both backends uniformly as this tagged union.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HintArg {
    Term(Term),
    Linear(LinearExpression),
    /// A constant not tied to any wire, reduced modulo the field's
    /// characteristic before being handed to the hint function.
    Constant(BigUint),
}

/// `{ id, inputs, wires }`: the `wires` list names the output wires in order;
/// all must be internal. Keyed, once compiled, by its first output wire.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HintDescriptor {
    pub id: HintId,
    pub inputs: Vec<HintArg>,
    pub wires: Vec<u32>,
}

impl HintDescriptor {
    /// The wire this hint is keyed by in a compiled artifact's hint map.
    pub fn primary_wire(&self) -> u32 {
        self.wires[0]
    }
}

/// A user-supplied nondeterministic witness generator.
///
/// A "given some already-known values, produce some new ones" closure
/// invoked at most once per output set. A hint must declare its output
/// count up front since the solver allocates wires for it
/// before any value is known.
pub trait HintFn: Send + Sync {
    /// Stable identity used to look the function up from a [`HintDescriptor`].
    fn uuid(&self) -> HintId;

    /// How many outputs this hint produces given `n_inputs` inputs, for the
    /// named curve.
    fn nb_outputs(&self, curve: &CurveId, n_inputs: usize) -> usize;

    /// Computes `outputs` from `inputs`, both already reduced modulo the
    /// field's characteristic.
    fn call(&self, curve: &CurveId, inputs: &[BigUint], outputs: &mut [BigUint]) -> Result<()>;
}

/// Maps hint id to its registered function. Read-only during solving and
/// shareable across solver instances.
#[derive(Default)]
pub struct HintRegistry {
    functions: HashMap<HintId, Box<dyn HintFn>>,
}

impl HintRegistry {
    pub fn new() -> Self {
        HintRegistry {
            functions: HashMap::new(),
        }
    }

    /// Registers `f`. Fails if a function with the same uuid is already
    /// registered (see scenario S6).
    pub fn register(&mut self, f: Box<dyn HintFn>) -> Result<()> {
        let uuid = f.uuid();
        if self.functions.contains_key(&uuid) {
            return Err(Error::DuplicateHint(uuid));
        }
        self.functions.insert(uuid, f);
        Ok(())
    }

    pub fn get(&self, id: HintId) -> Option<&dyn HintFn> {
        self.functions.get(&id).map(|b| b.as_ref())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for HintRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HintRegistry")
            .field("registered", &self.functions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstOutputHint(HintId, usize);

    impl HintFn for ConstOutputHint {
        fn uuid(&self) -> HintId {
            self.0
        }

        fn nb_outputs(&self, _curve: &CurveId, _n_inputs: usize) -> usize {
            self.1
        }

        fn call(&self, _curve: &CurveId, _inputs: &[BigUint], outputs: &mut [BigUint]) -> Result<()> {
            for o in outputs {
                *o = BigUint::from(1u32);
            }
            Ok(())
        }
    }

    #[test]
    fn duplicate_registration_fails() {
        let uuid = Uuid::new_v4();
        let mut registry = HintRegistry::new();
        registry
            .register(Box::new(ConstOutputHint(uuid, 1)))
            .unwrap();
        let err = registry
            .register(Box::new(ConstOutputHint(uuid, 1)))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateHint(u) if u == uuid));
    }
}
