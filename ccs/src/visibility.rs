/// The namespace a wire belongs to.
///
/// `Virtual` marks a constant-only term carrying no wire at all; `Unset` is a
/// placeholder used only while the builder is still assigning ids and must
/// never survive into a compiled artifact.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Visibility {
    Public = 0,
    Secret = 1,
    Internal = 2,
    Virtual = 3,
    Unset = 4,
}

impl Visibility {
    pub(crate) const fn from_u8(tag: u8) -> Self {
        match tag {
            0 => Visibility::Public,
            1 => Visibility::Secret,
            2 => Visibility::Internal,
            3 => Visibility::Virtual,
            4 => Visibility::Unset,
            _ => panic!("invalid visibility tag"),
        }
    }

    pub(crate) const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_u8() {
        for v in [
            Visibility::Public,
            Visibility::Secret,
            Visibility::Internal,
            Visibility::Virtual,
            Visibility::Unset,
        ] {
            assert_eq!(Visibility::from_u8(v.as_u8()), v);
        }
    }
}
