// invocation/equality.rs
//
// Per-parameter ranking of an argument against a formal parameter.

use std::cmp::Ordering;

/// How well an argument type fits a parameter type, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EqualityType {
    Incompatible,
    /// Allowed, but through a conversion that changes representation or
    /// narrows (int to real, char to string, downcasts, narrowing integers).
    Convert,
    /// The argument descends from the parameter type.
    Subtype,
    /// Implicit numeric widening.
    Widening,
    /// Same type through a weak alias.
    Equal,
    Exact,
}

/// The rank of one (argument, parameter) pair. Within the same equality a
/// smaller distance is a closer fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamRank {
    pub equality: EqualityType,
    pub distance: u32,
}

impl ParamRank {
    pub const EXACT: ParamRank = ParamRank::new(EqualityType::Exact, 0);
    pub const EQUAL: ParamRank = ParamRank::new(EqualityType::Equal, 0);
    pub const INCOMPATIBLE: ParamRank = ParamRank::new(EqualityType::Incompatible, 0);

    pub const fn new(equality: EqualityType, distance: u32) -> Self {
        Self { equality, distance }
    }

    pub const fn convert(distance: u32) -> Self {
        Self::new(EqualityType::Convert, distance)
    }

    pub const fn widening(distance: u32) -> Self {
        Self::new(EqualityType::Widening, distance)
    }

    pub const fn subtype(distance: u32) -> Self {
        Self::new(EqualityType::Subtype, distance)
    }

    pub fn is_compatible(self) -> bool {
        self.equality != EqualityType::Incompatible
    }
}

impl PartialOrd for ParamRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Greater is better.
impl Ord for ParamRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.equality
            .cmp(&other.equality)
            .then_with(|| other.distance.cmp(&self.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_order_by_equality_then_distance() {
        assert!(ParamRank::EXACT > ParamRank::EQUAL);
        assert!(ParamRank::EQUAL > ParamRank::widening(0));
        assert!(ParamRank::widening(8) > ParamRank::widening(24));
        assert!(ParamRank::widening(99) > ParamRank::subtype(1));
        assert!(ParamRank::subtype(3) > ParamRank::convert(0));
        assert!(ParamRank::convert(50) > ParamRank::INCOMPATIBLE);
        assert!(!ParamRank::INCOMPATIBLE.is_compatible());
    }
}
