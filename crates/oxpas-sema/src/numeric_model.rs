// numeric_model.rs
//
// Integer ranges, literal typing and the ordinal promotion distances used to
// rank numeric arguments during overload resolution.

use crate::type_arena::{IntegerKind, IntegerType, RealType, TypeId};

/// Inclusive value range of an integer type.
pub fn integer_range(int: IntegerType) -> (i128, i128) {
    let bits = int.size as u32 * 8;
    match int.kind {
        IntegerKind::UInt15 => (0, i16::MAX as i128),
        IntegerKind::UInt31 => (0, i32::MAX as i128),
        kind if kind.is_signed() => (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1),
        _ => (0, (1i128 << bits) - 1),
    }
}

/// Number of value (non-sign) bits: Byte has 8, ShortInt 7, UInt15 15.
pub fn value_bits(int: IntegerType) -> u32 {
    let (_, max) = integer_range(int);
    128 - max.leading_zeros()
}

/// The type an integer literal takes from its value: the first type in the
/// ladder ShortInt, Byte, SmallInt, UInt15, Word, Integer, UInt31, Cardinal,
/// Int64, UInt64 whose range holds it.
pub fn literal_type(value: i128) -> TypeId {
    match value {
        -128..=127 => TypeId::SHORTINT,
        128..=255 => TypeId::BYTE,
        -32768..=-129 => TypeId::SMALLINT,
        256..=32767 => TypeId::UINT15,
        32768..=65535 => TypeId::WORD,
        v if v < 0 && v >= i32::MIN as i128 => TypeId::INTEGER,
        v if v >= 0 && v <= i32::MAX as i128 => TypeId::UINT31,
        v if v >= 0 && v <= u32::MAX as i128 => TypeId::CARDINAL,
        v if v >= i64::MIN as i128 && v <= i64::MAX as i128 => TypeId::INT64,
        _ => TypeId::UINT64,
    }
}

/// How an integer value converts from one integer type to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerConversion {
    /// Same type.
    Identity,
    /// Every value of the source fits the target. Smaller distance is a
    /// closer fit.
    Widen { distance: u32 },
    /// Some source values do not fit the target.
    Narrow { distance: u32 },
}

/// Classify an integer conversion by range containment.
///
/// The distance is the difference in value bits, plus one when crossing from
/// unsigned to signed, and at least one for distinct types.
pub fn integer_conversion(from: IntegerType, to: IntegerType) -> IntegerConversion {
    if from == to {
        return IntegerConversion::Identity;
    }
    let (from_min, from_max) = integer_range(from);
    let (to_min, to_max) = integer_range(to);
    let from_bits = value_bits(from);
    let to_bits = value_bits(to);
    let sign_change = u32::from(from.kind.is_signed() != to.kind.is_signed());
    let distance = (from_bits.abs_diff(to_bits) + sign_change).max(1);

    if to_min <= from_min && from_max <= to_max {
        IntegerConversion::Widen { distance }
    } else {
        IntegerConversion::Narrow { distance }
    }
}

/// Distance between two real types by size; None when `to` is narrower.
pub fn real_widening(from: RealType, to: RealType) -> Option<u32> {
    if to.size >= from.size {
        Some((to.size - from.size) as u32 + u32::from(from.kind != to.kind))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(kind: IntegerKind, size: u8) -> IntegerType {
        IntegerType { kind, size }
    }

    #[test]
    fn ranges() {
        assert_eq!(integer_range(int(IntegerKind::ShortInt, 1)), (-128, 127));
        assert_eq!(integer_range(int(IntegerKind::Byte, 1)), (0, 255));
        assert_eq!(integer_range(int(IntegerKind::UInt15, 2)), (0, 32767));
        assert_eq!(
            integer_range(int(IntegerKind::Cardinal, 4)),
            (0, u32::MAX as i128)
        );
        assert_eq!(
            integer_range(int(IntegerKind::Int64, 8)),
            (i64::MIN as i128, i64::MAX as i128)
        );
    }

    #[test]
    fn value_bit_counts() {
        assert_eq!(value_bits(int(IntegerKind::ShortInt, 1)), 7);
        assert_eq!(value_bits(int(IntegerKind::Byte, 1)), 8);
        assert_eq!(value_bits(int(IntegerKind::UInt31, 4)), 31);
        assert_eq!(value_bits(int(IntegerKind::UInt64, 8)), 64);
    }

    #[test]
    fn literal_types_follow_the_ladder() {
        assert_eq!(literal_type(0), TypeId::SHORTINT);
        assert_eq!(literal_type(-128), TypeId::SHORTINT);
        assert_eq!(literal_type(200), TypeId::BYTE);
        assert_eq!(literal_type(-200), TypeId::SMALLINT);
        assert_eq!(literal_type(1000), TypeId::UINT15);
        assert_eq!(literal_type(40000), TypeId::WORD);
        assert_eq!(literal_type(-40000), TypeId::INTEGER);
        assert_eq!(literal_type(100_000), TypeId::UINT31);
        assert_eq!(literal_type(3_000_000_000), TypeId::CARDINAL);
        assert_eq!(literal_type(-3_000_000_000), TypeId::INT64);
        assert_eq!(literal_type(u64::MAX as i128), TypeId::UINT64);
    }

    #[test]
    fn widening_is_by_range_containment() {
        let byte = int(IntegerKind::Byte, 1);
        let shortint = int(IntegerKind::ShortInt, 1);
        let word = int(IntegerKind::Word, 2);
        let smallint = int(IntegerKind::SmallInt, 2);
        let integer = int(IntegerKind::Integer, 4);

        assert_eq!(integer_conversion(byte, byte), IntegerConversion::Identity);
        assert_eq!(
            integer_conversion(byte, word),
            IntegerConversion::Widen { distance: 8 }
        );
        assert_eq!(
            integer_conversion(byte, smallint),
            IntegerConversion::Widen { distance: 8 }
        );
        assert!(matches!(
            integer_conversion(shortint, byte),
            IntegerConversion::Narrow { .. }
        ));
        assert!(matches!(
            integer_conversion(integer, smallint),
            IntegerConversion::Narrow { .. }
        ));
    }

    #[test]
    fn closer_widening_has_smaller_distance() {
        let byte = int(IntegerKind::Byte, 1);
        let word = int(IntegerKind::Word, 2);
        let integer = int(IntegerKind::Integer, 4);
        let IntegerConversion::Widen { distance: near } = integer_conversion(byte, word) else {
            panic!("expected widening");
        };
        let IntegerConversion::Widen { distance: far } = integer_conversion(byte, integer) else {
            panic!("expected widening");
        };
        assert!(near < far);
    }
}
