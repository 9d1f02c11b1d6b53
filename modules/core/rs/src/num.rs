use std::fmt::{Debug, Display};

/// T values are primitive integers
pub trait PrimInt: ::num::PrimInt + Debug + Default {}
impl<T: ::num::PrimInt + Debug + Default> PrimInt for T {}

/// T values are non-negative primitive integers
pub trait PrimUInt: PrimInt + ::num::Unsigned {}

impl<T: PrimInt + ::num::Unsigned> PrimUInt for T {}

/// Number of decimal digits needed to print a non-negative integer.
pub fn decimal_width<T: PrimUInt + Display>(value: T) -> usize {
    let ten: T = ::num::cast(10u8).unwrap_or_else(T::max_value);
    let mut width = 1;
    let mut rest = value;
    while rest >= ten {
        rest = rest / ten;
        width += 1;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_width() {
        for (value, expected) in [
            (0u64, 1),
            (9, 1),
            (10, 2),
            (99, 2),
            (68164, 5),
            (999_999_999, 9),
            (1_000_000_000, 10),
            (u64::MAX, 20),
        ] {
            assert_eq!(decimal_width(value), expected, "{value}");
        }
        assert_eq!(decimal_width(255u8), 3);
    }
}
