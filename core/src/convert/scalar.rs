//! Built-in scalar targets.

use std::ffi::OsString;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::num::{
    NonZeroI32, NonZeroI64, NonZeroU8, NonZeroU16, NonZeroU32, NonZeroU64, NonZeroUsize,
};
use std::path::PathBuf;

use rust_decimal::Decimal;

use super::{
    ConversionError, FormatConvention, FromValue, FromValues, ParseFailure, ParseFormatted,
    Strategy, ValueShape, parse_with_format, required, single,
};

impl FromValue for String {
    const STRATEGY: Strategy = Strategy::Passthrough;

    fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
        required::<Self>(value).map(str::to_string)
    }
}

impl FromValue for bool {
    const STRATEGY: Strategy = Strategy::Boolean;

    fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
        // A bare switch, or one given a blank value, is on.
        let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
            return Ok(true);
        };
        value
            .trim()
            .to_ascii_lowercase()
            .parse::<bool>()
            .map_err(|err| ConversionError::invalid::<Self>(value, err))
    }
}

impl FromValue for char {
    const STRATEGY: Strategy = Strategy::Character;

    fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
        let value = required::<Self>(value)?;
        value
            .parse::<char>()
            .map_err(|err| ConversionError::invalid::<Self>(value, err))
    }
}

macro_rules! impl_numeric {
    ($strategy:expr => $($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                const STRATEGY: Strategy = $strategy;

                fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
                    let value = required::<Self>(value)?;
                    value
                        .trim()
                        .parse::<$ty>()
                        .map_err(|err| ConversionError::invalid::<Self>(value, err))
                }
            }
        )+
    };
}

impl_numeric!(Strategy::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

// Fractional types read the separator from the convention.
macro_rules! impl_fractional {
    ($($ty:ty),+) => {
        $(
            impl ParseFormatted for $ty {
                type Err = ParseFailure;

                fn parse_formatted(value: &str, format: &FormatConvention) -> Result<Self, Self::Err> {
                    let normalized = format.normalize_fraction(value)?;
                    Ok(normalized.parse::<$ty>()?)
                }
            }

            impl FromValue for $ty {
                const STRATEGY: Strategy = Strategy::Float;

                fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
                    parse_with_format::<Self>(value)
                }
            }
        )+
    };
}

impl_fractional!(f32, f64, Decimal);

impl<T: FromValue> FromValue for Option<T> {
    const STRATEGY: Strategy = Strategy::Nullable;

    fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
        match value {
            Some(value) if !value.trim().is_empty() => T::from_value(Some(value)).map(Some),
            _ => Ok(None),
        }
    }
}

impl<T: FromValue> FromValues for Option<T> {
    const SHAPE: ValueShape = ValueShape::Scalar;
    const STRATEGY: Strategy = Strategy::Nullable;

    fn from_values(values: &[String]) -> Result<Self, ConversionError> {
        single(values)
    }
}

macro_rules! impl_scalar_values {
    ($($ty:ty),+ $(,)?) => {
        $(crate::from_value!(@scalar $ty);)+
    };
}

impl_scalar_values!(
    String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    Decimal,
);

crate::from_value!(string_constructor PathBuf, OsString);

crate::from_value!(parse
    IpAddr,
    Ipv4Addr,
    Ipv6Addr,
    SocketAddr,
    NonZeroU8,
    NonZeroU16,
    NonZeroU32,
    NonZeroU64,
    NonZeroUsize,
    NonZeroI32,
    NonZeroI64,
);

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use super::*;
    use crate::convert::{convert, values};

    fn assert_round_trip<T>(raw: &str)
    where
        T: FromValues + ToString + PartialEq + Debug,
    {
        let converted: T = convert(&values(&[raw])).unwrap();
        let rendered = converted.to_string();
        let reparsed: T = convert(&values(&[rendered.as_str()])).unwrap();
        assert_eq!(converted, reparsed, "round trip of {raw:?}");
    }

    #[test]
    fn test_string_passes_through_verbatim() {
        assert_eq!(convert::<String>(&values(&[" spaced "])).unwrap(), " spaced ");
        assert_eq!(convert::<String>(&values(&[""])).unwrap(), "");
    }

    #[test]
    fn test_bool_switch_and_literals() {
        assert!(convert::<bool>(&[]).unwrap());
        assert!(convert::<bool>(&values(&[" "])).unwrap());
        assert!(convert::<bool>(&values(&["true"])).unwrap());
        assert!(convert::<bool>(&values(&["True"])).unwrap());
        assert!(!convert::<bool>(&values(&["false"])).unwrap());
        assert!(!convert::<bool>(&values(&["FALSE"])).unwrap());
        assert!(matches!(
            convert::<bool>(&values(&["yes"])),
            Err(ConversionError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_char_requires_exactly_one_character() {
        assert_eq!(convert::<char>(&values(&["a"])).unwrap(), 'a');
        assert!(convert::<char>(&values(&["ab"])).is_err());
        assert!(convert::<char>(&values(&[""])).is_err());
    }

    #[test]
    fn test_integers_use_invariant_format() {
        assert_eq!(convert::<i32>(&values(&["-15"])).unwrap(), -15);
        assert_eq!(convert::<i32>(&values(&[" 15 "])).unwrap(), 15);
        assert_eq!(convert::<u8>(&values(&["+255"])).unwrap(), 255);
        assert_eq!(
            convert::<i128>(&values(&["170141183460469231731687303715884105727"])).unwrap(),
            i128::MAX
        );
        assert!(convert::<u8>(&values(&["256"])).is_err());
        assert!(convert::<u32>(&values(&["-1"])).is_err());
        assert!(convert::<i64>(&values(&["1,000"])).is_err());
    }

    #[test]
    fn test_invalid_number_wraps_parse_error() {
        let err = convert::<i32>(&values(&["twelve"])).unwrap_err();
        assert_eq!(err.to_string(), "can't convert value [twelve] to type [i32]");
        let source = std::error::Error::source(&err).expect("source should be kept");
        assert_eq!(source.to_string(), "invalid digit found in string");
    }

    #[test]
    fn test_floats_use_dot_separator() {
        assert_eq!(convert::<f64>(&values(&["123.45"])).unwrap(), 123.45);
        assert_eq!(convert::<f32>(&values(&["-0.5"])).unwrap(), -0.5);
        assert!(convert::<f64>(&values(&["123,45"])).is_err());
    }

    #[test]
    fn test_decimal_keeps_exact_digits() {
        assert_eq!(
            convert::<Decimal>(&values(&["123.45"])).unwrap(),
            Decimal::new(12345, 2)
        );
        assert_eq!(
            convert::<Decimal>(&values(&[" -0.1 "])).unwrap(),
            Decimal::new(-1, 1)
        );
        assert_eq!(
            convert::<Decimal>(&values(&["79228162514264337593543950335"])).unwrap(),
            Decimal::MAX
        );
        assert_round_trip::<Decimal>("0.30");
        assert_round_trip::<Decimal>("-1000000.000001");
        assert_eq!(<Decimal as FromValue>::STRATEGY, Strategy::Float);
    }

    #[test]
    fn test_decimal_rejects_malformed_values() {
        for raw in ["12,5", "abc", "1.2.3", ""] {
            assert!(
                matches!(
                    convert::<Decimal>(&values(&[raw])),
                    Err(ConversionError::InvalidValue { .. })
                ),
                "{raw:?} should be rejected"
            );
        }
        assert!(matches!(
            convert::<Decimal>(&[]),
            Err(ConversionError::MissingValue { .. })
        ));
        assert!(convert::<Option<Decimal>>(&values(&[""])).unwrap().is_none());
    }

    #[test]
    fn test_numeric_round_trips() {
        assert_round_trip::<i8>("-128");
        assert_round_trip::<u16>("65535");
        assert_round_trip::<i64>("-9000000000");
        assert_round_trip::<usize>("42");
        assert_round_trip::<f64>("3.14159");
        assert_round_trip::<f32>("1e-3");
    }

    #[test]
    fn test_nullable_blank_and_absent_are_none() {
        assert_eq!(convert::<Option<i32>>(&[]).unwrap(), None);
        assert_eq!(convert::<Option<i32>>(&values(&[""])).unwrap(), None);
        assert_eq!(convert::<Option<i32>>(&values(&["  "])).unwrap(), None);
        assert_eq!(convert::<Option<i32>>(&values(&["7"])).unwrap(), Some(7));
        assert!(convert::<Option<i32>>(&values(&["seven"])).is_err());
        assert!(convert::<Option<i32>>(&values(&["1", "2"])).is_err());
    }

    #[test]
    fn test_nullable_bool_switch_is_none() {
        assert_eq!(convert::<Option<bool>>(&[]).unwrap(), None);
        assert_eq!(convert::<Option<bool>>(&values(&["false"])).unwrap(), Some(false));
    }

    #[test]
    fn test_string_constructor_types() {
        assert_eq!(
            convert::<PathBuf>(&values(&["/tmp/out.txt"])).unwrap(),
            PathBuf::from("/tmp/out.txt")
        );
        assert_eq!(
            convert::<OsString>(&values(&["name"])).unwrap(),
            OsString::from("name")
        );
        assert_eq!(<PathBuf as FromValue>::STRATEGY, Strategy::StringConstructor);
    }

    #[test]
    fn test_parse_types() {
        assert_eq!(
            convert::<IpAddr>(&values(&["127.0.0.1"])).unwrap(),
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        );
        assert_eq!(
            convert::<SocketAddr>(&values(&["[::1]:8080"])).unwrap().port(),
            8080
        );
        assert!(convert::<NonZeroU32>(&values(&["0"])).is_err());
        assert_eq!(<IpAddr as FromValue>::STRATEGY, Strategy::Parse);
        assert_round_trip::<Ipv6Addr>("::1");
    }
}
