//! String-to-type conversion of option and argument values.
//!
//! Every bindable field type implements [`FromValues`]. Scalar types also
//! implement [`FromValue`], which converts a single (possibly absent) value
//! and names the [`Strategy`] the type converts with. Collection types
//! convert each value through their element's [`FromValue`] impl.
//!
//! Built-in types are covered out of the box. User types opt in with the
//! [`from_value!`](crate::from_value) macro:
//!
//! ```
//! use argbind_core::{Strategy, convert, from_value};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Level {
//!     Debug,
//!     Info,
//!     Warn,
//! }
//!
//! from_value!(enum Level { Debug, Info, Warn });
//!
//! let level: Level = convert(&["WARN".to_string()]).unwrap();
//! assert_eq!(level, Level::Warn);
//!
//! let levels: Vec<Level> = convert(&["info".to_string(), "debug".to_string()]).unwrap();
//! assert_eq!(levels, vec![Level::Info, Level::Debug]);
//!
//! assert_eq!(<Level as argbind_core::FromValue>::STRATEGY, Strategy::Enumeration);
//! ```

mod scalar;
mod sequence;
mod temporal;

use std::any::type_name;
use std::borrow::Cow;
use std::error::Error as StdError;

use serde::Serialize;
use thiserror::Error;

pub use temporal::TimeSpanFormatError;

/// Boxed low-level parse failure carried by [`ConversionError::InvalidValue`].
pub type ParseFailure = Box<dyn StdError + Send + Sync>;

/// Conversion rule a target type binds to.
///
/// Variants are declared in priority order: when a type could be handled by
/// more than one rule, the earliest one is the rule its [`FromValue`] impl
/// uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// The raw string is used as is.
    Passthrough,
    /// Blank or absent means `true`, otherwise `true`/`false` literals.
    Boolean,
    /// Exactly one character.
    Character,
    /// Fixed-width integer.
    Integer,
    /// Floating point or decimal number.
    Float,
    /// Date, time, date-time or duration.
    Temporal,
    /// Case-insensitive variant name.
    Enumeration,
    /// Blank or absent means `None`, otherwise the inner type's rule.
    Nullable,
    /// Built from an owned string (`From<String>`).
    StringConstructor,
    /// Parsed with the invariant [`FormatConvention`] ([`ParseFormatted`]).
    ParseFormatted,
    /// Parsed with [`FromStr`](std::str::FromStr).
    Parse,
}

/// Whether a field takes one value or a whole sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// At most one value.
    Scalar,
    /// Any number of values, kept in input order.
    Sequence,
}

/// Errors raised while converting input values.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// A scalar target got no value and its strategy has no meaning for
    /// absence.
    #[error("a value is required for type [{target}]")]
    MissingValue {
        /// Target type name.
        target: &'static str,
    },
    /// A scalar target got more than one value.
    #[error(
        "can't convert a sequence of values [{}] to non-enumerable type [{target}]",
        .values.join(", ")
    )]
    TooManyValues {
        /// Values as given.
        values: Vec<String>,
        /// Target type name.
        target: &'static str,
    },
    /// The value was rejected by the underlying parser.
    #[error("can't convert value [{value}] to type [{target}]")]
    InvalidValue {
        /// Value as given.
        value: String,
        /// Target type name.
        target: &'static str,
        /// Underlying parse failure.
        #[source]
        source: ParseFailure,
    },
    /// The value names no variant of an enumeration.
    #[error(
        "can't convert value [{value}] to type [{target}], expected one of: {}",
        .expected.join(", ")
    )]
    UnknownVariant {
        /// Value as given.
        value: String,
        /// Target type name.
        target: &'static str,
        /// Accepted variant names.
        expected: Vec<&'static str>,
    },
}

impl ConversionError {
    /// Wraps a parse failure for target type `T`.
    pub fn invalid<T>(value: &str, source: impl Into<ParseFailure>) -> Self {
        Self::InvalidValue {
            value: value.to_string(),
            target: type_name::<T>(),
            source: source.into(),
        }
    }

    /// Missing value for target type `T`.
    pub fn missing<T>() -> Self {
        Self::MissingValue {
            target: type_name::<T>(),
        }
    }
}

/// Conversion of a single value.
///
/// `value` is `None` when the option was given as a bare switch or when no
/// value was supplied at all.
pub trait FromValue: Sized {
    /// Rule this type converts with.
    const STRATEGY: Strategy;

    /// Converts one value.
    fn from_value(value: Option<&str>) -> Result<Self, ConversionError>;
}

/// Conversion of the full value list given for one field.
pub trait FromValues: Sized {
    /// Whether the field consumes one value or all of them.
    const SHAPE: ValueShape;
    /// Rule applied to each value.
    const STRATEGY: Strategy;

    /// Converts the values given for a field.
    fn from_values(values: &[String]) -> Result<Self, ConversionError>;
}

/// Enumerations converted by case-insensitive variant name.
///
/// Usually implemented through [`from_value!`](crate::from_value).
pub trait EnumValue: Sized + Clone + 'static {
    /// Variant names and values, in declaration order.
    const VARIANTS: &'static [(&'static str, Self)];

    /// Name of this variant, as accepted on the command line.
    fn variant_name(&self) -> &'static str;
}

/// Types parsed with an explicit [`FormatConvention`].
pub trait ParseFormatted: Sized {
    /// Parse failure.
    type Err: Into<ParseFailure>;

    /// Parses `value` following `format`.
    fn parse_formatted(value: &str, format: &FormatConvention) -> Result<Self, Self::Err>;
}

/// A fractional number written with the wrong decimal separator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected '{expected}' as the decimal separator")]
pub struct DecimalSeparatorError {
    /// Separator the convention requires.
    pub expected: char,
}

/// Fixed formatting convention used for numbers, dates and durations.
///
/// Conversion never consults the process locale; every built-in fractional
/// and temporal type parses against [`FormatConvention::INVARIANT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConvention {
    /// Decimal separator for fractional numbers.
    pub decimal_separator: char,
    /// Accepted calendar date shapes, tried in order.
    pub date_formats: &'static [&'static str],
    /// Accepted time-of-day shapes, tried in order.
    pub time_formats: &'static [&'static str],
    /// Accepted date-time shapes without an offset, tried in order.
    pub datetime_formats: &'static [&'static str],
    /// Accepted date-time shapes carrying an offset, tried after RFC 3339.
    pub offset_datetime_formats: &'static [&'static str],
}

impl FormatConvention {
    /// The one convention used by built-in conversions.
    pub const INVARIANT: FormatConvention = FormatConvention {
        decimal_separator: '.',
        date_formats: &["%Y-%m-%d", "%m/%d/%Y"],
        time_formats: &["%H:%M:%S%.f", "%H:%M"],
        datetime_formats: &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M",
            "%m/%d/%Y %H:%M:%S",
        ],
        offset_datetime_formats: &[
            "%Y-%m-%d %H:%M:%S%.f %:z",
            "%Y-%m-%dT%H:%M:%S%.f%z",
            "%Y-%m-%d %H:%M:%S%.f%z",
        ],
    };
}

impl FormatConvention {
    /// Rewrites `value` so its fractional part uses `.`, trimming whitespace.
    ///
    /// A `.` is rejected when it is not the convention's separator, so
    /// `1.5` never parses under a comma convention.
    pub fn normalize_fraction<'a>(
        &self,
        value: &'a str,
    ) -> Result<Cow<'a, str>, DecimalSeparatorError> {
        let value = value.trim();
        if self.decimal_separator == '.' {
            return Ok(Cow::Borrowed(value));
        }
        if value.contains('.') {
            return Err(DecimalSeparatorError {
                expected: self.decimal_separator,
            });
        }
        Ok(Cow::Owned(value.replace(self.decimal_separator, ".")))
    }
}

impl Default for FormatConvention {
    fn default() -> Self {
        Self::INVARIANT
    }
}

/// Converts input values to `T`.
///
/// # Examples
///
/// ```
/// use argbind_core::convert;
///
/// let values = vec!["42".to_string()];
/// assert_eq!(convert::<u16>(&values).unwrap(), 42);
/// assert_eq!(convert::<Option<u16>>(&[]).unwrap(), None);
/// assert!(convert::<u16>(&[]).is_err());
/// ```
pub fn convert<T: FromValues>(values: &[String]) -> Result<T, ConversionError> {
    T::from_values(values)
}

/// [`FromValues`] body shared by every scalar type.
pub fn single<T: FromValue>(values: &[String]) -> Result<T, ConversionError> {
    match values {
        [] => T::from_value(None),
        [value] => T::from_value(Some(value)),
        _ => Err(ConversionError::TooManyValues {
            values: values.to_vec(),
            target: type_name::<T>(),
        }),
    }
}

/// Converts every value through `T`, preserving order.
pub fn sequence<T: FromValue>(values: &[String]) -> Result<Vec<T>, ConversionError> {
    values.iter().map(|value| T::from_value(Some(value))).collect()
}

/// Returns the value or a [`ConversionError::MissingValue`] for `T`.
pub fn required<T>(value: Option<&str>) -> Result<&str, ConversionError> {
    value.ok_or_else(ConversionError::missing::<T>)
}

/// [`Strategy::Enumeration`] rule.
pub fn parse_enum<T: EnumValue>(value: Option<&str>) -> Result<T, ConversionError> {
    let value = required::<T>(value)?;
    let name = value.trim();
    T::VARIANTS
        .iter()
        .find(|(variant, _)| variant.eq_ignore_ascii_case(name))
        .map(|(_, variant)| variant.clone())
        .ok_or_else(|| ConversionError::UnknownVariant {
            value: value.to_string(),
            target: type_name::<T>(),
            expected: T::VARIANTS.iter().map(|(variant, _)| *variant).collect(),
        })
}

/// [`Strategy::StringConstructor`] rule.
pub fn construct_from_string<T: From<String>>(value: Option<&str>) -> Result<T, ConversionError> {
    required::<T>(value).map(|value| T::from(value.to_string()))
}

/// [`Strategy::ParseFormatted`] rule.
pub fn parse_with_format<T: ParseFormatted>(value: Option<&str>) -> Result<T, ConversionError> {
    let value = required::<T>(value)?;
    T::parse_formatted(value, &FormatConvention::INVARIANT)
        .map_err(|err| ConversionError::invalid::<T>(value, err))
}

/// [`Strategy::Parse`] rule.
pub fn parse_from_str<T>(value: Option<&str>) -> Result<T, ConversionError>
where
    T: std::str::FromStr,
    T::Err: Into<ParseFailure>,
{
    let value = required::<T>(value)?;
    value
        .parse::<T>()
        .map_err(|err| ConversionError::invalid::<T>(value, err))
}

/// Implements [`FromValue`] and [`FromValues`] for user types.
///
/// - `enum Type { A, B }`: case-insensitive variant names; every variant
///   must be listed. Also implements [`EnumValue`].
/// - `string_constructor Type, ...`: `From<String>`.
/// - `parse_formatted Type, ...`: [`ParseFormatted`] with the invariant
///   convention.
/// - `parse Type, ...`: [`FromStr`](std::str::FromStr).
///
/// ```
/// use std::str::FromStr;
///
/// use argbind_core::{convert, from_value};
///
/// #[derive(Debug, PartialEq)]
/// struct Port(u16);
///
/// impl FromStr for Port {
///     type Err = std::num::ParseIntError;
///
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.parse().map(Port)
///     }
/// }
///
/// from_value!(parse Port);
///
/// assert_eq!(convert::<Port>(&["8080".to_string()]).unwrap(), Port(8080));
/// assert!(convert::<Port>(&["http".to_string()]).is_err());
/// ```
#[macro_export]
macro_rules! from_value {
    (enum $ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::EnumValue for $ty {
            const VARIANTS: &'static [(&'static str, Self)] =
                &[$((stringify!($variant), $ty::$variant)),+];

            fn variant_name(&self) -> &'static str {
                match self {
                    $($ty::$variant => stringify!($variant)),+
                }
            }
        }

        impl $crate::FromValue for $ty {
            const STRATEGY: $crate::Strategy = $crate::Strategy::Enumeration;

            fn from_value(value: Option<&str>) -> Result<Self, $crate::ConversionError> {
                $crate::convert::parse_enum(value)
            }
        }

        $crate::from_value!(@scalar $ty);
    };
    (string_constructor $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FromValue for $ty {
                const STRATEGY: $crate::Strategy = $crate::Strategy::StringConstructor;

                fn from_value(value: Option<&str>) -> Result<Self, $crate::ConversionError> {
                    $crate::convert::construct_from_string(value)
                }
            }

            $crate::from_value!(@scalar $ty);
        )+
    };
    (parse_formatted $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FromValue for $ty {
                const STRATEGY: $crate::Strategy = $crate::Strategy::ParseFormatted;

                fn from_value(value: Option<&str>) -> Result<Self, $crate::ConversionError> {
                    $crate::convert::parse_with_format(value)
                }
            }

            $crate::from_value!(@scalar $ty);
        )+
    };
    (parse $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FromValue for $ty {
                const STRATEGY: $crate::Strategy = $crate::Strategy::Parse;

                fn from_value(value: Option<&str>) -> Result<Self, $crate::ConversionError> {
                    $crate::convert::parse_from_str(value)
                }
            }

            $crate::from_value!(@scalar $ty);
        )+
    };
    (@scalar $ty:ty) => {
        impl $crate::FromValues for $ty {
            const SHAPE: $crate::ValueShape = $crate::ValueShape::Scalar;
            const STRATEGY: $crate::Strategy = <$ty as $crate::FromValue>::STRATEGY;

            fn from_values(values: &[String]) -> Result<Self, $crate::ConversionError> {
                $crate::convert::single(values)
            }
        }
    };
}

#[cfg(test)]
pub(crate) fn values(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red,
        Green,
        Blue,
    }

    crate::from_value!(enum Color { Red, Green, Blue });

    #[derive(Debug, PartialEq)]
    struct Celsius(f64);

    impl ParseFormatted for Celsius {
        type Err = ParseFailure;

        fn parse_formatted(value: &str, format: &FormatConvention) -> Result<Self, Self::Err> {
            let normalized = value.trim().trim_end_matches("C");
            f64::parse_formatted(normalized, format).map(Celsius)
        }
    }

    crate::from_value!(parse_formatted Celsius);

    #[test]
    fn test_scalar_rejects_multiple_values() {
        let err = convert::<i32>(&values(&["1", "2"])).unwrap_err();
        assert!(matches!(err, ConversionError::TooManyValues { .. }));
        assert_eq!(
            err.to_string(),
            "can't convert a sequence of values [1, 2] to non-enumerable type [i32]"
        );
    }

    #[test]
    fn test_scalar_rejects_missing_value() {
        assert!(matches!(
            convert::<i32>(&[]),
            Err(ConversionError::MissingValue { .. })
        ));
        assert!(matches!(
            convert::<String>(&[]),
            Err(ConversionError::MissingValue { .. })
        ));
        assert!(matches!(
            convert::<Color>(&[]),
            Err(ConversionError::MissingValue { .. })
        ));
    }

    #[test]
    fn test_string_with_multiple_values_is_not_a_sequence() {
        assert!(matches!(
            convert::<String>(&values(&["a", "b"])),
            Err(ConversionError::TooManyValues { .. })
        ));
    }

    #[test]
    fn test_enum_matches_case_insensitively() {
        assert_eq!(convert::<Color>(&values(&["green"])).unwrap(), Color::Green);
        assert_eq!(convert::<Color>(&values(&[" BLUE "])).unwrap(), Color::Blue);
    }

    #[test]
    fn test_enum_round_trips_variant_names() {
        for (name, variant) in Color::VARIANTS {
            assert_eq!(variant.variant_name(), *name);
            let parsed: Color = convert(&values(&[variant.variant_name()])).unwrap();
            assert_eq!(parsed, *variant);
        }
    }

    #[test]
    fn test_enum_unknown_variant_lists_expected_names() {
        let err = convert::<Color>(&values(&["purple"])).unwrap_err();
        match err {
            ConversionError::UnknownVariant { expected, .. } => {
                assert_eq!(expected, vec!["Red", "Green", "Blue"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_formatted_uses_invariant_convention() {
        assert_eq!(
            convert::<Celsius>(&values(&["21.5C"])).unwrap(),
            Celsius(21.5)
        );
        let err = convert::<Celsius>(&values(&["warm"])).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidValue { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_fractions_follow_the_convention_separator() {
        let comma = FormatConvention {
            decimal_separator: ',',
            ..FormatConvention::INVARIANT
        };
        assert_eq!(comma.normalize_fraction(" 1,5 ").unwrap(), "1.5");
        assert_eq!(comma.normalize_fraction("1.5").unwrap_err().expected, ',');
        assert_eq!(f64::parse_formatted("2,25", &comma).unwrap(), 2.25);
        assert!(f64::parse_formatted("2.25", &comma).is_err());
        assert_eq!(FormatConvention::INVARIANT.normalize_fraction("1,5").unwrap(), "1,5");
    }

    #[test]
    fn test_strategy_order_matches_priority() {
        assert!(Strategy::Passthrough < Strategy::Boolean);
        assert!(Strategy::Temporal < Strategy::Enumeration);
        assert!(Strategy::Nullable < Strategy::StringConstructor);
        assert!(Strategy::ParseFormatted < Strategy::Parse);
        assert_eq!(<Color as FromValues>::STRATEGY, Strategy::Enumeration);
        assert_eq!(<Color as FromValues>::SHAPE, ValueShape::Scalar);
    }
}
