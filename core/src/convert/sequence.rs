//! Collection targets. Each value converts through the element type.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::Hash;

use super::{ConversionError, FromValue, FromValues, Strategy, ValueShape, sequence};

impl<T: FromValue> FromValues for Vec<T> {
    const SHAPE: ValueShape = ValueShape::Sequence;
    const STRATEGY: Strategy = T::STRATEGY;

    fn from_values(values: &[String]) -> Result<Self, ConversionError> {
        sequence(values)
    }
}

impl<T: FromValue> FromValues for VecDeque<T> {
    const SHAPE: ValueShape = ValueShape::Sequence;
    const STRATEGY: Strategy = T::STRATEGY;

    fn from_values(values: &[String]) -> Result<Self, ConversionError> {
        sequence(values).map(VecDeque::from)
    }
}

impl<T: FromValue> FromValues for Box<[T]> {
    const SHAPE: ValueShape = ValueShape::Sequence;
    const STRATEGY: Strategy = T::STRATEGY;

    fn from_values(values: &[String]) -> Result<Self, ConversionError> {
        sequence(values).map(Vec::into_boxed_slice)
    }
}

impl<T: FromValue + Ord> FromValues for BTreeSet<T> {
    const SHAPE: ValueShape = ValueShape::Sequence;
    const STRATEGY: Strategy = T::STRATEGY;

    fn from_values(values: &[String]) -> Result<Self, ConversionError> {
        values.iter().map(|value| T::from_value(Some(value))).collect()
    }
}

impl<T: FromValue + Eq + Hash> FromValues for HashSet<T> {
    const SHAPE: ValueShape = ValueShape::Sequence;
    const STRATEGY: Strategy = T::STRATEGY;

    fn from_values(values: &[String]) -> Result<Self, ConversionError> {
        values.iter().map(|value| T::from_value(Some(value))).collect()
    }
}
