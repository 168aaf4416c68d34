//! Dates, times and durations.
//!
//! Shapes come from [`FormatConvention::INVARIANT`]. Durations follow the
//! `[-][d.]hh:mm[:ss[.fffffff]]` time-span layout, or a bare day count.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, ParseResult, TimeDelta, Utc};
use thiserror::Error;

use super::{ConversionError, FormatConvention, FromValue, ParseFailure, Strategy, required};

const SECONDS_PER_DAY: u64 = 86_400;

/// A duration did not follow the time-span layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a time span shaped like [-][d.]hh:mm[:ss[.fffffff]]")]
pub struct TimeSpanFormatError;

fn try_formats<T>(
    value: &str,
    formats: &[&str],
    parse: impl Fn(&str, &str) -> ParseResult<T>,
) -> Result<T, ParseFailure> {
    let mut last_error: ParseFailure = "no format configured".into();
    for format in formats {
        match parse(value, format) {
            Ok(parsed) => return Ok(parsed),
            Err(err) => last_error = err.into(),
        }
    }
    Err(last_error)
}

fn parse_date(value: &str, convention: &FormatConvention) -> Result<NaiveDate, ParseFailure> {
    try_formats(value, convention.date_formats, NaiveDate::parse_from_str)
}

fn parse_datetime(value: &str, convention: &FormatConvention) -> Result<NaiveDateTime, ParseFailure> {
    try_formats(value, convention.datetime_formats, NaiveDateTime::parse_from_str).or_else(|err| {
        parse_date(value, convention)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|_| err)
    })
}

/// Values without an offset are taken as UTC.
fn parse_offset_datetime(
    value: &str,
    convention: &FormatConvention,
) -> Result<DateTime<FixedOffset>, ParseFailure> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed);
    }
    try_formats(
        value,
        convention.offset_datetime_formats,
        DateTime::<FixedOffset>::parse_from_str,
    )
    .or_else(|err| {
        parse_datetime(value, convention)
            .map(|naive| naive.and_utc().fixed_offset())
            .map_err(|_| err)
    })
}

struct TimeSpan {
    negative: bool,
    seconds: u64,
    nanos: u32,
}

fn parse_digits(raw: &str) -> Result<u64, TimeSpanFormatError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeSpanFormatError);
    }
    raw.parse().map_err(|_| TimeSpanFormatError)
}

fn parse_bounded(raw: &str, bound: u64) -> Result<u64, TimeSpanFormatError> {
    let parsed = parse_digits(raw)?;
    if parsed >= bound {
        return Err(TimeSpanFormatError);
    }
    Ok(parsed)
}

fn parse_fraction(raw: &str) -> Result<u32, TimeSpanFormatError> {
    if raw.len() > 9 {
        return Err(TimeSpanFormatError);
    }
    let digits = parse_digits(raw)?;
    let scale = 10u64.pow(9 - raw.len() as u32);
    u32::try_from(digits * scale).map_err(|_| TimeSpanFormatError)
}

/// `hh:mm[:ss[.f]]` as whole seconds and nanoseconds.
fn parse_clock(clock: &str) -> Result<(u64, u32), TimeSpanFormatError> {
    let mut parts = clock.split(':');
    let hours = parse_bounded(parts.next().unwrap_or_default(), 24)?;
    let minutes = parse_bounded(parts.next().ok_or(TimeSpanFormatError)?, 60)?;
    let (seconds, nanos) = match parts.next() {
        None => (0, 0),
        Some(raw) => match raw.split_once('.') {
            Some((whole, fraction)) => (parse_bounded(whole, 60)?, parse_fraction(fraction)?),
            None => (parse_bounded(raw, 60)?, 0),
        },
    };
    if parts.next().is_some() {
        return Err(TimeSpanFormatError);
    }
    Ok((hours * 3600 + minutes * 60 + seconds, nanos))
}

fn parse_time_span(value: &str) -> Result<TimeSpan, TimeSpanFormatError> {
    let value = value.trim();
    let (negative, body) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let (days, clock) = match body.split_once('.') {
        Some((days, clock)) if !days.contains(':') && clock.contains(':') => (days, Some(clock)),
        _ if body.contains(':') => ("0", Some(body)),
        _ => (body, None),
    };

    let days = parse_digits(days)?;
    let (clock_seconds, nanos) = match clock {
        Some(clock) => parse_clock(clock)?,
        None => (0, 0),
    };
    let seconds = days
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|seconds| seconds.checked_add(clock_seconds))
        .ok_or(TimeSpanFormatError)?;

    Ok(TimeSpan {
        negative,
        seconds,
        nanos,
    })
}

impl FromValue for NaiveDate {
    const STRATEGY: Strategy = Strategy::Temporal;

    fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
        let value = required::<Self>(value)?;
        parse_date(value.trim(), &FormatConvention::INVARIANT)
            .map_err(|err| ConversionError::invalid::<Self>(value, err))
    }
}

impl FromValue for NaiveTime {
    const STRATEGY: Strategy = Strategy::Temporal;

    fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
        let value = required::<Self>(value)?;
        try_formats(
            value.trim(),
            FormatConvention::INVARIANT.time_formats,
            NaiveTime::parse_from_str,
        )
        .map_err(|err| ConversionError::invalid::<Self>(value, err))
    }
}

impl FromValue for NaiveDateTime {
    const STRATEGY: Strategy = Strategy::Temporal;

    fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
        let value = required::<Self>(value)?;
        parse_datetime(value.trim(), &FormatConvention::INVARIANT)
            .map_err(|err| ConversionError::invalid::<Self>(value, err))
    }
}

impl FromValue for DateTime<FixedOffset> {
    const STRATEGY: Strategy = Strategy::Temporal;

    fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
        let value = required::<Self>(value)?;
        parse_offset_datetime(value.trim(), &FormatConvention::INVARIANT)
            .map_err(|err| ConversionError::invalid::<Self>(value, err))
    }
}

impl FromValue for DateTime<Utc> {
    const STRATEGY: Strategy = Strategy::Temporal;

    fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
        let value = required::<Self>(value)?;
        let trimmed = value.trim();
        let trimmed = trimmed.strip_suffix(" UTC").unwrap_or(trimmed);
        parse_offset_datetime(trimmed, &FormatConvention::INVARIANT)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|err| ConversionError::invalid::<Self>(value, err))
    }
}

impl FromValue for TimeDelta {
    const STRATEGY: Strategy = Strategy::Temporal;

    fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
        let value = required::<Self>(value)?;
        let span = parse_time_span(value).map_err(|err| ConversionError::invalid::<Self>(value, err))?;
        let delta = i64::try_from(span.seconds)
            .ok()
            .and_then(|seconds| TimeDelta::new(seconds, span.nanos))
            .ok_or_else(|| ConversionError::invalid::<Self>(value, TimeSpanFormatError))?;
        Ok(if span.negative { -delta } else { delta })
    }
}

impl FromValue for Duration {
    const STRATEGY: Strategy = Strategy::Temporal;

    fn from_value(value: Option<&str>) -> Result<Self, ConversionError> {
        let value = required::<Self>(value)?;
        let span = parse_time_span(value).map_err(|err| ConversionError::invalid::<Self>(value, err))?;
        if span.negative && (span.seconds > 0 || span.nanos > 0) {
            return Err(ConversionError::invalid::<Self>(
                value,
                "duration cannot be negative",
            ));
        }
        Ok(Duration::new(span.seconds, span.nanos))
    }
}

crate::from_value!(@scalar NaiveDate);
crate::from_value!(@scalar NaiveTime);
crate::from_value!(@scalar NaiveDateTime);
crate::from_value!(@scalar DateTime<FixedOffset>);
crate::from_value!(@scalar DateTime<Utc>);
crate::from_value!(@scalar TimeDelta);
crate::from_value!(@scalar Duration);
