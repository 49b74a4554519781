//! Validation of request parameters before they are put on the wire.
//!
//! Parameters arrive untyped (anything convertible into a JSON value) so a
//! caller passing the wrong kind of value gets `InvalidType` rather than a
//! compile error at some distant conversion site. Every function is pure.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Number, Value};
use std::convert::TryFrom;

use crate::{
    error::{Result, WeatherError},
    field::Field,
};

const DATE_KEYWORDS: &[&str] = &[
    "today",
    "tomorrow",
    "yesterday",
    "yeartodate",
    "monthtodate",
    "lastyear",
    "last24hours",
    "nextweekend",
    "lastweekend",
];

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Element names that are not part of the field catalog but can still be
/// requested.
const EXTRA_ELEMENTS: &[&str] = &["datetime", "datetimeEpoch"];

/// A validated `from`/`to` path segment.
#[derive(Debug, Clone, PartialEq)]
pub enum DateExpression {
    /// Keyword, relative pattern, calendar date or calendar datetime.
    Text(String),
    /// Epoch seconds, passed through as given.
    Epoch(Number),
}

impl std::fmt::Display for DateExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateExpression::Text(text) => f.write_str(text),
            DateExpression::Epoch(epoch) => write!(f, "{epoch}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitGroup {
    Us,
    Uk,
    #[default]
    Metric,
    Base,
}

impl UnitGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitGroup::Us => "us",
            UnitGroup::Uk => "uk",
            UnitGroup::Metric => "metric",
            UnitGroup::Base => "base",
        }
    }

    pub const fn all() -> &'static [UnitGroup] {
        &[UnitGroup::Us, UnitGroup::Uk, UnitGroup::Metric, UnitGroup::Base]
    }
}

impl std::fmt::Display for UnitGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitGroup {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self> {
        UnitGroup::all()
            .iter()
            .copied()
            .find(|unit| unit.as_str() == value)
            .ok_or_else(|| invalid_value("unitGroup", value, UnitGroup::all().iter().map(UnitGroup::as_str)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncludeSection {
    Days,
    Hours,
    Minutes,
    Alerts,
    Current,
    Events,
    Obs,
    Remote,
    Fcst,
    Stats,
    StatsFcst,
}

impl IncludeSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncludeSection::Days => "days",
            IncludeSection::Hours => "hours",
            IncludeSection::Minutes => "minutes",
            IncludeSection::Alerts => "alerts",
            IncludeSection::Current => "current",
            IncludeSection::Events => "events",
            IncludeSection::Obs => "obs",
            IncludeSection::Remote => "remote",
            IncludeSection::Fcst => "fcst",
            IncludeSection::Stats => "stats",
            IncludeSection::StatsFcst => "statsfcst",
        }
    }

    pub const fn all() -> &'static [IncludeSection] {
        &[
            IncludeSection::Days,
            IncludeSection::Hours,
            IncludeSection::Minutes,
            IncludeSection::Alerts,
            IncludeSection::Current,
            IncludeSection::Events,
            IncludeSection::Obs,
            IncludeSection::Remote,
            IncludeSection::Fcst,
            IncludeSection::Stats,
            IncludeSection::StatsFcst,
        ]
    }
}

impl std::fmt::Display for IncludeSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IncludeSection {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self> {
        IncludeSection::all()
            .iter()
            .copied()
            .find(|section| section.as_str() == value)
            .ok_or_else(|| {
                invalid_value("include", value, IncludeSection::all().iter().map(IncludeSection::as_str))
            })
    }
}

/// Accepts a date keyword, `next<N>days`/`last<N>days`,
/// `next<weekday>`/`last<weekday>`, `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`, or any
/// number (epoch seconds).
pub fn validate_date_expression(value: impl Into<Value>) -> Result<DateExpression> {
    match value.into() {
        Value::Number(epoch) => Ok(DateExpression::Epoch(epoch)),
        Value::String(text) => {
            if is_date_keyword(&text)
                || is_relative_days(&text)
                || is_relative_weekday(&text)
                || is_calendar_date(&text)
                || is_calendar_datetime(&text)
            {
                Ok(DateExpression::Text(text))
            } else {
                Err(WeatherError::InvalidFormat {
                    param: "date",
                    value: text,
                })
            }
        }
        other => Err(WeatherError::InvalidType {
            param: "date",
            expected: "string or number",
            value: other,
        }),
    }
}

pub fn validate_unit_system(value: impl Into<Value>) -> Result<UnitGroup> {
    let value = value.into();
    let text = expect_string("unitGroup", &value)?;
    UnitGroup::try_from(text)
}

/// Validates every section and joins them with commas, in input order.
pub fn validate_include_sections<I>(values: I) -> Result<String>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let allowed: Vec<&str> = IncludeSection::all().iter().map(IncludeSection::as_str).collect();
    join_validated("include", values, &allowed)
}

/// Validates every element name and joins them with commas, in input order.
pub fn validate_element_names<I>(values: I) -> Result<String>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let allowed: Vec<&str> = Field::all()
        .iter()
        .map(Field::as_str)
        .chain(EXTRA_ELEMENTS.iter().copied())
        .collect();
    join_validated("elements", values, &allowed)
}

fn join_validated<I>(param: &'static str, values: I, allowed: &[&str]) -> Result<String>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let mut accepted = Vec::new();
    for value in values {
        let value = value.into();
        let text = expect_string(param, &value)?;
        if !allowed.contains(&text) {
            return Err(invalid_value(param, text, allowed.iter().copied()));
        }
        accepted.push(text.to_string());
    }
    Ok(accepted.join(","))
}

fn expect_string<'a>(param: &'static str, value: &'a Value) -> Result<&'a str> {
    value.as_str().ok_or_else(|| WeatherError::InvalidType {
        param,
        expected: "string",
        value: value.clone(),
    })
}

fn invalid_value<'a>(
    param: &'static str,
    value: &str,
    allowed: impl Iterator<Item = &'a str>,
) -> WeatherError {
    WeatherError::InvalidValue {
        param,
        value: value.to_string(),
        allowed: allowed.collect::<Vec<_>>().join(", "),
    }
}

fn is_date_keyword(text: &str) -> bool {
    DATE_KEYWORDS.contains(&text)
}

fn strip_direction(text: &str) -> Option<&str> {
    text.strip_prefix("next").or_else(|| text.strip_prefix("last"))
}

fn is_relative_days(text: &str) -> bool {
    strip_direction(text)
        .and_then(|rest| rest.strip_suffix("days"))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

fn is_relative_weekday(text: &str) -> bool {
    strip_direction(text).is_some_and(|rest| WEEKDAYS.contains(&rest))
}

/// `DDDD-DD-DD`, checked byte by byte so chrono's lenient numeric parsing
/// (single-digit months, signed years) is not accepted.
fn has_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn has_time_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 8
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

fn is_calendar_date(text: &str) -> bool {
    has_date_shape(text) && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

fn is_calendar_datetime(text: &str) -> bool {
    match text.split_once('T') {
        Some((date, time)) => {
            has_date_shape(date)
                && has_time_shape(time)
                && NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").is_ok()
        }
        None => false,
    }
}
