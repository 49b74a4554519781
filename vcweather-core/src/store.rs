//! The weather store: one in-memory timeline document plus the accessors that
//! read and write it.
//!
//! Days are addressed by `YYYY-MM-DD` or by position in `days`; hours by
//! `HH:MM:SS` or by position in their day's `hours`. Reads that resolve to
//! nothing return `Ok(None)`, writes that resolve to nothing do nothing, and
//! identifiers of the wrong type are always an error.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{info, warn};
use serde_json::Value;

use crate::{
    config::Config,
    error::{Result, WeatherError, kind_of},
    field::Field,
    identifier::{AnyIdentifier, Identifier, merge_into, merge_item_at, replace_item_at, resolve_by_identifier, resolve_mut},
    model::{DATETIME, DAYS, HOURS, Record, project, project_value},
    request::{DEFAULT_BASE_URL, FetchRequest},
    transport::{ReqwestTransport, Transport},
};

mod accessors;

#[derive(Debug)]
pub struct WeatherStore {
    api_key: Option<String>,
    base_url: String,
    transport: Box<dyn Transport>,
    document: Record,
}

impl WeatherStore {
    /// Creates an empty store. A blank key is treated as no key at all and
    /// only fails once a fetch is attempted.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            api_key: (!api_key.trim().is_empty()).then_some(api_key),
            base_url: base_url.into(),
            transport: Box::new(ReqwestTransport::new()),
            document: Record::new(),
        }
    }

    /// Store for working on externally supplied documents only.
    pub fn offline() -> Self {
        Self::new(String::new(), DEFAULT_BASE_URL)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_key().unwrap_or_default(),
            config.base_url(),
        )
    }

    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one timeline document and makes it the store's document.
    ///
    /// Nothing is sent unless a key is configured and every parameter passes
    /// validation. The current document is kept on any failure.
    pub async fn fetch_weather_data(&mut self, request: &FetchRequest) -> Result<Record> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            WeatherError::Configuration(
                "No API key configured.\n\
                 Hint: run `vcweather configure` or set VCWEATHER_API_KEY."
                    .to_string(),
            )
        })?;

        let url = request.to_url(&self.base_url, api_key)?;
        let response = self.transport.get(&url).await?;

        if !response.is_success() {
            warn!(
                "Weather request for '{}' failed with status {}",
                request.location, response.status
            );
            return Err(WeatherError::Fetch {
                status: response.status,
                body: response.body,
            });
        }

        let document = match serde_json::from_str::<Value>(&response.body)? {
            Value::Object(document) => document,
            other => return Err(WeatherError::InvalidDocument(kind_of(&other))),
        };

        info!(
            "Loaded weather data for '{}' ({} days)",
            document
                .get("resolvedAddress")
                .and_then(Value::as_str)
                .unwrap_or(&request.location),
            document.get(DAYS).and_then(Value::as_array).map_or(0, Vec::len),
        );

        self.document = document;
        Ok(self.document.clone())
    }

    pub fn clear_weather_data(&mut self) {
        self.document = Record::new();
    }

    /// Copy of the whole document, optionally restricted to some top-level keys.
    pub fn get_weather_data(&self, fields: Option<&[&str]>) -> Record {
        project(&self.document, fields)
    }

    pub fn set_weather_data(&mut self, document: Record) {
        self.document = document;
    }

    /// Copy of every day, each optionally restricted to some keys.
    pub fn get_daily_data(&self, fields: Option<&[&str]>) -> Vec<Record> {
        self.days().iter().map(|day| project_value(day, fields)).collect()
    }

    pub fn set_daily_data(&mut self, days: Vec<Record>) {
        let days = days.into_iter().map(Value::Object).collect();
        self.document.insert(DAYS.to_string(), Value::Array(days));
    }

    /// Every hour of every day, flattened in day order.
    pub fn get_hourly_data(&self, fields: Option<&[&str]>) -> Vec<Record> {
        self.days()
            .iter()
            .flat_map(|day| hours_of(day).iter())
            .map(|hour| project_value(hour, fields))
            .collect()
    }

    /// Midnight of every day, in day order.
    pub fn get_daily_datetimes(&self) -> Result<Vec<NaiveDateTime>> {
        self.days()
            .iter()
            .map(|day| parse_day(day).map(|date| date.and_time(NaiveTime::MIN)))
            .collect()
    }

    /// Every hour combined with its day's date, in day then hour order.
    pub fn get_hourly_datetimes(&self) -> Result<Vec<NaiveDateTime>> {
        let mut stamps = Vec::new();
        for day in self.days() {
            let date = parse_day(day)?;
            for hour in hours_of(day) {
                stamps.push(date.and_time(parse_hour(hour)?));
            }
        }
        Ok(stamps)
    }

    pub fn get_field_on_day(&self, day: impl AnyIdentifier, field: Field) -> Result<Option<Value>> {
        Ok(resolve_by_identifier(self.days(), day)?
            .and_then(|record| record.get(field.as_str()))
            .cloned())
    }

    pub fn set_field_on_day(
        &mut self,
        day: impl AnyIdentifier,
        field: Field,
        value: impl Into<Value>,
    ) -> Result<()> {
        let day = day.into_identifier()?;
        if let Some(record) = self.day_mut(&day) {
            insert_field(record, field, value.into());
        }
        Ok(())
    }

    pub fn get_field_at_datetime(
        &self,
        day: impl AnyIdentifier,
        time: impl AnyIdentifier,
        field: Field,
    ) -> Result<Option<Value>> {
        Ok(self
            .hour(day, time)?
            .and_then(|record| record.get(field.as_str()))
            .cloned())
    }

    pub fn set_field_at_datetime(
        &mut self,
        day: impl AnyIdentifier,
        time: impl AnyIdentifier,
        field: Field,
        value: impl Into<Value>,
    ) -> Result<()> {
        let (day, time) = (day.into_identifier()?, time.into_identifier()?);
        if let Some(record) = self.hour_mut(&day, &time) {
            insert_field(record, field, value.into());
        }
        Ok(())
    }

    /// Copy of one day, optionally restricted to some keys.
    pub fn get_data_on_day(
        &self,
        day: impl AnyIdentifier,
        fields: Option<&[&str]>,
    ) -> Result<Option<Record>> {
        Ok(resolve_by_identifier(self.days(), day)?.map(|record| project_value(record, fields)))
    }

    /// Replaces one day wholesale. Its `datetime` is kept.
    pub fn set_data_on_day(&mut self, day: impl AnyIdentifier, record: Record) -> Result<()> {
        let day = day.into_identifier()?;
        if let Some(days) = self.days_mut() {
            replace_item_at(days, day, record)?;
        }
        Ok(())
    }

    /// Merges `partial` into one day. Its `datetime` is kept.
    pub fn update_data_on_day(&mut self, day: impl AnyIdentifier, partial: Record) -> Result<()> {
        let day = day.into_identifier()?;
        if let Some(days) = self.days_mut() {
            merge_item_at(days, day, partial)?;
        }
        Ok(())
    }

    pub fn get_data_at_datetime(
        &self,
        day: impl AnyIdentifier,
        time: impl AnyIdentifier,
        fields: Option<&[&str]>,
    ) -> Result<Option<Record>> {
        Ok(self.hour(day, time)?.map(|record| project_value(record, fields)))
    }

    pub fn set_data_at_datetime(
        &mut self,
        day: impl AnyIdentifier,
        time: impl AnyIdentifier,
        record: Record,
    ) -> Result<()> {
        let (day, time) = (day.into_identifier()?, time.into_identifier()?);
        if let Some(hours) = self.day_mut(&day).and_then(hours_of_mut) {
            replace_item_at(hours, time, record)?;
        }
        Ok(())
    }

    pub fn update_data_at_datetime(
        &mut self,
        day: impl AnyIdentifier,
        time: impl AnyIdentifier,
        partial: Record,
    ) -> Result<()> {
        let (day, time) = (day.into_identifier()?, time.into_identifier()?);
        if let Some(record) = self.hour_mut(&day, &time) {
            merge_into(record, partial);
        }
        Ok(())
    }

    pub fn get_latitude(&self) -> Option<Value> {
        self.document.get("latitude").cloned()
    }

    pub fn set_latitude(&mut self, latitude: f64) -> Result<()> {
        self.set_coordinate("latitude", latitude, 90.0)
    }

    pub fn get_longitude(&self) -> Option<Value> {
        self.document.get("longitude").cloned()
    }

    pub fn set_longitude(&mut self, longitude: f64) -> Result<()> {
        self.set_coordinate("longitude", longitude, 180.0)
    }

    fn set_coordinate(&mut self, key: &'static str, value: f64, limit: f64) -> Result<()> {
        if !(-limit..=limit).contains(&value) {
            return Err(WeatherError::InvalidValue {
                param: key,
                value: value.to_string(),
                allowed: format!("[-{limit}, {limit}]"),
            });
        }
        self.document.insert(key.to_string(), Value::from(value));
        Ok(())
    }

    fn days(&self) -> &[Value] {
        self.document
            .get(DAYS)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn days_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.document.get_mut(DAYS).and_then(Value::as_array_mut)
    }

    fn day_mut(&mut self, day: &Identifier) -> Option<&mut Value> {
        resolve_mut(self.days_mut()?, day)
    }

    /// Both identifiers are type-checked before any lookup happens.
    fn hour(&self, day: impl AnyIdentifier, time: impl AnyIdentifier) -> Result<Option<&Value>> {
        let (day, time) = (day.into_identifier()?, time.into_identifier()?);
        match resolve_by_identifier(self.days(), day)? {
            Some(record) => resolve_by_identifier(hours_of(record), time),
            None => Ok(None),
        }
    }

    fn hour_mut(&mut self, day: &Identifier, time: &Identifier) -> Option<&mut Value> {
        let hours = self.day_mut(day).and_then(hours_of_mut)?;
        resolve_mut(hours, time)
    }
}

fn hours_of(day: &Value) -> &[Value] {
    day.get(HOURS)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn hours_of_mut(day: &mut Value) -> Option<&mut Vec<Value>> {
    day.get_mut(HOURS).and_then(Value::as_array_mut)
}

fn insert_field(record: &mut Value, field: Field, value: Value) {
    merge_into(record, Record::from_iter([(field.as_str().to_string(), value)]));
}

fn datetime_text(record: &Value) -> Result<&str> {
    record
        .get(DATETIME)
        .and_then(Value::as_str)
        .ok_or_else(|| WeatherError::InvalidTimestamp {
            value: record
                .get(DATETIME)
                .map_or_else(|| "<missing>".to_string(), Value::to_string),
        })
}

fn parse_day(day: &Value) -> Result<NaiveDate> {
    let text = datetime_text(day)?;
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| WeatherError::InvalidTimestamp {
        value: text.to_string(),
    })
}

fn parse_hour(hour: &Value) -> Result<NaiveTime> {
    let text = datetime_text(hour)?;
    NaiveTime::parse_from_str(text, "%H:%M:%S").map_err(|_| WeatherError::InvalidTimestamp {
        value: text.to_string(),
    })
}
