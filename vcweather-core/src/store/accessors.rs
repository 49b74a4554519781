//! Per-field accessors generated from the field catalog.
//!
//! Each method is a thin wrapper over the generic accessors on
//! [`WeatherStore`]; the catalog in `field.rs` decides which granularities a
//! field gets.

use serde_json::Value;

use super::WeatherStore;
use crate::{error::Result, field::Field, identifier::AnyIdentifier};

macro_rules! day_accessors {
    ($($field:ident: $get:ident, $set:ident;)+) => {
        /// Fields that received a generated accessor, in declaration order.
        #[cfg(test)]
        const DAY_ACCESSOR_FIELDS: &[Field] = &[$(Field::$field,)+];

        impl WeatherStore {
            $(
                #[doc = concat!("Reads [`Field::", stringify!($field), "`] of one day.")]
                pub fn $get(&self, day: impl AnyIdentifier) -> Result<Option<Value>> {
                    self.get_field_on_day(day, Field::$field)
                }

                #[doc = concat!("Writes [`Field::", stringify!($field), "`] of one day.")]
                pub fn $set(&mut self, day: impl AnyIdentifier, value: impl Into<Value>) -> Result<()> {
                    self.set_field_on_day(day, Field::$field, value)
                }
            )+
        }
    };
}

macro_rules! datetime_accessors {
    ($($field:ident: $get:ident, $set:ident;)+) => {
        /// Fields that received a generated accessor, in declaration order.
        #[cfg(test)]
        const DATETIME_ACCESSOR_FIELDS: &[Field] = &[$(Field::$field,)+];

        impl WeatherStore {
            $(
                #[doc = concat!("Reads [`Field::", stringify!($field), "`] of one hour.")]
                pub fn $get(
                    &self,
                    day: impl AnyIdentifier,
                    time: impl AnyIdentifier,
                ) -> Result<Option<Value>> {
                    self.get_field_at_datetime(day, time, Field::$field)
                }

                #[doc = concat!("Writes [`Field::", stringify!($field), "`] of one hour.")]
                pub fn $set(
                    &mut self,
                    day: impl AnyIdentifier,
                    time: impl AnyIdentifier,
                    value: impl Into<Value>,
                ) -> Result<()> {
                    self.set_field_at_datetime(day, time, Field::$field, value)
                }
            )+
        }
    };
}

/// Top-level keys of the document.
macro_rules! document_accessors {
    ($($name:literal: $get:ident, $set:ident;)+) => {
        impl WeatherStore {
            $(
                #[doc = concat!("Reads the document's `", $name, "`.")]
                pub fn $get(&self) -> Option<Value> {
                    self.document.get($name).cloned()
                }

                #[doc = concat!("Writes the document's `", $name, "`.")]
                pub fn $set(&mut self, value: impl Into<Value>) {
                    self.document.insert($name.to_string(), value.into());
                }
            )+
        }
    };
}

day_accessors! {
    Temp: get_temp_on_day, set_temp_on_day;
    TempMax: get_tempmax_on_day, set_tempmax_on_day;
    TempMin: get_tempmin_on_day, set_tempmin_on_day;
    FeelsLike: get_feelslike_on_day, set_feelslike_on_day;
    FeelsLikeMax: get_feelslikemax_on_day, set_feelslikemax_on_day;
    FeelsLikeMin: get_feelslikemin_on_day, set_feelslikemin_on_day;
    Dew: get_dew_on_day, set_dew_on_day;
    Humidity: get_humidity_on_day, set_humidity_on_day;
    Precip: get_precip_on_day, set_precip_on_day;
    PrecipProb: get_precipprob_on_day, set_precipprob_on_day;
    PrecipCover: get_precipcover_on_day, set_precipcover_on_day;
    PrecipType: get_preciptype_on_day, set_preciptype_on_day;
    Snow: get_snow_on_day, set_snow_on_day;
    SnowDepth: get_snowdepth_on_day, set_snowdepth_on_day;
    WindGust: get_windgust_on_day, set_windgust_on_day;
    WindSpeed: get_windspeed_on_day, set_windspeed_on_day;
    WindDir: get_winddir_on_day, set_winddir_on_day;
    Pressure: get_pressure_on_day, set_pressure_on_day;
    CloudCover: get_cloudcover_on_day, set_cloudcover_on_day;
    Visibility: get_visibility_on_day, set_visibility_on_day;
    SolarRadiation: get_solarradiation_on_day, set_solarradiation_on_day;
    SolarEnergy: get_solarenergy_on_day, set_solarenergy_on_day;
    UvIndex: get_uvindex_on_day, set_uvindex_on_day;
    SevereRisk: get_severerisk_on_day, set_severerisk_on_day;
    Stations: get_stations_on_day, set_stations_on_day;
    Sunrise: get_sunrise_on_day, set_sunrise_on_day;
    SunriseEpoch: get_sunrise_epoch_on_day, set_sunrise_epoch_on_day;
    Sunset: get_sunset_on_day, set_sunset_on_day;
    SunsetEpoch: get_sunset_epoch_on_day, set_sunset_epoch_on_day;
    MoonPhase: get_moonphase_on_day, set_moonphase_on_day;
    Conditions: get_conditions_on_day, set_conditions_on_day;
    Description: get_description_on_day, set_description_on_day;
    Icon: get_icon_on_day, set_icon_on_day;
}

datetime_accessors! {
    Temp: get_temp_at_datetime, set_temp_at_datetime;
    TempMax: get_tempmax_at_datetime, set_tempmax_at_datetime;
    TempMin: get_tempmin_at_datetime, set_tempmin_at_datetime;
    FeelsLike: get_feelslike_at_datetime, set_feelslike_at_datetime;
    FeelsLikeMax: get_feelslikemax_at_datetime, set_feelslikemax_at_datetime;
    FeelsLikeMin: get_feelslikemin_at_datetime, set_feelslikemin_at_datetime;
    Dew: get_dew_at_datetime, set_dew_at_datetime;
    Humidity: get_humidity_at_datetime, set_humidity_at_datetime;
    Precip: get_precip_at_datetime, set_precip_at_datetime;
    PrecipProb: get_precipprob_at_datetime, set_precipprob_at_datetime;
    PrecipCover: get_precipcover_at_datetime, set_precipcover_at_datetime;
    PrecipType: get_preciptype_at_datetime, set_preciptype_at_datetime;
    Snow: get_snow_at_datetime, set_snow_at_datetime;
    SnowDepth: get_snowdepth_at_datetime, set_snowdepth_at_datetime;
    WindGust: get_windgust_at_datetime, set_windgust_at_datetime;
    WindSpeed: get_windspeed_at_datetime, set_windspeed_at_datetime;
    WindDir: get_winddir_at_datetime, set_winddir_at_datetime;
    Pressure: get_pressure_at_datetime, set_pressure_at_datetime;
    CloudCover: get_cloudcover_at_datetime, set_cloudcover_at_datetime;
    Visibility: get_visibility_at_datetime, set_visibility_at_datetime;
    SolarRadiation: get_solarradiation_at_datetime, set_solarradiation_at_datetime;
    SolarEnergy: get_solarenergy_at_datetime, set_solarenergy_at_datetime;
    UvIndex: get_uvindex_at_datetime, set_uvindex_at_datetime;
    SevereRisk: get_severerisk_at_datetime, set_severerisk_at_datetime;
    Stations: get_stations_at_datetime, set_stations_at_datetime;
    Conditions: get_conditions_at_datetime, set_conditions_at_datetime;
    Icon: get_icon_at_datetime, set_icon_at_datetime;
    Source: get_source_at_datetime, set_source_at_datetime;
}

document_accessors! {
    "resolvedAddress": get_resolved_address, set_resolved_address;
    "address": get_address, set_address;
    "timezone": get_timezone, set_timezone;
    "tzoffset": get_tzoffset, set_tzoffset;
    "queryCost": get_query_cost, set_query_cost;
    "stations": get_stations, set_stations;
    "alerts": get_alerts, set_alerts;
    "currentConditions": get_current_conditions, set_current_conditions;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeatherError;
    use serde_json::json;

    fn store() -> WeatherStore {
        let mut store = WeatherStore::offline();
        store.set_weather_data(
            json!({
                "queryCost": 1,
                "days": [{
                    "datetime": "2025-03-07",
                    "tempmax": 18.2,
                    "sunriseEpoch": 1741327965,
                    "description": "Clearing in the afternoon.",
                    "hours": [{"datetime": "00:00:00", "source": "obs", "conditions": "Overcast"}]
                }]
            })
            .as_object()
            .cloned()
            .unwrap(),
        );
        store
    }

    #[test]
    fn generated_accessors_match_catalog_granularity() {
        let on_day: Vec<Field> = Field::all().iter().copied().filter(Field::on_day).collect();
        let at_datetime: Vec<Field> = Field::all().iter().copied().filter(Field::at_datetime).collect();

        assert_eq!(DAY_ACCESSOR_FIELDS, on_day.as_slice());
        assert_eq!(DATETIME_ACCESSOR_FIELDS, at_datetime.as_slice());
    }

    #[test]
    fn day_accessors_delegate_to_catalog_names() {
        let mut store = store();
        assert_eq!(store.get_tempmax_on_day("2025-03-07").unwrap(), Some(json!(18.2)));
        assert_eq!(store.get_sunrise_epoch_on_day(0usize).unwrap(), Some(json!(1741327965)));
        assert_eq!(
            store.get_description_on_day(0usize).unwrap(),
            Some(json!("Clearing in the afternoon."))
        );

        store.set_moonphase_on_day(0usize, 0.5).unwrap();
        assert_eq!(store.get_field_on_day(0usize, Field::MoonPhase).unwrap(), Some(json!(0.5)));

        store.set_preciptype_on_day("2025-03-07", json!(["rain"])).unwrap();
        assert_eq!(store.get_preciptype_on_day(0usize).unwrap(), Some(json!(["rain"])));
    }

    #[test]
    fn datetime_accessors_delegate_to_catalog_names() {
        let mut store = store();
        assert_eq!(store.get_source_at_datetime(0usize, "00:00:00").unwrap(), Some(json!("obs")));
        assert_eq!(
            store.get_conditions_at_datetime("2025-03-07", 0usize).unwrap(),
            Some(json!("Overcast"))
        );

        store.set_uvindex_at_datetime(0usize, 0usize, 0).unwrap();
        assert_eq!(store.get_uvindex_at_datetime(0usize, 0usize).unwrap(), Some(json!(0)));
        assert_eq!(store.get_uvindex_on_day(0usize).unwrap(), None);
    }

    #[test]
    fn generated_accessors_keep_the_identifier_policy() {
        let mut store = store();
        assert_eq!(store.get_temp_on_day("1999-01-01").unwrap(), None);
        store.set_temp_on_day(3usize, 1).unwrap();
        assert!(matches!(
            store.get_icon_at_datetime(json!(false), 0usize),
            Err(WeatherError::InvalidIdentifierType(_))
        ));
    }

    #[test]
    fn document_accessors() {
        let mut store = store();
        assert_eq!(store.get_query_cost(), Some(json!(1)));
        store.set_query_cost(0);
        assert_eq!(store.get_query_cost(), Some(json!(0)));

        assert_eq!(store.get_timezone(), None);
        store.set_timezone("Europe/Amsterdam");
        store.set_tzoffset(1.0);
        assert_eq!(store.get_timezone(), Some(json!("Europe/Amsterdam")));
        assert_eq!(store.get_tzoffset(), Some(json!(1.0)));

        store.set_current_conditions(json!({"temp": 4}));
        assert_eq!(store.get_current_conditions(), Some(json!({"temp": 4})));
    }
}
