//! Catalog of the per-day and per-hour weather fields the store exposes.
//!
//! Every field knows its JSON name and at which granularity it exists. The
//! typed accessors on [`WeatherStore`](crate::WeatherStore) are generated from
//! the same table (see `store/accessors.rs`).

use std::convert::TryFrom;

use crate::error::WeatherError;

macro_rules! field_catalog {
    ($($variant:ident => $name:literal, on_day: $day:literal, at_datetime: $hour:literal;)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Field {
            $($variant,)+
        }

        impl Field {
            /// Key of the field inside a day or hour record.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Field::$variant => $name,)+
                }
            }

            pub const fn all() -> &'static [Field] {
                &[$(Field::$variant,)+]
            }

            /// Whether the field is present on day records.
            pub fn on_day(&self) -> bool {
                match self {
                    $(Field::$variant => $day,)+
                }
            }

            /// Whether the field is present on hour records.
            pub fn at_datetime(&self) -> bool {
                match self {
                    $(Field::$variant => $hour,)+
                }
            }
        }
    };
}

field_catalog! {
    // core weather
    Temp => "temp", on_day: true, at_datetime: true;
    TempMax => "tempmax", on_day: true, at_datetime: true;
    TempMin => "tempmin", on_day: true, at_datetime: true;
    FeelsLike => "feelslike", on_day: true, at_datetime: true;
    FeelsLikeMax => "feelslikemax", on_day: true, at_datetime: true;
    FeelsLikeMin => "feelslikemin", on_day: true, at_datetime: true;
    Dew => "dew", on_day: true, at_datetime: true;
    Humidity => "humidity", on_day: true, at_datetime: true;
    Precip => "precip", on_day: true, at_datetime: true;
    PrecipProb => "precipprob", on_day: true, at_datetime: true;
    PrecipCover => "precipcover", on_day: true, at_datetime: true;
    PrecipType => "preciptype", on_day: true, at_datetime: true;
    Snow => "snow", on_day: true, at_datetime: true;
    SnowDepth => "snowdepth", on_day: true, at_datetime: true;
    WindGust => "windgust", on_day: true, at_datetime: true;
    WindSpeed => "windspeed", on_day: true, at_datetime: true;
    WindDir => "winddir", on_day: true, at_datetime: true;
    Pressure => "pressure", on_day: true, at_datetime: true;
    CloudCover => "cloudcover", on_day: true, at_datetime: true;
    Visibility => "visibility", on_day: true, at_datetime: true;
    SolarRadiation => "solarradiation", on_day: true, at_datetime: true;
    SolarEnergy => "solarenergy", on_day: true, at_datetime: true;
    UvIndex => "uvindex", on_day: true, at_datetime: true;
    SevereRisk => "severerisk", on_day: true, at_datetime: true;
    Stations => "stations", on_day: true, at_datetime: true;
    // astronomy
    Sunrise => "sunrise", on_day: true, at_datetime: false;
    SunriseEpoch => "sunriseEpoch", on_day: true, at_datetime: false;
    Sunset => "sunset", on_day: true, at_datetime: false;
    SunsetEpoch => "sunsetEpoch", on_day: true, at_datetime: false;
    MoonPhase => "moonphase", on_day: true, at_datetime: false;
    // description
    Conditions => "conditions", on_day: true, at_datetime: true;
    Description => "description", on_day: true, at_datetime: false;
    Icon => "icon", on_day: true, at_datetime: true;
    // hourly provenance
    Source => "source", on_day: false, at_datetime: true;
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Field {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Field::all()
            .iter()
            .copied()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| WeatherError::InvalidValue {
                param: "field",
                value: value.to_string(),
                allowed: Field::all()
                    .iter()
                    .map(Field::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_as_str_roundtrip() {
        for field in Field::all() {
            let parsed = Field::try_from(field.as_str()).expect("roundtrip should succeed");
            assert_eq!(*field, parsed);
        }
    }

    #[test]
    fn field_names_are_case_sensitive() {
        assert_eq!(Field::try_from("sunriseEpoch").unwrap(), Field::SunriseEpoch);
        assert!(Field::try_from("sunriseepoch").is_err());
        assert!(Field::try_from("TEMP").is_err());
    }

    #[test]
    fn granularity_follows_catalog() {
        assert!(Field::Temp.on_day() && Field::Temp.at_datetime());
        assert!(Field::Sunrise.on_day() && !Field::Sunrise.at_datetime());
        assert!(Field::Description.on_day() && !Field::Description.at_datetime());
        assert!(!Field::Source.on_day() && Field::Source.at_datetime());
        assert_eq!(Field::all().len(), 34);
    }
}
