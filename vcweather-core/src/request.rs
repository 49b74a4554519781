use log::debug;
use reqwest::Url;
use serde_json::Value;

use crate::{
    error::{Result, WeatherError},
    validate::{validate_date_expression, validate_element_names, validate_include_sections, validate_unit_system},
};

pub const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline/";

const LANG: &str = "en";
const CONTENT_TYPE: &str = "json";

/// Parameters of one timeline request.
///
/// Values are kept raw until [`FetchRequest::to_url`] so that every one of
/// them goes through the validators right before the network call.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub location: String,
    pub from: Option<Value>,
    pub to: Option<Value>,
    pub unit_group: Value,
    pub include: Vec<Value>,
    pub elements: Vec<Value>,
}

impl FetchRequest {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            from: None,
            to: None,
            unit_group: Value::from("metric"),
            include: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn from_date(mut self, from: impl Into<Value>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to_date(mut self, to: impl Into<Value>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn unit_group(mut self, unit_group: impl Into<Value>) -> Self {
        self.unit_group = unit_group.into();
        self
    }

    pub fn include<I>(mut self, sections: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.include = sections.into_iter().map(Into::into).collect();
        self
    }

    pub fn elements<I>(mut self, elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.elements = elements.into_iter().map(Into::into).collect();
        self
    }

    /// Validates every parameter and builds the request URL:
    /// `<base>/<location>[/<from>[/<to>]]?key=..&lang=en&contentType=json&unitGroup=..`
    /// plus `include` and `elements` when non-empty.
    pub fn to_url(&self, base_url: &str, api_key: &str) -> Result<Url> {
        let location = self.location.trim();
        if location.is_empty() {
            return Err(WeatherError::Request("A location is required".to_string()));
        }
        if self.to.is_some() && self.from.is_none() {
            return Err(WeatherError::Request(
                "An end date requires a start date".to_string(),
            ));
        }

        let from = self.from.clone().map(validate_date_expression).transpose()?;
        let to = self.to.clone().map(validate_date_expression).transpose()?;
        let unit_group = validate_unit_system(self.unit_group.clone())?;
        let include = validate_include_sections(self.include.iter().cloned())?;
        let elements = validate_element_names(self.elements.iter().cloned())?;

        let mut url = Url::parse(base_url).map_err(|e| WeatherError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| WeatherError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry path segments".to_string(),
            })?;
            segments.pop_if_empty().push(location);
            if let Some(from) = &from {
                segments.push(&from.to_string());
            }
            if let Some(to) = &to {
                segments.push(&to.to_string());
            }
        }

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("key", api_key)
                .append_pair("lang", LANG)
                .append_pair("contentType", CONTENT_TYPE)
                .append_pair("unitGroup", unit_group.as_str());
            if !include.is_empty() {
                query.append_pair("include", &include);
            }
            if !elements.is_empty() {
                query.append_pair("elements", &elements);
            }
        }

        debug!("Built timeline request {}", redacted(&url));
        Ok(url)
    }
}

/// URL with the API key masked, safe for logs and error messages.
pub(crate) fn redacted(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "REDACTED".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    let mut shown = url.clone();
    if !pairs.is_empty() {
        shown.query_pairs_mut().clear().extend_pairs(pairs);
    }
    shown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn builds_path_and_fixed_query() {
        let url = FetchRequest::new("Amsterdam, NL")
            .from_date("2025-03-07")
            .to_date("next7days")
            .to_url(DEFAULT_BASE_URL, "KEY")
            .unwrap();

        assert_eq!(
            url.path(),
            "/VisualCrossingWebServices/rest/services/timeline/Amsterdam,%20NL/2025-03-07/next7days"
        );
        assert_eq!(
            query(&url),
            vec![
                ("key".to_string(), "KEY".to_string()),
                ("lang".to_string(), "en".to_string()),
                ("contentType".to_string(), "json".to_string()),
                ("unitGroup".to_string(), "metric".to_string()),
            ]
        );
    }

    #[test]
    fn include_and_elements_are_joined() {
        let url = FetchRequest::new("London")
            .unit_group("uk")
            .include(["days", "hours"])
            .elements(["datetime", "temp"])
            .to_url("https://example.test/timeline", "KEY")
            .unwrap();

        let pairs = query(&url);
        assert!(pairs.contains(&("unitGroup".to_string(), "uk".to_string())));
        assert!(pairs.contains(&("include".to_string(), "days,hours".to_string())));
        assert!(pairs.contains(&("elements".to_string(), "datetime,temp".to_string())));
        assert_eq!(url.path(), "/timeline/London");
    }

    #[test]
    fn epoch_dates_become_path_segments() {
        let url = FetchRequest::new("Paris")
            .from_date(1_741_305_600i64)
            .to_url(DEFAULT_BASE_URL, "KEY")
            .unwrap();
        assert!(url.path().ends_with("/Paris/1741305600"));
    }

    #[test]
    fn missing_location_is_a_request_error() {
        let err = FetchRequest::new("  ").to_url(DEFAULT_BASE_URL, "KEY").unwrap_err();
        assert!(matches!(err, WeatherError::Request(_)));
    }

    #[test]
    fn end_without_start_is_a_request_error() {
        let err = FetchRequest::new("Paris")
            .to_date("today")
            .to_url(DEFAULT_BASE_URL, "KEY")
            .unwrap_err();
        assert!(matches!(err, WeatherError::Request(_)));
    }

    #[test]
    fn invalid_parameters_fail_validation() {
        let bad_date = FetchRequest::new("Paris").from_date("someday");
        assert!(matches!(
            bad_date.to_url(DEFAULT_BASE_URL, "KEY").unwrap_err(),
            WeatherError::InvalidFormat { .. }
        ));

        let bad_unit = FetchRequest::new("Paris").unit_group(json!(null));
        assert!(matches!(
            bad_unit.to_url(DEFAULT_BASE_URL, "KEY").unwrap_err(),
            WeatherError::InvalidType { .. }
        ));

        let bad_include = FetchRequest::new("Paris").include(["days", "weeks"]);
        assert!(matches!(
            bad_include.to_url(DEFAULT_BASE_URL, "KEY").unwrap_err(),
            WeatherError::InvalidValue { .. }
        ));
    }

    #[test]
    fn bad_base_url_is_reported() {
        let err = FetchRequest::new("Paris").to_url("not a url", "KEY").unwrap_err();
        assert!(matches!(err, WeatherError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn redacted_hides_the_key() {
        let url = FetchRequest::new("Paris").to_url(DEFAULT_BASE_URL, "SECRET").unwrap();
        let shown = redacted(&url);
        assert!(!shown.contains("SECRET"));
        assert!(shown.contains("key=REDACTED"));
        assert!(shown.contains("unitGroup=metric"));
    }
}
