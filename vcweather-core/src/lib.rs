//! Core library for the `vcweather` CLI.
//!
//! This crate defines:
//! - Request parameter validation
//! - Day/hour addressing over a timeline weather document
//! - The in-memory `WeatherStore` and its per-field accessors
//! - Configuration & credentials handling
//!
//! It is used by `vcweather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod field;
pub mod identifier;
pub mod model;
pub mod request;
pub mod store;
pub mod transport;
pub mod validate;

pub use config::Config;
pub use error::{Result, WeatherError};
pub use field::Field;
pub use identifier::{AnyIdentifier, Identifier, merge_item_at, replace_item_at, resolve_by_identifier};
pub use model::Record;
pub use request::{DEFAULT_BASE_URL, FetchRequest};
pub use store::WeatherStore;
pub use transport::{ReqwestTransport, Transport, TransportResponse};
pub use validate::{
    DateExpression, IncludeSection, UnitGroup, validate_date_expression, validate_element_names,
    validate_include_sections, validate_unit_system,
};
