use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, Select};
use log::debug;
use serde_json::Value;
use std::convert::TryFrom;

use vcweather_core::{Config, FetchRequest, Field, Identifier, Record, UnitGroup, WeatherStore};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "vcweather", version, about = "Visual Crossing timeline weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key and default unit group.
    Configure,

    /// Fetch weather for a location and print a daily summary.
    Show {
        #[command(flatten)]
        query: QueryArgs,

        /// Also print every hour.
        #[arg(long)]
        hourly: bool,

        /// Print the raw JSON document instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Fetch weather for a location and print one field.
    Field {
        #[command(flatten)]
        query: QueryArgs,

        /// Day as YYYY-MM-DD or zero-based index.
        day: String,

        /// Field name, e.g. "temp" or "sunriseEpoch".
        field: String,

        /// Hour as HH:MM:SS or zero-based index.
        #[arg(long)]
        time: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Address, partial address or "lat,lon".
    pub location: String,

    /// Start date: YYYY-MM-DD, a keyword like "today", "next7days", or epoch seconds.
    #[arg(long)]
    pub from: Option<String>,

    /// End date, same forms as --from.
    #[arg(long)]
    pub to: Option<String>,

    /// One of us, uk, metric, base. Defaults to the configured unit group.
    #[arg(long)]
    pub unit_group: Option<String>,

    /// Response sections, e.g. --include days,hours
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Elements to return, e.g. --elements datetime,temp
    #[arg(long, value_delimiter = ',')]
    pub elements: Vec<String>,
}

impl QueryArgs {
    fn to_request(&self, config: &Config) -> anyhow::Result<FetchRequest> {
        let unit_group = match &self.unit_group {
            Some(unit) => unit.clone(),
            None => config.unit_group_or_default()?.as_str().to_string(),
        };

        let mut request = FetchRequest::new(self.location.clone())
            .unit_group(unit_group)
            .include(self.include.iter().map(String::as_str))
            .elements(self.elements.iter().map(String::as_str));

        if let Some(from) = &self.from {
            request = request.from_date(date_arg(from));
        }
        if let Some(to) = &self.to {
            request = request.to_date(date_arg(to));
        }

        Ok(request)
    }
}

/// Epoch seconds are passed as numbers, everything else as text.
fn date_arg(raw: &str) -> Value {
    raw.parse::<i64>().map_or_else(|_| Value::from(raw), Value::from)
}

/// Digits address by position, anything else by datetime.
fn identifier_arg(raw: &str) -> Identifier {
    raw.parse::<i64>()
        .map_or_else(|_| Identifier::Key(raw.to_string()), Identifier::Index)
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { query, hourly, json } => {
                let store = fetch(&query).await?;
                if json {
                    let document = Value::Object(store.get_weather_data(None));
                    println!("{}", serde_json::to_string_pretty(&document)?);
                } else {
                    print_summary(&store, hourly)?;
                }
                Ok(())
            }
            Command::Field { query, day, field, time } => {
                let field = Field::try_from(field.as_str())?;
                let store = fetch(&query).await?;
                let day = identifier_arg(&day);

                let value = match time {
                    Some(time) => store.get_field_at_datetime(day, identifier_arg(&time), field)?,
                    None => store.get_field_on_day(day, field)?,
                };

                match value {
                    Some(value) => println!("{value}"),
                    None => println!("(not found)"),
                }
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("Visual Crossing API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let units: Vec<&str> = UnitGroup::all().iter().map(UnitGroup::as_str).collect();
    let current = config.unit_group_or_default()?;
    let start = UnitGroup::all().iter().position(|u| *u == current).unwrap_or(0);
    let unit = Select::new("Default unit group:", units)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read unit group")?;
    config.unit_group = Some(unit.to_string());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn fetch(query: &QueryArgs) -> anyhow::Result<WeatherStore> {
    let config = Config::load()?;
    let request = query.to_request(&config)?;
    debug!("Fetching {request:?}");

    let mut store = WeatherStore::from_config(&config);
    store
        .fetch_weather_data(&request)
        .await
        .with_context(|| format!("Failed to fetch weather for '{}'", query.location))?;
    Ok(store)
}

fn print_summary(store: &WeatherStore, hourly: bool) -> anyhow::Result<()> {
    if let Some(Value::String(address)) = store.get_resolved_address() {
        println!("{address}");
    }

    for day in store.get_daily_data(None) {
        println!(
            "{}  {:>6} / {:>6}  {}",
            text(&day, "datetime"),
            text(&day, "tempmin"),
            text(&day, "tempmax"),
            text(&day, "conditions"),
        );

        if hourly {
            let hours = day.get("hours").and_then(Value::as_array).cloned().unwrap_or_default();
            for hour in hours.iter().filter_map(Value::as_object) {
                println!(
                    "    {}  {:>6}  {}",
                    text(hour, "datetime"),
                    text(hour, "temp"),
                    text(hour, "conditions"),
                );
            }
        }
    }

    Ok(())
}

fn text(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
