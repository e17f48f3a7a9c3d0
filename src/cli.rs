use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::quantity::{energy::KilowattHours, time::Hours};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Summarize the day: totals, prices, savings, and battery activity windows.
    #[clap(name = "summarize")]
    Summarize(Box<SummarizeArgs>),

    /// Show the latest hour of the table.
    #[clap(name = "status")]
    Status(Box<DataArgs>),

    /// Print the language-model prompt for the configured customer.
    #[clap(name = "prompt")]
    Prompt(Box<PromptArgs>),
}

#[derive(Copy, Clone, Parser)]
pub struct SummaryArgs {
    /// Grid CO₂ intensity used to estimate the avoided emissions.
    #[clap(long = "co2-intensity", default_value = "0.32", env = "CO2_INTENSITY_KG_PER_KWH")]
    pub co2_intensity: f64,

    /// Flows with a magnitude at or below are treated as exact zero.
    #[clap(long = "epsilon", default_value = "1e-6", env = "SUMMARY_EPSILON")]
    pub epsilon: f64,

    /// Hourly charge or discharge above which the hour counts towards an activity window.
    #[clap(
        long = "window-threshold",
        default_value = "5.0",
        env = "ACTIVITY_WINDOW_THRESHOLD_KWH"
    )]
    pub window_threshold: KilowattHours,

    /// Forecast sunshine duration for today.
    #[clap(long = "sun-hours-today", default_value = "0", env = "SUN_HOURS_TODAY")]
    pub sun_hours_today: Hours,

    /// Forecast sunshine duration for tomorrow.
    #[clap(long = "sun-hours-tomorrow", default_value = "0", env = "SUN_HOURS_TOMORROW")]
    pub sun_hours_tomorrow: Hours,
}

#[derive(Parser)]
pub struct DataArgs {
    /// Hourly optimization table: an array of rows, or an API response with `data` and `metadata`.
    #[clap(long = "data", default_value = "data/day1.json", env = "BATTERY_DATA_PATH")]
    pub path: PathBuf,
}

#[derive(Parser)]
pub struct CustomerArgs {
    /// Customer directory.
    #[clap(long = "customers", default_value = "customers.json", env = "CUSTOMERS_PATH")]
    pub customers_path: PathBuf,

    /// Site identifier in the energy-data API.
    #[clap(long = "data-id", env = "BATTERY_DATA_ID")]
    pub data_id: String,
}

#[derive(Copy, Clone, Default, ValueEnum)]
pub enum Format {
    /// Terminal tables.
    #[default]
    Table,

    /// Summary JSON, as passed to the language model.
    Json,

    /// Plain-text message used when the language model is unavailable.
    Message,
}

#[derive(Parser)]
pub struct SummarizeArgs {
    #[clap(flatten)]
    pub data: DataArgs,

    #[clap(flatten)]
    pub summary: SummaryArgs,

    #[clap(long = "format", value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Also print the hourly table.
    #[clap(long = "hourly")]
    pub hourly: bool,
}

#[derive(Parser)]
pub struct PromptArgs {
    #[clap(flatten)]
    pub data: DataArgs,

    #[clap(flatten)]
    pub summary: SummaryArgs,

    #[clap(flatten)]
    pub customer: CustomerArgs,

    /// Chat message: render the agentic chat prompt instead of the daily one.
    #[clap(long = "message")]
    pub message: Option<String>,

    /// Language-model reply to the chat message: print the daily prompt on a summary tool call,
    /// otherwise the resulting chat history.
    #[clap(long = "reply", requires = "message")]
    pub reply: Option<String>,
}
