//! Loader of the hourly optimization table.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{core::HourlyRecord, prelude::*};

/// Provenance of the hourly table as reported by the energy-data API.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct Metadata {
    #[serde(default = "Metadata::default_source")]
    pub source: String,

    #[serde(default = "Metadata::default_requested_date")]
    pub requested_date: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self { source: Self::default_source(), requested_date: Self::default_requested_date() }
    }
}

impl Metadata {
    fn default_source() -> String {
        "local".to_owned()
    }

    fn default_requested_date() -> String {
        "recent".to_owned()
    }
}

/// Either the API response envelope or a bare array of rows, as dumped by pandas.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTable {
    Envelope {
        data: Vec<Map<String, Value>>,

        #[serde(default)]
        metadata: Metadata,
    },
    Rows(Vec<Map<String, Value>>),
}

/// Hourly table ready for the summary.
#[must_use]
#[derive(Clone, Debug)]
pub struct EnergyData {
    pub records: Vec<HourlyRecord>,
    pub metadata: Metadata,
}

impl EnergyData {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("loading…");
        let contents =
            fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
        let data = Self::from_slice(&contents)
            .with_context(|| format!("failed to load the hourly table from `{}`", path.display()))?;
        info!(n_records = data.records.len(), source = %data.metadata.source, "loaded");
        Ok(data)
    }

    pub fn from_slice(contents: &[u8]) -> Result<Self> {
        let (rows, metadata) = match serde_json::from_slice::<RawTable>(contents)
            .context("expected an array of rows or an object with `data`")?
        {
            RawTable::Envelope { data, metadata } => (data, metadata),
            RawTable::Rows(rows) => (rows, Metadata::default()),
        };
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row, object)| HourlyRecord::try_from_row(row, object))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(n_records = records.len(), "decoded");
        Ok(Self { records, metadata })
    }
}
