//! Customer directory backing the prompt context.

use std::{fs, path::Path};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[must_use]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Customer {
    /// Identifier of the site in the energy-data API.
    pub data_id: String,

    pub name: String,

    #[serde(default)]
    pub business_type: Option<String>,

    #[serde(default)]
    pub building_type: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    /// Free-form capacity description, for example the number of occupants.
    #[serde(default)]
    pub capacity_info: Option<String>,

    #[serde(default)]
    pub special_notes: Option<String>,
}

impl Customer {
    /// Drop any non-ASCII characters from the text fields.
    fn into_ascii(self) -> Self {
        fn strip(text: String) -> String {
            if text.is_ascii() { text } else { text.chars().filter(char::is_ascii).collect() }
        }
        Self {
            data_id: strip(self.data_id),
            name: strip(self.name),
            business_type: self.business_type.map(strip),
            building_type: self.building_type.map(strip),
            location: self.location.map(strip),
            capacity_info: self.capacity_info.map(strip),
            special_notes: self.special_notes.map(strip),
        }
    }

    /// One-line context for the language model.
    #[must_use]
    pub fn context(&self) -> String {
        let name = if self.name.is_empty() { "Unknown" } else { &self.name };
        let optional = [
            ("Business", &self.business_type),
            ("Building", &self.building_type),
            ("Location", &self.location),
            ("Details", &self.capacity_info),
            ("Notes", &self.special_notes),
        ];
        std::iter::once(format!("Customer: {name}"))
            .chain(optional.into_iter().filter_map(|(label, value)| {
                value.as_deref().filter(|value| !value.is_empty()).map(|value| format!("{label}: {value}"))
            }))
            .join(" | ")
    }
}

#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Directory(Vec<Customer>);

impl From<Vec<Customer>> for Directory {
    fn from(customers: Vec<Customer>) -> Self {
        Self(customers.into_iter().map(Customer::into_ascii).collect())
    }
}

impl Directory {
    /// Load the directory, falling back to an empty one when the file is unusable.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match Self::try_from_path(path.as_ref()) {
            Ok(directory) => {
                info!(n_customers = directory.0.len(), "loaded");
                directory
            }
            Err(error) => {
                warn!("customer directory is unavailable: {error:#}");
                Self::default()
            }
        }
    }

    fn try_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
        let customers: Vec<Customer> =
            serde_json::from_slice(&contents).context("failed to parse the customer list")?;
        Ok(customers.into())
    }

    pub fn get(&self, data_id: &str) -> Option<&Customer> {
        self.0.iter().find(|customer| customer.data_id == data_id)
    }

    /// Customer context line, or a placeholder naming the unknown identifier.
    #[must_use]
    pub fn context(&self, data_id: &str) -> String {
        self.get(data_id).map_or_else(
            || format!("Customer: Unknown | ID: {data_id}"),
            Customer::context,
        )
    }
}
