pub mod timestamp;

use std::fmt::{Display, Formatter};

use bon::Builder;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    core::error::InvalidInput,
    quantity::{currency::Euros, energy::KilowattHours, price::KilowattHourPrice},
};

/// Column of the hourly table as named by the optimizer export.
#[derive(Debug, EnumSetType)]
pub enum Column {
    Timestamp,
    PvProfile,
    PvUtilized,
    PvToGrid,
    PvToBattery,
    GridToBattery,
    BatteryToLoad,
    BatteryToGrid,
    GridImport,
    GridExport,
    GrossLoad,
    NetLoad,
    ImportPrice,
    ExportPrice,
    Savings,
    FeedInRevenueDelta,
    ArbitrageSavings,
    SelfConsumptionSavings,
    StateOfCharge,
}

impl Column {
    /// Every column must be present in every row.
    #[must_use]
    pub fn required() -> EnumSet<Self> {
        EnumSet::all()
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::PvProfile => "pv_profile",
            Self::PvUtilized => "pv_utilized_kw_opt",
            Self::PvToGrid => "pv_to_grid_kw_opt",
            Self::PvToBattery => "pv_to_battery_kw_opt",
            Self::GridToBattery => "grid_to_battery_kw_opt",
            Self::BatteryToLoad => "battery_to_load_kw_opt",
            Self::BatteryToGrid => "battery_to_grid_kw_opt",
            Self::GridImport => "grid_import_kw_opt",
            Self::GridExport => "grid_export_kw_opt",
            Self::GrossLoad => "gross_load",
            Self::NetLoad => "net_load",
            Self::ImportPrice => "foreign_power_costs",
            Self::ExportPrice => "feed_in_tariff_hourly",
            Self::Savings => "electricity_savings_step",
            Self::FeedInRevenueDelta => "feed_in_revenue_delta_step",
            Self::ArbitrageSavings => "electricity_savings_arbitrage_step",
            Self::SelfConsumptionSavings => "electricity_savings_pv_self_consumption_step",
            Self::StateOfCharge => "SOC_opt",
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One hour of the pre-computed optimization result.
///
/// Flows are hourly averages in kilowatts, which over a one-hour step equal kilowatt-hours.
#[must_use]
#[derive(Copy, Clone, Debug, Builder, Deserialize, Serialize)]
pub struct HourlyRecord {
    /// Start of the hour, with the offset of the source.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<FixedOffset>,

    /// Gross PV generation.
    #[serde(rename = "pv_profile")]
    #[builder(default)]
    pub pv_production: KilowattHours,

    /// PV consumed directly or via the battery.
    #[serde(rename = "pv_utilized_kw_opt")]
    #[builder(default)]
    pub pv_self_consumed: KilowattHours,

    #[serde(rename = "pv_to_grid_kw_opt")]
    #[builder(default)]
    pub pv_to_grid: KilowattHours,

    #[serde(rename = "pv_to_battery_kw_opt")]
    #[builder(default)]
    pub pv_to_battery: KilowattHours,

    #[serde(rename = "grid_to_battery_kw_opt")]
    #[builder(default)]
    pub grid_to_battery: KilowattHours,

    #[serde(rename = "battery_to_load_kw_opt")]
    #[builder(default)]
    pub battery_to_load: KilowattHours,

    #[serde(rename = "battery_to_grid_kw_opt")]
    #[builder(default)]
    pub battery_to_grid: KilowattHours,

    #[serde(rename = "grid_import_kw_opt")]
    #[builder(default)]
    pub grid_import: KilowattHours,

    #[serde(rename = "grid_export_kw_opt")]
    #[builder(default)]
    pub grid_export: KilowattHours,

    /// Load before self-supply.
    #[builder(default)]
    pub gross_load: KilowattHours,

    /// Load after self-supply.
    #[builder(default)]
    pub net_load: KilowattHours,

    /// Spot import price.
    #[serde(rename = "foreign_power_costs")]
    #[builder(default)]
    pub import_price: KilowattHourPrice,

    /// Feed-in tariff.
    #[serde(rename = "feed_in_tariff_hourly")]
    #[builder(default)]
    pub export_price: KilowattHourPrice,

    #[serde(rename = "electricity_savings_step")]
    #[builder(default)]
    pub savings: Euros,

    #[serde(rename = "feed_in_revenue_delta_step")]
    #[builder(default)]
    pub feed_in_revenue_delta: Euros,

    #[serde(rename = "electricity_savings_arbitrage_step")]
    #[builder(default)]
    pub arbitrage_savings: Euros,

    #[serde(rename = "electricity_savings_pv_self_consumption_step")]
    #[builder(default)]
    pub self_consumption_savings: Euros,

    /// State of charge at the end of the hour, `0..=1`.
    #[serde(rename = "SOC_opt")]
    #[builder(default)]
    pub state_of_charge: f64,
}

impl HourlyRecord {
    /// Decode a raw row, naming the first column that is missing or malformed.
    pub fn try_from_row(row: usize, object: Map<String, Value>) -> Result<Self, InvalidInput> {
        for column in Column::required() {
            let value = object
                .get(column.name())
                .ok_or(InvalidInput::MissingColumn { column, row })?;
            match (column, value) {
                (Column::Timestamp, Value::String(text)) => {
                    if timestamp::parse(text).is_none() {
                        return Err(InvalidInput::Malformed {
                            column,
                            row,
                            reason: format!("unrecognized timestamp `{text}`"),
                        });
                    }
                }
                (Column::Timestamp, Value::Number(_)) => {}
                (Column::Timestamp, other) => {
                    return Err(InvalidInput::Malformed {
                        column,
                        row,
                        reason: format!("expected a string or epoch milliseconds, got `{other}`"),
                    });
                }
                // Pandas exports `NaN` as `null`:
                (_, Value::Null) => return Err(InvalidInput::NotFinite { column, row }),
                (_, Value::Number(_)) => {}
                (_, other) => {
                    return Err(InvalidInput::Malformed {
                        column,
                        row,
                        reason: format!("expected a number, got `{other}`"),
                    });
                }
            }
        }

        // Extra columns such as `pv_surplus` are ignored by the decoder:
        serde_json::from_value(Value::Object(object)).map_err(|error| InvalidInput::Malformed {
            column: Column::Timestamp,
            row,
            reason: error.to_string(),
        })
    }

    /// Start of the hour on the wall clock of the source.
    #[must_use]
    pub fn wall_clock(&self) -> NaiveDateTime {
        self.timestamp.naive_local()
    }

    /// Numeric value of the column, `None` for the timestamp.
    #[must_use]
    pub const fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Timestamp => None,
            Column::PvProfile => Some(self.pv_production.0),
            Column::PvUtilized => Some(self.pv_self_consumed.0),
            Column::PvToGrid => Some(self.pv_to_grid.0),
            Column::PvToBattery => Some(self.pv_to_battery.0),
            Column::GridToBattery => Some(self.grid_to_battery.0),
            Column::BatteryToLoad => Some(self.battery_to_load.0),
            Column::BatteryToGrid => Some(self.battery_to_grid.0),
            Column::GridImport => Some(self.grid_import.0),
            Column::GridExport => Some(self.grid_export.0),
            Column::GrossLoad => Some(self.gross_load.0),
            Column::NetLoad => Some(self.net_load.0),
            Column::ImportPrice => Some(self.import_price.0),
            Column::ExportPrice => Some(self.export_price.0),
            Column::Savings => Some(self.savings.0),
            Column::FeedInRevenueDelta => Some(self.feed_in_revenue_delta.0),
            Column::ArbitrageSavings => Some(self.arbitrage_savings.0),
            Column::SelfConsumptionSavings => Some(self.self_consumption_savings.0),
            Column::StateOfCharge => Some(self.state_of_charge),
        }
    }

    /// Ensure that every numeric column holds a finite value.
    pub fn check_finite(&self, row: usize) -> Result<(), InvalidInput> {
        match Column::required()
            .iter()
            .find(|column| self.value(*column).is_some_and(|value| !value.is_finite()))
        {
            Some(column) => Err(InvalidInput::NotFinite { column, row }),
            None => Ok(()),
        }
    }

    /// Clamp floating-point noise on the energy flows to exact zero.
    ///
    /// Prices, savings, and the state of charge are left untouched.
    pub fn sanitized(mut self, epsilon: f64) -> Self {
        for flow in [
            &mut self.pv_production,
            &mut self.pv_self_consumed,
            &mut self.pv_to_grid,
            &mut self.pv_to_battery,
            &mut self.grid_to_battery,
            &mut self.battery_to_load,
            &mut self.battery_to_grid,
            &mut self.grid_import,
            &mut self.grid_export,
            &mut self.gross_load,
            &mut self.net_load,
        ] {
            *flow = flow.denoised(epsilon);
        }
        self
    }

    /// Total battery charging power from any source.
    pub fn battery_charge(&self) -> KilowattHours {
        self.pv_to_battery + self.grid_to_battery
    }

    /// Total battery discharging power to any sink.
    pub fn battery_discharge(&self) -> KilowattHours {
        self.battery_to_load + self.battery_to_grid
    }

    /// Load covered on-site, either by PV or by the battery.
    pub fn self_supplied(&self) -> KilowattHours {
        self.pv_self_consumed + self.battery_to_load
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::core::fixtures::hour;

    fn row() -> Map<String, Value> {
        let mut row = Map::new();
        for column in Column::required() {
            row.insert(column.name().to_owned(), json!(1.5));
        }
        row.insert(Column::Timestamp.name().to_owned(), json!("2025-09-27 13:00:00"));
        row.insert("pv_surplus".to_owned(), json!(0.0));
        row
    }

    #[test]
    fn test_try_from_row_ok() -> Result<(), InvalidInput> {
        let record = HourlyRecord::try_from_row(0, row())?;
        assert_eq!(
            record.wall_clock(),
            NaiveDate::from_ymd_opt(2025, 9, 27).unwrap().and_hms_opt(13, 0, 0).unwrap()
        );
        assert_abs_diff_eq!(record.import_price.0, 1.5);
        assert_abs_diff_eq!(record.state_of_charge, 1.5);
        Ok(())
    }

    #[test]
    fn test_try_from_row_missing_column() {
        let mut row = row();
        row.remove("SOC_opt");
        let error = HourlyRecord::try_from_row(3, row).unwrap_err();
        assert!(matches!(
            error,
            InvalidInput::MissingColumn { column: Column::StateOfCharge, row: 3 }
        ));
        assert!(error.to_string().contains("SOC_opt"));
    }

    #[test]
    fn test_try_from_row_null_is_not_finite() {
        let mut row = row();
        row.insert("gross_load".to_owned(), Value::Null);
        assert!(matches!(
            HourlyRecord::try_from_row(0, row),
            Err(InvalidInput::NotFinite { column: Column::GrossLoad, row: 0 })
        ));
    }

    #[test]
    fn test_try_from_row_text_instead_of_number() {
        let mut row = row();
        row.insert("feed_in_tariff_hourly".to_owned(), json!("cheap"));
        assert!(matches!(
            HourlyRecord::try_from_row(0, row),
            Err(InvalidInput::Malformed { column: Column::ExportPrice, .. })
        ));
    }

    #[test]
    fn test_try_from_row_bad_timestamp() {
        let mut row = row();
        row.insert("timestamp".to_owned(), json!("noon"));
        assert!(matches!(
            HourlyRecord::try_from_row(0, row),
            Err(InvalidInput::Malformed { column: Column::Timestamp, .. })
        ));
    }

    #[test]
    fn test_sanitized_only_touches_flows() {
        let record = HourlyRecord::builder()
            .timestamp(hour(0))
            .pv_production(KilowattHours(1e-9))
            .grid_import(KilowattHours(-1e-8))
            .gross_load(KilowattHours(2.0))
            .import_price(KilowattHourPrice(1e-9))
            .state_of_charge(1e-9)
            .build()
            .sanitized(1e-6);
        assert_eq!(record.pv_production, KilowattHours::ZERO);
        assert_eq!(record.grid_import, KilowattHours::ZERO);
        assert_eq!(record.gross_load, KilowattHours(2.0));
        assert_abs_diff_eq!(record.import_price.0, 1e-9);
        assert_abs_diff_eq!(record.state_of_charge, 1e-9);
    }

    #[test]
    fn test_check_finite() {
        let record = HourlyRecord::builder()
            .timestamp(hour(0))
            .export_price(KilowattHourPrice(f64::NAN))
            .build();
        assert!(matches!(
            record.check_finite(7),
            Err(InvalidInput::NotFinite { column: Column::ExportPrice, row: 7 })
        ));
    }
}
