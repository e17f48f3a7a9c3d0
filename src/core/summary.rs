mod totals;

use bon::bon;
use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::Serialize;

pub use self::totals::Totals;
use crate::{
    core::{
        clock::ClockTime,
        error::InvalidInput,
        record::HourlyRecord,
        series::{Extremes, Quantile},
        window::{self, ActivityWindow},
    },
    quantity::{
        currency::Euros,
        energy::KilowattHours,
        mass::Kilograms,
        price::KilowattHourPrice,
        round_to,
        time::Hours,
    },
};

/// Prices at or above this quantile of the day form the peak window.
const PEAK_PRICE_QUANTILE: f64 = 0.75;

/// Descriptive KPIs of a single day of the hourly optimization result.
///
/// Field names are the JSON keys consumed by the prompt templates.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct DailySummary {
    /// Date of the first hour, on the wall clock of the source.
    pub date: NaiveDate,

    pub total_solar: KilowattHours,
    pub solar_self_consumed: KilowattHours,
    pub solar_exported: KilowattHours,
    pub battery_charged: KilowattHours,
    pub battery_charged_from_solar: KilowattHours,
    pub battery_charged_from_grid: KilowattHours,
    pub battery_discharged: KilowattHours,
    pub battery_discharged_to_load: KilowattHours,
    pub battery_discharged_to_grid: KilowattHours,
    pub grid_import: KilowattHours,
    pub grid_export: KilowattHours,
    pub total_load: KilowattHours,
    pub net_load: KilowattHours,

    pub savings_total: Euros,
    pub savings_arbitrage_share_pct: f64,
    pub savings_pv_share_pct: f64,

    #[serde(rename = "import_cost_eur")]
    pub import_cost: Euros,

    #[serde(rename = "export_revenue_eur")]
    pub export_revenue: Euros,

    /// Import cost minus export revenue minus savings.
    #[serde(rename = "net_energy_cashflow_eur")]
    pub net_energy_cashflow: Euros,

    /// Average price actually paid for the imported energy.
    pub weighted_import_price: KilowattHourPrice,

    /// Average market price over the load profile.
    pub weighted_market_price: KilowattHourPrice,

    /// Discount of the paid price relative to the market price of the load.
    pub effective_price_delta_pct: f64,

    pub peak_price_time: ClockTime,
    pub peak_price: KilowattHourPrice,
    pub cheap_price_time: ClockTime,
    pub cheap_price: KilowattHourPrice,
    pub sunniest_hour: ClockTime,

    pub solar_coverage_pct: f64,
    pub export_ratio_pct: f64,
    pub battery_contribution_pct: f64,
    pub grid_dependence_pct: f64,

    /// Number of hours without grid import.
    pub autonomy_hours: usize,

    pub direct_pv_to_load: KilowattHours,
    pub pv_via_battery_to_load: KilowattHours,
    pub peak_window_coverage_pct: f64,

    #[serde(rename = "co2_saved_kg")]
    pub co2_saved: Kilograms,

    pub busiest_charge_hour: ClockTime,
    pub busiest_discharge_hour: ClockTime,

    pub soc_min: f64,
    pub soc_min_time: ClockTime,
    pub soc_max: f64,
    pub soc_max_time: ClockTime,
    pub soc_swing: f64,

    pub charge_windows: Vec<ActivityWindow>,
    pub discharge_windows: Vec<ActivityWindow>,

    pub sun_hours_today: Hours,
    pub sun_hours_tomorrow: Hours,
}

#[bon]
impl DailySummary {
    /// Summarize the hourly records.
    ///
    /// The records must be non-empty and strictly ascending as instants. The reported times and
    /// the date are taken from the wall clock of the source.
    #[builder]
    pub fn new(
        records: &[HourlyRecord],

        /// Grid CO₂ intensity in kg/kWh.
        #[builder(default = 0.32)]
        co2_intensity: f64,

        /// Magnitudes at or below are treated as exact zero.
        #[builder(default = 1e-6)]
        epsilon: f64,

        /// Hourly charge or discharge must exceed this to count as activity.
        #[builder(default = KilowattHours(5.0))]
        window_threshold: KilowattHours,

        /// Forecast, passed through.
        #[builder(default)]
        sun_hours_today: Hours,

        /// Forecast, passed through.
        #[builder(default)]
        sun_hours_tomorrow: Hours,
    ) -> Result<Self, InvalidInput> {
        let first = records.first().ok_or(InvalidInput::Empty)?;
        for (row, record) in records.iter().enumerate() {
            record.check_finite(row)?;
        }
        // Compared as instants: the repeated hour of a DST fall-back is still ascending.
        if let Some(row) = records
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(InvalidInput::Unordered { row: row + 1 });
        }

        let records: Vec<HourlyRecord> =
            records.iter().map(|record| record.sanitized(epsilon)).collect();
        let totals: Totals = records.iter().collect();

        // Guarded ratio, reported in percent:
        let pct = |numerator: f64, denominator: f64| -> f64 {
            round_to(numerator / denominator.max(epsilon) * 100.0, 1)
        };

        let savings_share_pct = |part: Euros| -> f64 {
            if totals.savings.0.abs() > epsilon {
                round_to(part / totals.savings * 100.0, 1)
            } else {
                0.0
            }
        };

        let weighted_import_price =
            totals.import_cost / totals.grid_import.max(KilowattHours(epsilon));
        let weighted_market_price =
            totals.load_market_value / totals.gross_load.max(KilowattHours(epsilon));
        let effective_price_delta_pct = pct(
            weighted_market_price.0 - weighted_import_price.0,
            weighted_market_price.0,
        );

        let export_ratio_pct = if totals.pv_production.0 > epsilon {
            pct(totals.pv_to_grid.0, totals.pv_production.0)
        } else {
            0.0
        };

        let autonomy_hours =
            records.iter().filter(|record| record.grid_import.0 <= epsilon).count();

        let peak_window_coverage_pct = {
            let threshold = records
                .iter()
                .map(|record| record.import_price.0)
                .quantile(PEAK_PRICE_QUANTILE)
                .ok_or(InvalidInput::Empty)?;
            let (peak_load, peak_covered) = records
                .iter()
                .filter(|record| record.import_price.0 >= threshold)
                .fold((KilowattHours::ZERO, KilowattHours::ZERO), |(load, covered), record| {
                    (load + record.gross_load, covered + record.self_supplied())
                });
            pct(peak_covered.0, peak_load.0)
        };

        let time_of = |index: Option<usize>| -> Result<ClockTime, InvalidInput> {
            index
                .and_then(|index| records.get(index))
                .map(|record| ClockTime::from(record.wall_clock()))
                .ok_or(InvalidInput::Empty)
        };

        let import_prices = || records.iter().map(|record| record.import_price);
        let state_of_charge = || records.iter().map(|record| OrderedFloat(record.state_of_charge));
        let peak_index = import_prices().position_of_max();
        let cheap_index = import_prices().position_of_min();
        let soc_min_index = state_of_charge().position_of_min();
        let soc_max_index = state_of_charge().position_of_max();
        let soc_min = soc_min_index.map_or(0.0, |index| records[index].state_of_charge);
        let soc_max = soc_max_index.map_or(0.0, |index| records[index].state_of_charge);

        let charge_series =
            || records.iter().map(|record| (record.wall_clock(), record.battery_charge()));
        let discharge_series =
            || records.iter().map(|record| (record.wall_clock(), record.battery_discharge()));

        Ok(Self {
            date: first.wall_clock().date(),
            total_solar: totals.pv_production.rounded(),
            solar_self_consumed: totals.pv_self_consumed.rounded(),
            solar_exported: totals.pv_to_grid.rounded(),
            battery_charged: totals.battery_charged().rounded(),
            battery_charged_from_solar: totals.pv_to_battery.rounded(),
            battery_charged_from_grid: totals.grid_to_battery.rounded(),
            battery_discharged: totals.battery_discharged().rounded(),
            battery_discharged_to_load: totals.battery_to_load.rounded(),
            battery_discharged_to_grid: totals.battery_to_grid.rounded(),
            grid_import: totals.grid_import.rounded(),
            grid_export: totals.grid_export.rounded(),
            total_load: totals.gross_load.rounded(),
            net_load: totals.net_load.rounded(),
            savings_total: totals.savings.rounded(),
            savings_arbitrage_share_pct: savings_share_pct(totals.arbitrage_savings),
            savings_pv_share_pct: savings_share_pct(totals.self_consumption_savings),
            import_cost: totals.import_cost.rounded(),
            export_revenue: totals.export_revenue.rounded(),
            net_energy_cashflow: (totals.import_cost - totals.export_revenue - totals.savings)
                .rounded(),
            weighted_import_price: weighted_import_price.rounded(),
            weighted_market_price: weighted_market_price.rounded(),
            effective_price_delta_pct,
            peak_price_time: time_of(peak_index)?,
            peak_price: peak_index
                .map_or(KilowattHourPrice::ZERO, |index| records[index].import_price)
                .rounded(),
            cheap_price_time: time_of(cheap_index)?,
            cheap_price: cheap_index
                .map_or(KilowattHourPrice::ZERO, |index| records[index].import_price)
                .rounded(),
            sunniest_hour: time_of(
                records.iter().map(|record| record.pv_production).position_of_max(),
            )?,
            solar_coverage_pct: pct(totals.pv_self_consumed.0, totals.gross_load.0),
            export_ratio_pct,
            battery_contribution_pct: pct(totals.battery_discharged().0, totals.net_load.0),
            grid_dependence_pct: pct(totals.grid_import.0, totals.gross_load.0),
            autonomy_hours,
            direct_pv_to_load: totals.direct_pv_to_load().rounded(),
            pv_via_battery_to_load: totals.pv_via_battery_to_load(epsilon).rounded(),
            peak_window_coverage_pct,
            co2_saved: totals.avoided_grid_energy().co2_equivalent(co2_intensity).rounded(),
            busiest_charge_hour: time_of(
                records.iter().map(HourlyRecord::battery_charge).position_of_max(),
            )?,
            busiest_discharge_hour: time_of(
                records.iter().map(HourlyRecord::battery_discharge).position_of_max(),
            )?,
            soc_min: round_to(soc_min, 3),
            soc_min_time: time_of(soc_min_index)?,
            soc_max: round_to(soc_max, 3),
            soc_max_time: time_of(soc_max_index)?,
            soc_swing: round_to(soc_max - soc_min, 2),
            charge_windows: window::detect(charge_series(), window_threshold),
            discharge_windows: window::detect(discharge_series(), window_threshold),
            sun_hours_today,
            sun_hours_tomorrow,
        })
    }
}
