//! Reference day used across the tests.
//!
//! - PV yields 10 kWh per hour from 08:00 till 16:00 and nothing otherwise.
//! - The load is a flat 5 kWh per hour.
//! - Import costs 0.30 €/kWh, except 18:00–20:00 at 0.50 €/kWh; export pays 0.10 €/kWh.
//! - The battery charges 2 kWh per hour from PV while the sun shines, and discharges
//!   2 kWh per hour to the load in the expensive hours.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::{
    core::record::HourlyRecord,
    quantity::{currency::Euros, energy::KilowattHours, price::KilowattHourPrice},
};

pub fn hour(hour: u32) -> DateTime<FixedOffset> {
    NaiveDate::from_ymd_opt(2025, 9, 27)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
        .fixed_offset()
}

pub fn reference_day() -> Vec<HourlyRecord> {
    (0..24).map(reference_hour).collect()
}

fn reference_hour(hour_of_day: u32) -> HourlyRecord {
    let is_sunny = (8..=16).contains(&hour_of_day);
    let is_expensive = (18..=20).contains(&hour_of_day);
    let import_price = KilowattHourPrice(if is_expensive { 0.50 } else { 0.30 });
    let state_of_charge = match hour_of_day {
        0..=7 => 1.0,
        8..=16 => f64::from(hour_of_day - 6),
        17 => 10.0,
        18..=20 => f64::from(27 - hour_of_day),
        _ => 7.0,
    } / 10.0;

    let builder = HourlyRecord::builder()
        .timestamp(hour(hour_of_day))
        .gross_load(KilowattHours(5.0))
        .import_price(import_price)
        .export_price(KilowattHourPrice(0.10))
        .state_of_charge(state_of_charge);

    if is_sunny {
        builder
            .pv_production(KilowattHours(10.0))
            .pv_self_consumed(KilowattHours(7.0))
            .pv_to_battery(KilowattHours(2.0))
            .pv_to_grid(KilowattHours(3.0))
            .grid_export(KilowattHours(3.0))
            .savings(Euros(1.5))
            .self_consumption_savings(Euros(1.5))
            .feed_in_revenue_delta(Euros(0.3))
            .build()
    } else if is_expensive {
        builder
            .battery_to_load(KilowattHours(2.0))
            .grid_import(KilowattHours(3.0))
            .net_load(KilowattHours(3.0))
            .savings(Euros(1.0))
            .arbitrage_savings(Euros(1.0))
            .build()
    } else {
        builder.grid_import(KilowattHours(5.0)).net_load(KilowattHours(5.0)).build()
    }
}
