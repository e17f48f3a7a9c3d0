use serde::Serialize;

use crate::{
    core::{clock::ClockTime, record::HourlyRecord},
    quantity::{currency::Euros, energy::KilowattHours, price::KilowattHourPrice},
};

/// Snapshot of the most recent hour together with a few day figures.
#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct Status {
    pub time: ClockTime,
    pub state_of_charge: f64,
    pub current_price: KilowattHourPrice,
    pub peak_price: KilowattHourPrice,
    pub pv_production: KilowattHours,
    pub savings: Euros,
}

impl Status {
    /// Build the snapshot from the records, `None` when there are none.
    pub fn latest(records: &[HourlyRecord]) -> Option<Self> {
        let last = records.last()?;
        Some(Self {
            time: ClockTime::from(last.wall_clock()),
            state_of_charge: last.state_of_charge,
            current_price: last.import_price,
            peak_price: records.iter().map(|record| record.import_price).max()?,
            pv_production: records.iter().map(|record| record.pv_production).sum(),
            savings: records.iter().map(|record| record.savings).sum(),
        })
    }

    /// State of charge in percent.
    #[must_use]
    pub fn state_of_charge_pct(&self) -> f64 {
        self.state_of_charge * 100.0
    }
}
