use derive_more::AddAssign;

use crate::{
    core::record::HourlyRecord,
    quantity::{currency::Euros, energy::KilowattHours},
};

/// Day totals of the energy flows and their price-weighted values.
#[must_use]
#[derive(Copy, Clone, Debug, Default, AddAssign)]
pub struct Totals {
    pub pv_production: KilowattHours,
    pub pv_self_consumed: KilowattHours,
    pub pv_to_grid: KilowattHours,
    pub pv_to_battery: KilowattHours,
    pub grid_to_battery: KilowattHours,
    pub battery_to_load: KilowattHours,
    pub battery_to_grid: KilowattHours,
    pub grid_import: KilowattHours,
    pub grid_export: KilowattHours,
    pub gross_load: KilowattHours,
    pub net_load: KilowattHours,

    /// Σ grid import × import price.
    pub import_cost: Euros,

    /// Σ grid export × export price.
    pub export_revenue: Euros,

    /// Σ gross load × import price: what the load would cost at market prices.
    pub load_market_value: Euros,

    /// Σ savings step + feed-in revenue delta.
    pub savings: Euros,

    pub arbitrage_savings: Euros,
    pub self_consumption_savings: Euros,
}

impl From<&HourlyRecord> for Totals {
    fn from(record: &HourlyRecord) -> Self {
        Self {
            pv_production: record.pv_production,
            pv_self_consumed: record.pv_self_consumed,
            pv_to_grid: record.pv_to_grid,
            pv_to_battery: record.pv_to_battery,
            grid_to_battery: record.grid_to_battery,
            battery_to_load: record.battery_to_load,
            battery_to_grid: record.battery_to_grid,
            grid_import: record.grid_import,
            grid_export: record.grid_export,
            gross_load: record.gross_load,
            net_load: record.net_load,
            import_cost: record.grid_import * record.import_price,
            export_revenue: record.grid_export * record.export_price,
            load_market_value: record.gross_load * record.import_price,
            savings: record.savings + record.feed_in_revenue_delta,
            arbitrage_savings: record.arbitrage_savings,
            self_consumption_savings: record.self_consumption_savings,
        }
    }
}

impl<'a> FromIterator<&'a HourlyRecord> for Totals {
    fn from_iter<T: IntoIterator<Item = &'a HourlyRecord>>(records: T) -> Self {
        records.into_iter().fold(Self::default(), |mut totals, record| {
            totals += Self::from(record);
            totals
        })
    }
}

impl Totals {
    pub fn battery_charged(&self) -> KilowattHours {
        self.pv_to_battery + self.grid_to_battery
    }

    pub fn battery_discharged(&self) -> KilowattHours {
        self.battery_to_load + self.battery_to_grid
    }

    /// Grid energy that was not drawn thanks to PV and the battery.
    pub fn avoided_grid_energy(&self) -> KilowattHours {
        self.pv_self_consumed + self.battery_to_load
    }

    /// Fraction of the battery charge that came from PV, `0` when nothing was charged.
    #[must_use]
    pub fn pv_charge_share(&self, epsilon: f64) -> f64 {
        let total_charge = self.battery_charged();
        if total_charge.0 > epsilon { self.pv_to_battery / total_charge } else { 0.0 }
    }

    /// Battery discharge to load attributed to PV-sourced charge.
    ///
    /// The battery is a fungible pool, so the provenance is a proportional estimate.
    pub fn pv_via_battery_to_load(&self, epsilon: f64) -> KilowattHours {
        self.battery_to_load * self.pv_charge_share(epsilon)
    }

    /// PV self-consumption that did not pass through the battery.
    pub fn direct_pv_to_load(&self) -> KilowattHours {
        (self.pv_self_consumed - self.pv_to_battery).max(KilowattHours::ZERO)
    }
}
