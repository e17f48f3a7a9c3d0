use average::Mean;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{ActivityWindow, DailySummary, HourlyRecord},
    quantity::{currency::Euros, energy::KilowattHours, price::KilowattHourPrice},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn energy_cell(energy: KilowattHours, color: Color) -> Cell {
    let cell = Cell::new(energy).set_alignment(CellAlignment::Right);
    if energy == KilowattHours::ZERO { cell.add_attribute(Attribute::Dim) } else { cell.fg(color) }
}

fn percent_cell(percent: f64) -> Cell {
    Cell::new(format!("{percent:.1} %")).set_alignment(CellAlignment::Right)
}

#[allow(clippy::too_many_lines)]
pub fn build_summary_table(summary: &DailySummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value", "Note"]);
    table.add_row(vec![
        Cell::new("Solar"),
        energy_cell(summary.total_solar, Color::Yellow),
        Cell::new(format!("sunniest at {}", summary.sunniest_hour)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Self-consumed"),
        energy_cell(summary.solar_self_consumed, Color::Green),
        Cell::new(format!("{:.1} % coverage", summary.solar_coverage_pct)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Exported"),
        energy_cell(summary.solar_exported, Color::DarkYellow),
        Cell::new(format!("{:.1} % of solar", summary.export_ratio_pct)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Battery charged"),
        energy_cell(summary.battery_charged, Color::Green),
        Cell::new(format!(
            "{} solar, {} grid",
            summary.battery_charged_from_solar, summary.battery_charged_from_grid,
        ))
        .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Battery discharged"),
        energy_cell(summary.battery_discharged, Color::Blue),
        Cell::new(format!(
            "{} to load, {} to grid",
            summary.battery_discharged_to_load, summary.battery_discharged_to_grid,
        ))
        .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Grid import"),
        energy_cell(summary.grid_import, Color::Red),
        Cell::new(format!("{:.1} % dependence", summary.grid_dependence_pct)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Grid export"),
        energy_cell(summary.grid_export, Color::Green),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Load"),
        Cell::new(summary.total_load).set_alignment(CellAlignment::Right),
        Cell::new(format!("{} net", summary.net_load)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Autonomy"),
        Cell::new(format!("{} h", summary.autonomy_hours)).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.1} % of peak covered", summary.peak_window_coverage_pct))
            .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Peak price"),
        Cell::new(summary.peak_price).set_alignment(CellAlignment::Right).fg(Color::Red),
        Cell::new(format!("at {}", summary.peak_price_time)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Cheapest price"),
        Cell::new(summary.cheap_price).set_alignment(CellAlignment::Right).fg(Color::Green),
        Cell::new(format!("at {}", summary.cheap_price_time)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Paid price"),
        Cell::new(summary.weighted_import_price).set_alignment(CellAlignment::Right),
        Cell::new(format!(
            "{:.1} % discount on market {}",
            summary.effective_price_delta_pct, summary.weighted_market_price,
        ))
        .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Import cost"),
        Cell::new(summary.import_cost).set_alignment(CellAlignment::Right),
        Cell::new(format!("{} export revenue", summary.export_revenue)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Savings"),
        Cell::new(summary.savings_total)
            .set_alignment(CellAlignment::Right)
            .fg(if summary.savings_total >= Euros::ONE_CENT { Color::Green } else { Color::Red }),
        Cell::new(format!(
            "{:.1} % arbitrage, {:.1} % solar",
            summary.savings_arbitrage_share_pct, summary.savings_pv_share_pct,
        ))
        .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Net cashflow"),
        Cell::new(summary.net_energy_cashflow).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Battery share"),
        percent_cell(summary.battery_contribution_pct),
        Cell::new(format!("{} via battery from solar", summary.pv_via_battery_to_load))
            .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("State of charge"),
        Cell::new(format!("{:.0} % to {:.0} %", summary.soc_min * 100.0, summary.soc_max * 100.0))
            .set_alignment(CellAlignment::Right),
        Cell::new(format!("min at {}, max at {}", summary.soc_min_time, summary.soc_max_time))
            .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("CO₂ saved"),
        Cell::new(summary.co2_saved).set_alignment(CellAlignment::Right).fg(Color::Green),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Sunshine"),
        Cell::new(summary.sun_hours_today).set_alignment(CellAlignment::Right),
        Cell::new(format!("{} tomorrow", summary.sun_hours_tomorrow)).add_attribute(Attribute::Dim),
    ]);
    table
}

pub fn build_windows_table(title: &str, windows: &[ActivityWindow], color: Color) -> Table {
    let mut table = new_table();
    table.set_header(vec![title, "Start", "End", "Energy"]);
    for (i, window) in windows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).add_attribute(Attribute::Dim),
            Cell::new(window.start()),
            Cell::new(window.end()),
            Cell::new(window.energy()).set_alignment(CellAlignment::Right).fg(color),
        ]);
    }
    table
}

pub fn build_hourly_table(records: &[HourlyRecord]) -> Table {
    let mean_price: KilowattHourPrice = {
        let estimate: Mean = records.iter().map(|record| record.import_price.0).collect();
        if estimate.is_empty() { KilowattHourPrice::ZERO } else { estimate.mean().into() }
    };

    let mut table = new_table();
    table.set_header(vec![
        "Date", "Time", "Price", "Solar", "Load", "Charge", "Discharge", "Import", "Export", "SoC",
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.wall_clock().format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(record.wall_clock().format("%H:%M")),
            Cell::new(record.import_price).fg(if record.import_price > mean_price {
                Color::Red
            } else {
                Color::Green
            }),
            energy_cell(record.pv_production, Color::Yellow),
            energy_cell(record.gross_load, Color::Reset),
            energy_cell(record.battery_charge(), Color::Green),
            energy_cell(record.battery_discharge(), Color::Blue),
            energy_cell(record.grid_import, Color::Red),
            energy_cell(record.grid_export, Color::DarkYellow),
            percent_cell(record.state_of_charge * 100.0),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InvalidInput, fixtures::reference_day};

    #[test]
    fn test_build_tables() -> Result<(), InvalidInput> {
        let records = reference_day();
        let summary = DailySummary::builder()
            .records(&records)
            .window_threshold(KilowattHours(1.0))
            .build()?;

        assert_eq!(build_summary_table(&summary).row_count(), 19);
        assert_eq!(build_hourly_table(&records).row_count(), 24);

        let windows = build_windows_table("Charge", &summary.charge_windows, Color::Green);
        assert_eq!(windows.row_count(), 1);
        assert!(windows.to_string().contains("08:00"));
        Ok(())
    }

    #[test]
    fn test_build_hourly_table_empty() {
        assert_eq!(build_hourly_table(&[]).row_count(), 0);
    }
}
