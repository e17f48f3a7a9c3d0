//! Prompts for the language model that narrates the day.

use std::fmt::{Display, Formatter};

use bon::Builder;

use crate::core::DailySummary;

/// Instruction prompt for the daily summary message.
#[must_use]
#[derive(Builder)]
pub struct DailyPrompt<'a> {
    #[builder(into)]
    customer_context: String,

    #[builder(into, default = "local".to_owned())]
    data_source: String,

    #[builder(into, default = "recent".to_owned())]
    requested_date: String,

    summary: &'a DailySummary,
}

impl Display for DailyPrompt<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let summary_json = serde_json::to_string(self.summary).map_err(|_| std::fmt::Error)?;
        writeln!(
            f,
            "You are an assistant that writes short, friendly and funny daily energy summaries \
             for a solar+battery system."
        )?;
        writeln!(
            f,
            "Use the provided data to highlight what was interesting about the day. \
             Do not use all the data, just the most interesting bits."
        )?;
        writeln!(f)?;
        writeln!(f, "CUSTOMER: {}", self.customer_context)?;
        writeln!(f, "DATA INFO: Using {} data for {}", self.data_source, self.requested_date)?;
        writeln!(f, "For example:")?;
        for topic in TOPICS {
            writeln!(f, "- {topic}")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "At the end include how many sun hours are expected tomorrow \
             and how it will impact the energy consumption and prices."
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Make the summary 1-3 sentences long, include as many emojis as possible, \
             and keep it positive and easy to understand. Please use units and include quantity where possible."
        )?;
        writeln!(
            f,
            "Make it as fun as you can! Be aware that you are sending text messages on the phone, \
             so use appropriate formatting."
        )?;
        writeln!(f)?;
        writeln!(f, "Here is the data:")?;
        writeln!(f, "{summary_json}")?;
        writeln!(f)?;
        write!(
            f,
            "Now write a natural-language summary and just return the summary text, \
             without any extra commentary."
        )
    }
}

const TOPICS: [&str; 8] = [
    "how sunny it was",
    "the sunniest hour",
    "when the peak price hour was and the cheapest price hour, \
     and explain if the battery charged/discharged smartly to save money",
    "how the battery was used (charging/discharging and SOC swings)",
    "how much money was saved or earned",
    "how much energy was self-consumed versus exported",
    "grid dependence percentage",
    "CO2 only if asked, not in the initial summary",
];

/// Plain summary for when the language model is unavailable.
#[must_use]
pub fn fallback_message(summary: &DailySummary) -> String {
    format!(
        "🔆 Solar: {}, used: {}, exported: {}. \
         🔋 Battery charged: {}, discharged: {}. \
         ⚡ Grid import: {}, savings: {}. \
         ☀️ Tomorrow: {} of sunshine.",
        summary.total_solar,
        summary.solar_self_consumed,
        summary.solar_exported,
        summary.battery_charged,
        summary.battery_discharged,
        summary.grid_import,
        summary.savings_total,
        summary.sun_hours_tomorrow,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::fixtures::reference_day, prelude::*, quantity::time::Hours};

    fn summary() -> Result<DailySummary> {
        Ok(DailySummary::builder().records(&reference_day()).sun_hours_tomorrow(Hours(6.54)).build()?)
    }

    #[test]
    fn test_daily_prompt_embeds_summary() -> Result {
        let summary = summary()?;
        let prompt = DailyPrompt::builder()
            .customer_context("Customer: Unknown | ID: demo")
            .requested_date("2025-09-27")
            .summary(&summary)
            .build()
            .to_string();
        assert!(prompt.contains("CUSTOMER: Customer: Unknown | ID: demo\n"));
        assert!(prompt.contains("DATA INFO: Using local data for 2025-09-27\n"));
        assert!(prompt.contains(r#""total_solar":90.0"#));
        assert!(prompt.ends_with("without any extra commentary."));
        Ok(())
    }

    #[test]
    fn test_fallback_message() -> Result {
        let message = fallback_message(&summary()?);
        assert_eq!(
            message,
            "🔆 Solar: 90.0 kWh, used: 63.0 kWh, exported: 27.0 kWh. \
             🔋 Battery charged: 18.0 kWh, discharged: 6.0 kWh. \
             ⚡ Grid import: 69.0 kWh, savings: 19.20 €. \
             ☀️ Tomorrow: 6.5 h of sunshine.",
        );
        Ok(())
    }
}
