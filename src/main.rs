use battery_buddy::{
    cli::{Args, Command, Format, PromptArgs, SummarizeArgs, SummaryArgs},
    conversation::{ChatPrompt, History, Message, Reply, Role},
    core::{DailySummary, HourlyRecord, Status},
    customer::Directory,
    data::EnergyData,
    prelude::*,
    prompt::{DailyPrompt, fallback_message},
    tables::{build_hourly_table, build_summary_table, build_windows_table},
};
use clap::{Parser, crate_version};
use comfy_table::Color;

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();

    match args.command {
        Command::Summarize(args) => summarize(&args)?,
        Command::Status(args) => status(&EnergyData::from_path(&args.path)?)?,
        Command::Prompt(args) => prompt(&args)?,
    }

    info!("done!");
    Ok(())
}

fn build_summary(records: &[HourlyRecord], args: &SummaryArgs) -> Result<DailySummary> {
    DailySummary::builder()
        .records(records)
        .co2_intensity(args.co2_intensity)
        .epsilon(args.epsilon)
        .window_threshold(args.window_threshold)
        .sun_hours_today(args.sun_hours_today)
        .sun_hours_tomorrow(args.sun_hours_tomorrow)
        .build()
        .context("failed to summarize the day")
}

#[instrument(skip_all)]
fn summarize(args: &SummarizeArgs) -> Result {
    let data = EnergyData::from_path(&args.data.path)?;
    let summary = build_summary(&data.records, &args.summary)?;
    info!(
        date = %summary.date,
        n_charge_windows = summary.charge_windows.len(),
        n_discharge_windows = summary.discharge_windows.len(),
        "summarized",
    );

    match args.format {
        Format::Table => {
            if args.hourly {
                println!("{}", build_hourly_table(&data.records));
            }
            println!("{}", build_summary_table(&summary));
            println!("{}", build_windows_table("Charge", &summary.charge_windows, Color::Green));
            println!("{}", build_windows_table("Discharge", &summary.discharge_windows, Color::Blue));
        }
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Format::Message => {
            println!("{}", fallback_message(&summary));
        }
    }
    Ok(())
}

#[instrument(skip_all)]
fn status(data: &EnergyData) -> Result {
    let Some(status) = Status::latest(&data.records) else {
        bail!("the hourly table is empty");
    };
    println!(
        "🔋 {:.1} % at {}, ⚡ now {} (peak {}), 🔆 {} today, 💰 {} saved",
        status.state_of_charge_pct(),
        status.time,
        status.current_price,
        status.peak_price,
        status.pv_production,
        status.savings,
    );
    Ok(())
}

#[instrument(skip_all, fields(data_id = %args.customer.data_id))]
fn prompt(args: &PromptArgs) -> Result {
    let data = EnergyData::from_path(&args.data.path)?;
    let summary = build_summary(&data.records, &args.summary)?;
    let daily_prompt = || {
        let customer_context =
            Directory::from_path(&args.customer.customers_path).context(&args.customer.data_id);
        DailyPrompt::builder()
            .customer_context(customer_context)
            .data_source(&data.metadata.source)
            .requested_date(&data.metadata.requested_date)
            .summary(&summary)
            .build()
            .to_string()
    };
    match (&args.message, &args.reply) {
        (None, _) => {
            println!("{}", daily_prompt());
        }
        (Some(message), None) => {
            let history = History::default();
            let prompt =
                ChatPrompt::builder().history(&history).user_message(message).summary(&summary).build();
            println!("{prompt}");
        }
        (Some(message), Some(reply)) => match Reply::parse(reply.as_str()) {
            Reply::GenerateDailySummary => {
                info!("the model requested the daily summary");
                println!("{}", daily_prompt());
            }
            Reply::Text(text) => {
                let mut history = History::default();
                history.push(Message::now(Role::User, message.as_str()));
                history.push(Message::now(Role::Assistant, text));
                println!("{history}");
            }
        },
    }
    Ok(())
}
