use chrono::Local;
use clap::Parser;
use itertools::Itertools;

use crate::{
    api::{Client, records::BillingType},
    cli::api::ApiArgs,
    core::history::HistoryEntry,
    prelude::*,
    tables::build_history_table,
};

async fn fetch_history(client: &Client) -> Result<Vec<HistoryEntry>> {
    let today = Local::now().date_naive();
    Ok(client
        .history()
        .await?
        .into_iter()
        .map(|record| HistoryEntry::from_record(record, today))
        .collect())
}

#[derive(Parser)]
pub struct HistoryArgs {
    #[clap(flatten)]
    api: ApiArgs,
}

impl HistoryArgs {
    pub async fn run(self) -> Result {
        let entries = fetch_history(&self.api.new_client()?).await?;
        if entries.is_empty() {
            println!("Device history is empty.");
        } else {
            println!("{}", build_history_table(&entries));
        }
        Ok(())
    }
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    #[clap(flatten)]
    api: ApiArgs,

    /// History entry IDs to analyze. All entries by default.
    ids: Vec<String>,

    /// House power capacity, for example `1.300 VA`.
    #[clap(long, env = "ENERTRACK_CAPACITY")]
    capacity: Option<String>,

    #[clap(long = "billing-type", value_enum, default_value_t)]
    billing_type: BillingType,
}

impl AnalyzeArgs {
    pub async fn run(self) -> Result {
        let capacity = self
            .capacity
            .filter(|capacity| !capacity.trim().is_empty())
            .context("select the house power capacity first")?;
        let client = self.api.new_client()?;
        let entries = fetch_history(&client).await?;

        let selected = if self.ids.is_empty() {
            entries
        } else {
            let unknown_ids = self
                .ids
                .iter()
                .filter(|id| !entries.iter().any(|entry| entry.id.to_string() == **id))
                .collect_vec();
            ensure!(unknown_ids.is_empty(), "unknown history entries: {unknown_ids:?}");
            self.ids
                .iter()
                .filter_map(|id| entries.iter().find(|entry| entry.id.to_string() == *id))
                .cloned()
                .collect()
        };
        ensure!(!selected.is_empty(), "select at least one appliance to analyze");

        let devices = selected
            .iter()
            .map(|entry| entry.to_device(self.billing_type, &capacity))
            .collect_vec();
        let analysis = client.analyze(&devices, &capacity).await?;
        info!(
            id_submit = ?analysis.id_submit,
            total_power_wh = analysis.total_power_wh,
            daily_kwh = analysis.daily_kwh,
            monthly_kwh = analysis.monthly_kwh,
            tariff_rate = analysis.tariff_rate,
            "analyzed",
        );
        if let Some(estimate) = &analysis.estimated_monthly_rp {
            println!("Estimated monthly cost: {estimate}");
        }
        println!("{}", analysis.ai_response.as_deref().unwrap_or("No AI response available."));
        Ok(())
    }
}
