use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::{
    cli::api::ApiArgs,
    prelude::*,
    tables::{build_category_share_table, build_chart_table},
};

#[derive(Parser)]
pub struct StatisticsArgs {
    #[clap(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: StatisticsCommand,
}

#[derive(Subcommand)]
enum StatisticsCommand {
    /// Daily consumption of a week, Monday to Sunday.
    Weekly {
        /// Any date within the week. The backend picks the current week by default.
        #[clap(long)]
        date: Option<NaiveDate>,
    },

    /// Monthly consumption.
    Monthly,

    /// Consumption share per appliance category.
    Category,

    /// Dates of the first and the last recorded inputs.
    Range,
}

impl StatisticsArgs {
    pub async fn run(self) -> Result {
        let client = self.api.new_client()?;

        match self.command {
            StatisticsCommand::Weekly { date } => {
                println!("{}", build_chart_table(&client.weekly_statistics(date).await?));
            }
            StatisticsCommand::Monthly => {
                let points = client.monthly_statistics().await?;
                if points.is_empty() {
                    println!("No monthly data available.");
                } else {
                    println!("{}", build_chart_table(&points));
                }
            }
            StatisticsCommand::Category => {
                let shares = client.category_statistics().await?;
                if shares.is_empty() {
                    println!("No category data available.");
                } else {
                    println!("{}", build_category_share_table(&shares));
                }
            }
            StatisticsCommand::Range => {
                let range = client.data_range().await?;
                println!(
                    "{} … {}",
                    range.first_date.as_deref().unwrap_or("-"),
                    range.last_date.as_deref().unwrap_or("-"),
                );
            }
        }

        Ok(())
    }
}
