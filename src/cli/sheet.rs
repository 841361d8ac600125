use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    api::records::BillingType,
    cli::api::ApiArgs,
    core::worksheet::{ApplianceInput, Worksheet},
    prelude::*,
    quantity::{power::Watts, time::Hours},
    tables::{build_load_table, build_worksheet_table},
};

#[derive(Parser)]
pub struct SheetArgs {
    /// Worksheet file.
    #[clap(long = "worksheet", env = "ENERTRACK_WORKSHEET", default_value = "worksheet.toml")]
    path: PathBuf,

    #[command(subcommand)]
    command: SheetCommand,
}

#[derive(Subcommand)]
enum SheetCommand {
    /// Add an appliance.
    Add(ApplianceArgs),

    /// Replace an appliance, keeping its ID and position.
    Edit {
        id: u64,

        #[clap(flatten)]
        appliance: ApplianceArgs,
    },

    /// Remove an appliance.
    Remove { id: u64 },

    /// Show the appliances with their energy and cost estimates.
    Show,

    /// Select the house power capacity, or clear the selection.
    Capacity {
        /// For example: `1.300 VA`.
        capacity: Option<String>,
    },

    /// Select the billing type.
    Billing {
        #[clap(value_enum)]
        billing_type: BillingType,
    },

    /// Submit the appliances to the backend.
    Submit {
        #[clap(flatten)]
        api: ApiArgs,
    },

    /// Remove all appliances.
    Clear,
}

#[derive(Parser)]
struct ApplianceArgs {
    #[clap(long)]
    name: String,

    #[clap(long)]
    brand: String,

    #[clap(long = "category-id")]
    category_id: u32,

    #[clap(long = "category-name")]
    category_name: Option<String>,

    /// Power rating in watts.
    #[clap(long)]
    power: Watts,

    /// Daily usage in hours.
    #[clap(long)]
    usage: Hours,

    #[clap(long, default_value = "1")]
    quantity: u32,
}

impl From<ApplianceArgs> for ApplianceInput {
    fn from(args: ApplianceArgs) -> Self {
        Self::builder()
            .name(args.name)
            .brand(args.brand)
            .category_id(args.category_id)
            .maybe_category_name(args.category_name)
            .power(args.power)
            .daily_usage(args.usage)
            .quantity(args.quantity)
            .build()
    }
}

impl SheetArgs {
    pub async fn run(self) -> Result {
        let mut worksheet = Worksheet::read_from(&self.path)?;

        match self.command {
            SheetCommand::Add(appliance) => {
                let id = worksheet.add(appliance.into())?;
                info!(id, "added");
            }
            SheetCommand::Edit { id, appliance } => {
                worksheet.replace(id, appliance.into())?;
                info!(id, "replaced");
            }
            SheetCommand::Remove { id } => {
                let entry = worksheet.remove(id)?;
                info!(id, name = %entry.input.name, "removed");
            }
            SheetCommand::Show => {
                Self::print(&worksheet);
                return Ok(());
            }
            SheetCommand::Capacity { capacity } => {
                worksheet.set_capacity(capacity);
                info!(capacity = ?worksheet.capacity(), rate = %worksheet.rate(), "selected");
            }
            SheetCommand::Billing { billing_type } => {
                worksheet.set_billing_type(billing_type);
            }
            SheetCommand::Submit { api } => {
                let devices = worksheet.devices()?;
                let response = api
                    .new_client()?
                    .submit(worksheet.billing_type(), worksheet.total_monthly_energy(), &devices)
                    .await?;
                println!(
                    "{} (submission #{}, {} items)",
                    response.message.as_deref().unwrap_or("Data saved successfully"),
                    response.id_submit,
                    response.total_items,
                );
                if let Some(ai_response) = response.ai_response {
                    println!("\n{ai_response}");
                }
                return Ok(());
            }
            SheetCommand::Clear => {
                worksheet.clear();
            }
        }

        worksheet.write_to(&self.path)?;
        Self::print(&worksheet);
        Ok(())
    }

    fn print(worksheet: &Worksheet) {
        println!(
            "Capacity: {} ({}), billing: {}",
            worksheet.capacity().unwrap_or("not selected"),
            worksheet.rate(),
            worksheet.billing_type(),
        );
        println!("{}", build_worksheet_table(worksheet));
        println!("{}", build_load_table(&worksheet.load()));
    }
}
