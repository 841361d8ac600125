use clap::{Parser, Subcommand};

use crate::{
    api::appliances::{Appliance, ApplianceFields},
    cli::api::ApiArgs,
    prelude::*,
    quantity::{power::Watts, time::Hours},
    tables::build_appliances_table,
};

#[derive(Parser)]
pub struct AppliancesArgs {
    #[clap(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: AppliancesCommand,
}

#[derive(Subcommand)]
enum AppliancesCommand {
    /// List the stored appliances.
    List,

    /// Show a single appliance.
    Get { id: i64 },

    /// Store a new appliance.
    Create(FieldsArgs),

    /// Replace a stored appliance.
    Update {
        id: i64,

        #[clap(flatten)]
        fields: FieldsArgs,
    },

    /// Delete a stored appliance.
    Delete { id: i64 },
}

#[derive(Parser)]
struct FieldsArgs {
    #[clap(long)]
    name: String,

    #[clap(long)]
    brand: String,

    #[clap(long = "category-id")]
    category_id: u32,

    /// Power rating in watts.
    #[clap(long)]
    power: Watts,

    /// Daily usage in hours.
    #[clap(long)]
    usage: Hours,
}

impl TryFrom<FieldsArgs> for ApplianceFields {
    type Error = Error;

    fn try_from(args: FieldsArgs) -> Result<Self> {
        ensure!(!args.name.trim().is_empty(), "appliance name is required");
        ensure!(args.power.is_positive(), "power must be greater than 0");
        ensure!(args.usage.is_positive(), "daily usage must be greater than 0");
        Ok(Self::builder()
            .name(args.name)
            .brand(args.brand)
            .category_id(args.category_id)
            .power_rating(args.power)
            .daily_usage(args.usage)
            .build())
    }
}

impl AppliancesArgs {
    pub async fn run(self) -> Result {
        let client = self.api.new_client()?;

        match self.command {
            AppliancesCommand::List => {
                let appliances = client.appliances().await?;
                if appliances.is_empty() {
                    println!("No appliances stored yet.");
                } else {
                    println!("{}", build_appliances_table(&appliances));
                }
            }
            AppliancesCommand::Get { id } => {
                let appliance = client.appliance(id).await?;
                println!("{}", build_appliances_table(&[appliance]));
            }
            AppliancesCommand::Create(fields) => {
                let fields = ApplianceFields::try_from(fields)?;
                let confirmation = client.create_appliance(&fields).await?;
                print_confirmation(&confirmation.message, confirmation.appliance);
            }
            AppliancesCommand::Update { id, fields } => {
                let fields = ApplianceFields::try_from(fields)?;
                let confirmation = client.update_appliance(id, &fields).await?;
                print_confirmation(&confirmation.message, confirmation.appliance);
            }
            AppliancesCommand::Delete { id } => {
                println!("{}", client.delete_appliance(id).await?);
            }
        }

        Ok(())
    }
}

fn print_confirmation(message: &str, appliance: Option<Appliance>) {
    println!("{message}");
    if let Some(appliance) = appliance {
        println!("{}", build_appliances_table(&[appliance]));
    }
}
