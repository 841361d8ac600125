mod account;
mod api;
mod appliances;
mod calculate;
mod history;
mod reference;
mod sheet;
mod statistics;

use clap::{Parser, Subcommand};

use crate::{
    cli::{
        account::{LoginArgs, LogoutArgs, ProfileArgs, RegisterArgs, WhoamiArgs},
        appliances::AppliancesArgs,
        calculate::{CalculateArgs, TariffArgs},
        history::{AnalyzeArgs, HistoryArgs},
        reference::ReferenceArgs,
        sheet::SheetArgs,
        statistics::StatisticsArgs,
    },
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and remember the session.
    Login(LoginArgs),

    /// Create an account.
    Register(RegisterArgs),

    /// Forget the local session.
    Logout(LogoutArgs),

    /// Show the signed-in user.
    Whoami(WhoamiArgs),

    /// Update the profile.
    Profile(ProfileArgs),

    /// Look up the tariff for a house power capacity.
    Tariff(TariffArgs),

    /// Estimate energy consumption and cost of a single appliance.
    Calculate(CalculateArgs),

    /// Manage the local appliance worksheet and submit it.
    Sheet(Box<SheetArgs>),

    /// List the available brands, categories, and house capacities.
    Reference(ReferenceArgs),

    /// Show the submitted appliance history.
    History(HistoryArgs),

    /// Ask for an analysis of the appliances from the history.
    Analyze(AnalyzeArgs),

    /// Show consumption statistics.
    #[clap(name = "stats")]
    Statistics(StatisticsArgs),

    /// Manage the appliances stored on the account.
    Appliances(Box<AppliancesArgs>),
}

impl Command {
    pub async fn run(self) -> Result {
        match self {
            Self::Login(args) => args.run().await,
            Self::Register(args) => args.run().await,
            Self::Logout(args) => args.run(),
            Self::Whoami(args) => args.run().await,
            Self::Profile(args) => args.run().await,
            Self::Tariff(args) => {
                args.run();
                Ok(())
            }
            Self::Calculate(args) => {
                args.run();
                Ok(())
            }
            Self::Sheet(args) => args.run().await,
            Self::Reference(args) => args.run().await,
            Self::History(args) => args.run().await,
            Self::Analyze(args) => args.run().await,
            Self::Statistics(args) => args.run().await,
            Self::Appliances(args) => args.run().await,
        }
    }
}
