use clap::Parser;

use crate::{
    core::{calculator::calculate, tariff::tariff_for_capacity},
    prelude::*,
    quantity::{power::Watts, time::Hours},
    tables::build_breakdown_table,
};

#[derive(Parser)]
pub struct TariffArgs {
    /// House power capacity, for example `1.300 VA`.
    capacity: Option<String>,
}

impl TariffArgs {
    pub fn run(self) {
        println!("{}", tariff_for_capacity(self.capacity.as_deref()));
    }
}

#[derive(Parser)]
pub struct CalculateArgs {
    /// Power rating in watts.
    #[clap(long)]
    power: Watts,

    /// Daily usage in hours.
    #[clap(long)]
    usage: Hours,

    #[clap(long, default_value = "1")]
    quantity: u32,

    /// House power capacity, for example `1.300 VA`.
    #[clap(long, env = "ENERTRACK_CAPACITY")]
    capacity: Option<String>,
}

impl CalculateArgs {
    pub fn run(self) {
        let rate = tariff_for_capacity(self.capacity.as_deref());
        let breakdown = calculate(self.power, self.usage, self.quantity, rate);
        info!(%rate, ?breakdown, "calculated");
        println!("{}", build_breakdown_table(&breakdown));
    }
}
