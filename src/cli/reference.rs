use clap::Parser;
use itertools::Itertools;

use crate::{cli::api::ApiArgs, prelude::*, tables::build_categories_table};

#[derive(Parser)]
pub struct ReferenceArgs {
    #[clap(flatten)]
    api: ApiArgs,
}

impl ReferenceArgs {
    pub async fn run(self) -> Result {
        let data = self.api.new_client()?.reference_data().await?;
        println!("House capacities: {}", data.house_capacities.iter().join(", "));
        println!("Brands: {}", data.brands.iter().join(", "));
        println!("{}", build_categories_table(&data.categories));
        Ok(())
    }
}
