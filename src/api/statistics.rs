use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    api::Client,
    core::chart::{
        CategoryShare,
        ChartPoint,
        normalize_categories,
        normalize_monthly,
        normalize_weekly,
    },
    prelude::*,
};

/// Dates of the oldest and the newest recorded inputs.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRange {
    #[serde(default)]
    pub first_date: Option<String>,

    #[serde(default)]
    pub last_date: Option<String>,
}

impl Client {
    /// Weekly consumption, one point per weekday starting on Monday.
    #[instrument(skip_all, fields(date = ?date))]
    pub async fn weekly_statistics(&self, date: Option<NaiveDate>) -> Result<Vec<ChartPoint>> {
        #[derive(Serialize)]
        struct Query {
            date: NaiveDate,
        }

        let path = match date {
            Some(date) => format!("/statistics/weekly?{}", serde_qs::to_string(&Query { date })?),
            None => "/statistics/weekly".to_string(),
        };
        let response = self.get::<Value>(&path).await?;
        if !response.as_ref().is_some_and(Value::is_array) {
            warn!("no weekly data available");
        }
        Ok(normalize_weekly(response.as_ref()))
    }

    #[instrument(skip_all)]
    pub async fn monthly_statistics(&self) -> Result<Vec<ChartPoint>> {
        let response = self.get::<Value>("/statistics/monthly").await?;
        Ok(normalize_monthly(response.as_ref()))
    }

    #[instrument(skip_all)]
    pub async fn category_statistics(&self) -> Result<Vec<CategoryShare>> {
        let response = self.get::<Value>("/statistics/category").await?;
        Ok(normalize_categories(response.as_ref()))
    }

    #[instrument(skip_all)]
    pub async fn data_range(&self) -> Result<DataRange> {
        Ok(self.get::<DataRange>("/statistics/data-range").await?.unwrap_or_default())
    }
}
