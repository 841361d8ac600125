use serde::{Deserialize, Serialize};

use crate::quantity::{
    Quantity,
    cost::Cost,
    energy::KilowattHours,
    power::Watts,
    rate::KilowattHourRate,
    time::Hours,
};

const DAYS_PER_WEEK: f64 = 7.0;

/// Months are always 30 days here, regardless of the calendar.
const DAYS_PER_MONTH: f64 = 30.0;

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergyCostBreakdown {
    pub daily_energy: KilowattHours,
    pub weekly_energy: KilowattHours,
    pub monthly_energy: KilowattHours,
    pub daily_cost: Cost,
    pub weekly_cost: Cost,
    pub monthly_cost: Cost,
}

/// Estimate energy consumption and its cost for `quantity` identical appliances.
///
/// The inputs are not validated: non-positive or `NaN` inputs propagate into the result.
pub fn calculate(
    power: Watts,
    daily_usage: Hours,
    quantity: u32,
    rate: KilowattHourRate,
) -> EnergyCostBreakdown {
    let daily_energy: KilowattHours =
        Quantity(power.0 * daily_usage.0 * f64::from(quantity) / 1000.0);
    let weekly_energy = daily_energy * DAYS_PER_WEEK;
    let monthly_energy = daily_energy * DAYS_PER_MONTH;
    EnergyCostBreakdown {
        daily_energy,
        weekly_energy,
        monthly_energy,
        daily_cost: daily_energy * rate,
        weekly_cost: weekly_energy * rate,
        monthly_cost: monthly_energy * rate,
    }
}
