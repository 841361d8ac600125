//! Display entries derived from the raw history rows.

use chrono::NaiveDate;

use crate::{
    api::{
        records::{BillingType, DevicePayload, HistoryRecord, Identifier},
        reference::Category,
    },
    core::{
        calculator::{EnergyCostBreakdown, calculate},
        tariff::tariff_for_capacity,
    },
    quantity::{Quantity, power::Watts, rate::KilowattHourRate, time::Hours},
};

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub id: Identifier,
    pub date: String,
    pub appliance: String,
    pub brand: Option<String>,
    pub category: Category,
    pub power: Watts,
    pub usage: Hours,

    /// Tariff for the capacity the row was recorded with.
    pub rate: KilowattHourRate,

    /// Single appliance: history rows carry no quantity.
    pub breakdown: EnergyCostBreakdown,

    pub capacity: Option<String>,
}

impl HistoryEntry {
    /// Derive the energy and the cost, defaulting the missing fields. Undated rows get `today`.
    pub fn from_record(record: HistoryRecord, today: NaiveDate) -> Self {
        let power = Quantity(record.power);
        let usage = Quantity(record.duration);
        let rate = tariff_for_capacity(record.capacity.as_deref());
        Self {
            id: record.id,
            date: non_empty(record.date).unwrap_or_else(|| today.to_string()),
            appliance: non_empty(record.appliance).unwrap_or_else(|| "N/A".to_string()),
            brand: non_empty(record.brand),
            category: Category {
                id: record.category_id.unwrap_or_default(),
                name: non_empty(record.category_name).unwrap_or_else(|| "Other".to_string()),
            },
            power,
            usage,
            rate,
            breakdown: calculate(power, usage, 1, rate),
            capacity: non_empty(record.capacity),
        }
    }

    /// Wire representation for an analysis request.
    pub fn to_device(&self, billing_type: BillingType, capacity: &str) -> DevicePayload {
        DevicePayload::builder()
            .billing_type(billing_type)
            .capacity(capacity)
            .name(&self.appliance)
            .brand(self.brand.as_deref().unwrap_or(DevicePayload::UNKNOWN_BRAND))
            .power(self.power)
            .duration(self.usage)
            .category_id(self.category.id)
            .build()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
