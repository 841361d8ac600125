//! The appliance list being calculated before it is submitted.

use std::{fmt::Debug, fs, path::Path};

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    api::records::{BillingType, DevicePayload},
    core::{
        calculator::{EnergyCostBreakdown, calculate},
        load::HouseholdLoad,
        tariff::tariff_for_capacity,
    },
    prelude::*,
    quantity::{energy::KilowattHours, power::Watts, rate::KilowattHourRate, time::Hours},
};

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Builder)]
pub struct ApplianceInput {
    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub brand: String,

    pub category_id: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,

    pub power: Watts,

    pub daily_usage: Hours,

    #[builder(default = 1)]
    pub quantity: u32,
}

impl ApplianceInput {
    pub fn validate(&self) -> Result {
        ensure!(!self.name.trim().is_empty(), "appliance name is required");
        ensure!(!self.brand.trim().is_empty(), "appliance brand is required");
        ensure!(self.power.is_positive(), "power must be greater than 0");
        ensure!(self.daily_usage.is_positive(), "daily usage must be greater than 0");
        ensure!(self.quantity >= 1, "quantity must be at least 1");
        Ok(())
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorksheetEntry {
    pub id: u64,
    pub input: ApplianceInput,
    pub breakdown: EnergyCostBreakdown,
}

impl WorksheetEntry {
    fn new(id: u64, input: ApplianceInput, rate: KilowattHourRate) -> Self {
        let breakdown = calculate(input.power, input.daily_usage, input.quantity, rate);
        Self { id, input, breakdown }
    }
}

/// Ordered appliance entries together with the selected household capacity and billing type.
#[must_use]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Worksheet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    capacity: Option<String>,

    #[serde(default)]
    billing_type: BillingType,

    #[serde(default)]
    next_id: u64,

    #[serde(default)]
    entries: Vec<WorksheetEntry>,
}

impl Worksheet {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(Self::default());
        }
        let mut worksheet: Self = toml::from_str(&fs::read_to_string(path)?)
            .with_context(|| format!("failed to parse the worksheet `{}`", path.display()))?;
        worksheet.recalculate();
        debug!(n_entries = worksheet.entries.len(), "loaded the worksheet");
        Ok(worksheet)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn write_to<P: AsRef<Path> + Debug>(&self, path: P) -> Result {
        fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }

    pub fn capacity(&self) -> Option<&str> {
        self.capacity.as_deref()
    }

    /// Select the household capacity and recalculate every entry with the new tariff.
    pub fn set_capacity(&mut self, capacity: Option<String>) {
        self.capacity = capacity;
        self.recalculate();
    }

    pub const fn billing_type(&self) -> BillingType {
        self.billing_type
    }

    pub const fn set_billing_type(&mut self, billing_type: BillingType) {
        self.billing_type = billing_type;
    }

    #[must_use]
    pub fn rate(&self) -> KilowattHourRate {
        tariff_for_capacity(self.capacity())
    }

    #[must_use]
    pub fn entries(&self) -> &[WorksheetEntry] {
        &self.entries
    }

    /// Append a new entry and return its ID.
    pub fn add(&mut self, input: ApplianceInput) -> Result<u64> {
        input.validate()?;
        let max_id = self.entries.iter().map(|entry| entry.id).max().unwrap_or_default();
        self.next_id = self.next_id.max(max_id) + 1;
        self.entries.push(WorksheetEntry::new(self.next_id, input, self.rate()));
        Ok(self.next_id)
    }

    /// Replace the entry in place, keeping its ID and position.
    pub fn replace(&mut self, id: u64, input: ApplianceInput) -> Result {
        input.validate()?;
        let rate = self.rate();
        let entry = self.entry_mut(id)?;
        *entry = WorksheetEntry::new(id, input, rate);
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> Result<WorksheetEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .with_context(|| format!("there is no appliance #{id}"))?;
        Ok(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn total_daily_energy(&self) -> KilowattHours {
        self.entries.iter().map(|entry| entry.breakdown.daily_energy).sum()
    }

    pub fn total_monthly_energy(&self) -> KilowattHours {
        self.entries.iter().map(|entry| entry.breakdown.monthly_energy).sum()
    }

    /// Connected power of all appliances, counting every unit.
    pub fn total_power(&self) -> Watts {
        self.entries.iter().map(|entry| entry.input.power * f64::from(entry.input.quantity)).sum()
    }

    pub fn load(&self) -> HouseholdLoad {
        HouseholdLoad::new(self.capacity(), self.total_power())
    }

    /// Validate the worksheet for submission and convert the entries into device payloads.
    pub fn devices(&self) -> Result<Vec<DevicePayload>> {
        ensure!(!self.entries.is_empty(), "no appliances to submit");
        let capacity = self.capacity().context("select the house power capacity first")?;
        let invalid_ids: Vec<u64> = self
            .entries
            .iter()
            .filter(|entry| {
                entry.input.name.trim().is_empty()
                    || !entry.input.power.is_positive()
                    || !entry.input.daily_usage.is_positive()
            })
            .map(|entry| entry.id)
            .collect();
        ensure!(invalid_ids.is_empty(), "appliances {invalid_ids:?} have invalid data");
        Ok(self
            .entries
            .iter()
            .map(|entry| {
                let brand = entry.input.brand.trim();
                DevicePayload::builder()
                    .billing_type(self.billing_type)
                    .capacity(capacity)
                    .name(&entry.input.name)
                    .brand(if brand.is_empty() { DevicePayload::UNKNOWN_BRAND } else { brand })
                    .power(entry.input.power)
                    .duration(entry.input.daily_usage)
                    .category_id(entry.input.category_id)
                    .build()
            })
            .collect())
    }

    fn entry_mut(&mut self, id: u64) -> Result<&mut WorksheetEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .with_context(|| format!("there is no appliance #{id}"))
    }

    fn recalculate(&mut self) {
        let rate = self.rate();
        for entry in &mut self.entries {
            entry.breakdown =
                calculate(entry.input.power, entry.input.daily_usage, entry.input.quantity, rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::tariff::{HIGH_CAPACITY_RATE, LOW_CAPACITY_RATE, STANDARD_RATE},
        quantity::Quantity,
    };

    fn fridge() -> ApplianceInput {
        ApplianceInput::builder()
            .name("Fridge")
            .brand("Sharp")
            .category_id(2)
            .power(Quantity(100.0))
            .daily_usage(Quantity(5.0))
            .quantity(2)
            .build()
    }

    fn lamp() -> ApplianceInput {
        ApplianceInput::builder()
            .name("Lamp")
            .brand("Philips")
            .category_id(3)
            .power(Quantity(10.0))
            .daily_usage(Quantity(12.0))
            .build()
    }

    #[test]
    fn test_add_assigns_increasing_ids() -> Result {
        let mut worksheet = Worksheet::default();
        assert_eq!(worksheet.add(fridge())?, 1);
        assert_eq!(worksheet.add(lamp())?, 2);
        assert_eq!(worksheet.entries().len(), 2);
        assert_eq!(worksheet.entries()[0].input.name, "Fridge");
        assert_eq!(worksheet.rate(), STANDARD_RATE);
        assert_eq!(worksheet.entries()[0].breakdown.daily_cost.0, 1444.70);
        Ok(())
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut worksheet = Worksheet::default();
        assert!(worksheet.add(ApplianceInput { power: Quantity(0.0), ..fridge() }).is_err());
        assert!(worksheet.add(ApplianceInput { daily_usage: Quantity(-1.0), ..fridge() }).is_err());
        assert!(worksheet.add(ApplianceInput { quantity: 0, ..fridge() }).is_err());
        assert!(worksheet.add(ApplianceInput { name: "  ".into(), ..fridge() }).is_err());
        assert!(worksheet.entries().is_empty());
    }

    #[test]
    fn test_replace_keeps_id_and_position() -> Result {
        let mut worksheet = Worksheet::default();
        let fridge_id = worksheet.add(fridge())?;
        worksheet.add(lamp())?;

        worksheet.replace(fridge_id, ApplianceInput { quantity: 1, ..fridge() })?;
        let entry = &worksheet.entries()[0];
        assert_eq!(entry.id, fridge_id);
        assert_eq!(entry.input.quantity, 1);
        assert_eq!(entry.breakdown.daily_energy.0, 0.5);
        assert_eq!(worksheet.entries()[1].input.name, "Lamp");

        assert!(worksheet.replace(42, lamp()).is_err());
        Ok(())
    }

    #[test]
    fn test_remove() -> Result {
        let mut worksheet = Worksheet::default();
        let fridge_id = worksheet.add(fridge())?;
        let lamp_id = worksheet.add(lamp())?;
        assert_eq!(worksheet.remove(fridge_id)?.input.name, "Fridge");
        assert_eq!(worksheet.entries().len(), 1);
        assert_eq!(worksheet.entries()[0].id, lamp_id);
        assert!(worksheet.remove(fridge_id).is_err());

        // IDs are never reused:
        assert_eq!(worksheet.add(fridge())?, 3);
        Ok(())
    }

    #[test]
    fn test_set_capacity_recalculates() -> Result {
        let mut worksheet = Worksheet::default();
        worksheet.add(fridge())?;

        worksheet.set_capacity(Some("900 VA".to_string()));
        assert_eq!(worksheet.rate(), LOW_CAPACITY_RATE);
        assert_eq!(worksheet.entries()[0].breakdown.daily_cost.0, 1352.0);

        worksheet.set_capacity(Some("3.500 VA".to_string()));
        assert_eq!(worksheet.entries()[0].breakdown.daily_cost.0, HIGH_CAPACITY_RATE.0);
        Ok(())
    }

    #[test]
    fn test_totals() -> Result {
        let mut worksheet = Worksheet::default();
        worksheet.add(fridge())?;
        worksheet.add(lamp())?;
        assert_abs_diff_eq!(worksheet.total_daily_energy().0, 1.12, epsilon = 1e-9);
        assert_abs_diff_eq!(worksheet.total_monthly_energy().0, 33.6, epsilon = 1e-9);
        assert_eq!(worksheet.total_power().0, 210.0);
        Ok(())
    }

    #[test]
    fn test_devices() -> Result {
        let mut worksheet = Worksheet::default();
        assert!(worksheet.devices().is_err(), "empty worksheet must be rejected");

        worksheet.add(fridge())?;
        assert!(worksheet.devices().is_err(), "capacity must be selected");

        worksheet.set_capacity(Some("1.300 VA".to_string()));
        worksheet.set_billing_type(BillingType::Prepaid);
        worksheet.entries[0].input.brand = " ".to_string();
        let devices = worksheet.devices()?;
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].brand, DevicePayload::UNKNOWN_BRAND);
        assert_eq!(devices[0].capacity, "1.300 VA");
        assert_eq!(devices[0].billing_type, BillingType::Prepaid);

        worksheet.entries[0].input.power = Watts::ZERO;
        assert!(worksheet.devices().is_err());
        Ok(())
    }

    #[test]
    fn test_file_round_trip() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("worksheet.toml");
        assert!(Worksheet::read_from(&path)?.entries().is_empty());

        let mut worksheet = Worksheet::default();
        worksheet.set_capacity(Some("900 VA".to_string()));
        worksheet.add(fridge())?;
        worksheet.add(ApplianceInput { category_name: Some("Lighting".to_string()), ..lamp() })?;
        worksheet.write_to(&path)?;

        let mut loaded = Worksheet::read_from(&path)?;
        assert_eq!(loaded.capacity(), Some("900 VA"));
        assert_eq!(loaded.entries(), worksheet.entries());
        assert_eq!(loaded.add(lamp())?, 3);
        Ok(())
    }
}
