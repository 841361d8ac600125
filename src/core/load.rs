//! Connected appliance power relative to the household capacity.

use std::fmt::{Display, Formatter};

use comfy_table::Color;

use crate::quantity::power::Watts;

/// Assumed capacity when none is selected.
const DEFAULT_CAPACITY_VOLT_AMPERES: f64 = 2000.0;

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HouseholdLoad {
    pub capacity_volt_amperes: f64,
    pub total_power: Watts,

    /// Total power as a percentage of the capacity.
    pub usage_percent: f64,
}

impl HouseholdLoad {
    pub fn new(capacity: Option<&str>, total_power: Watts) -> Self {
        let capacity_volt_amperes = capacity_volt_amperes(capacity);
        let usage_percent = if capacity_volt_amperes > 0.0 {
            total_power.0 / capacity_volt_amperes * 100.0
        } else {
            0.0
        };
        Self { capacity_volt_amperes, total_power, usage_percent }
    }

    pub fn level(&self) -> LoadLevel {
        match self.usage_percent {
            percent if percent > 90.0 => LoadLevel::Critical,
            percent if percent > 70.0 => LoadLevel::High,
            percent if percent > 50.0 => LoadLevel::Moderate,
            _ => LoadLevel::Low,
        }
    }
}

/// All the digits of the descriptor read as one number: `"1.300 VA"` → 1300.
fn capacity_volt_amperes(capacity: Option<&str>) -> f64 {
    capacity
        .map(|capacity| capacity.chars().filter(char::is_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(DEFAULT_CAPACITY_VOLT_AMPERES)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LoadLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl LoadLevel {
    pub const fn color(self) -> Color {
        match self {
            Self::Low => Color::Green,
            Self::Moderate | Self::High => Color::DarkYellow,
            Self::Critical => Color::Red,
        }
    }
}

impl Display for LoadLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low power usage, great!"),
            Self::Moderate => write!(f, "moderate power usage"),
            Self::High => write!(f, "high power usage detected"),
            Self::Critical => write!(f, "critical: power usage exceeds safe capacity!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::Quantity;

    #[test]
    fn test_capacity_parsing() {
        assert_eq!(capacity_volt_amperes(Some("1.300 VA")), 1300.0);
        assert_eq!(capacity_volt_amperes(Some("900 VA")), 900.0);
        assert_eq!(capacity_volt_amperes(Some("VA")), 2000.0);
        assert_eq!(capacity_volt_amperes(None), 2000.0);
    }

    #[test]
    fn test_usage_percent() {
        let load = HouseholdLoad::new(Some("1.300 VA"), Quantity(650.0));
        assert_abs_diff_eq!(load.usage_percent, 50.0);
        assert_eq!(load.level(), LoadLevel::Low);

        let load = HouseholdLoad::new(None, Quantity(1500.0));
        assert_abs_diff_eq!(load.usage_percent, 75.0);
        assert_eq!(load.level(), LoadLevel::High);
    }

    #[test]
    fn test_zero_capacity() {
        let load = HouseholdLoad::new(Some("0 VA"), Quantity(100.0));
        assert_eq!(load.usage_percent, 0.0);
        assert_eq!(load.level(), LoadLevel::Low);
    }

    #[test]
    fn test_levels() {
        let level = |watts| HouseholdLoad::new(Some("1.000 VA"), Quantity(watts)).level();
        assert_eq!(level(500.0), LoadLevel::Low);
        assert_eq!(level(501.0), LoadLevel::Moderate);
        assert_eq!(level(690.0), LoadLevel::Moderate);
        assert_eq!(level(710.0), LoadLevel::High);
        assert_eq!(level(890.0), LoadLevel::High);
        assert_eq!(level(910.0), LoadLevel::Critical);
    }
}
