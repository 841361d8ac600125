//! Household capacity → electricity price per kilowatt-hour.

use crate::quantity::{Quantity, rate::KilowattHourRate};

/// Rate for households up to 900 VA.
pub const LOW_CAPACITY_RATE: KilowattHourRate = Quantity(1352.0);

/// Rate for households above 900 VA and up to 2200 VA. Also used when the capacity is unknown.
pub const STANDARD_RATE: KilowattHourRate = Quantity(1444.70);

/// Rate for households above 2200 VA.
pub const HIGH_CAPACITY_RATE: KilowattHourRate = Quantity(1699.53);

/// Look up the tariff for a capacity descriptor such as `"1.300 VA"`.
///
/// Missing or unparseable descriptors fall back to [`STANDARD_RATE`], so this never fails.
#[must_use]
pub fn tariff_for_capacity(descriptor: Option<&str>) -> KilowattHourRate {
    match descriptor.and_then(parse_volt_amperes) {
        None => STANDARD_RATE,
        Some(volt_amperes) if volt_amperes <= 900 => LOW_CAPACITY_RATE,
        Some(volt_amperes) if volt_amperes <= 2200 => STANDARD_RATE,
        Some(_) => HIGH_CAPACITY_RATE,
    }
}

/// Parse the leading integer of the first word, ignoring `.` thousand separators.
///
/// Trailing garbage is ignored: `"1300VA"` parses as `1300`.
fn parse_volt_amperes(descriptor: &str) -> Option<i64> {
    let word: String = descriptor.split(' ').next()?.chars().filter(|c| *c != '.').collect();
    let word = word.trim_start();
    let (is_negative, unsigned) = match word.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, word.strip_prefix('+').unwrap_or(word)),
    };
    let digits: String = unsigned.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if is_negative { -magnitude } else { magnitude })
}
