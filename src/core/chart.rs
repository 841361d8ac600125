use comfy_table::Color;
use serde_json::Value;

use crate::api::lenient::{self, is_truthy};

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Keys which may carry a weekly row's consumption, in the order of preference.
const VALUE_KEYS: [&str; 4] = ["total_kwh", "kwh", "consumption", "value"];

/// Keys which may carry a monthly row's consumption, in the order of preference.
const MONTHLY_VALUE_KEYS: [&str; 3] = ["value", "kwh", "consumption"];

/// Keys which may carry a category's total power, in the order of preference.
const TOTAL_POWER_KEYS: [&str; 3] = ["total_power", "power", "kwh"];

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Fill the weekly chart with exactly seven points, Monday first.
///
/// Days missing from the response are zero, as is everything when the response is not a list.
pub fn normalize_weekly(response: Option<&Value>) -> Vec<ChartPoint> {
    let rows = rows(response);
    WEEKDAYS
        .iter()
        .map(|day| {
            let value = rows
                .iter()
                .find(|row| day_of(row).is_some_and(|label| label.eq_ignore_ascii_case(day)))
                .and_then(|row| first_truthy(row, &VALUE_KEYS))
                .map_or(0.0, lenient::to_f64);
            ChartPoint { label: (*day).to_string(), value }
        })
        .collect()
}

/// Monthly points in the response order. Week labels other than `W1` through `W4` are dropped.
pub fn normalize_monthly(response: Option<&Value>) -> Vec<ChartPoint> {
    rows(response)
        .iter()
        .enumerate()
        .map(|(index, row)| ChartPoint {
            label: first_truthy(row, &["label", "month"])
                .map_or_else(|| format!("Month {}", index + 1), text_of),
            value: first_truthy(row, &MONTHLY_VALUE_KEYS).map_or(0.0, lenient::to_f64),
        })
        .filter(|point| is_calendar_week(&point.label))
        .collect()
}

/// Share of the consumption attributed to an appliance category.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryShare {
    pub name: String,
    pub percentage: f64,
    pub total_power: f64,
}

impl CategoryShare {
    /// Fixed colour of the known categories.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match self.name.as_str() {
            "Entertainment" => Some(Color::Blue),
            "Cooling" => Some(Color::Green),
            "Kitchen" => Some(Color::Magenta),
            "Lighting" => Some(Color::Yellow),
            "Health" => Some(Color::Red),
            "Heating" => Some(Color::DarkYellow),
            _ => None,
        }
    }
}

pub fn normalize_categories(response: Option<&Value>) -> Vec<CategoryShare> {
    rows(response)
        .iter()
        .enumerate()
        .map(|(index, row)| CategoryShare {
            name: first_truthy(row, &["name", "category"])
                .map_or_else(|| format!("Category {}", index + 1), text_of),
            percentage: first_truthy(row, &["percentage"]).map_or(0.0, lenient::to_f64),
            total_power: first_truthy(row, &TOTAL_POWER_KEYS).map_or(0.0, lenient::to_f64),
        })
        .collect()
}

fn rows(response: Option<&Value>) -> &[Value] {
    response.and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

fn first_truthy<'a>(row: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| row.get(key)).find(|value| is_truthy(value))
}

fn text_of(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_string)
}

/// Labels starting with `W` must name one of the first four weeks. Other labels always pass.
fn is_calendar_week(label: &str) -> bool {
    let Some(week) = label.strip_prefix(['W', 'w']) else {
        return true;
    };
    let week = week.trim_start();
    let digits = week.strip_prefix('+').unwrap_or(week);
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<u32>().is_ok_and(|week| (1..=4).contains(&week))
}

fn day_of(row: &Value) -> Option<&str> {
    first_truthy(row, &["day", "label"]).and_then(Value::as_str)
}
