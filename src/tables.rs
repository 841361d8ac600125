use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    api::{appliances::Appliance, reference::Category},
    core::{
        calculator::EnergyCostBreakdown,
        chart::{CategoryShare, ChartPoint},
        history::HistoryEntry,
        load::HouseholdLoad,
        worksheet::Worksheet,
    },
    quantity::cost::Cost,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn right(content: impl ToString) -> Cell {
    Cell::new(content).set_alignment(CellAlignment::Right)
}

pub fn build_breakdown_table(breakdown: &EnergyCostBreakdown) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Period", "Energy", "Cost"]);
    for (period, energy, cost) in [
        ("Daily", breakdown.daily_energy, breakdown.daily_cost),
        ("Weekly", breakdown.weekly_energy, breakdown.weekly_cost),
        ("Monthly", breakdown.monthly_energy, breakdown.monthly_cost),
    ] {
        table.add_row(vec![Cell::new(period), right(energy), right(cost)]);
    }
    table
}

pub fn build_worksheet_table(worksheet: &Worksheet) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "ID",
        "Name",
        "Brand",
        "Category",
        "Power",
        "Usage",
        "Qty",
        "Daily",
        "Monthly",
        "Daily cost",
        "Monthly cost",
    ]);
    for entry in worksheet.entries() {
        let input = &entry.input;
        table.add_row(vec![
            Cell::new(entry.id).add_attribute(Attribute::Dim),
            Cell::new(&input.name).add_attribute(Attribute::Bold),
            Cell::new(&input.brand),
            Cell::new(input.category_name.as_deref().map_or_else(
                || format!("#{}", input.category_id),
                str::to_string,
            )),
            right(input.power),
            right(input.daily_usage),
            right(input.quantity),
            right(entry.breakdown.daily_energy),
            right(entry.breakdown.monthly_energy),
            right(entry.breakdown.daily_cost),
            right(entry.breakdown.monthly_cost),
        ]);
    }
    let total_daily_cost: Cost =
        worksheet.entries().iter().map(|entry| entry.breakdown.daily_cost).sum();
    let total_monthly_cost: Cost =
        worksheet.entries().iter().map(|entry| entry.breakdown.monthly_cost).sum();
    table.add_row(vec![
        Cell::new(""),
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        right(worksheet.total_power()),
        Cell::new(""),
        Cell::new(""),
        right(worksheet.total_daily_energy()).add_attribute(Attribute::Bold),
        right(worksheet.total_monthly_energy()).add_attribute(Attribute::Bold),
        right(total_daily_cost).add_attribute(Attribute::Bold),
        right(total_monthly_cost).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn build_load_table(load: &HouseholdLoad) -> Table {
    let level = load.level();
    let mut table = new_table();
    table.set_header(vec!["Capacity", "Connected", "Usage", "Status"]);
    table.add_row(vec![
        right(format!("{} VA", load.capacity_volt_amperes)),
        right(load.total_power),
        right(format!("{:.1}%", load.usage_percent)).fg(level.color()),
        Cell::new(level).fg(level.color()),
    ]);
    table
}

pub fn build_history_table(entries: &[HistoryEntry]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "ID",
        "Date",
        "Appliance",
        "Brand",
        "Category",
        "Power",
        "Usage",
        "Daily",
        "Monthly",
        "Tariff",
        "Daily cost",
    ]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.id).add_attribute(Attribute::Dim),
            Cell::new(&entry.date),
            Cell::new(&entry.appliance).add_attribute(Attribute::Bold),
            Cell::new(entry.brand.as_deref().unwrap_or("N/A")),
            Cell::new(&entry.category.name),
            right(entry.power),
            right(entry.usage),
            right(entry.breakdown.daily_energy),
            right(entry.breakdown.monthly_energy),
            right(entry.rate).add_attribute(Attribute::Dim),
            right(entry.breakdown.daily_cost),
        ]);
    }
    table
}

pub fn build_chart_table(points: &[ChartPoint]) -> Table {
    let max_value = points.iter().map(|point| point.value).fold(0.0, f64::max);
    let mut table = new_table();
    table.set_header(vec!["Label", "kWh", ""]);
    for point in points {
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let width =
            if max_value > 0.0 { (point.value / max_value * 30.0).round() as usize } else { 0 };
        table.add_row(vec![
            Cell::new(&point.label),
            right(format!("{:.2}", point.value)),
            Cell::new("█".repeat(width)).fg(Color::Blue),
        ]);
    }
    table
}

pub fn build_category_share_table(shares: &[CategoryShare]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Category", "Share", "Total power"]);
    for share in shares {
        let mut name = Cell::new(&share.name);
        if let Some(color) = share.color() {
            name = name.fg(color);
        }
        table.add_row(vec![
            name,
            right(format!("{:.1}%", share.percentage)),
            right(format!("{} W", share.total_power)),
        ]);
    }
    table
}

pub fn build_categories_table(categories: &[Category]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Category"]);
    for category in categories {
        table.add_row(vec![
            right(category.id).add_attribute(Attribute::Dim),
            Cell::new(&category.name),
        ]);
    }
    table
}

pub fn build_appliances_table(appliances: &[Appliance]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Brand", "Category", "Power", "Usage"]);
    for appliance in appliances {
        table.add_row(vec![
            Cell::new(appliance.id).add_attribute(Attribute::Dim),
            Cell::new(&appliance.name).add_attribute(Attribute::Bold),
            Cell::new(&appliance.brand),
            Cell::new(appliance.category_name.as_deref().map_or_else(
                || format!("#{}", appliance.category_id),
                str::to_string,
            )),
            right(format!("{} W", appliance.power_rating)),
            right(format!("{} h", appliance.daily_usage)),
        ]);
    }
    table
}
