//! Plain-text countries table
//!
//! One row per country: position, flag, common name, capital, population.

use chrono::{DateTime, Local, Utc};

use crate::cache::SlotView;
use crate::data::Country;

/// Column headers, in display order
const HEADERS: [&str; 5] = ["#", "Flag", "Name", "Capital", "Population"];

/// Text shown when a search returned nothing
const EMPTY_MESSAGE: &str = "No countries to show";

/// Renders countries as an aligned table
///
/// Returns [`EMPTY_MESSAGE`] followed by a newline when `countries` is empty.
pub fn render_countries_table(countries: &[Country]) -> String {
    if countries.is_empty() {
        return format!("{}\n", EMPTY_MESSAGE);
    }

    let rows: Vec<[String; 5]> = countries
        .iter()
        .enumerate()
        .map(|(i, country)| {
            [
                (i + 1).to_string(),
                country.flag().unwrap_or_default().to_string(),
                country.common_name().unwrap_or("-").to_string(),
                country.primary_capital().unwrap_or("-").to_string(),
                country
                    .population()
                    .map(format_population)
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(display_width);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("  ").trim_end());
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

/// Renders a cached slot with a one-line heading
pub fn render_slot(slot: SlotView<'_>, saved_at: Option<DateTime<Utc>>) -> String {
    let mut out = if slot.is_unset() {
        format!("Last {} search: none\n", slot.kind.label())
    } else {
        format!(
            "Last {} search: \"{}\" ({} result{})\n",
            slot.kind.label(),
            slot.term,
            slot.countries.len(),
            if slot.countries.len() == 1 { "" } else { "s" }
        )
    };

    if let Some(saved_at) = saved_at {
        let local: DateTime<Local> = saved_at.into();
        out.push_str(&format!("Saved {}\n", local.format("%Y-%m-%d %H:%M")));
    }

    if !slot.is_unset() {
        out.push_str(&render_countries_table(slot.countries));
    }
    out
}

/// Formats a population with thousands separators, e.g. `32,971,846`
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Terminal columns taken by `cell`
///
/// Pictographs such as the black flag take two columns, and the tag, joiner
/// and variation-selector characters that build subdivision flags take none.
/// Regional indicators take one each, so a country flag pair takes two.
fn display_width(cell: &str) -> usize {
    cell.chars()
        .map(|c| match c as u32 {
            0x200D | 0xFE00..=0xFE0F | 0xE0000..=0xE007F => 0,
            0x1F300..=0x1FAFF => 2,
            _ => 1,
        })
        .sum()
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| {
            let pad = width.saturating_sub(display_width(cell));
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}
