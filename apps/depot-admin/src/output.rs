//! Terminal rendering: aligned tables or pretty JSON on stdout, notices on stderr.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use colored::Colorize;
use resources::domain::{Bucket, DashboardStats, NoticeLevel, Notifier};
use resources_sdk::Resource;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    #[must_use]
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Render `items` as a table with one column per field name.
    ///
    /// # Errors
    /// Fails only if JSON serialization fails.
    pub fn list<R: Resource>(&self, items: &[R], columns: &[&str]) -> anyhow::Result<()> {
        if self.json {
            return print_json(&items);
        }
        let rows: Vec<Vec<String>> = items
            .iter()
            .map(|item| {
                columns
                    .iter()
                    .map(|c| item.field_text(c).unwrap_or_default())
                    .collect()
            })
            .collect();
        print!("{}", render_table(columns, &rows));
        println!("{} {}", items.len(), R::KIND);
        Ok(())
    }

    /// Render one record as `key: value` lines.
    ///
    /// # Errors
    /// Fails only if JSON serialization fails.
    pub fn item<T: Serialize>(&self, item: &T) -> anyhow::Result<()> {
        if self.json {
            return print_json(item);
        }
        let value = serde_json::to_value(item).context("Failed to serialize record")?;
        print!("{}", render_fields(&value));
        Ok(())
    }

    /// # Errors
    /// Fails only if JSON serialization fails.
    pub fn dashboard(&self, stats: &DashboardStats) -> anyhow::Result<()> {
        if self.json {
            return print_json(stats);
        }
        println!(
            "{} custom orders, {} employees, {} categories",
            stats.total_custom_orders, stats.total_employees, stats.total_categories
        );
        for (title, buckets) in [
            ("Custom orders by status", &stats.custom_orders_by_status),
            ("Custom orders by day", &stats.custom_orders_by_day),
            ("Employees by country", &stats.employees_by_country),
            ("Categories", &stats.categories),
        ] {
            println!();
            println!("{}", title.bold());
            print!("{}", render_table(&["key", "count"], &bucket_rows(buckets)));
        }
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn bucket_rows(buckets: &[Bucket]) -> Vec<Vec<String>> {
    buckets
        .iter()
        .map(|b| vec![b.key.clone(), b.count.to_string()])
        .collect()
}

/// Left-aligned columns separated by two spaces, header underlined with dashes.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = table_line(headers.iter().copied(), &widths);
    out.push_str(&table_line(rule.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let joined = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}\n", joined.trim_end())
}

fn render_fields(value: &Value) -> String {
    let Value::Object(map) = value else {
        return format!("{}\n", scalar(value));
    };
    let width = map.keys().map(String::len).max().unwrap_or(0);
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(key, v)| {
            let label = format!("{key}:");
            format!("{label:<pad$}  {}\n", scalar(v), pad = width + 1)
        })
        .collect()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Prints notices to stderr and remembers whether an error was shown, so
/// `main` does not print the same failure twice.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    reported_error: AtomicBool,
}

impl ConsoleNotifier {
    #[must_use]
    pub fn reported_error(&self) -> bool {
        self.reported_error.load(Ordering::Relaxed)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        let tag = match level {
            NoticeLevel::Success => "ok".green().bold(),
            NoticeLevel::Error => {
                self.reported_error.store(true, Ordering::Relaxed);
                "error".red().bold()
            }
        };
        eprintln!("{tag}: {message}");
    }
}
