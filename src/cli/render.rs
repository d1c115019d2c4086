//! Rendering of the list view

use crate::error::Result;
use crate::fetch::CollectionFetcher;
use crate::history::{HistoryPort, MemoryHistory};
use crate::pagination::{Affordances, FetchFailure, PaginationController};
use crate::query::ListQuery;
use crate::types::Customer;
use serde::Serialize;
use std::fmt::Write as _;

/// Snapshot of what the list shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView {
    /// Address bar contents
    pub location: String,
    /// Committed query
    pub query: ListQuery,
    /// Displayed records
    pub items: Vec<Customer>,
    /// Total count reported by the server
    pub total_count: u64,
    /// Previous/Next enablement
    pub affordances: Affordances,
    /// Transient failure notice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FetchFailure>,
}

impl ListView {
    /// Capture the controller's state
    pub fn capture<F, H>(controller: &PaginationController<F, H>, location: String) -> Self
    where
        F: CollectionFetcher,
        H: HistoryPort,
    {
        Self {
            location,
            query: controller.query().clone(),
            items: controller.items().to_vec(),
            total_count: controller.total_count(),
            affordances: controller.affordances(),
            failure: controller.last_failure().cloned(),
        }
    }

    /// Capture a controller backed by an in-memory history
    pub fn of<F: CollectionFetcher>(controller: &PaginationController<F, MemoryHistory>) -> Self {
        Self::capture(controller, controller.history().location())
    }
}

/// Render as a single JSON line
pub fn render_json(view: &ListView) -> Result<String> {
    Ok(serde_json::to_string(view)?)
}

/// Render as a text table with pagination controls
pub fn render_pretty(view: &ListView) -> String {
    let mut out = String::new();

    let _ = write!(out, "Customers");
    if view.query.has_filter() {
        let _ = write!(out, "  (search: {})", view.query.q);
    }
    let _ = writeln!(out, "\n{}", view.location);

    if let Some(failure) = &view.failure {
        let _ = writeln!(out, "! {failure}");
    }

    let headers = ["#", "Email", "First name", "Last name"];
    let rows: Vec<[String; 4]> = view
        .items
        .iter()
        .enumerate()
        .map(|(i, c)| {
            [
                (i + 1).to_string(),
                c.display_email().to_string(),
                c.display_first_name().to_string(),
                c.display_last_name().to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let _ = writeln!(out, "{}", format_row(&headers.map(String::from), &widths));
    let _ = writeln!(
        out,
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    if rows.is_empty() {
        let _ = writeln!(out, "(no customers)");
    }
    for row in &rows {
        let _ = writeln!(out, "{}", format_row(row, &widths));
    }

    let first = if view.items.is_empty() {
        0
    } else {
        u64::from(view.query.offset) + 1
    };
    let last = u64::from(view.query.offset) + view.items.len() as u64;
    let _ = writeln!(out, "Showing {first}-{last} of {}", view.total_count);
    let _ = write!(
        out,
        "{}  {}",
        control("Previous", view.affordances.has_previous),
        control("Next", view.affordances.has_more)
    );

    out
}

fn format_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn control(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!("({label})")
    }
}
