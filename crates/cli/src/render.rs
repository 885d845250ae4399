//! Plain-text rendering of weeks, alerts and the catalog.
//!
//! Everything writes to a caller-supplied `Write` so commands can target
//! stdout and tests can target a buffer.

use std::io::{self, Write};

use rust_decimal::Decimal;
use stock_planner_core::{
    Catalog, ProductView, StockAlerts, StockStatus, WeekStore, WeekView,
};

const NUMBER_WIDTH: usize = 8;

/// Format a quantity without trailing zeros.
#[must_use]
pub fn quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

fn status_label(status: StockStatus) -> &'static str {
    match status {
        StockStatus::Critical => "CRITICAL",
        StockStatus::Caution => "CAUTION",
        StockStatus::Good => "ok",
    }
}

/// Write the week header: label and position.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn week_header(out: &mut impl Write, store: &WeekStore) -> io::Result<()> {
    writeln!(
        out,
        "{}  (week {} of {})",
        store.current().label(),
        store.current_index() + 1,
        store.len()
    )
}

/// Write the alert banners. Nothing is written when all products are good.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn alerts(out: &mut impl Write, alerts: &StockAlerts) -> io::Result<()> {
    if !alerts.critical.is_empty() {
        writeln!(
            out,
            "Critical Stock Alert ({} items below 10 days cover)",
            alerts.critical.len()
        )?;
        for entry in &alerts.critical {
            writeln!(out, "  {}: {} days", entry.name, entry.days_cover)?;
        }
    }
    if !alerts.caution.is_empty() {
        writeln!(
            out,
            "Low Stock Warning ({} items 10-21 days cover)",
            alerts.caution.len()
        )?;
        for entry in &alerts.caution {
            writeln!(out, "  {}: {} days", entry.name, entry.days_cover)?;
        }
    }
    Ok(())
}

fn row(out: &mut impl Write, name_width: usize, row: &ProductView<'_>) -> io::Result<()> {
    let inputs = &row.inputs;
    let metrics = &row.metrics;

    let name = if row.product.is_bundle {
        format!("{} [bundle]", row.product.name)
    } else {
        row.product.name.clone()
    };
    let warehouse_raw = if row.product.is_bundle {
        "-".to_string()
    } else {
        quantity(metrics.pack_sending)
    };
    let bundle = if metrics.bundle_deduction > Decimal::ZERO {
        format!("-{}", quantity(metrics.bundle_deduction))
    } else {
        "-".to_string()
    };

    writeln!(
        out,
        "{name:<name_width$} | {:>w$}{:>w$}{:>w$}{:>w$}{:>w$} | {:>w$}{:>w$}{:>w$}{:>w$}{:>w$}{:>w$}{:>w$} | {}",
        quantity(inputs.our_stock),
        quantity(inputs.making),
        quantity(inputs.sending),
        warehouse_raw,
        quantity(metrics.our_final_stock),
        quantity(inputs.thpl_stock),
        metrics.days_cover.to_string(),
        quantity(inputs.estimated_sales),
        quantity(metrics.est_sales_raw),
        bundle,
        quantity(metrics.total_thpl_sending),
        quantity(metrics.thpl_final_stock),
        status_label(metrics.status),
        w = NUMBER_WIDTH,
    )
}

/// Write every category table of a derived week.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn week(out: &mut impl Write, view: &WeekView<'_>) -> io::Result<()> {
    let name_width = view
        .rows()
        .map(|r| r.product.name.chars().count() + if r.product.is_bundle { 9 } else { 0 })
        .max()
        .unwrap_or(0)
        .max("Product".len());

    for group in view.groups() {
        writeln!(out)?;
        writeln!(out, "== {} ==", group.title)?;
        writeln!(
            out,
            "{:<name_width$} | {:^width$} | {:^thpl$} |",
            "",
            "Our warehouse",
            "3PL",
            width = NUMBER_WIDTH * 5,
            thpl = NUMBER_WIDTH * 7,
        )?;
        writeln!(
            out,
            "{:<name_width$} | {:>w$}{:>w$}{:>w$}{:>w$}{:>w$} | {:>w$}{:>w$}{:>w$}{:>w$}{:>w$}{:>w$}{:>w$} | Status",
            "Product",
            "Stock",
            "Making",
            "Send",
            "Raw",
            "Final",
            "Stock",
            "Cover",
            "Est",
            "Raw",
            "Bundle",
            "Total",
            "Final",
            w = NUMBER_WIDTH,
        )?;
        for product in group.products {
            row(out, name_width, product)?;
        }
    }
    Ok(())
}

/// Write the catalog as a list.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn catalog(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    for product in catalog.products() {
        if let Some(recipe) = catalog.bundle_components(product.id) {
            let components: Vec<String> =
                recipe.components.iter().map(ToString::to_string).collect();
            writeln!(
                out,
                "{:>4}  {:<11} {} (bundle: {} × [{}])",
                product.id,
                product.category,
                product.name,
                recipe.units_per_item,
                components.join(", ")
            )?;
        } else {
            writeln!(
                out,
                "{:>4}  {:<11} {} (pack of {})",
                product.id, product.category, product.name, product.pack_size
            )?;
        }
    }
    Ok(())
}
