//! Week planning commands.
//!
//! Each command loads the plan, applies one operation, saves the plan if it
//! changed, and prints the result.
//!
//! # Usage
//!
//! ```bash
//! # Start a plan for the week commencing 20 October
//! sp-cli init --week-commencing 2025-10-20
//!
//! # Enter this week's numbers
//! sp-cli set 13 our_stock 100
//! sp-cli set 13 estimatedSales 7
//!
//! # Review, then roll over into next week
//! sp-cli show
//! sp-cli alerts
//! sp-cli advance
//! ```

use std::io::Write;

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::Serialize;
use stock_planner_core::{InputField, Planner, ProductId, StockAlerts, WeekView};
use tracing::info;

use crate::commands::state;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::render;

/// Label in the planner's "week commencing" style, e.g. `WC 20/10`.
#[must_use]
pub fn week_commencing_label(date: NaiveDate) -> String {
    format!("WC {}", date.format("%d/%m"))
}

/// The Monday on or before `date`.
#[must_use]
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Machine-readable week output for `--json`.
#[derive(Serialize)]
struct WeekReport<'a> {
    week_number: usize,
    week_count: usize,
    #[serde(flatten)]
    view: WeekView<'a>,
    alerts: StockAlerts,
}

async fn load_and_save<T>(
    config: &CliConfig,
    apply: impl FnOnce(&mut Planner) -> Result<T, CliError>,
) -> Result<(Planner, T), CliError> {
    let mut planner = state::load_planner(config).await?;
    let output = apply(&mut planner)?;
    state::save_planner(&config.state_path, &planner).await?;
    Ok((planner, output))
}

fn print_position(planner: &Planner) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    render::week_header(&mut out, planner.store())?;
    out.flush()?;
    Ok(())
}

/// Create a new plan with one blank week.
///
/// The first week is labelled with `label` if given, otherwise with the
/// week commencing `week_commencing` (default: this week's Monday).
///
/// # Errors
///
/// Returns [`CliError::StateExists`] if a plan exists and `force` is false.
pub async fn init(
    config: &CliConfig,
    label: Option<String>,
    week_commencing: Option<NaiveDate>,
    force: bool,
) -> Result<(), CliError> {
    let path = config.state_path.as_path();
    if !force && state::plan_exists(path).await? {
        return Err(CliError::StateExists(path.to_path_buf()));
    }

    let label = label.unwrap_or_else(|| {
        let monday = week_commencing.unwrap_or_else(|| monday_of(Local::now().date_naive()));
        week_commencing_label(monday)
    });

    let catalog = state::load_catalog(config).await?;
    let planner = Planner::new(catalog, label);
    state::save_planner(path, &planner).await?;

    info!(path = %path.display(), label = planner.store().current().label(), "Plan created");
    print_position(&planner)
}

/// Print the current week, grouped by category.
///
/// # Errors
///
/// Returns an error if the plan can't be loaded or stdout is closed.
pub async fn show(config: &CliConfig, json: bool) -> Result<(), CliError> {
    let planner = state::load_planner(config).await?;
    let view = planner.view();
    let mut out = std::io::stdout().lock();

    if json {
        let report = WeekReport {
            week_number: planner.store().current_index() + 1,
            week_count: planner.store().len(),
            alerts: view.alerts(),
            view,
        };
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        render::week_header(&mut out, planner.store())?;
        render::alerts(&mut out, &view.alerts())?;
        render::week(&mut out, &view)?;
    }
    out.flush()?;
    Ok(())
}

/// Set one input of the current week.
///
/// `value` is taken as typed: empty or non-numeric text is stored as zero.
///
/// # Errors
///
/// Returns an error for an unknown product or field name.
pub async fn set(
    config: &CliConfig,
    product: &str,
    field: &str,
    value: &str,
) -> Result<(), CliError> {
    let field: InputField = field.parse().map_err(CliError::InvalidField)?;

    let (planner, id) = load_and_save(config, |planner| {
        let id: ProductId = product
            .parse()
            .ok()
            .filter(|id| planner.catalog().contains(*id))
            .ok_or_else(|| CliError::UnknownProduct(product.to_owned()))?;
        planner.set_input(id, field, value)?;
        Ok(id)
    })
    .await?;

    let view = planner.view();
    let mut out = std::io::stdout().lock();
    if let Some(row) = view.get(id) {
        info!(product = %id, %field, value = %row.inputs.get(field), "Input updated");
        writeln!(
            out,
            "{}: {} = {}",
            row.product.name,
            field,
            render::quantity(row.inputs.get(field))
        )?;
        writeln!(
            out,
            "  warehouse final {}, 3PL final {}, cover {} days ({})",
            render::quantity(row.metrics.our_final_stock),
            render::quantity(row.metrics.thpl_final_stock),
            row.metrics.days_cover,
            row.metrics.status
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Relabel the current week.
///
/// # Errors
///
/// Returns an error if the plan can't be loaded or saved.
pub async fn rename(config: &CliConfig, label: &str) -> Result<(), CliError> {
    let (planner, ()) = load_and_save(config, |planner| {
        planner.rename_current_week(label);
        Ok(())
    })
    .await?;
    print_position(&planner)
}

/// Roll the latest week over into a new week.
///
/// # Errors
///
/// Returns an error unless the current week is the latest one.
pub async fn advance(config: &CliConfig, label: Option<String>) -> Result<(), CliError> {
    let (planner, _) = load_and_save(config, |planner| {
        let index = match label {
            Some(label) => planner.advance_week_with_label(label)?,
            None => planner.advance_week()?,
        };
        Ok(index)
    })
    .await?;
    print_position(&planner)
}

/// Move to the previous week.
///
/// # Errors
///
/// Returns an error when already on the first week.
pub async fn previous(config: &CliConfig) -> Result<(), CliError> {
    let (planner, _) =
        load_and_save(config, |planner| Ok(planner.previous_week()?)).await?;
    print_position(&planner)
}

/// Move to the next week.
///
/// # Errors
///
/// Returns an error when already on the last week.
pub async fn next(config: &CliConfig) -> Result<(), CliError> {
    let (planner, _) = load_and_save(config, |planner| Ok(planner.next_week()?)).await?;
    print_position(&planner)
}

/// Move to a week by its 1-based number.
///
/// # Errors
///
/// Returns an error if no such week exists.
pub async fn goto(config: &CliConfig, week: usize) -> Result<(), CliError> {
    let index = week.checked_sub(1).ok_or(CliError::InvalidWeekNumber)?;
    let (planner, _) =
        load_and_save(config, |planner| Ok(planner.select_week(index)?)).await?;
    print_position(&planner)
}

/// Print the critical and caution products of the current week.
///
/// # Errors
///
/// Returns an error if the plan can't be loaded or stdout is closed.
pub async fn alerts(config: &CliConfig, json: bool) -> Result<(), CliError> {
    let planner = state::load_planner(config).await?;
    let alerts = planner.alerts();
    let mut out = std::io::stdout().lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &alerts)?;
        writeln!(out)?;
    } else if alerts.is_clear() {
        writeln!(
            out,
            "{}: all {} products have more than 21 days cover",
            planner.store().current().label(),
            alerts.good
        )?;
    } else {
        render::week_header(&mut out, planner.store())?;
        render::alerts(&mut out, &alerts)?;
    }
    out.flush()?;
    Ok(())
}
