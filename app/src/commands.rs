//! FILENAME: app/src/commands.rs
// PURPOSE: Dashboard commands. Each user interaction is one synchronous
// recomputation: filter, aggregate, bind.

use metrics_engine::{apply_filters, Aggregator, FilterOptions, Metric, MetricError};
use crate::api_types::{PageRequest, PageView, RefreshSummary};
use crate::binder::{bind_page, missing_column_page};
use crate::error::DashboardError;
use crate::state::AppState;
use crate::{log_enter, log_error, log_exit, log_info, log_warn};

/// Re-fetch and re-normalize the source.
pub fn refresh_data(state: &AppState) -> Result<RefreshSummary, String> {
    log_enter!("CMD", "refresh_data");
    let session = state.refresh().map_err(|e| e.to_string())?;

    let summary = RefreshSummary {
        source: session.source.clone(),
        rows: session.dataset.len(),
        loaded_at: session.loaded_at.to_rfc3339(),
        report: *session.dataset.report(),
    };
    log_exit!("CMD", "refresh_data", "rows={}", summary.rows);
    Ok(summary)
}

/// Live option lists for the filter selectors.
pub fn get_filter_options(state: &AppState) -> Result<FilterOptions, String> {
    let session = state.session().map_err(|e| e.to_string())?;
    Ok(session.options.clone())
}

pub fn render_page(state: &AppState, request: &PageRequest) -> Result<PageView, String> {
    log_enter!(
        "CMD",
        "render_page",
        "page='{}' breakdown={}",
        request.page,
        request.breakdown
    );

    let metric = match Metric::from_page(&request.page) {
        Some(metric) => metric,
        None => {
            let err = DashboardError::UnknownPage(request.page.clone());
            log_error!("PAGE", "{}", err);
            return Err(err.to_string());
        }
    };
    let session = state.session().map_err(|e| e.to_string())?;

    let filtered = apply_filters(&session.dataset, &request.filters);
    log_info!(
        "PAGE",
        "{}: {} of {} rows after filters",
        metric,
        filtered.len(),
        session.dataset.len()
    );

    let aggregator = Aggregator::new(&state.config.domains);
    let view = match aggregator.aggregate(&filtered, request.breakdown, metric) {
        Ok(result) => bind_page(&result, request, aggregator.domains()),
        Err(err @ MetricError::MissingColumn { column, .. }) => {
            log_warn!("PAGE", "{}", err);
            missing_column_page(metric, state.config.columns.header(column), &request.filters)
        }
    };

    log_exit!("CMD", "render_page", "title='{}'", view.title);
    Ok(view)
}
