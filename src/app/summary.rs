use serde::Serialize;
use tracing::info;

use crate::{
    args::OutputFormat,
    domain::RequestGrid,
    error::AppResult,
    metrics::{OutcomeRecord, RunReport},
};

use super::runner::RunOutput;

#[derive(Serialize)]
struct JsonReport<'a> {
    started_at: String,
    elapsed_ms: u64,
    iterations: usize,
    threads: usize,
    targets: Vec<&'a str>,
    #[serde(flatten)]
    report: &'a RunReport,
}

/// Renders the run report in the requested format.
///
/// # Errors
///
/// Returns an error when the JSON report cannot be serialized.
pub(crate) fn render(
    output: &RunOutput,
    grid: &RequestGrid,
    format: OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(output, grid)),
        OutputFormat::Json => render_json(output, grid),
    }
}

/// Prints the rendered report, or writes it to `path` when one is given.
///
/// # Errors
///
/// Returns an error when the output file cannot be written.
pub(crate) fn emit(rendered: &str, path: Option<&str>) -> AppResult<()> {
    match path {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!("Report written to {}", path);
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

pub(crate) fn render_text(output: &RunOutput, grid: &RequestGrid) -> String {
    let report = &output.report;
    let mut lines = Vec::new();
    lines.push(format!(
        "Finished in {}.{:03} seconds.",
        output.elapsed.as_secs(),
        output.elapsed.subsec_millis()
    ));
    lines.push(String::new());

    for (code, count) in report.histogram.iter() {
        lines.push(format!("http code {}: {} occurrences", code, count));
    }
    if report.transport_failures > 0 {
        lines.push(format!("transport failures: {}", report.transport_failures));
    }

    let latency = &report.latency;
    lines.push(format!(
        "Latency (ms): min {} / avg {} / max {} | p50 {} / p90 {} / p99 {}",
        latency.min_ms,
        latency.avg_ms,
        latency.max_ms,
        latency.p50_ms,
        latency.p90_ms,
        latency.p99_ms
    ));

    if let Some(outcomes) = report.outcomes.as_ref() {
        lines.push(String::new());
        lines.push("Outcomes:".to_owned());
        for record in outcomes {
            lines.push(outcome_line(record, grid));
            if let Some(body) = record.body.as_deref() {
                lines.push(body.to_owned());
            }
        }
    }

    lines.join("\n")
}

fn outcome_line(record: &OutcomeRecord, grid: &RequestGrid) -> String {
    let url = grid
        .targets()
        .get(record.target)
        .map_or("?", |target| target.url().as_str());
    let failure = record
        .failure
        .map(|failure| format!(" ({})", failure.as_str()))
        .unwrap_or_default();
    format!(
        "[target {} iteration {} thread {}] {} -> http code {}{} in {}ms",
        record.target,
        record.iteration,
        record.thread,
        url,
        record.status_code,
        failure,
        record.latency_ms
    )
}

fn render_json(output: &RunOutput, grid: &RequestGrid) -> AppResult<String> {
    let shape = grid.shape();
    let document = JsonReport {
        started_at: output.started_at.to_rfc3339(),
        elapsed_ms: u64::try_from(output.elapsed.as_millis()).unwrap_or(u64::MAX),
        iterations: shape.iterations(),
        threads: shape.threads(),
        targets: grid
            .targets()
            .iter()
            .map(|target| target.url().as_str())
            .collect(),
        report: &output.report,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
