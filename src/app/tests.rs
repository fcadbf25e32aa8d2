use super::summary::{render, render_text};
use super::*;
use crate::args::{OutputFormat, PositiveUsize};
use crate::config::TargetDefaults;
use crate::domain::{RequestGrid, RequestPlan};
use crate::error::{AppError, TargetError, ValidationError};
use crate::http::RequestExecutor;
use crate::metrics::Outcome;
use async_trait::async_trait;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Instant;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn defaults() -> TargetDefaults {
    TargetDefaults {
        file: PathBuf::from("soap.xml"),
        url: "http://example.com".to_owned(),
        max_payload_size: 100_000,
    }
}

fn values(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|value| (*value).to_owned()).collect()
}

fn positive(value: usize) -> Result<PositiveUsize, String> {
    PositiveUsize::try_from(value).map_err(|err| err.to_string())
}

fn payload_file(content: &[u8]) -> Result<tempfile::NamedTempFile, String> {
    let mut file = tempfile::NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content).map_err(|err| err.to_string())?;
    file.flush().map_err(|err| err.to_string())?;
    Ok(file)
}

fn source(file: &tempfile::NamedTempFile, url: &str) -> TargetSource {
    TargetSource {
        file: file.path().to_path_buf(),
        url: url.to_owned(),
    }
}

/// Answers every request to a URL with a fixed status.
struct StatusByUrl {
    failing_url: String,
}

#[async_trait]
impl RequestExecutor for StatusByUrl {
    async fn execute(&self, plan: &RequestPlan) -> Outcome {
        let started = Instant::now();
        let status = if plan.url().as_str() == self.failing_url {
            503
        } else {
            200
        };
        Outcome::response(started, status, Some(format!("<r{}/>", status)))
    }
}

#[test]
fn no_values_select_default_target() -> Result<(), String> {
    let sources = pair_targets(&[], &defaults()).map_err(|err| err.to_string())?;
    let expected = vec![TargetSource {
        file: PathBuf::from("soap.xml"),
        url: "http://example.com".to_owned(),
    }];
    if sources != expected {
        return Err(format!("Unexpected sources: {:?}", sources));
    }
    Ok(())
}

#[test]
fn single_value_is_a_file_for_the_default_url() -> Result<(), String> {
    let sources =
        pair_targets(&values(&["order.xml"]), &defaults()).map_err(|err| err.to_string())?;
    let expected = vec![TargetSource {
        file: PathBuf::from("order.xml"),
        url: "http://example.com".to_owned(),
    }];
    if sources != expected {
        return Err(format!("Unexpected sources: {:?}", sources));
    }
    Ok(())
}

#[test]
fn values_are_paired_in_order() -> Result<(), String> {
    let sources = pair_targets(
        &values(&["a.xml", "http://a.test/svc", "b.xml", "http://b.test/svc"]),
        &defaults(),
    )
    .map_err(|err| err.to_string())?;
    let urls: Vec<&str> = sources.iter().map(|source| source.url.as_str()).collect();
    if urls != ["http://a.test/svc", "http://b.test/svc"] {
        return Err(format!("Unexpected urls: {:?}", urls));
    }
    if sources.first().map(|source| source.file.clone()) != Some(PathBuf::from("a.xml")) {
        return Err("Expected a.xml to be the first target".to_owned());
    }
    Ok(())
}

#[test]
fn trailing_file_without_url_is_rejected() -> Result<(), String> {
    let result = pair_targets(
        &values(&["a.xml", "http://a.test/svc", "b.xml"]),
        &defaults(),
    );
    match result {
        Err(ValidationError::UnpairedTarget { file }) if file == "b.xml" => Ok(()),
        other => Err(format!("Expected unpaired target error, got {:?}", other)),
    }
}

#[test]
fn load_targets_reads_payload() -> Result<(), String> {
    let file = payload_file(b"<soap:Envelope/>")?;
    let targets = load_targets(&[source(&file, "http://a.test/svc")], 100_000)
        .map_err(|err| err.to_string())?;
    let target = targets
        .first()
        .ok_or_else(|| "Expected one target".to_owned())?;
    if target.payload().as_ref() != b"<soap:Envelope/>" {
        return Err("Payload mismatch".to_owned());
    }
    if target.url().as_str() != "http://a.test/svc" {
        return Err(format!("Unexpected url: {}", target.url()));
    }
    Ok(())
}

#[test]
fn payload_at_limit_is_accepted() -> Result<(), String> {
    let file = payload_file(&[b'x'; 64])?;
    let targets =
        load_targets(&[source(&file, "http://a.test/svc")], 64).map_err(|err| err.to_string())?;
    if targets.first().map(|target| target.payload_len()) != Some(64) {
        return Err("Expected a 64 byte payload".to_owned());
    }
    Ok(())
}

#[test]
fn oversized_payload_is_rejected() -> Result<(), String> {
    let file = payload_file(&[b'x'; 65])?;
    match load_targets(&[source(&file, "http://a.test/svc")], 64) {
        Err(AppError::Target(TargetError::PayloadTooLarge { size: 65, max: 64, .. })) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected oversized payload to be rejected".to_owned()),
    }
}

#[test]
fn missing_payload_file_is_rejected() -> Result<(), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let missing = TargetSource {
        file: dir.path().join("missing.xml"),
        url: "http://a.test/svc".to_owned(),
    };
    match load_targets(&[missing], 100_000) {
        Err(AppError::Target(TargetError::ReadPayload { .. })) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected missing file to be rejected".to_owned()),
    }
}

#[test]
fn non_http_url_is_rejected() -> Result<(), String> {
    let file = payload_file(b"<x/>")?;
    match load_targets(&[source(&file, "ftp://a.test/svc")], 100_000) {
        Err(AppError::Target(TargetError::UnsupportedScheme { scheme, .. })) if scheme == "ftp" => {
            Ok(())
        }
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected ftp url to be rejected".to_owned()),
    }
}

#[test]
fn malformed_url_is_rejected() -> Result<(), String> {
    let file = payload_file(b"<x/>")?;
    match load_targets(&[source(&file, "not a url")], 100_000) {
        Err(AppError::Target(TargetError::InvalidUrl { .. })) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected malformed url to be rejected".to_owned()),
    }
}

#[test]
fn execute_grid_reports_every_cell() -> Result<(), String> {
    run_async_test(async {
        let file_a = payload_file(b"<a/>")?;
        let file_b = payload_file(b"<b/>")?;
        let targets = load_targets(
            &[
                source(&file_a, "http://a.test/svc"),
                source(&file_b, "http://b.test/svc"),
            ],
            100_000,
        )
        .map_err(|err| err.to_string())?;
        let grid = RequestGrid::build(targets, positive(2)?, positive(2)?)
            .map_err(|err| err.to_string())?;
        let executor = Arc::new(StatusByUrl {
            failing_url: "http://b.test/svc".to_owned(),
        });

        let output = execute_grid(executor, &grid, false)
            .await
            .map_err(|err| err.to_string())?;
        let histogram = &output.report.histogram;
        if histogram.count(200) != 4 || histogram.count(503) != 4 {
            return Err(format!("Unexpected histogram: {:?}", histogram));
        }
        if output.report.outcomes.is_some() {
            return Err("Outcomes must only be listed when verbose".to_owned());
        }

        let text = render_text(&output, &grid);
        let mut lines = text.lines();
        let first = lines.next().unwrap_or_default();
        if !first.starts_with("Finished in ") || !first.ends_with(" seconds.") {
            return Err(format!("Unexpected first line: {}", first));
        }
        if lines.next() != Some("") {
            return Err("Expected a blank line after the timing".to_owned());
        }
        if lines.next() != Some("http code 200: 4 occurrences") {
            return Err(format!("Unexpected report:\n{}", text));
        }
        if lines.next() != Some("http code 503: 4 occurrences") {
            return Err(format!("Unexpected report:\n{}", text));
        }
        Ok(())
    })
}

#[test]
fn verbose_report_lists_outcomes_and_bodies() -> Result<(), String> {
    run_async_test(async {
        let file = payload_file(b"<a/>")?;
        let targets = load_targets(&[source(&file, "http://b.test/svc")], 100_000)
            .map_err(|err| err.to_string())?;
        let grid = RequestGrid::build(targets, positive(1)?, positive(2)?)
            .map_err(|err| err.to_string())?;
        let executor = Arc::new(StatusByUrl {
            failing_url: "http://b.test/svc".to_owned(),
        });

        let output = execute_grid(executor, &grid, true)
            .await
            .map_err(|err| err.to_string())?;
        let text = render_text(&output, &grid);
        if !text.contains("[target 0 iteration 0 thread 1] http://b.test/svc -> http code 503") {
            return Err(format!("Missing outcome line:\n{}", text));
        }
        if !text.contains("<r503/>") {
            return Err(format!("Missing response body:\n{}", text));
        }
        Ok(())
    })
}

#[test]
fn json_report_carries_run_metadata() -> Result<(), String> {
    run_async_test(async {
        let file = payload_file(b"<a/>")?;
        let targets = load_targets(&[source(&file, "http://a.test/svc")], 100_000)
            .map_err(|err| err.to_string())?;
        let grid = RequestGrid::build(targets, positive(3)?, positive(2)?)
            .map_err(|err| err.to_string())?;
        let executor = Arc::new(StatusByUrl {
            failing_url: String::new(),
        });

        let output = execute_grid(executor, &grid, false)
            .await
            .map_err(|err| err.to_string())?;
        let rendered =
            render(&output, &grid, OutputFormat::Json).map_err(|err| err.to_string())?;
        let value: serde_json::Value =
            serde_json::from_str(&rendered).map_err(|err| err.to_string())?;

        if value.get("total_requests").and_then(serde_json::Value::as_u64) != Some(6) {
            return Err(format!("Unexpected total: {}", rendered));
        }
        if value.get("iterations").and_then(serde_json::Value::as_u64) != Some(3) {
            return Err(format!("Unexpected iterations: {}", rendered));
        }
        let count = value
            .get("histogram")
            .and_then(|histogram| histogram.get("200"))
            .and_then(serde_json::Value::as_u64);
        if count != Some(6) {
            return Err(format!("Unexpected histogram: {}", rendered));
        }
        if value.get("outcomes").is_some() {
            return Err("Outcomes must be omitted when not verbose".to_owned());
        }
        Ok(())
    })
}
