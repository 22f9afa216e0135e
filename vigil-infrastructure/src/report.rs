use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use vigil_application::dtos::{ActivityQuery, PriceStats};
use vigil_application::queries::{activity_queries, market_queries};
use vigil_application::AppState;
use vigil_domain::{current_millis, format_millis, ActivityKind, SuspiciousActivity, TrackedItem};

// Snapshot of everything the report surface shows; `stats` lines up with
// `items` index by index.
#[derive(Debug, Serialize)]
pub struct MarketReport {
    pub generated_at_ms: i64,
    pub min_severity: f64,
    pub items: Vec<TrackedItem>,
    pub stats: Vec<PriceStats>,
    pub findings: Vec<SuspiciousActivity>,
    pub flagged: Vec<SuspiciousActivity>,
}

pub fn build_report(
    state: &AppState,
    stats_window_ms: i64,
    min_severity: f64,
) -> Result<MarketReport> {
    let items = market_queries::market_snapshot(state)?;
    let mut stats = Vec::with_capacity(items.len());
    for item in &items {
        stats.push(market_queries::price_stats(state, &item.id, stats_window_ms)?);
    }
    let findings = activity_queries::list_activities(state, ActivityQuery::default())?;
    let flagged = activity_queries::list_activities(
        state,
        ActivityQuery {
            user: None,
            min_severity: Some(min_severity),
        },
    )?;
    Ok(MarketReport {
        generated_at_ms: current_millis(),
        min_severity,
        items,
        stats,
        findings,
        flagged,
    })
}

pub fn render_report(report: &MarketReport) -> String {
    let mut out = String::new();
    out.push_str("=== Vigil Market Report ===\n");
    out.push_str(&format!(
        "generated at {}\n",
        format_millis(report.generated_at_ms)
    ));

    out.push_str(&format!("\nTRACKED ITEMS ({})\n", report.items.len()));
    for (item, stats) in report.items.iter().zip(&report.stats) {
        out.push_str(&format!(
            "  {:<16} owner {:<14} price {:>12} qty {:>8} | avg {} vol {:.2} over {} samples\n",
            item.id,
            item.owner,
            item.price,
            item.quantity,
            stats.average,
            stats.volatility,
            stats.samples
        ));
    }

    let manipulation = count_kind(&report.findings, ActivityKind::PriceManipulation);
    let quantity = count_kind(&report.findings, ActivityKind::UnrealisticQuantity);
    let rapid = count_kind(&report.findings, ActivityKind::RapidTransactions);
    out.push_str(&format!(
        "\nFINDINGS ({} total: {} manipulation, {} quantity, {} rapid)\n",
        report.findings.len(),
        manipulation,
        quantity,
        rapid
    ));

    out.push_str(&format!("\nHIGH SEVERITY (>= {})\n", report.min_severity));
    if report.flagged.is_empty() {
        out.push_str("  none\n");
    }
    for finding in &report.flagged {
        out.push_str(&format!(
            "  [{:>7.1}] {:<22} {:<14} {}  {}\n",
            finding.severity,
            finding.kind.as_str(),
            finding.user_id,
            format_millis(finding.detected_at_ms),
            finding.description
        ));
    }
    out
}

pub fn render_json(report: &MarketReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One JSON document per line, suitable for ingestion by log tooling.
pub fn write_json_export(path: &str, findings: &[SuspiciousActivity]) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut lines = String::new();
    for finding in findings {
        lines.push_str(&serde_json::to_string(finding)?);
        lines.push('\n');
    }
    fs::write(path, lines)?;
    Ok(())
}

fn count_kind(findings: &[SuspiciousActivity], kind: ActivityKind) -> usize {
    findings.iter().filter(|finding| finding.kind == kind).count()
}
