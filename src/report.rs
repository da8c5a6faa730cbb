// Report rendering: pick one ticker out of the gateway response, order its
// scenarios numerically and lay them out as a fixed-width table.

use crate::api::AnalysisResponse;
use crate::error::{RiskError, RiskResult};
use serde::Deserialize;
use std::cmp::Ordering;

const RULE_WIDTH: usize = 60;

/// Metrics the gateway reports for one scenario. Extra fields are ignored.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ScenarioMetrics {
    pub pnl: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
}

/// Look up `ticker` in the response. An exact key wins; otherwise a single
/// case-insensitive match is accepted. No match at all means no rows.
fn ticker_entry<'a>(
    ticker: &str,
    response: &'a AnalysisResponse,
) -> Option<&'a serde_json::Value> {
    if let Some(v) = response.get(ticker) {
        return Some(v);
    }
    let mut folded = response
        .iter()
        .filter(|(k, _)| k.eq_ignore_ascii_case(ticker));
    match (folded.next(), folded.next()) {
        (Some((key, v)), None) => {
            log::warn!("response has {:?} instead of requested {:?}", key, ticker);
            Some(v)
        }
        _ => None,
    }
}

/// Numeric order on scenario values; `-0` equals `0` and NaN goes last.
fn scenario_order(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Decode the scenarios for `ticker` and sort them by the numeric value of
/// their labels. Every label and record is checked before anything is
/// sorted; labels with equal values keep the order the gateway sent.
pub fn scenario_rows(
    ticker: &str,
    response: &AnalysisResponse,
) -> RiskResult<Vec<(String, ScenarioMetrics)>> {
    let metrics_error = |reason: String| RiskError::Metrics {
        ticker: ticker.to_string(),
        reason,
    };
    let scenarios = match ticker_entry(ticker, response) {
        Some(value) => value
            .as_object()
            .ok_or_else(|| metrics_error(format!("expected an object, got {}", value)))?,
        None => return Ok(Vec::new()),
    };

    let mut keyed = Vec::with_capacity(scenarios.len());
    for (label, record) in scenarios {
        let key = label
            .trim()
            .parse::<f64>()
            .map_err(|_| RiskError::ScenarioLabel(label.clone()))?;
        let m = ScenarioMetrics::deserialize(record)
            .map_err(|e| metrics_error(format!("scenario {}: {}", label, e)))?;
        keyed.push((key, label.clone(), m));
    }
    keyed.sort_by(|a, b| scenario_order(a.0, b.0));

    Ok(keyed.into_iter().map(|(_, label, m)| (label, m)).collect())
}

/// Format one table row.
pub fn format_row(label: &str, m: &ScenarioMetrics) -> String {
    format!(
        "{:<12} | {:>12.2} | {:>10.2} | {:>10.4} | {:>10.2}",
        label, m.pnl, m.delta, m.gamma, m.theta
    )
}

/// Render the full report for `ticker`. Nothing is returned unless every
/// row could be produced.
pub fn render(ticker: &str, response: &AnalysisResponse) -> RiskResult<String> {
    let rows = scenario_rows(ticker, response)?;
    let double = "=".repeat(RULE_WIDTH);

    let mut lines = vec![
        String::new(),
        double.clone(),
        format!("RISK REPORT: {}", ticker),
        double.clone(),
        format!(
            "{:<12} | {:<12} | {:<10} | {:<10} | {:<10}",
            "Scenario", "PnL", "Delta", "Gamma", "Theta"
        ),
        "-".repeat(RULE_WIDTH),
    ];
    lines.extend(rows.iter().map(|(label, m)| format_row(label, m)));
    lines.push(double);

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}
