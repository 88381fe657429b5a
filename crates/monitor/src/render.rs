//! Plain-text rendering for the CLI.

use std::fmt::Write;

use phc_api::HealthStatus;
use phc_core::{AlertFeedEntry, Facility, TelecomAdvice, UnderservedResponse};

use crate::service::{Fetched, Origin};

/// One-line notice for data that did not come from a live fetch.
pub fn origin_notice<T>(fetched: &Fetched<T>) -> Option<String> {
    let source = match fetched.origin {
        Origin::Live => return None,
        Origin::Cached => "cached",
        Origin::Mock => "mock",
    };
    let reason = fetched
        .error
        .as_ref()
        .map(|e| e.message.as_str())
        .unwrap_or("unknown error");
    Some(format!("! showing {} data: {}", source, reason))
}

pub fn facilities(list: &[Facility]) -> String {
    let mut out = String::new();
    for f in list {
        let _ = writeln!(
            out,
            "{:<10} {:<28} {:<16} {:<6} shortage {}",
            f.id,
            f.display_name,
            f.local_government_area,
            f.alert_level,
            score(f.shortage_score),
        );
    }
    if list.is_empty() {
        out.push_str("No facilities\n");
    }
    out
}

pub fn underserved(response: &UnderservedResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} facilities, average underserved index {:.3}",
        response.count, response.summary.average_underserved_index
    );
    for (rank, row) in response.summary.top_underserved_facilities.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<28} {:.2}",
            rank + 1,
            row.display_name,
            row.underserved_index
        );
    }
    out
}

pub fn feed(entries: &[AlertFeedEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        let marker = if e.simulated { "*" } else { " " };
        let level = e.level.map(|l| l.to_string()).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{}{} [{}] {:<20} {:<6} {}: {} ({})",
            marker, e.timestamp, e.id, e.label, level, e.display_name, e.message, e.channel
        );
    }
    if entries.is_empty() {
        out.push_str("No alerts\n");
    }
    out
}

pub fn advice(list: &[TelecomAdvice]) -> String {
    let mut out = String::new();
    for a in list {
        let _ = writeln!(out, "{}: {}", a.facility_name, a.advice);
        if !a.network_quality.is_empty() {
            let _ = writeln!(out, "  network:  {}", a.network_quality);
        }
        if !a.recommended_provider.is_empty() {
            let _ = writeln!(out, "  provider: {}", a.recommended_provider);
        }
    }
    if list.is_empty() {
        out.push_str("No advice available\n");
    }
    out
}

pub fn health(status: &HealthStatus) -> String {
    if status.message.is_empty() {
        format!("{}\n", status.status)
    } else {
        format!("{}: {}\n", status.status, status.message)
    }
}

fn score(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}
