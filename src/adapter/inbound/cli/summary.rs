//! Run summary rendering.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::domain::evaluation::DiscardReason;
use crate::domain::run::RunSummary;

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Count")]
    count: u64,
}

#[derive(Tabled)]
struct DiscardRow {
    #[tabled(rename = "Reason")]
    reason: &'static str,
    #[tabled(rename = "Count")]
    count: u64,
}

fn count_rows(summary: &RunSummary) -> Vec<CountRow> {
    vec![
        CountRow {
            metric: "Seen",
            count: summary.seen,
        },
        CountRow {
            metric: "Excluded",
            count: summary.excluded,
        },
        CountRow {
            metric: "Refused",
            count: summary.refused,
        },
        CountRow {
            metric: "Accepted",
            count: summary.accepted,
        },
        CountRow {
            metric: "Discarded",
            count: summary.discarded_total(),
        },
        CountRow {
            metric: "Flushes",
            count: summary.flushes,
        },
        CountRow {
            metric: "Persisted",
            count: summary.persisted,
        },
        CountRow {
            metric: "Dropped",
            count: summary.dropped,
        },
    ]
}

/// Every reason with its count, zeros included.
fn discard_rows(summary: &RunSummary) -> Vec<DiscardRow> {
    DiscardReason::ALL
        .into_iter()
        .map(|reason| DiscardRow {
            reason: reason.as_str(),
            count: summary.discarded.get(reason),
        })
        .collect()
}

/// Print the summary as tables, or as one JSON object with `--json`.
pub fn render(summary: &RunSummary) {
    if output::is_json() {
        output::json_output(json!({
            "command": "run",
            "summary": summary,
        }));
        return;
    }

    output::section("Run Summary");
    output::field("Run", &summary.run_id);
    output::field(
        "Elapsed",
        format!("{:.1}s", summary.elapsed().as_secs_f64()),
    );
    output::lines(&Table::new(count_rows(summary)).to_string());

    if summary.discarded_total() > 0 {
        output::section("Discards");
        output::lines(&Table::new(discard_rows(summary)).to_string());
    }

    if summary.accepted > 0 {
        output::success(&format!(
            "{} profitable candidates",
            output::positive(summary.accepted)
        ));
    }
    if summary.dropped > 0 {
        output::warning(&format!(
            "{} accepted records were dropped after failed flushes",
            output::negative(summary.dropped)
        ));
    }
    if summary.worker_failures > 0 {
        output::warning(&format!("{} workers failed", summary.worker_failures));
    }
    if summary.cancelled {
        output::warning("Run was interrupted before the producer finished");
    }
}
