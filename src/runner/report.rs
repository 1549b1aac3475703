//! Per-scenario outcomes and the suite summary

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::core::Result;
use crate::scenarios::{ScenarioKind, ScenarioReport};

/// How one scenario ended
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub kind: ScenarioKind,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ScenarioReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScenarioOutcome {
    pub fn new(kind: ScenarioKind, result: Result<ScenarioReport>, duration: Duration) -> Self {
        let (report, error) = match result {
            Ok(report) => (Some(report), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            kind,
            duration_ms: duration.as_millis() as u64,
            report,
            error,
        }
    }

    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Every outcome of one suite run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub outcomes: Vec<ScenarioOutcome>,
    pub duration_ms: u64,
}

impl SuiteReport {
    pub fn new(outcomes: Vec<ScenarioOutcome>, duration: Duration) -> Self {
        Self {
            outcomes,
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// One-line pass/fail summary
    pub fn headline(&self) -> String {
        format!(
            "{} passed, {} failed in {:.1}s",
            self.passed(),
            self.failed(),
            self.duration_ms as f64 / 1000.0
        )
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match (&outcome.report, &outcome.error) {
                (_, Some(error)) => writeln!(f, "FAIL {:<10} {}", outcome.kind, error)?,
                (Some(report), None) => writeln!(f, "ok   {:<10} {}", outcome.kind, report)?,
                (None, None) => writeln!(f, "ok   {}", outcome.kind)?,
            }
        }
        write!(f, "{}", self.headline())
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioReport::Ratings(r) => write!(
                f,
                "{} of {} products rated 4 stars or less ({} re-locations)",
                r.at_or_below_ceiling, r.badges_seen, r.relocations
            ),
            ScenarioReport::Discounts(d) => {
                write!(
                    f,
                    "{} of {} cards above threshold, {} skipped",
                    d.above_threshold.len(),
                    d.cards_seen,
                    d.skipped
                )?;
                for product in &d.above_threshold {
                    write!(f, "\n       {}% {}", product.percent, product.title)?;
                }
                Ok(())
            }
            ScenarioReport::Reviews(r) => write!(
                f,
                "filter {}, review counts {:?}",
                if r.filter.clicked { "applied" } else { "skipped" },
                r.review_counts
            ),
        }
    }
}
