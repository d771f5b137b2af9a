//! The audit engine: six UX heuristics evaluated against a page snapshot
//! and the paint signal, in a fixed checklist order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::color::{contrast_ratio, Rgb};
use crate::page::PageSnapshot;
use crate::paint::PaintSignal;
use crate::policy::AuditPolicy;

const FG_TOKEN: &str = "--fg";
const BG_TOKEN: &str = "--bg";
const FALLBACK_FG: &str = "#000000";
const FALLBACK_BG: &str = "#ffffff";

/// Outcome class of a single heuristic.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Ok,
    Warn,
    Bad,
}

impl CheckStatus {
    pub fn glyph(&self) -> char {
        match self {
            Self::Ok => '✔',
            Self::Warn => '▲',
            Self::Bad => '✖',
        }
    }
}

/// One heuristic outcome; immutable once produced.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Ok,
            message: message.into(),
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warn,
            message: message.into(),
        }
    }

    fn bad(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Bad,
            message: message.into(),
        }
    }
}

/// Report produced by one evaluation pass: exactly one result per heuristic,
/// in checklist order. The run id and timestamp exist for log correlation
/// and are not part of report equality.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<CheckResult>,
}

/// Evaluates the checklist on demand. Holds a read-only handle on the paint
/// signal; the observer task is the only writer.
pub struct AuditEngine {
    policy: AuditPolicy,
    paint: PaintSignal,
}

impl AuditEngine {
    pub fn new(policy: AuditPolicy, paint: PaintSignal) -> Self {
        Self { policy, paint }
    }

    pub fn policy(&self) -> &AuditPolicy {
        &self.policy
    }

    /// Evaluate all six heuristics against the snapshot.
    ///
    /// Re-evaluates from scratch on every call; never fails. Missing page
    /// elements and unknown telemetry degrade to their documented Bad/Warn
    /// results instead of erroring.
    pub fn run(&self, page: &PageSnapshot) -> AuditReport {
        let results = vec![
            heading_word_count(page, &self.policy),
            cta_above_fold(page, &self.policy),
            base_contrast(page, &self.policy),
            skip_link_present(page),
            motion_preference(page),
            largest_contentful_paint(&self.paint, &self.policy),
        ];

        let report = AuditReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            results,
        };
        debug!(run_id = %report.run_id, "audit evaluated");
        report
    }
}

fn heading_word_count(page: &PageSnapshot, policy: &AuditPolicy) -> CheckResult {
    let Some(text) = page.heading_text.as_deref() else {
        return CheckResult::bad("Missing heading");
    };
    let words = text.split_whitespace().count();
    let (min, max) = policy.heading_word_range;
    let message = format!("Hero H1 words: {} (target {}–{})", words, min, max);
    if (min..=max).contains(&words) {
        CheckResult::ok(message)
    } else {
        CheckResult::warn(message)
    }
}

fn cta_above_fold(page: &PageSnapshot, policy: &AuditPolicy) -> CheckResult {
    let Some(rect) = page.cta else {
        return CheckResult::bad("Primary CTA missing");
    };
    let message = "Primary CTA visible above the fold";
    if rect.within_fold(page.viewport, policy.fold_tolerance) {
        CheckResult::ok(message)
    } else {
        CheckResult::bad(message)
    }
}

fn base_contrast(page: &PageSnapshot, policy: &AuditPolicy) -> CheckResult {
    let fg = page.token(FG_TOKEN).unwrap_or(FALLBACK_FG);
    let bg = page.token(BG_TOKEN).unwrap_or(FALLBACK_BG);
    let target = policy.min_contrast;

    match (Rgb::parse(fg), Rgb::parse(bg)) {
        (Ok(fg), Ok(bg)) => {
            let ratio = contrast_ratio(fg, bg);
            let message = format!("Base contrast ratio {:.2} (target ≥{})", ratio, target);
            if ratio >= target {
                CheckResult::ok(message)
            } else {
                CheckResult::bad(message)
            }
        }
        // A malformed token degrades, it never throws past the check.
        _ => CheckResult::bad(format!("Base contrast ratio unknown (target ≥{})", target)),
    }
}

fn skip_link_present(page: &PageSnapshot) -> CheckResult {
    let message = "Skip link present";
    if page.has_skip_link {
        CheckResult::ok(message)
    } else {
        CheckResult::bad(message)
    }
}

// Informational line: reports that the preference is handled, not its value.
fn motion_preference(page: &PageSnapshot) -> CheckResult {
    let _ = page.prefers_reduced_motion;
    CheckResult::ok("prefers-reduced-motion respected")
}

fn largest_contentful_paint(paint: &PaintSignal, policy: &AuditPolicy) -> CheckResult {
    let budget = policy.lcp_budget_ms;
    match paint.latest() {
        Some(ms) if ms <= budget => {
            CheckResult::ok(format!("LCP ~ {} ms (target ≤{}ms)", ms, budget))
        }
        Some(ms) => CheckResult::warn(format!("LCP ~ {} ms (target ≤{}ms)", ms, budget)),
        None => CheckResult::warn(format!("LCP ~ … ms (target ≤{}ms)", budget)),
    }
}
