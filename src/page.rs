//! Observable page state the audit engine evaluates.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::HudError;

/// Viewport dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Bounding rectangle of a page element, viewport-relative.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementRect {
    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the rect sits fully inside the viewport, with the bottom edge
    /// allowed up to `fold_tolerance` of the viewport height.
    pub fn within_fold(&self, viewport: Viewport, fold_tolerance: f64) -> bool {
        self.top() >= 0.0
            && self.left() >= 0.0
            && self.right() <= viewport.width
            && self.bottom() <= viewport.height * fold_tolerance
    }
}

/// Snapshot of the hosted page at audit time.
///
/// Every field is a read-only input; the engine never mutates the page.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub viewport: Viewport,
    /// Rendered text of the primary heading, if the page has one.
    #[serde(default)]
    pub heading_text: Option<String>,
    /// Bounding rect of the primary call-to-action, if present.
    #[serde(default)]
    pub cta: Option<ElementRect>,
    /// Design tokens resolved from computed style, raw value strings.
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
    #[serde(default)]
    pub has_skip_link: bool,
    #[serde(default)]
    pub prefers_reduced_motion: bool,
    /// Paint candidate batches the host reported, in delivery order.
    /// Replayed through the telemetry bus by the CLI.
    #[serde(default)]
    pub paint_timeline: Vec<Vec<f64>>,
}

impl PageSnapshot {
    /// Resolved token value, with unset and empty treated alike.
    pub fn token(&self, name: &str) -> Option<&str> {
        self.tokens
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Load a snapshot from a JSON file.
    pub async fn load(path: &Path) -> Result<Self, HudError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| HudError::snapshot(format!("{}: {}", path.display(), err)))?;
        serde_json::from_str(&content).map_err(|err| HudError::snapshot(err.to_string()))
    }
}
