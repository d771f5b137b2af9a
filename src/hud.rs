//! HUD rendering and visibility control.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::audit::{AuditEngine, AuditReport};
use crate::page::PageSnapshot;
use crate::policy::AuditPolicy;

/// Display region whose contents the HUD fully replaces on each run.
pub trait HudSurface: Send + Sync {
    fn replace(&self, body: &str);
    fn set_hidden(&self, hidden: bool);
}

/// Surface backed by a string buffer, for tests and embedding.
pub struct MemorySurface {
    body: Mutex<String>,
    hidden: Mutex<bool>,
}

impl MemorySurface {
    // Surfaces start hidden; the first successful run unhides them.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            body: Mutex::new(String::new()),
            hidden: Mutex::new(true),
        })
    }

    pub fn body(&self) -> String {
        self.body.lock().clone()
    }

    pub fn is_hidden(&self) -> bool {
        *self.hidden.lock()
    }
}

impl HudSurface for MemorySurface {
    fn replace(&self, body: &str) {
        *self.body.lock() = body.to_string();
    }

    fn set_hidden(&self, hidden: bool) {
        *self.hidden.lock() = hidden;
    }
}

/// Surface that writes the HUD to stdout.
#[derive(Default)]
pub struct ConsoleSurface;

impl HudSurface for ConsoleSurface {
    fn replace(&self, body: &str) {
        println!("{}", body);
    }

    fn set_hidden(&self, hidden: bool) {
        if hidden {
            println!("(HUD hidden)");
        }
    }
}

/// Owns the HUD's visibility state and the audit trigger transitions.
pub struct HudController {
    surface: Arc<dyn HudSurface>,
    visible: bool,
}

impl HudController {
    pub fn new(surface: Arc<dyn HudSurface>) -> Self {
        Self {
            surface,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Run a fresh audit, replace the surface contents and unhide it.
    pub fn show(&mut self, engine: &AuditEngine, page: &PageSnapshot) -> AuditReport {
        let report = engine.run(page);
        self.surface.replace(&render_report(&report, engine.policy()));
        self.surface.set_hidden(false);
        self.visible = true;
        report
    }

    /// Toggle visibility. Re-audits only on the hidden-to-shown transition;
    /// hiding leaves the last rendered report in place.
    pub fn toggle(&mut self, engine: &AuditEngine, page: &PageSnapshot) -> Option<AuditReport> {
        if self.visible {
            self.surface.set_hidden(true);
            self.visible = false;
            debug!("audit HUD hidden");
            None
        } else {
            Some(self.show(engine, page))
        }
    }
}

/// Render the report as the HUD body text.
pub fn render_report(report: &AuditReport, policy: &AuditPolicy) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Audit HUD (press {} to toggle)\n",
        policy.toggle_key.to_ascii_uppercase()
    ));
    for (index, result) in report.results.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {} {}\n",
            index + 1,
            result.status.glyph(),
            result.message
        ));
    }
    let breakpoints = policy
        .breakpoints
        .iter()
        .map(|width| width.to_string())
        .collect::<Vec<_>>()
        .join("/");
    out.push_str(&format!(
        "Breakpoints fit hero+CTA at {}. Check manually with devtools device sizes.\n",
        breakpoints
    ));
    out
}
