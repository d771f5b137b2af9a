use serde::{Deserialize, Serialize};

/// Thresholds the audit checklist evaluates against.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditPolicy {
    /// Inclusive word-count range for the primary heading.
    pub heading_word_range: (usize, usize),
    /// Minimum acceptable contrast ratio between the base tokens.
    pub min_contrast: f64,
    /// Largest-contentful-paint budget, milliseconds.
    pub lcp_budget_ms: u64,
    /// Share of the viewport height the CTA bottom edge may reach.
    pub fold_tolerance: f64,
    /// Key that toggles the HUD.
    pub toggle_key: char,
    /// Viewport widths called out for manual layout verification.
    pub breakpoints: Vec<u32>,
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self {
            heading_word_range: (12, 16),
            min_contrast: 4.5,
            lcp_budget_ms: 2500,
            fold_tolerance: 0.98,
            toggle_key: 'g',
            breakpoints: vec![360, 768, 1024, 1440],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_checklist() {
        let policy = AuditPolicy::default();
        assert_eq!(policy.heading_word_range, (12, 16));
        assert_eq!(policy.min_contrast, 4.5);
        assert_eq!(policy.lcp_budget_ms, 2500);
        assert_eq!(policy.fold_tolerance, 0.98);
        assert_eq!(policy.toggle_key, 'g');
        assert_eq!(policy.breakpoints, vec![360, 768, 1024, 1440]);
    }
}
