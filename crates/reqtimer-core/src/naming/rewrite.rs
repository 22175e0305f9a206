//! Ordered literal rewrite steps.
//!
//! Each step is a plain, non-overlapping, left-to-right replace-all. Steps run
//! once each, in slice order: `**` must come before `*`, and the dash
//! collapsing steps must run after the token substitutions that produce the
//! dashes.

/// One literal substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteStep {
    pub from: &'static str,
    pub to: &'static str,
}

impl RewriteStep {
    pub const fn new(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }

    pub fn apply(&self, input: &str) -> String {
        input.replace(self.from, self.to)
    }
}

/// Route pattern cleanup: template markers and wildcards become dash-delimited words.
pub const ROUTE_PATTERN_STEPS: &[RewriteStep] = &[
    RewriteStep::new("{", "-"),
    RewriteStep::new("}", "-"),
    RewriteStep::new("[", "-"),
    RewriteStep::new("]", "-"),
    RewriteStep::new("**", "-star-star-"),
    RewriteStep::new("*", "-star-"),
    RewriteStep::new("/-", "/"),
    RewriteStep::new("-/", "/"),
];

/// Graphite-compatible key: path delimiters become dots.
///
/// `..` is collapsed in a single pass, so runs of three or more dots are only
/// partially collapsed.
pub const METRIC_KEY_STEPS: &[RewriteStep] = &[
    RewriteStep::new("/", "."),
    RewriteStep::new("..", "."),
];

/// Run every step over `input`, in order.
pub fn apply_all(steps: &[RewriteStep], input: &str) -> String {
    steps
        .iter()
        .fold(input.to_string(), |acc, step| step.apply(&acc))
}
