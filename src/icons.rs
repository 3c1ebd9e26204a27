use crate::config::types::IconConfig;

/// Fully resolved icon set: every slot has a concrete `String` value
/// (either from a preset or from per-icon user overrides).
#[derive(Debug, Clone)]
pub struct ResolvedIcons {
    // Review decision (5)
    pub review_approved: String,
    pub review_changes: String,
    pub review_pending: String,
    pub review_dot: String,
    /// Stand-in for the outdated-approval image.
    pub review_outdated: String,
    // Reviewer row (1)
    pub options: String,
    // Label chip (3)
    pub label_remove: String,
    pub scope_repo: String,
    pub scope_space: String,
    // Activity (1)
    pub spinner: String,
    // Toasts (2)
    pub toast_success: String,
    pub toast_error: String,
}

impl ResolvedIcons {
    /// Default preset.
    fn unicode() -> Self {
        Self {
            review_approved: "\u{2714}".to_owned(), // ✔
            review_changes: "\u{2716}".to_owned(),  // ✖
            review_pending: "\u{25f7}".to_owned(),  // ◷
            review_dot: "\u{00b7}".to_owned(),      // ·
            review_outdated: "\u{2298}".to_owned(), // ⊘
            options: "\u{22ef}".to_owned(),         // ⋯
            label_remove: "\u{00d7}".to_owned(),    // ×
            scope_repo: "\u{25a3}".to_owned(),      // ▣
            scope_space: "\u{25a6}".to_owned(),     // ▦
            spinner: "\u{21bb}".to_owned(),         // ↻
            toast_success: "\u{2714}".to_owned(),   // ✔
            toast_error: "\u{26a0}".to_owned(),     // ⚠
        }
    }

    /// Nerdfont glyphs; requires a patched font.
    fn nerdfont() -> Self {
        Self {
            review_approved: "\u{f058}".to_owned(), //  (check-circle)
            review_changes: "\u{f057}".to_owned(),  //  (times-circle)
            review_pending: "\u{f017}".to_owned(),  //  (clock)
            review_dot: "\u{f111}".to_owned(),      //
            review_outdated: "\u{f05e}".to_owned(), //  (ban)
            options: "\u{f142}".to_owned(),         //  (ellipsis-v)
            label_remove: "\u{f00d}".to_owned(),    //
            scope_repo: "\u{f401}".to_owned(),      //  (repo)
            scope_space: "\u{f0c0}".to_owned(),     //  (users)
            spinner: "\u{f110}".to_owned(),         //
            toast_success: "\u{f00c}".to_owned(),   //
            toast_error: "\u{f071}".to_owned(),     //
        }
    }

    /// Plain ASCII fallback.
    fn ascii() -> Self {
        Self {
            review_approved: "v".to_owned(),
            review_changes: "x".to_owned(),
            review_pending: "o".to_owned(),
            review_dot: ".".to_owned(),
            review_outdated: "~".to_owned(),
            options: "...".to_owned(),
            label_remove: "x".to_owned(),
            scope_repo: "R".to_owned(),
            scope_space: "S".to_owned(),
            spinner: "*".to_owned(),
            toast_success: "ok".to_owned(),
            toast_error: "!!".to_owned(),
        }
    }

    /// Build a resolved icon set from user config: pick a preset, then apply
    /// per-icon overrides.
    pub fn resolve(config: &IconConfig) -> Self {
        let base = match config.preset.as_deref() {
            Some("nerdfont") => Self::nerdfont(),
            Some("ascii") => Self::ascii(),
            _ => Self::unicode(),
        };

        Self {
            review_approved: config.review_approved.clone().unwrap_or(base.review_approved),
            review_changes: config.review_changes.clone().unwrap_or(base.review_changes),
            review_pending: config.review_pending.clone().unwrap_or(base.review_pending),
            review_dot: config.review_dot.clone().unwrap_or(base.review_dot),
            review_outdated: config.review_outdated.clone().unwrap_or(base.review_outdated),
            options: config.options.clone().unwrap_or(base.options),
            label_remove: config.label_remove.clone().unwrap_or(base.label_remove),
            scope_repo: config.scope_repo.clone().unwrap_or(base.scope_repo),
            scope_space: config.scope_space.clone().unwrap_or(base.scope_space),
            spinner: config.spinner.clone().unwrap_or(base.spinner),
            toast_success: config.toast_success.clone().unwrap_or(base.toast_success),
            toast_error: config.toast_error.clone().unwrap_or(base.toast_error),
        }
    }
}
