//! Review-decision display rules.
//!
//! Two pure steps: [`process_review_decision`] narrows the stored decision to
//! the one that is still meaningful for the current head commit, and
//! [`decision_display`] turns that into the glyph, color and tooltip shown
//! next to a reviewer.

use crate::color::DesignColor;
use crate::icons::ResolvedIcons;
use crate::types::ReviewDecision;

/// Decision after taking the pull request's current head commit into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectiveDecision {
    ChangeReq,
    Approved,
    Pending,
    /// Recorded against a commit that is no longer the source head.
    Outdated,
    /// `reviewed` or a value this client does not know.
    Other,
}

/// Narrow a stored decision to its effective value.
///
/// Approvals and pending reviews recorded against another commit become
/// [`EffectiveDecision::Outdated`]; requested changes stay valid whatever the
/// sha. An empty recorded sha (reviewer never looked at any commit) or an
/// unknown current sha never downgrades.
pub fn process_review_decision(
    decision: ReviewDecision,
    sha: &str,
    current_sha: Option<&str>,
) -> EffectiveDecision {
    let stale = match current_sha {
        Some(current) if !sha.is_empty() && !current.is_empty() => sha != current,
        _ => false,
    };
    match decision {
        ReviewDecision::ChangeReq => EffectiveDecision::ChangeReq,
        ReviewDecision::Approved if stale => EffectiveDecision::Outdated,
        ReviewDecision::Approved => EffectiveDecision::Approved,
        ReviewDecision::Pending if stale => EffectiveDecision::Outdated,
        ReviewDecision::Pending => EffectiveDecision::Pending,
        ReviewDecision::Reviewed | ReviewDecision::Unknown => EffectiveDecision::Other,
    }
}

/// Symbolic icon names; the glyph comes from the configured icon preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionIcon {
    ErrorMarker,
    CheckCircle,
    Waiting,
    Dot,
}

impl DecisionIcon {
    pub fn glyph(self, icons: &ResolvedIcons) -> &str {
        match self {
            Self::ErrorMarker => &icons.review_changes,
            Self::CheckCircle => &icons.review_approved,
            Self::Waiting => &icons.review_pending,
            Self::Dot => &icons.review_dot,
        }
    }
}

/// Everything needed to draw the decision marker of one reviewer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionDisplay {
    pub icon: DecisionIcon,
    pub color: DesignColor,
    pub size: u8,
    pub message: &'static str,
    /// Drawn with the dedicated outdated image instead of `icon`.
    pub outdated_image: bool,
}

impl DecisionDisplay {
    /// The glyph to draw for this decision.
    pub fn glyph<'a>(&self, icons: &'a ResolvedIcons) -> &'a str {
        if self.outdated_image {
            &icons.review_outdated
        } else {
            self.icon.glyph(icons)
        }
    }
}

/// Map an effective decision to its display descriptor.
pub fn decision_display(decision: EffectiveDecision) -> DecisionDisplay {
    match decision {
        EffectiveDecision::ChangeReq => DecisionDisplay {
            icon: DecisionIcon::ErrorMarker,
            color: DesignColor::Red700,
            size: 18,
            message: "requested changes",
            outdated_image: false,
        },
        EffectiveDecision::Approved => DecisionDisplay {
            icon: DecisionIcon::CheckCircle,
            color: DesignColor::Green700,
            size: 16,
            message: "approved changes",
            outdated_image: false,
        },
        EffectiveDecision::Pending => DecisionDisplay {
            icon: DecisionIcon::Waiting,
            color: DesignColor::Grey700,
            size: 16,
            message: "pending review",
            outdated_image: false,
        },
        EffectiveDecision::Outdated => DecisionDisplay {
            icon: DecisionIcon::Dot,
            color: DesignColor::Grey100,
            size: 16,
            message: "outdated approval",
            outdated_image: true,
        },
        EffectiveDecision::Other => DecisionDisplay {
            icon: DecisionIcon::Dot,
            color: DesignColor::Grey100,
            size: 16,
            message: "status",
            outdated_image: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_sha_keeps_decision() {
        for (stored, expected) in [
            (ReviewDecision::Approved, EffectiveDecision::Approved),
            (ReviewDecision::Pending, EffectiveDecision::Pending),
            (ReviewDecision::ChangeReq, EffectiveDecision::ChangeReq),
        ] {
            assert_eq!(process_review_decision(stored, "a", Some("a")), expected);
        }
    }

    #[test]
    fn changereq_survives_new_commits() {
        assert_eq!(
            process_review_decision(ReviewDecision::ChangeReq, "a", Some("b")),
            EffectiveDecision::ChangeReq
        );
    }

    #[test]
    fn empty_sha_never_outdated() {
        assert_eq!(
            process_review_decision(ReviewDecision::Pending, "", Some("b")),
            EffectiveDecision::Pending
        );
        assert_eq!(
            process_review_decision(ReviewDecision::Approved, "a", None),
            EffectiveDecision::Approved
        );
    }

    #[test]
    fn only_outdated_uses_image() {
        assert!(decision_display(EffectiveDecision::Outdated).outdated_image);
        assert!(!decision_display(EffectiveDecision::Other).outdated_image);
    }
}
