//! Label-to-score tables and chat UI constants.

use std::time::Duration;

pub const NEUTRAL_SCORE: f64 = 0.5;

pub const MOBILE_BREAKPOINT: u32 = 768;
pub const TYPING_INDICATOR_DELAY: Duration = Duration::from_millis(150);

const BIAS_SCORES: &[(&str, f64)] = &[
    ("neutral", 0.5),
    ("slightly biased", 0.3),
    ("biased", 0.2),
    ("heavily biased", 0.1),
    ("unbiased", 0.8),
];

const TONE_SCORES: &[(&str, f64)] = &[
    ("balanced", 0.5),
    ("emotional", 0.3),
    ("very emotional", 0.2),
    ("neutral", 0.7),
    ("objective", 0.8),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickPrompt {
    pub label: &'static str,
    pub value: &'static str,
}

pub const QUICK_PROMPTS: [QuickPrompt; 3] = [
    QuickPrompt {
        label: "Analyze for bias",
        value: "Analyze this news article for bias",
    },
    QuickPrompt {
        label: "Source credibility",
        value: "Evaluate source credibility",
    },
    QuickPrompt {
        label: "Detect emotional manipulation",
        value: "Detect emotional manipulation",
    },
];

fn lookup(table: &[(&str, f64)], label: Option<&str>) -> f64 {
    let Some(label) = label.filter(|l| !l.is_empty()) else {
        return NEUTRAL_SCORE;
    };
    let label = label.to_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, score)| *score)
        .unwrap_or(NEUTRAL_SCORE)
}

/// Unknown or missing labels score as neutral.
pub fn bias_score(label: Option<&str>) -> f64 {
    lookup(BIAS_SCORES, label)
}

pub fn tone_score(label: Option<&str>) -> f64 {
    lookup(TONE_SCORES, label)
}

pub fn is_mobile_width(viewport_width: u32) -> bool {
    viewport_width <= MOBILE_BREAKPOINT
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("neutral"), 0.5)]
    #[case(Some("Heavily Biased"), 0.1)]
    #[case(Some("unbiased"), 0.8)]
    #[case(Some("center-left"), 0.5)]
    #[case(Some(""), 0.5)]
    #[case(Some(" biased"), 0.5)]
    #[case(Some("biased "), 0.5)]
    #[case(None, 0.5)]
    fn bias_labels(#[case] label: Option<&str>, #[case] expected: f64) {
        assert_eq!(bias_score(label), expected);
    }

    #[rstest]
    #[case(Some("objective"), 0.8)]
    #[case(Some("VERY EMOTIONAL"), 0.2)]
    #[case(Some("neutral"), 0.7)]
    #[case(Some("furious"), 0.5)]
    #[case(None, 0.5)]
    fn tone_labels(#[case] label: Option<&str>, #[case] expected: f64) {
        assert_eq!(tone_score(label), expected);
    }

    #[test]
    fn breakpoint_is_inclusive() {
        assert!(is_mobile_width(768));
        assert!(!is_mobile_width(769));
    }

    #[test]
    fn quick_prompts_have_labels() {
        assert!(QUICK_PROMPTS.iter().all(|p| !p.label.is_empty() && !p.value.is_empty()));
    }
}
