//! Password strength meter for the registration form. Recomputed on every
//! keystroke; nothing here is persisted.

/// Minimum score a password needs before registration can be submitted.
pub const MIN_ACCEPTED_SCORE: u8 = 3;

/// Highest possible score (one point per rule).
pub const MAX_SCORE: u8 = 5;

const MIN_LENGTH: usize = 8;

/// Display tier derived from the score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrengthTier {
    /// Score 0: nothing to show yet.
    Unrated,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthTier {
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            0 => Self::Unrated,
            1 | 2 => Self::Weak,
            3 => Self::Medium,
            4 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unrated => "",
            Self::Weak => "弱",
            Self::Medium => "中等",
            Self::Strong => "強",
            Self::VeryStrong => "非常強",
        }
    }

    /// Meter bar color.
    #[must_use]
    pub const fn bar_class(self) -> &'static str {
        match self {
            Self::Unrated => "bg-gray-200",
            Self::Weak => "bg-red-500",
            Self::Medium => "bg-yellow-500",
            Self::Strong => "bg-blue-500",
            Self::VeryStrong => "bg-green-500",
        }
    }

    /// Label text color.
    #[must_use]
    pub const fn text_class(self) -> &'static str {
        match self {
            Self::Unrated => "text-gray-400",
            Self::Weak => "text-red-600",
            Self::Medium => "text-yellow-600",
            Self::Strong => "text-blue-600",
            Self::VeryStrong => "text-green-600",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordStrength {
    pub score: u8,
    /// One message per unmet rule, in rule order.
    pub feedback: Vec<&'static str>,
    pub tier: StrengthTier,
}

impl PasswordStrength {
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        self.score >= MIN_ACCEPTED_SCORE
    }

    /// Meter fill as a percentage of the maximum score.
    #[must_use]
    pub fn percent(&self) -> u32 {
        u32::from(self.score) * 100 / u32::from(MAX_SCORE)
    }
}

/// Symbols are anything outside ASCII word characters and whitespace.
fn is_symbol(c: char) -> bool {
    !(c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace())
}

/// Scores `password` against the five rules: length of at least eight,
/// lowercase, uppercase, digit and symbol.
#[must_use]
pub fn evaluate(password: &str) -> PasswordStrength {
    let rules: [(bool, &'static str); 5] = [
        (password.chars().count() >= MIN_LENGTH, "至少需要 8 個字符"),
        (password.chars().any(|c| c.is_ascii_lowercase()), "需要包含小寫字母"),
        (password.chars().any(|c| c.is_ascii_uppercase()), "需要包含大寫字母"),
        (password.chars().any(|c| c.is_ascii_digit()), "需要包含數字"),
        (password.chars().any(is_symbol), "需要包含特殊字符"),
    ];

    let mut score = 0;
    let mut feedback = Vec::new();
    for (satisfied, message) in rules {
        if satisfied {
            score += 1;
        } else {
            feedback.push(message);
        }
    }

    PasswordStrength {
        score,
        feedback,
        tier: StrengthTier::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::{StrengthTier, evaluate};

    #[test]
    fn lowercase_only_is_weak() {
        let strength = evaluate("abc");
        assert_eq!(strength.score, 1);
        assert_eq!(strength.tier.label(), "弱");
        assert_eq!(
            strength.feedback,
            vec![
                "至少需要 8 個字符",
                "需要包含大寫字母",
                "需要包含數字",
                "需要包含特殊字符"
            ]
        );
        assert!(!strength.is_acceptable());
    }

    #[test]
    fn all_rules_is_very_strong() {
        let strength = evaluate("Abcdef1!");
        assert_eq!(strength.score, 5);
        assert_eq!(strength.tier, StrengthTier::VeryStrong);
        assert_eq!(strength.tier.label(), "非常強");
        assert!(strength.feedback.is_empty());
        assert_eq!(strength.percent(), 100);
    }

    #[test]
    fn tiers_follow_score_boundaries() {
        assert_eq!(evaluate("").tier, StrengthTier::Unrated);
        assert_eq!(evaluate("abcdefgh").tier, StrengthTier::Weak);
        assert_eq!(evaluate("abcdefg1").tier, StrengthTier::Medium);
        assert_eq!(evaluate("Abcdefg1").tier, StrengthTier::Strong);
        assert!(evaluate("abcdefg1").is_acceptable());
    }

    #[test]
    fn underscore_and_space_are_not_symbols() {
        let strength = evaluate("ab_ cd");
        assert!(strength.feedback.contains(&"需要包含特殊字符"));
    }

    #[test]
    fn non_ascii_letters_count_as_symbols() {
        let strength = evaluate("密碼");
        assert_eq!(strength.score, 1);
        assert!(!strength.feedback.contains(&"需要包含特殊字符"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(evaluate("密碼密碼").feedback.contains(&"至少需要 8 個字符"));
    }

    #[test]
    fn meter_percent_tracks_score() {
        assert_eq!(evaluate("").percent(), 0);
        assert_eq!(evaluate("abcdefg1").percent(), 60);
    }
}
