//! Intensity and depth scoring for detected themes.

use crate::types::ThemeDetection;

/// Upper bound for every intensity and depth score.
pub const MAX_SCORE: f64 = 10.0;

/// A theme above this intensity triggers a quake.
pub const QUAKE_THRESHOLD: f64 = 5.0;

/// Words that mark text reflecting on pattern analysis itself.
pub const META_KEYWORDS: &[&str] = &["pattern", "analysis", "detect", "engine", "algorithm", "meta"];

const META_BONUS_STEP: f64 = 0.5;
const META_BONUS_CAP: f64 = 2.0;
const DIVERSITY_BONUS_STEP: f64 = 0.3;
const DIVERSITY_BONUS_CAP: f64 = 3.0;

/// Keyword density score with logarithmic compression above 1%.
pub fn calculate_intensity(occurrences: usize, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }

    let ratio = occurrences as f64 / word_count as f64;
    let base = ratio * 100.0;

    let intensity = if base > 1.0 { 1.0 + base.log10() } else { base };
    intensity.min(MAX_SCORE)
}

/// Number of distinct meta keywords present anywhere in `text_lower`.
pub fn meta_keyword_count(text_lower: &str) -> usize {
    META_KEYWORDS
        .iter()
        .filter(|keyword| text_lower.contains(*keyword))
        .count()
}

pub fn meta_bonus(text_lower: &str) -> f64 {
    (meta_keyword_count(text_lower) as f64 * META_BONUS_STEP).min(META_BONUS_CAP)
}

pub fn diversity_bonus(theme_count: usize) -> f64 {
    (theme_count as f64 * DIVERSITY_BONUS_STEP).min(DIVERSITY_BONUS_CAP)
}

/// Aggregate depth across all detected themes, clamped to [0, 10] and rounded to 0.1.
pub fn calculate_depth_score(themes: &[ThemeDetection], text_lower: &str) -> f64 {
    if themes.is_empty() {
        return 0.0;
    }

    let theme_count = themes.len();
    let avg_intensity = themes.iter().map(|t| t.intensity).sum::<f64>() / theme_count as f64;

    let depth = avg_intensity + meta_bonus(text_lower) + diversity_bonus(theme_count);
    round1(depth.min(MAX_SCORE))
}

/// True if any theme crossed the quake threshold.
pub fn is_quake(themes: &[ThemeDetection]) -> bool {
    themes.iter().any(|t| t.intensity > QUAKE_THRESHOLD)
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
