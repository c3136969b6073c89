//! Score normalization and relevance labels
//!
//! Raw cross-encoder scores are unbounded logits. The sigmoid maps them to
//! [0, 1] so the rest of the system (sorting, thresholds, display) works
//! with one score scale regardless of the scoring model.

// ============================================================================
// CONSTANTS
// ============================================================================

/// Scores at or above this are considered relevant for display purposes
pub const RELEVANCE_THRESHOLD: f32 = 0.5;

/// Normalized score thresholds and their French display labels,
/// highest threshold first
pub const SCORE_LABELS: [(f32, &str); 4] = [
    (0.8, "Tres pertinent"),
    (0.5, "Pertinent"),
    (0.3, "Peu pertinent"),
    (0.0, "Faible pertinence"),
];

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Logistic sigmoid, numerically stable for large-magnitude inputs.
///
/// The naive `1 / (1 + exp(-x))` overflows `exp` for very negative `x`;
/// splitting on sign keeps the exponent argument non-positive on both
/// branches.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Map raw scores to [0, 1] elementwise via [`sigmoid`].
///
/// Order-preserving: input position `i` produces output position `i`.
pub fn normalize_scores(raw_scores: &[f32]) -> Vec<f32> {
    raw_scores.iter().map(|&score| sigmoid(score)).collect()
}

/// French relevance label for a normalized score.
pub fn relevance_label(score: f32) -> &'static str {
    for (threshold, label) in SCORE_LABELS {
        if score >= threshold {
            return label;
        }
    }
    SCORE_LABELS[SCORE_LABELS.len() - 1].1
}

// ============================================================================
// TESTS
// ============================================================================
