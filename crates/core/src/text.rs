//! Text normalization and edit-distance similarity for answer checking.
//!
//! Two normalization levels exist on purpose. Exact comparison keeps
//! punctuation so `"it's"` and `"its"` stay different words; fuzzy comparison
//! strips it so a missing comma does not eat the whole similarity budget.

use unicode_normalization::UnicodeNormalization;

/// Canonical form for exact answer comparison.
///
/// Lowercases, trims, collapses whitespace runs (including the full-width
/// space) to one ASCII space, unifies apostrophe lookalikes, and composes
/// combining characters (NFC). Punctuation survives.
#[must_use]
pub fn normalize(input: &str) -> String {
    let composed: String = input.nfc().collect();
    let mut out = String::with_capacity(composed.len());
    let mut pending_space = false;
    for ch in composed.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        let unified = match ch {
            '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{02BC}' | '`' | '\u{00B4}' => '\'',
            other => other,
        };
        out.extend(unified.to_lowercase());
    }
    out
}

/// Aggressive form for fuzzy comparison: [`normalize`] plus punctuation
/// removal.
#[must_use]
pub fn normalize_for_similarity(input: &str) -> String {
    let stripped: String = normalize(input)
        .chars()
        .filter(|ch| ch.is_alphanumeric() || ch.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classic Levenshtein edit distance over Unicode scalar values.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (diagonal + cost).min(row[j] + 1).min(row[j + 1] + 1);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

/// Similarity in `[0, 1]`: `1 - distance / max(char counts)`.
///
/// Two empty strings are identical (1.0); one empty side shares nothing
/// with a non-empty side (0.0).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    let distance = levenshtein(a, b);
    (1.0 - distance as f64 / longest as f64).clamp(0.0, 1.0)
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_trims_and_collapses() {
        assert_eq!(normalize("  Hello   World  "), "hello world");
        assert_eq!(normalize("Tab\tand\nnewline"), "tab and newline");
    }

    #[test]
    fn normalize_collapses_full_width_space() {
        assert_eq!(normalize("hello\u{3000}world"), "hello world");
    }

    #[test]
    fn normalize_unifies_apostrophe_lookalikes() {
        assert_eq!(normalize("don\u{2019}t"), "don't");
        assert_eq!(normalize("don`t"), "don't");
        assert_eq!(normalize("don\u{00B4}t"), "don't");
    }

    #[test]
    fn normalize_composes_combining_characters() {
        // "é" typed as 'e' + COMBINING ACUTE equals the precomposed form.
        assert_eq!(normalize("caf\u{0065}\u{0301}"), normalize("caf\u{00E9}"));
    }

    #[test]
    fn punctuation_survives_exact_but_not_similarity_normalization() {
        assert_eq!(normalize("it's fine."), "it's fine.");
        assert_eq!(normalize_for_similarity("it's fine."), "its fine");
    }

    #[test]
    fn similarity_normalization_recollapses_spaces_left_by_punctuation() {
        assert_eq!(normalize_for_similarity("hello , world"), "hello world");
    }

    #[test]
    fn levenshtein_known_distances() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("hello", "helo"), 1);
        assert_eq!(levenshtein("same", "same"), 0);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn similarity_matches_edit_distance_ratio() {
        assert!((similarity("helo", "hello") - 0.8).abs() < 1e-9);
        assert!((similarity("hello", "hello") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn similarity_empty_edge_cases() {
        assert!((similarity("", "") - 1.0).abs() < 1e-9);
        assert!((similarity("", "hello")).abs() < 1e-9);
        assert!((similarity("hello", "")).abs() < 1e-9);
    }
}
