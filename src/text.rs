use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization as _;
use unicode_normalization::char::is_combining_mark;

/// Lowercases and strips diacritics, so `"Análise"` folds to `"analise"`.
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Case- and accent-insensitive substring test. `needle` must already be folded.
pub fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    fold(haystack).contains(folded_needle)
}

/// Title ordering for listings: folded text first, raw text as tiebreak.
pub fn title_cmp(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("Análise do Direito"), "analise do direito");
        assert_eq!(fold("LIDERANÇA"), "lideranca");
    }

    #[test]
    fn contains_folded_matches_accented_haystack() {
        assert!(contains_folded("Análise do Direito", "ana"));
        assert!(contains_folded("Ana Paula", "ana"));
        assert!(!contains_folded("Oratória", "ana"));
    }

    #[test]
    fn title_cmp_ignores_accents_for_primary_order() {
        let mut titles = vec!["Ética", "Direito", "estado", "Álgebra"];
        titles.sort_by(|a, b| title_cmp(a, b));
        assert_eq!(titles, vec!["Álgebra", "Direito", "estado", "Ética"]);
    }
}
