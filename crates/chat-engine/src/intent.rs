/// User message intent, decided by keyword lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MarketAnalysis,
    PortfolioAdvice,
    NewsQuery,
    General,
}

/// Ordered rules: the first keyword set with a hit wins. Matching is by
/// substring on the lowercased message, which keeps the router total and
/// deterministic but lets short keywords ("al") fire inside longer words.
const INTENT_RULES: &[(&[&str], Intent)] = &[
    (
        &["fiyat", "trend", "analiz", "tahmin"],
        Intent::MarketAnalysis,
    ),
    (
        &["portföy", "yatırım", "al", "sat"],
        Intent::PortfolioAdvice,
    ),
    (&["haber", "gelişme", "duyuru"], Intent::NewsQuery),
];

/// Classify a free-text message. Total function: every message maps to an
/// intent, unknown content falls through to General.
pub fn classify(message: &str) -> Intent {
    let lowered = message.to_lowercase();

    for (keywords, intent) in INTENT_RULES {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return *intent;
        }
    }

    Intent::General
}

/// Pull a ticker out of a message: the first token that is entirely
/// uppercase-alphabetic with at most 5 characters.
///
/// Known-fragile heuristic: any short all-caps word qualifies, so shouted
/// ordinary words are misread as tickers. Kept as-is deliberately.
pub fn extract_symbol(message: &str) -> Option<String> {
    message
        .split_whitespace()
        .find(|token| {
            let len = token.chars().count();
            len > 0
                && len <= 5
                && token.chars().all(|c| c.is_alphabetic() && c.is_uppercase())
        })
        .map(|token| token.to_string())
}
