use crate::models::{MatchRecord, PresentableItem};

/// Largest album Telegram accepts, also the default result cap
pub const DEFAULT_MAX_ITEMS: usize = 10;

/// Turn decoded matches into at most `max_items` presentable items
///
/// Keeps the incoming order. No re-ranking and no URL deduplication.
pub fn format_results(records: Vec<MatchRecord>, max_items: usize) -> Vec<PresentableItem> {
    records
        .into_iter()
        .take(max_items)
        .map(|record| PresentableItem {
            display_score: format_score(record.score),
            image_url: record.image_url,
        })
        .collect()
}

/// Fixed-point notation with six decimals
#[inline]
pub fn format_score(score: f64) -> String {
    format!("{:.6}", score)
}
