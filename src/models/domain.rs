/// One candidate face match returned by the search service
///
/// Built only by the decoder from a single upstream entry. Order within a
/// result set is the upstream ranking order (best first).
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    /// Opaque confidence magnitude, no range is guaranteed upstream
    pub score: f64,
    /// Absolute URL of the matched image, empty when upstream omitted it
    pub image_url: String,
}

impl MatchRecord {
    pub fn new(score: f64, image_url: impl Into<String>) -> Self {
        Self {
            score,
            image_url: image_url.into(),
        }
    }
}

/// A match ready to be rendered into a chat album
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentableItem {
    /// Score in fixed-point notation
    pub display_score: String,
    pub image_url: String,
}

impl PresentableItem {
    /// Caption shown under the photo in the album
    pub fn caption(&self) -> String {
        format!("Score {}", self.display_score)
    }
}
