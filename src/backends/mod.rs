pub mod google;

use crate::color::Color;
use crate::error::AnalysisError;

/// An external service that ranks the dominant colors of an image.
pub trait ColorBackend {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Dominant colors of the encoded image, highest weight first.
    ///
    /// An empty list means the service answered but found nothing.
    fn dominant_colors(&self, image: &[u8]) -> Result<Vec<Color>, AnalysisError>;
}

