use std::path::Path;

use crate::backends::ColorBackend;
use crate::color::{Color, FALLBACK_SHADE};

/// Why a shade could not be measured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The service answered with an error message.
    ServiceError(String),
    /// The service answered but reported no dominant colors.
    NoDominantColors,
    /// The call itself failed (I/O, transport, auth, undecodable response).
    CallFailed(String),
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::ServiceError(msg) => write!(f, "API Error: {msg}"),
            FallbackReason::NoDominantColors => write!(f, "No dominant colors found in the image"),
            FallbackReason::CallFailed(msg) => write!(f, "Error in analyzing image: {msg}"),
        }
    }
}

/// Where a recorded shade came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Measured,
    Fallback(FallbackReason),
}

/// A resolved shade together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shade {
    pub color: Color,
    pub provenance: Provenance,
}

impl Shade {
    pub fn measured(color: Color) -> Self {
        Self {
            color,
            provenance: Provenance::Measured,
        }
    }

    /// The fixed fallback color, tagged with the reason it was used.
    pub fn fallback(reason: FallbackReason) -> Self {
        Self {
            color: FALLBACK_SHADE,
            provenance: Provenance::Fallback(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.provenance, Provenance::Fallback(_))
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match &self.provenance {
            Provenance::Fallback(reason) => Some(reason),
            Provenance::Measured => None,
        }
    }
}

/// Resolve the dominant shade of an encoded image.
///
/// Never fails: any error or empty answer from the backend yields the
/// fallback shade with the reason recorded.
pub fn analyze<B: ColorBackend + ?Sized>(backend: &B, image: &[u8]) -> Shade {
    match backend.dominant_colors(image) {
        Ok(colors) => match colors.first() {
            Some(&top) => Shade::measured(top),
            None => {
                tracing::warn!(backend = backend.name(), "No dominant colors returned");
                Shade::fallback(FallbackReason::NoDominantColors)
            }
        },
        Err(crate::error::AnalysisError::Service(msg)) => {
            tracing::warn!(backend = backend.name(), %msg, "Analysis service error");
            Shade::fallback(FallbackReason::ServiceError(msg))
        }
        Err(e) => {
            tracing::warn!(backend = backend.name(), error = %e, "Analysis call failed");
            Shade::fallback(FallbackReason::CallFailed(e.to_string()))
        }
    }
}

/// Read an image from disk and resolve its shade. Read failures count as a
/// failed call.
pub fn analyze_file<B: ColorBackend + ?Sized>(backend: &B, path: &Path) -> Shade {
    match std::fs::read(path) {
        Ok(bytes) => analyze(backend, &bytes),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read image");
            Shade::fallback(FallbackReason::CallFailed(
                crate::error::AnalysisError::Io(e).to_string(),
            ))
        }
    }
}
