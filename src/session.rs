use std::path::PathBuf;

use chrono::NaiveDate;

use crate::pipeline::analyze::Shade;
use crate::pipeline::compare::compare;

/// One acquired and analyzed photo.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    /// Where the staged copy lives. The file belongs to the filesystem.
    pub path: PathBuf,
    pub capture_date: NaiveDate,
    pub shade: Shade,
}

/// All photos captured during one run, in acquisition order.
///
/// The first entry is the baseline for progress comparisons. Entries are
/// never removed or reordered.
#[derive(Debug, Clone, Default)]
pub struct Session {
    images: Vec<CapturedImage>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, image: CapturedImage) {
        self.images.push(image);
    }

    /// The baseline entry, if anything has been captured.
    pub fn first(&self) -> Option<&CapturedImage> {
        self.images.first()
    }

    pub fn latest(&self) -> Option<&CapturedImage> {
        self.images.last()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapturedImage> {
        self.images.iter()
    }

    /// Brightness change from the baseline to the most recent entry.
    ///
    /// `None` until the session holds at least two entries.
    pub fn change_since_baseline(&self) -> Option<f64> {
        if self.images.len() < 2 {
            return None;
        }
        let first = self.first()?;
        let latest = self.latest()?;
        Some(compare(first.shade.color, latest.shade.color))
    }
}

impl<'a> IntoIterator for &'a Session {
    type Item = &'a CapturedImage;
    type IntoIter = std::slice::Iter<'a, CapturedImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
