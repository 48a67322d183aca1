//! Page metadata side channel.

use serde::Serialize;

/// Error type returned by external collaborators (metadata sinks, ad policies).
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Kind of a featured image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// Bitmap image (png, jpg, webp, ...).
    Raster,
    /// Vector image (svg).
    Vector,
}

impl ImageKind {
    /// Guess the kind from a media path or URL.
    ///
    /// # Example
    ///
    /// ```
    /// use wm_outline::ImageKind;
    ///
    /// assert_eq!(ImageKind::from_path("logo.SVG"), ImageKind::Vector);
    /// assert_eq!(ImageKind::from_path("photo.jpg?w=200"), ImageKind::Raster);
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let is_svg = path
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("svg"));
        if is_svg { Self::Vector } else { Self::Raster }
    }
}

/// Receiver for page-level metadata discovered while processing the outline.
///
/// Implementations may fail; failures are logged and processing continues
/// without the side effect. Each field is set at most once per document.
pub trait MetadataSink {
    /// Page title taken from the leading level-1 heading.
    fn set_title(&mut self, title: &str) -> Result<(), CollaboratorError>;

    /// Featured image taken from the image leading the level-1 section.
    fn set_featured_image(&mut self, kind: ImageKind, path: &str) -> Result<(), CollaboratorError>;
}

/// In-memory [`MetadataSink`] collecting everything it receives.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    /// Title from the first level-1 heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Featured raster image path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_raster_image: Option<String>,
    /// Featured vector image path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_vector_image: Option<String>,
}

impl MetadataSink for PageMetadata {
    fn set_title(&mut self, title: &str) -> Result<(), CollaboratorError> {
        self.title = Some(title.to_owned());
        Ok(())
    }

    fn set_featured_image(&mut self, kind: ImageKind, path: &str) -> Result<(), CollaboratorError> {
        let slot = match kind {
            ImageKind::Raster => &mut self.featured_raster_image,
            ImageKind::Vector => &mut self.featured_vector_image,
        };
        *slot = Some(path.to_owned());
        Ok(())
    }
}
