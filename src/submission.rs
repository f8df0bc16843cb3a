use crate::{error::FormError, image::SelectedImage};

/// An image and a query, checked to both be present.
#[derive(Clone, Debug)]
pub struct QuerySubmission {
    pub image: SelectedImage,
    pub query: String,
}

impl QuerySubmission {
    /// Builds a submission from the current form contents.
    ///
    /// Only presence is checked: any selected file and any non-empty query pass,
    /// whitespace included.
    pub fn new(image: Option<&SelectedImage>, query: &str) -> Result<Self, FormError> {
        match image {
            Some(image) if !query.is_empty() => Ok(Self {
                image: image.clone(),
                query: query.to_string(),
            }),
            _ => Err(FormError::MissingInput),
        }
    }
}
