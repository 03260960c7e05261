//! Google image extension entry.

use crate::codec::parse_loc;
use crate::error::Result;

/// An image to be indexed for its parent url entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Absolute URL of the image. Kept in its original form; encoded only at
    /// serialization time.
    pub location: String,
}

impl Image {
    pub fn new(location: &str) -> Result<Self> {
        Ok(Self {
            location: parse_loc(location)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_requires_absolute_url() {
        assert!(Image::new("https://example.com/photo.jpg").is_ok());
        assert!(Image::new("photo.jpg").is_err());
    }
}
