use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat, ImageOutputFormat};
use std::io::Cursor;
use std::path::Path;

use crate::error::NutritionError;

/// File extensions the upload accepts.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// A decoded meal photo held in memory for one analysis request.
#[derive(Debug, Clone)]
pub struct MealImage {
    image: DynamicImage,
    format: ImageFormat,
}

impl MealImage {
    /// Decodes uploaded bytes. Only JPEG and PNG are accepted; anything that
    /// does not decode is an invalid image.
    pub fn decode(bytes: &[u8]) -> Result<Self, NutritionError> {
        if bytes.is_empty() {
            return Err(NutritionError::InvalidImage("empty upload".to_string()));
        }

        let format = image::guess_format(bytes)
            .map_err(|e| NutritionError::InvalidImage(e.to_string()))?;
        if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
            return Err(NutritionError::UnsupportedImageType(format!("{:?}", format)));
        }

        let image = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| NutritionError::InvalidImage(e.to_string()))?;

        Ok(Self { image, format })
    }

    pub fn decode_base64(data: &str) -> Result<Self, NutritionError> {
        // Tolerate data URLs such as "data:image/png;base64,...."
        let payload = match data.split_once(";base64,") {
            Some((_, rest)) => rest,
            None => data,
        };
        let bytes = general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| NutritionError::InvalidImage(format!("invalid base64: {}", e)))?;
        Self::decode(&bytes)
    }

    pub fn open(path: &Path) -> Result<Self, NutritionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(NutritionError::UnsupportedImageType(format!(
                "{} (accepted: {})",
                path.display(),
                ACCEPTED_EXTENSIONS.join(", ")
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| NutritionError::InvalidImage(format!("{}: {}", path.display(), e)))?;
        Self::decode(&bytes)
    }

    pub fn mime_type(&self) -> &'static str {
        match self.format {
            ImageFormat::Png => "image/png",
            _ => "image/jpeg",
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Re-encodes the bitmap in its original container for upload.
    pub fn encode(&self) -> Result<Vec<u8>, NutritionError> {
        let output = match self.format {
            ImageFormat::Png => ImageOutputFormat::Png,
            _ => ImageOutputFormat::Jpeg(90),
        };
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), output)
            .map_err(|e| NutritionError::InvalidImage(e.to_string()))?;
        Ok(bytes)
    }

    pub fn to_base64(&self) -> Result<String, NutritionError> {
        Ok(general_purpose::STANDARD.encode(self.encode()?))
    }
}
