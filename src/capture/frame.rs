//! Encoded screenshot data

/// A captured screen, already encoded as PNG
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// PNG bytes
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CapturedImage {
    pub fn new(png: Vec<u8>, width: u32, height: u32) -> Self {
        Self { png, width, height }
    }
}
