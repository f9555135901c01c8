//! Optional branding image, read once at startup

use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Logo {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

#[derive(Debug, Clone)]
pub struct Branding {
    pub logo: Option<Logo>,
    pub width: u32,
}

impl Branding {
    /// Load the logo if the file exists; a missing file is not an error
    pub fn load(path: &Path, width: u32) -> Self {
        let logo = match std::fs::read(path) {
            Ok(bytes) => {
                info!("Loaded logo from {}", path.display());
                Some(Logo {
                    bytes,
                    content_type: content_type_for(path),
                })
            }
            Err(e) => {
                warn!("Logo image not found at {}: {}", path.display(), e);
                None
            }
        };
        Self { logo, width }
    }

    #[cfg(test)]
    pub fn none(width: u32) -> Self {
        Self { logo: None, width }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_logo_is_tolerated() {
        let branding = Branding::load(Path::new("/nonexistent/tim_logo.png"), 200);
        assert!(branding.logo.is_none());
        assert_eq!(branding.width, 200);
    }

    #[test]
    fn test_existing_logo_is_loaded() {
        let mut file = tempfile::Builder::new().suffix(".PNG").tempfile().unwrap();
        file.write_all(b"\x89PNG fake").unwrap();
        file.flush().unwrap();

        let branding = Branding::load(file.path(), 120);
        let logo = branding.logo.unwrap();
        assert_eq!(logo.content_type, "image/png");
        assert_eq!(logo.bytes, b"\x89PNG fake");
    }
}
