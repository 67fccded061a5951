//! Heightfield snapshots as PNG images.

use std::fs;
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::heightfield::HeightField;

/// Failures while persisting a snapshot.
#[derive(Debug)]
pub enum ExportError {
    /// Output directory could not be provisioned.
    Io(std::io::Error),
    /// Image encode/write failed.
    Image(image::ImageError),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "IO error: {}", e),
            ExportError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Image(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}

/// Create the parent directories of `path` if they don't exist yet.
fn ensure_parent_dir(path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save the field as an equal-channel grayscale PNG.
///
/// Elevations are cast straight to u8, so callers are expected to hand in a
/// field normalized to [0, 255], the generator's output range.
pub fn export_grayscale<P: AsRef<Path>>(field: &HeightField, path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut img: RgbImage = ImageBuffer::new(field.width as u32, field.height as u32);
    for y in 0..field.height {
        for x in 0..field.width {
            let value = field.get(x, y) as u8;
            img.put_pixel(x as u32, y as u32, Rgb([value, value, value]));
        }
    }

    img.save(path)?;
    Ok(())
}

/// Save the field as a hypsometric render (deep green lowlands through
/// brown slopes to white peaks), min-max normalized. Useful for inspecting
/// carved drainage that grayscale flattens out.
pub fn export_colormapped<P: AsRef<Path>>(field: &HeightField, path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let (min, max) = field.min_max();
    let span = if max > min { max - min } else { 1.0 };

    let mut img: RgbImage = ImageBuffer::new(field.width as u32, field.height as u32);
    for y in 0..field.height {
        for x in 0..field.width {
            let t = ((field.get(x, y) - min) / span) as f32;
            img.put_pixel(x as u32, y as u32, Rgb(hypsometric_color(t)));
        }
    }

    img.save(path)?;
    Ok(())
}

/// Piecewise-linear elevation ramp over normalized t in [0, 1].
fn hypsometric_color(t: f32) -> [u8; 3] {
    let stops: [[f32; 3]; 5] = [
        [0.18, 0.42, 0.22], // Valley green
        [0.55, 0.65, 0.30], // Foothill olive
        [0.55, 0.42, 0.28], // Slope brown
        [0.62, 0.58, 0.54], // High rock
        [0.97, 0.97, 0.97], // Peak white
    ];

    let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
    let idx = (scaled as usize).min(stops.len() - 2);
    let frac = scaled - idx as f32;

    let lo = stops[idx];
    let hi = stops[idx + 1];
    [
        ((lo[0] + (hi[0] - lo[0]) * frac) * 255.0) as u8,
        ((lo[1] + (hi[1] - lo[1]) * frac) * 255.0) as u8,
        ((lo[2] + (hi[2] - lo[2]) * frac) * 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ramp_field() -> HeightField {
        let mut field = HeightField::new(16, 8);
        for y in 0..8 {
            for x in 0..16 {
                field.set(x, y, (x * 16) as f64);
            }
        }
        field
    }

    #[test]
    fn test_grayscale_roundtrips_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("field.png");
        export_grayscale(&ramp_field(), &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 8);
    }

    #[test]
    fn test_export_creates_nested_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sweep/inertia_0/field.png");
        export_grayscale(&ramp_field(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_colormapped_export_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("relief.png");
        export_colormapped(&ramp_field(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_path_surfaces_error() {
        let dir = tempdir().unwrap();
        // A file where a directory is needed makes create_dir_all fail.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let result = export_grayscale(&ramp_field(), blocker.join("field.png"));
        assert!(result.is_err());
    }

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(hypsometric_color(0.0), [45, 107, 56]);
        let peak = hypsometric_color(1.0);
        assert!(peak.iter().all(|&c| c > 240));
    }
}
