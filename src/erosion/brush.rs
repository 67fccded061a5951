//! Radius-weighted erosion kernel.

use crate::heightfield::{HeightField, Point2};

/// Disk-shaped kernel applied around a droplet when it erodes.
///
/// Offsets and raw weights depend only on the radius, so they are computed
/// once per configuration. Which cells fall inside the grid (and therefore
/// the normalization) varies per event and goes through a reusable scratch
/// buffer instead of a per-event allocation.
pub struct ErosionBrush {
    offsets: Vec<(i32, i32, f64)>,
    scratch: Vec<(usize, usize, f64)>,
}

impl ErosionBrush {
    /// Build the kernel for `radius`. Cells inside the disk are weighted by
    /// closeness, `radius - distance`; a radius of 0 produces a single
    /// zero-weight entry, which makes every erosion event a no-op.
    pub fn new(radius: usize) -> Self {
        let r = radius as i32;
        let mut offsets = Vec::with_capacity((2 * radius + 1).pow(2));
        for dx in -r..=r {
            for dy in -r..=r {
                let dist = ((dx * dx + dy * dy) as f64).sqrt();
                if dist <= radius as f64 {
                    offsets.push((dx, dy, radius as f64 - dist));
                }
            }
        }
        let capacity = offsets.len();
        Self {
            offsets,
            scratch: Vec::with_capacity(capacity),
        }
    }

    /// Remove `gain` of elevation from the disk around `center`, distributed
    /// by normalized weight, and return the amount actually removed, which
    /// becomes the droplet's sediment gain.
    ///
    /// Cells outside the grid are excluded and the weights renormalized over
    /// the remainder; if no weight survives (zero radius, or a fully
    /// out-of-bounds disk) nothing is eroded.
    pub fn erode(&mut self, field: &mut HeightField, center: Point2, gain: f64) -> f64 {
        self.scratch.clear();
        let mut total_weight = 0.0;
        for &(dx, dy, w) in &self.offsets {
            // Truncating cast, applied after the offset: a center close to
            // the low edge maps fractional negative coordinates onto cell 0.
            let x = (center.x + dx as f64) as i64;
            let y = (center.y + dy as f64) as i64;
            if x >= 0 && x < field.width as i64 && y >= 0 && y < field.height as i64 {
                self.scratch.push((x as usize, y as usize, w));
                total_weight += w;
            }
        }
        if total_weight <= 0.0 {
            return 0.0;
        }

        let mut gained = 0.0;
        for &(x, y, w) in &self.scratch {
            let quantity = gain * (w / total_weight);
            field.add(x, y, -quantity);
            gained += quantity;
        }
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_covers_disk() {
        let brush = ErosionBrush::new(2);
        // 13 cells of the 5x5 square fall inside the radius-2 disk.
        assert_eq!(brush.offsets.len(), 13);
        for &(dx, dy, w) in &brush.offsets {
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            assert!(dist <= 2.0);
            assert!((w - (2.0 - dist)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_erode_moves_mass_to_droplet() {
        let mut field = HeightField::new(32, 32);
        field.fill(100.0);
        let before = field.total_mass();

        let mut brush = ErosionBrush::new(4);
        let gained = brush.erode(&mut field, Point2::new(16.0, 16.0), 0.5);

        assert!((gained - 0.5).abs() < 1e-9);
        assert!((before - field.total_mass() - gained).abs() < 1e-9);
    }

    #[test]
    fn test_zero_radius_erodes_nothing() {
        let mut field = HeightField::new(16, 16);
        field.fill(50.0);
        let before = field.total_mass();

        let mut brush = ErosionBrush::new(0);
        let gained = brush.erode(&mut field, Point2::new(8.0, 8.0), 1.0);

        assert_eq!(gained, 0.0);
        assert_eq!(field.total_mass(), before);
    }

    #[test]
    fn test_edge_center_renormalizes_over_inbounds_cells() {
        let mut field = HeightField::new(16, 16);
        field.fill(10.0);
        let before = field.total_mass();

        // Disk hangs off the low edge; the clipped kernel still removes the
        // full requested amount from the surviving cells.
        let mut brush = ErosionBrush::new(4);
        let gained = brush.erode(&mut field, Point2::new(1.5, 1.5), 0.25);

        assert!((gained - 0.25).abs() < 1e-9);
        assert!((before - field.total_mass() - gained).abs() < 1e-9);
    }
}
