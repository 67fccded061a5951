//! Initial terrain synthesis.
//!
//! The primary surface is a superposition of randomly placed Gaussian bumps,
//! rescaled into the 8-bit grayscale range the exporter expects. A Perlin
//! fBm surface is available as an alternative starting point for erosion
//! experiments.

use noise::{NoiseFn, Perlin};
use serde::Serialize;

use crate::heightfield::{HeightField, Point2};
use crate::random::{uniform_range, RandomSource};

/// Upper bound of the generated elevation range (8-bit grayscale).
pub const OUTPUT_CEILING: f64 = 255.0;

/// Parameters for Gaussian-bump terrain.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BumpParams {
    /// Number of bumps superposed onto the field.
    pub bump_count: usize,
    /// Amplitude scaling applied before normalization.
    pub scale: f64,
    /// Min and max Gaussian width of a bump, in cells.
    pub width_range: (f64, f64),
    /// Min and max bump amplitude.
    pub amplitude_range: (f64, f64),
}

impl Default for BumpParams {
    fn default() -> Self {
        Self {
            bump_count: 500,
            scale: 10.0,
            width_range: (5.0, 20.0),
            amplitude_range: (1.0, 15.0),
        }
    }
}

/// Parameters for the fBm alternative surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FbmParams {
    /// Base noise frequency (lower = larger features).
    pub frequency: f64,
    /// Number of octaves.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            frequency: 0.008,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Add one Gaussian bump to every cell of the field.
///
/// The falloff is a base-2 exponential, `amplitude * 2^(-d^2 / (2 gw^2))`.
/// Natural-exp Gaussians produce measurably different shoulders, so the
/// base must not be swapped.
pub fn add_bump(field: &mut HeightField, center: Point2, gaussian_width: f64, amplitude: f64) {
    for y in 0..field.height {
        for x in 0..field.width {
            let dx = x as f64 - center.x;
            let dy = y as f64 - center.y;
            let d2 = dx * dx + dy * dy;
            field.add(x, y, amplitude * (-d2 / (2.0 * gaussian_width * gaussian_width)).exp2());
        }
    }
}

/// Generate a bump terrain: superpose `bump_count` random Gaussian bumps,
/// scale, then min-max normalize into [0, 255].
///
/// Cost is O(bump_count * width * height); every bump touches every cell.
pub fn generate_bump_terrain(
    width: usize,
    height: usize,
    params: &BumpParams,
    source: &mut RandomSource,
) -> HeightField {
    let mut field = HeightField::new(width, height);

    for _ in 0..params.bump_count {
        let center = source.random_point(width, height);
        let gaussian_width =
            uniform_range(source.next_seed(), params.width_range.0, params.width_range.1);
        let amplitude = uniform_range(
            source.next_seed(),
            params.amplitude_range.0,
            params.amplitude_range.1,
        );
        add_bump(&mut field, center, gaussian_width, amplitude);
    }

    for v in field.iter_mut() {
        *v *= params.scale;
    }
    rescale_to_output_range(&mut field);
    field
}

/// Generate a multi-octave Perlin surface normalized into [0, 255].
pub fn generate_fbm_terrain(width: usize, height: usize, params: &FbmParams, seed: u32) -> HeightField {
    let perlin = Perlin::new(seed);
    let mut field = HeightField::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut total = 0.0;
            let mut amplitude = 1.0;
            let mut frequency = params.frequency;
            let mut max_value = 0.0;
            for _ in 0..params.octaves {
                total += amplitude * perlin.get([x as f64 * frequency, y as f64 * frequency]);
                max_value += amplitude;
                amplitude *= params.persistence;
                frequency *= params.lacunarity;
            }
            field.set(x, y, total / max_value);
        }
    }

    rescale_to_output_range(&mut field);
    field
}

/// Linear min-max rescale into [0, 255]. A flat field maps to all zeros
/// rather than dividing by zero.
fn rescale_to_output_range(field: &mut HeightField) {
    let (min, max) = field.min_max();
    if max <= min {
        field.fill(0.0);
        return;
    }
    let span = max - min;
    for v in field.iter_mut() {
        *v = (*v - min) / span * OUTPUT_CEILING;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_terrain_spans_output_range() {
        let mut source = RandomSource::from_seed(11);
        let params = BumpParams {
            bump_count: 20,
            ..Default::default()
        };
        let field = generate_bump_terrain(64, 64, &params, &mut source);

        let (min, max) = field.min_max();
        assert_eq!(min, 0.0);
        assert_eq!(max, OUTPUT_CEILING);
        for (_, _, v) in field.iter() {
            assert!((0.0..=OUTPUT_CEILING).contains(&v));
        }
    }

    #[test]
    fn test_zero_bumps_yields_flat_zero_field() {
        let mut source = RandomSource::from_seed(11);
        let params = BumpParams {
            bump_count: 0,
            ..Default::default()
        };
        let field = generate_bump_terrain(32, 32, &params, &mut source);
        for (_, _, v) in field.iter() {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn test_single_bump_peaks_at_center_and_decays() {
        let mut field = HeightField::new(64, 64);
        add_bump(&mut field, Point2::new(32.0, 32.0), 8.0, 5.0);

        // Peak sits on the bump center.
        let peak = field.get(32, 32);
        assert!((peak - 5.0).abs() < 1e-12);
        for (x, y, v) in field.iter() {
            if (x, y) != (32, 32) {
                assert!(v < peak);
            }
        }

        // Values decay monotonically walking away from the center.
        for x in 32..63 {
            assert!(field.get(x + 1, 32) < field.get(x, 32));
        }
        for y in 32..63 {
            assert!(field.get(32, y + 1) < field.get(32, y));
        }
    }

    #[test]
    fn test_fbm_terrain_spans_output_range() {
        let field = generate_fbm_terrain(64, 64, &FbmParams::default(), 7);
        let (min, max) = field.min_max();
        assert_eq!(min, 0.0);
        assert_eq!(max, OUTPUT_CEILING);
    }
}
