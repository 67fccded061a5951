//! One-at-a-time parameter variation study.
//!
//! Erodes the same base terrain once per parameter value, holding every
//! other parameter at its default, and snapshots each run as it evolves so
//! the effect of a single knob can be compared frame by frame. A JSON
//! manifest records what was run where.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::erosion::{simulate_erosion_with_snapshots, ErosionParams};
use crate::export::export_grayscale;
use crate::generator::{generate_bump_terrain, BumpParams};
use crate::random::RandomSource;

/// How much erosion to run per variation and where to put the output.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub droplet_count: usize,
    pub snapshot_cadence: usize,
    pub out_dir: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            droplet_count: 100_000,
            snapshot_cadence: 1000,
            out_dir: PathBuf::from("image"),
        }
    }
}

/// One parameter axis: the values to try and how to apply one to a
/// parameter set.
struct Axis {
    name: &'static str,
    values: &'static [f64],
    apply: fn(&mut ErosionParams, f64),
}

fn axes() -> Vec<Axis> {
    vec![
        Axis {
            name: "inertia",
            values: &[0.001, 0.01, 0.1, 0.5],
            apply: |p, v| p.inertia = v,
        },
        Axis {
            name: "slope",
            values: &[0.001, 0.01, 0.1],
            apply: |p, v| p.min_slope = v,
        },
        Axis {
            name: "capacity",
            values: &[4.0, 6.0, 32.0],
            apply: |p, v| p.capacity = v,
        },
        Axis {
            name: "deposition",
            values: &[0.001, 0.01, 0.1, 0.5],
            apply: |p, v| p.deposition_rate = v,
        },
        Axis {
            name: "erosion",
            values: &[0.001, 0.01, 0.1, 0.5],
            apply: |p, v| p.erosion_rate = v,
        },
        Axis {
            name: "gravity",
            values: &[9.81, 1.0],
            apply: |p, v| p.gravity = v,
        },
        Axis {
            name: "evaporation",
            values: &[0.001, 0.01, 0.1, 0.2, 0.5],
            apply: |p, v| p.evaporation = v,
        },
        Axis {
            name: "radius",
            values: &[1.0, 2.0, 4.0, 8.0],
            apply: |p, v| p.radius = v as usize,
        },
    ]
}

/// Record of an entire sweep, written as `manifest.json` next to the images.
#[derive(Serialize)]
pub struct SweepManifest {
    pub generated_at: String,
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub terrain: BumpParams,
    pub droplet_count: usize,
    pub snapshot_cadence: usize,
    pub runs: Vec<SweepRun>,
}

/// One variation: which knob, which value, where its snapshots went.
#[derive(Serialize)]
pub struct SweepRun {
    pub axis: String,
    pub value: f64,
    pub directory: String,
    pub params: ErosionParams,
}

/// Generate one base terrain, then erode a fresh copy of it per parameter
/// variation, saving periodic snapshots and a manifest under
/// `config.out_dir`.
pub fn run_sweep(
    width: usize,
    height: usize,
    seed: u64,
    terrain: &BumpParams,
    config: &SweepConfig,
) -> Result<(), Box<dyn Error>> {
    let mut source = RandomSource::from_seed(seed);

    println!("Generating base terrain ({}x{}, {} bumps)...", width, height, terrain.bump_count);
    let original = generate_bump_terrain(width, height, terrain, &mut source);
    export_grayscale(&original, config.out_dir.join("original.png"))?;

    let mut runs = Vec::new();
    for axis in axes() {
        for (i, &value) in axis.values.iter().enumerate() {
            let dir = config.out_dir.join(format!("{}_{}", axis.name, i));
            println!("  Eroding variation: {} = {}", axis.name, value);

            let mut params = ErosionParams::default();
            (axis.apply)(&mut params, value);

            let mut field = original.clone();
            let name = axis.name;
            let snapshot_dir = dir.clone();
            simulate_erosion_with_snapshots(
                &mut field,
                &params,
                config.droplet_count,
                &mut source,
                config.snapshot_cadence,
                |f, ordinal| export_grayscale(f, snapshot_dir.join(format!("{}{}.png", name, ordinal))),
            )?;

            runs.push(SweepRun {
                axis: axis.name.to_string(),
                value,
                directory: dir.display().to_string(),
                params,
            });
        }
    }

    let manifest = SweepManifest {
        generated_at: chrono::Local::now().to_rfc3339(),
        seed,
        width,
        height,
        terrain: terrain.clone(),
        droplet_count: config.droplet_count,
        snapshot_cadence: config.snapshot_cadence,
        runs,
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(config.out_dir.join("manifest.json"), json)?;

    Ok(())
}
