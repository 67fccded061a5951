//! Particle-based hydraulic erosion.
//!
//! Droplets spawn at random positions, roll downhill picking up sediment on
//! steep ground, and return it where they slow, settle, or die. Run over
//! many droplets this carves drainage patterns into the terrain.

pub mod brush;
pub mod droplet;
pub mod params;

pub use brush::ErosionBrush;
pub use droplet::{simulate_droplet, Droplet, DropletOutcome, Termination};
pub use params::{ErosionParams, ErosionPreset};

use crate::export::ExportError;
use crate::heightfield::{HeightField, Point2};
use crate::random::RandomSource;

/// Aggregate results of an erosion run.
#[derive(Clone, Debug, Default)]
pub struct ErosionStats {
    /// Droplets simulated.
    pub droplets: usize,
    /// Total elevation removed from the field by droplets.
    pub total_eroded: f64,
    /// Total elevation returned to the field by droplets.
    pub total_deposited: f64,
    /// Droplets that settled into a pit.
    pub settled: usize,
    /// Droplets that walked off the interior.
    pub boundary_exits: usize,
    /// Droplets that ran out of water.
    pub evaporated: usize,
    /// Droplets that ran out of steps.
    pub exhausted: usize,
}

impl ErosionStats {
    fn record(&mut self, outcome: &DropletOutcome) {
        self.droplets += 1;
        self.total_eroded += outcome.eroded;
        self.total_deposited += outcome.deposited;
        match outcome.termination {
            Termination::Settled => self.settled += 1,
            Termination::LeftGrid => self.boundary_exits += 1,
            Termination::Evaporated => self.evaporated += 1,
            Termination::Exhausted => self.exhausted += 1,
        }
    }
}

/// Failures surfaced by an erosion run.
///
/// The droplet physics has no recoverable-error taxonomy; these are the two
/// bounded-loop safety caps plus snapshot persistence, none of which roll
/// back field mutations already applied.
#[derive(Debug)]
pub enum ErosionError {
    /// Direction redraws failed to produce a usable steering vector.
    DirectionStalled { position: Point2 },
    /// Repeated deposition failed to converge on a residual below threshold.
    DepositStalled { residual: f64 },
    /// The snapshot sink failed while persisting an intermediate field.
    Snapshot(ExportError),
}

impl std::fmt::Display for ErosionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErosionError::DirectionStalled { position } => write!(
                f,
                "droplet direction redraw stalled at ({:.3}, {:.3})",
                position.x, position.y
            ),
            ErosionError::DepositStalled { residual } => {
                write!(f, "sediment deposit failed to converge (residual {})", residual)
            }
            ErosionError::Snapshot(e) => write!(f, "snapshot failed: {}", e),
        }
    }
}

impl std::error::Error for ErosionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ErosionError::Snapshot(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExportError> for ErosionError {
    fn from(e: ExportError) -> Self {
        ErosionError::Snapshot(e)
    }
}

/// Run `droplet_count` droplets against the field.
pub fn simulate_erosion(
    field: &mut HeightField,
    params: &ErosionParams,
    droplet_count: usize,
    source: &mut RandomSource,
) -> Result<ErosionStats, ErosionError> {
    simulate_erosion_with_snapshots(field, params, droplet_count, source, 0, |_, _| Ok(()))
}

/// Run `droplet_count` droplets, handing the field to `sink` every `cadence`
/// droplets (cadence 0 = never). The sink sees the field as it stood before
/// the droplet with that ordinal ran; a sink failure aborts the run without
/// touching the field further.
pub fn simulate_erosion_with_snapshots<F>(
    field: &mut HeightField,
    params: &ErosionParams,
    droplet_count: usize,
    source: &mut RandomSource,
    cadence: usize,
    mut sink: F,
) -> Result<ErosionStats, ErosionError>
where
    F: FnMut(&HeightField, usize) -> Result<(), ExportError>,
{
    let mut brush = ErosionBrush::new(params.radius);
    let mut stats = ErosionStats::default();

    for ordinal in 1..=droplet_count {
        if cadence > 0 && ordinal % cadence == 0 {
            sink(field, ordinal)?;
        }

        let spawn = source.random_point(field.width, field.height);
        let droplet = Droplet::spawn(spawn, params.lifetime);
        let outcome = simulate_droplet(field, params, &mut brush, source, droplet)?;
        stats.record(&outcome);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{generate_bump_terrain, BumpParams};

    #[test]
    fn test_zero_droplets_leaves_field_bit_identical() {
        let mut source = RandomSource::from_seed(21);
        let params = BumpParams {
            bump_count: 30,
            ..Default::default()
        };
        let mut field = generate_bump_terrain(64, 64, &params, &mut source);
        let snapshot = field.clone();

        let stats =
            simulate_erosion(&mut field, &ErosionParams::default(), 0, &mut source).unwrap();

        assert_eq!(stats.droplets, 0);
        for (x, y, v) in field.iter() {
            assert!(v.to_bits() == snapshot.get(x, y).to_bits());
        }
    }

    #[test]
    fn test_erosion_changes_bumpy_terrain() {
        let mut source = RandomSource::from_seed(5);
        let gen_params = BumpParams {
            bump_count: 40,
            ..Default::default()
        };
        let mut field = generate_bump_terrain(64, 64, &gen_params, &mut source);
        let before = field.clone();

        let stats =
            simulate_erosion(&mut field, &ErosionParams::default(), 500, &mut source).unwrap();

        assert_eq!(stats.droplets, 500);
        assert!(stats.total_eroded > 0.0);
        let changed = field
            .iter()
            .filter(|&(x, y, v)| v != before.get(x, y))
            .count();
        assert!(changed > 0, "500 droplets should leave a mark");
    }

    #[test]
    fn test_termination_counts_add_up() {
        let mut source = RandomSource::from_seed(13);
        let gen_params = BumpParams {
            bump_count: 25,
            ..Default::default()
        };
        let mut field = generate_bump_terrain(64, 64, &gen_params, &mut source);

        let stats =
            simulate_erosion(&mut field, &ErosionParams::default(), 200, &mut source).unwrap();

        assert_eq!(
            stats.settled + stats.boundary_exits + stats.evaporated + stats.exhausted,
            stats.droplets
        );
    }

    #[test]
    fn test_snapshot_cadence_fires() {
        let mut source = RandomSource::from_seed(2);
        let gen_params = BumpParams {
            bump_count: 10,
            ..Default::default()
        };
        let mut field = generate_bump_terrain(32, 32, &gen_params, &mut source);

        let mut seen = Vec::new();
        simulate_erosion_with_snapshots(
            &mut field,
            &ErosionParams::default(),
            100,
            &mut source,
            25,
            |_, ordinal| {
                seen.push(ordinal);
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(seen, vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_snapshot_failure_aborts_run() {
        let mut source = RandomSource::from_seed(2);
        let gen_params = BumpParams {
            bump_count: 10,
            ..Default::default()
        };
        let mut field = generate_bump_terrain(32, 32, &gen_params, &mut source);

        let result = simulate_erosion_with_snapshots(
            &mut field,
            &ErosionParams::default(),
            100,
            &mut source,
            10,
            |_, _| {
                Err(ExportError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )))
            },
        );

        assert!(matches!(result, Err(ErosionError::Snapshot(_))));
    }
}
