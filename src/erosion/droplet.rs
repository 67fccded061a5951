//! Single-droplet lifecycle.
//!
//! A droplet walks the heightfield under inertia-blended gradient steering,
//! trading sediment with the terrain at every step, until it leaves the
//! interior, evaporates, runs out of steps, or settles into a pit it could
//! not climb out of.

use crate::heightfield::{HeightField, Point2, EPSILON};
use crate::random::RandomSource;

use super::brush::ErosionBrush;
use super::params::ErosionParams;
use super::ErosionError;

/// Redraw attempts for a degenerate steering vector before giving up.
const MAX_DIRECTION_RETRIES: u32 = 64;
/// Redeposit rounds for a stubborn residual before giving up.
const MAX_DEPOSIT_ROUNDS: u32 = 64;

/// A water particle carrying sediment across the field.
#[derive(Clone, Debug)]
pub struct Droplet {
    pub position: Point2,
    /// Unit heading, or zero before the first step.
    pub direction: Point2,
    pub velocity: f64,
    pub water: f64,
    pub sediment: f64,
    /// Remaining steps.
    pub lifetime: u32,
}

impl Droplet {
    /// Fresh droplet at `position` with the standard spawn state: no
    /// heading, unit velocity and water, empty of sediment.
    pub fn spawn(position: Point2, lifetime: u32) -> Self {
        Self {
            position,
            direction: Point2::default(),
            velocity: 1.0,
            water: 1.0,
            sediment: 0.0,
            lifetime,
        }
    }
}

/// Why a droplet stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Stepped out of the simulated interior.
    LeftGrid,
    /// Water fell below the live threshold.
    Evaporated,
    /// Lifetime ran out.
    Exhausted,
    /// Climbed uphill and shed its sediment into the pit behind it.
    Settled,
}

/// Net effect of one droplet on the field.
#[derive(Clone, Copy, Debug)]
pub struct DropletOutcome {
    pub termination: Termination,
    /// Elevation removed from the field into this droplet.
    pub eroded: f64,
    /// Elevation returned from this droplet to the field.
    pub deposited: f64,
    pub steps: u32,
}

/// Advance one droplet to termination, mutating the shared field through
/// deposition and kernel erosion.
pub fn simulate_droplet(
    field: &mut HeightField,
    params: &ErosionParams,
    brush: &mut ErosionBrush,
    source: &mut RandomSource,
    mut droplet: Droplet,
) -> Result<DropletOutcome, ErosionError> {
    let mut eroded = 0.0;
    let mut deposited = 0.0;
    let mut steps = 0u32;

    let outcome = |termination, eroded, deposited, steps| DropletOutcome {
        termination,
        eroded,
        deposited,
        steps,
    };

    loop {
        if droplet.lifetime == 0 {
            return Ok(outcome(Termination::Exhausted, eroded, deposited, steps));
        }
        if !field.in_interior(droplet.position) {
            return Ok(outcome(Termination::LeftGrid, eroded, deposited, steps));
        }
        if droplet.water <= EPSILON {
            return Ok(outcome(Termination::Evaporated, eroded, deposited, steps));
        }

        droplet.lifetime -= 1;
        steps += 1;

        let gradient = field.gradient(droplet.position);

        // Steer: blend the previous heading with the downhill direction.
        let mut dir = Point2::new(
            droplet.direction.x * params.inertia - gradient.x * (1.0 - params.inertia),
            droplet.direction.y * params.inertia - gradient.y * (1.0 - params.inertia),
        );
        let mut norm = dir.length();
        let mut retries = 0;
        while norm <= EPSILON {
            if retries == MAX_DIRECTION_RETRIES {
                return Err(ErosionError::DirectionStalled {
                    position: droplet.position,
                });
            }
            retries += 1;
            dir = source.random_direction();
            norm = dir.length();
        }
        dir.x /= norm;
        dir.y /= norm;
        droplet.direction = dir;

        // Unit step along the new heading.
        let old_pos = droplet.position;
        droplet.position = Point2::new(old_pos.x + dir.x, old_pos.y + dir.y);

        if !field.in_interior(droplet.position) {
            return Ok(outcome(Termination::LeftGrid, eroded, deposited, steps));
        }

        let h_diff = field.get(droplet.position.x as usize, droplet.position.y as usize)
            - field.get(old_pos.x as usize, old_pos.y as usize);

        if h_diff > 0.0 {
            // The droplet climbed out of a pit. Fill the pit behind it with
            // whatever sediment it carries, then settle. Bilinear deposition
            // can under-deliver near degenerate weights, so the residual is
            // re-requested until it falls below the threshold.
            if droplet.sediment >= h_diff {
                let dropped = field.deposit(old_pos, h_diff);
                let mut residual = h_diff - dropped;
                deposited += dropped;
                let mut rounds = 0;
                while residual > EPSILON {
                    if rounds == MAX_DEPOSIT_ROUNDS {
                        return Err(ErosionError::DepositStalled { residual });
                    }
                    rounds += 1;
                    let dropped = field.deposit(old_pos, droplet.sediment);
                    residual -= dropped;
                    deposited += dropped;
                }
            } else {
                let dropped = field.deposit(old_pos, droplet.sediment);
                droplet.sediment -= dropped;
                deposited += dropped;
                let mut rounds = 0;
                while droplet.sediment > EPSILON {
                    if rounds == MAX_DEPOSIT_ROUNDS {
                        return Err(ErosionError::DepositStalled {
                            residual: droplet.sediment,
                        });
                    }
                    rounds += 1;
                    let dropped = field.deposit(old_pos, droplet.sediment);
                    droplet.sediment -= dropped;
                    deposited += dropped;
                }
            }
            return Ok(outcome(Termination::Settled, eroded, deposited, steps));
        }

        // Downhill: carry capacity scales with slope, speed, and volume.
        let capacity =
            (-h_diff).max(params.min_slope) * droplet.velocity * droplet.water * params.capacity;

        if droplet.sediment >= capacity {
            // Over capacity: shed a fraction of the surplus where we were.
            let surplus = (droplet.sediment - capacity) * params.deposition_rate;
            let dropped = field.deposit(old_pos, surplus);
            droplet.sediment -= dropped;
            deposited += dropped;
        } else {
            // Under capacity: carve, but never deeper than the step's drop,
            // or the droplet would dig a pit beneath itself.
            let gain = ((capacity - droplet.sediment) * params.erosion_rate).min(-h_diff);
            let gained = brush.erode(field, old_pos, gain);
            droplet.sediment += gained;
            eroded += gained;
        }

        droplet.velocity =
            (droplet.velocity * droplet.velocity + h_diff.abs() * params.gravity).sqrt();
        droplet.water *= 1.0 - params.evaporation;
    }
}
