//! Erosion simulation parameters and presets.

use serde::Serialize;

/// Erosion character preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ErosionPreset {
    /// Light touch: slow carving, quick settling.
    Gentle,
    /// Balanced defaults.
    #[default]
    Standard,
    /// Aggressive carving with a tight kernel.
    Carved,
}

impl ErosionPreset {
    pub fn all() -> &'static [Self] {
        &[Self::Gentle, Self::Standard, Self::Carved]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Gentle => "Subtle smoothing of the raw terrain",
            Self::Standard => "Balanced carving",
            Self::Carved => "Deep, narrow drainage channels",
        }
    }
}

impl std::fmt::Display for ErosionPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gentle => write!(f, "gentle"),
            Self::Standard => write!(f, "standard"),
            Self::Carved => write!(f, "carved"),
        }
    }
}

impl std::str::FromStr for ErosionPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gentle" => Ok(Self::Gentle),
            "standard" => Ok(Self::Standard),
            "carved" => Ok(Self::Carved),
            other => Err(format!("unknown preset '{}' (expected gentle, standard, or carved)", other)),
        }
    }
}

/// Per-run droplet simulation parameters. Immutable once a run starts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErosionParams {
    /// Momentum conservation factor (0.0-1.0). Higher values keep droplets
    /// on their previous heading instead of following the gradient.
    pub inertia: f64,

    /// Floor applied to the local slope when computing carry capacity, so
    /// droplets on near-flat ground still transport a trickle of sediment.
    pub min_slope: f64,

    /// Sediment carrying capacity multiplier.
    pub capacity: f64,

    /// Fraction of surplus sediment dropped per step (0.0-1.0).
    pub deposition_rate: f64,

    /// Fraction of spare capacity converted to erosion per step (0.0-1.0).
    pub erosion_rate: f64,

    /// Downhill acceleration factor.
    pub gravity: f64,

    /// Water lost per step (0.0-0.5). Higher values shorten droplet lives.
    pub evaporation: f64,

    /// Radius of the erosion kernel, in cells. Zero disables erosion
    /// entirely (the kernel has no weight).
    pub radius: usize,

    /// Maximum steps per droplet.
    pub lifetime: u32,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            inertia: 0.1,
            min_slope: 0.001,
            capacity: 32.0,
            deposition_rate: 0.001,
            erosion_rate: 0.1,
            gravity: 9.81,
            evaporation: 0.002,
            radius: 4,
            lifetime: 1000,
        }
    }
}

impl ErosionParams {
    pub fn from_preset(preset: ErosionPreset) -> Self {
        match preset {
            ErosionPreset::Gentle => Self {
                erosion_rate: 0.01,
                deposition_rate: 0.01,
                evaporation: 0.01,
                ..Default::default()
            },
            ErosionPreset::Standard => Self::default(),
            ErosionPreset::Carved => Self {
                erosion_rate: 0.5,
                radius: 2,
                evaporation: 0.001,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_standard_preset() {
        assert_eq!(ErosionParams::default(), ErosionParams::from_preset(ErosionPreset::Standard));
    }

    #[test]
    fn test_presets_are_distinct() {
        let all: Vec<_> = ErosionPreset::all()
            .iter()
            .map(|&p| ErosionParams::from_preset(p))
            .collect();
        assert_ne!(all[0], all[1]);
        assert_ne!(all[1], all[2]);
    }
}
