//! Parameter variation study: erode copies of one base terrain, varying a
//! single erosion parameter at a time, and snapshot each run as it evolves.

use clap::Parser;

use terrain_eroder::generator::BumpParams;
use terrain_eroder::sweep::{run_sweep, SweepConfig};

#[derive(Parser, Debug)]
#[command(name = "param_sweep")]
#[command(about = "Compare erosion parameters one axis at a time")]
struct Args {
    /// Width of the heightfield in cells
    #[arg(short = 'W', long, default_value = "512")]
    width: usize,

    /// Height of the heightfield in cells
    #[arg(short = 'H', long, default_value = "512")]
    height: usize,

    /// Random seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of Gaussian bumps in the base terrain
    #[arg(long, default_value = "500")]
    bumps: usize,

    /// Droplets per variation
    #[arg(short, long, default_value = "100000")]
    droplets: usize,

    /// Snapshot the field every N droplets
    #[arg(long, default_value = "1000")]
    snapshot_every: usize,

    /// Output directory
    #[arg(short, long, default_value = "image")]
    out: String,
}

fn main() {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    println!("Running parameter sweep with seed: {}", seed);

    let terrain = BumpParams {
        bump_count: args.bumps,
        ..Default::default()
    };
    let config = SweepConfig {
        droplet_count: args.droplets,
        snapshot_cadence: args.snapshot_every,
        out_dir: args.out.clone().into(),
    };

    match run_sweep(args.width, args.height, seed, &terrain, &config) {
        Ok(()) => println!("Sweep complete; results under {}", args.out),
        Err(e) => {
            eprintln!("Sweep failed: {}", e);
            std::process::exit(1);
        }
    }
}
