use clap::Parser;

use terrain_eroder::erosion::{self, ErosionParams, ErosionPreset};
use terrain_eroder::export;
use terrain_eroder::generator::{self, BumpParams, FbmParams};
use terrain_eroder::random::RandomSource;

#[derive(Parser, Debug)]
#[command(name = "terrain_eroder")]
#[command(about = "Generate a procedural heightfield and carve it with droplet erosion")]
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

    /// Initial terrain source: "bumps" or "fbm"
    #[arg(long, default_value = "bumps")]
    terrain: String,

    /// Number of Gaussian bumps in the initial terrain
    #[arg(long, default_value = "500")]
    bumps: usize,

    /// Number of droplets to simulate
    #[arg(short, long, default_value = "100000")]
    droplets: usize,

    /// Erosion preset: gentle, standard, or carved
    #[arg(long, default_value = "standard")]
    preset: String,

    /// Override the preset's inertia
    #[arg(long)]
    inertia: Option<f64>,

    /// Override the preset's carry capacity
    #[arg(long)]
    capacity: Option<f64>,

    /// Override the preset's erosion rate
    #[arg(long)]
    erosion_rate: Option<f64>,

    /// Override the preset's deposition rate
    #[arg(long)]
    deposition_rate: Option<f64>,

    /// Override the preset's erosion kernel radius
    #[arg(long)]
    radius: Option<usize>,

    /// Output PNG path
    #[arg(short, long, default_value = "terrain.png")]
    output: String,

    /// Also write a colormapped relief render next to the output
    #[arg(long)]
    relief: bool,

    /// Snapshot the field every N droplets into the output's directory
    /// (0 disables snapshots)
    #[arg(long, default_value = "0")]
    snapshot_every: usize,
}

fn main() {
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut source = RandomSource::from_seed(seed);

    println!("Generating terrain with seed: {}", seed);
    println!("Field size: {}x{}", args.width, args.height);

    let mut field = match args.terrain.as_str() {
        "bumps" => {
            let params = BumpParams {
                bump_count: args.bumps,
                ..Default::default()
            };
            println!("Superposing {} Gaussian bumps...", params.bump_count);
            generator::generate_bump_terrain(args.width, args.height, &params, &mut source)
        }
        "fbm" => {
            println!("Sampling fBm surface...");
            generator::generate_fbm_terrain(args.width, args.height, &FbmParams::default(), seed as u32)
        }
        other => {
            eprintln!("Unknown terrain source: {} (expected bumps or fbm)", other);
            std::process::exit(1);
        }
    };

    let (min_h, max_h) = field.min_max();
    println!("Terrain range: {:.1} to {:.1}", min_h, max_h);

    let preset: ErosionPreset = match args.preset.parse() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let mut params = ErosionParams::from_preset(preset);
    if let Some(v) = args.inertia {
        params.inertia = v;
    }
    if let Some(v) = args.capacity {
        params.capacity = v;
    }
    if let Some(v) = args.erosion_rate {
        params.erosion_rate = v;
    }
    if let Some(v) = args.deposition_rate {
        params.deposition_rate = v;
    }
    if let Some(v) = args.radius {
        params.radius = v;
    }

    println!("Simulating erosion ({} droplets, preset {})...", args.droplets, preset);
    let snapshot_base = std::path::PathBuf::from(&args.output);
    let snapshot_dir = snapshot_base
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();

    let result = erosion::simulate_erosion_with_snapshots(
        &mut field,
        &params,
        args.droplets,
        &mut source,
        args.snapshot_every,
        |f, ordinal| export::export_grayscale(f, snapshot_dir.join(format!("snapshot_{}.png", ordinal))),
    );

    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Erosion failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("Erosion complete:");
    println!("  Total eroded: {:.1} units", stats.total_eroded);
    println!("  Total deposited: {:.1} units", stats.total_deposited);
    println!(
        "  Droplet fates: {} settled, {} left the grid, {} evaporated, {} exhausted",
        stats.settled, stats.boundary_exits, stats.evaporated, stats.exhausted
    );

    let (min_h, max_h) = field.min_max();
    println!("Post-erosion range: {:.1} to {:.1}", min_h, max_h);

    if let Err(e) = export::export_grayscale(&field, &args.output) {
        eprintln!("Failed to save {}: {}", args.output, e);
        std::process::exit(1);
    }
    println!("Saved {}", args.output);

    if args.relief {
        let relief_path = snapshot_base.with_extension("relief.png");
        if let Err(e) = export::export_colormapped(&field, &relief_path) {
            eprintln!("Failed to save relief render: {}", e);
            std::process::exit(1);
        }
        println!("Saved {}", relief_path.display());
    }
}
