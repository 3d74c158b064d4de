//! Terragen CLI - procedural 2D terrain generator.
//!
//! Generate Voronoi-seeded biome maps with a continuous quadtree height
//! field, export them as PNG images, or query single points.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use terragen::biome::Biome;
use terragen::export::{export_biome_png, export_height_png, BiomeMapOptions, PngExportOptions};
use terragen::{MapGenerator, MapParameters};

/// Procedural 2D terrain generator.
#[derive(Parser)]
#[command(name = "terragen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a map and export its height and biome images.
    Generate {
        #[command(flatten)]
        params: ParamArgs,

        /// Output image resolution in pixels (16-8192).
        #[arg(short, long, default_value = "512")]
        resolution: u32,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "map")]
        name: String,

        /// Skip the biome preview image.
        #[arg(long)]
        skip_biome_map: bool,

        /// Also write the effective parameters as `{name}.json`.
        #[arg(long)]
        write_config: bool,
    },

    /// Generate a map and print what lies at one point.
    Query {
        #[command(flatten)]
        params: ParamArgs,

        /// World-space x coordinate.
        x: f32,

        /// World-space y coordinate.
        y: f32,
    },

    /// Display information about a map configuration.
    Info {
        #[command(flatten)]
        params: ParamArgs,
    },
}

/// Where the map parameters come from, plus command-line overrides.
#[derive(Args)]
struct ParamArgs {
    /// JSON parameter file; missing fields use the preset's values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parameter preset used when no config file is given.
    #[arg(short, long, default_value = "default")]
    preset: Preset,

    /// Random seed for reproducible generation.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Map side length in world units.
    #[arg(long)]
    size: Option<f32>,

    /// Number of Voronoi seeds.
    #[arg(long)]
    seeds: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    /// 500 units, 300 seeds.
    Default,
    /// 200 units, 80 seeds, shallow height tree.
    Small,
    /// Default map with larger mountain ranges.
    Rugged,
}

impl ParamArgs {
    fn load(&self) -> Result<MapParameters, terragen::ConfigError> {
        let mut params = match &self.config {
            Some(path) => MapParameters::from_json_file(path)?,
            None => match self.preset {
                Preset::Default => MapParameters::default(),
                Preset::Small => MapParameters::small(42),
                Preset::Rugged => MapParameters::rugged(42),
            },
        };
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        if let Some(size) = self.size {
            params.map_size = size;
        }
        if let Some(count) = self.seeds {
            params.seeds.count = count;
        }
        params.validate()?;
        Ok(params)
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            params,
            resolution,
            output,
            name,
            skip_biome_map,
            write_config,
        } => {
            run_generate(&params, resolution, &output, &name, skip_biome_map, write_config);
        }
        Commands::Query { params, x, y } => {
            run_query(&params, x, y);
        }
        Commands::Info { params } => {
            run_info(&params);
        }
    }
}

/// Console logging, `info` by default, overridable via `RUST_LOG`.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

fn load_params(args: &ParamArgs) -> MapParameters {
    args.load().unwrap_or_else(|e| {
        eprintln!("Error loading parameters: {}", e);
        std::process::exit(1);
    })
}

fn compute_map(params: MapParameters) -> MapGenerator {
    let start = Instant::now();
    let mut map = MapGenerator::new(params).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    map.compute().unwrap_or_else(|e| {
        eprintln!("Error during generation: {}", e);
        std::process::exit(1);
    });
    println!("Generation completed in {:.2?}", start.elapsed());
    map
}

fn run_generate(
    args: &ParamArgs,
    resolution: u32,
    output: &Path,
    name: &str,
    skip_biome_map: bool,
    write_config: bool,
) {
    if !(16..=8192).contains(&resolution) {
        eprintln!("Error: Resolution must be between 16 and 8192");
        std::process::exit(1);
    }
    let params = load_params(args);

    println!("Terragen - Procedural Terrain Generator");
    println!("=======================================");
    println!("Map size: {} x {}", params.map_size, params.map_size);
    println!("Seeds: {}", params.seeds.count);
    println!("Seed: {}", params.seed);
    println!("Output: {}", output.display());
    println!();

    let start = Instant::now();
    let map = compute_map(params);

    if let Ok(stats) = map.stats() {
        println!("Biomes:");
        for biome in Biome::ALL.into_iter().filter(|b| *b != Biome::Undefined) {
            println!("  {:<10} {:>6}", biome.name(), stats.count(biome));
        }
        println!(
            "Height tree: {} nodes, {} leaves, depth {}",
            stats.tree_nodes, stats.tree_leaves, stats.tree_depth
        );
    }

    println!("\nExporting...");
    let export_start = Instant::now();
    std::fs::create_dir_all(output).unwrap_or_else(|e| {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    });

    let height_path = output.join(format!("{}_height.png", name));
    let options = PngExportOptions {
        resolution,
        ..Default::default()
    };
    let (min_h, max_h) = export_height_png(&map, &height_path, &options).unwrap_or_else(|e| {
        eprintln!("Error exporting height map: {}", e);
        std::process::exit(1);
    });
    println!("  Exported {} (heights [{:.2}, {:.2}])", height_path.display(), min_h, max_h);

    if !skip_biome_map {
        let biome_path = output.join(format!("{}_biomes.png", name));
        let options = BiomeMapOptions {
            resolution,
            ..Default::default()
        };
        export_biome_png(&map, &biome_path, &options).unwrap_or_else(|e| {
            eprintln!("Error exporting biome map: {}", e);
            std::process::exit(1);
        });
        println!("  Exported {}", biome_path.display());
    }

    if write_config {
        let config_path = output.join(format!("{}.json", name));
        let written = map
            .params()
            .to_json_string()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&config_path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Error writing config: {}", e);
            std::process::exit(1);
        }
        println!("  Exported {}", config_path.display());
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
    println!("\nTotal time: {:.2?}", start.elapsed());
    println!("Done!");
}

fn run_query(args: &ParamArgs, x: f32, y: f32) {
    let map = compute_map(load_params(args));

    let result = (|| {
        let biome = map.get_biome(x, y)?;
        let approximate = map.get_approximate_biome(x, y)?;
        let height = map.get_height(x, y)?;
        let centroid = map.get_centroid(x, y)?;
        let lake = map.get_closest_lake(x, y)?;
        Ok::<_, terragen::MapError>((biome, approximate, height, centroid, lake))
    })();

    match result {
        Ok((biome, approximate, height, centroid, lake)) => {
            println!("Point ({}, {})", x, y);
            println!("  Biome:        {}", biome);
            println!("  Approx biome: {}", approximate);
            println!("  Height:       {:.3}", height);
            println!("  Cell centroid: ({:.2}, {:.2})", centroid.x, centroid.y);
            match lake {
                Some(lake) => println!(
                    "  Closest lake: ({:.2}, {:.2}), {:.2} units away",
                    lake.x,
                    lake.y,
                    lake.distance(glam::Vec2::new(x, y))
                ),
                None => println!("  Closest lake: none"),
            }
        }
        Err(e) => {
            eprintln!("Error querying map: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_info(args: &ParamArgs) {
    let params = load_params(args);
    let seeds = &params.seeds;
    let height = &params.height;

    println!("Terragen - Map Configuration Info");
    println!("=================================");
    println!();
    println!("Map size: {} x {}", params.map_size, params.map_size);
    println!("RNG seed: {}", params.seed);
    println!();
    println!("Seeds:");
    println!("  Count:        {:>8}", seeds.count);
    println!(
        "  Bucket grid:  {:>8} ({} x {}, {} per bucket)",
        seeds.capacity(),
        seeds.subdivisions_w,
        seeds.subdivisions_h,
        seeds.max_per_cell
    );
    println!("  Min distance: {:>8.2}", seeds.min_distance);
    println!();
    println!("Height tree:");
    println!("  Depth:        {} to {}", height.depth_min, height.depth_max);
    println!(
        "  Finest cell:  {:.3} units",
        params.map_size / 2f32.powi(height.depth_max as i32)
    );
    println!("  Max nodes:    {:>8}", (4u64.pow(height.depth_max + 1) - 1) / 3);
    println!();
    println!("Height bands:");
    for (biome, band) in height.bands.iter() {
        println!("  {:<10} [{:>6.1}, {:>6.1}]", biome.name(), band.min, band.max);
    }
    match params.biome_map_scale {
        Some(scale) => {
            let side = (params.map_size * scale).ceil() as u64;
            println!();
            println!("Biome grid: {} x {} samples", side, side);
        }
        None => {
            println!();
            println!("Biome grid: disabled");
        }
    }
}
