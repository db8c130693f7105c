//! Terrace CLI - terraced terrain mesh generator.
//!
//! Builds stepped terrain over a flat polygon or a sphere and reports the
//! resulting mesh.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use terrace::geometry::leaf_count;
use terrace::mesh::FLOATS_PER_VERTEX;
use terrace::noise::NoiseKind;
use terrace::terrain::{BaseMeshSource, CubeSphereBase, PolygonFan, SphereProjection, TerrainShape, ThemePreset};
use terrace::{generate_terrain, TerrainConfig};

/// Terraced terrain mesh generator.
#[derive(Parser)]
#[command(name = "terrace")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a terraced terrain mesh.
    Generate {
        /// JSON config file; flags below override its values.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Base shape. Picks the shape's preset when no config file is given.
        #[arg(long, value_enum)]
        shape: Option<ShapeArg>,

        /// Subdivision depth (1 keeps the coarse base triangles).
        #[arg(short, long)]
        depth: Option<u32>,

        /// Edge count of the flat base polygon.
        #[arg(long)]
        segs: Option<u32>,

        /// Radius of the flat base polygon.
        #[arg(long)]
        radius: Option<f32>,

        /// Noise source.
        #[arg(long, value_enum)]
        noise: Option<NoiseArg>,

        /// Scale applied to noise sample coordinates.
        #[arg(long)]
        noise_scale: Option<f32>,

        /// Number of noise octaves.
        #[arg(long)]
        octaves: Option<u32>,

        /// Colour theme.
        #[arg(short, long, value_enum)]
        theme: Option<ThemeArg>,

        /// How cube points are pushed onto the sphere.
        #[arg(long, value_enum)]
        projection: Option<ProjectionArg>,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Slice on a single thread.
        #[arg(long)]
        sequential: bool,

        /// Print the resolved config as JSON before generating.
        #[arg(long)]
        print_config: bool,
    },

    /// Print mesh size estimates for a shape and depth.
    Info {
        #[arg(long, value_enum, default_value = "flat")]
        shape: ShapeArg,

        /// Subdivision depth.
        #[arg(short, long, default_value = "6")]
        depth: u32,

        /// Edge count of the flat base polygon.
        #[arg(long, default_value = "5")]
        segs: u32,

        /// Bands each leaf triangle is assumed to cross.
        #[arg(long, default_value = "4")]
        bands: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Flat,
    Sphere,
}

impl From<ShapeArg> for TerrainShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Flat => TerrainShape::Flat,
            ShapeArg::Sphere => TerrainShape::Sphere,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum NoiseArg {
    Simplex,
    Cellular,
}

impl From<NoiseArg> for NoiseKind {
    fn from(arg: NoiseArg) -> Self {
        match arg {
            NoiseArg::Simplex => NoiseKind::Simplex,
            NoiseArg::Cellular => NoiseKind::Cellular,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Mountain,
    SnowMountain,
    Desert,
    Island,
}

impl From<ThemeArg> for ThemePreset {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Mountain => ThemePreset::Mountain,
            ThemeArg::SnowMountain => ThemePreset::SnowMountain,
            ThemeArg::Desert => ThemePreset::Desert,
            ThemeArg::Island => ThemePreset::Island,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ProjectionArg {
    Normalize,
    Spherify,
}

impl From<ProjectionArg> for SphereProjection {
    fn from(arg: ProjectionArg) -> Self {
        match arg {
            ProjectionArg::Normalize => SphereProjection::Normalize,
            ProjectionArg::Spherify => SphereProjection::Spherify,
        }
    }
}

/// Flag values that override the base config.
struct Overrides {
    depth: Option<u32>,
    segs: Option<u32>,
    radius: Option<f32>,
    noise: Option<NoiseArg>,
    noise_scale: Option<f32>,
    octaves: Option<u32>,
    theme: Option<ThemeArg>,
    projection: Option<ProjectionArg>,
    seed: Option<u64>,
    sequential: bool,
}

impl Overrides {
    fn apply(self, config: &mut TerrainConfig) {
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(segs) = self.segs {
            config.segs_c = segs;
        }
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        if let Some(noise) = self.noise {
            config.noise = noise.into();
        }
        if let Some(scale) = self.noise_scale {
            config.octaves.noise_scale = scale;
        }
        if let Some(octaves) = self.octaves {
            config.octaves.octaves = octaves;
        }
        if let Some(theme) = self.theme {
            config.theme = theme.into();
        }
        if let Some(projection) = self.projection {
            config.sphere_projection = projection.into();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.sequential {
            config.parallel = false;
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            shape,
            depth,
            segs,
            radius,
            noise,
            noise_scale,
            octaves,
            theme,
            projection,
            seed,
            sequential,
            print_config,
        } => {
            let overrides = Overrides {
                depth,
                segs,
                radius,
                noise,
                noise_scale,
                octaves,
                theme,
                projection,
                seed,
                sequential,
            };
            run_generate(config, shape, overrides, print_config);
        }
        Commands::Info {
            shape,
            depth,
            segs,
            bands,
        } => {
            run_info(shape.into(), depth, segs, bands);
        }
    }
}

fn run_generate(config_path: Option<PathBuf>, shape: Option<ShapeArg>, overrides: Overrides, print_config: bool) {
    let mut config = match &config_path {
        Some(path) => match TerrainConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => TerrainConfig::for_shape(shape.map(Into::into).unwrap_or_default()),
    };
    if let (Some(_), Some(shape)) = (&config_path, shape) {
        config.shape = shape.into();
    }

    // Generate seed if not provided
    let seed_given = overrides.seed.is_some() || config_path.is_some();
    overrides.apply(&mut config);
    if !seed_given {
        use std::time::{SystemTime, UNIX_EPOCH};
        config.seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("Terrace - Terraced Terrain Generator");
    println!("====================================");
    println!("Shape: {}", config.shape);
    println!("Depth: {}", config.max_depth);
    if config.shape == TerrainShape::Flat {
        println!("Polygon: {} segments, radius {}", config.segs_c, config.radius);
    } else {
        println!("Cube scale: {}", config.terrain_scale);
    }
    println!("Noise: {} (scale {}, {} octaves)", config.noise.name(), config.octaves.noise_scale, config.octaves.octaves);
    println!("Theme: {}", config.theme.name());
    println!("Seed: {}", config.seed);

    if print_config {
        match config.to_json() {
            Ok(json) => println!("\n{}", json),
            Err(e) => {
                eprintln!("Error serializing config: {}", e);
                std::process::exit(1);
            }
        }
    }

    println!("\nGenerating mesh...");
    let start = Instant::now();
    let mesh = match generate_terrain(&config) {
        Ok(mesh) => mesh,
        Err(e) => {
            eprintln!("Error during generation: {}", e);
            std::process::exit(1);
        }
    };
    let gen_time = start.elapsed();

    let buffers = &mesh.buffers;
    println!("Generation completed in {:.2?}", gen_time);
    println!("Leaf triangles: {}", mesh.leaf_triangles);
    println!("Vertices:       {}", buffers.vertex_count());
    println!("Triangles:      {}", buffers.triangle_count());
    match mesh.altitude_range {
        Some((lo, hi)) => println!("Altitude range: [{:.4}, {:.4}]", lo, hi),
        None => println!("Altitude range: empty mesh"),
    }

    let bytes = buffers.vertex_bytes().len() + buffers.index_bytes().len();
    println!("Buffer size:    {} bytes ({:.2} MB)", bytes, bytes as f64 / 1024.0 / 1024.0);
}

fn run_info(shape: TerrainShape, depth: u32, segs: u32, bands: u64) {
    let base = match shape {
        TerrainShape::Flat => PolygonFan::new(segs, 1.0, depth).map(|b| b.base_triangles().len()),
        TerrainShape::Sphere => CubeSphereBase::new(1.0, depth).map(|b| b.base_triangles().len()),
    };
    let coarse = match base {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let leaves = leaf_count(coarse, depth) as u64;

    // A band emits at most a roof quad and a wall quad: 8 vertices, 12 indices.
    let vertex_bytes = (FLOATS_PER_VERTEX * 4) as u64;
    let per_band = 8 * vertex_bytes + 12 * 4;
    let upper_bound = leaves * bands * per_band;

    println!("Terrace - Mesh Size Info");
    println!("========================");
    println!();
    println!("Shape: {}", shape);
    println!("Depth: {}", depth);
    println!();
    println!("Triangle counts:");
    println!("  Coarse:  {:>12}", coarse);
    println!("  Leaves:  {:>12}", leaves);
    println!();
    println!("Buffer layout:");
    println!("  Vertex:          {:>4} bytes ({} floats)", vertex_bytes, FLOATS_PER_VERTEX);
    println!("  Per band (max):  {:>4} bytes", per_band);
    println!();
    println!(
        "Memory upper bound at {} bands per leaf: {} bytes ({:.2} MB)",
        bands,
        upper_bound,
        upper_bound as f64 / 1024.0 / 1024.0
    );
}
