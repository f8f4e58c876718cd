use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use polyextrude::config::{Anchor, DrawSettings, FileConfig};
use polyextrude::geometry::simplify_polygon;
use polyextrude::input::load_points;
use polyextrude::mesh::stl::estimate_stl_size;
use polyextrude::mesh::{Mesh, TriangulationMethod, get_area, validate_mesh, write_mesh_stl, write_obj};
use polyextrude::{MeshError, mesh_with_points};

/// Extrude a hand-drawn 2D polygon into a 3D mesh with UVs and a collision hull
///
/// Examples:
///   # Extrude a shape into an OBJ next to the input file
///   polyextrude shape.json
///
///   # Thicker slab anchored at its back face, plus an STL collision hull
///   polyextrude shape.json --side-length 4 --anchor back --collision shape_col.stl
///
///   # Front face only, rotated texture coordinates
///   polyextrude shape.toml --no-sides --uv-rotation 45 --uv-scale 2 2 -o face.obj
///
///   # Dump both meshes as JSON
///   polyextrude shape.json --json > meshes.json
#[derive(Parser, Debug)]
#[command(name = "polyextrude")]
#[command(version, about, long_about = None)]
struct Args {
    /// Point file: JSON `[[x, y], ...]` / `{"points": ...}` or TOML `points = [...]`
    input: PathBuf,

    /// Path to config file (optional, auto-searches polyextrude.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Graphics mesh output, `.obj` or `.stl` (defaults to the input name with `.obj`)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Collision mesh output (binary STL)
    #[arg(long)]
    collision: Option<PathBuf>,

    /// Depth of the graphics mesh
    #[arg(long)]
    side_length: Option<f32>,

    /// Depth of the collision mesh
    #[arg(long)]
    col_depth: Option<f32>,

    /// Anchor of the graphics slab: front, center or back
    #[arg(long)]
    anchor: Option<Anchor>,

    /// Anchor of the collision slab: front, center or back
    #[arg(long)]
    col_anchor: Option<Anchor>,

    /// Base Z position of both slabs
    #[arg(long, allow_hyphen_values = true)]
    z_position: Option<f32>,

    /// Extra Z offset added to the base position
    #[arg(long, allow_hyphen_values = true)]
    face_offset: Option<f32>,

    /// UV rotation in degrees
    #[arg(long, allow_hyphen_values = true)]
    uv_rotation: Option<f32>,

    /// UV offset as two values: X Y
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_hyphen_values = true)]
    uv_offset: Option<Vec<f32>>,

    /// UV scale as two values: X Y
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_hyphen_values = true)]
    uv_scale: Option<Vec<f32>>,

    /// Skip side walls in the graphics mesh
    #[arg(long)]
    no_sides: bool,

    /// Front face triangulation: ear-clip or earcut
    #[arg(long)]
    triangulation: Option<TriangulationMethod>,

    /// Simplify the drawn points with this Douglas-Peucker tolerance (0 = off)
    #[arg(long)]
    simplify: Option<f32>,

    /// Print the polygon's area and exit
    #[arg(long)]
    area: bool,

    /// Write both meshes as JSON to stdout instead of a summary
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            toml::from_str::<FileConfig>(&contents).context("Failed to parse config file")?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;
    init_logging(verbose);

    let settings = merge_settings(&args, file_config.draw.clone());
    let simplify = args.simplify.unwrap_or(file_config.simplify);

    let mut points = load_points(&args.input)?;
    if simplify > 0.0 {
        let before = points.len();
        points = simplify_polygon(&points, simplify);
        tracing::info!("Simplified {} points to {}", before, points.len());
    }

    if args.area {
        println!("{}", get_area(&points));
        return Ok(());
    }

    if verbose && !args.json {
        println!("Configuration:");
        println!("  Input: {} ({} points)", args.input.display(), points.len());
        println!("  Side length: {}", settings.side_length);
        println!("  Collision depth: {}", settings.col_depth);
        println!("  Anchor: {:?} / collision {:?}", settings.anchor, settings.col_anchor);
        println!("  Z position: {} (+{} face offset)", settings.z_position, settings.face_offset);
        println!(
            "  UV: offset {:?}, rotation {}, scale {:?}",
            settings.uv_offset, settings.uv_rotation, settings.uv_scale
        );
        println!(
            "  Sides: {}",
            if settings.generate_side { "enabled" } else { "disabled" }
        );
        println!("  Triangulation: {:?}", settings.triangulation);
        println!();
    }

    let spinner = create_spinner("Generating meshes...");
    let start = Instant::now();
    let generated = match mesh_with_points(&points, &settings) {
        Ok(generated) => generated,
        Err(err @ MeshError::SelfIntersection { .. }) => {
            spinner.finish_and_clear();
            bail!("{}; redraw the shape without crossing edges", err);
        }
        Err(err) => {
            spinner.finish_and_clear();
            return Err(err).context("Failed to generate meshes");
        }
    };
    spinner.finish_with_message(format!(
        "Generated {:?} mesh: {} graphics / {} collision triangles [{:.1}s]",
        generated.polygon_type,
        generated.graphics.triangle_count(),
        generated.collision.triangle_count(),
        start.elapsed().as_secs_f32()
    ));

    if verbose {
        for mesh in [&generated.graphics, &generated.collision] {
            let report = validate_mesh(mesh);
            tracing::info!("{}: {}", mesh.name, report.summary());
            if let Some(ref bounds) = mesh.bounds {
                tracing::info!(
                    "{}: size {:?} centred at {:?}",
                    mesh.name,
                    bounds.size(),
                    bounds.center()
                );
            }
        }
    }

    if args.json {
        let stdout = std::io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), &generated)
            .context("Failed to write JSON")?;
        println!();
    }

    let output = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .or_else(|| (!args.json).then(|| args.input.with_extension("obj")));
    let collision_output = args
        .collision
        .clone()
        .or_else(|| file_config.collision_output.clone());

    if let Some(ref path) = output {
        write_graphics(path, &generated.graphics)?;
    }
    if let Some(ref path) = collision_output {
        write_mesh_stl(path, &generated.collision)
            .context("Failed to write collision STL file")?;
    }

    if !args.json {
        println!();
        println!("Area: {:.3}", get_area(&points));
        if let Some(ref path) = output {
            println!("Graphics: {}", path.display());
        }
        if let Some(ref path) = collision_output {
            println!(
                "Collision: {} ({:.1} KB)",
                path.display(),
                estimate_stl_size(generated.collision.triangle_count()) as f64 / 1024.0
            );
        }
        println!(
            "Done! Total time: {:.1}s",
            total_start.elapsed().as_secs_f32()
        );
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// CLI flags override the config file, which overrides the defaults
fn merge_settings(args: &Args, mut settings: DrawSettings) -> DrawSettings {
    if let Some(v) = args.side_length {
        settings.side_length = v;
    }
    if let Some(v) = args.col_depth {
        settings.col_depth = v;
    }
    if let Some(v) = args.anchor {
        settings.anchor = v;
    }
    if let Some(v) = args.col_anchor {
        settings.col_anchor = v;
    }
    if let Some(v) = args.z_position {
        settings.z_position = v;
    }
    if let Some(v) = args.face_offset {
        settings.face_offset = v;
    }
    if let Some(v) = args.uv_rotation {
        settings.uv_rotation = v;
    }
    if let Some(&[x, y]) = args.uv_offset.as_deref() {
        settings.uv_offset = (x, y);
    }
    if let Some(&[x, y]) = args.uv_scale.as_deref() {
        settings.uv_scale = (x, y);
    }
    if let Some(v) = args.triangulation {
        settings.triangulation = v;
    }
    if args.no_sides {
        settings.generate_side = false;
    }
    settings
}

fn write_graphics(path: &Path, mesh: &Mesh) -> Result<()> {
    let is_stl = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("stl"));

    if is_stl {
        write_mesh_stl(path, mesh).context("Failed to write graphics STL file")
    } else {
        write_obj(path, mesh).context("Failed to write graphics OBJ file")
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
