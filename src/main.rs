use clap::{Parser, Subcommand};
use field_engine::{
    compute_difference, nearest_control_point, reconstruct_field, ControlPointStore,
    ControlPoints, ParameterMask, PixelField, Position, Quantizer,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sparsefield::models::AppConfig;
use sparsefield::server;
use sparsefield::services::{export_outputs, positions, read_png, write_png};

#[derive(Parser)]
#[command(name = "sparsefield")]
#[command(about = "Reconstruct images from sparse control points and compare the result")]
struct Cli {
    /// YAML configuration file (overrides CONFIG_FILE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Reduce a PNG to a small palette
    Quantize {
        /// Input PNG
        input: PathBuf,
        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,
        /// Cluster count
        #[arg(short, long)]
        k: Option<usize>,
        /// Iteration budget
        #[arg(short, long)]
        iterations: Option<usize>,
        /// Initialization seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Reconstruct a field from a positions file
    Reconstruct {
        /// Processed image the control points sample from
        image: PathBuf,
        /// Positions CSV
        positions: PathBuf,
        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,
        /// Five 0/1 flags: channel 1-3, row, column
        #[arg(short, long)]
        mask: Option<String>,
    },
    /// Print the control point nearest to a position as JSON
    Nearest {
        image: PathBuf,
        positions: PathBuf,
        #[arg(long)]
        row: usize,
        #[arg(long)]
        col: usize,
        #[arg(short, long)]
        mask: Option<String>,
    },
    /// Compare two PNGs and print the result as JSON
    Diff {
        first: PathBuf,
        second: PathBuf,
        /// Tolerance in percent of channel range
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Write the visualization to this PNG
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the full pipeline and write <stem>_ori, _mhd and _dif PNGs
    Run {
        image: PathBuf,
        positions: PathBuf,
        /// Output directory (default: next to the image)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// File name stem (default: image file stem)
        #[arg(long)]
        stem: Option<String>,
    },
    /// Edit a positions file
    Points {
        /// Image whose dimensions the positions refer to
        image: PathBuf,
        /// Positions CSV (created if missing)
        positions: PathBuf,
        #[command(subcommand)]
        action: PointsAction,
    },
}

#[derive(Subcommand)]
enum PointsAction {
    /// Append a control point
    Add { row: usize, col: usize },
    /// Remove the first control point within the configured radius
    Remove { row: usize, col: usize },
    /// Print all control points with their colors
    List,
    /// Remove every control point
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            init_tracing("sparsefield=info,tower_http=info");
            let config = AppConfig::load(cli.config.as_deref());
            run_server(config).await
        }
        Some(command) => {
            init_tracing("sparsefield=warn");
            let config = AppConfig::load(cli.config.as_deref());
            config
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
            run_command(command, &config)
        }
        None => {
            run_status_command(cli.config.as_deref());
            Ok(())
        }
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr.clone();
    let state = server::create_app_state(config)?;
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Sparsefield server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn mask_or_default(mask: Option<&str>, config: &AppConfig) -> anyhow::Result<ParameterMask> {
    Ok(match mask {
        Some(mask) => mask.parse::<ParameterMask>()?,
        None => config.parameter_mask()?,
    })
}

/// Load an image and the positions CSV that refers to it.
fn load_scene(image: &Path, csv: &Path) -> anyhow::Result<(PixelField, Vec<Position>)> {
    let field = read_png(image)?;
    let (width, height) = field.dimensions();
    let positions = positions::load(csv, width, height)?;
    Ok((field, positions))
}

fn run_command(command: Commands, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Serve => anyhow::bail!("serve must run on the async runtime"),
        Commands::Quantize {
            input,
            output,
            k,
            iterations,
            seed,
        } => {
            let k = k.unwrap_or(config.kmeans_clusters);
            let iterations = iterations.unwrap_or(config.kmeans_iterations);
            config.check_quantize(k, iterations)?;
            let image = read_png(&input)?;
            let palette = Quantizer::new(k)
                .iterations(iterations)
                .seed(seed.unwrap_or(config.seed))
                .run(&image)?;
            write_png(&output, &palette.apply())?;
            println!(
                "Quantized {} to {} colors in {} iterations",
                output.display(),
                palette.centers().len(),
                palette.iterations_run()
            );
        }
        Commands::Reconstruct {
            image,
            positions,
            output,
            mask,
        } => {
            let (source, positions) = load_scene(&image, &positions)?;
            let points = ControlPoints::sample(&positions, &source)?;
            let (width, height) = source.dimensions();
            let mask = mask_or_default(mask.as_deref(), config)?;
            let field = reconstruct_field(&points, mask, &source, width, height)?;
            write_png(&output, &field)?;
            println!("Reconstructed {} from {} points", output.display(), points.len());
        }
        Commands::Nearest {
            image,
            positions,
            row,
            col,
            mask,
        } => {
            let (source, positions) = load_scene(&image, &positions)?;
            let points = ControlPoints::sample(&positions, &source)?;
            let mask = mask_or_default(mask.as_deref(), config)?;
            let index = nearest_control_point(&points, mask, &source, Position::new(row, col))?;
            let point = points
                .get(index)
                .ok_or_else(|| anyhow::anyhow!("nearest index {index} out of range"))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "index": index,
                    "position": { "row": point.position.row, "col": point.position.col },
                    "color": point.color.to_hex(),
                }))?
            );
        }
        Commands::Diff {
            first,
            second,
            threshold,
            output,
        } => {
            let a = read_png(&first)?;
            let b = read_png(&second)?;
            let result = compute_difference(&a, &b, threshold.unwrap_or(config.threshold))?;
            if let Some(output) = output {
                write_png(&output, result.visualization())?;
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "matching": result.matching(),
                    "total": result.total(),
                    "percentage": result.percentage(),
                    "rounded_percentage": result.rounded_percentage(),
                }))?
            );
        }
        Commands::Run {
            image,
            positions,
            out_dir,
            stem,
        } => {
            let (raw, positions) = load_scene(&image, &positions)?;
            let output = config.pipeline()?.run(&raw, &positions)?;

            let out_dir = out_dir
                .or_else(|| image.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from("."));
            let stem = stem
                .or_else(|| image.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .unwrap_or_else(|| "output".to_string());

            let paths = export_outputs(&out_dir, &stem, &output)?;
            println!("Wrote {}", paths.original.display());
            if let Some(path) = &paths.reconstruction {
                println!("Wrote {}", path.display());
            }
            println!("Wrote {}", paths.difference.display());
            println!(
                "Differences ({}%)",
                output.difference_or_disabled().rounded_percentage()
            );
        }
        Commands::Points {
            image,
            positions: csv,
            action,
        } => {
            let field = read_png(&image)?;
            let (width, height) = field.dimensions();
            let existing = if csv.exists() {
                positions::load(&csv, width, height)?
            } else {
                Vec::new()
            };
            let mut store = ControlPointStore::from_positions(existing);

            match action {
                PointsAction::Add { row, col } => {
                    let position = Position::new(row, col);
                    field.sample(position)?;
                    let index = store.push(position);
                    println!("Added point {} at {position}", index + 1);
                }
                PointsAction::Remove { row, col } => {
                    match store.remove_near(Position::new(row, col), config.remove_radius) {
                        Some(removed) => println!("Removed point at {removed}"),
                        None => println!(
                            "No point within {} px of ({row}, {col})",
                            config.remove_radius
                        ),
                    }
                }
                PointsAction::List => {
                    let points = store.snapshot(&field)?;
                    for (i, p) in points.iter().enumerate() {
                        println!("{};{};{};{}", i + 1, p.position.row, p.position.col, p.color);
                    }
                    return Ok(());
                }
                PointsAction::Clear => store.clear(),
            }

            positions::save(&csv, store.positions(), width, height)?;
        }
    }
    Ok(())
}

fn run_status_command(config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = config_path
        .map(|p| p.display().to_string())
        .or_else(|| std::env::var("CONFIG_FILE").ok());
    let bind_addr = std::env::var("BIND_ADDR").ok();

    println!("Sparsefield v{VERSION}");
    println!("Sparse-sample field reconstruction and comparison\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    println!("\nCommands:");
    println!("  serve        Start the HTTP server");
    println!("  quantize     Reduce a PNG to a small palette");
    println!("  reconstruct  Reconstruct a field from a positions file");
    println!("  nearest      Print the nearest control point");
    println!("  diff         Compare two PNGs");
    println!("  run          Full pipeline, writes _ori/_mhd/_dif PNGs");
    println!("  points       Edit a positions file");
    println!("\nRun 'sparsefield --help' for details.");
}
