use clap::{Parser, Subcommand};
use pickly_assets::output::{self, PipelineEvent};
use pickly_assets::{config, icons, index, layout, optimize};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

/// Shared flags for commands that encode images.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the encoding cache and re-encode every variant
    #[arg(long)]
    no_cache: bool,
}

#[derive(Parser)]
#[command(name = "pickly-assets")]
#[command(about = "Build web and Flutter assets from SVG icons and source images")]
#[command(long_about = "\
Build web and Flutter assets from SVG icons and source images

Asset package structure:

  <root>/
  ├── assets.toml                  # Optional config (see gen-config)
  ├── icons/
  │   ├── common/*.svg             # Icon sources
  │   ├── web/                     # Cleaned SVGs, <Pascal>.jsx, sprite, index.js, icons.css
  │   └── mobile/{1x,2x,3x}/       # PNG rasters, index.dart
  ├── images/
  │   ├── common/**                # Image sources (jpg, png, webp, gif, bmp)
  │   ├── web/                     # webp/, png/, thumbnails/, index.js
  │   └── mobile/                  # compressed/, 1x/ 2x/ 3x/, index.dart
  ├── index.js                     # Web entry point (build-assets)
  └── index.dart                   # Flutter library (build-assets)

Run 'pickly-assets gen-config' to generate a documented assets.toml.")]
#[command(version)]
struct Cli {
    /// Asset package root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate web components, sprite and mobile rasters from SVG icons
    GenerateIcons,
    /// Encode web and mobile image variants and write the image indexes
    OptimizeImages(CacheArgs),
    /// Run the full pipeline: icons → images → indexes
    BuildAssets(CacheArgs),
    /// Print a stock assets.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::GenerateIcons => {
            let config = load_config(&cli)?;
            run_icons(&cli, &config)?;
        }
        Command::OptimizeImages(cache_args) => {
            let config = load_config(&cli)?;
            let report = run_images(&cli, &config, cache_args)?;
            let written = index::write_image_indexes(&cli.root, &report.images, &config)?;
            print_lines(output::format_index_output(&written, &cli.root));
        }
        Command::BuildAssets(cache_args) => {
            let config = load_config(&cli)?;
            let icon_report = run_icons(&cli, &config)?;
            let image_report = run_images(&cli, &config, cache_args)?;

            println!("==> Stage 3: Generating indexes");
            let mut written =
                index::write_image_indexes(&cli.root, &image_report.images, &config)?;
            written.extend(index::write_package_indexes(
                &cli.root,
                &icon_report.icons,
                &image_report.images,
                &config,
            )?);
            print_lines(output::format_index_output(&written, &cli.root));

            println!("==> Build complete: {}", cli.root.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `assets.toml` and size the rayon pool from it.
fn load_config(cli: &Cli) -> Result<config::AssetsConfig, config::ConfigError> {
    let config = config::load_config(&cli.root)?;
    init_thread_pool(&config.processing);
    Ok(config)
}

fn run_icons(
    cli: &Cli,
    config: &config::AssetsConfig,
) -> Result<icons::IconReport, Box<dyn std::error::Error>> {
    println!(
        "{}",
        output::format_stage_banner(1, "Generating icons", &layout::icon_source_dir(&cli.root))
    );
    let (tx, printer) = spawn_printer();
    let result = icons::generate_icons(&cli.root, config, Some(tx));
    join_printer(printer);
    let report = result?;
    print_lines(output::format_icon_summary(&report));
    Ok(report)
}

fn run_images(
    cli: &Cli,
    config: &config::AssetsConfig,
    cache_args: &CacheArgs,
) -> Result<optimize::ImageReport, Box<dyn std::error::Error>> {
    println!(
        "{}",
        output::format_stage_banner(2, "Optimizing images", &layout::image_source_dir(&cli.root))
    );
    let (tx, printer) = spawn_printer();
    let result = optimize::optimize_images(&cli.root, config, !cache_args.no_cache, Some(tx));
    join_printer(printer);
    let report = result?;
    print_lines(output::format_image_summary(&report));
    Ok(report)
}

/// Drain pipeline events on a dedicated thread. Warnings go to stderr.
fn spawn_printer() -> (Sender<PipelineEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel::<PipelineEvent>();
    let printer = std::thread::spawn(move || {
        for event in rx {
            let warning = event.is_warning();
            for line in output::format_event(&event) {
                if warning {
                    eprintln!("{}", line);
                } else {
                    println!("{}", line);
                }
            }
        }
    });
    (tx, printer)
}

fn join_printer(printer: JoinHandle<()>) {
    // The printer only ends once every sender is dropped.
    if printer.join().is_err() {
        eprintln!("warning: progress printer panicked");
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. User can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
