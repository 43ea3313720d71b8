use clap::Parser;
use exif_frame::imaging::BorderStyle;
use exif_frame::process::{Overrides, ProcessError, RunConfig};
use exif_frame::{config, output, process};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "exif-frame")]
#[command(about = "Frame photos with their EXIF details as a caption strip")]
#[command(long_about = "\
Frame photos with their EXIF details as a caption strip

Every .jpg directly inside the input directory is copied onto a black canvas
with up to three centered white lines underneath:

  Title or description
  Date taken | Camera | Lens
  Focal length | Aperture | Shutter | ISO

Results are written as processed_<name>.jpg. Originals are never modified.

Settings resolve as: command-line flag → exif-frame.toml → built-in default.
The config file is read from the input directory unless --config is given.
Run 'exif-frame --gen-config' to print a documented exif-frame.toml.")]
#[command(after_help = "\
Examples:
  exif-frame --input ~/Pictures/trip
  exif-frame --input ~/Pictures/trip --border all --lineheight 80
  exif-frame --input ~/Pictures/trip --output ~/Desktop/framed --quality 90
  exif-frame --gen-config > ~/Pictures/trip/exif-frame.toml")]
#[command(version = version_string())]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Directory containing the .jpg files to annotate
    #[arg(long, required_unless_present = "gen_config")]
    input: Option<PathBuf>,

    /// Output directory [default: <input>/<subfolder>]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output folder name inside the input directory [default: "images with exif"]
    #[arg(long)]
    subfolder: Option<String>,

    /// Height of one caption line in pixels [default: 60]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    lineheight: Option<u32>,

    /// Border style: bottom (caption strip) or all (full frame) [default: bottom]
    #[arg(long)]
    border: Option<BorderStyle>,

    /// JPEG quality, clamped to 1-100 [default: 100]
    #[arg(long)]
    quality: Option<u32>,

    /// TrueType font for the caption [default: bundled DejaVu Sans]
    #[arg(long)]
    font: Option<PathBuf>,

    /// Config file [default: <input>/exif-frame.toml if present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum parallel workers [default: all CPU cores]
    #[arg(long)]
    threads: Option<usize>,

    /// Print a stock exif-frame.toml with all options documented
    #[arg(long)]
    gen_config: bool,

    /// Show diagnostic logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let Some(input) = cli.input else {
        return Ok(());
    };

    let overrides = Overrides {
        output_dir: cli.output,
        subfolder: cli.subfolder,
        line_height: cli.lineheight,
        border: cli.border,
        quality: cli.quality,
        font: cli.font,
        config_file: cli.config,
        threads: cli.threads,
    };
    let run_config = RunConfig::resolve(&input, &overrides)?;
    init_thread_pool(&run_config.processing);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });
    let result = process::run(&run_config, Some(tx));
    printer
        .join()
        .map_err(|_| "output printer thread panicked")?;

    match result {
        Ok(summary) => output::print_summary(&summary),
        // Nothing to do is not a failure
        Err(e @ (ProcessError::InputNotFound(_) | ProcessError::NoImages(_))) => {
            println!("{e}");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores, user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
