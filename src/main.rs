use clap::{Parser, Subcommand};
use image_review_pdf::config::ConfigOverrides;
use image_review_pdf::discover::SortBy;
use image_review_pdf::imaging::{RustBackend, get_image_info};
use image_review_pdf::process::{DEFAULT_OUTPUT, ProcessOptions};
use image_review_pdf::{config, output, process};
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "image-review-pdf")]
#[command(about = "Convert a directory of images to a PDF with annotation space")]
#[command(long_about = "\
Convert a directory of images to a PDF with annotation space

Each image gets its filename, the image scaled to fit, an optional caption and
a ruled box for handwritten or typed notes.

Input structure:

  screenshots/
  ├── review.toml          # Optional config (see gen-config)
  ├── 01-login.png
  ├── 01-login.txt         # Optional caption for 01-login.png
  ├── 02-home.jpg
  └── demo.mp4             # Included with --videos (needs ffmpeg)

Examples:
  image-review-pdf process ./screenshots -o review.pdf
  image-review-pdf process ./images --width 800 --per-page 2
  image-review-pdf process ./inbox --title \"Inbox Review\" --author Me

Run 'image-review-pdf gen-config' to generate a documented review.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Show detailed progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ProcessArgs {
    /// Directory containing images
    input_dir: PathBuf,

    /// Output PDF file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Maximum image width in pixels [default: 500]
    #[arg(long)]
    width: Option<u32>,

    /// Number of images per page [default: 1]
    #[arg(long)]
    per_page: Option<usize>,

    /// Height of the annotation space in points, 0 to disable [default: 150]
    #[arg(long)]
    annotation_height: Option<f32>,

    /// Document title (adds a title page)
    #[arg(long)]
    title: Option<String>,

    /// Subtitle shown under the title
    #[arg(long)]
    subtitle: Option<String>,

    /// Document author
    #[arg(long)]
    author: Option<String>,

    /// Document date [default: today]
    #[arg(long)]
    date: Option<String>,

    /// Heading shown above the first image
    #[arg(long)]
    section: Option<String>,

    /// How to sort images: name, date or size [default: name]
    #[arg(long)]
    sort_by: Option<SortBy>,

    /// Comma-separated file patterns [default: *.png,*.jpg,*.jpeg]
    #[arg(long)]
    pattern: Option<String>,

    /// Include video files as single extracted frames (needs ffmpeg)
    #[arg(long)]
    videos: bool,

    /// Config file applied after <input_dir>/review.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Build a review PDF from a directory of images
    Process(ProcessArgs),
    /// Print dimensions, format and size of images as JSON
    Info {
        /// Image files
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Print a stock review.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `-v` turns on debug logs; `RUST_LOG` overrides either default.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Process(args) => {
            let options = process_options(args);
            let (tx, rx) = std::sync::mpsc::channel();
            let verbose = cli.verbose;
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event, verbose) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process(&options, Some(tx));
            printer.join().ok();
            output::print_summary(&result?);
        }
        Command::Info { images } => {
            let backend = RustBackend::new();
            for path in &images {
                let info = get_image_info(&backend, path)?;
                output::print_image_info(path, &info)?;
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }
    Ok(())
}

fn process_options(args: ProcessArgs) -> ProcessOptions {
    let date = args
        .date
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    ProcessOptions {
        input_dir: args.input_dir,
        output: args.output,
        config_file: args.config,
        overrides: ConfigOverrides {
            pattern: args.pattern,
            sort_by: args.sort_by,
            videos: args.videos,
            max_width_px: args.width,
            items_per_page: args.per_page,
            annotation_height: args.annotation_height,
        },
        title: args.title,
        subtitle: args.subtitle,
        author: args.author,
        date,
        section_title: args.section,
    }
}
