//! nexp CLI - export Notion pages to Markdown

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use nexp::{extract_page_id, Exporter, Format, ImageSaveOptions, NexpConfig, RenderOptions};

#[derive(Parser)]
#[command(name = "nexp")]
#[command(version)]
#[command(about = "Export Notion pages to Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a Notion page
    Export {
        /// Page id or Notion URL ending in one
        #[arg(value_name = "PAGE")]
        page: String,

        /// Output file (stdout if not specified)
        #[arg(short = 'o', long = "to-file", value_name = "FILE")]
        to_file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Notion integration token
        #[arg(short, long, env = "NOTION_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Directory hosted images are saved to
        #[arg(short = 'd', long, value_name = "DIR")]
        image_directory: Option<PathBuf>,

        /// Leave images out of the export
        #[arg(long)]
        disable_images: bool,

        /// Drop paragraphs without text
        #[arg(long)]
        skip_empty_paragraphs: bool,

        /// Download images again even if they exist locally
        #[arg(long)]
        overwrite_existing_images: bool,
    },

    /// Store a Notion integration token in ~/.config/nexp.yaml
    Login {
        /// Notion integration token
        #[arg(value_name = "TOKEN")]
        token: String,
    },

    /// Show version information
    Version,
}

/// Image flags as given on the command line.
struct ImageFlags {
    directory: Option<PathBuf>,
    disable: bool,
    overwrite: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            page,
            to_file,
            format,
            token,
            image_directory,
            disable_images,
            skip_empty_paragraphs,
            overwrite_existing_images,
        } => cmd_export(
            &page,
            to_file.as_deref(),
            &format,
            token.as_deref(),
            ImageFlags {
                directory: image_directory,
                disable: disable_images,
                overwrite: overwrite_existing_images,
            },
            skip_empty_paragraphs,
        ),
        Commands::Login { token } => cmd_login(&token),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_export(
    page: &str,
    to_file: Option<&Path>,
    format: &str,
    token: Option<&str>,
    images: ImageFlags,
    skip_empty_paragraphs: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let page_id = extract_page_id(page)?;
    let format: Format = format.parse()?;

    let config = NexpConfig::load_or_default()?;
    let options = RenderOptions::new()
        .with_images(merge_image_options(&images, &config))
        .with_skip_empty_paragraphs(skip_empty_paragraphs);
    debug!("Exporting {} as {} with {:?}", page_id, format, options);

    let mut builder = Exporter::builder().format(format);
    if let Some(token) = token {
        builder = builder.token(token);
    }
    let exporter = builder.build()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Exporting {}...", page_id));

    let rendered = exporter.render(&page_id, &options);
    pb.finish_and_clear();
    let output = rendered?;

    if let Some(path) = to_file {
        fs::write(path, &output)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Command-line image flags, falling back to the configuration file.
fn merge_image_options(flags: &ImageFlags, config: &NexpConfig) -> ImageSaveOptions {
    let mut options = config.images.to_save_options();
    if let Some(dir) = &flags.directory {
        options.save_dir = dir.clone();
    }
    options.ignore_images |= flags.disable;
    options.overwrite_existing |= flags.overwrite;
    options.resolve()
}

fn cmd_login(token: &str) -> Result<(), Box<dyn std::error::Error>> {
    if token.trim().is_empty() {
        return Err("Token must not be empty".into());
    }

    let mut config = NexpConfig::load_or_default()?;
    config.token = token.trim().to_string();
    let path = config.save()?;

    println!("{} {}", "Token saved to".green(), path.display());
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "nexp".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Notion page exporter");
    println!();
    println!("License: MIT");
}
