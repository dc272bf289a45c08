//! archive-patch CLI - proofreading patch tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use archive_patch::{
    apply_patch, delta, extract_pivots, read_document, read_patch, render, AnyPatch, JsonFormat,
    RenderOptions,
};

#[derive(Parser)]
#[command(name = "archive-patch")]
#[command(version)]
#[command(about = "Apply and inspect proofreading patches for archived documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a patch to a document
    Apply {
        /// Document JSON file
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Patch JSON file or issue body
        #[arg(value_name = "PATCH")]
        patch: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json", env = "ARCHIVE_PATCH_FORMAT")]
        format: OutputKind,
    },

    /// Print the article id of a document
    Id {
        /// Document JSON file
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,
    },

    /// Strip comment markers from text and list their positions
    Pivots {
        /// Text with markers
        #[arg(value_name = "TEXT")]
        text: String,

        /// Part index recorded in the pivots
        #[arg(long, default_value = "0")]
        part: usize,
    },

    /// Encode the delta turning one text into another
    Delta {
        /// Base text
        #[arg(value_name = "BASE")]
        base: String,

        /// Target text
        #[arg(value_name = "TARGET")]
        target: String,
    },

    /// Render a document as text
    Render {
        /// Document JSON file
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Omit the comment list
        #[arg(long)]
        no_comments: bool,

        /// Show content types
        #[arg(long)]
        types: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    /// Pretty-printed JSON
    Json,
    /// Compact JSON
    Compact,
    /// Text preview with comment markers
    Text,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Apply {
            document,
            patch,
            output,
            format,
        } => cmd_apply(&document, &patch, output.as_deref(), format),
        Commands::Id { document } => cmd_id(&document),
        Commands::Pivots { text, part } => cmd_pivots(&text, part),
        Commands::Delta { base, target } => {
            println!("{}", delta::encode(&base, &target));
            Ok(())
        }
        Commands::Render {
            document,
            no_comments,
            types,
        } => cmd_render(&document, no_comments, types),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_apply(
    document: &Path,
    patch: &Path,
    output: Option<&Path>,
    format: OutputKind,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = read_document(document)?;
    let patch = read_patch(patch)?;

    if let AnyPatch::V1(_) = patch {
        log::info!("Applying legacy v1 patch to {}", document.display());
    }
    apply_patch(&mut doc, &patch)?;

    let content = match format {
        OutputKind::Json => render::to_json(&doc, JsonFormat::Pretty)?,
        OutputKind::Compact => render::to_json(&doc, JsonFormat::Compact)?,
        OutputKind::Text => render::to_text(&doc, &RenderOptions::default()),
    };

    if let Some(path) = output {
        fs::write(path, &content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn cmd_id(document: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = read_document(document)?;
    println!("{}", doc.article_id());
    Ok(())
}

fn cmd_pivots(text: &str, part: usize) -> Result<(), Box<dyn std::error::Error>> {
    let (pivots, stripped) = extract_pivots(text, part);

    println!("{}", stripped);
    for pivot in &pivots {
        println!(
            "  {} offset {} -> comment {}",
            "├─".dimmed(),
            pivot.offset,
            pivot.index
        );
    }
    println!("{}", serde_json::to_string(&pivots)?);

    Ok(())
}

fn cmd_render(
    document: &Path,
    no_comments: bool,
    types: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = read_document(document)?;

    println!("{} {}", "Article".green().bold(), doc.article_id());
    println!("{}: {}", "Pages".cyan(), format_pages(doc.page_start, doc.page_end));
    println!();

    let options = RenderOptions::new()
        .with_comments(!no_comments)
        .with_description(true)
        .with_types(types);
    println!("{}", render::to_text(&doc, &options));

    Ok(())
}

fn format_pages(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}-{}", start, end)
    }
}
