//! docshift CLI - office document conversion and compression tool.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use docshift::{
    compress_folder, ConversionEngine, ConversionKind, ConvertOptions, Level, Method,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Convert office documents and shrink PDF/DOCX files
#[derive(Parser)]
#[command(
    name = "docshift",
    version,
    about = "Convert DOC/DOCX <-> PDF and compress PDF/DOCX files",
    long_about = "docshift - office document conversion and compression.\n\n\
                  Converts between DOC/DOCX and PDF, and shrinks PDF/DOCX files \
                  by re-encoding their embedded images. Legacy .doc support needs \
                  LibreOffice (soffice) on the PATH."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert DOC/DOCX to PDF
    DocToPdf {
        /// Input file path
        input: PathBuf,
        /// Output file path
        output: PathBuf,
    },

    /// Convert PDF to DOCX
    PdfToDocx {
        /// Input file path
        input: PathBuf,
        /// Output file path
        output: PathBuf,
        /// Conversion method
        #[arg(long, default_value = "auto")]
        method: MethodArg,
    },

    /// Convert PDF to DOC (needs an office host)
    PdfToDoc {
        /// Input file path
        input: PathBuf,
        /// Output file path
        output: PathBuf,
    },

    /// Compress a PDF or DOCX file
    Compress {
        /// Input file path
        input: PathBuf,
        /// Output file path
        output: PathBuf,
        /// Compression level
        #[arg(long, default_value = "medium")]
        level: LevelArg,
    },

    /// Compress every PDF/DOCX in a folder
    CompressFolder {
        /// Input folder
        input_folder: PathBuf,
        /// Output folder
        output_folder: PathBuf,
        /// Compression level
        #[arg(long, default_value = "medium")]
        level: LevelArg,
        /// Overwrite outputs that already exist
        #[arg(long)]
        force: bool,
    },

    /// List supported conversions for this environment
    ListSupported {
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

/// PDF-to-DOCX conversion method
#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    /// Try every method in order
    Auto,
    /// One-pass import through the office host
    Office,
    /// Extract text and embedded images
    Embedded,
    /// Extract text only
    TextOnly,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Auto => Method::Auto,
            MethodArg::Office => Method::Office,
            MethodArg::Embedded => Method::Embedded,
            MethodArg::TextOnly => Method::TextOnly,
        }
    }
}

/// Compression level
#[derive(Clone, Copy, ValueEnum)]
enum LevelArg {
    /// Smallest quality loss
    Low,
    /// Balanced
    Medium,
    /// Smallest output
    High,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Low => Level::Low,
            LevelArg::Medium => Level::Medium,
            LevelArg::High => Level::High,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::DocToPdf { input, output } => {
            convert(ConversionKind::DocToPdf, &input, &output, None)?;
        }
        Commands::PdfToDocx {
            input,
            output,
            method,
        } => {
            convert(ConversionKind::PdfToDocx, &input, &output, Some(method.into()))?;
        }
        Commands::PdfToDoc { input, output } => {
            convert(ConversionKind::PdfToDoc, &input, &output, None)?;
        }
        Commands::Compress {
            input,
            output,
            level,
        } => {
            let pb = create_spinner("Compressing...");
            let start = Instant::now();
            let stats = docshift::compress_file(&input, &output, level.into())?;
            pb.finish_and_clear();
            println!(
                "{} {} -> {} ({} KB -> {} KB, -{:.1}%) in {:.2}s",
                "Compressed:".green().bold(),
                input.display(),
                output.display(),
                stats.input_bytes / 1024,
                stats.output_bytes / 1024,
                stats.reduction_percent(),
                start.elapsed().as_secs_f64()
            );
        }
        Commands::CompressFolder {
            input_folder,
            output_folder,
            level,
            force,
        } => {
            let pb = create_spinner("Compressing folder...");
            let report = compress_folder(&input_folder, &output_folder, level.into(), force)?;
            pb.finish_and_clear();
            println!(
                "{} {} compressed, {} skipped, {} failed ({} candidates)",
                "Done:".green().bold(),
                report.compressed,
                report.skipped,
                report.failed,
                report.total
            );
            if report.total == 0 {
                println!("No PDF/DOCX files found in {}", input_folder.display());
            }
        }
        Commands::ListSupported { json } => {
            let engine = ConversionEngine::detect();
            let supported = engine.supported_conversions();
            if json {
                println!("{}", serde_json::to_string_pretty(&supported)?);
            } else {
                print_supported(&engine);
            }
        }
    }
    Ok(())
}

fn convert(
    kind: ConversionKind,
    input: &PathBuf,
    output: &PathBuf,
    method: Option<Method>,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_spinner("Converting...");
    let engine = ConversionEngine::detect();

    let options = match method {
        Some(m) => ConvertOptions::with_method(m),
        None => ConvertOptions::default(),
    };
    engine.convert(kind, input, output, &options)?;

    pb.finish_and_clear();
    println!(
        "{} {} -> {}",
        "Converted:".green().bold(),
        input.display(),
        output.display()
    );
    Ok(())
}

fn print_supported(engine: &ConversionEngine) {
    let report = engine.capabilities().report();
    match &report.office_host {
        Some(program) => println!("Office host: {}", program.green()),
        None => println!(
            "Office host: {} (legacy .doc paths unavailable)",
            "not detected".yellow()
        ),
    }
    println!();

    for conversion in engine.supported_conversions() {
        let inputs = if conversion.input_extensions.is_empty() {
            "unavailable".yellow().to_string()
        } else {
            conversion
                .input_extensions
                .iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "  {:<12} {} ({} -> .{})",
            conversion.kind.name().bold(),
            conversion.description,
            inputs,
            conversion.output_extension
        );
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
