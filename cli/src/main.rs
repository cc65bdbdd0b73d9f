//! rescribe CLI - assemble scanned-book OCR output into ODT documents

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use rescribe::{
    pipeline::natural_key, render, Assembler, AssemblyConfig, AssemblyObserver, Block, Document,
    LineClassifier,
};

#[derive(Parser)]
#[command(name = "rescribe")]
#[command(version)]
#[command(about = "Rebuild book structure from OCR line boxes and emit ODT", long_about = None)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = "RESCRIBE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble page TSVs into a document
    Assemble {
        /// Input TSV files, or a directory of them
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long, value_name = "FILE", default_value = "book.odt")]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "odt")]
        format: OutputFormat,

        /// Disable parallel page parsing
        #[arg(long)]
        sequential: bool,

        /// Let paragraphs continue across page boundaries
        #[arg(long)]
        cross_page: bool,
    },

    /// Classify lines of a page TSV into TITLE/PARAGRAPH annotations
    Classify {
        /// Input line-record TSV file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output JSONL file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page image width in pixels, for the centering check
        #[arg(long, default_value = "4000")]
        image_width: i32,
    },

    /// Dump the reassembled block sequence without writing a document
    Inspect {
        /// Input TSV files, or a directory of them
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Emit blocks as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Odt,
    Text,
}

/// Drives the progress bar from assembly events.
struct ProgressObserver {
    bar: ProgressBar,
    dropped: usize,
}

impl ProgressObserver {
    fn new(total_pages: u64) -> Self {
        let bar = ProgressBar::new(total_pages);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} pages {msg}")
                .expect("progress template is valid")
                .progress_chars("=> "),
        );
        Self { bar, dropped: 0 }
    }
}

impl AssemblyObserver for ProgressObserver {
    fn page_started(&mut self, page: u32, line_count: usize) {
        self.bar.set_message(format!("page {page} ({line_count} lines)"));
        self.bar.inc(1);
    }

    fn record_dropped(&mut self, _page: u32, _reason: &str) {
        self.dropped += 1;
    }

    fn page_failed(&mut self, source: &Path, error: &rescribe::Error) {
        self.bar
            .println(format!("{} {}: {}", "skipped".yellow(), source.display(), error));
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Assemble {
            inputs,
            output,
            format,
            sequential,
            cross_page,
        } => {
            let mut config = config;
            if sequential {
                config.parallel = false;
            }
            config.layout.cross_page_continuation = cross_page;

            let paths = collect_inputs(&inputs)?;
            let doc = assemble(&config, &paths)?;

            match format {
                OutputFormat::Odt => render::write_odt_file(&doc, &output, &config.odt)?,
                OutputFormat::Text => fs::write(&output, render::to_text(&doc))?,
            }
            println!(
                "{} {} ({} pages, {} blocks)",
                "wrote".green().bold(),
                output.display(),
                doc.metadata.source_pages,
                doc.block_count()
            );
        }

        Commands::Classify {
            input,
            output,
            image_width,
        } => {
            let read = rescribe::parser::read_lines_tsv(&input)?;
            let classifier = LineClassifier::new(config.classify.clone());
            let classified = classifier.classify_page(&read.records, image_width);

            match output {
                Some(path) => {
                    rescribe::classify::write_annotations_jsonl(&path, &classified)?;
                    println!(
                        "{} {} ({} lines, {} rows dropped)",
                        "wrote".green().bold(),
                        path.display(),
                        classified.len(),
                        read.dropped.len()
                    );
                }
                None => {
                    for line in &classified {
                        println!("{}", serde_json::to_string(line)?);
                    }
                }
            }
        }

        Commands::Inspect { inputs, json } => {
            let paths = collect_inputs(&inputs)?;
            let doc = assemble(&config, &paths)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&doc.blocks)?);
            } else {
                for block in &doc.blocks {
                    print_block(block);
                }
            }
        }
    }

    Ok(())
}

fn assemble(
    config: &AssemblyConfig,
    paths: &[PathBuf],
) -> Result<Document, Box<dyn std::error::Error>> {
    let assembler = Assembler::new(config.clone())?;
    let mut observer = ProgressObserver::new(paths.len() as u64);
    let doc = assembler.assemble_files(paths, &mut observer)?;
    observer.bar.finish_and_clear();
    if observer.dropped > 0 {
        eprintln!(
            "{} {} malformed records dropped",
            "note:".yellow(),
            observer.dropped
        );
    }
    Ok(doc)
}

fn load_config(path: Option<&Path>) -> Result<AssemblyConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
            serde_json::from_str(&raw)
                .map_err(|e| format!("invalid config {}: {e}", path.display()))?
        }
        None => AssemblyConfig::new(),
    };
    config.validate()?;
    Ok(config)
}

/// Expand directories into their TSV files, sorted by numeric page key.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(input)?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "tsv"))
                .collect();
            entries.sort_by_key(|p| (natural_key(p), p.clone()));
            paths.extend(entries);
        } else {
            paths.push(input.clone());
        }
    }
    if paths.is_empty() {
        log::warn!("no TSV inputs found");
    }
    Ok(paths)
}

fn print_block(block: &Block) {
    match block {
        Block::Heading { text } => println!("{} {}", "[heading]".cyan(), text),
        Block::Paragraph { text } => println!("{} {}", "[para]   ".normal(), text),
        Block::Footnote { text } => println!("{} {}", "[note]   ".magenta(), text),
        Block::Definition { text } => println!("{} {}", "[defn]   ".blue(), text),
        Block::Spacer => println!("{}", "[spacer]".dimmed()),
        Block::Divider => println!("{}", "[divider]".dimmed()),
        Block::PageBreak => println!("{}", "[page break]".dimmed()),
    }
}
