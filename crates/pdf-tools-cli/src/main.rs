mod logger;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdft", about = "PDF tools CLI", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Impose pages 1-2 and 3-4 of every PDF in a directory onto two-up
    /// duplex sheets, in batches
    Duplex {
        /// Directory containing the source PDFs
        #[arg(short, long, default_value = "in")]
        input: PathBuf,

        /// Directory receiving first_pages_group_N.pdf / last_pages_group_N.pdf
        #[arg(short, long, default_value = "out")]
        output: PathBuf,

        /// Documents per batch
        #[arg(long)]
        batch_size: Option<usize>,

        /// Load options from a JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the effective options to a JSON file
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Never enlarge pages smaller than their half-sheet
        #[arg(long)]
        no_upscale: bool,

        /// Show statistics only, don't generate PDFs
        #[arg(long)]
        stats_only: bool,
    },

    /// Lay out every page of one PDF two per landscape sheet
    TwoUp {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Never enlarge pages smaller than their half-sheet
        #[arg(long)]
        no_upscale: bool,
    },

    /// Generate a catalog page listing document names
    Catalog {
        /// Directory of PDFs whose names are listed
        #[arg(short, long, conflicts_with = "csv", required_unless_present = "csv")]
        input: Option<PathBuf>,

        /// CSV file whose first column holds the names
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Output PDF file
        #[arg(short, long, default_value = "file_list.pdf")]
        output: PathBuf,

        /// Paper size
        #[arg(long, default_value = "a4", value_enum)]
        paper: PaperArg,

        /// Maximum number of columns
        #[arg(long, default_value = "4")]
        max_columns: usize,

        /// Largest font size tried, in points
        #[arg(long, default_value = "24")]
        max_font: f32,

        /// Smallest font size allowed, in points
        #[arg(long, default_value = "6")]
        min_font: f32,

        /// TrueType font to embed (needed for names outside Latin-1)
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Stamp each PDF's name on its first page
    Stamp {
        /// Directory containing the source PDFs
        #[arg(short, long, default_value = "in")]
        input: PathBuf,

        /// Directory receiving the <name>-sgn.pdf copies
        #[arg(short, long, default_value = "out")]
        output: PathBuf,

        /// File with TEXT_X_POSITION / TEXT_Y_POSITION lines
        #[arg(long, default_value = "coordinates.txt")]
        coordinates: PathBuf,

        /// Override the horizontal position
        #[arg(long)]
        x: Option<f32>,

        /// Override the vertical position
        #[arg(long)]
        y: Option<f32>,

        /// Place the label below the first line containing this phrase
        /// (repeatable); documents without a match are skipped
        #[arg(long = "marker")]
        markers: Vec<String>,

        /// Distance below the marker line, in points
        #[arg(long, default_value = "15")]
        gap: f32,

        /// Label font size in points
        #[arg(long, default_value = "12")]
        font_size: f32,

        /// TrueType font to embed (needed for labels outside Latin-1)
        #[arg(long)]
        font: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    A5,
    Letter,
    Legal,
}

impl From<PaperArg> for pdf_catalog::PaperType {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::from_verbosity(cli.verbose)
        .init()
        .context("failed to install logger")?;

    match cli.command {
        Commands::Duplex {
            input,
            output,
            batch_size,
            config,
            save_config,
            no_upscale,
            stats_only,
        } => {
            let mut options = match config {
                Some(path) => pdf_duplex::DuplexOptions::load(&path)
                    .await
                    .with_context(|| format!("loading {}", path.display()))?,
                None => pdf_duplex::DuplexOptions::default(),
            };
            if let Some(batch_size) = batch_size {
                options.batch_capacity = batch_size;
            }
            if no_upscale {
                options.sheet.allow_upscale = false;
            }
            options.validate()?;

            if let Some(path) = save_config {
                options.save(&path).await?;
                println!("Options saved → {}", path.display());
            }

            let paths = pdf_duplex::scan_input_dir(&input, &options.extension).await?;
            debug!("found {} documents in {}", paths.len(), input.display());

            if stats_only {
                let counts = pdf_duplex::collect_page_counts(&paths, &options).await?;
                let stats = pdf_duplex::calculate_statistics(&counts, &options)?;
                println!("Duplex Statistics:");
                println!("  Documents: {}", stats.documents);
                println!("  Batches: {}", stats.batches);
                println!("  Front sheets: {}", stats.front_sheets);
                println!("  Back sheets: {}", stats.back_sheets);
                println!("  Source pages used: {}", stats.real_pages);
                println!("  Blank pages added: {}", stats.blank_substitutions);
                return Ok(());
            }

            if paths.is_empty() {
                println!("No PDF files found in {}", input.display());
                return Ok(());
            }

            let imposer = pdf_duplex::BatchImposer::new(options)?;
            let report = imposer.run(&paths, &output).await?;
            for batch in &report.batches {
                println!(
                    "Batch {}: {} documents, {} front / {} back sheets, {} blanks",
                    batch.ordinal,
                    batch.documents,
                    batch.front_sheets,
                    batch.back_sheets,
                    batch.blank_substitutions
                );
            }
            println!(
                "Imposed {} documents → {}",
                report.total_documents(),
                output.display()
            );
        }

        Commands::TwoUp {
            input,
            output,
            no_upscale,
        } => {
            let geometry = pdf_duplex::SheetGeometry {
                allow_upscale: !no_upscale,
                ..pdf_duplex::SheetGeometry::album()
            };
            let sheets = pdf_duplex::two_up(&input, &output, &geometry).await?;
            println!("Arranged {} sheets → {}", sheets, output.display());
        }

        Commands::Catalog {
            input,
            csv,
            output,
            paper,
            max_columns,
            max_font,
            min_font,
            font,
        } => {
            let names = match (input, csv) {
                (_, Some(csv)) => pdf_catalog::load_names_from_csv(&csv).await?,
                (Some(dir), None) => {
                    let paths = pdf_duplex::scan_input_dir(&dir, "pdf").await?;
                    pdf_catalog::names_from_paths(&paths)
                }
                (None, None) => anyhow::bail!("either --input or --csv is required"),
            };

            let paper = pdf_catalog::PaperType::from(paper);
            let options = pdf_catalog::CatalogOptions {
                max_columns,
                max_font_size_pt: max_font,
                min_font_size_pt: min_font,
                font_file: font,
                ..Default::default()
            }
            .with_paper(paper);

            let layout = pdf_catalog::generate_pdf(&names, &options, &output).await?;
            println!(
                "Listed {} names on {} {} page(s) at {}pt in {} column(s) → {}",
                names.len(),
                layout.pages,
                paper.name(),
                layout.font_size_pt,
                layout.columns,
                output.display()
            );
        }

        Commands::Stamp {
            input,
            output,
            coordinates,
            x,
            y,
            markers,
            gap,
            font_size,
            font,
        } => {
            let loaded =
                pdf_stamp::load_coordinates(&coordinates, pdf_stamp::Coordinates::default())
                    .await?;
            let x = x.unwrap_or(loaded.x);
            let y = y.unwrap_or(loaded.y);

            let strategy = if markers.is_empty() {
                pdf_stamp::PlacementStrategy::Fixed { x, y }
            } else {
                pdf_stamp::PlacementStrategy::Marker {
                    x,
                    markers,
                    gap_pt: gap,
                }
            };
            let options = pdf_stamp::StampOptions {
                font_size_pt: font_size,
                font_file: font,
                ..Default::default()
            };

            tokio::fs::create_dir_all(&output).await?;
            let paths = pdf_duplex::scan_input_dir(&input, "pdf").await?;

            let mut stamped = 0;
            let mut skipped = 0;
            for path in &paths {
                let outcome = pdf_stamp::stamp_file(path, &output, &strategy, &options)
                    .await
                    .with_context(|| format!("stamping {}", path.display()))?;
                match outcome {
                    pdf_stamp::StampOutcome::Stamped(_) => stamped += 1,
                    pdf_stamp::StampOutcome::Skipped => skipped += 1,
                }
            }
            println!(
                "Stamped {} documents, skipped {} → {}",
                stamped,
                skipped,
                output.display()
            );
        }
    }

    Ok(())
}
