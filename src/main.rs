use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use response_sheet::{
    CellCount, GridPreset, SheetConfig, SheetGenerator, SheetRequest, SystemClock,
};

#[derive(Debug, Parser)]
#[command(
    name = "response-sheet",
    about = "Generate a printable answer sheet of numbered response cells",
    version
)]
struct Cli {
    /// Number of cells to print
    #[arg(allow_hyphen_values = true)]
    cells: String,

    /// Title printed at the top of the first page
    #[arg(long)]
    title: Option<String>,

    /// Grid layout: standard (5x25) or reviewed (4x25, split response area)
    #[arg(long, default_value = "standard")]
    preset: GridPreset,

    /// JSON configuration file; replaces the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to write the PDF into
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Print the page plan instead of writing a file
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("response_sheet=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let generator = match &cli.config {
        Some(path) => {
            let config = SheetConfig::from_path(path)?;
            info!(path = %path.display(), "loaded configuration");
            SheetGenerator::new(config)?
        }
        None => {
            info!(preset = cli.preset.name(), "using preset");
            SheetGenerator::from_preset(cli.preset)
        }
    };

    let cells: CellCount = cli.cells.parse()?;
    let mut request = SheetRequest::new(cells);
    if let Some(title) = &cli.title {
        request = request.with_title(title);
    }

    if cli.dry_run {
        for page in generator.layout(&request)? {
            println!("{}", page.footer);
        }
        return Ok(());
    }

    let sheet = generator.generate(&request, &SystemClock)?;
    let path = sheet
        .save_in(&cli.out)
        .with_context(|| format!("writing into {}", cli.out.display()))?;
    println!("{}", path.display());
    Ok(())
}
