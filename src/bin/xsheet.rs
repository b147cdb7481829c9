use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "xsheet", version, about = "Timeline CSV to X-Sheet converter")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sheet as a text grid with timing rules.
    Show(ShowArgs),
    /// Re-export the sheet as `<name>_export.csv`.
    ExportCsv(ExportCsvArgs),
    /// Render the sheet as `<name>_xsheet.png` or `.jpg`.
    Render(RenderArgs),
    /// Ask the language model for a timing summary.
    Analyze(AnalyzeArgs),
}

#[derive(Parser, Debug)]
struct ShowArgs {
    /// Input timeline CSV.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Dump the parsed sheet as JSON instead of a grid.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ExportCsvArgs {
    /// Input timeline CSV.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input timeline CSV.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Image format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,

    /// Extra directory of .ttf/.otf/.ttc fonts (for CJK layer names, for example).
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Write the intermediate SVG next to the image.
    #[arg(long)]
    keep_svg: bool,
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Input timeline CSV.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Gemini API key.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name.
    #[arg(long, default_value = xsheet::DEFAULT_MODEL)]
    model: String,

    /// Models endpoint base URL.
    #[arg(long, default_value = xsheet::DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = xsheet::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Print the prompt instead of sending it.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    #[value(alias = "jpeg")]
    Jpg,
}

impl From<FormatChoice> for xsheet::ImageFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Png => xsheet::ImageFormat::Png,
            FormatChoice::Jpg => xsheet::ImageFormat::Jpeg,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xsheet=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Show(args) => cmd_show(args),
        Command::ExportCsv(args) => cmd_export_csv(args),
        Command::Render(args) => cmd_render(args),
        Command::Analyze(args) => cmd_analyze(args),
    }
}

fn load(path: &Path) -> anyhow::Result<xsheet::Workspace> {
    let mut ws = xsheet::Workspace::new();
    ws.load_file(path)
        .with_context(|| format!("load sheet '{}'", path.display()))?;
    Ok(ws)
}

fn loaded(ws: &xsheet::Workspace) -> anyhow::Result<&xsheet::SheetData> {
    ws.sheet().context("no sheet loaded (bug)")
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let ws = load(&args.in_path)?;
    let sheet = loaded(&ws)?;

    if args.json {
        let json = serde_json::to_string_pretty(sheet).context("serialize sheet JSON")?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "{} ({} frames, {} columns, {} fps grid)",
        sheet.name,
        sheet.frame_count(),
        sheet.column_count(),
        xsheet::FRAMES_PER_SECOND
    );
    print!("{}", xsheet::render_text(sheet));
    Ok(())
}

fn cmd_export_csv(args: ExportCsvArgs) -> anyhow::Result<()> {
    let ws = load(&args.in_path)?;
    let path = ws.export_csv(&args.out_dir)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let ws = load(&args.in_path)?;
    let settings = xsheet::RasterSettings {
        font_dir: args.font_dir,
        ..xsheet::RasterSettings::default()
    };

    let path = ws
        .export_image(&args.out_dir, args.format.into(), &settings)
        .context("Failed to generate image")?;
    eprintln!("wrote {}", path.display());

    if args.keep_svg {
        let svg_path = ws.export_svg(&args.out_dir, &settings)?;
        eprintln!("wrote {}", svg_path.display());
    }
    Ok(())
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let ws = load(&args.in_path)?;
    let sheet = loaded(&ws)?;

    if args.dry_run {
        println!("{}", xsheet::build_prompt(sheet));
        return Ok(());
    }

    let config = xsheet::AnalysisConfig {
        api_key: args.api_key,
        model: args.model,
        base_url: args.base_url,
        timeout_secs: args.timeout_secs,
    };
    let analyzer = xsheet::GeminiAnalyzer::new(config)?;

    let mut panel = xsheet::AnalysisPanel::new();
    match panel.run(&analyzer, sheet) {
        xsheet::AnalysisState::Ready(text) => {
            println!("{text}");
            Ok(())
        }
        xsheet::AnalysisState::Failed(msg) => anyhow::bail!("analysis failed: {msg}"),
        other => anyhow::bail!("analysis ended in unexpected state {other:?} (bug)"),
    }
}
