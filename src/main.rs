use clap::{Parser, Subcommand};
use log::LevelFilter;
use pagesmith::storage::FsStorage;
use pagesmith::{config, generate, output};
use simple_logger::SimpleLogger;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pagesmith")]
#[command(about = "Static HTML page generator driven by config.json")]
#[command(long_about = "\
Static HTML page generator driven by config.json

Every page is assembled from four shared templates plus its own content
template, by literal token substitution:

  <!DOCTYPE html><html>
    head.html        ← headParams over head.templateParams
    body.html        ← $body_header, $body_content, $body_footer
      header.html    ← headerParams over body_header.templateParams
      <content>.html ← contentParams
      footer.html    ← footerParams + $year over body_footer.templateParams
  </html>

Layout:

  config.json                      # pagesToBuild, slots, pages
  templates/
  ├── head.html
  ├── body.html
  ├── header.html
  ├── footer.html
  └── index.html                   # one content template per page

Pages are written as <page id>.html. Without --output, the output directory
is the parent of the directory holding the pagesmith executable.

Run 'pagesmith gen-config' to print a starter config.json.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Directory holding all template files
    #[arg(long, default_value = "templates", global = true)]
    templates: PathBuf,

    /// Output directory (default: parent of the executable's directory)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build every page listed in pagesToBuild
    Build,
    /// Validate config and templates without writing anything
    Check,
    /// Print a starter config.json
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Build => {
            let output_dir = resolve_output_dir(cli.output.as_deref())?;
            log::info!("Building to {}", output_dir.display());

            let site_config = config::load_config(&FsStorage, &cli.config)?;
            let options = generate::GenerateOptions::new(&cli.templates, output_dir);
            let report = generate::generate(&site_config, &FsStorage, &options)?;
            output::print_generate_output(&report);
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let site_config = config::load_config(&FsStorage, &cli.config)?;
            let report = generate::check(&site_config, &FsStorage, &cli.templates)?;
            output::print_check_output(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_json());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new()
        .with_level(level)
        .without_timestamps()
        .init()
}

/// Explicit `--output`, or the deployment default: two directory levels up
/// from the executable file (`<root>/bin/pagesmith` builds into `<root>`).
fn resolve_output_dir(cli_output: Option<&Path>) -> std::io::Result<PathBuf> {
    if let Some(dir) = cli_output {
        return Ok(dir.to_path_buf());
    }
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}
