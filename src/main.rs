use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use rayon::prelude::*;

use docmenu::format::{self, OutputFormat};
use docmenu::{Config, DocmenuError};

/// Numbered section menus for markdown and JSON documents.
#[derive(Parser)]
#[command(name = "docmenu", version, about)]
struct Cli {
    /// Documents (.md, .json) or directories to scan for them.
    #[arg(required_unless_present_any = ["mcp", "completions"])]
    paths: Vec<PathBuf>,

    /// Config file (default: ./docmenu.toml if present).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Words listed per section summary.
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Only take files matching this glob when walking directories.
    #[arg(long, value_name = "GLOB")]
    glob: Option<String>,

    /// No blank line between a section's links and the next heading.
    #[arg(long)]
    no_separators: bool,

    /// Leave the summary off sections without any counted words.
    #[arg(long)]
    suppress_empty: bool,

    /// Run as an MCP server over stdio.
    #[arg(long)]
    mcp: bool,

    /// Print shell completions and exit.
    #[arg(long, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,

    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Errors only.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "docmenu", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.mcp {
        return match docmenu::mcp::run(config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let files = match docmenu::read::discover(&cli.paths, cli.glob.as_deref()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if files.is_empty() {
        tracing::warn!("no documents found");
    }

    let stoplist = docmenu::stoplist(&config);
    // independent pipelines per file; output keeps argument order
    let results: Vec<(PathBuf, Result<String, DocmenuError>)> = files
        .par_iter()
        .map(|path| {
            let rendered = docmenu::menu_for_path(path, &config, &stoplist)
                .map(|menu| format::render(path, &menu, cli.format));
            (path.clone(), rendered)
        })
        .collect();

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let mut failed = false;
    let mut written = 0usize;
    for (path, result) in results {
        match result {
            Ok(out) => {
                if let Err(e) = write_menu(&mut stdout, &out, written == 0, cli.format) {
                    if e.kind() != io::ErrorKind::BrokenPipe {
                        eprintln!("error: writing output: {e}");
                    }
                    return ExitCode::FAILURE;
                }
                written += 1;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipped");
                eprintln!("error: {e}");
                failed = true;
            }
        }
    }
    if let Err(e) = stdout.flush() {
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("error: writing output: {e}");
        }
        return ExitCode::FAILURE;
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// One rendered menu. Text menus after the first get a blank line before
/// them; JSON menus are one object per line.
fn write_menu(w: &mut impl Write, out: &str, first: bool, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            if !first {
                writeln!(w)?;
            }
            write!(w, "{out}")
        }
        OutputFormat::Json => writeln!(w, "{out}"),
    }
}

fn load_config(cli: &Cli) -> Result<Config, DocmenuError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut config = Config::load(cli.config.as_deref(), &cwd)?;
    if let Some(top) = cli.top {
        config.top_n = top;
    }
    if cli.no_separators {
        config.section_separators = false;
    }
    if cli.suppress_empty {
        config.suppress_empty_summary = true;
    }
    Ok(config)
}

/// Logs go to stderr so stdout stays clean for menus and MCP frames.
/// `DOCMENU_LOG` overrides the flag-derived level.
fn init_logging(verbose: u8, quiet: bool) {
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    let filter = EnvFilter::try_from_env("DOCMENU_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("docmenu={level}")));

    registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_ansi(false))
        .init();
}
