use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use spordcli::{
    cli, config, error,
    management::{self, StoreMode},
    utils::{self, SortKey},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the releases of a date, searching Spotify if needed
    Releases(ReleasesOptions),

    /// Like or unlike a cached release
    Like(LikeOptions),

    /// List liked releases
    Likes,

    /// Save the releases of a date as an HTML page
    Export(ExportOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Show the releases of a date, searching Spotify if needed",
    args_conflicts_with_subcommands = true // disallow mixing --date with `list`
)]
pub struct ReleasesOptions {
    /// Release date (YYYY-MM-DD), defaults to today
    #[clap(long)]
    pub date: Option<String>,

    /// Sort order: name-asc, name-desc, genre-asc, genre-desc
    #[clap(long, default_value = "name-asc", value_parser = utils::parse_sort_key)]
    pub sort: SortKey,

    /// Release cache: remote (per user) or local (this device)
    #[clap(long, value_parser = management::parse_store_mode)]
    pub store: Option<StoreMode>,

    #[command(subcommand)]
    pub command: Option<ReleasesSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReleasesSubcommand {
    /// List every cached date
    List(ListOptions),
}

#[derive(Parser, Debug, Clone)]
pub struct ListOptions {
    /// Sort order: name-asc, name-desc, genre-asc, genre-desc
    #[clap(long, default_value = "name-asc", value_parser = utils::parse_sort_key)]
    pub sort: SortKey,

    /// Release cache: remote (per user) or local (this device)
    #[clap(long, value_parser = management::parse_store_mode)]
    pub store: Option<StoreMode>,
}

#[derive(Parser, Debug, Clone)]
pub struct LikeOptions {
    /// Spotify ID of the release
    pub id: String,

    /// Only look for the release on this date
    #[clap(long)]
    pub date: Option<String>,

    /// Release cache: remote (per user) or local (this device)
    #[clap(long, value_parser = management::parse_store_mode)]
    pub store: Option<StoreMode>,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportOptions {
    /// Release date (YYYY-MM-DD), defaults to today
    #[clap(long)]
    pub date: Option<String>,

    /// Directory to write the page to, defaults to the current directory
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Release cache: remote (per user) or local (this device)
    #[clap(long, value_parser = management::parse_store_mode)]
    pub store: Option<StoreMode>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_new(config::log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Releases(opt) => match opt.command {
            Some(ReleasesSubcommand::List(l)) => cli::list_releases(l.sort, l.store).await,
            None => cli::releases(opt.date, opt.sort, opt.store).await,
        },
        Command::Like(opt) => cli::like(opt.id, opt.date, opt.store).await,
        Command::Likes => cli::likes().await,
        Command::Export(opt) => cli::export(opt.date, opt.output, opt.store).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
