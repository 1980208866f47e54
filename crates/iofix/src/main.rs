use clap::builder::styling::{AnsiColor, Styles};
use clap::{ColorChoice, CommandFactory, FromArgMatches, Parser, Subcommand};

use iofix::commands;
use iofix::commands::check::CheckArgs;
use iofix::commands::fix::FixArgs;
use iofix::output::OutputFormat;

#[derive(Parser)]
#[command(name = "iofix")]
#[command(about = "Find and fix untestable System.IO usage in C# sources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Human-friendly output with colors
    #[arg(long, global = true, conflicts_with = "compact")]
    pretty: bool,

    /// Compact output without colors (overrides TTY detection)
    #[arg(long, global = true, conflicts_with = "pretty")]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report diagnostics without modifying sources
    Check(CheckArgs),

    /// Apply available fixes file by file
    Fix(FixArgs),
}

/// Help output styling.
const HELP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().bold())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::Cyan.on_default().bold())
    .placeholder(AnsiColor::Cyan.on_default());

/// Determine color choice for help output.
/// Checks args and NO_COLOR before parsing since --help may exit early.
fn help_color_choice() -> ColorChoice {
    if std::env::var("NO_COLOR").is_ok() {
        return ColorChoice::Never;
    }
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--compact") {
        return ColorChoice::Never;
    }
    if args.iter().any(|a| a == "--pretty") {
        return ColorChoice::Always;
    }
    ColorChoice::Auto
}

fn main() {
    let cli = Cli::command()
        .styles(HELP_STYLES)
        .color(help_color_choice())
        .get_matches();
    let cli = Cli::from_arg_matches(&cli).expect("clap mismatch");

    let format = OutputFormat::from_cli(cli.json, cli.pretty, cli.compact);

    let exit_code = match cli.command {
        Commands::Check(args) => commands::check::run(args, format),
        Commands::Fix(args) => commands::fix::run(args, format),
    };

    std::process::exit(exit_code);
}
