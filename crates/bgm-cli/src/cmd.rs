use crate::format::run_format_command;
use crate::parse::run_parse_command;
use crate::render::run_render_command;
use anyhow::Result;
use clap::ArgAction;
use clap::{Args, Parser, Subcommand};

///////// Args /////////

#[derive(Clone, Debug, Args)]
pub struct ParseArgs {
    #[arg(
        required = true,
        help = "Files to parse, use '-' to read from stdin"
    )]
    pub files: Vec<String>,

    #[arg(
        long = "json",
        help = "Print parsed tree in json format",
        default_value = "false",
        action = ArgAction::SetTrue,
    )]
    pub json: bool,

    #[arg(
        long = "raw",
        help = "Skip normalization and sticker expansion. Override config when presents",
        default_value = "false",
        action = ArgAction::SetTrue,
    )]
    pub raw: bool,

    #[arg(
        short = 'c',
        long = "config",
        help = "Path to the config file defining parse and render options"
    )]
    pub config: Option<String>,

    #[arg(
        short = 'j',
        long = "jobs",
        help = "Count of files parsed at the same time",
        default_value = "4"
    )]
    pub jobs: usize,
}

#[derive(Clone, Debug, Args)]
pub struct RenderArgs {
    #[arg(help = "File to render, use '-' to read from stdin")]
    pub file: String,

    #[arg(
        short = 'c',
        long = "config",
        help = "Path to the config file defining parse and render options"
    )]
    pub config: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct FormatArgs {
    #[arg(help = "File to format, use '-' to read from stdin")]
    pub file: String,

    #[arg(short = 'o', long = "output", help = "File to save formatted content")]
    pub output: Option<String>,
}

///////// Subcommand /////////

#[derive(Clone, Debug, Parser)]
#[command(name = "bgm", about = "Parse, render and format bbcode")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    #[command(about = "parse bbcode files and print the trees")]
    Parse(ParseArgs),

    #[command(about = "render bbcode file into plain text")]
    Render(RenderArgs),

    #[command(about = "rewrite bbcode file in canonical form")]
    Format(FormatArgs),
}

/// Main entry of all subcommands.
pub async fn run_command_with_args(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Parse(parse_args) => run_parse_command(parse_args).await,
        Command::Render(render_args) => run_render_command(render_args).await,
        Command::Format(format_args) => run_format_command(format_args).await,
    }
}
