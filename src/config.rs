use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rain-machine",
    version,
    about = "Procedural scrolling pixel pattern driven by external control inputs"
)]
pub struct Config {
    /// Where control values come from.
    #[arg(long, value_enum, default_value_t = ControlSource::Sim)]
    pub source: ControlSource,

    /// Line feed of `<control> <value>` pairs (required for --source feed).
    #[arg(long)]
    pub feed: Option<PathBuf>,

    /// Native-range layout file; controls it omits default to [0,1].
    #[arg(long)]
    pub layout: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    /// Print the default layout file as a template and exit.
    #[arg(long, default_value_t = false)]
    pub print_layout: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ControlSource {
    Sim,
    Feed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
}
