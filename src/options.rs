use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Falling-block puzzle game for the terminal.
#[derive(Clone, Debug, Parser)]
#[command(name = "blockfall", version, about)]
pub struct Options {
    /// Seed for the piece sequence (default: derived from the clock)
    #[arg(short, long)]
    pub seed: Option<u32>,

    #[arg(short, long, value_enum, default_value_t = RendererKind::Color)]
    pub renderer: RendererKind,

    /// Log filter, e.g. `debug` or `blockfall_core=trace`
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// Write logs to this directory; without it logs are discarded
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RendererKind {
    /// 24-bit color framebuffer
    Color,
    /// Plain characters
    Ascii,
}
