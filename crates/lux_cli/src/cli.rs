use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lux_core::RenderJob;

/// Log levels accepted by `--log-level`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lux")]
#[command(about = "Render a scene with the Lux path tracer")]
pub struct Args {
    /// Render-job document (.toml or .json)
    #[arg(short, long)]
    pub job: PathBuf,

    /// Scene document, replacing the job's `scene`
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub spp: Option<u32>,

    /// Output image; the format follows the extension
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads (0 uses every core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Maximum bounces per path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Stop after this many seconds and save what is finished
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// Sample lights directly at diffuse surfaces
    #[arg(long)]
    pub nee: bool,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command line overrides on top of a loaded job.
    pub fn apply_overrides(&self, job: &mut RenderJob) {
        if let Some(scene) = &self.scene {
            job.scene = scene.clone();
        }
        if let Some(spp) = self.spp {
            job.spp = spp;
        }
        if let Some(out) = &self.out {
            job.out_path = out.clone();
        }
        if let Some(seed) = self.seed {
            job.seed = seed;
        }
        if let Some(threads) = self.threads {
            job.threads = threads;
        }
        if let Some(max_depth) = self.max_depth {
            job.max_depth = max_depth;
        }
        if let Some(limit) = self.time_limit {
            job.time_limit_secs = Some(limit);
        }
        if self.nee {
            job.next_event_estimation = true;
        }
    }
}
