use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "parabens",
    about = "Generate a personalized birthday video from an After Effects template"
)]
pub struct Args {
    /// Recipient name; prompted for interactively when omitted.
    #[arg(long)]
    pub name: Option<String>,

    /// Recipient role; prompted for interactively when omitted.
    #[arg(long)]
    pub role: Option<String>,

    /// Avatar image path; a native file picker opens when omitted.
    #[arg(long)]
    pub avatar: Option<PathBuf>,

    /// Override the configured output directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Disable the progress bars.
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}
