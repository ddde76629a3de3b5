use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Install the latest Flowser release and open a project with it")]
pub struct Args {
    /// Path to launcher configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Launch Flowser on this project once it is installed
    #[arg(long)]
    pub project_path: Option<PathBuf>,
}
