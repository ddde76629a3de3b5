mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use flowser_launcher::{InstallOutcome, Launcher, LauncherConfig, LauncherError, Platform};
use log::{error, info};

fn main() {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("FATAL: Failed to create Tokio runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(real_main()) {
        error!("{e:#}");
        let code = e
            .downcast_ref::<LauncherError>()
            .map_or(1, LauncherError::exit_code);
        std::process::exit(code);
    }
}

async fn real_main() -> Result<()> {
    let args = cli::Args::parse();

    let config = LauncherConfig::load(args.config.as_deref())
        .context("Failed to load launcher configuration")?;
    let launcher = Launcher::new(config, Platform::detect())?;

    match launcher.ensure_installed().await? {
        InstallOutcome::AlreadyInstalled(bundle) => {
            info!(
                "{} is already installed in {}",
                launcher.config().app_name,
                bundle.display()
            );
        }
        InstallOutcome::Installed(app) => {
            info!(
                "Installed {} {} into {}",
                launcher.config().app_name,
                app.version,
                app.bundle.display()
            );
        }
    }

    if let Some(project) = args.project_path {
        launcher.run(&project).await?;
    }
    Ok(())
}
