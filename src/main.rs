//! Pose to animation converter: video in, Unity `.anim` file out.

use anyhow::Result;
use clap::Parser;
use log::info;
use pose2anim::{
    app::Pose2AnimApp,
    cli::Args,
    config::EXAMPLE_CONFIG,
};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Pose to Animation");

    let config = args.app_config()?;

    // Create and run application
    let app = Pose2AnimApp::new(config)?;
    let clip = app.run()?;
    info!("Done: {} bone curves", clip.curves.len());

    Ok(())
}
