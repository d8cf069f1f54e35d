//! Movement demo application
//!
//! Drops a capsule onto a floor mesh and walks it into a wall, resolving
//! collisions with sweep queries every frame.
//!
//! ```text
//! movement_demo [config.toml|config.ron]
//! movement_demo --write-config <path>
//! ```

mod app;
mod config;

use bounds_engine::config::Config;
use bounds_engine::foundation::logging;

use crate::app::{AppError, MovementApp};
use crate::config::MovementConfig;

fn main() -> Result<(), AppError> {
    let mut args = std::env::args().skip(1);
    let first = args.next();

    if first.as_deref() == Some("--write-config") {
        let path = args.next().unwrap_or_else(|| "movement.toml".to_string());
        MovementConfig::default().save_to_file(&path)?;
        println!("Wrote default configuration to {path}");
        return Ok(());
    }

    let config = match first {
        Some(path) => MovementConfig::load_from_file(&path)?,
        None => MovementConfig::default(),
    };

    logging::init_with_level(&config.log_level);
    log::info!("Starting movement demo ({} frames)", config.frames);

    let mut app = MovementApp::new(config)?;
    app.run()?;

    let position = app.player_position();
    log::info!(
        "Finished at ({:.3}, {:.3}, {:.3})",
        position.x,
        position.y,
        position.z
    );
    Ok(())
}
