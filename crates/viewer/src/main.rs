//! Sheet viewer.
//!
//! Usage: sheet [config.json] [texture-image]

use std::path::{Path, PathBuf};

use mesh::MeshConfig;
use viewer::{app, SheetApp};

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn main() {
    env_logger::init();

    let mut config = MeshConfig::default();
    for arg in std::env::args().skip(1) {
        let path = PathBuf::from(arg);
        if is_json(&path) {
            match MeshConfig::load_json(&path) {
                Ok(loaded) => {
                    log::info!("Loaded config from {}", path.display());
                    // A texture given on the command line wins over the file's.
                    let texture = config.texture_path.take();
                    config = loaded;
                    if texture.is_some() {
                        config.texture_path = texture;
                    }
                }
                Err(e) => log::error!("Failed to load {}: {e}, using defaults", path.display()),
            }
        } else {
            config.texture_path = Some(path);
        }
    }

    log::info!(
        "Grid width {}, tick every {} ms",
        config.grid_width,
        config.tick_interval_ms
    );

    if let Err(e) = app::run::<SheetApp>(config) {
        log::error!("Viewer exited with error: {e}");
        std::process::exit(1);
    }
}
