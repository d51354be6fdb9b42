/// scroll3d Terminal - scroll-driven model viewer
///
/// Usage: scroll3d-terminal [model.glb|model.gltf|model.stl] [--config viewer.toml]
/// Without a model the built-in laptop is shown.
/// Controls:
///   - j/k, Arrow Keys, Mouse Wheel: Scroll the page
///   - PageUp/PageDown/Space, Home/End: Jump
///   - Q/ESC: Quit

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use scroll3d_core::{demo, Asset, ViewerConfig};
use scroll3d_terminal::TerminalApp;

fn main() -> ExitCode {
    // Logs go to stderr; redirect it (2>scroll3d.log) to keep the screen clean
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .try_init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> scroll3d_core::Result<()> {
    let mut model: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            config_path = args.next().map(PathBuf::from);
        } else {
            model = Some(PathBuf::from(arg));
        }
    }

    let config = match &config_path {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let asset = match &model {
        Some(path) => {
            log::info!("loading {}", path.display());
            Asset::load(path)?
        }
        None => demo::laptop(),
    };

    let mut app = TerminalApp::new(asset, &config)?;
    app.run()?;
    Ok(())
}
