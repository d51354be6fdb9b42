/// Example: Load a model file and scroll through it in the terminal
///
/// Usage: cargo run --example load_asset -- path/to/model.glb

use std::env;
use std::io;
use std::path::Path;
use scroll3d_core::{demo, Asset, ViewerConfig};
use scroll3d_terminal::TerminalApp;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = ViewerConfig::default();

    let asset = if args.len() < 2 {
        eprintln!("Usage: {} <model-file>", args[0]);
        eprintln!("\nNo model provided, using the built-in laptop...");
        demo::laptop()
    } else {
        println!("Loading model: {}", args[1]);
        Asset::load(Path::new(&args[1]))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Failed to load model: {}", e)))?
    };

    println!("Loaded {} triangles", asset.scene.triangle_count());
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(asset, &config)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    app.run()
}
