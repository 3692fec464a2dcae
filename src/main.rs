use anyhow::Result;
use log::info;

use sparse_maze::{MazeGenerator, MazeSettings};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let settings = MazeSettings::default();
    info!(
        "Generating a {}x{} maze, {}% fill",
        settings.width, settings.height, settings.fill_percent
    );

    let generator = MazeGenerator::new(settings)?;
    let maze = generator.generate_from_settings();
    print!("{maze}");

    Ok(())
}
