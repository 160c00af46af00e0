//! Fetch command - run the proxy chain for one tile and save the result.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use super::common::TileArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the fetch command.
pub fn run(runner: &CliRunner, args: TileArgs, output: PathBuf) -> Result<(), CliError> {
    runner.log_startup("fetch");

    let source = args.load_source(runner)?;
    let request = args.to_request();

    println!("Fetching tile:");
    println!("  Tileset: {}", request.tileset);
    println!("  Grid: {} ({})", request.grid.name, request.grid.origin);
    println!("  Tile: x={}, y={}, z={}", args.x, args.y, args.level);
    println!();

    let start = Instant::now();
    let data = source.proxy_map(&request)?;
    let elapsed = start.elapsed();

    info!(bytes = data.len(), elapsed_ms = elapsed.as_millis() as u64, "tile fetched");
    println!("Fetched {} bytes in {:.2?}", data.len(), elapsed);

    save(&output, &data)?;
    println!("Saved to: {}", output.display());
    Ok(())
}

fn save(path: &Path, data: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, data).map_err(|error| CliError::FileWrite {
        path: path.to_path_buf(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_writes_bytes() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("tile.png");

        save(&path, b"PNG").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"PNG");
    }

    #[test]
    fn test_save_reports_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("tile.png");

        let err = save(&path, b"PNG").unwrap_err();
        assert!(matches!(err, CliError::FileWrite { .. }));
        assert!(err.to_string().contains("tile.png"));
    }
}
