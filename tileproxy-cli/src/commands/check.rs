//! Check command - validate a source definition and print what it serves.

use std::path::PathBuf;

use tileproxy::config::{loader, ConfigNode};
use tileproxy::source::Registry;

use crate::error::CliError;
use crate::runner::{read_definition, CliRunner};

/// Run the check command.
pub fn run(runner: &CliRunner, definition: Option<PathBuf>) -> Result<(), CliError> {
    runner.log_startup("check");

    let path = runner.definition_path(definition)?;
    let node = read_definition(&path)?;
    let source = runner.load_source(&node)?;

    println!("Definition: {}", path.display());
    println!("Source: {} ({})", source.name(), source.kind());

    if source.kind() == loader::OGC_API_TILES {
        let registry = loader::parse_registry(source.name(), &node)?;
        print!("{}", describe_registry(&registry));
    } else if let Some(url) = wmts_url(&node) {
        println!("  url {}", url);
    }

    println!();
    println!("OK");
    Ok(())
}

fn wmts_url(node: &ConfigNode) -> Option<&str> {
    node.child("http")?.child("url")?.text()
}

/// One block per map in lookup order, one line per URL in fetch order.
fn describe_registry(registry: &Registry) -> String {
    let mut out = String::new();
    for map in registry.maps() {
        out.push_str(&format!(
            "  map {} version {} grid {}\n",
            map.name, map.version, map.grid
        ));
        for matrix in &map.matrices {
            out.push_str(&format!("    level {}\n", matrix.level));
            for template in matrix.urls.iter().rev() {
                out.push_str(&format!("      {}\n", template.url()));
            }
        }
    }
    out
}
