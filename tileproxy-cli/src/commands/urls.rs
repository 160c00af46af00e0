//! Urls command - print the upstream URLs a tile resolves to.

use super::common::TileArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the urls command. URLs are printed in fetch order, one per line.
pub fn run(runner: &CliRunner, args: TileArgs) -> Result<(), CliError> {
    runner.log_startup("urls");

    let source = args.load_source(runner)?;
    let request = args.to_request();

    for url in source.resolve_urls(&request)? {
        println!("{}", url);
    }
    Ok(())
}
