mod config;
mod db;
mod ledger;
mod logging;
mod models;
mod run;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    logging::init(&config.log_path)?;
    tracing::debug!(?config, "loaded config");

    let mut db = db::Database::open(&config.db_path)?;

    match args.len() {
        1 => run::as_tui(&config, &mut db),
        2.. => run::as_cli(&args, &config, &mut db),
        _ => {
            eprintln!("Usage: ledgertui [command]");
            Ok(())
        }
    }
}
