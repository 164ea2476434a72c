use crate::infra::JsonFileStore;
use clap::Args;
use rankboard::config::AppConfig;
use rankboard::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct SeedArgs {
    /// Data directory holding the JSON files (defaults to APP_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let data_dir = args.data_dir.unwrap_or(config.storage.data_dir);

    let store = JsonFileStore::open(&data_dir)?;
    let entries = store.reset_to_seed()?;

    println!(
        "seeded {} entries into {}",
        entries.len(),
        data_dir.join("entries.json").display()
    );
    for entry in entries {
        println!(
            "  {:<16} score {:.2} ({}%)",
            entry.name, entry.computed.score, entry.computed.percent
        );
    }
    Ok(())
}
