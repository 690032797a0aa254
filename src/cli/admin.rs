use anyhow::bail;

use super::open_store;
use crate::config::ServerConfig;
use crate::store::{SqliteStore, Store};

pub fn run_admin_init(database_url: String) -> anyhow::Result<()> {
    let config = ServerConfig {
        database_url,
        ..Default::default()
    };
    config.prepare_data_dir()?;

    let db_path = config.db_path()?;
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;
    store.close()?;

    println!("Initialized lead database at {}", db_path.display());
    Ok(())
}

pub fn run_admin_reset(database_url: String, yes: bool) -> anyhow::Result<()> {
    if !yes {
        bail!("Refusing to delete all leads without --yes");
    }

    let store = open_store(&database_url)?;
    let removed = store.clear_leads()?;
    store.close()?;

    println!("Deleted {removed} lead(s)");
    Ok(())
}
