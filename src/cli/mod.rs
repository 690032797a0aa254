mod admin;
mod commands;
pub mod http_client;
mod leads;

pub use admin::{run_admin_init, run_admin_reset};
pub use commands::{AdminCommands, LeadCommands, ListArgs};
pub use http_client::{ClientError, DEFAULT_SERVER_URL, LeadClient};
pub use leads::run_leads;

use crate::config::ServerConfig;
use crate::store::{SqliteStore, Store};

/// Opens an existing lead database, refusing to create a new one.
pub fn open_store(database_url: &str) -> anyhow::Result<SqliteStore> {
    let config = ServerConfig {
        database_url: database_url.to_string(),
        ..Default::default()
    };
    let db_path = config.db_path()?;

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'leadboard admin init' first.",
            db_path.display()
        );
    }

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;
    Ok(store)
}
