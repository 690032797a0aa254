use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_DATABASE_URL: &str = "./data/leadboard.db";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite location: a file path, optionally prefixed with `sqlite://` or
    /// `sqlite:`, or `:memory:`.
    pub database_url: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid listen address: {e}")))
    }

    /// Resolves `database_url` to the path handed to SQLite.
    pub fn db_path(&self) -> Result<PathBuf> {
        let url = self.database_url.trim();
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        if path.is_empty() {
            return Err(Error::Config("database url is empty".to_string()));
        }
        Ok(PathBuf::from(path))
    }

    /// Creates the database's parent directory if it does not exist yet.
    pub fn prepare_data_dir(&self) -> Result<()> {
        let path = self.db_path()?;
        if path == Path::new(":memory:") {
            return Ok(());
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(database_url: &str) -> ServerConfig {
        ServerConfig {
            database_url: database_url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_db_path_strips_scheme() {
        assert_eq!(
            config("sqlite:///var/lib/leads.db").db_path().unwrap(),
            PathBuf::from("/var/lib/leads.db")
        );
        assert_eq!(
            config("sqlite:leads.db").db_path().unwrap(),
            PathBuf::from("leads.db")
        );
        assert_eq!(
            config("./data/leads.db").db_path().unwrap(),
            PathBuf::from("./data/leads.db")
        );
    }

    #[test]
    fn test_empty_database_url_is_rejected() {
        assert!(matches!(config("  ").db_path(), Err(Error::Config(_))));
        assert!(matches!(config("sqlite://").db_path(), Err(Error::Config(_))));
    }

    #[test]
    fn test_socket_addr() {
        let addr = ServerConfig::default().socket_addr().unwrap();
        assert_eq!(addr.port(), 5000);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(bad.socket_addr(), Err(Error::Config(_))));
    }
}
