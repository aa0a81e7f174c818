use std::path::PathBuf;

use crate::error::Result;
pub use clap::Parser;

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3030,
        env = "VJ_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "VJ_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "VJ_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/videojuegos.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "VJ_DATA_DIR",
        help = "Data directory for database file, default is system default like ~/.local/share/videojuegos",
        default_value_t = default_data_dir()
    )]
    data_dir: String,

    #[arg(
        long,
        env = "VJ_MAX_CONNECTIONS",
        default_value_t = vgapi_dal::DEFAULT_MAX_CONNECTIONS,
        help = "Maximum number of database connections"
    )]
    pub max_connections: u32,

    #[arg(long, env = "VJ_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("videojuegos"))
        .unwrap_or_else(|| PathBuf::from("videojuegos"))
        .to_string_lossy()
        .to_string()
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/videojuegos.db", self.data_dir))
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.listen_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config =
            ServerConfig::try_parse_from(["vgapi-server", "--data-dir", "/tmp/vj"]).unwrap();
        assert_eq!(config.port, 3030);
        assert_eq!(config.listen_address, "127.0.0.1");
        assert_eq!(config.database_url(), "sqlite:///tmp/vj/videojuegos.db");
        assert_eq!(config.max_connections, 50);
        assert!(!config.no_cors);
    }

    #[test]
    fn test_explicit_database() {
        let config = ServerConfig::try_parse_from([
            "vgapi-server",
            "--database-url",
            "sqlite::memory:",
            "--port",
            "8080",
            "--no-cors",
        ])
        .unwrap();
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
        assert!(config.no_cors);
    }
}
