use clap::{Parser, ValueEnum};
use database::store::{options::PgConnectOptions, StorageEngine};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum StoreKind {
    /// PostgreSQL, configured by the --db-* flags
    Postgres,
    /// Process memory, lost on exit
    Memory,
}

/// 📇 People API, a REST interface for creating, reading, updating and deleting person records
///
/// Every flag can also be set through the environment variable shown, or a `.env` file
#[derive(Parser, Debug)]
pub struct Cli {
    /// Port the HTTP server will run on
    #[clap(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Address the HTTP server will run on
    #[clap(short, long, env = "ADDRESS", default_value = "0.0.0.0")]
    pub address: String,

    /// Log every HTTP request
    #[clap(long, env = "LOG_HTTP")]
    pub log_http: bool,

    #[clap(long, env = "HTTP_WORKERS", default_value_t = 2)]
    pub http_workers: usize,

    /// Where records are kept
    #[clap(long, env = "STORE", value_enum, default_value_t = StoreKind::Postgres)]
    pub store: StoreKind,

    #[clap(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    #[clap(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Created on startup if it does not exist
    #[clap(long, env = "DB_NAME", default_value = "people")]
    pub db_name: String,

    #[clap(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    #[clap(long, env = "DB_PASS", default_value = "", hide_env_values = true)]
    pub db_pass: String,
}

impl Cli {
    pub fn storage_engine(&self) -> StorageEngine {
        match self.store {
            StoreKind::Postgres => StorageEngine::Postgres(
                PgConnectOptions::default()
                    .set_host(self.db_host.clone())
                    .set_port(self.db_port)
                    .set_database(self.db_name.clone())
                    .set_user(self.db_user.clone())
                    .set_password(self.db_pass.clone()),
            ),
            StoreKind::Memory => StorageEngine::Memory,
        }
    }
}
