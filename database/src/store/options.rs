use std::fmt;

use crate::consts::consts::MAINTENANCE_DATABASE;

#[derive(Clone)]
pub struct PgConnectOptions {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl PgConnectOptions {
    pub fn set_host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    pub fn set_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn set_database(mut self, database: String) -> Self {
        self.database = database;
        self
    }

    pub fn set_user(mut self, user: String) -> Self {
        self.user = user;
        self
    }

    pub fn set_password(mut self, password: String) -> Self {
        self.password = password;
        self
    }

    /// Same server and credentials, pointed at the maintenance database. Used to
    /// create the target database before the first connection to it
    pub fn maintenance(&self) -> Self {
        self.clone().set_database(MAINTENANCE_DATABASE.to_string())
    }

    pub fn to_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();

        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.database)
            .user(&self.user)
            .password(&self.password);

        config
    }
}

impl Default for PgConnectOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "people".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
        }
    }
}

// Password stays out of the logs
impl fmt::Debug for PgConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConnectOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}
