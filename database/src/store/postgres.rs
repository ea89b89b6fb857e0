use async_trait::async_trait;
use tokio_postgres::{error::SqlState, Client, NoTls, Row};

use crate::{
    consts::consts::EntityId,
    model::person::{NewPerson, Person, PersonUpdate},
};

use super::{options::PgConnectOptions, PersonStore, StoreError, StoreResult};

const CREATE_PEOPLE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "public"."people" (
        "id" varchar(11) NOT NULL,
        "name" text NOT NULL,
        "phone" text NOT NULL,
        "birth_date" text NOT NULL,
        "created_at" timestamptz NOT NULL DEFAULT now(),
        "updated_at" timestamptz NOT NULL DEFAULT now(),
        PRIMARY KEY ("id")
    );
"#;

const SELECT_ALL: &str = r#"
    SELECT "id", "name", "phone", "birth_date", "created_at", "updated_at"
    FROM "public"."people"
    ORDER BY "id";
"#;

const SELECT_BY_ID: &str = r#"
    SELECT "id", "name", "phone", "birth_date", "created_at", "updated_at"
    FROM "public"."people"
    WHERE "id" = $1;
"#;

const INSERT: &str = r#"
    INSERT INTO "public"."people" ("id", "name", "phone", "birth_date")
    VALUES ($1, $2, $3, $4)
    RETURNING "id", "name", "phone", "birth_date", "created_at", "updated_at";
"#;

const UPDATE: &str = r#"
    UPDATE "public"."people"
    SET "name" = $2, "phone" = $3, "birth_date" = $4, "updated_at" = now()
    WHERE "id" = $1;
"#;

const DELETE: &str = r#"
    DELETE FROM "public"."people" WHERE "id" = $1;
"#;

/// One process-wide client. tokio-postgres pipelines concurrent queries over
/// the single connection, so handlers share it without a pool
pub struct PgPersonStore {
    client: Client,
}

impl PgPersonStore {
    pub async fn connect(options: &PgConnectOptions) -> StoreResult<Self> {
        let client = open_client(options).await?;

        log::info!(
            "Connected to database [host: {}, port: {}, database: {}]",
            options.host,
            options.port,
            options.database
        );

        Ok(Self { client })
    }
}

async fn open_client(options: &PgConnectOptions) -> StoreResult<Client> {
    let (client, connection) = options
        .to_config()
        .connect(NoTls)
        .await
        .map_err(StoreError::Connection)?;

    // The connection object performs the actual communication with the database
    let database = options.database.clone();
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("Connection error [database: {}]: {}", database, e);
        }
    });

    Ok(client)
}

/// Creates the target database when it is missing. Connects through the
/// maintenance database because a connection to a missing database fails
pub async fn ensure_database(options: &PgConnectOptions) -> StoreResult<()> {
    let client = open_client(&options.maintenance()).await?;

    let existing = client
        .query_opt(
            "SELECT 1 FROM pg_database WHERE datname = $1;",
            &[&options.database],
        )
        .await
        .map_err(StoreError::Query)?;

    if existing.is_some() {
        return Ok(());
    }

    log::info!("Creating database [{}]", options.database);

    // Identifiers cannot be bound as parameters
    let create = format!("CREATE DATABASE {};", quote_identifier(&options.database));

    match client.batch_execute(&create).await {
        Ok(()) => Ok(()),
        // Another process created it between the check and the create
        Err(e) if e.code() == Some(&SqlState::DUPLICATE_DATABASE) => Ok(()),
        Err(e) => Err(StoreError::Query(e)),
    }
}

fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn row_to_person(row: &Row) -> StoreResult<Person> {
    Ok(Person {
        id: EntityId(row.try_get("id").map_err(StoreError::Query)?),
        name: row.try_get("name").map_err(StoreError::Query)?,
        phone: row.try_get("phone").map_err(StoreError::Query)?,
        birth_date: row.try_get("birth_date").map_err(StoreError::Query)?,
        created_at: row.try_get("created_at").map_err(StoreError::Query)?,
        updated_at: row.try_get("updated_at").map_err(StoreError::Query)?,
    })
}

#[async_trait]
impl PersonStore for PgPersonStore {
    async fn ensure_schema(&self) -> StoreResult<()> {
        self.client
            .batch_execute(CREATE_PEOPLE_TABLE)
            .await
            .map_err(StoreError::Query)
    }

    async fn list_all(&self) -> StoreResult<Vec<Person>> {
        let rows = self
            .client
            .query(SELECT_ALL, &[])
            .await
            .map_err(StoreError::Query)?;

        rows.iter().map(row_to_person).collect()
    }

    async fn get_by_id(&self, id: &EntityId) -> StoreResult<Option<Person>> {
        let row = self
            .client
            .query_opt(SELECT_BY_ID, &[&id.as_str()])
            .await
            .map_err(StoreError::Query)?;

        row.as_ref().map(row_to_person).transpose()
    }

    async fn create(&self, person: NewPerson) -> StoreResult<Person> {
        let result = self
            .client
            .query_one(
                INSERT,
                &[
                    &person.id.as_str(),
                    &person.name,
                    &person.phone,
                    &person.birth_date,
                ],
            )
            .await;

        match result {
            Ok(row) => row_to_person(&row),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Err(StoreError::DuplicateId(person.id))
            }
            Err(e) => Err(StoreError::Query(e)),
        }
    }

    async fn update(&self, id: &EntityId, update: PersonUpdate) -> StoreResult<u64> {
        self.client
            .execute(
                UPDATE,
                &[
                    &id.as_str(),
                    &update.name,
                    &update.phone,
                    &update.birth_date,
                ],
            )
            .await
            .map_err(StoreError::Query)
    }

    async fn remove(&self, id: &EntityId) -> StoreResult<u64> {
        self.client
            .execute(DELETE, &[&id.as_str()])
            .await
            .map_err(StoreError::Query)
    }
}
