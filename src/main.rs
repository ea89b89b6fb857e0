use std::io;

use actix_cors::Cors;
use actix_web::{
    middleware::{self, Condition},
    web::Data,
    App, HttpServer,
};
use clap::Parser;
use database::store::PersonStore;
use people_api::{
    cli::Cli,
    http,
    startup::{crash_startup, open_store},
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // A missing .env file is fine, the environment or flags may carry everything
    let dotenv = dotenvy::dotenv();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(path) = dotenv {
        log::info!("Loaded environment from {}", path.display());
    }

    let args = Cli::parse();

    let store: Data<dyn PersonStore> = match open_store(args.storage_engine()).await {
        Ok(store) => Data::from(store),
        Err(reason) => crash_startup(reason),
    };

    log::info!("starting HTTP server on {}:{}.", args.address, args.port);

    let log_http = args.log_http;

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .configure(http::configure)
            .wrap(Cors::permissive())
            .wrap(Condition::new(log_http, middleware::Logger::default()))
    })
    .workers(args.http_workers)
    .bind((args.address, args.port))?
    .run()
    .await?;

    log::info!("HTTP server stopped, closing store");

    Ok(())
}
