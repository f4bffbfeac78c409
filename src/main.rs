use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use std::io;

use employee_directory::config::AppConfig;
use employee_directory::{db, handlers};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|err| {
        error!("Invalid configuration: {}", err);
        io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
    })?;

    let store = db::create_store(&config).await.map_err(|err| {
        error!("Failed to open the record store: {}", err);
        io::Error::new(io::ErrorKind::Other, err.to_string())
    })?;
    let store = web::Data::from(store);

    std::fs::create_dir_all(&config.upload.dir)?;
    let upload = config.upload.clone();

    info!("Starting server at {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(web::Data::new(upload.clone()))
            .configure(|cfg| handlers::configure(cfg, &upload))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
