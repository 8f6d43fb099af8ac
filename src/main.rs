use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use tripsplit::{routes, settings::Settings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = Settings::new().map_err(std::io::Error::other)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tripsplit={level},actix_web={level}",
            level = settings.app.level
        ))
        .init();

    let strategy = settings.settlement.strategy;
    tracing::info!(
        "Listening on {}:{} (default settlement strategy: {strategy})",
        settings.server.bind,
        settings.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(routes::configure(strategy))
    })
    .bind((settings.server.bind.as_str(), settings.server.port))?
    .run()
    .await
}
