use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use sqlx::PgPool;

use todo_api::auth::AuthMiddleware;
use todo_api::routes;
use todo_api::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let bind_addr = (config.server_host.clone(), config.server_port);
    log::info!("Starting todo-api server at {}", config.server_url());

    let config = web::Data::new(config);
    HttpServer::new(move || {
        // Wrap order: Logger outermost, then CORS, with the auth guard
        // closest to the routes so public paths are already CORS-handled.
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .wrap(AuthMiddleware)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind(bind_addr)?
    .run()
    .await
}
