use std::io;

use dotenvy::dotenv;
use storefront_orders::config::Settings;
use storefront_orders::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings =
        Settings::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = create_pool(&settings.database_url, settings.db_pool_size)
        .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))?;
    run_migrations(&pool).map_err(io::Error::other)?;

    log::info!(
        "Starting server at http://{}:{}",
        settings.host,
        settings.port
    );

    let state = AppState::from_pool(pool, settings.admin_token);
    build_server(state, &settings.host, settings.port)?.await
}
