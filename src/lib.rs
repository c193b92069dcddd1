pub mod application;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod presentation;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use application::catalog_service::CatalogService;
use application::order_service::OrderService;
use auth::AdminToken;
use handlers::{orders, products};
use infrastructure::{DieselOrderRepository, DieselProductRepository};

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for migration in applied {
        log::info!("Applied migration {}", migration);
    }
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::create_order,
        orders::get_order,
        orders::get_order_view,
        orders::list_orders,
        orders::update_status,
        orders::confirm_payment,
        products::create_product,
        products::get_product,
        products::list_products,
        products::update_stock,
        products::get_size_guide,
    ),
    modifiers(&AdminTokenScheme),
    tags(
        (name = "orders", description = "Checkout and order fulfilment"),
        (name = "products", description = "Catalog and size guides"),
    )
)]
pub struct ApiDoc;

struct AdminTokenScheme;

impl Modify for AdminTokenScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_token",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
    pub catalog: CatalogService,
    pub admin_token: AdminToken,
}

impl AppState {
    pub fn from_pool(pool: DbPool, admin_token: AdminToken) -> Self {
        Self {
            orders: OrderService::new(DieselOrderRepository::new(pool.clone())),
            catalog: CatalogService::new(DieselProductRepository::new(pool)),
            admin_token,
        }
    }
}

/// Registers application data and every API route.
pub fn routes(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state.orders))
            .app_data(web::Data::new(state.catalog))
            .app_data(web::Data::new(state.admin_token))
            .service(
                web::scope("/orders")
                    .route("", web::post().to(orders::create_order))
                    .route("", web::get().to(orders::list_orders))
                    .route("/{id}", web::get().to(orders::get_order))
                    .route("/{id}/view", web::get().to(orders::get_order_view))
                    .route("/{id}/status", web::patch().to(orders::update_status))
                    .route("/{id}/pay", web::post().to(orders::confirm_payment)),
            )
            .service(
                web::scope("/products")
                    .route("", web::post().to(products::create_product))
                    .route("", web::get().to(products::list_products))
                    .route("/{id}", web::get().to(products::get_product))
                    .route("/{id}/stock", web::patch().to(products::update_stock)),
            )
            .route(
                "/size-guide/{category}",
                web::get().to(products::get_size_guide),
            );
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(routes(state.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
