pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::OrderService;
use application::payment_service::PaymentService;
use application::point_service::PointService;
use infrastructure::gateway::{GatewayConfig, SignedParamsGateway};
use infrastructure::intent_store::InMemoryIntentStore;
use infrastructure::order_repo::DieselOrderRepository;
use infrastructure::point_repo::DieselPointLedger;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::cancel_order,
        handlers::points::balance,
        handlers::points::deduct,
        handlers::points::refund,
        handlers::points::history,
        handlers::gateway::auth_params,
        handlers::gateway::callback,
    ),
    components(schemas(
        handlers::orders::CreateOrderRequest,
        handlers::orders::CreateOrderResponse,
        handlers::orders::OrderResponse,
        handlers::orders::ListOrdersResponse,
        handlers::points::BalanceResponse,
        handlers::points::PointMutationRequest,
        handlers::points::PointMutationResponse,
        handlers::points::PointHistoryEntry,
        domain::point::PointEntryKind,
        handlers::gateway::CallbackRequest,
        handlers::gateway::CallbackResponse,
        domain::payment::PgAuthParams,
        domain::payment::PgKind,
        domain::order::OrderStatus,
        domain::order::PaymentMethod,
    ))
)]
struct ApiDoc;

/// Route table shared by the real server and the in-process handler tests.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/order")
            .route("/create", web::post().to(handlers::orders::create_order))
            .route("/page", web::get().to(handlers::orders::list_orders))
            .route("/{id}", web::get().to(handlers::orders::get_order))
            .route("/{id}/cancel", web::post().to(handlers::orders::cancel_order)),
    )
    .service(
        web::scope("/point")
            .route("/balance", web::get().to(handlers::points::balance))
            .route("/deduct", web::post().to(handlers::points::deduct))
            .route("/refund", web::post().to(handlers::points::refund))
            .route("/history", web::get().to(handlers::points::history)),
    )
    .service(
        web::scope("/pg")
            .route("/auth-params", web::get().to(handlers::gateway::auth_params))
            .route("/callback", web::post().to(handlers::gateway::callback)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    gateway_config: GatewayConfig,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let orders = Arc::new(DieselOrderRepository::new(pool.clone()));
    let ledger = Arc::new(DieselPointLedger::new(pool.clone()));
    let intents = Arc::new(InMemoryIntentStore::new());
    let gateway = Arc::new(SignedParamsGateway::new(gateway_config));

    let payments = PaymentService::new(
        orders.clone(),
        ledger.clone(),
        intents,
        gateway,
    );
    let order_svc = OrderService::new(orders, ledger.clone());
    let point_svc = PointService::new(ledger);

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(payments.clone()))
            .app_data(web::Data::new(order_svc.clone()))
            .app_data(web::Data::new(point_svc.clone()))
            .wrap(Logger::default())
            .configure(configure_api)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
