pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{CartService, CatalogService, OrderService, PartyService};
use infrastructure::{
    DieselCartRepository, DieselCatalogRepository, DieselOrderRepository, DieselPartyRepository,
};

pub use db::{create_pool, DbPool};

pub type AppPartyService = PartyService<DieselPartyRepository>;
pub type AppCatalogService = CatalogService<DieselCatalogRepository>;
pub type AppCartService = CartService<DieselCartRepository>;
pub type AppOrderService = OrderService<DieselOrderRepository>;

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
        handlers::customers::list_customers,
        handlers::customers::create_customer,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::customers::available_products,
        handlers::customers::get_cart,
        handlers::customers::add_to_cart,
        handlers::customers::clear_cart,
        handlers::customers::remove_cart_item,
        handlers::customers::update_cart_item,
        handlers::orders::checkout,
        handlers::orders::customer_orders,
        handlers::orders::get_order,
        handlers::orders::update_order_status,
        handlers::orders::list_orders,
        handlers::sellers::list_sellers,
        handlers::sellers::create_seller,
        handlers::sellers::get_seller,
        handlers::sellers::update_seller,
        handlers::sellers::delete_seller,
        handlers::sellers::add_product,
        handlers::sellers::seller_products,
        handlers::sellers::update_stock,
        handlers::sellers::update_price,
        handlers::sellers::remove_product,
        handlers::owners::list_owners,
        handlers::owners::create_owner,
        handlers::owners::get_owner,
        handlers::owners::update_owner,
        handlers::owners::delete_owner,
        handlers::owners::create_stand,
        handlers::owners::list_stands,
    ),
    tags(
        (name = "customers", description = "Customer registration and browsing"),
        (name = "cart", description = "Shopping cart management"),
        (name = "orders", description = "Checkout and order tracking"),
        (name = "sellers", description = "Seller registration and product management"),
        (name = "owners", description = "Owner registration and stand leasing"),
    )
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        let parties = web::Data::new(PartyService::new(DieselPartyRepository::new(pool.clone())));
        let catalog =
            web::Data::new(CatalogService::new(DieselCatalogRepository::new(pool.clone())));
        let carts = web::Data::new(CartService::new(DieselCartRepository::new(pool.clone())));
        let orders = web::Data::new(OrderService::new(DieselOrderRepository::new(pool.clone())));

        App::new()
            .app_data(parties)
            .app_data(catalog)
            .app_data(carts)
            .app_data(orders)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .service(
                web::scope("/api")
                    // static segments before `{id}` so "products" is not
                    // parsed as a customer id
                    .route(
                        "/customers/products",
                        web::get().to(handlers::customers::available_products),
                    )
                    .route("/customers", web::get().to(handlers::customers::list_customers))
                    .route("/customers", web::post().to(handlers::customers::create_customer))
                    .route("/customers/{id}", web::get().to(handlers::customers::get_customer))
                    .route("/customers/{id}", web::put().to(handlers::customers::update_customer))
                    .route(
                        "/customers/{id}",
                        web::delete().to(handlers::customers::delete_customer),
                    )
                    .route("/customers/{id}/cart", web::get().to(handlers::customers::get_cart))
                    .route("/customers/{id}/cart", web::post().to(handlers::customers::add_to_cart))
                    .route(
                        "/customers/{id}/cart",
                        web::delete().to(handlers::customers::clear_cart),
                    )
                    .route(
                        "/customers/{id}/cart/items/{item_id}",
                        web::delete().to(handlers::customers::remove_cart_item),
                    )
                    .route(
                        "/customers/{id}/cart/items/{item_id}",
                        web::put().to(handlers::customers::update_cart_item),
                    )
                    .route("/customers/{id}/checkout", web::post().to(handlers::orders::checkout))
                    .route(
                        "/customers/{id}/orders",
                        web::get().to(handlers::orders::customer_orders),
                    )
                    .route("/orders", web::get().to(handlers::orders::list_orders))
                    .route("/orders/{id}", web::get().to(handlers::orders::get_order))
                    .route(
                        "/orders/{id}/status",
                        web::put().to(handlers::orders::update_order_status),
                    )
                    .route("/sellers", web::get().to(handlers::sellers::list_sellers))
                    .route("/sellers", web::post().to(handlers::sellers::create_seller))
                    .route("/sellers/{id}", web::get().to(handlers::sellers::get_seller))
                    .route("/sellers/{id}", web::put().to(handlers::sellers::update_seller))
                    .route("/sellers/{id}", web::delete().to(handlers::sellers::delete_seller))
                    .route(
                        "/sellers/{id}/products",
                        web::post().to(handlers::sellers::add_product),
                    )
                    .route(
                        "/sellers/{id}/products",
                        web::get().to(handlers::sellers::seller_products),
                    )
                    .route(
                        "/sellers/{id}/products/{stock_id}/stock",
                        web::put().to(handlers::sellers::update_stock),
                    )
                    .route(
                        "/sellers/{id}/products/{stock_id}/price",
                        web::put().to(handlers::sellers::update_price),
                    )
                    .route(
                        "/sellers/{id}/products/{stock_id}",
                        web::delete().to(handlers::sellers::remove_product),
                    )
                    .route("/owners", web::get().to(handlers::owners::list_owners))
                    .route("/owners", web::post().to(handlers::owners::create_owner))
                    .route("/owners/{id}", web::get().to(handlers::owners::get_owner))
                    .route("/owners/{id}", web::put().to(handlers::owners::update_owner))
                    .route("/owners/{id}", web::delete().to(handlers::owners::delete_owner))
                    .route("/owners/{id}/stands", web::post().to(handlers::owners::create_stand))
                    .route("/owners/{id}/stands", web::get().to(handlers::owners::list_stands)),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
