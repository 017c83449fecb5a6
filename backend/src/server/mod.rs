//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

use backend::Trace;
use backend::demo::{DemoDataError, demo_dataset};
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::{
    FixtureInventoryRepository, FixtureOrderRepository, FixtureProductRepository,
    FixtureUserRepository, InventoryRepository, LoginService, OrderRepository, OrderService,
    ProductRepository, UserRepository,
};
use backend::domain::{OrderProcessingService, PasswordLoginService, StandardDiscountPolicy};
use backend::inbound::http::cart::{add_cart_item, get_cart};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::landing::{admin_landing, guest_landing, user_landing};
use backend::inbound::http::orders::{checkout, get_order, get_receipt, process_order};
use backend::inbound::http::products::list_products;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{login, logout};
use backend::outbound::persistence::{
    DbPool, DieselInventoryRepository, DieselOrderRepository, DieselProductRepository,
    DieselUserRepository,
};
use mockable::DefaultClock;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .service(login)
        .service(logout)
        .service(get_cart)
        .service(add_cart_item)
        .service(checkout)
        .service(get_order)
        .service(process_order)
        .service(get_receipt);

    // The landing pages and cart read the session too, so the middleware
    // wraps an unprefixed scope holding every shop route rather than the
    // API scope alone.
    let shop = web::scope("")
        .wrap(session)
        .service(guest_landing)
        .service(user_landing)
        .service(admin_landing)
        .service(list_products)
        .service(api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    // The unprefixed scope matches every path, so it must come last or it
    // would shadow the probes and docs.
    app.service(shop)
}

/// Assemble the HTTP state from a login service and the repositories backing
/// the catalogue, stock, and orders.
fn assemble_state(
    login_service: Arc<dyn LoginService>,
    products: Arc<dyn ProductRepository>,
    inventory: Arc<dyn InventoryRepository>,
    orders: Arc<dyn OrderRepository>,
) -> web::Data<HttpState> {
    let order_service: Arc<dyn OrderService> = Arc::new(OrderProcessingService::new(
        orders,
        Arc::clone(&products),
        Arc::new(StandardDiscountPolicy),
        Arc::new(DefaultClock),
    ));
    web::Data::new(HttpState::new(login_service, products, inventory, order_service))
}

fn database_state(pool: &DbPool) -> web::Data<HttpState> {
    let users: Arc<dyn UserRepository> = Arc::new(DieselUserRepository::new(pool.clone()));
    assemble_state(
        Arc::new(PasswordLoginService::new(users)),
        Arc::new(DieselProductRepository::new(pool.clone())),
        Arc::new(DieselInventoryRepository::new(pool.clone())),
        Arc::new(DieselOrderRepository::new(pool.clone())),
    )
}

fn fixture_state() -> Result<web::Data<HttpState>, DemoDataError> {
    let dataset = demo_dataset()?;
    let users: Arc<dyn UserRepository> =
        Arc::new(FixtureUserRepository::with_accounts(dataset.accounts));
    Ok(assemble_state(
        Arc::new(PasswordLoginService::new(users)),
        Arc::new(FixtureProductRepository::with_catalogue(
            dataset.categories,
            dataset.products,
        )),
        Arc::new(FixtureInventoryRepository::with_stock(dataset.stock)),
        Arc::new(FixtureOrderRepository::with_orders(dataset.orders)),
    ))
}

/// Select database-backed adapters when a pool is configured, otherwise serve
/// the built-in demo dataset from fixtures.
fn build_http_state(config: &ServerConfig) -> Result<web::Data<HttpState>, DemoDataError> {
    match &config.db_pool {
        Some(pool) => Ok(database_state(pool)),
        None => fixture_state(),
    }
}

#[cfg(feature = "metrics")]
fn request_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("petstore")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("failed to build request metrics: {err}")))
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is bound.
/// - `config`: pre-built [`ServerConfig`] holding session, binding, and
///   optional database settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when assembling the application state fails
/// or the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config).map_err(std::io::Error::other)?;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics = request_metrics()?;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::http::header::SET_COOKIE;
    use actix_web::test as actix_test;
    use backend::demo::{DEMO_ADMIN_PASSWORD, DEMO_USER_PASSWORD};
    use backend::domain::{AccountId, LoginCredentials};
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn fixture_deps() -> AppDependencies {
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: fixture_state().expect("demo dataset should build"),
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }

    async fn session_cookie(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
        username: &str,
        password: &str,
    ) -> actix_web::cookie::Cookie<'static> {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "username": username, "password": password }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_login_accepts_the_demo_shopper() {
        let state = fixture_state().expect("demo dataset should build");
        let credentials =
            LoginCredentials::try_from_parts("user1", DEMO_USER_PASSWORD).expect("credentials");

        let user = state
            .login
            .authenticate(&credentials)
            .await
            .expect("demo login should succeed");

        assert_eq!(user.account_id, AccountId::new(1));
    }

    #[actix_web::test]
    async fn probes_stay_reachable_and_cookie_free() {
        let deps = fixture_deps();
        deps.health_state.mark_ready();
        let app = actix_test::init_service(build_app(deps)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_none());

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn login_cookie_unlocks_the_member_landing_page() {
        let app = actix_test::init_service(build_app(fixture_deps())).await;

        let cookie = session_cookie(&app, "user1", DEMO_USER_PASSWORD).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/user").cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn admin_landing_page_rejects_the_demo_shopper() {
        let app = actix_test::init_service(build_app(fixture_deps())).await;

        let cookie = session_cookie(&app, "user1", DEMO_USER_PASSWORD).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/admin").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let cookie = session_cookie(&app, "admin", DEMO_ADMIN_PASSWORD).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/admin").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[cfg(debug_assertions)]
    #[actix_web::test]
    async fn openapi_document_is_served_in_debug_builds() {
        let app = actix_test::init_service(build_app(fixture_deps())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api-docs/openapi.json").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
