//! Server harness and shared world for storefront integration tests.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The `WorldFixture` ensures the server
//! is stopped even if a test panics. The server wires the real domain
//! services over the demo dataset, so tests observe exactly what a deployed
//! fixture-mode instance would serve.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use backend::Trace;
use backend::demo::demo_dataset;
use backend::domain::ports::{
    FixtureInventoryRepository, FixtureOrderRepository, FixtureProductRepository,
    FixtureUserRepository, ProductRepository,
};
use backend::domain::{OrderProcessingService, PasswordLoginService, StandardDiscountPolicy};
use backend::inbound::http::cart::{add_cart_item, get_cart};
use backend::inbound::http::landing::{admin_landing, guest_landing, user_landing};
use backend::inbound::http::orders::{checkout, get_order, get_receipt, process_order};
use backend::inbound::http::products::list_products;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{login, logout};

pub(crate) struct ShopWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_cache_control: Option<String>,
    pub(crate) last_trace_id: Option<String>,
    pub(crate) session_cookie: Option<String>,
    pub(crate) placed_order_id: Option<i32>,
}

pub(crate) type SharedWorld = Rc<RefCell<ShopWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

pub(crate) fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it, so we lock the world
    // while calling `block_on`. The future must not try to lock the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn test_session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
        .build()
}

fn demo_http_state() -> HttpState {
    let dataset = demo_dataset().expect("demo dataset should build");
    let products: Arc<dyn ProductRepository> = Arc::new(FixtureProductRepository::with_catalogue(
        dataset.categories,
        dataset.products,
    ));
    let login_service = PasswordLoginService::new(Arc::new(FixtureUserRepository::with_accounts(
        dataset.accounts,
    )));
    let order_service = OrderProcessingService::new(
        Arc::new(FixtureOrderRepository::with_orders(dataset.orders)),
        Arc::clone(&products),
        Arc::new(StandardDiscountPolicy),
        Arc::new(DefaultClock),
    );
    HttpState::new(
        Arc::new(login_service),
        products,
        Arc::new(FixtureInventoryRepository::with_stock(dataset.stock)),
        Arc::new(order_service),
    )
}

async fn spawn_shop_server(http_state: HttpState) -> Result<(String, ServerHandle), String> {
    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let http_data = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .service(login)
            .service(logout)
            .service(get_cart)
            .service(add_cart_item)
            .service(checkout)
            .service(get_order)
            .service(process_order)
            .service(get_receipt);
        // The landing pages and cart read the session, so the middleware
        // wraps the whole shop surface exactly as the production server does.
        let shop = web::scope("")
            .wrap(test_session_middleware(key.clone()))
            .service(guest_landing)
            .service(user_landing)
            .service(admin_landing)
            .service(list_products)
            .service(api);

        App::new()
            .app_data(http_data.clone())
            .wrap(Trace)
            .service(shop)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

fn create_runtime_and_local() -> (Runtime, LocalSet) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();

    (runtime, local)
}

#[fixture]
pub(crate) fn world() -> WorldFixture {
    let (runtime, local) = create_runtime_and_local();
    let http_state = demo_http_state();

    let (base_url, server) = local
        .block_on(&runtime, async { spawn_shop_server(http_state).await })
        .expect("server should start");

    let world = Rc::new(RefCell::new(ShopWorld {
        runtime,
        local,
        base_url,
        server,
        last_status: None,
        last_body: None,
        last_cache_control: None,
        last_trace_id: None,
        session_cookie: None,
        placed_order_id: None,
    }));

    WorldFixture { world }
}
