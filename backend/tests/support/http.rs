//! Shared HTTP helpers for storefront integration tests.
//!
//! These helpers centralise common request patterns so the test bodies and
//! BDD steps stay concise and consistent.

use actix_web::http::{Method, header};
use awc::Client;
use backend::domain::TRACE_ID_HEADER;
use serde_json::Value;

use crate::harness::{SharedWorld, with_world_async};

pub(crate) struct JsonRequest<'a> {
    pub(crate) include_cookie: bool,
    pub(crate) method: Method,
    pub(crate) path: &'a str,
    pub(crate) payload: Option<Value>,
}

struct CapturedResponse {
    status: u16,
    cache_control: Option<String>,
    trace_id: Option<String>,
    session_cookie: Option<String>,
    body: Option<Value>,
}

fn record_response(world: &SharedWorld, captured: CapturedResponse) {
    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(captured.status);
    ctx.last_cache_control = captured.cache_control;
    ctx.last_trace_id = captured.trace_id;
    ctx.last_body = captured.body;
    // Cart updates and logout rotate the cookie-backed session, so any
    // Set-Cookie on a response replaces the stored pair.
    if captured.session_cookie.is_some() {
        ctx.session_cookie = captured.session_cookie;
    }
}

pub(crate) fn session_cookie(world: &SharedWorld) -> String {
    world
        .borrow()
        .session_cookie
        .clone()
        .expect("session cookie")
        .split(';')
        .next()
        .expect("cookie pair")
        .to_owned()
}

pub(crate) fn login_as(world: &SharedWorld, username: &str, password: &str) {
    let payload = serde_json::json!({ "username": username, "password": password });
    let (status, cookie_header) = with_world_async(world, |base_url| async move {
        let response = Client::default()
            .post(format!("{base_url}/api/v1/login"))
            .send_json(&payload)
            .await
            .expect("login request");

        let status = response.status().as_u16();
        let cookie_header = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_owned());
        (status, cookie_header)
    });

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(status);
    ctx.session_cookie = cookie_header;
    ctx.last_cache_control = None;
    ctx.last_trace_id = None;
    ctx.last_body = None;
}

pub(crate) fn perform_json_request(world: &SharedWorld, spec: JsonRequest<'_>) {
    let cookie = spec.include_cookie.then(|| session_cookie(world));
    let captured = with_world_async(world, |base_url| async move {
        let mut request =
            Client::default().request(spec.method, format!("{base_url}{}", spec.path));
        if let Some(cookie) = cookie {
            request = request.insert_header((header::COOKIE, cookie));
        }
        let mut response = match spec.payload {
            Some(payload) => request.send_json(&payload).await.expect("json request"),
            None => request.send().await.expect("request"),
        };
        let status = response.status().as_u16();
        let cache_control = response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_owned());
        let session_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_owned());
        let body = response.body().await.expect("body");
        // Logout and order processing reply with empty 204 bodies.
        let json =
            (!body.is_empty()).then(|| serde_json::from_slice(&body).expect("json body"));
        CapturedResponse {
            status,
            cache_control,
            trace_id,
            session_cookie,
            body: json,
        }
    });

    record_response(world, captured);
}

/// Perform a GET request, presenting the stored session cookie when one exists.
pub(crate) fn get_json(world: &SharedWorld, path: &str) {
    let include_cookie = world.borrow().session_cookie.is_some();
    perform_json_request(
        world,
        JsonRequest {
            include_cookie,
            method: Method::GET,
            path,
            payload: None,
        },
    );
}

/// Perform a POST request, presenting the stored session cookie when one exists.
pub(crate) fn post_json(world: &SharedWorld, path: &str, payload: Option<Value>) {
    let include_cookie = world.borrow().session_cookie.is_some();
    perform_json_request(
        world,
        JsonRequest {
            include_cookie,
            method: Method::POST,
            path,
            payload,
        },
    );
}
