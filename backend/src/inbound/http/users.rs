//! Authentication endpoints.
//!
//! ```text
//! POST /api/v1/login {"username":"user1","password":"pass123"}
//! POST /api/v1/logout
//! ```

use crate::domain::{Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Login request body for `POST /api/v1/login`.
///
/// Example JSON:
/// `{"username":"user1","password":"pass123"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Authenticate a user and establish a session.
///
/// Unknown usernames and wrong passwords produce the same `401` so the
/// endpoint leaks nothing about which accounts exist.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_login(&user)?;
    Ok(HttpResponse::Ok().finish())
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// End the current session, discarding the login and cart.
///
/// Idempotent: logging out without a session still succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session ended"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "logout",
    security(("SessionCookie" = []))
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixtureInventoryRepository, FixtureLoginService, FixtureProductRepository,
        MockOrderService,
    };
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    #[derive(Debug)]
    struct ValidationExpectation<'a> {
        message: &'a str,
        field: &'a str,
        code: &'a str,
        top_code: &'a str,
    }

    fn test_state() -> HttpState {
        HttpState::new(
            Arc::new(FixtureLoginService),
            Arc::new(FixtureProductRepository::with_catalogue(vec![], vec![])),
            Arc::new(FixtureInventoryRepository::with_stock(Vec::new())),
            Arc::new(MockOrderService::new()),
        )
    }

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(test_state()))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(web::scope("/api/v1").service(login).service(logout))
            .route(
                "/whoami",
                web::get().to(|session: SessionContext| async move {
                    let user = session.require_login()?;
                    Ok::<_, Error>(
                        HttpResponse::Ok().body(format!("{}:{}", user.user_id, user.account_id)),
                    )
                }),
            )
    }

    async fn assert_login_validation_error(
        username: &str,
        password: &str,
        expected: ValidationExpectation<'_>,
    ) {
        let app = actix_test::init_service(test_app()).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: username.into(),
                password: password.into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some(expected.message)
        );
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some(expected.top_code)
        );
        let details = value
            .get("details")
            .and_then(|v| v.as_object())
            .expect("details present");
        assert_eq!(
            details.get("field").and_then(Value::as_str),
            Some(expected.field)
        );
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some(expected.code)
        );
    }

    #[rstest]
    #[case(
        "   ",
        "pass123",
        ValidationExpectation {
            message: "username must not be empty",
            field: "username",
            code: "empty_username",
            top_code: "invalid_request",
        }
    )]
    #[case(
        "user1",
        "",
        ValidationExpectation {
            message: "password must not be empty",
            field: "password",
            code: "empty_password",
            top_code: "invalid_request",
        }
    )]
    #[actix_web::test]
    async fn login_rejects_invalid_payloads(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: ValidationExpectation<'_>,
    ) {
        assert_login_validation_error(username, password, expected).await;
    }

    #[actix_web::test]
    async fn login_rejects_wrong_credentials_with_unauthorised_status() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: "user1".into(),
                password: "wrong-password".into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("invalid credentials")
        );
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("unauthorized")
        );
    }

    #[actix_web::test]
    async fn login_persists_identity_in_session() {
        let app = actix_test::init_service(test_app()).await;

        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(&LoginRequest {
                    username: "admin".into(),
                    password: "admin123".into(),
                })
                .to_request(),
        )
        .await;
        assert!(login_res.status().is_success());
        let cookie = login_res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned();

        let whoami_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert!(whoami_res.status().is_success());
        let body = actix_test::read_body(whoami_res).await;
        assert_eq!(body, "2:2");
    }

    #[actix_web::test]
    async fn logout_drops_the_session_cookie() {
        let app = actix_test::init_service(test_app()).await;

        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(&LoginRequest {
                    username: "user1".into(),
                    password: "pass123".into(),
                })
                .to_request(),
        )
        .await;
        let cookie = login_res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned();

        let logout_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(logout_res.status(), actix_web::http::StatusCode::NO_CONTENT);
        let cleared = logout_res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("removal cookie")
            .into_owned();
        assert!(cleared.value().is_empty());

        let whoami_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .cookie(cleared)
                .to_request(),
        )
        .await;
        assert_eq!(whoami_res.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
