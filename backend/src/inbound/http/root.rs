//! Service banner, unmatched-route handler and last-resort error rendering.

use actix_web::body::EitherBody;
use actix_web::dev::ServiceResponse;
use actix_web::error::InternalError;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, get, web};
use serde_json::json;
use tracing::{error, warn};

use super::envelope::{ApiEnvelope, ErrorEnvelope};

/// Describe the service and list its endpoints.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner and endpoint listing")),
    tags = ["meta"],
    operation_id = "serviceBanner"
)]
#[get("/")]
pub async fn index() -> HttpResponse {
    let data = json!({
        "documentation": "/docs/",
        "openapi": "/api-docs/openapi.json",
        "endpoints": {
            "listUsers": "GET /users",
            "getUser": "GET /users/{id}",
            "findUserByUsername": "GET /users/search/username/{username}",
            "findUserByEmail": "GET /users/search/email/{email}",
            "createUser": "POST /users",
            "replaceUser": "PUT /users/{id}",
            "patchUser": "PATCH /users/{id}",
            "deleteUser": "DELETE /users/{id}",
        },
        "links": {
            "users": "/users",
            "health": { "ready": "/health/ready", "live": "/health/live" },
        },
    });
    HttpResponse::Ok().json(ApiEnvelope::ok(data).with_message("user service is running"))
}

/// Default service for requests that match no route.
pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorEnvelope::failure("route not found"))
}

/// JSON extractor settings: malformed bodies become a 400 envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "rejected request body");
        let body = ErrorEnvelope::failure("invalid JSON body").with_error(Some(err.to_string()));
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

fn is_json(res: &ServiceResponse<impl Sized>) -> bool {
    res.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

fn render_internal_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    if is_json(&res) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let cause = res.response().error().map(ToString::to_string);
    error!(
        status = %res.status(),
        error = cause.as_deref().unwrap_or("none"),
        "unhandled server error"
    );
    let (req, _) = res.into_parts();
    let response = HttpResponse::InternalServerError()
        .json(ErrorEnvelope::failure("internal server error").with_error(cause));
    let res: ServiceResponse<EitherBody<B>> =
        ServiceResponse::new(req, response).map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}

/// Middleware rewriting non-JSON 500 responses into the error envelope.
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, render_internal_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[actix_web::test]
    async fn banner_lists_endpoints() {
        let app = actix_test::init_service(App::new().service(index)).await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request())
            .await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "user service is running");
        assert_eq!(body["data"]["documentation"], "/docs/");
        assert_eq!(body["data"]["endpoints"]["patchUser"], "PATCH /users/{id}");
    }

    #[rstest]
    #[actix_web::test]
    async fn unmatched_routes_are_enveloped() {
        let app = actix_test::init_service(
            App::new().service(index).default_service(web::to(route_not_found)),
        )
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/nope").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, json!({ "success": false, "message": "route not found" }));
    }

    #[rstest]
    #[actix_web::test]
    async fn plain_500s_are_rewritten() {
        let app = actix_test::init_service(
            App::new().wrap(error_handlers()).route(
                "/boom",
                web::get().to(|| async { HttpResponse::InternalServerError().body("kaput") }),
            ),
        )
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/boom").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "internal server error");
    }

    #[rstest]
    #[actix_web::test]
    async fn json_500s_pass_through() {
        let app = actix_test::init_service(App::new().wrap(error_handlers()).route(
            "/boom",
            web::get().to(|| async {
                HttpResponse::InternalServerError()
                    .json(ErrorEnvelope::failure("failed to list users"))
            }),
        ))
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/boom").to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "failed to list users");
    }
}
