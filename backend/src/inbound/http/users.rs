//! User CRUD handlers.
//!
//! ```text
//! GET    /users
//! GET    /users/search/username/{username}
//! GET    /users/search/email/{email}
//! GET    /users/{id}
//! POST   /users          {"username":"ada","email":"ada@example.com","data":{}}
//! PUT    /users/{id}     {"data":{"role":"admin"}}
//! PATCH  /users/{id}     {"data":{"theme":"dark"}}
//! DELETE /users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiEnvelope;
use crate::inbound::http::error::OperationContext;
use crate::inbound::http::schemas::{
    CreateUserRequest, ErrorEnvelopeSchema, UpdateUserRequest, UserEnvelopeSchema,
    UserListEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_new_user, parse_patch, parse_replacement, parse_user_id,
};

const USER_CREATED: &str = "user created";
const USER_UPDATED: &str = "user updated";
const USER_DELETED: &str = "user deleted";

/// Wire representation of a stored user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(value_type = String, format = Uuid, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Free-form attributes.
    #[schema(value_type = Object)]
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            data: user.data().as_value().clone(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

fn user_envelope(user: User) -> ApiEnvelope<UserResponse> {
    ApiEnvelope::ok(UserResponse::from(user))
}

/// List every user in creation order.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = UserListEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state
        .users_query
        .list_users()
        .await
        .during("failed to list users")?;
    let data: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    let count = data.len();
    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(data).with_count(count)))
}

/// Find a user by exact, case-sensitive username.
#[utoipa::path(
    get,
    path = "/users/search/username/{username}",
    params(("username" = String, Path, description = "Username to match")),
    responses(
        (status = 200, description = "Matching user", body = UserEnvelopeSchema),
        (status = 404, description = "No user has this username", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "findUserByUsername"
)]
#[get("/users/search/username/{username}")]
pub async fn search_by_username(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = state
        .users_query
        .find_by_username(&path.into_inner())
        .await
        .during("failed to search users by username")?;
    Ok(HttpResponse::Ok().json(user_envelope(user)))
}

/// Find a user by email; the probe is trimmed and lower-cased first.
#[utoipa::path(
    get,
    path = "/users/search/email/{email}",
    params(("email" = String, Path, description = "Email to match")),
    responses(
        (status = 200, description = "Matching user", body = UserEnvelopeSchema),
        (status = 404, description = "No user has this email", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "findUserByEmail"
)]
#[get("/users/search/email/{email}")]
pub async fn search_by_email(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = state
        .users_query
        .find_by_email(&path.into_inner())
        .await
        .during("failed to search users by email")?;
    Ok(HttpResponse::Ok().json(user_envelope(user)))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "The user", body = UserEnvelopeSchema),
        (status = 404, description = "User not found", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let user = state
        .users_query
        .get_user(&id)
        .await
        .during("failed to fetch user")?;
    Ok(HttpResponse::Ok().json(user_envelope(user)))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelopeSchema),
        (status = 400, description = "Missing field or duplicate username/email", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let new_user = parse_new_user(payload.into_inner())?;
    let user = state
        .users
        .create_user(new_user)
        .await
        .during("failed to create user")?;
    Ok(HttpResponse::Created().json(user_envelope(user).with_message(USER_CREATED)))
}

/// Replace the fields present in the body; `data` is swapped wholesale.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelopeSchema),
        (status = 400, description = "Invalid field or duplicate username/email", body = ErrorEnvelopeSchema),
        (status = 404, description = "User not found", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "replaceUser"
)]
#[put("/users/{id}")]
pub async fn replace_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let changes = parse_replacement(payload.into_inner())?;
    let user = state
        .users
        .replace_user(&id, changes)
        .await
        .during("failed to update user")?;
    Ok(HttpResponse::Ok().json(user_envelope(user).with_message(USER_UPDATED)))
}

/// Partially update a user, shallow-merging an object `data`.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelopeSchema),
        (status = 400, description = "No fields, invalid field or duplicate username/email", body = ErrorEnvelopeSchema),
        (status = 404, description = "User not found", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "patchUser"
)]
#[patch("/users/{id}")]
pub async fn patch_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let changes = parse_patch(payload.into_inner())?;
    let user = state
        .users
        .patch_user(&id, changes)
        .await
        .during("failed to update user")?;
    Ok(HttpResponse::Ok().json(user_envelope(user).with_message(USER_UPDATED)))
}

/// Delete a user and return the removed record.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "User deleted", body = UserEnvelopeSchema),
        (status = 404, description = "User not found", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let user = state
        .users
        .delete_user(&id)
        .await
        .during("failed to delete user")?;
    Ok(HttpResponse::Ok().json(user_envelope(user).with_message(USER_DELETED)))
}

/// Register the user routes. Search routes come before `/users/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(search_by_username)
        .service(search_by_email)
        .service(get_user)
        .service(create_user)
        .service(replace_user)
        .service(patch_user)
        .service(delete_user);
}
