//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every user handler, the health probes and the service
//! banner, together with the envelope schemas from
//! [`crate::inbound::http::schemas`]. The document is served by Swagger UI at
//! `/docs/` and exported by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{
    CreateUserRequest, ErrorEnvelopeSchema, UpdateUserRequest, UserEnvelopeSchema,
    UserListEnvelopeSchema,
};
use crate::inbound::http::users::UserResponse;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        description = "CRUD interface over user records with shallow-merge partial updates."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::search_by_username,
        crate::inbound::http::users::search_by_email,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::replace_user,
        crate::inbound::http::users::patch_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::root::index,
    ),
    components(schemas(
        UserResponse,
        CreateUserRequest,
        UpdateUserRequest,
        UserEnvelopeSchema,
        UserListEnvelopeSchema,
        ErrorEnvelopeSchema,
    )),
    tags(
        (name = "users", description = "Create, read, update and delete users"),
        (name = "health", description = "Endpoints for health checks"),
        (name = "meta", description = "Service banner")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.contains_key(field),
            _ => false,
        }
    }

    #[rstest]
    #[case("/users")]
    #[case("/users/{id}")]
    #[case("/users/search/username/{username}")]
    #[case("/users/search/email/{email}")]
    #[case("/health/ready")]
    #[case("/")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn user_item_path_has_every_method() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/users/{id}").expect("item path");
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.patch.is_some());
        assert!(item.delete.is_some());
    }

    #[rstest]
    #[case("UserResponse", "createdAt")]
    #[case("UserEnvelope", "data")]
    #[case("UserListEnvelope", "count")]
    #[case("ErrorEnvelope", "message")]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");
        assert!(object_has_field(schema, field), "{name} lacks {field}");
    }
}
