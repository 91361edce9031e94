//! Diesel table definitions.
//!
//! Keep in step with `backend/migrations`.

diesel::table! {
    /// User records.
    ///
    /// `username` and `email` carry the unique constraints
    /// `users_username_key` and `users_email_key`.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        /// Schemaless attribute bag.
        data -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
