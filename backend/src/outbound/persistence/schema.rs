//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `login_id` carries a unique index.
    users (id) {
        id -> Uuid,
        #[max_length = 64]
        login_id -> Varchar,
        #[max_length = 64]
        first_name -> Varchar,
        #[max_length = 64]
        last_name -> Varchar,
        /// Argon2id PHC string (`$argon2id$v=19$...`).
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}
