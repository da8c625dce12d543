//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate with `diesel print-schema` or
//! update by hand.

diesel::table! {
    /// Owners of stock items. Managed outside this service.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Household stock items.
    ///
    /// `category` and `unit` hold the canonical names and are guarded by
    /// `CHECK` constraints; `quantity` must be finite and non-negative.
    stock_items (id) {
        /// Primary key, defaulted by `gen_random_uuid()`.
        id -> Uuid,
        name -> Text,
        category -> Varchar,
        quantity -> Float8,
        unit -> Varchar,
        expiration_date -> Nullable<Timestamptz>,
        /// Defaulted by `now()` on insert.
        added_date -> Timestamptz,
        notes -> Nullable<Text>,
        /// Foreign key to `users.id`.
        user_id -> Uuid,
        /// Hosted image URL.
        image -> Nullable<Text>,
    }
}

diesel::joinable!(stock_items -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(stock_items, users);
