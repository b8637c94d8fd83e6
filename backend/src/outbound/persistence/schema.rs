//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! Regenerate with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Uploaded flipbook documents.
    ///
    /// `is_locked` and `lock_reason` are constrained together so that
    /// `lock_reason = 'none'` holds exactly when the row is unlocked.
    documents (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning account.
        owner_id -> Uuid,
        /// Display title (max 200 characters).
        title -> Varchar,
        /// Object store key of the PDF bytes.
        storage_key -> Varchar,
        /// Payload size in bytes.
        size_bytes -> Int8,
        /// Upload timestamp; ordering key for reconciliation.
        created_at -> Timestamptz,
        /// Whether the document is locked.
        is_locked -> Bool,
        /// One of `none`, `user_locked`, `size_limit`, `plan_limit`.
        lock_reason -> Varchar,
        /// Public views served so far.
        view_count -> Int8,
        /// Whether the public link is enabled.
        is_public -> Bool,
    }
}

diesel::table! {
    /// Current plan tier per owner. Owners without a row are on `free`.
    subscriptions (owner_id) {
        /// Primary key: owning account.
        owner_id -> Uuid,
        /// Tier identifier, e.g. `starter`.
        tier -> Varchar,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
