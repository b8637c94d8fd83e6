//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{documents, subscriptions};

/// Row struct for reading from the documents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub storage_key: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
    pub is_locked: bool,
    pub lock_reason: String,
    pub view_count: i64,
    pub is_public: bool,
}

/// Insertable struct for creating new document records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub storage_key: &'a str,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
    pub is_locked: bool,
    pub lock_reason: &'a str,
    pub view_count: i64,
    pub is_public: bool,
}

/// Changeset for the lock columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = documents)]
pub(crate) struct DocumentLockUpdate<'a> {
    pub is_locked: bool,
    pub lock_reason: &'a str,
}

/// Insertable struct for upserting subscription records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub(crate) struct NewSubscriptionRow<'a> {
    pub owner_id: Uuid,
    pub tier: &'a str,
    pub updated_at: DateTime<Utc>,
}
