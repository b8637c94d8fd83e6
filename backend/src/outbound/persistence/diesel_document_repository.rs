//! PostgreSQL-backed `DocumentRepository` implementation using Diesel ORM.
//!
//! Rows are converted back into domain documents through the validated
//! constructors, so a row whose lock columns disagree surfaces as a query
//! error rather than a silently unlocked document.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DocumentRepository, DocumentRepositoryError};
use crate::domain::{
    Document, DocumentDraft, DocumentId, DocumentTitle, LockReason, LockState, OwnerId,
    StorageKey,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{DocumentLockUpdate, DocumentRow, NewDocumentRow};
use super::pool::{DbPool, PoolError};
use super::schema::documents;

/// Diesel-backed implementation of the document repository port.
#[derive(Clone)]
pub struct DieselDocumentRepository {
    pool: DbPool,
}

impl DieselDocumentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DocumentRepositoryError {
    map_basic_pool_error(error, DocumentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DocumentRepositoryError {
    map_basic_diesel_error(
        error,
        DocumentRepositoryError::query,
        DocumentRepositoryError::connection,
    )
}

fn to_column(value: u64, column: &str) -> Result<i64, DocumentRepositoryError> {
    i64::try_from(value)
        .map_err(|_| DocumentRepositoryError::query(format!("{column} out of range: {value}")))
}

fn from_column(value: i64, column: &str) -> Result<u64, DocumentRepositoryError> {
    u64::try_from(value)
        .map_err(|_| DocumentRepositoryError::query(format!("negative {column}: {value}")))
}

/// Convert a database row into a validated domain document.
fn row_to_document(row: DocumentRow) -> Result<Document, DocumentRepositoryError> {
    let DocumentRow {
        id,
        owner_id,
        title,
        storage_key,
        size_bytes,
        created_at,
        is_locked,
        lock_reason,
        view_count,
        is_public,
    } = row;

    let reason = LockReason::parse(&lock_reason).ok_or_else(|| {
        DocumentRepositoryError::query(format!("unknown lock reason: {lock_reason}"))
    })?;
    let lock_state = LockState::from_parts(is_locked, reason)
        .map_err(|err| DocumentRepositoryError::query(err.to_string()))?;
    let title =
        DocumentTitle::new(title).map_err(|err| DocumentRepositoryError::query(err.to_string()))?;
    let storage_key = StorageKey::new(storage_key)
        .map_err(|err| DocumentRepositoryError::query(err.to_string()))?;

    Ok(Document::new(DocumentDraft {
        id: DocumentId::from_uuid(id),
        owner_id: OwnerId::from_uuid(owner_id),
        title,
        storage_key,
        size_bytes: from_column(size_bytes, "size_bytes")?,
        created_at,
        lock_state,
        view_count: from_column(view_count, "view_count")?,
        is_public,
    }))
}

fn require_affected(affected: usize, id: DocumentId) -> Result<(), DocumentRepositoryError> {
    if affected == 0 {
        return Err(DocumentRepositoryError::missing(id.to_string()));
    }
    Ok(())
}

#[async_trait]
impl DocumentRepository for DieselDocumentRepository {
    async fn list_for_owner(
        &self,
        owner_id: &OwnerId,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DocumentRow> = documents::table
            .filter(documents::owner_id.eq(owner_id.as_uuid()))
            .order((documents::created_at.asc(), documents::id.asc()))
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_document).collect()
    }

    async fn find_by_id(
        &self,
        id: DocumentId,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = documents::table
            .filter(documents::id.eq(id.as_uuid()))
            .select(DocumentRow::as_select())
            .first::<DocumentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_document).transpose()
    }

    async fn create(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let lock_state = document.lock_state();

        let new_row = NewDocumentRow {
            id: *document.id().as_uuid(),
            owner_id: *document.owner_id().as_uuid(),
            title: document.title().as_str(),
            storage_key: document.storage_key().as_str(),
            size_bytes: to_column(document.size_bytes(), "size_bytes")?,
            created_at: document.created_at(),
            is_locked: lock_state.is_locked(),
            lock_reason: lock_state.reason().as_str(),
            view_count: to_column(document.view_count(), "view_count")?,
            is_public: document.is_public(),
        };

        diesel::insert_into(documents::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update_lock_state(
        &self,
        id: DocumentId,
        lock_state: LockState,
    ) -> Result<(), DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = DocumentLockUpdate {
            is_locked: lock_state.is_locked(),
            lock_reason: lock_state.reason().as_str(),
        };

        let affected = diesel::update(documents::table.filter(documents::id.eq(id.as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        require_affected(affected, id)
    }

    async fn update_visibility(
        &self,
        id: DocumentId,
        is_public: bool,
    ) -> Result<(), DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(documents::table.filter(documents::id.eq(id.as_uuid())))
            .set(documents::is_public.eq(is_public))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        require_affected(affected, id)
    }

    async fn increment_view_count(&self, id: DocumentId) -> Result<u64, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let views = diesel::update(documents::table.filter(documents::id.eq(id.as_uuid())))
            .set(documents::view_count.eq(documents::view_count + 1))
            .returning(documents::view_count)
            .get_result::<i64>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| DocumentRepositoryError::missing(id.to_string()))?;
        from_column(views, "view_count")
    }

    async fn delete(&self, id: DocumentId) -> Result<(), DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(documents::table.filter(documents::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
