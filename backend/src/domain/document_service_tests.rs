//! Tests for the document service.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use mockall::Sequence;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    DocumentRepositoryError, MockDocumentRepository, MockObjectStore, MockSubscriptionSource,
    ObjectStoreError,
};
use crate::domain::{LockReason, PlanTierId, QuotaRejection};

const MIB: u64 = 1024 * 1024;

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_timestamp()
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut bytes = PDF_MAGIC.to_vec();
    bytes.resize(len.max(PDF_MAGIC.len()), b' ');
    bytes
}

fn stored_document(
    owner_id: &OwnerId,
    minutes: i64,
    size_bytes: u64,
    lock_state: LockState,
) -> Document {
    let id = DocumentId::random();
    Document::new(DocumentDraft {
        id,
        owner_id: owner_id.clone(),
        title: DocumentTitle::new("Catalogue").expect("valid title"),
        storage_key: StorageKey::for_upload(owner_id, id),
        size_bytes,
        created_at: fixture_timestamp() - Duration::days(1) + Duration::minutes(minutes),
        lock_state,
        view_count: 0,
        is_public: false,
    })
}

fn subscriptions_on(tier: PlanTierId) -> MockSubscriptionSource {
    let mut subscriptions = MockSubscriptionSource::new();
    subscriptions
        .expect_current_tier()
        .returning(move |_| Ok(tier));
    subscriptions
}

fn objects_with_urls() -> MockObjectStore {
    let mut objects = MockObjectStore::new();
    objects
        .expect_public_url()
        .returning(|key| format!("https://cdn.test/{key}"));
    objects
}

fn repo_listing(documents: Vec<Document>) -> MockDocumentRepository {
    let mut repo = MockDocumentRepository::new();
    repo.expect_list_for_owner()
        .returning(move |_| Ok(documents.clone()));
    repo
}

fn service(
    repo: MockDocumentRepository,
    objects: MockObjectStore,
    subscriptions: MockSubscriptionSource,
) -> DocumentService<MockDocumentRepository, MockObjectStore, MockSubscriptionSource> {
    DocumentService::new(
        Arc::new(repo),
        Arc::new(objects),
        Arc::new(subscriptions),
        Arc::new(FixtureClock),
    )
}

fn upload_request(owner_id: &OwnerId, len: usize) -> UploadDocumentRequest {
    UploadDocumentRequest {
        owner_id: owner_id.clone(),
        title: "Spring catalogue".to_owned(),
        bytes: pdf_bytes(len),
    }
}

#[tokio::test]
async fn upload_stores_bytes_then_records_unlocked_document() {
    let owner_id = OwnerId::random();
    let mut repo = repo_listing(Vec::new());
    let mut objects = objects_with_urls();
    let mut sequence = Sequence::new();
    objects
        .expect_put()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| Ok(()));
    repo.expect_create()
        .times(1)
        .in_sequence(&mut sequence)
        .withf(|document| {
            document.lock_state() == LockState::Unlocked
                && document.created_at() == fixture_timestamp()
                && !document.is_public()
        })
        .returning(|_| Ok(()));

    let view = service(repo, objects, subscriptions_on(PlanTierId::Free))
        .upload_document(upload_request(&owner_id, 1024))
        .await
        .expect("upload admitted");

    assert_eq!(view.title, "Spring catalogue");
    assert_eq!(view.size_bytes, 1024);
    assert!(!view.is_locked);
    assert_eq!(view.lock_reason, LockReason::None);
    assert!(
        view.public_url
            .starts_with(&format!("https://cdn.test/{owner_id}/"))
    );
}

#[rstest]
#[case(PlanTierId::Free, 1, 1024, QuotaRejection::CountExceeded)]
#[case(PlanTierId::Free, 0, 3 * 1024 * 1024, QuotaRejection::SizeExceeded)]
#[case(PlanTierId::Starter, 5, 60 * 1024 * 1024, QuotaRejection::CountExceeded)]
#[tokio::test]
async fn quota_rejections_never_touch_storage(
    #[case] tier: PlanTierId,
    #[case] active: i64,
    #[case] size: usize,
    #[case] expected: QuotaRejection,
) {
    let owner_id = OwnerId::random();
    let existing = (0..active)
        .map(|minutes| stored_document(&owner_id, minutes, MIB, LockState::Unlocked))
        .collect();
    let mut repo = repo_listing(existing);
    repo.expect_create().times(0);
    let mut objects = MockObjectStore::new();
    objects.expect_put().times(0);

    let err = service(repo, objects, subscriptions_on(tier))
        .upload_document(upload_request(&owner_id, size))
        .await
        .expect_err("quota rejects");

    assert_eq!(err, DocumentPolicyError::QuotaExceeded { reason: expected });
}

#[tokio::test]
async fn locked_documents_do_not_consume_slots() {
    let owner_id = OwnerId::random();
    let mut repo = repo_listing(vec![
        stored_document(&owner_id, 0, MIB, LockState::LockedManual),
        stored_document(&owner_id, 1, MIB, LockState::LockedPlanLimit),
        stored_document(&owner_id, 2, 3 * MIB, LockState::LockedSizeLimit),
    ]);
    repo.expect_create().times(1).returning(|_| Ok(()));
    let mut objects = objects_with_urls();
    objects.expect_put().times(1).returning(|_, _| Ok(()));

    service(repo, objects, subscriptions_on(PlanTierId::Free))
        .upload_document(upload_request(&owner_id, 1024))
        .await
        .expect("upload admitted");
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn record_failure_releases_the_stored_object(#[case] release_succeeds: bool) {
    let owner_id = OwnerId::random();
    let stored_key: Arc<Mutex<Option<StorageKey>>> = Arc::default();
    let put_key = Arc::clone(&stored_key);
    let deleted_key = Arc::clone(&stored_key);

    let mut repo = repo_listing(Vec::new());
    repo.expect_create()
        .times(1)
        .returning(|_| Err(DocumentRepositoryError::query("insert failed")));
    let mut objects = MockObjectStore::new();
    objects.expect_put().times(1).returning(move |key, _| {
        *put_key.lock().expect("key lock") = Some(key.clone());
        Ok(())
    });
    objects
        .expect_delete()
        .times(1)
        .withf(move |key| deleted_key.lock().expect("key lock").as_ref() == Some(key))
        .returning(move |key| {
            if release_succeeds {
                Ok(())
            } else {
                Err(ObjectStoreError::write(key.as_str(), "permission denied"))
            }
        });

    let err = service(repo, objects, subscriptions_on(PlanTierId::Starter))
        .upload_document(upload_request(&owner_id, 1024))
        .await
        .expect_err("record write fails");

    assert_eq!(
        err,
        DocumentPolicyError::RecordWriteFailed {
            storage_released: release_succeeds
        }
    );
}

#[tokio::test]
async fn storage_failure_skips_record_creation() {
    let owner_id = OwnerId::random();
    let mut repo = repo_listing(Vec::new());
    repo.expect_create().times(0);
    let mut objects = MockObjectStore::new();
    objects
        .expect_put()
        .times(1)
        .returning(|key, _| Err(ObjectStoreError::write(key.as_str(), "disk full")));

    let err = service(repo, objects, subscriptions_on(PlanTierId::Free))
        .upload_document(upload_request(&owner_id, 1024))
        .await
        .expect_err("storage fails");

    assert!(matches!(err, DocumentPolicyError::StorageWriteFailed { .. }));
}

#[rstest]
#[case("Brochure", Vec::new(), "payload is empty")]
#[case("Brochure", b"PK\x03\x04 zip".to_vec(), "payload is not a PDF")]
#[case("   ", b"%PDF-1.7".to_vec(), "document title must not be empty")]
#[tokio::test]
async fn invalid_candidates_are_rejected_before_any_io(
    #[case] title: &str,
    #[case] bytes: Vec<u8>,
    #[case] message: &str,
) {
    let request = UploadDocumentRequest {
        owner_id: OwnerId::random(),
        title: title.to_owned(),
        bytes,
    };

    let err = service(
        MockDocumentRepository::new(),
        MockObjectStore::new(),
        MockSubscriptionSource::new(),
    )
    .upload_document(request)
    .await
    .expect_err("invalid upload");

    assert_eq!(err, DocumentPolicyError::invalid_upload(message));
}

#[rstest]
#[case(LockState::LockedSizeLimit, LockReason::SizeLimit)]
#[case(LockState::LockedPlanLimit, LockReason::PlanLimit)]
#[tokio::test]
async fn unlocking_policy_locks_is_illegal(#[case] state: LockState, #[case] reason: LockReason) {
    let owner_id = OwnerId::random();
    let document = stored_document(&owner_id, 0, MIB, state);
    let id = document.id();
    let mut repo = MockDocumentRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(document.clone())));
    repo.expect_update_lock_state().times(0);

    let err = service(repo, objects_with_urls(), subscriptions_on(PlanTierId::Pro))
        .unlock_document(&owner_id, id)
        .await
        .expect_err("illegal unlock");

    assert_eq!(err, DocumentPolicyError::IllegalUnlock { reason });
}

#[tokio::test]
async fn manual_unlock_hands_the_slot_back_to_the_oldest_document() {
    let owner_id = OwnerId::random();
    let manual = stored_document(&owner_id, 0, MIB, LockState::LockedManual);
    let newer = stored_document(&owner_id, 1, MIB, LockState::Unlocked);
    let id = manual.id();
    let newer_id = newer.id();
    let after_unlock = vec![manual.clone().with_lock_state(LockState::Unlocked), newer];

    let mut repo = MockDocumentRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(manual.clone())));
    let mut sequence = Sequence::new();
    repo.expect_update_lock_state()
        .times(1)
        .in_sequence(&mut sequence)
        .withf(move |target, state| *target == id && *state == LockState::Unlocked)
        .returning(|_, _| Ok(()));
    repo.expect_list_for_owner()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(move |_| Ok(after_unlock.clone()));
    repo.expect_update_lock_state()
        .times(1)
        .in_sequence(&mut sequence)
        .withf(move |target, state| *target == newer_id && *state == LockState::LockedPlanLimit)
        .returning(|_, _| Ok(()));

    let response = service(repo, objects_with_urls(), subscriptions_on(PlanTierId::Free))
        .unlock_document(&owner_id, id)
        .await
        .expect("manual unlock is never refused by quota");

    assert!(!response.document.is_locked);
    let transitions = response.reconciliation.transitions();
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].document_id, newer_id);
    assert_eq!(transitions[0].to, LockState::LockedPlanLimit);
}

#[tokio::test]
async fn manual_unlock_of_an_oversize_document_settles_on_a_size_lock() {
    let owner_id = OwnerId::random();
    let manual = stored_document(&owner_id, 0, 3 * MIB, LockState::LockedManual);
    let id = manual.id();
    let after_unlock = vec![manual.clone().with_lock_state(LockState::Unlocked)];

    let mut repo = MockDocumentRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(manual.clone())));
    let mut sequence = Sequence::new();
    repo.expect_update_lock_state()
        .times(1)
        .in_sequence(&mut sequence)
        .withf(move |target, state| *target == id && *state == LockState::Unlocked)
        .returning(|_, _| Ok(()));
    repo.expect_list_for_owner()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(move |_| Ok(after_unlock.clone()));
    repo.expect_update_lock_state()
        .times(1)
        .in_sequence(&mut sequence)
        .withf(move |target, state| *target == id && *state == LockState::LockedSizeLimit)
        .returning(|_, _| Ok(()));

    let response = service(repo, objects_with_urls(), subscriptions_on(PlanTierId::Free))
        .unlock_document(&owner_id, id)
        .await
        .expect("unlock succeeds");

    assert!(response.document.is_locked);
    assert_eq!(response.document.lock_reason, LockReason::SizeLimit);
}

#[tokio::test]
async fn manual_unlock_with_room_persists_and_reconciles() {
    let owner_id = OwnerId::random();
    let manual = stored_document(&owner_id, 0, MIB, LockState::LockedManual);
    let id = manual.id();
    let mut repo = MockDocumentRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(manual.clone())));
    let mut sequence = Sequence::new();
    repo.expect_update_lock_state()
        .times(1)
        .in_sequence(&mut sequence)
        .withf(move |target, state| *target == id && *state == LockState::Unlocked)
        .returning(|_, _| Ok(()));
    let unlocked = stored_document(&owner_id, 0, MIB, LockState::Unlocked);
    repo.expect_list_for_owner()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(move |_| Ok(vec![unlocked.clone()]));

    let response = service(repo, objects_with_urls(), subscriptions_on(PlanTierId::Free))
        .unlock_document(&owner_id, id)
        .await
        .expect("unlock succeeds");

    assert!(!response.document.is_locked);
    assert!(response.reconciliation.is_empty());
}

#[tokio::test]
async fn manual_lock_frees_a_slot_for_plan_locked_documents() {
    let owner_id = OwnerId::random();
    let active = stored_document(&owner_id, 0, MIB, LockState::Unlocked);
    let waiting = stored_document(&owner_id, 1, MIB, LockState::LockedPlanLimit);
    let active_id = active.id();
    let waiting_id = waiting.id();
    let after_lock = vec![
        active.clone().with_lock_state(LockState::LockedManual),
        waiting,
    ];

    let mut repo = MockDocumentRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(active.clone())));
    repo.expect_list_for_owner()
        .returning(move |_| Ok(after_lock.clone()));
    repo.expect_update_lock_state()
        .times(1)
        .withf(move |target, state| *target == active_id && *state == LockState::LockedManual)
        .returning(|_, _| Ok(()));
    repo.expect_update_lock_state()
        .times(1)
        .withf(move |target, state| *target == waiting_id && *state == LockState::Unlocked)
        .returning(|_, _| Ok(()));

    let response = service(repo, objects_with_urls(), subscriptions_on(PlanTierId::Free))
        .lock_document(&owner_id, active_id)
        .await
        .expect("lock succeeds");

    assert_eq!(response.document.lock_reason, LockReason::UserLocked);
    assert_eq!(response.reconciliation.len(), 1);
}

#[tokio::test]
async fn other_owners_documents_are_not_found() {
    let stranger = OwnerId::random();
    let document = stored_document(&OwnerId::random(), 0, MIB, LockState::Unlocked);
    let id = document.id();
    let mut repo = MockDocumentRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(document.clone())));
    repo.expect_update_lock_state().times(0);

    let err = service(repo, objects_with_urls(), subscriptions_on(PlanTierId::Pro))
        .lock_document(&stranger, id)
        .await
        .expect_err("not visible");

    assert_eq!(err, DocumentPolicyError::NotFound);
}

#[tokio::test]
async fn delete_releases_storage_before_the_record_then_reconciles() {
    let owner_id = OwnerId::random();
    let document = stored_document(&owner_id, 0, MIB, LockState::Unlocked);
    let id = document.id();
    let key = document.storage_key().clone();
    let mut sequence = Sequence::new();
    let mut repo = MockDocumentRepository::new();
    let mut objects = MockObjectStore::new();
    repo.expect_find_by_id()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(move |_| Ok(Some(document.clone())));
    objects
        .expect_delete()
        .times(1)
        .in_sequence(&mut sequence)
        .withf(move |target| *target == key)
        .returning(|_| Ok(()));
    repo.expect_delete()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(()));
    repo.expect_list_for_owner()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(Vec::new()));

    let outcome = service(repo, objects, subscriptions_on(PlanTierId::Free))
        .delete_document(&owner_id, id)
        .await
        .expect("delete succeeds");

    assert!(outcome.is_empty());
}

#[tokio::test]
async fn visibility_is_written_only_when_it_changes() {
    let owner_id = OwnerId::random();
    let document = stored_document(&owner_id, 0, MIB, LockState::Unlocked).with_visibility(true);
    let id = document.id();
    let mut repo = MockDocumentRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(document.clone())));
    repo.expect_update_visibility().times(0);

    let response = service(repo, objects_with_urls(), subscriptions_on(PlanTierId::Free))
        .set_visibility(&owner_id, id, true)
        .await
        .expect("no-op succeeds");

    assert!(response.document.is_public);
}

#[tokio::test]
async fn list_returns_oldest_first() {
    let owner_id = OwnerId::random();
    let newest = stored_document(&owner_id, 30, MIB, LockState::Unlocked);
    let oldest = stored_document(&owner_id, 0, MIB, LockState::LockedPlanLimit);
    let expected = vec![oldest.id(), newest.id()];
    let repo = repo_listing(vec![newest, oldest]);

    let listed = service(repo, objects_with_urls(), subscriptions_on(PlanTierId::Free))
        .list_documents(&owner_id)
        .await
        .expect("list succeeds");

    assert_eq!(
        listed.iter().map(|view| view.id).collect::<Vec<_>>(),
        expected
    );
}

#[rstest]
#[case(false, LockState::Unlocked)]
#[case(true, LockState::LockedPlanLimit)]
#[case(true, LockState::LockedManual)]
#[tokio::test]
async fn private_or_locked_documents_are_hidden_from_viewers(
    #[case] is_public: bool,
    #[case] state: LockState,
) {
    let document =
        stored_document(&OwnerId::random(), 0, MIB, state).with_visibility(is_public);
    let id = document.id();
    let mut repo = MockDocumentRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(document.clone())));
    repo.expect_increment_view_count().times(0);

    let err = service(repo, objects_with_urls(), MockSubscriptionSource::new())
        .open_public_document(id)
        .await
        .expect_err("hidden");

    assert_eq!(err, DocumentPolicyError::NotFound);
}

#[tokio::test]
async fn opening_a_shared_document_counts_the_view() {
    let document = stored_document(&OwnerId::random(), 0, MIB, LockState::Unlocked)
        .with_visibility(true)
        .with_view_count(6);
    let id = document.id();
    let mut repo = MockDocumentRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(document.clone())));
    repo.expect_increment_view_count()
        .times(1)
        .returning(|_| Ok(7));

    let view = service(repo, objects_with_urls(), MockSubscriptionSource::new())
        .open_public_document(id)
        .await
        .expect("public document opens");

    assert_eq!(view.view_count, 7);
    assert!(view.public_url.starts_with("https://cdn.test/"));
}

#[tokio::test]
async fn repository_outage_maps_to_unavailable() {
    let mut repo = MockDocumentRepository::new();
    repo.expect_list_for_owner()
        .returning(|_| Err(DocumentRepositoryError::connection("pool exhausted")));

    let err = service(repo, objects_with_urls(), subscriptions_on(PlanTierId::Free))
        .list_documents(&OwnerId::random())
        .await
        .expect_err("outage");

    assert!(matches!(err, DocumentPolicyError::Unavailable { .. }));
}
