mod common;

use common::{sample_contract, setup, with_relations};
use contractx_core::errors::ExErrorKind;
use contractx_core::model::ContractStatus;
use contractx_core::ports::{ContractIncludes, ContractRepository};

#[tokio::test]
async fn test_create_assigns_id_and_reads_back() {
    let (repo, _conn) = setup();
    let created = repo.create(sample_contract("C-001", 1)).await.unwrap();
    assert!(created.id > 0);

    let loaded = repo
        .get_by_number_and_version("C-001", 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.id, created.id);
    assert_eq!(loaded.title, created.title);
    assert_eq!(loaded.funding_type, created.funding_type);
    assert_eq!(loaded.last_updated_at, created.last_updated_at);
    assert!(loaded.contract_content.is_none());
}

#[tokio::test]
async fn test_includes_load_only_requested_relations() {
    let (repo, _conn) = setup();
    repo.create(with_relations(sample_contract("C-002", 1)))
        .await
        .unwrap();

    let data_only = repo
        .get_by_number_and_version_with_includes("C-002", 1, ContractIncludes::DATA)
        .await
        .unwrap()
        .unwrap();
    assert!(data_only.contract_data.is_some());
    assert!(data_only.contract_content.is_none());
    assert!(data_only.funding_stream_period_codes.is_empty());

    let everything = repo.get_by_id(data_only.id).await.unwrap().unwrap();
    let content = everything.contract_content.unwrap();
    assert_eq!(content.content, b"%PDF-1.7 body".to_vec());
    assert_eq!(content.size, 13);
    assert_eq!(everything.funding_stream_period_codes.len(), 2);
}

#[tokio::test]
async fn test_duplicate_number_and_version_rejected() {
    let (repo, _conn) = setup();
    repo.create(sample_contract("C-003", 1)).await.unwrap();

    let err = repo.create(sample_contract("C-003", 1)).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DuplicateVersion);
    assert_eq!(err.contract_number(), Some("C-003"));
}

#[tokio::test]
async fn test_get_by_number_orders_versions() {
    let (repo, _conn) = setup();
    for version in [3, 1, 2] {
        repo.create(sample_contract("C-004", version)).await.unwrap();
    }
    repo.create(sample_contract("C-999", 1)).await.unwrap();

    let versions: Vec<i32> = repo
        .get_by_number("C-004")
        .await
        .unwrap()
        .iter()
        .map(|c| c.contract_version)
        .collect();
    assert_eq!(versions, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_update_moves_concurrency_token_forward() {
    let (repo, _conn) = setup();
    let created = repo.create(sample_contract("C-005", 1)).await.unwrap();
    let before = created.last_updated_at;

    let mut changed = created.clone();
    changed.status = ContractStatus::Approved;
    changed.was_manually_approved = true;
    let updated = repo.update(changed).await.unwrap();

    assert!(updated.last_updated_at > before);
    let loaded = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, ContractStatus::Approved);
    assert!(loaded.was_manually_approved);
    assert_eq!(loaded.last_updated_at, updated.last_updated_at);
}

#[tokio::test]
async fn test_stale_update_is_concurrency_conflict() {
    let (repo, _conn) = setup();
    let created = repo.create(sample_contract("C-006", 1)).await.unwrap();

    let first = created.clone();
    let mut stale = created.clone();
    repo.update(first).await.unwrap();

    stale.title = "lost update".to_string();
    let err = repo.update(stale).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Concurrency);
    assert_eq!(err.contract_id(), Some(created.id));

    let loaded = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_ne!(loaded.title, "lost update");
}

#[tokio::test]
async fn test_update_without_relations_keeps_stored_relations() {
    let (repo, _conn) = setup();
    repo.create(with_relations(sample_contract("C-007", 1)))
        .await
        .unwrap();

    let bare = repo
        .get_by_number_and_version("C-007", 1)
        .await
        .unwrap()
        .unwrap();
    repo.update(bare.clone()).await.unwrap();

    let full = repo.get_by_id(bare.id).await.unwrap().unwrap();
    assert!(full.contract_content.is_some());
    assert!(full.contract_data.is_some());
    assert_eq!(full.funding_stream_period_codes.len(), 2);
}

#[tokio::test]
async fn test_update_status_compare_and_set() {
    let (repo, _conn) = setup();
    let created = repo.create(sample_contract("C-008", 1)).await.unwrap();

    let transition = repo
        .update_status(
            created.id,
            ContractStatus::PublishedToProvider,
            ContractStatus::Replaced,
        )
        .await
        .unwrap();
    assert_eq!(transition.previous_status, ContractStatus::PublishedToProvider);
    assert_eq!(transition.new_status, ContractStatus::Replaced);
    assert_eq!(transition.contract_number, "C-008");

    let err = repo
        .update_status(
            created.id,
            ContractStatus::PublishedToProvider,
            ContractStatus::Replaced,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Concurrency);
}

#[tokio::test]
async fn test_update_status_unknown_id_is_not_found() {
    let (repo, _conn) = setup();
    let err = repo
        .update_status(404, ContractStatus::PublishedToProvider, ContractStatus::Replaced)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[tokio::test]
async fn test_reminder_stamp_persists() {
    let (repo, _conn) = setup();
    let created = repo.create(sample_contract("C-009", 1)).await.unwrap();
    let sent_at = chrono::Utc::now();

    let updated = repo
        .update_last_email_reminder_sent(created.id, sent_at)
        .await
        .unwrap();
    assert_eq!(
        updated.last_email_reminder_sent.map(|t| t.timestamp_millis()),
        Some(sent_at.timestamp_millis())
    );
    assert!(updated.last_updated_at > created.last_updated_at);
}

#[tokio::test(flavor = "current_thread")]
async fn test_contended_connection_does_not_stall_the_runtime() {
    use std::time::{Duration, Instant};

    let (repo, conn) = setup();
    let (locked_tx, locked_rx) = std::sync::mpsc::channel();
    let holder = std::thread::spawn(move || {
        let _guard = conn.lock().unwrap();
        locked_tx.send(()).unwrap();
        std::thread::sleep(Duration::from_millis(300));
    });
    locked_rx.recv().unwrap();

    let read = tokio::spawn(async move { repo.get_by_id(1).await });

    // The read waits on the blocking pool; timers on the single worker still fire
    let started = Instant::now();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(started.elapsed() < Duration::from_millis(200));

    assert!(read.await.unwrap().unwrap().is_none());
    holder.join().unwrap();
}
