mod common;

use common::{harness_with_interval, Harness};
use contractx_core::errors::ExErrorKind;
use contractx_core::model::{AmendmentType, ContractStatus};
use contractx_core::ports::ContractRepository;
use contractx_core::queries::{ContractSortField, SortDirection};
use contractx_engine::ReminderQuery;

async fn publish(h: &Harness, numbers: &[&str]) -> Vec<i64> {
    let mut ids = Vec::new();
    for number in numbers {
        let created = h
            .service
            .create_contract(h.request(number, 1, AmendmentType::None))
            .await
            .unwrap();
        ids.push(created.id);
    }
    ids
}

#[tokio::test]
async fn test_no_due_contracts_returns_none() {
    let h = harness_with_interval(0);

    let reminders = h
        .service
        .get_contract_reminders(ReminderQuery::new(1, 10))
        .await
        .unwrap();

    assert!(reminders.is_none());
}

#[tokio::test]
async fn test_recent_contracts_are_not_due() {
    let h = harness_with_interval(14);
    publish(&h, &["R-001"]).await;

    let reminders = h
        .service
        .get_contract_reminders(ReminderQuery::new(1, 10))
        .await
        .unwrap();

    assert!(reminders.is_none());
}

#[tokio::test]
async fn test_pages_carry_links() {
    let h = harness_with_interval(0);
    publish(&h, &["R-101", "R-102", "R-103"]).await;

    let first = h
        .service
        .get_contract_reminders(ReminderQuery::new(1, 2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.contracts.len(), 2);
    assert_eq!(first.paging.total_count, 3);
    assert_eq!(first.paging.total_pages, 2);
    assert!(first.paging.has_next_page);
    assert!(!first.paging.has_previous_page);
    assert_eq!(
        first.paging.next_page_url.as_deref(),
        Some("https://contracts.example/api/contractReminders?page=2")
    );
    assert!(first.paging.previous_page_url.is_none());

    let second = h
        .service
        .get_contract_reminders(ReminderQuery::new(2, 2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.contracts.len(), 1);
    assert!(!second.paging.has_next_page);
    assert_eq!(
        second.paging.previous_page_url.as_deref(),
        Some("https://contracts.example/api/contractReminders?page=1")
    );
}

#[tokio::test]
async fn test_page_past_end_is_not_found() {
    let h = harness_with_interval(0);
    publish(&h, &["R-201", "R-202"]).await;

    let err = h
        .service
        .get_contract_reminders(ReminderQuery::new(3, 2))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[tokio::test]
async fn test_zero_page_size_is_invalid() {
    let h = harness_with_interval(0);

    let err = h
        .service
        .get_contract_reminders(ReminderQuery::new(1, 0))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_sorting_and_custom_path() {
    let h = harness_with_interval(0);
    publish(&h, &["R-301", "R-303", "R-302"]).await;

    let query = ReminderQuery::new(1, 1)
        .sorted_by(ContractSortField::ContractNumber, SortDirection::Desc)
        .with_path_template("reminders/{page}");
    let page = h.service.get_contract_reminders(query).await.unwrap().unwrap();

    assert_eq!(page.contracts[0].contract_number, "R-303");
    assert_eq!(
        page.paging.next_page_url.as_deref(),
        Some("https://contracts.example/reminders/2")
    );
}

#[tokio::test]
async fn test_withdrawn_contracts_are_not_listed() {
    let h = harness_with_interval(0);
    let ids = publish(&h, &["R-401", "R-402"]).await;
    h.repo
        .update_status(
            ids[0],
            ContractStatus::PublishedToProvider,
            ContractStatus::WithdrawnByAgency,
        )
        .await
        .unwrap();

    let page = h
        .service
        .get_contract_reminders(ReminderQuery::new(1, 10))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(page.contracts.len(), 1);
    assert_eq!(page.contracts[0].contract_number, "R-402");
}

#[tokio::test]
async fn test_mark_reminder_sent_stamps_contract() {
    let h = harness_with_interval(14);
    let ids = publish(&h, &["R-501"]).await;
    let before = chrono::Utc::now();

    let updated = h.service.mark_reminder_sent(ids[0]).await.unwrap().unwrap();

    let sent = updated.last_email_reminder_sent.unwrap();
    assert!(sent.timestamp_millis() >= before.timestamp_millis());
    let stored = h.repo.get_by_id(ids[0]).await.unwrap().unwrap();
    assert_eq!(
        stored.last_email_reminder_sent.map(|t| t.timestamp_millis()),
        Some(sent.timestamp_millis())
    );
}

#[tokio::test]
async fn test_mark_reminder_sent_unknown_id_is_none() {
    let h = harness_with_interval(14);

    let result = h.service.mark_reminder_sent(9_999).await.unwrap();

    assert!(result.is_none());
}
