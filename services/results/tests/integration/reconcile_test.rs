use chrono::Duration;

use tackle_domain::event::EventDetails;
use tackle_domain::status::{EventKind, ResultStatus};
use tackle_results::domain::types::{Event, TargetResult};
use tackle_results::error::ResultsServiceError;
use tackle_results::usecase::reconcile::{ReconcileResultUseCase, replay};

use crate::helpers::{
    MockCampaignRepo, MockResultRepo, base_time, init, test_campaign, test_event, test_result,
};

fn seeded(
    row: TargetResult,
    kinds: &[EventKind],
) -> (ReconcileResultUseCase<MockCampaignRepo, MockResultRepo>, MockResultRepo) {
    init();
    let campaigns = MockCampaignRepo::new(vec![test_campaign()]);
    {
        let mut events = campaigns.events.lock().unwrap();
        for (i, kind) in kinds.iter().enumerate() {
            events.push(test_event(*kind, i as i64 + 1));
        }
    }
    let results = MockResultRepo::with_rows(vec![row]);
    (
        ReconcileResultUseCase {
            campaigns,
            results: results.clone(),
        },
        results,
    )
}

#[tokio::test]
async fn should_restore_status_lagging_behind_event_log() {
    let kinds = [EventKind::Sent, EventKind::Opened, EventKind::Clicked];
    let (usecase, results) = seeded(test_result(ResultStatus::Sent), &kinds);
    let mut result = test_result(ResultStatus::Sent);

    let changed = usecase.execute(&mut result).await.unwrap();

    assert!(changed);
    assert_eq!(result.status, ResultStatus::Clicked);
    assert_eq!(result.modified_date, test_event(EventKind::Clicked, 3).time);
    assert_eq!(results.stored(result.id), result);
}

#[tokio::test]
async fn should_report_no_change_when_in_sync() {
    let kinds = [EventKind::Sent, EventKind::Opened];
    let row = TargetResult {
        modified_date: test_event(EventKind::Opened, 2).time,
        ..test_result(ResultStatus::Opened)
    };
    let (usecase, results) = seeded(row.clone(), &kinds);
    let mut result = row;

    let changed = usecase.execute(&mut result).await.unwrap();

    assert!(!changed);
    assert_eq!(results.stored(result.id).version, 0);
}

#[tokio::test]
async fn should_restore_reported_flag_independently() {
    let kinds = [EventKind::Sent, EventKind::Clicked, EventKind::Reported, EventKind::Opened];
    let (usecase, results) = seeded(test_result(ResultStatus::Clicked), &kinds);
    let mut result = test_result(ResultStatus::Clicked);

    assert!(usecase.execute(&mut result).await.unwrap());

    let stored = results.stored(result.id);
    assert!(stored.reported);
    assert_eq!(stored.status, ResultStatus::Clicked);
}

#[tokio::test]
async fn should_restore_backoff_schedule_when_retry_was_never_saved() {
    let retry_at = base_time() + Duration::minutes(30);
    let (usecase, results) = seeded(test_result(ResultStatus::Queued), &[]);
    let details = EventDetails::backoff("421 try later", retry_at);
    usecase.campaigns.events.lock().unwrap().push(Event {
        details: Some(serde_json::to_value(&details).unwrap()),
        ..test_event(EventKind::SendingError, 1)
    });
    let mut result = test_result(ResultStatus::Queued);

    assert!(usecase.execute(&mut result).await.unwrap());

    let stored = results.stored(result.id);
    assert_eq!(stored.status, ResultStatus::Retry);
    assert_eq!(stored.send_date, retry_at);
    assert_eq!(stored.modified_date, test_event(EventKind::SendingError, 1).time);
}

#[tokio::test]
async fn should_compare_against_stored_row_not_finer_caller_copy() {
    let opened_at = test_event(EventKind::Opened, 2).time;
    let row = TargetResult {
        modified_date: opened_at,
        ..test_result(ResultStatus::Opened)
    };
    let (usecase, results) = seeded(row, &[EventKind::Sent, EventKind::Opened]);
    let mut result = TargetResult {
        modified_date: opened_at + Duration::nanoseconds(500),
        ..test_result(ResultStatus::Opened)
    };

    let changed = usecase.execute(&mut result).await.unwrap();

    assert!(!changed);
    assert_eq!(result.modified_date, opened_at);
    assert_eq!(results.stored(result.id).version, 0);
}

#[tokio::test]
async fn should_fail_with_campaign_not_found() {
    init();
    let usecase = ReconcileResultUseCase {
        campaigns: MockCampaignRepo::empty(),
        results: MockResultRepo::with_rows(vec![test_result(ResultStatus::Sent)]),
    };
    let mut result = test_result(ResultStatus::Sent);

    let err = usecase.execute(&mut result).await.unwrap_err();

    assert!(matches!(err, ResultsServiceError::CampaignNotFound));
}

#[test]
fn should_replay_trailing_sending_error_as_retry_when_stored_as_retry() {
    let events = vec![
        test_event(EventKind::SendingError, 1),
        test_event(EventKind::SendingError, 2),
    ];

    let retry = replay(&test_result(ResultStatus::Retry), &events);
    let failed = replay(&test_result(ResultStatus::SendingError), &events);

    assert_eq!(retry.status, ResultStatus::Retry);
    assert_eq!(failed.status, ResultStatus::SendingError);
}

#[test]
fn should_replay_out_of_order_events_without_regressing() {
    let events = vec![
        test_event(EventKind::Sent, 1),
        test_event(EventKind::SubmittedData, 2),
        test_event(EventKind::Opened, 3),
    ];

    let replayed = replay(&test_result(ResultStatus::Queued), &events);

    assert_eq!(replayed.status, ResultStatus::SubmittedData);
    assert_eq!(replayed.modified_date, events[1].time);
}
