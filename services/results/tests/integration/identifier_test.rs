use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;

use tackle_domain::id::{CampaignId, UserId};
use tackle_domain::status::ResultStatus;
use tackle_results::domain::types::{RID_ALPHABET, RID_LEN};
use tackle_results::error::ResultsServiceError;
use tackle_results::usecase::identifier::IdentifierGenerator;
use tackle_results::usecase::result::{CreateResultInput, CreateResultUseCase};

use crate::helpers::{MockResultRepo, base_time, init};

fn input(email: &str) -> CreateResultInput {
    CreateResultInput {
        campaign_id: CampaignId(10),
        user_id: UserId(1),
        email: email.to_owned(),
        first_name: "Jane".to_owned(),
        last_name: "Doe".to_owned(),
        position: "Analyst".to_owned(),
        send_date: base_time(),
    }
}

#[tokio::test]
async fn should_regenerate_after_precheck_collisions() {
    init();
    let results = MockResultRepo::empty();
    results.state_handle().lock().unwrap().taken_checks = 3;

    let rid = IdentifierGenerator::default().generate(&results).await.unwrap();

    assert_eq!(rid.len(), RID_LEN);
    assert!(rid.bytes().all(|b| RID_ALPHABET.contains(&b)));
    assert_eq!(results.state_handle().lock().unwrap().exists_calls, 4);
}

#[tokio::test]
async fn should_fail_with_generation_exhausted_after_max_attempts() {
    init();
    let results = MockResultRepo::empty();
    results.state_handle().lock().unwrap().taken_checks = u32::MAX;
    let generator = IdentifierGenerator { max_attempts: 20 };

    let err = generator.generate(&results).await.unwrap_err();

    assert!(matches!(err, ResultsServiceError::GenerationExhausted));
    assert_eq!(results.state_handle().lock().unwrap().exists_calls, 20);
}

#[tokio::test]
async fn should_create_queued_result_with_fresh_rid() {
    init();
    let results = MockResultRepo::empty();
    let usecase = CreateResultUseCase {
        results: results.clone(),
        generator: IdentifierGenerator::default(),
    };

    let created = usecase.execute(input("jane@example.com")).await.unwrap();

    assert_eq!(created.status, ResultStatus::Queued);
    assert!(!created.reported);
    assert_eq!(created.rid.len(), RID_LEN);
    assert_eq!(created.send_date, base_time());
    assert_eq!(created.version, 0);
    assert_eq!(results.stored(created.id), created);
}

#[tokio::test]
async fn should_regenerate_when_insert_loses_the_race() {
    init();
    let results = MockResultRepo::empty();
    results.state_handle().lock().unwrap().duplicate_inserts = 2;
    let usecase = CreateResultUseCase {
        results: results.clone(),
        generator: IdentifierGenerator::default(),
    };

    let created = usecase.execute(input("jane@example.com")).await.unwrap();

    let state = results.state_handle();
    let state = state.lock().unwrap();
    assert_eq!(state.rows.len(), 1);
    assert_eq!(state.exists_calls, 3);
    assert_eq!(state.rows[&created.id.0].rid, created.rid);
}

#[tokio::test]
async fn should_give_up_when_every_insert_collides() {
    init();
    let results = MockResultRepo::empty();
    results.state_handle().lock().unwrap().duplicate_inserts = u32::MAX;
    let usecase = CreateResultUseCase {
        results: results.clone(),
        generator: IdentifierGenerator { max_attempts: 4 },
    };

    let err = usecase.execute(input("jane@example.com")).await.unwrap_err();

    assert!(matches!(err, ResultsServiceError::GenerationExhausted));
    assert!(results.state_handle().lock().unwrap().rows.is_empty());
}

#[tokio::test]
async fn should_assign_distinct_rids_across_many_results() {
    init();
    let results = MockResultRepo::empty();
    let usecase = CreateResultUseCase {
        results: results.clone(),
        generator: IdentifierGenerator::default(),
    };

    let mut rids = HashSet::new();
    for i in 0..500 {
        let created = usecase
            .execute(input(&format!("target{i}@example.com")))
            .await
            .unwrap();
        rids.insert(created.rid);
    }

    assert_eq!(rids.len(), 500);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn should_assign_distinct_rids_to_concurrent_creates() {
    init();
    let results = MockResultRepo::empty();
    results.state_handle().lock().unwrap().duplicate_inserts = 10;
    let usecase = Arc::new(CreateResultUseCase {
        results: results.clone(),
        generator: IdentifierGenerator::default(),
    });

    let mut tasks = JoinSet::new();
    for i in 0..200 {
        let usecase = Arc::clone(&usecase);
        tasks.spawn(async move { usecase.execute(input(&format!("target{i}@example.com"))).await });
    }
    let mut rids = HashSet::new();
    while let Some(joined) = tasks.join_next().await {
        rids.insert(joined.unwrap().unwrap().rid);
    }

    assert_eq!(rids.len(), 200);
    let state = results.state_handle();
    let state = state.lock().unwrap();
    assert_eq!(state.rows.len(), 200);
    assert_eq!(state.duplicate_inserts, 0);
}
