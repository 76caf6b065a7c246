mod common;

use exam_portal_backend::models::class_level::ClassLevel;
use exam_portal_backend::services::participant_service::ParticipantService;
use exam_portal_backend::services::roll_service::RollService;
use exam_portal_backend::services::schema_service::SchemaCapabilities;
use std::collections::HashSet;

#[tokio::test]
async fn sequential_registration_allocates_deterministic_rolls() {
    let Some(pool) = common::try_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    common::reset_class(&pool, ClassLevel::Six.prefix()).await;

    let service = ParticipantService::new(pool.clone(), SchemaCapabilities::full());

    let first = service
        .register(common::register_payload("Roll First", "6"))
        .await
        .expect("first registration");
    assert_eq!(first.participant.roll_number, "61010");
    assert!(!first.degraded_roll);

    let second = service
        .register(common::register_payload("Roll Second", "6"))
        .await
        .expect("second registration");
    assert_eq!(second.participant.roll_number, "61011");

    common::reset_class(&pool, ClassLevel::Six.prefix()).await;
}

#[tokio::test]
async fn next_roll_preview_reserves_nothing() {
    let Some(pool) = common::try_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    common::reset_class(&pool, ClassLevel::Seven.prefix()).await;

    let rolls = RollService::new(pool.clone());

    let preview = rolls.allocate(ClassLevel::Seven).await.expect("preview");
    assert_eq!(preview.roll_number(), "71010");
    assert!(!preview.is_degraded());

    // A second preview sees the same value because nothing was inserted.
    let again = rolls.allocate(ClassLevel::Seven).await.expect("preview");
    assert_eq!(again.roll_number(), "71010");

    let service = ParticipantService::new(pool.clone(), SchemaCapabilities::full());
    let registered = service
        .register(common::register_payload("Preview Taker", "7"))
        .await
        .expect("registration");
    assert_eq!(registered.participant.roll_number, "71010");

    common::reset_class(&pool, ClassLevel::Seven.prefix()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_registrations_never_share_a_roll() {
    let Some(pool) = common::try_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    common::reset_class(&pool, ClassLevel::Eight.prefix()).await;

    let service = ParticipantService::new(pool.clone(), SchemaCapabilities::full());

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .register(common::register_payload(&format!("Racer {}", i), "8"))
                .await
                .expect("registration")
        }));
    }

    let mut rolls = HashSet::new();
    for handle in handles {
        let registered = handle.await.expect("join");
        assert!(registered.participant.roll_number.starts_with("81"));
        assert!(
            rolls.insert(registered.participant.roll_number.clone()),
            "duplicate roll {}",
            registered.participant.roll_number
        );
    }
    assert_eq!(rolls.len(), 8);

    common::reset_class(&pool, ClassLevel::Eight.prefix()).await;
}

#[tokio::test]
async fn unknown_class_designator_is_rejected() {
    let Some(pool) = common::try_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let service = ParticipantService::new(pool.clone(), SchemaCapabilities::full());
    let err = service
        .register(common::register_payload("No Class", "13"))
        .await
        .expect_err("registration must fail");
    assert!(matches!(
        err,
        exam_portal_backend::error::Error::InvalidClass(_)
    ));
}
