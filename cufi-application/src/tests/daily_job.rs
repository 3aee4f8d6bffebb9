use super::prelude::*;

const TODAY: Date = date!(2024 - 06 - 01);

#[test]
fn import_each_feed_record_once() {
    let fixture = BackendFixture::new();
    let summary = fixture.import_feed();
    assert_eq!(
        summary,
        flows::ImportSummary {
            created: 2,
            skipped: 0,
            failed: 2,
        }
    );
    let summary = fixture.import_feed();
    assert_eq!(summary.created, 0);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.failed, 2);

    let concert = fixture.event_id_of("Concert al parc");
    let event = fixture
        .db_connections
        .shared()
        .unwrap()
        .get_event(concert)
        .unwrap();
    assert_eq!(event.details.description, "Live music");
    assert_eq!(event.details.ambit, "musica");
    assert_eq!(event.details.category, "concerts");
}

#[test]
fn import_records_after_a_broken_one() {
    let fixture = BackendFixture::new();
    let feed = StaticFeed(Some(
        r#"[
            {"data_inici": "2024-06-05T00:00:00.000", "denominaci": "Before"},
            {"data_inici": "2024-06-06T00:00:00.000", "denominaci": "Broken", "latitud": "north"},
            {"data_inici": "2024-06-07T00:00:00.000", "denominaci": "After"}
        ]"#,
    ));
    let summary = flows::import_events_from_feed(&fixture.db_connections, &feed).unwrap();
    assert_eq!(summary.created, 2);
    assert_eq!(summary.failed, 1);
    fixture.event_id_of("Before");
    fixture.event_id_of("After");
}

#[test]
fn reject_malformed_feed() {
    let fixture = BackendFixture::new();
    let err = flows::import_events_from_feed(&fixture.db_connections, &StaticFeed(Some("{}")))
        .unwrap_err();
    assert!(matches!(err, AppError::Decode(_)));
    let err = flows::import_events_from_feed(&fixture.db_connections, &StaticFeed(None))
        .unwrap_err();
    assert!(matches!(err, AppError::Feed(_)));
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[test]
fn notify_attendees_of_tomorrows_events() {
    let fixture = BackendFixture::new();
    fixture.import_feed();
    fixture.register("alice", "");
    fixture.register("bob", "");
    let alice = fixture.login("alice", Some("device-alice"));
    let bob = fixture.login("bob", Some("device-bob"));
    let concert = fixture.event_id_of("Concert al parc");
    let fair = fixture.event_id_of("Fira del llibre");
    flows::attend_event(&fixture.db_connections, &fixture.tokens, &alice, concert).unwrap();
    flows::attend_event(&fixture.db_connections, &fixture.tokens, &bob, fair).unwrap();

    let push = RecordingPush::default();
    let summary = flows::run_daily_job(
        &fixture.db_connections,
        &StaticFeed(Some(FEED)),
        &push,
        TODAY,
    )
    .unwrap();
    assert_eq!(summary.skipped, 2);
    assert_eq!(*push.sent.borrow(), vec!["device-alice".to_string()]);
}

#[test]
fn notify_even_if_the_import_fails() {
    let fixture = BackendFixture::new();
    fixture.import_feed();
    fixture.register("alice", "");
    let alice = fixture.login("alice", Some("device-alice"));
    let concert = fixture.event_id_of("Concert al parc");
    flows::attend_event(&fixture.db_connections, &fixture.tokens, &alice, concert).unwrap();

    let push = RecordingPush::default();
    let result = flows::run_daily_job(&fixture.db_connections, &StaticFeed(None), &push, TODAY);
    assert!(result.is_err());
    assert_eq!(push.sent.borrow().len(), 1);
}

#[test]
fn skip_users_without_device() {
    let fixture = BackendFixture::new();
    fixture.import_feed();
    fixture.register("alice", "");
    let alice = fixture.login("alice", None);
    let concert = fixture.event_id_of("Concert al parc");
    flows::attend_event(&fixture.db_connections, &fixture.tokens, &alice, concert).unwrap();

    let push = RecordingPush::default();
    let sent = flows::notify_near_events(&fixture.db_connections, &push, TODAY).unwrap();
    assert_eq!(sent, 0);
    assert!(push.sent.borrow().is_empty());
}

#[test]
fn find_upcoming_events() {
    let fixture = BackendFixture::new();
    fixture.import_feed();
    fixture.create_event(
        EventDetails::build()
            .denomination("Past concert")
            .dates(date!(2024 - 05 - 01))
            .finish(),
    );
    let found = flows::find_events(
        &fixture.db_connections,
        EventFilter {
            denomination: Some("oncert".into()),
            ..Default::default()
        },
        TODAY,
        &Pagination::default(),
    )
    .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].event.details.denomination, "Concert al parc");

    let nearby = flows::find_events(
        &fixture.db_connections,
        EventFilter {
            latitude: Some(41.4),
            longitude: Some(2.2),
            radius: Some(0.01),
            ..Default::default()
        },
        TODAY,
        &Pagination::default(),
    )
    .unwrap();
    assert_eq!(nearby.len(), 1);
}
