#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{
    article_payload, edit_article_title, flag_holders, live_title, seed_article,
    seed_portfolio_item, seed_service, setup_test_db,
};
use folio_core::content::AdapterRegistry;
use folio_core::errors::ExErrorKind;
use folio_core::events::{RecordingEventSink, VersionEvent};
use folio_core::model::{EntityRef, Payload, SnapshotOrigin};
use folio_engine::commands::versioning::{
    create_draft, create_version, current_version, get_version, get_version_history,
    latest_published_version, publish_version, restore_to_version, unpublish,
};
use folio_engine::EngineContext;
use folio_store::snapshot::ListOptions;
use serde_json::json;

fn payload(value: serde_json::Value) -> Payload {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_create_version_marks_exactly_one_current() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_article(&conn, 1, "First");

    let v1 = create_version(&mut conn, &ctx, entity, Some("ana"), "Initial", None).unwrap();
    let v2 = create_version(&mut conn, &ctx, entity, Some("ana"), "Second", None).unwrap();

    assert_eq!((v1.version_number, v2.version_number), (1, 2));
    assert!(v2.is_current);
    assert_eq!(flag_holders(&conn, entity, "is_current"), 1);
    let current = current_version(&conn, &ctx, entity).unwrap().unwrap();
    assert_eq!(current.version_number, 2);
    assert_eq!(current.payload["title"], json!("First"));
    assert_eq!(current.author.as_deref(), Some("ana"));
}

#[test]
fn test_create_version_for_missing_entity_is_not_found() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);

    let err = create_version(
        &mut conn,
        &ctx,
        EntityRef::article(404).unwrap(),
        None,
        "Save",
        None,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.entity_id(), Some(404));
    assert_eq!(err.request_id(), Some(&ctx.request.request_id));
}

#[test]
fn test_restore_appends_copy_of_old_payload() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_article(&conn, 1, "Draft");

    create_version(&mut conn, &ctx, entity, None, "v1", None).unwrap();
    edit_article_title(&conn, entity, "Final");
    create_version(&mut conn, &ctx, entity, None, "v2", None).unwrap();
    assert_eq!(
        current_version(&conn, &ctx, entity).unwrap().unwrap().version_number,
        2
    );

    let v3 = restore_to_version(&mut conn, &ctx, entity, 1, Some("ed"), Some("rollback")).unwrap();

    assert_eq!(v3.version_number, 3);
    assert!(v3.is_current);
    assert_eq!(v3.change_summary, "Restored to version 1");
    assert_eq!(v3.change_notes.as_deref(), Some("rollback"));
    assert_eq!(v3.origin, SnapshotOrigin::Restore);
    assert_eq!(v3.payload["title"], json!("Draft"));
    assert_eq!(live_title(&conn, entity), "Draft");

    let v1 = get_version(&conn, &ctx, entity, 1).unwrap();
    let v2 = get_version(&conn, &ctx, entity, 2).unwrap();
    assert_eq!(v3.payload, v1.payload);
    assert!(!v1.is_current);
    assert_eq!(v2.payload["title"], json!("Final"));
    assert_eq!(
        current_version(&conn, &ctx, entity).unwrap().unwrap().version_number,
        3
    );
}

#[test]
fn test_restore_missing_version_changes_nothing() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_article(&conn, 1, "Only");
    create_version(&mut conn, &ctx, entity, None, "v1", None).unwrap();

    let err = restore_to_version(&mut conn, &ctx, entity, 7, None, None).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.version_number(), Some(7));

    let page = get_version_history(&conn, &ctx, entity, ListOptions::default()).unwrap();
    assert_eq!(page.total, 1);
}

#[test]
fn test_publish_moves_flag_and_keeps_old_timestamp() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_portfolio_item(&conn, 3, "Case study");

    create_version(&mut conn, &ctx, entity, None, "v1", None).unwrap();
    create_version(&mut conn, &ctx, entity, None, "v2", None).unwrap();
    create_version(&mut conn, &ctx, entity, None, "v3", None).unwrap();

    let m = publish_version(&mut conn, &ctx, entity, 1).unwrap();
    let m_stamp = m.published_at.unwrap();
    let n = publish_version(&mut conn, &ctx, entity, 2).unwrap();

    assert!(n.is_published);
    assert!(n.published_at.unwrap() >= m_stamp);
    assert!(!n.is_current, "published version need not be current");

    let old = get_version(&conn, &ctx, entity, 1).unwrap();
    assert!(!old.is_published);
    assert_eq!(old.published_at, Some(m_stamp));
    assert_eq!(flag_holders(&conn, entity, "is_published"), 1);
    assert_eq!(
        latest_published_version(&conn, &ctx, entity)
            .unwrap()
            .unwrap()
            .version_number,
        2
    );
}

#[test]
fn test_publish_missing_version_is_not_found() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_service(&conn, 2, "Audits");
    create_version(&mut conn, &ctx, entity, None, "v1", None).unwrap();
    publish_version(&mut conn, &ctx, entity, 1).unwrap();

    let err = publish_version(&mut conn, &ctx, entity, 5).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(
        latest_published_version(&conn, &ctx, entity)
            .unwrap()
            .unwrap()
            .version_number,
        1
    );
}

#[test]
fn test_unpublish_clears_live_version() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_article(&conn, 4, "Live");
    create_version(&mut conn, &ctx, entity, None, "v1", None).unwrap();

    assert!(unpublish(&mut conn, &ctx, entity).unwrap().is_none());

    publish_version(&mut conn, &ctx, entity, 1).unwrap();
    let previous = unpublish(&mut conn, &ctx, entity).unwrap().unwrap();
    assert_eq!(previous.version_number, 1);
    assert!(!previous.is_published);
    assert!(previous.published_at.is_some());
    assert!(latest_published_version(&conn, &ctx, entity)
        .unwrap()
        .is_none());
}

#[test]
fn test_draft_touches_neither_flag() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_article(&conn, 5, "Published");
    create_version(&mut conn, &ctx, entity, None, "v1", None).unwrap();
    publish_version(&mut conn, &ctx, entity, 1).unwrap();

    let draft = create_draft(
        &mut conn,
        &ctx,
        entity,
        Some("ana"),
        &article_payload(json!({"title": "Alternative", "tags": ["idea"]})),
        Some("try a new angle"),
    )
    .unwrap();

    assert_eq!(draft.version_number, 2);
    assert!(draft.is_parked_draft());
    assert_eq!(
        current_version(&conn, &ctx, entity).unwrap().unwrap().version_number,
        1
    );
    assert_eq!(
        latest_published_version(&conn, &ctx, entity)
            .unwrap()
            .unwrap()
            .version_number,
        1
    );
    assert_eq!(live_title(&conn, entity), "Published");

    // Drafts share the numbering sequence
    let v3 = create_version(&mut conn, &ctx, entity, None, "v3", None).unwrap();
    assert_eq!(v3.version_number, 3);
}

#[test]
fn test_service_drafts_are_unsupported() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_service(&conn, 1, "Consulting");

    let err = create_draft(
        &mut conn,
        &ctx,
        entity,
        None,
        &payload(json!({"title": "Consulting+"})),
        None,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::UnsupportedOperation);
    let page = get_version_history(&conn, &ctx, entity, ListOptions::default()).unwrap();
    assert_eq!(page.total, 0);
}

#[test]
fn test_malformed_draft_is_rejected_before_write() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_article(&conn, 6, "Strict");
    create_version(&mut conn, &ctx, entity, None, "v1", None).unwrap();

    for bad in [
        json!({"title": 42}),
        json!({"tags": "not-a-list"}),
        json!({"subtitle": "unknown field"}),
        json!({"title": "Only the title"}),
    ] {
        let err = create_draft(&mut conn, &ctx, entity, None, &payload(bad), None).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ValidationError);
    }

    let page = get_version_history(&conn, &ctx, entity, ListOptions::default()).unwrap();
    assert_eq!(page.total, 1);
}

#[test]
fn test_history_is_newest_first_with_total() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_article(&conn, 7, "Busy");
    for i in 1..=5 {
        create_version(&mut conn, &ctx, entity, None, &format!("v{}", i), None).unwrap();
    }
    restore_to_version(&mut conn, &ctx, entity, 2, None, None).unwrap();

    let page = get_version_history(&conn, &ctx, entity, ListOptions::page(3, 0)).unwrap();
    let numbers: Vec<u32> = page.versions.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![6, 5, 4]);
    assert_eq!(page.total, 6);
    assert!(page.versions[0].is_current);
}

#[test]
fn test_events_follow_committed_changes() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let sink = RecordingEventSink::new();
    let ctx = EngineContext::new(&adapters).with_events(&sink);
    let entity = seed_article(&conn, 8, "Events");

    create_version(&mut conn, &ctx, entity, None, "v1", None).unwrap();
    create_draft(
        &mut conn,
        &ctx,
        entity,
        None,
        &article_payload(json!({"title": "D"})),
        None,
    )
    .unwrap();
    publish_version(&mut conn, &ctx, entity, 1).unwrap();
    restore_to_version(&mut conn, &ctx, entity, 2, None, None).unwrap();
    unpublish(&mut conn, &ctx, entity).unwrap();
    let _ = publish_version(&mut conn, &ctx, entity, 99);

    assert_eq!(
        sink.events(),
        vec![
            VersionEvent::CurrentChanged {
                entity,
                version_number: 1
            },
            VersionEvent::DraftCreated {
                entity,
                version_number: 2
            },
            VersionEvent::PublishedChanged {
                entity,
                version_number: Some(1)
            },
            VersionEvent::CurrentChanged {
                entity,
                version_number: 3
            },
            VersionEvent::PublishedChanged {
                entity,
                version_number: None
            },
        ]
    );
    assert_eq!(live_title(&conn, entity), "D");
}

#[test]
fn test_restoring_a_draft_reproduces_its_payload() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_article(&conn, 9, "Live");
    create_version(&mut conn, &ctx, entity, None, "v1", None).unwrap();

    let draft = create_draft(
        &mut conn,
        &ctx,
        entity,
        Some("ana"),
        &article_payload(json!({
            "title": "Draft title",
            "slug": "draft-title",
            "excerpt": null,
            "tags": ["draft", "idea"],
        })),
        None,
    )
    .unwrap();

    let restored =
        restore_to_version(&mut conn, &ctx, entity, draft.version_number, None, None).unwrap();

    assert_eq!(restored.version_number, 3);
    assert_eq!(restored.payload, draft.payload);
    assert_eq!(live_title(&conn, entity), "Draft title");
}

#[test]
fn test_partial_draft_is_rejected_before_write() {
    let (_dir, _path, mut conn) = setup_test_db();
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters);
    let entity = seed_article(&conn, 10, "Live");
    create_version(&mut conn, &ctx, entity, None, "v1", None).unwrap();

    let err = create_draft(
        &mut conn,
        &ctx,
        entity,
        None,
        &payload(json!({"title": "Draft title"})),
        None,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ValidationError);
    assert!(err.message().contains("slug"));
    let page = get_version_history(&conn, &ctx, entity, ListOptions::default()).unwrap();
    assert_eq!(page.total, 1);
}
