#![cfg(feature = "integration-tests")]

//! Integration tests for the membership and role repositories.
//!
//! Requires a live Postgres (see `test_fixtures::DEFAULT_TEST_DATABASE_URL`);
//! run with `cargo test -p folio-db --features integration-tests`.

use folio_db::test_fixtures::{unique_name, TestDatabase};
use folio_db::{
    ApprovalFilter, ApprovalStatus, CollectionRepository, Error, ItemRef, ItemRepository,
    MembershipRepository, NewMembership, UserRepository,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

async fn seed_basic(test_db: &TestDatabase) -> (i64, i64, i64, i64) {
    let (user_id, pseud_id) = test_db.seed_user(&unique_name("author"), false).await;
    let collection_id = test_db
        .seed_collection(&unique_name("anthology"), false, false)
        .await;
    let work_id = test_db.seed_work("Ascension", pseud_id).await;
    (user_id, pseud_id, collection_id, work_id)
}

#[tokio::test]
async fn create_then_find_by_unique_key() {
    init_logging();
    let test_db = TestDatabase::new().await;
    let (_, _, collection_id, work_id) = seed_basic(&test_db).await;
    let memberships = &test_db.db.memberships;

    let created = memberships
        .create(NewMembership {
            collection_id,
            item: ItemRef::work(work_id),
            user_approval_status: None,
            collection_approval_status: None,
        })
        .await
        .expect("create membership");
    assert_eq!(created.collection_id, collection_id);
    assert_eq!(created.item, ItemRef::work(work_id));
    assert!(created.user_approval_status.is_none());

    let found = memberships
        .find(collection_id, &ItemRef::work(work_id))
        .await
        .expect("find membership")
        .expect("membership should exist");
    assert_eq!(found.id, created.id);

    // A bookmark with the same numeric ID is a different key
    let other_kind = memberships
        .find(collection_id, &ItemRef::bookmark(work_id))
        .await
        .expect("find bookmark membership");
    assert!(other_kind.is_none());
}

#[tokio::test]
async fn duplicate_insert_hits_unique_index() {
    init_logging();
    let test_db = TestDatabase::new().await;
    let (_, _, collection_id, work_id) = seed_basic(&test_db).await;
    let memberships = &test_db.db.memberships;

    let new = NewMembership {
        collection_id,
        item: ItemRef::work(work_id),
        user_approval_status: None,
        collection_approval_status: None,
    };
    memberships.create(new.clone()).await.expect("first insert");

    match memberships.create(new).await {
        Err(Error::Database(_)) => {}
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[tokio::test]
async fn set_approval_round_trips() {
    init_logging();
    let test_db = TestDatabase::new().await;
    let (_, _, collection_id, work_id) = seed_basic(&test_db).await;
    let memberships = &test_db.db.memberships;

    let created = memberships
        .create(NewMembership {
            collection_id,
            item: ItemRef::work(work_id),
            user_approval_status: Some(ApprovalStatus::Neutral),
            collection_approval_status: None,
        })
        .await
        .expect("create membership");

    memberships
        .set_approval(
            created.id,
            Some(ApprovalStatus::Approved),
            Some(ApprovalStatus::Rejected),
        )
        .await
        .expect("set approval");

    let stored = memberships
        .get(created.id)
        .await
        .expect("get membership")
        .expect("membership should exist");
    assert!(stored.approved_by_user());
    assert!(stored.rejected_by_collection());
    assert!(stored.updated_at_utc >= created.updated_at_utc);
}

#[tokio::test]
async fn set_approval_on_unknown_membership_fails() {
    init_logging();
    let test_db = TestDatabase::new().await;

    match test_db
        .db
        .memberships
        .set_approval(i64::MAX, Some(ApprovalStatus::Approved), None)
        .await
    {
        Err(Error::MembershipNotFound(_)) => {}
        other => panic!("expected MembershipNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn list_for_collection_filters_by_side() {
    init_logging();
    let test_db = TestDatabase::new().await;
    let (_, pseud_id, collection_id, work_id) = seed_basic(&test_db).await;
    let second_work = test_db.seed_work("Descent", pseud_id).await;
    let memberships = &test_db.db.memberships;

    memberships
        .create(NewMembership {
            collection_id,
            item: ItemRef::work(work_id),
            user_approval_status: Some(ApprovalStatus::Approved),
            collection_approval_status: Some(ApprovalStatus::Approved),
        })
        .await
        .expect("first membership");
    memberships
        .create(NewMembership {
            collection_id,
            item: ItemRef::work(second_work),
            user_approval_status: Some(ApprovalStatus::Neutral),
            collection_approval_status: Some(ApprovalStatus::Rejected),
        })
        .await
        .expect("second membership");

    let all = memberships
        .list_for_collection(collection_id, ApprovalFilter::All)
        .await
        .expect("list all");
    assert_eq!(all.len(), 2);
    // Insertion order is creation order
    assert_eq!(all[0].item, ItemRef::work(work_id));

    let approved = memberships
        .list_for_collection(
            collection_id,
            ApprovalFilter::CollectionSide(ApprovalStatus::Approved),
        )
        .await
        .expect("list approved");
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].item, ItemRef::work(work_id));

    let neutral_user = memberships
        .list_for_collection(
            collection_id,
            ApprovalFilter::UserSide(ApprovalStatus::Neutral),
        )
        .await
        .expect("list neutral");
    assert_eq!(neutral_user.len(), 1);
    assert_eq!(neutral_user[0].item, ItemRef::work(second_work));
}

#[tokio::test]
async fn collection_view_carries_flags_and_roles() {
    init_logging();
    let test_db = TestDatabase::new().await;
    let (maintainer_id, maintainer_pseud) =
        test_db.seed_user(&unique_name("mod"), false).await;
    let (member_id, member_pseud) = test_db.seed_user(&unique_name("member"), false).await;
    let collection_id = test_db
        .seed_collection(&unique_name("challenge"), true, true)
        .await;
    test_db
        .add_participant(collection_id, maintainer_pseud, "maintainer")
        .await;
    test_db
        .add_participant(collection_id, member_pseud, "member")
        .await;

    let view = test_db
        .db
        .collections
        .view(collection_id)
        .await
        .expect("load view")
        .expect("collection should exist");

    assert!(view.closed);
    assert!(view.moderated);
    assert!(view.maintainer_pseud_ids.contains(&maintainer_pseud));
    assert!(!view.maintainer_pseud_ids.contains(&member_pseud));
    assert!(view.posting_participant_ids.contains(&member_id));
    assert!(view.posting_participant_ids.contains(&maintainer_id));
}

#[tokio::test]
async fn collection_view_missing_is_none() {
    init_logging();
    let test_db = TestDatabase::new().await;
    let view = test_db.db.collections.view(i64::MAX).await.expect("view");
    assert!(view.is_none());
}

#[tokio::test]
async fn work_item_view_joins_owners_and_credited_pseuds() {
    init_logging();
    let test_db = TestDatabase::new().await;
    let (author_id, author_pseud) = test_db.seed_user(&unique_name("author"), true).await;
    let (coauthor_id, coauthor_pseud) = test_db.seed_user(&unique_name("coauthor"), false).await;
    let work_id = test_db.seed_work("Joint Effort", author_pseud).await;
    sqlx::query(
        "INSERT INTO creatorships (creation_kind, creation_id, pseud_id) VALUES ('work', $1, $2)",
    )
    .bind(work_id)
    .bind(coauthor_pseud)
    .execute(test_db.pool())
    .await
    .expect("second creatorship");

    let view = test_db
        .db
        .items
        .item_view(&ItemRef::work(work_id))
        .await
        .expect("item view")
        .expect("work should exist");

    assert_eq!(view.item, ItemRef::work(work_id));
    assert!(view.pseud_ids.contains(&author_pseud));
    assert!(view.pseud_ids.contains(&coauthor_pseud));
    assert_eq!(view.owners.len(), 2);
    assert!(view.owned_by(author_id));
    assert!(view.owned_by(coauthor_id));

    let author_owner = view
        .owners
        .iter()
        .find(|o| o.user_id == author_id)
        .expect("author owner");
    assert!(author_owner.auto_approve_invitations);
}

#[tokio::test]
async fn bookmark_item_view_owner_is_the_pseud_holder() {
    init_logging();
    let test_db = TestDatabase::new().await;
    let (user_id, pseud_id) = test_db.seed_user(&unique_name("curator"), false).await;
    let bookmark_id = test_db.seed_bookmark(pseud_id).await;

    let view = test_db
        .db
        .items
        .item_view(&ItemRef::bookmark(bookmark_id))
        .await
        .expect("item view")
        .expect("bookmark should exist");

    assert_eq!(view.pseud_ids.len(), 1);
    assert!(view.owned_by(user_id));
}

#[tokio::test]
async fn missing_item_view_is_none() {
    init_logging();
    let test_db = TestDatabase::new().await;
    let view = test_db
        .db
        .items
        .item_view(&ItemRef::work(i64::MAX))
        .await
        .expect("item view");
    assert!(view.is_none());
}

#[tokio::test]
async fn user_repository_loads_pseud_set() {
    init_logging();
    let test_db = TestDatabase::new().await;
    let login = unique_name("writer");
    let (user_id, pseud_id) = test_db.seed_user(&login, false).await;

    let user = test_db
        .db
        .users
        .get(user_id)
        .await
        .expect("get user")
        .expect("user should exist");
    assert_eq!(user.login, login);
    assert!(user.pseud_ids.contains(&pseud_id));

    let missing = test_db.db.users.get(i64::MAX).await.expect("get missing");
    assert!(missing.is_none());
}
