//! Integration tests for the kit hierarchy repositories.
//!
//! Exercises the repository layer against a real database:
//! - Kit creation with default sections and plan quotas
//! - Owner scoping (other users see nothing)
//! - Cascade delete and storage path collection
//! - Unique constraint violations

use assert_matches::assert_matches;
use kittie_core::error::CoreError;
use kittie_core::plan::PlanTier;
use kittie_core::section::SectionKind;
use kittie_db::error::RepoError;
use kittie_db::models::asset::{CreateAsset, UpdateAsset};
use kittie_db::models::brand::CreateBrand;
use kittie_db::models::kit::{CreateKit, UpdateKit};
use kittie_db::models::section::CreateSection;
use kittie_db::models::team_member::CreateTeamMember;
use kittie_db::repositories::{
    AssetRepo, BrandRepo, KitRepo, ProfileRepo, SectionRepo, TeamMemberRepo,
};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, plan: PlanTier) -> Uuid {
    let user_id = Uuid::new_v4();
    ProfileRepo::ensure(pool, user_id, Some("owner@example.com"))
        .await
        .unwrap();
    ProfileRepo::set_plan(pool, user_id, plan).await.unwrap();
    user_id
}

fn new_kit(name: &str) -> CreateKit {
    CreateKit {
        name: name.to_string(),
        slug: None,
        brand_id: None,
        description: None,
        accent_color: None,
        is_public: None,
    }
}

fn new_asset(section_id: i64, name: &str, size_bytes: i64) -> CreateAsset {
    CreateAsset {
        section_id,
        name: name.to_string(),
        description: None,
        storage_path: format!("u/k/{name}.png"),
        public_url: format!("https://cdn.example.com/{name}.png"),
        mime_type: "image/png".to_string(),
        size_bytes,
    }
}

async fn section_of_kind(pool: &PgPool, kit_id: i64, kind: SectionKind) -> i64 {
    SectionRepo::list_for_kit(pool, kit_id)
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.kind == kind)
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Test: Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_kit_adds_default_sections(pool: PgPool) {
    let user = new_user(&pool, PlanTier::Pro).await;
    let kit = KitRepo::create_with_quota(&pool, user, "acme-press", &new_kit("Acme Press"))
        .await
        .unwrap();
    assert_eq!(kit.slug, "acme-press");
    assert!(!kit.is_public);

    let sections = SectionRepo::list_for_kit(&pool, kit.id).await.unwrap();
    let kinds: Vec<_> = sections.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::Hero,
            SectionKind::Logos,
            SectionKind::Gallery,
            SectionKind::Team
        ]
    );
    let indexes: Vec<_> = sections.iter().map(|s| s.order_index).collect();
    assert_eq!(indexes, vec![0, 1, 2, 3]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_free_plan_allows_one_kit(pool: PgPool) {
    let user = new_user(&pool, PlanTier::Free).await;
    KitRepo::create_with_quota(&pool, user, "first-kit", &new_kit("First"))
        .await
        .unwrap();

    let result = KitRepo::create_with_quota(&pool, user, "second-kit", &new_kit("Second")).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::QuotaExceeded(_))));

    let kits = KitRepo::list(&pool, user).await.unwrap();
    assert_eq!(kits.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upgrade_lifts_kit_quota(pool: PgPool) {
    let user = new_user(&pool, PlanTier::Free).await;
    KitRepo::create_with_quota(&pool, user, "first-kit", &new_kit("First"))
        .await
        .unwrap();
    ProfileRepo::set_plan(&pool, user, PlanTier::Pro).await.unwrap();

    KitRepo::create_with_quota(&pool, user, "second-kit", &new_kit("Second"))
        .await
        .unwrap();
    let usage = ProfileRepo::usage(&pool, user).await.unwrap();
    assert_eq!(usage.kit_count, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_kit_with_foreign_brand_rejected(pool: PgPool) {
    let owner = new_user(&pool, PlanTier::Pro).await;
    let other = new_user(&pool, PlanTier::Pro).await;
    let brand = BrandRepo::create(
        &pool,
        other,
        "other-brand",
        &CreateBrand {
            name: "Other".to_string(),
            slug: None,
            website: None,
            primary_color: None,
            secondary_color: None,
            description: None,
        },
    )
    .await
    .unwrap();

    let mut input = new_kit("Borrowed");
    input.brand_id = Some(brand.id);
    let result = KitRepo::create_with_quota(&pool, owner, "borrowed", &input).await;
    assert_matches!(
        result,
        Err(RepoError::Core(CoreError::NotFound { entity: "Brand", .. }))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_slug_violates_unique(pool: PgPool) {
    let a = new_user(&pool, PlanTier::Pro).await;
    let b = new_user(&pool, PlanTier::Pro).await;
    KitRepo::create_with_quota(&pool, a, "taken", &new_kit("Taken"))
        .await
        .unwrap();

    let err = KitRepo::create_with_quota(&pool, b, "taken", &new_kit("Taken"))
        .await
        .unwrap_err();
    match err {
        RepoError::Database(sqlx::Error::Database(db)) => {
            assert_eq!(db.constraint(), Some("uq_kits_slug"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_hero_section_rejected(pool: PgPool) {
    let user = new_user(&pool, PlanTier::Pro).await;
    let kit = KitRepo::create_with_quota(&pool, user, "hero-kit", &new_kit("Hero"))
        .await
        .unwrap();

    let err = SectionRepo::create(
        &pool,
        kit.id,
        &CreateSection {
            kind: SectionKind::Hero,
            title: "Another hero".to_string(),
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(db) if db.constraint() == Some("uq_sections_hero_per_kit"));
}

// ---------------------------------------------------------------------------
// Test: Ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_other_users_cannot_see_or_modify(pool: PgPool) {
    let owner = new_user(&pool, PlanTier::Pro).await;
    let intruder = new_user(&pool, PlanTier::Pro).await;
    let kit = KitRepo::create_with_quota(&pool, owner, "private-kit", &new_kit("Private"))
        .await
        .unwrap();
    let gallery = section_of_kind(&pool, kit.id, SectionKind::Gallery).await;
    let asset = AssetRepo::create(&pool, &new_asset(gallery, "logo", 10))
        .await
        .unwrap();

    assert!(KitRepo::find_owned(&pool, kit.id, intruder)
        .await
        .unwrap()
        .is_none());
    assert!(SectionRepo::find_owned(&pool, gallery, intruder)
        .await
        .unwrap()
        .is_none());
    assert!(AssetRepo::find_owned(&pool, asset.id, intruder)
        .await
        .unwrap()
        .is_none());

    let update = UpdateKit {
        name: Some("Hijacked".to_string()),
        ..Default::default()
    };
    assert!(KitRepo::update_owned(&pool, kit.id, intruder, &update)
        .await
        .unwrap()
        .is_none());
    assert!(AssetRepo::delete_owned(&pool, asset.id, intruder)
        .await
        .unwrap()
        .is_none());
    assert!(KitRepo::delete_owned(&pool, kit.id, intruder)
        .await
        .unwrap()
        .is_none());

    let kit = KitRepo::find_owned(&pool, kit.id, owner).await.unwrap().unwrap();
    assert_eq!(kit.name, "Private");
}

// ---------------------------------------------------------------------------
// Test: Partial updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_update_applies_only_given_fields(pool: PgPool) {
    let user = new_user(&pool, PlanTier::Pro).await;
    let mut input = new_kit("Launch");
    input.description = Some("Press material".to_string());
    let kit = KitRepo::create_with_quota(&pool, user, "launch", &input)
        .await
        .unwrap();

    let update = UpdateKit {
        accent_color: Some("#ff6600".to_string()),
        ..Default::default()
    };
    let updated = KitRepo::update_owned(&pool, kit.id, user, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.accent_color.as_deref(), Some("#ff6600"));
    assert_eq!(updated.description.as_deref(), Some("Press material"));
    assert_eq!(updated.name, "Launch");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_moving_asset_appends_to_target_section(pool: PgPool) {
    let user = new_user(&pool, PlanTier::Pro).await;
    let kit = KitRepo::create_with_quota(&pool, user, "moves", &new_kit("Moves"))
        .await
        .unwrap();
    let logos = section_of_kind(&pool, kit.id, SectionKind::Logos).await;
    let gallery = section_of_kind(&pool, kit.id, SectionKind::Gallery).await;

    AssetRepo::create(&pool, &new_asset(gallery, "one", 1)).await.unwrap();
    AssetRepo::create(&pool, &new_asset(gallery, "two", 1)).await.unwrap();
    let moving = AssetRepo::create(&pool, &new_asset(logos, "mark", 1))
        .await
        .unwrap();
    assert_eq!(moving.order_index, 0);

    let update = UpdateAsset {
        section_id: Some(gallery),
        ..Default::default()
    };
    let moved = AssetRepo::update_owned(&pool, moving.id, user, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.section_id, gallery);
    assert_eq!(moved.order_index, 2);
    assert!(AssetRepo::list_for_section(&pool, logos)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Test: Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_kit_cascades_and_returns_paths(pool: PgPool) {
    let user = new_user(&pool, PlanTier::Pro).await;
    let kit = KitRepo::create_with_quota(&pool, user, "doomed", &new_kit("Doomed"))
        .await
        .unwrap();
    let gallery = section_of_kind(&pool, kit.id, SectionKind::Gallery).await;
    let team = section_of_kind(&pool, kit.id, SectionKind::Team).await;

    let asset = AssetRepo::create(&pool, &new_asset(gallery, "shot", 100))
        .await
        .unwrap();
    let member = TeamMemberRepo::create(
        &pool,
        team,
        &CreateTeamMember {
            name: "Ada".to_string(),
            role: Some("CEO".to_string()),
            bio: None,
            email: None,
        },
    )
    .await
    .unwrap();
    TeamMemberRepo::set_photo(&pool, member.id, user, "https://cdn/ada.jpg", "u/k/ada.jpg", 50)
        .await
        .unwrap();

    let mut paths = KitRepo::delete_owned(&pool, kit.id, user)
        .await
        .unwrap()
        .unwrap();
    paths.sort();
    assert_eq!(paths, vec!["u/k/ada.jpg".to_string(), "u/k/shot.png".to_string()]);

    assert!(AssetRepo::find_owned(&pool, asset.id, user)
        .await
        .unwrap()
        .is_none());
    assert!(TeamMemberRepo::find_owned(&pool, member.id, user)
        .await
        .unwrap()
        .is_none());
    assert!(SectionRepo::list_for_kit(&pool, kit.id)
        .await
        .unwrap()
        .is_empty());

    let usage = ProfileRepo::usage(&pool, user).await.unwrap();
    assert_eq!(usage.kit_count, 0);
    assert_eq!(usage.storage_bytes, 0);
}

// ---------------------------------------------------------------------------
// Test: Storage quota
// ---------------------------------------------------------------------------

const MIB: i64 = 1024 * 1024;

#[sqlx::test(migrations = "./migrations")]
async fn test_storage_quota_counts_assets_and_portraits(pool: PgPool) {
    let user = new_user(&pool, PlanTier::Free).await;
    let kit = KitRepo::create_with_quota(&pool, user, "quota", &new_kit("Quota"))
        .await
        .unwrap();
    let gallery = section_of_kind(&pool, kit.id, SectionKind::Gallery).await;
    let team = section_of_kind(&pool, kit.id, SectionKind::Team).await;

    // Fill all but 3 MiB of the free plan's 100 MiB.
    AssetRepo::create(&pool, &new_asset(gallery, "bulk", 97 * MIB))
        .await
        .unwrap();

    let member = TeamMemberRepo::create(
        &pool,
        team,
        &CreateTeamMember {
            name: "Ada".to_string(),
            role: None,
            bio: None,
            email: None,
        },
    )
    .await
    .unwrap();
    TeamMemberRepo::set_photo(&pool, member.id, user, "https://cdn/a.jpg", "u/k/a.jpg", 2 * MIB)
        .await
        .unwrap()
        .unwrap();

    let usage = ProfileRepo::usage(&pool, user).await.unwrap();
    assert_eq!(usage.storage_bytes, 99 * MIB);

    let result = AssetRepo::create_within_quota(&pool, user, &new_asset(gallery, "extra", 2 * MIB)).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::QuotaExceeded(_))));

    // Replacing the portrait only counts the new file.
    TeamMemberRepo::set_photo(&pool, member.id, user, "https://cdn/b.jpg", "u/k/b.jpg", 3 * MIB)
        .await
        .unwrap()
        .unwrap();
    let result =
        TeamMemberRepo::set_photo(&pool, member.id, user, "https://cdn/c.jpg", "u/k/c.jpg", 4 * MIB).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::QuotaExceeded(_))));

    let usage = ProfileRepo::usage(&pool, user).await.unwrap();
    assert_eq!(usage.storage_bytes, 100 * MIB);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_set_photo_on_foreign_member_is_none(pool: PgPool) {
    let owner = new_user(&pool, PlanTier::Pro).await;
    let intruder = new_user(&pool, PlanTier::Pro).await;
    let kit = KitRepo::create_with_quota(&pool, owner, "people", &new_kit("People"))
        .await
        .unwrap();
    let team = section_of_kind(&pool, kit.id, SectionKind::Team).await;
    let member = TeamMemberRepo::create(
        &pool,
        team,
        &CreateTeamMember {
            name: "Ada".to_string(),
            role: None,
            bio: None,
            email: None,
        },
    )
    .await
    .unwrap();

    let result =
        TeamMemberRepo::set_photo(&pool, member.id, intruder, "https://cdn/x.jpg", "u/k/x.jpg", 10)
            .await
            .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_brand_unlinks_kits(pool: PgPool) {
    let user = new_user(&pool, PlanTier::Pro).await;
    let brand = BrandRepo::create(
        &pool,
        user,
        "acme",
        &CreateBrand {
            name: "Acme".to_string(),
            slug: None,
            website: Some("https://acme.test".to_string()),
            primary_color: Some("#112233".to_string()),
            secondary_color: None,
            description: None,
        },
    )
    .await
    .unwrap();
    let mut input = new_kit("Branded");
    input.brand_id = Some(brand.id);
    let kit = KitRepo::create_with_quota(&pool, user, "branded", &input)
        .await
        .unwrap();
    assert_eq!(kit.brand_id, Some(brand.id));

    assert!(BrandRepo::delete_owned(&pool, brand.id, user).await.unwrap());
    let kit = KitRepo::find_owned(&pool, kit.id, user).await.unwrap().unwrap();
    assert_eq!(kit.brand_id, None);
}
