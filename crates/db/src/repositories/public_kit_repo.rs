//! Assembles the read-only view of a published kit.

use kittie_core::plan::PlanTier;
use kittie_core::public_kit::{PublicAsset, PublicBrand, PublicKit, PublicSection, PublicTeamMember};
use kittie_core::types::DbId;
use sqlx::PgPool;

use crate::models::kit::Kit;
use crate::repositories::{BrandRepo, KitRepo, ProfileRepo};

/// Loads published kits for the public JSON endpoint, page and embed.
/// Unpublished kits are indistinguishable from missing ones.
pub struct PublicKitRepo;

impl PublicKitRepo {
    pub async fn load_by_id(pool: &PgPool, id: DbId) -> Result<Option<PublicKit>, sqlx::Error> {
        match KitRepo::find_public_by_id(pool, id).await? {
            Some(kit) => Self::assemble(pool, kit).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn load_by_slug(pool: &PgPool, slug: &str) -> Result<Option<PublicKit>, sqlx::Error> {
        match KitRepo::find_public_by_slug(pool, slug).await? {
            Some(kit) => Self::assemble(pool, kit).await.map(Some),
            None => Ok(None),
        }
    }

    /// Resolve `key` as a numeric id first, then as a slug.
    pub async fn load(pool: &PgPool, key: &str) -> Result<Option<PublicKit>, sqlx::Error> {
        if let Ok(id) = key.parse::<DbId>() {
            if let Some(kit) = Self::load_by_id(pool, id).await? {
                return Ok(Some(kit));
            }
        }
        Self::load_by_slug(pool, key).await
    }

    async fn assemble(pool: &PgPool, kit: Kit) -> Result<PublicKit, sqlx::Error> {
        let brand = match kit.brand_id {
            Some(brand_id) => BrandRepo::find_by_id(pool, brand_id).await?,
            None => None,
        };
        let plan = ProfileRepo::find(pool, kit.user_id)
            .await?
            .map_or(PlanTier::Free, |p| p.plan);

        let kit_id = kit.id;
        let slug = kit.slug.clone();
        let name = kit.name.clone();
        let description = kit.description.clone();
        let accent_color = kit.accent_color.clone();

        let tree = KitRepo::tree(pool, kit).await?;
        let sections = tree
            .sections
            .into_iter()
            .map(|s| PublicSection {
                id: s.section.id,
                kind: s.section.kind,
                title: s.section.title,
                description: s.section.description,
                assets: s
                    .assets
                    .into_iter()
                    .map(|a| PublicAsset {
                        id: a.id,
                        name: a.name,
                        description: a.description,
                        url: a.public_url,
                        mime_type: a.mime_type,
                        size_bytes: a.size_bytes,
                    })
                    .collect(),
                team: s
                    .team
                    .into_iter()
                    .map(|m| PublicTeamMember {
                        id: m.id,
                        name: m.name,
                        role: m.role,
                        bio: m.bio,
                        email: m.email,
                        photo_url: m.photo_url,
                    })
                    .collect(),
            })
            .collect();

        Ok(PublicKit {
            id: kit_id,
            slug,
            name,
            description,
            accent_color,
            brand: brand.map(|b| PublicBrand {
                name: b.name,
                website: b.website,
                primary_color: b.primary_color,
                secondary_color: b.secondary_color,
            }),
            sections,
            show_branding: plan.limits().show_branding,
        })
    }
}
