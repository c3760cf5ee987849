//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods taking a `user_id`
//! only ever see rows owned by that user; a row owned by someone else looks
//! exactly like a missing one.

pub mod asset_repo;
pub mod brand_repo;
pub mod kit_repo;
pub mod ordering;
pub mod profile_repo;
pub mod public_kit_repo;
pub mod section_repo;
pub mod slug;
pub mod team_member_repo;

pub use asset_repo::AssetRepo;
pub use brand_repo::BrandRepo;
pub use kit_repo::KitRepo;
pub use profile_repo::ProfileRepo;
pub use public_kit_repo::PublicKitRepo;
pub use section_repo::SectionRepo;
pub use team_member_repo::TeamMemberRepo;
