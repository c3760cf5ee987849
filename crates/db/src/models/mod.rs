//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for the
//!   editor's partial saves

pub mod asset;
pub mod brand;
pub mod kit;
pub mod profile;
pub mod section;
pub mod team_member;
