//! Entity definitions (database row mappings).

pub mod audit_log;
pub mod content;
pub mod event;
pub mod layout;
pub mod otp;
pub mod profile;
pub mod registry;
pub mod transfer;
pub mod user;

pub use audit_log::AuditLogEntity;
pub use content::{
    AnnouncementEntity, FixtureEntity, GalleryItemEntity, NavLinkEntity, PlayerEntity,
    ProductEntity, RecordEntity, TeamEntity,
};
pub use event::EventEntity;
pub use layout::LayoutEntity;
pub use otp::OtpGateEntity;
pub use profile::ProfileEntity;
pub use registry::SuperAdminRegistryEntity;
pub use transfer::TransferEntity;
pub use user::{OAuthAccountEntity, UserEntity};
