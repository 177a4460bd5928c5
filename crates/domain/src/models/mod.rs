//! Domain model definitions.

pub mod audit;
pub mod content;
pub mod event;
pub mod layout;
pub mod profile;
pub mod role;
pub mod transfer;
pub mod user;

pub use audit::{AuditAction, AuditLogEntry, CreateAuditLogInput, FieldChange, ResourceType};
pub use content::{
    Announcement, AnnouncementSeverity, Fixture, GalleryItem, NavLink, Player, Product,
    RecordEntry, Team,
};
pub use event::EventConfig;
pub use layout::{LayoutConfig, Section, SectionConfig, ThemeConfig};
pub use profile::{ProfileStatus, UserProfile};
pub use role::{Permission, Role};
pub use transfer::{TransferRequest, TransferStatus};
pub use user::{OAuthAccount, OAuthProvider, User};
