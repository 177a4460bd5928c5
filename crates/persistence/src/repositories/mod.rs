//! Repository implementations for database operations.

pub mod announcement;
pub mod audit_log;
pub mod event;
pub mod fixture;
pub mod gallery;
pub mod layout;
pub mod navigation;
pub mod otp_gate;
pub mod player;
pub mod product;
pub mod profile;
pub mod record;
pub mod super_admin_registry;
pub mod team;
pub mod transfer;
pub mod user;

pub use announcement::AnnouncementRepository;
pub use audit_log::{AuditLogQuery, AuditLogRepository};
pub use event::EventRepository;
pub use fixture::FixtureRepository;
pub use gallery::GalleryRepository;
pub use layout::LayoutRepository;
pub use navigation::{NavLinkInput, NavigationRepository};
pub use otp_gate::OtpGateRepository;
pub use player::PlayerRepository;
pub use product::ProductRepository;
pub use profile::ProfileRepository;
pub use record::RecordRepository;
pub use super_admin_registry::SuperAdminRegistryRepository;
pub use team::TeamRepository;
pub use transfer::{CompletionOutcome, TransferRepository};
pub use user::UserRepository;
