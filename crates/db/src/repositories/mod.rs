//! Repository layer: one zero-sized struct per table with async query methods.

pub mod cleaning_photo_repo;
pub mod cleaning_record_repo;
pub mod dirty_report_repo;
pub mod notification_repo;
pub mod role_repo;
pub mod room_repo;
pub mod user_repo;

pub use cleaning_photo_repo::CleaningPhotoRepo;
pub use cleaning_record_repo::CleaningRecordRepo;
pub use dirty_report_repo::DirtyReportRepo;
pub use notification_repo::NotificationRepo;
pub use role_repo::RoleRepo;
pub use room_repo::RoomRepo;
pub use user_repo::UserRepo;
