pub mod cleaning_photo;
pub mod cleaning_record;
pub mod dirty_report;
pub mod notification;
pub mod role;
pub mod room;
pub mod user;
