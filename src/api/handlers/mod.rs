pub mod announcements;
pub mod auth;
pub mod course;
pub mod materials;
pub mod notifications;
pub mod root;
pub mod subscribers;
