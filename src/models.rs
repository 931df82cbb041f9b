pub mod auth;
pub mod closing;
pub mod dashboard;
pub mod diary;
pub mod inventory;
