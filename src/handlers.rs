pub mod auth;
pub mod closing;
pub mod csv;
pub mod dashboard;
pub mod diary;
pub mod stock;
