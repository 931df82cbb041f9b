pub mod auth;
pub mod closing_service;
pub mod csv_service;
pub mod dashboard_service;
pub mod diary_service;
pub mod stock_service;
