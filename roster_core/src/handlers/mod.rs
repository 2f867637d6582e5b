//! HTTP route handlers

pub mod routes;
pub mod schedules;
