//! Invoice resource: model, paid-date transition rule, and HTTP handlers

pub mod handlers;
pub mod model;
