// API module - middleware, models, routes, services and storage

pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod storage;
