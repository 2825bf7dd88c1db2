#[macro_use]
extern crate rocket;

#[macro_use]
extern crate diesel;

pub mod catchers;
pub mod configuration;
pub mod dispatch;
pub mod domain;
pub mod models;
pub mod push;
pub mod routes;
pub mod scheduler;
pub mod schema;
pub mod startup;
pub mod tasks;
pub mod telemetry;
