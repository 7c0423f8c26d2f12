// Library for tests to access modules

pub mod astarte;
pub mod cancel;
pub mod config;
pub mod datasource;
pub mod dispatch;
pub mod error;
pub mod fetcher;
pub mod health;
pub mod models;
pub mod normalize;
pub mod resources;
pub mod routes;
pub mod version;
