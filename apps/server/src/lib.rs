pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod jwt;
pub mod profile;
pub mod router;
pub mod session;
pub mod shutdown;
pub mod state;
pub mod storage;
pub mod validation;
