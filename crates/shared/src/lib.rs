//! profilesync shared library: identity and profile value types, the error
//! taxonomy, and API contracts shared between the server and its clients.

pub mod api;
pub mod constants;
pub mod error;
pub mod identity;
pub mod ids;
pub mod profile;
