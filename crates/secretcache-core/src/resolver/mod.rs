//! Secret resolution facade
//!
//! `SecretResolver` is the single entry point: it parses caller keys, serves
//! repeat lookups from the encrypted cache and falls through to the configured
//! backend on a miss.

mod context;
mod secret_resolver;

pub use context::SecretContext;
pub use secret_resolver::SecretResolver;
