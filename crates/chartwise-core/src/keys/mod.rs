//! BYOK credential storage.
//!
//! Each provider has one credential, validated against a provider-specific
//! pattern before it is persisted. The [`KeyStore`] is an explicit object
//! injected into whatever needs keys, with a `watch` channel so frontends can
//! refresh when keys change.

mod backend;
mod credential;
mod store;

pub use backend::{FileBackend, KeyBackend, MemoryBackend};
pub use credential::{mask, validate, CredentialSpec, ProviderKind};
pub use store::{KeyStatus, KeyStore};
