//! Secret lookup for API keys and the authorized sender

use crate::error::MashupError;
use std::collections::HashMap;
use std::env;

pub const AUTHORIZED_SENDER: &str = "AUTHORIZED_SENDER";
pub const KALEIDOSCOPE_KEY: &str = "KALEIDOSCOPE_KEY";

/// Opaque name -> value store
pub trait SecretStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Secrets from the process environment (after `.env` is loaded)
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecrets;

impl SecretStore for EnvSecrets {
    fn get(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl SecretStore for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Look up a secret that must be present and non-empty
pub fn require<S: SecretStore + ?Sized>(secrets: &S, name: &str) -> Result<String, MashupError> {
    secrets
        .get(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| MashupError::config(format!("{} not set in secrets", name)))
}
