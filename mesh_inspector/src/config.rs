use anyhow::{Context, Result};
use log::info;

const NAMESPACE_VAR: &str = "MESH_NAMESPACE";
const SERVICE_VAR: &str = "MESH_SERVICE";
const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub namespace: String,
    /// When unset the whole namespace is summarised.
    pub service: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
        where F: Fn(&str) -> Result<String, std::env::VarError>
    {
        let namespace = optional(&lookup, NAMESPACE_VAR)?
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let service = optional(&lookup, SERVICE_VAR)?;

        info!("Retrieved env variables: {NAMESPACE_VAR}={namespace}, {SERVICE_VAR}={service:?}");
        Ok(Self { namespace, service })
    }
}

// Empty values count as unset.
fn optional<F>(lookup: &F, key: &str) -> Result<Option<String>>
    where F: Fn(&str) -> Result<String, std::env::VarError>
{
    match lookup(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Invalid {key} env variable.")),
    }
}
