use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub(crate) const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub(crate) const DEFAULT_ROOT_DIR: &str = ".";
pub(crate) const DEFAULT_PUBLIC_DIR: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory the catalog paths are relative to.
    pub root_dir: PathBuf,
    pub public_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind = value("PAPERVIEW_SERVER_BIND", DEFAULT_BIND);
        let bind_addr = bind
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid PAPERVIEW_SERVER_BIND: {bind}"))?;

        Ok(Self {
            bind_addr,
            root_dir: PathBuf::from(value("PAPERVIEW_ROOT_DIR", DEFAULT_ROOT_DIR)),
            public_dir: PathBuf::from(value("PAPERVIEW_PUBLIC_DIR", DEFAULT_PUBLIC_DIR)),
        })
    }
}
