use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tab group a catalog file is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TabGroupKind {
    Config,
    Scripts,
}

impl TabGroupKind {
    pub const ALL: [TabGroupKind; 2] = [TabGroupKind::Config, TabGroupKind::Scripts];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Scripts => "scripts",
        }
    }

    /// Key loaded when the page starts, if any.
    pub fn default_key(self) -> Option<FileKey> {
        match self {
            Self::Config => Some(FileKey::ServerProperties),
            Self::Scripts => None,
        }
    }
}

impl fmt::Display for TabGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Closed set of files the viewer is allowed to serve.
///
/// Paths are fixed per variant; nothing a client sends is ever turned into a
/// filesystem path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKey {
    ServerProperties,
    PaperGlobal,
    PaperWorld,
    Systemd,
    Ops,
    Readme,
    Setup,
    InstallSystemd,
    UpdatePlugins,
    Backup,
}

impl FileKey {
    pub const ALL: [FileKey; 10] = [
        FileKey::ServerProperties,
        FileKey::PaperGlobal,
        FileKey::PaperWorld,
        FileKey::Systemd,
        FileKey::Ops,
        FileKey::Readme,
        FileKey::Setup,
        FileKey::InstallSystemd,
        FileKey::UpdatePlugins,
        FileKey::Backup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ServerProperties => "server-properties",
            Self::PaperGlobal => "paper-global",
            Self::PaperWorld => "paper-world",
            Self::Systemd => "systemd",
            Self::Ops => "ops",
            Self::Readme => "readme",
            Self::Setup => "setup",
            Self::InstallSystemd => "install-systemd",
            Self::UpdatePlugins => "update-plugins",
            Self::Backup => "backup",
        }
    }

    /// Path relative to the content root.
    pub fn relative_path(self) -> &'static str {
        match self {
            Self::ServerProperties => "server.properties",
            Self::PaperGlobal => "config/paper-global.yml",
            Self::PaperWorld => "config/paper-world-defaults.yml",
            Self::Systemd => "etc/systemd/system/minecraft.service",
            Self::Ops => "ops.json",
            Self::Readme => "README.md",
            Self::Setup => "scripts/setup.sh",
            Self::InstallSystemd => "scripts/install-systemd.sh",
            Self::UpdatePlugins => "scripts/update-plugins.sh",
            Self::Backup => "scripts/backup.sh",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ServerProperties => "server.properties",
            Self::PaperGlobal => "Paper Global",
            Self::PaperWorld => "Paper World Defaults",
            Self::Systemd => "systemd unit",
            Self::Ops => "ops.json",
            Self::Readme => "README",
            Self::Setup => "setup.sh",
            Self::InstallSystemd => "install-systemd.sh",
            Self::UpdatePlugins => "update-plugins.sh",
            Self::Backup => "backup.sh",
        }
    }

    pub fn group(self) -> TabGroupKind {
        match self {
            Self::ServerProperties
            | Self::PaperGlobal
            | Self::PaperWorld
            | Self::Systemd
            | Self::Ops
            | Self::Readme => TabGroupKind::Config,
            Self::Setup | Self::InstallSystemd | Self::UpdatePlugins | Self::Backup => {
                TabGroupKind::Scripts
            }
        }
    }

    pub fn group_members(group: TabGroupKind) -> Vec<FileKey> {
        Self::ALL
            .into_iter()
            .filter(|key| key.group() == group)
            .collect()
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFileKey(pub String);

impl fmt::Display for UnknownFileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown file key: {}", self.0)
    }
}

impl std::error::Error for UnknownFileKey {}

impl FromStr for FileKey {
    type Err = UnknownFileKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| UnknownFileKey(value.to_string()))
    }
}

/// Exact-match lookup of a key's relative path.
pub fn resolve(key: &str) -> Option<&'static str> {
    key.parse::<FileKey>().ok().map(FileKey::relative_path)
}
