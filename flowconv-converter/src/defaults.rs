//! Host-dependent defaults used when converting the node exporter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SUPERVISORD_URL: &str = "http://localhost:9001/RPC2";

/// Operating system family the generated configuration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Darwin,
    Bsd,
    Windows,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Darwin
        } else if cfg!(any(
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )) {
            Platform::Bsd
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
            Platform::Bsd => "bsd",
            Platform::Windows => "windows",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "darwin" | "macos" => Ok(Platform::Darwin),
            "bsd" | "freebsd" | "openbsd" | "netbsd" => Ok(Platform::Bsd),
            "windows" => Ok(Platform::Windows),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// Node exporter defaults for one platform.
///
/// Passed explicitly to the converter; nothing here is read from the
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDefaults {
    pub platform: Platform,
    pub filesystem_mount_points_exclude: String,
    pub filesystem_fs_types_exclude: String,
    pub netclass_ignored_devices: String,
    pub supervisord_url: String,
}

impl PlatformDefaults {
    pub fn for_platform(platform: Platform) -> Self {
        let (mount_points, fs_types) = match platform {
            Platform::Darwin => ("^/(dev)($|/)", "^(autofs|devfs)$"),
            Platform::Bsd => ("^/(dev)($|/)", "^devfs$"),
            Platform::Linux | Platform::Windows => (
                "^/(dev|proc|run/credentials/.+|sys|var/lib/docker/.+|var/lib/containers/storage/.+)($|/)",
                "^(autofs|binfmt_misc|bpf|cgroup2?|configfs|debugfs|devpts|devtmpfs|fusectl|hugetlbfs|iso9660|mqueue|nsfs|overlay|proc|procfs|pstore|rpc_pipefs|securityfs|selinuxfs|squashfs|sysfs|tracefs)$",
            ),
        };

        Self {
            platform,
            filesystem_mount_points_exclude: mount_points.to_string(),
            filesystem_fs_types_exclude: fs_types.to_string(),
            netclass_ignored_devices: "^$".to_string(),
            supervisord_url: DEFAULT_SUPERVISORD_URL.to_string(),
        }
    }

    /// Override the supervisord endpoint, typically from `SUPERVISORD_URL`.
    pub fn with_supervisord_url(mut self, url: impl Into<String>) -> Self {
        self.supervisord_url = url.into();
        self
    }
}

impl Default for PlatformDefaults {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}
