//! Formula data assembled from release assets.
//!
//! Each supported platform is identified by the exact file name of its
//! release archive. Assets with any other name are ignored, and a platform
//! whose archive is missing keeps an empty URL and checksum.

use crate::release::Release;
use crate::version::Version;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use tracing::{debug, warn};

/// Prefix GitHub puts on asset digests.
pub const SHA256_DIGEST_PREFIX: &str = "sha256:";

/// A platform/architecture pair the formula ships a binary for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// macOS on Apple Silicon
    MacosArm64,
    /// macOS on Intel
    MacosAmd64,
    /// Linux on arm64
    LinuxArm64,
    /// Linux on x86-64
    LinuxAmd64,
}

impl Platform {
    /// All platforms, in formula field order.
    pub const ALL: [Self; 4] = [
        Self::MacosArm64,
        Self::MacosAmd64,
        Self::LinuxArm64,
        Self::LinuxAmd64,
    ];

    /// Release asset file name for this platform.
    #[must_use]
    pub const fn asset_name(self) -> &'static str {
        match self {
            Self::MacosArm64 => "neokikoeru-macos-arm64.tar.gz",
            Self::MacosAmd64 => "neokikoeru-macos-amd64.tar.gz",
            Self::LinuxArm64 => "neokikoeru-linux-arm64.tar.gz",
            Self::LinuxAmd64 => "neokikoeru-linux-amd64.tar.gz",
        }
    }

    /// Platform whose asset is named exactly `name`.
    #[must_use]
    pub fn from_asset_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.asset_name() == name)
    }

    /// Template field holding the download URL.
    #[must_use]
    pub const fn url_field(self) -> &'static str {
        match self {
            Self::MacosArm64 => "DownloadUrlMacOSArm64",
            Self::MacosAmd64 => "DownloadUrlMacOSAmd64",
            Self::LinuxArm64 => "DownloadUrlLinuxArm64",
            Self::LinuxAmd64 => "DownloadUrlLinuxAmd64",
        }
    }

    /// Template field holding the SHA-256 checksum.
    #[must_use]
    pub const fn sha256_field(self) -> &'static str {
        match self {
            Self::MacosArm64 => "Sha256MacOSArm64",
            Self::MacosAmd64 => "Sha256MacOSAmd64",
            Self::LinuxArm64 => "Sha256LinuxArm64",
            Self::LinuxAmd64 => "Sha256LinuxAmd64",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MacosArm64 => "macos-arm64",
            Self::MacosAmd64 => "macos-amd64",
            Self::LinuxArm64 => "linux-arm64",
            Self::LinuxAmd64 => "linux-amd64",
        };
        f.write_str(s)
    }
}

/// Binary information for a platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryInfo {
    /// Download URL
    pub url: String,
    /// SHA256 checksum
    pub sha256: String,
}

impl BinaryInfo {
    /// Whether no asset was found for this platform.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.url.is_empty() && self.sha256.is_empty()
    }
}

/// Data rendered into the formula template.
///
/// Serializes as a flat map: `Version`, then `DownloadUrl<Platform>` and
/// `Sha256<Platform>` for every [`Platform`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    /// Version
    pub version: String,
    binaries: [BinaryInfo; 4],
}

impl Formula {
    /// Creates a formula with no binaries.
    #[must_use]
    pub fn new(version: &Version) -> Self {
        Self {
            version: version.to_string(),
            binaries: Default::default(),
        }
    }

    /// Builds the formula from a release's assets.
    ///
    /// Unrecognized assets are skipped. If an asset name appears twice the
    /// later one wins. Missing platforms are logged and left empty.
    #[must_use]
    pub fn from_release(version: &Version, release: &Release) -> Self {
        let mut formula = Self::new(version);

        for asset in &release.assets {
            let Some(platform) = Platform::from_asset_name(&asset.name) else {
                debug!(asset = %asset.name, "Skipping unrecognized asset");
                continue;
            };
            debug!(%platform, asset = %asset.name, "Matched release asset");
            formula.set_binary(
                platform,
                BinaryInfo {
                    url: asset.browser_download_url.clone(),
                    sha256: strip_digest_prefix(&asset.digest).to_string(),
                },
            );
        }

        for platform in formula.missing_platforms() {
            warn!(
                %platform,
                asset = platform.asset_name(),
                "Release has no asset for platform, leaving its fields empty"
            );
        }

        formula
    }

    /// Binary info for `platform`.
    #[must_use]
    pub fn binary(&self, platform: Platform) -> &BinaryInfo {
        &self.binaries[platform.index()]
    }

    /// Replaces the binary info for `platform`.
    pub fn set_binary(&mut self, platform: Platform, info: BinaryInfo) {
        self.binaries[platform.index()] = info;
    }

    /// Platforms that have no binary.
    pub fn missing_platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        Platform::ALL
            .into_iter()
            .filter(|p| self.binary(*p).is_empty())
    }
}

impl Serialize for Formula {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + 2 * Platform::ALL.len()))?;
        map.serialize_entry("Version", &self.version)?;
        for platform in Platform::ALL {
            let info = self.binary(platform);
            map.serialize_entry(platform.url_field(), &info.url)?;
            map.serialize_entry(platform.sha256_field(), &info.sha256)?;
        }
        map.end()
    }
}

/// Removes a leading `sha256:` from a digest; other digests pass through.
#[must_use]
pub fn strip_digest_prefix(digest: &str) -> &str {
    digest.strip_prefix(SHA256_DIGEST_PREFIX).unwrap_or(digest)
}
