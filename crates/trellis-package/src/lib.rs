//! Package management for Trellis CLI
//!
//! Provides:
//! - Version listing and latest-version selection against a package registry
//! - Deterministic, version-keyed cache locations
//! - Tarball download, integrity verification and atomic installation
//! - [`ManagedPackage`], the package backing a dynamically dispatched command

pub mod cache;
pub mod installer;
pub mod manifest;
pub mod package;
pub mod resolver;

pub use cache::PackageCache;
pub use installer::{InstallRequest, Installer, RegistryInstaller};
pub use manifest::{PackageManifest, MANIFEST_FILE};
pub use package::{ManagedPackage, ManagedPackageOptions, LATEST};
pub use resolver::{latest_of, PackageMetadata, VersionResolver, VersionSource};
