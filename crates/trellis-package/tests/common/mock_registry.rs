//! Mock registry helpers
//!
//! Serves npm-style metadata at `/<package>` and gzipped tarballs at
//! `/tarballs/<normalized>-<version>.tgz`.

use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha512};
use trellis_package::PackageCache;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// Build a gzipped tarball with every file under `package/`
pub fn package_tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("package/{}", name), *data)
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Tarball for a runnable command package
pub fn command_tarball() -> Vec<u8> {
    package_tarball(&[
        ("package.json", MANIFEST_CONTENT.as_bytes()),
        (ENTRY_FILE, ENTRY_CONTENT),
    ])
}

/// `sha512-<base64>` integrity string for content
pub fn integrity_of(content: &[u8]) -> String {
    format!(
        "sha512-{}",
        base64::engine::general_purpose::STANDARD.encode(Sha512::digest(content))
    )
}

pub fn tarball_path(package_name: &str, version: &str) -> String {
    format!(
        "/tarballs/{}-{}.tgz",
        PackageCache::normalize(package_name),
        version
    )
}

/// Metadata document listing `versions` in order, each pointing at its tarball
pub fn metadata_document(
    server: &MockServer,
    package_name: &str,
    versions: &[&str],
    integrity: Option<&str>,
) -> Value {
    let mut entries = Map::new();
    for version in versions {
        let mut dist = json!({
            "tarball": format!("{}{}", server.uri(), tarball_path(package_name, version)),
        });
        if let Some(integrity) = integrity {
            dist["integrity"] = json!(integrity);
        }
        entries.insert(
            version.to_string(),
            json!({ "name": package_name, "version": version, "dist": dist }),
        );
    }

    json!({
        "name": package_name,
        "dist-tags": { "latest": versions.last().copied().unwrap_or_default() },
        "versions": Value::Object(entries),
    })
}

/// Mount a metadata endpoint for a package
pub async fn mock_metadata(server: &MockServer, package_name: &str, versions: &[&str]) {
    let body = metadata_document(server, package_name, versions, None);
    Mock::given(method("GET"))
        .and(path(format!("/{}", package_name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a metadata endpoint carrying an integrity string on every version
pub async fn mock_metadata_with_integrity(
    server: &MockServer,
    package_name: &str,
    versions: &[&str],
    integrity: &str,
) {
    let body = metadata_document(server, package_name, versions, Some(integrity));
    Mock::given(method("GET"))
        .and(path(format!("/{}", package_name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a metadata endpoint answering with a bare status
pub async fn mock_metadata_status(server: &MockServer, package_name: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", package_name)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount a tarball download expected to be requested exactly `times` times
pub async fn mock_tarball(
    server: &MockServer,
    package_name: &str,
    version: &str,
    content: Vec<u8>,
    times: u64,
) {
    Mock::given(method("GET"))
        .and(path(tarball_path(package_name, version)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .expect(times)
        .mount(server)
        .await;
}
