//! Mock registry helpers for dispatch tests

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Map, Value};
use std::path::Path;
use trellis_package::PackageCache;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// Gzipped tarball of a command package at `version`
pub fn command_tarball(version: &str) -> Vec<u8> {
    let manifest = manifest_content(version);
    let files: [(&str, &[u8]); 2] = [
        ("package/package.json", manifest.as_bytes()),
        ("package/bin/trellis-init", &b"#!/bin/sh\nexit 0\n"[..]),
    ];

    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

pub fn tarball_path(version: &str) -> String {
    format!("/tarballs/trellis-init-{}.tgz", version)
}

/// Mount package metadata listing `versions`, expected `times` times
pub async fn mock_metadata(server: &MockServer, versions: &[&str], times: u64) {
    let mut entries = Map::new();
    for version in versions {
        entries.insert(
            version.to_string(),
            json!({
                "name": INIT_PACKAGE,
                "version": version,
                "dist": { "tarball": format!("{}{}", server.uri(), tarball_path(version)) },
            }),
        );
    }

    Mock::given(method("GET"))
        .and(path(format!("/{}", INIT_PACKAGE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": INIT_PACKAGE,
            "versions": Value::Object(entries),
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Mount a tarball download expected exactly `times` times
pub async fn mock_tarball(server: &MockServer, version: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(tarball_path(version)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(command_tarball(version)))
        .expect(times)
        .mount(server)
        .await;
}

/// Lay down an installed version directly in the store
pub fn seed_cache(store: &Path, version: &str) {
    let dir = PackageCache::cache_path(store, INIT_PACKAGE, version);
    std::fs::create_dir_all(dir.join("bin")).unwrap();
    std::fs::write(dir.join("package.json"), manifest_content(version)).unwrap();
    std::fs::write(dir.join(ENTRY_FILE), "#!/bin/sh\nexit 0\n").unwrap();
}
