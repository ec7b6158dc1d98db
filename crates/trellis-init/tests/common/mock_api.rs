//! Wiremock endpoints for the template catalogue and registry

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;
use std::path::Path;
use trellis_core::CliConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEMPLATE_KEY: &str = "vue3";
pub const TEMPLATE_PACKAGE: &str = "@trellis-cli/template-vue3";
pub const TEMPLATE_VERSION: &str = "1.0.2";

/// Config pointing both the catalogue and the registry at `server`
pub fn test_config(home: &Path, server: &MockServer) -> CliConfig {
    let mut config =
        CliConfig::with_home(home).with_registry(Some(format!("{}/registry/", server.uri())));
    config.request_base_url = format!("{}/api", server.uri());
    config
}

pub async fn mock_catalogue(server: &MockServer, version: &str) {
    Mock::given(method("GET"))
        .and(path("/api/template"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "key": TEMPLATE_KEY,
                "name": "Vue 3 starter",
                "packageName": TEMPLATE_PACKAGE,
                "version": version,
            }
        ])))
        .mount(server)
        .await;
}

pub async fn mock_catalogue_failure(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/template"))
        .respond_with(ResponseTemplate::new(503))
        .mount(server)
        .await;
}

/// Tarball of a template package with a `template/` directory
pub fn template_tarball() -> Vec<u8> {
    let files: [(&str, &[u8]); 3] = [
        (
            "package/package.json",
            &br#"{"name":"@trellis-cli/template-vue3","version":"1.0.2"}"#[..],
        ),
        ("package/template/package.json", &br#"{"name":"app"}"#[..]),
        ("package/template/src/main.js", &b"console.log('hi')"[..]),
    ];

    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Registry metadata and tarball for the template package
pub async fn mock_template_package(server: &MockServer, tarball_downloads: u64) {
    let tarball_path = format!("/tarballs/template-vue3-{}.tgz", TEMPLATE_VERSION);
    Mock::given(method("GET"))
        .and(path(format!("/registry/{}", TEMPLATE_PACKAGE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": TEMPLATE_PACKAGE,
            "versions": {
                TEMPLATE_VERSION: {
                    "version": TEMPLATE_VERSION,
                    "dist": { "tarball": format!("{}{}", server.uri(), tarball_path) },
                }
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(tarball_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(template_tarball()))
        .expect(tarball_downloads)
        .mount(server)
        .await;
}
