//! Shared constants for test infrastructure

pub const INIT_COMMAND: &str = "init";
pub const INIT_PACKAGE: &str = "@trellis-cli/init";

pub const VERSION_0_1_0: &str = "0.1.0";
pub const VERSION_0_2_0: &str = "0.2.0";

pub const ENTRY_FILE: &str = "bin/trellis-init";

pub fn manifest_content(version: &str) -> String {
    format!(
        r#"{{"name":"{}","version":"{}","main":"{}"}}"#,
        INIT_PACKAGE, version, ENTRY_FILE
    )
}
