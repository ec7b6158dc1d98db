//! Shared constants for test infrastructure

pub const INIT_PACKAGE: &str = "@trellis-cli/init";
pub const PLAIN_PACKAGE: &str = "left-pad";

pub const VERSION_0_1_0: &str = "0.1.0";
pub const VERSION_0_2_0: &str = "0.2.0";
pub const VERSION_0_3_0: &str = "0.3.0";

pub const ENTRY_FILE: &str = "bin/trellis-init";

pub const MANIFEST_CONTENT: &str =
    r#"{"name":"@trellis-cli/init","version":"0.2.0","main":"bin/trellis-init"}"#;
pub const ENTRY_CONTENT: &[u8] = b"#!/bin/sh\nexit 0\n";
