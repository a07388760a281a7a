//! User-Agent synthesized for CloudCode requests.

/// Agent version the endpoint expects to see.
pub const AGENT_VERSION: &str = "1.15.8";

/// `antigravity/<version> <os>/<arch>`, using Go-style platform names.
pub fn platform_user_agent() -> String {
    format!("antigravity/{} {}/{}", AGENT_VERSION, os_name(std::env::consts::OS), arch_name(std::env::consts::ARCH))
}

fn os_name(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn arch_name(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    }
}
