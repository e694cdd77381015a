//! Build-time information
//!
//! Build metadata captured at compile time by `build.rs` (vergen).

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Rust compiler version
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// Rust channel (stable, beta, or nightly)
pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

/// Git commit SHA, or a vergen placeholder outside a checkout
pub const GIT_SHA: &str = env!("VERGEN_GIT_SHA");

/// Git branch name
pub const GIT_BRANCH: &str = env!("VERGEN_GIT_BRANCH");

/// "true" when the working tree had uncommitted changes at build time
pub const GIT_DIRTY: &str = env!("VERGEN_GIT_DIRTY");

/// First 8 characters of the commit SHA
pub fn git_sha_short() -> &'static str {
    GIT_SHA.get(..8).unwrap_or(GIT_SHA)
}

/// Whether the build came from a dirty working tree
pub fn is_git_dirty() -> bool {
    GIT_DIRTY == "true"
}

/// Returns a formatted build version string
///
/// Format: `{crate_version}+{sha}-{target_triple}-opt{opt_level}`
pub fn version_string() -> String {
    format!(
        "{}+{}-{}-opt{}",
        env!("CARGO_PKG_VERSION"),
        git_sha_short(),
        CARGO_TARGET_TRIPLE,
        CARGO_OPT_LEVEL
    )
}

/// Returns a detailed build info string
pub fn detailed_info() -> String {
    format!(
        "Built: {}\nGit: {}@{}{}\nTarget: {}\nOptimization: {}\nRustc: {} ({})",
        BUILD_TIMESTAMP,
        GIT_BRANCH,
        git_sha_short(),
        if is_git_dirty() { " (dirty)" } else { "" },
        CARGO_TARGET_TRIPLE,
        CARGO_OPT_LEVEL,
        RUSTC_SEMVER,
        RUSTC_CHANNEL
    )
}
