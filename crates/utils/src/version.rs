use std::sync::LazyLock;

use crate::build_info::BUILD_INFO;

/// Defines the application version.
pub static VERSION: LazyLock<String> = LazyLock::new(|| {
    format_version(
        env!("CODEFLARE_VERSION"),
        BUILD_INFO.commit_sha1,
        BUILD_INFO.git_dirty,
    )
});

fn format_version(version: &str, sha: Option<&str>, dirty: Option<&str>) -> String {
    let short_sha = sha.map(|sha| &sha[..sha.len().min(8)]).unwrap_or("unknown");
    let dirty = dirty.is_some_and(|dirty| dirty == "true");
    format!(
        "{version}-{short_sha}{}",
        if dirty { "-dirty" } else { "" }
    )
}
