#![forbid(unsafe_code)]

pub(crate) fn build_profile_label() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

pub(crate) fn build_git_sha() -> Option<&'static str> {
    option_env!("BG_GIT_SHA").and_then(|v| {
        let v = v.trim();
        if v.is_empty() { None } else { Some(v) }
    })
}

/// Compact build tag for `--version`, session logs and crash reports.
pub(crate) fn build_fingerprint() -> String {
    let mut out = format!("{}.{}", env!("CARGO_PKG_VERSION"), build_profile_label());
    if let Some(sha) = build_git_sha() {
        let short = sha.get(..12).unwrap_or(sha);
        out.push('.');
        out.push_str(short);
    }
    out
}
