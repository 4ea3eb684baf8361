#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

/// Small, bounded record of the current session, rewritten on every update.
/// Never written to stdout/stderr and never contains request bodies.
#[derive(Clone, Debug)]
pub(crate) struct SessionLog {
    path: Option<PathBuf>,
    start_rfc3339: String,
    pid: u32,
    build: String,
    args: Vec<String>,
    mode: Option<String>,
    first_line: Option<String>,
    last_method: Option<String>,
    last_error: Option<String>,
    requests: u64,
    exit: Option<String>,
}

impl SessionLog {
    pub(crate) fn new(storage_dir: &Path, kind: &str) -> Self {
        let mut this = Self::disabled();
        this.path = Some(storage_dir.join(format!("bg_mcp_last_session_{kind}.txt")));
        this.flush();
        this
    }

    /// A log that records nothing; used for daemon connections.
    pub(crate) fn disabled() -> Self {
        Self {
            path: None,
            start_rfc3339: crate::ts_ms_to_rfc3339(crate::now_ms_i64()),
            pid: std::process::id(),
            build: crate::build_fingerprint(),
            args: std::env::args().collect(),
            mode: None,
            first_line: None,
            last_method: None,
            last_error: None,
            requests: 0,
            exit: None,
        }
    }

    pub(crate) fn note_mode(&mut self, mode: &str, first_line: &str) {
        self.mode = Some(mode.to_string());
        self.first_line = Some(truncate(first_line.trim_end(), 240));
        self.flush();
    }

    pub(crate) fn note_method(&mut self, method: &str) {
        let method = method.trim();
        if method.is_empty() {
            return;
        }
        self.requests += 1;
        self.last_method = Some(truncate(method, 96));
        self.flush();
    }

    pub(crate) fn note_error(&mut self, error: &str) {
        let error = error.trim();
        if error.is_empty() {
            return;
        }
        self.last_error = Some(truncate(error, 300));
        self.flush();
    }

    pub(crate) fn note_exit(&mut self, reason: &str) {
        self.exit = Some(truncate(reason.trim(), 120));
        self.flush();
    }

    fn flush(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }

        let mut out = String::new();
        push_kv(&mut out, "ts_start", &self.start_rfc3339);
        push_kv(&mut out, "pid", &self.pid.to_string());
        push_kv(&mut out, "build", &self.build);
        push_kv(&mut out, "args", &format!("{:?}", self.args));
        push_kv(&mut out, "requests", &self.requests.to_string());
        if let Some(mode) = &self.mode {
            push_kv(&mut out, "mode", mode);
        }
        if let Some(line) = &self.first_line {
            push_kv(&mut out, "first_line", line);
        }
        if let Some(method) = &self.last_method {
            push_kv(&mut out, "last_method", method);
        }
        if let Some(err) = &self.last_error {
            push_kv(&mut out, "last_error", err);
        }
        if let Some(exit) = &self.exit {
            push_kv(&mut out, "exit", exit);
        }

        let _ = std::fs::write(path, out);
    }
}

fn push_kv(out: &mut String, key: &str, value: &str) {
    use std::fmt::Write as _;
    let _ = writeln!(out, "{key}={value}");
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max_chars).collect();
    out.push('…');
    out
}
