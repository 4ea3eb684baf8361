#![forbid(unsafe_code)]

mod entry;
mod projects;
mod server;
mod support;
mod tools;

pub(crate) use support::*;

pub(crate) use bg_core::ids::ProjectId;
use projects::ProjectRegistry;
use std::fmt::Write as _;
use std::sync::Arc;

const MCP_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "beatgraph-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn write_last_crash(storage_dir: &std::path::Path, kind: &str, detail: &str) {
    // Best-effort; never touches stdout (reserved for the protocol).
    let _ = std::fs::create_dir_all(storage_dir);
    let path = storage_dir.join("bg_mcp_last_crash.txt");

    let mut out = String::new();
    let ts_ms = crate::support::now_ms_i64();
    let _ = writeln!(out, "ts={}", crate::support::ts_ms_to_rfc3339(ts_ms));
    let _ = writeln!(out, "pid={}", std::process::id());
    let _ = writeln!(out, "kind={kind}");
    let _ = writeln!(out, "build={}", crate::build_fingerprint());
    let _ = writeln!(out, "args={:?}", std::env::args().collect::<Vec<_>>());
    let _ = writeln!(out, "detail={detail}");

    let _ = std::fs::write(path, out);
}

fn install_crash_reporter(storage_dir: std::path::PathBuf) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let mut detail = info.to_string();
        let backtrace = std::backtrace::Backtrace::force_capture();
        let _ = write!(&mut detail, "\nbacktrace:\n{backtrace}");
        write_last_crash(&storage_dir, "panic", &detail);
        default_hook(info);
    }));
}

/// One protocol session. Graphs live in the shared registry, so several
/// sessions (daemon connections) can work on the same projects.
pub(crate) struct McpServer {
    initialized: bool,
    projects: Arc<ProjectRegistry>,
    default_project: Option<ProjectId>,
}

fn usage() -> &'static str {
    "bg_mcp: beat dependency graph MCP server (stdio-first)\n\n\
USAGE:\n\
  bg_mcp [--storage-dir DIR] [--project ID] [--daemon [--socket PATH]]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version/build and exit\n\
\n\
ENV:\n\
  BEATGRAPH_STORAGE_DIR, BEATGRAPH_PROJECT, BEATGRAPH_DAEMON, BEATGRAPH_SOCKET\n\
\n\
NOTES:\n\
  - Graphs are held in memory only; the storage dir receives diagnostics.\n"
}

fn version_line() -> String {
    format!("bg_mcp {SERVER_VERSION} build={}", crate::build_fingerprint())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{}", version_line());
        return Ok(());
    }

    let config = RuntimeConfig::from_args(&args)?;
    install_crash_reporter(config.storage_dir.clone());
    let storage_dir_for_errors = config.storage_dir.clone();
    let projects = Arc::new(ProjectRegistry::default());

    if config.daemon {
        #[cfg(unix)]
        {
            let result = entry::run_socket_daemon(&config, projects);
            if let Err(err) = &result {
                write_last_crash(&storage_dir_for_errors, "error", &format!("{err:?}"));
            }
            return result;
        }

        #[cfg(not(unix))]
        {
            return Err("daemon mode is only supported on unix targets".into());
        }
    }

    let mut session_log = crate::SessionLog::new(&config.storage_dir, "stdio");
    let mut server = McpServer::new(projects, config.default_project.clone());
    let result = entry::run_stdio(&mut server, &mut session_log);
    match &result {
        Ok(()) => session_log.note_exit("eof"),
        Err(err) => {
            session_log.note_exit("error");
            write_last_crash(&storage_dir_for_errors, "error", &format!("{err:?}"));
        }
    }
    result
}
