#![forbid(unsafe_code)]

use crate::ProjectId;
use std::path::PathBuf;

const DEFAULT_STORAGE_DIR: &str = ".beatgraph";

/// Process configuration: CLI flags first, then `BEATGRAPH_*` env vars.
#[derive(Clone, Debug)]
pub(crate) struct RuntimeConfig {
    pub(crate) storage_dir: PathBuf,
    pub(crate) default_project: Option<ProjectId>,
    pub(crate) daemon: bool,
    pub(crate) socket_path: PathBuf,
}

impl RuntimeConfig {
    pub(crate) fn from_args(args: &[String]) -> Result<Self, String> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    fn resolve(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let storage_dir = flag_value(args, "--storage-dir")
            .or_else(|| env("BEATGRAPH_STORAGE_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));

        let default_project = match flag_value(args, "--project").or_else(|| env("BEATGRAPH_PROJECT")) {
            Some(raw) if !raw.trim().is_empty() => Some(
                ProjectId::try_new(raw.trim())
                    .map_err(|err| format!("invalid --project: {}", err.message()))?,
            ),
            _ => None,
        };

        let daemon = has_flag(args, "--daemon")
            || env("BEATGRAPH_DAEMON").is_some_and(|value| parse_bool(&value));

        let socket_path = flag_value(args, "--socket")
            .or_else(|| env("BEATGRAPH_SOCKET"))
            .map(PathBuf::from)
            .unwrap_or_else(|| storage_dir.join("bg_mcp.sock"));

        Ok(Self {
            storage_dir,
            default_project,
            daemon,
            socket_path,
        })
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.as_str() == flag {
            return iter.next().cloned();
        }
    }
    None
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg.as_str() == flag)
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
