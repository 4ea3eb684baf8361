#![forbid(unsafe_code)]

use super::framing::serve;
use crate::projects::ProjectRegistry;
use crate::{McpServer, RuntimeConfig, SessionLog};
use std::io::{BufReader, BufWriter};
use std::os::unix::net::{UnixListener, UnixStream};
use std::sync::Arc;
use std::thread;

/// Accepts connections on a unix socket. Every connection gets its own
/// protocol session; all of them share one project registry.
pub(crate) fn run_socket_daemon(
    config: &RuntimeConfig,
    projects: Arc<ProjectRegistry>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Another daemon already owns the socket.
    if UnixStream::connect(&config.socket_path).is_ok() {
        return Ok(());
    }
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
    if let Some(dir) = config.socket_path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }

    let listener = match UnixListener::bind(&config.socket_path) {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            if UnixStream::connect(&config.socket_path).is_ok() {
                return Ok(());
            }
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    let mut daemon_log = SessionLog::new(&config.storage_dir, "daemon");
    daemon_log.note_mode("daemon", &config.socket_path.to_string_lossy());

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(err) => {
                daemon_log.note_error(&format!("accept: {err}"));
                continue;
            }
        };
        let projects = Arc::clone(&projects);
        let default_project = config.default_project.clone();
        thread::spawn(move || {
            let mut server = McpServer::new(projects, default_project);
            let _ = handle_connection(stream, &mut server);
        });
    }

    Ok(())
}

fn handle_connection(
    stream: UnixStream,
    server: &mut McpServer,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);
    let mut session_log = SessionLog::disabled();
    serve(server, &mut reader, &mut writer, &mut session_log)
}
