#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

pub(crate) struct Server {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    storage_dir: PathBuf,
    next_id: i64,
}

impl Server {
    pub(crate) fn start(test_name: &str) -> Self {
        Self::start_with_args(test_name, &[])
    }

    pub(crate) fn start_with_args(test_name: &str, extra_args: &[&str]) -> Self {
        let storage_dir = temp_dir(test_name);
        let mut child = Command::new(env!("CARGO_BIN_EXE_bg_mcp"))
            .arg("--storage-dir")
            .arg(&storage_dir)
            .args(extra_args)
            .env_remove("BEATGRAPH_PROJECT")
            .env_remove("BEATGRAPH_DAEMON")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .expect("spawn bg_mcp");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));

        Self {
            child,
            stdin,
            stdout,
            storage_dir,
            next_id: 100,
        }
    }

    pub(crate) fn start_initialized(test_name: &str) -> Self {
        let mut server = Self::start(test_name);
        server.initialize_default();
        server
    }

    pub(crate) fn start_initialized_with_args(test_name: &str, extra_args: &[&str]) -> Self {
        let mut server = Self::start_with_args(test_name, extra_args);
        server.initialize_default();
        server
    }

    pub(crate) fn storage_dir(&self) -> &PathBuf {
        &self.storage_dir
    }

    pub(crate) fn send(&mut self, req: Value) {
        writeln!(self.stdin, "{req}").expect("write request");
        self.stdin.flush().expect("flush request");
    }

    pub(crate) fn send_raw(&mut self, raw: &str) {
        writeln!(self.stdin, "{raw}").expect("write request");
        self.stdin.flush().expect("flush request");
    }

    pub(crate) fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout.read_line(&mut line).expect("read response");
        assert!(!line.trim().is_empty(), "empty response line");
        serde_json::from_str(&line).expect("parse response json")
    }

    pub(crate) fn request(&mut self, req: Value) -> Value {
        self.send(req);
        self.recv()
    }

    pub(crate) fn initialize_default(&mut self) {
        let _ = self.request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2024-11-05", "capabilities": {}, "clientInfo": { "name": "test", "version": "0" } }
        }));
        self.send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
            "params": {}
        }));
    }

    /// `tools/call` returning the parsed tool envelope.
    pub(crate) fn call_tool(&mut self, name: &str, arguments: Value) -> Value {
        self.next_id += 1;
        let resp = self.request(json!({
            "jsonrpc": "2.0",
            "id": self.next_id,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        }));
        extract_tool_text(&resp)
    }

    /// Like `call_tool`, asserting success and returning `result`.
    pub(crate) fn call_ok(&mut self, name: &str, arguments: Value) -> Value {
        let payload = self.call_tool(name, arguments);
        assert_eq!(
            payload.get("success").and_then(|v| v.as_bool()),
            Some(true),
            "{name} failed: {payload}"
        );
        payload.get("result").cloned().unwrap_or(Value::Null)
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.storage_dir);
    }
}

pub(crate) fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("bg_mcp_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub(crate) fn extract_tool_text(resp: &Value) -> Value {
    let text = resp
        .get("result")
        .and_then(|v| v.get("content"))
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("text"))
        .and_then(|v| v.as_str())
        .expect("result.content[0].text");
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

pub(crate) fn error_code(payload: &Value) -> Option<&str> {
    payload
        .get("error")
        .and_then(|v| v.get("code"))
        .and_then(|v| v.as_str())
}

pub(crate) fn assert_json_rpc_error(resp: &Value, expected_code: i64) {
    let code = resp
        .get("error")
        .and_then(|v| v.get("code"))
        .and_then(|v| v.as_i64())
        .expect("error.code");
    assert_eq!(code, expected_code);
}

pub(crate) fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_str().expect("string").to_string())
        .collect()
}

/// The four-beat story used across tool tests:
/// `A -> B` (required), `B -> C` (required), `A -> D` (suggested).
pub(crate) fn init_story(server: &mut Server, project: &str) -> Value {
    server.call_ok(
        "beats_init",
        json!({
            "project": project,
            "beats": [
                { "id": "A", "name": "Inciting incident", "order": 0 },
                { "id": "B", "name": "Refusal", "order": 1 },
                { "id": "C", "name": "Crossing", "order": 2 },
                { "id": "D", "name": "Mentor", "order": 3 }
            ],
            "dependencies": [
                { "id": "ab", "sourceId": "A", "targetId": "B" },
                { "id": "bc", "sourceId": "B", "targetId": "C", "strength": "required" },
                { "id": "ad", "sourceId": "A", "targetId": "D", "strength": "suggested" }
            ]
        }),
    )
}
