#![forbid(unsafe_code)]

use crate::{JsonRpcRequest, McpServer, SessionLog, json_rpc_error};
use serde_json::Value;
use std::io::{BufRead, Write};

const MAX_CONTENT_LENGTH_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransportMode {
    NewlineJson,
    ContentLength,
}

impl TransportMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::NewlineJson => "newline_json",
            Self::ContentLength => "content_length",
        }
    }
}

pub(crate) fn detect_mode_from_first_line(line: &str) -> Option<TransportMode> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Some(TransportMode::NewlineJson);
    }
    // Some clients send Content-Type first; any plausible header line means header mode.
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("content-length:") || lower.starts_with("content-type:") {
        return Some(TransportMode::ContentLength);
    }
    None
}

pub(crate) fn parse_content_length_header(line: &str) -> Option<usize> {
    let (key, value) = line.trim().split_once(':')?;
    if !key.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse::<usize>().ok()
}

/// Reads one header block plus body. `Ok(None)` on EOF, including EOF mid-header.
pub(crate) fn read_content_length_frame<R: BufRead>(
    reader: &mut R,
    first_header: Option<String>,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut header = match first_header {
        Some(seed) => seed,
        None => {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            line
        }
    };

    let mut content_length = parse_content_length_header(&header);
    while !header.trim_end().is_empty() {
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            return Ok(None);
        }
        if content_length.is_none() {
            content_length = parse_content_length_header(&header);
        }
    }

    let Some(len) = content_length else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Missing Content-Length header",
        ));
    };
    if len > MAX_CONTENT_LENGTH_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Content-Length exceeds max allowed size",
        ));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}

pub(crate) fn write_response<W: Write>(
    writer: &mut W,
    mode: TransportMode,
    resp: &Value,
) -> Result<(), Box<dyn std::error::Error>> {
    match mode {
        TransportMode::NewlineJson => {
            writeln!(writer, "{}", serde_json::to_string(resp)?)?;
        }
        TransportMode::ContentLength => {
            let body = serde_json::to_vec(resp)?;
            write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
            writer.write_all(&body)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Parses a raw JSON-RPC body; the error side is a ready-to-send error response.
pub(crate) fn parse_request(body: &[u8]) -> Result<JsonRpcRequest, Value> {
    let data: Value = serde_json::from_slice(body)
        .map_err(|e| json_rpc_error(None, -32700, &format!("Parse error: {e}")))?;

    let (id, has_method) = match data.as_object() {
        Some(obj) => (obj.get("id").cloned(), obj.contains_key("method")),
        None => return Err(json_rpc_error(None, -32600, "Invalid Request")),
    };
    if !has_method {
        return Err(json_rpc_error(id, -32600, "Invalid Request"));
    }

    serde_json::from_value::<JsonRpcRequest>(data)
        .map_err(|e| json_rpc_error(id, -32600, &format!("Invalid Request: {e}")))
}

/// Serves one transport until EOF. Framing is detected once from the first
/// non-empty line and every response uses the same framing.
pub(crate) fn serve<R: BufRead, W: Write>(
    server: &mut McpServer,
    reader: &mut R,
    writer: &mut W,
    session_log: &mut SessionLog,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mode: Option<TransportMode> = None;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }

        let current = match mode {
            Some(current) => current,
            None => {
                let Some(detected) = detect_mode_from_first_line(&line) else {
                    continue;
                };
                session_log.note_mode(detected.as_str(), &line);
                mode = Some(detected);
                detected
            }
        };

        let body = match current {
            TransportMode::NewlineJson => {
                let raw = line.trim();
                if raw.is_empty() {
                    continue;
                }
                raw.as_bytes().to_vec()
            }
            TransportMode::ContentLength => {
                if line.trim().is_empty() {
                    continue;
                }
                match read_content_length_frame(reader, Some(line)) {
                    Ok(Some(body)) => body,
                    Ok(None) => break,
                    Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
                    Err(err) => {
                        // A bad frame drops that frame only; the session and its graphs stay.
                        session_log.note_error(&format!("frame: {err}"));
                        let resp = json_rpc_error(None, -32600, &format!("Invalid Request: {err}"));
                        write_response(writer, current, &resp)?;
                        continue;
                    }
                }
            }
        };

        let response = match parse_request(&body) {
            Ok(request) => {
                session_log.note_method(&request.method);
                server.handle(request)
            }
            Err(err) => {
                let message = err
                    .get("error")
                    .and_then(|v| v.get("message"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("invalid request");
                session_log.note_error(message);
                Some(err)
            }
        };

        if let Some(resp) = response {
            write_response(writer, current, &resp)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn detects_framing_from_first_line() {
        assert_eq!(
            detect_mode_from_first_line("  {\"jsonrpc\":\"2.0\"}"),
            Some(TransportMode::NewlineJson)
        );
        assert_eq!(
            detect_mode_from_first_line("Content-Length: 12\r\n"),
            Some(TransportMode::ContentLength)
        );
        assert_eq!(
            detect_mode_from_first_line("content-type: application/json\r\n"),
            Some(TransportMode::ContentLength)
        );
        assert_eq!(detect_mode_from_first_line("\r\n"), None);
        assert_eq!(detect_mode_from_first_line("hello"), None);
    }

    #[test]
    fn reads_frame_with_extra_headers() {
        let body = "{\"method\":\"ping\"}";
        let raw = format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        );
        let mut reader = Cursor::new(raw.into_bytes());
        let frame = read_content_length_frame(&mut reader, None).unwrap().unwrap();
        assert_eq!(frame, body.as_bytes());
        assert!(read_content_length_frame(&mut reader, None).unwrap().is_none());
    }

    #[test]
    fn missing_length_is_invalid_data() {
        let mut reader = Cursor::new(b"Content-Type: x\r\n\r\n{}".to_vec());
        let err = read_content_length_frame(&mut reader, None).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn parse_request_maps_errors_to_json_rpc_codes() {
        let err = parse_request(b"{not json").unwrap_err();
        assert_eq!(err["error"]["code"], -32700);

        let err = parse_request(b"[1,2]").unwrap_err();
        assert_eq!(err["error"]["code"], -32600);

        let err = parse_request(b"{\"id\":7}").unwrap_err();
        assert_eq!(err["error"]["code"], -32600);
        assert_eq!(err["id"], 7);

        let request = parse_request(b"{\"id\":1,\"method\":\"ping\"}").unwrap();
        assert_eq!(request.method, "ping");
    }

    fn framed(value: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{value}", value.len())
    }

    #[test]
    fn bad_frames_are_answered_and_the_session_continues() {
        use crate::projects::ProjectRegistry;
        use std::sync::Arc;

        let mut input = String::from("Content-Length: 99999999999\r\n\r\n");
        input.push_str("Content-Type: application/json\r\n\r\n");
        input.push_str(&framed("{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"initialize\"}"));

        let mut server = McpServer::new(Arc::new(ProjectRegistry::default()), None);
        let mut reader = Cursor::new(input.into_bytes());
        let mut output = Vec::new();
        let mut log = SessionLog::disabled();
        serve(&mut server, &mut reader, &mut output, &mut log).unwrap();

        let mut replies = Cursor::new(output);
        let mut next = || {
            let body = read_content_length_frame(&mut replies, None).unwrap().unwrap();
            serde_json::from_slice::<Value>(&body).unwrap()
        };
        let oversized = next();
        assert_eq!(oversized["error"]["code"], -32600);
        let missing_length = next();
        assert_eq!(missing_length["error"]["code"], -32600);
        let init = next();
        assert_eq!(init["id"], 3);
        assert!(init.get("result").is_some());
    }
}
