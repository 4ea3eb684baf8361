#![forbid(unsafe_code)]

use super::framing::serve;
use crate::{McpServer, SessionLog};
use std::io::BufReader;

pub(crate) fn run_stdio(
    server: &mut McpServer,
    session_log: &mut SessionLog,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();
    serve(server, &mut reader, &mut stdout, session_log)
}
