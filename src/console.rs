//! Line input for the binaries.

use std::io::{BufRead, BufReader, Read};
use tokio::sync::mpsc;

use crate::hub::CommandRequest;

/// Reads `reader` line by line on a dedicated OS thread and forwards each
/// line. A blocking read on that thread never keeps the runtime alive; the
/// thread ends at EOF, on a read error, or once the receiver is dropped.
pub fn spawn_line_reader<R>(reader: R, capacity: usize) -> mpsc::Receiver<String>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);
    std::thread::spawn(move || {
        for line in BufReader::new(reader).lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// `<command> <json>`, e.g. `talktome {"name":"Dave"}`. Blank lines are
/// ignored; a command without a payload gets an empty one.
pub fn parse_command(line: &str) -> Option<CommandRequest> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (name, payload) = line.split_once(' ').unwrap_or((line, ""));
    Some(CommandRequest::new(name, payload.trim()))
}
