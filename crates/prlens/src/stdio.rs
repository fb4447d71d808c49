//! JSON lines transport: one request per stdin line, one response per
//! stdout line.

use anyhow::{Context, Result};
use prlens_tools::{ToolError, ToolFacade, ToolResponse};
use serde::Deserialize;
use serde_json::Value;
use std::io::{BufRead, Write};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct StdioRequest {
    tool: String,
    #[serde(default)]
    arguments: Value,
}

/// Serve requests until `input` is exhausted. Returns the number of
/// responses written.
pub fn run<R: BufRead, W: Write>(
    facade: &ToolFacade,
    mut input: R,
    mut output: W,
) -> Result<usize> {
    let mut handled = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .context("Failed to read request line")?;
        if read == 0 {
            break;
        }
        if buf.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let response = handle_line(facade, &buf);
        serde_json::to_writer(&mut output, &response).context("Failed to write response")?;
        output.write_all(b"\n")?;
        output.flush()?;
        handled += 1;
    }

    debug!(handled, "stdin closed");
    Ok(handled)
}

/// Lines that are not UTF-8 fail to parse like any other malformed line.
fn handle_line(facade: &ToolFacade, line: &[u8]) -> ToolResponse {
    match serde_json::from_slice::<StdioRequest>(line) {
        Ok(request) => facade.invoke(&request.tool, &request.arguments),
        Err(e) => ToolResponse::failure(&ToolError::invalid(format!(
            "Malformed request line: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn facade_with_template() -> (TempDir, ToolFacade) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bugfix.md"), "# Bug Fix\n").unwrap();
        let facade = ToolFacade::new(dir.path(), dir.path());
        (dir, facade)
    }

    fn responses(output: Vec<u8>) -> Vec<Value> {
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_one_response_per_line() {
        let (_dir, facade) = facade_with_template();
        let input = concat!(
            r#"{"tool": "list_pr_templates"}"#,
            "\n\n",
            r#"{"tool": "get_pr_template", "arguments": {"identifier": "bugfix"}}"#,
            "\n",
        );
        let mut output = Vec::new();

        let handled = run(&facade, Cursor::new(input), &mut output).unwrap();
        assert_eq!(handled, 2);

        let lines = responses(output);
        assert_eq!(lines[0]["status"], "success");
        assert_eq!(lines[0]["data"][0]["identifier"], "bugfix");
        assert_eq!(lines[1]["data"]["body"], "# Bug Fix\n");
    }

    #[test]
    fn test_malformed_line_does_not_stop_loop() {
        let (_dir, facade) = facade_with_template();
        let input = "not json\n{\"arguments\": {}}\n{\"tool\": \"list_pr_templates\"}\n";
        let mut output = Vec::new();

        run(&facade, Cursor::new(input), &mut output).unwrap();

        let lines = responses(output);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["errorKind"], "InvalidArgumentsError");
        assert_eq!(lines[1]["errorKind"], "InvalidArgumentsError");
        assert_eq!(lines[2]["status"], "success");
    }

    #[test]
    fn test_invalid_utf8_line_gets_failure_response() {
        let (_dir, facade) = facade_with_template();
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"tool\": \"list_pr_templates\"}\n");
        input.extend_from_slice(b"\xff\xfe\n");
        input.extend_from_slice(b"{\"tool\": \"list_pr_templates\"}\r\n");
        let mut output = Vec::new();

        let handled = run(&facade, Cursor::new(input), &mut output).unwrap();
        assert_eq!(handled, 3);

        let lines = responses(output);
        assert_eq!(lines[0]["status"], "success");
        assert_eq!(lines[1]["errorKind"], "InvalidArgumentsError");
        assert_eq!(lines[2]["status"], "success");
    }
}
