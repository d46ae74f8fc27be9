//! Export of keyword lists already returned by the backend.
//!
//! - **Clipboard**: the merged list joined with newlines.
//! - **CSV**: all three lists tagged by provenance, every keyword quoted,
//!   prefixed with a UTF-8 byte-order mark so spreadsheet tools pick the
//!   right encoding.
//!
//! Both are no-ops (`None`) when the relevant list is empty.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use url::Url;

use crate::model::{KeywordGroups, Provenance};

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV header row.
pub const CSV_HEADER: &str = "source,keyword";

/// Text placed on the clipboard: the merged list, one keyword per line.
pub fn clipboard_text(groups: &KeywordGroups) -> Option<String> {
    if groups.merged.is_empty() {
        return None;
    }
    Some(groups.merged.join("\n"))
}

/// CSV text without the byte-order mark (for printing to stdout).
pub fn keywords_csv_text(groups: &KeywordGroups) -> Option<String> {
    if groups.is_empty() {
        return None;
    }

    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for provenance in Provenance::ALL {
        for keyword in groups.get(provenance) {
            out.push_str(provenance.as_str());
            out.push(',');
            out.push_str(&quote(keyword));
            out.push('\n');
        }
    }
    Some(out)
}

/// CSV download bytes: BOM followed by [`keywords_csv_text`].
pub fn keywords_csv(groups: &KeywordGroups) -> Option<Vec<u8>> {
    let text = keywords_csv_text(groups)?;
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(text.as_bytes());
    Some(bytes)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Default download name for a page: `keywords-{host}.csv`.
pub fn csv_filename(page_url: &str) -> String {
    let host = Url::parse(page_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "export".to_string());

    let safe: String = host
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!("keywords-{safe}.csv")
}

/// Write CSV bytes for `groups` to `path`. Returns `Ok(None)` when there is
/// nothing to export.
pub fn write_csv(groups: &KeywordGroups, path: &Path) -> Result<Option<PathBuf>> {
    let Some(bytes) = keywords_csv(groups) else {
        return Ok(None);
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;

    Ok(Some(path.to_path_buf()))
}

/// Place `text` on the system clipboard using the platform's clipboard tool.
///
/// Tries `pbcopy` (macOS), `clip` (Windows), then `wl-copy`, `xclip` and
/// `xsel` (Linux) until one accepts the text.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }

    let mut last_err = None;
    for tool in clipboard_tools() {
        match pipe_to(tool.program, tool.args, text) {
            Ok(()) => {
                tracing::debug!(program = tool.program, "copied to clipboard");
                return Ok(());
            }
            Err(e) => last_err = Some(e),
        }
    }

    let err = last_err.unwrap_or_else(|| anyhow::anyhow!("no clipboard tool available"));
    Err(err.context("failed to copy to clipboard"))
}

struct ClipboardTool {
    program: &'static str,
    args: &'static [&'static str],
}

fn clipboard_tools() -> &'static [ClipboardTool] {
    #[cfg(target_os = "macos")]
    {
        &[ClipboardTool {
            program: "pbcopy",
            args: &[],
        }]
    }

    #[cfg(target_os = "windows")]
    {
        &[ClipboardTool {
            program: "clip",
            args: &[],
        }]
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            ClipboardTool {
                program: "wl-copy",
                args: &[],
            },
            ClipboardTool {
                program: "xclip",
                args: &["-selection", "clipboard"],
            },
            ClipboardTool {
                program: "xsel",
                args: &["--clipboard", "--input"],
            },
        ]
    }
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    child
        .stdin
        .take()
        .context("clipboard tool has no stdin")?
        .write_all(text.as_bytes())
        .with_context(|| format!("failed writing to {program}"))?;

    let status = child
        .wait()
        .with_context(|| format!("failed waiting for {program}"))?;
    if !status.success() {
        anyhow::bail!("{program} exited with {status}");
    }
    Ok(())
}
