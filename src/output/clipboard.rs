// src/output/clipboard.rs
//! Clipboard delivery: arboard first, then the platform's copy command.

use crate::error::AppError;
use std::io::Write;
use std::process::{Command, Stdio};

/// Copies content to the system clipboard.
pub fn copy_to_clipboard(content: &str) -> Result<(), AppError> {
    log::debug!("Copying {} characters to clipboard", content.chars().count());

    match copy_with_arboard(content) {
        Ok(()) => {
            log::info!("Copied result to clipboard");
            return Ok(());
        }
        Err(e) => log::debug!("arboard unavailable ({}), trying a copy command", e),
    }

    let (program, args) = platform_command()?;
    pipe_to_command(program, args, content)
        .inspect(|_| log::info!("Copied result to clipboard with {}", program))
        .inspect_err(|e| log::error!("Failed to copy to clipboard: {}", e))
}

fn copy_with_arboard(content: &str) -> Result<(), AppError> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(content)?;
    Ok(())
}

#[cfg(target_os = "linux")]
fn platform_command() -> Result<(&'static str, &'static [&'static str]), AppError> {
    let is_wayland = std::env::var("WAYLAND_DISPLAY").is_ok()
        || std::env::var("XDG_SESSION_TYPE").is_ok_and(|s| s == "wayland");
    if is_wayland {
        Ok(("wl-copy", &[]))
    } else {
        Ok(("xclip", &["-selection", "clipboard"]))
    }
}

#[cfg(target_os = "macos")]
fn platform_command() -> Result<(&'static str, &'static [&'static str]), AppError> {
    Ok(("pbcopy", &[]))
}

#[cfg(target_os = "windows")]
fn platform_command() -> Result<(&'static str, &'static [&'static str]), AppError> {
    Ok(("clip", &[]))
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_command() -> Result<(&'static str, &'static [&'static str]), AppError> {
    Err(AppError::Clipboard(
        "Clipboard not supported on this platform".to_string(),
    ))
}

/// Writes `content` to the stdin of `program` and waits for it to exit.
fn pipe_to_command(program: &str, args: &[&str], content: &str) -> Result<(), AppError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| AppError::Clipboard(format!("Failed to spawn {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(content.as_bytes())
            .map_err(|e| AppError::Clipboard(format!("Failed to write to {}: {}", program, e)))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| AppError::Clipboard(format!("Failed to wait for {}: {}", program, e)))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(AppError::Clipboard(format!(
            "{} failed: {}",
            program,
            stderr.trim()
        )))
    }
}
