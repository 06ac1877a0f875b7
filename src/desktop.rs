//! Hand-offs to the host desktop: revealing a file in the file manager and
//! opening a catalog link in the browser.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum RevealError {
    #[error("File does not exist:\n{}", .0.display())]
    Missing(PathBuf),

    #[error("Unable to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Program and arguments that show `path` in the platform file manager.
///
/// Windows selects the file, macOS reveals it, everything else opens the
/// containing folder.
pub fn reveal_command(path: &Path) -> (String, Vec<String>) {
    if cfg!(target_os = "windows") {
        (
            "explorer".to_string(),
            vec![format!("/select,{}", path.display())],
        )
    } else if cfg!(target_os = "macos") {
        (
            "open".to_string(),
            vec!["-R".to_string(), path.display().to_string()],
        )
    } else {
        let folder = path.parent().unwrap_or(path);
        ("xdg-open".to_string(), vec![folder.display().to_string()])
    }
}

/// Program and arguments that open `url` in the default browser.
pub fn open_link_command(url: &str) -> (String, Vec<String>) {
    if cfg!(target_os = "windows") {
        (
            "cmd".to_string(),
            vec!["/C".into(), "start".into(), String::new(), url.to_string()],
        )
    } else if cfg!(target_os = "macos") {
        ("open".to_string(), vec![url.to_string()])
    } else {
        ("xdg-open".to_string(), vec![url.to_string()])
    }
}

pub fn reveal(path: &Path) -> Result<(), RevealError> {
    if !path.exists() {
        return Err(RevealError::Missing(path.to_path_buf()));
    }
    let (program, args) = reveal_command(path);
    spawn_detached(program, args)
}

pub fn open_link(url: &str) -> Result<(), RevealError> {
    let (program, args) = open_link_command(url);
    spawn_detached(program, args)
}

fn spawn_detached(program: String, args: Vec<String>) -> Result<(), RevealError> {
    debug!(%program, ?args, "spawning desktop helper");
    match Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(mut child) => {
            // Reap the child in a background thread to avoid zombie processes.
            thread::spawn(move || {
                if let Err(e) = child.wait() {
                    warn!(error = %e, "desktop helper did not exit cleanly");
                }
            });
            Ok(())
        }
        Err(source) => Err(RevealError::Spawn { program, source }),
    }
}
