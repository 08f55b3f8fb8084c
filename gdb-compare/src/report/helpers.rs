//! Helpers shared by the exporters

use std::path::Path;

/// Open a file with the platform default application. Failures are ignored.
pub fn try_open_file(path: &Path) {
    log::debug!("Opening {}", path.display());

    #[cfg(target_os = "windows")]
    {
        let _ = std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .spawn();
    }

    #[cfg(target_os = "macos")]
    {
        let _ = std::process::Command::new("open").arg(path).spawn();
    }

    #[cfg(target_os = "linux")]
    {
        let _ = std::process::Command::new("xdg-open").arg(path).spawn();
    }
}
