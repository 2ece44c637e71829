//! Best-effort launch of the system browser

use std::io;
use std::process::{Command, Stdio};

/// Program and leading arguments that open a URL on the current platform
fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "windows") {
        ("cmd", &["/c", "start"])
    } else if cfg!(target_os = "macos") {
        ("open", &[])
    } else {
        ("xdg-open", &[])
    }
}

/// Spawn the platform opener for `url` without waiting for it
pub fn open(url: &str) -> io::Result<()> {
    let (program, args) = opener();
    Command::new(program)
        .args(args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
