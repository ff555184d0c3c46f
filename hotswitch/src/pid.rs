use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;

const PID_FILE_PATH: &str = "/tmp/hotswitch.pid";

/// Single-instance guard. The file holds the daemon's pid and is removed
/// when the guard is dropped.
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn acquire() -> Result<Self> {
        Self::acquire_at(Path::new(PID_FILE_PATH))
    }

    pub fn acquire_at(path: &Path) -> Result<Self> {
        if let Some(pid) = read_pid(path) {
            if is_process_running(pid) && pid != std::process::id() as i32 {
                bail!("hotswitch is already running (pid {})", pid);
            }
            tracing::warn!("Removing stale pid file for pid {}", pid);
        }

        fs::write(path, std::process::id().to_string())
            .with_context(|| format!("Failed to write pid file {:?}", path))?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn read_pid(path: &Path) -> Option<i32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Signal 0 probes for existence; EPERM means it exists but belongs to
/// someone else.
fn is_process_running(pid: i32) -> bool {
    if pid <= 0 {
        return false;
    }
    matches!(kill(Pid::from_raw(pid), None), Ok(()) | Err(Errno::EPERM))
}
