//! Launching the external segmentation tool.
//!
//! The tool runs as `<executable> -macro <macro> <data>` and fills the
//! recording's outline directory with frame masks. We only wait for it:
//! it gets `timeout` to exit on its own and is killed afterwards.

use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;

use crate::config::SegmentationConfig;
use crate::error::ShapeError;

/// Run the tool on `data_path` and block until it exits or is killed.
///
/// A killed tool yields `ExternalToolTimeout`; whatever it wrote before
/// being killed stays on disk. A nonzero exit status is logged, not
/// treated as failure: the frames on disk are what counts.
pub fn run(config: &SegmentationConfig, data_path: &Path) -> Result<(), ShapeError> {
    let tool = config.executable.display().to_string();
    let mut child = Command::new(&config.executable)
        .arg("-macro")
        .arg(&config.macro_path)
        .arg(data_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ShapeError::ExternalTool(format!("{}: {}", tool, e)))?;

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            if !status.success() {
                log::warn!("  Segment     {} exited with {}", tool, status);
            }
            log::debug!("  Segment     done in {}ms", started.elapsed().as_millis());
            return Ok(());
        }
        let elapsed = started.elapsed();
        if elapsed >= config.timeout {
            break;
        }
        thread::sleep(config.poll_interval.min(config.timeout - elapsed));
    }

    log::warn!("  Segment     timeout, killing {}", tool);
    // The child may exit between the last poll and the kill.
    if let Err(e) = child.kill() {
        log::debug!("  Segment     kill: {}", e);
    }
    child.wait()?;
    Err(ShapeError::ExternalToolTimeout {
        tool,
        seconds: config.timeout.as_secs(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::time::Duration;

    fn script(name: &str, body: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("outline-shape-segment-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn config(exe: PathBuf, timeout_ms: u64) -> SegmentationConfig {
        let mut config = SegmentationConfig::new(exe, "Extract.ijm");
        config.timeout = Duration::from_millis(timeout_ms);
        config.poll_interval = Duration::from_millis(20);
        config
    }

    #[test]
    fn quick_tool_finishes() {
        let exe = script("quick.sh", "exit 0");
        run(&config(exe, 5_000), Path::new("/tmp/data")).unwrap();
    }

    #[test]
    fn slow_tool_is_killed() {
        let exe = script("slow.sh", "sleep 30");
        let started = Instant::now();
        let err = run(&config(exe, 200), Path::new("/tmp/data")).unwrap_err();
        assert!(matches!(err, ShapeError::ExternalToolTimeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn missing_tool_is_reported() {
        let exe = PathBuf::from("/nonexistent/imagej");
        let err = run(&config(exe, 200), Path::new("/tmp/data")).unwrap_err();
        assert!(matches!(err, ShapeError::ExternalTool(_)));
    }
}
