use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::debug;

use crate::error::Error;

/// Write `lines` to a freshly named `<dir>/<prefix>XXXXXX.sh`, one per line.
/// Nothing is created when there are no lines.
pub fn write_script(lines: &[String], dir: &Path, prefix: &str) -> Result<Option<PathBuf>, Error> {
    if lines.is_empty() {
        debug!("No actions to write");
        return Ok(None);
    }

    fs::create_dir_all(dir)?;
    let mut file = Builder::new()
        .prefix(prefix)
        .suffix(".sh")
        .rand_bytes(6)
        .tempfile_in(dir)?;

    for line in lines {
        writeln!(file, "{}", line)?;
    }
    file.flush()?;

    let (_, path) = file.keep().map_err(|err| err.error)?;
    debug!("Wrote {} commands to {}", lines.len(), path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_plan_writes_nothing() {
        let dir = tempdir().unwrap();
        let result = write_script(&[], dir.path(), "action-commands-").unwrap();
        assert!(result.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_writes_one_command_per_line() {
        let dir = tempdir().unwrap();
        let lines = vec!["echo one".to_string(), "echo two".to_string()];
        let path = write_script(&lines, dir.path(), "action-commands-")
            .unwrap()
            .unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("action-commands-"));
        assert!(name.ends_with(".sh"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "echo one\necho two\n");
    }

    #[test]
    fn test_each_run_gets_a_fresh_file() {
        let dir = tempdir().unwrap();
        let lines = vec!["echo one".to_string()];
        let first = write_script(&lines, dir.path(), "p-").unwrap().unwrap();
        let second = write_script(&lines, dir.path(), "p-").unwrap().unwrap();
        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }
}
