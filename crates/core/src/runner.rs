//! GitHub Actions runner integration.
//!
//! The runner communicates through environment files and stdout workflow
//! commands: appending a line to the file named by `GITHUB_PATH` prepends
//! that directory to the job's executable search path, and `::error::`
//! lines mark the job failed with a message.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Environment variable naming the search-path environment file.
pub const GITHUB_PATH: &str = "GITHUB_PATH";

/// Publish a directory to the job's executable search path.
///
/// Appends to the `GITHUB_PATH` environment file when the runner
/// provides one; outside a runner the path is only logged. Call this at
/// most once, after the install has fully succeeded - the search path
/// must stay untouched on failure.
pub fn add_path(dir: &Path) -> Result<()> {
    match std::env::var_os(GITHUB_PATH) {
        Some(file) if !file.is_empty() => {
            let mut handle = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&file)
                .map_err(|e| Error::env_file(e, Path::new(&file)))?;
            writeln!(handle, "{}", dir.display())
                .map_err(|e| Error::env_file(e, Path::new(&file)))?;
            info!(path = %dir.display(), "added install directory to the search path");
        }
        _ => {
            info!(
                path = %dir.display(),
                "GITHUB_PATH is not set; skipping search-path registration"
            );
        }
    }
    Ok(())
}

/// Signal job failure with a human-readable message.
///
/// Emits the `::error::` workflow command. The caller still decides the
/// process exit code.
// Workflow commands are consumed from stdout by the runner, so printing
// here is intentional.
#[allow(clippy::print_stdout)]
pub fn report_failure(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Escape message data for a workflow command.
///
/// Percent first, then the line breaks, per the runner's command syntax.
fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn escapes_command_data() {
        assert_eq!(escape_data("plain message"), "plain message");
        assert_eq!(escape_data("100% broken"), "100%25 broken");
        assert_eq!(escape_data("line1\nline2"), "line1%0Aline2");
        assert_eq!(escape_data("a\r\nb"), "a%0D%0Ab");
        // Percent escaping must not double-escape the inserted sequences.
        assert_eq!(escape_data("%0A"), "%250A");
    }

    #[test]
    fn appends_to_path_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("github_path");
        fs::write(&path_file, "/existing/entry\n").unwrap();

        temp_env::with_var(GITHUB_PATH, Some(&path_file), || {
            add_path(Path::new("/opt/hostedtoolcache/gyro/bin")).unwrap();
        });

        let contents = fs::read_to_string(&path_file).unwrap();
        assert_eq!(
            contents,
            "/existing/entry\n/opt/hostedtoolcache/gyro/bin\n"
        );
    }

    #[test]
    fn creates_path_file_when_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("github_path");

        temp_env::with_var(GITHUB_PATH, Some(&path_file), || {
            add_path(Path::new("/tools/bin")).unwrap();
        });

        assert_eq!(fs::read_to_string(&path_file).unwrap(), "/tools/bin\n");
    }

    #[test]
    fn no_op_outside_a_runner() {
        temp_env::with_var(GITHUB_PATH, None::<&str>, || {
            // Nothing to assert beyond "does not fail".
            add_path(Path::new("/tools/bin")).unwrap();
        });
    }
}
