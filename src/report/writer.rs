//! Result persistence.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use super::IterationResult;
use crate::error::{Result, RootError};

/// Default directory results are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Extension of result files.
pub const FILE_EXTENSION: &str = "csv";

/// Path the result of `result`'s method is written to inside `dir`.
pub fn result_path(dir: &Path, result: &IterationResult) -> PathBuf {
    dir.join(format!("{}.{}", result.method().file_name(), FILE_EXTENSION))
}

/// Write the table of `result` into `dir`, creating the directory if needed.
///
/// Returns the path of the written file.
pub fn write_result(result: &IterationResult, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| RootError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })?;

    let path = result_path(dir, result);
    fs::write(&path, result.to_string()).map_err(|e| RootError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    info!(method = %result.method(), path = %path.display(), "result written");
    Ok(path)
}

/// Subfolder of `dir` named after the current local time, used when several
/// methods are written together.
pub fn timestamped_dir(dir: &Path) -> PathBuf {
    dir.join(Local::now().format("%Y-%m-%d_%H-%M-%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Fx;
    use crate::solver::{Method, TerminationCause};

    fn empty_result(method: Method) -> IterationResult {
        IterationResult::new(
            method,
            Fx::parse("x").unwrap(),
            None,
            vec![],
            TerminationCause::MaxIterationsReached,
        )
    }

    #[test]
    fn test_write_creates_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("out");
        let result = empty_result(Method::NewtonRaphson);

        let path = write_result(&result, &dir).unwrap();
        assert_eq!(path, dir.join("newton_raphson.csv"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("i, xOld, fxOld, fPrimeXOld, xNew, error\n"));
        assert!(content.trim_end().ends_with(TerminationCause::MaxIterationsReached.message()));
    }

    #[test]
    fn test_timestamped_dir_is_child() {
        let base = Path::new("output");
        let dir = timestamped_dir(base);
        assert_eq!(dir.parent(), Some(base));
    }
}
