use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value as JSValue;
use snafu::prelude::*;

use crate::survey::*;

pub fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// Relative paths are taken from `root` when there is one.
pub fn resolve_path(root: Option<&Path>, path: &str) -> PathBuf {
    let p = Path::new(path);
    match root {
        Some(r) if p.is_relative() => r.join(p),
        _ => p.to_path_buf(),
    }
}

/// Writes a page in JSON format to the given file, or to the standard output.
pub fn write_output(out: &Option<String>, page: &JSValue) -> BSurveyResult<()> {
    let pretty = serde_json::to_string_pretty(page).context(ParsingJsonSnafu {
        path: out.clone().unwrap_or_else(|| "stdout".to_string()),
    })?;
    match out {
        Some(path) => {
            debug!("write_output: writing {} bytes to {}", pretty.len(), path);
            fs::write(path, pretty).context(FileIoSnafu { path: path.clone() })?;
        }
        None => println!("{}", pretty),
    }
    Ok(())
}
