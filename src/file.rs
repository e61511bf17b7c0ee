// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

/// Errors raised while reading input or writing results.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("File is not valid UTF-8: {}", .0.display())]
    NotUtf8(PathBuf),

    #[error("Error accessing file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads a whole UTF-8 file.
pub fn read_to_string(path: &Path) -> Result<String, FileError> {
    info!(path = path.display().to_string(), "Attempting to read file.");

    if !path.exists() {
        return Err(log_error(FileError::NotFound(path.to_path_buf())));
    }
    if !path.is_file() {
        return Err(log_error(FileError::NotAFile(path.to_path_buf())));
    }

    let bytes = fs::read(path).map_err(|source| {
        log_error(FileError::Io {
            path: path.to_path_buf(),
            source,
        })
    })?;
    let content = String::from_utf8(bytes)
        .map_err(|_| log_error(FileError::NotUtf8(path.to_path_buf())))?;

    debug!(
        path = path.display().to_string(),
        characters = content.chars().count(),
        "Successfully read file."
    );
    Ok(content)
}

/// Writes the content to the path, creating any missing parent directories.
pub fn write(path: &Path, content: &str) -> Result<(), FileError> {
    info!(path = path.display().to_string(), "Attempting to write to file.");

    let io_error = |source| {
        log_error(FileError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, content).map_err(io_error)?;

    debug!(
        path = path.display().to_string(),
        characters = content.chars().count(),
        "Successfully wrote file."
    );
    Ok(())
}

fn log_error(err: FileError) -> FileError {
    error!(err = %err, "File operation failed.");
    err
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_write_and_read() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let path = tempdir.path().join("test.txt");

        write(&path, "Hello, 世界!")?;
        assert_eq!(read_to_string(&path)?, "Hello, 世界!");
        Ok(())
    }

    #[test]
    fn test_write_creates_directories() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let path = tempdir.path().join("subdir").join("nested").join("test.txt");

        write(&path, "... --- ...")?;
        assert_eq!(fs::read_to_string(&path)?, "... --- ...");
        Ok(())
    }

    #[test]
    fn test_read_not_found() {
        let err = read_to_string(Path::new("non_existent.txt")).unwrap_err();
        assert!(matches!(err, FileError::NotFound(_)));
        assert_eq!(err.to_string(), "File not found: non_existent.txt");
    }

    #[test]
    fn test_read_directory() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let err = read_to_string(tempdir.path()).unwrap_err();
        assert!(matches!(err, FileError::NotAFile(_)));
        Ok(())
    }

    #[test]
    fn test_read_invalid_utf8() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let path = tempdir.path().join("binary.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x41])?;

        assert!(matches!(
            read_to_string(&path),
            Err(FileError::NotUtf8(_))
        ));
        Ok(())
    }

    #[test]
    fn test_write_over_directory() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let err = write(tempdir.path(), "content").unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
        Ok(())
    }
}
