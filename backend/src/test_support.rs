//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! The backend avoids direct `std::fs` calls. These helpers wrap
    //! `cap_std::fs::Dir` so test suites can inspect workspaces the same way.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Read a UTF-8 text file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use virusdecode::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let path = std::env::temp_dir().join("cap-fs-read-example.txt");
    /// write_file(&path, b"hello\n")?;
    ///
    /// let content = read_file_to_string(&path)?;
    /// assert_eq!(content, "hello\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read_to_string(Path::new(&file_name))
    }

    /// Write bytes to a file through `cap_std`.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    /// Return true when `path` exists, false when it does not.
    pub fn path_exists(path: &Path) -> bool {
        let Ok((parent, file_name)) = parent_and_file_name(path) else {
            return false;
        };
        let Ok(directory) = Dir::open_ambient_dir(parent, ambient_authority()) else {
            return false;
        };
        directory.exists(Path::new(&file_name))
    }

    /// Count the entries directly below `path`; a missing directory has none.
    pub fn entry_count(path: &Path) -> io::Result<usize> {
        let directory = match Dir::open_ambient_dir(path, ambient_authority()) {
            Ok(directory) => directory,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(error) => return Err(error),
        };
        let mut count = 0;
        for entry in directory.entries()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod analysis_script {
    //! A POSIX shell stand-in for the analysis script.
    //!
    //! Behaviour by mode:
    //! - `1 <id>`: `NC_045512` yields metadata, `BROKEN` writes invalid JSON,
    //!   `SLOW` sleeps for five seconds, anything else writes `{}`.
    //! - `2 <file> [reference]`: echoes the input file (newlines removed) as
    //!   `{"input": ...}`, adding `"reference"` when one is passed. Inputs
    //!   containing `FAIL` exit with status 1 and inputs containing `NODATA`
    //!   write nothing.
    //! - any other mode exits with status 3.

    use std::io;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    use super::cap_fs::write_file;

    /// Interpreter used to run [`STUB_SCRIPT`].
    pub const STUB_INTERPRETER: &str = "sh";

    /// Reference id the stub knows about.
    pub const KNOWN_REFERENCE: &str = "NC_045512";

    pub const STUB_SCRIPT: &str = r#"#!/bin/sh
mode="$1"
shift
case "$mode" in
  1)
    case "$1" in
      NC_045512)
        printf '{"sequence_id":"%s","organism":"Severe acute respiratory syndrome coronavirus 2","length":29903}' "$1" > metadata.json
        ;;
      BROKEN)
        printf 'not json' > metadata.json
        ;;
      SLOW)
        sleep 5
        printf '{}' > metadata.json
        ;;
      *)
        printf '{}' > metadata.json
        ;;
    esac
    ;;
  2)
    content=$(tr -d '\n' < "$1")
    case "$content" in
      *FAIL*)
        echo "alignment failed for $1" >&2
        exit 1
        ;;
      *NODATA*)
        exit 0
        ;;
    esac
    if [ -n "$2" ]; then
      printf '{"input":"%s","reference":"%s"}' "$content" "$2" > alignment_data.json
    else
      printf '{"input":"%s"}' "$content" > alignment_data.json
    fi
    ;;
  *)
    echo "unsupported mode $mode" >&2
    exit 3
    ;;
esac
"#;

    /// Stub script written into its own temporary directory.
    pub struct StubScript {
        dir: TempDir,
        path: PathBuf,
    }

    impl StubScript {
        /// Write [`STUB_SCRIPT`] into a fresh temporary directory.
        pub fn write() -> io::Result<Self> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("analysis.sh");
            write_file(&path, STUB_SCRIPT.as_bytes())?;
            Ok(Self { dir, path })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Scratch directory that outlives the script; handy as a workspace
        /// root.
        pub fn scratch_dir(&self) -> PathBuf {
            self.dir.path().join("workspaces")
        }
    }
}
