//! Whole-file read and write used by the session manager.

use std::fs::{File, OpenOptions};
use std::io::{self, prelude::*, BufWriter};
use std::path::Path;

/// Size of each growth step while reading a file.
pub const READ_CHUNK: usize = 512;

/// Reads the entire file as raw bytes.
///
/// The buffer grows by `READ_CHUNK` bytes at a time and is trimmed to the
/// number of bytes actually read. An empty file yields an empty vector.
pub fn read_whole_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<u8>> {
    let mut the_file = File::open(&path)?;

    let mut data = Vec::new();
    let mut offset = 0;

    loop {
        data.resize(offset + READ_CHUNK, 0);
        let read_len = match the_file.read(&mut data[offset..]) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        offset += read_len;
        if read_len == 0 {
            break;
        }
    }

    data.truncate(offset);
    Ok(data)
}

/// Writes `text` followed by exactly one newline, replacing any existing
/// content at `path`.
pub fn write_whole_file<P: AsRef<Path>>(path: P, text: &str) -> io::Result<()> {
    let the_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)?;

    let mut out = BufWriter::new(the_file);
    out.write_all(text.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_files_larger_than_one_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        let content: Vec<u8> = (0..READ_CHUNK * 3 + 17).map(|i| b'a' + (i % 26) as u8).collect();
        fs::write(&path, &content).unwrap();

        assert_eq!(read_whole_file(&path).unwrap(), content);
    }

    #[test]
    fn reads_exact_chunk_multiple() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exact.txt");
        let content = vec![b'x'; READ_CHUNK * 2];
        fs::write(&path, &content).unwrap();

        assert_eq!(read_whole_file(&path).unwrap().len(), READ_CHUNK * 2);
    }

    #[test]
    fn empty_file_is_empty_vec() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, b"").unwrap();

        assert!(read_whole_file(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_whole_file(dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn write_appends_one_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        for content in ["", "hello", "hello\n", "a\r\nb"] {
            write_whole_file(&path, content).unwrap();
            assert_eq!(fs::read(&path).unwrap(), format!("{}\n", content).into_bytes());
        }
    }

    #[test]
    fn write_truncates_longer_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "a much longer previous content").unwrap();

        write_whole_file(&path, "short").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(write_whole_file(&path, "x").is_err());
    }
}
