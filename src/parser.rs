use csv::{ErrorKind, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::Error;
use crate::record::{FileRecord, NamingRules};

const FIELD_COUNT: usize = 5;

/// Reads snapshot files of `parentFolder|filename|size|contentId|fullPath` lines.
///
/// A snapshot is loaded all-or-nothing: the first malformed line rejects it.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    separator: u8,
    rules: NamingRules,
}

impl SnapshotReader {
    pub fn new(separator: u8, rules: NamingRules) -> Self {
        Self { separator, rules }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Ok(Self::new(config.separator_byte()?, config.naming_rules()))
    }

    pub fn read_path(&self, path: &Path) -> Result<Vec<FileRecord>, Error> {
        let file = File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::SnapshotNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::SnapshotRead {
                path: path.to_path_buf(),
                source: err,
            },
        })?;

        let records = self.read_from(file, path)?;
        debug!("Parsed {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Parse snapshot lines from `reader`. `origin` names the snapshot in errors.
    pub fn read_from<R: Read>(&self, mut reader: R, origin: &Path) -> Result<Vec<FileRecord>, Error> {
        let mut input = Vec::new();
        reader
            .read_to_end(&mut input)
            .map_err(|source| Error::SnapshotRead {
                path: origin.to_path_buf(),
                source,
            })?;

        // The csv reader skips empty lines; a blank line is a one-field record.
        if let Some(line) = first_blank_line(&input) {
            return Err(Error::MalformedRecord {
                path: origin.to_path_buf(),
                line,
                reason: format!("expected {} fields, found 1", FIELD_COUNT),
            });
        }

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.separator)
            .quoting(false)
            .flexible(true)
            .from_reader(input.as_slice());

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let row = result.map_err(|err| csv_error(err, origin))?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            records.push(self.parse_row(&row, origin, line)?);
        }

        Ok(records)
    }

    fn parse_row(&self, row: &StringRecord, origin: &Path, line: u64) -> Result<FileRecord, Error> {
        let malformed = |reason: String| Error::MalformedRecord {
            path: origin.to_path_buf(),
            line,
            reason,
        };

        if row.len() != FIELD_COUNT {
            return Err(malformed(format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                row.len()
            )));
        }

        let size_field = &row[2];
        let size_bytes: u64 = size_field
            .parse()
            .map_err(|_| malformed(format!("invalid size '{}'", size_field)))?;

        Ok(FileRecord::new(
            &row[0],
            &row[1],
            size_bytes,
            &row[3],
            row[4].trim_end(),
            &self.rules,
        ))
    }
}

/// 1-based number of the first empty line, not counting the text after the
/// final line terminator.
fn first_blank_line(input: &[u8]) -> Option<u64> {
    let segments: Vec<&[u8]> = input.split(|&b| b == b'\n').collect();
    let last = segments.len() - 1;
    segments
        .iter()
        .take(last)
        .position(|segment| matches!(segment, [] | [b'\r']))
        .map(|index| index as u64 + 1)
}

fn csv_error(err: csv::Error, origin: &Path) -> Error {
    let path: PathBuf = origin.to_path_buf();
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    match err.into_kind() {
        ErrorKind::Io(source) => Error::SnapshotRead { path, source },
        ErrorKind::Utf8 { err, .. } => Error::MalformedRecord {
            path,
            line,
            reason: format!("invalid UTF-8: {}", err),
        },
        other => Error::MalformedRecord {
            path,
            line,
            reason: format!("{:?}", other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NamingConfig;
    use std::fs;
    use tempfile::tempdir;

    fn reader() -> SnapshotReader {
        let naming = NamingConfig::default();
        SnapshotReader::new(b'|', NamingRules::new(naming.rewrites, naming.collapse_subfolders))
    }

    fn parse(input: &str) -> Result<Vec<FileRecord>, Error> {
        reader().read_from(input.as_bytes(), Path::new("snapshot.txt"))
    }

    #[test]
    fn test_parse_valid_lines() {
        let records = parse(
            "2023-05|a_HEVC.MOV|100|u1|/src/2023-05/a_HEVC.MOV\n\
             live|b.mov|200|u2|/src/2023-05/live/b.mov\n",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].parent_folder_key(), "2023-05");
        assert_eq!(records[0].filename(), "a_HEVC.MOV");
        assert_eq!(records[0].canonical_name(), "a.MP4");
        assert_eq!(records[0].size_bytes(), 100);
        assert_eq!(records[0].content_id(), "u1");
        assert_eq!(records[1].parent_folder_key(), "2023-05/live");
    }

    #[test]
    fn test_trailing_whitespace_trimmed_from_path_only() {
        let records = parse(" A |x.mov |1| u1 |/src/A/x.mov  \r\n").unwrap();
        assert_eq!(records[0].full_path(), "/src/A/x.mov");
        assert_eq!(records[0].parent_folder_key(), " A ");
        assert_eq!(records[0].filename(), "x.mov ");
        assert_eq!(records[0].content_id(), " u1 ");
    }

    #[test]
    fn test_quotes_are_literal() {
        let records = parse("A|\"quoted\".mov|1|u1|/src/A/\"quoted\".mov\n").unwrap();
        assert_eq!(records[0].filename(), "\"quoted\".mov");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_final_line_without_terminator() {
        let records = parse("A|x.mov|1|u1|/s/A/x.mov\nA|y.mov|2|u2|/s/A/y.mov").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_blank_line_rejects_snapshot() {
        match parse("A|x.mov|1|u1|/s/A/x.mov\n\nA|y.mov|2|u2|/s/A/y.mov\n") {
            Err(Error::MalformedRecord { line, reason, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(reason, "expected 5 fields, found 1");
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_blank_line_rejects_snapshot() {
        assert!(matches!(
            parse("A|x.mov|1|u1|/s/A/x.mov\n\n"),
            Err(Error::MalformedRecord { line: 2, .. })
        ));
        assert!(matches!(
            parse("A|x.mov|1|u1|/s/A/x.mov\r\n\r\nA|y.mov|2|u2|/s/A/y.mov\r\n"),
            Err(Error::MalformedRecord { line: 2, .. })
        ));
        assert!(matches!(
            parse("\nA|x.mov|1|u1|/s/A/x.mov\n"),
            Err(Error::MalformedRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_wrong_field_count_rejects_snapshot() {
        let result = parse("A|x.mov|1|u1|/src/A/x.mov\nA|y.mov|2|/src/A/y.mov\n");
        match result {
            Err(Error::MalformedRecord { line, reason, .. }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("found 4"));
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_separator_rejects_snapshot() {
        assert!(matches!(
            parse("A|x|y.mov|1|u1|/src/A/x|y.mov\n"),
            Err(Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_invalid_size_rejects_snapshot() {
        assert!(matches!(
            parse("A|x.mov|-5|u1|/src/A/x.mov\n"),
            Err(Error::MalformedRecord { line: 1, .. })
        ));
        assert!(matches!(
            parse("A|x.mov|big|u1|/src/A/x.mov\n"),
            Err(Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_snapshot_not_found() {
        let dir = tempdir().unwrap();
        let result = reader().read_path(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(Error::SnapshotNotFound { .. })));
    }

    #[test]
    fn test_read_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("source.txt");
        fs::write(&path, "A|x.mov|1|u1|/src/A/x.mov\n").unwrap();
        let records = reader().read_path(&path).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_custom_separator() {
        let naming = NamingConfig::default();
        let reader = SnapshotReader::new(
            b';',
            NamingRules::new(naming.rewrites, naming.collapse_subfolders),
        );
        let records = reader
            .read_from("A;x|y.mov;1;u1;/src/A/x|y.mov\n".as_bytes(), Path::new("s"))
            .unwrap();
        assert_eq!(records[0].filename(), "x|y.mov");
    }
}
