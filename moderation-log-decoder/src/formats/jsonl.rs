//! JSONL (newline-delimited JSON) moderation log parser
//!
//! Each non-blank line holds one moderation record. Lines are parsed in two
//! steps so that malformed JSON and a record of the wrong shape are reported
//! as different errors.

use crate::types::{DecoderError, ModerationRecord, ParsedRecord, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// JSONL moderation log parser
pub struct JsonlParser;

impl JsonlParser {
    /// Open a JSONL file and return an iterator over its records
    pub fn parse(path: &Path) -> Result<JsonlRecordIterator<BufReader<File>>> {
        log::info!("Parsing JSONL file: {:?}", path);

        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Parse records from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> JsonlRecordIterator<R> {
        JsonlRecordIterator {
            reader,
            buffer: Vec::new(),
            line_number: 0,
        }
    }

    /// Parse a single line into a record
    pub fn parse_line(line_number: usize, line: &str) -> Result<ModerationRecord> {
        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|e| DecoderError::JsonParse {
                line: line_number,
                message: e.to_string(),
            })?;

        serde_json::from_value(value).map_err(|e| DecoderError::InvalidRecord {
            line: line_number,
            message: e.to_string(),
        })
    }
}

/// Iterator over moderation records from a JSONL source
///
/// Lines are read as raw bytes so a line that is not valid UTF-8 is reported
/// with its line number like any other malformed line.
pub struct JsonlRecordIterator<R> {
    reader: R,
    buffer: Vec<u8>,
    line_number: usize,
}

impl<R: BufRead> JsonlRecordIterator<R> {
    /// Number of lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for JsonlRecordIterator<R> {
    type Item = Result<ParsedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;
            let line_number = self.line_number;

            let line = match std::str::from_utf8(&self.buffer) {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(DecoderError::JsonParse {
                        line: line_number,
                        message: format!("invalid UTF-8: {}", e),
                    }))
                }
            };

            if line.trim().is_empty() {
                log::trace!("Skipping blank line {}", line_number);
                continue;
            }

            return Some(
                JsonlParser::parse_line(line_number, line).map(|record| ParsedRecord {
                    line: line_number,
                    record,
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_lines_with_blank_lines() {
        let input = "{\"post_id\":\"a\"}\n\n   \n{\"post_id\":\"b\"}\n";
        let records: Vec<ParsedRecord> = JsonlParser::from_reader(Cursor::new(input))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 1);
        assert_eq!(records[1].line, 4);
    }

    #[test]
    fn test_malformed_json_reports_line() {
        let input = "{\"post_id\":\"a\"}\n{not json\n";
        let mut iter = JsonlParser::from_reader(Cursor::new(input));

        assert!(iter.next().unwrap().is_ok());
        match iter.next().unwrap() {
            Err(DecoderError::JsonParse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected JsonParse error, got {:?}", other),
        }
        assert!(iter.next().is_none());
        assert_eq!(iter.lines_read(), 2);
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let input: &[u8] = b"{\"post_id\":\"a\"}\r\n{\"text\":\"\xff\xfe\"}\n{\"post_id\":\"c\"}\n";
        let results: Vec<Result<ParsedRecord>> =
            JsonlParser::from_reader(Cursor::new(input)).collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(e @ DecoderError::JsonParse { .. }) => assert_eq!(e.line(), Some(2)),
            other => panic!("expected JsonParse error, got {:?}", other),
        }
        assert_eq!(results[2].as_ref().unwrap().line, 3);
    }

    #[test]
    fn test_wrong_shape_is_invalid_record() {
        let err = JsonlParser::parse_line(5, r#"{"openai": "not an object"}"#).unwrap_err();
        assert!(matches!(err, DecoderError::InvalidRecord { line: 5, .. }));

        let err = JsonlParser::parse_line(6, r#""just a string""#).unwrap_err();
        assert!(matches!(err, DecoderError::InvalidRecord { line: 6, .. }));
    }

    #[test]
    fn test_missing_file() {
        let result = JsonlParser::parse(Path::new("does/not/exist.jsonl"));
        assert!(matches!(result, Err(DecoderError::IoError(_))));
    }
}
