/*!
The MessageReader iterator reads one JSON document per line from an input stream.

* Blank lines are skipped.
* A line that fails to decode is logged and skipped; a malformed record never ends the stream.
* End of stream ends the iteration cleanly.
* A read failure is yielded once as [TranslatorError::StreamFault], after which the iterator is
  exhausted.
*/
use crate::error::TranslatorError;
use log::warn;
use serde_json::Value;
use std::io::{BufRead, ErrorKind};

pub(crate) struct ReaderOptions {
    show_warnings: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            show_warnings: true,
        }
    }
}

pub struct MessageReader<R> {
    reader: R,
    buffer: String,
    options: ReaderOptions,
    lines_read: u64,
    parse_errors: u64,
    done: bool,
}

impl<R: BufRead> MessageReader<R> {
    pub fn new(reader: R) -> MessageReader<R> {
        MessageReader {
            reader,
            buffer: String::new(),
            options: ReaderOptions::default(),
            lines_read: 0,
            parse_errors: 0,
            done: false,
        }
    }

    /// Stop logging malformed lines. They are still counted and skipped.
    pub fn disable_warnings(self) -> MessageReader<R> {
        let mut options = self.options;
        options.show_warnings = false;
        MessageReader { options, ..self }
    }

    /// Number of lines read so far, blank and malformed lines included.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Number of lines that failed to decode.
    pub fn parse_errors(&self) -> u64 {
        self.parse_errors
    }
}

impl<R: BufRead> Iterator for MessageReader<R> {
    type Item = Result<Value, TranslatorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => {
                    // normal end of stream
                    self.done = true;
                    return None;
                }
                Ok(_) => {
                    self.lines_read += 1;
                    let line = self.buffer.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<Value>(line) {
                        Ok(value) => return Some(Ok(value)),
                        Err(e) => {
                            self.parse_errors += 1;
                            if self.options.show_warnings {
                                warn!("skipping malformed line {}: {}", self.lines_read, e);
                            }
                            continue;
                        }
                    }
                }
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    // the offending line is consumed, keep reading
                    self.lines_read += 1;
                    self.parse_errors += 1;
                    if self.options.show_warnings {
                        warn!("skipping non utf-8 line {}: {}", self.lines_read, e);
                    }
                    continue;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(TranslatorError::StreamFault(e)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    #[test]
    fn test_read_lines() {
        let input = "{\"type\":\"state\"}\n\n   \n{\"type\":\"update\"}\n";
        let mut reader = MessageReader::new(Cursor::new(input));
        let values: Vec<Value> = reader.by_ref().map(|v| v.unwrap()).collect();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1]["type"], "update");
        assert_eq!(reader.lines_read(), 4);
        assert_eq!(reader.parse_errors(), 0);
    }

    #[test]
    fn test_skip_malformed() {
        let input = "{\"type\":\"state\"}\nnot json\n{\"type\":\n{\"type\":\"update\"}";
        let mut reader = MessageReader::new(Cursor::new(input)).disable_warnings();
        let values: Vec<Value> = reader.by_ref().map(|v| v.unwrap()).collect();
        assert_eq!(values.len(), 2);
        assert_eq!(reader.parse_errors(), 2);
    }

    #[test]
    fn test_skip_invalid_utf8() {
        let mut input = b"{\"type\":\"state\"}\n".to_vec();
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        input.extend_from_slice(b"{\"type\":\"update\"}\n");
        let mut reader = MessageReader::new(Cursor::new(input)).disable_warnings();
        let values: Vec<Value> = reader.by_ref().map(|v| v.unwrap()).collect();
        assert_eq!(values.len(), 2);
        assert_eq!(reader.parse_errors(), 1);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device gone"))
        }
    }

    #[test]
    fn test_stream_fault() {
        let mut reader = MessageReader::new(BufReader::new(FailingReader));
        let item = reader.next().unwrap();
        assert!(matches!(item, Err(TranslatorError::StreamFault(_))));
        assert!(reader.next().is_none());
    }
}
