//! Line-oriented record reading.
//!
//! Input comes from the file named by the first command-line argument,
//! or from stdin if there is no argument.  A record is one non-blank
//! line; reaching the end of the stream simply ends the sequence.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use tracing::{event, Level};

use crate::error::{Error, Result};

/// Returns the input path from the command line arguments (without the
/// program name), or `None` for stdin.  More than one argument is an error.
fn input_path<I: Iterator<Item = String>>(mut args: I) -> Result<Option<String>> {
    let path = args.next();
    match args.next() {
        Some(extra) => Err(Error::InvalidInput(format!(
            "expected at most one input file, got extra argument '{}'",
            extra
        ))),
        None => Ok(path),
    }
}

pub fn open() -> Result<Box<dyn BufRead>> {
    match input_path(std::env::args().skip(1))? {
        Some(path) => {
            event!(Level::DEBUG, "reading input from {}", path);
            let f = File::open(&path)?;
            Ok(Box::new(BufReader::new(f)))
        }
        None => {
            event!(Level::DEBUG, "reading input from stdin");
            Ok(Box::new(BufReader::new(io::stdin())))
        }
    }
}

#[test]
fn test_input_path() {
    let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<String>>();
    assert_eq!(input_path(args(&[]).into_iter()).ok(), Some(None));
    assert_eq!(
        input_path(args(&["input.txt"]).into_iter()).ok(),
        Some(Some("input.txt".to_string()))
    );
    assert!(matches!(
        input_path(args(&["input.txt", "other.txt"]).into_iter()),
        Err(Error::InvalidInput(_))
    ));
}

/// Iterator over the non-blank lines of a reader, paired with their
/// 1-based line numbers.
pub struct Records<R> {
    lines: io::Lines<R>,
    line_number: usize,
}

pub fn records<R: BufRead>(reader: R) -> Records<R> {
    Records {
        lines: reader.lines(),
        line_number: 0,
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Err(e) => return Some(Err(Error::Io(e))),
                Ok(line) => line,
            };
            self.line_number += 1;
            let trimmed = line.trim_end_matches('\r');
            if trimmed.trim().is_empty() {
                continue;
            }
            return Some(Ok((self.line_number, trimmed.to_string())));
        }
    }
}

/// Parse every record with `parse`.  A parse failure is reported as
/// `MalformedLine` against the offending line, and input with no
/// records at all is `EmptyInput`.
pub fn parse_records<R, T, E, F>(reader: R, mut parse: F) -> Result<Vec<T>>
where
    R: BufRead,
    E: Display,
    F: FnMut(&str) -> std::result::Result<T, E>,
{
    let mut result: Vec<T> = Vec::new();
    for record in records(reader) {
        let (line_number, line) = record?;
        match parse(line.as_str()) {
            Ok(item) => result.push(item),
            Err(e) => return Err(Error::malformed(line_number, e.to_string())),
        }
    }
    if result.is_empty() {
        Err(Error::EmptyInput)
    } else {
        event!(Level::DEBUG, "read {} records", result.len());
        Ok(result)
    }
}

#[test]
fn test_records_skip_blank_lines() {
    let input: &[u8] = b"10\n\n  \n20\r\n30";
    let got: Vec<(usize, String)> = records(input)
        .collect::<Result<Vec<_>>>()
        .expect("in-memory input is readable");
    assert_eq!(
        got,
        vec![
            (1, "10".to_string()),
            (4, "20".to_string()),
            (5, "30".to_string()),
        ]
    );
}

#[test]
fn test_parse_records() {
    let input: &[u8] = b"1\n2\n3\n";
    let got = parse_records(input, |s| s.parse::<u32>()).expect("valid input");
    assert_eq!(got, vec![1, 2, 3]);
}

#[test]
fn test_parse_records_empty() {
    let input: &[u8] = b"\n\n";
    assert!(matches!(
        parse_records(input, |s| s.parse::<u32>()),
        Err(Error::EmptyInput)
    ));
}

#[test]
fn test_parse_records_malformed() {
    let input: &[u8] = b"1\n\nfish\n3\n";
    match parse_records(input, |s| s.parse::<u32>()) {
        Err(Error::MalformedLine { line, reason }) => {
            assert_eq!(line, 3);
            assert!(reason.contains("invalid digit"), "reason was {}", reason);
        }
        other => panic!("expected MalformedLine, got {:?}", other),
    }
}
