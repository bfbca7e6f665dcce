use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be parsed.  `line` is 1-based.
    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("input contains no records")]
    EmptyInput,

    /// The input parsed, but the puzzle has no answer for it.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn malformed<S: Into<String>>(line: usize, reason: S) -> Error {
        Error::MalformedLine {
            line,
            reason: reason.into(),
        }
    }
}

#[test]
fn test_display() {
    assert_eq!(
        Error::malformed(3, "expected a number").to_string(),
        "line 3: expected a number"
    );
    assert_eq!(Error::EmptyInput.to_string(), "input contains no records");
    assert_eq!(
        Error::InvalidInput("no candidates".to_string()).to_string(),
        "invalid input: no candidates"
    );
}
