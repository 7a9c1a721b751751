use std::fmt::Display;
use std::path::PathBuf;

pub trait ErrorType: std::error::Error + PartialEq {}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn at(line: usize, column: usize) -> Self {
        Location {
            file: PathBuf::new(),
            line,
            column,
        }
    }

    pub fn in_file(self, file: PathBuf) -> Self {
        Location { file, ..self }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let has_file = !self.file.as_os_str().is_empty();
        match (has_file, self.line) {
            (true, 0) => write!(f, "{}", self.file.display()),
            (true, _) => write!(f, "{}:{}:{}", self.file.display(), self.line, self.column),
            (false, _) => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T,
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

impl<T: ErrorType + 'static> std::error::Error for Error<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display() {
        assert_eq!(Location::at(3, 7).to_string(), "3:7");
        assert_eq!(
            Location::at(3, 7).in_file(PathBuf::from("g.cfg")).to_string(),
            "g.cfg:3:7"
        );
        assert_eq!(
            Location::default().in_file(PathBuf::from("g.cfg")).to_string(),
            "g.cfg"
        );
    }
}
