use std::fmt;

#[derive(Debug)]
pub enum FeasError {
    /// Input file extension not recognized (csv, tsv, xls, xlsx).
    UnsupportedFileType(String),
    /// No master data available from either the cached file or the store.
    NoMasterData,
    /// Master source resolved but holds zero rows (advanced mode).
    EmptyMasterData,
    /// Record store error (SQLite open, read, write).
    Storage(String),
    /// Spreadsheet read/write error.
    Sheet(String),
    /// File read/write error.
    Io(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
}

impl fmt::Display for FeasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFileType(ext) => {
                write!(f, "unsupported file type: '{ext}' (expected csv, tsv, xls, or xlsx)")
            }
            Self::NoMasterData => {
                write!(f, "no master data available, upload a master file first")
            }
            Self::EmptyMasterData => write!(f, "master store is empty"),
            Self::Storage(msg) => write!(f, "storage error: {msg}"),
            Self::Sheet(msg) => write!(f, "spreadsheet error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
        }
    }
}

impl std::error::Error for FeasError {}
