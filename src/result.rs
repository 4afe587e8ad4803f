use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("record {path} is shorter than its 8 byte header ({len} bytes)")]
    TruncatedRecord { path: PathBuf, len: usize },
    #[error(
        "malformed record {path}: payload of {payload_bytes} bytes does not match {height} x {width} x 14 floats"
    )]
    MalformedRecord {
        path: PathBuf,
        height: i32,
        width: i32,
        payload_bytes: usize,
    },
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("archive error")]
    Zip(#[from] zip::result::ZipError),
}

pub type PreprocessResult<T> = Result<T, PreprocessError>;
