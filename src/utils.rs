//! General functions used across the project

use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// Open a read file, transparently decompressing it when it ends in `.gz`.
pub fn open_reader(path: &Path) -> io::Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path)?;
    let inner: Box<dyn Read> = if path.extension() == Some(OsStr::new("gz")) {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(BufReader::new(inner))
}

/// Check that `path` names an existing file that can be opened for reading.
pub fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}
