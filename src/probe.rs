use std::{
    fs,
    io::{self, ErrorKind},
    path::Path,
};

pub trait Probe {
    fn exists(&self, path: &Path) -> io::Result<bool>;

    fn is_file(&self, path: &Path) -> io::Result<bool> {
        self.exists(path)
    }
}

fn missing(e: &io::Error) -> bool {
    // a file where a directory was expected also means "not there"
    matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl Probe for FsProbe {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if missing(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn is_file(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if missing(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
