use std::fs::File;
use std::io;
use std::io::Read;
use std::str;

/// Path that reads the tree from standard input.
pub const STDIN_PATH: &str = "-";

pub struct SourceFile {
    pub path: String,
    pub body: Vec<u8>,
}

impl SourceFile {

    pub fn load(path: &str) -> io::Result<SourceFile> {
        let mut source_file = SourceFile::new(path);
        if path == STDIN_PATH {
            io::stdin().read_to_end(&mut source_file.body)?;
        } else {
            File::open(path)?.read_to_end(&mut source_file.body)?;
        }
        Ok(source_file)
    }

    pub fn text(&self) -> Result<&str, str::Utf8Error> {
        str::from_utf8(&self.body)
    }

    fn new(path: &str) -> SourceFile {
        SourceFile {
            path: path.to_string(),
            body: Vec::new(),
        }
    }
}

#[cfg(test)]
use std::io::{Seek, SeekFrom, Write};

#[test]
fn test_load_source_file() {
    let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
    write!(tmpfile, "(Program \"\" 1)").unwrap();
    tmpfile.seek(SeekFrom::Start(0)).unwrap();

    let sf = SourceFile::load(tmpfile.path().to_str().unwrap()).unwrap();
    assert_eq!(sf.path, tmpfile.path().to_str().unwrap());
    assert_eq!(sf.text().unwrap(), "(Program \"\" 1)");
}

#[test]
fn test_load_missing_file() {
    assert!(SourceFile::load("/nonexistent/minij/input.tree").is_err());
}
