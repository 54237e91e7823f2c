use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

pub fn mkdirp<P>(path: &P) -> Result<()>
where
    P: AsRef<Path>,
{
    fs::create_dir_all(path.as_ref()).map_err(|inner| Error::AccessError {
        inner,
        path: path.as_ref().to_owned(),
    })?;
    Ok(())
}

// Creates the parent directories of `path` if needed
fn create<P>(path: &P) -> Result<File>
where
    P: AsRef<Path>,
{
    if let Some(parent) = path.as_ref().parent() {
        mkdirp(&parent)?;
    }

    File::create(path.as_ref()).map_err(|inner| Error::AccessError {
        inner,
        path: path.as_ref().to_owned(),
    })
}

pub fn save<D, P>(data: &D, path: &P) -> Result<()>
where
    D: Serialize,
    P: AsRef<Path>,
{
    let file = create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), data).map_err(|inner| {
        Error::SerdeError {
            inner,
            path: path.as_ref().to_owned(),
        }
    })
}

pub fn save_string<P>(data: &str, path: &P) -> Result<()>
where
    P: AsRef<Path>,
{
    let mut file = create(path)?;
    file.write_all(data.as_bytes())
        .map_err(|inner| Error::AccessError {
            inner,
            path: path.as_ref().to_owned(),
        })
}

#[cfg(test)]
mod test {
    use serde_json::Value;
    use tempfile::tempdir;

    use super::{save, save_string};

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("summary.json");

        save(&vec![1.5, f64::NAN], &path).unwrap();

        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!([1.5, null]));
    }

    #[test]
    fn save_string_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.html");

        save_string("old", &path).unwrap();
        save_string("new", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }
}
