// src/reader/source.rs

use std::{
    fmt,
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};
use tracing::debug;
use zip::ZipArchive;

use crate::error::ReadError;

/// One readable stream of GeoNames lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    /// An entry inside a `.zip` archive, read in place.
    ZipEntry { archive: PathBuf, entry: String },
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::ZipEntry { archive, entry } => write!(f, "{}!{}", archive.display(), entry),
        }
    }
}

impl Source {
    /// Open the source and hand a reader to `f`. Archive entries borrow
    /// their archive, so the reader only lives for the closure.
    pub fn with_reader<T, F>(&self, f: F) -> Result<T, ReadError>
    where
        F: FnOnce(&mut dyn Read) -> Result<T, ReadError>,
    {
        match self {
            Source::File(path) => {
                let file = open(path)?;
                let mut reader = BufReader::new(file);
                f(&mut reader)
            }
            Source::ZipEntry { archive, entry } => {
                let file = open(archive)?;
                let mut zip = ZipArchive::new(file)?;
                let mut zip_entry = zip.by_name(entry)?;
                f(&mut zip_entry)
            }
        }
    }
}

fn open(path: &Path) -> Result<File, ReadError> {
    File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ReadError::FileNotFound(path.display().to_string()),
        _ => ReadError::Io {
            source_name: path.display().to_string(),
            err,
        },
    })
}

fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("zip"))
}

/// Turn a user-supplied input into the ordered list of sources to scan:
/// - an existing file is taken literally, even if its name holds `[` or `*`;
/// - otherwise a glob pattern expands to its matches in sorted order;
/// - a `.zip` path expands to its data entries.
pub fn resolve(input: &str) -> Result<Vec<Source>, ReadError> {
    let literal = PathBuf::from(input);
    let paths: Vec<PathBuf> = if literal.is_file() {
        vec![literal]
    } else if is_pattern(input) {
        let mut matches: Vec<PathBuf> = glob::glob(input)?
            .filter_map(|entry| entry.ok())
            .filter(|p| p.is_file())
            .collect();
        matches.sort();
        matches
    } else {
        Vec::new()
    };

    if paths.is_empty() {
        return Err(ReadError::FileNotFound(input.to_string()));
    }

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        if is_zip(&path) {
            sources.extend(zip_entries(&path)?);
        } else {
            sources.push(Source::File(path));
        }
    }
    debug!(input, sources = sources.len(), "resolved input");
    Ok(sources)
}

/// GeoNames archives carry `<stem>.txt` next to a `readme.txt`. Prefer the
/// entry named after the archive; otherwise take every non-readme `.txt`.
fn zip_entries(path: &Path) -> Result<Vec<Source>, ReadError> {
    let file = open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.is_file() {
            names.push(entry.name().to_string());
        }
    }
    drop(archive);

    let base = |name: &str| -> String {
        name.rsplit('/').next().unwrap_or(name).to_ascii_lowercase()
    };
    let preferred = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| format!("{}.txt", stem.to_ascii_lowercase()));

    let chosen: Vec<String> = match preferred
        .as_deref()
        .and_then(|want| names.iter().find(|n| base(n) == want))
    {
        Some(name) => vec![name.clone()],
        None => names
            .into_iter()
            .filter(|n| {
                let b = base(n);
                b.ends_with(".txt") && b != "readme.txt"
            })
            .collect(),
    };

    if chosen.is_empty() {
        return Err(ReadError::FileNotFound(format!(
            "{} (no .txt data entry in archive)",
            path.display()
        )));
    }

    Ok(chosen
        .into_iter()
        .map(|entry| Source::ZipEntry {
            archive: path.to_path_buf(),
            entry,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) -> Result<()> {
        let mut zip = zip::ZipWriter::new(File::create(path)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, body) in entries {
            zip.start_file(*name, options)?;
            zip.write_all(body.as_bytes())?;
        }
        zip.finish()?;
        Ok(())
    }

    fn read_all(source: &Source) -> Result<String, ReadError> {
        source.with_reader(|r| {
            let mut out = String::new();
            r.read_to_string(&mut out).map_err(|err| ReadError::Io {
                source_name: source.to_string(),
                err,
            })?;
            Ok(out)
        })
    }

    #[test]
    fn missing_path_is_file_not_found() {
        let err = resolve("/definitely/not/here/allCountries.txt").unwrap_err();
        assert!(matches!(err, ReadError::FileNotFound(_)));
    }

    #[test]
    fn glob_matches_are_sorted_and_empty_glob_is_not_found() -> Result<()> {
        let dir = tempdir()?;
        for name in ["US.txt", "AD.txt", "FR.txt"] {
            fs_write(&dir.path().join(name), "x")?;
        }
        let pattern = format!("{}/*.txt", dir.path().display());
        let sources = resolve(&pattern)?;
        let names: Vec<String> = sources
            .iter()
            .map(|s| match s {
                Source::File(p) => p.file_name().unwrap().to_string_lossy().to_string(),
                other => panic!("unexpected source {other}"),
            })
            .collect();
        assert_eq!(names, vec!["AD.txt", "FR.txt", "US.txt"]);

        let none = format!("{}/*.csv", dir.path().display());
        assert!(matches!(resolve(&none), Err(ReadError::FileNotFound(_))));
        Ok(())
    }

    #[test]
    fn zip_prefers_entry_named_after_archive() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("AD.zip");
        write_zip(
            &path,
            &[("readme.txt", "about"), ("AD.txt", "rows"), ("other.txt", "?")],
        )?;

        let sources = resolve(path.to_str().unwrap())?;
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].to_string(), format!("{}!AD.txt", path.display()));
        assert_eq!(read_all(&sources[0])?, "rows");
        Ok(())
    }

    #[test]
    fn zip_without_named_entry_reads_non_readme_txt() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bundle.zip");
        write_zip(
            &path,
            &[("readme.txt", "about"), ("a.txt", "1"), ("b.txt", "2"), ("c.bin", "3")],
        )?;

        let sources = resolve(path.to_str().unwrap())?;
        let entries: Vec<&str> = sources
            .iter()
            .map(|s| match s {
                Source::ZipEntry { entry, .. } => entry.as_str(),
                other => panic!("unexpected source {other}"),
            })
            .collect();
        assert_eq!(entries, vec!["a.txt", "b.txt"]);

        let empty = dir.path().join("empty.zip");
        write_zip(&empty, &[("readme.txt", "about")])?;
        assert!(matches!(
            resolve(empty.to_str().unwrap()),
            Err(ReadError::FileNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn existing_path_with_glob_characters_is_read_literally() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("dump[2024]");
        std::fs::create_dir(&nested)?;
        let path = nested.join("AD.txt");
        fs_write(&path, "rows")?;

        let sources = resolve(path.to_str().unwrap())?;
        assert_eq!(sources, vec![Source::File(path.clone())]);
        assert_eq!(read_all(&sources[0])?, "rows");

        // `[2024]` is still a character class once the literal path is gone
        let sibling = dir.path().join("dump2");
        std::fs::create_dir(&sibling)?;
        fs_write(&sibling.join("AD.txt"), "other")?;
        let pattern = format!("{}/dump[0-9]/AD.txt", dir.path().display());
        let sources = resolve(&pattern)?;
        assert_eq!(sources, vec![Source::File(sibling.join("AD.txt"))]);
        Ok(())
    }

    fn fs_write(path: &Path, body: &str) -> Result<()> {
        std::fs::write(path, body)?;
        Ok(())
    }
}
