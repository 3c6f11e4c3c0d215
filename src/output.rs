use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;

use crate::error::Result;
use crate::CalendarDocument;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Ics,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "ics" => Ok(Format::Ics),
            other => Err(format!("unknown format `{other}`, expected `json` or `ics`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Stdout,
    File(PathBuf),
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        match value {
            "-" => Target::Stdout,
            path => Target::File(PathBuf::from(path)),
        }
    }
}

pub fn render(document: &CalendarDocument, format: Format) -> Result<String> {
    let mut rendered = match format {
        Format::Json => serde_json::to_string_pretty(document)?,
        Format::Ics => document.to_ics().to_string(),
    };

    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    Ok(rendered)
}

pub fn write(contents: &str, target: &Target) -> Result<()> {
    match target {
        Target::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.flush()?;
        }
        Target::File(path) => {
            replace_file(path, contents)?;
            info!("Wrote {}", path.display());
        }
    }

    Ok(())
}

/// Writes to a hidden sibling first so readers never see a partial file.
fn replace_file(path: &Path, contents: &str) -> io::Result<()> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"))?;

    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(name);
    temp_name.push(".temp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)
}
