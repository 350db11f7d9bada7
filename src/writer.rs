use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use log::info;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};

use crate::{
    config::Config,
    error::{BuildError, Result},
    prompt::Prompter,
};

pub const DEFAULT_FILE_NAME: &str = "config.json";

/// Picks where the config is written: `config.json` in `output_dir`, or a
/// name chosen by the operator if that file exists and they decline to
/// overwrite it. The alternative name is not checked again.
///
/// # Errors
/// Returns `BuildError::Prompt` if the console fails.
pub fn resolve_output_path<R: BufRead, W: Write>(
    output_dir: &Path,
    prompter: &mut Prompter<R, W>,
) -> Result<PathBuf> {
    let path = output_dir.join(DEFAULT_FILE_NAME);
    if !path.exists() {
        return Ok(path);
    }

    let overwrite = prompter.confirm(&format!(
        "{} already exists. Do you want to overwrite it?",
        path.display()
    ))?;
    if overwrite {
        return Ok(path);
    }

    loop {
        let name =
            prompter.ask("Enter a new name for the config file (e.g., config_new.json): ")?;
        if !name.is_empty() {
            let path = output_dir.join(name);
            info!("writing to alternative path {}", path.display());
            return Ok(path);
        }
    }
}

/// Pretty printing with every non-ASCII character written as a `\uXXXX`
/// escape (UTF-16 surrogate pairs above the BMP), as Python's `json.dump` does.
struct AsciiPrettyFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiPrettyFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.begin_array(w)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.end_array(w)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        w: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(w, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.end_array_value(w)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.begin_object(w)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.end_object(w)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        w: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(w, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.begin_object_value(w)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.end_object_value(w)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        w: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c.is_ascii() {
                continue;
            }
            w.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(w, "\\u{unit:04x}")?;
            }
            start = i + c.len_utf8();
        }
        w.write_all(fragment[start..].as_bytes())
    }
}

/// Renders `config` as JSON indented by four spaces, keys in insertion order,
/// non-ASCII text escaped.
///
/// # Errors
/// Returns `serde_json::Error` if a value cannot be serialized.
pub fn to_pretty_json(config: &Config) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = AsciiPrettyFormatter(PrettyFormatter::with_indent(b"    "));
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut ser)?;
    // The formatter only ever emits ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes `config` to `path`, replacing any existing file.
///
/// # Errors
/// Returns `BuildError::Io` if the file cannot be written.
pub fn write_config(config: &Config, path: &Path) -> Result<()> {
    let io_err = |source: io::Error| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    let json = to_pretty_json(config).map_err(|e| io_err(e.into()))?;
    fs::write(path, json).map_err(io_err)?;
    info!("wrote {} entries to {}", config.len(), path.display());
    Ok(())
}
