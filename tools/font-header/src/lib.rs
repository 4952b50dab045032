//! Tool for embedding binary font files into C++ headers as static byte arrays.
//!
//! The generated header places a `unsigned char` array holding the font's bytes and a `size_t`
//! constant holding its length inside the [`NAMESPACE`] namespace.

use core::{error, fmt};
use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};

pub mod cli;

/// The namespace that wraps every generated declaration.
pub const NAMESPACE: &str = "EmbeddedFonts";

/// The maximum number of bytes rendered on a single line of the array body.
pub const CHUNK_WIDTH: usize = 16;

/// Reads the font at `input_path` and writes its header, declaring `identifier` and
/// `{identifier}_size`, to `output_path`.
///
/// The header is written to a temporary file next to `output_path` and moved into place once it
/// is complete, so a failure never leaves a truncated header behind.
///
/// Returns the number of bytes embedded in the header.
///
/// # Errors
///
/// Returns errors if `input_path` cannot be read or if the header cannot be written to
/// `output_path`.
pub fn generate(input_path: &Path, output_path: &Path, identifier: &str) -> Result<usize> {
    let font = fs::read(input_path)
        .with_context(|| format!("failed to read font \"{}\"", input_path.display()))?;
    log::debug!("read {} bytes from \"{}\"", font.len(), input_path.display());

    persist_header(&font, identifier, output_path)
        .with_context(|| format!("failed to write header \"{}\"", output_path.display()))?;
    log::info!(
        "embedded \"{}\" as `{NAMESPACE}::{identifier}`",
        input_path.display()
    );

    Ok(font.len())
}

/// Writes the header for `font` into a temporary file and then replaces `output_path` with it.
///
/// An existing output is resolved through symlinks and keeps its permissions; a new output gets
/// the permissions a plain file creation would give it.
fn persist_header(font: &[u8], identifier: &str, output_path: &Path) -> io::Result<()> {
    let target = fs::canonicalize(output_path).unwrap_or_else(|_| output_path.to_path_buf());
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".font-header");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        // Masked by the process umask on creation.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let mut file = builder.tempfile_in(parent)?;
    log::trace!("staging header in \"{}\"", file.path().display());

    if let Ok(metadata) = fs::metadata(&target) {
        file.as_file().set_permissions(metadata.permissions())?;
    }

    let mut writer = BufWriter::new(file.as_file_mut());
    write_header(font, identifier, &mut writer)?;
    writer.flush()?;
    drop(writer);

    file.as_file().sync_all()?;
    file.persist(&target).map_err(|error| error.error)?;
    Ok(())
}

/// Renders the header for `font` with the array named `identifier`.
pub fn render_header(font: &[u8], identifier: &str) -> String {
    HeaderDocument::new(font, identifier).to_string()
}

/// Writes the header for `font` with the array named `identifier` to `writer`.
///
/// # Errors
///
/// Returns any error produced by `writer`.
pub fn write_header<W: Write>(font: &[u8], identifier: &str, mut writer: W) -> io::Result<()> {
    write!(writer, "{}", HeaderDocument::new(font, identifier))
}

/// A C++ header embedding a font's bytes.
///
/// The [`fmt::Display`] implementation produces the header text.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct HeaderDocument<'font> {
    /// The bytes embedded in the header.
    font: &'font [u8],
    /// The name of the array; the size constant is named `{identifier}_size`.
    identifier: &'font str,
}

impl<'font> HeaderDocument<'font> {
    /// Creates a new [`HeaderDocument`].
    ///
    /// `identifier` is used verbatim and is not checked to be a valid C++ identifier.
    pub const fn new(font: &'font [u8], identifier: &'font str) -> Self {
        Self { font, identifier }
    }
}

impl fmt::Display for HeaderDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identifier = self.identifier;

        f.write_str("#pragma once\n\n")?;
        f.write_str("#include <cstddef>\n\n")?;
        write!(f, "namespace {NAMESPACE} {{\n\n")?;
        write!(f, "static const unsigned char {identifier}[] = {{")?;

        for chunk in self.font.chunks(CHUNK_WIDTH) {
            f.write_str("\n    ")?;
            for (index, byte) in chunk.iter().enumerate() {
                if index != 0 {
                    f.write_str(", ")?;
                }
                write!(f, "0x{byte:02x}")?;
            }
            f.write_str(",")?;
        }

        f.write_str("\n};")?;
        write!(
            f,
            "\n\nstatic const size_t {identifier}_size = {};",
            self.font.len()
        )?;
        f.write_str("\n\n}")
    }
}

/// The declarations recovered from a header produced by [`render_header`].
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct ParsedHeader {
    /// The name of the array.
    pub identifier: String,
    /// The bytes stored in the array, in order.
    pub bytes: Vec<u8>,
    /// The value of the `{identifier}_size` constant.
    pub size: usize,
}

/// Parses a header produced by [`render_header`] back into its declarations.
///
/// # Errors
///
/// Returns a [`ParseHeaderError`] if the array or size declarations are missing or malformed.
pub fn parse_header(text: &str) -> Result<ParsedHeader, ParseHeaderError> {
    const ARRAY_PREFIX: &str = "static const unsigned char ";
    const ARRAY_SUFFIX: &str = "[] = {";
    const SIZE_PREFIX: &str = "static const size_t ";

    let mut lines = text.lines();

    let identifier = lines
        .by_ref()
        .find_map(|line| line.strip_prefix(ARRAY_PREFIX)?.strip_suffix(ARRAY_SUFFIX))
        .ok_or(ParseHeaderError::MissingArrayDeclaration)?;

    let mut bytes = Vec::new();
    let mut terminated = false;
    for line in lines.by_ref() {
        let line = line.trim();
        if line == "};" {
            terminated = true;
            break;
        }

        let values = line.strip_suffix(',').unwrap_or(line);
        for value in values.split(',').map(str::trim) {
            let byte = value
                .strip_prefix("0x")
                .filter(|digits| {
                    digits.len() == 2 && digits.bytes().all(|digit| digit.is_ascii_hexdigit())
                })
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| ParseHeaderError::InvalidByteLiteral(value.to_owned()))?;
            bytes.push(byte);
        }
    }
    if !terminated {
        return Err(ParseHeaderError::UnterminatedArray);
    }

    let (size_identifier, size) = lines
        .find_map(|line| {
            line.strip_prefix(SIZE_PREFIX)?
                .strip_suffix(';')?
                .split_once(" = ")
        })
        .ok_or(ParseHeaderError::MissingSizeDeclaration)?;

    if size_identifier.strip_suffix("_size") != Some(identifier) {
        return Err(ParseHeaderError::IdentifierMismatch {
            array: identifier.to_owned(),
            size: size_identifier.to_owned(),
        });
    }

    let size = size
        .parse::<usize>()
        .map_err(|_| ParseHeaderError::InvalidSize(size.to_owned()))?;

    Ok(ParsedHeader {
        identifier: identifier.to_owned(),
        bytes,
        size,
    })
}

/// Various errors that can occur while parsing a generated header.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum ParseHeaderError {
    /// No `unsigned char` array declaration was found.
    MissingArrayDeclaration,
    /// The array body was not closed with `};`.
    UnterminatedArray,
    /// An array element was not a two digit hexadecimal literal.
    InvalidByteLiteral(String),
    /// No `size_t` constant declaration was found after the array.
    MissingSizeDeclaration,
    /// The size constant is not named after the array.
    IdentifierMismatch {
        /// The name of the array.
        array: String,
        /// The name of the size constant.
        size: String,
    },
    /// The size constant's value is not a valid integer.
    InvalidSize(String),
}

impl fmt::Display for ParseHeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArrayDeclaration => write!(f, "missing array declaration"),
            Self::UnterminatedArray => write!(f, "array is not terminated"),
            Self::InvalidByteLiteral(literal) => write!(f, "invalid byte literal: {literal:?}"),
            Self::MissingSizeDeclaration => write!(f, "missing size declaration"),
            Self::IdentifierMismatch { array, size } => write!(
                f,
                "size constant `{size}` does not match array `{array}`"
            ),
            Self::InvalidSize(size) => write!(f, "invalid size: {size:?}"),
        }
    }
}

impl error::Error for ParseHeaderError {}
