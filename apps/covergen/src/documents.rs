//! File boundary: reading the inputs and writing the generated letter.

use std::path::Path;

use tracing::debug;

use crate::errors::AppError;
use crate::generation::normalizer::strip_markup;

/// Reads a typeset-markup résumé and returns its plain-text content.
pub fn read_markup_document(path: &Path) -> Result<String, AppError> {
    let source = read_utf8(path)?;
    Ok(strip_markup(&source))
}

/// Reads a plain-text document, trimming surrounding whitespace.
pub fn read_text_document(path: &Path) -> Result<String, AppError> {
    Ok(read_utf8(path)?.trim().to_string())
}

/// Writes the letter verbatim, with no added framing.
pub fn write_letter(path: &Path, letter: &str) -> Result<(), AppError> {
    std::fs::write(path, letter).map_err(|e| AppError::file_access(path, e))?;
    debug!("Wrote {} bytes to {}", letter.len(), path.display());
    Ok(())
}

fn read_utf8(path: &Path) -> Result<String, AppError> {
    // read_to_string reports invalid UTF-8 as io::ErrorKind::InvalidData.
    let content = std::fs::read_to_string(path).map_err(|e| AppError::file_access(path, e))?;
    debug!("Read {} bytes from {}", content.len(), path.display());
    Ok(content.replace("\r\n", "\n"))
}
