//! Existing-Letters Summarizer — a lossy paragraph digest of prior letters.
//!
//! Each letter is split on blank lines and every paragraph is reduced to a short
//! preview. The digest steers the shape of the generated letter; it is not a
//! faithful copy of the inputs.

/// Characters of each paragraph kept in the digest.
pub const PREVIEW_CHARS: usize = 100;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Renders the structure digest for `letters`, numbering letters and paragraphs from 1.
pub fn summarize_letters(letters: &[String]) -> String {
    let mut structure = String::from("Structure commune observée:\n");

    for (i, letter) in letters.iter().enumerate() {
        structure.push_str(&format!("\nLettre {}:\n", i + 1));
        // CRLF letters split on the same blank lines as LF ones.
        let letter = letter.replace("\r\n", "\n");
        for (j, paragraph) in letter.split(PARAGRAPH_SEPARATOR).enumerate() {
            structure.push_str(&format!(
                "- Paragraphe {}: {}...\n",
                j + 1,
                preview(paragraph)
            ));
        }
    }

    structure
}

/// First `PREVIEW_CHARS` characters, cut on a char boundary.
fn preview(paragraph: &str) -> &str {
    match paragraph.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => &paragraph[..end],
        None => paragraph,
    }
}
