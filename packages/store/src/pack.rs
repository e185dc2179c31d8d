//! Line-oriented decoder for language-pack files.
//!
//! A pack file is UTF-8 text. The first line is the language tag; every
//! following line is `<id><separator><text>`. The id must parse as a signed
//! integer once surrounding spaces are stripped; the text is kept verbatim,
//! empty or not. Lines that do not split into exactly two fields are not
//! records at all and are dropped without being counted.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

/// One decoded body line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// A well-formed record.
    Record { id: i64, text: String },
    /// The line had the right field shape but its identifier is not an
    /// integer. Counts toward the load estimate, never toward reality.
    BadId,
}

/// An open language-pack file, positioned after its tag line.
///
/// Iterating yields [`ParsedLine`]s for the remaining lines. A read failure
/// mid-file ends the stream; whatever was yielded before it stands.
pub struct PackFile {
    tag: String,
    separator: String,
    lines: Lines<BufReader<File>>,
}

impl PackFile {
    /// Open `path` and consume its tag line.
    ///
    /// The tag is trimmed of surrounding spaces (only spaces; a tab is part
    /// of the tag). Returns `Ok(None)` when the file is empty or the tag
    /// line is blank; such files carry no records.
    pub fn open(path: &Path, separator: &str) -> io::Result<Option<PackFile>> {
        let file = File::open(path)?;
        let mut lines = BufReader::new(file).lines();
        let tag = match lines.next() {
            Some(first) => first?.trim_matches(' ').to_string(),
            None => return Ok(None),
        };
        if tag.is_empty() {
            return Ok(None);
        }
        Ok(Some(PackFile {
            tag,
            separator: separator.to_string(),
            lines,
        }))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Iterator for PackFile {
    type Item = ParsedLine;

    fn next(&mut self) -> Option<ParsedLine> {
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(_)) | None => return None,
            };
            let fields: Vec<&str> = line.split(self.separator.as_str()).collect();
            // A text value containing the separator breaks the two-field
            // shape; such lines are dropped rather than mis-parsed.
            if fields.len() != 2 {
                continue;
            }
            match fields[0].trim_matches(' ').parse::<i64>() {
                Ok(id) => {
                    return Some(ParsedLine::Record {
                        id,
                        text: fields[1].to_string(),
                    })
                }
                Err(_) => return Some(ParsedLine::BadId),
            }
        }
    }
}
