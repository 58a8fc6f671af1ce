//! Plain text to speech-synthesis markup.
//!
//! Wraps each non-blank line in a `<p>` element inside `<speak>`, and inserts
//! a `<break>` after punctuation marks so the synthesizer pauses there.

use std::path::Path;

use crate::error::EqError;

/// Options for [`to_speak_markup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupOptions {
    /// Pause duration in milliseconds (default: 300).
    pub break_ms: u32,
    /// Characters followed by a pause (default: `, ; : -`).
    pub pause_after: Vec<char>,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            break_ms: 300,
            pause_after: vec![',', ';', ':', '-'],
        }
    }
}

/// Formats lines of text as a `<speak>` document.
///
/// Lines are trimmed and blank lines are skipped.
pub fn to_speak_markup<S: AsRef<str>>(lines: &[S], options: &MarkupOptions) -> String {
    let pause = format!("<break time=\"{}ms\" />", options.break_ms);
    let mut result = String::from("<speak>\n");
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        let mut marked = String::with_capacity(line.len());
        for ch in line.chars() {
            marked.push(ch);
            if options.pause_after.contains(&ch) {
                marked.push_str(&pause);
            }
        }
        result.push_str("<p>\n   ");
        result.push_str(&marked);
        result.push_str("\n</p>\n");
    }
    result.push_str("\n</speak>");
    result
}

/// Reads `input`, formats it, and writes the markup to `output` as UTF-8.
pub fn convert_file(input: &Path, output: &Path, options: &MarkupOptions) -> Result<(), EqError> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| EqError::IoError(format!("{}: {}", input.display(), e)))?;
    let lines: Vec<&str> = text.lines().collect();
    let markup = to_speak_markup(&lines, options);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, markup)
        .map_err(|e| EqError::IoError(format!("{}: {}", output.display(), e)))?;
    log::info!(
        "wrote markup for {} line(s) to {}",
        lines.len(),
        output.display()
    );
    Ok(())
}
