//! CLI command handlers

pub mod analyze;
pub mod ask;
pub mod history;
pub mod ocr;
pub mod report;
pub mod search;
pub mod status;

use sitewise_core::SiteWiseError;

/// Join positional words, rejecting an all-blank result
pub(crate) fn joined_text(words: &[String], what: &str) -> Result<String, SiteWiseError> {
    let text = words.join(" ");
    if text.trim().is_empty() {
        return Err(SiteWiseError::InvalidInput(format!("{} is empty", what)));
    }
    Ok(text)
}
