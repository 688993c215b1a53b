use crate::error::IngestError;
use lopdf::Document;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

pub trait PdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, IngestError>;
}

#[derive(Default)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, IngestError> {
        let document =
            Document::load(path).map_err(|error| IngestError::PdfParse(error.to_string()))?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            let text = document
                .extract_text(&[page_no])
                .map_err(|error| IngestError::PdfParse(error.to_string()))?;

            pages.push(PageText {
                number: page_no,
                text,
            });
        }

        Ok(pages)
    }
}

/// Strip the non-whitespace control characters PDF extraction leaves behind
/// (NUL bytes in particular) and trim the result.
pub fn clean_page_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::clean_page_text;

    #[test]
    fn cleaning_strips_nul_bytes() {
        assert_eq!(clean_page_text("alpha\u{0}beta"), "alphabeta");
    }

    #[test]
    fn cleaning_keeps_inner_whitespace() {
        assert_eq!(
            clean_page_text("  first line\nsecond\tline \u{1} "),
            "first line\nsecond\tline"
        );
    }

    #[test]
    fn cleaning_whitespace_only_text_is_empty() {
        assert_eq!(clean_page_text(" \n\t \u{0} "), "");
    }
}
