//! Joined document text with page bookkeeping.

/// Full text of a document plus the byte offset where each page begins.
#[derive(Debug, Clone, Default)]
pub struct DocumentText {
    text: String,
    page_starts: Vec<usize>,
}

impl DocumentText {
    /// Joins page texts, each followed by a newline. Empty pages keep their number.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = Self::default();
        for page in pages {
            doc.page_starts.push(doc.text.len());
            doc.text.push_str(page.as_ref());
            doc.text.push('\n');
        }
        doc
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn page_count(&self) -> usize {
        self.page_starts.len()
    }

    /// Returns true when no page carries any non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Maps a byte offset in [`text`](Self::text) to its 1-based page.
    pub fn page_at(&self, offset: usize) -> usize {
        match self.page_starts.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(0) => 1,
            Err(i) => i,
        }
    }

    /// Iterates `(page_number, page_text)` pairs, 1-based.
    pub fn pages(&self) -> impl Iterator<Item = (usize, &str)> {
        self.page_starts.iter().enumerate().map(move |(i, &start)| {
            let end = self
                .page_starts
                .get(i + 1)
                .map(|&next| next - 1)
                .unwrap_or_else(|| self.text.len().saturating_sub(1));
            (i + 1, &self.text[start..end.max(start)])
        })
    }
}
