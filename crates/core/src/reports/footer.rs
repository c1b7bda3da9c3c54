//! Page footer stamping.

use super::labels::Labels;
use super::types::{Page, PageContent, PageFooter, Section};

/// Stamps page index, page total and section label on composed pages.
pub struct FooterAnnotator {
    labels: &'static Labels,
}

impl FooterAnnotator {
    /// Creates an annotator with the given labels.
    #[must_use]
    pub const fn new(labels: &'static Labels) -> Self {
        Self { labels }
    }

    /// Stamps every page once all of them exist.
    ///
    /// Pages `1..=summary_pages` are labelled as summary, the rest as detail.
    #[must_use]
    pub fn annotate(&self, contents: Vec<PageContent>, summary_pages: usize) -> Vec<Page> {
        let total = contents.len();

        contents
            .into_iter()
            .enumerate()
            .map(|(position, content)| {
                let index = position + 1;
                let section = if index <= summary_pages {
                    Section::Summary
                } else {
                    Section::Detail
                };
                let footer = PageFooter {
                    index,
                    total,
                    section,
                    text: self.footer_text(index, total, section),
                };
                Page { content, footer }
            })
            .collect()
    }

    fn footer_text(&self, index: usize, total: usize, section: Section) -> String {
        let label = match section {
            Section::Summary => self.labels.summary,
            Section::Detail => self.labels.detail,
        };
        format!(
            "{label} | {} {index} {} {total}",
            self.labels.page, self.labels.of
        )
    }
}
