use super::paragraph::Paragraph;

/// A header paragraph and every paragraph up to the next header.
///
/// The first section of a document may hold pre-header content instead of a
/// header, depending on [`SectionOptions::start_on_header`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub paragraphs: Vec<Paragraph>,
}

impl Section {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Section { paragraphs }
    }

    pub fn header(&self) -> Option<&str> {
        self.paragraphs.first().and_then(Paragraph::header_text)
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

impl IntoIterator for Section {
    type Item = Paragraph;
    type IntoIter = std::vec::IntoIter<Paragraph>;

    fn into_iter(self) -> Self::IntoIter {
        self.paragraphs.into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionOptions {
    /// Discard content that precedes the first header.
    ///
    /// A document without any header is still yielded whole as one section.
    pub start_on_header: bool,
}

impl Default for SectionOptions {
    fn default() -> Self {
        SectionOptions {
            start_on_header: true,
        }
    }
}

/// Groups a paragraph stream into sections, one per header.
pub struct Sections<I> {
    paragraphs: I,
    options: SectionOptions,
    current: Vec<Paragraph>,
    seen_header: bool,
}

impl<I> Sections<I> {
    pub fn new(paragraphs: I, options: SectionOptions) -> Self {
        Sections {
            paragraphs,
            options,
            current: Vec::new(),
            seen_header: false,
        }
    }
}

impl<I> Iterator for Sections<I>
where
    I: Iterator<Item = Paragraph>,
{
    type Item = Section;

    fn next(&mut self) -> Option<Section> {
        for paragraph in self.paragraphs.by_ref() {
            if !paragraph.is_header() {
                self.current.push(paragraph);
                continue;
            }

            let previous = std::mem::replace(&mut self.current, vec![paragraph]);
            let before_first_header = !std::mem::replace(&mut self.seen_header, true);
            if previous.is_empty() {
                continue;
            }
            if before_first_header && self.options.start_on_header {
                log::debug!(
                    "discarding {} paragraph(s) before the first header",
                    previous.len()
                );
                continue;
            }
            return Some(Section::new(previous));
        }

        if self.current.is_empty() {
            None
        } else {
            Some(Section::new(std::mem::take(&mut self.current)))
        }
    }
}

/// Groups `paragraphs` into sections.
pub fn sections<I>(paragraphs: I, options: SectionOptions) -> Sections<I::IntoIter>
where
    I: IntoIterator<Item = Paragraph>,
{
    Sections::new(paragraphs.into_iter(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn split(texts: &[&str], start_on_header: bool) -> Vec<Vec<String>> {
        let paragraphs = texts.iter().map(|t| Paragraph::from(*t));
        sections(paragraphs, SectionOptions { start_on_header })
            .map(|s| s.into_iter().map(|p| p.text).collect())
            .collect()
    }

    #[test]
    fn pre_header_content_is_discarded() {
        let got = split(&["line 0", "# H1", "p1", "## H2", "p2"], true);
        assert_eq!(got, vec![vec!["# H1", "p1"], vec!["## H2", "p2"]]);
    }

    #[test]
    fn pre_header_content_forms_leading_section() {
        let got = split(&["line 0", "# H1", "p1"], false);
        assert_eq!(got, vec![vec!["line 0"], vec!["# H1", "p1"]]);
    }

    #[test]
    fn headerless_document_is_flushed_whole() {
        let got = split(&["a", "b"], true);
        assert_eq!(got, vec![vec!["a", "b"]]);
    }

    #[test]
    fn consecutive_headers_make_single_paragraph_sections() {
        let got = split(&["# A", "# B", "text"], true);
        assert_eq!(got, vec![vec!["# A"], vec!["# B", "text"]]);
    }

    #[test]
    fn empty_stream_yields_nothing() {
        assert!(split(&[], true).is_empty());
    }

    #[test]
    fn section_header_text() {
        let section = Section::new(vec![Paragraph::from("## Install"), Paragraph::from("x")]);
        assert_eq!(section.header(), Some("Install"));
        assert_eq!(Section::new(vec![Paragraph::from("x")]).header(), None);
    }
}
