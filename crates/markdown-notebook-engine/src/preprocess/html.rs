//! Rewrites HTML headers and `<pre>` blocks into their Markdown forms.

use std::collections::VecDeque;
use std::sync::OnceLock;

use regex::Regex;

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*<h([1-6])>\s*(.*?)\s*</h([1-6])>\s*$").expect("Invalid HTML header regex")
    })
}

fn pre_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<pre(?:\s+class="([^"]*)")?(?:\s[^>]*)?>"#).expect("Invalid pre regex")
    })
}

const PRE_CLOSE: &str = "</pre>";
const FENCE: &str = "```";

/// `<hN>text</hN>` on a line of its own becomes `# text` with N hashes.
fn markdown_header(line: &str) -> Option<String> {
    let caps = header_re().captures(line)?;
    if caps[1] != caps[3] {
        return None;
    }
    let level: usize = caps[1].parse().ok()?;
    Some(format!("{} {}", "#".repeat(level), &caps[2]))
}

/// Line adapter that turns inline HTML into Markdown.
///
/// Tracks whether it is inside a `<pre>` block across lines. Text inside the
/// block is passed through with HTML entities decoded; an unclosed block simply
/// runs to the end of input.
pub struct HtmlNormalizer<I> {
    lines: I,
    in_pre: bool,
    out: VecDeque<String>,
}

impl<I> HtmlNormalizer<I> {
    pub fn new(lines: I) -> Self {
        HtmlNormalizer {
            lines,
            in_pre: false,
            out: VecDeque::new(),
        }
    }

    fn process(&mut self, line: &str) {
        if self.in_pre {
            self.inside_pre(line);
            return;
        }

        let header = markdown_header(line);
        let line = header.as_deref().unwrap_or(line);

        let Some(m) = pre_open_re().captures(line) else {
            self.out.push_back(line.to_string());
            return;
        };
        let Some(tag) = m.get(0) else { return };

        let before = &line[..tag.start()];
        if !before.trim().is_empty() {
            self.out.push_back(before.to_string());
            self.out.push_back(String::new());
        }

        let classes = m
            .get(1)
            .map(|c| c.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        self.out.push_back(format!("{FENCE}{classes}"));
        self.in_pre = true;

        let after = &line[tag.end()..];
        if !after.is_empty() {
            self.inside_pre(after);
        }
    }

    fn inside_pre(&mut self, line: &str) {
        let Some((inner, rest)) = line.split_once(PRE_CLOSE) else {
            self.out.push_back(decode(line));
            return;
        };

        if !inner.is_empty() {
            self.out.push_back(decode(inner));
        }
        self.out.push_back(FENCE.to_string());
        self.in_pre = false;
        if !rest.trim().is_empty() {
            self.out.push_back(rest.to_string());
        }
    }
}

fn decode(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

impl<I, S> Iterator for HtmlNormalizer<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.out.pop_front() {
                return Some(line);
            }
            match self.lines.next() {
                Some(line) => self.process(line.as_ref()),
                None => {
                    if self.in_pre {
                        log::warn!("unclosed <pre> block runs to end of input");
                        self.in_pre = false;
                    }
                    return None;
                }
            }
        }
    }
}

/// Normalizes HTML in `lines`.
pub fn normalize_html<I>(lines: I) -> HtmlNormalizer<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    HtmlNormalizer::new(lines.into_iter())
}
