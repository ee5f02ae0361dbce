use std::collections::BTreeSet;

use crate::parsing::Paragraph;

/// Which paragraphs survive into the notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFilterOptions {
    /// A classed paragraph or tagged code block needs one of these to be kept.
    pub keep: BTreeSet<String>,
    /// Any of these drops a classed paragraph outright.
    pub force_filter: BTreeSet<String>,
    /// Code languages whose lines run as shell commands.
    pub shells: BTreeSet<String>,
}

impl ClassFilterOptions {
    pub const DEFAULT_LANGUAGE: &'static str = "py";
    pub const DEFAULT_SHELLS: [&'static str; 2] = ["sh", "bash"];
}

impl Default for ClassFilterOptions {
    fn default() -> Self {
        let shells: BTreeSet<String> = Self::DEFAULT_SHELLS.iter().map(|s| s.to_string()).collect();
        let mut keep: BTreeSet<String> = shells.iter().map(|s| format!("shell-{s}")).collect();
        keep.insert(format!("language-{}", Self::DEFAULT_LANGUAGE));
        ClassFilterOptions {
            keep,
            force_filter: BTreeSet::new(),
            shells,
        }
    }
}

/// Decides one paragraph: `None` drops it, otherwise it comes back with its
/// annotation removed and shell code rewritten.
pub fn filter_paragraph(mut paragraph: Paragraph, options: &ClassFilterOptions) -> Option<Paragraph> {
    if let Some(annotation) = paragraph.annotation.take() {
        let classes = annotation.classes();
        if !classes.is_empty() {
            if classes.iter().any(|c| options.force_filter.contains(c)) {
                log::debug!("force-filtered paragraph with classes {classes:?}");
                return None;
            }
            if !classes.iter().any(|c| options.keep.contains(c)) {
                log::debug!("filtered paragraph with classes {classes:?}");
                return None;
            }
        }
    }

    let rewritten = match paragraph.code_block() {
        Some(block) => {
            let lang = block.lang();
            let candidates = [
                lang.to_string(),
                format!("language-{lang}"),
                format!("shell-{lang}"),
            ];
            if !lang.is_empty() && !candidates.iter().any(|c| options.keep.contains(c)) {
                log::debug!("filtered code block tagged {lang:?}");
                return None;
            }

            // `<pre class="shell-sh">` arrives tagged with the class name
            let shell = lang.strip_prefix("shell-").unwrap_or(lang);
            options.shells.contains(shell).then(|| {
                let mut lines = vec![block.open_line.to_string()];
                lines.extend(block.body.iter().map(|line| shell_line(line)));
                lines.push(block.close_line.to_string());
                lines.join("\n")
            })
        }
        None => None,
    };
    if let Some(text) = rewritten {
        paragraph.text = text;
    }

    if paragraph.is_empty() {
        return None;
    }
    Some(paragraph)
}

/// Prefixes a command with `!`; comments and empty lines stay as they are.
fn shell_line(line: &str) -> String {
    if line.is_empty() || line.starts_with('#') {
        line.to_string()
    } else {
        format!("!{line}")
    }
}

/// Applies [`filter_paragraph`] across a paragraph stream.
pub fn filter_classes<I>(paragraphs: I, options: &ClassFilterOptions) -> impl Iterator<Item = Paragraph>
where
    I: IntoIterator<Item = Paragraph>,
{
    paragraphs
        .into_iter()
        .filter_map(move |p| filter_paragraph(p, options))
}
