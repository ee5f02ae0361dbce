//! Attribute annotations: `{: #id .class1 .class2 key='value' }`.
//!
//! An annotation decorates the paragraph before or after it. It may stand on its
//! own line or be glued to the start of a paragraph's first line or the end of
//! its last line. Parsing never fails: malformed items inside the braces are
//! logged and skipped.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Parsed contents of an annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub id: Option<String>,
    /// Class names in order of appearance.
    pub classes: Vec<String>,
    pub pairs: BTreeMap<String, String>,
}

/// An annotation token as written plus what it parsed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub raw: String,
    pub attributes: Attributes,
}

fn standalone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\{:([^}]*)\}\s*$").expect("Invalid annotation regex"))
}

fn leading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\{:([^}]*)\})\s*(\S.*)$").expect("Invalid leading annotation regex")
    })
}

fn trailing_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^(.*\S)\s*(\{:([^}\n]*)\})\s*$").expect("Invalid trailing annotation regex")
    })
}

fn item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^(?:#(?P<id>[\w-]+)|\.(?P<class>[\w-]+)|(?P<skey>[\w-]+)='(?P<svalue>[^']*)'|(?P<dkey>[\w-]+)="(?P<dvalue>[^"]*)")$"#,
        )
        .expect("Invalid attribute item regex")
    })
}

impl Attributes {
    /// Parses the text between `{:` and `}`.
    pub fn parse(body: &str) -> Self {
        let mut attributes = Attributes::default();
        for item in body.split_whitespace() {
            let Some(caps) = item_re().captures(item) else {
                log::warn!("invalid attribute syntax: {item:?}");
                continue;
            };
            if let Some(id) = caps.name("id") {
                attributes.id = Some(id.as_str().to_string());
            } else if let Some(class) = caps.name("class") {
                attributes.classes.push(class.as_str().to_string());
            } else if let (Some(key), Some(value)) = (caps.name("skey"), caps.name("svalue")) {
                attributes
                    .pairs
                    .insert(key.as_str().to_string(), value.as_str().to_string());
            } else if let (Some(key), Some(value)) = (caps.name("dkey"), caps.name("dvalue")) {
                attributes
                    .pairs
                    .insert(key.as_str().to_string(), value.as_str().to_string());
            }
        }
        attributes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Later values win for the id and for repeated keys; classes accumulate.
    fn merge(&mut self, other: Attributes) {
        if other.id.is_some() {
            self.id = other.id;
        }
        for class in other.classes {
            if !self.has_class(&class) {
                self.classes.push(class);
            }
        }
        self.pairs.extend(other.pairs);
    }
}

impl Annotation {
    fn new(raw: &str, body: &str) -> Self {
        Annotation {
            raw: raw.trim().to_string(),
            attributes: Attributes::parse(body),
        }
    }

    /// A line that holds nothing but an annotation.
    pub fn from_line(line: &str) -> Option<Self> {
        let caps = standalone_re().captures(line)?;
        Some(Self::new(line, &caps[1]))
    }

    /// An annotation glued to the start of a line, returned with the rest of the line.
    pub fn split_leading(line: &str) -> Option<(Self, &str)> {
        let caps = leading_re().captures(line)?;
        let rest = caps.get(3)?.as_str();
        Some((Self::new(&caps[1], &caps[2]), rest))
    }

    /// An annotation glued to the end of `text`, returned with the text before it.
    pub fn split_trailing(text: &str) -> Option<(&str, Self)> {
        let caps = trailing_re().captures(text)?;
        let rest = caps.get(1)?.as_str();
        Some((rest, Self::new(&caps[2], &caps[3])))
    }

    /// Folds a second annotation for the same paragraph into this one.
    pub fn merge(mut self, other: Annotation) -> Self {
        self.raw = format!("{}\n{}", self.raw, other.raw);
        self.attributes.merge(other.attributes);
        self
    }

    pub fn classes(&self) -> &[String] {
        &self.attributes.classes
    }
}
