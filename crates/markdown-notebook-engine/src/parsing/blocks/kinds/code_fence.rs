/// Which character a fence is built from. Backtick and tilde fences never close each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    pub fn char(self) -> char {
        match self {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '`' => Some(FenceKind::Backticks),
            '~' => Some(FenceKind::Tildes),
            _ => None,
        }
    }
}

/// An opening fence line: delimiter kind and length plus the trimmed info string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceOpen {
    pub kind: FenceKind,
    pub len: usize,
    pub info: String,
}

impl FenceOpen {
    /// First whitespace-separated token of the info string, empty if there is none.
    pub fn lang(&self) -> &str {
        self.info.split_whitespace().next().unwrap_or("")
    }

    /// The close line that matches this fence exactly.
    pub fn close_line(&self) -> String {
        self.kind.char().to_string().repeat(self.len)
    }
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";
    /// Fences may be indented by at most this many spaces.
    pub const MAX_INDENT: usize = 3;
    pub const MIN_LEN: usize = 3;

    /// Recognizes an opening fence line.
    ///
    /// Returns `None` for lines indented by four or more spaces, runs shorter than
    /// three characters, and backtick fences whose info string contains a backtick.
    pub fn open(line: &str) -> Option<FenceOpen> {
        let rest = Self::strip_indent(line)?;
        let kind = FenceKind::from_char(rest.chars().next()?)?;
        let len = rest.chars().take_while(|&c| c == kind.char()).count();
        if len < Self::MIN_LEN {
            return None;
        }

        // Fence characters are ASCII, so `len` is also a byte offset.
        let info = rest[len..].trim();
        if kind == FenceKind::Backticks && info.contains('`') {
            return None;
        }

        Some(FenceOpen {
            kind,
            len,
            info: info.to_string(),
        })
    }

    /// Whether `line` closes the block opened by `open`.
    pub fn closes(open: &FenceOpen, line: &str) -> bool {
        let Some(rest) = Self::strip_indent(line) else {
            return false;
        };
        let rest = rest.trim_end();
        let len = rest.chars().count();
        len >= open.len && rest.chars().all(|c| c == open.kind.char())
    }

    /// The shortest backtick fence that cannot be closed by any backtick run in `body`.
    pub fn fence_for(body: &str) -> String {
        let mut longest = 0;
        let mut run = 0;
        for c in body.chars() {
            if c == '`' {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }
        "`".repeat(Self::MIN_LEN.max(longest + 1))
    }

    fn strip_indent(line: &str) -> Option<&str> {
        let indent = line.bytes().take_while(|&b| b == b' ').count();
        if indent > Self::MAX_INDENT {
            return None;
        }
        Some(&line[indent..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn detect_backtick_fence() {
        let open = CodeFence::open("```rust").unwrap();
        assert_eq!(open.kind, FenceKind::Backticks);
        assert_eq!(open.len, 3);
        assert_eq!(open.lang(), "rust");
    }

    #[test]
    fn detect_tilde_fence() {
        let open = CodeFence::open("~~~~").unwrap();
        assert_eq!(open.kind, FenceKind::Tildes);
        assert_eq!(open.len, 4);
        assert_eq!(open.lang(), "");
    }

    #[test]
    fn lang_is_first_info_token() {
        let open = CodeFence::open("```  py  title=\"x\" ").unwrap();
        assert_eq!(open.info, "py  title=\"x\"");
        assert_eq!(open.lang(), "py");
    }

    #[rstest]
    #[case("hello")]
    #[case("``")]
    #[case("    ```")]
    #[case("```py`")]
    #[case("``` a ` b")]
    fn no_fence(#[case] line: &str) {
        assert_eq!(CodeFence::open(line), None);
    }

    #[test]
    fn tilde_info_may_contain_backticks() {
        let open = CodeFence::open("~~~ `odd`").unwrap();
        assert_eq!(open.info, "`odd`");
    }

    #[rstest]
    #[case("```", true)]
    #[case("````", true)]
    #[case("   ```  ", true)]
    #[case("``", false)]
    #[case("~~~", false)]
    #[case("``` py", false)]
    #[case("    ```", false)]
    fn closes_backtick_fence(#[case] line: &str, #[case] expected: bool) {
        let open = CodeFence::open("```py").unwrap();
        assert_eq!(CodeFence::closes(&open, line), expected);
    }

    #[test]
    fn close_must_be_at_least_open_length() {
        let open = CodeFence::open("`````").unwrap();
        assert!(!CodeFence::closes(&open, "```"));
        assert!(CodeFence::closes(&open, "`````"));
        assert!(CodeFence::closes(&open, "``````"));
    }

    #[test]
    fn fence_for_outgrows_backtick_runs() {
        assert_eq!(CodeFence::fence_for("plain"), "```");
        assert_eq!(CodeFence::fence_for("a ``` b"), "````");
        assert_eq!(CodeFence::fence_for("`````"), "``````");
    }
}
