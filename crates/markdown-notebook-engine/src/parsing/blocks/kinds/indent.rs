/// Leading-whitespace handling with tabs expanded to fixed tab stops.
///
/// All indentation-sensitive syntax (indented code blocks, fence indentation limits)
/// measures columns through here so that a tab always fills to the next stop.
pub struct Indent;

impl Indent {
    pub const TAB_STOP: usize = 4;
    /// Columns of indentation that turn a line into indented code.
    pub const CODE_BLOCK: usize = 4;

    /// Width in columns of the leading whitespace of `line`.
    pub fn columns(line: &str) -> usize {
        let mut col = 0;
        for c in line.chars() {
            match c {
                ' ' => col += 1,
                '\t' => col += Self::TAB_STOP - col % Self::TAB_STOP,
                _ => break,
            }
        }
        col
    }

    /// Removes `n` columns of leading whitespace.
    ///
    /// A tab that straddles the cut is split: the columns it still covers past `n`
    /// come back as spaces.
    pub fn strip_columns(line: &str, n: usize) -> String {
        let mut col = 0;
        for (i, c) in line.char_indices() {
            if col >= n {
                return line[i..].to_string();
            }
            let width = match c {
                ' ' => 1,
                '\t' => Self::TAB_STOP - col % Self::TAB_STOP,
                _ => return line[i..].to_string(),
            };
            col += width;
            if col > n {
                let rest = &line[i + c.len_utf8()..];
                return format!("{}{rest}", " ".repeat(col - n));
            }
        }
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_count_spaces() {
        assert_eq!(Indent::columns("    code"), 4);
        assert_eq!(Indent::columns("code"), 0);
    }

    #[test]
    fn tab_fills_to_next_stop() {
        assert_eq!(Indent::columns("\tcode"), 4);
        assert_eq!(Indent::columns("  \tcode"), 4);
        assert_eq!(Indent::columns(" \t\tcode"), 8);
    }

    #[test]
    fn strip_whole_columns() {
        assert_eq!(Indent::strip_columns("      x = 1", 4), "  x = 1");
        assert_eq!(Indent::strip_columns("\tx = 1", 4), "x = 1");
    }

    #[test]
    fn strip_splits_straddling_tab() {
        // The tab covers columns 2..4; stripping 3 leaves one column of it.
        assert_eq!(Indent::strip_columns("  \tx", 3), " x");
    }

    #[test]
    fn strip_blank_line() {
        assert_eq!(Indent::strip_columns("  ", 4), "");
    }
}
