//! Segmentation tests: line streams in, paragraphs out.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::parsing::{Paragraph, paragraphs};

fn segment(input: &str) -> Vec<Paragraph> {
    paragraphs(input.lines()).collect()
}

fn texts(input: &str) -> Vec<String> {
    segment(input).into_iter().map(|p| p.text).collect()
}

fn classes(p: &Paragraph) -> Vec<String> {
    p.annotation
        .as_ref()
        .map(|a| a.classes().to_vec())
        .unwrap_or_default()
}

// Line joining

#[test]
fn hard_break_keeps_newline() {
    assert_eq!(texts("aaa  \nbbb"), ["aaa\nbbb"]);
}

#[test]
fn soft_break_joins_with_space() {
    assert_eq!(texts("aaa\nbbb"), ["aaa bbb"]);
}

#[test]
fn continuation_lines_are_trimmed() {
    assert_eq!(texts("aaa\n   bbb \nccc"), ["aaa bbb ccc"]);
}

#[test]
fn list_items_start_their_own_line() {
    assert_eq!(texts("Steps:\n- one\n- two\n1. three"), ["Steps:\n- one\n- two\n1. three"]);
}

#[test]
fn blank_lines_separate_paragraphs() {
    assert_eq!(texts("para one\n\n\npara two"), ["para one", "para two"]);
}

#[rstest]
#[case::empty("")]
#[case::blank_lines("\n\n\n")]
#[case::whitespace("   \n\t\n")]
fn nothing_to_segment(#[case] input: &str) {
    assert!(segment(input).is_empty());
}

// Headers

#[test]
fn header_is_its_own_paragraph() {
    assert_eq!(texts("text\n# Head\nmore"), ["text", "# Head", "more"]);
}

#[test]
fn consecutive_headers() {
    assert_eq!(texts("# One\n## Two"), ["# One", "## Two"]);
}

// Fenced code

#[test]
fn fenced_block_is_verbatim() {
    let input = "intro\n```py\nx = 1\n\n  y = 2  \n# not a header\n```\nafter";
    assert_eq!(
        texts(input),
        ["intro", "```py\nx = 1\n\n  y = 2  \n# not a header\n```", "after"]
    );
}

#[test]
fn shorter_fence_does_not_close() {
    assert_eq!(texts("````\n```\n````"), ["````\n```\n````"]);
}

#[test]
fn other_fence_char_does_not_close() {
    assert_eq!(texts("```\n~~~\n```"), ["```\n~~~\n```"]);
}

#[test]
fn longer_close_fence_closes() {
    assert_eq!(texts("~~~\ncode\n~~~~~\ntext"), ["~~~\ncode\n~~~~~", "text"]);
}

#[test]
fn unclosed_fence_is_closed_at_end_of_input() {
    let got = segment("```sh\nls\n# still code");
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].text, "```sh\nls\n# still code\n```");
    assert!(got[0].is_code_block());
}

#[test]
fn backtick_in_info_string_is_not_a_fence() {
    assert_eq!(texts("``` a`b\ntext"), ["``` a`b text"]);
}

#[rstest]
#[case::backticks('`', 3)]
#[case::long_backticks('`', 5)]
#[case::tildes('~', 3)]
#[case::long_tildes('~', 4)]
fn fence_round_trip(#[case] ch: char, #[case] len: usize) {
    let fence = ch.to_string().repeat(len);
    let body = "let x = 1;\n\n    indented\n# hash\n{: .not-an-annotation }";
    let got = segment(&format!("{fence}rust\n{body}\n{fence}"));

    assert_eq!(got.len(), 1);
    let block = got[0].code_block().expect("code block");
    assert_eq!(block.source(), body);
    assert_eq!(block.lang(), "rust");
}

// Indented code

#[test]
fn indented_block_becomes_fenced() {
    assert_eq!(
        texts("    x = 1\n      y = 2\n\ntext"),
        ["```\nx = 1\n  y = 2\n```", "text"]
    );
}

#[test]
fn indented_block_keeps_inner_blank_line() {
    assert_eq!(texts("    a\n\n    b"), ["```\na\n\nb\n```"]);
}

#[test]
fn two_blank_lines_end_indented_block() {
    assert_eq!(texts("    a\n\n\n    b"), ["```\na\n```", "```\nb\n```"]);
}

#[test]
fn indented_line_cannot_interrupt_paragraph() {
    assert_eq!(texts("text\n    more"), ["text more"]);
}

#[test]
fn indented_body_with_backticks_gets_longer_fence() {
    assert_eq!(texts("    ```\n    x"), ["````\n```\nx\n````"]);
}

// Annotations

#[test]
fn leading_annotation_line() {
    let got = segment("{:.keep}\ntext here");
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].text, "text here");
    assert_eq!(classes(&got[0]), ["keep"]);
}

#[test]
fn trailing_annotation_line() {
    let got = segment("text\n{: .note}\n\nnext");
    assert_eq!(got.len(), 2);
    assert_eq!(got[0].text, "text");
    assert_eq!(classes(&got[0]), ["note"]);
    assert_eq!(got[1].annotation, None);
}

#[test]
fn trailing_annotation_on_fence_at_end_of_input() {
    let got = segment("```py\nx\n```\n{:.language-py}");
    assert_eq!(got.len(), 1);
    assert!(got[0].is_code_block());
    assert_eq!(classes(&got[0]), ["language-py"]);
}

#[test]
fn annotation_between_paragraphs_leads_the_next() {
    let got = segment("a\n{:.x}\nb");
    assert_eq!(got.len(), 2);
    assert_eq!(got[0].annotation, None);
    assert_eq!(got[1].text, "b");
    assert_eq!(classes(&got[1]), ["x"]);
}

#[test]
fn consecutive_annotation_lines_merge() {
    let got = segment("{:.a}\n{:.b}\n# Head");
    assert_eq!(got.len(), 1);
    assert_eq!(classes(&got[0]), ["a", "b"]);
}

#[test]
fn orphaned_annotation_is_dropped() {
    let got = segment("a\n\n{:.x}\n\nb");
    assert_eq!(got.iter().map(|p| p.text.as_str()).collect::<Vec<_>>(), ["a", "b"]);
    assert!(got.iter().all(|p| p.annotation.is_none()));
}

#[test]
fn inline_leading_token_on_fence() {
    let got = segment("{:.language-py}```py\nx\n```");
    assert_eq!(got[0].text, "```py\nx\n```");
    assert_eq!(classes(&got[0]), ["language-py"]);
}

#[test]
fn inline_trailing_token() {
    let got = segment("some text\nmore text {: .x}");
    assert_eq!(got[0].text, "some text more text");
    assert_eq!(classes(&got[0]), ["x"]);
}

#[test]
fn header_with_trailing_token() {
    let got = segment("# Title {: #intro}");
    assert_eq!(got[0].text, "# Title");
    let annotation = got[0].annotation.as_ref().expect("annotation");
    assert_eq!(annotation.attributes.id.as_deref(), Some("intro"));
}

#[test]
fn annotation_inside_fence_is_content() {
    let got = segment("```\n{:.x}\n```");
    assert_eq!(got[0].text, "```\n{:.x}\n```");
    assert_eq!(got[0].annotation, None);
}

#[test]
fn segmentation_snapshot() {
    let input = "\
# Getting started
Install the package:

```sh
pip install thing
```
{:.shell-sh}

Then import it
and run.
";
    let got: Vec<(String, Vec<String>)> =
        segment(input).iter().map(|p| (p.text.clone(), classes(p))).collect();
    insta::assert_debug_snapshot!(got, @r###"
    [
        (
            "# Getting started",
            [],
        ),
        (
            "Install the package:",
            [],
        ),
        (
            "```sh\npip install thing\n```",
            [
                "shell-sh",
            ],
        ),
        (
            "Then import it and run.",
            [],
        ),
    ]
    "###);
}
