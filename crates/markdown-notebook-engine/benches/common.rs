// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with some content\nspread over two lines.\n\n- Bullet point\n- Another item\n\n```py\ndef example():\n    print(\"Hello\")\n```\n\n```sh\npip install thing\n```\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_annotated_document(sections: usize) -> String {
    let mut content = String::new();

    for section in 0..sections {
        content.push_str(&format!("<h2>Section {section}</h2>\n\n"));
        content.push_str("Some paragraph content with multiple sentences.  \nA hard break follows.\n");
        content.push_str("{:.language-py}\n\n");
        content.push_str("{:.language-java}\nJava-only text that gets filtered.\n\n");
        content.push_str("<pre class=\"language-py\">\nif a &lt; b:\n    pass\n</pre>\n\n");
        content.push_str("    indented = True\n\n");
        if section % 3 == 0 {
            content.push_str("```bash\n# install\napt-get install thing\n```\n\n");
        }
    }

    content
}
