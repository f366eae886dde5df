//! Markdown body rendering and structure extraction

use lazy_static::lazy_static;
use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;

/// Heading text that introduces the FAQ block of an article
const FAQ_HEADING: &str = "FAQ Section";

const WORDS_PER_MINUTE: usize = 200;

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref ATX_HEADING: Regex = Regex::new(r"^(#{1,6})\s+(.+?)\s*#*\s*$").unwrap();
}

/// One entry of an article's table of contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub slug: String,
}

/// A question/answer pair from an article's FAQ section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// Anchor id for a heading: lowercase, punctuation dropped, whitespace runs
/// collapsed to `-`
pub fn heading_slug(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lower, "");
    WHITESPACE
        .replace_all(stripped.trim(), "-")
        .into_owned()
}

/// Markdown renderer for article bodies
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        // Front-matter is handled separately in FrontMatter::parse()
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION;
        Self { options }
    }

    /// Render markdown to HTML, giving every heading an anchor id
    pub fn render(&self, markdown: &str) -> String {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();

        let mut output: Vec<Event> = Vec::with_capacity(events.len());
        let mut i = 0;
        while i < events.len() {
            match &events[i] {
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) if id.is_none() => {
                    // Collect the heading text to compute its anchor
                    let mut text = String::new();
                    let mut j = i + 1;
                    while j < events.len() {
                        match &events[j] {
                            Event::End(TagEnd::Heading(_)) => break,
                            Event::Text(t) | Event::Code(t) => text.push_str(t),
                            _ => {}
                        }
                        j += 1;
                    }
                    output.push(Event::Start(Tag::Heading {
                        level: *level,
                        id: Some(CowStr::from(heading_slug(&text))),
                        classes: classes.clone(),
                        attrs: attrs.clone(),
                    }));
                }
                event => output.push(event.clone()),
            }
            i += 1;
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, output.into_iter());
        html_output
    }

    /// Table of contents built from the headings of `markdown`
    pub fn table_of_contents(&self, markdown: &str) -> Vec<Heading> {
        let mut headings = Vec::new();
        let mut current: Option<(u8, String)> = None;

        for event in Parser::new_ext(markdown, self.options) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current = Some((heading_level(level), String::new()));
                }
                Event::Text(t) | Event::Code(t) => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push_str(&t);
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, text)) = current.take() {
                        let text = text.trim().to_string();
                        let slug = heading_slug(&text);
                        headings.push(Heading { level, text, slug });
                    }
                }
                _ => {}
            }
        }

        headings
    }

    /// Question/answer pairs from the `FAQ Section` heading up to the next
    /// heading. Questions are paragraphs starting with `**Q:`, answers
    /// paragraphs starting with `A:`.
    pub fn extract_faq(&self, markdown: &str) -> Vec<FaqItem> {
        let mut items = Vec::new();
        let mut in_faq = false;
        let mut in_fence = false;
        let mut question: Option<String> = None;
        let mut answer: Vec<String> = Vec::new();

        let mut flush = |question: &mut Option<String>, answer: &mut Vec<String>| {
            if let Some(q) = question.take() {
                if !answer.is_empty() {
                    items.push(FaqItem {
                        question: q,
                        answer: answer.join(" ").trim().to_string(),
                    });
                }
            }
            answer.clear();
        };

        for line in markdown.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with("```") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }

            if let Some(caps) = ATX_HEADING.captures(trimmed) {
                if in_faq {
                    break;
                }
                in_faq = caps[2].trim() == FAQ_HEADING;
                continue;
            }

            if !in_faq {
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix("**Q:") {
                flush(&mut question, &mut answer);
                question = Some(rest.replacen("**", "", 1).trim().to_string());
            } else if let Some(rest) = trimmed.strip_prefix("A:") {
                if question.is_some() {
                    answer.push(rest.trim().to_string());
                }
            }
        }
        flush(&mut question, &mut answer);

        items
    }

    /// Estimated reading time in whole minutes, never less than one
    pub fn reading_time(&self, markdown: &str) -> usize {
        let words = markdown.split_whitespace().count();
        words.div_ceil(WORDS_PER_MINUTE).max(1)
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_slug() {
        assert_eq!(heading_slug("What is a Leasehold?"), "what-is-a-leasehold");
        assert_eq!(heading_slug("  Tax  &  Fees "), "tax-fees");
        assert_eq!(heading_slug("30-Year Lease"), "30-year-lease");
    }

    #[test]
    fn test_render_adds_heading_ids() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("## Key Takeaways\n\nSome *text*.\n");
        assert!(html.contains(r#"<h2 id="key-takeaways">Key Takeaways</h2>"#));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn test_table_of_contents() {
        let renderer = MarkdownRenderer::new();
        let md = "# Intro\n\ntext\n\n## The `lease` term\n\n```\n# not a heading\n```\n\n### Costs & Fees\n";
        let toc = renderer.table_of_contents(md);
        assert_eq!(toc.len(), 3);
        assert_eq!(toc[0].level, 1);
        assert_eq!(toc[0].slug, "intro");
        assert_eq!(toc[1].text, "The lease term");
        assert_eq!(toc[2].slug, "costs-fees");
    }

    #[test]
    fn test_extract_faq() {
        let renderer = MarkdownRenderer::new();
        let md = r#"## Overview

**Q: Not in the FAQ?**
A: Ignored.

## FAQ Section

**Q: Can foreigners own land?**

A: Not directly.

A: A lease is the usual route.

**Q: How long is a lease?**

A: Up to 30 years.

**Q: Unanswered?**

## Next Steps

Contact us.
"#;
        let faq = renderer.extract_faq(md);
        assert_eq!(faq.len(), 2);
        assert_eq!(faq[0].question, "Can foreigners own land?");
        assert_eq!(faq[0].answer, "Not directly. A lease is the usual route.");
        assert_eq!(faq[1].question, "How long is a lease?");
        assert_eq!(faq[1].answer, "Up to 30 years.");
    }

    #[test]
    fn test_reading_time() {
        let renderer = MarkdownRenderer::new();
        assert_eq!(renderer.reading_time(""), 1);
        assert_eq!(renderer.reading_time(&"word ".repeat(450)), 3);
    }
}
