//! Profile card generation.
//!
//! This module renders [`ProfileResult`]s as HTML, Markdown or JSON cards
//! and assembles cards into a complete output document.

use crate::analysis::compare;
use crate::cli::OutputFormat;
use crate::models::{Emphasis, Identity, ProfileResult, RepositorySummary};
use anyhow::Result;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

/// Join date pattern used when none is configured (e.g. `25 Jan 2011`).
pub const DEFAULT_DATE_FORMAT: &str = "%d %b %Y";

/// Placeholder shown when a profile has no bio.
pub const NO_BIO: &str = "No bio available";

/// Settings that affect how cards look.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// strftime pattern for the join date.
    pub date_format: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Render one card in the requested format.
pub fn render_card(
    result: &ProfileResult,
    emphasis: Emphasis,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(generate_html_card(result, emphasis, options)),
        OutputFormat::Markdown => Ok(generate_markdown_card(result, emphasis, options)),
        OutputFormat::Json => generate_json_card(result, emphasis),
    }
}

/// Render both sides of a battle. Emphasis comes from the star totals.
pub fn render_comparison(
    first: &ProfileResult,
    second: &ProfileResult,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<(String, String)> {
    let (first_emphasis, second_emphasis) = compare(first.clone(), second.clone()).emphasis();

    Ok((
        render_card(first, first_emphasis, format, options)?,
        render_card(second, second_emphasis, format, options)?,
    ))
}

/// Wrap rendered cards into a complete document.
pub fn render_page(cards: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Html => generate_html_page(cards),
        OutputFormat::Markdown => generate_markdown_page(cards),
        OutputFormat::Json => format!("[\n{}\n]\n", cards.join(",\n")),
    }
}

/// Whether a strftime pattern can be formatted by chrono.
pub fn is_valid_date_format(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

/// Format a join date, falling back to the default pattern if the
/// configured one is not valid strftime.
pub fn format_date(date: &DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        out.clear();
        out.push_str(&date.format(DEFAULT_DATE_FORMAT).to_string());
    }
    out
}

/// Generate the HTML markup for one card.
fn generate_html_card(
    result: &ProfileResult,
    emphasis: Emphasis,
    options: &RenderOptions,
) -> String {
    let identity = &result.identity;
    let mut card = String::new();

    card.push_str(&format!(
        "<div class=\"{} p-5 w-96 rounded-lg shadow-[__0px_0px_5px_0px_white] border-2 border-gray-300 text-black\">\n",
        emphasis.css_class()
    ));
    card.push_str(&format!(
        "  <img src=\"{}\" class=\"w-24 h-24 rounded-full mx-auto mb-3\" />\n",
        escape_html(&identity.avatar_url)
    ));
    card.push_str(&format!(
        "  <h2 class=\"text-xl font-bold text-center\">{}</h2>\n",
        escape_html(identity.title())
    ));
    card.push_str(&format!(
        "  <p class=\"text-center text-gray-600 mb-2\">{}</p>\n",
        escape_html(bio_text(identity))
    ));
    card.push_str(&format!(
        "  <p class=\"text-sm text-center\">Joined: {}</p>\n",
        format_date(&identity.joined, &options.date_format)
    ));

    match identity.blog_url {
        Some(ref blog) if is_web_link(blog) => card.push_str(&format!(
            "  <a href=\"{0}\" target=\"_blank\" class=\"block text-center text-blue-600 mt-2 break-all\">{0}</a>\n",
            escape_html(blog)
        )),
        Some(ref blog) => card.push_str(&format!(
            "  <p class=\"text-center text-gray-600 mt-2 break-all\">{}</p>\n",
            escape_html(blog)
        )),
        None => {}
    }

    card.push_str("  <div class=\"mt-4\">\n");
    card.push_str("    <h3 class=\"font-semibold mb-2\">Latest Repositories</h3>\n");
    for repo in &result.recent_repositories {
        card.push_str(&format!(
            "    <a href=\"{}\" target=\"_blank\" class=\"block text-blue-500 hover:underline\">{}</a>\n",
            escape_html(&repo.url),
            escape_html(&repo.name)
        ));
    }
    card.push_str("  </div>\n");

    card.push_str("  <div class=\"mt-4 text-sm\">\n");
    card.push_str(&format!(
        "    ⭐ Total Stars: <strong>{}</strong><br>\n",
        result.total_star_count
    ));
    card.push_str(&format!(
        "    👥 Followers: <strong>{}</strong>\n",
        identity.followers
    ));
    card.push_str("  </div>\n");
    card.push_str("</div>\n");

    card
}

/// Generate the Markdown text for one card.
fn generate_markdown_card(
    result: &ProfileResult,
    emphasis: Emphasis,
    options: &RenderOptions,
) -> String {
    let identity = &result.identity;
    let mut card = String::new();

    let badge = match emphasis {
        Emphasis::Neutral => String::new(),
        other => format!("{} ", other.emoji()),
    };
    card.push_str(&format!(
        "## {}{} (@{})\n\n",
        badge,
        escape_markdown(identity.title()),
        escape_markdown(&identity.handle)
    ));

    card.push_str(&format!(
        "![avatar]({})\n\n",
        markdown_url(&identity.avatar_url)
    ));
    for line in bio_text(identity).lines() {
        let line = escape_markdown(line.trim_end());
        if line.is_empty() {
            card.push_str(">\n");
        } else {
            card.push_str(&format!("> {}\n", line));
        }
    }
    card.push('\n');

    card.push_str(&format!(
        "- **Joined:** {}\n",
        format_date(&identity.joined, &options.date_format)
    ));
    match identity.blog_url {
        Some(ref blog) if is_web_link(blog) => {
            card.push_str(&format!(
                "- **Blog:** [{}]({})\n",
                escape_markdown(blog),
                markdown_url(blog)
            ));
        }
        Some(ref blog) => card.push_str(&format!("- **Blog:** {}\n", escape_markdown(blog))),
        None => {}
    }
    card.push('\n');

    card.push_str(&generate_markdown_repositories(&result.recent_repositories));

    card.push_str(&format!(
        "⭐ Total Stars: **{}** | 👥 Followers: **{}**\n",
        result.total_star_count, identity.followers
    ));

    card
}

/// Generate the repository list of a Markdown card.
fn generate_markdown_repositories(repos: &[RepositorySummary]) -> String {
    let mut section = String::new();

    section.push_str("### Latest Repositories\n\n");
    if repos.is_empty() {
        section.push_str("_No public repositories._\n\n");
        return section;
    }

    for repo in repos {
        section.push_str(&format!(
            "- [{}]({})\n",
            escape_markdown(&repo.name),
            markdown_url(&repo.url)
        ));
    }
    section.push('\n');

    section
}

#[derive(Serialize)]
struct JsonCard<'a> {
    emphasis: Emphasis,
    #[serde(flatten)]
    profile: &'a ProfileResult,
}

/// Generate a JSON card.
fn generate_json_card(result: &ProfileResult, emphasis: Emphasis) -> Result<String> {
    serde_json::to_string_pretty(&JsonCard {
        emphasis,
        profile: result,
    })
    .map_err(Into::into)
}

/// Generate a standalone HTML page holding the cards side by side.
fn generate_html_page(cards: &[String]) -> String {
    let mut page = String::new();

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\" />\n");
    page.push_str("<title>GitHub Profile Battle</title>\n");
    page.push_str("<script src=\"https://cdn.tailwindcss.com\"></script>\n");
    page.push_str("</head>\n<body class=\"bg-gray-900 min-h-screen p-8\">\n");
    page.push_str("<div class=\"flex flex-wrap gap-6 justify-center\">\n");
    for card in cards {
        page.push_str(card);
    }
    page.push_str("</div>\n</body>\n</html>\n");

    page
}

/// Generate a Markdown document holding the cards one after another.
fn generate_markdown_page(cards: &[String]) -> String {
    let mut page = String::new();

    page.push_str("# GitHub Profile");
    if cards.len() > 1 {
        page.push_str(" Battle");
    }
    page.push_str("\n\n");

    page.push_str(&cards.join("\n---\n\n"));
    page.push_str("\n---\n\n");
    page.push_str("*Generated by ghbattle*\n");

    page
}

fn bio_text(identity: &Identity) -> &str {
    identity.bio.as_deref().unwrap_or(NO_BIO)
}

/// Only absolute http(s) URLs become links.
fn is_web_link(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Escape text for a single line of Markdown. Line breaks become spaces so
/// user text cannot start a new block.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\r' | '\n' => escaped.push(' '),
            '\\' | '`' | '*' | '_' | '[' | ']' | '(' | ')' | '<' | '>' | '#' | '|' | '!' | '~'
            | '&' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }
    escaped
}

/// Angle-bracketed link destination with the characters that would end it encoded.
fn markdown_url(url: &str) -> String {
    let mut encoded = String::from("<");
    for c in url.trim().chars() {
        match c {
            '<' => encoded.push_str("%3C"),
            '>' => encoded.push_str("%3E"),
            c if c.is_whitespace() => encoded.push_str("%20"),
            c => encoded.push(c),
        }
    }
    encoded.push('>');
    encoded
}

/// Escape text for use inside HTML element content and quoted attributes.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::profile;

    fn bare_profile() -> ProfileResult {
        let mut result = profile("octocat", 3);
        result.identity.display_name = None;
        result.identity.bio = None;
        result.identity.blog_url = None;
        result
    }

    #[test]
    fn test_html_card_contents() {
        let result = profile("octocat", 915);
        let card = generate_html_card(&result, Emphasis::Neutral, &RenderOptions::default());

        assert!(card.contains("bg-white"));
        assert!(card.contains("octocat display"));
        assert!(card.contains("Writes code"));
        assert!(card.contains("Joined: 25 Jan 2011"));
        assert!(card.contains("href=\"https://octocat.dev\""));
        assert!(card.contains("octocat-repo"));
        assert!(card.contains("<strong>915</strong>"));
        assert!(card.contains("<strong>12</strong>"));
    }

    #[test]
    fn test_missing_optional_fields_use_fallbacks() {
        let result = bare_profile();
        let options = RenderOptions::default();

        for format in [OutputFormat::Html, OutputFormat::Markdown] {
            let card = render_card(&result, Emphasis::Neutral, format, &options).unwrap();
            assert!(card.contains(NO_BIO));
            assert!(card.contains("octocat"));
            assert!(!card.contains("null"));
            assert!(!card.contains("undefined"));
            assert!(!card.contains(".dev"));
        }
    }

    #[test]
    fn test_markdown_card_badges() {
        let result = profile("octocat", 1);
        let options = RenderOptions::default();

        let winner = generate_markdown_card(&result, Emphasis::Favorable, &options);
        assert!(winner.starts_with("## 🏆 octocat display (@octocat)"));

        let neutral = generate_markdown_card(&result, Emphasis::Neutral, &options);
        assert!(neutral.starts_with("## octocat display (@octocat)"));
    }

    #[test]
    fn test_markdown_card_without_repositories() {
        let mut result = profile("octocat", 0);
        result.recent_repositories.clear();

        let card = generate_markdown_card(&result, Emphasis::Neutral, &RenderOptions::default());
        assert!(card.contains("_No public repositories._"));
    }

    #[test]
    fn test_render_comparison_winner_and_loser() {
        let (a, b) = render_comparison(
            &profile("a", 100),
            &profile("b", 50),
            OutputFormat::Html,
            &RenderOptions::default(),
        )
        .unwrap();

        assert!(a.contains("bg-green-100"));
        assert!(b.contains("bg-red-100"));
    }

    #[test]
    fn test_render_comparison_tie() {
        let (a, b) = render_comparison(
            &profile("a", 42),
            &profile("b", 42),
            OutputFormat::Html,
            &RenderOptions::default(),
        )
        .unwrap();

        assert!(a.contains("bg-white"));
        assert!(b.contains("bg-white"));
    }

    #[test]
    fn test_json_card() {
        let json = render_card(
            &profile("octocat", 7),
            Emphasis::Unfavorable,
            OutputFormat::Json,
            &RenderOptions::default(),
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["emphasis"], "unfavorable");
        assert_eq!(value["total_star_count"], 7);
        assert_eq!(value["identity"]["handle"], "octocat");
    }

    #[test]
    fn test_json_page_is_valid_array() {
        let options = RenderOptions::default();
        let (a, b) = render_comparison(
            &profile("a", 1),
            &profile("b", 2),
            OutputFormat::Json,
            &options,
        )
        .unwrap();

        let page = render_page(&[a, b], OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&page).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_html_page_wraps_cards() {
        let page = render_page(&["<div>one</div>".to_string()], OutputFormat::Html);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<div>one</div>"));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_escape_html() {
        let mut result = profile("octocat", 0);
        result.identity.bio = Some("<script>alert('x')</script>".to_string());

        let card = generate_html_card(&result, Emphasis::Neutral, &RenderOptions::default());
        assert!(!card.contains("<script>"));
        assert!(card.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_markdown_multiline_bio_stays_quoted() {
        let mut result = profile("octocat", 1);
        result.identity.bio = Some("Builder\n## Total Stars: 999999\n\n*bold*".to_string());

        let card = generate_markdown_card(&result, Emphasis::Neutral, &RenderOptions::default());
        assert!(card.contains("> Builder\n> \\#\\# Total Stars: 999999\n>\n> \\*bold\\*\n"));
        for line in card.lines().filter(|line| line.contains("999999")) {
            assert!(line.starts_with("> "));
        }
        assert_eq!(card.lines().filter(|line| line.starts_with("## ")).count(), 1);
    }

    #[test]
    fn test_markdown_escapes_user_text() {
        let mut result = profile("octocat", 1);
        result.identity.display_name = Some("**Boss**\n# Winner".to_string());
        result.recent_repositories[0].name = "evil](https://x.test)".to_string();
        result.recent_repositories[0].url = "https://github.com/o/a b>".to_string();

        let card = generate_markdown_card(&result, Emphasis::Neutral, &RenderOptions::default());
        assert!(card.starts_with("## \\*\\*Boss\\*\\* \\# Winner (@octocat)\n"));
        assert!(card.contains("- [evil\\]\\(https://x.test\\)](<https://github.com/o/a%20b%3E>)\n"));
    }

    #[test]
    fn test_blog_without_web_scheme_is_not_linked() {
        let mut result = profile("octocat", 1);
        result.identity.blog_url = Some("javascript:alert(1)".to_string());
        let options = RenderOptions::default();

        let html = generate_html_card(&result, Emphasis::Neutral, &options);
        assert!(!html.contains("href=\"javascript:"));
        assert!(html.contains("javascript:alert(1)"));

        let markdown = generate_markdown_card(&result, Emphasis::Neutral, &options);
        assert!(markdown.contains("- **Blog:** javascript:alert\\(1\\)\n"));
        assert!(!markdown.contains("](<javascript"));

        result.identity.blog_url = Some("https://octocat.dev".to_string());
        let markdown = generate_markdown_card(&result, Emphasis::Neutral, &options);
        assert!(markdown.contains("- **Blog:** [https://octocat.dev](<https://octocat.dev>)\n"));
    }

    #[test]
    fn test_format_date() {
        let date = profile("x", 0).identity.joined;
        assert_eq!(format_date(&date, DEFAULT_DATE_FORMAT), "25 Jan 2011");
        assert_eq!(format_date(&date, "%Y-%m-%d"), "2011-01-25");
        assert_eq!(format_date(&date, "%Q"), "25 Jan 2011");
    }

    #[test]
    fn test_is_valid_date_format() {
        assert!(is_valid_date_format(DEFAULT_DATE_FORMAT));
        assert!(is_valid_date_format("%Y-%m-%d"));
        assert!(!is_valid_date_format("%Q"));
    }
}
