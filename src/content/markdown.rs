//! Markdown rendering with syntax highlighting and element overrides
//!
//! Post documents are parsed with pulldown-cmark, then three element-level
//! overrides are applied before the HTML is emitted:
//! - fenced code blocks go through syntect, keyed by the declared language
//!   tag (default language when none is declared);
//! - external links (href containing a scheme separator) open in a new
//!   context with safe-referrer attributes;
//! - strong text gets a consistent style hook.
//!
//! The final markup is sanitized with ammonia; the sanitizer is configured
//! to keep the class/target/rel attributes the overrides emit.

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    default_language: String,
    sanitizer: ammonia::Builder<'static>,
}

impl MarkdownRenderer {
    /// Create a renderer with the given default code-block language
    pub fn new(default_language: &str) -> Self {
        let mut sanitizer = ammonia::Builder::default();
        sanitizer
            .add_generic_attributes(&["class"])
            .add_tag_attributes("a", &["target", "rel"])
            .link_rel(None);

        Self {
            default_language: default_language.to_string(),
            sanitizer,
        }
    }

    /// Render markdown to sanitized HTML. Never fails: malformed markdown
    /// and unknown highlight languages degrade to best-effort output.
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();
        let mut in_external_link = false;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_content.clear();
                    code_lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().map(str::to_string)
                        }
                        CodeBlockKind::Indented => None,
                    };
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    let highlighted =
                        self.highlight_code(&code_content, code_lang.take().as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                }
                Event::Text(text) if in_code_block => {
                    code_content.push_str(&text);
                }
                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) if is_external(&dest_url) => {
                    // Links do not nest in markdown, a single flag suffices.
                    in_external_link = true;
                    let title_attr = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, html_escape(&title))
                    };
                    events.push(Event::Html(CowStr::from(format!(
                        r#"<a href="{}"{} target="_blank" rel="noopener noreferrer">"#,
                        html_escape(&dest_url),
                        title_attr
                    ))));
                }
                Event::End(TagEnd::Link) if in_external_link => {
                    in_external_link = false;
                    events.push(Event::Html(CowStr::from("</a>")));
                }
                Event::Start(Tag::Strong) => {
                    events.push(Event::Html(CowStr::from(r#"<strong class="fw7">"#)));
                }
                Event::End(TagEnd::Strong) => {
                    events.push(Event::Html(CowStr::from("</strong>")));
                }
                _ => {
                    if !in_code_block {
                        events.push(event);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        self.sanitizer.clean(&html_output).to_string()
    }

    /// Highlight a fenced code block, falling back to an escaped plain
    /// block when highlighting fails
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or(&self.default_language);

        let syntax = SYNTAX_SET
            .find_syntax_by_token(lang)
            .or_else(|| SYNTAX_SET.find_syntax_by_extension(lang))
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            if generator
                .parse_html_for_line_which_includes_newline(line)
                .is_err()
            {
                return plain_code_block(code, lang);
            }
        }

        format!(
            r#"<pre class="highlight highlight-{lang}"><code class="hljs lang-{lang}">{}</code></pre>"#,
            generator.finalize()
        )
    }
}

/// Whether a link target leaves the site
fn is_external(href: &str) -> bool {
    href.contains("://")
}

/// Escaped, unhighlighted code block
fn plain_code_block(code: &str, lang: &str) -> String {
    format!(
        r#"<pre class="highlight highlight-{lang}"><code class="hljs lang-{lang}">{}</code></pre>"#,
        html_escape(code)
    )
}

/// Simple HTML escaping
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
