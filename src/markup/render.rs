//! Markdown + component rendering

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde_json::Value;

use super::blocks::{self, ComponentTag, Segment};
use super::components::{Components, Overrides};
use super::highlight::Highlighter;
use super::node::{
    Callout, Code, ConsCard, Heading, Image, Link, LinkKind, Node, ProsCard, TableData,
};
use super::slug::{HeadingSlugger, SlugCollision};
use crate::config::{HighlightConfig, MarkupConfig};
use crate::error::{BlogError, Result};
use crate::helpers::html_escape;

/// Renders post bodies to HTML
pub struct MarkupRenderer {
    highlighter: Highlighter,
    defaults: Components,
    collisions: SlugCollision,
}

impl MarkupRenderer {
    /// Create a renderer with default components and highlighting
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default(), &MarkupConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(highlight: &HighlightConfig, markup: &MarkupConfig) -> Self {
        Self {
            highlighter: Highlighter::new(highlight),
            defaults: Components::default(),
            collisions: markup.heading_collisions,
        }
    }

    /// Render a post body with the default components
    pub fn render(&self, source: &str) -> Result<String> {
        self.render_with(source, &Overrides::default())
    }

    /// Render a post body, replacing components named in `overrides`.
    ///
    /// Component tags are swapped for marker comments and the whole document
    /// goes through one Markdown parse, so reference links and heading slugs
    /// work across components.
    pub fn render_with(&self, source: &str, overrides: &Overrides) -> Result<String> {
        let components = self.defaults.merge(overrides);
        let mut document = String::with_capacity(source.len());
        let mut placeholders = Vec::new();
        flatten(source, &components, &mut document, &mut placeholders)?;

        let mut slugger = HeadingSlugger::new(self.collisions);
        Ok(self.render_markdown(&document, &components, &placeholders, &mut slugger))
    }

    fn render_markdown(
        &self,
        markdown: &str,
        components: &Components,
        placeholders: &[Placeholder],
        slugger: &mut HeadingSlugger,
    ) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut walker = Walker {
            highlighter: &self.highlighter,
            components,
            placeholders,
            slugger,
            frames: vec![Frame::new(FrameKind::Root)],
            table: None,
        };
        for event in parser {
            walker.event(event);
        }
        walker.finish()
    }
}

/// What a marker comment in the flattened document stands for
enum Placeholder {
    /// Component HTML, rendered up front
    Rendered(String),
    /// A callout whose body follows in the document, up to its end marker
    Callout { emoji: String },
}

enum Marker {
    Start(usize),
    End(usize),
}

const MARKER_PREFIX: &str = "chongland:component:";

impl Marker {
    fn parse(html: &str) -> Option<Self> {
        let inner = html.trim().strip_prefix("<!-- ")?.strip_suffix(" -->")?;
        match inner.strip_prefix('/') {
            Some(end) => end.strip_prefix(MARKER_PREFIX)?.parse().ok().map(Marker::End),
            None => inner.strip_prefix(MARKER_PREFIX)?.parse().ok().map(Marker::Start),
        }
    }

    fn to_comment(&self) -> String {
        match self {
            Marker::Start(index) => format!("<!-- {}{} -->", MARKER_PREFIX, index),
            Marker::End(index) => format!("<!-- /{}{} -->", MARKER_PREFIX, index),
        }
    }
}

/// Copy `source` into `document`, replacing component tags with markers.
/// Callout bodies are inlined between a start and an end marker.
fn flatten(
    source: &str,
    components: &Components,
    document: &mut String,
    placeholders: &mut Vec<Placeholder>,
) -> Result<()> {
    for segment in blocks::split(source)? {
        match segment {
            Segment::Markdown(markdown) => document.push_str(markdown),
            Segment::Component(tag) if tag.name == "Callout" => {
                let index = placeholders.len();
                placeholders.push(Placeholder::Callout {
                    emoji: tag.opt_str_prop("emoji").unwrap_or_default(),
                });
                push_marker(document, Marker::Start(index));
                flatten(
                    tag.body.as_deref().unwrap_or_default(),
                    components,
                    document,
                    placeholders,
                )?;
                push_marker(document, Marker::End(index));
            }
            Segment::Component(tag) => {
                let node = component_node(&tag)?;
                placeholders.push(Placeholder::Rendered(components.render(&node)));
                push_marker(document, Marker::Start(placeholders.len() - 1));
            }
        }
    }
    Ok(())
}

/// A marker between blank lines parses as an HTML block of its own
fn push_marker(document: &mut String, marker: Marker) {
    if !document.is_empty() && !document.ends_with('\n') {
        document.push('\n');
    }
    document.push('\n');
    document.push_str(&marker.to_comment());
    document.push_str("\n\n");
}

fn component_node(tag: &ComponentTag) -> Result<Node> {
    let node = match tag.name.as_str() {
        "ProsCard" => Node::ProsCard(ProsCard {
            title: tag.str_prop("title")?,
            items: tag.text_list_prop("pros")?,
        }),
        "ConsCard" => Node::ConsCard(ConsCard {
            title: tag.str_prop("title")?,
            items: tag.text_list_prop("cons")?,
        }),
        "Table" => {
            let data: Value = tag.expr_prop("data")?;
            let headers = tag.text_list("data.headers", &data["headers"])?;
            let rows = data["rows"]
                .as_array()
                .ok_or_else(|| BlogError::Markup("<Table> `data.rows` must be a list".into()))?
                .iter()
                .map(|row| tag.text_list("data.rows", row))
                .collect::<Result<Vec<_>>>()?;
            Node::Table(escape_table(TableData { headers, rows }))
        }
        "Image" => Node::Image(Image {
            src: tag.str_prop("src")?,
            alt: tag.str_prop("alt")?,
            title: tag.opt_str_prop("title"),
            width: tag.opt_str_prop("width"),
            height: tag.opt_str_prop("height"),
        }),
        other => {
            return Err(BlogError::Markup(format!("Unknown component <{}>", other)));
        }
    };
    Ok(node)
}

impl Default for MarkupRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Component props are plain text; table cells are HTML
fn escape_table(data: TableData) -> TableData {
    TableData {
        headers: data.headers.iter().map(|h| html_escape(h)).collect(),
        rows: data
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| html_escape(cell)).collect())
            .collect(),
    }
}

enum FrameKind {
    Root,
    Heading(u8),
    Link { href: String, title: String },
    Image { src: String, title: String },
    CodeBlock(Option<String>),
    Cell,
    Callout(String),
}

/// Output collected for an element whose component runs at its end tag
struct Frame {
    kind: FrameKind,
    html: String,
    text: String,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            html: String::new(),
            text: String::new(),
        }
    }
}

#[derive(Default)]
struct TableBuilder {
    data: TableData,
    row: Vec<String>,
}

struct Walker<'a> {
    highlighter: &'a Highlighter,
    components: &'a Components,
    placeholders: &'a [Placeholder],
    slugger: &'a mut HeadingSlugger,
    frames: Vec<Frame>,
    table: Option<TableBuilder>,
}

impl Walker<'_> {
    fn top(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn top_kind(&self) -> &FrameKind {
        &self.frames[self.frames.len() - 1].kind
    }

    fn push(&mut self, kind: FrameKind) {
        self.frames.push(Frame::new(kind));
    }

    /// Pop a frame, folding its plain text into the parent
    fn pop(&mut self) -> Frame {
        if self.frames.len() == 1 {
            return Frame::new(FrameKind::Root);
        }
        let frame = self.frames.pop().unwrap_or_else(|| Frame::new(FrameKind::Root));
        self.top().text.push_str(&frame.text);
        frame
    }

    fn emit(&mut self, node: Node) {
        let html = self.components.render(&node);
        self.top().html.push_str(&html);
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => self.push(FrameKind::Heading(level as u8)),
            Event::End(TagEnd::Heading(_)) => {
                let frame = self.pop();
                if let FrameKind::Heading(level) = frame.kind {
                    let slug = self.slugger.slug(&frame.text);
                    self.emit(Node::Heading(Heading {
                        level,
                        text: frame.text,
                        slug,
                        children: frame.html,
                    }));
                }
            }

            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => self.push(FrameKind::Link {
                href: dest_url.to_string(),
                title: title.to_string(),
            }),
            Event::End(TagEnd::Link) => {
                let frame = self.pop();
                if let FrameKind::Link { href, title } = frame.kind {
                    self.emit(Node::Link(Link {
                        kind: LinkKind::classify(&href),
                        href,
                        title: Some(title).filter(|t| !t.is_empty()),
                        children: frame.html,
                    }));
                }
            }

            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => self.push(FrameKind::Image {
                src: dest_url.to_string(),
                title: title.to_string(),
            }),
            Event::End(TagEnd::Image) => {
                let frame = self.pop();
                if let FrameKind::Image { src, title } = frame.kind {
                    self.emit(Node::Image(Image {
                        src,
                        alt: frame.text,
                        title: Some(title).filter(|t| !t.is_empty()),
                        width: None,
                        height: None,
                    }));
                }
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.push(FrameKind::CodeBlock(language));
            }
            Event::End(TagEnd::CodeBlock) => {
                if !matches!(self.top_kind(), FrameKind::CodeBlock(_)) {
                    return;
                }
                if let Some(Frame {
                    kind: FrameKind::CodeBlock(language),
                    text,
                    ..
                }) = self.frames.pop()
                {
                    let highlighted = self.highlighter.highlight(&text, language.as_deref());
                    self.emit(Node::Code(Code {
                        code: text,
                        language,
                        block: true,
                        highlighted,
                    }));
                }
            }
            Event::Code(code) => {
                let highlighted = self.highlighter.highlight(&code, None);
                self.top().text.push_str(&code);
                self.emit(Node::Code(Code {
                    code: code.to_string(),
                    language: None,
                    block: false,
                    highlighted,
                }));
            }

            Event::Start(Tag::Table(_)) => self.table = Some(TableBuilder::default()),
            Event::Start(Tag::TableHead) | Event::Start(Tag::TableRow) => {}
            Event::Start(Tag::TableCell) => self.push(FrameKind::Cell),
            Event::End(TagEnd::TableCell) => {
                let frame = self.pop();
                if let Some(table) = self.table.as_mut() {
                    table.row.push(frame.html);
                }
            }
            Event::End(TagEnd::TableHead) => {
                if let Some(table) = self.table.as_mut() {
                    table.data.headers = std::mem::take(&mut table.row);
                }
            }
            Event::End(TagEnd::TableRow) => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.data.rows.push(row);
                }
            }
            Event::End(TagEnd::Table) => {
                if let Some(table) = self.table.take() {
                    self.emit(Node::Table(table.data));
                }
            }

            Event::Text(text) => {
                let top = self.top();
                if !matches!(top.kind, FrameKind::CodeBlock(_)) {
                    top.html.push_str(&html_escape(&text));
                }
                top.text.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak
                if matches!(
                    self.top_kind(),
                    FrameKind::Heading(_) | FrameKind::Image { .. }
                ) =>
            {
                let top = self.top();
                top.text.push(' ');
                top.html.push(' ');
            }
            Event::Html(raw) => match Marker::parse(&raw) {
                Some(marker) => self.marker(marker),
                None => self.top().html.push_str(&raw),
            },
            other => html::push_html(&mut self.top().html, std::iter::once(other)),
        }
    }

    fn marker(&mut self, marker: Marker) {
        match marker {
            Marker::Start(index) => match self.placeholders.get(index) {
                Some(Placeholder::Rendered(html)) => self.top().html.push_str(html),
                Some(Placeholder::Callout { emoji }) => {
                    self.push(FrameKind::Callout(emoji.clone()))
                }
                None => {}
            },
            Marker::End(_) => {
                if !matches!(self.top_kind(), FrameKind::Callout(_)) {
                    return;
                }
                let frame = self.pop();
                if let FrameKind::Callout(emoji) = frame.kind {
                    self.emit(Node::Callout(Callout {
                        emoji,
                        body: frame.html,
                    }));
                }
            }
        }
    }

    fn finish(mut self) -> String {
        while self.frames.len() > 1 {
            let frame = self.pop();
            self.top().html.push_str(&frame.html);
        }
        std::mem::take(&mut self.top().html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> String {
        MarkupRenderer::new().render(source).unwrap()
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = render("Just a *paragraph*.");
        assert_eq!(html, "<p>Just a <em>paragraph</em>.</p>\n");
    }

    #[test]
    fn test_heading_gets_slug_and_anchor() {
        let html = render("## Hello, World!");
        assert_eq!(
            html,
            r##"<h2 id="hello-world"><a href="#hello-world" class="anchor"></a>Hello, World!</h2>"##
        );
    }

    #[test]
    fn test_heading_slug_uses_text_of_inline_children() {
        let html = render("### Using `cargo` & [docs](/docs)");
        assert!(html.contains(r#"id="using-cargo-and-docs""#));
        assert!(html.contains(r#"<a href="/docs" data-link="internal">docs</a>"#));
    }

    #[test]
    fn test_duplicate_headings_collide_by_default() {
        let html = render("# Notes\n\n# Notes\n");
        assert_eq!(html.matches(r#"id="notes""#).count(), 2);
    }

    #[test]
    fn test_duplicate_headings_suffixed_when_configured() {
        let markup = MarkupConfig {
            heading_collisions: SlugCollision::Suffix,
        };
        let renderer = MarkupRenderer::with_options(&HighlightConfig::default(), &markup);
        let html = renderer.render("# Notes\n\n# Notes\n").unwrap();
        assert!(html.contains(r#"id="notes""#));
        assert!(html.contains(r#"id="notes-1""#));
    }

    #[test]
    fn test_link_classification() {
        let html = render("[a](/about) [b](#section) [c](https://x.com)");
        assert!(html.contains(r#"<a href="/about" data-link="internal">a</a>"#));
        assert!(html.contains(r##"<a href="#section">b</a>"##));
        assert!(html.contains(
            r#"<a href="https://x.com" target="_blank" rel="noopener noreferrer">c</a>"#
        ));
    }

    #[test]
    fn test_markdown_image_is_rounded() {
        let html = render("![A cat](/images/cat.png)");
        assert!(html.contains(r#"<img src="/images/cat.png" alt="A cat" class="rounded-lg">"#));
    }

    #[test]
    fn test_code_span_is_highlighted() {
        let html = render("Call `let x = 1;` now");
        assert!(html.contains("<code>"));
        assert!(html.contains("<span"));
        assert!(!html.contains("`"));
    }

    #[test]
    fn test_code_block_is_highlighted() {
        let html = render("```rust\nfn main() {}\n```\n");
        assert!(html.contains(r#"<pre><code class="language-rust">"#));
        assert!(html.contains("<span"));
    }

    #[test]
    fn test_code_span_escapes_markup() {
        let html = render("`<b>bold</b>`");
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_gfm_table_uses_table_component() {
        let html = render("| A | B |\n|---|---|\n| 1 | **2** |\n");
        assert_eq!(
            html,
            "<table><thead><tr><th>A</th><th>B</th></tr></thead><tbody><tr><td>1</td><td><strong>2</strong></td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_table_component_escapes_cells() {
        let html = render(r#"<Table data={{"headers": ["Name"], "rows": [["<x>"]]}} />"#);
        assert!(html.contains("<th>Name</th>"));
        assert!(html.contains("<td>&lt;x&gt;</td>"));
    }

    #[test]
    fn test_callout_body_is_markdown() {
        let html = render("<Callout emoji=\"💡\">\nRead the **docs**.\n</Callout>\n");
        assert!(html.contains(r#"<div class="callout-emoji">💡</div>"#));
        assert!(html.contains("<strong>docs</strong>"));
    }

    #[test]
    fn test_pros_and_cons_cards() {
        let source = "<ProsCard title=\"SQLite\" pros={[\"Zero config\", \"Embedded\"]} />\n\n<ConsCard title=\"SQLite\" cons={[\"Single writer\"]} />\n";
        let html = render(source);
        assert!(html.contains("You might use SQLite if..."));
        assert!(html.contains("You might not use SQLite if..."));
        assert!(html.contains("Zero config"));
        assert!(html.contains("Single writer"));
    }

    #[test]
    fn test_image_component_requires_alt() {
        let err = MarkupRenderer::new()
            .render(r#"<Image src="/a.png" />"#)
            .unwrap_err();
        assert!(matches!(err, BlogError::Markup(_)));

        let html = render(r#"<Image src="/a.png" alt="A" width={640} />"#);
        assert!(html.contains(r#"width="640""#));
    }

    #[test]
    fn test_callout_override_applies_to_every_callout() {
        let overrides = Overrides::new().callout(|c: &Callout| format!("<aside>{}</aside>", c.emoji));
        let source = "<Callout emoji=\"1\">\na\n</Callout>\n\n## Title\n\n<Callout emoji=\"2\">\nb\n</Callout>\n";
        let html = MarkupRenderer::new()
            .render_with(source, &overrides)
            .unwrap();
        assert!(html.contains("<aside>1</aside>"));
        assert!(html.contains("<aside>2</aside>"));
        assert!(!html.contains("callout-emoji"));
        assert!(html.contains(r#"class="anchor""#));
    }

    #[test]
    fn test_components_inside_code_fences_stay_literal() {
        let html = render("```\n<Callout emoji=\"x\">\n```\n");
        assert!(html.contains("<pre><code>"));
        assert!(html.contains("Callout"));
        assert!(!html.contains("callout-emoji"));
    }

    #[test]
    fn test_reference_link_defined_after_component() {
        let source = "See [the docs][docs].\n\n<Callout emoji=\"i\">\nNote\n</Callout>\n\n[docs]: https://example.com\n";
        let html = render(source);
        assert!(html.contains(
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">the docs</a>"#
        ));
        assert!(!html.contains("[docs]"));
        assert!(!html.contains("chongland:component"));
    }

    #[test]
    fn test_reference_link_inside_callout_body() {
        let source = "<Callout emoji=\"i\">\nRead [this][ref].\n</Callout>\n\n[ref]: /about\n";
        let html = render(source);
        assert!(html.contains(r#"<div class="callout-body"><p>Read <a href="/about" data-link="internal">this</a>.</p>"#));
    }

    #[test]
    fn test_nested_callouts() {
        let source = "<Callout emoji=\"a\">\nOuter\n\n<Callout emoji=\"b\">\nInner\n</Callout>\n</Callout>\n";
        let html = render(source);
        assert_eq!(html.matches(r#"<div class="callout">"#).count(), 2);
        let outer = html.find("Outer").unwrap();
        let inner = html.find("Inner").unwrap();
        assert!(outer < inner);
        assert!(html.ends_with("</div></div></div></div>"));
    }

    #[test]
    fn test_table_component_accepts_numbers_and_booleans() {
        let html = render(
            r#"<Table data={{headers: ["Lang", "Stars", "Typed"], rows: [["Rust", 10, true]]}} />"#,
        );
        assert!(html.contains("<td>Rust</td><td>10</td><td>true</td>"));
    }

    #[test]
    fn test_cards_accept_numbers() {
        let html = render("<ProsCard title=\"Rust\" pros={[\"Fast\", 2024]} />\n");
        assert!(html.contains("2024"));
    }

    #[test]
    fn test_punctuation_is_left_alone() {
        let html = render("\"Quoted\" -- it's fine...");
        assert_eq!(html, "<p>&quot;Quoted&quot; -- it&#39;s fine...</p>\n");
    }

    #[test]
    fn test_raw_html_comments_pass_through() {
        let html = render("<!-- just a note -->\n\nText\n");
        assert!(html.contains("<!-- just a note -->"));
        assert!(html.contains("<p>Text</p>"));
    }
}
