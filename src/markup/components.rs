//! Default components and per-render overrides
//!
//! Every element kind has one render function. A render call starts from
//! [`Components::default`] and merges the caller's [`Overrides`] on top,
//! producing a fresh record; nothing here is global or mutable.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::node::{
    Callout, Code, ConsCard, Heading, Image, Link, LinkKind, Node, ProsCard, TableData,
};
use crate::error::BlogError;
use crate::helpers::html_escape;

/// A render function for one element kind
pub type Render<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Names under which components can be replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKey {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Link,
    Image,
    Code,
    Table,
    Callout,
    ProsCard,
    ConsCard,
}

impl ComponentKey {
    pub const ALL: [ComponentKey; 13] = [
        ComponentKey::H1,
        ComponentKey::H2,
        ComponentKey::H3,
        ComponentKey::H4,
        ComponentKey::H5,
        ComponentKey::H6,
        ComponentKey::Link,
        ComponentKey::Image,
        ComponentKey::Code,
        ComponentKey::Table,
        ComponentKey::Callout,
        ComponentKey::ProsCard,
        ComponentKey::ConsCard,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ComponentKey::H1 => "h1",
            ComponentKey::H2 => "h2",
            ComponentKey::H3 => "h3",
            ComponentKey::H4 => "h4",
            ComponentKey::H5 => "h5",
            ComponentKey::H6 => "h6",
            ComponentKey::Link => "a",
            ComponentKey::Image => "Image",
            ComponentKey::Code => "code",
            ComponentKey::Table => "Table",
            ComponentKey::Callout => "Callout",
            ComponentKey::ProsCard => "ProsCard",
            ComponentKey::ConsCard => "ConsCard",
        }
    }

    /// Heading key for a level, clamped to 1..=6
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => ComponentKey::H1,
            2 => ComponentKey::H2,
            3 => ComponentKey::H3,
            4 => ComponentKey::H4,
            5 => ComponentKey::H5,
            _ => ComponentKey::H6,
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComponentKey {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| BlogError::Markup(format!("Unknown component: {}", s)))
    }
}

/// The full set of render functions used for one render call
#[derive(Clone)]
pub struct Components {
    headings: [Render<Heading>; 6],
    link: Render<Link>,
    image: Render<Image>,
    code: Render<Code>,
    table: Render<TableData>,
    callout: Render<Callout>,
    pros_card: Render<ProsCard>,
    cons_card: Render<ConsCard>,
}

impl Default for Components {
    fn default() -> Self {
        let heading: Render<Heading> = Arc::new(render_heading);
        Self {
            headings: [
                heading.clone(),
                heading.clone(),
                heading.clone(),
                heading.clone(),
                heading.clone(),
                heading,
            ],
            link: Arc::new(render_link),
            image: Arc::new(render_image),
            code: Arc::new(render_code),
            table: Arc::new(render_table),
            callout: Arc::new(render_callout),
            pros_card: Arc::new(render_pros_card),
            cons_card: Arc::new(render_cons_card),
        }
    }
}

impl Components {
    /// New record with every override in `overrides` replacing the current entry
    pub fn merge(&self, overrides: &Overrides) -> Components {
        let mut merged = self.clone();
        for (slot, replacement) in merged.headings.iter_mut().zip(&overrides.headings) {
            if let Some(render) = replacement {
                *slot = render.clone();
            }
        }
        if let Some(render) = &overrides.link {
            merged.link = render.clone();
        }
        if let Some(render) = &overrides.image {
            merged.image = render.clone();
        }
        if let Some(render) = &overrides.code {
            merged.code = render.clone();
        }
        if let Some(render) = &overrides.table {
            merged.table = render.clone();
        }
        if let Some(render) = &overrides.callout {
            merged.callout = render.clone();
        }
        if let Some(render) = &overrides.pros_card {
            merged.pros_card = render.clone();
        }
        if let Some(render) = &overrides.cons_card {
            merged.cons_card = render.clone();
        }
        merged
    }

    /// Render a node with the component registered for its kind
    pub fn render(&self, node: &Node) -> String {
        match node {
            Node::Heading(heading) => {
                let index = usize::from(heading.level.clamp(1, 6)) - 1;
                (self.headings[index])(heading)
            }
            Node::Link(link) => (self.link)(link),
            Node::Image(image) => (self.image)(image),
            Node::Code(code) => (self.code)(code),
            Node::Table(table) => (self.table)(table),
            Node::Callout(callout) => (self.callout)(callout),
            Node::ProsCard(card) => (self.pros_card)(card),
            Node::ConsCard(card) => (self.cons_card)(card),
        }
    }
}

/// Caller-supplied replacements, applied with [`Components::merge`]
#[derive(Clone, Default)]
pub struct Overrides {
    headings: [Option<Render<Heading>>; 6],
    link: Option<Render<Link>>,
    image: Option<Render<Image>>,
    code: Option<Render<Code>>,
    table: Option<Render<TableData>>,
    callout: Option<Render<Callout>>,
    pros_card: Option<Render<ProsCard>>,
    cons_card: Option<Render<ConsCard>>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the heading component for one level (1..=6)
    pub fn heading<F>(mut self, level: u8, render: F) -> Self
    where
        F: Fn(&Heading) -> String + Send + Sync + 'static,
    {
        let index = usize::from(level.clamp(1, 6)) - 1;
        self.headings[index] = Some(Arc::new(render));
        self
    }

    pub fn link<F>(mut self, render: F) -> Self
    where
        F: Fn(&Link) -> String + Send + Sync + 'static,
    {
        self.link = Some(Arc::new(render));
        self
    }

    pub fn image<F>(mut self, render: F) -> Self
    where
        F: Fn(&Image) -> String + Send + Sync + 'static,
    {
        self.image = Some(Arc::new(render));
        self
    }

    pub fn code<F>(mut self, render: F) -> Self
    where
        F: Fn(&Code) -> String + Send + Sync + 'static,
    {
        self.code = Some(Arc::new(render));
        self
    }

    pub fn table<F>(mut self, render: F) -> Self
    where
        F: Fn(&TableData) -> String + Send + Sync + 'static,
    {
        self.table = Some(Arc::new(render));
        self
    }

    pub fn callout<F>(mut self, render: F) -> Self
    where
        F: Fn(&Callout) -> String + Send + Sync + 'static,
    {
        self.callout = Some(Arc::new(render));
        self
    }

    pub fn pros_card<F>(mut self, render: F) -> Self
    where
        F: Fn(&ProsCard) -> String + Send + Sync + 'static,
    {
        self.pros_card = Some(Arc::new(render));
        self
    }

    pub fn cons_card<F>(mut self, render: F) -> Self
    where
        F: Fn(&ConsCard) -> String + Send + Sync + 'static,
    {
        self.cons_card = Some(Arc::new(render));
        self
    }

    /// Keys that carry a replacement
    pub fn keys(&self) -> Vec<ComponentKey> {
        let mut keys: Vec<ComponentKey> = self
            .headings
            .iter()
            .enumerate()
            .filter(|(_, render)| render.is_some())
            .map(|(i, _)| ComponentKey::heading(i as u8 + 1))
            .collect();
        let singles = [
            (ComponentKey::Link, self.link.is_some()),
            (ComponentKey::Image, self.image.is_some()),
            (ComponentKey::Code, self.code.is_some()),
            (ComponentKey::Table, self.table.is_some()),
            (ComponentKey::Callout, self.callout.is_some()),
            (ComponentKey::ProsCard, self.pros_card.is_some()),
            (ComponentKey::ConsCard, self.cons_card.is_some()),
        ];
        keys.extend(singles.into_iter().filter(|(_, set)| *set).map(|(k, _)| k));
        keys
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("keys", &self.keys())
            .finish()
    }
}

fn render_heading(heading: &Heading) -> String {
    let level = heading.level.clamp(1, 6);
    format!(
        r##"<h{level} id="{slug}"><a href="#{slug}" class="anchor"></a>{children}</h{level}>"##,
        level = level,
        slug = heading.slug,
        children = heading.children
    )
}

fn render_link(link: &Link) -> String {
    let href = html_escape(&link.href);
    let title = link
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| format!(r#" title="{}""#, html_escape(t)))
        .unwrap_or_default();

    match link.kind {
        LinkKind::Internal => format!(
            r#"<a href="{}" data-link="internal"{}>{}</a>"#,
            href, title, link.children
        ),
        LinkKind::InPage => format!(r#"<a href="{}"{}>{}</a>"#, href, title, link.children),
        LinkKind::External => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer"{}>{}</a>"#,
            href, title, link.children
        ),
    }
}

fn render_image(image: &Image) -> String {
    let mut attrs = format!(
        r#"src="{}" alt="{}" class="rounded-lg""#,
        html_escape(&image.src),
        html_escape(&image.alt)
    );
    if let Some(title) = image.title.as_deref().filter(|t| !t.is_empty()) {
        attrs.push_str(&format!(r#" title="{}""#, html_escape(title)));
    }
    if let Some(width) = &image.width {
        attrs.push_str(&format!(r#" width="{}""#, html_escape(width)));
    }
    if let Some(height) = &image.height {
        attrs.push_str(&format!(r#" height="{}""#, html_escape(height)));
    }
    format!("<img {}>", attrs)
}

fn render_code(code: &Code) -> String {
    if code.block {
        let class = code
            .language
            .as_deref()
            .map(|lang| format!(r#" class="language-{}""#, html_escape(lang)))
            .unwrap_or_default();
        format!("<pre><code{}>{}</code></pre>", class, code.highlighted)
    } else {
        format!("<code>{}</code>", code.highlighted)
    }
}

fn render_table(table: &TableData) -> String {
    let headers: String = table
        .headers
        .iter()
        .map(|header| format!("<th>{}</th>", header))
        .collect();
    let rows: String = table
        .rows
        .iter()
        .map(|row| {
            let cells: String = row.iter().map(|cell| format!("<td>{}</td>", cell)).collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();
    format!(
        "<table><thead><tr>{}</tr></thead><tbody>{}</tbody></table>",
        headers, rows
    )
}

fn render_callout(callout: &Callout) -> String {
    format!(
        r#"<div class="callout"><div class="callout-emoji">{}</div><div class="callout-body">{}</div></div>"#,
        html_escape(&callout.emoji),
        callout.body
    )
}

fn render_card(class: &str, heading: &str, marker: &str, items: &[String]) -> String {
    let items: String = items
        .iter()
        .map(|item| {
            format!(
                r#"<div class="card-item"><span class="card-marker">{}</span><span>{}</span></div>"#,
                marker,
                html_escape(item)
            )
        })
        .collect();
    format!(
        r#"<div class="{}"><span>{}</span><div class="card-items">{}</div></div>"#,
        class,
        html_escape(heading),
        items
    )
}

fn render_pros_card(card: &ProsCard) -> String {
    render_card(
        "pros-card",
        &format!("You might use {} if...", card.title),
        "✓",
        &card.items,
    )
}

fn render_cons_card(card: &ConsCard) -> String {
    render_card(
        "cons-card",
        &format!("You might not use {} if...", card.title),
        "✗",
        &card.items,
    )
}
