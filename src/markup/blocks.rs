//! Splits a post body into Markdown runs and MDX-style component tags
//!
//! Component tags are recognized only at the start of a line and never
//! inside fenced code blocks:
//!
//! ```text
//! <Callout emoji="💡">
//! Body is **markdown**.
//! </Callout>
//!
//! <ProsCard title="Rust" pros={["Fast", "Safe"]} />
//! <Table data={{headers: ["A"], rows: [["1"]]}} />
//! ```

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{BlogError, Result};

/// Component tags recognized in post bodies
const COMPONENT_TAGS: [&str; 5] = ["Callout", "ProsCard", "ConsCard", "Table", "Image"];

/// A prop value as written in the tag
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(String),
    Expr(Value),
    Flag,
}

impl PropValue {
    /// String form of scalar values (numbers included)
    pub fn to_text(&self) -> Option<String> {
        match self {
            PropValue::Str(s) => Some(s.clone()),
            PropValue::Expr(value) => scalar_text(value),
            PropValue::Flag => None,
        }
    }
}

/// Text a scalar renders as; `null` renders nothing. Lists and objects have no text.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// One parsed component tag
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentTag {
    pub name: String,
    pub props: IndexMap<String, PropValue>,
    /// Raw children between the opening and closing tag
    pub body: Option<String>,
}

impl ComponentTag {
    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }

    pub fn str_prop(&self, name: &str) -> Result<String> {
        self.prop(name)
            .and_then(PropValue::to_text)
            .ok_or_else(|| BlogError::Markup(format!("<{}> requires a `{}` prop", self.name, name)))
    }

    pub fn opt_str_prop(&self, name: &str) -> Option<String> {
        self.prop(name).and_then(PropValue::to_text)
    }

    /// Deserialize an expression prop, e.g. `pros={["a", "b"]}`
    pub fn expr_prop<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T> {
        match self.prop(name) {
            Some(PropValue::Expr(value)) => Ok(serde_json::from_value(value.clone())?),
            Some(_) => Err(BlogError::Markup(format!(
                "<{}> prop `{}` must be an expression",
                self.name, name
            ))),
            None => Err(BlogError::Markup(format!(
                "<{}> requires a `{}` prop",
                self.name, name
            ))),
        }
    }

    /// A list prop whose items are rendered as text, e.g. `pros={["Fast", 10]}`
    pub fn text_list_prop(&self, name: &str) -> Result<Vec<String>> {
        let value: Value = self.expr_prop(name)?;
        self.text_list(name, &value)
    }

    /// Text of every scalar in `value`, which must be a list
    pub fn text_list(&self, name: &str, value: &Value) -> Result<Vec<String>> {
        let items = value.as_array().ok_or_else(|| {
            BlogError::Markup(format!("<{}> `{}` must be a list", self.name, name))
        })?;
        items
            .iter()
            .map(|item| {
                scalar_text(item).ok_or_else(|| {
                    BlogError::Markup(format!(
                        "<{}> `{}` items must be text, numbers or booleans, found {}",
                        self.name, name, item
                    ))
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    Markdown(&'a str),
    Component(ComponentTag),
}

/// Split `source` into Markdown runs and component tags, in document order
pub fn split(source: &str) -> Result<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut fences = FenceTracker::default();
    let mut md_start = 0;
    let mut pos = 0;

    while pos < source.len() {
        let line_end = source[pos..]
            .find('\n')
            .map(|i| pos + i + 1)
            .unwrap_or(source.len());
        let line = &source[pos..line_end];
        let trimmed = line.trim_start();

        if fences.update(line) {
            pos = line_end;
            continue;
        }

        if starts_component(trimmed) {
            let tag_start = pos + (line.len() - trimmed.len());
            let (tag, consumed) = parse_tag(&source[tag_start..])?;

            if md_start < pos {
                segments.push(Segment::Markdown(&source[md_start..pos]));
            }
            segments.push(Segment::Component(tag));

            pos = tag_start + consumed;
            // Drop the rest of the tag's line when it is blank
            let rest_end = source[pos..]
                .find('\n')
                .map(|i| pos + i + 1)
                .unwrap_or(source.len());
            if source[pos..rest_end].trim().is_empty() {
                pos = rest_end;
            }
            md_start = pos;
            continue;
        }

        pos = line_end;
    }

    if md_start < source.len() {
        segments.push(Segment::Markdown(&source[md_start..]));
    }

    Ok(segments)
}

/// Tracks fenced code blocks line by line
#[derive(Debug, Default)]
struct FenceTracker {
    open: Option<String>,
}

impl FenceTracker {
    /// Feed the next line. True when the line is a fence or inside one.
    fn update(&mut self, line: &str) -> bool {
        let marker = fence_marker(line.trim_start());
        match self.open.take() {
            Some(open) => {
                // A closing fence is at least as long and carries no info string
                let closes = matches!(
                    &marker,
                    Some((fence, info)) if fence.starts_with(open.as_str()) && info.trim().is_empty()
                );
                if !closes {
                    self.open = Some(open);
                }
                true
            }
            None => match marker {
                Some((fence, _)) => {
                    self.open = Some(fence);
                    true
                }
                None => false,
            },
        }
    }
}

/// The fence run at the start of `line` and the info string after it
fn fence_marker(line: &str) -> Option<(String, &str)> {
    for ch in ['`', '~'] {
        let count = line.chars().take_while(|c| *c == ch).count();
        if count >= 3 {
            return Some((ch.to_string().repeat(count), &line[count..]));
        }
    }
    None
}

/// Byte offset of the `</name>` closing an already-open `<name>`.
/// Nested tags of the same name and fenced code are skipped.
fn find_closing(input: &str, name: &str) -> Option<usize> {
    let opening = format!("<{}", name);
    let closing = format!("</{}>", name);
    let mut depth = 1;
    let mut fences = FenceTracker::default();
    let mut offset = 0;

    for line in input.split_inclusive('\n') {
        if !fences.update(line) {
            let mut i = 0;
            while i < line.len() {
                let rest = &line[i..];
                if rest.starts_with(&closing) {
                    depth -= 1;
                    if depth == 0 {
                        return Some(offset + i);
                    }
                    i += closing.len();
                } else if rest.starts_with(&opening) && opens_nested(&rest[opening.len()..]) {
                    depth += 1;
                    i += opening.len();
                } else {
                    i += rest.chars().next().map_or(1, char::len_utf8);
                }
            }
        }
        offset += line.len();
    }
    None
}

/// Whether the text after `<Name` starts a tag with children
fn opens_nested(after_name: &str) -> bool {
    match after_name.chars().next() {
        Some(c) if c.is_whitespace() || c == '>' => after_name
            .find('>')
            .map_or(true, |end| !after_name[..end].trim_end().ends_with('/')),
        _ => false,
    }
}

fn starts_component(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('<') else {
        return false;
    };
    COMPONENT_TAGS.iter().any(|name| {
        rest.strip_prefix(name)
            .and_then(|after| after.chars().next())
            .map(|c| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(false)
    })
}

/// Parse a tag starting at `input[0] == '<'`. Returns the tag and bytes consumed.
fn parse_tag(input: &str) -> Result<(ComponentTag, usize)> {
    let mut cursor = Cursor::new(input);
    cursor.expect('<')?;
    let name = cursor.take_while(|c| c.is_ascii_alphanumeric());
    let mut props = IndexMap::new();

    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            Some('/') => {
                cursor.bump();
                cursor.expect('>')?;
                let tag = ComponentTag {
                    name,
                    props,
                    body: None,
                };
                return Ok((tag, cursor.pos));
            }
            Some('>') => {
                cursor.bump();
                break;
            }
            Some(c) if c.is_alphabetic() || c == '_' => {
                let key = cursor.take_while(|c| c.is_alphanumeric() || c == '_' || c == '-');
                cursor.skip_whitespace();
                let value = if cursor.peek() == Some('=') {
                    cursor.bump();
                    cursor.skip_whitespace();
                    cursor.prop_value()?
                } else {
                    PropValue::Flag
                };
                props.insert(key, value);
            }
            Some(c) => {
                return Err(BlogError::Markup(format!(
                    "Unexpected `{}` in <{}> tag",
                    c, name
                )))
            }
            None => return Err(BlogError::Markup(format!("Unterminated <{}> tag", name))),
        }
    }

    let closing = format!("</{}>", name);
    let rest = &input[cursor.pos..];
    let end = find_closing(rest, &name)
        .ok_or_else(|| BlogError::Markup(format!("Missing {}", closing)))?;
    let body = dedent(rest[..end].trim_matches('\n'));
    let consumed = cursor.pos + end + closing.len();

    Ok((
        ComponentTag {
            name,
            props,
            body: Some(body),
        },
        consumed,
    ))
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(BlogError::Markup(format!(
                "Expected `{}`, found `{}`",
                expected, c
            ))),
            None => Err(BlogError::Markup(format!(
                "Expected `{}`, found end of input",
                expected
            ))),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        self.input[start..self.pos].to_string()
    }

    fn prop_value(&mut self) -> Result<PropValue> {
        match self.bump() {
            Some(quote @ ('"' | '\'')) => {
                let start = self.pos;
                loop {
                    match self.bump() {
                        Some(c) if c == quote => {
                            return Ok(PropValue::Str(
                                self.input[start..self.pos - 1].to_string(),
                            ))
                        }
                        Some(_) => {}
                        None => return Err(BlogError::Markup("Unterminated string prop".into())),
                    }
                }
            }
            Some('{') => {
                let start = self.pos;
                let mut depth = 1;
                let mut quote: Option<char> = None;
                while depth > 0 {
                    let c = self
                        .bump()
                        .ok_or_else(|| BlogError::Markup("Unterminated prop expression".into()))?;
                    match (quote, c) {
                        (Some(_), '\\') => {
                            self.bump();
                        }
                        (Some(q), c) if c == q => quote = None,
                        (Some(_), _) => {}
                        (None, '"' | '\'') => quote = Some(c),
                        (None, '{') => depth += 1,
                        (None, '}') => depth -= 1,
                        _ => {}
                    }
                }
                parse_expr(&self.input[start..self.pos - 1]).map(PropValue::Expr)
            }
            Some(c) => Err(BlogError::Markup(format!(
                "Unexpected `{}` in prop value",
                c
            ))),
            None => Err(BlogError::Markup("Missing prop value".into())),
        }
    }
}

/// JSON first, then YAML flow syntax for JS-style unquoted keys
fn parse_expr(expr: &str) -> Result<Value> {
    let expr = expr.trim();
    match serde_json::from_str(expr) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_str::<Value>(expr).map_err(|yaml_err| {
            tracing::debug!("YAML fallback failed for prop expression: {}", yaml_err);
            BlogError::Markup(format!("Invalid prop expression `{}`: {}", expr, json_err))
        }),
    }
}

/// Strip the common leading indentation from every non-blank line
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_markdown_is_one_segment() {
        let segments = split("# Title\n\nBody\n").unwrap();
        assert_eq!(segments, vec![Segment::Markdown("# Title\n\nBody\n")]);
    }

    #[test]
    fn test_self_closing_with_expression_props() {
        let source = "Intro\n\n<ProsCard title=\"Rust\" pros={[\"Fast\", \"Safe\"]} />\n\nOutro\n";
        let segments = split(source).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Markdown("Intro\n\n"));
        let Segment::Component(tag) = &segments[1] else {
            panic!("expected component");
        };
        assert_eq!(tag.name, "ProsCard");
        assert_eq!(tag.str_prop("title").unwrap(), "Rust");
        let pros: Vec<String> = tag.expr_prop("pros").unwrap();
        assert_eq!(pros, vec!["Fast", "Safe"]);
        assert_eq!(segments[2], Segment::Markdown("\nOutro\n"));
    }

    #[test]
    fn test_callout_with_body() {
        let source = "<Callout emoji=\"💡\">\n  Some **bold** advice.\n</Callout>\n";
        let segments = split(source).unwrap();
        assert_eq!(segments.len(), 1);
        let Segment::Component(tag) = &segments[0] else {
            panic!("expected component");
        };
        assert_eq!(tag.str_prop("emoji").unwrap(), "💡");
        assert_eq!(tag.body.as_deref(), Some("Some **bold** advice."));
    }

    #[test]
    fn test_yaml_flow_expression() {
        let source = "<Table data={{headers: [\"A\", \"B\"], rows: [[\"1\", \"2\"]]}} />";
        let segments = split(source).unwrap();
        let Segment::Component(tag) = &segments[0] else {
            panic!("expected component");
        };
        let value: serde_json::Value = tag.expr_prop("data").unwrap();
        assert_eq!(value["headers"][1], "B");
        assert_eq!(value["rows"][0][0], "1");
    }

    #[test]
    fn test_tags_inside_fences_are_ignored() {
        let source = "```mdx\n<Callout emoji=\"x\">\n```\n";
        let segments = split(source).unwrap();
        assert_eq!(segments, vec![Segment::Markdown(source)]);
    }

    #[test]
    fn test_lowercase_html_is_not_a_component() {
        let source = "<table><tr><td>x</td></tr></table>\n<Tables />\n";
        assert_eq!(split(source).unwrap(), vec![Segment::Markdown(source)]);
    }

    #[test]
    fn test_missing_closing_tag_is_an_error() {
        let err = split("<Callout emoji=\"!\">\nno end\n").unwrap_err();
        assert!(matches!(err, BlogError::Markup(_)));
    }

    #[test]
    fn test_flag_prop() {
        let segments = split("<Image src=\"/a.png\" alt=\"A\" priority />").unwrap();
        let Segment::Component(tag) = &segments[0] else {
            panic!("expected component");
        };
        assert_eq!(tag.prop("priority"), Some(&PropValue::Flag));
    }

    #[test]
    fn test_nested_callout_body_is_complete() {
        let source = "<Callout emoji=\"a\">\nOuter\n<Callout emoji=\"b\">\nInner\n</Callout>\nAfter\n</Callout>\n";
        let segments = split(source).unwrap();
        assert_eq!(segments.len(), 1);
        let Segment::Component(tag) = &segments[0] else {
            panic!("expected component");
        };
        assert_eq!(
            tag.body.as_deref(),
            Some("Outer\n<Callout emoji=\"b\">\nInner\n</Callout>\nAfter")
        );
    }

    #[test]
    fn test_closing_tag_inside_body_fence_is_skipped() {
        let source = "<Callout>\n```mdx\n</Callout>\n```\nDone\n</Callout>\n";
        let segments = split(source).unwrap();
        let Segment::Component(tag) = &segments[0] else {
            panic!("expected component");
        };
        assert_eq!(tag.body.as_deref(), Some("```mdx\n</Callout>\n```\nDone"));
    }

    #[test]
    fn test_fence_with_info_string_does_not_close() {
        let source = "```\n```rust\n<Callout>\n```\n";
        assert_eq!(split(source).unwrap(), vec![Segment::Markdown(source)]);
    }

    #[test]
    fn test_text_list_accepts_scalars() {
        let segments = split("<ProsCard title=\"X\" pros={[\"Fast\", 10, true]} />").unwrap();
        let Segment::Component(tag) = &segments[0] else {
            panic!("expected component");
        };
        assert_eq!(tag.text_list_prop("pros").unwrap(), vec!["Fast", "10", "true"]);

        let segments = split("<ProsCard title=\"X\" pros={[[1]]} />").unwrap();
        let Segment::Component(tag) = &segments[0] else {
            panic!("expected component");
        };
        assert!(tag.text_list_prop("pros").is_err());
    }
}
