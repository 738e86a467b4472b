//! MDX body parsing
//!
//! Turns the body of a thought into a [`Document`] tree. Parsing is pure: no
//! I/O and no markup output, so everything here can be checked without
//! rendering. Presentation lives in [`super::render`].

use lazy_static::lazy_static;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::ops::Range;

use super::ContentError;

/// Image size used when the document does not give one
pub const DEFAULT_IMAGE_WIDTH: u32 = 800;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 600;

/// Elements that never take a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(
        r#"(?s)^<(/)?([A-Za-z][\w.:-]*)((?:"[^"]*"|'[^']*'|\{[^}]*\}|[^>"'{}])*?)(/)?>"#
    )
    .unwrap();
    static ref PARTIAL_TAG_RE: Regex = Regex::new(
        r#"(?s)^</?[A-Za-z][\w.:-]*(?:"[^"]*"|'[^']*'|\{[^}]*\}|[^>"'{}])*(?:"[^"]*|'[^']*|\{[^}]*)?$"#
    )
    .unwrap();
    static ref ATTR_RE: Regex = Regex::new(
        r#"([A-Za-z_:][\w:.-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|\{([^}]*)\}|([^\s"'=<>`/]+)))?"#
    )
    .unwrap();
    static ref JSX_TAG_RE: Regex = Regex::new(
        r#"<(?:/?>|[A-Za-z][\w.:-]*(?:"[^"]*"|'[^']*'|\{[^}]*\}|[^<>"'{}])*>)"#
    )
    .unwrap();
    static ref EXPR_ATTR_RE: Regex = Regex::new(r"=\s*\{([^}]*)\}").unwrap();
}

/// Where a link leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Site-relative path, navigated within the site
    Internal,
    /// `http(s)` or `mailto:` target, opened in a new browsing context
    External,
    /// Anything else (fragments, relative paths)
    Plain,
}

impl LinkKind {
    pub fn classify(href: &str) -> Self {
        if href.starts_with('/') {
            LinkKind::Internal
        } else if href.starts_with("http") || href.starts_with("mailto:") {
            LinkKind::External
        } else {
            LinkKind::Plain
        }
    }
}

/// An image with the layout box reserved before it loads
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Image {
    fn new(src: String) -> Self {
        Self {
            src,
            alt: String::new(),
            title: None,
            caption: None,
            width: DEFAULT_IMAGE_WIDTH,
            height: DEFAULT_IMAGE_HEIGHT,
        }
    }
}

/// A node of a parsed thought body
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Heading { level: u8, children: Vec<Node> },
    Paragraph(Vec<Node>),
    Link {
        href: String,
        kind: LinkKind,
        title: Option<String>,
        children: Vec<Node>,
    },
    Image(Image),
    BlockQuote(Vec<Node>),
    CodeBlock { language: Option<String>, code: String },
    InlineCode(String),
    /// `start` is `Some` for ordered lists
    List { start: Option<u64>, items: Vec<Node> },
    ListItem(Vec<Node>),
    ThematicBreak,
    Emphasis(Vec<Node>),
    Strong(Vec<Node>),
    Strikethrough(Vec<Node>),
    Text(String),
    SoftBreak,
    HardBreak,
}

/// Parsed body of a thought
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    /// Concatenated text content, without markup
    pub fn plain_text(&self) -> String {
        plain_text(&self.nodes)
    }
}

/// Parse an MDX body into a node tree.
///
/// Fails with [`ContentError::MalformedBody`] when the body contains a NUL
/// character or its embedded element tags do not balance.
pub fn parse(body: &str) -> Result<Document, ContentError> {
    if let Some(pos) = body.find('\0') {
        return Err(ContentError::malformed(
            line_at(body, pos),
            "NUL character in body",
        ));
    }

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let body = normalize_jsx(body, options);
    let body = body.as_ref();

    let mut builder = TreeBuilder::default();

    for (event, range) in Parser::new_ext(body, options).into_offset_iter() {
        match event {
            Event::Start(tag) => builder.open(tag),
            Event::End(_) => builder.close(),
            Event::Text(text) => builder.text(&text),
            Event::Code(code) => builder.push(Node::InlineCode(code.to_string())),
            Event::Html(html) | Event::InlineHtml(html) => {
                builder.html(&html, line_at(body, range.start))?
            }
            Event::SoftBreak => builder.push(Node::SoftBreak),
            Event::HardBreak => builder.push(Node::HardBreak),
            Event::Rule => builder.push(Node::ThematicBreak),
            Event::FootnoteReference(name) => builder.text(&format!("[{}]", name)),
            Event::TaskListMarker(checked) => {
                builder.text(if checked { "[x] " } else { "[ ] " })
            }
            _ => {}
        }
    }

    builder.finish()
}

/// Rewrite MDX-only tag syntax outside code into plain HTML so CommonMark
/// sees it as markup: `{...}` attribute values become quoted strings and
/// `<>`/`</>` fragments become `<Fragment>` elements. Line breaks are kept,
/// so line numbers still point into the original body.
fn normalize_jsx(body: &str, options: Options) -> Cow<'_, str> {
    if !JSX_TAG_RE.is_match(body) {
        return Cow::Borrowed(body);
    }

    let code: Vec<Range<usize>> = Parser::new_ext(body, options)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Code(_) | Event::Start(Tag::CodeBlock(_)) => Some(range),
            _ => None,
        })
        .collect();

    let mut out = String::with_capacity(body.len());
    let mut last = 0;

    for m in JSX_TAG_RE.find_iter(body) {
        if code.iter().any(|r| r.contains(&m.start())) {
            continue;
        }

        let tag = m.as_str();
        let replacement = match tag {
            "<>" => "<Fragment>".to_string(),
            "</>" => "</Fragment>".to_string(),
            _ if tag.contains('{') && !is_autolink(tag) => quote_expressions(tag),
            _ => continue,
        };

        out.push_str(&body[last..m.start()]);
        out.push_str(&replacement);
        last = m.end();
    }

    if last == 0 {
        return Cow::Borrowed(body);
    }
    out.push_str(&body[last..]);
    Cow::Owned(out)
}

/// `<https://...>` and `<user@host>` are links, not elements
fn is_autolink(tag: &str) -> bool {
    let head = tag[1..]
        .split(|c: char| c.is_whitespace() || c == '>')
        .next()
        .unwrap_or("");
    head.contains(':') || head.contains('@')
}

fn quote_expressions(tag: &str) -> String {
    EXPR_ATTR_RE
        .replace_all(tag, |caps: &Captures| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let value = unquote_expression(caps.get(1).map_or("", |m| m.as_str()));
            let breaks = "\n".repeat(newlines(whole) - newlines(&value));
            if value.contains('"') {
                format!("='{}'{}", value.replace('\'', "&#39;"), breaks)
            } else {
                format!("=\"{}\"{}", value, breaks)
            }
        })
        .into_owned()
}

/// A container waiting for its end event
enum Frame {
    Heading(u8),
    Paragraph,
    Link {
        href: String,
        title: Option<String>,
    },
    Image {
        src: String,
        title: Option<String>,
    },
    BlockQuote,
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    List(Option<u64>),
    Item,
    Emphasis,
    Strong,
    Strikethrough,
    /// Unsupported construct; its children are kept as plain content,
    /// followed by the separator
    Fallback(&'static str),
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<(Frame, Vec<Node>)>,
    /// Open embedded elements with the line they were opened on
    elements: Vec<(String, usize)>,
    /// Start of a tag split across HTML events
    pending: Option<(String, usize)>,
    /// Void element or `Image` emitted by the previous tag; an explicit
    /// closing tag for it is accepted
    last_void: Option<String>,
    in_comment: bool,
}

impl TreeBuilder {
    fn open(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph,
            Tag::Heading { level, .. } => Frame::Heading(heading_level(level)),
            Tag::BlockQuote(_) => Frame::BlockQuote,
            Tag::CodeBlock(kind) => Frame::CodeBlock {
                language: match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| lang.to_string()),
                    CodeBlockKind::Indented => None,
                },
                code: String::new(),
            },
            Tag::List(start) => Frame::List(start),
            Tag::Item => Frame::Item,
            Tag::Emphasis => Frame::Emphasis,
            Tag::Strong => Frame::Strong,
            Tag::Strikethrough => Frame::Strikethrough,
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => Frame::Link {
                href: match link_type {
                    LinkType::Email => format!("mailto:{}", dest_url),
                    _ => dest_url.to_string(),
                },
                title: non_empty(&title),
            },
            Tag::Image {
                dest_url, title, ..
            } => Frame::Image {
                src: dest_url.to_string(),
                title: non_empty(&title),
            },
            Tag::TableCell => Frame::Fallback(" "),
            Tag::TableHead | Tag::TableRow => Frame::Fallback("\n"),
            _ => Frame::Fallback(""),
        };
        self.stack.push((frame, Vec::new()));
    }

    fn close(&mut self) {
        let Some((frame, children)) = self.stack.pop() else {
            return;
        };

        let node = match frame {
            Frame::Heading(level) => Node::Heading { level, children },
            Frame::Paragraph => Node::Paragraph(children),
            Frame::Link { href, title } => Node::Link {
                kind: LinkKind::classify(&href),
                href,
                title,
                children,
            },
            Frame::Image { src, title } => {
                let mut image = Image::new(src);
                image.alt = plain_text(&children);
                image.caption = title.clone();
                image.title = title;
                Node::Image(image)
            }
            Frame::BlockQuote => Node::BlockQuote(children),
            Frame::CodeBlock { language, code } => Node::CodeBlock { language, code },
            Frame::List(start) => Node::List {
                start,
                items: children,
            },
            Frame::Item => Node::ListItem(children),
            Frame::Emphasis => Node::Emphasis(children),
            Frame::Strong => Node::Strong(children),
            Frame::Strikethrough => Node::Strikethrough(children),
            Frame::Fallback(separator) => {
                for child in children {
                    self.push(child);
                }
                if !separator.is_empty() {
                    self.text(separator);
                }
                return;
            }
        };

        self.push(node);
    }

    fn push(&mut self, node: Node) {
        let siblings = match self.stack.last_mut() {
            Some((_, children)) => children,
            None => &mut self.root,
        };

        // Merge adjacent text runs
        if let (Node::Text(new), Some(Node::Text(last))) = (&node, siblings.last_mut()) {
            last.push_str(new);
            return;
        }
        siblings.push(node);
    }

    fn text(&mut self, text: &str) {
        if let Some((Frame::CodeBlock { code, .. }, _)) = self.stack.last_mut() {
            code.push_str(text);
            return;
        }
        self.push(Node::Text(text.to_string()));
    }

    /// Scan raw HTML/JSX for element tags. Tags must balance; recognized
    /// elements become nodes and any other text is kept as plain text.
    fn html(&mut self, html: &str, line: usize) -> Result<(), ContentError> {
        let (buffer, mut line) = match self.pending.take() {
            Some((mut pending, pending_line)) => {
                pending.push_str(html);
                (pending, pending_line)
            }
            None => (html.to_string(), line),
        };
        let mut rest = buffer.as_str();

        loop {
            if self.in_comment {
                match rest.find("-->") {
                    Some(end) => {
                        line += newlines(&rest[..end]);
                        rest = &rest[end + 3..];
                        self.in_comment = false;
                        continue;
                    }
                    None => return Ok(()),
                }
            }

            let Some(start) = rest.find('<') else {
                self.html_text(rest);
                return Ok(());
            };

            self.html_text(&rest[..start]);
            line += newlines(&rest[..start]);
            rest = &rest[start..];

            if let Some(after) = rest.strip_prefix("<!--") {
                self.in_comment = true;
                rest = after;
                continue;
            }

            if let Some(caps) = TAG_RE.captures(rest) {
                let whole = caps.get(0).map_or("", |m| m.as_str());
                let closing = caps.get(1).is_some();
                let name = caps.get(2).map_or("", |m| m.as_str());
                let attrs = caps.get(3).map_or("", |m| m.as_str());
                let self_closing = caps.get(4).is_some();

                self.element(name, attrs, closing, self_closing, line)?;

                line += newlines(whole);
                rest = &rest[whole.len()..];
                continue;
            }

            if PARTIAL_TAG_RE.is_match(rest) {
                self.pending = Some((rest.to_string(), line));
                return Ok(());
            }

            self.text("<");
            rest = &rest[1..];
        }
    }

    fn element(
        &mut self,
        name: &str,
        attrs: &str,
        closing: bool,
        self_closing: bool,
        line: usize,
    ) -> Result<(), ContentError> {
        let just_emitted = self.last_void.take();

        if closing {
            if just_emitted.as_deref() == Some(name) {
                return Ok(());
            }
            return match self.elements.pop() {
                Some((open, _)) if open == name => Ok(()),
                Some((open, open_line)) => Err(ContentError::malformed(
                    line,
                    format!(
                        "expected </{}> (opened on line {}) but found </{}>",
                        open, open_line, name
                    ),
                )),
                None => Err(ContentError::malformed(
                    line,
                    format!("</{}> has no matching opening tag", name),
                )),
            };
        }

        let lower = name.to_ascii_lowercase();
        if name == "Image" || lower == "img" {
            self.push(Node::Image(image_from_attrs(attrs)));
        } else if lower == "br" {
            self.push(Node::HardBreak);
        } else if lower == "hr" {
            self.push(Node::ThematicBreak);
        }

        let is_void = VOID_ELEMENTS.contains(&lower.as_str()) || name == "Image";
        if self_closing {
            return Ok(());
        }
        if is_void {
            self.last_void = Some(name.to_string());
        } else {
            self.elements.push((name.to_string(), line));
        }
        Ok(())
    }

    fn html_text(&mut self, text: &str) {
        if !text.trim().is_empty() {
            self.text(text);
        }
    }

    fn finish(mut self) -> Result<Document, ContentError> {
        if let Some((pending, line)) = self.pending.take() {
            let snippet: String = pending.chars().take(20).collect();
            return Err(ContentError::malformed(
                line,
                format!("unterminated tag starting with {:?}", snippet),
            ));
        }

        if let Some((name, line)) = self.elements.pop() {
            return Err(ContentError::malformed(
                line,
                format!("<{}> is never closed", name),
            ));
        }

        while !self.stack.is_empty() {
            self.close();
        }

        Ok(Document { nodes: self.root })
    }
}

/// Build an image from MDX element attributes
fn image_from_attrs(attrs: &str) -> Image {
    let mut image = Image::new(String::new());

    for caps in ATTR_RE.captures_iter(attrs) {
        let key = caps.get(1).map_or("", |m| m.as_str());
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(5))
            .map(|m| decode_entities(m.as_str()))
            .or_else(|| caps.get(4).map(|m| unquote_expression(m.as_str())));
        let Some(value) = value else {
            continue;
        };

        match key {
            "src" => image.src = value,
            "alt" => image.alt = value,
            "title" => image.title = Some(value).filter(|v| !v.is_empty()),
            "caption" => image.caption = Some(value).filter(|v| !v.is_empty()),
            "width" => {
                if let Ok(width) = value.trim().parse() {
                    image.width = width;
                }
            }
            "height" => {
                if let Ok(height) = value.trim().parse() {
                    image.height = height;
                }
            }
            _ => {}
        }
    }

    image
}

/// `{"text"}` and `{640}` style attribute expressions
fn unquote_expression(expr: &str) -> String {
    let expr = expr.trim();
    for quote in ['"', '\'', '`'] {
        if let Some(inner) = expr
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    expr.to_string()
}

/// Character references that may appear in quoted attribute values
fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
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

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) | Node::InlineCode(text) => out.push_str(text),
            Node::CodeBlock { code, .. } => out.push_str(code),
            Node::Image(image) => out.push_str(&image.alt),
            Node::SoftBreak | Node::HardBreak => out.push(' '),
            Node::ThematicBreak => {}
            Node::Heading { children, .. }
            | Node::Link { children, .. }
            | Node::Paragraph(children)
            | Node::BlockQuote(children)
            | Node::ListItem(children)
            | Node::Emphasis(children)
            | Node::Strong(children)
            | Node::Strikethrough(children)
            | Node::List {
                items: children, ..
            } => out.push_str(&plain_text(children)),
        }
    }
    out
}

/// 1-based line of a byte offset
fn line_at(source: &str, offset: usize) -> usize {
    newlines(&source[..offset.min(source.len())]) + 1
}

fn newlines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}
