//! Restricted markdown rendering for notification messages.
//!
//! Messages are markdown source, but a notification row only has room for
//! inline formatting. Block-level constructs are neutralized: their text is
//! kept, their structure is not. The same renderer is used for measuring and
//! for the real row so the two agree on the rendered width.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::fmt;
use std::rc::Rc;
use unicode_width::UnicodeWidthStr;

/// Callback invoked with a link target when a rendered link is activated.
#[derive(Clone)]
pub struct LinkHandler(Rc<dyn Fn(&str)>);

impl LinkHandler {
    /// Wrap a callback.
    pub fn new(handler: impl Fn(&str) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// Invoke the callback with `target`.
    pub fn call(&self, target: &str) {
        (self.0)(target)
    }
}

impl fmt::Debug for LinkHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LinkHandler(..)")
    }
}

/// Block-level constructs that can be switched off.
///
/// A disabled construct contributes its text as plain inline content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisabledConstructs {
    /// Block quotes.
    pub quotes: bool,
    /// Headings.
    pub headings: bool,
    /// Ordered and unordered lists.
    pub lists: bool,
    /// Tables.
    pub tables: bool,
    /// Images (alt text is kept).
    pub images: bool,
    /// Horizontal rules.
    pub rules: bool,
    /// Raw HTML, block and inline.
    pub raw_markup: bool,
}

impl DisabledConstructs {
    /// Every block-level construct disabled.
    pub fn all() -> Self {
        Self {
            quotes: true,
            headings: true,
            lists: true,
            tables: true,
            images: true,
            rules: true,
            raw_markup: true,
        }
    }
}

/// Options for a render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Collapse all output onto a single line.
    pub inline_only: bool,
    /// Block constructs to neutralize.
    pub disabled: DisabledConstructs,
    /// Handler attached to every rendered link.
    pub link_handler: Option<LinkHandler>,
}

impl RenderOptions {
    /// The configuration notification rows use: one line, inline formatting only.
    pub fn restricted() -> Self {
        Self {
            inline_only: true,
            disabled: DisabledConstructs::all(),
            link_handler: None,
        }
    }

    /// Attach a link activation handler.
    pub fn with_link_handler(mut self, handler: LinkHandler) -> Self {
        self.link_handler = Some(handler);
        self
    }
}

/// A link embedded in a rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// Visible link text.
    pub label: String,
    /// Navigation target.
    pub target: String,
    /// Whether sequential keyboard navigation stops on the link.
    pub focusable: bool,
}

/// Output of a render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderedMessage {
    lines: Vec<Line<'static>>,
    links: Vec<LinkRef>,
    link_handler: Option<LinkHandler>,
}

impl RenderedMessage {
    /// Rendered lines. Exactly one when rendered inline-only.
    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    /// Links in document order.
    pub fn links(&self) -> &[LinkRef] {
        &self.links
    }

    /// Plain text of the message, lines joined with `\n`.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All spans laid out on one strip, lines separated by a space.
    pub fn flow_spans(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.extend(line.spans.iter().cloned());
        }
        spans
    }

    /// Display width in terminal cells of the widest line.
    pub fn width_cells(&self) -> u32 {
        self.lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref().width() as u32)
                    .sum::<u32>()
            })
            .max()
            .unwrap_or(0)
    }

    /// Activate the link at `index`. Returns `false` if there is no such link
    /// or no handler is attached.
    pub fn activate_link(&self, index: usize) -> bool {
        match (self.links.get(index), &self.link_handler) {
            (Some(link), Some(handler)) => {
                handler.call(&link.target);
                true
            }
            _ => false,
        }
    }

    /// Whether nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.width_cells() == 0
    }
}

/// Rich-text renderer collaborator.
pub trait MessageRenderer {
    /// Render markdown `source` with `options`.
    fn render(&self, source: &str, options: &RenderOptions) -> RenderedMessage;
}

/// Markdown renderer built on `pulldown-cmark`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineMarkdownRenderer;

impl MessageRenderer for InlineMarkdownRenderer {
    fn render(&self, source: &str, options: &RenderOptions) -> RenderedMessage {
        let mut parser_options = Options::empty();
        parser_options.insert(Options::ENABLE_TABLES);
        parser_options.insert(Options::ENABLE_STRIKETHROUGH);

        let mut state = RenderState::new(options);
        state.process(Parser::new_ext(source, parser_options));
        state.finish()
    }
}

const LIST_BULLET: &str = "• ";
const QUOTE_PREFIX: &str = "│ ";
const RULE: &str = "───";
const CELL_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleContext {
    Emphasis,
    Strong,
    Strikethrough,
    Heading,
    Link,
    Code,
}

struct PendingLink {
    target: String,
    label: String,
}

struct RenderState<'o> {
    options: &'o RenderOptions,
    lines: Vec<Line<'static>>,
    current_spans: Vec<Span<'static>>,
    style_stack: Vec<StyleContext>,
    links: Vec<LinkRef>,
    pending_link: Option<PendingLink>,
    /// Inline-only mode joins blocks with a single space.
    needs_separator: bool,
    cells_in_row: usize,
}

impl<'o> RenderState<'o> {
    fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
            current_spans: Vec::new(),
            style_stack: Vec::new(),
            links: Vec::new(),
            pending_link: None,
            needs_separator: false,
            cells_in_row: 0,
        }
    }

    fn process<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag) => self.end_tag(tag),
                Event::Text(text) => self.text(&text),
                Event::Code(code) => self.inline_code(&code),
                Event::SoftBreak | Event::HardBreak => self.line_break(),
                Event::Rule => self.rule(),
                Event::Html(html) | Event::InlineHtml(html) => self.html(&html),
                _ => {}
            }
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        let disabled = self.options.disabled;
        match tag {
            Tag::Paragraph | Tag::HtmlBlock => self.begin_block(),
            Tag::CodeBlock(_) => {
                self.begin_block();
                self.style_stack.push(StyleContext::Code);
            }
            Tag::Heading { .. } => {
                self.begin_block();
                if !disabled.headings {
                    self.style_stack.push(StyleContext::Heading);
                }
            }
            Tag::BlockQuote(_) => {
                self.begin_block();
                if !disabled.quotes {
                    self.push_raw(QUOTE_PREFIX);
                }
            }
            Tag::List(_) => self.begin_block(),
            Tag::Item => {
                self.begin_block();
                if !disabled.lists {
                    self.push_raw(LIST_BULLET);
                }
            }
            Tag::Table(_) | Tag::TableHead | Tag::TableRow => self.begin_block(),
            Tag::TableCell => {
                if self.cells_in_row > 0 {
                    self.push_raw(if disabled.tables { " " } else { CELL_SEPARATOR });
                }
                self.cells_in_row += 1;
            }
            Tag::Emphasis => self.style_stack.push(StyleContext::Emphasis),
            Tag::Strong => self.style_stack.push(StyleContext::Strong),
            Tag::Strikethrough => self.style_stack.push(StyleContext::Strikethrough),
            Tag::Link { dest_url, .. } => {
                self.style_stack.push(StyleContext::Link);
                self.pending_link = Some(PendingLink {
                    target: dest_url.to_string(),
                    label: String::new(),
                });
            }
            Tag::Image { .. } => {
                if !disabled.images {
                    self.push_raw("[image: ");
                }
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::BlockQuote(_) | TagEnd::Item | TagEnd::HtmlBlock => {
                self.end_block()
            }
            TagEnd::List(_) | TagEnd::Table => self.end_block(),
            TagEnd::TableHead | TagEnd::TableRow => {
                self.cells_in_row = 0;
                self.end_block();
            }
            TagEnd::Heading(_) => {
                if !self.options.disabled.headings {
                    self.pop_style(StyleContext::Heading);
                }
                self.end_block();
            }
            TagEnd::CodeBlock => {
                self.pop_style(StyleContext::Code);
                self.end_block();
            }
            TagEnd::Emphasis => self.pop_style(StyleContext::Emphasis),
            TagEnd::Strong => self.pop_style(StyleContext::Strong),
            TagEnd::Strikethrough => self.pop_style(StyleContext::Strikethrough),
            TagEnd::Link => {
                self.pop_style(StyleContext::Link);
                if let Some(link) = self.pending_link.take() {
                    self.links.push(LinkRef {
                        label: link.label,
                        target: link.target,
                        focusable: false,
                    });
                }
            }
            TagEnd::Image => {
                if !self.options.disabled.images {
                    self.push_raw("]");
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        let text = if self.options.inline_only {
            text.replace(['\n', '\r'], " ")
        } else {
            text.to_string()
        };
        if text.is_empty() {
            return;
        }
        if let Some(link) = self.pending_link.as_mut() {
            link.label.push_str(&text);
        }
        let style = self.current_style();
        self.push_span(Span::styled(text, style));
    }

    fn inline_code(&mut self, code: &str) {
        self.style_stack.push(StyleContext::Code);
        self.text(code);
        self.pop_style(StyleContext::Code);
    }

    fn line_break(&mut self) {
        if self.options.inline_only {
            self.push_raw(" ");
        } else {
            self.flush_line();
        }
    }

    fn rule(&mut self) {
        if self.options.disabled.rules {
            return;
        }
        self.begin_block();
        self.push_raw(RULE);
        self.end_block();
    }

    fn html(&mut self, html: &str) {
        if self.options.disabled.raw_markup {
            return;
        }
        self.text(html);
    }

    fn begin_block(&mut self) {
        // Inline-only output separates blocks lazily in push_span.
        if !self.options.inline_only {
            self.flush_line();
        }
    }

    fn end_block(&mut self) {
        if self.options.inline_only {
            self.needs_separator = true;
        } else {
            self.flush_line();
        }
    }

    fn push_raw(&mut self, text: &str) {
        let style = self.current_style();
        self.push_span(Span::styled(text.to_string(), style));
    }

    fn push_span(&mut self, span: Span<'static>) {
        if self.options.inline_only && self.needs_separator && !self.current_spans.is_empty() {
            self.current_spans.push(Span::raw(" "));
        }
        self.needs_separator = false;
        self.current_spans.push(span);
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            let spans = std::mem::take(&mut self.current_spans);
            self.lines.push(Line::from(spans));
        }
    }

    fn pop_style(&mut self, context: StyleContext) {
        if let Some(pos) = self.style_stack.iter().rposition(|c| *c == context) {
            self.style_stack.remove(pos);
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack
            .iter()
            .fold(Style::default(), |style, context| match context {
                StyleContext::Emphasis => style.add_modifier(Modifier::ITALIC),
                StyleContext::Strong | StyleContext::Heading => {
                    style.add_modifier(Modifier::BOLD)
                }
                StyleContext::Strikethrough => style.add_modifier(Modifier::CROSSED_OUT),
                StyleContext::Link => style.add_modifier(Modifier::UNDERLINED),
                StyleContext::Code => style.add_modifier(Modifier::DIM),
            })
    }

    fn finish(mut self) -> RenderedMessage {
        self.flush_line();
        if self.options.inline_only && self.lines.len() > 1 {
            let spans: Vec<Span<'static>> = self
                .lines
                .drain(..)
                .flat_map(|line| line.spans)
                .collect();
            self.lines.push(Line::from(spans));
        }
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        RenderedMessage {
            lines: self.lines,
            links: self.links,
            link_handler: self.options.link_handler.clone(),
        }
    }
}
