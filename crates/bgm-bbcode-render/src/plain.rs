use bgm_bbcode_parser::Node;
use serde::{Deserialize, Serialize};

use crate::{
    render_tree, Alignment, Context, Emphasis, Link, LinkKind, Output, RenderResult, Renderer,
};

/// Options on rendering into plain text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlainTextOptions {
    /// Prefix of list items.
    pub bullet: String,

    /// Spaces to indent lists and code blocks.
    pub indent: usize,

    /// Show masked text as is.
    pub reveal_masks: bool,

    /// Character to cover masked text with.
    pub mask_char: char,

    /// Append link targets after link text.
    pub show_links: bool,
}

impl Default for PlainTextOptions {
    fn default() -> Self {
        Self {
            bullet: String::from("• "),
            indent: 2,
            reveal_masks: false,
            mask_char: '■',
            show_links: true,
        }
    }
}

/// Render trees into plain text.
///
/// Styles are dropped, blocks take their own lines.
#[derive(Clone, Debug, Default)]
pub struct PlainTextRenderer {
    options: PlainTextOptions,
}

impl PlainTextRenderer {
    pub fn new(options: PlainTextOptions) -> Self {
        Self { options }
    }

    fn indented(&self, content: &str) -> String {
        let prefix = " ".repeat(self.options.indent);
        content
            .lines()
            .map(|x| format!("{prefix}{x}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render `tree` into plain text.
pub fn render_plain_text(tree: &Node, options: PlainTextOptions) -> String {
    render_tree(&PlainTextRenderer::new(options), tree, &()).into_inner()
}

impl Renderer for PlainTextRenderer {
    type String = String;
    type Text = String;
    type View = String;
    type Extra = ();

    fn string(&self, text: &str) -> String {
        text.to_string()
    }

    fn concat_strings(&self, strings: Vec<String>) -> String {
        strings.concat()
    }

    fn string_to_text(&self, string: String) -> String {
        string
    }

    fn concat_texts(&self, texts: Vec<String>) -> String {
        texts.concat()
    }

    fn text_to_view(&self, text: String) -> String {
        text
    }

    fn stack_views(&self, views: Vec<String>) -> String {
        views.join("\n")
    }

    fn smilies(&self, id: &str, _: &Context<'_, Self>) -> Output<Self> {
        RenderResult::Text(format!("(bgm{id})"))
    }

    fn emphasis(&self, inner: Output<Self>, _: Emphasis) -> Output<Self> {
        inner
    }

    fn color(&self, inner: Output<Self>, _: &str) -> Output<Self> {
        inner
    }

    fn size(&self, inner: Output<Self>, _: u32) -> Output<Self> {
        inner
    }

    fn mask(&self, inner: Output<Self>, _: &Context<'_, Self>) -> Output<Self> {
        let content = inner.into_inner();
        if self.options.reveal_masks {
            return RenderResult::View(content);
        }
        let covered = content
            .chars()
            .map(|x| {
                if x.is_whitespace() {
                    x
                } else {
                    self.options.mask_char
                }
            })
            .collect::<String>();
        RenderResult::View(covered)
    }

    fn link(&self, inner: Output<Self>, link: &Link) -> Output<Self> {
        let decorate = |text: String| {
            let text = match link.kind {
                LinkKind::User => format!("@{text}"),
                LinkKind::Url | LinkKind::Subject => text,
            };
            if self.options.show_links && text != link.href {
                format!("{text} <{}>", link.href)
            } else {
                text
            }
        };
        match inner {
            RenderResult::String(v) => RenderResult::String(decorate(v)),
            RenderResult::Text(v) => RenderResult::Text(decorate(v)),
            RenderResult::View(v) => RenderResult::View(decorate(v)),
        }
    }

    fn image(&self, url: &str, size: Option<(u32, u32)>, _: &Context<'_, Self>) -> Output<Self> {
        match size {
            Some((width, height)) => RenderResult::View(format!("[image {width}x{height}: {url}]")),
            None => RenderResult::View(format!("[image: {url}]")),
        }
    }

    fn photo(&self, url: &str, _: &Context<'_, Self>) -> Output<Self> {
        RenderResult::View(format!("[photo: {url}]"))
    }

    fn quote(&self, inner: Output<Self>) -> Output<Self> {
        let content = match inner {
            // Short quotes stay in one line.
            RenderResult::String(v) => v.chars().filter(|x| *x != '\n').collect::<String>(),
            RenderResult::Text(v) | RenderResult::View(v) => v,
        };
        RenderResult::View(format!("\u{201C} {content} \u{201D}"))
    }

    fn code(&self, inner: Output<Self>) -> Output<Self> {
        RenderResult::View(self.indented(&inner.into_inner()))
    }

    fn list(&self, inner: Output<Self>) -> Output<Self> {
        RenderResult::View(self.indented(&inner.into_inner()))
    }

    fn list_item(&self, inner: Output<Self>) -> Output<Self> {
        RenderResult::View(format!("{}{}", self.options.bullet, inner.into_inner()))
    }

    fn align(&self, inner: Output<Self>, _: Alignment) -> Output<Self> {
        RenderResult::View(inner.into_inner())
    }
}
