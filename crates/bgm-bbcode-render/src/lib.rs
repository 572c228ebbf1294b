//! Walk a parsed bbcode tree and hand every node to a [Renderer].
//!
//! Each [TagKind] is dispatched by an exhaustive match, attributes are validated here before
//! reaching the renderer, and children results are reduced by [render_inner].

use bgm_bbcode::bbcode_to_string;
use bgm_bbcode_parser::{Node, TagKind};
use tracing::trace;

pub mod attr;
mod context;
pub mod plain;

pub use attr::Alignment;
pub use context::RenderContext;
pub use plain::{render_plain_text, PlainTextOptions, PlainTextRenderer};

/// What rendering a node produces.
///
/// From the lightest to the heaviest, a run of children is promoted to the heaviest kind among
/// them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderResult<S, T, V> {
    /// Plain inline string.
    String(S),

    /// Rich inline text.
    Text(T),

    /// Composite visual block.
    View(V),
}

impl<T> RenderResult<T, T, T> {
    pub fn into_inner(self) -> T {
        match self {
            RenderResult::String(v) | RenderResult::Text(v) | RenderResult::View(v) => v,
        }
    }
}

/// [RenderResult] of renderer `R`.
pub type Output<R> =
    RenderResult<<R as Renderer>::String, <R as Renderer>::Text, <R as Renderer>::View>;

/// [RenderContext] of renderer `R`.
pub type Context<'a, R> = RenderContext<'a, <R as Renderer>::Extra>;

/// Text styles without arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    Bold,
    Italic,
    Underline,
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    /// `[url]`
    Url,

    /// `[user]`, to user homepage.
    User,

    /// `[subject]`, to subject page.
    Subject,
}

/// Resolved link target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub kind: LinkKind,
    pub href: String,
}

/// Presentation side of rendering.
///
/// Implementors decide what strings, texts and views are and how they combine. Tree walking and
/// attribute validation happen in [render], renderers only receive valid values.
pub trait Renderer: Sized {
    type String;
    type Text;
    type View;

    /// Extra data carried in [RenderContext::extra].
    type Extra;

    fn string(&self, text: &str) -> Self::String;

    fn concat_strings(&self, strings: Vec<Self::String>) -> Self::String;

    fn string_to_text(&self, string: Self::String) -> Self::Text;

    fn concat_texts(&self, texts: Vec<Self::Text>) -> Self::Text;

    fn text_to_view(&self, text: Self::Text) -> Self::View;

    /// Lay views out vertically.
    fn stack_views(&self, views: Vec<Self::View>) -> Self::View;

    /// Sticker `(bgm$ID)`.
    fn smilies(&self, id: &str, ctx: &Context<'_, Self>) -> Output<Self>;

    fn emphasis(&self, inner: Output<Self>, emphasis: Emphasis) -> Output<Self>;

    fn color(&self, inner: Output<Self>, color: &str) -> Output<Self>;

    /// `size` is already clamped.
    fn size(&self, inner: Output<Self>, size: u32) -> Output<Self>;

    fn mask(&self, inner: Output<Self>, ctx: &Context<'_, Self>) -> Output<Self>;

    fn link(&self, inner: Output<Self>, link: &Link) -> Output<Self>;

    /// `url` has an image extension and uses https if it was http.
    fn image(&self, url: &str, size: Option<(u32, u32)>, ctx: &Context<'_, Self>)
        -> Output<Self>;

    fn photo(&self, url: &str, ctx: &Context<'_, Self>) -> Output<Self>;

    fn quote(&self, inner: Output<Self>) -> Output<Self>;

    fn code(&self, inner: Output<Self>) -> Output<Self>;

    fn list(&self, inner: Output<Self>) -> Output<Self>;

    fn list_item(&self, inner: Output<Self>) -> Output<Self>;

    fn align(&self, inner: Output<Self>, alignment: Alignment) -> Output<Self>;
}

/// Render a whole tree with a fresh context.
pub fn render_tree<R: Renderer>(renderer: &R, tree: &Node, extra: &R::Extra) -> Output<R> {
    render(renderer, tree, &RenderContext::new(extra))
}

/// Render `node` and its children.
pub fn render<R: Renderer>(renderer: &R, node: &Node, ctx: &Context<'_, R>) -> Output<R> {
    let inner = || render_inner(renderer, node, ctx);

    match node.kind {
        TagKind::Root | TagKind::Float => inner(),
        TagKind::Plain => RenderResult::String(renderer.string(&node.value)),
        TagKind::LineBreak => RenderResult::String(renderer.string("\n")),
        TagKind::Background | TagKind::Avatar => RenderResult::String(renderer.string("")),
        TagKind::Smilies => {
            if ctx.in_quote {
                empty_text(renderer)
            } else {
                renderer.smilies(&node.attr, ctx)
            }
        }
        TagKind::Bold => renderer.emphasis(inner(), Emphasis::Bold),
        TagKind::Italic => renderer.emphasis(inner(), Emphasis::Italic),
        TagKind::Underline => renderer.emphasis(inner(), Emphasis::Underline),
        TagKind::Delete => renderer.emphasis(inner(), Emphasis::Delete),
        TagKind::Color => match attr::color(&node.attr) {
            Some(color) => renderer.color(inner(), color),
            None => inner(),
        },
        TagKind::Size => match attr::font_size(&node.attr) {
            Some(size) => renderer.size(inner(), size),
            None => inner(),
        },
        TagKind::Mask => {
            if ctx.in_quote {
                empty_text(renderer)
            } else {
                renderer.mask(inner(), ctx)
            }
        }
        TagKind::Url => render_link(renderer, node, ctx, LinkKind::Url),
        TagKind::User => render_link(renderer, node, ctx, LinkKind::User),
        TagKind::Subject => render_link(renderer, node, ctx, LinkKind::Subject),
        TagKind::Image => render_image(renderer, node, ctx),
        TagKind::Photo => match node.plain_content() {
            Some(path) if attr::is_link(path.trim()) => {
                renderer.photo(&attr::photo_link(path.trim()), ctx)
            }
            _ => raw(renderer, node),
        },
        TagKind::Quote => renderer.quote(render_inner(renderer, node, &ctx.quoted())),
        TagKind::Code => renderer.code(inner()),
        TagKind::List => renderer.list(inner()),
        TagKind::ListItem => renderer.list_item(inner()),
        TagKind::Center => renderer.align(inner(), Alignment::Center),
        TagKind::Left => renderer.align(inner(), Alignment::Left),
        TagKind::Right => renderer.align(inner(), Alignment::Right),
        TagKind::Align => match attr::alignment(&node.attr) {
            Some(alignment) => renderer.align(inner(), alignment),
            None => RenderResult::View(into_view(renderer, inner())),
        },
    }
}

/// Render children of `node` and reduce them into one result.
///
/// Consecutive strings are joined into a text, consecutive texts are joined, and once any child
/// is a view everything around it becomes views stacked vertically.
pub fn render_inner<R: Renderer>(renderer: &R, node: &Node, ctx: &Context<'_, R>) -> Output<R> {
    let mut views = vec![];
    let mut texts = vec![];
    let mut strings = vec![];

    for child in node.children.iter() {
        match render(renderer, child, ctx) {
            RenderResult::String(v) => strings.push(v),
            RenderResult::Text(v) => {
                flush_strings(renderer, &mut strings, &mut texts);
                texts.push(v);
            }
            RenderResult::View(v) => {
                flush_strings(renderer, &mut strings, &mut texts);
                flush_texts(renderer, &mut texts, &mut views);
                views.push(v);
            }
        }
    }

    if !views.is_empty() {
        flush_strings(renderer, &mut strings, &mut texts);
        flush_texts(renderer, &mut texts, &mut views);
        RenderResult::View(renderer.stack_views(views))
    } else if !texts.is_empty() {
        flush_strings(renderer, &mut strings, &mut texts);
        RenderResult::Text(renderer.concat_texts(texts))
    } else {
        RenderResult::String(renderer.concat_strings(strings))
    }
}

fn flush_strings<R: Renderer>(renderer: &R, strings: &mut Vec<R::String>, texts: &mut Vec<R::Text>) {
    if strings.is_empty() {
        return;
    }
    let joined = renderer.concat_strings(std::mem::take(strings));
    texts.push(renderer.string_to_text(joined));
}

fn flush_texts<R: Renderer>(renderer: &R, texts: &mut Vec<R::Text>, views: &mut Vec<R::View>) {
    if texts.is_empty() {
        return;
    }
    let joined = renderer.concat_texts(std::mem::take(texts));
    views.push(renderer.text_to_view(joined));
}

/// Promote any result into a view.
pub fn into_view<R: Renderer>(renderer: &R, output: Output<R>) -> R::View {
    match output {
        RenderResult::String(v) => renderer.text_to_view(renderer.string_to_text(v)),
        RenderResult::Text(v) => renderer.text_to_view(v),
        RenderResult::View(v) => v,
    }
}

fn empty_text<R: Renderer>(renderer: &R) -> Output<R> {
    RenderResult::Text(renderer.concat_texts(vec![]))
}

/// Markup of the node, used when its content makes no sense for the tag.
fn raw<R: Renderer>(renderer: &R, node: &Node) -> Output<R> {
    let markup = bbcode_to_string(node);
    trace!("render {:?} as raw text {markup:?}", node.kind);
    RenderResult::String(renderer.string(&markup))
}

/// Links take target from attribute, or from content if the attribute is absent.
fn render_link<R: Renderer>(
    renderer: &R,
    node: &Node,
    ctx: &Context<'_, R>,
    kind: LinkKind,
) -> Output<R> {
    let target = match node.attr.trim() {
        "" => match node.plain_content() {
            Some(v) => v.trim().to_string(),
            None => return raw(renderer, node),
        },
        v => v.to_string(),
    };

    let inner = render_inner(renderer, node, ctx);
    if target.is_empty() {
        return inner;
    }
    let href = match kind {
        LinkKind::Url => target,
        LinkKind::User => attr::user_link(&target),
        LinkKind::Subject => attr::subject_link(&target),
    };
    if !attr::is_link(&href) {
        return inner;
    }
    renderer.link(inner, &Link { kind, href })
}

fn render_image<R: Renderer>(renderer: &R, node: &Node, ctx: &Context<'_, R>) -> Output<R> {
    if ctx.in_quote {
        return empty_text(renderer);
    }
    let Some(url) = node.plain_content() else {
        return raw(renderer, node);
    };
    let url = url.trim();
    if !attr::is_link(url) {
        return raw(renderer, node);
    }
    if !attr::is_image_url(url) {
        let link = Link {
            kind: LinkKind::Url,
            href: url.to_string(),
        };
        return renderer.link(RenderResult::String(renderer.string(url)), &link);
    }
    renderer.image(&attr::upgrade_https(url), attr::image_size(&node.attr), ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgm_bbcode_parser::parse_bbcode;

    /// Records calls in a readable form, strings are `'..'`, texts are `"..."`, views `<...>`.
    struct TraceRenderer;

    impl Renderer for TraceRenderer {
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
            format!("'{string}'")
        }

        fn concat_texts(&self, texts: Vec<String>) -> String {
            texts.concat()
        }

        fn text_to_view(&self, text: String) -> String {
            format!("<{text}>")
        }

        fn stack_views(&self, views: Vec<String>) -> String {
            format!("stack{views:?}")
        }

        fn smilies(&self, id: &str, _: &Context<'_, Self>) -> Output<Self> {
            RenderResult::Text(format!("smilies{id}"))
        }

        fn emphasis(&self, inner: Output<Self>, emphasis: Emphasis) -> Output<Self> {
            wrap(inner, &format!("{emphasis:?}"))
        }

        fn color(&self, inner: Output<Self>, color: &str) -> Output<Self> {
            wrap(inner, &format!("color={color}"))
        }

        fn size(&self, inner: Output<Self>, size: u32) -> Output<Self> {
            wrap(inner, &format!("size={size}"))
        }

        fn mask(&self, inner: Output<Self>, _: &Context<'_, Self>) -> Output<Self> {
            RenderResult::View(format!("mask({})", inner.into_inner()))
        }

        fn link(&self, inner: Output<Self>, link: &Link) -> Output<Self> {
            wrap(inner, &format!("{:?}={}", link.kind, link.href))
        }

        fn image(&self, url: &str, size: Option<(u32, u32)>, _: &Context<'_, Self>) -> Output<Self> {
            RenderResult::View(format!("image({url},{size:?})"))
        }

        fn photo(&self, url: &str, _: &Context<'_, Self>) -> Output<Self> {
            RenderResult::View(format!("photo({url})"))
        }

        fn quote(&self, inner: Output<Self>) -> Output<Self> {
            RenderResult::View(format!("quote({})", inner.into_inner()))
        }

        fn code(&self, inner: Output<Self>) -> Output<Self> {
            RenderResult::View(format!("code({})", inner.into_inner()))
        }

        fn list(&self, inner: Output<Self>) -> Output<Self> {
            RenderResult::View(format!("list({})", inner.into_inner()))
        }

        fn list_item(&self, inner: Output<Self>) -> Output<Self> {
            RenderResult::Text(format!("item({})", inner.into_inner()))
        }

        fn align(&self, inner: Output<Self>, alignment: Alignment) -> Output<Self> {
            RenderResult::View(format!("{alignment:?}({})", inner.into_inner()))
        }
    }

    /// Keep the kind of result and wrap the content.
    fn wrap(inner: Output<TraceRenderer>, name: &str) -> Output<TraceRenderer> {
        match inner {
            RenderResult::String(v) => RenderResult::String(format!("{name}({v})")),
            RenderResult::Text(v) => RenderResult::Text(format!("{name}({v})")),
            RenderResult::View(v) => RenderResult::View(format!("{name}({v})")),
        }
    }

    fn rendered(input: &str) -> Output<TraceRenderer> {
        render_tree(&TraceRenderer, &parse_bbcode(input), &())
    }

    #[test]
    fn test_strings_stay_strings() {
        assert_eq!(
            rendered("a[b]b[/b]\nc"),
            RenderResult::String("aBold(b)\nc".to_string())
        );
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(rendered(""), RenderResult::String(String::new()));
    }

    #[test]
    fn test_text_promotes_strings() {
        assert_eq!(
            rendered("a(bgm38)b"),
            RenderResult::Text("'a'smilies38'b'".to_string())
        );
    }

    #[test]
    fn test_view_promotes_everything() {
        assert_eq!(
            rendered("a(bgm38)[quote]q[/quote]\nb"),
            RenderResult::View(r#"stack["<'a'smilies38>", "quote(q)", "<'b'>"]"#.to_string())
        );
    }

    #[test]
    fn test_invalid_attributes_ignored() {
        assert_eq!(
            rendered("[size=x]a[/size][color= ]b[/color][size=99]c[/size]"),
            RenderResult::String("absize=50(c)".to_string())
        );
    }

    #[test]
    fn test_links() {
        assert_eq!(
            rendered("[url]https://bgm.tv[/url][user=sai]Sai[/user][subject]8[/subject]"),
            RenderResult::String(
                "Url=https://bgm.tv(https://bgm.tv)User=https://bgm.tv/user/sai(Sai)Subject=https://bgm.tv/subject/8(8)"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_link_without_target_is_raw() {
        assert_eq!(
            rendered("[url][b]x[/b][/url]"),
            RenderResult::String("[url][b]x[/b][/url]".to_string())
        );
        assert_eq!(rendered("[url][/url]"), RenderResult::String(String::new()));
        assert_eq!(
            rendered("[photo][b]x"),
            RenderResult::String("[photo][b]x[/b][/photo]".to_string())
        );
    }

    #[test]
    fn test_deeply_nested() {
        let RenderResult::String(v) = rendered(&"[b]".repeat(100_000)) else {
            panic!("nested bold shall render into a string");
        };
        assert!(v.starts_with("Bold(Bold("));
        assert!(v.ends_with("[b])))"));
    }

    #[test]
    fn test_image() {
        assert_eq!(
            rendered("[img=14,20]http://a/b.png[/img]"),
            RenderResult::View(r#"stack["image(https://a/b.png,Some((14, 20)))"]"#.to_string())
        );
        assert_eq!(
            rendered("[img=0,1]https://a/b.png[/img]"),
            RenderResult::View(r#"stack["image(https://a/b.png,None)"]"#.to_string())
        );
        assert_eq!(
            rendered("[img]https://a/b.html[/img]"),
            RenderResult::String("Url=https://a/b.html(https://a/b.html)".to_string())
        );
    }

    #[test]
    fn test_quote_hides_media() {
        assert_eq!(
            rendered("[quote]a[img]https://a/b.png[/img](bgm1)[mask]m[/mask][/quote]"),
            RenderResult::View(r#"stack["quote('a')"]"#.to_string())
        );
    }

    #[test]
    fn test_align() {
        assert_eq!(
            rendered("[align=right]a[/align][align=nowhere]b[/align]"),
            RenderResult::View(r#"stack["Right(a)", "<'b'>"]"#.to_string())
        );
    }

    #[test]
    fn test_list() {
        assert_eq!(
            rendered("[list][*]a[*][b]b[/b][/list]"),
            RenderResult::View(r#"stack["list(item(a)item(Bold(b)))"]"#.to_string())
        );
    }
}
