use tracing::trace;

use crate::lexer::Lexer;
use crate::node::Node;
use crate::tag::{info, TagDescriptor, TagKind};
use crate::token::{TagHead, TagTail, Token};

/// Max count of tags open at the same time.
///
/// Heads deeper than this are kept as plain text, so walking the tree never recurses deeper.
pub const MAX_DEPTH: usize = 256;

/// An open tag waiting for its tail.
struct Frame {
    descriptor: &'static TagDescriptor,

    /// Partially built node, children are appended as parsing goes on.
    node: Node,
}

/// Builds a [Node] tree from tokens.
///
/// Keeps an explicit stack of open tags, the bottom is always the root frame.
pub struct Parser<'a> {
    source: &'a str,

    stack: Vec<Frame>,
}

/// Parse `input` into a tree, without normalization.
///
/// Never fails: malformed markup falls back to plain text, and tags not closed are closed
/// automatically.
pub fn parse(input: &str) -> Node {
    Parser::new(input).run()
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            stack: vec![Frame {
                descriptor: info(TagKind::Root),
                node: Node::root(),
            }],
        }
    }

    /// Consume all tokens and return the root.
    pub fn run(mut self) -> Node {
        for token in Lexer::new(self.source) {
            match token {
                Token::Head(head) => self.open(head),
                Token::Tail(tail) => self.close(tail),
                Token::Text(text) => self.text(text),
            }
        }

        // Everything still open ends with the source.
        while self.stack.len() > 1 {
            self.pop();
        }

        match self.stack.pop() {
            Some(root) => root.node,
            None => Node::root(),
        }
    }

    fn top(&mut self) -> &mut Frame {
        let idx = self.stack.len() - 1;
        &mut self.stack[idx]
    }

    /// Whether the innermost open tag takes content literally.
    fn in_verbatim(&self) -> Option<TagKind> {
        self.stack
            .last()
            .filter(|x| x.descriptor.is_verbatim)
            .map(|x| x.descriptor.kind)
    }

    fn text(&mut self, text: &str) {
        self.top().node.push_text(text);
    }

    fn open(&mut self, head: TagHead<'a>) {
        let descriptor = head.descriptor;

        // Only real newlines break lines in verbatim content, `[br]` is text there.
        if self.in_verbatim().is_some() && !matches!(head.raw, "\n" | "\r\n") {
            self.text(head.raw);
            return;
        }

        if descriptor.is_void {
            let mut node = Node::element(descriptor.kind, head.attr.unwrap_or_default());
            node.value = head.raw.to_string();
            self.top().node.children.push(node);
            return;
        }

        if descriptor.closes_same && self.top().descriptor.kind == descriptor.kind {
            trace!("{:?} closes previous one at {}", descriptor.kind, head.span.start);
            self.pop();
        }

        if self.stack.len() > MAX_DEPTH {
            trace!(
                "{:?} nested too deep at {}, fallback to text",
                descriptor.kind,
                head.span.start
            );
            self.text(head.raw);
            return;
        }

        self.stack.push(Frame {
            descriptor,
            node: Node::element(descriptor.kind, head.attr.unwrap_or_default()),
        });
    }

    fn close(&mut self, tail: TagTail<'a>) {
        let kind = tail.descriptor.kind;

        if let Some(verbatim) = self.in_verbatim() {
            if verbatim != kind {
                self.text(tail.raw);
                return;
            }
        }

        // Skip the root frame, it can not be closed.
        let matched = self
            .stack
            .iter()
            .skip(1)
            .rposition(|x| x.descriptor.kind == kind)
            .map(|x| x + 1);

        match matched {
            Some(idx) => {
                // Tags opened inside are closed together.
                while let Some(inner) = self.stack.get(idx + 1..).and_then(|x| x.last()) {
                    trace!("{:?} auto closed by tail of {kind:?}", inner.descriptor.kind);
                    self.pop();
                }
                self.pop();
            }
            None => {
                trace!("stray tail {:?}, fallback to text", tail.raw);
                self.text(tail.raw);
            }
        }
    }

    /// Pop the innermost open tag and attach it to its parent.
    fn pop(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(Frame { node, .. }) = self.stack.pop() {
            self.top().node.children.push(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(kind: TagKind, attr: &str, children: Vec<Node>) -> Node {
        Node::with_children(kind, attr, children)
    }

    /// Compare kinds, attributes and plain text, ignoring raw values of tags.
    fn shape(node: &Node) -> String {
        let children = node.children.iter().map(shape).collect::<Vec<_>>().join(",");
        match node.kind {
            TagKind::Plain => format!("{:?}", node.value),
            _ if node.attr.is_empty() => format!("{:?}({children})", node.kind),
            _ => format!("{:?}={}({children})", node.kind, node.attr),
        }
    }

    #[test]
    fn test_empty_input() {
        let root = parse("");
        assert_eq!(root.kind, TagKind::Root);
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_plain_text() {
        let root = parse("hello");
        assert_eq!(root.children, vec![Node::plain("hello")]);
        assert!(root.value.is_empty());
    }

    #[test]
    fn test_nested_tags() {
        let root = parse("a[b]b[i]c[/i][/b]d");
        assert_eq!(
            shape(&root),
            r#"Root("a",Bold("b",Italic("c")),"d")"#
        );
        assert!(root.children[1].value.is_empty());
    }

    #[test]
    fn test_unknown_tag_is_literal() {
        let root = parse("[foo]bar[/foo]");
        assert_eq!(root.children, vec![Node::plain("[foo]bar[/foo]")]);
    }

    #[test]
    fn test_unclosed_tag_closed_at_end() {
        let root = parse("[b]bold");
        assert_eq!(shape(&root), r#"Root(Bold("bold"))"#);
    }

    #[test]
    fn test_mismatched_nesting() {
        let root = parse("[b][i]x[/b][/i]");
        assert_eq!(shape(&root), r#"Root(Bold(Italic("x")),"[/i]")"#);
    }

    #[test]
    fn test_stray_tail_is_literal() {
        let root = parse("a[/b]c");
        assert_eq!(root.children, vec![Node::plain("a[/b]c")]);
    }

    #[test]
    fn test_attribute_attached_unvalidated() {
        let root = parse("[size=abc]x[/size][img=14,20]https://a/b.png[/img]");
        assert_eq!(
            root.children,
            vec![
                element(TagKind::Size, "abc", vec![Node::plain("x")]),
                element(TagKind::Image, "14,20", vec![Node::plain("https://a/b.png")]),
            ]
        );
    }

    #[test]
    fn test_void_line_break() {
        let root = parse("a\nb[br]c");
        assert_eq!(shape(&root), r#"Root("a",LineBreak(),"b",LineBreak(),"c")"#);
        assert_eq!(root.children[1].value, "\n");
        assert_eq!(root.children[3].value, "[br]");
    }

    #[test]
    fn test_same_tag_nested() {
        let root = parse("[quote][quote]a[/quote]b[/quote]");
        assert_eq!(shape(&root), r#"Root(Quote(Quote("a"),"b"))"#);
    }

    #[test]
    fn test_alias_closes_canonical() {
        let root = parse("[del]x[/s]");
        assert_eq!(shape(&root), r#"Root(Delete("x"))"#);
    }

    #[test]
    fn test_list_items_close_each_other() {
        let root = parse("[list][*]a[*]b[/list]");
        assert_eq!(
            shape(&root),
            r#"Root(List(ListItem("a"),ListItem("b")))"#
        );
    }

    #[test]
    fn test_nested_list_items_not_closed_by_outer() {
        let root = parse("[list][*]a[list][*]b[/list][*]c[/list]");
        assert_eq!(
            shape(&root),
            r#"Root(List(ListItem("a",List(ListItem("b"))),ListItem("c")))"#
        );
    }

    #[test]
    fn test_code_is_verbatim() {
        let root = parse("[code][b]x[/b][/i]\ny[/code]");
        assert_eq!(
            shape(&root),
            r#"Root(Code("[b]x[/b][/i]",LineBreak(),"y"))"#
        );

        let root = parse("[code]a[br]b\r\nc[/code]");
        assert_eq!(
            shape(&root),
            r#"Root(Code("a[br]b",LineBreak(),"c"))"#
        );
        assert_eq!(root.children[0].children[1].value, "\r\n");
    }

    #[test]
    fn test_unclosed_code_swallows_rest() {
        let root = parse("[code][b]x");
        assert_eq!(shape(&root), r#"Root(Code("[b]x"))"#);
    }

    #[test]
    fn test_nesting_capped() {
        let input = "[b]".repeat(MAX_DEPTH + 10) + "x";
        let root = parse(&input);

        let mut depth = 0;
        let mut node = &root;
        while let Some(child) = node.children.first().filter(|x| x.kind == TagKind::Bold) {
            depth += 1;
            node = child;
        }
        assert_eq!(depth, MAX_DEPTH);
        assert_eq!(node.children, vec![Node::plain("[b]".repeat(10) + "x")]);
    }

    #[test]
    fn test_tail_after_capped_head() {
        let input = "[i]".repeat(MAX_DEPTH) + "[b]x[/b]y";
        let root = parse(&input);
        let mut node = &root;
        while let Some(child) = node.children.first().filter(|x| x.kind == TagKind::Italic) {
            node = child;
        }
        assert_eq!(node.children, vec![Node::plain("[b]x[/b]y")]);
    }

    #[test]
    fn test_root_frame_not_closable() {
        let root = parse("[/quote]x");
        assert_eq!(root.children, vec![Node::plain("[/quote]x")]);
    }
}
