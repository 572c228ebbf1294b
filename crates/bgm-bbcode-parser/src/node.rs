use serde::Serialize;

use crate::tag::{info, TagDescriptor, TagKind};

/// Node is a unit in the parsed tree.
///
/// Each node represents a bbcode tag, a piece of plain text or the root, tag nodes may contain
/// other nodes as children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    /// What the node is.
    #[serde(rename = "type")]
    pub kind: TagKind,

    /// Raw text payload.
    ///
    /// * Plain text: the text itself.
    /// * Void tags and stickers: source text of the tag, like `[br]` or `(bgm38)`.
    /// * Other tags and the root: empty, content lives in children.
    pub value: String,

    /// Raw attribute, empty if absent.
    pub attr: String,

    /// Always empty for void tags and plain text.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// An empty root.
    pub fn root() -> Self {
        Self::element(TagKind::Root, String::new())
    }

    /// Plain text node.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: TagKind::Plain,
            value: text.into(),
            attr: String::new(),
            children: vec![],
        }
    }

    /// Tag node with no children yet.
    pub fn element(kind: TagKind, attr: impl Into<String>) -> Self {
        Self {
            kind,
            value: String::new(),
            attr: attr.into(),
            children: vec![],
        }
    }

    /// Build a node of `kind` holding `children`.
    pub fn with_children(kind: TagKind, attr: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::element(kind, attr)
        }
    }

    /// Descriptor of the tag, `None` for plain text.
    pub fn descriptor(&self) -> Option<&'static TagDescriptor> {
        match self.kind {
            TagKind::Plain => None,
            v => Some(info(v)),
        }
    }

    pub fn is_block(&self) -> bool {
        self.descriptor().map_or(false, |x| x.is_block)
    }

    pub fn is_line_break(&self) -> bool {
        self.kind == TagKind::LineBreak
    }

    /// Append text as the last child.
    ///
    /// Merge into the last child if it is plain text already, so no two plain text siblings are
    /// adjacent.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.children.last_mut() {
            Some(last) if last.kind == TagKind::Plain => last.value.push_str(text),
            _ => self.children.push(Self::plain(text)),
        }
    }

    /// Concatenated text if all children are plain text.
    ///
    /// Used by tags taking content as argument, like `[url]https://bgm.tv[/url]`.
    pub fn plain_content(&self) -> Option<String> {
        self.children
            .iter()
            .map(|x| (x.kind == TagKind::Plain).then_some(x.value.as_str()))
            .collect::<Option<Vec<_>>>()
            .map(|x| x.concat())
    }

    /// Count of nodes in the tree, including self.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Depth first, document order traversal.
    pub fn walk(&self, f: &mut impl FnMut(&Node)) {
        f(self);
        for child in self.children.iter() {
            child.walk(f);
        }
    }
}
