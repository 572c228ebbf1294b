use crate::node::Node;
use crate::tag::TagKind;

/// Clean up line breaks in a parsed tree, in place.
///
/// 1. Line breaks at the beginning and end of the root and every block are removed.
/// 2. A line break right after a block is folded into an empty plain text, the block already
///    ends its line.
///
/// Running on a normalized tree changes nothing.
pub fn normalize(tree: &mut Node) {
    trim(tree);
    fold(tree);
}

/// Remove leading and trailing line breaks in block scoped nodes.
fn trim(node: &mut Node) {
    if node.kind == TagKind::Root || node.is_block() {
        let leading = node
            .children
            .iter()
            .take_while(|x| x.is_line_break())
            .count();
        node.children.drain(..leading);
        while node.children.last().map_or(false, Node::is_line_break) {
            node.children.pop();
        }
    }

    for child in node.children.iter_mut() {
        trim(child);
    }
}

/// Fold line breaks following blocks.
fn fold(node: &mut Node) {
    let mut after_block = false;

    for child in node.children.iter_mut() {
        if child.is_line_break() {
            if after_block {
                child.kind = TagKind::Plain;
                child.value.clear();
                child.attr.clear();
            }
            // Either folded or visible, following line breaks start fresh.
            after_block = false;
        } else {
            after_block = child.is_block();
            fold(child);
        }
    }
}
