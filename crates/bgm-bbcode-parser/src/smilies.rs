use regex::Regex;
use std::sync::OnceLock;

use crate::node::Node;
use crate::tag::TagKind;

/// Regex to match stickers like `(bgm38)`.
static SMILIES_RE: OnceLock<Regex> = OnceLock::new();

fn smilies_re() -> &'static Regex {
    SMILIES_RE.get_or_init(|| Regex::new(r"\(bgm(?<id>\d{1,3})\)").expect("invalid smilies regex"))
}

/// Split stickers out of plain text into [TagKind::Smilies] nodes, in place.
///
/// Content of verbatim tags is left untouched.
pub fn expand_smilies(node: &mut Node) {
    if node.descriptor().map_or(false, |x| x.is_verbatim) {
        return;
    }

    let re = smilies_re();
    if !node
        .children
        .iter()
        .any(|x| x.kind == TagKind::Plain && re.is_match(&x.value))
    {
        for child in node.children.iter_mut() {
            expand_smilies(child);
        }
        return;
    }

    let children = std::mem::take(&mut node.children);
    for mut child in children {
        if child.kind != TagKind::Plain {
            expand_smilies(&mut child);
            node.children.push(child);
            continue;
        }

        let mut last = 0;
        for capture in re.captures_iter(&child.value) {
            let (Some(all), Some(id)) = (capture.get(0), capture.name("id")) else {
                continue;
            };
            node.push_text(&child.value[last..all.start()]);
            let mut smilies = Node::element(TagKind::Smilies, id.as_str());
            smilies.value = all.as_str().to_string();
            node.children.push(smilies);
            last = all.end();
        }
        node.push_text(&child.value[last..]);
    }
}
