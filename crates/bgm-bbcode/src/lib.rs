use std::fmt;
use std::fmt::Formatter;

use bgm_bbcode_parser::{Node, TagKind};

pub use bgm_bbcode_parser as parser;

/// The main trait defining types that can be written as bbcode.
pub trait BBCode {
    fn to_bbcode(&self, formatter: &mut Formatter<'_>) -> fmt::Result;
}

struct BBCodeWrapper<'a, T: ?Sized>(&'a T);

impl<'a, T: BBCode + ?Sized> fmt::Display for BBCodeWrapper<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.to_bbcode(f)
    }
}

pub fn bbcode_to_string<T: BBCode + ?Sized>(code: &T) -> String {
    BBCodeWrapper(code).to_string()
}

/// Write a tree in canonical form.
///
/// * Tag names are the canonical lowercase ones, aliases are not kept.
/// * Every non-void tag is written with its tail, including `[*]`.
/// * Line breaks are written as `\n`, stickers as `(bgmNN)`.
///
/// Line breaks folded by normalization are empty text and disappear, so writing a normalized
/// tree is lossy.
impl BBCode for Node {
    fn to_bbcode(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            TagKind::Root => self.children.as_slice().to_bbcode(formatter),
            TagKind::Plain => formatter.write_str(&self.value),
            TagKind::LineBreak => formatter.write_str("\n"),
            TagKind::Smilies => formatter.write_fmt(format_args!("(bgm{})", self.attr)),
            _ => {
                let Some(desc) = self.descriptor() else {
                    return Ok(());
                };
                if self.attr.is_empty() {
                    formatter.write_fmt(format_args!("[{}]", desc.name))?;
                } else {
                    formatter.write_fmt(format_args!("[{}={}]", desc.name, self.attr))?;
                }
                if desc.is_void {
                    return Ok(());
                }
                self.children.as_slice().to_bbcode(formatter)?;
                formatter.write_fmt(format_args!("[/{}]", desc.name))
            }
        }
    }
}

impl BBCode for [Node] {
    fn to_bbcode(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        for node in self.iter() {
            node.to_bbcode(formatter)?
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgm_bbcode_parser::{parse, parse_bbcode};

    #[test]
    fn test_write_canonical() {
        let tree = parse("[B]x[/b][DEL]y[/s][url=https://bgm.tv]z[/url]\n[img=14,20]a.png");
        assert_eq!(
            bbcode_to_string(&tree),
            "[b]x[/b][s]y[/s][url=https://bgm.tv]z[/url]\n[img=14,20]a.png[/img]"
        );
    }

    #[test]
    fn test_write_list_and_smilies() {
        let tree = parse_bbcode("[list][*]a(bgm38)[*]b[/list]");
        assert_eq!(
            bbcode_to_string(&tree),
            "[list][*]a(bgm38)[/*][*]b[/*][/list]"
        );
    }

    #[test]
    fn test_write_literal_fallback() {
        let tree = parse("[foo]x[/b]");
        assert_eq!(bbcode_to_string(&tree), "[foo]x[/b]");
    }

    #[test]
    fn test_write_folded_line_break_dropped() {
        let tree = parse_bbcode("[quote]x[/quote]\ny");
        assert_eq!(bbcode_to_string(&tree), "[quote]x[/quote]y");
    }

    #[test]
    fn test_write_children_only() {
        let tree = parse("a[b]b[/b]");
        assert_eq!(bbcode_to_string(tree.children.as_slice()), "a[b]b[/b]");
    }

    #[test]
    fn test_write_deeply_nested() {
        let tree = parse(&"[quote]".repeat(100_000));
        let written = bbcode_to_string(&tree);
        assert!(written.len() < "[quote][/quote]".len() * 100_000);
        assert!(written.ends_with("[/quote]"));
    }
}
