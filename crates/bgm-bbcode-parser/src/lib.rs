//! Parse Bangumi flavoured bbcode into a typed tree.
//!
//! The pipeline is: source text, [lexer] tokens, [parser] tree, then [smilies] and
//! [normalize] post-processing. Every step is total, malformed markup degrades into plain text.

use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod lexer;
pub mod node;
pub mod normalize;
pub mod parser;
mod scanner;
pub mod smilies;
pub mod tag;
pub mod token;

pub use node::Node;
pub use normalize::normalize;
pub use parser::parse;
pub use tag::{info, lookup, AttrArity, TagDescriptor, TagKind};

const OPEN: char = '[';
const CLOSE: char = ']';
const SLASH: char = '/';
const EQUAL: char = '=';
const LF: char = '\n';
const CR: char = '\r';

/// Steps to run after building the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Trim and fold line breaks.
    pub normalize: bool,

    /// Split `(bgmNN)` stickers out of text.
    pub smilies: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            smilies: true,
        }
    }
}

/// Parse `data` with default options.
pub fn parse_bbcode(data: impl AsRef<str>) -> Node {
    parse_with_options(data, &ParseOptions::default())
}

/// Parse `data` and run post-processing steps enabled in `options`.
pub fn parse_with_options(data: impl AsRef<str>, options: &ParseOptions) -> Node {
    let data = data.as_ref();
    let mut tree = parse(data);
    debug!("parsed {} nodes from {} bytes", tree.node_count(), data.len());

    if options.smilies {
        smilies::expand_smilies(&mut tree);
    }
    if options.normalize {
        normalize(&mut tree);
    }
    tree
}
