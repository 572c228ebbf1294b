use serde::{Deserialize, Serialize};

/// All kinds of nodes that can appear in a parsed tree.
///
/// Besides the tags users can write, there are three synthetic kinds that have no bracket form:
/// [TagKind::Root], [TagKind::Plain] and [TagKind::Smilies].
///
/// The declaration order is also the index into the registry table, keep them in sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    /// The synthetic root of every tree.
    Root,

    /// Plain text.
    Plain,

    /// Line break, written as a newline or `[br]`.
    LineBreak,

    /// Sticker written as `(bgm38)`.
    Smilies,

    /// `[b][/b]`
    Bold,

    /// `[i][/i]`
    Italic,

    /// `[u][/u]`
    Underline,

    /// `[s][/s]`, also `[del][/del]`.
    Delete,

    /// `[color=$COLOR][/color]`
    Color,

    /// `[size=$SIZE][/size]`
    Size,

    /// `[mask][/mask]`, text hidden until revealed.
    Mask,

    /// `[url=$URL][/url]` or `[url]$URL[/url]`
    Url,

    /// `[user=$NAME][/user]` or `[user]$NAME[/user]`
    User,

    /// `[subject=$ID][/subject]` or `[subject]$ID[/subject]`
    Subject,

    /// `[img=$W,$H]$URL[/img]`
    Image,

    /// `[photo]$PATH[/photo]`
    Photo,

    /// `[quote][/quote]`
    Quote,

    /// `[code][/code]`
    Code,

    /// `[list][/list]`
    List,

    /// `[*]`, item in list.
    ListItem,

    /// `[center][/center]`
    Center,

    /// `[left][/left]`
    Left,

    /// `[right][/right]`
    Right,

    /// `[align=$ALIGNMENT][/align]`
    Align,

    /// `[float=$SIDE][/float]`
    Float,

    /// `[background=$URL][/background]`
    Background,

    /// `[avatar=$URL][/avatar]`
    Avatar,
}

/// How the attribute after `=` in the tag head looks like.
///
/// Only a hint for consumers, the parser never validates attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrArity {
    /// Tag takes no attribute.
    None,

    /// A single string value, e.g. `[size=12]`.
    Single,

    /// Two comma separated integers, e.g. `[img=14,20]`.
    Pair,
}

/// Static description of a tag.
#[derive(Debug, PartialEq, Eq)]
pub struct TagDescriptor {
    pub kind: TagKind,

    /// Canonical name used in bracket form.
    ///
    /// Empty for synthetic kinds, which can not be looked up.
    pub name: &'static str,

    /// Other names accepted when parsing.
    pub aliases: &'static [&'static str],

    /// Content is laid out as a standalone block.
    ///
    /// Line breaks around blocks are paragraph boundaries rather than visible newlines.
    pub is_block: bool,

    /// Self-contained tag without closing counterpart and children.
    pub is_void: bool,

    /// Content is taken literally, nested tags are not parsed.
    pub is_verbatim: bool,

    /// Opening this tag closes an innermost open tag of the same kind, like `[*]`.
    pub closes_same: bool,

    pub attr: AttrArity,
}

impl TagDescriptor {
    const fn new(kind: TagKind, name: &'static str) -> Self {
        Self {
            kind,
            name,
            aliases: &[],
            is_block: false,
            is_void: false,
            is_verbatim: false,
            closes_same: false,
            attr: AttrArity::None,
        }
    }

    const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    const fn block(mut self) -> Self {
        self.is_block = true;
        self
    }

    const fn void(mut self) -> Self {
        self.is_void = true;
        self
    }

    const fn verbatim(mut self) -> Self {
        self.is_verbatim = true;
        self
    }

    const fn closes_same(mut self) -> Self {
        self.closes_same = true;
        self
    }

    const fn attr(mut self, attr: AttrArity) -> Self {
        self.attr = attr;
        self
    }

    /// Synthetic kinds have no name.
    pub fn is_synthetic(&self) -> bool {
        self.name.is_empty()
    }

    fn matches(&self, name: &str) -> bool {
        !self.is_synthetic()
            && (self.name.eq_ignore_ascii_case(name)
                || self.aliases.iter().any(|x| x.eq_ignore_ascii_case(name)))
    }
}

/// The registry, indexed by [TagKind] discriminant.
static TAGS: [TagDescriptor; 27] = [
    TagDescriptor::new(TagKind::Root, ""),
    TagDescriptor::new(TagKind::Plain, ""),
    TagDescriptor::new(TagKind::LineBreak, "br").void(),
    TagDescriptor::new(TagKind::Smilies, "").void(),
    TagDescriptor::new(TagKind::Bold, "b"),
    TagDescriptor::new(TagKind::Italic, "i"),
    TagDescriptor::new(TagKind::Underline, "u"),
    TagDescriptor::new(TagKind::Delete, "s").aliases(&["del"]),
    TagDescriptor::new(TagKind::Color, "color").attr(AttrArity::Single),
    TagDescriptor::new(TagKind::Size, "size").attr(AttrArity::Single),
    TagDescriptor::new(TagKind::Mask, "mask"),
    TagDescriptor::new(TagKind::Url, "url").attr(AttrArity::Single),
    TagDescriptor::new(TagKind::User, "user").attr(AttrArity::Single),
    TagDescriptor::new(TagKind::Subject, "subject").attr(AttrArity::Single),
    TagDescriptor::new(TagKind::Image, "img").attr(AttrArity::Pair),
    TagDescriptor::new(TagKind::Photo, "photo"),
    TagDescriptor::new(TagKind::Quote, "quote").block(),
    TagDescriptor::new(TagKind::Code, "code").block().verbatim(),
    TagDescriptor::new(TagKind::List, "list").block(),
    TagDescriptor::new(TagKind::ListItem, "*").block().closes_same(),
    TagDescriptor::new(TagKind::Center, "center").block(),
    TagDescriptor::new(TagKind::Left, "left").block(),
    TagDescriptor::new(TagKind::Right, "right").block(),
    TagDescriptor::new(TagKind::Align, "align").block().attr(AttrArity::Single),
    TagDescriptor::new(TagKind::Float, "float").block().attr(AttrArity::Single),
    TagDescriptor::new(TagKind::Background, "background").attr(AttrArity::Single),
    TagDescriptor::new(TagKind::Avatar, "avatar").attr(AttrArity::Single),
];

/// Find the tag named `name`, case-insensitive, aliases included.
///
/// Return `None` for unknown names, the caller shall treat the tag as plain text.
pub fn lookup(name: &str) -> Option<&'static TagDescriptor> {
    TAGS.iter().find(|x| x.matches(name))
}

/// Get the descriptor of `kind`.
pub fn info(kind: TagKind) -> &'static TagDescriptor {
    &TAGS[kind as usize]
}

/// Iterate through all registered descriptors, synthetic ones included.
pub fn all() -> impl Iterator<Item = &'static TagDescriptor> {
    TAGS.iter()
}
