/// Context threaded through a render pass by reference.
///
/// `extra` carries whatever typed data the renderer needs on each call, the dispatcher never
/// looks into it.
#[derive(Debug)]
pub struct RenderContext<'a, E> {
    /// Rendering content inside `[quote]`.
    ///
    /// Images, masks and stickers are omitted in quotes.
    pub in_quote: bool,

    pub extra: &'a E,
}

impl<'a, E> RenderContext<'a, E> {
    pub fn new(extra: &'a E) -> Self {
        Self {
            in_quote: false,
            extra,
        }
    }

    /// Context for content inside a quote.
    pub fn quoted(&self) -> Self {
        Self {
            in_quote: true,
            extra: self.extra,
        }
    }
}

impl<'a, E> Clone for RenderContext<'a, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, E> Copy for RenderContext<'a, E> {}
