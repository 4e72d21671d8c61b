//! Document-order traversal of element trees.
//!
//! Filings in the wild nest elements tens of thousands deep, so walks keep
//! their pending nodes on an explicit stack instead of the call stack.

use scraper::{ElementRef, Node};

/// A node met during a walk.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Visit<'a> {
    /// An element; the walker decides whether to descend into it
    Element(ElementRef<'a>),
    /// A text node
    Text(&'a str),
}

/// Pending nodes of a pre-order walk, popped in document order.
#[derive(Debug, Default)]
pub(crate) struct WalkStack<'a> {
    pending: Vec<Visit<'a>>,
}

impl<'a> WalkStack<'a> {
    /// Stack holding the children of `root`, without `root` itself.
    pub(crate) fn children_of(root: ElementRef<'a>) -> Self {
        let mut stack = Self::default();
        stack.descend(root);
        stack
    }

    /// Stack holding `root` itself.
    pub(crate) fn from_root(root: ElementRef<'a>) -> Self {
        Self {
            pending: vec![Visit::Element(root)],
        }
    }

    /// Queue the element and text children of `element`, ahead of anything
    /// already pending.
    pub(crate) fn descend(&mut self, element: ElementRef<'a>) {
        let children: Vec<Visit<'a>> = element
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(Visit::Text(&**text)),
                Node::Element(_) => ElementRef::wrap(child).map(Visit::Element),
                _ => None,
            })
            .collect();
        self.pending.extend(children.into_iter().rev());
    }
}

impl<'a> Iterator for WalkStack<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pending.pop()
    }
}
