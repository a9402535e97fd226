//! Markup and text output for arena subtrees.
//!
//! Both walks accept a `skip` predicate over tag names; a skipped element
//! contributes nothing, including its whole subtree. Neither recurses, so
//! nesting depth is bounded only by memory.

use std::io;

use html5ever::QualName;
use html5ever::serialize::{
    Serialize, SerializeOpts, Serializer, TraversalScope, serialize,
};

use super::arena::{Document, NodeData, NodeId};

/// A subtree with pruned tags, serializable by html5ever.
struct Pruned<'a, F> {
    doc: &'a Document,
    root: NodeId,
    skip: F,
}

/// Pending work of the serializer walk.
enum Frame<'a> {
    Open(NodeId),
    Close(&'a QualName),
}

impl<'a, F: Fn(&str) -> bool> Pruned<'a, F> {
    fn write<S: Serializer>(&self, serializer: &mut S, mut stack: Vec<Frame<'a>>) -> io::Result<()> {
        let doc: &'a Document = self.doc;
        while let Some(frame) = stack.pop() {
            let id = match frame {
                Frame::Open(id) => id,
                Frame::Close(name) => {
                    serializer.end_elem(name.clone())?;
                    continue;
                }
            };
            let Some(node) = doc.get(id) else {
                continue;
            };

            match &node.data {
                NodeData::Element { name, attrs, .. } => {
                    if (self.skip)(name.local.as_ref()) {
                        continue;
                    }
                    serializer.start_elem(
                        name.clone(),
                        attrs.iter().map(|a| (&a.name, a.value.as_str())),
                    )?;
                    stack.push(Frame::Close(name));
                    self.push_children(&mut stack, id);
                }
                NodeData::Text(text) => serializer.write_text(text)?,
                NodeData::Comment(text) => serializer.write_comment(text)?,
                NodeData::Doctype { name } => serializer.write_doctype(name)?,
                NodeData::Document => self.push_children(&mut stack, id),
            }
        }
        Ok(())
    }

    /// Queue the children of `id` (its content fragment for a template) so
    /// they pop in document order.
    fn push_children(&self, stack: &mut Vec<Frame<'a>>, id: NodeId) {
        let parent = self.doc.template_contents(id).unwrap_or(id);
        let start = stack.len();
        stack.extend(self.doc.children(parent).map(Frame::Open));
        stack[start..].reverse();
    }
}

impl<F: Fn(&str) -> bool> Serialize for Pruned<'_, F> {
    fn serialize<S: Serializer>(
        &self,
        serializer: &mut S,
        traversal_scope: TraversalScope,
    ) -> io::Result<()> {
        let mut stack = Vec::new();
        match traversal_scope {
            TraversalScope::IncludeNode => stack.push(Frame::Open(self.root)),
            TraversalScope::ChildrenOnly(_) => self.push_children(&mut stack, self.root),
        }
        self.write(serializer, stack)
    }
}

impl Document {
    /// Serialize `id` including its own tag, leaving out skipped elements.
    pub fn outer_html(&self, id: NodeId, skip: impl Fn(&str) -> bool) -> String {
        let pruned = Pruned {
            doc: self,
            root: id,
            skip,
        };
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..Default::default()
        };

        let mut bytes = Vec::new();
        // Writing into a Vec cannot fail
        if serialize(&mut bytes, &pruned, opts).is_err() {
            return String::new();
        }
        String::from_utf8(bytes).unwrap_or_default()
    }

    /// Concatenate the text below `id`, leaving out skipped elements.
    /// Template contents are not part of the text, as in a browser.
    pub fn text(&self, id: NodeId, skip: impl Fn(&str) -> bool) -> String {
        let mut out = String::new();
        let mut walk = self.preorder(id);
        while let Some(current) = walk.next() {
            match self.get(current).map(|n| &n.data) {
                Some(NodeData::Text(text)) => out.push_str(text),
                Some(NodeData::Element { name, .. }) if skip(name.local.as_ref()) => {
                    walk.skip_subtree()
                }
                _ => {}
            }
        }
        out
    }
}
