//! Structured markup document builder
//!
//! The project file is built as a tree of typed nodes and rendered in a
//! single depth-first pass. Indentation is derived from tree depth, so
//! open/close pairing is correct by construction instead of being tracked
//! by a hand-maintained counter.

use std::borrow::Cow;
use std::io::{self, Write};

/// Number of spaces per nesting level.
const INDENT: usize = 4;

/// One node inside an element: either a nested element or a bare text line
/// (used for matrix rows).
#[derive(Debug, Clone)]
enum Node {
    Element(Element),
    Text(String),
}

/// A markup element with a tag name, ordered attributes and children.
///
/// Elements built with [`Element::leaf`] render self-closing
/// (`<parameter ... />`); all others render as an open/close pair, even
/// when empty.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    leaf: bool,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            leaf: false,
        }
    }

    /// A self-closing element, e.g. `<look_at ... />`.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            leaf: true,
            ..Self::new(name)
        }
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((name.into(), value.to_string()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        debug_assert!(!self.leaf, "leaf elements cannot have children");
        self.children.push(Node::Element(child));
        self
    }

    /// Append one line of text content, e.g. a matrix row.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        debug_assert!(!self.leaf, "leaf elements cannot have text content");
        self.children.push(Node::Text(text.into()));
        self
    }

    fn write_to<W: Write>(&self, writer: &mut W, depth: usize) -> io::Result<()> {
        write_indent(writer, depth)?;
        write!(writer, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(writer, " {}=\"{}\"", name, escape_attribute(value))?;
        }

        if self.leaf {
            return writeln!(writer, " />");
        }

        writeln!(writer, ">")?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_to(writer, depth + 1)?,
                Node::Text(text) => {
                    write_indent(writer, depth + 1)?;
                    writeln!(writer, "{text}")?;
                }
            }
        }
        write_indent(writer, depth)?;
        writeln!(writer, "</{}>", self.name)
    }
}

/// A complete document: the XML declaration, header comments and one root
/// element.
#[derive(Debug, Clone)]
pub struct Document {
    comments: Vec<String>,
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            comments: Vec::new(),
            root,
        }
    }

    /// Add a `<!-- ... -->` line between the declaration and the root.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comments.push(text.into());
        self
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        for comment in &self.comments {
            writeln!(writer, "<!-- {comment} -->")?;
        }
        self.root.write_to(writer, 0)
    }
}

fn write_indent<W: Write>(writer: &mut W, depth: usize) -> io::Result<()> {
    for _ in 0..depth {
        write!(writer, "{:width$}", "", width = INDENT)?;
    }
    Ok(())
}

/// Minimal escaping for attribute values; object names come straight from
/// the host and may contain markup metacharacters.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    if !value
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>' | '"'))
    {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
