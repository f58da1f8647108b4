/*
** This file is a part of Xstanza (streaming XML stanza parser for XMPP)
**
** Xstanza is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// A single attribute of an [Element].
///
/// The name is kept in its qualified form, exactly as written in the
/// input: `prefix:local` when the attribute carried a prefix, the bare
/// local name otherwise. The value has all character and entity
/// references already replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Attribute {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One XML element, either produced by the parser or built by hand for
/// an outgoing stanza.
///
/// Elements own their attributes and children, both kept in document
/// order. Tag names follow the same qualified `prefix:local` convention
/// as [Attribute] names; two elements match during parsing when their
/// qualified names are equal.
///
/// An element handed out by [StanzaParser](crate::StanzaParser) is
/// complete: the parser never mutates it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Creates an element with the given qualified name and no content.
    pub fn new(name: impl Into<String>) -> Element {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Qualified name of the element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content of the element, empty when none was seen.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text content of the element.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Looks up an attribute value by its qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Sets an attribute value.
    ///
    /// A repeated name keeps only the latest value, and the attribute
    /// moves to the position of the latest occurrence.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.attributes.retain(|attribute| attribute.name != name);
        self.attributes.push(Attribute {
            name,
            value: value.into(),
        });
    }

    /// All child elements in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Finds the first child with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Appends a child element after the existing children.
    pub fn append_child(&mut self, child: Element) {
        self.children.push(child);
    }
}

#[cfg(test)]
mod tests;
