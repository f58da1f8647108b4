/*
** This file is a part of Xstanza (streaming XML stanza parser for XMPP)
**
** Xstanza is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn empty_element() {
    let element = Element::new("presence");
    assert_eq!(element.name(), "presence");
    assert_eq!(element.text(), "");
    assert!(element.attributes().is_empty());
    assert!(element.children().is_empty());
    assert_eq!(element.attribute("missing"), None);
    assert!(element.child("missing").is_none());
}

#[test]
fn building_a_stanza() {
    let mut message = Element::new("message");
    message.set_attribute("to", "juliet@example.org");
    message.set_attribute("type", "chat");

    let mut body = Element::new("body");
    body.set_text("call me but love");
    message.append_child(body);
    message.append_child(Element::new("thread"));

    assert_eq!(message.attribute("to"), Some("juliet@example.org"));
    assert_eq!(message.children().len(), 2);
    assert_eq!(message.children()[0].name(), "body");
    assert_eq!(message.children()[1].name(), "thread");
    assert_eq!(message.child("body").unwrap().text(), "call me but love");
}

#[test]
fn attribute_order_is_insertion_order() {
    let mut element = Element::new("a");
    element.set_attribute("i", "1");
    element.set_attribute("j", "2");
    element.set_attribute("k", "3");
    let names: Vec<&str> = element
        .attributes()
        .iter()
        .map(|attribute| attribute.name.as_str())
        .collect();
    assert_eq!(names, ["i", "j", "k"]);
}

#[test]
fn repeated_attribute_takes_latest_value_and_position() {
    let mut element = Element::new("a");
    element.set_attribute("i", "1");
    element.set_attribute("j", "2");
    element.set_attribute("i", "3");
    assert_eq!(element.attributes().len(), 2);
    assert_eq!(element.attributes()[0], Attribute::new("j", "2"));
    assert_eq!(element.attributes()[1], Attribute::new("i", "3"));
    assert_eq!(element.attribute("i"), Some("3"));
}

#[test]
fn text_is_overwritten() {
    let mut element = Element::new("a");
    element.set_text("first");
    element.set_text("second");
    assert_eq!(element.text(), "second");
}
