/*
** This file is a part of Xstanza (streaming XML stanza parser for XMPP)
**
** Xstanza is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;
mod tokens;

pub use error::ParseError;
use error::description;
use tokens::Token;
use tokens::TokenReader;

use std::io::BufRead;

use tracing::debug;
use tracing::trace;

use crate::element::Element;

/// Qualified name of the reserved stream framing element.
const STREAM_NAME: &str = "stream:stream";

/// Incremental stanza parser for one XMPP-style connection.
///
/// The parser turns a continuous byte stream into a sequence of
/// complete top-level elements. One instance is created per connection
/// and driven by repeated [parse_next_element()](StanzaParser::parse_next_element)
/// calls from the connection's owning task; it holds no shared state.
///
/// Two framing events receive special treatment. The stream-opening
/// `<stream:stream>` tag is emitted as a complete element on its start
/// tag alone, since its end tag only arrives when the session ends. The
/// matching `</stream:stream>` end tag is reported as
/// [ParseError::StreamClosedByPeer] so the connection layer can begin
/// an orderly teardown.
///
/// # Examples
///
/// ```
/// use xstanza::StanzaParser;
///
/// let xml = br#"<message to="juliet"><body>wherefore art thou</body></message>"#;
/// let mut parser = StanzaParser::new(&xml[..], None);
///
/// let stanza = parser.parse_next_element().unwrap().unwrap();
/// assert_eq!(stanza.name(), "message");
/// assert_eq!(stanza.attribute("to"), Some("juliet"));
/// assert_eq!(stanza.child("body").unwrap().text(), "wherefore art thou");
/// ```
pub struct StanzaParser<R: BufRead> {
    tokens: TokenReader<R>,
    stack: Vec<Element>,
    closed: bool,
}

impl<R: BufRead> StanzaParser<R> {
    /// Creates a parser reading from the given byte source.
    ///
    /// `max_stanza_size` caps the number of input bytes one top-level
    /// unit may consume before completing; `None` or `Some(0)` disables
    /// the cap. Callers handling untrusted peers should always set one.
    pub fn new(source: R, max_stanza_size: Option<u64>) -> StanzaParser<R> {
        StanzaParser {
            tokens: TokenReader::new(source, max_stanza_size),
            stack: Vec::new(),
            closed: false,
        }
    }

    /// Parses the next available top-level element.
    ///
    /// Returns `Ok(Some(element))` when a unit completed, or `Ok(None)`
    /// when the call consumed input without completing one: stray
    /// top-level character data (whitespace keep-alives between
    /// stanzas) or a leading processing instruction. `Ok(None)` is not
    /// an error and not lack of progress; the caller must simply call
    /// again.
    ///
    /// Every `Err` is terminal: the parser marks itself closed and
    /// further calls fail with [ParseError::MalformedStanza].
    pub fn parse_next_element(&mut self) -> Result<Option<Element>, ParseError> {
        if self.closed {
            return Err(ParseError::MalformedStanza(description::PARSER_CLOSED));
        }
        let result = self.next_element();
        if result.is_err() {
            self.closed = true;
        }
        result
    }

    fn next_element(&mut self) -> Result<Option<Element>, ParseError> {
        loop {
            match self.tokens.next_token()? {
                Token::ProcessingInstruction => {
                    if !self.stack.is_empty() {
                        return Err(ParseError::MalformedStanza(description::PI_INSIDE_STANZA));
                    }
                    return Ok(None);
                }
                Token::StartElement { name, attributes } => {
                    let is_stream_root = name == STREAM_NAME;
                    let mut element = Element::new(name);
                    for attribute in attributes {
                        element.set_attribute(attribute.name, attribute.value);
                    }
                    self.stack.push(element);
                    if is_stream_root {
                        // The stream header has no matching end tag at
                        // this framing level; it is complete on its own.
                        if let Some(element) = self.close_top() {
                            debug!(name = STREAM_NAME, "stream opened");
                            return self.emit(element);
                        }
                    }
                }
                Token::CharacterData(text) => match self.stack.last_mut() {
                    Some(element) => element.set_text(text),
                    // Stray top-level text, typically whitespace
                    // keep-alives between stanzas.
                    None => return Ok(None),
                },
                Token::EndElement { name } => {
                    if name == STREAM_NAME {
                        debug!("stream closed by peer");
                        return Err(ParseError::StreamClosedByPeer);
                    }
                    match self.stack.last() {
                        None => {
                            return Err(ParseError::MalformedStanza(
                                description::END_TAG_WITHOUT_OPEN,
                            ));
                        }
                        Some(element) if element.name() != name => {
                            return Err(ParseError::MalformedStanza(description::TAG_MISMATCH));
                        }
                        Some(_) => (),
                    }
                    if let Some(element) = self.close_top() {
                        return self.emit(element);
                    }
                }
            }
        }
    }

    /// Pops the element under construction. Returns it when it was a
    /// top-level unit, otherwise attaches it to its parent.
    fn close_top(&mut self) -> Option<Element> {
        let element = self.stack.pop()?;
        match self.stack.last_mut() {
            None => Some(element),
            Some(parent) => {
                parent.append_child(element);
                None
            }
        }
    }

    fn emit(&mut self, element: Element) -> Result<Option<Element>, ParseError> {
        self.tokens.commit();
        trace!(name = element.name(), "stanza parsed");
        Ok(Some(element))
    }
}
