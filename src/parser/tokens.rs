/*
** This file is a part of Xstanza (streaming XML stanza parser for XMPP)
**
** Xstanza is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::BytesCData;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::name::QName;

use crate::element::Attribute;

use super::error::ParseError;
use super::error::description;

/// One classified tokenizer event, annotated with decoded names.
#[derive(Debug)]
pub(super) enum Token {
    ProcessingInstruction,
    StartElement {
        name: String,
        attributes: Vec<Attribute>,
    },
    EndElement {
        name: String,
    },
    CharacterData(String),
}

/// Pulls primitive lexical events from the XML tokenizer one at a time,
/// classifies them, and enforces the stanza byte budget against the
/// tokenizer's running input offset.
pub(super) struct TokenReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    pending: Option<Token>,
    max_stanza_size: u64,
    last_commit: u64,
}

impl<R: BufRead> TokenReader<R> {
    pub(super) fn new(source: R, max_stanza_size: Option<u64>) -> TokenReader<R> {
        let mut reader = Reader::from_reader(source);
        let config = reader.config_mut();
        // Self-closing tags arrive as a start/end pair so that the
        // assembler has a single completion path.
        config.expand_empty_elements = true;
        // Tag matching is the assembler's job; the mismatch must surface
        // as a framing error, not a tokenizer one.
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        TokenReader {
            reader,
            buf: Vec::new(),
            pending: None,
            max_stanza_size: max_stanza_size.unwrap_or(0),
            last_commit: 0,
        }
    }

    /// Records the current input offset as the end of the last emitted
    /// unit. The byte budget is measured from this baseline.
    pub(super) fn commit(&mut self) {
        self.last_commit = self.reader.buffer_position();
    }

    /// Returns the next classified token.
    ///
    /// Contiguous character data is delivered as one token even when
    /// the tokenizer splits it around references and CDATA sections,
    /// matching the one-token-per-run shape the assembler expects.
    pub(super) fn next_token(&mut self) -> Result<Token, ParseError> {
        if let Some(token) = self.pending.take() {
            return Ok(token);
        }
        let mut token = self.read_token()?;
        if let Token::CharacterData(text) = &mut token {
            loop {
                match self.read_token()? {
                    Token::CharacterData(more) => text.push_str(&more),
                    other => {
                        self.pending = Some(other);
                        break;
                    }
                }
            }
        }
        Ok(token)
    }

    fn read_token(&mut self) -> Result<Token, ParseError> {
        loop {
            self.buf.clear();
            let token = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(event) => Some(start_token(&event)?),
                Event::End(event) => Some(Token::EndElement {
                    name: qualified_name(event.name())?,
                }),
                Event::Text(event) => Some(Token::CharacterData(
                    event.decode().map_err(quick_xml::Error::from)?.into_owned(),
                )),
                Event::CData(event) => Some(Token::CharacterData(cdata_text(event)?)),
                Event::GeneralRef(event) => {
                    Some(Token::CharacterData(resolve_reference(event)?))
                }
                Event::Decl(_) | Event::PI(_) => Some(Token::ProcessingInstruction),
                // Not modeled; skipped without surfacing a token.
                Event::Comment(_) | Event::DocType(_) => None,
                // Never emitted with expand_empty_elements set.
                Event::Empty(_) => unreachable!(),
                Event::Eof => {
                    // The transport ended without the peer closing the
                    // stream.
                    return Err(ParseError::Io(std::io::ErrorKind::UnexpectedEof.into()));
                }
            };
            self.check_stanza_size()?;
            if let Some(token) = token {
                return Ok(token);
            }
        }
    }

    fn check_stanza_size(&self) -> Result<(), ParseError> {
        if self.max_stanza_size > 0
            && self.reader.buffer_position() - self.last_commit > self.max_stanza_size
        {
            return Err(ParseError::TooLargeStanza);
        }
        Ok(())
    }
}

fn start_token(event: &BytesStart) -> Result<Token, ParseError> {
    let name = qualified_name(event.name())?;
    let mut attributes = Vec::new();
    // Duplicate names are legal here and resolved by the element's
    // last-wins rule, so the tokenizer's own duplicate check is off.
    for attribute in event.attributes().with_checks(false) {
        let attribute =
            attribute.map_err(|_| ParseError::MalformedStanza(description::BAD_ATTRIBUTE))?;
        let name = qualified_name(attribute.key)?;
        let value = attribute.unescape_value()?.into_owned();
        attributes.push(Attribute::new(name, value));
    }
    Ok(Token::StartElement { name, attributes })
}

fn qualified_name(name: QName) -> Result<String, ParseError> {
    match std::str::from_utf8(name.into_inner()) {
        Ok(name) => Ok(name.to_string()),
        Err(_) => Err(ParseError::MalformedStanza(description::INVALID_UTF8)),
    }
}

fn cdata_text(event: BytesCData) -> Result<String, ParseError> {
    String::from_utf8(event.into_inner().into_owned())
        .map_err(|_| ParseError::MalformedStanza(description::INVALID_UTF8))
}

/// Replaces a general reference with its character content.
///
/// Only the five predefined entities and decimal or hexadecimal
/// character references are recognized; custom entities would need a
/// DTD, which is not modeled.
fn resolve_reference(event: BytesRef) -> Result<String, ParseError> {
    let raw = event.into_inner();
    if let Some(code) = raw.strip_prefix(b"#") {
        return resolve_char_reference(code);
    }
    let entity = match raw.as_ref() {
        b"amp" => "&",
        b"lt" => "<",
        b"gt" => ">",
        b"quot" => "\"",
        b"apos" => "'",
        _ => return Err(ParseError::MalformedStanza(description::UNKNOWN_ENTITY)),
    };
    Ok(entity.to_string())
}

fn resolve_char_reference(code: &[u8]) -> Result<String, ParseError> {
    fn digits(bytes: &[u8]) -> Result<&str, ParseError> {
        std::str::from_utf8(bytes)
            .map_err(|_| ParseError::MalformedStanza(description::INVALID_CHAR_REF))
    }
    let value = match code.strip_prefix(b"x") {
        Some(hex) => u32::from_str_radix(digits(hex)?, 16),
        None => digits(code)?.parse::<u32>(),
    }
    .map_err(|_| ParseError::MalformedStanza(description::INVALID_CHAR_REF))?;
    match char::from_u32(value) {
        Some(c) if is_valid_xml_char(value) => Ok(c.to_string()),
        _ => Err(ParseError::MalformedStanza(description::INVALID_CHAR_REF)),
    }
}

fn is_valid_xml_char(c: u32) -> bool {
    matches!(c, 0x09 | 0x0a | 0x0d | 0x20..=0xd7ff | 0xe000..=0xfffd | 0x10000..=0x10ffff)
}
