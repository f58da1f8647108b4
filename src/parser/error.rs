/*
** This file is a part of Xstanza (streaming XML stanza parser for XMPP)
**
** Xstanza is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::error::Error;
use std::fmt::Display;

/// Failure of a [StanzaParser](super::StanzaParser) call.
///
/// These categories correspond to the distinct actions the connection
/// layer takes. Every variant is terminal for the parser instance: once
/// an error is returned, the connection must be torn down and further
/// calls fail.
#[derive(Debug)]
pub enum ParseError {
    /// The in-flight stanza exceeded the configured byte budget.
    ///
    /// This is a defense against unbounded memory growth from a
    /// malicious or buggy peer; the caller should close the connection.
    TooLargeStanza,

    /// The remote peer closed the stream with its end tag.
    ///
    /// An expected, non-exceptional signal. The caller should begin an
    /// orderly connection teardown.
    StreamClosedByPeer,

    /// The input violated XML well-formedness or the stanza framing
    /// rules, such as a mismatched end tag.
    MalformedStanza(&'static str),

    /// A lexical error reported by the underlying XML tokenizer.
    Xml(quick_xml::Error),

    /// The byte source failed, or ended before the stream was closed.
    Io(std::io::Error),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::TooLargeStanza => write!(f, "too large stanza"),
            ParseError::StreamClosedByPeer => write!(f, "stream closed by peer"),
            ParseError::MalformedStanza(msg) => write!(f, "malformed stanza: {msg}"),
            ParseError::Xml(err) => write!(f, "invalid XML syntax: {err}"),
            ParseError::Io(err) => err.fmt(f),
        }
    }
}

impl Error for ParseError {}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(err) => ParseError::Io(std::io::Error::new(err.kind(), err)),
            err => ParseError::Xml(err),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io(err)
    }
}

pub(super) mod description {
    pub(in super::super) const TAG_MISMATCH: &str = "start and end tags have different names";
    pub(in super::super) const END_TAG_WITHOUT_OPEN: &str = "close tag without open";
    pub(in super::super) const PI_INSIDE_STANZA: &str =
        "processing instruction inside an open element";
    pub(in super::super) const PARSER_CLOSED: &str = "cannot continue after a terminal error";
    pub(in super::super) const INVALID_UTF8: &str = "input is not valid UTF-8";
    pub(in super::super) const BAD_ATTRIBUTE: &str = "malformed tag attribute";
    pub(in super::super) const UNKNOWN_ENTITY: &str =
        "non-predefined entity references are not supported";
    pub(in super::super) const INVALID_CHAR_REF: &str =
        "character reference is not a valid XML character";
}
