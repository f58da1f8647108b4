/*
** This file is a part of Xstanza (streaming XML stanza parser for XMPP)
**
** Xstanza is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod element;
mod parser;

pub use element::Attribute;
pub use element::Element;

pub use parser::ParseError;
pub use parser::StanzaParser;
