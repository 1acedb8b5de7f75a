//! XML reading and writing for [`Document`].
//!
//! The format is purely attribute based: character data between tags is
//! ignored on read and never produced on write.

use std::io::{BufRead, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::{Document, NodeId};
use crate::error::{Result, SerializationError};

impl Document {
    /// Parse a document from XML text.
    pub fn parse_str(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut builder = TreeBuilder::default();
        loop {
            let position = reader.buffer_position() as u64;
            match reader.read_event() {
                Ok(Event::Start(start)) => builder.open(&start, true, position)?,
                Ok(Event::Empty(start)) => builder.open(&start, false, position)?,
                Ok(Event::End(_)) => builder.close(position)?,
                Ok(Event::Eof) => break,
                // Declarations, comments, text and processing instructions carry no state.
                Ok(_) => {}
                Err(err) => {
                    return Err(SerializationError::parse(
                        err.to_string(),
                        reader.error_position() as u64,
                    ));
                }
            }
        }
        builder.finish(reader.buffer_position() as u64)
    }

    /// Parse a document from a buffered byte stream.
    pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|err| SerializationError::parse(err.to_string(), 0))?;
        Self::parse_str(&text)
    }

    /// Write the document as XML with the given number of spaces per level.
    ///
    /// An indent of zero writes everything on one line.
    pub fn write_to<W: Write>(&self, writer: W, indent: usize) -> Result<()> {
        let mut xml = if indent > 0 {
            Writer::new_with_indent(writer, b' ', indent)
        } else {
            Writer::new(writer)
        };
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_node(&mut xml, self, self.root())
    }

    /// Render the document as an XML string with two-space indentation.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer, crate::constants::DEFAULT_INDENT)?;
        String::from_utf8(buffer)
            .map_err(|err| SerializationError::invalid_document(err.to_string()))
    }
}

fn write_node<W: Write>(xml: &mut Writer<W>, document: &Document, id: NodeId) -> Result<()> {
    let name = document.name(id);
    let mut start = BytesStart::new(name);
    for attr in document.attributes(id) {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }

    let children = document.children(id);
    if children.is_empty() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }

    xml.write_event(Event::Start(start))?;
    for &child in children {
        write_node(xml, document, child)?;
    }
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Assembles a [`Document`] from a stream of start/end events.
#[derive(Default)]
struct TreeBuilder {
    document: Option<Document>,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    fn open(&mut self, start: &BytesStart<'_>, has_children: bool, position: u64) -> Result<()> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|err| SerializationError::parse(err.to_string(), position))?
            .to_string();

        let parent = self.open.last().copied();
        let id = match (self.document.as_mut(), parent) {
            (Some(document), Some(parent)) => document.append_child(parent, name),
            (None, _) => {
                let document = Document::new(name);
                let root = document.root();
                self.document = Some(document);
                root
            }
            (Some(_), None) => {
                return Err(SerializationError::parse(
                    format!("second root element <{name}>"),
                    position,
                ));
            }
        };

        if let Some(document) = self.document.as_mut() {
            for attr in start.attributes() {
                let attr =
                    attr.map_err(|err| SerializationError::parse(err.to_string(), position))?;
                let key = std::str::from_utf8(attr.key.as_ref())
                    .map_err(|err| SerializationError::parse(err.to_string(), position))?
                    .to_string();
                let value = attr
                    .unescape_value()
                    .map_err(|err| SerializationError::parse(err.to_string(), position))?;
                document.set_attribute(id, &key, value.into_owned());
            }
        }

        if has_children {
            self.open.push(id);
        }
        Ok(())
    }

    fn close(&mut self, position: u64) -> Result<()> {
        self.open
            .pop()
            .map(|_| ())
            .ok_or_else(|| SerializationError::parse("unexpected closing tag", position))
    }

    fn finish(self, position: u64) -> Result<Document> {
        if let Some(&unclosed) = self.open.last() {
            let name = self
                .document
                .as_ref()
                .map(|doc| doc.name(unclosed).to_string())
                .unwrap_or_default();
            return Err(SerializationError::parse(
                format!("element <{name}> is never closed"),
                position,
            ));
        }
        self.document
            .ok_or_else(|| SerializationError::invalid_document("no root element"))
    }
}
