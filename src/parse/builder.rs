//! Arena tree builder driven by `quick-xml` events.
//!
//! The reader runs without end-name checks so mismatched and stray end tags
//! reach the builder, which repairs them. The first hard reader error ends
//! the tree; everything built up to that point is kept.

use super::document::{BlueprintDocument, Element, NodeId, ROOT};
use super::tag_matches;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;

/// Parse markup text into a [`BlueprintDocument`]. Never fails.
pub fn parse(text: &str) -> BlueprintDocument {
    let mut reader = Reader::from_str(text);
    reader.check_end_names(false);

    let mut builder = TreeBuilder::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                builder.start(&start);
            }
            Ok(Event::Empty(start)) => {
                if builder.start(&start) {
                    builder.close_current();
                }
            }
            Ok(Event::End(end)) => builder.close(&String::from_utf8_lossy(end.name().as_ref())),
            Ok(Event::Text(chunk)) => match chunk.unescape() {
                Ok(decoded) => builder.text(&decoded),
                Err(_) => {
                    builder.repair("undecodable entity in text");
                    builder.text(&String::from_utf8_lossy(&chunk));
                }
            },
            Ok(Event::CData(data)) => builder.raw_text(&String::from_utf8_lossy(&data)),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                builder.repair(&format!("reader stopped at byte {}: {}", reader.buffer_position(), err));
                break;
            }
        }
    }

    builder.finish()
}

/// Attributes of a raw start-tag body (everything after the tag name).
pub(crate) fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    let start = BytesStart::from_content(format!("_ {}", raw.trim()), 1);
    read_attributes(&start).0
}

/// Attributes in source order, stopping at the first malformed one. The flag
/// is false when the attribute list was cut short.
fn read_attributes(start: &BytesStart<'_>) -> (Vec<(String, String)>, bool) {
    let mut attributes = Vec::new();
    for attr in start.attributes().with_checks(false) {
        let Ok(attr) = attr else {
            return (attributes, false);
        };
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map(Cow::into_owned)
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        attributes.push((key, value));
    }
    (attributes, true)
}

struct TreeBuilder {
    nodes: Vec<Element>,
    stack: Vec<NodeId>,
    repairs: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        Self { nodes: vec![Element::default()], stack: vec![ROOT], repairs: 0 }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(ROOT)
    }

    /// Open an element from a start tag. Returns false when the tag has no
    /// usable name and was dropped.
    fn start(&mut self, start: &BytesStart<'_>) -> bool {
        let name = String::from_utf8_lossy(start.name().as_ref()).trim().to_string();
        if name.is_empty() {
            self.repair("start tag without a name");
            return false;
        }
        let (attributes, complete) = read_attributes(start);
        if !complete {
            self.repair("malformed attribute list");
        }
        self.open(name, attributes);
        true
    }

    fn open(&mut self, name: String, attributes: Vec<(String, String)>) {
        let parent = self.current();
        let id = self.nodes.len();
        self.nodes.push(Element {
            name,
            attributes,
            children: Vec::new(),
            parent: Some(parent),
            text: String::new(),
        });
        self.nodes[parent].children.push(id);
        self.stack.push(id);
    }

    fn close_current(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Close the nearest open element named `name`, implicitly closing any
    /// elements opened inside it. Stray end tags are dropped.
    fn close(&mut self, name: &str) {
        let name = name.trim();
        let position = self
            .stack
            .iter()
            .skip(1)
            .rposition(|&id| tag_matches(&self.nodes[id].name, name) || self.nodes[id].name == name);
        match position {
            Some(pos) => {
                let depth = pos + 1;
                let implicit = self.stack.len() - depth - 1;
                for _ in 0..implicit {
                    self.repair("element closed implicitly by outer end tag");
                }
                self.stack.truncate(depth);
            }
            None => self.repair("end tag without matching element"),
        }
    }

    fn text(&mut self, chunk: &str) {
        if chunk.trim().is_empty() {
            return;
        }
        self.raw_text(chunk);
    }

    fn raw_text(&mut self, chunk: &str) {
        let current = self.current();
        if current != ROOT {
            self.nodes[current].text.push_str(chunk);
        }
    }

    fn repair(&mut self, what: &str) {
        self.repairs += 1;
        tracing::debug!("blueprint parser repair: {}", what);
    }

    fn finish(mut self) -> BlueprintDocument {
        while self.stack.len() > 1 {
            self.stack.pop();
            self.repair("element left open at end of input");
        }
        BlueprintDocument::from_parts(self.nodes, self.repairs)
    }
}
