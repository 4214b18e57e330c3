//! Parsed XML documents and element queries.
//!
//! Wraps the `quick-xml` pull parser into a small owned element tree with
//! the three queries the loader needs: attribute lookup, direct children by
//! name, and descendants by name in document order.
//!
//! Element and attribute names are matched by *local* name, so the
//! namespaced vocabulary (`glz:Group`) and plain documents (`Group`) parse
//! identically.
//!
//! Inner text is kept in raw form: CDATA sections are re-wrapped in their
//! `<![CDATA[...]]>` envelope exactly as written in the source, because
//! param parsing distinguishes enveloped literals from plain text.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// One attributed element: name, attributes, child elements, raw inner text.
#[derive(Debug, Clone, Default)]
pub struct Element {
    name: String,
    attributes: HashMap<String, String>,
    children: Vec<Element>,
    raw_text: String,
}

impl Element {
    /// Local element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Concatenated inner text, CDATA envelopes preserved.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Direct children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// All descendants with the given local name, in document order.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Read and parse one XML file.
    ///
    /// A missing file and a malformed document fail the same way: both mean
    /// this entry of the import graph cannot be processed.
    pub fn parse_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::parse(path, e))?;
        Self::parse_str(&content).map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn parse_str(content: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(content);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(|e| e.to_string())? {
                Event::Start(start) => {
                    stack.push(element_from_start(&start)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    // quick-xml has already verified the end tag matches.
                    let element = stack
                        .pop()
                        .ok_or_else(|| "unexpected closing tag".to_string())?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(open) = stack.last_mut() {
                        open.raw_text
                            .push_str(&text.unescape().map_err(|e| e.to_string())?);
                    }
                }
                Event::CData(cdata) => {
                    if let Some(open) = stack.last_mut() {
                        open.raw_text.push_str("<![CDATA[");
                        open.raw_text
                            .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                        open.raw_text.push_str("]]>");
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err("unclosed element at end of document".to_string());
        }
        let root = root.ok_or_else(|| "document has no root element".to_string())?;
        Ok(Self { root })
    }

    /// The document's root element.
    pub fn root(&self) -> &Element {
        &self.root
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = HashMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
        attributes.insert(key, value);
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        raw_text: String::new(),
    })
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err("multiple root elements".to_string())
    }
}
