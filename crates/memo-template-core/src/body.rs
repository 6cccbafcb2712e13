//! `word/document.xml` body model
//!
//! The body part is kept as a stream of `quick_xml` events. Paragraphs that are
//! direct children of `w:body` are lifted out so their text can be read and
//! replaced; everything else (tables, section properties, bookmarks between
//! paragraphs, namespaces) stays as opaque markup and is written back
//! unchanged.
//!
//! Paragraph text follows the word-processor convention: the `w:t` content of
//! runs that are direct children of the paragraph (or of a hyperlink inside
//! it), with `w:tab` as `\t` and `w:br`/`w:cr` as `\n`.

use crate::error::{Result, TemplateError};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

const BODY: &[u8] = b"w:body";
const PARAGRAPH: &[u8] = b"w:p";
const PARAGRAPH_PROPS: &[u8] = b"w:pPr";
const RUN: &[u8] = b"w:r";
const RUN_PROPS: &[u8] = b"w:rPr";
const HYPERLINK: &[u8] = b"w:hyperlink";
const TEXT: &[u8] = b"w:t";

/// A body paragraph as parsed from XML
#[derive(Debug, Clone)]
struct ParagraphXml {
    start: BytesStart<'static>,
    self_closing: bool,
    /// `w:pPr` subtree, kept on rewrite
    properties: Vec<Event<'static>>,
    /// Every other child, dropped on rewrite
    content: Vec<Event<'static>>,
    /// `w:rPr` subtree of the first run, reused for the replacement run
    run_properties: Vec<Event<'static>>,
    text: String,
    replacement: Option<String>,
}

impl ParagraphXml {
    fn current_text(&self) -> &str {
        self.replacement.as_deref().unwrap_or(&self.text)
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let Some(text) = &self.replacement else {
            if self.self_closing {
                writer.write_event(Event::Empty(self.start.clone()))?;
            } else {
                writer.write_event(Event::Start(self.start.clone()))?;
                for event in self.properties.iter().chain(&self.content) {
                    writer.write_event(event.clone())?;
                }
                writer.write_event(Event::End(self.start.to_end()))?;
            }
            return Ok(());
        };

        writer.write_event(Event::Start(self.start.clone()))?;
        for event in &self.properties {
            writer.write_event(event.clone())?;
        }
        if !text.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("w:r")))?;
            for event in &self.run_properties {
                writer.write_event(event.clone())?;
            }
            writer.write_event(Event::Start(
                BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
            ))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new("w:t")))?;
            writer.write_event(Event::End(BytesEnd::new("w:r")))?;
        }
        writer.write_event(Event::End(self.start.to_end()))?;
        Ok(())
    }
}

/// Which section of the paragraph an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Content,
    Properties,
}

/// Accumulates the events of one open `w:p` element
#[derive(Debug)]
struct ParagraphBuilder {
    paragraph: ParagraphXml,
    /// Open elements below the paragraph
    path: Vec<Vec<u8>>,
    capture: Capture,
    /// Depth of the first run's `w:rPr` while it is being copied
    run_props_depth: Option<usize>,
    seen_first_run: bool,
}

impl ParagraphBuilder {
    fn new(start: BytesStart<'static>) -> Self {
        Self {
            paragraph: ParagraphXml {
                start,
                self_closing: false,
                properties: Vec::new(),
                content: Vec::new(),
                run_properties: Vec::new(),
                text: String::new(),
                replacement: None,
            },
            path: Vec::new(),
            capture: Capture::Content,
            run_props_depth: None,
            seen_first_run: false,
        }
    }

    /// Run directly under the paragraph or under a hyperlink
    fn in_run(&self) -> bool {
        match self.path.as_slice() {
            [run] => run == RUN,
            [link, run] => link == HYPERLINK && run == RUN,
            _ => false,
        }
    }

    fn in_run_text(&self) -> bool {
        match self.path.split_last() {
            Some((last, parent)) if last == TEXT => match parent {
                [run] => run == RUN,
                [link, run] => link == HYPERLINK && run == RUN,
                _ => false,
            },
            _ => false,
        }
    }

    fn first_run_open(&self) -> bool {
        !self.seen_first_run && self.path.len() == 1 && self.path[0] == RUN
    }

    fn record(&mut self, event: Event<'static>) {
        if self.run_props_depth.is_some() {
            self.paragraph.run_properties.push(event.clone());
        }
        match self.capture {
            Capture::Properties => self.paragraph.properties.push(event),
            Capture::Content => self.paragraph.content.push(event),
        }
    }

    /// Feed one event; returns `true` once the paragraph's end tag was seen
    fn push(&mut self, event: Event<'static>) -> Result<bool> {
        match &event {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if self.path.is_empty() && name == PARAGRAPH_PROPS {
                    self.capture = Capture::Properties;
                }
                if self.first_run_open() && name == RUN_PROPS {
                    self.run_props_depth = Some(self.path.len());
                }
                self.path.push(name);
                self.record(event);
            }
            Event::Empty(e) => {
                let qname = e.name();
                let name = qname.as_ref();
                if self.path.is_empty() && name == PARAGRAPH_PROPS {
                    self.paragraph.properties.push(event);
                    return Ok(false);
                }
                if self.first_run_open() && name == RUN_PROPS {
                    self.paragraph.run_properties.push(event.clone());
                }
                if self.in_run() {
                    match name {
                        b"w:tab" => self.paragraph.text.push('\t'),
                        b"w:br" | b"w:cr" => self.paragraph.text.push('\n'),
                        _ => {}
                    }
                }
                self.record(event);
            }
            Event::Text(t) => {
                if self.in_run_text() {
                    self.paragraph.text.push_str(&t.unescape()?);
                }
                self.record(event);
            }
            Event::End(_) => {
                let Some(name) = self.path.pop() else {
                    return Ok(true);
                };
                self.record(event);
                if self.run_props_depth == Some(self.path.len()) {
                    self.run_props_depth = None;
                }
                if self.path.is_empty() {
                    if name == PARAGRAPH_PROPS {
                        self.capture = Capture::Content;
                    } else if name == RUN {
                        self.seen_first_run = true;
                    }
                }
            }
            Event::Eof => {
                return Err(TemplateError::InvalidStructure(
                    "unterminated paragraph in document body".to_string(),
                ))
            }
            _ => self.record(event),
        }
        Ok(false)
    }

    fn finish(self) -> ParagraphXml {
        self.paragraph
    }
}

#[derive(Debug, Clone)]
enum BodyNode {
    Markup(Event<'static>),
    Paragraph(ParagraphXml),
}

/// Parsed `word/document.xml`
#[derive(Debug, Clone)]
pub(crate) struct BodyXml {
    nodes: Vec<BodyNode>,
    /// Index into `nodes` of each body paragraph, in document order
    paragraphs: Vec<usize>,
}

impl BodyXml {
    /// Parse the body part
    pub(crate) fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut nodes = Vec::new();
        let mut paragraphs = Vec::new();
        let mut stack: Vec<Vec<u8>> = Vec::new();
        let mut open: Option<ParagraphBuilder> = None;
        let mut saw_body = false;

        loop {
            let event = reader.read_event()?.into_owned();
            if let Some(builder) = open.as_mut() {
                if builder.push(event)? {
                    if let Some(builder) = open.take() {
                        paragraphs.push(nodes.len());
                        nodes.push(BodyNode::Paragraph(builder.finish()));
                    }
                }
                continue;
            }

            let in_body = stack.last().is_some_and(|parent| parent == BODY);
            match event {
                Event::Eof => break,
                Event::Start(e) if in_body && e.name().as_ref() == PARAGRAPH => {
                    open = Some(ParagraphBuilder::new(e));
                }
                Event::Empty(e) if in_body && e.name().as_ref() == PARAGRAPH => {
                    let mut builder = ParagraphBuilder::new(e);
                    builder.paragraph.self_closing = true;
                    paragraphs.push(nodes.len());
                    nodes.push(BodyNode::Paragraph(builder.finish()));
                }
                Event::Start(e) => {
                    saw_body |= e.name().as_ref() == BODY;
                    stack.push(e.name().as_ref().to_vec());
                    nodes.push(BodyNode::Markup(Event::Start(e)));
                }
                Event::End(e) => {
                    stack.pop();
                    nodes.push(BodyNode::Markup(Event::End(e)));
                }
                Event::Empty(e) => {
                    saw_body |= e.name().as_ref() == BODY;
                    nodes.push(BodyNode::Markup(Event::Empty(e)));
                }
                other => nodes.push(BodyNode::Markup(other)),
            }
        }

        if open.is_some() {
            return Err(TemplateError::InvalidStructure(
                "unterminated paragraph in document body".to_string(),
            ));
        }
        if !saw_body {
            return Err(TemplateError::InvalidStructure(
                "document part has no w:body element".to_string(),
            ));
        }

        Ok(Self { nodes, paragraphs })
    }

    /// Number of body paragraphs
    pub(crate) fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Current text of every body paragraph
    pub(crate) fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.paragraphs.iter().filter_map(move |&node| match &self.nodes[node] {
            BodyNode::Paragraph(p) => Some(p.current_text()),
            BodyNode::Markup(_) => None,
        })
    }

    /// Set the text of a paragraph; a text equal to the parsed one is a no-op
    pub(crate) fn set_text(&mut self, index: usize, text: String) {
        let Some(&node) = self.paragraphs.get(index) else {
            return;
        };
        if let BodyNode::Paragraph(p) = &mut self.nodes[node] {
            p.replacement = if p.text == text { None } else { Some(text) };
        }
    }

    /// Serialize back to XML
    pub(crate) fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            match node {
                BodyNode::Markup(event) => writer.write_event(event.clone())?,
                BodyNode::Paragraph(p) => p.write(&mut writer)?,
            }
        }
        Ok(writer.into_inner())
    }
}
