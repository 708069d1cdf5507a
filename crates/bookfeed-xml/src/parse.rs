//! Response document parsing.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::element::XmlElement;
use crate::error::XmlError;

/// Parse a complete document into its root element.
///
/// Element names are reduced to their local part, attributes (including
/// `xmlns` declarations) are discarded, and each element's text is trimmed.
///
/// # Errors
///
/// Returns `XmlError` if the document is malformed, has no root element, or
/// ends before the root element is closed.
///
/// # Examples
///
/// ```
/// use bookfeed_xml::parse_document;
///
/// let root = parse_document(
///     br#"<R xmlns="http://webservices.amazon.com/AWSECommerceService/2009-01-06">
///           <Items><TotalPages>2</TotalPages></Items>
///         </R>"#,
/// )
/// .unwrap();
/// assert_eq!(root.find_text("Items/TotalPages"), Some("2"));
/// ```
pub fn parse_document(xml: &[u8]) -> Result<XmlElement, XmlError> {
    read_root(xml).inspect_err(|err| {
        debug!(error = %err, len = xml.len(), "rejected response document");
    })
}

fn read_root(xml: &[u8]) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_reader(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                ensure_single_root(root.as_ref())?;
                stack.push(XmlElement::new(local_name(&e)?));
            }
            Event::Empty(e) => {
                ensure_single_root(root.as_ref())?;
                let element = XmlElement::new(local_name(&e)?);
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let mut element = stack.pop().ok_or_else(|| {
                    XmlError::UnexpectedElement("closing tag without opening tag".to_owned())
                })?;
                element.trim_text();
                attach(&mut stack, &mut root, element);
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let decoded = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let unescaped = quick_xml::escape::unescape(&decoded)
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    current.push_text(&unescaped);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    let decoded = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    current.push_text(&decoded);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(current) = stack.last_mut() {
                    let resolved = match e
                        .resolve_char_ref()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?
                    {
                        Some(ch) => ch.to_string(),
                        None => {
                            let name = e
                                .decode()
                                .map_err(|err| XmlError::ParseError(err.to_string()))?;
                            quick_xml::escape::resolve_predefined_entity(&name)
                                .ok_or_else(|| {
                                    XmlError::ParseError(format!("unknown entity: &{name};"))
                                })?
                                .to_owned()
                        }
                    };
                    current.push_text(&resolved);
                }
            }
            Event::Eof => break,
            // Skip declaration, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::UnexpectedElement(
            "unexpected EOF before root element was closed".to_owned(),
        ));
    }

    root.ok_or_else(|| XmlError::MissingElement("root element".to_owned()))
}

/// Local part of an element name (`ns:Item` becomes `Item`).
fn local_name(e: &BytesStart<'_>) -> Result<String, XmlError> {
    let name = e.local_name();
    std::str::from_utf8(name.as_ref())
        .map(ToOwned::to_owned)
        .map_err(|err| XmlError::ParseError(err.to_string()))
}

fn ensure_single_root(root: Option<&XmlElement>) -> Result<(), XmlError> {
    match root {
        Some(existing) => Err(XmlError::UnexpectedElement(format!(
            "second top-level element after <{}>",
            existing.name()
        ))),
        None => Ok(()),
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None => *root = Some(element),
    }
}
