//! Owned XML element with path queries.

/// An element: local name, trimmed text content and child elements.
///
/// Paths are `/`-separated child names evaluated from this element, in the
/// style of `ElementTree.find`: `"Items/Item"` means every `Item` child of
/// every `Items` child of `self`.
///
/// # Examples
///
/// ```
/// use bookfeed_xml::XmlElement;
///
/// let root = XmlElement::new("ItemSearchResponse").with_child(
///     XmlElement::new("Items")
///         .with_child(XmlElement::new("TotalPages").with_text("3"))
///         .with_child(XmlElement::new("Item"))
///         .with_child(XmlElement::new("Item")),
/// );
///
/// assert_eq!(root.find_text("Items/TotalPages"), Some("3"));
/// assert_eq!(root.find_all("Items/Item").len(), 2);
/// assert!(root.find("Items/Missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style text setter.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder-style child append.
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Local element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content (empty when the element has none).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Direct children in document order.
    #[must_use]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub(crate) fn trim_text(&mut self) {
        let trimmed = self.text.trim();
        if trimmed.len() != self.text.len() {
            self.text = trimmed.to_owned();
        }
    }

    /// First element matching `path`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        self.find_all(path).into_iter().next()
    }

    /// Every element matching `path`, in document order.
    #[must_use]
    pub fn find_all(&self, path: &str) -> Vec<&XmlElement> {
        let mut current = vec![self];
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|el| el.children.iter().filter(move |c| c.name == segment))
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// Text of the first element matching `path`.
    ///
    /// `Some("")` means the element exists but has no text.
    #[must_use]
    pub fn find_text(&self, path: &str) -> Option<&str> {
        self.find(path).map(XmlElement::text)
    }
}
