//! Document mutation abstraction
//!
//! The injector only needs four things from a document: create a script
//! element, attach it to the head (which executes it), and find or remove
//! scripts by attribute. [`MemoryDocument`] implements that surface for
//! tests and simulations and can be told to fail.

/// Failures creating or attaching a script element
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// Element could not be created
    #[error("failed to create script element: {0}")]
    CreateFailed(String),

    /// Element could not be attached to the document
    #[error("failed to attach script element: {0}")]
    AttachFailed(String),
}

/// A `<script>` element: text plus attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptElement {
    text: String,
    attributes: Vec<(String, String)>,
}

impl ScriptElement {
    /// Element with the given text and no attributes
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: Vec::new(),
        }
    }

    /// Script text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Builder form of [`Self::set_attribute`]
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Attribute value
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the attribute is present
    #[inline]
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

/// Script-element operations on a document
pub trait ScriptDocument {
    /// Create a detached script element holding `text`
    ///
    /// # Errors
    /// [`DocumentError::CreateFailed`]
    fn create_script(&mut self, text: &str) -> Result<ScriptElement, DocumentError>;

    /// Attach an element to the document head, executing it
    ///
    /// # Errors
    /// [`DocumentError::AttachFailed`]
    fn append_to_head(&mut self, element: ScriptElement) -> Result<(), DocumentError>;

    /// Remove every script carrying `attribute`; returns how many were removed
    fn remove_scripts_with(&mut self, attribute: &str) -> usize;

    /// Scripts carrying `attribute`, in document order
    fn scripts_with(&self, attribute: &str) -> Vec<&ScriptElement>;
}

type Rejector = Box<dyn Fn(&ScriptElement) -> bool + Send + Sync>;

/// In-memory document head
#[derive(Default)]
pub struct MemoryDocument {
    head: Vec<ScriptElement>,
    executed: Vec<String>,
    reject_create: Option<Rejector>,
    reject_attach: Option<Rejector>,
}

impl MemoryDocument {
    /// Empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail element creation whenever `predicate` matches the new element
    #[must_use]
    pub fn reject_create_when(
        mut self,
        predicate: impl Fn(&ScriptElement) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.reject_create = Some(Box::new(predicate));
        self
    }

    /// Fail attachment whenever `predicate` matches the element
    #[must_use]
    pub fn reject_attach_when(
        mut self,
        predicate: impl Fn(&ScriptElement) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.reject_attach = Some(Box::new(predicate));
        self
    }

    /// Every element currently in the head
    #[inline]
    #[must_use]
    pub fn head(&self) -> &[ScriptElement] {
        &self.head
    }

    /// Texts of scripts executed so far, in execution order
    #[inline]
    #[must_use]
    pub fn executed(&self) -> &[String] {
        &self.executed
    }
}

impl ScriptDocument for MemoryDocument {
    fn create_script(&mut self, text: &str) -> Result<ScriptElement, DocumentError> {
        let element = ScriptElement::new(text);
        if self.reject_create.as_ref().is_some_and(|reject| reject(&element)) {
            return Err(DocumentError::CreateFailed("element rejected".to_string()));
        }
        Ok(element)
    }

    fn append_to_head(&mut self, element: ScriptElement) -> Result<(), DocumentError> {
        if self.reject_attach.as_ref().is_some_and(|reject| reject(&element)) {
            return Err(DocumentError::AttachFailed("element rejected".to_string()));
        }
        self.executed.push(element.text().to_string());
        self.head.push(element);
        Ok(())
    }

    fn remove_scripts_with(&mut self, attribute: &str) -> usize {
        let before = self.head.len();
        self.head.retain(|element| !element.has_attribute(attribute));
        before - self.head.len()
    }

    fn scripts_with(&self, attribute: &str) -> Vec<&ScriptElement> {
        self.head
            .iter()
            .filter(|element| element.has_attribute(attribute))
            .collect()
    }
}

impl std::fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("head", &self.head)
            .field("executed", &self.executed.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_replace_in_place() {
        let mut element = ScriptElement::new("x()").with_attribute("a", "1");
        element.set_attribute("a", "2");
        element.set_attribute("b", "3");
        assert_eq!(element.attribute("a"), Some("2"));
        assert_eq!(element.attribute("b"), Some("3"));
        assert!(!element.has_attribute("c"));
    }

    #[test]
    fn remove_only_touches_tagged_scripts() {
        let mut doc = MemoryDocument::new();
        doc.append_to_head(ScriptElement::new("app()")).unwrap();
        doc.append_to_head(ScriptElement::new("t()").with_attribute("data-t", "1"))
            .unwrap();

        assert_eq!(doc.scripts_with("data-t").len(), 1);
        assert_eq!(doc.remove_scripts_with("data-t"), 1);
        assert_eq!(doc.remove_scripts_with("data-t"), 0);
        assert_eq!(doc.head().len(), 1);
        assert_eq!(doc.head()[0].text(), "app()");
        assert_eq!(doc.executed(), ["app()", "t()"]);
    }

    #[test]
    fn rejectors_fail_matching_elements() {
        let mut doc = MemoryDocument::new()
            .reject_create_when(|e| e.text().contains("bad"))
            .reject_attach_when(|e| e.attribute("x") == Some("no"));

        assert!(matches!(doc.create_script("bad()"), Err(DocumentError::CreateFailed(_))));

        let element = doc.create_script("ok()").unwrap().with_attribute("x", "no");
        assert!(matches!(doc.append_to_head(element), Err(DocumentError::AttachFailed(_))));
        assert!(doc.head().is_empty());
        assert!(doc.executed().is_empty());
    }
}
