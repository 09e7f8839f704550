use std::fmt::Display;

const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// An owned XML element: a name, ordered attributes, optional text and
/// child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: vec![],
            text: None,
            children: vec![],
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = XmlElement::new(name);
        element.text = Some(text.into());
        element
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Sets an attribute, replacing the value of an existing one in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(existing, _)| *existing == name) {
            Some(attribute) => attribute.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Appends `child` and returns a handle to it.
    pub fn add_child(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    fn write(&self, output: &mut String) {
        output.push('<');
        output.push_str(&self.name);
        for (name, value) in &self.attributes {
            output.push_str(&format!(" {}=\"{}\"", name, escape_xml(value)));
        }

        if self.text.is_none() && self.children.is_empty() {
            output.push_str("/>");
            return;
        }

        output.push('>');
        if let Some(text) = &self.text {
            output.push_str(&escape_xml(text));
        }
        for child in &self.children {
            child.write(output);
        }
        output.push_str(&format!("</{}>", self.name));
    }
}

impl Display for XmlElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut output = String::new();
        self.write(&mut output);
        write!(f, "{}", output)
    }
}

/// A document with a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        XmlDocument { root }
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// Imports a fragment as the last child of the root, keeping the
    /// fragment's own structure unchanged.
    pub fn import(&mut self, fragment: XmlElement) {
        self.root.add_child(fragment);
    }
}

impl Display for XmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", DECLARATION, self.root)
    }
}

/// Escape XML special characters
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_element_self_closes() {
        let mut element = XmlElement::new("file");
        element.set_attribute("path", "a.php");
        element.set_attribute("hash", "1");

        assert_eq!(element.to_string(), r#"<file path="a.php" hash="1"/>"#);
    }

    #[test]
    fn test_nested_elements_with_text() {
        let mut class = XmlElement::new("class");
        class.set_attribute("line", "3");
        class.add_child(XmlElement::with_text("name", "Foo"));
        class.add_child(XmlElement::with_text("extends", ""));

        assert_eq!(
            class.to_string(),
            r#"<class line="3"><name>Foo</name><extends></extends></class>"#
        );
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut element = XmlElement::new("tag");
        element.set_attribute("name", "a");
        element.set_attribute("description", "b");
        element.set_attribute("name", "c");

        assert_eq!(element.attribute("name"), Some("c"));
        assert_eq!(element.attributes()[0].0, "name");
    }

    #[test]
    fn test_xml_escaping() {
        let mut element = XmlElement::with_text("value", "a < b && \"c\"");
        element.set_attribute("name", "it's");

        assert_eq!(
            element.to_string(),
            "<value name=\"it&apos;s\">a &lt; b &amp;&amp; &quot;c&quot;</value>"
        );
    }

    #[test]
    fn test_document_import_keeps_fragment() {
        let mut fragment = XmlElement::new("function");
        fragment.add_child(XmlElement::with_text("name", "f"));

        let mut document = XmlDocument::new(XmlElement::new("file"));
        document.import(fragment.clone());

        assert_eq!(document.root().child("function"), Some(&fragment));
        assert_eq!(
            document.to_string(),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<file><function><name>f</name></function></file>"
        );
    }
}
