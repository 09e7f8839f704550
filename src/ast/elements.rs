use std::fmt::Display;

use crate::xml::document::XmlElement;

use super::docblock::DocBlock;

/// Element Trait
///
/// Defines the behavior shared by everything a file parser discovers.
pub trait Element {
    /// Returns the name the element is registered under.
    fn get_name(&self) -> &str;
    /// Returns the line the element's declaration starts on.
    fn get_line(&self) -> u32;
    /// Returns the docblock documenting the element, if any.
    fn get_doc_block(&self) -> Option<&DocBlock>;
    /// Serializes the element into a standalone fragment.
    fn to_xml(&self) -> XmlElement;
}

/// Adds the children every documented element carries.
fn add_doc_block(element: &mut XmlElement, doc_block: Option<&DocBlock>) {
    if let Some(doc_block) = doc_block {
        element.add_child(doc_block.to_xml());
    }
}

fn located(name: &str, namespace: &str, line: u32) -> XmlElement {
    let mut element = XmlElement::new(name);
    element.set_attribute("namespace", namespace);
    element.set_attribute("line", line.to_string());
    element
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeType {
    Require,
    RequireOnce,
    Include,
    IncludeOnce,
}

impl Display for IncludeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncludeType::Require => write!(f, "Require"),
            IncludeType::RequireOnce => write!(f, "Require Once"),
            IncludeType::Include => write!(f, "Include"),
            IncludeType::IncludeOnce => write!(f, "Include Once"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeElement {
    pub name: String,
    pub include_type: IncludeType,
    pub namespace: String,
    pub line: u32,
    pub doc_block: Option<DocBlock>,
}

impl Element for IncludeElement {
    fn get_name(&self) -> &str {
        &self.name
    }
    fn get_line(&self) -> u32 {
        self.line
    }
    fn get_doc_block(&self) -> Option<&DocBlock> {
        self.doc_block.as_ref()
    }
    fn to_xml(&self) -> XmlElement {
        let mut include = located("include", &self.namespace, self.line);
        include.set_attribute("type", self.include_type.to_string());
        include.add_child(XmlElement::with_text("name", self.name.as_str()));
        add_doc_block(&mut include, self.get_doc_block());
        include
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantElement {
    pub name: String,
    pub value: String,
    pub namespace: String,
    pub line: u32,
    pub doc_block: Option<DocBlock>,
}

impl Element for ConstantElement {
    fn get_name(&self) -> &str {
        &self.name
    }
    fn get_line(&self) -> u32 {
        self.line
    }
    fn get_doc_block(&self) -> Option<&DocBlock> {
        self.doc_block.as_ref()
    }
    fn to_xml(&self) -> XmlElement {
        let mut constant = located("constant", &self.namespace, self.line);
        constant.add_child(XmlElement::with_text("name", self.name.as_str()));
        constant.add_child(XmlElement::with_text("value", self.value.as_str()));
        add_doc_block(&mut constant, self.get_doc_block());
        constant
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentElement {
    /// Variable name including the leading `$`.
    pub name: String,
    pub type_hint: Option<String>,
    pub default: Option<String>,
    pub by_reference: bool,
    pub variadic: bool,
    pub line: u32,
}

impl ArgumentElement {
    pub fn to_xml(&self) -> XmlElement {
        let mut argument = XmlElement::new("argument");
        argument.set_attribute("line", self.line.to_string());
        if self.by_reference {
            argument.set_attribute("by_reference", "true");
        }
        if self.variadic {
            argument.set_attribute("variadic", "true");
        }
        argument.add_child(XmlElement::with_text("name", self.name.as_str()));
        argument.add_child(XmlElement::with_text("default", self.default.as_deref().unwrap_or_default()));
        argument.add_child(XmlElement::with_text("type", self.type_hint.as_deref().unwrap_or_default()));
        argument
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// Modifiers written in front of a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_static: bool,
    pub visibility: Visibility,
}

impl Modifiers {
    fn apply_to(&self, element: &mut XmlElement) {
        element.set_attribute("final", self.is_final.to_string());
        element.set_attribute("abstract", self.is_abstract.to_string());
        element.set_attribute("static", self.is_static.to_string());
        element.set_attribute("visibility", self.visibility.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionElement {
    pub name: String,
    pub arguments: Vec<ArgumentElement>,
    pub return_type: Option<String>,
    pub by_reference: bool,
    pub namespace: String,
    pub line: u32,
    pub doc_block: Option<DocBlock>,
}

impl FunctionElement {
    fn to_xml_named(&self, tag: &str) -> XmlElement {
        let mut function = located(tag, &self.namespace, self.line);
        function.add_child(XmlElement::with_text("name", self.name.as_str()));
        if let Some(return_type) = &self.return_type {
            function.add_child(XmlElement::with_text("type", return_type.as_str()));
        }
        for argument in &self.arguments {
            function.add_child(argument.to_xml());
        }
        add_doc_block(&mut function, self.get_doc_block());
        function
    }
}

impl Element for FunctionElement {
    fn get_name(&self) -> &str {
        &self.name
    }
    fn get_line(&self) -> u32 {
        self.line
    }
    fn get_doc_block(&self) -> Option<&DocBlock> {
        self.doc_block.as_ref()
    }
    fn to_xml(&self) -> XmlElement {
        self.to_xml_named("function")
    }
}

/// A function declared inside a class or interface body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodElement {
    pub function: FunctionElement,
    pub modifiers: Modifiers,
}

impl Element for MethodElement {
    fn get_name(&self) -> &str {
        &self.function.name
    }
    fn get_line(&self) -> u32 {
        self.function.line
    }
    fn get_doc_block(&self) -> Option<&DocBlock> {
        self.function.doc_block.as_ref()
    }
    fn to_xml(&self) -> XmlElement {
        let mut method = self.function.to_xml_named("method");
        self.modifiers.apply_to(&mut method);
        method
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyElement {
    /// Variable name including the leading `$`.
    pub name: String,
    pub default: Option<String>,
    pub modifiers: Modifiers,
    pub namespace: String,
    pub line: u32,
    pub doc_block: Option<DocBlock>,
}

impl Element for PropertyElement {
    fn get_name(&self) -> &str {
        &self.name
    }
    fn get_line(&self) -> u32 {
        self.line
    }
    fn get_doc_block(&self) -> Option<&DocBlock> {
        self.doc_block.as_ref()
    }
    fn to_xml(&self) -> XmlElement {
        let mut property = located("property", &self.namespace, self.line);
        self.modifiers.apply_to(&mut property);
        property.add_child(XmlElement::with_text("name", self.name.as_str()));
        property.add_child(XmlElement::with_text("default", self.default.as_deref().unwrap_or_default()));
        add_doc_block(&mut property, self.get_doc_block());
        property
    }
}

/// Members shared by class and interface bodies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Members {
    pub constants: Vec<ConstantElement>,
    pub properties: Vec<PropertyElement>,
    pub methods: Vec<MethodElement>,
}

impl Members {
    fn append_to(&self, element: &mut XmlElement) {
        for constant in &self.constants {
            element.add_child(constant.to_xml());
        }
        for property in &self.properties {
            element.add_child(property.to_xml());
        }
        for method in &self.methods {
            element.add_child(method.to_xml());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassElement {
    pub name: String,
    pub parent: Option<String>,
    pub interfaces: Vec<String>,
    pub is_abstract: bool,
    pub is_final: bool,
    pub members: Members,
    pub namespace: String,
    pub line: u32,
    pub doc_block: Option<DocBlock>,
}

impl Element for ClassElement {
    fn get_name(&self) -> &str {
        &self.name
    }
    fn get_line(&self) -> u32 {
        self.line
    }
    fn get_doc_block(&self) -> Option<&DocBlock> {
        self.doc_block.as_ref()
    }
    fn to_xml(&self) -> XmlElement {
        let mut class = XmlElement::new("class");
        class.set_attribute("final", self.is_final.to_string());
        class.set_attribute("abstract", self.is_abstract.to_string());
        class.set_attribute("namespace", self.namespace.as_str());
        class.set_attribute("line", self.line.to_string());
        class.add_child(XmlElement::with_text("name", self.name.as_str()));
        class.add_child(XmlElement::with_text("extends", self.parent.as_deref().unwrap_or_default()));
        for interface in &self.interfaces {
            class.add_child(XmlElement::with_text("implements", interface.as_str()));
        }
        add_doc_block(&mut class, self.get_doc_block());
        self.members.append_to(&mut class);
        class
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceElement {
    pub name: String,
    pub parents: Vec<String>,
    pub members: Members,
    pub namespace: String,
    pub line: u32,
    pub doc_block: Option<DocBlock>,
}

impl Element for InterfaceElement {
    fn get_name(&self) -> &str {
        &self.name
    }
    fn get_line(&self) -> u32 {
        self.line
    }
    fn get_doc_block(&self) -> Option<&DocBlock> {
        self.doc_block.as_ref()
    }
    fn to_xml(&self) -> XmlElement {
        let mut interface = located("interface", &self.namespace, self.line);
        interface.add_child(XmlElement::with_text("name", self.name.as_str()));
        for parent in &self.parents {
            interface.add_child(XmlElement::with_text("extends", parent.as_str()));
        }
        add_doc_block(&mut interface, self.get_doc_block());
        self.members.append_to(&mut interface);
        interface
    }
}
