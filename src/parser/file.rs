//! The file-level reflector.
//!
//! A [`SourceFile`] owns one PHP file's text. [`SourceFile::process`] runs a
//! single forward pass over its tokens, dispatching namespace, use and
//! element keywords to their handlers, and [`SourceFile::serialize`] turns
//! what was collected into an XML document.

use std::{path::Path, rc::Rc, time::Instant};

use tracing::{debug, error, instrument, warn};

use crate::{
    ast::{
        docblock::DocBlock,
        elements::{
            ClassElement, ConstantElement, Element, FunctionElement, IncludeElement,
            InterfaceElement,
        },
    },
    errors::errors::{Diagnostic, Error, Severity},
    lexer::{lexer::tokenize, tokens::TokenKind},
    loader::{FileOptions, FsLoader, PhpLint, SourceLoader, Validator},
    xml::document::{XmlDocument, XmlElement},
    Position,
};

use super::{
    elements::{
        parse_class, parse_constant, parse_function, parse_include, parse_interface,
        skip_declaration,
    },
    lookups::file_handler,
    markers::{scan_markers, Marker, DEFAULT_MARKERS},
    stream::TokenStream,
};

/// How far past the cursor the file-level docblock is looked for.
const FILE_DOC_BLOCK_LOOKAHEAD: usize = 10;
/// How many tokens a namespace name segment may be away from the last one.
const NAMESPACE_SEGMENT_LOOKAHEAD: usize = 5;
const DEFAULT_NAMESPACE: &str = "default";

pub struct SourceFile {
    path: String,
    hash: String,
    contents: String,
    tokens: Option<TokenStream>,
    processed: bool,

    active_namespace: String,
    /// Alias to fully qualified path, in first-seen order.
    namespace_aliases: Vec<(String, String)>,

    interfaces: Vec<InterfaceElement>,
    classes: Vec<ClassElement>,
    functions: Vec<FunctionElement>,
    constants: Vec<ConstantElement>,
    includes: Vec<IncludeElement>,

    marker_terms: Vec<String>,
    markers: Vec<Marker>,
    doc_block: Option<DocBlock>,
    diagnostics: Vec<Diagnostic>,
}

impl SourceFile {
    /// Creates a file from text that is already in memory.
    pub fn from_source(
        path: impl Into<String>,
        hash: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        SourceFile {
            path: path.into(),
            hash: hash.into(),
            contents: contents.into(),
            tokens: None,
            processed: false,
            active_namespace: DEFAULT_NAMESPACE.to_string(),
            namespace_aliases: vec![],
            interfaces: vec![],
            classes: vec![],
            functions: vec![],
            constants: vec![],
            includes: vec![],
            marker_terms: DEFAULT_MARKERS.iter().map(|term| term.to_string()).collect(),
            markers: vec![],
            doc_block: None,
            diagnostics: vec![],
        }
    }

    /// Reads a file from disk, validating it with `php -l` first when
    /// `options.validate` is set.
    pub fn from_path(path: &Path, options: &FileOptions) -> Result<Self, Error> {
        Self::load(path, options, &FsLoader, &PhpLint::default())
    }

    pub fn load(
        path: &Path,
        options: &FileOptions,
        loader: &impl SourceLoader,
        validator: &impl Validator,
    ) -> Result<Self, Error> {
        let source = loader.load(path)?;
        if options.validate {
            validator.validate(path)?;
        }

        let mut file = SourceFile::from_source(source.path, source.hash, source.contents);
        file.set_markers(options.markers.clone());
        Ok(file)
    }

    /// Adds a marker term. Only effective before [`process`](Self::process).
    pub fn add_marker(&mut self, term: impl Into<String>) {
        let term = term.into();
        if !self.marker_terms.contains(&term) {
            self.marker_terms.push(term);
        }
    }

    /// Replaces the marker terms. Only effective before [`process`](Self::process).
    pub fn set_markers(&mut self, terms: Vec<String>) {
        self.marker_terms = terms;
    }

    /// Tokenizes the contents; does nothing when tokens already exist or the
    /// file was processed.
    fn initialize_tokens(&mut self) -> Result<(), Error> {
        if self.tokens.is_some() || self.processed {
            return Ok(());
        }

        let start = Instant::now();
        let tokens = tokenize(&self.contents, Some(self.path.clone()))?;
        debug!("tokenized {} into {} tokens in {:?}", self.path, tokens.len(), start.elapsed());

        self.tokens = Some(TokenStream::new(tokens, Rc::new(self.path.clone())));
        Ok(())
    }

    /// Runs the token pass once. Later calls return immediately and leave
    /// every collection untouched.
    #[instrument(skip_all, fields(path = %self.path))]
    pub fn process(&mut self) -> Result<(), Error> {
        if self.processed {
            return Ok(());
        }

        self.initialize_tokens()?;
        let Some(mut tokens) = self.tokens.take() else {
            return Ok(());
        };
        self.processed = true;

        self.process_generic_information(&tokens);
        self.process_tokens(&mut tokens)
    }

    fn process_generic_information(&mut self, tokens: &TokenStream) {
        self.doc_block = self.find_file_doc_block(tokens);
        self.markers = scan_markers(&self.contents, &self.marker_terms);
    }

    fn process_tokens(&mut self, tokens: &mut TokenStream) -> Result<(), Error> {
        let start = Instant::now();

        while let Some(token) = tokens.current() {
            match token.kind.and_then(file_handler) {
                Some(handler) => {
                    let before = tokens.key();
                    handler(self, tokens)?;
                    debug_assert!(tokens.key() > before, "handler did not consume its token");

                    for failure in tokens.take_failures() {
                        self.diagnose(Severity::Critical, failure.to_string(), failure.get_position().0);
                    }
                }
                None => {
                    tokens.advance();
                }
            }
        }

        debug!("processed {} tokens in {:?}", tokens.len(), start.elapsed());
        Ok(())
    }

    /// Looks for the docblock describing the file as a whole.
    ///
    /// Only the first docblock within reach of the start of the file counts,
    /// and only when it carries a `@package` tag and does not sit directly in
    /// front of a class.
    fn find_file_doc_block(&mut self, tokens: &TokenStream) -> Option<DocBlock> {
        let mut result = None;

        let found = tokens.find_next_offset_by_type(
            TokenKind::DocComment,
            FILE_DOC_BLOCK_LOOKAHEAD,
            &[TokenKind::Class, TokenKind::Namespace],
        );

        if let Some(offset) = found {
            let documents_class = (offset + 1..)
                .map_while(|next| tokens.peek(next))
                .find(|token| {
                    !token.is_trivia()
                        && !token.is_one_of_many(&[TokenKind::Abstract, TokenKind::Final, TokenKind::Readonly])
                })
                .is_some_and(|token| token.is(TokenKind::Class));

            if let Some(token) = tokens.peek(offset).filter(|_| !documents_class) {
                let position = Position(token.line, Rc::new(self.path.clone()));
                match DocBlock::parse(&token.value, position) {
                    Ok(doc_block) => result = Some(doc_block),
                    Err(err) => self.diagnose(Severity::Critical, err.to_string(), token.line),
                }
            }
        }

        let result = result.filter(|doc_block| doc_block.has_tag("package"));
        if result.is_none() {
            let message = format!("No Page-level DocBlock was found for {}", self.path);
            self.diagnose(Severity::Error, message, 0);
        }

        result
    }

    fn diagnose(&mut self, severity: Severity, message: String, line: u32) {
        match severity {
            Severity::Critical | Severity::Error => error!("{}", message),
            Severity::Warning => warn!("{}", message),
        }
        self.diagnostics.push(Diagnostic::new(severity, message, line));
    }

    /// Records `alias -> path`, replacing an earlier alias of the same name.
    fn add_namespace_alias(&mut self, alias: &str, path: &str) {
        match self.namespace_aliases.iter_mut().find(|(name, _)| name == alias) {
            Some(existing) => existing.1 = path.to_string(),
            None => self.namespace_aliases.push((alias.to_string(), path.to_string())),
        }
    }

    /// Builds the document: file docblock, markers, aliases, then includes,
    /// constants, functions, interfaces and classes.
    pub fn to_xml(&self) -> XmlDocument {
        let mut root = XmlElement::new("file");
        root.set_attribute("path", self.path.trim_start_matches(['.', '/']));
        root.set_attribute("hash", self.hash.as_str());

        if let Some(doc_block) = &self.doc_block {
            root.add_child(doc_block.to_xml());
        }

        if !self.markers.is_empty() {
            let mut markers = XmlElement::new("markers");
            for marker in &self.markers {
                markers.add_child(marker.to_xml());
            }
            root.add_child(markers);
        }

        for (alias, path) in &self.namespace_aliases {
            let element = root.add_child(XmlElement::with_text("namespace-alias", path.as_str()));
            element.set_attribute("name", alias.as_str());
        }

        let mut document = XmlDocument::new(root);
        for include in &self.includes {
            document.import(include.to_xml());
        }
        for constant in &self.constants {
            document.import(constant.to_xml());
        }
        for function in &self.functions {
            document.import(function.to_xml());
        }
        for interface in &self.interfaces {
            document.import(interface.to_xml());
        }
        for class in &self.classes {
            document.import(class.to_xml());
        }

        document
    }

    /// The serialized document, trimmed.
    pub fn serialize(&self) -> String {
        self.to_xml().to_string().trim().to_string()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    /// The namespace in effect at the end of the pass.
    pub fn active_namespace(&self) -> &str {
        &self.active_namespace
    }

    pub fn namespace_aliases(&self) -> &[(String, String)] {
        &self.namespace_aliases
    }

    pub fn namespace_alias(&self, alias: &str) -> Option<&str> {
        self.namespace_aliases
            .iter()
            .find(|(name, _)| name == alias)
            .map(|(_, path)| path.as_str())
    }

    pub fn marker_terms(&self) -> &[String] {
        &self.marker_terms
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn doc_block(&self) -> Option<&DocBlock> {
        self.doc_block.as_ref()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn interfaces(&self) -> &[InterfaceElement] {
        &self.interfaces
    }

    pub fn classes(&self) -> &[ClassElement] {
        &self.classes
    }

    pub fn functions(&self) -> &[FunctionElement] {
        &self.functions
    }

    pub fn constants(&self) -> &[ConstantElement] {
        &self.constants
    }

    pub fn includes(&self) -> &[IncludeElement] {
        &self.includes
    }

    pub fn get_class(&self, name: &str) -> Option<&ClassElement> {
        self.classes.iter().find(|class| class.name == name)
    }

    pub fn get_interface(&self, name: &str) -> Option<&InterfaceElement> {
        self.interfaces.iter().find(|interface| interface.name == name)
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionElement> {
        self.functions.iter().find(|function| function.name == name)
    }

    pub fn get_constant(&self, name: &str) -> Option<&ConstantElement> {
        self.constants.iter().find(|constant| constant.name == name)
    }
}

/// Stores `element`, replacing an earlier element of the same name in place.
fn register<T: Element>(collection: &mut Vec<T>, element: T) {
    match collection
        .iter_mut()
        .find(|existing| existing.get_name() == element.get_name())
    {
        Some(existing) => *existing = element,
        None => collection.push(element),
    }
}

/// `namespace Foo\Bar;` and `namespace Foo\Bar { ... }`
///
/// Leaves the cursor on the terminating `;` or `{`.
pub fn process_namespace(file: &mut SourceFile, tokens: &mut TokenStream) -> Result<(), Error> {
    let mut segments = vec![];
    while let Some(token) = tokens.goto_next_by_type(
        TokenKind::String,
        NAMESPACE_SEGMENT_LOOKAHEAD,
        &[";", "{"],
    ) {
        segments.push(token.value.clone());
    }

    file.active_namespace = segments.join("\\");
    debug!("entered namespace {:?}", file.active_namespace);
    Ok(())
}

/// `use Foo\Bar;`, `use Foo\Bar as Baz;` and `use A\B, C\D as E;`
pub fn process_use(file: &mut SourceFile, tokens: &mut TokenStream) -> Result<(), Error> {
    let mut clauses = vec![String::new()];

    while let Some(token) = tokens.advance() {
        if token.value == ";" {
            break;
        }
        if token.is_punct(",") {
            clauses.push(String::new());
        } else if let Some(clause) = clauses.last_mut() {
            clause.push_str(&token.value);
        }
    }
    // past the `;`
    tokens.advance();

    for clause in &clauses {
        let parts: Vec<&str> = clause.trim().split(' ').map(str::trim).collect();
        let path = parts[0];
        if path.is_empty() {
            continue;
        }

        let alias = match parts.as_slice() {
            [single] => single.rsplit('\\').next().unwrap_or(*single),
            [.., last] => *last,
            [] => continue,
        };
        file.add_namespace_alias(alias, path);
    }

    Ok(())
}

pub fn process_interface(file: &mut SourceFile, tokens: &mut TokenStream) -> Result<(), Error> {
    let start = Instant::now();
    let interface = parse_interface(tokens, &file.active_namespace)?;
    debug!("processed interface {} in {:?}", interface.name, start.elapsed());

    register(&mut file.interfaces, interface);
    Ok(())
}

pub fn process_class(file: &mut SourceFile, tokens: &mut TokenStream) -> Result<(), Error> {
    let start = Instant::now();
    if let Some(class) = parse_class(tokens, &file.active_namespace)? {
        debug!("processed class {} in {:?}", class.name, start.elapsed());
        register(&mut file.classes, class);
    }
    Ok(())
}

pub fn process_function(file: &mut SourceFile, tokens: &mut TokenStream) -> Result<(), Error> {
    let start = Instant::now();
    if let Some(function) = parse_function(tokens, &file.active_namespace)? {
        debug!("processed function {} in {:?}", function.name, start.elapsed());
        register(&mut file.functions, function);
    }
    Ok(())
}

pub fn process_const(file: &mut SourceFile, tokens: &mut TokenStream) -> Result<(), Error> {
    let start = Instant::now();
    for constant in parse_constant(tokens, &file.active_namespace)? {
        debug!("processed constant {} in {:?}", constant.name, start.elapsed());
        register(&mut file.constants, constant);
    }
    Ok(())
}

/// Handles `require`, `require_once`, `include` and `include_once`.
pub fn process_include(file: &mut SourceFile, tokens: &mut TokenStream) -> Result<(), Error> {
    let start = Instant::now();
    let include = parse_include(tokens, &file.active_namespace)?;
    debug!("processed include {} in {:?}", include.name, start.elapsed());

    file.includes.push(include);
    Ok(())
}

/// Traits and enums are stepped over without being reflected.
pub fn process_unreflected(_file: &mut SourceFile, tokens: &mut TokenStream) -> Result<(), Error> {
    if let Some(name) = skip_declaration(tokens)? {
        debug!("skipped declaration {}", name);
    }
    Ok(())
}
