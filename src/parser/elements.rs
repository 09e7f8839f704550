//! Element parsers.
//!
//! Every parser here is entered with the shared cursor on the keyword that
//! triggered it and returns with the cursor one token past the element's
//! lexical end (the closing `}` or `;`), so the caller resumes exactly there.

use crate::{
    ast::{
        docblock::DocBlock,
        elements::{
            ArgumentElement, ClassElement, ConstantElement, FunctionElement, IncludeElement,
            IncludeType, InterfaceElement, Members, MethodElement, Modifiers, PropertyElement,
            Visibility,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::stream::TokenStream;

const DOC_BLOCK_LOOKBEHIND: usize = 10;
const DECLARATION_BOUNDARIES: [&str; 3] = ["{", "}", ";"];

/// Finds the docblock written in front of the declaration under the cursor.
///
/// A docblock that fails to parse is recorded on the stream and treated as
/// absent.
pub fn find_doc_block(stream: &mut TokenStream) -> Option<DocBlock> {
    let token = stream.find_previous_by_type(
        TokenKind::DocComment,
        DOC_BLOCK_LOOKBEHIND,
        &DECLARATION_BOUNDARIES,
    )?;

    let position = crate::Position(token.line, stream.file().clone());
    match DocBlock::parse(&token.value, position) {
        Ok(doc_block) => Some(doc_block),
        Err(err) => {
            stream.record_failure(err);
            None
        }
    }
}

fn unexpected(stream: &TokenStream, expected: &str) -> Error {
    match stream.current() {
        Some(token) => Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
                expected: expected.to_string(),
            },
            stream.get_position(),
        ),
        None => stream.end_of_stream(expected),
    }
}

fn current_or_end<'a>(stream: &'a TokenStream, expected: &str) -> Result<&'a Token, Error> {
    stream.current().ok_or_else(|| stream.end_of_stream(expected))
}

/// Identifiers and keywords used as names (`function list()` is legal).
fn is_name(token: &Token) -> bool {
    token.kind.is_some() && token.value.starts_with(|c: char| c.is_alphabetic() || c == '_')
}

/// Punctuation allowed in a type declaration (`?Foo`, `A|B`, `(A&B)|null`).
fn is_type_part(token: &Token) -> bool {
    token.is(TokenKind::NsSeparator) || ["?", "|", "&", "(", ")"].iter().any(|punct| token.is_punct(punct))
}

/// Collects a possibly qualified name (`Foo\Bar`) starting at the cursor.
fn parse_name(stream: &mut TokenStream, expected: &str) -> Result<String, Error> {
    let mut name = String::new();

    while let Some(token) = stream.current() {
        if token.is_one_of_many(&[TokenKind::String, TokenKind::NsSeparator]) {
            name.push_str(&token.value);
            stream.advance();
        } else {
            break;
        }
    }
    stream.skip_trivia();

    if name.is_empty() {
        return Err(unexpected(stream, expected));
    }
    Ok(name)
}

/// Collects raw token text until punctuation in `stops` is reached at
/// nesting depth zero, or a close tag. The stop token is not consumed.
fn collect_until(stream: &mut TokenStream, stops: &[&str]) -> Result<String, Error> {
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        let token = current_or_end(stream, &format!("one of {:?}", stops))?;

        if token.is(TokenKind::CloseTag) {
            break;
        }
        if token.kind.is_none() {
            if depth == 0 && stops.contains(&token.value.as_str()) {
                break;
            }
            match token.value.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ => {}
            }
        }

        text.push_str(&token.value);
        stream.advance();
    }

    Ok(text)
}

/// With the cursor on `(`, moves it one past the matching `)`.
fn skip_parentheses(stream: &mut TokenStream) -> Result<(), Error> {
    stream.advance();
    collect_until(stream, &[")"])?;
    stream.expect_punct(")")
}

/// Parses `require`, `require_once`, `include` and `include_once`.
pub fn parse_include(stream: &mut TokenStream, namespace: &str) -> Result<IncludeElement, Error> {
    let token = current_or_end(stream, "include")?;
    let line = token.line;
    let include_type = match token.kind {
        Some(TokenKind::Require) => IncludeType::Require,
        Some(TokenKind::RequireOnce) => IncludeType::RequireOnce,
        Some(TokenKind::IncludeOnce) => IncludeType::IncludeOnce,
        _ => IncludeType::Include,
    };
    let doc_block = find_doc_block(stream);

    stream.advance();
    let expression = collect_until(stream, &[";"])?;
    if stream.current().is_some_and(|token| token.is_punct(";")) {
        stream.advance();
    }

    Ok(IncludeElement {
        name: include_name(&expression),
        include_type,
        namespace: namespace.to_string(),
        line,
        doc_block,
    })
}

/// `('file.php')` and `"file.php"` both name `file.php`; anything more
/// complex is kept verbatim.
fn include_name(expression: &str) -> String {
    let mut name = expression.trim();
    if let Some(inner) = name.strip_prefix('(').and_then(|inner| inner.strip_suffix(')')) {
        name = inner.trim();
    }

    let quoted = ['\'', '"'].iter().find_map(|quote| {
        name.strip_prefix(*quote)
            .and_then(|inner| inner.strip_suffix(*quote))
            .filter(|inner| !inner.contains(*quote))
    });

    quoted.unwrap_or(name).to_string()
}

/// Parses a top-level `const` statement.
pub fn parse_constant(stream: &mut TokenStream, namespace: &str) -> Result<Vec<ConstantElement>, Error> {
    let doc_block = find_doc_block(stream);
    parse_constant_declaration(stream, namespace, doc_block)
}

/// Parses `const A = 1, B = 2;` into one element per name.
fn parse_constant_declaration(
    stream: &mut TokenStream,
    namespace: &str,
    doc_block: Option<DocBlock>,
) -> Result<Vec<ConstantElement>, Error> {
    let mut constants = vec![];

    loop {
        stream.next_significant();

        // the name is the last one before `=`; anything ahead of it is a type
        let mut declared = None;
        loop {
            let token = current_or_end(stream, "constant name")?;
            if token.is_punct("=") {
                break;
            }
            if is_name(token) {
                declared = Some((token.value.clone(), token.line));
            } else if !is_type_part(token) {
                return Err(unexpected(stream, "constant name"));
            }
            stream.next_significant();
        }
        let Some((name, line)) = declared else {
            return Err(unexpected(stream, "constant name"));
        };

        stream.expect_punct("=")?;
        let value = collect_until(stream, &[",", ";"])?;

        constants.push(ConstantElement {
            name,
            value: value.trim().to_string(),
            namespace: namespace.to_string(),
            line,
            doc_block: doc_block.clone(),
        });

        let separator = current_or_end(stream, "`;`")?;
        if separator.is_punct(",") {
            continue;
        }
        if separator.is_punct(";") {
            stream.advance();
        }
        return Ok(constants);
    }
}

/// Parses a top-level `function`; closures yield `None`.
pub fn parse_function(stream: &mut TokenStream, namespace: &str) -> Result<Option<FunctionElement>, Error> {
    let doc_block = find_doc_block(stream);
    parse_function_declaration(stream, namespace, doc_block)
}

fn parse_function_declaration(
    stream: &mut TokenStream,
    namespace: &str,
    doc_block: Option<DocBlock>,
) -> Result<Option<FunctionElement>, Error> {
    let line = current_or_end(stream, "function")?.line;
    let mut by_reference = false;

    stream.next_significant();
    if current_or_end(stream, "function name")?.is_punct("&") {
        by_reference = true;
        stream.next_significant();
    }

    let token = current_or_end(stream, "function name")?;
    let name = if token.is_punct("(") {
        None
    } else if is_name(token) {
        let name = token.value.clone();
        stream.next_significant();
        Some(name)
    } else {
        return Err(unexpected(stream, "function name"));
    };

    if !stream.current().is_some_and(|token| token.is_punct("(")) {
        return Err(unexpected(stream, "`(`"));
    }
    let arguments = parse_arguments(stream)?;
    stream.skip_trivia();

    // closures: function () use ($a) { ... }
    if stream.current_kind() == Some(TokenKind::Use) {
        stream.next_significant();
        if !stream.current().is_some_and(|token| token.is_punct("(")) {
            return Err(unexpected(stream, "`(`"));
        }
        skip_parentheses(stream)?;
        stream.skip_trivia();
    }

    let mut return_type = None;
    if stream.current().is_some_and(|token| token.is_punct(":")) {
        stream.advance();
        return_type = Some(collect_until(stream, &["{", ";"])?.trim().to_string());
    }

    let token = current_or_end(stream, "function body")?;
    if token.is_punct("{") {
        stream.skip_block()?;
    } else if token.is_punct(";") {
        stream.advance();
    } else {
        return Err(unexpected(stream, "function body"));
    }

    Ok(name.map(|name| FunctionElement {
        name,
        arguments,
        return_type,
        by_reference,
        namespace: namespace.to_string(),
        line,
        doc_block,
    }))
}

/// With the cursor on `(`, parses the argument list and moves one past `)`.
fn parse_arguments(stream: &mut TokenStream) -> Result<Vec<ArgumentElement>, Error> {
    let mut arguments = vec![];
    stream.advance();

    loop {
        stream.skip_trivia();
        let token = current_or_end(stream, "`)`")?;
        if token.is_punct(")") {
            stream.advance();
            return Ok(arguments);
        }
        if token.is_punct(",") {
            stream.advance();
            continue;
        }

        arguments.push(parse_argument(stream)?);
    }
}

fn parse_argument(stream: &mut TokenStream) -> Result<ArgumentElement, Error> {
    const PROMOTION: [TokenKind; 5] = [
        TokenKind::Public,
        TokenKind::Protected,
        TokenKind::Private,
        TokenKind::Var,
        TokenKind::Readonly,
    ];

    let mut type_hint = String::new();
    let mut by_reference = false;
    let mut variadic = false;

    let (name, line) = loop {
        let token = current_or_end(stream, "argument name")?;
        match token.kind {
            Some(TokenKind::Variable) => break (token.value.clone(), token.line),
            Some(TokenKind::Ellipsis) => variadic = true,
            Some(kind) if PROMOTION.contains(&kind) || token.is_trivia() || token.is(TokenKind::DocComment) => {}
            None if token.value == "&" => by_reference = true,
            None if token.value == ")" || token.value == "," => {
                return Err(unexpected(stream, "argument name"))
            }
            _ => type_hint.push_str(&token.value),
        }
        stream.advance();
    };
    stream.next_significant();

    let mut default = None;
    if stream.current().is_some_and(|token| token.is_punct("=")) {
        stream.advance();
        default = Some(collect_until(stream, &[",", ")"])?.trim().to_string());
    }

    Ok(ArgumentElement {
        name,
        type_hint: (!type_hint.is_empty()).then_some(type_hint),
        default,
        by_reference,
        variadic,
        line,
    })
}

/// Looks back from the cursor for `abstract`/`final` written in front of a
/// class declaration.
fn class_modifiers(stream: &TokenStream) -> (bool, bool) {
    let is_abstract = stream
        .find_previous_by_type(TokenKind::Abstract, 4, &DECLARATION_BOUNDARIES)
        .is_some();
    let is_final = stream
        .find_previous_by_type(TokenKind::Final, 4, &DECLARATION_BOUNDARIES)
        .is_some();

    (is_abstract, is_final)
}

/// Parses a `class` declaration; anonymous classes yield `None`.
pub fn parse_class(stream: &mut TokenStream, namespace: &str) -> Result<Option<ClassElement>, Error> {
    let line = current_or_end(stream, "class")?.line;
    let doc_block = find_doc_block(stream);
    let (is_abstract, is_final) = class_modifiers(stream);

    stream.next_significant();
    let token = current_or_end(stream, "class name")?;

    // new class(...) extends Foo { ... }
    if !token.is(TokenKind::String) {
        if token.is_punct("(") {
            skip_parentheses(stream)?;
        }
        collect_until(stream, &["{"])?;
        stream.skip_block()?;
        return Ok(None);
    }

    let name = token.value.clone();
    stream.next_significant();

    let mut parent = None;
    if stream.current_kind() == Some(TokenKind::Extends) {
        stream.next_significant();
        parent = Some(parse_name(stream, "parent class name")?);
    }

    let mut interfaces = vec![];
    if stream.current_kind() == Some(TokenKind::Implements) {
        interfaces = parse_name_list(stream, "interface name")?;
    }

    let members = parse_members(stream, namespace)?;

    Ok(Some(ClassElement {
        name,
        parent,
        interfaces,
        is_abstract,
        is_final,
        members,
        namespace: namespace.to_string(),
        line,
        doc_block,
    }))
}

/// Parses an `interface` declaration.
pub fn parse_interface(stream: &mut TokenStream, namespace: &str) -> Result<InterfaceElement, Error> {
    let line = current_or_end(stream, "interface")?.line;
    let doc_block = find_doc_block(stream);

    stream.next_significant();
    let name = match stream.current() {
        Some(token) if token.is(TokenKind::String) => token.value.clone(),
        _ => return Err(unexpected(stream, "interface name")),
    };
    stream.next_significant();

    let mut parents = vec![];
    if stream.current_kind() == Some(TokenKind::Extends) {
        parents = parse_name_list(stream, "parent interface name")?;
    }

    let members = parse_members(stream, namespace)?;

    Ok(InterfaceElement {
        name,
        parents,
        members,
        namespace: namespace.to_string(),
        line,
        doc_block,
    })
}

/// Steps over a `trait` or `enum` declaration, body included, returning its
/// name. A keyword not followed by a name is consumed on its own.
pub fn skip_declaration(stream: &mut TokenStream) -> Result<Option<String>, Error> {
    stream.next_significant();
    let name = match stream.current() {
        Some(token) if token.is(TokenKind::String) => token.value.clone(),
        _ => return Ok(None),
    };

    // enum Suit: string implements HasLabel { ... }
    collect_until(stream, &["{", ";"])?;
    if stream.current().is_some_and(|token| token.is_punct("{")) {
        stream.skip_block()?;
    } else {
        stream.advance();
    }

    Ok(Some(name))
}

/// With the cursor on `extends`/`implements`, parses `A, B\C` up to `{`.
fn parse_name_list(stream: &mut TokenStream, expected: &str) -> Result<Vec<String>, Error> {
    let mut names = vec![];

    loop {
        stream.next_significant();
        names.push(parse_name(stream, expected)?);

        if !stream.current().is_some_and(|token| token.is_punct(",")) {
            return Ok(names);
        }
    }
}

/// With the cursor on the `{` opening a class or interface body, parses
/// every member and moves one past the closing `}`.
fn parse_members(stream: &mut TokenStream, namespace: &str) -> Result<Members, Error> {
    stream.expect_punct("{")?;
    let mut members = Members::default();

    loop {
        stream.skip_trivia();
        let token = current_or_end(stream, "`}`")?;

        if token.is_punct("}") {
            stream.advance();
            return Ok(members);
        }

        let kind = token.kind;
        match kind {
            Some(
                TokenKind::Public
                | TokenKind::Protected
                | TokenKind::Private
                | TokenKind::Static
                | TokenKind::Abstract
                | TokenKind::Final
                | TokenKind::Var
                | TokenKind::Readonly
                | TokenKind::Function
                | TokenKind::Const
                | TokenKind::Variable,
            ) => parse_member(stream, namespace, &mut members)?,
            // trait imports, with or without an adaptation block
            Some(TokenKind::Use) => {
                collect_until(stream, &[";", "{"])?;
                if stream.current().is_some_and(|token| token.is_punct("{")) {
                    stream.skip_block()?;
                } else {
                    stream.advance();
                }
            }
            _ => {
                stream.advance();
            }
        }
    }
}

fn parse_member(stream: &mut TokenStream, namespace: &str, members: &mut Members) -> Result<(), Error> {
    let doc_block = find_doc_block(stream);
    let mut modifiers = Modifiers::default();

    loop {
        match stream.current_kind() {
            Some(TokenKind::Public | TokenKind::Var) => modifiers.visibility = Visibility::Public,
            Some(TokenKind::Protected) => modifiers.visibility = Visibility::Protected,
            Some(TokenKind::Private) => modifiers.visibility = Visibility::Private,
            Some(TokenKind::Static) => modifiers.is_static = true,
            Some(TokenKind::Abstract) => modifiers.is_abstract = true,
            Some(TokenKind::Final) => modifiers.is_final = true,
            Some(TokenKind::Readonly) => {}
            _ => break,
        }
        stream.next_significant();
    }

    match stream.current_kind() {
        Some(TokenKind::Function) => {
            if let Some(function) = parse_function_declaration(stream, namespace, doc_block)? {
                members.methods.push(MethodElement { function, modifiers });
            }
        }
        Some(TokenKind::Const) => {
            members
                .constants
                .extend(parse_constant_declaration(stream, namespace, doc_block)?);
        }
        _ => {
            let properties = parse_properties(stream, namespace, modifiers, doc_block)?;
            members.properties.extend(properties);
        }
    }

    Ok(())
}

/// Parses `[type] $a [= 1], $b;` with the cursor past the modifiers.
fn parse_properties(
    stream: &mut TokenStream,
    namespace: &str,
    modifiers: Modifiers,
    doc_block: Option<DocBlock>,
) -> Result<Vec<PropertyElement>, Error> {
    let mut properties = vec![];

    loop {
        let token = current_or_end(stream, "property name")?;
        if token.is_punct(";") {
            stream.advance();
            return Ok(properties);
        }
        if !token.is(TokenKind::Variable) {
            // type declarations and separators
            stream.advance();
            continue;
        }

        let name = token.value.clone();
        let line = token.line;
        stream.next_significant();

        let mut default = None;
        if stream.current().is_some_and(|token| token.is_punct("=")) {
            stream.advance();
            default = Some(collect_until(stream, &[",", ";"])?.trim().to_string());
        }

        properties.push(PropertyElement {
            name,
            default,
            modifiers,
            namespace: namespace.to_string(),
            line,
            doc_block: doc_block.clone(),
        });
    }
}
