use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

lazy_static! {
    /// Keywords, looked up by their lowercased spelling.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("namespace", TokenKind::Namespace);
        map.insert("use", TokenKind::Use);
        map.insert("class", TokenKind::Class);
        map.insert("interface", TokenKind::Interface);
        map.insert("trait", TokenKind::Trait);
        map.insert("enum", TokenKind::Enum);
        map.insert("function", TokenKind::Function);
        map.insert("const", TokenKind::Const);
        map.insert("require", TokenKind::Require);
        map.insert("require_once", TokenKind::RequireOnce);
        map.insert("include", TokenKind::Include);
        map.insert("include_once", TokenKind::IncludeOnce);
        map.insert("extends", TokenKind::Extends);
        map.insert("implements", TokenKind::Implements);
        map.insert("abstract", TokenKind::Abstract);
        map.insert("final", TokenKind::Final);
        map.insert("static", TokenKind::Static);
        map.insert("public", TokenKind::Public);
        map.insert("protected", TokenKind::Protected);
        map.insert("private", TokenKind::Private);
        map.insert("var", TokenKind::Var);
        map.insert("readonly", TokenKind::Readonly);
        map.insert("as", TokenKind::As);
        map.insert("new", TokenKind::New);
        map.insert("return", TokenKind::Return);
        map.insert("array", TokenKind::Array);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    InlineHtml,
    OpenTag,
    OpenTagWithEcho,
    CloseTag,
    Whitespace,
    Comment,
    DocComment,

    Variable,
    /// Identifiers: names of classes, functions, constants and namespace parts.
    String,
    NsSeparator,
    ConstantEncapsedString,
    LNumber,
    DNumber,

    DoubleArrow,    // =>
    ObjectOperator, // ->
    DoubleColon,    // ::
    IsIdentical,    // ===
    IsNotIdentical, // !==
    IsEqual,        // ==
    IsNotEqual,     // !=
    IsSmallerOrEqual,
    IsGreaterOrEqual,
    BooleanAnd,
    BooleanOr,
    Inc,
    Dec,
    AssignOp, // += -= *= /= .= %= &= |= ^=
    Ellipsis,
    /// Remaining multi-character operators (`<<`, `??`, `**`, `<=>`, ...).
    Operator,

    // Reserved
    Namespace,
    Use,
    Class,
    Interface,
    Trait,
    Enum,
    Function,
    Const,
    Require,
    RequireOnce,
    Include,
    IncludeOnce,
    Extends,
    Implements,
    Abstract,
    Final,
    Static,
    Public,
    Protected,
    Private,
    Var,
    Readonly,
    As,
    New,
    Return,
    Array,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One lexical unit.
///
/// Single-character punctuation carries no kind and is compared by its
/// `value` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: Option<TokenKind>,
    pub value: String,
    pub line: u32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{} ({:?}) on line {}", kind, self.value, self.line),
            None => write!(f, "{:?} on line {}", self.value, self.line),
        }
    }
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == Some(kind)
    }

    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        self.kind.is_some_and(|kind| kinds.contains(&kind))
    }

    /// Whether this is the untyped punctuation token `content`.
    pub fn is_punct(&self, content: &str) -> bool {
        self.kind.is_none() && self.value == content
    }

    /// Whitespace and non-documentation comments carry no structure.
    pub fn is_trivia(&self) -> bool {
        self.is_one_of_many(&[TokenKind::Whitespace, TokenKind::Comment])
    }
}
