use crate::{errors::errors::Error, lexer::tokens::TokenKind};

use super::{file::*, stream::TokenStream};

/// Handler invoked with the cursor on the token that selected it. It must
/// return with the cursor past everything it consumed.
pub type FileHandler = fn(&mut SourceFile, &mut TokenStream) -> Result<(), Error>;

/// Returns the handler registered for a token kind.
///
/// Kinds without a handler are inert: the dispatch loop steps over them.
pub fn file_handler(kind: TokenKind) -> Option<FileHandler> {
    let handler: FileHandler = match kind {
        TokenKind::Namespace => process_namespace,
        TokenKind::Use => process_use,
        TokenKind::Interface => process_interface,
        TokenKind::Class => process_class,
        TokenKind::Function => process_function,
        TokenKind::Const => process_const,
        TokenKind::Trait | TokenKind::Enum => process_unreflected,

        // All four include forms share one handler
        TokenKind::Require
        | TokenKind::RequireOnce
        | TokenKind::Include
        | TokenKind::IncludeOnce => process_include,

        _ => return None,
    };

    Some(handler)
}
