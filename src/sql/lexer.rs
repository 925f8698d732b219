//! SQL lexer for tokenizing schema text.
//!
//! The lexer only distinguishes comments, quoted literals, the punctuation
//! characters `( ) , ;` and runs of anything else. Keywords are not
//! classified here: the parser compares word tokens case-insensitively.

use core::fmt::{self, Display};

/// A location in the source buffer.
///
/// `line` and `column` are 1-based and only used for diagnostics; `offset`
/// is the byte offset into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    /// Byte offset into the input.
    pub offset: usize,
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number (in characters), starting at 1.
    pub column: usize,
}

impl Position {
    /// The position of the first byte of a buffer.
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The different kinds of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input.
    Eof,
    /// A block or line comment; the text is the comment body.
    Comment,
    /// A single- or double-quoted literal; the text excludes the quotes.
    Literal,
    /// A punctuation character or a run of anything else.
    Word,
}

/// A token produced by the lexer, borrowing its text from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'input> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The token text (comment body, literal content or word).
    pub text: &'input str,
    /// Where the token starts in the input.
    pub position: Position,
}

impl Token<'_> {
    /// Returns whether this is the end-of-input token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Returns whether this is a comment token.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    /// Returns whether this is a word equal to `keyword`, ignoring ASCII case.
    ///
    /// Quoted literals never match, so `'create'` is not a keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Returns whether this is the one-character punctuation token `punct`.
    #[must_use]
    pub fn is_punct(&self, punct: u8) -> bool {
        self.kind == TokenKind::Word && self.text.as_bytes() == [punct]
    }

    /// Returns whether this token can name a table or a column.
    ///
    /// Words and quoted literals qualify; punctuation does not.
    #[must_use]
    pub fn is_name(&self) -> bool {
        match self.kind {
            TokenKind::Literal => true,
            TokenKind::Word => !matches!(self.text.as_bytes(), [b] if is_punct(*b)),
            TokenKind::Eof | TokenKind::Comment => false,
        }
    }
}

/// Errors that can occur during lexing.
///
/// All of them are an end of input reached inside a construct that needs a
/// closing delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    /// A `/*` comment without a closing `*/`.
    #[error("{start}: unexpected eof in block comment")]
    UnterminatedBlockComment {
        /// Where the comment started.
        start: Position,
    },
    /// A `--` comment without a terminating newline.
    #[error("{start}: unexpected eof in line comment")]
    UnterminatedLineComment {
        /// Where the comment started.
        start: Position,
    },
    /// A quoted literal without its closing quote.
    #[error("{start}: unexpected eof in {quote}-quoted literal")]
    UnterminatedLiteral {
        /// The opening quote character.
        quote: char,
        /// Where the literal started.
        start: Position,
    },
}

impl LexerError {
    /// Where the unterminated construct started.
    #[must_use]
    pub fn start(&self) -> Position {
        match self {
            Self::UnterminatedBlockComment { start }
            | Self::UnterminatedLineComment { start }
            | Self::UnterminatedLiteral { start, .. } => *start,
        }
    }
}

/// Running cursor over the input: byte offset plus line/column counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    position: Position,
}

impl Cursor {
    /// Advance over `n` bytes of `bytes`, keeping line and column in sync.
    fn advance(&mut self, bytes: &[u8], n: usize) {
        let end = (self.position.offset + n).min(bytes.len());
        for &b in &bytes[self.position.offset..end] {
            if b == b'\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else if b & 0xC0 != 0x80 {
                // UTF-8 continuation bytes do not start a new column.
                self.position.column += 1;
            }
        }
        self.position.offset = end;
    }
}

/// Schema lexer that produces tokens from input.
#[derive(Debug, Clone)]
pub struct Lexer<'input> {
    input: &'input str,
    cursor: Cursor,
}

impl<'input> Lexer<'input> {
    /// Create a new lexer for the given input.
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            cursor: Cursor {
                position: Position::START,
            },
        }
    }

    /// Get the current position in the input.
    #[must_use]
    pub fn position(&self) -> Position {
        self.cursor.position
    }

    /// Returns whether the whole input has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor.position.offset >= self.input.len()
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.input
            .as_bytes()
            .get(self.cursor.position.offset + ahead)
            .copied()
    }

    fn bump(&mut self, n: usize) {
        self.cursor.advance(self.input.as_bytes(), n);
    }

    fn skip_whitespace(&mut self) {
        while self.peek_byte(0).is_some_and(|b| b.is_ascii_whitespace()) {
            self.bump(1);
        }
    }

    /// Consume and return the next token.
    ///
    /// Returns a [`TokenKind::Eof`] token once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a [`LexerError`] when the input ends inside a comment or a
    /// quoted literal. The cursor is left at the end of the input.
    pub fn next_token(&mut self) -> Result<Token<'input>, LexerError> {
        self.skip_whitespace();

        let start = self.cursor.position;
        let Some(b) = self.peek_byte(0) else {
            return Ok(Token {
                kind: TokenKind::Eof,
                text: "",
                position: start,
            });
        };

        match (b, self.peek_byte(1)) {
            (b'/', Some(b'*')) => self.read_block_comment(start),
            (b'-', Some(b'-')) => self.read_line_comment(start),
            (b'\'' | b'"', _) if !self.is_escaped(start.offset) => self.read_literal(start, b),
            _ => Ok(self.read_word(start)),
        }
    }

    /// Whether the byte at `offset` is preceded by a backslash.
    fn is_escaped(&self, offset: usize) -> bool {
        offset > 0 && self.input.as_bytes()[offset - 1] == b'\\'
    }

    fn read_block_comment(&mut self, start: Position) -> Result<Token<'input>, LexerError> {
        self.bump(2);
        self.skip_whitespace();
        let body_start = self.cursor.position.offset;

        let Some(len) = self.input[body_start..].find("*/") else {
            self.bump(self.input.len() - body_start);
            return Err(LexerError::UnterminatedBlockComment { start });
        };
        self.bump(len + 2);

        Ok(Token {
            kind: TokenKind::Comment,
            text: &self.input[body_start..body_start + len],
            position: start,
        })
    }

    fn read_line_comment(&mut self, start: Position) -> Result<Token<'input>, LexerError> {
        self.bump(2);
        let body_start = self.cursor.position.offset;

        let Some(len) = self.input[body_start..].find('\n') else {
            self.bump(self.input.len() - body_start);
            return Err(LexerError::UnterminatedLineComment { start });
        };
        self.bump(len + 1);

        Ok(Token {
            kind: TokenKind::Comment,
            text: &self.input[body_start..body_start + len],
            position: start,
        })
    }

    fn read_literal(&mut self, start: Position, quote: u8) -> Result<Token<'input>, LexerError> {
        self.bump(1);
        let body_start = self.cursor.position.offset;
        let bytes = self.input.as_bytes();

        let mut end = body_start;
        while end < bytes.len() && !(bytes[end] == quote && !self.is_escaped(end)) {
            end += 1;
        }
        if end == bytes.len() {
            self.bump(end - body_start);
            return Err(LexerError::UnterminatedLiteral {
                quote: char::from(quote),
                start,
            });
        }
        self.bump(end - body_start + 1);

        Ok(Token {
            kind: TokenKind::Literal,
            text: &self.input[body_start..end],
            position: start,
        })
    }

    fn read_word(&mut self, start: Position) -> Token<'input> {
        let bytes = self.input.as_bytes();
        let mut end = start.offset + 1;
        if !is_punct(bytes[start.offset]) {
            while end < bytes.len() && !bytes[end].is_ascii_whitespace() && !is_punct(bytes[end]) {
                end += 1;
            }
        }
        // The run stops at ASCII bytes only, so the slice is on char boundaries.
        let end = ceil_char_boundary(self.input, end);
        self.bump(end - start.offset);

        Token {
            kind: TokenKind::Word,
            text: &self.input[start.offset..end],
            position: start,
        }
    }
}

/// Check if a byte is one of the punctuation characters that always form
/// their own token.
fn is_punct(b: u8) -> bool {
    matches!(b, b'(' | b')' | b',' | b';')
}

/// Round `index` up to the next char boundary of `s`.
fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    while index < s.len() && !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn texts(input: &str) -> Vec<(TokenKind, &str)> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token.is_eof() {
                return out;
            }
            out.push((token.kind, token.text));
        }
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(
            texts("CREATE TABLE t(a decimal(10,2));"),
            [
                (TokenKind::Word, "CREATE"),
                (TokenKind::Word, "TABLE"),
                (TokenKind::Word, "t"),
                (TokenKind::Word, "("),
                (TokenKind::Word, "a"),
                (TokenKind::Word, "decimal"),
                (TokenKind::Word, "("),
                (TokenKind::Word, "10"),
                (TokenKind::Word, ","),
                (TokenKind::Word, "2"),
                (TokenKind::Word, ")"),
                (TokenKind::Word, ")"),
                (TokenKind::Word, ";"),
            ]
        );
    }

    #[test]
    fn test_case_is_preserved() {
        let mut lexer = Lexer::new("CrEaTe");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.text, "CrEaTe");
        assert!(token.is_keyword("create"));
        assert!(!token.is_keyword("creat"));
    }

    #[test]
    fn test_block_comment_strips_leading_whitespace() {
        assert_eq!(
            texts("/*   users table */ x"),
            [(TokenKind::Comment, "users table "), (TokenKind::Word, "x")]
        );
    }

    #[test]
    fn test_line_comment_excludes_newline() {
        assert_eq!(
            texts("-- hello\nworld"),
            [(TokenKind::Comment, " hello"), (TokenKind::Word, "world")]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            texts(r#"'it' "my col" 'a\'b'"#),
            [
                (TokenKind::Literal, "it"),
                (TokenKind::Literal, "my col"),
                (TokenKind::Literal, r"a\'b"),
            ]
        );
    }

    #[test]
    fn test_escaped_opening_quote_is_a_word() {
        assert_eq!(texts(r"x\'y"), [(TokenKind::Word, r"x\'y")]);
    }

    #[test]
    fn test_quoted_punctuation_is_not_punctuation() {
        let mut lexer = Lexer::new("'('");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Literal);
        assert!(!token.is_punct(b'('));
        assert!(token.is_name());
    }

    #[test]
    fn test_unterminated_constructs() {
        assert_eq!(
            Lexer::new("  /* open").next_token(),
            Err(LexerError::UnterminatedBlockComment {
                start: Position {
                    offset: 2,
                    line: 1,
                    column: 3
                }
            })
        );
        assert!(matches!(
            Lexer::new("-- no newline").next_token(),
            Err(LexerError::UnterminatedLineComment { .. })
        ));
        assert!(matches!(
            Lexer::new("'open").next_token(),
            Err(LexerError::UnterminatedLiteral { quote: '\'', .. })
        ));
    }

    #[test]
    fn test_error_leaves_lexer_exhausted() {
        let mut lexer = Lexer::new("x /* never closed");
        lexer.next_token().unwrap();
        assert!(lexer.next_token().is_err());
        assert!(lexer.is_exhausted());
        assert!(lexer.next_token().unwrap().is_eof());
    }

    #[test]
    fn test_positions_track_lines_and_columns() {
        let mut lexer = Lexer::new("a\n  b\n\u{e9}t c");
        let a = lexer.next_token().unwrap();
        let b = lexer.next_token().unwrap();
        let et = lexer.next_token().unwrap();
        let c = lexer.next_token().unwrap();
        assert_eq!((a.position.line, a.position.column), (1, 1));
        assert_eq!((b.position.line, b.position.column), (2, 3));
        assert_eq!(et.text, "\u{e9}t");
        assert_eq!((c.position.line, c.position.column), (3, 4));
    }

    #[test]
    fn test_punctuation_never_joins_a_run() {
        assert_eq!(
            texts("a,b;c)"),
            [
                (TokenKind::Word, "a"),
                (TokenKind::Word, ","),
                (TokenKind::Word, "b"),
                (TokenKind::Word, ";"),
                (TokenKind::Word, "c"),
                (TokenKind::Word, ")"),
            ]
        );
    }
}
