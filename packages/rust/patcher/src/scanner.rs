//! Depth- and string-aware scanning of configuration source.
//!
//! The lexer walks the source byte by byte, tracking nesting depth across
//! `{}`, `[]` and `()` and switching into string mode on `'`, `"` or `` ` ``
//! (honoring backslash escapes) so that brackets inside string values and
//! comments are never counted. Everything the patcher knows about the source
//! structure comes from the tokens produced here.

/// Token classes the patcher cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Identifier or number.
    Word,
    /// String literal, quotes included.
    Str,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    Colon,
    Comma,
    Other,
}

/// A lexed token.
///
/// `depth` is the nesting depth the token sits at: an opening bracket and its
/// matching closing bracket share the depth of the entry that owns them, and
/// tokens between them are one deeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub depth: usize,
}

impl Token {
    /// Source text of the token.
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }

    /// Key spelled by a word or string token, quotes stripped.
    pub fn key_text<'a>(&self, src: &'a str) -> Option<&'a str> {
        let text = self.text(src);
        match self.kind {
            TokenKind::Word => Some(text),
            TokenKind::Str if text.len() >= 2 => Some(&text[1..text.len() - 1]),
            _ => None,
        }
    }

    /// Whether this token can name an object key equal to `key`.
    pub fn names(&self, src: &str, key: &str) -> bool {
        self.key_text(src) == Some(key)
    }
}

/// Lex `src` from `start` until the end of input.
///
/// Stops early (returning what it has) on an unterminated string or block
/// comment, or when depth would go negative.
pub(crate) fn lex(src: &str, start: usize) -> Vec<Token> {
    let mut lexer = Lexer::new(src, start);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    tokens
}

/// An object literal located in the source.
#[derive(Debug, Clone)]
pub(crate) struct Block {
    /// Offset of the opening `{`.
    pub open: usize,
    /// Offset of the matching `}`.
    pub close: usize,
    /// Tokens from the opening to the closing brace, inclusive. The braces sit
    /// at depth 0, direct children at depth 1.
    pub tokens: Vec<Token>,
}

impl Block {
    /// Offset just past the closing brace.
    pub fn end(&self) -> usize {
        self.close + 1
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset > self.open && offset < self.close
    }
}

/// Scan the object literal opening at `open` to its matching closing brace.
///
/// Returns `None` if `open` is not a `{` or the block never closes.
pub(crate) fn scan_block(src: &str, open: usize) -> Option<Block> {
    if src.as_bytes().get(open) != Some(&b'{') {
        return None;
    }

    let mut lexer = Lexer::new(src, open);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
        if token.kind == TokenKind::CloseBrace && token.depth == 0 {
            return Some(Block {
                open,
                close: token.start,
                tokens,
            });
        }
    }
    None
}

/// Every `key: {` among `tokens`, restricted to `depth` when given.
///
/// Yields the index of the key token and the offset of the value's `{`.
pub(crate) fn object_keys<'a>(
    src: &'a str,
    tokens: &'a [Token],
    key: &'a str,
    depth: Option<usize>,
) -> impl Iterator<Item = (usize, usize)> + 'a {
    tokens.windows(3).enumerate().filter_map(move |(i, w)| {
        let at_depth = depth.is_none_or(|d| w[0].depth == d);
        (at_depth
            && w[0].names(src, key)
            && w[1].kind == TokenKind::Colon
            && w[2].kind == TokenKind::OpenBrace)
            .then_some((i, w[2].start))
    })
}

/// First `key: {` among `tokens`, restricted to `depth` when given.
pub(crate) fn find_object_key(
    src: &str,
    tokens: &[Token],
    key: &str,
    depth: Option<usize>,
) -> Option<(usize, usize)> {
    object_keys(src, tokens, key, depth).next()
}

/// Leading whitespace of the line containing `offset`.
pub(crate) fn line_indent(src: &str, offset: usize) -> &str {
    let line_start = src[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &src[line_start..];
    let width = line
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[..width]
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str, start: usize) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: start,
            depth: 0,
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_trivia()?;
        let start = self.pos;
        let byte = *self.bytes.get(start)?;

        let kind = match byte {
            b'\'' | b'"' | b'`' => {
                self.skip_string(byte)?;
                return Some(self.token(TokenKind::Str, start, self.depth));
            }
            b'{' | b'[' | b'(' => {
                self.pos += 1;
                let token = self.token(open_kind(byte), start, self.depth);
                self.depth += 1;
                return Some(token);
            }
            b'}' | b']' | b')' => {
                self.depth = self.depth.checked_sub(1)?;
                self.pos += 1;
                return Some(self.token(close_kind(byte), start, self.depth));
            }
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b if is_word_byte(b) => {
                while self.bytes.get(self.pos).is_some_and(|b| is_word_byte(*b)) {
                    self.pos += 1;
                }
                return Some(self.token(TokenKind::Word, start, self.depth));
            }
            _ => TokenKind::Other,
        };

        // single-byte token; step over a whole UTF-8 char for `Other`
        self.pos += self.src[start..].chars().next().map_or(1, char::len_utf8);
        Some(self.token(kind, start, self.depth))
    }

    fn token(&self, kind: TokenKind, start: usize, depth: usize) -> Token {
        Token {
            kind,
            start,
            end: self.pos,
            depth,
        }
    }

    /// Skip whitespace and comments. `None` on an unterminated block comment.
    fn skip_trivia(&mut self) -> Option<()> {
        loop {
            match (self.bytes.get(self.pos), self.bytes.get(self.pos + 1)) {
                (Some(b), _) if b.is_ascii_whitespace() => self.pos += 1,
                (Some(b'/'), Some(b'/')) => {
                    while self.bytes.get(self.pos).is_some_and(|b| *b != b'\n') {
                        self.pos += 1;
                    }
                }
                (Some(b'/'), Some(b'*')) => {
                    let rest = &self.src[self.pos + 2..];
                    let close = rest.find("*/")?;
                    self.pos += 2 + close + 2;
                }
                _ => return Some(()),
            }
        }
    }

    /// Advance past a string opened by `quote`. `None` if it never closes.
    fn skip_string(&mut self, quote: u8) -> Option<()> {
        self.pos += 1;
        loop {
            match *self.bytes.get(self.pos)? {
                b'\\' => self.pos += 2,
                b if b == quote => {
                    self.pos += 1;
                    return Some(());
                }
                b'\n' if quote != b'`' => return None,
                _ => self.pos += 1,
            }
        }
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'-' || b == b'.'
}

fn open_kind(byte: u8) -> TokenKind {
    match byte {
        b'{' => TokenKind::OpenBrace,
        b'[' => TokenKind::OpenBracket,
        _ => TokenKind::OpenParen,
    }
}

fn close_kind(byte: u8) -> TokenKind {
    match byte {
        b'}' => TokenKind::CloseBrace,
        b']' => TokenKind::CloseBracket,
        _ => TokenKind::CloseParen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_end_matches_nested_braces() {
        let src = "x = { a: { b: 1 }, c: [ { d: 2 } ] } // tail";
        let open = src.find('{').unwrap();
        let block = scan_block(src, open).expect("block");
        assert_eq!(&src[block.close..block.end()], "}");
        assert_eq!(block.close, src.rfind('}').unwrap());
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let src = r#"{ layout: "grid-{special}", other: 'a } b', t: `}`, esc: "q\"}" }"#;
        let block = scan_block(src, 0).expect("block");
        assert_eq!(block.close, src.len() - 1);
    }

    #[test]
    fn braces_inside_comments_are_ignored() {
        let src = "{\n  // closing } here\n  /* and { here */\n  a: 1\n}";
        let block = scan_block(src, 0).expect("block");
        assert_eq!(block.close, src.len() - 1);
    }

    #[test]
    fn unterminated_block_is_none() {
        assert!(scan_block("{ a: { b: 1 }", 0).is_none());
        assert!(scan_block("{ a: 'never closed }", 0).is_none());
        assert!(scan_block("not a brace", 0).is_none());
    }

    #[test]
    fn token_depths() {
        let src = "{ a: { b: 1 } }";
        let block = scan_block(src, 0).unwrap();
        let depths: Vec<_> = block
            .tokens
            .iter()
            .map(|t| (t.text(src), t.depth))
            .collect();
        assert_eq!(
            depths,
            vec![
                ("{", 0),
                ("a", 1),
                (":", 1),
                ("{", 1),
                ("b", 2),
                (":", 2),
                ("1", 2),
                ("}", 1),
                ("}", 0),
            ]
        );
    }

    #[test]
    fn key_lookup_accepts_quoted_keys_and_respects_depth() {
        let src = r#"{ 'dark-pro': { home: {} }, nested: { home: {} }, "home": {} }"#;
        let block = scan_block(src, 0).unwrap();

        let (_, open) = find_object_key(src, &block.tokens, "dark-pro", None).unwrap();
        assert_eq!(&src[open..open + 1], "{");

        // only the direct child `"home"` at depth 1
        let (idx, _) = find_object_key(src, &block.tokens, "home", Some(1)).unwrap();
        assert_eq!(block.tokens[idx].text(src), "\"home\"");
    }

    #[test]
    fn key_inside_string_value_is_not_a_key() {
        let src = "{ note: 'home: {', other: {} }";
        let block = scan_block(src, 0).unwrap();
        assert!(find_object_key(src, &block.tokens, "home", None).is_none());
    }

    #[test]
    fn indent_of_line() {
        let src = "a\n    home: {\n";
        let offset = src.find("home").unwrap();
        assert_eq!(line_indent(src, offset), "    ");
        assert_eq!(line_indent("home", 0), "");
    }

    #[test]
    fn lex_collects_all_tokens() {
        let tokens = lex("a: [1, 'x']", 0);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word,
                TokenKind::Colon,
                TokenKind::OpenBracket,
                TokenKind::Word,
                TokenKind::Comma,
                TokenKind::Str,
                TokenKind::CloseBracket,
            ]
        );
    }
}
