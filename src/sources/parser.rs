//! Source file scanner.
//!
//! Extracts exactly what the build needs from a `.go` file: the package
//! clause, the local imports (paths starting with `./`) and whether the file
//! defines the program entry point. A small lexer skips comments and string
//! contents so that text inside them is never mistaken for declarations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::{SourceUnit, ENTRY_PACKAGE};
use crate::util::fs::relative_path;

/// Prefix marking an import as local to the build root.
pub const LOCAL_IMPORT_PREFIX: &str = "./";

/// Error while scanning a source file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: expected `package <name>` at the start of the file", path.display())]
    MissingPackage { path: PathBuf },

    #[error("{}: unterminated {what}", path.display())]
    Unterminated { path: PathBuf, what: &'static str },

    #[error("{}: malformed import declaration", path.display())]
    MalformedImport { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    Punct(char),
}

impl Token {
    fn is_ident(&self, name: &str) -> bool {
        matches!(self, Token::Ident(s) if s == name)
    }
}

/// Scan a file under `root` into a [`SourceUnit`] with a root-relative path.
pub fn parse_source(root: &Path, path: &Path) -> Result<SourceUnit, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(relative_path(root, path), &content)
}

/// Scan source text already in memory.
pub fn parse_str(path: impl Into<PathBuf>, content: &str) -> Result<SourceUnit, ParseError> {
    let path = path.into();
    let tokens = tokenize(content).map_err(|what| ParseError::Unterminated {
        path: path.clone(),
        what,
    })?;

    let mut cursor = Cursor::new(&tokens);

    let package = match (cursor.next(), cursor.next()) {
        (Some(kw), Some(Token::Ident(name))) if kw.is_ident("package") => name.clone(),
        _ => return Err(ParseError::MissingPackage { path }),
    };
    cursor.skip_semicolons();

    let mut imports = Vec::new();
    while cursor.peek().is_some_and(|t| t.is_ident("import")) {
        cursor.next();
        if cursor.eat(&Token::Punct('(')) {
            loop {
                cursor.skip_semicolons();
                if cursor.eat(&Token::Punct(')')) {
                    break;
                }
                let spec = cursor
                    .import_spec()
                    .ok_or_else(|| ParseError::MalformedImport { path: path.clone() })?;
                imports.push(spec);
            }
        } else {
            let spec = cursor
                .import_spec()
                .ok_or_else(|| ParseError::MalformedImport { path: path.clone() })?;
            imports.push(spec);
        }
        cursor.skip_semicolons();
    }

    let local: Vec<String> = imports
        .iter()
        .filter_map(|p| p.strip_prefix(LOCAL_IMPORT_PREFIX))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    let entry_point = package == ENTRY_PACKAGE && cursor.has_top_level_main();

    tracing::trace!(
        "{}: package {}, local imports {:?}, entry point: {}",
        path.display(),
        package,
        local,
        entry_point
    );

    Ok(SourceUnit::new(path, package)
        .with_imports(local)
        .with_entry_point(entry_point))
}

struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_semicolons(&mut self) {
        while self.eat(&Token::Punct(';')) {}
    }

    /// `[name | . | _] "path"`
    fn import_spec(&mut self) -> Option<String> {
        if matches!(self.peek(), Some(Token::Ident(_)) | Some(Token::Punct('.'))) {
            self.next();
        }
        match self.next() {
            Some(Token::Str(path)) => Some(path.clone()),
            _ => None,
        }
    }

    /// Look for `func main (` outside of any braces.
    fn has_top_level_main(&self) -> bool {
        let mut depth = 0usize;
        let rest = &self.tokens[self.pos..];

        for (i, token) in rest.iter().enumerate() {
            match token {
                Token::Punct('{') => depth += 1,
                Token::Punct('}') => depth = depth.saturating_sub(1),
                Token::Ident(kw) if kw == "func" && depth == 0 => {
                    let name = rest.get(i + 1);
                    let paren = rest.get(i + 2);
                    if name.is_some_and(|t| t.is_ident("main"))
                        && paren == Some(&Token::Punct('('))
                    {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }
}

/// Split source text into identifiers, string literals and punctuation.
///
/// Comments, whitespace and rune literals are dropped. Fails with a short
/// description of the construct left open at end of input.
fn tokenize(src: &str) -> Result<Vec<Token>, &'static str> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                loop {
                    if i + 1 >= chars.len() {
                        return Err("block comment");
                    }
                    if chars[i] == '*' && chars[i + 1] == '/' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            '"' => {
                i += 1;
                let mut value = String::new();
                loop {
                    match chars.get(i) {
                        None | Some('\n') => return Err("string literal"),
                        Some('"') => {
                            i += 1;
                            break;
                        }
                        Some('\\') => {
                            if let Some(&escaped) = chars.get(i + 1) {
                                value.push(escaped);
                            }
                            i += 2;
                        }
                        Some(&ch) => {
                            value.push(ch);
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Str(value));
            }
            '`' => {
                i += 1;
                let start = i;
                while i < chars.len() && chars[i] != '`' {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err("raw string literal");
                }
                tokens.push(Token::Str(chars[start..i].iter().collect()));
                i += 1;
            }
            '\'' => {
                i += 1;
                loop {
                    match chars.get(i) {
                        None | Some('\n') => return Err("rune literal"),
                        Some('\'') => {
                            i += 1;
                            break;
                        }
                        Some('\\') => i += 2,
                        Some(_) => i += 1,
                    }
                }
            }
            c if c.is_alphanumeric() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            c => {
                tokens.push(Token::Punct(c));
                i += 1;
            }
        }
    }

    Ok(tokens)
}
