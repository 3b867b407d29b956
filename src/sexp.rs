//! Reader for the restricted Lisp syntax scripts are written in.
//!
//! Only three kinds of values exist: integers, symbols and lists. There is no
//! quoting, no dotted pairs and no escapes. A `;` starts a comment that runs to
//! the end of the line, and a double-quoted run is read as one symbol with the
//! quotes dropped.
//!
//! ```text
//! (YOU = I ((0 I REMIND YOU OF 0) (=DIT)))
//!  │   │ │  └ List [List[..], List[..]]
//!  │   │ └ Symbol "I"
//!  │   └ Symbol "="
//!  └ Symbol "YOU"
//! ```
//!
//! Every value renders back to text through `Display`, which is how patterns
//! and reassemblies get flattened before compilation.

use crate::error::{Result, ScriptError};
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sexp {
    Int(i64),
    Symbol(String),
    List(Vec<Sexp>),
}

impl Sexp {
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Sexp::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Sexp::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_symbol(&self, name: &str) -> bool {
        self.as_symbol() == Some(name)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Sexp::List(_))
    }

    pub fn is_empty_list(&self) -> bool {
        matches!(self, Sexp::List(items) if items.is_empty())
    }

    /// Render a list's elements without the enclosing parentheses.
    ///
    /// `(0 (* A B) YOU 0)` becomes `0 (* A B) YOU 0`. Atoms render as themselves.
    pub fn inner_text(&self) -> String {
        match self {
            Sexp::List(items) => items.iter().map(|item| item.to_string()).collect::<Vec<_>>().join(" "),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sexp::Int(n) => write!(f, "{n}"),
            Sexp::Symbol(s) => f.write_str(s),
            Sexp::List(_) => write!(f, "({})", self.inner_text()),
        }
    }
}

/// Read every top-level form in `text`.
pub fn read_all(text: &str) -> Result<Vec<Sexp>> {
    let mut reader = Reader { input: text, chars: text.char_indices().peekable() };
    let mut forms = Vec::new();
    while let Some(form) = reader.next_form()? {
        forms.push(form);
    }
    Ok(forms)
}

struct Reader<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Reader<'a> {
    fn skip_blank(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else if c == ';' {
                for (_, c) in self.chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    /// Read the next top-level form, or `None` at end of input.
    fn next_form(&mut self) -> Result<Option<Sexp>> {
        self.skip_blank();
        match self.chars.peek() {
            None => Ok(None),
            Some(&(offset, ')')) => Err(ScriptError::Syntax { offset, message: "unexpected ')'".into() }),
            Some(_) => self.read_form().map(Some),
        }
    }

    fn read_form(&mut self) -> Result<Sexp> {
        self.skip_blank();
        let Some(&(offset, c)) = self.chars.peek() else {
            return Err(ScriptError::Syntax { offset: self.input.len(), message: "unexpected end of input".into() });
        };
        match c {
            '(' => {
                self.chars.next();
                self.read_list(offset)
            }
            ')' => Err(ScriptError::Syntax { offset, message: "unexpected ')'".into() }),
            '"' => {
                self.chars.next();
                self.read_quoted(offset)
            }
            _ => Ok(self.read_atom()),
        }
    }

    fn read_list(&mut self, open: usize) -> Result<Sexp> {
        let mut items = Vec::new();
        loop {
            self.skip_blank();
            match self.chars.peek() {
                None => {
                    return Err(ScriptError::Syntax { offset: open, message: "unterminated list".into() });
                }
                Some(&(_, ')')) => {
                    self.chars.next();
                    return Ok(Sexp::List(items));
                }
                Some(_) => items.push(self.read_form()?),
            }
        }
    }

    fn read_quoted(&mut self, open: usize) -> Result<Sexp> {
        let mut text = String::new();
        for (_, c) in self.chars.by_ref() {
            if c == '"' {
                return Ok(Sexp::Symbol(text));
            }
            text.push(c);
        }
        Err(ScriptError::Syntax { offset: open, message: "unterminated string".into() })
    }

    fn read_atom(&mut self) -> Sexp {
        let mut text = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | ';' | '"') {
                break;
            }
            text.push(c);
            self.chars.next();
        }
        match parse_int(&text) {
            Some(n) => Sexp::Int(n),
            None => Sexp::Symbol(text),
        }
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
