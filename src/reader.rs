//! Recursive-descent reader: token stream to value tree.
//!
//! `#t`/`#f` arrive from the tokenizer as symbols and become booleans
//! here. The quote prefixes wrap the following object; lists support a
//! dotted tail. Newlines are real tokens at the top level (the REPL
//! uses them to find the end of an input line) and are skipped inside
//! lists.

use crate::error::{Error, Result};
use crate::token::Token;
use crate::tokenizer::Tokenize;
use crate::value::Value;

pub struct Reader<'a, T: Tokenize + ?Sized> {
    tokenizer: &'a mut T,
}

impl<'a, T: Tokenize + ?Sized> Reader<'a, T> {
    pub fn new(tokenizer: &'a mut T) -> Self {
        Reader { tokenizer }
    }

    /// True if another object can be read. With `skip_newlines` the
    /// check looks past line breaks, otherwise a newline means "no".
    pub fn has_objects(&mut self, skip_newlines: bool) -> Result<bool> {
        if skip_newlines {
            self.skip_newlines()?;
        }
        let token = self.tokenizer.peek_token()?;
        Ok(!matches!(token, Token::End | Token::Newline))
    }

    /// Reads the next object. End of stream yields `Nil`.
    pub fn read_object(&mut self) -> Result<Value> {
        self.skip_newlines()?;
        match self.tokenizer.next_token()? {
            Token::Number(n) => Ok(Value::Number(n)),
            Token::String(s) => Ok(Value::String(s)),
            Token::Symbol(s) => Ok(match s.as_str() {
                "#t" => Value::Boolean(true),
                "#f" => Value::Boolean(false),
                _ => Value::Symbol(s),
            }),
            Token::Quote => Ok(Value::quote(self.read_object()?)),
            Token::Comma => Ok(Value::unquote(self.read_object()?)),
            Token::Backtick => Ok(Value::quasiquote(self.read_object()?)),
            Token::OpenParen => self.read_list_tail(),
            Token::End => Ok(Value::Nil),
            other => Err(Error::parser(format!("Unexpected token: {}", other))),
        }
    }

    /// Reads list items after an opening parenthesis, building the
    /// spine right-to-left through recursion.
    fn read_list_tail(&mut self) -> Result<Value> {
        self.skip_newlines()?;
        if self.tokenizer.peek_token()? == Token::CloseParen {
            self.tokenizer.next_token()?;
            return Ok(Value::Nil);
        }

        let car = self.read_object()?;
        match self.tokenizer.peek_token()? {
            Token::Dot => {
                self.tokenizer.next_token()?;
                let cdr = self.read_object()?;
                self.expect(Token::CloseParen)?;
                Ok(Value::cons(car, cdr))
            }
            Token::End => Err(Error::parser("Unexpected end of input")),
            _ => Ok(Value::cons(car, self.read_list_tail()?)),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        let found = self.tokenizer.peek_token()?;
        if found != expected {
            return Err(Error::parser(format!(
                "Expected {} got {}",
                expected, found
            )));
        }
        self.tokenizer.next_token()?;
        Ok(())
    }

    fn skip_newlines(&mut self) -> Result<()> {
        while self.tokenizer.peek_token()? == Token::Newline {
            self.tokenizer.next_token()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::pack_list;
    use crate::tokenizer::StringTokenizer;

    fn read_one(input: &str) -> Result<Value> {
        let mut tokenizer = StringTokenizer::with_input(input);
        Reader::new(&mut tokenizer).read_object()
    }

    fn numbers(ns: &[f64]) -> Vec<Value> {
        ns.iter().map(|n| Value::Number(*n)).collect()
    }

    #[test]
    fn test_atoms() {
        assert_eq!(read_one("42").unwrap(), Value::Number(42.0));
        assert_eq!(read_one("foo").unwrap(), Value::symbol("foo"));
        assert_eq!(read_one("\"hi\"").unwrap(), Value::string("hi"));
    }

    #[test]
    fn test_boolean_literals() {
        assert_eq!(read_one("#t").unwrap(), Value::Boolean(true));
        assert_eq!(read_one("#f").unwrap(), Value::Boolean(false));
        // Other #-initial names stay symbols.
        assert_eq!(read_one("#top").unwrap(), Value::symbol("#top"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(read_one("()").unwrap(), Value::Nil);
        assert_eq!(read_one("(   )").unwrap(), Value::Nil);
    }

    #[test]
    fn test_proper_list() {
        assert_eq!(
            read_one("(1 2 3)").unwrap(),
            pack_list(&numbers(&[1.0, 2.0, 3.0]), Value::Nil)
        );
    }

    #[test]
    fn test_dotted_pair() {
        assert_eq!(
            read_one("(1 . 2)").unwrap(),
            Value::cons(Value::Number(1.0), Value::Number(2.0))
        );
        assert_eq!(
            read_one("(1 2 . 3)").unwrap(),
            pack_list(&numbers(&[1.0, 2.0]), Value::Number(3.0))
        );
    }

    #[test]
    fn test_nested_lists() {
        assert_eq!(
            read_one("(1 (2 3) 4)").unwrap(),
            pack_list(
                &[
                    Value::Number(1.0),
                    pack_list(&numbers(&[2.0, 3.0]), Value::Nil),
                    Value::Number(4.0),
                ],
                Value::Nil
            )
        );
    }

    #[test]
    fn test_newlines_inside_list_are_skipped() {
        assert_eq!(
            read_one("(1\n2\n3)").unwrap(),
            pack_list(&numbers(&[1.0, 2.0, 3.0]), Value::Nil)
        );
    }

    #[test]
    fn test_quote_prefixes() {
        assert_eq!(
            read_one("'x").unwrap(),
            Value::quote(Value::symbol("x"))
        );
        assert_eq!(
            read_one("`x").unwrap(),
            Value::quasiquote(Value::symbol("x"))
        );
        assert_eq!(
            read_one(",x").unwrap(),
            Value::unquote(Value::symbol("x"))
        );
    }

    #[test]
    fn test_quote_sugar_matches_quote_form() {
        // '(1 2) and (quote (1 2)) differ only in the wrapper object.
        let sugared = read_one("'(1 2)").unwrap();
        match sugared {
            Value::Quote(inner) => {
                assert_eq!(*inner, pack_list(&numbers(&[1.0, 2.0]), Value::Nil))
            }
            other => panic!("expected quote wrapper, got {}", other),
        }
    }

    #[test]
    fn test_nested_quotes() {
        assert_eq!(
            read_one("''x").unwrap(),
            Value::quote(Value::quote(Value::symbol("x")))
        );
        assert_eq!(
            read_one("`,x").unwrap(),
            Value::quasiquote(Value::unquote(Value::symbol("x")))
        );
    }

    #[test]
    fn test_quote_inside_list() {
        assert_eq!(
            read_one("(a 'b)").unwrap(),
            pack_list(
                &[Value::symbol("a"), Value::quote(Value::symbol("b"))],
                Value::Nil
            )
        );
    }

    #[test]
    fn test_end_of_stream_is_nil() {
        assert_eq!(read_one("").unwrap(), Value::Nil);
        assert_eq!(read_one("\n\n").unwrap(), Value::Nil);
    }

    #[test]
    fn test_unbalanced_close_paren() {
        assert!(matches!(read_one(")"), Err(Error::Parser(_))));
    }

    #[test]
    fn test_premature_end_inside_list() {
        assert!(matches!(read_one("(1 2"), Err(Error::Parser(_))));
        assert!(matches!(read_one("(1 (2 3)"), Err(Error::Parser(_))));
    }

    #[test]
    fn test_junk_after_dotted_tail() {
        assert!(matches!(read_one("(1 . 2 3)"), Err(Error::Parser(_))));
    }

    #[test]
    fn test_tokenizer_errors_keep_their_kind() {
        assert!(matches!(read_one("(1 -foo)"), Err(Error::Tokenizer(_))));
    }

    #[test]
    fn test_has_objects() {
        let mut tokenizer = StringTokenizer::with_input("\n\n1");
        let mut reader = Reader::new(&mut tokenizer);
        assert!(!reader.has_objects(false).unwrap());
        assert!(reader.has_objects(true).unwrap());
        reader.read_object().unwrap();
        assert!(!reader.has_objects(true).unwrap());
    }

    #[test]
    fn test_round_trip_printing() {
        for source in [
            "(1 2 3)",
            "(1 . 2)",
            "(1 2 . 3)",
            "(a (b c) d)",
            "'(1 2)",
            "`(1 ,x)",
            "#t",
            "\"text\"",
            "()",
        ] {
            let value = read_one(source).unwrap();
            let reread = read_one(&value.to_string()).unwrap();
            assert_eq!(value, reread, "source: {}", source);
        }
    }
}
