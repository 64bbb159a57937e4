//! The virtual machine façade: a tokenizer, a reader over it, and a
//! global environment populated with the builtins and the prelude.

use crate::builtins::register_builtins;
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::eval::safe_eval;
use crate::reader::Reader;
use crate::tokenizer::{StringTokenizer, Tokenize};
use crate::value::Value;
use std::rc::Rc;

/// Bootstrap library, written in the interpreted language itself and
/// evaluated once per global environment.
const PRELUDE: &str = include_str!("prelude.lisp");

pub struct Vm<T: Tokenize> {
    tokenizer: T,
    global: Rc<Environment>,
}

/// Builds a global environment with every primitive and the prelude.
pub fn make_global_env() -> Rc<Environment> {
    let env = Environment::new();
    register_builtins(&env);

    let mut loader = Vm::with_global(StringTokenizer::with_input(PRELUDE), env.clone());
    if let Err(error) = loader.eval_all() {
        // The prelude is embedded source; failing to load it is a bug
        // in the interpreter, not in user input.
        panic!("prelude failed to load: {}", error);
    }
    env
}

impl<T: Tokenize> Vm<T> {
    /// A VM with a fresh, fully initialized global environment.
    pub fn new(tokenizer: T) -> Self {
        Vm {
            tokenizer,
            global: make_global_env(),
        }
    }

    /// A VM over an existing environment (used by the prelude loader
    /// and by tests that share one global scope).
    pub fn with_global(tokenizer: T, global: Rc<Environment>) -> Self {
        Vm { tokenizer, global }
    }

    pub fn global(&self) -> &Rc<Environment> {
        &self.global
    }

    /// Line counter of the underlying tokenizer, for batch-mode error
    /// reports.
    pub fn current_line(&self) -> usize {
        self.tokenizer.current_line()
    }

    pub fn has_objects(&mut self, skip_newlines: bool) -> Result<bool> {
        Reader::new(&mut self.tokenizer).has_objects(skip_newlines)
    }

    /// Reads the next object. A parse error clears the tokenizer so
    /// the next read starts clean.
    pub fn parse(&mut self) -> Result<Value> {
        let result = Reader::new(&mut self.tokenizer).read_object();
        if let Err(Error::Parser(_)) = &result {
            self.tokenizer.clear();
        }
        result
    }

    /// Reads one object and evaluates it in the global environment.
    /// An empty stream yields Nil without evaluating anything.
    pub fn eval_one(&mut self) -> Result<Value> {
        let object = self.parse()?;
        safe_eval(&object, &self.global)
    }

    /// Evaluates objects until the stream runs out, returning the last
    /// value (or Nil for an empty stream).
    pub fn eval_all(&mut self) -> Result<Value> {
        let mut result = Value::Nil;
        while self.has_objects(true)? {
            result = self.eval_one()?;
        }
        Ok(result)
    }
}

impl Vm<StringTokenizer> {
    /// A string-backed VM primed with `source`.
    pub fn from_source(source: &str) -> Self {
        Vm::new(StringTokenizer::with_input(source))
    }

    /// Resets the reader over fresh input.
    pub fn feed(&mut self, source: &str) {
        self.tokenizer.clear();
        self.tokenizer.append(source);
    }

    /// Convenience: feed `source` and evaluate everything in it.
    pub fn eval_str(&mut self, source: &str) -> Result<Value> {
        self.feed(source);
        self.eval_all()
    }
}

impl Default for Vm<StringTokenizer> {
    fn default() -> Self {
        Vm::from_source("")
    }
}
