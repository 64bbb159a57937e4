//! Callable values: host primitives and user-defined closures.
//!
//! The function/macro distinction is a field, not a separate type.
//! Functions receive an evaluated argument spine; macros receive the
//! raw forms. A callable flagged `fresh_scope` runs against a new
//! child of the caller's environment.

use crate::env::Environment;
use crate::error::{Error, Result};
use crate::eval::{eval, safe_eval};
use crate::list::{map_list, pack_list, unpack_list};
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    Function,
    Macro,
}

impl CallableKind {
    fn describe(self) -> &'static str {
        match self {
            CallableKind::Function => "function",
            CallableKind::Macro => "macro",
        }
    }
}

pub type PrimitiveFn = fn(&Rc<Environment>, &[Value]) -> Result<Value>;

pub struct Callable {
    kind: CallableKind,
    fresh_scope: bool,
    imp: Imp,
}

enum Imp {
    Primitive(PrimitiveFn),
    User(UserCallable),
}

/// A closure or user macro: formal names, an optional rest formal, a
/// body of expressions, and the captured definition environment.
pub struct UserCallable {
    name: String,
    params: Vec<String>,
    rest_param: Option<String>,
    body: Vec<Value>,
    closure: Rc<Environment>,
}

impl Callable {
    pub fn function(f: PrimitiveFn) -> Self {
        Callable {
            kind: CallableKind::Function,
            fresh_scope: false,
            imp: Imp::Primitive(f),
        }
    }

    pub fn macro_form(f: PrimitiveFn) -> Self {
        Callable {
            kind: CallableKind::Macro,
            fresh_scope: false,
            imp: Imp::Primitive(f),
        }
    }

    /// A macro form whose arguments are handled in a child of the
    /// caller's scope (`let` needs this to contain its bindings).
    pub fn scoped_macro(f: PrimitiveFn) -> Self {
        Callable {
            kind: CallableKind::Macro,
            fresh_scope: true,
            imp: Imp::Primitive(f),
        }
    }

    pub fn user(
        name: impl Into<String>,
        params: Vec<String>,
        rest_param: Option<String>,
        body: Vec<Value>,
        closure: Rc<Environment>,
        kind: CallableKind,
    ) -> Self {
        Callable {
            kind,
            fresh_scope: true,
            imp: Imp::User(UserCallable {
                name: name.into(),
                params,
                rest_param,
                body,
                closure,
            }),
        }
    }

    pub fn kind(&self) -> CallableKind {
        self.kind
    }

    pub fn is_macro(&self) -> bool {
        self.kind == CallableKind::Macro
    }

    /// Applies the callable to the unevaluated argument spine taken
    /// from the call site.
    pub fn apply(&self, env: &Rc<Environment>, args: &Value) -> Result<Value> {
        let prepared = match self.kind {
            CallableKind::Function => map_list(args, &mut |arg| eval(arg, env))?,
            CallableKind::Macro => args.clone(),
        };

        let local = if self.fresh_scope {
            Environment::with_parent(env.clone())
        } else {
            env.clone()
        };

        let args_vec = unpack_list(&prepared)?;
        match &self.imp {
            Imp::Primitive(f) => f(&local, &args_vec),
            Imp::User(user) => user.invoke(&local, &args_vec, self.kind),
        }
    }
}

impl UserCallable {
    fn invoke(
        &self,
        caller: &Rc<Environment>,
        args: &[Value],
        kind: CallableKind,
    ) -> Result<Value> {
        if args.len() < self.params.len()
            || (self.rest_param.is_none() && args.len() > self.params.len())
        {
            let message = format!(
                "{} {} expects {} arguments but {} given",
                self.name,
                kind.describe(),
                self.params.len(),
                args.len()
            );
            return Err(match kind {
                CallableKind::Macro => Error::macro_arguments(message),
                CallableKind::Function => Error::execution(message),
            });
        }

        let local = Environment::with_parent(self.closure.clone());
        for (param, arg) in self.params.iter().zip(args) {
            local.define(param.clone(), arg.clone());
        }
        if let Some(rest) = &self.rest_param {
            let rest_list = pack_list(&args[self.params.len()..], Value::Nil);
            local.define(rest.clone(), rest_list);
        }

        let mut result = Value::Nil;
        for expression in &self.body {
            result = safe_eval(expression, &local)?;
            // A macro's expansion runs where it was called, so macro
            // definitions see the caller's bindings at call time.
            if kind == CallableKind::Macro {
                result = safe_eval(&result, caller)?;
            }
        }
        Ok(result)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.imp {
            Imp::Primitive(_) => f
                .debug_struct("Callable")
                .field("kind", &self.kind)
                .field("imp", &"<primitive>")
                .finish(),
            Imp::User(user) => f
                .debug_struct("Callable")
                .field("kind", &self.kind)
                .field("name", &user.name)
                .field("params", &user.params)
                .field("rest_param", &user.rest_param)
                .finish(),
        }
    }
}
