//! The evaluator: one dispatch over the value shape.
//!
//! Atoms evaluate to themselves, symbols to their binding, quote
//! wrappers per the quotation rules, and a pair is a call: the head
//! must evaluate to a callable, which is applied to the unevaluated
//! argument spine.

use crate::env::Environment;
use crate::error::{Error, Result};
use crate::list::map_list;
use crate::value::Value;
use std::rc::Rc;

pub fn eval(value: &Value, env: &Rc<Environment>) -> Result<Value> {
    match value {
        Value::Nil => Err(Error::execution("Cannot execute empty list")),
        Value::Boolean(_) | Value::Number(_) | Value::String(_) | Value::Callable(_) => {
            Ok(value.clone())
        }
        Value::Symbol(name) => env.lookup(name),
        Value::Quote(inner) => Ok((**inner).clone()),
        Value::Unquote(inner) => safe_eval(inner, env),
        Value::Quasiquote(inner) => quasiquote(inner, env),
        Value::Pair(pair) => {
            let head = pair.car();
            if head.is_nil() {
                return Err(Error::execution("Cannot execute empty list"));
            }
            let evaluated = eval(&head, env)?;
            match &evaluated {
                Value::Callable(callable) => callable.apply(env, &pair.cdr()),
                Value::Nil => Err(Error::execution(format!("{} is not callable", head))),
                other => Err(Error::execution(format!("{} is not callable", other))),
            }
        }
    }
}

/// Nil-tolerant evaluation: `Nil` passes through instead of raising
/// "cannot execute empty list". Used wherever a result that may be Nil
/// is fed back into evaluation (branch results, body sequences, macro
/// expansions).
pub fn safe_eval(value: &Value, env: &Rc<Environment>) -> Result<Value> {
    if value.is_nil() {
        Ok(Value::Nil)
    } else {
        eval(value, env)
    }
}

/// Evaluates a condition form and reduces it to truthiness.
pub fn eval_condition(condition: &Value, env: &Rc<Environment>) -> Result<bool> {
    Ok(safe_eval(condition, env)?.is_truthy())
}

/// The quasiquote walk: one level deep along the spine. Each element
/// that is an unquote wrapper is evaluated; everything else, including
/// nested lists, is kept verbatim. A bare atom under quasiquote maps
/// to itself, and a dotted tail follows the same element rule.
fn quasiquote(inner: &Value, env: &Rc<Environment>) -> Result<Value> {
    map_list(inner, &mut |element| match element {
        Value::Unquote(_) => eval(element, env),
        other => Ok(other.clone()),
    })
}
