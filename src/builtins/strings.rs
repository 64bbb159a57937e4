//! String procedures: `string-length` and the chained lexicographic
//! comparisons `string<?`, `string<=?`, `string>?`, `string>=?`,
//! `string=?`. The chain rules match the numeric comparisons.

use crate::builtins::{check_at_least, check_exact, string_arg};
use crate::callable::{Callable, CallableKind};
use crate::env::Environment;
use crate::error::Result;
use crate::value::Value;
use std::cmp::Ordering;
use std::rc::Rc;

pub fn register(env: &Rc<Environment>) {
    env.define(
        "string-length",
        Value::callable(Callable::function(string_length)),
    );
    env.define("string<?", Value::callable(Callable::function(string_less)));
    env.define(
        "string<=?",
        Value::callable(Callable::function(string_less_equal)),
    );
    env.define(
        "string>?",
        Value::callable(Callable::function(string_greater)),
    );
    env.define(
        "string>=?",
        Value::callable(Callable::function(string_greater_equal)),
    );
    env.define(
        "string=?",
        Value::callable(Callable::function(string_equal)),
    );
}

fn string_length(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("string-length", args, 1, CallableKind::Function)?;
    let text = string_arg("string-length", args, 0)?;
    Ok(Value::Number(text.len() as f64))
}

fn compare_chain(
    name: &str,
    args: &[Value],
    accept: fn(Ordering) -> bool,
) -> Result<Value> {
    if args.is_empty() {
        return Ok(Value::Boolean(true));
    }
    check_at_least(name, args, 2, CallableKind::Function)?;

    let mut previous = string_arg(name, args, 0)?;
    for index in 1..args.len() {
        let current = string_arg(name, args, index)?;
        if !accept(previous.cmp(current)) {
            return Ok(Value::Boolean(false));
        }
        previous = current;
    }
    Ok(Value::Boolean(true))
}

fn string_less(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    compare_chain("string<?", args, Ordering::is_lt)
}

fn string_less_equal(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    compare_chain("string<=?", args, Ordering::is_le)
}

fn string_greater(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    compare_chain("string>?", args, Ordering::is_gt)
}

fn string_greater_equal(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    compare_chain("string>=?", args, Ordering::is_ge)
}

fn string_equal(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    compare_chain("string=?", args, Ordering::is_eq)
}
