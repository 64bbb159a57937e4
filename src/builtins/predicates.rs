//! Type predicates. All take exactly one argument and return a
//! boolean; `list?` walks the cdr chain to check for a Nil terminator.

use crate::builtins::check_exact;
use crate::callable::{Callable, CallableKind};
use crate::env::Environment;
use crate::error::Result;
use crate::value::Value;
use std::rc::Rc;

pub fn register(env: &Rc<Environment>) {
    env.define("null?", Value::callable(Callable::function(is_null)));
    env.define("cons?", Value::callable(Callable::function(is_cons)));
    env.define("list?", Value::callable(Callable::function(is_list)));
    env.define("number?", Value::callable(Callable::function(is_number)));
    env.define("boolean?", Value::callable(Callable::function(is_boolean)));
    env.define("symbol?", Value::callable(Callable::function(is_symbol)));
    env.define("string?", Value::callable(Callable::function(is_string)));
}

fn is_null(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("null?", args, 1, CallableKind::Function)?;
    Ok(Value::Boolean(args[0].is_nil()))
}

fn is_cons(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("cons?", args, 1, CallableKind::Function)?;
    Ok(Value::Boolean(args[0].as_pair().is_some()))
}

fn is_list(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("list?", args, 1, CallableKind::Function)?;
    let mut tail = args[0].clone();
    loop {
        match tail {
            Value::Nil => return Ok(Value::Boolean(true)),
            Value::Pair(pair) => tail = pair.cdr(),
            _ => return Ok(Value::Boolean(false)),
        }
    }
}

fn is_number(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("number?", args, 1, CallableKind::Function)?;
    Ok(Value::Boolean(args[0].as_number().is_some()))
}

fn is_boolean(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("boolean?", args, 1, CallableKind::Function)?;
    Ok(Value::Boolean(matches!(args[0], Value::Boolean(_))))
}

fn is_symbol(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("symbol?", args, 1, CallableKind::Function)?;
    Ok(Value::Boolean(args[0].as_symbol().is_some()))
}

fn is_string(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("string?", args, 1, CallableKind::Function)?;
    Ok(Value::Boolean(args[0].as_string().is_some()))
}
