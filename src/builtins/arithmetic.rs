//! Arithmetic over doubles: `+`, `-`, `*`, `/`.
//!
//! `+` and `*` are n-ary with identities 0 and 1. `-` and `/` need at
//! least one argument; with exactly one they negate or take the
//! reciprocal. Division by zero follows IEEE-754 and produces
//! infinities or NaN rather than an error.

use crate::builtins::number_arg;
use crate::callable::Callable;
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::value::Value;
use std::rc::Rc;

pub fn register(env: &Rc<Environment>) {
    env.define("+", Value::callable(Callable::function(add)));
    env.define("-", Value::callable(Callable::function(sub)));
    env.define("*", Value::callable(Callable::function(mul)));
    env.define("/", Value::callable(Callable::function(div)));
}

fn add(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    let mut sum = 0.0;
    for index in 0..args.len() {
        sum += number_arg("+", args, index)?;
    }
    Ok(Value::Number(sum))
}

fn mul(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    let mut product = 1.0;
    for index in 0..args.len() {
        product *= number_arg("*", args, index)?;
    }
    Ok(Value::Number(product))
}

fn sub(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    if args.is_empty() {
        return Err(Error::execution("- requires at least one argument"));
    }
    let first = number_arg("-", args, 0)?;
    if args.len() == 1 {
        return Ok(Value::Number(-first));
    }
    let mut result = first;
    for index in 1..args.len() {
        result -= number_arg("-", args, index)?;
    }
    Ok(Value::Number(result))
}

fn div(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    if args.is_empty() {
        return Err(Error::execution("/ requires at least one argument"));
    }
    let first = number_arg("/", args, 0)?;
    if args.len() == 1 {
        return Ok(Value::Number(1.0 / first));
    }
    let mut result = first;
    for index in 1..args.len() {
        result /= number_arg("/", args, index)?;
    }
    Ok(Value::Number(result))
}
