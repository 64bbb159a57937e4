//! Chained numeric comparisons: `<`, `<=`, `>`, `>=`, `=`.
//!
//! Zero arguments give `#t`, one argument is an arity error, and more
//! are compared pairwise left to right. The chain stops at the first
//! failing link, so arguments past it are never type-checked.

use crate::builtins::{check_at_least, number_arg};
use crate::callable::{Callable, CallableKind};
use crate::env::Environment;
use crate::error::Result;
use crate::value::Value;
use std::rc::Rc;

pub fn register(env: &Rc<Environment>) {
    env.define("<", Value::callable(Callable::function(less)));
    env.define("<=", Value::callable(Callable::function(less_equal)));
    env.define(">", Value::callable(Callable::function(greater)));
    env.define(">=", Value::callable(Callable::function(greater_equal)));
    env.define("=", Value::callable(Callable::function(equal)));
}

fn compare_chain(
    name: &str,
    args: &[Value],
    compare: fn(f64, f64) -> bool,
) -> Result<Value> {
    if args.is_empty() {
        return Ok(Value::Boolean(true));
    }
    check_at_least(name, args, 2, CallableKind::Function)?;

    let mut previous = number_arg(name, args, 0)?;
    for index in 1..args.len() {
        let current = number_arg(name, args, index)?;
        if !compare(previous, current) {
            return Ok(Value::Boolean(false));
        }
        previous = current;
    }
    Ok(Value::Boolean(true))
}

fn less(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    compare_chain("<", args, |a, b| a < b)
}

fn less_equal(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    compare_chain("<=", args, |a, b| a <= b)
}

fn greater(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    compare_chain(">", args, |a, b| a > b)
}

fn greater_equal(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    compare_chain(">=", args, |a, b| a >= b)
}

fn equal(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    compare_chain("=", args, |a, b| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn numbers(ns: &[f64]) -> Vec<Value> {
        ns.iter().map(|n| Value::Number(*n)).collect()
    }

    #[test]
    fn test_zero_args_is_true() {
        let env = Environment::new();
        assert_eq!(less(&env, &[]).unwrap(), Value::Boolean(true));
        assert_eq!(equal(&env, &[]).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_single_arg_is_error() {
        let env = Environment::new();
        assert!(matches!(
            less(&env, &numbers(&[1.0])),
            Err(Error::Execution(_))
        ));
    }

    #[test]
    fn test_chained_comparison() {
        let env = Environment::new();
        assert_eq!(
            less(&env, &numbers(&[1.0, 2.0, 3.0])).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            less(&env, &numbers(&[1.0, 3.0, 2.0])).unwrap(),
            Value::Boolean(false)
        );
        assert_eq!(
            less_equal(&env, &numbers(&[1.0, 1.0, 2.0])).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            greater(&env, &numbers(&[3.0, 2.0, 1.0])).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            greater_equal(&env, &numbers(&[3.0, 3.0, 1.0])).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_equality_is_ieee() {
        let env = Environment::new();
        assert_eq!(
            equal(&env, &numbers(&[2.0, 2.0, 2.0])).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            equal(&env, &numbers(&[f64::NAN, f64::NAN])).unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn test_short_circuit_skips_later_type_checks() {
        let env = Environment::new();
        let args = [Value::Number(2.0), Value::Number(1.0), Value::string("x")];
        assert_eq!(less(&env, &args).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_non_number_is_error() {
        let env = Environment::new();
        let args = [Value::Number(1.0), Value::string("x")];
        assert!(less(&env, &args).is_err());
    }
}
