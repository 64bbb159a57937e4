//! Special forms, registered as macro-kind callables.
//!
//! These receive their arguments unevaluated and decide themselves
//! what to evaluate and where. `let` is the one form flagged to run
//! against a fresh child of the caller's scope, which keeps its
//! bindings contained.

use crate::builtins::{check_at_least, check_between, check_exact, shape_error, symbol_value};
use crate::callable::{Callable, CallableKind};
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::eval::{eval_condition, safe_eval};
use crate::list::unpack_list_rest;
use crate::value::Value;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

static LAMBDA_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn register(env: &Rc<Environment>) {
    env.define("quote", Value::callable(Callable::macro_form(quote_form)));
    env.define("if", Value::callable(Callable::macro_form(if_form)));
    env.define("cond", Value::callable(Callable::macro_form(cond_form)));
    env.define("and", Value::callable(Callable::macro_form(and_form)));
    env.define("or", Value::callable(Callable::macro_form(or_form)));
    env.define("not", Value::callable(Callable::macro_form(not_form)));
    env.define("let", Value::callable(Callable::scoped_macro(let_form)));
    env.define("lambda", Value::callable(Callable::macro_form(lambda_form)));
    env.define("define", Value::callable(Callable::macro_form(define_form)));
    env.define(
        "define-macro",
        Value::callable(Callable::macro_form(define_macro_form)),
    );
    env.define("set!", Value::callable(Callable::macro_form(set_form)));
    env.define(
        "set-car!",
        Value::callable(Callable::macro_form(set_car_form)),
    );
    env.define(
        "set-cdr!",
        Value::callable(Callable::macro_form(set_cdr_form)),
    );
    env.define("eval", Value::callable(Callable::macro_form(eval_form)));
}

fn quote_form(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("quote", args, 1, CallableKind::Macro)?;
    Ok(args[0].clone())
}

fn if_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_between("if", args, 2, 3, CallableKind::Macro)?;
    if eval_condition(&args[0], env)? {
        safe_eval(&args[1], env)
    } else if args.len() == 3 {
        safe_eval(&args[2], env)
    } else {
        Ok(Value::Nil)
    }
}

fn cond_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    for branch in args {
        let (items, tail) = unpack_list_rest(branch);
        if items.len() != 2 || !tail.is_nil() {
            return Err(shape_error(
                CallableKind::Macro,
                format!("cond: expected (test action) branch, got {}", branch),
            ));
        }
        if eval_condition(&items[0], env)? {
            return safe_eval(&items[1], env);
        }
    }
    Ok(Value::Nil)
}

fn and_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    let mut result = Value::Boolean(true);
    for arg in args {
        if !result.is_truthy() {
            break;
        }
        result = safe_eval(arg, env)?;
    }
    Ok(result)
}

fn or_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    let mut result = Value::Boolean(false);
    for arg in args {
        if result.is_truthy() {
            break;
        }
        result = safe_eval(arg, env)?;
    }
    Ok(result)
}

fn not_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("not", args, 1, CallableKind::Macro)?;
    Ok(Value::Boolean(!eval_condition(&args[0], env)?))
}

/// `(let ((name expr) ...) body ...)`. Binding expressions run in the
/// outer scope (`env` is a transparent child of the caller), so the
/// bindings are parallel, not sequential.
fn let_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_at_least("let", args, 1, CallableKind::Macro)?;

    let local = Environment::with_parent(env.clone());
    let (bindings, bindings_tail) = unpack_list_rest(&args[0]);
    if !bindings_tail.is_nil() {
        return Err(shape_error(
            CallableKind::Macro,
            "let: bindings must be a proper list".to_string(),
        ));
    }
    for binding in &bindings {
        let (pair, tail) = unpack_list_rest(binding);
        if pair.len() != 2 || !tail.is_nil() {
            return Err(shape_error(
                CallableKind::Macro,
                format!("let: expected (name expr) binding, got {}", binding),
            ));
        }
        let name = symbol_value("let", &pair[0], CallableKind::Macro)?;
        let value = safe_eval(&pair[1], env)?;
        local.define(name, value);
    }

    let mut result = Value::Nil;
    for expression in &args[1..] {
        result = safe_eval(expression, &local)?;
    }
    Ok(result)
}

/// Splits a formals spine into positional names and an optional rest
/// name taken from a dotted tail.
fn parse_formals(name: &str, formals: &Value) -> Result<(Vec<String>, Option<String>)> {
    let (items, tail) = unpack_list_rest(formals);
    let mut params = Vec::with_capacity(items.len());
    for item in &items {
        params.push(symbol_value(name, item, CallableKind::Macro)?);
    }
    let rest = if tail.is_nil() {
        None
    } else {
        Some(symbol_value(name, &tail, CallableKind::Macro)?)
    };
    Ok((params, rest))
}

fn lambda_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_at_least("lambda", args, 2, CallableKind::Macro)?;

    let (params, rest) = parse_formals("lambda", &args[0])?;
    let number = LAMBDA_COUNTER.fetch_add(1, Ordering::Relaxed);
    Ok(Value::callable(Callable::user(
        format!("<lambda#{}>", number),
        params,
        rest,
        args[1..].to_vec(),
        env.clone(),
        CallableKind::Function,
    )))
}

/// The shared body of `(define (name . formals) body...)` and
/// `(define-macro (name . formals) body...)`.
fn define_callable(
    form: &str,
    env: &Rc<Environment>,
    args: &[Value],
    kind: CallableKind,
) -> Result<Value> {
    let Some(header) = args[0].as_pair() else {
        return Err(shape_error(
            CallableKind::Macro,
            format!("{}: expected (name . formals) header, got {}", form, args[0]),
        ));
    };

    let name = symbol_value(form, &header.car(), CallableKind::Macro)?;
    let (params, rest) = parse_formals(form, &header.cdr())?;

    let callable = Value::callable(Callable::user(
        name.clone(),
        params,
        rest,
        args[1..].to_vec(),
        env.clone(),
        kind,
    ));
    env.define(name, callable.clone());
    Ok(callable)
}

fn define_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_at_least("define", args, 2, CallableKind::Macro)?;

    if let Some(name) = args[0].as_symbol() {
        check_exact("define", args, 2, CallableKind::Macro)?;
        let value = safe_eval(&args[1], env)?;
        env.define(name.to_string(), value.clone());
        Ok(value)
    } else {
        define_callable("define", env, args, CallableKind::Function)
    }
}

fn define_macro_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_at_least("define-macro", args, 1, CallableKind::Macro)?;
    define_callable("define-macro", env, args, CallableKind::Macro)?;
    Ok(Value::Nil)
}

fn set_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("set!", args, 2, CallableKind::Macro)?;
    let name = symbol_value("set!", &args[0], CallableKind::Macro)?;
    let value = safe_eval(&args[1], env)?;
    env.assign(&name, value)?;
    Ok(Value::Nil)
}

fn set_slot(
    form: &str,
    env: &Rc<Environment>,
    args: &[Value],
    set_car: bool,
) -> Result<Value> {
    check_exact(form, args, 2, CallableKind::Macro)?;
    let name = symbol_value(form, &args[0], CallableKind::Macro)?;

    let target = env.lookup(&name)?;
    let Some(pair) = target.as_pair() else {
        return Err(Error::execution(format!(
            "Variable of {} must be a pair",
            form
        )));
    };

    let value = safe_eval(&args[1], env)?;
    if set_car {
        pair.set_car(value);
    } else {
        pair.set_cdr(value);
    }
    Ok(target.clone())
}

fn set_car_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    set_slot("set-car!", env, args, true)
}

fn set_cdr_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    set_slot("set-cdr!", env, args, false)
}

/// Evaluates its argument, then evaluates the result again.
fn eval_form(env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("eval", args, 1, CallableKind::Macro)?;
    let once = safe_eval(&args[0], env)?;
    safe_eval(&once, env)
}
