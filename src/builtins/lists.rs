//! Pair primitives: `cons`, `car`, `cdr`.

use crate::builtins::{check_exact, pair_arg};
use crate::callable::{Callable, CallableKind};
use crate::env::Environment;
use crate::error::Result;
use crate::value::Value;
use std::rc::Rc;

pub fn register(env: &Rc<Environment>) {
    env.define("cons", Value::callable(Callable::function(cons)));
    env.define("car", Value::callable(Callable::function(car)));
    env.define("cdr", Value::callable(Callable::function(cdr)));
}

fn cons(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("cons", args, 2, CallableKind::Function)?;
    Ok(Value::cons(args[0].clone(), args[1].clone()))
}

fn car(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("car", args, 1, CallableKind::Function)?;
    Ok(pair_arg("car", args, 0)?.car())
}

fn cdr(_env: &Rc<Environment>, args: &[Value]) -> Result<Value> {
    check_exact("cdr", args, 1, CallableKind::Function)?;
    Ok(pair_arg("cdr", args, 0)?.cdr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_cons_car_cdr_round_trip() {
        let env = Environment::new();
        let pair = cons(&env, &[Value::Number(1.0), Value::Number(2.0)]).unwrap();
        assert_eq!(car(&env, &[pair.clone()]).unwrap(), Value::Number(1.0));
        assert_eq!(cdr(&env, &[pair]).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_car_of_non_pair_is_execution_error() {
        let env = Environment::new();
        assert!(matches!(
            car(&env, &[Value::Nil]),
            Err(Error::Execution(_))
        ));
        assert!(matches!(
            cdr(&env, &[Value::Number(1.0)]),
            Err(Error::Execution(_))
        ));
    }

    #[test]
    fn test_arity() {
        let env = Environment::new();
        assert!(cons(&env, &[Value::Number(1.0)]).is_err());
        assert!(car(&env, &[]).is_err());
    }
}
