//! Helpers for walking and building cons-cell spines.

use crate::error::{Error, Result};
use crate::value::Value;

/// Builds a chain of pairs over `items`, terminated by `tail`.
pub fn pack_list(items: &[Value], tail: Value) -> Value {
    items
        .iter()
        .rev()
        .fold(tail, |acc, item| Value::cons(item.clone(), acc))
}

/// Flattens a spine into a vector together with its non-pair tail
/// (`Nil` for a proper list). Never fails.
pub fn unpack_list_rest(list: &Value) -> (Vec<Value>, Value) {
    let mut items = Vec::new();
    let mut tail = list.clone();
    loop {
        match tail {
            Value::Pair(pair) => {
                items.push(pair.car());
                tail = pair.cdr();
            }
            other => return (items, other),
        }
    }
}

/// Flattens a proper list into a vector; a dotted tail is an error.
pub fn unpack_list(list: &Value) -> Result<Vec<Value>> {
    let (items, tail) = unpack_list_rest(list);
    if tail.is_nil() {
        Ok(items)
    } else {
        Err(Error::execution("unexpected list tail"))
    }
}

/// Maps `f` over the cars of a spine, rebuilding the pairs. A non-pair
/// value, including a dotted tail, is passed through `f` itself; `Nil`
/// maps to `Nil`.
pub fn map_list<F>(list: &Value, f: &mut F) -> Result<Value>
where
    F: FnMut(&Value) -> Result<Value>,
{
    match list {
        Value::Nil => Ok(Value::Nil),
        Value::Pair(pair) => {
            let car = f(&pair.car())?;
            let cdr = map_list(&pair.cdr(), f)?;
            Ok(Value::cons(car, cdr))
        }
        other => f(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(ns: &[f64]) -> Vec<Value> {
        ns.iter().map(|n| Value::Number(*n)).collect()
    }

    #[test]
    fn test_pack_empty() {
        assert_eq!(pack_list(&[], Value::Nil), Value::Nil);
    }

    #[test]
    fn test_pack_and_unpack_round_trip() {
        let items = numbers(&[1.0, 2.0, 3.0]);
        let list = pack_list(&items, Value::Nil);
        assert_eq!(unpack_list(&list).unwrap(), items);
    }

    #[test]
    fn test_unpack_dotted_tail_is_error() {
        let dotted = pack_list(&numbers(&[1.0, 2.0]), Value::Number(3.0));
        assert!(unpack_list(&dotted).is_err());
    }

    #[test]
    fn test_unpack_rest_returns_tail() {
        let dotted = pack_list(&numbers(&[1.0, 2.0]), Value::symbol("rest"));
        let (items, tail) = unpack_list_rest(&dotted);
        assert_eq!(items, numbers(&[1.0, 2.0]));
        assert_eq!(tail, Value::symbol("rest"));
    }

    #[test]
    fn test_map_rebuilds_spine() {
        let list = pack_list(&numbers(&[1.0, 2.0, 3.0]), Value::Nil);
        let doubled = map_list(&list, &mut |v| {
            Ok(Value::Number(v.as_number().unwrap() * 2.0))
        })
        .unwrap();
        assert_eq!(doubled, pack_list(&numbers(&[2.0, 4.0, 6.0]), Value::Nil));
    }

    #[test]
    fn test_map_applies_to_dotted_tail() {
        let dotted = pack_list(&numbers(&[1.0]), Value::Number(2.0));
        let mapped = map_list(&dotted, &mut |v| {
            Ok(Value::Number(v.as_number().unwrap() + 10.0))
        })
        .unwrap();
        assert_eq!(mapped, pack_list(&numbers(&[11.0]), Value::Number(12.0)));
    }

    #[test]
    fn test_map_on_atom_returns_mapped_atom() {
        let mapped = map_list(&Value::Number(5.0), &mut |v| {
            Ok(Value::Number(v.as_number().unwrap() + 1.0))
        })
        .unwrap();
        assert_eq!(mapped, Value::Number(6.0));
    }

    #[test]
    fn test_map_propagates_errors() {
        let list = pack_list(&numbers(&[1.0]), Value::Nil);
        let result = map_list(&list, &mut |_| Err(Error::execution("boom")));
        assert!(result.is_err());
    }
}
