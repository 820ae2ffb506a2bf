//! Operand resolution against the variable store.
//!
//! This module is the engine's only contact with variable storage. Reading
//! an unset variable creates it with the value `"0"` (auto-vivification,
//! matching POSIX shells where a mere read in arithmetic context makes the
//! variable exist). Non-numeric stored values parse leniently to 0 rather
//! than erroring.

use arsh_vars::VarStore;

use crate::context::Operand;

/// Resolve an operand to a concrete integer.
pub(crate) fn resolve(vars: &mut dyn VarStore, operand: &Operand) -> i64 {
    match operand {
        Operand::Literal(v) => *v,
        Operand::Var(name) => resolve_name(vars, name),
    }
}

/// Resolve a variable by name, auto-vivifying it if absent.
pub(crate) fn resolve_name(vars: &mut dyn VarStore, name: &str) -> i64 {
    if !vars.exists(name) {
        vars.set(name, "0");
        return 0;
    }
    vars.get(name).map(|raw| lenient_parse(&raw)).unwrap_or(0)
}

/// Serialize as canonical decimal and store.
pub(crate) fn write_back(vars: &mut dyn VarStore, name: &str, value: i64) {
    vars.set(name, &value.to_string());
}

fn lenient_parse(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn literal_resolves_to_itself() {
        let mut vars: HashMap<String, String> = HashMap::new();
        assert_eq!(resolve(&mut vars, &Operand::Literal(-7)), -7);
    }

    #[test]
    fn unset_variable_auto_vivifies() {
        let mut vars: HashMap<String, String> = HashMap::new();
        assert_eq!(resolve(&mut vars, &Operand::Var("y".into())), 0);
        assert!(vars.exists("y"));
        assert_eq!(VarStore::get(&vars, "y"), Some("0".to_string()));
    }

    #[test]
    fn stored_value_is_parsed() {
        let mut vars: HashMap<String, String> = HashMap::new();
        vars.set("x", " 42 ");
        assert_eq!(resolve_name(&mut vars, "x"), 42);
        vars.set("neg", "-9");
        assert_eq!(resolve_name(&mut vars, "neg"), -9);
    }

    #[test]
    fn non_numeric_value_defaults_to_zero() {
        let mut vars: HashMap<String, String> = HashMap::new();
        vars.set("greeting", "hello");
        assert_eq!(resolve_name(&mut vars, "greeting"), 0);
        // The stored value is untouched by a read
        assert_eq!(VarStore::get(&vars, "greeting"), Some("hello".to_string()));
    }

    #[test]
    fn write_back_stores_canonical_decimal() {
        let mut vars: HashMap<String, String> = HashMap::new();
        write_back(&mut vars, "x", -31);
        assert_eq!(VarStore::get(&vars, "x"), Some("-31".to_string()));
    }
}
