use crate::numeric::Number;
use crate::types::{BinaryFunc, Procedure, UnaryFunc, Value};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

// --- Environment Definition ---

#[derive(Debug)]
pub struct Environment {
    // Shared so closures can keep their defining scope alive after the call
    // that created it returns.
    outer: Option<Rc<RefCell<Environment>>>,
    bindings: HashMap<String, Value>,
}

impl Environment {
    /// Creates a new, top-level (global) environment.
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Environment {
            outer: None,
            bindings: HashMap::new(),
        }))
    }

    /// The global scope with `pi`, `+`, `*` and `abs` bound.
    pub fn new_global_populated() -> Rc<RefCell<Environment>> {
        let env_ptr = Environment::new();
        {
            let mut env = env_ptr.borrow_mut();
            env.define(
                "pi".to_string(),
                Value::Number(Number::Double(std::f64::consts::PI)),
            );
            env.add_binary("+", crate::primitives::prim_add);
            env.add_binary("*", crate::primitives::prim_multiply);
            env.add_unary("abs", crate::primitives::prim_abs);
        }
        env_ptr
    }

    /// Creates a new environment enclosed within an outer one.
    pub fn new_enclosed(outer_env: Rc<RefCell<Environment>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Environment {
            outer: Some(outer_env),
            bindings: HashMap::new(),
        }))
    }

    /// Defines a variable in the *current* environment frame.
    /// Replaces the value if the variable already exists in this frame.
    pub fn define(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Looks up a variable's value, walking outward through the chain.
    /// `None` means the symbol is unbound everywhere.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.bindings.get(name) {
            Some(value) => Some(value.clone()),
            None => match &self.outer {
                Some(outer_env_ptr) => outer_env_ptr.borrow().get(name),
                None => None,
            },
        }
    }

    /// Whether `name` is bound in this frame or any enclosing one.
    pub fn contains(&self, name: &str) -> bool {
        if self.bindings.contains_key(name) {
            return true;
        }
        match &self.outer {
            Some(outer_env_ptr) => outer_env_ptr.borrow().contains(name),
            None => false,
        }
    }

    fn add_unary(&mut self, name: &'static str, func: UnaryFunc) {
        self.define(name.to_string(), Value::Procedure(Procedure::Unary(func, name)));
    }

    fn add_binary(&mut self, name: &'static str, func: BinaryFunc) {
        self.define(name.to_string(), Value::Procedure(Procedure::Binary(func, name)));
    }

    /// Gets every identifier visible from this environment
    pub fn get_identifiers(&self) -> HashSet<String> {
        let mut identifiers: HashSet<String> = self.bindings.keys().cloned().collect();
        if let Some(outer_env_ptr) = &self.outer {
            identifiers.extend(outer_env_ptr.borrow().get_identifiers());
        }
        identifiers
    }
}
