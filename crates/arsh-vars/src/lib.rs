//! arsh-vars: Shell variable storage.
//!
//! Provides:
//! - **VarStore**: the minimal `get`/`set`/`exists` interface through which
//!   the arithmetic engine (and anything else) reads and writes variables
//! - **Scope**: a frame-stacked string variable store with positional
//!   parameters, suitable for function-local resolution
//!
//! The engine is a thin client of `VarStore`. Embedders adapt their own
//! storage layer by implementing the trait; a plain
//! `HashMap<String, String>` works out of the box for tests and small tools.

use std::collections::HashMap;

/// Minimal variable storage interface.
///
/// Shell variables are untyped strings. Numeric interpretation is the
/// caller's concern; this trait only moves strings in and out.
pub trait VarStore {
    /// Look up a variable by name.
    fn get(&self, name: &str) -> Option<String>;

    /// Store a variable, creating it if absent.
    fn set(&mut self, name: &str, value: &str);

    /// Check whether a variable exists without reading it.
    fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl VarStore for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) {
        self.insert(name.to_string(), value.to_string());
    }

    fn exists(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

/// Variable scope with nested frames and positional parameters.
///
/// Variables are looked up from innermost to outermost frame. Writes go to
/// the innermost frame that already binds the name, falling back to the
/// innermost frame for new names. That gives `x += 1` inside a function the
/// shell behavior of updating the caller's `x` unless it was shadowed.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Stack of variable frames. Last element is the innermost scope.
    frames: Vec<HashMap<String, String>>,
    /// Script or function name ($0).
    script_name: String,
    /// Positional arguments ($1..).
    positional: Vec<String>,
}

impl Scope {
    /// Create a new scope with one empty frame.
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
            script_name: String::new(),
            positional: Vec::new(),
        }
    }

    /// Push a new scope frame (entering a function body, a subshell, etc.)
    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pop the innermost scope frame.
    ///
    /// Panics if attempting to pop the last frame.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        } else {
            panic!("cannot pop the root scope frame");
        }
    }

    /// Bind a variable in the innermost frame, shadowing any outer binding.
    pub fn set_local(&mut self, name: impl Into<String>, value: impl Into<String>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), value.into());
        }
    }

    /// Remove a variable, searching from innermost to outermost frame.
    ///
    /// Returns the removed value if found, None otherwise.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        for frame in self.frames.iter_mut().rev() {
            if let Some(value) = frame.remove(name) {
                return Some(value);
            }
        }
        None
    }

    /// Drop every binding in every frame, keeping the frame structure.
    pub fn clear(&mut self) {
        for frame in &mut self.frames {
            frame.clear();
        }
    }

    /// Set the positional parameters ($0 and $1..).
    pub fn set_positional(&mut self, script_name: impl Into<String>, args: Vec<String>) {
        self.script_name = script_name.into();
        self.positional = args;
    }

    /// Get a positional parameter by index.
    ///
    /// Index 0 returns the script name, 1.. return arguments.
    pub fn get_positional(&self, n: usize) -> Option<&str> {
        if n == 0 {
            if self.script_name.is_empty() {
                None
            } else {
                Some(&self.script_name)
            }
        } else {
            self.positional.get(n - 1).map(|s| s.as_str())
        }
    }

    /// Get the count of positional arguments ($#).
    pub fn arg_count(&self) -> usize {
        self.positional.len()
    }

    /// Get all variables as sorted (name, value) pairs.
    ///
    /// Variables are deduplicated, with inner frames shadowing outer ones.
    pub fn all(&self) -> Vec<(String, String)> {
        let mut merged = HashMap::new();
        // Iterate outer to inner so inner frames override
        for frame in &self.frames {
            for (name, value) in frame {
                merged.insert(name.clone(), value.clone());
            }
        }
        let mut pairs: Vec<_> = merged.into_iter().collect();
        pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
        pairs
    }
}

impl VarStore for Scope {
    fn get(&self, name: &str) -> Option<String> {
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.get(name) {
                return Some(value.clone());
            }
        }
        None
    }

    fn set(&mut self, name: &str, value: &str) {
        for frame in self.frames.iter_mut().rev() {
            if let Some(slot) = frame.get_mut(name) {
                *slot = value.to_string();
                return;
            }
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), value.to_string());
        }
    }

    fn exists(&self, name: &str) -> bool {
        self.frames.iter().any(|f| f.contains_key(name))
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
