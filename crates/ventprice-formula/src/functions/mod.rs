//! Whitelisted functions and constants
//!
//! Nothing outside this registry is callable from a formula.

pub mod math;

use crate::error::{FormulaError, FormulaResult};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Function implementation signature
pub type FunctionImpl = fn(&[f64]) -> FormulaResult<f64>;

/// Function definition
pub struct FunctionDef {
    /// Function name as written in formulas
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    /// Check an argument count against the definition.
    pub fn check_arity(&self, actual: usize) -> FormulaResult<()> {
        let fits = actual >= self.min_args && self.max_args.map_or(true, |max| actual <= max);
        if fits {
            return Ok(());
        }

        let expected = match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{} to {}", self.min_args, max),
            None => format!("at least {}", self.min_args),
        };
        Err(FormulaError::ArgumentCount {
            function: self.name.to_string(),
            expected,
            actual,
        })
    }
}

/// Function registry
pub struct FunctionRegistry {
    functions: HashMap<&'static str, FunctionDef>,
}

static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// Global function registry (lazily initialized)
pub fn registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_math_functions();

        registry
    }

    /// Look up a function by name (names are case-sensitive)
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name, def);
    }

    /// Names of every registered function, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn register_math_functions(&mut self) {
        let defs: [(&'static str, usize, Option<usize>, FunctionImpl); 14] = [
            ("sqrt", 1, Some(1), math::fn_sqrt),
            ("pow", 2, Some(2), math::fn_pow),
            ("ceil", 1, Some(1), math::fn_ceil),
            ("floor", 1, Some(1), math::fn_floor),
            ("abs", 1, Some(1), math::fn_abs),
            ("round", 1, Some(2), math::fn_round),
            ("min", 2, None, math::fn_min),
            ("max", 2, None, math::fn_max),
            ("sin", 1, Some(1), math::fn_sin),
            ("cos", 1, Some(1), math::fn_cos),
            ("tan", 1, Some(1), math::fn_tan),
            ("log", 1, Some(2), math::fn_log),
            ("log10", 1, Some(1), math::fn_log10),
            ("exp", 1, Some(1), math::fn_exp),
        ];

        for (name, min_args, max_args, implementation) in defs {
            self.register(FunctionDef {
                name,
                min_args,
                max_args,
                implementation,
            });
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of a named constant (`pi`, `e`)
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}
