#![doc = r#"
# glexpr

A small infix expression engine. Expressions are parsed into an abstract
syntax tree that can be evaluated against a named variable environment,
deep-cloned, re-emitted as GLSL source for GPU execution, or handed to an
optional native-code backend.

## Quick start

```rust
use glexpr::engine::interp;

let result = interp("2 + 3 * 4", None).unwrap();
assert_eq!(result, 14.0);
```

## Variables

Variable names are resolved at evaluation time, never at parse time, so one
tree can run against many environments:

```rust
use glexpr::context::EvalContext;
use glexpr::engine::parse;
use glexpr::eval::eval_ast;

let ast = parse("1.0e2 + x * pi").unwrap();

let mut vars = EvalContext::new();
vars.set_parameter("pi", 3.14159);
vars.set_parameter("x", 10.0);
let result = eval_ast(&ast, Some(&vars)).unwrap();
assert!((result - 131.4159).abs() < 1e-3);

vars.set_parameter("x", 0.0);
assert!((eval_ast(&ast, Some(&vars)).unwrap() - 100.0).abs() < 1e-3);
```

## GLSL emission

The same formula can be re-emitted as a GLSL expression or wrapped in a
nullary shader function, with per-dialect rewrites for operators the target
dialect lacks:

```rust
use glexpr::engine::parse;
use glexpr::generator::{Dialect, ShaderGenerator};

let ast = parse("x % 3").unwrap();
let code = ShaderGenerator::new(Dialect::Glsl130)
    .generate_expression(&ast)
    .unwrap();
assert!(code.contains("trunc("));
```

## Language

Numbers (decimal and scientific notation), named variables, the binary
operators `+ - * / ^ %`, unary `+`/`-`, comparisons `== != < <= > >=`,
eager (non-short-circuit) `&&` and `||`, the ternary `?:`, parentheses,
and the built-in functions `sin cos tan sqrt log log2 log10 ceil floor`
(one argument) and `min max pow` (two arguments). Function names are
reserved and shadow variables of the same name. There is no implicit
multiplication: `2x` is a lexical error.

Operator precedence, from loosest to tightest binding: `?:`, `||`, `&&`,
`== !=`, `< <= > >=`, binary `+ -`, `* / %`, `^` (right-associative),
unary `+ -`.

## Scalar precision

The engine computes in a single scalar type selected at build time through
the mutually exclusive `f32` (default) and `f64` features. With the
default-on `libm` feature the built-in functions route through the `libm`
crate; without it they use the std float methods.
"#]

pub mod context;
pub mod engine;
pub mod error;
pub mod eval;
pub mod functions;
pub mod generator;
pub mod jit;
pub mod lexer;
pub mod types;

pub use context::EvalContext;
pub use engine::{interp, parse};
pub use error::{ExprError, Result};
pub use eval::{eval_ast, Evaluator};
pub use generator::{Dialect, ShaderGenerator};
pub use jit::{codegen_lock, compile_serialized, CompiledFn, NativeBackend};
pub use types::{AstExpr, AstVisitor};

// Compile-time check: exactly one scalar precision must be selected.
#[cfg(all(feature = "f32", feature = "f64"))]
compile_error!("You must enable only one of the features: 'f32' or 'f64', not both.");
#[cfg(not(any(feature = "f32", feature = "f64")))]
compile_error!("You must enable one of the features: 'f32' or 'f64'.");

/// The scalar domain of the engine, selected by the `f32`/`f64` features.
#[cfg(feature = "f32")]
pub type Real = f32;

/// The scalar domain of the engine, selected by the `f32`/`f64` features.
#[cfg(feature = "f64")]
pub type Real = f64;

pub mod constants {
    use super::Real;

    #[cfg(feature = "f32")]
    pub const PI: Real = core::f32::consts::PI;
    #[cfg(feature = "f32")]
    pub const E: Real = core::f32::consts::E;
    #[cfg(feature = "f32")]
    pub const TEST_PRECISION: Real = 1e-6;

    #[cfg(feature = "f64")]
    pub const PI: Real = core::f64::consts::PI;
    #[cfg(feature = "f64")]
    pub const E: Real = core::f64::consts::E;
    #[cfg(feature = "f64")]
    pub const TEST_PRECISION: Real = 1e-10;
}

/// Utility macro to check if two floating point values are approximately
/// equal within a specified epsilon. NaN compares equal to NaN and
/// same-signed infinities compare equal, which is what the agreement tests
/// need when an expression overflows identically on both sides.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $crate::constants::TEST_PRECISION)
    };
    ($left:expr, $right:expr, $epsilon:expr $(,)?) => {{
        let left_val: $crate::Real = $left;
        let right_val: $crate::Real = $right;
        let eps: $crate::Real = $epsilon;

        if left_val.is_nan() && right_val.is_nan() {
            // NaN == NaN for our purposes
        } else if left_val.is_infinite()
            && right_val.is_infinite()
            && left_val.signum() == right_val.signum()
        {
            // Same-signed infinities are equal
        } else {
            assert!(
                (left_val - right_val).abs() < eps,
                "assertion failed: `(left ≈ right)` (left: `{}`, right: `{}`, epsilon: `{}`)",
                left_val,
                right_val,
                eps
            );
        }
    }};
}
