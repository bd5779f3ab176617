//! Collaborator contract for optional native-code backends.
//!
//! The engine itself never generates machine code. An external backend
//! (an LLVM- or Cranelift-style JIT) consumes the tree through
//! [`NativeBackend::compile`] and hands back a nullary function in the
//! scalar domain. Code-generation libraries tend to mutate process-global
//! state, so construction is serialized through [`codegen_lock`];
//! invoking a finished [`CompiledFn`] is thread-safe and takes no lock.

use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::error::Result;
use crate::types::AstExpr;
use crate::Real;

/// A compiled, directly callable form of an expression.
pub type CompiledFn = Box<dyn Fn() -> Real + Send + Sync>;

/// Lowers syntax trees into native functions.
///
/// Implementations must hold [`codegen_lock`] for the whole of code
/// generation; [`compile_serialized`] does that on the caller's behalf.
/// Variable bindings are the backend's concern: it may capture an
/// environment snapshot or wire up live pointers, whichever its consumers
/// need.
pub trait NativeBackend {
    fn compile(&mut self, ast: &AstExpr) -> Result<CompiledFn>;
}

/// Acquire the process-wide lock serializing native code generation.
pub fn codegen_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Compile `ast` with `backend` while holding the code-generation lock.
pub fn compile_serialized<B: NativeBackend>(backend: &mut B, ast: &AstExpr) -> Result<CompiledFn> {
    let _guard = codegen_lock();
    backend.compile(ast)
}
