//! Evaluation policies.
//!
//! `Interpret` is for trusted templates: console output and no limits
//! beyond what stack growth allows. `Sandbox` is for templates from less
//! trusted sources: output is discarded by default, and both call depth and
//! loop iterations are bounded.

/// Default call depth limit in sandboxed evaluation.
pub const DEFAULT_SANDBOX_CALL_DEPTH: usize = 256;

/// Default per-loop iteration limit in sandboxed evaluation.
pub const DEFAULT_SANDBOX_LOOP_ITERATIONS: u64 = 1_000_000;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    #[default]
    Interpret,
    Sandbox {
        max_call_depth: usize,
        /// Iterations allowed per `while` loop.
        max_loop_iterations: u64,
    },
}

impl EvalMode {
    /// Sandbox with the default limits.
    pub fn sandbox() -> Self {
        Self::Sandbox {
            max_call_depth: DEFAULT_SANDBOX_CALL_DEPTH,
            max_loop_iterations: DEFAULT_SANDBOX_LOOP_ITERATIONS,
        }
    }

    /// Whether `print`/`printerr` reach the console by default.
    #[inline]
    pub fn allows_io(&self) -> bool {
        matches!(self, Self::Interpret)
    }

    /// Maximum user-function call depth, or `None` for unlimited.
    ///
    /// Unlimited still relies on stack growth, so on `wasm32`, where the
    /// stack cannot grow, `Interpret` is bounded too.
    #[inline]
    pub fn max_call_depth(&self) -> Option<usize> {
        match self {
            Self::Interpret => {
                #[cfg(target_arch = "wasm32")]
                {
                    Some(200)
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    None
                }
            }
            Self::Sandbox { max_call_depth, .. } => Some(*max_call_depth),
        }
    }

    /// Iterations allowed per `while` loop, or `None` for unlimited.
    #[inline]
    pub fn loop_budget(&self) -> Option<u64> {
        match self {
            Self::Interpret => None,
            Self::Sandbox {
                max_loop_iterations,
                ..
            } => Some(*max_loop_iterations),
        }
    }
}
