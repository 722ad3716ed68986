//! `InterpreterBuilder` for creating `Interpreter` instances.

use std::rc::Rc;

use super::Interpreter;
use crate::bridge::{Bridge, NoBridge};
use crate::diagnostics::CallStack;
use crate::eval_mode::EvalMode;
use crate::print_handler::{console_handler, silent_handler, SharedPrintHandler};

/// Builder for [`Interpreter`].
///
/// Unset collaborators are derived from the mode: `Interpret` prints to the
/// console, `Sandbox` discards output, and the call-depth limit always comes
/// from the mode.
#[derive(Default)]
pub struct InterpreterBuilder {
    bridge: Option<Rc<dyn Bridge>>,
    print_handler: Option<SharedPrintHandler>,
    mode: EvalMode,
}

impl InterpreterBuilder {
    /// A builder in `Interpret` mode with no bridge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the evaluation mode.
    ///
    /// Controls the default print destination, the call-depth limit, and
    /// the per-loop iteration budget.
    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the host bridge used by `require`, attributes and native calls.
    #[must_use]
    pub fn bridge(mut self, bridge: Rc<dyn Bridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Set the destination for `print` and `printerr`. Overrides the mode default.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    pub fn build(self) -> Interpreter {
        let print_handler = self.print_handler.unwrap_or_else(|| {
            if self.mode.allows_io() {
                console_handler()
            } else {
                silent_handler()
            }
        });
        let bridge = self.bridge.unwrap_or_else(|| Rc::new(NoBridge));
        let call_stack = CallStack::new(self.mode.max_call_depth());

        Interpreter {
            bridge,
            print_handler,
            mode: self.mode,
            call_stack,
        }
    }
}
