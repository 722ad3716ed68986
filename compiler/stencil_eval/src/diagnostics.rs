//! Call frame tracking for function application.
//!
//! Each user or anonymous function call pushes a frame. The stack enforces
//! the mode's depth limit and turns into a backtrace when an error escapes
//! a call.

use crate::errors::{recursion_limit_exceeded, EvalBacktrace, EvalError};

#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<String>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` of `None` means unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame for `name`. The frame is not pushed when the limit is hit.
    pub fn push(&mut self, name: &str) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(name.to_owned());
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop on empty stack");
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Snapshot, most recent call first.
    pub fn capture(&self) -> EvalBacktrace {
        EvalBacktrace::new(self.frames.iter().rev().cloned().collect())
    }

    /// Attach a backtrace unless the error already carries one from a deeper frame.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.frames.is_empty() || err.backtrace.is_some() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{divide_by_zero, ErrorCode};
    use pretty_assertions::assert_eq;

    #[test]
    fn push_respects_limit() {
        let mut stack = CallStack::new(Some(2));
        assert!(stack.push("a").is_ok());
        assert!(stack.push("b").is_ok());
        let err = stack.push("c").err();
        assert_eq!(err.map(|e| e.code()), Some(ErrorCode::RecursionLimit));
        assert_eq!(stack.depth(), 2);

        stack.pop();
        assert!(stack.push("c").is_ok());
    }

    #[test]
    fn unlimited_stack() {
        let mut stack = CallStack::default();
        for _ in 0..10_000 {
            assert!(stack.push("f").is_ok());
        }
        assert_eq!(stack.depth(), 10_000);
    }

    #[test]
    fn backtrace_is_most_recent_first() {
        let mut stack = CallStack::default();
        assert!(stack.push("outer").is_ok());
        assert!(stack.push("inner").is_ok());

        let err = stack.attach_backtrace(divide_by_zero());
        let frames = err.backtrace.as_ref().map(|b| b.frames().to_vec());
        assert_eq!(frames, Some(vec!["inner".to_string(), "outer".to_string()]));

        // A second attach keeps the deepest backtrace.
        stack.pop();
        let err = stack.attach_backtrace(err);
        assert_eq!(err.backtrace.map(|b| b.frames().len()), Some(2));
    }

    #[test]
    fn empty_stack_attaches_nothing() {
        let err = CallStack::default().attach_backtrace(divide_by_zero());
        assert!(err.backtrace.is_none());
    }
}
