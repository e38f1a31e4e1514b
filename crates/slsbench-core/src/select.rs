//! Single-choice selection capability
//!
//! One operation, `select(label, options)`, shared by hint enrichment and the
//! scenario builder. The terminal implementation lives in the binary; the
//! scripted [`ReplaySelector`] drives every flow in tests.

use crate::error::{SelectError, SelectResult};
use std::collections::VecDeque;
use tracing::debug;

/// A successful choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Position in `options`, always `< options.len()`
    pub index: usize,
    /// Copy of the chosen option
    pub label: String,
}

impl Selection {
    /// Validate `index` against `options`
    pub fn checked(index: usize, options: &[String]) -> SelectResult<Self> {
        options
            .get(index)
            .map(|label| Self {
                index,
                label: label.clone(),
            })
            .ok_or(SelectError::OutOfRange {
                index,
                len: options.len(),
            })
    }
}

/// Pick one of an ordered list of human-readable options
pub trait Selector {
    /// Present `options` under `label` and return the chosen one
    ///
    /// On success `index < options.len()`.
    fn select(&mut self, label: &str, options: &[String]) -> SelectResult<Selection>;
}

impl<S: Selector + ?Sized> Selector for &mut S {
    fn select(&mut self, label: &str, options: &[String]) -> SelectResult<Selection> {
        (**self).select(label, options)
    }
}

impl<S: Selector + ?Sized> Selector for Box<S> {
    fn select(&mut self, label: &str, options: &[String]) -> SelectResult<Selection> {
        (**self).select(label, options)
    }
}

/// Replays a pre-recorded sequence of indices
///
/// Every prompt it answers is kept, so tests can assert on what was asked.
#[derive(Debug, Clone, Default)]
pub struct ReplaySelector {
    script: VecDeque<usize>,
    prompts: Vec<String>,
}

impl ReplaySelector {
    /// Selector answering with `indices`, in order
    #[must_use]
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: indices.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    /// Append more answers
    pub fn push(&mut self, index: usize) {
        self.script.push_back(index);
    }

    /// Answers not yet consumed
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Labels of every prompt seen so far
    #[inline]
    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Selector for ReplaySelector {
    fn select(&mut self, label: &str, options: &[String]) -> SelectResult<Selection> {
        self.prompts.push(label.to_string());
        if options.is_empty() {
            return Err(SelectError::NoOptions);
        }
        let index = self.script.pop_front().ok_or(SelectError::Exhausted)?;
        let selection = Selection::checked(index, options)?;
        debug!(label, choice = %selection.label, "replayed selection");
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn replays_in_order_then_exhausts() {
        let opts = options(&["a", "b", "c"]);
        let mut selector = ReplaySelector::new([2, 0]);

        assert_eq!(selector.select("first", &opts).unwrap().label, "c");
        assert_eq!(selector.select("second", &opts).unwrap().index, 0);
        assert_eq!(selector.select("third", &opts), Err(SelectError::Exhausted));
        assert_eq!(selector.prompts(), ["first", "second", "third"]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut selector = ReplaySelector::new([3]);
        assert_eq!(
            selector.select("pick", &options(&["x", "y"])),
            Err(SelectError::OutOfRange { index: 3, len: 2 })
        );
    }

    #[test]
    fn empty_options_do_not_consume_script() {
        let mut selector = ReplaySelector::new([0]);
        assert_eq!(selector.select("pick", &[]), Err(SelectError::NoOptions));
        assert_eq!(selector.remaining(), 1);
    }

    #[test]
    fn works_through_mutable_reference_and_box() {
        let opts = options(&["only"]);
        let mut inner = ReplaySelector::new([0, 0]);
        {
            let mut by_ref = &mut inner;
            assert!(by_ref.select("r", &opts).is_ok());
        }
        let mut boxed: Box<dyn Selector> = Box::new(inner);
        assert!(boxed.select("b", &opts).is_ok());
    }
}
