//! Interactive terminal selection

use dialoguer::Select;
use slsbench_core::{SelectError, SelectResult, Selection, Selector};
use std::io::ErrorKind;

/// Arrow-key single select on the controlling terminal
///
/// Escape or `q` abandons the prompt as [`SelectError::Interrupted`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSelector;

impl TerminalSelector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Selector for TerminalSelector {
    fn select(&mut self, label: &str, options: &[String]) -> SelectResult<Selection> {
        if options.is_empty() {
            return Err(SelectError::NoOptions);
        }
        let chosen = Select::new()
            .with_prompt(label)
            .items(options)
            .default(0)
            .interact_opt()
            .map_err(|err| match err {
                dialoguer::Error::IO(io) if io.kind() == ErrorKind::Interrupted => {
                    SelectError::Interrupted
                }
                other => SelectError::Backend(other.to_string()),
            })?;
        match chosen {
            Some(index) => Selection::checked(index, options),
            None => Err(SelectError::Interrupted),
        }
    }
}
