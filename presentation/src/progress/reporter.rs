//! Progress reporting for agent runs

use crate::output::console::ConsoleFormatter;
use confine_application::AgentProgressNotifier;
use confine_domain::{ToolCall, ToolResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Prints each round, tool call and tool result as the run progresses,
/// with a spinner while the model is thinking.
pub struct ConsoleProgress {
    spinner: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            quiet: false,
        }
    }

    /// Only iteration headers and tool calls; no spinner, no results
    pub fn quiet() -> Self {
        Self {
            spinner: Mutex::new(None),
            quiet: true,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_spinner(&self, message: String) {
        if self.quiet {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(previous) = slot.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentProgressNotifier for ConsoleProgress {
    fn on_iteration_start(&self, iteration: usize, max_iterations: usize) {
        println!("{}", ConsoleFormatter::iteration(iteration));
        self.start_spinner(format!("Waiting for model ({}/{})", iteration, max_iterations));
    }

    fn on_model_response(&self, _iteration: usize, _tool_calls: usize) {
        self.stop_spinner();
    }

    fn on_tool_call(&self, call: &ToolCall) {
        self.stop_spinner();
        println!("{}", ConsoleFormatter::tool_call(call));
    }

    fn on_tool_result(&self, result: &ToolResult) {
        if !self.quiet {
            println!("{}", ConsoleFormatter::tool_result(result));
        }
    }

    fn on_final_answer(&self, _text: &str) {
        self.stop_spinner();
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}
