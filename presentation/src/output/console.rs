//! Console output for a finished run

use colored::Colorize;
use confine_application::{RunAgentError, RunAgentOutput};
use confine_domain::{AgentOutcome, ToolCall, ToolResult};

/// Formats progress lines and the final report for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Header printed before each model round
    pub fn iteration(iteration: usize) -> String {
        format!("{}", format!("Iteration {}", iteration).bold())
    }

    /// `Calling function: name(args)`
    pub fn tool_call(call: &ToolCall) -> String {
        format!(
            "{} {}({})",
            "Calling function:".cyan(),
            call.tool_name.bold(),
            call.format_args()
        )
    }

    /// Result text as fed back to the model, failures in red
    pub fn tool_result(result: &ToolResult) -> String {
        let text = result.to_model_text();
        if result.is_success() {
            format!("-> {}", text)
        } else {
            format!("-> {}", text.red())
        }
    }

    /// Final report for a run that ended without a model-boundary failure
    pub fn outcome(output: &RunAgentOutput) -> String {
        match &output.outcome {
            AgentOutcome::Completed(text) => {
                format!("{}\n{}", "Final response:".green().bold(), text)
            }
            AgentOutcome::NothingToDo => "No further actions or response generated."
                .yellow()
                .to_string(),
            AgentOutcome::Exhausted => {
                "Reached maximum iterations without completing the task."
                    .yellow()
                    .to_string()
            }
        }
    }

    /// Report for a run ended by the model boundary
    pub fn error(err: &RunAgentError) -> String {
        match err {
            RunAgentError::RateLimited(message) => format!(
                "{} {}\n{}",
                "Rate limit exceeded:".red().bold(),
                message,
                "Wait a moment and try again.".dimmed()
            ),
            RunAgentError::Gateway(inner) => {
                format!("{} {}", "Error:".red().bold(), inner)
            }
        }
    }

    /// One-line run summary for verbose output
    pub fn summary(output: &RunAgentOutput) -> String {
        format!(
            "{}",
            format!(
                "{} iteration(s), {} tool result(s)",
                output.iterations,
                output.conversation.function_result_count()
            )
            .dimmed()
        )
    }
}
