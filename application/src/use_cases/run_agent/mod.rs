//! Run Agent use case
//!
//! Drives the bounded model/tool loop of [`AgentState`]:
//!
//! 1. Send the system prompt, conversation and tool schemas to the model.
//! 2. A text-only answer finishes the run; an empty response finishes it
//!    with nothing to do.
//! 3. Otherwise record the model turn, run each requested tool in the order
//!    emitted, one at a time, and append `Function result: <text>` per call.
//! 4. After `max_iterations` rounds without an answer the run is exhausted.
//!
//! Only model-boundary failures end a run early, and they are not retried.

mod types;

pub use types::{RunAgentError, RunAgentInput, RunAgentOutput};

use crate::config::ExecutionParams;
use crate::ports::agent_progress::{AgentProgressNotifier, NoAgentProgress};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::model_gateway::ModelGateway;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use confine_domain::{
    AgentOutcome, AgentPromptTemplate, AgentState, Conversation, Message, ToolCall, ToolResult,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Use case for running the agent loop
pub struct RunAgentUseCase<G: ModelGateway + 'static, T: ToolExecutorPort + 'static> {
    gateway: Arc<G>,
    tool_executor: Arc<T>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
    params: ExecutionParams,
}

impl<G: ModelGateway + 'static, T: ToolExecutorPort + 'static> Clone for RunAgentUseCase<G, T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_executor: self.tool_executor.clone(),
            tool_schema: self.tool_schema.clone(),
            conversation_logger: self.conversation_logger.clone(),
            params: self.params.clone(),
        }
    }
}

impl<G: ModelGateway + 'static, T: ToolExecutorPort + 'static> RunAgentUseCase<G, T> {
    pub fn new(gateway: Arc<G>, tool_executor: Arc<T>, tool_schema: Arc<dyn ToolSchemaPort>) -> Self {
        Self {
            gateway,
            tool_executor,
            tool_schema,
            conversation_logger: Arc::new(NoConversationLogger),
            params: ExecutionParams::default(),
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    /// Run without progress reporting
    pub async fn execute(&self, input: RunAgentInput) -> Result<RunAgentOutput, RunAgentError> {
        self.execute_with_progress(input, &NoAgentProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: RunAgentInput,
        progress: &dyn AgentProgressNotifier,
    ) -> Result<RunAgentOutput, RunAgentError> {
        let max_iterations = self.params.max_iterations;
        let spec = self.tool_executor.tool_spec();
        let system_prompt = AgentPromptTemplate::agent_system(spec);
        let tools = self.tool_schema.all_tools_schema(spec);

        info!(
            model = %self.gateway.model_name(),
            root = %input.root,
            tools = tools.len(),
            max_iterations,
            "Starting agent run"
        );

        let mut conversation = Conversation::seeded(input.prompt);
        let mut state = AgentState::start();
        let mut iterations = 0;

        loop {
            state = state.begin_round(max_iterations);
            let AgentState::AwaitingModel(completed) = state else {
                break;
            };
            iterations = completed + 1;
            progress.on_iteration_start(iterations, max_iterations);

            let started = Instant::now();
            let response = match self
                .gateway
                .generate(&system_prompt, &conversation, &tools)
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    warn!(iteration = iterations, error = %err, "Model request failed");
                    return Err(err.into());
                }
            };

            let tool_calls = response.tool_calls();
            debug!(
                iteration = iterations,
                tool_calls = tool_calls.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Model responded"
            );
            self.conversation_logger.log(ConversationEvent::new(
                "model_response",
                json!({
                    "iteration": iterations,
                    "text": response.text_content(),
                    "tool_calls": tool_calls.iter().map(|c| c.tool_name.as_str()).collect::<Vec<_>>(),
                }),
            ));
            progress.on_model_response(iterations, tool_calls.len());

            state = state.on_response(&response);
            if !matches!(state, AgentState::Running(_)) {
                continue;
            }

            conversation.push(Message::model(response.render_for_history()));
            for call in &tool_calls {
                let result = self.run_tool(&input.root, call, progress).await;
                conversation.push_function_result(&result.to_model_text());
            }
        }

        let outcome = state.outcome().unwrap_or(AgentOutcome::Exhausted);
        match &outcome {
            AgentOutcome::Completed(text) => {
                info!(iterations, "Agent produced a final answer");
                progress.on_final_answer(text);
            }
            AgentOutcome::NothingToDo => info!(iterations, "Model returned nothing to do"),
            AgentOutcome::Exhausted => {
                warn!(iterations, "Reached maximum iterations without a final answer")
            }
        }

        Ok(RunAgentOutput {
            outcome,
            iterations,
            conversation,
        })
    }

    async fn run_tool(
        &self,
        root: &confine_domain::WorkingRoot,
        call: &ToolCall,
        progress: &dyn AgentProgressNotifier,
    ) -> ToolResult {
        progress.on_tool_call(call);
        self.conversation_logger.log(ConversationEvent::new(
            "tool_call",
            json!({ "tool": call.tool_name, "args": call.arguments }),
        ));

        let result = self.tool_executor.execute(root, call).await;

        if let Some(err) = result.error() {
            debug!(tool = %call.tool_name, category = %err.category, "Tool call failed");
        }
        self.conversation_logger.log(ConversationEvent::new(
            "tool_result",
            json!({
                "tool": call.tool_name,
                "success": result.is_success(),
                "output": result.to_model_text(),
                "duration_ms": result.metadata.duration_ms,
            }),
        ));
        progress.on_tool_result(&result);
        result
    }
}
