//! Chat service: runs the agent and picks what to send back.

use menubot_engine::{Agent, AgentResult};
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::services::gate;

/// Reply when the agent produced neither an answer nor an observation.
pub const NO_ANSWER: &str = "Agent couldn't find a valid answer.";

/// Reply when the agent or provider failed.
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again later.";

/// Chooses the reply text: the final answer, else the first tool observation.
pub fn select_reply(result: AgentResult) -> Option<String> {
    let observation = result.first_observation().map(String::from);
    result.output.filter(|o| !o.trim().is_empty()).or(observation)
}

/// Gates the input, invokes the agent and maps the outcome to a reply.
pub async fn answer(agent: &dyn Agent, input: &str) -> Result<String, AppError> {
    if !gate::is_menu_related(input) {
        info!("Input rejected by keyword gate");
        return Ok(gate::REFUSAL.to_string());
    }

    let result = agent.invoke(input).await.map_err(|e| {
        error!("Error during agent execution: {}", e);
        AppError::Internal(APOLOGY.into())
    })?;

    debug!("Agent full response: {:?}", result);

    select_reply(result).ok_or_else(|| {
        warn!("Agent produced no answer and no tool observation");
        AppError::Internal(NO_ANSWER.into())
    })
}
