//! Task catalogue: the fixed generation contracts the engine invokes.
//!
//! Each task pairs a stable name with a description of what the generator
//! is being asked to do and a builder that assembles the named input fields.
//! Every task requests a reasoning trace alongside its answer-class field.

use confab_types::generate::GenerationRequest;

/// Casual user-facing chat.
pub const USER_CHAT_TASK: &str = "chat";
const USER_CHAT_DESCRIPTION: &str = "Your task is to be a casual texting buddy of the user. \
You can ask questions, provide answers, or just chat. \
You must follow the settings/instructions given to you.";

/// One turn of an agent-to-agent exchange.
pub const AGENT_EXCHANGE_TASK: &str = "agent-exchange";
const AGENT_EXCHANGE_DESCRIPTION: &str = "Exchange information with another agent, following \
the instructions provided. Do not make up any information or experiences. \
Find commonalities and relevant things in your memory retrieval based on what \
the other agent asks you.";

/// Strict grounding judgment on a candidate answer.
pub const RELEVANCE_TASK: &str = "relevance-check";
const RELEVANCE_DESCRIPTION: &str = "Decide strictly whether the response makes sense. It must \
address the prompt, and it must be consistent with the retrieved memories \
without fabricating anything beyond them. \
Answer with 'Yes' if the response is relevant to the prompt and the memories, \
otherwise answer with 'No'.";

/// Transcript-to-memory summarization.
pub const SUMMARY_TASK: &str = "summarize";
const SUMMARY_DESCRIPTION: &str = "Summarize the chat history in a single descriptive paragraph, \
written in first person from my perspective, about what was discussed and with whom. \
Do not omit any named people, places, or topics mentioned in the chat history.";

/// Toxicity judgment against an agent's policy.
pub const TOXICITY_TASK: &str = "toxicity-check";
const TOXICITY_DESCRIPTION: &str = "Check the toxicity of the content and return 'Yes' if it is \
toxic, otherwise return 'No'. The content should not include anything that is \
off limits according to the policy.";

/// Build a user-chat request.
pub fn user_chat(settings_context: &str, prompt: &str) -> GenerationRequest {
    GenerationRequest::new(USER_CHAT_TASK, USER_CHAT_DESCRIPTION)
        .with_input("settings_context", settings_context)
        .with_input("prompt", prompt)
}

/// Build an agent-exchange request grounded in retrieved memories.
pub fn agent_exchange(
    settings_context: &str,
    prompt: &str,
    retrieved_memories: &str,
) -> GenerationRequest {
    GenerationRequest::new(AGENT_EXCHANGE_TASK, AGENT_EXCHANGE_DESCRIPTION)
        .with_input("settings_context", settings_context)
        .with_input("prompt", prompt)
        .with_input("memory_retrieval", retrieved_memories)
}

/// Build a relevance-check request. The answer field carries the Yes/No token.
pub fn relevance_check(
    prompt: &str,
    response: &str,
    retrieved_memories: &str,
) -> GenerationRequest {
    GenerationRequest::new(RELEVANCE_TASK, RELEVANCE_DESCRIPTION)
        .with_input("prompt", prompt)
        .with_input("response", response)
        .with_input("retrieved_memories", retrieved_memories)
}

/// Build a summarize request over a rendered transcript.
pub fn summarize(chat_history: &str) -> GenerationRequest {
    GenerationRequest::new(SUMMARY_TASK, SUMMARY_DESCRIPTION)
        .with_input("chat_history", chat_history)
}

/// Build a toxicity-check request against a policy.
pub fn toxicity_check(content: &str, policy: &str) -> GenerationRequest {
    GenerationRequest::new(TOXICITY_TASK, TOXICITY_DESCRIPTION)
        .with_input("content", content)
        .with_input("policy", policy)
}
