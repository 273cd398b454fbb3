//! Test doubles shared by the engine's unit tests: a scripted generator and
//! an in-memory store with injectable failures.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use confab_types::agent::{Agent, AgentId, Network, NetworkId};
use confab_types::error::StoreError;
use confab_types::generate::{
    GenerateError, GenerationOutput, GenerationRequest, ANSWER_FIELD, REASONING_FIELD,
};
use confab_types::memory::MemoryEntry;

use crate::agent::directory::{AgentDirectory, DEFAULT_INSTRUCTIONS};
use crate::generate::LanguageGenerator;
use crate::memory::MemoryStore;

#[derive(Default)]
struct Script {
    queued: VecDeque<Result<GenerationOutput, GenerateError>>,
    always: Option<String>,
}

/// A generator whose outputs are scripted per task.
///
/// Queued results are consumed first; after that, the `always` answer (if
/// set) is returned indefinitely. Calling an unscripted task is an
/// `InvalidRequest` error, which doubles as a stand-in for transport
/// failure in tests. All requests are recorded for call counting.
#[derive(Default)]
pub(crate) struct ScriptedGenerator {
    scripts: Mutex<HashMap<String, Script>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call to `task` (after any queued results) answers `answer`.
    pub fn always(self, task: &str, answer: &str) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(task.to_string())
            .or_default()
            .always = Some(answer.to_string());
        self
    }

    /// Queue a one-shot answer for `task`.
    pub fn enqueue_answer(self, task: &str, answer: &str) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(task.to_string())
            .or_default()
            .queued
            .push_back(Ok(GenerationOutput::new()
                .with_field(REASONING_FIELD, "scripted")
                .with_field(ANSWER_FIELD, answer)));
        self
    }

    /// Queue a one-shot error for `task`.
    pub fn enqueue_error(self, task: &str, error: GenerateError) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(task.to_string())
            .or_default()
            .queued
            .push_back(Err(error));
        self
    }

    /// Queue a one-shot raw output for `task` (e.g. missing fields).
    pub fn enqueue_output(self, task: &str, output: GenerationOutput) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(task.to_string())
            .or_default()
            .queued
            .push_back(Ok(output));
        self
    }

    /// Number of recorded calls for `task`.
    pub fn calls_for(&self, task: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.task == task)
            .count()
    }

    /// All recorded requests, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LanguageGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, GenerateError> {
        self.requests.lock().unwrap().push(request.clone());

        let mut scripts = self.scripts.lock().unwrap();
        let Some(script) = scripts.get_mut(&request.task) else {
            return Err(GenerateError::InvalidRequest(format!(
                "unscripted task '{}'",
                request.task
            )));
        };
        if let Some(result) = script.queued.pop_front() {
            return result;
        }
        match &script.always {
            Some(answer) => Ok(GenerationOutput::new()
                .with_field(REASONING_FIELD, "scripted")
                .with_field(ANSWER_FIELD, answer)),
            None => Err(GenerateError::InvalidRequest(format!(
                "script for task '{}' exhausted",
                request.task
            ))),
        }
    }
}

/// Arc wrapper so a test can keep a handle on its scripted double after
/// handing it to `BoxGenerator` (which takes ownership).
pub(crate) struct SharedGenerator(pub std::sync::Arc<ScriptedGenerator>);

impl LanguageGenerator for SharedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, GenerateError> {
        self.0.generate(request).await
    }
}

/// In-memory store double implementing both ports, with per-operation
/// failure injection.
#[derive(Default)]
pub(crate) struct MemStore {
    agents: Mutex<HashMap<AgentId, Agent>>,
    memories: Mutex<HashMap<AgentId, Vec<MemoryEntry>>>,
    networks: Mutex<HashMap<NetworkId, Network>>,
    pub fail_recall: AtomicBool,
    pub fail_append: AtomicBool,
    pub fail_set_instructions: AtomicBool,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent directly (bypassing the directory).
    pub fn add_agent(&self, id: &str, instructions: &str, toxicity_policy: Option<&str>) -> Agent {
        let agent = Agent {
            id: AgentId::new(id),
            network_id: NetworkId::new("net-test"),
            instructions: instructions.to_string(),
            toxicity_policy: toxicity_policy.map(str::to_string),
            created_at: Utc::now(),
        };
        self.agents
            .lock()
            .unwrap()
            .insert(agent.id.clone(), agent.clone());
        agent
    }

    pub fn add_memory(&self, id: &str, content: &str) {
        let agent_id = AgentId::new(id);
        self.memories
            .lock()
            .unwrap()
            .entry(agent_id.clone())
            .or_default()
            .push(MemoryEntry::new(agent_id, content, false));
    }

    pub fn instructions_of(&self, id: &str) -> Option<String> {
        self.agents
            .lock()
            .unwrap()
            .get(&AgentId::new(id))
            .map(|a| a.instructions.clone())
    }

    pub fn memories_of(&self, id: &str) -> Vec<MemoryEntry> {
        self.memories
            .lock()
            .unwrap()
            .get(&AgentId::new(id))
            .cloned()
            .unwrap_or_default()
    }
}

impl MemoryStore for MemStore {
    async fn recall(
        &self,
        agent_id: &AgentId,
        _query: Option<&str>,
    ) -> Result<Vec<MemoryEntry>, StoreError> {
        if self.fail_recall.load(Ordering::SeqCst) {
            return Err(StoreError::Query("injected recall failure".to_string()));
        }
        Ok(self
            .memories
            .lock()
            .unwrap()
            .get(agent_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(
        &self,
        agent_id: &AgentId,
        content: &str,
        toxicity_flag: bool,
    ) -> Result<(), StoreError> {
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(StoreError::Query("injected append failure".to_string()));
        }
        self.memories
            .lock()
            .unwrap()
            .entry(agent_id.clone())
            .or_default()
            .push(MemoryEntry::new(agent_id.clone(), content, toxicity_flag));
        Ok(())
    }

    async fn instructions(&self, agent_id: &AgentId) -> Result<Option<String>, StoreError> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .get(agent_id)
            .map(|a| a.instructions.clone()))
    }

    async fn set_instructions(&self, agent_id: &AgentId, text: &str) -> Result<(), StoreError> {
        if self.fail_set_instructions.load(Ordering::SeqCst) {
            return Err(StoreError::Query(
                "injected set_instructions failure".to_string(),
            ));
        }
        let mut agents = self.agents.lock().unwrap();
        let agent = agents.get_mut(agent_id).ok_or(StoreError::AgentNotFound)?;
        agent.instructions = text.to_string();
        Ok(())
    }
}

impl AgentDirectory for MemStore {
    async fn create_network(&self, network: &Network) -> Result<(), StoreError> {
        self.networks
            .lock()
            .unwrap()
            .insert(network.id.clone(), network.clone());
        Ok(())
    }

    async fn create_agent(&self, network_id: &NetworkId) -> Result<Agent, StoreError> {
        let mut agents = self.agents.lock().unwrap();
        let agent = Agent {
            id: AgentId::new(format!("agent-{}", agents.len() + 1)),
            network_id: network_id.clone(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            toxicity_policy: None,
            created_at: Utc::now(),
        };
        agents.insert(agent.id.clone(), agent.clone());
        Ok(agent)
    }

    async fn get_agent(&self, agent_id: &AgentId) -> Result<Option<Agent>, StoreError> {
        Ok(self.agents.lock().unwrap().get(agent_id).cloned())
    }
}
