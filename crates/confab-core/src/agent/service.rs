//! The inbound service surface consumed by transport layers.
//!
//! `AgentService` owns a store, a generator, and the engine configuration,
//! and exposes the two conversation entry points (`handle_user_chat`,
//! `handle_agent_interaction`) plus agent/network provisioning. Each call
//! is an independent session: no mutable state is shared between calls, so
//! sessions may run fully in parallel against the same store.

use confab_types::agent::{Agent, AgentId, Network, NetworkId};
use confab_types::config::EngineConfig;
use confab_types::error::StoreError;
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::chat::dialogue::DialogueOrchestrator;
use crate::chat::router::UserIntentRouter;
use crate::chat::toxicity::ToxicityChecker;
use crate::generate::BoxGenerator;
use crate::memory::MemoryStore;
use crate::settings::mutator::validate_storage_text;
use crate::settings::SettingsMutator;

use super::directory::AgentDirectory;

pub use crate::chat::EngineError;

/// Conversation engine facade over one store backend and one generator.
pub struct AgentService<S: MemoryStore + AgentDirectory> {
    store: S,
    generator: BoxGenerator,
    config: EngineConfig,
}

impl<S: MemoryStore + AgentDirectory> AgentService<S> {
    pub fn new(store: S, generator: BoxGenerator, config: EngineConfig) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a network grouping.
    pub async fn create_network(
        &self,
        id: NetworkId,
        name: &str,
        description: &str,
    ) -> Result<Network, StoreError> {
        let network = Network {
            id,
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        self.store.create_network(&network).await?;
        info!(network_id = %network.id, "network created");
        Ok(network)
    }

    /// Create a new agent in a network, seeded with default instructions.
    pub async fn create_agent(&self, network_id: &NetworkId) -> Result<Agent, StoreError> {
        let agent = self.store.create_agent(network_id).await?;
        info!(agent_id = %agent.id, network_id = %network_id, "agent created");
        Ok(agent)
    }

    /// Handle one user message for an agent.
    ///
    /// Routes the message; on the mutation route the directive is applied
    /// via `SettingsMutator` and the status is appended to the answer shown
    /// to the user. A failed mutation never fails the turn.
    #[tracing::instrument(name = "user_chat", skip(self, message), fields(agent_id = %agent_id))]
    pub async fn handle_user_chat(
        &self,
        agent_id: &AgentId,
        message: &str,
    ) -> Result<String, EngineError> {
        let instructions = self
            .store
            .instructions(agent_id)
            .await?
            .ok_or_else(|| EngineError::MissingInstructions(agent_id.clone()))?;

        let routed = UserIntentRouter::new(&self.generator)
            .route(message, &instructions)
            .await?;

        if let Some(directive) = routed.mutation_directive {
            let status = SettingsMutator::new(&self.store)
                .apply(agent_id, &directive)
                .await;
            info!(applied = status.is_applied(), "settings mutation handled");
            return Ok(format!(
                "{}\nSettings update status: {status}",
                routed.answer
            ));
        }

        Ok(routed.answer)
    }

    /// Run a full agent-to-agent dialogue session and return its summary.
    ///
    /// The summary is persisted as a new memory for both participants,
    /// toxicity-checked against each agent's own policy. Persistence
    /// failures are logged and never fail the session.
    #[tracing::instrument(
        name = "agent_interaction",
        skip(self),
        fields(agent_id = %agent_id, partner = %partner_agent_id)
    )]
    pub async fn handle_agent_interaction(
        &self,
        agent_id: &AgentId,
        partner_agent_id: &AgentId,
    ) -> Result<String, EngineError> {
        let home = self
            .store
            .get_agent(agent_id)
            .await?
            .ok_or_else(|| EngineError::UnknownAgent(agent_id.clone()))?;
        let away = self
            .store
            .get_agent(partner_agent_id)
            .await?
            .ok_or_else(|| EngineError::UnknownAgent(partner_agent_id.clone()))?;

        let outcome = DialogueOrchestrator::new(&self.config)
            .run(
                &self.store,
                &self.generator,
                &home,
                &away,
                &CancellationToken::new(),
            )
            .await?;

        // Same guard as the instructions path: invalid storage text is
        // never committed, only logged and skipped.
        match validate_storage_text(&outcome.summary) {
            Ok(()) => {
                for agent in [&home, &away] {
                    let toxic = self.judge_toxicity(agent, &outcome.summary).await;
                    if let Err(err) = self.store.append(&agent.id, &outcome.summary, toxic).await {
                        warn!(agent_id = %agent.id, error = %err, "failed to persist dialogue summary");
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "summary rejected by storage validation, not persisted");
            }
        }

        Ok(outcome.summary)
    }

    /// Judge a summary against an agent's toxicity policy.
    ///
    /// Agents without a policy skip the check. A failed check logs and
    /// leaves the flag unset rather than blocking persistence.
    async fn judge_toxicity(&self, agent: &Agent, summary: &str) -> bool {
        let Some(policy) = &agent.toxicity_policy else {
            return false;
        };
        match ToxicityChecker::new(&self.generator)
            .check(summary, policy)
            .await
        {
            Ok(toxic) => toxic,
            Err(err) => {
                warn!(agent_id = %agent.id, error = %err, "toxicity check failed, storing unflagged");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::router::SETTINGS_ACK;
    use crate::generate::task;
    use crate::testing::{MemStore, ScriptedGenerator};

    fn service(scripted: ScriptedGenerator) -> AgentService<MemStore> {
        AgentService::new(
            MemStore::new(),
            BoxGenerator::new(scripted),
            EngineConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_create_agent_issues_monotonic_ids() {
        let svc = service(ScriptedGenerator::new());
        let network_id = NetworkId::new("net-1");
        svc.create_network(network_id.clone(), "Net", "test network")
            .await
            .unwrap();

        let first = svc.create_agent(&network_id).await.unwrap();
        let second = svc.create_agent(&network_id).await.unwrap();
        assert_eq!(first.id.as_str(), "agent-1");
        assert_eq!(second.id.as_str(), "agent-2");
        assert!(!first.instructions.is_empty());
    }

    #[tokio::test]
    async fn test_user_chat_plain_message() {
        let svc = service(ScriptedGenerator::new().always(task::USER_CHAT_TASK, "hey hey!"));
        svc.store().add_agent("agent-1", "Be casual.", None);

        let answer = svc
            .handle_user_chat(&"agent-1".parse().unwrap(), "How's it going?")
            .await
            .unwrap();
        assert_eq!(answer, "hey hey!");
    }

    #[tokio::test]
    async fn test_user_chat_settings_mutation_appends_status() {
        let svc = service(ScriptedGenerator::new());
        svc.store().add_agent("agent-1", "Be casual.", None);

        let answer = svc
            .handle_user_chat(
                &"agent-1".parse().unwrap(),
                "Please update your settings to be more formal",
            )
            .await
            .unwrap();

        assert!(answer.starts_with(SETTINGS_ACK));
        assert!(answer.contains("Settings update status: Success"));

        let stored = svc.store().instructions_of("agent-1").unwrap();
        assert!(stored.starts_with("Be casual."));
        assert!(stored.contains("Please update your settings to be more formal"));
    }

    #[tokio::test]
    async fn test_user_chat_mutation_failure_still_answers() {
        let svc = service(ScriptedGenerator::new());
        svc.store().add_agent("agent-1", "Be casual.", None);
        svc.store()
            .fail_set_instructions
            .store(true, std::sync::atomic::Ordering::SeqCst);

        let answer = svc
            .handle_user_chat(
                &"agent-1".parse().unwrap(),
                "update your settings to use emojis",
            )
            .await
            .unwrap();
        assert!(answer.contains("Settings update status: Failed:"));
    }

    #[tokio::test]
    async fn test_user_chat_unknown_agent_is_error() {
        let svc = service(ScriptedGenerator::new());
        let err = svc
            .handle_user_chat(&"agent-9".parse().unwrap(), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingInstructions(_)));
    }

    #[tokio::test]
    async fn test_agent_interaction_persists_summary_for_both() {
        let svc = service(
            ScriptedGenerator::new()
                .always(task::AGENT_EXCHANGE_TASK, "We both like hiking")
                .always(task::RELEVANCE_TASK, "Yes")
                .always(task::SUMMARY_TASK, "I talked to agent-2 about hiking."),
        );
        svc.store().add_agent("agent-1", "Be curious.", None);
        svc.store().add_agent("agent-2", "Be chatty.", None);

        let summary = svc
            .handle_agent_interaction(&"agent-1".parse().unwrap(), &"agent-2".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(summary, "I talked to agent-2 about hiking.");

        for id in ["agent-1", "agent-2"] {
            let memories = svc.store().memories_of(id);
            assert_eq!(memories.len(), 1, "{id}");
            assert_eq!(memories[0].content, summary);
            assert!(!memories[0].toxicity_flag);
        }
    }

    #[tokio::test]
    async fn test_agent_interaction_flags_toxic_summary() {
        let svc = service(
            ScriptedGenerator::new()
                .always(task::AGENT_EXCHANGE_TASK, "trash talk")
                .always(task::RELEVANCE_TASK, "Yes")
                .always(task::SUMMARY_TASK, "We argued rudely.")
                .always(task::TOXICITY_TASK, "Yes"),
        );
        svc.store()
            .add_agent("agent-1", "Be curious.", Some("no insults"));
        svc.store().add_agent("agent-2", "Be chatty.", None);

        svc.handle_agent_interaction(&"agent-1".parse().unwrap(), &"agent-2".parse().unwrap())
            .await
            .unwrap();

        // Policy-holding agent gets the flag; the other has no policy.
        assert!(svc.store().memories_of("agent-1")[0].toxicity_flag);
        assert!(!svc.store().memories_of("agent-2")[0].toxicity_flag);
    }

    #[tokio::test]
    async fn test_agent_interaction_append_failure_is_tolerated() {
        let svc = service(
            ScriptedGenerator::new()
                .always(task::AGENT_EXCHANGE_TASK, "chit chat")
                .always(task::RELEVANCE_TASK, "Yes")
                .always(task::SUMMARY_TASK, "Small talk."),
        );
        svc.store().add_agent("agent-1", "Be curious.", None);
        svc.store().add_agent("agent-2", "Be chatty.", None);
        svc.store()
            .fail_append
            .store(true, std::sync::atomic::Ordering::SeqCst);

        let summary = svc
            .handle_agent_interaction(&"agent-1".parse().unwrap(), &"agent-2".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(summary, "Small talk.");
    }

    #[tokio::test]
    async fn test_invalid_summary_text_is_not_persisted() {
        let svc = service(
            ScriptedGenerator::new()
                .always(task::AGENT_EXCHANGE_TASK, "chit chat")
                .always(task::RELEVANCE_TASK, "Yes")
                .always(task::SUMMARY_TASK, "bad\0summary"),
        );
        svc.store().add_agent("agent-1", "Be curious.", None);
        svc.store().add_agent("agent-2", "Be chatty.", None);

        let summary = svc
            .handle_agent_interaction(&"agent-1".parse().unwrap(), &"agent-2".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(summary, "bad\0summary");

        // The storage-text guard keeps the NUL-bearing summary out of both
        // agents' memories.
        assert!(svc.store().memories_of("agent-1").is_empty());
        assert!(svc.store().memories_of("agent-2").is_empty());
    }

    #[tokio::test]
    async fn test_agent_interaction_unknown_partner_is_error() {
        let svc = service(ScriptedGenerator::new());
        svc.store().add_agent("agent-1", "Be curious.", None);
        let err = svc
            .handle_agent_interaction(&"agent-1".parse().unwrap(), &"agent-9".parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownAgent(id) if id.as_str() == "agent-9"));
    }

    #[tokio::test]
    async fn test_exhausted_dialogue_still_summarizes() {
        let svc = service(
            ScriptedGenerator::new()
                .always(task::AGENT_EXCHANGE_TASK, "nonsense")
                .always(task::RELEVANCE_TASK, "No")
                .always(task::SUMMARY_TASK, "We failed to connect."),
        );
        svc.store().add_agent("agent-1", "Be curious.", None);
        svc.store().add_agent("agent-2", "Be chatty.", None);

        let summary = svc
            .handle_agent_interaction(&"agent-1".parse().unwrap(), &"agent-2".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(summary, "We failed to connect.");

        // Ungrounded turns still produce a transcript, so the summary memory
        // is recorded as usual.
        assert_eq!(svc.store().memories_of("agent-1").len(), 1);
    }
}
