//! Fixed-length turn-taking exchange between two agents.
//!
//! `DialogueOrchestrator` runs a bounded number of rounds between a home
//! and an away agent, each backed by its own `ResponseProducer`, chaining
//! prompts (each agent answers the other's most recent answer) into a
//! shared chronological transcript. After the last round the transcript is
//! summarized; persisting the summary is the caller's responsibility.

use confab_types::agent::Agent;
use confab_types::config::EngineConfig;
use confab_types::transcript::Transcript;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::generate::BoxGenerator;
use crate::memory::MemoryStore;

use super::producer::ResponseProducer;
use super::summarizer::ChatSummarizer;
use super::EngineError;

/// The result of a completed dialogue session.
#[derive(Debug, Clone)]
pub struct DialogueOutcome {
    /// First-person summary from the home agent's perspective.
    pub summary: String,
    /// The full session transcript (2 entries per completed round).
    pub transcript: Transcript,
}

/// Drives a fixed number of rounds; no early-exit or convergence detection.
#[derive(Debug, Clone)]
pub struct DialogueOrchestrator {
    rounds: u32,
    max_retries: u32,
    opening_prompt: String,
}

impl DialogueOrchestrator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rounds: config.dialogue_rounds,
            max_retries: config.max_retries,
            opening_prompt: config.opening_prompt.clone(),
        }
    }

    /// Run the full exchange and summarize it.
    ///
    /// Round 0 opens with the fixed opening prompt to the home agent (which
    /// still runs the full retrieval/validation cycle on it); the away
    /// agent then answers the home agent's reply, and every later round
    /// chains each agent's prompt from the other's latest answer.
    ///
    /// Cancellation is observed between turns: a cancelled turn is simply
    /// never produced or appended, prior entries stand, and whatever
    /// transcript exists is summarized. Cancellation before any completed
    /// turn is an error.
    #[tracing::instrument(
        name = "agent_dialogue",
        skip(self, store, generator, home, away, cancel),
        fields(home = %home.id, away = %away.id, rounds = self.rounds)
    )]
    pub async fn run<M: MemoryStore>(
        &self,
        store: &M,
        generator: &BoxGenerator,
        home: &Agent,
        away: &Agent,
        cancel: &CancellationToken,
    ) -> Result<DialogueOutcome, EngineError> {
        let home_producer = ResponseProducer::new(store, generator, self.max_retries);
        let away_producer = ResponseProducer::new(store, generator, self.max_retries);

        let mut transcript = Transcript::new();
        let mut home_prompt = self.opening_prompt.clone();

        for round in 0..self.rounds {
            if cancel.is_cancelled() {
                info!(round, "dialogue cancelled");
                break;
            }
            let home_reply = home_producer
                .respond(&home.id, &home_prompt, &home.instructions)
                .await;
            transcript.push(home.id.clone(), home_prompt.as_str(), &home_reply.answer);
            debug!(round, grounded = home_reply.grounded, "home turn complete");

            if cancel.is_cancelled() {
                info!(round, "dialogue cancelled mid-round");
                break;
            }
            let away_reply = away_producer
                .respond(&away.id, &home_reply.answer, &away.instructions)
                .await;
            transcript.push(away.id.clone(), &home_reply.answer, &away_reply.answer);
            debug!(round, grounded = away_reply.grounded, "away turn complete");

            home_prompt = away_reply.answer;
        }

        if transcript.is_empty() {
            return Err(EngineError::Cancelled);
        }

        let summary = ChatSummarizer::new(generator)
            .summarize(&home.id, &transcript)
            .await?;
        info!(entries = transcript.len(), "dialogue summarized");

        Ok(DialogueOutcome { summary, transcript })
    }
}
