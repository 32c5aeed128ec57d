//! Chat Session
//!
//! The assistant itself: intent routing, the snapshot pipeline, optional LLM
//! narration, and the interactive loop. Every completed turn lands in the
//! memory log, which is re-persisted after each exchange.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;

use assistant_core::{
    AssistantError, Conversation, GenerationOptions, Intent, IntentTable, LlmProvider, MemoryLog,
    Message,
};
use market_analysis::{MarketAnalyst, MARKET_NARRATOR_PROMPT};

const GREETING_REPLY: &str =
    "Hello! Ask me about any asset - try \"btc price\" or \"how is tesla doing\".";

const HELP_REPLY: &str = "I can pull a technical snapshot (price, RSI, trend, stop-loss and \
take-profit band) for:\n\
  - crypto: bitcoin, ethereum, solana, dogecoin, ...\n\
  - stocks: apple, tesla, microsoft, nvidia, ...\n\
  - commodities: gold, silver, oil\n\
  - forex: eurusd, usdinr\n\
Just name the asset. Type 'exit' to end the session.";

const FAREWELL_REPLY: &str = "Goodbye! Trade safe.";

/// One assistant reply.
pub struct Reply {
    pub text: String,
    pub end_session: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            end_session: false,
        }
    }
}

/// The conversational assistant.
///
/// Narration is optional: without a reachable LLM provider the assistant
/// still answers market queries with the raw snapshot summary.
pub struct Assistant {
    analyst: MarketAnalyst,
    provider: Option<Arc<dyn LlmProvider>>,
    options: GenerationOptions,
    intents: IntentTable,
}

impl Assistant {
    pub fn new(
        analyst: MarketAnalyst,
        provider: Option<Arc<dyn LlmProvider>>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            analyst,
            provider,
            options,
            intents: IntentTable::default(),
        }
    }

    /// Handle one input line and record the completed turn.
    pub async fn respond(&self, input: &str, log: &mut MemoryLog) -> Reply {
        let reply = match self.intents.classify(input) {
            Intent::Exit => Reply {
                text: FAREWELL_REPLY.into(),
                end_session: true,
            },
            Intent::Greeting => Reply::text(GREETING_REPLY),
            Intent::Help => Reply::text(HELP_REPLY),
            Intent::CurrentTime => {
                Reply::text(format!("It is {} UTC.", Utc::now().format("%H:%M:%S")))
            }
            Intent::MarketQuery => Reply::text(self.market_reply(input).await),
        };

        log.record(input, &reply.text);
        reply
    }

    async fn market_reply(&self, input: &str) -> String {
        let summary = match self.analyst.analyze(input).await {
            Ok(analysis) => analysis.summary(),
            Err(err) => {
                tracing::warn!(query = input, error = %err, "snapshot pipeline failed");
                return err.unavailable_message();
            }
        };

        let Some(provider) = &self.provider else {
            return summary;
        };

        match self.narrate(provider.as_ref(), input, &summary).await {
            Ok(narrated) => narrated,
            Err(err) => {
                tracing::warn!(error = %err, "narration failed, showing raw summary");
                summary
            }
        }
    }

    /// Ask the LLM to restate the snapshot conversationally. The summary is
    /// prompt input only; the model never feeds anything back into the
    /// pipeline.
    async fn narrate(
        &self,
        provider: &dyn LlmProvider,
        question: &str,
        summary: &str,
    ) -> Result<String, AssistantError> {
        let mut conversation = Conversation::with_system_prompt(MARKET_NARRATOR_PROMPT);
        conversation.push(Message::user(format!(
            "Question: {question}\n\nTechnical snapshot:\n{summary}"
        )));

        let mut stream = provider
            .complete_stream(conversation.messages(), &self.options)
            .await?;

        let mut content = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            content.push_str(&chunk.delta);
            if chunk.done {
                break;
            }
        }

        if content.trim().is_empty() {
            return Err(AssistantError::Provider("empty narration".into()));
        }

        Ok(content)
    }
}

/// Interactive loop: read a line, respond, persist the memory log, repeat.
pub async fn run(assistant: &Assistant, memory_path: &Path) -> anyhow::Result<()> {
    let mut log = MemoryLog::load_or_new(memory_path);

    println!("Ask about any asset (crypto, stocks, gold, forex).");
    println!("Type 'help' for examples, 'exit' to quit.\n");

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let reply = assistant.respond(input, &mut log).await;
        println!("assistant> {}\n", reply.text);

        if let Err(err) = log.persist(memory_path) {
            tracing::warn!(path = %memory_path.display(), error = %err, "failed to persist memory log");
        }

        if reply.end_session {
            break;
        }
    }

    Ok(())
}
