//! Intent Routing
//!
//! An ordered table of `(predicate, intent)` pairs evaluated top to bottom;
//! first hit wins, and the final rule always matches. One place to read the
//! chat loop's routing instead of substring checks scattered through it.

/// What the chat loop should do with an input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// End the session.
    Exit,
    /// Social nicety, answered locally.
    Greeting,
    /// Capability overview, answered locally.
    Help,
    /// Current time, answered locally.
    CurrentTime,
    /// Anything else is treated as a market question.
    MarketQuery,
}

/// One routing rule.
struct IntentRule {
    intent: Intent,
    matches: fn(&str) -> bool,
}

/// Ordered routing table.
pub struct IntentTable {
    rules: Vec<IntentRule>,
}

impl Default for IntentTable {
    fn default() -> Self {
        Self {
            rules: vec![
                IntentRule { intent: Intent::Exit, matches: is_exit },
                IntentRule { intent: Intent::Greeting, matches: is_greeting },
                IntentRule { intent: Intent::Help, matches: is_help },
                IntentRule { intent: Intent::CurrentTime, matches: is_time },
                // Catch-all; must stay last.
                IntentRule { intent: Intent::MarketQuery, matches: |_| true },
            ],
        }
    }
}

impl IntentTable {
    /// Classify one input line. Deterministic: same input, same intent.
    pub fn classify(&self, input: &str) -> Intent {
        let normalized = input.trim().to_lowercase();
        self.rules
            .iter()
            .find(|rule| (rule.matches)(&normalized))
            .map_or(Intent::MarketQuery, |rule| rule.intent)
    }
}

fn is_exit(input: &str) -> bool {
    matches!(input, "exit" | "quit" | "bye" | "goodbye" | "q")
}

fn is_greeting(input: &str) -> bool {
    matches!(input, "hi" | "hello" | "hey" | "howdy" | "yo")
}

fn is_help(input: &str) -> bool {
    matches!(input, "help" | "?" | "what can you do")
}

fn is_time(input: &str) -> bool {
    matches!(input, "time" | "current time" | "what time is it")
}
