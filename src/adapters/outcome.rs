use crate::domain::ports::{Latency, OutcomeStrategy};
use async_trait::async_trait;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Coin flip backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOutcome;

impl OutcomeStrategy for RandomOutcome {
    fn approve(&self, success_rate: f64) -> bool {
        rand::thread_rng().gen_bool(success_rate.clamp(0.0, 1.0))
    }

    fn token(&self, len: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..len)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect()
    }
}

/// Deterministic tokens: a zero-padded base-36 counter.
#[derive(Debug, Default)]
struct CountingTokens(AtomicU64);

impl CountingTokens {
    fn next(&self, len: usize) -> String {
        let mut n = self.0.fetch_add(1, Ordering::Relaxed) + 1;
        let mut digits = Vec::new();
        while n > 0 {
            digits.push(BASE36[(n % 36) as usize] as char);
            n /= 36;
        }
        let encoded: String = digits.into_iter().rev().collect();
        if encoded.len() >= len {
            encoded[encoded.len() - len..].to_string()
        } else {
            format!("{}{}", "0".repeat(len - encoded.len()), encoded)
        }
    }
}

/// Always approves or always declines.
#[derive(Debug, Default)]
pub struct FixedOutcome {
    approve: bool,
    tokens: CountingTokens,
}

impl FixedOutcome {
    pub fn approving() -> Self {
        Self {
            approve: true,
            tokens: CountingTokens::default(),
        }
    }

    pub fn declining() -> Self {
        Self {
            approve: false,
            tokens: CountingTokens::default(),
        }
    }
}

impl OutcomeStrategy for FixedOutcome {
    fn approve(&self, _success_rate: f64) -> bool {
        self.approve
    }

    fn token(&self, len: usize) -> String {
        self.tokens.next(len)
    }
}

/// Plays back a fixed list of answers; the last one repeats once the script runs out.
#[derive(Debug)]
pub struct ScriptedOutcome {
    answers: Mutex<VecDeque<bool>>,
    last: Mutex<bool>,
    tokens: CountingTokens,
}

impl ScriptedOutcome {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        let answers: VecDeque<bool> = answers.into_iter().collect();
        let last = answers.back().copied().unwrap_or(true);
        Self {
            answers: Mutex::new(answers),
            last: Mutex::new(last),
            tokens: CountingTokens::default(),
        }
    }
}

impl OutcomeStrategy for ScriptedOutcome {
    fn approve(&self, _success_rate: f64) -> bool {
        let next = self
            .answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front());
        match next {
            Some(answer) => {
                if let Ok(mut last) = self.last.lock() {
                    *last = answer;
                }
                answer
            }
            None => self.last.lock().map(|last| *last).unwrap_or(true),
        }
    }

    fn token(&self, len: usize) -> String {
        self.tokens.next(len)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLatency;

#[async_trait]
impl Latency for TokioLatency {
    async fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

#[async_trait]
impl Latency for NoLatency {
    async fn wait(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_token_is_base36() {
        let token = RandomOutcome.token(9);
        assert_eq!(token.len(), 9);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_random_outcome_respects_certain_rates() {
        assert!(RandomOutcome.approve(1.0));
        assert!(!RandomOutcome.approve(0.0));
    }

    #[test]
    fn test_fixed_outcome_tokens_are_distinct() {
        let outcome = FixedOutcome::approving();
        assert!(outcome.approve(0.0));
        assert_eq!(outcome.token(4), "0001");
        assert_eq!(outcome.token(4), "0002");
        assert!(!FixedOutcome::declining().approve(1.0));
    }

    #[test]
    fn test_scripted_outcome_repeats_last_answer() {
        let outcome = ScriptedOutcome::new([false, true]);
        assert!(!outcome.approve(0.9));
        assert!(outcome.approve(0.9));
        assert!(outcome.approve(0.9));
    }
}
