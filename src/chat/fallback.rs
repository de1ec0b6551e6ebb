// src/chat/fallback.rs
//! Canned replies used when the gateway cannot produce one

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::core::config_manager::FallbackConfig;
use crate::types::ChatResponse;

pub const FALLBACK_REPLIES: &[&str] = &[
    "I'm having trouble reaching my knowledge service right now. In the meantime, I can still help you think through a job description or interview plan. Could you try again in a moment?",
    "Sorry, I couldn't process that request just now. Please try again shortly, or ask me about resumes, interviews or open roles.",
    "I'm temporarily unable to generate a full answer. While I recover, feel free to browse the resume listings or refine your hiring question.",
    "Apologies, something went wrong on my side. Let's get back to hiring: what role or candidate can I help you with?",
];

/// How a reply is drawn from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPicker {
    Random,
    Seeded(u64),
}

enum Selector {
    Random,
    Seeded(Mutex<StdRng>),
}

pub struct FallbackResponder {
    replies: Vec<String>,
    selector: Selector,
}

impl FallbackResponder {
    /// An empty `replies` list uses the built-in pool.
    pub fn new(replies: Vec<String>, picker: FallbackPicker) -> Self {
        let replies = if replies.is_empty() {
            FALLBACK_REPLIES.iter().map(|r| r.to_string()).collect()
        } else {
            replies
        };

        let selector = match picker {
            FallbackPicker::Random => Selector::Random,
            FallbackPicker::Seeded(seed) => Selector::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        };

        Self { replies, selector }
    }

    pub fn from_config(config: &FallbackConfig) -> Self {
        let picker = match config.seed {
            Some(seed) => FallbackPicker::Seeded(seed),
            None => FallbackPicker::Random,
        };
        Self::new(config.replies.clone(), picker)
    }

    /// Never fails.
    pub fn respond(&self) -> ChatResponse {
        let index = self.pick_index();
        ChatResponse::assistant(self.replies[index].clone())
    }

    fn pick_index(&self) -> usize {
        let len = self.replies.len();
        match &self.selector {
            Selector::Random => rand::rng().random_range(0..len),
            Selector::Seeded(rng) => match rng.lock() {
                Ok(mut rng) => rng.random_range(0..len),
                // A poisoned lock still holds a usable generator.
                Err(poisoned) => poisoned.into_inner().random_range(0..len),
            },
        }
    }
}
