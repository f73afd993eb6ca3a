use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use sts_backup::restore::Confirmer;

/// Answers every prompt with a fixed line, or fails as if stdin closed
pub struct ScriptedConfirmer {
    answer: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn closed() -> Self {
        Self {
            answer: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn read_answer(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
            .clone()
            .ok_or_else(|| anyhow!("failed to read confirmation: stdin closed"))
    }
}
