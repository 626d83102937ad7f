//! Speech recognizers

use crate::error::SpeechError;
use crate::recognition::Recognition;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::debug;

/// Captures one utterance from the listener.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self) -> Result<Recognition, SpeechError>;

    fn name(&self) -> &str;
}

/// Reads one line from stdin per recognition. EOF and blank lines are not understood.
#[derive(Debug, Default)]
pub struct ConsoleRecognizer;

impl ConsoleRecognizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpeechRecognizer for ConsoleRecognizer {
    async fn recognize(&self) -> Result<Recognition, SpeechError> {
        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            let read = std::io::stdin().read_line(&mut line)?;
            Ok::<_, std::io::Error>(if read == 0 { None } else { Some(line) })
        })
        .await
        .map_err(|e| SpeechError::Recognition(format!("stdin reader failed: {}", e)))??;

        Ok(Recognition::from_input(line))
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Answers from a queue, then `NotUnderstood` once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    answers: Mutex<VecDeque<Recognition>>,
}

impl ScriptedRecognizer {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(
                answers
                    .into_iter()
                    .map(|answer| Recognition::from_input(Some(answer.into())))
                    .collect(),
            ),
        }
    }

    pub fn push(&self, recognition: Recognition) {
        self.answers.lock().push_back(recognition);
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().len()
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn recognize(&self) -> Result<Recognition, SpeechError> {
        let next = self.answers.lock().pop_front();
        debug!("Scripted recognition: {:?}", next);
        Ok(next.unwrap_or(Recognition::NotUnderstood))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_answers_then_not_understood() {
        let recognizer = ScriptedRecognizer::new(["台北101", ""]);
        recognizer.push(Recognition::Heard("公車".to_string()));

        assert_eq!(recognizer.recognize().await.unwrap(), Recognition::Heard("台北101".to_string()));
        assert_eq!(recognizer.recognize().await.unwrap(), Recognition::NotUnderstood);
        assert_eq!(recognizer.recognize().await.unwrap(), Recognition::Heard("公車".to_string()));
        assert_eq!(recognizer.remaining(), 0);
        assert_eq!(recognizer.recognize().await.unwrap(), Recognition::NotUnderstood);
    }
}
