//! In-memory collaborators for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use kleinbot_types::error::{DeliveryError, SpeechError};
use kleinbot_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};
use kleinbot_types::messenger::SendRequest;
use kleinbot_types::session::UserId;
use kleinbot_types::speech::AudioClip;

use crate::llm::LlmProvider;
use crate::messenger::Messenger;
use crate::speech::SpeechSynthesizer;

/// Returns a fixed completion (or fails) and records every request.
pub struct MockLlm {
    reply: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl LlmProvider for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Some(content) => Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: content.clone(),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            }),
            None => Err(LlmError::Provider {
                message: "mock failure".to_string(),
            }),
        }
    }
}

/// Records outbound messages; sends and uploads can be made to fail.
#[derive(Default)]
pub struct MockMessenger {
    fail_send: bool,
    fail_upload: bool,
    first_name: Option<String>,
    fail_profile: bool,
    sent: Mutex<Vec<SendRequest>>,
    uploads: AtomicUsize,
    profile_lookups: AtomicUsize,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn failing_profile(mut self) -> Self {
        self.fail_profile = true;
        self
    }

    pub fn with_first_name(mut self, name: &str) -> Self {
        self.first_name = Some(name.to_string());
        self
    }

    pub fn sent(&self) -> Vec<SendRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn profile_lookups(&self) -> usize {
        self.profile_lookups.load(Ordering::SeqCst)
    }
}

impl Messenger for MockMessenger {
    async fn send(&self, request: &SendRequest) -> Result<(), DeliveryError> {
        if self.fail_send {
            return Err(DeliveryError::Status {
                status: 500,
                body: "mock".to_string(),
            });
        }
        self.sent.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn upload_audio(&self, _clip: &AudioClip) -> Result<String, DeliveryError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload {
            return Err(DeliveryError::Transport("mock upload failure".to_string()));
        }
        Ok("att-1".to_string())
    }

    async fn first_name(&self, _user: &UserId) -> Result<Option<String>, DeliveryError> {
        self.profile_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_profile {
            return Err(DeliveryError::Transport("mock profile failure".to_string()));
        }
        Ok(self.first_name.clone())
    }
}

/// Produces a tiny clip, or fails when `fail` is set.
#[derive(Default)]
pub struct MockSpeech {
    fail: bool,
    calls: AtomicUsize,
}

impl MockSpeech {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, _text: &str) -> Result<AudioClip, SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SpeechError::NotConfigured);
        }
        Ok(AudioClip::mp3(vec![0x49, 0x44, 0x33]))
    }
}
