use std::sync::{Arc, Mutex};

use bunkmate::caption::generator::{CaptionError, CaptionSource};
use bunkmate::caption::{Caption, CaptionRequest, Mood, TemplateId};

/// Stub collaborator recording every request it receives.
pub struct RecordingCaptionSource {
    requests: Mutex<Vec<CaptionRequest>>,
    fail: bool,
}

impl RecordingCaptionSource {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn requests(&self) -> Vec<CaptionRequest> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }
}

impl CaptionSource for RecordingCaptionSource {
    fn generate(&self, request: &CaptionRequest) -> Result<Caption, CaptionError> {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(*request);
        if self.fail {
            return Err(CaptionError::Http("stubbed outage".to_string()));
        }
        Ok(Caption {
            top_text: format!("ROAST {}/{}", request.attended, request.total),
            bottom_text: "DELIVERED".to_string(),
            mood: Mood::Chill,
            template_id: TemplateId::Buttons,
            advice: "stub".to_string(),
        })
    }
}
