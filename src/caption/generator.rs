//! Caption collaborators: the live Gemini client and its wire parsing.
//!
//! The collaborator is kept behind [`CaptionSource`] so the controller and
//! tests can substitute a deterministic stub; every error surfaced here is
//! recovered by the caller with [`Caption::fallback`].

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::caption::settings::GeneratorSettings;
use crate::caption::{Caption, CaptionRequest, Mood, TemplateId};
use crate::http_client;

const MAX_RESPONSE_BYTES: usize = 256 * 1024;

/// Errors from a caption collaborator.
#[derive(Debug, Error)]
pub enum CaptionError {
    /// No API key was configured anywhere.
    #[error("No API key configured; set BUNKMATE_API_KEY")]
    MissingApiKey,
    /// Transport or HTTP-status failure.
    #[error("HTTP error: {0}")]
    Http(String),
    /// The collaborator answered, but not in the agreed shape.
    #[error("Malformed collaborator response: {0}")]
    Malformed(String),
}

/// Narrow interface over the generative-text collaborator.
pub trait CaptionSource: Send + Sync {
    /// Produce a caption for the given counters.
    ///
    /// Implementations block; the controller runs them on a worker thread.
    fn generate(&self, request: &CaptionRequest) -> Result<Caption, CaptionError>;
}

/// Live collaborator speaking the Gemini `generateContent` REST contract.
pub struct GeminiCaptionSource {
    settings: GeneratorSettings,
}

impl GeminiCaptionSource {
    /// Build a client over resolved settings.
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint, self.settings.model
        )
    }
}

impl CaptionSource for GeminiCaptionSource {
    fn generate(&self, request: &CaptionRequest) -> Result<Caption, CaptionError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(CaptionError::MissingApiKey)?;
        let body = request_body(request).to_string();
        let response = http_client::agent()
            .post(&self.endpoint_url())
            .set("x-goog-api-key", api_key)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|err| CaptionError::Http(err.to_string()))?;
        let bytes = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES)
            .map_err(|err| CaptionError::Http(err.to_string()))?;
        let text = extract_caption_text(&bytes)?;
        parse_caption(&text)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Caption JSON the model is asked to emit inside the envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionPayload {
    top_text: String,
    bottom_text: String,
    mood: Mood,
    template_id: Option<String>,
    #[serde(default)]
    template_advice: Option<String>,
}

fn request_body(request: &CaptionRequest) -> serde_json::Value {
    json!({
        "contents": [{ "parts": [{ "text": build_prompt(request) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
        },
    })
}

fn response_schema() -> serde_json::Value {
    let template_ids: Vec<&str> = TemplateId::ALL.iter().map(|id| id.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "topText": { "type": "STRING" },
            "bottomText": { "type": "STRING" },
            "mood": { "type": "STRING", "enum": ["chill", "panic"] },
            "templateId": { "type": "STRING", "enum": template_ids },
            "templateAdvice": { "type": "STRING" },
        },
        "required": ["topText", "bottomText", "mood", "templateId"],
    })
}

fn build_prompt(request: &CaptionRequest) -> String {
    let percentage = request.percentage();
    let status = if request.is_safe() {
        "SAFE (Above 75%)"
    } else {
        "DANGER (75% or below)"
    };
    format!(
        "Student stats: Attended {attended}/{total} classes ({percentage:.2}%).\n\
         Target: > 75% to be safe.\n\
         \n\
         Current Status: {status}.\n\
         \n\
         Task: Generate a meme concept for this student.\n\
         \n\
         Select a templateId from this list:\n\
         If SAFE (> 75%):\n\
         - 'success' (Success Kid - for winning)\n\
         - 'smart' (Roll Safe - for calculated risks)\n\
         - 'drake' (Drake Approval - for skipping class)\n\
         - 'pauper' (Winnie Pooh Tuxedo - for feeling superior)\n\
         - 'cheers' (Leonardo DiCaprio Cheers - for celebrating)\n\
         - 'buttons' (Two Buttons - hard choice between sleep and class)\n\
         \n\
         If DANGER (<= 75%):\n\
         - 'fine' (This is Fine - burning room)\n\
         - 'panik' (Panik Kalm Panik - high stress)\n\
         - 'clown' (Clown makeup - for making bad choices)\n\
         - 'disaster' (Disaster Girl - burning house)\n\
         - 'sweating' (Jordan Peele Sweating - nervous)\n\
         - 'grave' (Grant Gustin Grave - mourning grades)\n\
         \n\
         Return JSON with:\n\
         - topText: Punchy top text (max 6 words).\n\
         - bottomText: Punchy bottom text (max 6 words).\n\
         - mood: 'chill' or 'panic'.\n\
         - templateId: One of the string IDs listed above.\n\
         - templateAdvice: Brief explanation.",
        attended = request.attended,
        total = request.total,
    )
}

fn extract_caption_text(bytes: &[u8]) -> Result<String, CaptionError> {
    let envelope: GenerateContentResponse = serde_json::from_slice(bytes)
        .map_err(|err| CaptionError::Malformed(err.to_string()))?;
    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| CaptionError::Malformed("No text returned".to_string()))
}

fn parse_caption(text: &str) -> Result<Caption, CaptionError> {
    let payload: CaptionPayload =
        serde_json::from_str(text).map_err(|err| CaptionError::Malformed(err.to_string()))?;
    Ok(Caption {
        top_text: payload.top_text,
        bottom_text: payload.bottom_text,
        mood: payload.mood,
        // Unknown or missing ids degrade to the default template rather
        // than failing the whole caption.
        template_id: payload
            .template_id
            .as_deref()
            .and_then(TemplateId::parse)
            .unwrap_or_default(),
        advice: payload.template_advice.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn request(attended: u32, total: u32) -> CaptionRequest {
        CaptionRequest { attended, total }
    }

    fn serve_once(body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                // Drain the whole POST before answering so the client never
                // sees a reset while it is still writing.
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];
                loop {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(read) => request.extend_from_slice(&buf[..read]),
                    }
                    if request_complete(&request) {
                        break;
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(split) = request.windows(4).position(|window| window == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&request[..split]);
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        request.len() >= split + 4 + content_length
    }

    fn settings_for(endpoint: String) -> GeneratorSettings {
        GeneratorSettings {
            api_key: Some("test-key".to_string()),
            endpoint,
            ..GeneratorSettings::default()
        }
    }

    fn envelope_with_text(text: &str) -> String {
        serde_json::to_string(&json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
        .unwrap()
    }

    #[test]
    fn parses_a_complete_caption() {
        let caption = parse_caption(
            r#"{"topText":"SKIPPED MONDAY","bottomText":"STILL SAFE","mood":"chill","templateId":"drake","templateAdvice":"Approves of bunking"}"#,
        )
        .unwrap();
        assert_eq!(caption.top_text, "SKIPPED MONDAY");
        assert_eq!(caption.bottom_text, "STILL SAFE");
        assert_eq!(caption.mood, Mood::Chill);
        assert_eq!(caption.template_id, TemplateId::Drake);
        assert_eq!(caption.advice, "Approves of bunking");
    }

    #[test]
    fn unknown_template_id_degrades_to_default() {
        let caption = parse_caption(
            r#"{"topText":"A","bottomText":"B","mood":"panic","templateId":"stonks"}"#,
        )
        .unwrap();
        assert_eq!(caption.template_id, TemplateId::Smart);
        assert_eq!(caption.advice, "");
    }

    #[test]
    fn missing_mood_is_malformed() {
        let err = parse_caption(r#"{"topText":"A","bottomText":"B"}"#).unwrap_err();
        assert!(matches!(err, CaptionError::Malformed(_)));
    }

    #[test]
    fn invalid_mood_is_malformed() {
        let err = parse_caption(
            r#"{"topText":"A","bottomText":"B","mood":"angry","templateId":"smart"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CaptionError::Malformed(_)));
    }

    #[test]
    fn empty_candidate_list_is_malformed() {
        let err = extract_caption_text(br#"{"candidates":[]}"#).unwrap_err();
        assert!(matches!(err, CaptionError::Malformed(_)));
    }

    #[test]
    fn first_candidate_text_is_extracted() {
        let body = envelope_with_text(r#"{"ignored":true}"#);
        let text = extract_caption_text(body.as_bytes()).unwrap();
        assert_eq!(text, r#"{"ignored":true}"#);
    }

    #[test]
    fn prompt_carries_counters_percentage_and_status() {
        let prompt = build_prompt(&request(20, 30));
        assert!(prompt.contains("Attended 20/30 classes (66.67%)"));
        assert!(prompt.contains("DANGER (75% or below)"));
        let prompt = build_prompt(&request(24, 30));
        assert!(prompt.contains("(80.00%)"));
        assert!(prompt.contains("SAFE (Above 75%)"));
    }

    #[test]
    fn schema_lists_all_template_ids() {
        let schema = response_schema();
        let ids = schema["properties"]["templateId"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(ids.len(), 12);
        assert!(ids.iter().any(|id| id == "smart"));
        assert!(ids.iter().any(|id| id == "grave"));
    }

    #[test]
    fn missing_api_key_short_circuits() {
        let source = GeminiCaptionSource::new(GeneratorSettings::default());
        let err = source.generate(&request(24, 30)).unwrap_err();
        assert!(matches!(err, CaptionError::MissingApiKey));
    }

    #[test]
    fn generate_round_trips_through_a_local_server() {
        let body = envelope_with_text(
            r#"{"topText":"TOP","bottomText":"BOTTOM","mood":"panic","templateId":"fine","templateAdvice":"x"}"#,
        );
        let endpoint = serve_once(body);
        let source = GeminiCaptionSource::new(settings_for(endpoint));
        let caption = source.generate(&request(20, 30)).unwrap();
        assert_eq!(caption.top_text, "TOP");
        assert_eq!(caption.template_id, TemplateId::Fine);
        assert_eq!(caption.mood, Mood::Panic);
    }

    #[test]
    fn unreachable_server_reports_http_error() {
        // Port 1 on localhost refuses connections.
        let source =
            GeminiCaptionSource::new(settings_for("http://127.0.0.1:1".to_string()));
        let err = source.generate(&request(24, 30)).unwrap_err();
        assert!(matches!(err, CaptionError::Http(_)));
    }
}
