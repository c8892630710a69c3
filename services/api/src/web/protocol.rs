//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged on `POST /api/generate`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Payload Sent FROM the Client TO the Server
//=========================================================================================

/// Every field is optional at the wire level so that a missing field is reported
/// with the service's own validation message rather than a deserializer error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// The character the model should speak as.
    pub persona: Option<String>,
    /// The user's instruction.
    pub prompt: Option<String>,
    /// Name used for the instruction by older clients. Ignored when `prompt` is set.
    pub user_prompt: Option<String>,
}

impl GenerateRequest {
    /// The instruction, preferring `prompt` over the legacy `user_prompt`.
    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        (self.persona, self.prompt.or(self.user_prompt))
    }
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client
//=========================================================================================

/// Text plus base64-encoded MP3.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InlineAudioResponse {
    pub text: String,
    pub audio_content: String,
}

/// Where the MP3 was written on the server.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedAudioResponse {
    pub message: String,
    pub file_path: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TextResponse {
    pub text: String,
}

/// The success body; its shape depends on the configured response mode.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum GenerateResponse {
    Inline(InlineAudioResponse),
    Saved(SavedAudioResponse),
    Text(TextResponse),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_user_prompt_is_accepted() {
        let req: GenerateRequest =
            serde_json::from_value(json!({ "persona": "pirate", "user_prompt": "hi" })).unwrap();
        assert_eq!(req.into_parts().1.as_deref(), Some("hi"));
    }

    #[test]
    fn prompt_wins_over_user_prompt() {
        let req: GenerateRequest = serde_json::from_value(
            json!({ "persona": "pirate", "prompt": "sea", "user_prompt": "old" }),
        )
        .unwrap();
        assert_eq!(req.into_parts(), (Some("pirate".to_string()), Some("sea".to_string())));
    }

    #[test]
    fn responses_use_camel_case_fields() {
        let inline = GenerateResponse::Inline(InlineAudioResponse {
            text: "Ahoy".to_string(),
            audio_content: "AAEC".to_string(),
        });
        assert_eq!(
            serde_json::to_value(inline).unwrap(),
            json!({ "text": "Ahoy", "audioContent": "AAEC" })
        );

        let saved = GenerateResponse::Saved(SavedAudioResponse {
            message: "Audio generated successfully.".to_string(),
            file_path: "outputs/a.mp3".to_string(),
        });
        assert_eq!(
            serde_json::to_value(saved).unwrap(),
            json!({ "message": "Audio generated successfully.", "filePath": "outputs/a.mp3" })
        );
    }
}
