//! Wire DTOs for the Gemini generateContent API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self { role: None, parts: vec![Part { text: text.into() }] }
    }
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl GenerateContentResponse {
    /// Concatenated text of every candidate part.
    pub fn joined_text(&self) -> String {
        let mut out = String::new();
        for candidate in &self.candidates {
            let Some(content) = &candidate.content else { continue };
            for part in &content.parts {
                if let Some(text) = &part.text {
                    out.push_str(text);
                }
            }
        }
        out
    }

    /// First inline (base64) payload, if any candidate carries one.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.inline_data.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_candidate_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Hola"},{"text":" mundo"}]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.joined_text(), "Hola mundo");
    }

    #[test]
    fn finds_inline_data() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"QUJD"}}]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.first_inline_data().unwrap().mime_type, "image/png");
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = GenerateContentRequest {
            system_instruction: Some(Content::system("sys")),
            contents: vec![Content::user("hello")],
            generation_config: Some(GenerationConfig {
                temperature: 0.2,
                response_modalities: None,
            }),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert!(json.get("generationConfig").is_some());
        assert_eq!(json["contents"][0]["role"], "user");
    }
}
