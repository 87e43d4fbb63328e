pub mod catalog;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use catalog::{
    Catalog, CatalogError, Product, ProductId, ReplacementPart, Step, StepNumber, ThreeDView,
    UpsellItem,
};

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
    Ar,
    Ru,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[Language::En, Language::Tr, Language::Ar, Language::Ru]
    }

    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
            Language::Ar => "ar",
            Language::Ru => "ru",
        }
    }

    /// Name of the language in that language
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Tr => "Türkçe",
            Language::Ar => "العربية",
            Language::Ru => "Русский",
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Language::Ar => TextDirection::Rtl,
            _ => TextDirection::Ltr,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported language '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// Media tab shown for the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaTab {
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "video")]
    Video,
    #[default]
    #[serde(rename = "3d")]
    ThreeD,
}

impl MediaTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaTab::Image => "image",
            MediaTab::Video => "video",
            MediaTab::ThreeD => "3d",
        }
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

/// How the user is identifying their product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentificationMethod {
    Qr,
    Model,
    Photo,
}

impl fmt::Display for IdentificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdentificationMethod::Qr => "QR code",
            IdentificationMethod::Model => "model number",
            IdentificationMethod::Photo => "photo",
        })
    }
}

/// Result of the simulated photo analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoAnalysis {
    Success,
    Warning,
}

// ============================================================================
// HTTP request / response bodies
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCreated {
    pub id: String,
}

/// Identification attempt sent by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum IdentifyRequest {
    Qr {
        payload: String,
    },
    Model {
        model_number: String,
    },
    Photo {
        file_name: String,
        /// Base64-encoded image bytes
        content_base64: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifyStatus {
    Identified,
    NeedsRetry,
    Superseded,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifyResponse {
    pub status: IdentifyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<PhotoAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// `None` when the input was blank and nothing was sent
    pub reply: Option<String>,
    pub transcript_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip() {
        for lang in Language::all() {
            assert_eq!(lang.code().parse::<Language>().unwrap(), *lang);
        }
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_only_arabic_is_rtl() {
        let rtl: Vec<_> = Language::all()
            .iter()
            .filter(|l| l.direction() == TextDirection::Rtl)
            .collect();
        assert_eq!(rtl, vec![&Language::Ar]);
    }

    #[test]
    fn test_media_tab_serde_names() {
        assert_eq!(serde_json::to_string(&MediaTab::ThreeD).unwrap(), "\"3d\"");
        let tab: MediaTab = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(tab, MediaTab::Video);
        assert_eq!(MediaTab::default(), MediaTab::ThreeD);
    }

    #[test]
    fn test_identify_request_tagging() {
        let json = r#"{"method": "model", "model_number": "Sarmobi Closet"}"#;
        let req: IdentifyRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            req,
            IdentifyRequest::Model {
                model_number: "Sarmobi Closet".to_string()
            }
        );
    }
}
