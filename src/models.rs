use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Men's styles are split into cuts and perms; women's styles carry no category.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    Haircut,
    Perm,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HairLength {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HairTexture {
    Straight,
    Wavy,
    Curly,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum BangStyle {
    #[default]
    None,
    Curtain,
    Wispy,
    Full,
    #[serde(rename = "Side-swept")]
    SideSwept,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum HairVolume {
    #[serde(rename = "Light/Thin")]
    LightThin,
    #[default]
    Natural,
    #[serde(rename = "Thick/Full")]
    ThickFull,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootLift {
    Flat,
    #[default]
    Natural,
    Voluminous,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum HairQuality {
    #[serde(rename = "Soft/Fine")]
    SoftFine,
    #[default]
    Normal,
    #[serde(rename = "Coarse/Hard")]
    CoarseHard,
}

impl BangStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BangStyle::None => "None",
            BangStyle::Curtain => "Curtain",
            BangStyle::Wispy => "Wispy",
            BangStyle::Full => "Full",
            BangStyle::SideSwept => "Side-swept",
        }
    }
}

impl HairVolume {
    pub fn as_str(&self) -> &'static str {
        match self {
            HairVolume::LightThin => "Light/Thin",
            HairVolume::Natural => "Natural",
            HairVolume::ThickFull => "Thick/Full",
        }
    }
}

impl RootLift {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootLift::Flat => "Flat",
            RootLift::Natural => "Natural",
            RootLift::Voluminous => "Voluminous",
        }
    }
}

impl HairQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            HairQuality::SoftFine => "Soft/Fine",
            HairQuality::Normal => "Normal",
            HairQuality::CoarseHard => "Coarse/Hard",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RefinementOptions {
    pub bangs: BangStyle,
    pub volume: HairVolume,
    pub root_lift: RootLift,
    pub quality: HairQuality,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StylistOptions {
    pub gender: Gender,
    /// Catalog id; unknown ids are used verbatim as the style description.
    pub style_id: String,
    /// Hex code, not checked against the preset palette.
    pub color: String,
    pub refinements: RefinementOptions,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HairStyleDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<StyleCategory>,
    pub length: HairLength,
    pub texture: HairTexture,
    pub preview_url: &'static str,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct PresetColor {
    pub label: &'static str,
    pub value: &'static str,
}

/// One outbound edit request. `image_data` stays base64 encoded; it is never decoded locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub image_data: String,
    pub mime_type: String,
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// `data:image/png;base64,...`
    pub image_url: Option<String>,
    pub text_analysis: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerateRequest {
    /// Photo as a data URL (or bare base64).
    pub image: String,
    pub options: StylistOptions,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub result: GenerationResult,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn stylist_options_use_literal_refinement_names_on_the_wire() {
        let options: StylistOptions = serde_json::from_value(json!({
            "gender": "Male",
            "styleId": "m-buzz",
            "color": "#1a1a1a",
            "refinements": {
                "bangs": "Side-swept",
                "volume": "Thick/Full",
                "rootLift": "Voluminous",
                "quality": "Coarse/Hard"
            }
        })).unwrap();

        assert_eq!(options.gender, Gender::Male);
        assert_eq!(options.refinements.bangs, BangStyle::SideSwept);
        assert_eq!(options.refinements.volume, HairVolume::ThickFull);
        assert_eq!(options.refinements.quality.as_str(), "Coarse/Hard");
        assert_eq!(
            serde_json::to_value(options.refinements).unwrap(),
            json!({"bangs": "Side-swept", "volume": "Thick/Full", "rootLift": "Voluminous", "quality": "Coarse/Hard"})
        );
    }

    #[test]
    fn refinements_reject_missing_fields() {
        let parsed = serde_json::from_value::<RefinementOptions>(json!({"bangs": "None", "volume": "Natural"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn generation_response_flattens_result() {
        let response = GenerateResponse {
            id: Uuid::nil(),
            result: GenerationResult { image_url: Some("data:image/png;base64,AA==".into()), text_analysis: None },
            generated_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["imageUrl"], json!("data:image/png;base64,AA=="));
        assert_eq!(value["textAnalysis"], json!(null));
        assert!(value.get("generatedAt").is_some());
    }
}
