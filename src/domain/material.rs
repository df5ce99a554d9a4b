use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::course::is_module_title,
    error::{AppError, Result},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    pub url: String,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    pub module: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MaterialType {
    #[serde(rename = "PDF")]
    #[default]
    Pdf,
    Slides,
    Spreadsheet,
    Doc,
    Video,
    Zip,
    Other,
}

impl MaterialType {
    pub const ALL: [MaterialType; 7] = [
        MaterialType::Pdf,
        MaterialType::Slides,
        MaterialType::Spreadsheet,
        MaterialType::Doc,
        MaterialType::Video,
        MaterialType::Zip,
        MaterialType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Pdf => "PDF",
            MaterialType::Slides => "Slides",
            MaterialType::Spreadsheet => "Spreadsheet",
            MaterialType::Doc => "Doc",
            MaterialType::Video => "Video",
            MaterialType::Zip => "Zip",
            MaterialType::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which module a materials listing is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModuleFilter {
    #[default]
    All,
    Module(String),
}

impl ModuleFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("All") => ModuleFilter::All,
            Some(module) => ModuleFilter::Module(module.to_string()),
        }
    }

    pub fn matches(&self, module: &str) -> bool {
        match self {
            ModuleFilter::All => true,
            ModuleFilter::Module(wanted) => wanted == module,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMaterial {
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub material_type: MaterialType,
    pub module: String,
}

impl NewMaterial {
    /// `has_file` is true when an upload accompanies the request, in which
    /// case the url may be blank.
    pub fn validate(self, has_file: bool) -> Result<NewMaterial> {
        let title = self.title.trim().to_string();
        let url = self.url.trim().to_string();

        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if url.is_empty() && !has_file {
            return Err(AppError::Validation(
                "Either a file link or an uploaded file is required".to_string(),
            ));
        }
        if !is_module_title(&self.module) {
            return Err(AppError::Validation(format!("Unknown module: {}", self.module)));
        }

        Ok(NewMaterial {
            title,
            desc: self.desc.trim().to_string(),
            url,
            material_type: self.material_type,
            module: self.module,
        })
    }

    pub fn into_material(self) -> Material {
        Material {
            id: Uuid::new_v4(),
            title: self.title,
            desc: self.desc,
            url: self.url,
            material_type: self.material_type,
            module: self.module,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::MODULES;

    fn request(title: &str, url: &str) -> NewMaterial {
        NewMaterial {
            title: title.to_string(),
            desc: String::new(),
            url: url.to_string(),
            material_type: MaterialType::Slides,
            module: MODULES[1].title.to_string(),
        }
    }

    #[test]
    fn test_material_type_round_trips_through_str() {
        for t in MaterialType::ALL {
            assert_eq!(MaterialType::parse(t.as_str()), Some(t));
        }
        assert_eq!(MaterialType::parse("pdf"), Some(MaterialType::Pdf));
        assert_eq!(MaterialType::parse("Poster"), None);
    }

    #[test]
    fn test_material_type_wire_spelling() {
        assert_eq!(serde_json::to_string(&MaterialType::Pdf).unwrap(), "\"PDF\"");
        assert_eq!(serde_json::to_string(&MaterialType::Spreadsheet).unwrap(), "\"Spreadsheet\"");
    }

    #[test]
    fn test_module_filter_parse() {
        assert_eq!(ModuleFilter::parse(None), ModuleFilter::All);
        assert_eq!(ModuleFilter::parse(Some("All")), ModuleFilter::All);
        assert_eq!(
            ModuleFilter::parse(Some("Module 2: Hypothesis Testing")),
            ModuleFilter::Module("Module 2: Hypothesis Testing".to_string())
        );
    }

    #[test]
    fn test_validate_requires_url_or_file() {
        assert!(matches!(request("Week 3 Slides", " ").validate(false), Err(AppError::Validation(_))));
        assert!(request("Week 3 Slides", "").validate(true).is_ok());
        assert!(request("Week 3 Slides", "https://drive.example/w3").validate(false).is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_module() {
        let mut bad = request("Week 3 Slides", "https://drive.example/w3");
        bad.module = "Module 9: Astrology".to_string();
        assert!(matches!(bad.validate(false), Err(AppError::Validation(_))));
    }
}
