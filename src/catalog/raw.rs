use serde::{Deserialize, Serialize};

use crate::catalog::io::{normalize_code, parse_credits, subject_from_code};
use crate::error::PlanError;
use crate::models::CourseRecord;

/// Créditos tal como llegan: número o texto libre ("3 or 4", "1-3").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreditsValue {
    Number(f64),
    Text(String),
}

/// Prerequisitos como lista o como texto separado por comas/punto y coma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrereqsValue {
    List(Vec<String>),
    Text(String),
}

/// Registro de catálogo sin validar, tal como lo entrega el scraper o la planilla.
///
/// Acepta tanto los nombres del dominio (`code`, `title`, `credits`, `prereqs`)
/// como los del export del scraper (`course_code`, `class_name`, `credits_raw`,
/// `credits_max`, `prereq_codes`). Los valores por defecto se aplican aquí,
/// una sola vez, en `into_record`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCourseRecord {
    #[serde(alias = "course_code")]
    pub code: Option<String>,
    #[serde(alias = "class_name")]
    pub title: Option<String>,
    #[serde(alias = "credits_raw", alias = "creditsRaw")]
    pub credits: Option<CreditsValue>,
    #[serde(alias = "credits_max")]
    pub credits_max: Option<f64>,
    pub subject: Option<String>,
    #[serde(alias = "prereq_codes", alias = "prereqCodes")]
    pub prereqs: Option<PrereqsValue>,
}

impl RawCourseRecord {
    /// Convierte a `CourseRecord` normalizando código, créditos, materia y prerequisitos.
    pub fn into_record(self) -> Result<CourseRecord, PlanError> {
        let title = self.title.map(|t| t.trim().to_string()).unwrap_or_default();
        let code = self.code.as_deref().map(normalize_code).unwrap_or_default();
        if code.is_empty() {
            return Err(PlanError::MalformedCourseRecord {
                code: title,
                reason: "missing course code".to_string(),
            });
        }

        let credits = match (self.credits_max, self.credits) {
            (Some(max), _) => Some(max),
            (None, Some(CreditsValue::Number(n))) => Some(n),
            (None, Some(CreditsValue::Text(t))) => parse_credits(&t),
            (None, None) => None,
        };
        let credits = match credits {
            Some(c) if c.is_finite() && c >= 0.0 => c,
            Some(c) => {
                return Err(PlanError::MalformedCourseRecord {
                    code,
                    reason: format!("invalid credit value {}", c),
                });
            }
            None => {
                return Err(PlanError::MalformedCourseRecord {
                    code,
                    reason: "missing credit value".to_string(),
                });
            }
        };

        let subject = self
            .subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| subject_from_code(&code));

        let listed: Vec<String> = match self.prereqs {
            Some(PrereqsValue::List(list)) => list,
            Some(PrereqsValue::Text(text)) => text.split([',', ';']).map(str::to_string).collect(),
            None => Vec::new(),
        };
        let mut prereqs: Vec<String> = Vec::new();
        for p in listed.iter().map(|p| normalize_code(p)) {
            if !p.is_empty() && p != code && !prereqs.contains(&p) {
                prereqs.push(p);
            }
        }

        Ok(CourseRecord { code, title, credits, subject, prereqs })
    }
}
