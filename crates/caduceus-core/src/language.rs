//! Output language tags and the fixed, non-sourced phrases of a report.
//!
//! Reasoning is language-agnostic; only these phrases and the section
//! headings (rendered by `caduceus-export`) vary by language.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::scenario::Severity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    /// Parse a language tag such as `en`, `ar` or `ar-SA`. Unsupported tags
    /// fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ar" => Language::Ar,
            _ => Language::En,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn phrases(self) -> &'static Phrases {
        match self {
            Language::En => &EN,
            Language::Ar => &AR,
        }
    }
}

/// Fixed report phrases for one language.
#[derive(Debug)]
pub struct Phrases {
    pub safety_notice: &'static str,
    pub not_found: &'static str,
    pub insufficient_data: &'static str,
    pub no_red_flags: &'static str,
    pub lookup_timed_out: &'static str,
    pub lookup_unavailable: &'static str,
    pub scenario: &'static str,
    pub version: &'static str,
    pub fields_supplied: &'static str,
    pub fields_unknown: &'static str,
    pub rejected_input: &'static str,
    pub ignored_field: &'static str,
    pub score: &'static str,
    /// Replaces `{flags}` in reasoning when no associated flag triggered.
    pub no_findings: &'static str,
    pub registry_version: &'static str,
    pub style_guide_version: &'static str,
    pub severity_high: &'static str,
    pub severity_moderate: &'static str,
    pub severity_low: &'static str,
}

impl Phrases {
    pub fn severity(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::High => self.severity_high,
            Severity::Moderate => self.severity_moderate,
            Severity::Low => self.severity_low,
        }
    }
}

static EN: Phrases = Phrases {
    safety_notice: "Clinical decision support only (assistive, not diagnostic). \
                    Final clinical decisions must be made by a licensed physician.",
    not_found: "Not found in provided references",
    insufficient_data: "insufficient data to exclude",
    no_red_flags: "No red flag was triggered by the supplied data.",
    lookup_timed_out: "source lookup timed out",
    lookup_unavailable: "source index unavailable",
    scenario: "Scenario",
    version: "version",
    fields_supplied: "Fields supplied",
    fields_unknown: "unknown",
    rejected_input: "Rejected input",
    ignored_field: "Ignored undeclared field",
    score: "score",
    no_findings: "none recorded",
    registry_version: "registry version",
    style_guide_version: "style guide version",
    severity_high: "high",
    severity_moderate: "moderate",
    severity_low: "low",
};

static AR: Phrases = Phrases {
    safety_notice: "دعم للقرار السريري فقط (مساعد وليس تشخيصياً). \
                    القرارات السريرية النهائية يتخذها طبيب مرخّص.",
    not_found: "غير موجود في المصادر المرفوعة",
    insufficient_data: "بيانات غير كافية للاستبعاد",
    no_red_flags: "لم يتم رصد أي إنذار خطر من البيانات المقدمة.",
    lookup_timed_out: "انتهت مهلة البحث في المصادر",
    lookup_unavailable: "فهرس المصادر غير متاح",
    scenario: "السيناريو",
    version: "الإصدار",
    fields_supplied: "الحقول المقدمة",
    fields_unknown: "غير معروفة",
    rejected_input: "مدخل مرفوض",
    ignored_field: "حقل غير معرّف تم تجاهله",
    score: "الدرجة",
    no_findings: "لا يوجد",
    registry_version: "إصدار السجل",
    style_guide_version: "إصدار دليل الأسلوب",
    severity_high: "عالية",
    severity_moderate: "متوسطة",
    severity_low: "منخفضة",
};
