//! Localized report headings and labels.

use caduceus_core::language::Language;
use caduceus_core::models::report::SectionKind;

#[derive(Debug)]
pub struct Headings {
    pub title: &'static str,
    pub scenario: &'static str,
    pub recorded: &'static str,
    /// Shown under a section with no lines.
    pub empty: &'static str,
    sections: [&'static str; 7],
}

impl Headings {
    pub fn for_language(language: Language) -> &'static Headings {
        match language {
            Language::En => &EN,
            Language::Ar => &AR,
        }
    }

    pub fn section(&self, kind: SectionKind) -> &'static str {
        let index = SectionKind::ORDER
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        self.sections[index]
    }
}

static EN: Headings = Headings {
    title: "Assistive report (only from provided references)",
    scenario: "Scenario",
    recorded: "Recorded",
    empty: "No supported items; see References.",
    sections: [
        "Clinical Summary",
        "Red Flags (Must-Not-Miss)",
        "Differential Diagnosis (Ranked)",
        "Recommended Initial Workup",
        "Initial Management",
        "Disposition",
        "References",
    ],
};

static AR: Headings = Headings {
    title: "تقرير داعم (من المصادر المرفوعة فقط)",
    scenario: "السيناريو",
    recorded: "وقت التسجيل",
    empty: "لا توجد عناصر موثقة؛ راجع المراجع.",
    sections: [
        "ملخص سريري",
        "إنذارات خطر",
        "تشخيصات تفريقية (مرتبة)",
        "فحوصات/تقييم أولي",
        "تدبير أولي",
        "التصرف والإحالة",
        "المراجع (مقاطع داعمة)",
    ],
};
