use caduceus_core::language::Language;
use caduceus_core::models::report::{LineItem, SectionKind};
use caduceus_engine::ApprovedReport;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::error::ExportError;
use crate::headings::Headings;

const TEMPLATE_NAME: &str = "report.md";

const REPORT_TEMPLATE: &str = r#"# {{ title }}

{{ labels.scenario }}: {{ scenario }}
{{ labels.recorded }}: {{ recorded_at }}
{% for section in sections %}
## {{ section.letter }}. {{ section.heading }}

{% if section.lines | length == 0 -%}
_{{ labels.empty }}_
{% endif -%}
{% for line in section.lines -%}
- {{ line.text }}{% for label in line.refs %} {{ label }}{% endfor %}
{% endfor -%}
{% endfor -%}
"#;

#[derive(Serialize)]
struct ReportView<'a> {
    title: &'static str,
    labels: Labels,
    scenario: String,
    recorded_at: String,
    sections: Vec<SectionView<'a>>,
}

#[derive(Serialize)]
struct Labels {
    scenario: &'static str,
    recorded: &'static str,
    empty: &'static str,
}

#[derive(Serialize)]
struct SectionView<'a> {
    letter: char,
    heading: &'static str,
    lines: Vec<LineView<'a>>,
}

#[derive(Serialize)]
struct LineView<'a> {
    text: &'a str,
    refs: Vec<String>,
}

impl<'a> LineView<'a> {
    /// Reference lines already lead with their label.
    fn new(kind: SectionKind, line: &'a LineItem) -> Self {
        let refs = if kind == SectionKind::References {
            Vec::new()
        } else {
            let mut labels: Vec<String> = Vec::new();
            for citation in &line.citations {
                let label = citation.label();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
            labels
        };
        Self {
            text: &line.text,
            refs,
        }
    }
}

/// Render an approved report to Markdown with headings in `language`.
pub fn render_markdown(report: &ApprovedReport, language: Language) -> Result<String, ExportError> {
    let headings = Headings::for_language(language);
    let metadata = &report.metadata;

    let view = ReportView {
        title: headings.title,
        labels: Labels {
            scenario: headings.scenario,
            recorded: headings.recorded,
            empty: headings.empty,
        },
        scenario: format!(
            "{} ({} v{})",
            metadata.scenario_title, metadata.scenario_id, metadata.scenario_version
        ),
        recorded_at: metadata.recorded_at.to_string(),
        sections: report
            .sections
            .iter()
            .map(|section| SectionView {
                letter: section.kind.letter(),
                heading: headings.section(section.kind),
                lines: section
                    .lines
                    .iter()
                    .map(|line| LineView::new(section.kind, line))
                    .collect(),
            })
            .collect(),
    };

    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, REPORT_TEMPLATE)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let context = Context::from_serialize(&view)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;
    let rendered = tera.render(TEMPLATE_NAME, &context)?;

    debug!(
        scenario = %metadata.scenario_id,
        language = language.tag(),
        bytes = rendered.len(),
        "report rendered"
    );
    Ok(rendered)
}

/// Pretty-printed JSON of the approved report.
pub fn render_json(report: &ApprovedReport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}
