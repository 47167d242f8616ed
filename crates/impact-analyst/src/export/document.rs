use crate::assessment::{
    AssessmentResult, AssessmentSchema, Category, ChartSeries, ScoreStore, SectionState,
    MAX_TOTAL_SCORE,
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt::{self, Write};

pub const REPORT_TITLE: &str = "AI & Data Impact Analyst";

const REPORT_INTRO: &str = "Professionelles Bewertungstool für KI- und Datenprojekte. \
Evaluieren Sie Erfolg anhand von Datenqualität, KI-Ethik, Effizienz und operativem Nutzen.";

const REPORT_STYLE: &str = "body{font-family:sans-serif;color:#1e293b;margin:0}\
main{max-width:56rem;margin:0 auto;padding:0 1rem}\
.avoid-break{page-break-inside:avoid;break-inside:avoid}\
.rank{display:inline-block;padding:.25rem 1rem;border-radius:9999px;font-weight:bold}\
.rank-emerald{background:#d1fae5}.rank-blue{background:#dbeafe}\
.rank-amber{background:#fef3c7}.rank-red{background:#fee2e2}\
table{width:100%;border-collapse:collapse}td,th{padding:.4rem;text-align:left}\
td.num,th.num{text-align:right;font-family:monospace}";

/// Rendered snapshot of the report, as handed to print and PDF collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub html: String,
    /// Category ids whose checklist section was expanded at render time.
    pub expanded_sections: Vec<String>,
}

impl ReportDocument {
    pub fn is_expanded(&self, category_id: &str) -> bool {
        self.expanded_sections.iter().any(|id| id == category_id)
    }
}

struct ReportView<'a> {
    schema: &'a AssessmentSchema,
    store: &'a ScoreStore,
    visibility: &'a SectionState,
    result: &'a AssessmentResult,
    charts: &'a ChartSeries,
    generated_on: NaiveDate,
}

pub fn render_report(
    schema: &AssessmentSchema,
    store: &ScoreStore,
    visibility: &SectionState,
    result: &AssessmentResult,
    charts: &ChartSeries,
    generated_on: NaiveDate,
) -> ReportDocument {
    let view = ReportView {
        schema,
        store,
        visibility,
        result,
        charts,
        generated_on,
    };

    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut html, &view);

    let expanded_sections = schema
        .categories()
        .iter()
        .filter(|category| visibility.is_expanded(category.id))
        .map(|category| category.id.to_string())
        .collect();

    ReportDocument {
        title: REPORT_TITLE.to_string(),
        html,
        expanded_sections,
    }
}

fn write_document(html: &mut String, view: &ReportView<'_>) -> fmt::Result {
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(
        html,
        "<html lang=\"de\"><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body>",
        escape_html(REPORT_TITLE),
        REPORT_STYLE
    )?;
    writeln!(
        html,
        "<header><h1>{}</h1><p>{}</p></header>",
        escape_html(REPORT_TITLE),
        escape_html(REPORT_INTRO)
    )?;
    html.push_str("<main>\n");
    write_dashboard(html, view)?;
    write_checklist(html, view)?;
    write_detail_table(html, view.result)?;
    html.push_str("</main>\n");
    write_chart_data(html, view.charts)?;
    writeln!(
        html,
        "<footer><p>&copy; {} {}</p></footer>",
        view.generated_on.year(),
        escape_html(REPORT_TITLE)
    )?;
    html.push_str("</body></html>\n");
    Ok(())
}

fn write_dashboard(html: &mut String, view: &ReportView<'_>) -> fmt::Result {
    let result = view.result;
    let gauge = &view.charts.gauge;
    writeln!(
        html,
        "<section class=\"dashboard avoid-break\" aria-label=\"Ergebnisübersicht\">"
    )?;
    writeln!(
        html,
        "<div class=\"gauge\" role=\"img\" aria-label=\"{}\"><span class=\"gauge-score\">{}</span></div>",
        escape_html(&gauge.accessible_label),
        gauge.rounded_score
    )?;
    writeln!(
        html,
        "<span class=\"rank rank-{}\">{}</span>",
        result.rank.tone(),
        escape_html(result.rank.label())
    )?;
    writeln!(
        html,
        "<h3>Bewertung</h3><p class=\"total\">{} / {} Punkte</p><p>{}</p>",
        result.total_display(),
        MAX_TOTAL_SCORE,
        escape_html(result.rank.description())
    )?;
    writeln!(
        html,
        "<p class=\"radar\" role=\"img\" aria-label=\"Radardiagramm\">Dimensions-Balance: {}</p>",
        escape_html(&view.charts.radar.accessible_summary)
    )?;
    html.push_str("</section>\n");
    Ok(())
}

fn write_checklist(html: &mut String, view: &ReportView<'_>) -> fmt::Result {
    writeln!(
        html,
        "<section class=\"checklist\" aria-label=\"KPI Checkliste\"><h2>Checkliste</h2>"
    )?;
    for category in view.schema.categories() {
        write_category(html, view, category)?;
    }
    html.push_str("</section>\n");
    Ok(())
}

fn write_category(html: &mut String, view: &ReportView<'_>, category: &Category) -> fmt::Result {
    let expanded = view.visibility.is_expanded(category.id);
    writeln!(
        html,
        "<div class=\"category avoid-break\" id=\"cat-{}\" data-expanded=\"{}\">",
        escape_html(category.id),
        expanded
    )?;
    writeln!(
        html,
        "<h3>{}</h3><p>Gewichtung: {}%</p>",
        escape_html(category.title),
        category.weight
    )?;

    if expanded {
        html.push_str("<ul class=\"criteria\">\n");
        for criterion in &category.criteria {
            let score = view.store.score(category.id, criterion.id);
            writeln!(
                html,
                "<li><span class=\"kpi-id\">{}</span> {} <strong>{}</strong> ({})</li>",
                escape_html(criterion.id),
                escape_html(criterion.text),
                score.points(),
                escape_html(score.label())
            )?;
        }
        html.push_str("</ul>\n");

        if let Some(series) = view
            .charts
            .bars
            .iter()
            .find(|series| series.category_id == category.id)
        {
            html.push_str("<div class=\"bars avoid-break\" aria-hidden=\"true\">");
            for point in &series.points {
                write!(
                    html,
                    "<span class=\"bar\" style=\"background:{}\" data-score=\"{}\">{}</span>",
                    point.color,
                    point.score.points(),
                    escape_html(point.criterion_id)
                )?;
            }
            html.push_str("</div>\n");
        }
    }

    html.push_str("</div>\n");
    Ok(())
}

fn write_detail_table(html: &mut String, result: &AssessmentResult) -> fmt::Result {
    writeln!(
        html,
        "<section class=\"details avoid-break\" aria-label=\"Detaillierte Ergebnistabelle\"><h2>Ergebnis Details</h2>"
    )?;
    html.push_str(
        "<table><thead><tr><th>Bereich</th><th class=\"num\">Gewicht</th><th class=\"num\">Score</th><th class=\"num\">Max</th></tr></thead><tbody>\n",
    );
    for category in &result.category_scores {
        writeln!(
            html,
            "<tr><td>{}</td><td class=\"num\">{}%</td><td class=\"num\">{:.1}</td><td class=\"num\">{}</td></tr>",
            escape_html(category.title),
            category.weight,
            category.weighted_score,
            category.max_potential
        )?;
    }
    writeln!(
        html,
        "<tr class=\"total\"><td>Gesamt</td><td class=\"num\">100%</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
        result.total_display(),
        result.max_score
    )?;
    html.push_str("</tbody></table></section>\n");
    Ok(())
}

fn write_chart_data(html: &mut String, charts: &ChartSeries) -> fmt::Result {
    let payload = serde_json::to_string(charts).unwrap_or_else(|_| "null".to_string());
    writeln!(
        html,
        "<script type=\"application/json\" id=\"chart-data\">{}</script>",
        payload.replace("</", "<\\/")
    )
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
