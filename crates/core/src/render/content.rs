//! Per-tab content fragments.
//!
//! Each renderer turns the resolved [`ChartContext`] into the HTML shown below the
//! sub-navigation. Dispatch from tab identifier to renderer lives in [`crate::tabs`].

use crate::chart::ChartContext;
use crate::escape::escape_html as e;
use serde::Serialize;

/// Which renderer a tab resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Summary,
    Results,
    Mar,
    Flowsheets,
    Notes,
    Orders,
    CarePlan,
    ChartReview,
}

/// Produces the content fragment for one chart tab.
pub trait ContentRenderer: Sync {
    fn kind(&self) -> ContentKind;

    fn render(&self, ctx: &ChartContext) -> String;
}

/// Renderer backed by one of the built-in fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabContent(ContentKind);

pub static SUMMARY: TabContent = TabContent(ContentKind::Summary);
pub static RESULTS: TabContent = TabContent(ContentKind::Results);
pub static MAR: TabContent = TabContent(ContentKind::Mar);
pub static FLOWSHEETS: TabContent = TabContent(ContentKind::Flowsheets);
pub static NOTES: TabContent = TabContent(ContentKind::Notes);
pub static ORDERS: TabContent = TabContent(ContentKind::Orders);
pub static CARE_PLAN: TabContent = TabContent(ContentKind::CarePlan);
pub static CHART_REVIEW: TabContent = TabContent(ContentKind::ChartReview);

impl ContentRenderer for TabContent {
    fn kind(&self) -> ContentKind {
        self.0
    }

    fn render(&self, ctx: &ChartContext) -> String {
        let body = match self.0 {
            ContentKind::Summary => summary(ctx),
            ContentKind::Results => empty_state("No results on file for this encounter."),
            ContentKind::Mar => mar(ctx),
            ContentKind::Flowsheets => empty_state("No flowsheet rows documented yet."),
            ContentKind::Notes => notes(ctx),
            ContentKind::Orders => empty_state("No active orders."),
            ContentKind::CarePlan => empty_state("No care plan problems have been added."),
            ContentKind::ChartReview => chart_review(ctx),
        };

        format!(
            "<section class=\"content-panel\" data-content=\"{kind}\">\n\
             <div class=\"panel-header\"><span>{title}</span></div>\n\
             <div class=\"panel-content\">\n{body}</div>\n</section>\n",
            kind = self.0.id(),
            title = self.0.title(),
        )
    }
}

impl ContentKind {
    pub fn id(self) -> &'static str {
        match self {
            ContentKind::Summary => "summary",
            ContentKind::Results => "results",
            ContentKind::Mar => "mar",
            ContentKind::Flowsheets => "flowsheets",
            ContentKind::Notes => "notes",
            ContentKind::Orders => "orders",
            ContentKind::CarePlan => "care-plan",
            ContentKind::ChartReview => "chart-review",
        }
    }

    fn title(self) -> &'static str {
        match self {
            ContentKind::Summary => "Patient Summary",
            ContentKind::Results => "Results Review",
            ContentKind::Mar => "Medication Administration Record",
            ContentKind::Flowsheets => "Flowsheets",
            ContentKind::Notes => "Notes",
            ContentKind::Orders => "Orders",
            ContentKind::CarePlan => "Care Plan",
            ContentKind::ChartReview => "Chart Review",
        }
    }
}

fn empty_state(message: &str) -> String {
    format!("<p class=\"empty-state\">{}</p>\n", e(message))
}

fn allergy_list(ctx: &ChartContext) -> String {
    if ctx.display.allergies.is_empty() {
        return "<p class=\"nka\">No Known Allergies</p>\n".into();
    }

    let items: String = ctx
        .display
        .allergies
        .iter()
        .map(|a| format!("<li>{}</li>", e(a)))
        .collect();
    format!("<ul class=\"allergy-list\">{items}</ul>\n")
}

fn summary(ctx: &ChartContext) -> String {
    let d = &ctx.display;
    format!(
        "<dl class=\"summary-grid\">\n\
         <dt>Patient</dt><dd>{name}</dd>\n\
         <dt>Age/Sex</dt><dd>{age_sex}</dd>\n\
         <dt>Blood Type</dt><dd>{blood}</dd>\n\
         <dt>Code Status</dt><dd>{code}</dd>\n\
         <dt>Attending</dt><dd>{attending}</dd>\n\
         <dt>Location</dt><dd>{department} {room}</dd>\n\
         </dl>\n<h4>Allergies</h4>\n{allergies}",
        name = e(&d.name),
        age_sex = e(&d.age_sex),
        blood = e(&d.blood_type),
        code = e(&ctx.encounter.code_status),
        attending = e(&d.attending),
        department = e(&ctx.encounter.department),
        room = e(&d.room),
        allergies = allergy_list(ctx),
    )
}

fn mar(ctx: &ChartContext) -> String {
    format!(
        "<div class=\"mar-allergies\"><h4>Allergies</h4>\n{}</div>\n{}",
        allergy_list(ctx),
        empty_state("No scheduled administrations.")
    )
}

fn notes(ctx: &ChartContext) -> String {
    if ctx.sticky_notes.is_empty() {
        return empty_state("No notes.");
    }

    ctx.sticky_notes
        .iter()
        .map(|note| {
            format!(
                "<article class=\"note\"><h4>{}</h4><p>{}</p><footer>{} &middot; {}</footer></article>\n",
                e(&note.title),
                e(&note.content),
                e(&note.created_by),
                e(&note.created_at),
            )
        })
        .collect()
}

fn chart_review(ctx: &ChartContext) -> String {
    let enc = &ctx.encounter;
    format!(
        "<table class=\"encounter-table\">\n\
         <tr><th>Type</th><th>Status</th><th>Admitted</th><th>Department</th><th>Attending</th></tr>\n\
         <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n</table>\n",
        e(&enc.kind),
        e(&enc.status),
        e(&enc.admit_date),
        e(&enc.department),
        e(&enc.attending_provider),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::tests::sample_context;

    #[test]
    fn test_every_renderer_tags_its_kind() {
        let ctx = sample_context("summary");
        for renderer in [
            &SUMMARY,
            &RESULTS,
            &MAR,
            &FLOWSHEETS,
            &NOTES,
            &ORDERS,
            &CARE_PLAN,
            &CHART_REVIEW,
        ] {
            let html = renderer.render(&ctx);
            assert!(
                html.contains(&format!("data-content=\"{}\"", renderer.kind().id())),
                "{html}"
            );
        }
    }

    #[test]
    fn test_summary_lists_allergies() {
        let html = SUMMARY.render(&sample_context("summary"));
        assert!(html.contains("<li>Penicillin</li>"));
        assert!(html.contains("<li>Sulfa</li>"));
    }

    #[test]
    fn test_summary_escapes_patient_text() {
        let mut ctx = sample_context("summary");
        ctx.display.name = "<script>alert(1)</script>, John".into();
        let html = SUMMARY.render(&ctx);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;, John"));
    }

    #[test]
    fn test_notes_render_sticky_notes() {
        let html = NOTES.render(&sample_context("notes"));
        assert!(html.contains("NPO after midnight"));
        assert!(html.contains("Family contact"));
    }
}
