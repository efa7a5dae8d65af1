//! Full chart page: open-patient strip, banner, tab navigation, sub-navigation and content.

use crate::chart::ChartContext;
use crate::encounter::NotePriority;
use crate::escape::escape_html as e;
use crate::render::content::ContentRenderer;
use crate::tabs::{SubnavSet, CHART_TABS};

/// Renders the complete HTML document for a chart request.
pub fn render_chart_page(
    ctx: &ChartContext,
    content: &dyn ContentRenderer,
    subnav: SubnavSet,
) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", e(&ctx.page_title)));
    html.push_str("</head>\n<body>\n");
    html.push_str(&open_patient_strip(ctx));
    html.push_str(&banner(ctx));
    html.push_str(&sticky_notes_panel(ctx));
    html.push_str(&insurance_panel(ctx));
    html.push_str(&tab_nav(ctx));
    html.push_str(&subnav_strip(subnav));
    html.push_str("<div class=\"chart-content\">\n<main class=\"chart-main\">\n");
    html.push_str(&content.render(ctx));
    html.push_str("</main>\n</div>\n</body>\n</html>\n");

    html
}

fn open_patient_strip(ctx: &ChartContext) -> String {
    let tabs: String = ctx
        .open_patients
        .iter()
        .map(|entry| {
            let active = if entry.patient_id == ctx.patient_id {
                " active"
            } else {
                ""
            };
            format!(
                "<a class=\"patient-tab{active}\" href=\"/patient-chart?id={id}\">{name}</a>\n",
                id = entry.patient_id,
                name = e(&entry.display_name),
            )
        })
        .collect();

    format!("<nav class=\"open-patients\">\n{tabs}</nav>\n")
}

fn banner(ctx: &ChartContext) -> String {
    let d = &ctx.display;
    let enc = &ctx.encounter;

    let allergy = match &d.allergy_badge {
        Some(text) => format!(
            "<span class=\"alert-badge allergy critical\">{}</span>\n",
            e(text)
        ),
        None => "<span class=\"alert-badge nka\">NKA</span>\n".to_string(),
    };

    let code_class = if enc.is_full_code() {
        "full-code"
    } else {
        "limited-code"
    };

    let mut location = format!("<strong>{}</strong>", e(&enc.room));
    if let Some(bed) = &enc.bed {
        location.push_str(&format!(" - Bed {}", e(bed)));
    }

    let mut badges = allergy;
    badges.push_str(&format!(
        "<span class=\"alert-badge code-status {code_class}\">{}</span>\n",
        e(&enc.code_status)
    ));
    if enc.fall_risk {
        badges.push_str("<span class=\"alert-badge fall-risk\">Fall Risk</span>\n");
    }
    if let Some(isolation) = &enc.isolation_type {
        badges.push_str(&format!(
            "<span class=\"alert-badge isolation\">{}</span>\n",
            e(isolation)
        ));
    }

    let nurse = enc
        .primary_nurse
        .as_ref()
        .map(|rn| format!("<span class=\"care-team-member\">RN: {}</span>\n", e(rn)))
        .unwrap_or_default();

    let insurance = d
        .insurance_box
        .as_ref()
        .map(|ins| {
            format!(
                "<div class=\"patient-info-box insurance-box\"><label>Insurance</label>\
                 <span class=\"value\">{}</span><span class=\"insurance-plan\">{}</span></div>\n",
                e(&ins.payer),
                e(&ins.plan)
            )
        })
        .unwrap_or_default();

    format!(
        "<header class=\"patient-banner\">\n\
         <span class=\"photo-badge\">{badge}</span>\n\
         <span class=\"patient-name\">{name}</span>\n\
         <span class=\"patient-age-sex\">{age_sex}</span>\n\
         <span class=\"identifier\">MRN: {mrn}</span>\n\
         <span class=\"identifier\">DOB: {dob}</span>\n\
         <span class=\"identifier\">SSN: {ssn}</span>\n\
         <span class=\"encounter-status\">{kind} - {status}</span>\n\
         <span class=\"encounter-detail\">{department}</span>\n\
         <span class=\"encounter-detail location\">{location}</span>\n\
         {station}\
         <div class=\"alert-badges\">\n{badges}</div>\n\
         <span class=\"care-team-member\">Attending: {attending}</span>\n\
         {nurse}\
         <div class=\"patient-info-box\"><label>Blood Type</label><span class=\"value\">{blood}</span></div>\n\
         <div class=\"patient-info-box\"><label>Admit</label><span class=\"value\">{admit}</span></div>\n\
         <div class=\"patient-info-box\"><label>Exp D/C</label><span class=\"value\">{discharge}</span></div>\n\
         {insurance}\
         </header>\n",
        badge = e(&enc.badge()),
        name = e(&d.name),
        age_sex = e(&d.age_sex),
        mrn = e(&d.mrn),
        dob = e(&d.dob),
        ssn = e(&d.ssn_masked),
        kind = e(&enc.kind),
        status = e(&enc.status),
        department = e(&enc.department),
        station = enc
            .nursing_station
            .as_ref()
            .map(|s| format!("<span class=\"encounter-detail\">{}</span>\n", e(s)))
            .unwrap_or_default(),
        attending = e(&enc.attending_provider),
        blood = e(&d.blood_type),
        admit = e(&enc.admit_date),
        discharge = e(enc.expected_discharge.as_deref().unwrap_or("TBD")),
    )
}

fn sticky_notes_panel(ctx: &ChartContext) -> String {
    if ctx.sticky_notes.is_empty() {
        return String::new();
    }

    let notes: String = ctx
        .sticky_notes
        .iter()
        .map(|note| {
            let priority = match note.priority {
                NotePriority::High => "<span class=\"priority-badge high\">High</span>",
                NotePriority::Normal => "",
            };
            format!(
                "<div class=\"sticky-note {color}\"><strong>{title}</strong>{priority}\
                 <div class=\"sticky-note-content\">{content}</div>\
                 <span class=\"note-author\">{by}</span> <span class=\"note-date\">{at}</span></div>\n",
                color = e(&note.color),
                title = e(&note.title),
                content = e(&note.content),
                by = e(&note.created_by),
                at = e(&note.created_at),
            )
        })
        .collect();

    format!(
        "<aside id=\"stickyNotesPanel\" class=\"sticky-notes-panel\" data-count=\"{}\">\n{notes}</aside>\n",
        ctx.sticky_notes.len()
    )
}

fn insurance_panel(ctx: &ChartContext) -> String {
    let d = &ctx.display;
    if d.primary_policy.is_none() && d.secondary_policy.is_none() {
        return String::new();
    }

    let mut body = String::new();
    if let Some(p) = &d.primary_policy {
        body.push_str(&format!(
            "<table class=\"insurance-detail-table primary\">\
             <tr><td>Payer:</td><td>{}</td></tr><tr><td>Plan:</td><td>{}</td></tr>\
             <tr><td>Policy #:</td><td>{}</td></tr><tr><td>Group #:</td><td>{}</td></tr>\
             <tr><td>Copay:</td><td>{}</td></tr><tr><td>Subscriber:</td><td>{}</td></tr></table>\n",
            e(&p.payer),
            e(&p.plan),
            e(&p.policy_number),
            e(&p.group_number),
            e(&p.copay),
            e(&p.subscriber),
        ));
    }
    if let Some(s) = &d.secondary_policy {
        body.push_str(&format!(
            "<table class=\"insurance-detail-table secondary\">\
             <tr><td>Payer:</td><td>{}</td></tr><tr><td>Policy #:</td><td>{}</td></tr></table>\n",
            e(&s.payer),
            e(&s.policy_number),
        ));
    }

    format!("<div id=\"insuranceModal\" class=\"modal\" hidden>\n{body}</div>\n")
}

fn tab_nav(ctx: &ChartContext) -> String {
    let links: String = CHART_TABS
        .iter()
        .map(|meta| {
            let mut class = String::from("chart-tab");
            if meta.tab.id() == ctx.tab {
                class.push_str(" active");
            }
            if meta.special {
                class.push_str(" special");
            }
            format!(
                "<a class=\"{class}\" href=\"/patient-chart?id={id}&amp;tab={tab}\"><i class=\"fas {icon}\"></i> {label}</a>\n",
                id = ctx.patient_id,
                tab = meta.tab.id(),
                icon = meta.icon,
                label = e(meta.label),
            )
        })
        .collect();

    format!("<nav class=\"chart-tabs\">\n{links}</nav>\n")
}

fn subnav_strip(subnav: SubnavSet) -> String {
    let links: String = subnav
        .links()
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let active = if i == 0 { " active" } else { "" };
            format!("<a href=\"#\" class=\"subnav-tab{active}\">{}</a>\n", e(label))
        })
        .collect();

    format!("<div class=\"chart-subnav\">\n<div class=\"subnav-tabs\">\n{links}</div>\n</div>\n")
}
