//! Chart tab registry and dispatch.
//!
//! The registry lists every tab shown in the chart navigation. Only some of them have a content
//! renderer; every other identifier, registered or not, renders the summary. The sub-navigation
//! strip is chosen by a second, independent lookup on the same identifier.

use crate::constants::DEFAULT_TAB;
use crate::render::content::{self, ContentRenderer};
use serde::Serialize;

/// Registered chart tabs, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartTab {
    Summary,
    ChartReview,
    Results,
    WorkList,
    Mar,
    Flowsheets,
    IntakeOutput,
    Notes,
    Education,
    CarePlan,
    Orders,
}

/// Navigation metadata for one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabMeta {
    pub tab: ChartTab,
    pub label: &'static str,
    pub icon: &'static str,
    /// Rendered with emphasis in the navigation.
    pub special: bool,
}

const fn meta(tab: ChartTab, label: &'static str, icon: &'static str) -> TabMeta {
    TabMeta {
        tab,
        label,
        icon,
        special: false,
    }
}

/// The fixed tab registry.
pub const CHART_TABS: [TabMeta; 11] = [
    meta(ChartTab::Summary, "Summary", "fa-clipboard"),
    meta(ChartTab::ChartReview, "Chart Review", "fa-file-medical"),
    meta(ChartTab::Results, "Results", "fa-flask"),
    meta(ChartTab::WorkList, "Work List", "fa-tasks"),
    TabMeta {
        special: true,
        ..meta(ChartTab::Mar, "MAR", "fa-pills")
    },
    meta(ChartTab::Flowsheets, "Flowsheets", "fa-chart-line"),
    meta(ChartTab::IntakeOutput, "Intake/O", "fa-balance-scale"),
    meta(ChartTab::Notes, "Notes", "fa-sticky-note"),
    meta(ChartTab::Education, "Education", "fa-graduation-cap"),
    meta(ChartTab::CarePlan, "Care Plan", "fa-clipboard-list"),
    meta(ChartTab::Orders, "Orders", "fa-prescription"),
];

impl ChartTab {
    /// The identifier used in URLs.
    pub fn id(self) -> &'static str {
        match self {
            ChartTab::Summary => "summary",
            ChartTab::ChartReview => "chart-review",
            ChartTab::Results => "results",
            ChartTab::WorkList => "work-list",
            ChartTab::Mar => "mar",
            ChartTab::Flowsheets => "flowsheets",
            ChartTab::IntakeOutput => "intake-output",
            ChartTab::Notes => "notes",
            ChartTab::Education => "education",
            ChartTab::CarePlan => "care-plan",
            ChartTab::Orders => "orders",
        }
    }

    /// Looks up a registered tab by identifier. Exact, case-sensitive match.
    pub fn from_id(id: &str) -> Option<Self> {
        CHART_TABS.iter().map(|m| m.tab).find(|tab| tab.id() == id)
    }

    pub fn meta(self) -> &'static TabMeta {
        CHART_TABS
            .iter()
            .find(|m| m.tab == self)
            .unwrap_or(&CHART_TABS[0])
    }
}

/// Normalises the raw `tab` query value: trimmed, defaulting to `summary` when absent or blank.
pub fn requested_tab(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TAB)
        .to_string()
}

/// Picks the content renderer for a tab identifier.
///
/// Tabs without a renderer of their own (`work-list`, `intake-output`, `education`) and any
/// unrecognised identifier get the summary renderer.
pub fn select_content(tab_id: &str) -> &'static dyn ContentRenderer {
    match ChartTab::from_id(tab_id) {
        Some(ChartTab::Summary) => &content::SUMMARY,
        Some(ChartTab::Results) => &content::RESULTS,
        Some(ChartTab::Mar) => &content::MAR,
        Some(ChartTab::Flowsheets) => &content::FLOWSHEETS,
        Some(ChartTab::Notes) => &content::NOTES,
        Some(ChartTab::Orders) => &content::ORDERS,
        Some(ChartTab::CarePlan) => &content::CARE_PLAN,
        Some(ChartTab::ChartReview) => &content::CHART_REVIEW,
        Some(ChartTab::WorkList | ChartTab::IntakeOutput | ChartTab::Education) | None => {
            &content::SUMMARY
        }
    }
}

/// Secondary link sets offered above the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubnavSet {
    Summary,
    Results,
    Mar,
    Generic,
}

impl SubnavSet {
    /// Link labels; the first one is the active link.
    pub fn links(self) -> &'static [&'static str] {
        match self {
            SubnavSet::Summary => &["Overview", "Index", "SBAR Handoff", "Storyboard"],
            SubnavSet::Results => &["All Results", "Lab", "Imaging", "Micro"],
            SubnavSet::Mar => &["MAR", "Due", "PRN", "Continuous"],
            SubnavSet::Generic => &["All", "Recent"],
        }
    }
}

/// Picks the sub-navigation set for a tab identifier.
pub fn subnav_for(tab_id: &str) -> SubnavSet {
    match ChartTab::from_id(tab_id) {
        Some(ChartTab::Summary) => SubnavSet::Summary,
        Some(ChartTab::Results) => SubnavSet::Results,
        Some(ChartTab::Mar) => SubnavSet::Mar,
        _ => SubnavSet::Generic,
    }
}
