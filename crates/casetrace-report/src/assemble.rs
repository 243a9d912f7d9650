//! Report assembly: one self-contained HTML document per run.

use casetrace_types::{ClassifiedEvent, Workload};
use chrono::{DateTime, FixedOffset, Utc};
use tracing::debug;

use crate::aggregate::AggregateSummary;
use crate::card::{format_local, render_card};
use crate::html::{Element, Node};

/// Inline stylesheet; the document references no external assets.
const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f4f5f7;color:#1d2129}
nav{position:sticky;top:0;background:#1d2d44;padding:.6em 1em}
nav a{color:#e8edf4;margin-right:1.2em;text-decoration:none;font-size:.9em}
main{max-width:60em;margin:0 auto;padding:1em}
h1{font-size:1.4em}h2{font-size:1.15em;border-bottom:1px solid #ccd2da;padding-bottom:.25em}
table{border-collapse:collapse;margin:.5em 0}
th,td{border:1px solid #ccd2da;padding:.3em .7em;text-align:left;font-size:.9em}
.banner{background:#b3261e;color:#fff;font-weight:600;padding:.6em 1em;margin:.8em 0}
.card{background:#fff;border:1px solid #d8dde3;border-radius:4px;margin:.6em 0;padding:.6em .8em}
.card header{display:flex;flex-wrap:wrap;gap:.8em;align-items:baseline}
.card .time{font-family:monospace;font-size:.85em;color:#445}
.card .op{font-weight:600}
.badge{font-size:.75em;padding:.1em .5em;border-radius:8px;background:#dde4ee}
.badge.intent{background:#e8e0f0}
dl.props{margin:.5em 0 0;font-size:.9em}
dl.props dt{font-weight:600;margin-top:.35em}
dl.props dd{margin:0 0 0 1em;overflow-wrap:anywhere}
dl.props pre{background:#f0f2f5;padding:.5em;overflow-x:auto;font-size:.85em}
.empty{color:#667;font-style:italic}
footer{color:#667;font-size:.8em;margin:2em 0 1em}
";

/// Report metadata: who, when, what was asked for, and whether the input
/// set is known to be incomplete.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    /// Case identifier.
    pub case_id: String,
    /// Target actor under investigation, if the case names one.
    pub target_actor: Option<String>,
    /// Requested date range, lower bound.
    pub range_start: Option<DateTime<Utc>>,
    /// Requested date range, upper bound.
    pub range_end: Option<DateTime<Utc>>,
    /// Active-filter description.
    pub filters: String,
    /// Report generation instant.
    pub generated_at: DateTime<Utc>,
    /// Observer's local offset used for all rendered timestamps.
    pub local_offset: FixedOffset,
    /// Pass-through flag from the retrieval collaborator: the fetch was
    /// interrupted or otherwise incomplete.
    pub partial_fetch: bool,
    /// File-level load failures encountered during ingestion.
    pub load_errors: usize,
}

impl ReportMeta {
    /// Whether the report must carry the partial-data banner.
    pub fn is_partial(&self) -> bool {
        self.partial_fetch || self.load_errors > 0
    }
}

/// Assemble the full report document and serialize it once.
///
/// Section order: navigation, case header, summary, timeline, one section
/// per workload. Deterministic for a fixed input set: the timeline sorts by
/// timestamp ascending with ingestion order breaking ties, and undated
/// events sink to the end.
pub fn assemble(
    meta: &ReportMeta,
    summary: &AggregateSummary,
    events: &[ClassifiedEvent],
) -> String {
    debug!(events = events.len(), "assembling report");

    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(Element::new("title").text(format!("Audit report for case {}", meta.case_id)))
        .child(Element::new("style").child(Node::raw(STYLE)));

    let mut main = Element::new("main")
        .child(case_header(meta))
        .child(summary_section(summary))
        .child(timeline_section(meta, events));
    for workload in Workload::all() {
        main = main.child(workload_section(meta, workload, events));
    }
    main = main.child(
        Element::new("footer").text(format!(
            "Generated by casetrace at {}. Filters: {}.",
            format_local(meta.generated_at, meta.local_offset),
            meta.filters
        )),
    );

    let body = Element::new("body").child(navigation()).child(main);
    let document: Node = Element::new("html")
        .attr("lang", "en")
        .child(head)
        .child(body)
        .into();
    format!("<!DOCTYPE html>{}", document.render())
}

fn navigation() -> Element {
    let mut nav = Element::new("nav")
        .child(link("#summary", "Summary"))
        .child(link("#timeline", "Timeline"));
    for workload in Workload::all() {
        nav = nav.child(link(
            &format!("#{}", workload.anchor()),
            &workload.to_string(),
        ));
    }
    nav
}

fn link(href: &str, label: &str) -> Element {
    Element::new("a").attr("href", href.to_string()).text(label)
}

fn case_header(meta: &ReportMeta) -> Element {
    let mut header = Element::new("section")
        .attr("id", "case")
        .child(Element::new("h1").text(format!("Audit report for case {}", meta.case_id)));

    if meta.is_partial() {
        let mut reasons = Vec::new();
        if meta.partial_fetch {
            reasons.push("the retrieval run was interrupted before completion".to_string());
        }
        if meta.load_errors > 0 {
            reasons.push(format!(
                "{} file(s) could not be loaded",
                meta.load_errors
            ));
        }
        header = header.child(Element::new("div").class("banner").text(format!(
            "PARTIAL DATA: this report does not cover the full event set ({}).",
            reasons.join("; ")
        )));
    }

    let mut table = Element::new("table");
    table = table
        .child(meta_row("Case", meta.case_id.clone()))
        .child(meta_row(
            "Target actor",
            meta.target_actor.clone().unwrap_or_else(|| "(all actors)".to_string()),
        ))
        .child(meta_row("Requested range", range_text(meta)))
        .child(meta_row("Active filters", meta.filters.clone()))
        .child(meta_row(
            "Generated",
            format_local(meta.generated_at, meta.local_offset),
        ));
    header.child(table)
}

fn meta_row(name: &str, value: String) -> Element {
    Element::new("tr")
        .child(Element::new("th").text(name))
        .child(Element::new("td").text(value))
}

fn range_text(meta: &ReportMeta) -> String {
    match (meta.range_start, meta.range_end) {
        (None, None) => "(entire export)".to_string(),
        (start, end) => format!(
            "{} to {}",
            start
                .map(|t| format_local(t, meta.local_offset))
                .unwrap_or_else(|| "(open)".to_string()),
            end.map(|t| format_local(t, meta.local_offset))
                .unwrap_or_else(|| "(open)".to_string()),
        ),
    }
}

fn summary_section(summary: &AggregateSummary) -> Element {
    let mut workload_table = Element::new("table").child(
        Element::new("tr")
            .child(Element::new("th").text("Workload"))
            .child(Element::new("th").text("Events")),
    );
    for (workload, count) in &summary.by_workload {
        workload_table = workload_table.child(
            Element::new("tr")
                .child(Element::new("td").text(workload.to_string()))
                .child(Element::new("td").text(count.to_string())),
        );
    }

    Element::new("section")
        .attr("id", "summary")
        .child(Element::new("h2").text("Summary"))
        .child(
            Element::new("p").text(format!("{} event(s) in scope.", summary.total)),
        )
        .child(workload_table)
        .child(count_table("Top operations", &summary.top_operations))
        .child(count_table("Top source addresses", &summary.top_sources))
}

fn count_table(title: &str, rows: &[(String, usize)]) -> Element {
    let mut section = Element::new("div").child(Element::new("h3").text(title));
    if rows.is_empty() {
        return section.child(Element::new("p").class("empty").text("No data."));
    }
    let mut table = Element::new("table").child(
        Element::new("tr")
            .child(Element::new("th").text("Value"))
            .child(Element::new("th").text("Count")),
    );
    for (value, count) in rows {
        table = table.child(
            Element::new("tr")
                .child(Element::new("td").text(value.clone()))
                .child(Element::new("td").text(count.to_string())),
        );
    }
    section = section.child(table);
    section
}

fn timeline_section(meta: &ReportMeta, events: &[ClassifiedEvent]) -> Element {
    let mut section = Element::new("section")
        .attr("id", "timeline")
        .child(Element::new("h2").text("Timeline"));
    for event in sorted_by_time(events.iter()) {
        section = section.child(render_card(event, meta.local_offset));
    }
    section
}

fn workload_section(meta: &ReportMeta, workload: Workload, events: &[ClassifiedEvent]) -> Element {
    let mut section = Element::new("section")
        .attr("id", workload.anchor())
        .child(Element::new("h2").text(workload.to_string()));
    let selected: Vec<&ClassifiedEvent> =
        events.iter().filter(|e| e.workload == workload).collect();
    if selected.is_empty() {
        return section.child(
            Element::new("p")
                .class("empty")
                .text("No events in this workload."),
        );
    }
    for event in sorted_by_time(selected.into_iter()) {
        section = section.child(render_card(event, meta.local_offset));
    }
    section
}

/// Timestamp ascending; the stable sort keeps ingestion order for ties and
/// undated events go last.
fn sorted_by_time<'a>(
    events: impl Iterator<Item = &'a ClassifiedEvent>,
) -> Vec<&'a ClassifiedEvent> {
    let mut sorted: Vec<&ClassifiedEvent> = events.collect();
    sorted.sort_by_key(|e| (e.timestamp().is_none(), e.timestamp()));
    sorted
}
