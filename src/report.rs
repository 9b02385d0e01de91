//! Human readable reports of a propagation, written as markdown.

use crate::optics::OpticsTable;
use crate::propagation::{Evaluation, TraceEntry};

/// Describes the beam after a single element.
pub fn format_entry(entry: &TraceEntry) -> String {
    let mut text = format!(
        "###### Element {}: {}\n\n",
        entry.element_id,
        entry.element_type.describe(false)
    );
    text.push_str(&format!(
        "\nFocus position: {:.4} mm ({:.4} mm {})\n\nFocal spot size: {:.4} mm\n",
        entry.state.origin,
        entry.focus_offset(),
        if entry.focus_is_after() { "after" } else { "before" },
        entry.state.waist
    ));
    if entry.state.is_collimated() {
        text.push_str("\n\nDepth of focus: not applicable (*Collimated beam*)\n\n");
    } else {
        text.push_str(&format!(
            "\n\nDepth of focus: {:.4} mm\n\n",
            entry.state.depth_of_focus()
        ));
    }
    text
}

/// Describes the beam after each element, in order.
pub fn format_trace(trace: &[TraceEntry]) -> String {
    trace.iter().map(format_entry).collect()
}

/// The smallest spot found on the grid.
pub fn format_smallest_spot(evaluation: &Evaluation) -> String {
    match evaluation.smallest_spot() {
        Some((z, width)) => format!(
            "**Smallest spot:** {:.4} mm at _z_ = {:.4} mm\n\n",
            width, z
        ),
        None => String::new(),
    }
}

/// A markdown table listing every element.
pub fn format_optics_overview(table: &OpticsTable) -> String {
    let mut text = String::from("| Element | Type | Position (mm) | Focal length (mm) |\n");
    text.push_str("|--------:|:-----|--------------:|------------------:|\n");
    for element in table.iter() {
        text.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            element.element_id,
            element.element_type.describe(true),
            element.position,
            element.focal_length
        ));
    }
    text
}

/// The complete report: smallest spot, optics overview and per-element breakdown.
pub fn full_report(evaluation: &Evaluation, table: &OpticsTable) -> String {
    let mut text = String::from("## Beam propagation report\n\n");
    text.push_str(&format_smallest_spot(evaluation));
    text.push_str("###### Optics overview\n\n");
    text.push_str(&format_optics_overview(table));
    text.push('\n');
    text.push_str(&evaluation.trace_text);
    text
}
