//! Findings column chart as a DrawingML chart part.

use rf_docx::{xml_escape, ChartFragment};
use rf_model::FindingsCount;

/// Chart anchor width: 7 inches in EMU.
pub const CHART_WIDTH_EMU: u64 = 6_400_800;

/// Chart anchor height: 5 inches in EMU.
pub const CHART_HEIGHT_EMU: u64 = 4_572_000;

/// One column of the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartColumn {
    /// Category label.
    pub label: String,
    /// Column value.
    pub value: u64,
    /// Fill color as hex RGB, no `#`.
    pub fill: String,
}

impl From<&FindingsCount> for ChartColumn {
    fn from(finding: &FindingsCount) -> Self {
        ChartColumn {
            label: finding.severity.to_string(),
            value: finding.count as u64,
            fill: finding.severity.style().fill.to_uppercase(),
        }
    }
}

/// Build a column chart from `(label, value, color)` columns.
///
/// One category per entry, in the given (pre-sorted) order, with per-point
/// fill overrides, both major gridlines, and category labels below the
/// axis. Returns `None` for an empty column list: no chart is emitted.
pub fn column_chart(name: &str, columns: &[ChartColumn]) -> Option<ChartFragment> {
    if columns.is_empty() {
        return None;
    }

    let points: String = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            format!(
                concat!(
                    "<c:dPt><c:idx val=\"{i}\"/><c:bubble3D val=\"0\"/>",
                    "<c:spPr><a:solidFill><a:srgbClr val=\"{fill}\"/></a:solidFill></c:spPr></c:dPt>"
                ),
                i = i,
                fill = col.fill,
            )
        })
        .collect();

    let categories: String = columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("<c:pt idx=\"{}\"><c:v>{}</c:v></c:pt>", i, xml_escape(&col.label)))
        .collect();

    let values: String = columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("<c:pt idx=\"{}\"><c:v>{}</c:v></c:pt>", i, col.value))
        .collect();

    let part_xml = format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
            "<c:chartSpace xmlns:c=\"http://schemas.openxmlformats.org/drawingml/2006/chart\" ",
            "xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" ",
            "xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">",
            "<c:chart><c:plotArea><c:layout/>",
            "<c:barChart><c:barDir val=\"col\"/><c:grouping val=\"clustered\"/><c:varyColors val=\"0\"/>",
            "<c:ser><c:idx val=\"0\"/><c:order val=\"0\"/>",
            "<c:tx><c:strRef><c:f></c:f><c:strCache><c:ptCount val=\"1\"/>",
            "<c:pt idx=\"0\"><c:v>{name}</c:v></c:pt></c:strCache></c:strRef></c:tx>",
            "{points}",
            "<c:cat><c:strRef><c:f></c:f><c:strCache><c:ptCount val=\"{count}\"/>{categories}</c:strCache></c:strRef></c:cat>",
            "<c:val><c:numRef><c:f></c:f><c:numCache><c:formatCode>General</c:formatCode>",
            "<c:ptCount val=\"{count}\"/>{values}</c:numCache></c:numRef></c:val>",
            "</c:ser>",
            "<c:axId val=\"1\"/><c:axId val=\"2\"/>",
            "</c:barChart>",
            "<c:catAx><c:axId val=\"1\"/><c:scaling><c:orientation val=\"minMax\"/></c:scaling>",
            "<c:delete val=\"0\"/><c:axPos val=\"b\"/><c:majorGridlines/>",
            "<c:tickLblPos val=\"low\"/><c:crossAx val=\"2\"/></c:catAx>",
            "<c:valAx><c:axId val=\"2\"/><c:scaling><c:orientation val=\"minMax\"/></c:scaling>",
            "<c:delete val=\"0\"/><c:axPos val=\"l\"/><c:majorGridlines/>",
            "<c:tickLblPos val=\"nextTo\"/><c:crossAx val=\"1\"/></c:valAx>",
            "</c:plotArea><c:plotVisOnly val=\"1\"/></c:chart></c:chartSpace>"
        ),
        name = xml_escape(name),
        points = points,
        categories = categories,
        values = values,
        count = columns.len(),
    );

    Some(ChartFragment {
        part_xml,
        name: name.to_string(),
        width_emu: CHART_WIDTH_EMU,
        height_emu: CHART_HEIGHT_EMU,
    })
}
