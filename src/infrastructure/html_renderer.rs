// Server-side HTML rendering of the dashboard page, charts as inline SVG
use crate::domain::chart::{BarChart, ChartData, TimeSeriesPoint};
use crate::domain::dashboard::{Block, Dashboard, Sidebar, TableView};
use chrono::DateTime;
use std::fmt::Write;

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 340.0;
const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 56.0;

const PALETTE: [&str; 4] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728"];

const STYLE: &str = "\
body{margin:0;font-family:Inter,Segoe UI,sans-serif;display:flex;color:#1d2330}\
aside{width:260px;min-height:100vh;padding:24px;background:#f0f2f6;box-sizing:border-box}\
aside ul{list-style:none;padding:0}\
main{flex:1;padding:24px 40px}\
.tabs>input{display:none}\
.tabs>label{display:inline-block;padding:8px 16px;cursor:pointer;border-bottom:2px solid transparent}\
.tabs>input:checked+label{border-bottom-color:#ff4b4b;color:#ff4b4b}\
.panel{display:none;padding-top:16px}\
table{border-collapse:collapse;font-size:13px;margin:8px 0}\
th,td{border:1px solid #e3e6ec;padding:4px 8px;text-align:right}\
.info{background:#e8f0fe;padding:12px;border-radius:6px}\
.warning{background:#fff6d6;padding:12px;border-radius:6px}\
.caption{color:#6b7280;font-size:13px}\
.muted{color:#6b7280;font-size:12px}";

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut html = String::new();

    let _ = writeln!(html, "<!doctype html>");
    let _ = writeln!(html, "<html lang='pt-BR'><head><meta charset='utf-8'>");
    let _ = writeln!(html, "<title>{}</title>", escape_text(&dashboard.title));
    let _ = write!(html, "<style>{STYLE}");
    for idx in 0..dashboard.tabs.len() {
        let _ = write!(html, "#tab-{idx}:checked~#panel-{idx}{{display:block}}");
    }
    let _ = writeln!(html, "</style></head><body>");

    render_sidebar(&mut html, &dashboard.sidebar);

    let _ = writeln!(html, "<main>");
    let _ = writeln!(html, "<h1>{}</h1>", escape_text(&dashboard.title));
    let _ = writeln!(html, "<div class='tabs'>");
    for (idx, tab) in dashboard.tabs.iter().enumerate() {
        let checked = if idx == 0 { " checked" } else { "" };
        let _ = writeln!(
            html,
            "<input type='radio' name='tabs' id='tab-{idx}'{checked}><label for='tab-{idx}'>{}</label>",
            escape_text(&tab.title)
        );
    }
    for (idx, tab) in dashboard.tabs.iter().enumerate() {
        let _ = writeln!(html, "<section class='panel' id='panel-{idx}'>");
        for section in &tab.sections {
            let _ = writeln!(html, "<h3>{}</h3>", escape_text(&section.heading));
            for block in &section.blocks {
                render_block(&mut html, block);
            }
        }
        let _ = writeln!(html, "</section>");
    }
    let _ = writeln!(html, "</div></main></body></html>");

    html
}

fn render_sidebar(html: &mut String, sidebar: &Sidebar) {
    let _ = writeln!(html, "<aside>");
    let _ = writeln!(html, "<h2>{}</h2>", escape_text(&sidebar.header));
    let _ = writeln!(html, "<ul>");
    for status in &sidebar.artifacts {
        let _ = writeln!(html, "<li>{}</li>", escape_text(&status.label()));
    }
    let _ = writeln!(html, "</ul><hr>");
    let _ = writeln!(html, "<p>{}</p>", escape_text(&sidebar.hint));
    let _ = writeln!(html, "</aside>");
}

fn render_block(html: &mut String, block: &Block) {
    match block {
        Block::Table(table) => render_table(html, table),
        Block::BarChart(chart) => render_bar_chart(html, chart),
        Block::LineChart(chart) => render_line_chart(html, chart),
        Block::Info { message } => {
            let _ = writeln!(html, "<div class='info'>{}</div>", escape_text(message));
        }
        Block::Warning { message } => {
            let _ = writeln!(html, "<div class='warning'>{}</div>", escape_text(message));
        }
        Block::Callout { message } => {
            let _ = writeln!(html, "<p>{}</p>", escape_text(message));
        }
        Block::Caption { message } => {
            let _ = writeln!(html, "<p class='caption'>{}</p>", escape_text(message));
        }
        Block::Note { message } => {
            let _ = writeln!(html, "<p><strong>{}</strong></p>", escape_text(message));
        }
    }
}

fn render_table(html: &mut String, table: &TableView) {
    let _ = writeln!(html, "<table><thead><tr>");
    for column in &table.columns {
        let _ = write!(html, "<th>{}</th>", escape_text(column));
    }
    let _ = writeln!(html, "</tr></thead><tbody>");
    for row in &table.rows {
        let _ = write!(html, "<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape_text(cell));
        }
        let _ = writeln!(html, "</tr>");
    }
    let _ = writeln!(html, "</tbody></table>");

    if table.rows.len() < table.total_rows {
        let _ = writeln!(
            html,
            "<p class='muted'>{} de {} linhas</p>",
            table.rows.len(),
            table.total_rows
        );
    }
}

/// Linear mapping of a data range onto a pixel range.
#[derive(Debug, Clone, Copy)]
struct Scale {
    min: f64,
    max: f64,
    start: f64,
    end: f64,
}

impl Scale {
    fn new(min: f64, max: f64, start: f64, end: f64) -> Self {
        // Flat ranges would divide by zero.
        let (min, max) = if (max - min).abs() < f64::EPSILON {
            (min - 1.0, max + 1.0)
        } else {
            (min, max)
        };
        Self {
            min,
            max,
            start,
            end,
        }
    }

    fn map(&self, value: f64) -> f64 {
        self.start + (value - self.min) / (self.max - self.min) * (self.end - self.start)
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Split a series into runs of consecutive present values.
fn segments(points: &[TimeSeriesPoint]) -> Vec<Vec<(i64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for point in points {
        match point.value {
            Some(value) => current.push((point.time_ms, value)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn plot_frame(svg: &mut String, title: &str, x_label: &str, y_label: &str) {
    let plot_bottom = CHART_HEIGHT - MARGIN_BOTTOM;
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{CHART_WIDTH:.0}' height='{CHART_HEIGHT:.0}' viewBox='0 0 {CHART_WIDTH:.0} {CHART_HEIGHT:.0}' role='img'>"
    );
    let _ = writeln!(
        svg,
        "  <text x='{:.0}' y='24' text-anchor='middle' font-size='15' font-weight='600'>{}</text>",
        CHART_WIDTH / 2.0,
        escape_text(title)
    );
    let _ = writeln!(
        svg,
        "  <line x1='{MARGIN_LEFT:.0}' y1='{MARGIN_TOP:.0}' x2='{MARGIN_LEFT:.0}' y2='{plot_bottom:.0}' stroke='#555'/>"
    );
    let _ = writeln!(
        svg,
        "  <line x1='{MARGIN_LEFT:.0}' y1='{plot_bottom:.0}' x2='{:.0}' y2='{plot_bottom:.0}' stroke='#555'/>",
        CHART_WIDTH - MARGIN_RIGHT
    );
    let _ = writeln!(
        svg,
        "  <text x='{:.0}' y='{:.0}' text-anchor='middle' font-size='12'>{}</text>",
        MARGIN_LEFT + (CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / 2.0,
        CHART_HEIGHT - 10.0,
        escape_text(x_label)
    );
    let y_mid = MARGIN_TOP + (plot_bottom - MARGIN_TOP) / 2.0;
    let _ = writeln!(
        svg,
        "  <text x='16' y='{y_mid:.0}' text-anchor='middle' font-size='12' transform='rotate(-90 16 {y_mid:.0})'>{}</text>",
        escape_text(y_label)
    );
}

fn y_ticks(svg: &mut String, y: &Scale) {
    for value in [y.min, y.max] {
        let _ = writeln!(
            svg,
            "  <text x='{:.0}' y='{:.1}' text-anchor='end' font-size='11'>{}</text>",
            MARGIN_LEFT - 6.0,
            y.map(value) + 4.0,
            format_tick(value)
        );
    }
}

fn render_line_chart(html: &mut String, chart: &ChartData) {
    let plot_bottom = CHART_HEIGHT - MARGIN_BOTTOM;
    let plot_right = CHART_WIDTH - MARGIN_RIGHT;

    let all_points = || chart.series.iter().flat_map(|s| s.points.iter());
    let (x_min, x_max) = bounds(all_points().map(|p| p.time_ms as f64)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = bounds(all_points().filter_map(|p| p.value)).unwrap_or((0.0, 1.0));
    let x = Scale::new(x_min, x_max, MARGIN_LEFT, plot_right);
    let y = Scale::new(y_min, y_max, plot_bottom, MARGIN_TOP);

    let mut svg = String::new();
    plot_frame(&mut svg, &chart.title, &chart.x_label, &chart.y_label);
    y_ticks(&mut svg, &y);

    if let Some((first, last)) = bounds(all_points().map(|p| p.time_ms as f64)) {
        for (value, anchor) in [(first, "start"), (last, "end")] {
            let _ = writeln!(
                svg,
                "  <text x='{:.1}' y='{:.0}' text-anchor='{anchor}' font-size='11'>{}</text>",
                x.map(value),
                plot_bottom + 16.0,
                format_month(value as i64)
            );
        }
    }

    for (idx, series) in chart.series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];

        for run in segments(&series.points) {
            if let [(time_ms, value)] = run.as_slice() {
                let _ = writeln!(
                    svg,
                    "  <circle class='series-{idx}' cx='{:.1}' cy='{:.1}' r='2.5' fill='{color}'/>",
                    x.map(*time_ms as f64),
                    y.map(*value)
                );
                continue;
            }

            let points: Vec<String> = run
                .iter()
                .map(|(time_ms, value)| format!("{:.1},{:.1}", x.map(*time_ms as f64), y.map(*value)))
                .collect();
            let _ = writeln!(
                svg,
                "  <polyline class='series-{idx}' points='{}' fill='none' stroke='{color}' stroke-width='1.5'/>",
                points.join(" ")
            );
        }

        // Legend
        let legend_y = MARGIN_TOP + 8.0 + idx as f64 * 18.0;
        let _ = writeln!(
            svg,
            "  <line x1='{:.0}' y1='{legend_y:.0}' x2='{:.0}' y2='{legend_y:.0}' stroke='{color}' stroke-width='2'/>",
            plot_right - 170.0,
            plot_right - 150.0
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.0}' y='{:.0}' font-size='12'>{}</text>",
            plot_right - 144.0,
            legend_y + 4.0,
            escape_text(&series.name)
        );
    }

    let _ = writeln!(svg, "</svg>");
    let _ = writeln!(html, "<figure id='{}'>{svg}</figure>", escape_text(&chart.id));
}

fn render_bar_chart(html: &mut String, chart: &BarChart) {
    let plot_bottom = CHART_HEIGHT - MARGIN_BOTTOM;
    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

    let (lo, hi) = bounds(chart.bars.iter().filter_map(|b| b.value)).unwrap_or((0.0, 1.0));
    let y = Scale::new(lo.min(0.0), hi.max(0.0), plot_bottom, MARGIN_TOP);

    let mut svg = String::new();
    plot_frame(&mut svg, &chart.title, &chart.x_label, &chart.y_label);
    y_ticks(&mut svg, &y);

    let slot = plot_width / chart.bars.len().max(1) as f64;
    let baseline = y.map(0.0);
    for (idx, bar) in chart.bars.iter().enumerate() {
        let center = MARGIN_LEFT + slot * (idx as f64 + 0.5);
        if let Some(value) = bar.value {
            let top = y.map(value).min(baseline);
            let height = (y.map(value) - baseline).abs();
            let _ = writeln!(
                svg,
                "  <rect class='bar' x='{:.1}' y='{top:.1}' width='{:.1}' height='{height:.1}' fill='{}'><title>{}</title></rect>",
                center - slot * 0.4,
                slot * 0.8,
                PALETTE[0],
                format_tick(value)
            );
        }
        let _ = writeln!(
            svg,
            "  <text x='{center:.1}' y='{:.0}' text-anchor='middle' font-size='11'>{}</text>",
            plot_bottom + 16.0,
            escape_text(&bar.label)
        );
    }

    let _ = writeln!(svg, "</svg>");
    let _ = writeln!(html, "<figure id='{}'>{svg}</figure>", escape_text(&chart.id));
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn format_month(time_ms: i64) -> String {
    DateTime::from_timestamp_millis(time_ms)
        .map(|dt| dt.format("%Y-%m").to_string())
        .unwrap_or_default()
}

pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
