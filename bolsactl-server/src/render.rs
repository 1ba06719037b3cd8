//! Server-side HTML for `PageView`s
//!
//! Plain string building; charts are handed to plotly.js as embedded JSON.

use std::fmt::Write as _;

use bolsactl_core::filters::{
    KEY_CATEGORY, KEY_DATE_FROM, KEY_DATE_TO, KEY_DISCIPLINE, KEY_STATE, KEY_VALUE_MAX,
    KEY_VALUE_MIN,
};
use bolsactl_core::{GlobalFilters, Page};

use crate::charts::Chart;
use crate::pages::{Block, Control, FilterOptions, Notice, NoticeLevel, PageView, Table};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = r#"
body { margin: 0; font-family: "Source Sans Pro", Helvetica, Arial, sans-serif; color: #262730; display: flex; }
nav { width: 280px; min-height: 100vh; background: #f0f2f6; padding: 1.5rem 1rem; box-sizing: border-box; }
nav a { display: block; padding: .35rem .5rem; color: #262730; text-decoration: none; border-radius: .3rem; }
nav a.active { background: #ff4b4b; color: white; }
nav label { display: block; margin-top: .6rem; font-size: .85rem; }
nav select, nav input { width: 100%; box-sizing: border-box; }
main { flex: 1; padding: 1.5rem 3rem; min-width: 0; }
.metrics { display: flex; gap: 1rem; margin: 1rem 0; }
.metric { flex: 1; }
.metric .label { font-size: .85rem; color: #555; }
.metric .value { font-size: 1.8rem; }
.columns { display: flex; gap: 1.5rem; }
.columns > div { flex: 1; min-width: 0; }
.notice { padding: .8rem 1rem; border-radius: .4rem; margin: .5rem 0; }
.notice.info { background: #e8f0fe; }
.notice.warning { background: #fff8e1; }
.notice.success { background: #e6f4ea; }
.table-wrap { max-height: 420px; overflow: auto; }
table { border-collapse: collapse; font-size: .85rem; }
th, td { border: 1px solid #e6e9ef; padding: .25rem .6rem; text-align: left; white-space: nowrap; }
th { background: #fafafa; position: sticky; top: 0; }
form.controls { display: flex; gap: 1rem; align-items: flex-end; flex-wrap: wrap; }
"#;

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// JSON safe to embed inside a `<script>` element
fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// Full HTML document for one page
pub fn page_html(view: &PageView, options: &FilterOptions, filters: &GlobalFilters) -> String {
    let mut html = String::with_capacity(16 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Bolsa Atleta - Dashboard · {}</title>\n\
         <script src=\"{}\"></script>\n<style>{}</style>\n</head>\n<body>\n",
        escape_html(view.title),
        PLOTLY_CDN,
        STYLE
    );

    sidebar(&mut html, view.page, options, filters);

    html.push_str("<main>\n<h1>🏃 Dashboard - Bolsa Atleta</h1>\n<hr>\n");
    let _ = writeln!(html, "<h2>{}</h2>", escape_html(&view.header));

    if !view.controls.is_empty() {
        controls(&mut html, view.page, &view.controls);
    }

    let mut charts = 0;
    blocks(&mut html, &view.blocks, &mut charts);

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn sidebar(html: &mut String, current: Page, options: &FilterOptions, filters: &GlobalFilters) {
    html.push_str("<nav>\n<h3>📊 Navegação</h3>\n");
    for page in Page::ALL {
        let class = if page == current { " class=\"active\"" } else { "" };
        let _ = writeln!(
            html,
            "<a href=\"/{}\"{}>{}</a>",
            page.slug(),
            class,
            escape_html(page.title())
        );
    }

    html.push_str("<hr>\n<h3>🔧 Filtros Globais</h3>\n<form method=\"get\" action=\"/overview\">\n");
    multi_select(html, KEY_CATEGORY, "Categorias:", &options.categories, &filters.categories);
    multi_select(html, KEY_DISCIPLINE, "Modalidades:", &options.disciplines, &filters.disciplines);
    multi_select(html, KEY_STATE, "Estados (UF):", &options.states, &filters.states);

    html.push_str("<h4>Período</h4>\n");
    let bound = |d: &Option<String>| d.as_deref().map(escape_html).unwrap_or_default();
    let (min, max) = (bound(&options.min_date), bound(&options.max_date));
    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    let _ = writeln!(
        html,
        "<label>Data Início:<input type=\"date\" name=\"{}\" min=\"{min}\" max=\"{max}\" value=\"{}\"></label>",
        KEY_DATE_FROM,
        date(filters.date_from)
    );
    let _ = writeln!(
        html,
        "<label>Data Fim:<input type=\"date\" name=\"{}\" min=\"{min}\" max=\"{max}\" value=\"{}\"></label>",
        KEY_DATE_TO,
        date(filters.date_to)
    );

    html.push_str("<h4>Valor</h4>\n");
    let amount = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    let _ = writeln!(
        html,
        "<label>Valor Mínimo (R$):<input type=\"number\" min=\"0\" step=\"100\" name=\"{}\" value=\"{}\"></label>",
        KEY_VALUE_MIN,
        amount(filters.value_min)
    );
    let _ = writeln!(
        html,
        "<label>Valor Máximo (R$, 0 = sem limite):<input type=\"number\" min=\"0\" step=\"100\" name=\"{}\" value=\"{}\"></label>",
        KEY_VALUE_MAX,
        amount(filters.value_max)
    );

    html.push_str(
        "<p><button type=\"submit\">Aplicar</button> <a href=\"/overview\">🔄 Limpar Filtros</a></p>\n\
         </form>\n<hr>\n\
         <div class=\"notice info\">💡 <b>Dica:</b> os filtros globais personalizam a Visão Geral.</div>\n\
         </nav>\n",
    );
}

fn multi_select(html: &mut String, name: &str, label: &str, values: &[String], selected: &[String]) {
    let _ = writeln!(
        html,
        "<label>{}<select name=\"{}\" multiple size=\"4\">",
        escape_html(label),
        name
    );
    for value in values {
        let sel = if selected.contains(value) { " selected" } else { "" };
        let v = escape_html(value);
        let _ = writeln!(html, "<option value=\"{v}\"{sel}>{v}</option>");
    }
    html.push_str("</select></label>\n");
}

fn controls(html: &mut String, page: Page, controls: &[Control]) {
    let _ = writeln!(html, "<form class=\"controls\" method=\"get\" action=\"/{}\">", page.slug());
    for control in controls {
        match control {
            Control::Select { name, label, options, selected } => {
                let _ = writeln!(html, "<label>{}<br><select name=\"{}\">", escape_html(label), name);
                for option in options {
                    let sel = if &option.value == selected { " selected" } else { "" };
                    let _ = writeln!(
                        html,
                        "<option value=\"{}\"{}>{}</option>",
                        escape_html(&option.value),
                        sel,
                        escape_html(&option.label)
                    );
                }
                html.push_str("</select></label>\n");
            }
            Control::Text { name, label, value } => {
                let _ = writeln!(
                    html,
                    "<label>{}<br><input type=\"text\" name=\"{}\" value=\"{}\"></label>",
                    escape_html(label),
                    name,
                    escape_html(value)
                );
            }
            Control::Range { name, label, min, max, value } => {
                let _ = writeln!(
                    html,
                    "<label>{}<br><input type=\"range\" name=\"{name}\" min=\"{min}\" max=\"{max}\" value=\"{value}\" \
                     oninput=\"this.nextElementSibling.textContent=this.value\"><output>{value}</output></label>",
                    escape_html(label),
                );
            }
        }
    }
    html.push_str("<button type=\"submit\">Atualizar</button>\n</form>\n");
}

fn blocks(html: &mut String, blocks: &[Block], charts: &mut usize) {
    for block in blocks {
        match block {
            Block::Subheader { text } => {
                let _ = writeln!(html, "<h3>{}</h3>", escape_html(text));
            }
            Block::Metrics { items } => {
                html.push_str("<div class=\"metrics\">\n");
                for metric in items {
                    let _ = writeln!(
                        html,
                        "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
                        escape_html(&metric.label),
                        escape_html(&metric.value)
                    );
                }
                html.push_str("</div>\n");
            }
            Block::Chart(chart) => {
                chart_html(html, chart, *charts);
                *charts += 1;
            }
            Block::Columns { columns } => {
                html.push_str("<div class=\"columns\">\n");
                for column in columns {
                    html.push_str("<div>\n");
                    self::blocks(html, column, charts);
                    html.push_str("</div>\n");
                }
                html.push_str("</div>\n");
            }
            Block::Table(table) => table_html(html, table),
            Block::Notice(notice) => notice_html(html, notice),
            Block::Text { text } => {
                let _ = writeln!(html, "<p>{}</p>", escape_html(text));
            }
            Block::Divider => html.push_str("<hr>\n"),
        }
    }
}

fn chart_html(html: &mut String, chart: &Chart, index: usize) {
    let _ = writeln!(
        html,
        "<div id=\"chart-{index}\"></div>\n<script>(function(){{var f={};\
         Plotly.newPlot('chart-{index}',f.data,f.layout,{{responsive:true}});}})();</script>",
        script_json(&chart.figure)
    );
}

fn table_html(html: &mut String, table: &Table) {
    html.push_str("<div class=\"table-wrap\"><table>\n<thead><tr>");
    for column in &table.columns {
        let _ = write!(html, "<th>{}</th>", escape_html(column));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape_html(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table></div>\n");
}

fn notice_html(html: &mut String, notice: &Notice) {
    let class = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Success => "success",
    };
    let _ = writeln!(
        html,
        "<div class=\"notice {}\">{}</div>",
        class,
        escape_html(&notice.text)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::Metric;

    fn view() -> PageView {
        PageView {
            page: Page::Athletes,
            title: Page::Athletes.title(),
            header: "🔍 Busca de Atletas".into(),
            controls: vec![Control::Text {
                name: "nome",
                label: "Nome:",
                value: "<script>alert(1)</script>".into(),
            }],
            blocks: vec![
                Block::Metrics {
                    items: vec![Metric::new("Valor Total", "R$ 1,850.00")],
                },
                Block::Notice(Notice::warning("Nenhum atleta encontrado com esse nome.")),
            ],
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_page_html_escapes_user_input() {
        let html = page_html(&view(), &FilterOptions::default(), &GlobalFilters::default());
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_page_html_layout() {
        let options = FilterOptions {
            states: vec!["RJ".into(), "SP".into()],
            ..FilterOptions::default()
        };
        let filters = GlobalFilters::from_pairs([("uf", "SP")]).unwrap();
        let html = page_html(&view(), &options, &filters);

        for page in Page::ALL {
            assert!(html.contains(&format!("href=\"/{}\"", page.slug())));
        }
        assert!(html.contains("<a href=\"/athletes\" class=\"active\">"));
        assert!(html.contains("<option value=\"SP\" selected>SP</option>"));
        assert!(html.contains("<option value=\"RJ\">RJ</option>"));
        assert!(html.contains("<div class=\"notice warning\">"));
        assert!(html.contains("R$ 1,850.00"));
    }

    #[test]
    fn test_chart_json_cannot_close_script() {
        let value = serde_json::json!({ "title": "</script><b>" });
        assert_eq!(script_json(&value), r#"{"title":"<\/script><b>"}"#);
    }
}
