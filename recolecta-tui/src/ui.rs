use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};
use recolecta_core::{
    economics::EconomicKind,
    metrics::{RoundedMetrics, round_to},
    model::{Site, WasteCategory},
};

use crate::app::{App, Screen, join_ids};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let header = Paragraph::new("recolecta – collection route planner")
        .block(Block::default().borders(Borders::ALL).title("Recolecta"));
    frame.render_widget(header, *header_area);

    match app.screen {
        Screen::SourceSelect => draw_source_select(frame, app, *content_area),
        Screen::Planner => draw_planner(frame, app, *content_area),
    }

    let nav_hint = match app.screen {
        Screen::SourceSelect => "↑/↓ move · Enter/Space load catalog · q/Ctrl-C quit",
        Screen::Planner => {
            "↑/↓ move · Space toggle stop · Backspace drop last · c clear · f filter · r reload · Esc back · q quit"
        }
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_source_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = app
        .sources
        .iter()
        .enumerate()
        .map(|(idx, (_id, name))| {
            let prefix = if idx == app.source_list_index {
                "> "
            } else {
                "  "
            };
            ListItem::new(format!("{prefix}{name}"))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select catalog source (↑/↓, Enter)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.sources.is_empty() {
        state.select(Some(app.source_list_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_planner(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [sites_area, summary_area] = chunks else {
        return;
    };

    draw_site_list(frame, app, *sites_area);
    draw_route_summary(frame, app, *summary_area);
}

fn draw_site_list(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let sites = app.visible_sites();
    let title = format!(
        "Sites · filter {} · catalog v{} (f to change)",
        app.filter,
        app.catalog_version()
    );

    let items = if sites.is_empty() {
        vec![ListItem::new("No site matches the current filter.")]
    } else {
        sites
            .iter()
            .map(|site| {
                let marker = app
                    .selection_position(&site.id)
                    .map_or_else(|| String::from("[ ]"), |pos| format!("[{}]", pos + 1));
                let kind = site
                    .primary_category()
                    .and_then(|category| app.service.economic_model(category).ok())
                    .map(|model| model.kind);
                ListItem::new(site_line(&marker, site)).style(Style::default().fg(kind_color(kind)))
            })
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut state = ListState::default();
    if !sites.is_empty() {
        state.select(Some(app.site_list_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_route_summary(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!("Route ({} stops)", app.selection.len());

    let Some(plan) = app.plan.as_ref() else {
        let paragraph = Paragraph::new("Load a catalog and pick at least two sites.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [table_area, order_area] = chunks else {
        return;
    };

    let figures = plan.metrics.rounded();
    let net_style = if figures.net_esg_impact < 0.0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let rows = summary_rows(&figures)
        .into_iter()
        .map(|(label, value)| Row::new(vec![Cell::from(label), Cell::from(value)]))
        .chain(std::iter::once(
            Row::new(vec![
                Cell::from("Net ESG impact"),
                Cell::from(format!("{:.1} kg CO2e", figures.net_esg_impact)),
            ])
            .style(net_style.add_modifier(Modifier::BOLD)),
        ));

    let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(12)])
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);
    frame.render_widget(table, *table_area);

    let mut order = app
        .selection
        .iter()
        .enumerate()
        .map(|(idx, id)| format!("{}. {id}", idx + 1))
        .collect::<Vec<_>>()
        .join(" → ");
    if !plan.skipped.is_empty() {
        order = format!("{order}  (skipped: {})", join_ids(&plan.skipped));
    }
    let order = Paragraph::new(order)
        .block(Block::default().borders(Borders::ALL).title("Visiting order"))
        .wrap(Wrap { trim: true });
    frame.render_widget(order, *order_area);
}

fn summary_rows(figures: &RoundedMetrics) -> Vec<(&'static str, String)> {
    let discount = if figures.discounted {
        format!("-{}", format_cop(figures.discount))
    } else {
        String::from("none")
    };

    vec![
        ("Stops counted", figures.site_count.to_string()),
        ("Distance", format!("{:.2} km", figures.distance_km)),
        ("Base logistics", format_cop(figures.base_cost)),
        ("Volume discount", discount),
        ("Logistics cost", format_cop(figures.logistics_cost)),
        ("Material balance", balance_label(figures.material_balance)),
        ("Avoided CO2", format!("{:.1} kg", figures.gross_avoided_co2)),
        ("Transport CO2", format!("{:.1} kg", figures.transport_co2)),
    ]
}

fn site_line(marker: &str, site: &Site) -> String {
    let category = site
        .primary_category()
        .map_or("—", WasteCategory::code);
    let verified = if site.verified { " ✔" } else { "" };
    format!(
        "{marker} {}{verified} · {category} · {} · {}/{}",
        site.name,
        site.quantity_label,
        format_cop(site.price_per_unit),
        site.unit.symbol()
    )
}

/// Positive balances are paid out by the processor, negative ones collected from generators.
fn balance_label(balance: f64) -> String {
    if balance > 0.0 {
        format!("{} to generators", format_cop(balance))
    } else if balance < 0.0 {
        format!("{} from generators", format_cop(-balance))
    } else {
        format_cop(0.0)
    }
}

fn kind_color(kind: Option<EconomicKind>) -> Color {
    match kind {
        Some(EconomicKind::Revenue) => Color::Green,
        Some(EconomicKind::Free) => Color::Blue,
        Some(EconomicKind::Cost) => Color::Red,
        None => Color::Gray,
    }
}

/// Whole-peso amount with `.` thousand separators, e.g. `-$ 91.000`.
fn format_cop(value: f64) -> String {
    let value = round_to(value, 0);
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}$ {grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_pesos_with_separators() {
        assert_eq!(format_cop(0.0), "$ 0");
        assert_eq!(format_cop(200.0), "$ 200");
        assert_eq!(format_cop(6254.8), "$ 6.255");
        assert_eq!(format_cop(-91_000.0), "-$ 91.000");
        assert_eq!(format_cop(1_234_567.0), "$ 1.234.567");
        assert_eq!(format_cop(-0.2), "$ 0");
    }

    #[test]
    fn half_pesos_round_away_from_zero() {
        assert_eq!(format_cop(2.5), "$ 3");
        assert_eq!(format_cop(6254.5), "$ 6.255");
        assert_eq!(format_cop(-2.5), "-$ 3");
        assert_eq!(format_cop(999.5), "$ 1.000");
    }

    #[test]
    fn balance_label_names_the_payer() {
        assert_eq!(balance_label(9000.0), "$ 9.000 to generators");
        assert_eq!(balance_label(-91_000.0), "$ 91.000 from generators");
        assert_eq!(balance_label(0.0), "$ 0");
    }

    #[test]
    fn summary_marks_missing_discount() {
        let rows = summary_rows(&RoundedMetrics::default());
        assert!(rows.iter().any(|(label, value)| *label == "Volume discount" && value == "none"));
    }

    #[test]
    fn summary_shows_discount_for_qualifying_route() {
        let figures = RoundedMetrics {
            site_count: 3,
            discounted: true,
            ..RoundedMetrics::default()
        };
        let rows = summary_rows(&figures);
        assert!(rows.iter().any(|(label, value)| *label == "Volume discount" && value == "-$ 0"));
    }
}
