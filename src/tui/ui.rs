use crate::profile::{ChartConfig, ChartKind, ChartPoint, Discrete, Header, MapFeature, SectionOutcome, SectionView};
use crate::search::SearchStatus;
use crate::text::{title_case, truncate_width};
use crate::tui::app::App;
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Map, MapResolution};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Tabs,
    Wrap,
};

/// Rows one section box takes when the screen allows
const SECTION_HEIGHT: u16 = 14;
const HEADER_HEIGHT: u16 = 9;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Profile
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_search_bar(frame, app, chunks[0]);
    draw_profile(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if app.search.has_focus() {
        draw_results(frame, app, chunks[0], area);

        // Border (1) + space (1) + search icon (2) + space (1)
        let cursor_x = chunks[0].x + 1 + 4 + app.search.input().cursor_column() as u16;
        let cursor_y = chunks[0].y + 1;
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search.has_focus() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search locations ");

    let search_text = format!(" \u{1F50D} {}", app.search.input().value);
    let paragraph = Paragraph::new(search_text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

/// Results dropdown under the search bar
fn draw_results(frame: &mut Frame, app: &App, bar: Rect, area: Rect) {
    let state = app.search.state();
    let lines: Vec<Line> = match state.status() {
        SearchStatus::Idle => return,
        SearchStatus::Pending if state.results().is_empty() => {
            vec![Line::styled(" Searching...", Style::default().fg(Color::Yellow))]
        }
        SearchStatus::NoResults => vec![Line::styled(
            format!(" No results for \"{}\"", state.query()),
            Style::default().fg(Color::Gray),
        )],
        SearchStatus::Failed(message) => {
            vec![Line::styled(format!(" {}", message), Style::default().fg(Color::Red))]
        }
        SearchStatus::Pending | SearchStatus::Ready => state
            .results()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if state.highlighted() == Some(i) {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                let text = format!(" {} ", truncate_width(&item.name, bar.width.saturating_sub(4) as usize));
                Line::styled(text, style)
            })
            .collect(),
    };

    let below = area.bottom().saturating_sub(bar.bottom());
    let height = (lines.len() as u16 + 2).min(below);
    if height < 3 {
        return;
    }
    let popup = Rect::new(bar.x, bar.bottom(), bar.width, height);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::status_color(state.status())));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn draw_profile(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(page) = app.page.as_ref() else {
        let text = match &app.loading {
            Some(id) => format!("Loading {}...", id),
            None => "Press s to search for a country or region.".to_string(),
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
        frame.render_widget(paragraph, area);
        return;
    };

    let show_filter = app.filter_focused || !app.filter.value.is_empty();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(1), // Topic tabs
            Constraint::Length(u16::from(show_filter)),
            Constraint::Min(3), // Sections
        ])
        .split(area);

    draw_header(frame, &page.header, chunks[0]);

    let titles: Vec<&str> = page.topics.iter().map(|t| t.title).collect();
    let tabs = Tabs::new(titles)
        .select(app.topic)
        .style(Style::default().fg(Color::Gray).bg(colors::PANEL_BG))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD))
        .divider("|");
    frame.render_widget(tabs, chunks[1]);

    if show_filter {
        draw_filter(frame, app, chunks[2]);
    }
    draw_sections(frame, app, chunks[3]);
}

fn draw_header(frame: &mut Frame, header: &Header, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut lines = vec![
        Line::styled(
            header.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Line::styled(header.splash.clone(), Style::default().fg(Color::DarkGray)),
        Line::default(),
    ];
    for stat in &header.stats {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", stat.label), Style::default().fg(Color::Gray)),
            Span::styled(stat.value.clone(), Style::default().fg(Color::White)),
        ]));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), halves[0]);

    let map = &header.map;
    let selected = MapFeature::new(
        map.entity_id.clone(),
        map.entity_iso3.clone().unwrap_or_default(),
    );
    let selected_label = map.entity_iso3.clone().unwrap_or_else(|| map.entity_id.clone());
    let selected_color = colors::blend(map.fill(&selected));
    let focus_color = map
        .focus_iso
        .first()
        .map(|iso| colors::blend(map.fill(&MapFeature::new("", iso.clone()))));
    let focus_label = map.focus_iso.join(", ");

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::to_color(map.stroke.rgb)))
                .title(format!(" {} ", map.topojson)),
        )
        .marker(Marker::Braille)
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0])
        .paint(move |ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::Low,
                color: colors::MAP_LAND,
            });
            ctx.layer();
            ctx.print(
                -175.0,
                -70.0,
                Line::styled(format!("\u{25A0} {}", selected_label), Style::default().fg(selected_color)),
            );
            if let Some(color) = focus_color {
                ctx.print(
                    -175.0,
                    -85.0,
                    Line::styled(format!("\u{25A0} {}", focus_label), Style::default().fg(color)),
                );
            }
        });
    frame.render_widget(canvas, halves[1]);
}

fn draw_filter(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.filter_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    let line = Line::from(vec![
        Span::styled(" Filter: ", style),
        Span::styled(app.filter.value.clone(), Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    if app.filter_focused {
        let cursor_x = area.x + 9 + app.filter.cursor_column() as u16;
        frame.set_cursor_position(Position::new(cursor_x, area.y));
    }
}

fn draw_sections(frame: &mut Frame, app: &mut App, area: Rect) {
    app.scroll.visible_rows = (area.height / SECTION_HEIGHT).max(1) as usize;

    let sections = app.visible_sections();
    if sections.is_empty() {
        let paragraph = Paragraph::new(format!("No sections match \"{}\"", app.filter.value))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let start = app.scroll.scroll_offset.min(sections.len() - 1);
    let shown = &sections[start..(start + app.scroll.visible_rows).min(sections.len())];
    let constraints = vec![Constraint::Ratio(1, shown.len() as u32); shown.len()];
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, (section, slot)) in shown.iter().zip(slots.iter()).enumerate() {
        let selected = app.scroll.selected == Some(start + i);
        draw_section(frame, app, section, selected, *slot);
    }
}

fn draw_section(frame: &mut Frame, app: &App, section: &SectionView, selected: bool, area: Rect) {
    let border_style = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", section.title))
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let content = match &section.outcome {
        SectionOutcome::Ready(content) => content,
        SectionOutcome::Failed { message } => {
            let paragraph = Paragraph::new(message.clone())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let year = app.chart_year(&content.chart);
    if let Some(year) = year {
        block = block.title_bottom(Line::from(format!(" [ {} ] ", year)).right_aligned());
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let narrative = Paragraph::new(content.narrative.clone())
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
    frame.render_widget(narrative, chunks[0]);

    let chart = &content.chart;
    let points = chart.points_for(year);
    if points.is_empty() {
        return;
    }
    match (chart.kind, chart.discrete) {
        (ChartKind::Scatter, _) => draw_scatter(frame, chart, &points, chunks[1]),
        (ChartKind::Bar, Discrete::Y) => {
            let rows = if chart.stacked {
                stack_rows(&points)
            } else {
                points.iter().map(|p| (p.label.clone(), vec![*p])).collect()
            };
            draw_bar_rows(frame, chart, &rows, chunks[1]);
        }
        (ChartKind::Bar, Discrete::X) => draw_columns(frame, chart, &points, chunks[1]),
    }
}

/// Group stacked points into one row per category and leading group part,
/// so `male_severe` and `male_moderate` share the `Stunted Male` row
fn stack_rows<'a>(points: &[&'a ChartPoint]) -> Vec<(String, Vec<&'a ChartPoint>)> {
    let mut rows: Vec<(String, Vec<&ChartPoint>)> = Vec::new();
    for point in points {
        let key = match point.group.split_once('_') {
            Some((lead, _)) => format!("{} {}", point.category, title_case(lead)),
            None => point.category.clone(),
        };
        match rows.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(point),
            None => rows.push((key, vec![*point])),
        }
    }
    rows
}

/// Value spanning the full bar width: the axis max, widened to the largest
/// row total so stacked segments never run past the bar
fn row_scale(chart: &ChartConfig, rows: &[(String, Vec<&ChartPoint>)]) -> f64 {
    let largest_total = rows
        .iter()
        .map(|(_, members)| members.iter().map(|p| p.value.max(0.0)).sum::<f64>())
        .fold(0.0, f64::max);
    let max = chart.max_value().max(largest_total);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

fn draw_bar_rows(frame: &mut Frame, chart: &ChartConfig, rows: &[(String, Vec<&ChartPoint>)], area: Rect) {
    let format = chart.value_format();
    let max = row_scale(chart, rows);

    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
        .min(area.width as usize / 3);
    let bar_width = (area.width as usize).saturating_sub(label_width + 10);

    let lines: Vec<Line> = rows
        .iter()
        .take(area.height as usize)
        .map(|(label, members)| {
            let mut spans = vec![Span::styled(
                format!("{:<width$} ", truncate_width(label, label_width), width = label_width),
                Style::default().fg(Color::Gray),
            )];
            for p in members {
                let cells = ((p.value / max) * bar_width as f64).round().max(0.0) as usize;
                spans.push(Span::styled(
                    "\u{2588}".repeat(cells),
                    Style::default().fg(colors::point_color(p.fill, p.opacity)),
                ));
            }
            let total: f64 = members.iter().map(|p| p.value).sum();
            spans.push(Span::styled(format!(" {}", format.apply(total)), Style::default().fg(Color::White)));
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_columns(frame: &mut Frame, chart: &ChartConfig, points: &[&ChartPoint], area: Rect) {
    let format = chart.value_format();
    let max = chart.max_value();
    // Bar values are integers; keep precision for shares
    let scale = if max <= 1.0 { 1000.0 } else { 1.0 };

    let gap = 1u16;
    let bar_width = (area.width / points.len().max(1) as u16)
        .saturating_sub(gap)
        .clamp(1, 12);

    let bars: Vec<Bar> = points
        .iter()
        .map(|p| {
            Bar::default()
                .value((p.value * scale).round().max(0.0) as u64)
                .label(Line::from(truncate_width(&p.category, bar_width as usize)))
                .text_value(format.apply(p.value))
                .style(Style::default().fg(colors::point_color(p.fill, p.opacity)))
                .value_style(Style::default().fg(Color::Black).bg(colors::to_color(p.fill)))
        })
        .collect();

    let barchart = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(gap)
        .max((max * scale).round() as u64)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(barchart, area);
}

fn draw_scatter(frame: &mut Frame, chart: &ChartConfig, points: &[&ChartPoint], area: Rect) {
    let coords: Vec<[(f64, f64); 1]> = points
        .iter()
        .map(|p| [(p.position.unwrap_or_default(), p.value)])
        .collect();
    let x_max = coords.iter().map(|c| c[0].0).fold(0.0, f64::max) * 1.1;
    let y_max = coords.iter().map(|c| c[0].1).fold(0.0, f64::max) * 1.1;
    let x_max = if x_max > 0.0 { x_max } else { 1.0 };
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };

    let datasets: Vec<Dataset> = points
        .iter()
        .zip(coords.iter())
        .map(|(p, c)| {
            Dataset::default()
                .name(p.label.clone())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(colors::to_color(p.fill)))
                .data(c)
        })
        .collect();

    let axis_style = Style::default().fg(Color::Gray);
    let x_format = chart.x_config.tick_format;
    let y_format = chart.y_config.tick_format;
    let widget = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(chart.x_config.title.clone())
                .style(axis_style)
                .bounds([0.0, x_max])
                .labels([x_format.apply(0.0), x_format.apply(x_max / 2.0), x_format.apply(x_max)]),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_config.title.clone())
                .style(axis_style)
                .bounds([0.0, y_max])
                .labels([y_format.apply(0.0), y_format.apply(y_max)]),
        );
    frame.render_widget(widget, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = if app.search.has_focus() {
        match app.search.state().status() {
            SearchStatus::Idle => " Type to search".to_string(),
            SearchStatus::Pending => " Searching...".to_string(),
            SearchStatus::Ready => format!(" {} results", app.search.state().results().len()),
            SearchStatus::NoResults => " No results".to_string(),
            SearchStatus::Failed(message) => format!(" {}", message),
        }
    } else {
        format!(" {}", app.status_message)
    };

    let right_text = if app.search.has_focus() {
        " \u{2191}\u{2193}:Highlight  Enter:Open  Esc:Close "
    } else {
        " s:Search  /:Filter  Tab:Topic  [ ]:Year  j/k:Scroll  q:Quit "
    };

    // Build the status line: left-aligned text + padding + right-aligned text
    let available_width = area.width as usize;
    let left_len = left_text.chars().count();
    let right_len = right_text.chars().count();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        format!("{:width$}", left_text, width = available_width)
    };

    let status = Paragraph::new(status_str).style(Style::default().fg(Color::White).bg(colors::BAR_BG));
    frame.render_widget(status, area);
}
