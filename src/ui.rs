use chrono::NaiveDate;
use ratatui::{prelude::*, widgets::*};

use crate::aggregate::{self, format_clock, format_hours_minutes};
use crate::app::{App, DeleteTarget, InputMode, View};
use crate::chart::Projection;
use crate::exams::{self, MEAN_DEVIATION, TrendLine};
use crate::model::TaskStatus;
use crate::subject::{ALL_SUBJECTS, Subject};

const RECENT_HISTORY: usize = 3;
const BAR_WIDTH: usize = 24;

// ============================================================================
// UI Rendering
// ============================================================================

pub fn render_ui(f: &mut Frame, app: &App, today: NaiveDate) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    render_header(f, app, chunks[0]);

    match app.view {
        View::Daily if app.selected_unit.is_some() => render_unit(f, app, chunks[1]),
        View::Daily => render_summary(f, app, chunks[1]),
        View::Achievements => render_achievements(f, app, chunks[1], today),
        View::Tests => render_tests(f, app, chunks[1]),
        View::Help => render_help(f, app, chunks[1]),
    }

    render_footer(f, app, chunks[2]);

    match app.input_mode {
        InputMode::Normal => {}
        InputMode::ConfirmingDelete(target) => render_confirm(f, app, target),
        mode => render_prompt(f, app, mode),
    }
}

fn bordered<'a>(title: &'a str, app: &App) -> Block<'a> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.border_color))
}

fn heading(text: &str, app: &App) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD),
    ))
}

fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    ))
}

fn bar(percent: u16, color: Color) -> Vec<Span<'static>> {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    vec![
        Span::styled("█".repeat(filled), Style::default().fg(color)),
        Span::styled("░".repeat(BAR_WIDTH - filled), Style::default().fg(Color::DarkGray)),
    ]
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let selected = match app.view {
        View::Daily | View::Help => 0,
        View::Achievements => 1,
        View::Tests => 2,
    };
    let tabs = Tabs::new(vec!["📚 Daily", "🏆 Achievements", "📝 Tests"])
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD))
        .divider("•")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.theme.border_color))
                .title(Span::styled(
                    " 📈 LEVELUP ",
                    Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD),
                )),
        );
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let controls = match app.view {
        View::Daily if app.selected_unit.is_some() => {
            "Space Timer • s Save • c Status • e Minutes • m Memo • a Add • d Delete • f Filter • Esc Back"
        }
        View::Daily => "↑↓ Select • Enter Open • n New unit • D Delete unit • Tab Views • ? Help • q Quit",
        View::Achievements => "1/2/3 Range • ←→ Subject • Space Toggle • Tab Views • q Quit",
        View::Tests => "f Filter • a Add result • ←→ Line • Space Toggle • Tab Views • q Quit",
        View::Help => "Esc Back • q Quit",
    };

    let mut lines = vec![Line::from(Span::styled(controls, Style::default().fg(Color::DarkGray)))];
    let mut status = Vec::new();
    if app.read_only {
        status.push(Span::styled("👀 READ-ONLY  ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    }
    if let Some(msg) = &app.status_message {
        status.push(Span::styled(msg.clone(), Style::default().fg(Color::Green)));
    }
    lines.push(Line::from(status));

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

// ----------------------------------------------------------------------------
// Daily
// ----------------------------------------------------------------------------

fn render_summary(f: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(1)])
        .split(cols[0]);

    render_profile(f, app, left[0]);

    let overall = aggregate::progress_stats(&app.tasks);
    let mut lines = vec![
        Line::from(""),
        stat_line("Overall", format!("{}%", overall.progress)),
        stat_line("Study time", format_hours_minutes(overall.total_seconds)),
        Line::from(""),
    ];
    for subject in ALL_SUBJECTS {
        let stats = aggregate::subject_progress(&app.tasks, subject);
        let mut spans = vec![Span::styled(
            format!("  {:<9}", subject.label()),
            Style::default().fg(subject.color()).add_modifier(Modifier::BOLD),
        )];
        spans.extend(bar(stats.progress, subject.color()));
        spans.push(Span::raw(format!(" {:>3}%  {}", stats.progress, format_hours_minutes(stats.total_seconds))));
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines).block(bordered(" Progress ", app)), left[1]);

    let units = app.units();
    let mut unit_lines = vec![Line::from("")];
    if units.is_empty() {
        unit_lines.push(hint("  No units yet! Press 'n' to create one."));
    }
    for (idx, unit) in units.iter().enumerate() {
        let selected = idx == app.unit_cursor;
        let stats = aggregate::unit_progress(&app.tasks, unit);
        let style = if selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        unit_lines.push(Line::from(vec![
            Span::styled(
                if selected { " ► " } else { "   " },
                Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{:<10}", unit), style),
            Span::styled(format!("{:>3}%", stats.progress), Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(format_hours_minutes(stats.total_seconds), Style::default().fg(Color::DarkGray)),
        ]));
    }
    f.render_widget(Paragraph::new(unit_lines).block(bordered(" Units ", app)), cols[1]);
}

fn render_profile(f: &mut Frame, app: &App, area: Rect) {
    let block = bordered(" Profile ", app);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let state = app.level_state();
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("⭐ Level {}", state.level),
                Style::default().fg(app.theme.level_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("   {} / {} XP", state.display_xp(), state.next_level_xp),
                Style::default().fg(Color::Gray),
            ),
        ]))
        .alignment(Alignment::Center),
        rows[0],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(app.theme.xp_color).bg(Color::Black))
            .percent(state.progress_percent() as u16),
        rows[1],
    );

    let badges = app.badges();
    let badge_line = if badges.is_empty() {
        hint("No badges yet")
    } else {
        Line::from(
            badges
                .iter()
                .map(|b| Span::styled(format!("{} {}  ", b.icon, b.label), Style::default().fg(app.theme.xp_color)))
                .collect::<Vec<_>>(),
        )
    };
    f.render_widget(Paragraph::new(badge_line).alignment(Alignment::Center).wrap(Wrap { trim: true }), rows[3]);
}

fn render_unit(f: &mut Frame, app: &App, area: Rect) {
    let unit = app.selected_unit.as_deref().unwrap_or_default();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(RECENT_HISTORY as u16 + 4)])
        .split(area);

    let filter = match app.status_filter {
        None => "All",
        Some(TaskStatus::NotStarted) => "Not started",
        Some(TaskStatus::InProgress) => "In progress",
        Some(TaskStatus::Completed) => "Completed",
    };
    let stats = aggregate::unit_progress(&app.tasks, unit);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("  {}", unit), Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("   {}% • {} • filter: {}", stats.progress, format_hours_minutes(stats.total_seconds), filter),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let visible = app.visible_tasks();
    if visible.is_empty() {
        lines.push(Line::from(""));
        lines.push(hint("  No tasks here. Press 'a' to add one."));
    }

    let mut current: Option<(Subject, &str)> = None;
    for (pos, &i) in visible.iter().enumerate() {
        let task = &app.tasks[i];
        if current.is_none_or(|(s, _)| s != task.subject) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  ■ {}", task.subject.label()),
                Style::default().fg(task.subject.color()).add_modifier(Modifier::BOLD),
            )));
        }
        if current.is_none_or(|(s, c)| s != task.subject || c != task.category) {
            lines.push(hint(&format!("    {}", task.category)));
        }
        current = Some((task.subject, task.category.as_str()));

        let selected = pos == app.task_cursor;
        let running = app.is_running(&task.id);
        let status_color = match task.status {
            TaskStatus::NotStarted => Color::DarkGray,
            TaskStatus::InProgress => Color::Yellow,
            TaskStatus::Completed => Color::Green,
        };
        let title_style = if selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(
                if selected { "  ► " } else { "    " },
                Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(task.status.icon(), Style::default().fg(status_color)),
            Span::raw(" "),
            Span::styled(task.title.clone(), title_style),
            Span::raw("  "),
            Span::styled(
                format!("{}{}", if running { "● " } else { "" }, format_clock(task.current_duration)),
                Style::default().fg(if running { Color::Green } else { Color::Cyan }),
            ),
            Span::styled(format!("  Σ {}", format_clock(task.history_seconds())), Style::default().fg(Color::DarkGray)),
        ]));
    }

    // Keep the cursor row on screen.
    let height = chunks[0].height.saturating_sub(2) as usize;
    let cursor_row = lines
        .iter()
        .position(|l| l.spans.first().is_some_and(|s| s.content.starts_with("  ►")))
        .unwrap_or(0);
    let scroll = cursor_row.saturating_sub(height.saturating_sub(2)) as u16;
    f.render_widget(Paragraph::new(lines).block(bordered(" Tasks ", app)).scroll((scroll, 0)), chunks[0]);

    let mut detail = Vec::new();
    match app.selected_task() {
        Some(task) => {
            detail.push(Line::from(vec![
                Span::styled(format!("  {} ", task.material_name), Style::default().fg(Color::White)),
                Span::styled(
                    if task.current_memo.is_empty() { String::new() } else { format!("📝 {}", task.current_memo) },
                    Style::default().fg(Color::Yellow),
                ),
            ]));
            if task.history.is_empty() {
                detail.push(hint("  No sessions saved yet"));
            }
            for h in task.history.iter().rev().take(RECENT_HISTORY) {
                detail.push(Line::from(vec![
                    Span::styled(format!("  {:>5}", h.date), Style::default().fg(Color::Gray)),
                    Span::raw(" • "),
                    Span::styled(format_clock(h.duration), Style::default().fg(Color::Cyan)),
                    Span::raw(if h.memo.is_empty() { String::new() } else { format!(" • {}", h.memo) }),
                ]));
            }
        }
        None => detail.push(hint("  Nothing selected")),
    }
    f.render_widget(Paragraph::new(detail).block(bordered(" History ", app)), chunks[1]);
}

// ----------------------------------------------------------------------------
// Achievements
// ----------------------------------------------------------------------------

fn render_achievements(f: &mut Frame, app: &App, area: Rect, today: NaiveDate) {
    let projection = app.projection(today);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8), Constraint::Length(8)])
        .split(area);

    let mut toggles = vec![Span::styled(
        format!(" Last {} days  ", app.config.range_days),
        Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD),
    )];
    for (idx, subject) in ALL_SUBJECTS.into_iter().enumerate() {
        let mark = if app.is_subject_selected(subject) { "■" } else { "□" };
        let mut style = Style::default().fg(subject.color());
        if idx == app.subject_cursor {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        toggles.push(Span::styled(format!("{} {}", mark, subject.label()), style));
        toggles.push(Span::raw("  "));
    }
    f.render_widget(
        Paragraph::new(Line::from(toggles)).alignment(Alignment::Center).block(bordered(" Range ", app)),
        chunks[0],
    );

    render_daily_chart(f, app, &projection, chunks[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let mut ratio_lines = vec![stat_line("Total", format!("{} min", projection.total_minutes()))];
    if projection.ratios.is_empty() {
        ratio_lines.push(hint("  No study time in this range"));
    }
    for ratio in &projection.ratios {
        let mut spans = vec![Span::styled(
            format!("  {:<9}", ratio.label),
            Style::default().fg(ratio.subject.color()).add_modifier(Modifier::BOLD),
        )];
        spans.extend(bar(ratio.percent as u16, ratio.subject.color()));
        spans.push(Span::raw(format!(" {:>3}% {:>5} min", ratio.percent, ratio.minutes)));
        ratio_lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(ratio_lines).block(bordered(" Subject Ratio ", app)), bottom[0]);

    let mut best_lines = Vec::new();
    match &projection.best_day {
        Some(best) => best_lines.push(Line::from(vec![
            Span::styled("  🏆 Best day  ", Style::default().fg(app.theme.xp_color).add_modifier(Modifier::BOLD)),
            Span::styled(format!("{}  {} min", best.label, best.minutes), Style::default().fg(Color::White)),
        ])),
        None => best_lines.push(hint("  No record yet")),
    }
    for (subject, best) in &projection.best_by_subject {
        best_lines.push(Line::from(vec![
            Span::styled(format!("     {:<9}", subject.label()), Style::default().fg(subject.color())),
            Span::raw(format!("{}  {} min", best.label, best.minutes)),
        ]));
    }
    f.render_widget(Paragraph::new(best_lines).block(bordered(" Records ", app)), bottom[1]);
}

fn render_daily_chart(f: &mut Frame, app: &App, projection: &Projection, area: Rect) {
    let block = bordered(" Daily Minutes ", app);
    if projection.rows.is_empty() {
        f.render_widget(Paragraph::new(hint("  Empty range")).block(block), area);
        return;
    }

    let n = u16::try_from(projection.rows.len()).unwrap_or(u16::MAX).max(1);
    let width = (area.width.saturating_sub(2) / n).saturating_sub(1).max(1);
    let bars: Vec<Bar> = projection
        .rows
        .iter()
        .map(|row| {
            Bar::default()
                .value(row.total)
                .label(Line::from(row.label.clone()))
                .style(Style::default().fg(app.theme.accent_color))
                .value_style(Style::default().fg(Color::White).bg(app.theme.accent_color))
        })
        .collect();

    f.render_widget(
        BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(width)
            .bar_gap(1),
        area,
    );
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

fn trend_color(line: TrendLine, app: &App) -> Color {
    match line {
        TrendLine::Total4 => app.theme.xp_color,
        TrendLine::Subject(s) => s.color(),
    }
}

fn render_tests(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Percentage(50), Constraint::Min(5)])
        .split(area);

    let filter = app.test_filter.as_ref();
    let mut toggles = vec![Span::styled(
        format!(" {}  ", filter.map_or("All", |k| k.label())),
        Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD),
    )];
    for (idx, line) in App::trend_choices().into_iter().enumerate() {
        let mark = if app.trend_lines.contains(&line) { "■" } else { "□" };
        let mut style = Style::default().fg(trend_color(line, app));
        if idx == app.trend_cursor {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        toggles.push(Span::styled(format!("{} {}", mark, line.label()), style));
        toggles.push(Span::raw("  "));
    }
    f.render_widget(
        Paragraph::new(Line::from(toggles)).alignment(Alignment::Center).block(bordered(" Filter ", app)),
        chunks[0],
    );

    let series: Vec<(TrendLine, Vec<(f64, f64)>)> = app
        .trend_lines
        .iter()
        .map(|&line| (line, exams::deviation_series(&app.tests, filter, line)))
        .collect();
    let points = series.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
    let x_max = (points.saturating_sub(1)).max(1) as f64;
    let mean = vec![(0.0, MEAN_DEVIATION), (x_max, MEAN_DEVIATION)];

    let (mut y_min, mut y_max) = (40.0_f64, 60.0_f64);
    for (_, s) in &series {
        for &(_, dev) in s {
            y_min = y_min.min(dev - 5.0);
            y_max = y_max.max(dev + 5.0);
        }
    }
    y_min = (y_min / 5.0).floor() * 5.0;
    y_max = (y_max / 5.0).ceil() * 5.0;

    let mut datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&mean),
    ];
    for (line, data) in &series {
        datasets.push(
            Dataset::default()
                .name(line.label())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(trend_color(*line, app)))
                .data(data),
        );
    }

    let chart = Chart::new(datasets)
        .block(bordered(" Deviation Trend ", app))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(vec![Span::raw("oldest"), Span::raw("latest")]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.0}", y_min)),
                    Span::raw(format!("{:.0}", MEAN_DEVIATION)),
                    Span::raw(format!("{:.0}", y_max)),
                ]),
        );
    f.render_widget(chart, chunks[1]);

    let dev_cell = |dev: f64| {
        let style = if exams::is_strong(dev) {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Cell::from(format!("{:.1}", dev)).style(style)
    };
    let rows: Vec<Row> = exams::sorted_newest_first(&app.tests)
        .into_iter()
        .map(|t| {
            let mut cells = vec![
                Cell::from(t.date.clone()),
                Cell::from(t.name.clone()),
                Cell::from(t.kind.label().to_string()),
                dev_cell(t.total4.dev),
            ];
            cells.extend(ALL_SUBJECTS.iter().map(|&s| dev_cell(t.subjects.get(s).dev)));
            Row::new(cells)
        })
        .collect();

    let mut header = vec!["Date", "Test", "Type", "4 Subj"];
    header.extend(ALL_SUBJECTS.iter().map(|s| s.short()));
    let widths = [
        Constraint::Length(11),
        Constraint::Min(12),
        Constraint::Length(11),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD)))
        .block(bordered(" Results ", app));
    f.render_widget(table, chunks[2]);
}

// ----------------------------------------------------------------------------
// Help & overlays
// ----------------------------------------------------------------------------

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let area = centered_rect(70, 90, area);

    let help_text = vec![
        Line::from(""),
        heading("⌨️  KEYBOARD SHORTCUTS", app),
        Line::from(""),
        Line::from("  Daily:"),
        help_line("↑↓ / jk", "Select unit or task"),
        help_line("Enter", "Open unit"),
        help_line("n / D", "New unit / delete unit"),
        help_line("Space", "Start or stop the task stopwatch"),
        help_line("s", "Save session to history"),
        help_line("c", "Cycle task status"),
        help_line("e / m", "Edit minutes / memo"),
        help_line("a / d", "Add task (`subject: category / title`) / delete task"),
        help_line("f", "Filter tasks by status"),
        Line::from(""),
        Line::from("  Achievements & Tests:"),
        help_line("1 2 3", "Last 7 / 14 / 30 days"),
        help_line("←→ Space", "Pick and toggle subjects or trend lines"),
        help_line("f", "Filter tests by type"),
        help_line("a", "Add result (`date | name | type | 4subj | ma | ja | sc | so`)"),
        Line::from(""),
        Line::from("  General:"),
        help_line("Tab", "Next view"),
        help_line("E", "Export history to CSV"),
        help_line("T", "Next theme"),
        help_line("q / Esc", "Quit / go back"),
        help_line("Ctrl+C", "Force quit"),
        Line::from(""),
        hint("💡 Auto-save every few seconds • One minute of study is one XP"),
    ];

    f.render_widget(Paragraph::new(help_text).block(bordered(" Help ", app)), area);
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("    "),
        Span::styled(key, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", desc)),
    ])
}

fn stat_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("  {}: ", label)),
        Span::styled(value, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ])
}

fn render_prompt(f: &mut Frame, app: &App, mode: InputMode) {
    let title = match mode {
        InputMode::AddingUnit => " ✏️  New unit number ",
        InputMode::AddingTask => " ✏️  New task: subject: category / title ",
        InputMode::AddingTest => " ✏️  date | name | type | 4subj | ma | ja | sc | so ",
        InputMode::EditingMinutes => " ⏱  Minutes ",
        InputMode::EditingMemo => " 📝 Memo ",
        InputMode::Normal | InputMode::ConfirmingDelete(_) => return,
    };
    let area = centered_rect(70, 20, f.size());
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(app.input.as_str(), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled("█", Style::default().fg(Color::Green)),
        ]),
        Line::from(""),
        hint("  Enter to save • Esc to cancel"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(bordered(title, app)), area);
}

fn render_confirm(f: &mut Frame, app: &App, target: DeleteTarget) {
    let what = match target {
        DeleteTarget::Task => app.selected_task().map(|t| t.title.clone()),
        DeleteTarget::Unit => app.units().get(app.unit_cursor).cloned(),
    }
    .unwrap_or_default();
    let area = centered_rect(50, 20, f.size());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  ⚠️  DELETE?", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))),
        Line::from(vec![Span::raw("  "), Span::styled(what, Style::default().fg(Color::White))]),
        Line::from(""),
        hint("  Y: Confirm • N/Esc: Cancel"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(bordered(" Confirm ", app)), area);
}

pub fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(v[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 14).unwrap()
    }

    #[test]
    fn every_view_renders() {
        let mut app = App::new(Vec::new(), Vec::new(), Config::default(), None);
        app.add_unit(2, today());
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        for view in [View::Daily, View::Achievements, View::Tests, View::Help] {
            app.view = view;
            terminal.draw(|f| render_ui(f, &app, today())).unwrap();
        }
        app.selected_unit = None;
        app.view = View::Daily;
        terminal.draw(|f| render_ui(f, &app, today())).unwrap();
        assert!(buffer_text(&terminal).contains("Level 1"));
    }

    #[test]
    fn centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 40, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert!(inner.x >= outer.x && inner.y >= outer.y);
    }

    #[test]
    fn oversized_range_still_renders() {
        let config = Config { range_days: 65535, ..Config::default() };
        let mut app = App::new(Vec::new(), Vec::new(), config, None);
        app.view = View::Achievements;
        assert_eq!(app.config.range_days, crate::config::MAX_RANGE_DAYS);

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render_ui(f, &app, today())).unwrap();
        assert!(buffer_text(&terminal).contains("Last 365 days"));
    }
}
