use crate::app::{App, Modal, Pane};
use crate::filter::{ProjectFilter, TaskFilter};
use crate::form::{FormState, ProjectDraft, TaskDraft, TaskField};
use crate::task::{Priority, Task};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const HELP: &str = "Tab pane  ↑↓ move  n new  e edit  space done  d delete  f/F filter  Enter select project  q quit";

/// Draws the whole screen from the current state.
pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(filter_bar(app.tracker().active_filter()), rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);
    draw_projects(f, app, columns[0]);
    draw_tasks(f, app, columns[1]);

    f.render_widget(status_bar(app), rows[2]);
    f.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        rows[3],
    );

    draw_task_form(f, app);
    draw_project_form(f, app.project_form());
    if let Some(modal) = app.modal() {
        draw_modal(f, modal);
    }
}

fn filter_bar(active: TaskFilter) -> Paragraph<'static> {
    let mut spans = vec![Span::raw("Filter: ")];
    for (i, filter) in TaskFilter::CYCLE.into_iter().enumerate() {
        let label = format!(" {} {} ", i + 1, filter.label());
        let style = if filter == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(label, style));
    }
    Paragraph::new(Line::from(spans))
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        })
}

fn draw_projects(f: &mut Frame, app: &App, area: Rect) {
    let tracker = app.tracker();
    let active = tracker.active_project();
    let marker = |selected: bool| if selected { "● " } else { "  " };

    let mut items = vec![ListItem::new(format!(
        "{}All projects ({})",
        marker(*active == ProjectFilter::All),
        tracker.tasks().all().len()
    ))];
    items.extend(tracker.projects().list().into_iter().map(|p| {
        ListItem::new(format!(
            "{}{} ({})",
            marker(active.is_project(&p.id)),
            p.name,
            tracker.tasks().count_for_project(&p.id)
        ))
    }));

    let list = List::new(items)
        .block(pane_block("Projects".to_string(), app.pane() == Pane::Projects))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
    let mut state = ListState::default();
    if app.pane() == Pane::Projects {
        state.select(Some(app.project_cursor()));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn task_line<'t>(task: &'t Task, app: &'t App) -> Line<'t> {
    let check = if task.completed { "[x] " } else { "[ ] " };
    let title_style = if task.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    };
    let mut spans = vec![
        Span::raw(check),
        Span::styled(task.title.as_str(), title_style),
        Span::styled(
            format!(" [{}]", task.priority),
            Style::default().fg(priority_color(task.priority)),
        ),
    ];
    if let Some(due) = task.due_date {
        let style = if task.is_overdue(app.today()) {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" (Due: {due})"), style));
    }
    if let Some(name) = task
        .project_id
        .as_deref()
        .and_then(|id| app.tracker().project_name(id))
    {
        spans.push(Span::styled(
            format!(" #{name}"),
            Style::default().fg(Color::Magenta),
        ));
    }
    Line::from(spans)
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let tracker = app.tracker();
    let scope = match tracker.active_project() {
        ProjectFilter::All => "all projects".to_string(),
        ProjectFilter::Project(id) => tracker.project_name(id).unwrap_or("?").to_string(),
    };
    let title = format!("Tasks: {scope} / {}", tracker.active_filter());

    let tasks = tracker.visible_tasks();
    let items: Vec<ListItem> = if tasks.is_empty() {
        vec![ListItem::new(Span::styled(
            "No tasks here. Press n to add one.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        tasks
            .iter()
            .map(|t| {
                let mut lines = vec![task_line(t, app)];
                if let Some(description) = t.description.as_deref() {
                    lines.push(Line::styled(
                        format!("    {description}"),
                        Style::default().fg(Color::Gray),
                    ));
                }
                ListItem::new(lines)
            })
            .collect()
    };

    let list = List::new(items)
        .block(pane_block(title, app.pane() == Pane::Tasks))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
    let mut state = ListState::default();
    if app.pane() == Pane::Tasks && !tasks.is_empty() {
        state.select(Some(app.task_cursor()));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn status_bar<'a>(app: &'a App<'_>) -> Paragraph<'a> {
    if let Some(notice) = app.notice() {
        return Paragraph::new(notice).style(Style::default().fg(Color::Cyan));
    }
    let stats = app.tracker().stats(app.today());
    let mut spans = vec![Span::raw(format!(
        "{} pending, {} completed",
        stats.pending, stats.completed
    ))];
    if stats.overdue > 0 {
        spans.push(Span::styled(
            format!(", {} overdue", stats.overdue),
            Style::default().fg(Color::Red),
        ));
    }
    Paragraph::new(Line::from(spans))
}

fn form_title<D>(form: &FormState<D>, noun: &str) -> String {
    match form {
        FormState::Editing { .. } => format!("Edit {noun}"),
        _ => format!("New {noun}"),
    }
}

fn draw_task_form(f: &mut Frame, app: &App) {
    let form = app.task_form();
    let Some(draft) = form.draft() else {
        return;
    };
    let area = centered_rect(60, 50, f.area());
    let lines = task_form_lines(draft, app);
    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .title(form_title(form, "task"))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

fn task_form_lines<'d>(draft: &'d TaskDraft, app: &'d App) -> Vec<Line<'d>> {
    let project = draft
        .project_id
        .as_deref()
        .and_then(|id| app.tracker().project_name(id))
        .unwrap_or("(none)");
    let fields = [
        (TaskField::Title, draft.title.clone()),
        (TaskField::Description, draft.description.clone()),
        (TaskField::DueDate, draft.due_date.clone()),
        (TaskField::Priority, format!("< {} >", draft.priority)),
        (TaskField::Project, format!("< {project} >")),
    ];
    let mut lines: Vec<Line> = fields
        .into_iter()
        .map(|(field, value)| {
            let focused = field == draft.focus;
            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let cursor = if focused && field.is_text() { "_" } else { "" };
            Line::from(vec![
                Span::styled(format!("{:>18}: ", field.label()), label_style),
                Span::raw(format!("{value}{cursor}")),
            ])
        })
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Tab/Shift-Tab field  ←/→ change  Enter save  Esc cancel",
        Style::default().fg(Color::DarkGray),
    ));
    lines
}

fn draw_project_form(f: &mut Frame, form: &FormState<ProjectDraft>) {
    let Some(draft) = form.draft() else {
        return;
    };
    let area = centered_rect(40, 20, f.area());
    let body = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Name: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{}_", draft.name)),
        ]),
        Line::raw(""),
        Line::styled("Enter save  Esc cancel", Style::default().fg(Color::DarkGray)),
    ])
    .block(
        Block::default()
            .title(form_title(form, "project"))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

fn draw_modal(f: &mut Frame, modal: &Modal) {
    let (title, message, hint, color) = match modal {
        Modal::Alert(message) => ("Error", message.as_str(), "Enter to dismiss", Color::Red),
        Modal::Confirm { request, .. } => (
            request.title.as_str(),
            request.message.as_str(),
            "y confirm  n cancel",
            Color::Yellow,
        ),
    };
    let area = centered_rect(50, 25, f.area());
    let body = Paragraph::new(vec![
        Line::raw(message),
        Line::raw(""),
        Line::styled(hint, Style::default().fg(Color::DarkGray)),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
