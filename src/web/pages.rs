//! Page bodies rendered inside the shell frame.

use std::fmt::Write;

use chrono::Utc;

use super::render::{
    badge, bar_chart, error_banner, escape, format_number, frame, options, path_segment,
    stat_card, status_banner,
};
use super::theme;
use crate::models::{ChatMessage, Priority, RiskType, Role, Severity, TaskStatus};
use crate::shell::Route;
use crate::views::{
    BarPoint, ChatSession, DashboardView, ReportView, RiskBoard, TaskBoard, TimeRange,
};

fn notice(error: Option<&str>) -> String {
    error.map(error_banner).unwrap_or_default()
}

pub fn dashboard(view: &DashboardView) -> String {
    let mut body = status_banner(&view.status, "/dashboard");
    let Some(data) = &view.data else {
        return frame(Route::Dashboard, &body);
    };

    let s = &data.stats;
    body.push_str("<div class=\"grid\">");
    body.push_str(&stat_card("Total projects", s.total_projects));
    body.push_str(&stat_card("Active projects", s.active_projects));
    body.push_str(&stat_card("Completed tasks", s.completed_tasks));
    body.push_str(&stat_card("Pending tasks", s.pending_tasks));
    body.push_str(&stat_card("Team members", s.team_members));
    body.push_str(&stat_card("Risk alerts", s.risk_alerts));
    body.push_str("</div>");

    if let Some(progress) = view.latest_progress() {
        body.push_str(&stat_card("Latest period delivered", format!("{:.0}%", progress)));
    }

    let completed: Vec<BarPoint> = data
        .project_progress
        .iter()
        .map(|p| BarPoint {
            label: format!("{} ({} planned)", p.label, p.planned),
            value: f64::from(p.completed),
        })
        .collect();
    body.push_str(&bar_chart("Completed vs planned", &completed, None));

    let shares: Vec<BarPoint> = view
        .distribution_shares()
        .into_iter()
        .map(|(slice, share)| BarPoint {
            label: slice.label.clone(),
            value: share.round(),
        })
        .collect();
    body.push_str(&bar_chart("Task distribution (%)", &shares, Some(100.0)));

    let velocity: Vec<BarPoint> = data
        .team_velocity
        .iter()
        .map(|v| BarPoint {
            label: v.label.clone(),
            value: v.velocity,
        })
        .collect();
    body.push_str(&bar_chart("Team velocity", &velocity, None));

    body.push_str("<div class=\"card\"><h3>Recent activity</h3><ul>");
    for activity in &data.recent_activities {
        let _ = write!(
            body,
            "<li data-kind=\"{}\">{} <small>{}</small></li>",
            escape(&activity.kind),
            escape(&activity.message),
            escape(&activity.time)
        );
    }
    body.push_str("</ul></div>");

    body.push_str(
        "<div class=\"card\"><h3>Upcoming deadlines</h3><table>\
         <tr><th>Task</th><th>Project</th><th>Deadline</th><th>Days left</th><th>Priority</th></tr>",
    );
    for d in &data.upcoming_deadlines {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&d.task),
            escape(&d.project),
            escape(&d.deadline),
            d.days_left,
            badge(d.priority.label(), theme::priority_color(d.priority))
        );
    }
    body.push_str("</table></div>");

    frame(Route::Dashboard, &body)
}

pub fn tasks(board: &TaskBoard, error: Option<&str>) -> String {
    let mut body = status_banner(&board.status, "/tasks");
    body.push_str(&notice(error));

    body.push_str("<div class=\"grid\">");
    for (status, count) in board.counts() {
        body.push_str(&stat_card(status.label(), count));
    }
    body.push_str("</div>");

    let selected = board.status_filter.to_string();
    let status_choices: Vec<(&str, &str)> = std::iter::once(("all", "All statuses"))
        .chain(TaskStatus::ALL.iter().map(|s| (s.as_str(), s.label())))
        .collect();
    let _ = write!(
        body,
        "<form class=\"card\" method=\"get\" action=\"/tasks\">\
         <input name=\"search\" placeholder=\"Search tasks\" value=\"{}\">\
         <select name=\"status\">{}</select> <button>Filter</button></form>",
        escape(&board.search),
        options(status_choices, &selected)
    );

    let priority_choices = [Priority::Low, Priority::Medium, Priority::High]
        .map(|p| (p.as_str(), p.label()));
    let _ = write!(
        body,
        "<form class=\"card\" method=\"post\" action=\"/tasks\"><h3>New task</h3>\
         <input name=\"title\" placeholder=\"Title\" required> \
         <input name=\"assignee\" placeholder=\"Assignee\"> \
         <select name=\"priority\">{}</select> \
         <input name=\"due_date\" type=\"date\"><br>\
         <textarea name=\"description\" placeholder=\"Description\" rows=\"2\" cols=\"60\"></textarea>\
         <br><button>Create</button></form>",
        options(priority_choices, Priority::Medium.as_str())
    );

    let now = Utc::now();
    body.push_str(
        "<div class=\"card\"><table><tr><th>ID</th><th>Title</th><th>Status</th>\
         <th>Priority</th><th>Assignee</th><th>Due</th><th></th></tr>",
    );
    for task in board.visible() {
        let id = escape(&task.id);
        let segment = path_segment(&task.id);
        let action = task
            .status
            .next()
            .map(|next| {
                format!(
                    "<form class=\"inline\" method=\"post\" action=\"/tasks/{}/advance\">\
                     <button>{}</button></form>",
                    segment,
                    next.action_label()
                )
            })
            .unwrap_or_default();
        let due = task
            .due_date
            .map(|d| {
                let text = d.format("%Y-%m-%d").to_string();
                if task.is_overdue(now) {
                    badge(&format!("{} overdue", text), theme::status::DANGER)
                } else {
                    text
                }
            })
            .unwrap_or_default();
        let _ = write!(
            body,
            "<tr><td>{id}</td><td><strong>{}</strong><br><small>{}</small></td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{action}\
             <form class=\"inline\" method=\"post\" action=\"/tasks/{segment}/delete\">\
             <button>Delete</button></form></td></tr>",
            escape(&task.title),
            escape(&task.description),
            badge(task.status.label(), theme::task_status_color(task.status)),
            badge(task.priority.label(), theme::priority_color(task.priority)),
            escape(&task.assignee),
            due,
        );
    }
    body.push_str("</table></div>");

    body.push_str("<div class=\"card\"><h3>Task assistant</h3>");
    body.push_str(&messages(board.assistant.messages()));
    body.push_str(
        "<form method=\"post\" action=\"/tasks/assistant\">\
         <input name=\"message\" placeholder=\"Ask about your tasks\" size=\"60\"> \
         <button>Send</button></form></div>",
    );

    frame(Route::Tasks, &body)
}

pub fn risks(board: &RiskBoard, error: Option<&str>) -> String {
    let mut body = status_banner(&board.status, "/risks");
    body.push_str(&notice(error));

    let stats = board.stats();
    body.push_str("<div class=\"grid\">");
    body.push_str(&stat_card("Active risks", stats.total));
    body.push_str(&stat_card("High", stats.high));
    body.push_str(&stat_card("Medium", stats.medium));
    body.push_str(&stat_card("Low", stats.low));
    body.push_str("</div>");

    let severity_choices: Vec<(&str, &str)> = std::iter::once(("all", "All severities"))
        .chain(Severity::ALL.iter().map(|s| (s.as_str(), s.label())))
        .collect();
    let kind_choices: Vec<(&str, &str)> = std::iter::once(("all", "All types"))
        .chain(RiskType::ALL.iter().map(|t| (t.as_str(), t.label())))
        .collect();
    let _ = write!(
        body,
        "<form class=\"card\" method=\"get\" action=\"/risks\">\
         <input name=\"search\" placeholder=\"Search risks\" value=\"{}\"> \
         <select name=\"severity\">{}</select> <select name=\"kind\">{}</select> \
         <label><input type=\"checkbox\" name=\"resolved\" value=\"1\"{}> Show resolved</label> \
         <button>Filter</button></form>",
        escape(&board.search),
        options(severity_choices, &board.severity.to_string()),
        options(kind_choices, &board.kind.to_string()),
        if board.show_resolved { " checked" } else { "" }
    );

    body.push_str(
        "<div class=\"card\"><table><tr><th>Severity</th><th>Risk</th><th>Type</th>\
         <th>Project</th><th>Raised</th><th></th></tr>",
    );
    for alert in board.visible() {
        let action = if alert.is_active() {
            format!(
                "<form class=\"inline\" method=\"post\" action=\"/risks/{}/resolve\">\
                 <button>Resolve</button></form>",
                path_segment(&alert.id)
            )
        } else {
            badge("Resolved", theme::status::SUCCESS)
        };
        let _ = write!(
            body,
            "<tr><td>{}</td><td><strong>{}</strong><br><small>{}</small></td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td></tr>",
            badge(alert.severity.label(), theme::severity_color(alert.severity)),
            escape(&alert.title),
            escape(&alert.description),
            escape(alert.kind.label()),
            escape(&alert.project),
            alert.created_at.format("%Y-%m-%d %H:%M"),
            action
        );
    }
    body.push_str("</table></div>");

    body.push_str(
        "<form class=\"card\" method=\"post\" action=\"/risks/report\">\
         <button>Generate risk report</button></form>",
    );
    if let Some(report) = &board.report {
        let _ = write!(
            body,
            "<div class=\"card\"><h3>Risk report {}</h3><p>{} risk, score {}/100 \
             <small>generated {}</small></p><h4>Key risks</h4><ul>",
            escape(&report.report_id),
            badge(
                report.overall_risk_level.label(),
                theme::severity_color(report.overall_risk_level)
            ),
            report.risk_score,
            report.generated_at.format("%Y-%m-%d %H:%M")
        );
        for risk in &report.key_risks {
            let _ = write!(body, "<li>{}</li>", escape(risk));
        }
        body.push_str("</ul><h4>Recommendations</h4><ul>");
        for rec in &report.recommendations {
            let _ = write!(body, "<li>{}</li>", escape(rec));
        }
        body.push_str("</ul></div>");
    }

    frame(Route::Risks, &body)
}

pub fn reports(view: &ReportView, error: Option<&str>) -> String {
    let mut body = status_banner(&view.status, "/reports");
    body.push_str(&notice(error));

    let ranges: Vec<(&str, String)> = TimeRange::ALL
        .iter()
        .map(|r| (r.as_str(), r.label()))
        .collect();
    let _ = write!(
        body,
        "<form class=\"card\" method=\"get\" action=\"/reports\">\
         <select name=\"range\">{}</select> <button>Apply</button></form>",
        options(
            ranges.iter().map(|(v, l)| (*v, l.as_str())),
            view.range.as_str()
        )
    );

    if let Some(report) = &view.report {
        body.push_str("<div class=\"grid\">");
        let _ = write!(
            body,
            "<div class=\"card stat\"><div class=\"value\">{}</div>\
             <div class=\"label\">Overall health</div></div>",
            badge(
                report.overall_health.label(),
                theme::health_color(report.overall_health)
            )
        );
        body.push_str(&stat_card("Health score", report.health_score));
        if let Some(rate) = view.completion_rate() {
            body.push_str(&stat_card("Completion rate", format!("{:.1}%", rate)));
        }
        body.push_str(&stat_card(
            "Team velocity",
            format_number(report.metrics.team_velocity),
        ));
        body.push_str(&stat_card("Bug rate", format_number(report.metrics.bug_rate)));
        body.push_str("</div>");

        body.push_str(&bar_chart("Project progress (%)", &view.project_progress(), Some(100.0)));
        body.push_str(&bar_chart("Project risk level", &view.project_risk(), Some(3.0)));
        body.push_str(&bar_chart("Task status", &view.task_breakdown(), None));
        body.push_str(&bar_chart("Velocity trend", &view.velocity_series(), None));

        body.push_str(
            "<div class=\"card\"><table><tr><th>Project</th><th>Health</th><th>Progress</th>\
             <th>Risk</th><th>Team</th><th>Deadline</th></tr>",
        );
        for p in &report.projects {
            let _ = write!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}%</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&p.name),
                badge(p.health.label(), theme::health_color(p.health)),
                p.progress,
                badge(p.risk_level.label(), theme::severity_color(p.risk_level)),
                p.team_size,
                p.deadline
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            );
        }
        body.push_str("</table></div>");
    }

    body.push_str(
        "<form class=\"card\" method=\"post\" action=\"/reports/query\"><h3>Ask about health</h3>\
         <input name=\"query\" placeholder=\"Which project is most at risk?\" size=\"60\"> \
         <button>Ask</button></form>",
    );
    if let Some(result) = &view.query_result {
        let sample = if matches!(result.origin, crate::api::Origin::Fallback { .. }) {
            " (sample data)"
        } else {
            ""
        };
        let _ = write!(
            body,
            "<div class=\"card\"><h3>Query result{}</h3><p><em>{}</em> <small>{}</small></p>\
             <p>{} health, score {}/100, {} projects</p></div>",
            sample,
            escape(&result.query),
            result.timestamp.format("%Y-%m-%d %H:%M:%S"),
            result.result.overall_health.label(),
            result.result.health_score,
            result.result.projects.len()
        );
    }

    frame(Route::Reports, &body)
}

pub fn chat(session: &ChatSession, error: Option<&str>) -> String {
    let mut body = notice(error);
    body.push_str("<div class=\"card\">");
    body.push_str(&messages(session.messages()));
    body.push_str(
        "<form method=\"post\" action=\"/chat\">\
         <textarea name=\"message\" rows=\"2\" cols=\"70\" placeholder=\"Type a message\">\
         </textarea><br><button>Send</button></form>\
         <form class=\"inline\" method=\"post\" action=\"/chat/clear\"><button>Clear</button></form> \
         <a href=\"/chat/export\">Export transcript</a></div>",
    );
    frame(Route::Chat, &body)
}

pub fn not_found(path: &str) -> String {
    let body = format!(
        "<div class=\"card\"><p>No page at <code>{}</code>.</p>\
         <p><a href=\"/\">Back to the dashboard</a></p></div>",
        escape(path)
    );
    frame(Route::NotFound, &body)
}

fn messages(list: &[ChatMessage]) -> String {
    let mut out = String::new();
    for m in list {
        let class = match (m.role, m.is_error) {
            (Role::User, _) => "user",
            (Role::Ai, true) => "ai error",
            (Role::Ai, false) => "ai",
        };
        let _ = write!(
            out,
            "<div class=\"msg {}\"><small>{} {}</small>\n{}",
            class,
            m.role.label(),
            m.timestamp.format("%H:%M"),
            escape(&m.content)
        );
        if !m.suggestions.is_empty() {
            out.push_str("<div>");
            for s in &m.suggestions {
                let _ = write!(
                    out,
                    "<form class=\"inline\" method=\"post\" action=\"/chat\">\
                     <input type=\"hidden\" name=\"message\" value=\"{}\">\
                     <button title=\"{}\">{}</button></form> ",
                    escape(&s.text),
                    escape(&s.category),
                    escape(&s.text)
                );
            }
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }
    out
}
