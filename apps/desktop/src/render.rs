//! Plain-text rendering of the projected screen.

use std::fmt::Write as _;

use client_core::{MessageClass, ScreenView, StatusView, TaskListView};
use shared::domain::{Task, TaskStatus};

pub const LOADING_NOTICE: &str = "Cargando tareas...";
pub const NO_TASKS_NOTICE: &str = "No hay tareas todavía. ¡Crea una con un comando!";
pub const NOT_LOADED_NOTICE: &str = "Las tareas no se han podido cargar. Usa :refresh para reintentar.";

fn class_label(class: MessageClass) -> &'static str {
    match class {
        MessageClass::Success => "ok",
        MessageClass::Error => "error",
        MessageClass::Info => "info",
        MessageClass::Neutral => "aviso",
    }
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pendiente",
        TaskStatus::InProgress => "en progreso",
        TaskStatus::Completed => "completada",
        TaskStatus::Cancelled => "cancelada",
    }
}

pub fn render_status(view: &StatusView) -> Option<String> {
    view.message
        .as_ref()
        .map(|block| format!("[{}] {}", class_label(block.class), block.text))
}

fn render_task(out: &mut String, task: &Task) {
    let start = task
        .start_date
        .as_ref()
        .map(|date| match date.as_date() {
            Some(day) => day.format("%d/%m/%Y").to_string(),
            None => date.as_str().to_string(),
        })
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(
        out,
        "  {:<26} {:<12} {:<11} {}",
        task.id,
        status_label(task.status),
        start,
        task.description
    );
}

pub fn render_tasks(view: &TaskListView) -> String {
    match view {
        TaskListView::Loading => format!("{LOADING_NOTICE}\n"),
        TaskListView::NotLoaded => format!("{NOT_LOADED_NOTICE}\n"),
        TaskListView::Empty => format!("{NO_TASKS_NOTICE}\n"),
        TaskListView::Tasks(tasks) => {
            let mut out = String::new();
            let _ = writeln!(
                out,
                "  {:<26} {:<12} {:<11} {}",
                "ID", "ESTADO", "INICIO", "DESCRIPCIÓN"
            );
            for task in tasks {
                render_task(&mut out, task);
            }
            out
        }
    }
}

pub fn render_screen(view: &ScreenView) -> String {
    let mut out = String::new();
    if let Some(status) = render_status(&view.status) {
        let _ = writeln!(out, "{status}");
    }
    out.push_str(&render_tasks(&view.tasks));
    out
}
