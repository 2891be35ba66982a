//! In-app notification texts and links.

use uuid::Uuid;

/// Front-end link to a room's detail page.
pub fn room_link(room_uuid: Uuid) -> String {
    format!("/salas/{room_uuid}")
}

/// Message sent to responsible staff when a room is reported dirty.
pub fn dirty_report_message(room_name: &str, reporter: &str, notes: Option<&str>) -> String {
    match notes.map(str::trim).filter(|n| !n.is_empty()) {
        Some(notes) => format!(
            "A sala '{room_name}' foi reportada como suja por {reporter}. Observações: {notes}"
        ),
        None => format!("A sala '{room_name}' foi reportada como suja por {reporter}."),
    }
}

/// Message sent when a room's cleaning validity has expired.
pub fn pending_cleaning_message(room_name: &str) -> String {
    format!("A limpeza da sala '{room_name}' expirou e está pendente.")
}
