use std::time::Duration;

use iced::Task;
use log::{debug, info, warn};

use crate::api::ApiClient;
use crate::app::state::{
    Note, RosterState, Screen, Toast, ToastKind, DEFAULT_NOTE_AUTHOR, MIN_SEARCH_LEN,
    SEARCH_DEBOUNCE_MS, TOAST_SECS,
};
use crate::config;
use super::{App, Message};

fn load_roster(api: ApiClient) -> Task<Message> {
    Task::perform(
        async move { api.fetch_roster().await.map_err(|e| e.to_string()) },
        Message::RosterLoaded,
    )
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let mut app = App::default();
        if let Some(config) = config::load_config() {
            if let Some(theme) = config::theme_from_str(&config.theme_name) {
                app.theme = theme;
            }
            app.api = ApiClient::new(&config.api_base_url);
        }
        app.is_loading_roster = true;
        let task = load_roster(app.api.clone());
        (app, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::RosterLoaded(result) => {
                self.is_loading_roster = false;
                match result {
                    Ok(payload) => {
                        self.roster = RosterState::from_payload(payload);
                        self.roster_error = None;
                        info!(
                            "roster loaded: {} students, {} groups",
                            self.roster.students.len(),
                            self.roster.groups.len()
                        );
                        Task::none()
                    }
                    Err(e) => {
                        warn!("roster load failed: {e}");
                        self.roster_error = Some(e.clone());
                        self.push_toast(ToastKind::Error, format!("Failed to load roster: {e}"))
                    }
                }
            }
            Message::ReloadRoster => {
                self.is_loading_roster = true;
                load_roster(self.api.clone())
            }
            Message::WeekSelected(week) => {
                self.roster.current_week = week;
                Task::none()
            }
            Message::GoToRoster => {
                self.current_screen = Screen::Roster;
                Task::none()
            }
            Message::GoToSettings => {
                self.current_screen = Screen::Settings;
                Task::none()
            }
            Message::ThemeSelected(name) => {
                if let Some(theme) = config::theme_from_str(name) {
                    let _ = config::save_config(&theme, self.api.base_url());
                    self.theme = theme;
                }
                Task::none()
            }
            Message::SearchInputChanged(text) => {
                self.search_text = text;
                if self.search_text.trim().chars().count() < MIN_SEARCH_LEN {
                    self.show_search_results = false;
                    self.search_results.clear();
                    return Task::none();
                }
                // Each keystroke restarts the quiet period; only the latest
                // timer is allowed to fire a request.
                self.search_debounce_seq += 1;
                let seq = self.search_debounce_seq;
                Task::perform(
                    async move {
                        tokio::time::sleep(Duration::from_millis(SEARCH_DEBOUNCE_MS)).await;
                        seq
                    },
                    Message::SearchDebounceElapsed,
                )
            }
            Message::SearchDebounceElapsed(seq) => {
                if seq != self.search_debounce_seq {
                    return Task::none();
                }
                let query = self.search_text.trim().to_string();
                if query.chars().count() < MIN_SEARCH_LEN {
                    return Task::none();
                }
                self.search_request_seq += 1;
                let token = self.search_request_seq;
                let api = self.api.clone();
                Task::perform(
                    async move { api.search_students(&query).await.map_err(|e| e.to_string()) },
                    move |result| Message::SearchResultsLoaded(token, result),
                )
            }
            Message::SearchResultsLoaded(token, result) => {
                if token != self.search_request_seq {
                    debug!("dropping stale search response (token {token})");
                    return Task::none();
                }
                match result {
                    Ok(results) => {
                        self.search_results = results;
                        self.show_search_results = true;
                        Task::none()
                    }
                    Err(e) => {
                        warn!("search failed: {e}");
                        self.show_search_results = false;
                        self.push_toast(ToastKind::Error, e)
                    }
                }
            }
            Message::CloseSearchResults => {
                self.show_search_results = false;
                Task::none()
            }
            Message::StudentDragStarted(student_id) => {
                self.dragging_student = Some(student_id);
                Task::none()
            }
            Message::DragEnteredGroup(group_id) => {
                if self.dragging_student.is_some() {
                    self.drop_target_group = Some(group_id);
                }
                Task::none()
            }
            Message::DragLeftGroup(group_id) => {
                if self.drop_target_group.as_deref() == Some(group_id.as_str()) {
                    self.drop_target_group = None;
                }
                Task::none()
            }
            Message::DragCancelled => {
                self.dragging_student = None;
                self.drop_target_group = None;
                Task::none()
            }
            Message::StudentDroppedOnGroup(group_id) => {
                let Some(student_id) = self.dragging_student.take() else {
                    return Task::none();
                };
                self.drop_target_group = None;
                let origin = self
                    .roster
                    .student(&student_id)
                    .and_then(|s| s.group_id.clone());
                if origin.as_deref() == Some(group_id.as_str()) {
                    return Task::none();
                }
                // The store stays untouched until the server confirms; a
                // failure only has to re-render to revert the drag.
                let api = self.api.clone();
                let sid = student_id.clone();
                let gid = group_id.clone();
                Task::perform(
                    async move { api.move_student(&sid, &gid).await.map_err(|e| e.to_string()) },
                    move |result| {
                        Message::StudentMoved(student_id.clone(), group_id.clone(), result)
                    },
                )
            }
            Message::StudentMoved(student_id, group_id, result) => match result {
                Ok(()) => {
                    self.roster.apply_move(&student_id, &group_id);
                    let name = self
                        .roster
                        .student(&student_id)
                        .map(|s| s.name.clone())
                        .unwrap_or_else(|| "Student".to_string());
                    self.push_toast(ToastKind::Success, format!("{name} moved"))
                }
                Err(e) => {
                    warn!("move of {student_id} to {group_id} failed: {e}");
                    self.push_toast(ToastKind::Error, format!("Failed to move student: {e}"))
                }
            },
            Message::StartEditingGroupName(group_id) => {
                if let Some(group) = self.roster.group(&group_id) {
                    self.edit_group_name = group.name.clone();
                    self.editing_group_id = Some(group_id);
                }
                Task::none()
            }
            Message::EditGroupNameChanged(value) => {
                self.edit_group_name = value;
                Task::none()
            }
            Message::SubmitGroupName(group_id) => {
                if self.editing_group_id.as_deref() != Some(group_id.as_str()) {
                    return Task::none();
                }
                let new_name = self.edit_group_name.trim().to_string();
                if new_name.is_empty() {
                    // Revert to the stored name without a request.
                    self.editing_group_id = None;
                    self.edit_group_name.clear();
                    return Task::none();
                }
                let api = self.api.clone();
                let gid = group_id.clone();
                let name = new_name.clone();
                Task::perform(
                    async move { api.rename_group(&gid, &name).await.map_err(|e| e.to_string()) },
                    move |result| {
                        Message::GroupRenamed(group_id.clone(), new_name.clone(), result)
                    },
                )
            }
            Message::GroupRenamed(group_id, new_name, result) => {
                if self.editing_group_id.as_deref() == Some(group_id.as_str()) {
                    self.editing_group_id = None;
                    self.edit_group_name.clear();
                }
                match result {
                    Ok(()) => {
                        if let Some(group) = self.roster.group_mut(&group_id) {
                            group.name = new_name;
                        }
                        self.push_toast(ToastKind::Success, "Group name updated".to_string())
                    }
                    Err(e) => {
                        // The buffer is gone, so the card falls back to the
                        // stored name exactly as it was before the edit.
                        warn!("rename of {group_id} failed: {e}");
                        self.push_toast(ToastKind::Error, e)
                    }
                }
            }
            Message::RequestDeleteGroup(group_id) => {
                self.confirm_delete_group = Some(group_id);
                Task::none()
            }
            Message::CancelDeleteGroup => {
                self.confirm_delete_group = None;
                Task::none()
            }
            Message::ConfirmDeleteGroup(group_id) => {
                self.confirm_delete_group = None;
                let api = self.api.clone();
                let gid = group_id.clone();
                Task::perform(
                    async move { api.delete_group(&gid).await.map_err(|e| e.to_string()) },
                    move |result| Message::GroupDeleted(group_id.clone(), result),
                )
            }
            Message::GroupDeleted(group_id, result) => match result {
                Ok(()) => {
                    self.roster.remove_group(&group_id);
                    self.push_toast(ToastKind::Success, "Group deleted".to_string())
                }
                Err(e) => {
                    warn!("delete of {group_id} failed: {e}");
                    self.push_toast(ToastKind::Error, e)
                }
            },
            Message::OpenNotesModal(student_id) => {
                if self.roster.student(&student_id).is_none() {
                    return self.push_toast(ToastKind::Error, "Student not found".to_string());
                }
                self.notes_student_id = Some(student_id);
                self.new_note_text.clear();
                Task::none()
            }
            Message::CloseNotesModal => {
                self.notes_student_id = None;
                self.new_note_text.clear();
                Task::none()
            }
            Message::NewNoteTextChanged(value) => {
                self.new_note_text = value;
                Task::none()
            }
            Message::SubmitNote => {
                let Some(student_id) = self.notes_student_id.clone() else {
                    return Task::none();
                };
                let text = self.new_note_text.trim().to_string();
                if text.is_empty() {
                    return Task::none();
                }
                let api = self.api.clone();
                let sid = student_id.clone();
                let body = text.clone();
                Task::perform(
                    async move { api.add_note(&sid, &body).await.map_err(|e| e.to_string()) },
                    move |result| Message::NoteAdded(student_id.clone(), text.clone(), result),
                )
            }
            Message::NoteAdded(student_id, text, result) => match result {
                Ok(note) => {
                    let note = note.unwrap_or_else(|| Note {
                        timestamp: chrono::Utc::now().to_rfc3339(),
                        author: DEFAULT_NOTE_AUTHOR.to_string(),
                        body: text,
                    });
                    if let Some(student) = self.roster.student_mut(&student_id) {
                        student.notes.push(note);
                    }
                    self.new_note_text.clear();
                    self.push_toast(ToastKind::Success, "Note added".to_string())
                }
                Err(e) => {
                    warn!("note for {student_id} failed: {e}");
                    self.push_toast(ToastKind::Error, e)
                }
            },
            Message::ToastExpired(id) => {
                self.toasts.retain(|toast| toast.id != id);
                Task::none()
            }
        }
    }

    fn push_toast(&mut self, kind: ToastKind, text: String) -> Task<Message> {
        let id = self.next_toast_id;
        self.next_toast_id += 1;
        self.toasts.push(Toast { id, kind, text });
        Task::perform(
            async move {
                tokio::time::sleep(Duration::from_secs(TOAST_SECS)).await;
                id
            },
            Message::ToastExpired,
        )
    }
}
