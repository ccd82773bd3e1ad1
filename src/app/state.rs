use std::collections::HashMap;

use iced::Theme;
use serde::Deserialize;

use crate::api::{ApiClient, RosterPayload, StudentSummary};
use crate::config::DEFAULT_API_BASE_URL;

pub const MIN_SEARCH_LEN: usize = 2;
pub const SEARCH_DEBOUNCE_MS: u64 = 300;
pub const TOAST_SECS: u64 = 5;
pub const PROGRAM_WEEKS: [u32; 6] = [1, 2, 3, 4, 5, 6];
pub const DEFAULT_NOTE_AUTHOR: &str = "Instructor";

/// Free-text note attached to a student. Append-only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Note {
    pub timestamp: String,
    pub author: String,
    #[serde(rename = "note")]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Student {
    #[serde(alias = "customer_id")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "ability_level")]
    pub ability: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// Named collection of students. Membership is exclusive: `student_ids`
/// entries are owned by this group only, and the list order is the display
/// order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub student_ids: Vec<String>,
}

/// In-memory mirror of the server roster. Plain data container: mutated by
/// the update loop after the server confirms an operation, never talks to
/// the network itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterState {
    pub students: HashMap<String, Student>,
    pub groups: HashMap<String, Group>,
    pub program_name: String,
    pub current_week: u32,
}

impl RosterState {
    pub fn from_payload(payload: RosterPayload) -> Self {
        Self {
            students: payload.students,
            groups: payload.groups,
            program_name: payload.program_name,
            current_week: payload.current_week,
        }
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.get(id)
    }

    pub fn student_mut(&mut self, id: &str) -> Option<&mut Student> {
        self.students.get_mut(id)
    }

    pub fn set_student(&mut self, student: Student) {
        self.students.insert(student.id.clone(), student);
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.get_mut(id)
    }

    pub fn set_group(&mut self, group: Group) {
        self.groups.insert(group.id.clone(), group);
    }

    /// Deletes a group and clears the back-reference on any student that
    /// pointed at it.
    pub fn remove_group(&mut self, id: &str) {
        if let Some(group) = self.groups.remove(id) {
            for student_id in &group.student_ids {
                if let Some(student) = self.students.get_mut(student_id) {
                    if student.group_id.as_deref() == Some(id) {
                        student.group_id = None;
                    }
                }
            }
        }
    }

    /// Applies a confirmed move: the student leaves every membership list
    /// and is appended to the destination. No-op when either side is gone.
    pub fn apply_move(&mut self, student_id: &str, group_id: &str) {
        if !self.students.contains_key(student_id) || !self.groups.contains_key(group_id) {
            return;
        }
        for group in self.groups.values_mut() {
            group.student_ids.retain(|id| id != student_id);
        }
        if let Some(dest) = self.groups.get_mut(group_id) {
            dest.student_ids.push(student_id.to_string());
        }
        if let Some(student) = self.students.get_mut(student_id) {
            student.group_id = Some(group_id.to_string());
        }
    }

    /// Groups in a stable display order. The server map carries no order,
    /// so cards render sorted by name.
    pub fn groups_sorted(&self) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.values().collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        groups
    }

    /// Members of a group in list order. Ids with no matching student are
    /// skipped rather than rendered or reported.
    pub fn students_in<'a>(&'a self, group: &Group) -> Vec<&'a Student> {
        group
            .student_ids
            .iter()
            .filter_map(|id| self.students.get(id))
            .collect()
    }

    pub fn ungrouped_students(&self) -> Vec<&Student> {
        let mut students: Vec<&Student> = self
            .students
            .values()
            .filter(|s| s.group_id.is_none())
            .collect();
        students.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        students
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub text: String,
}

#[derive(PartialEq, Default)]
pub enum Screen {
    #[default]
    Roster,
    Settings,
}

pub struct App {
    pub api: ApiClient,
    pub theme: Theme,
    pub current_screen: Screen,
    //
    pub roster: RosterState,
    pub is_loading_roster: bool,
    pub roster_error: Option<String>,
    //
    pub search_text: String,
    pub search_results: Vec<StudentSummary>,
    pub show_search_results: bool,
    pub search_debounce_seq: u64,
    pub search_request_seq: u64,
    //
    pub dragging_student: Option<String>,
    pub drop_target_group: Option<String>,
    //
    pub editing_group_id: Option<String>,
    pub edit_group_name: String,
    //
    pub confirm_delete_group: Option<String>,
    //
    pub notes_student_id: Option<String>,
    pub new_note_text: String,
    //
    pub toasts: Vec<Toast>,
    pub next_toast_id: u64,
}

impl Default for App {
    fn default() -> Self {
        Self {
            api: ApiClient::new(DEFAULT_API_BASE_URL),
            theme: Theme::Light,
            current_screen: Default::default(),
            roster: RosterState::default(),
            is_loading_roster: false,
            roster_error: None,
            search_text: "".to_string(),
            search_results: vec![],
            show_search_results: false,
            search_debounce_seq: 0,
            search_request_seq: 0,
            dragging_student: None,
            drop_target_group: None,
            editing_group_id: None,
            edit_group_name: "".to_string(),
            confirm_delete_group: None,
            notes_student_id: None,
            new_note_text: "".to_string(),
            toasts: vec![],
            next_toast_id: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Group, Note, RosterState, Student};

    fn student(id: &str, name: &str, group_id: Option<&str>) -> Student {
        Student {
            id: id.to_string(),
            name: name.to_string(),
            ability: Some("Beginner".to_string()),
            age: Some(8),
            group_id: group_id.map(str::to_string),
            notes: vec![],
        }
    }

    fn seeded() -> RosterState {
        let mut roster = RosterState {
            program_name: "Saturday Program".to_string(),
            current_week: 1,
            ..RosterState::default()
        };
        roster.set_student(student("s1", "Anna", Some("g1")));
        roster.set_student(student("s2", "Ben", Some("g1")));
        roster.set_student(student("s3", "Cleo", None));
        roster.set_group(Group {
            id: "g1".to_string(),
            name: "Beginners".to_string(),
            student_ids: vec!["s1".to_string(), "s2".to_string()],
        });
        roster.set_group(Group {
            id: "g2".to_string(),
            name: "Racers".to_string(),
            student_ids: vec![],
        });
        roster
    }

    #[test]
    fn apply_move_is_single_destination() {
        let mut roster = seeded();
        roster.apply_move("s1", "g2");

        assert_eq!(roster.group("g1").unwrap().student_ids, vec!["s2"]);
        assert_eq!(roster.group("g2").unwrap().student_ids, vec!["s1"]);
        assert_eq!(roster.student("s1").unwrap().group_id.as_deref(), Some("g2"));
    }

    #[test]
    fn apply_move_with_unknown_ids_changes_nothing() {
        let mut roster = seeded();
        let before = roster.clone();

        roster.apply_move("nobody", "g1");
        roster.apply_move("s1", "no-group");

        assert_eq!(roster, before);
    }

    #[test]
    fn students_in_filters_dangling_references() {
        let mut roster = seeded();
        roster
            .group_mut("g1")
            .unwrap()
            .student_ids
            .push("ghost".to_string());

        let names: Vec<&str> = roster
            .students_in(&roster.group("g1").unwrap().clone())
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Anna", "Ben"]);
    }

    #[test]
    fn remove_group_clears_member_back_references() {
        let mut roster = seeded();
        roster.remove_group("g1");

        assert!(roster.group("g1").is_none());
        assert_eq!(roster.student("s1").unwrap().group_id, None);
        assert_eq!(roster.student("s2").unwrap().group_id, None);
    }

    #[test]
    fn groups_sorted_orders_by_name() {
        let roster = seeded();
        let names: Vec<&str> = roster.groups_sorted().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Beginners", "Racers"]);
    }

    #[test]
    fn ungrouped_students_lists_only_unassigned() {
        let roster = seeded();
        let names: Vec<&str> = roster
            .ungrouped_students()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Cleo"]);
    }

    #[test]
    fn student_parses_server_field_names() {
        let student: Student = serde_json::from_str(
            r#"{
                "customer_id": "c-42",
                "name": "Dana",
                "ability_level": "Advanced",
                "age": 11,
                "notes": [
                    {"timestamp": "2024-01-08T10:00:00Z", "author": "Instructor", "note": "strong parallel"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(student.id, "c-42");
        assert_eq!(student.ability.as_deref(), Some("Advanced"));
        assert_eq!(student.group_id, None);
        assert_eq!(
            student.notes,
            vec![Note {
                timestamp: "2024-01-08T10:00:00Z".to_string(),
                author: "Instructor".to_string(),
                body: "strong parallel".to_string(),
            }]
        );
    }
}
