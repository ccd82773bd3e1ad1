use crate::api::{RosterPayload, StudentSummary};
use crate::app::state::Note;

#[derive(Debug, Clone)]
pub enum Message {
    RosterLoaded(Result<RosterPayload, String>),
    ReloadRoster,
    WeekSelected(u32),
    //
    GoToRoster,
    GoToSettings,
    ThemeSelected(&'static str),
    //
    SearchInputChanged(String),
    SearchDebounceElapsed(u64),
    SearchResultsLoaded(u64, Result<Vec<StudentSummary>, String>),
    CloseSearchResults,
    //
    StudentDragStarted(String),
    DragEnteredGroup(String),
    DragLeftGroup(String),
    StudentDroppedOnGroup(String),
    DragCancelled,
    StudentMoved(String, String, Result<(), String>),
    //
    StartEditingGroupName(String),
    EditGroupNameChanged(String),
    SubmitGroupName(String),
    GroupRenamed(String, String, Result<(), String>),
    //
    RequestDeleteGroup(String),
    CancelDeleteGroup,
    ConfirmDeleteGroup(String),
    GroupDeleted(String, Result<(), String>),
    //
    OpenNotesModal(String),
    CloseNotesModal,
    NewNoteTextChanged(String),
    SubmitNote,
    NoteAdded(String, String, Result<Option<Note>, String>),
    //
    ToastExpired(u64),
}
