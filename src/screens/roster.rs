use iced::widget::container::{background, bordered_box};
use iced::widget::{
    button, horizontal_space, mouse_area, row, Button, Column, Container, PickList, Row, Rule,
    Scrollable, Stack, Text, TextInput,
};
use iced::{Alignment, Color, Length, Theme};

use crate::api::StudentSummary;
use crate::app::state::{Group, Student, PROGRAM_WEEKS};
use crate::app::{App, Message};

pub fn roster_screen(app: &App) -> Container<Message> {
    if app.is_loading_roster {
        return Container::new(Text::new("Loading roster...").size(20))
            .center_x(Length::Fill)
            .center_y(Length::Fill);
    }
    if let Some(error) = &app.roster_error {
        if app.roster.groups.is_empty() {
            let content = Column::new()
                .spacing(15)
                .align_x(Alignment::Center)
                .push(Text::new("Could not load the roster").size(24))
                .push(Text::new(error.clone()).size(16))
                .push(Button::new(Text::new("Retry")).on_press(Message::ReloadRoster));
            return Container::new(content)
                .center_x(Length::Fill)
                .center_y(Length::Fill);
        }
    }

    let mut board = Column::new().spacing(20).padding(20).push(toolbar(app));

    if app.show_search_results {
        board = board.push(search_results(app));
    }

    for group in app.roster.groups_sorted() {
        board = board.push(group_card(app, group));
    }
    board = board.push(ungrouped_panel(app));

    let scrollable_board = Scrollable::new(board).width(Length::Fill).height(Length::Fill);

    // Releasing a drag outside any group card lands here and cancels it.
    let base_ui = Container::new(
        mouse_area(scrollable_board).on_release(Message::DragCancelled),
    )
    .align_y(Alignment::Start)
    .width(Length::Fill)
    .height(Length::Fill);

    let mut ui_stack = Stack::new().push(base_ui);

    if let Some(student_id) = &app.notes_student_id {
        if let Some(student) = app.roster.student(student_id) {
            ui_stack = ui_stack.push(notes_modal(app, student));
        }
    }

    if let Some(group_id) = &app.confirm_delete_group {
        ui_stack = ui_stack.push(confirm_delete_modal(app, group_id));
    }

    Container::new(ui_stack)
        .width(Length::Fill)
        .height(Length::Fill)
}

fn toolbar(app: &App) -> Row<'_, Message> {
    row![
        TextInput::new("Search students...", &app.search_text)
            .on_input(Message::SearchInputChanged)
            .padding(10)
            .size(18)
            .width(Length::Fixed(400.0)),
        Text::new("Week:"),
        PickList::new(
            PROGRAM_WEEKS,
            Some(app.roster.current_week),
            Message::WeekSelected
        ),
        horizontal_space(),
        button("Reload").on_press(Message::ReloadRoster),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
}

fn search_results(app: &App) -> Container<'_, Message> {
    let mut results_col = Column::new().spacing(5);

    if app.search_results.is_empty() {
        results_col = results_col.push(Text::new("No matching students found").size(14));
    } else {
        for result in &app.search_results {
            results_col = results_col.push(search_result_row(app, result));
        }
    }

    results_col = results_col.push(
        row![
            horizontal_space(),
            button("Close").on_press(Message::CloseSearchResults)
        ]
        .width(Length::Fill),
    );

    Container::new(results_col)
        .padding(10)
        .width(Length::Fixed(400.0))
        .style(move |_| bordered_box(&app.theme))
}

fn search_result_row<'a>(app: &'a App, result: &'a StudentSummary) -> Container<'a, Message> {
    let summary = format!(
        "{} • {} years • {}",
        result.ability.as_deref().unwrap_or("Unknown"),
        result
            .age
            .map(|age| age.to_string())
            .unwrap_or_else(|| "?".to_string()),
        result.group.as_deref().unwrap_or("Ungrouped"),
    );

    let content = Column::new()
        .spacing(2)
        .push(Text::new(result.name.clone()).size(16))
        .push(Text::new(summary).size(13));

    // Pressing a result picks the student up; drop it on a group card.
    Container::new(
        mouse_area(content).on_press(Message::StudentDragStarted(result.id.clone())),
    )
    .padding(5)
    .width(Length::Fill)
    .style(move |_| bordered_box(&app.theme))
}

fn group_headerbar<'a>(app: &'a App, group: &'a Group) -> Row<'a, Message> {
    let name_widget: iced::Element<'a, Message> =
        if app.editing_group_id.as_deref() == Some(group.id.as_str()) {
            TextInput::new("Group name", &app.edit_group_name)
                .on_input(Message::EditGroupNameChanged)
                .on_submit(Message::SubmitGroupName(group.id.clone()))
                .size(22)
                .width(Length::Fixed(300.0))
                .into()
        } else {
            mouse_area(Text::new(group.name.clone()).size(26))
                .on_press(Message::StartEditingGroupName(group.id.clone()))
                .into()
        };

    row![
        name_widget,
        horizontal_space(),
        Text::new(format!("{} students", group.student_ids.len())).size(16),
        button("X").on_press(Message::RequestDeleteGroup(group.id.clone())),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .width(Length::Fill)
}

fn group_card<'a>(app: &'a App, group: &'a Group) -> Container<'a, Message> {
    let mut students_col = Column::new().spacing(5);
    let members = app.roster.students_in(group);
    if members.is_empty() {
        students_col = students_col.push(Text::new("No students in this group yet.").size(14));
    } else {
        for student in members {
            students_col = students_col.push(student_row(app, student));
        }
    }

    let card = Column::new()
        .spacing(10)
        .push(
            Container::new(group_headerbar(app, group))
                .padding(10)
                .style(move |_| bordered_box(&app.theme)),
        )
        .push(students_col);

    let is_drop_target = app.dragging_student.is_some()
        && app.drop_target_group.as_deref() == Some(group.id.as_str());

    Container::new(
        mouse_area(Container::new(card).padding(10).width(Length::Fill))
            .on_enter(Message::DragEnteredGroup(group.id.clone()))
            .on_exit(Message::DragLeftGroup(group.id.clone()))
            .on_release(Message::StudentDroppedOnGroup(group.id.clone())),
    )
    .width(Length::Fill)
    .style(move |theme: &Theme| {
        if is_drop_target {
            background(Color {
                r: 0.3,
                g: 0.5,
                b: 0.9,
                a: 0.2,
            })
        } else {
            bordered_box(theme)
        }
    })
}

fn student_row<'a>(app: &'a App, student: &'a Student) -> Container<'a, Message> {
    let summary = format!(
        "{} • {} years",
        student.ability.as_deref().unwrap_or("Unknown"),
        student
            .age
            .map(|age| age.to_string())
            .unwrap_or_else(|| "?".to_string()),
    );
    let notes_label = if student.notes.is_empty() {
        "Notes".to_string()
    } else {
        format!("Notes ({})", student.notes.len())
    };

    let row_content = Row::new()
        .padding(10)
        .spacing(10)
        .align_y(Alignment::Center)
        .push(
            Column::new()
                .spacing(2)
                .push(Text::new(student.name.clone()).size(18))
                .push(Text::new(summary).size(14)),
        )
        .push(horizontal_space())
        .push(
            button(Text::new(notes_label)).on_press(Message::OpenNotesModal(student.id.clone())),
        );

    let is_dragging = app.dragging_student.as_deref() == Some(student.id.as_str());

    Container::new(
        mouse_area(row_content).on_press(Message::StudentDragStarted(student.id.clone())),
    )
    .width(Length::Fill)
    .style(move |theme: &Theme| {
        if is_dragging {
            background(Color {
                r: 0.5,
                g: 0.5,
                b: 0.5,
                a: 0.3,
            })
        } else {
            bordered_box(theme)
        }
    })
}

fn ungrouped_panel(app: &App) -> Container<'_, Message> {
    let mut students_col = Column::new().spacing(5);
    let ungrouped = app.roster.ungrouped_students();
    if ungrouped.is_empty() {
        students_col = students_col.push(Text::new("Everyone is in a group.").size(14));
    } else {
        for student in ungrouped {
            students_col = students_col.push(student_row(app, student));
        }
    }

    let panel = Column::new()
        .spacing(10)
        .push(Text::new("Ungrouped").size(26))
        .push(students_col);

    Container::new(panel)
        .padding(10)
        .width(Length::Fill)
        .style(move |_| bordered_box(&app.theme))
}

fn notes_modal<'a>(app: &'a App, student: &'a Student) -> Container<'a, Message> {
    let mut notes_col = Column::new().spacing(5);
    if student.notes.is_empty() {
        notes_col = notes_col.push(Text::new("No notes yet.").size(14));
    } else {
        for note in &student.notes {
            notes_col = notes_col.push(
                Container::new(
                    Column::new()
                        .spacing(2)
                        .push(
                            row![
                                Text::new(note.timestamp.clone()).size(12),
                                horizontal_space(),
                                Text::new(note.author.clone()).size(12),
                            ]
                            .width(Length::Fill),
                        )
                        .push(Text::new(note.body.clone()).size(14)),
                )
                .padding(5)
                .width(Length::Fill)
                .style(move |_| bordered_box(&app.theme)),
            );
        }
    }

    let input_row = row![
        TextInput::new("Add a note...", &app.new_note_text)
            .on_input(Message::NewNoteTextChanged)
            .on_submit(Message::SubmitNote)
            .padding(10),
        button("Save").on_press(Message::SubmitNote),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let modal_content = Column::new()
        .spacing(15)
        .align_x(Alignment::Start)
        .push(Text::new(format!("Notes for {}", student.name)).size(22))
        .push(Scrollable::new(notes_col).height(Length::FillPortion(1)))
        .push(Rule::horizontal(10))
        .push(input_row)
        .push(button(Text::new("Close")).on_press(Message::CloseNotesModal));

    let modal = Container::new(modal_content)
        .style(move |_| bordered_box(&app.theme))
        .padding(20)
        .height(Length::Fixed(500.0))
        .width(Length::Fixed(600.0));

    Container::new(
        mouse_area(Container::new(modal).center(Length::Fill))
            .on_press(Message::CloseNotesModal),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .style(move |_| {
        background(Color {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 0.7,
        })
    })
}

fn confirm_delete_modal<'a>(app: &'a App, group_id: &'a str) -> Container<'a, Message> {
    let group_name = app
        .roster
        .group(group_id)
        .map(|g| g.name.clone())
        .unwrap_or_else(|| "this group".to_string());

    let modal_content = Column::new()
        .spacing(15)
        .push(Text::new(format!("Delete {group_name}?")).size(22))
        .push(Text::new("Its students stay on the roster as ungrouped.").size(14))
        .push(
            Row::new()
                .spacing(10)
                .push(Button::new(Text::new("Cancel")).on_press(Message::CancelDeleteGroup))
                .push(
                    Button::new(Text::new("Delete"))
                        .on_press(Message::ConfirmDeleteGroup(group_id.to_string())),
                ),
        );

    let modal = Container::new(modal_content)
        .style(move |_| bordered_box(&app.theme))
        .padding(20)
        .width(Length::Fixed(400.0));

    Container::new(
        mouse_area(Container::new(modal).center(Length::Fill))
            .on_press(Message::CancelDeleteGroup),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .style(move |_| {
        background(Color {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 0.7,
        })
    })
}
