use iced::widget::{button, column, text, vertical_space, Container};
use iced::Length;

use crate::app::{App, Message};

pub fn nav_menu(app: &App) -> Container<Message> {
    let title = if app.roster.program_name.is_empty() {
        "Snowsports Roster".to_string()
    } else {
        app.roster.program_name.clone()
    };

    let content = column![
        text(title).size(20),
        button(text("Roster"))
            .on_press(Message::GoToRoster)
            .width(Length::Fill),
        vertical_space(),
        button(text("Settings"))
            .on_press(Message::GoToSettings)
            .width(Length::Fill),
    ]
    .spacing(10);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10)
}
