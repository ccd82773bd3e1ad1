use iced::widget::container::background;
use iced::widget::{button, Column, Container, Row, Stack, Text};
use iced::{Alignment, Color, Element, Length};

use crate::app::state::{Screen, Toast, ToastKind};
use crate::screens::{nav_menu, roster_screen, settings_screen};
use super::{App, Message};

impl App {
    pub fn view(&self) -> Element<Message> {
        let base = Row::new()
            .spacing(20)
            .push(
                Container::new(nav_menu(self))
                    .width(Length::Fixed(200.0))
                    .height(Length::Fill)
                    .padding(10),
            )
            .push(
                match &self.current_screen {
                    Screen::Roster => roster_screen(self),
                    Screen::Settings => settings_screen(self),
                }
                .width(Length::Fill),
            );

        let mut ui_stack = Stack::new().push(base);
        if !self.toasts.is_empty() {
            ui_stack = ui_stack.push(toast_overlay(self));
        }
        ui_stack.into()
    }
}

fn toast_overlay(app: &App) -> Container<'_, Message> {
    let mut column = Column::new().spacing(10).width(Length::Fixed(360.0));
    for toast in &app.toasts {
        column = column.push(toast_card(toast));
    }

    Container::new(column)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Alignment::End)
        .align_y(Alignment::End)
        .padding(20)
}

fn toast_card(toast: &Toast) -> Container<'_, Message> {
    let color = match toast.kind {
        ToastKind::Success => Color::from_rgb8(25, 135, 84),
        ToastKind::Info => Color::from_rgb8(13, 110, 253),
        ToastKind::Error => Color::from_rgb8(220, 53, 69),
    };

    Container::new(
        Row::new()
            .spacing(10)
            .align_y(Alignment::Center)
            .push(
                Text::new(toast.text.clone())
                    .color(Color::WHITE)
                    .width(Length::Fill),
            )
            .push(button("X").on_press(Message::ToastExpired(toast.id))),
    )
    .padding(10)
    .width(Length::Fill)
    .style(move |_| background(color))
}
