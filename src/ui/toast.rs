/// Toast stack shown along the bottom edge of the window
use iced::widget::{button, column, container, row, text, Column};
use iced::{Background, Border, Element, Length, Theme};

use crate::state::notify::{Notification, Severity, Toasts};
use crate::Message;

pub fn view(toasts: &Toasts) -> Element<'_, Message> {
    let items = toasts.iter().map(|(id, notification)| toast(id, notification));
    let items = Column::with_children(items)
        .spacing(10)
        .width(Length::Fixed(360.0));

    container(items)
        .padding([0, 20])
        .align_right(Length::Fill)
        .into()
}

fn toast(id: u64, notification: &Notification) -> Element<'_, Message> {
    let severity = notification.severity;

    container(
        row![
            column![
                text(&notification.title).size(16),
                text(&notification.description).size(13),
            ]
            .spacing(4)
            .width(Length::Fill),
            button(text("x").size(13))
                .on_press(Message::DismissToast(id))
                .style(button::text),
        ]
        .spacing(8),
    )
    .padding(14)
    .width(Length::Fill)
    .style(move |theme: &Theme| toast_style(theme, severity))
    .into()
}

fn toast_style(theme: &Theme, severity: Severity) -> container::Style {
    let palette = theme.extended_palette();
    let pair = match severity {
        Severity::Normal => palette.background.strong,
        Severity::Destructive => palette.danger.base,
    };

    container::Style {
        text_color: Some(pair.text),
        background: Some(Background::Color(pair.color)),
        border: Border {
            color: pair.color,
            width: 1.0,
            radius: 8.0.into(),
        },
        ..container::Style::default()
    }
}
