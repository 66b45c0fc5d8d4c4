/// Upload form: drop zone with preview, metadata fields and the submit button
use iced::widget::{button, column, container, image, text, text_input};
use iced::{Alignment, Background, Border, Element, Length, Theme};

use crate::state::upload::UploadForm;
use crate::Message;

const PREVIEW_HEIGHT: f32 = 192.0;

pub fn view(form: &UploadForm, uploading: usize) -> Element<'_, Message> {
    let zone_content: Element<'_, Message> = match form.preview() {
        Some(preview) => column![
            image(preview.handle.clone()).height(Length::Fixed(PREVIEW_HEIGHT)),
            button(text("Change").size(13)).on_press(Message::PickFile).style(button::secondary),
        ]
        .spacing(10)
        .align_x(Alignment::Center)
        .into(),
        None => column![
            text("Drop an image here").size(18),
            button("Select Image").on_press(Message::PickFile).padding(10),
            text("or drag and drop").size(13),
        ]
        .spacing(12)
        .align_x(Alignment::Center)
        .into(),
    };

    let drag_active = form.is_drag_active();
    let drop_zone = container(zone_content)
        .padding(24)
        .center_x(Length::Fill)
        .style(move |theme: &Theme| drop_zone_style(theme, drag_active));

    let file_label = match form.file() {
        Some(file) => text(&file.file_name).size(13),
        None => text("No file selected").size(13),
    };

    let status = if uploading > 0 {
        text(format!("Uploading {} image(s)...", uploading)).size(13)
    } else {
        text("").size(13)
    };

    let fields = column![
        labeled(
            "Name",
            text_input("Image name", form.name())
                .on_input(Message::NameChanged)
                .on_submit(Message::Submit)
                .padding(8),
        ),
        labeled(
            "Title",
            text_input("Image title", form.title())
                .on_input(Message::TitleChanged)
                .on_submit(Message::Submit)
                .padding(8),
        ),
        labeled(
            "Keywords",
            text_input("Comma separated keywords", form.keywords())
                .on_input(Message::KeywordsChanged)
                .on_submit(Message::Submit)
                .padding(8),
        ),
    ]
    .spacing(14);

    let content = column![
        drop_zone,
        file_label,
        fields,
        button(text("Upload Image").width(Length::Fill).align_x(Alignment::Center))
            .on_press(Message::Submit)
            .width(Length::Fill)
            .padding(10),
        status,
    ]
    .spacing(18);

    container(content)
        .padding(24)
        .width(Length::Fixed(350.0))
        .style(container::rounded_box)
        .into()
}

fn labeled<'a>(
    label: &'a str,
    input: iced::widget::TextInput<'a, Message>,
) -> Element<'a, Message> {
    column![text(label).size(14), input].spacing(4).into()
}

fn drop_zone_style(theme: &Theme, drag_active: bool) -> container::Style {
    let palette = theme.extended_palette();
    let (border_color, background) = if drag_active {
        (palette.primary.strong.color, palette.primary.weak.color)
    } else {
        (palette.background.strong.color, palette.background.weak.color)
    };

    container::Style {
        background: Some(Background::Color(background)),
        border: Border {
            color: border_color,
            width: 2.0,
            radius: 12.0.into(),
        },
        ..container::Style::default()
    }
}
