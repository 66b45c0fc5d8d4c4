/// Searchable image grid
use iced::widget::{button, column, container, image, row, scrollable, text, text_input};
use iced::{ContentFit, Element, Length};
use iced_aw::Wrap;
use std::collections::{HashMap, HashSet};

use crate::media::preview::Preview;
use crate::state::data::ImageRecord;
use crate::state::gallery::Gallery;
use crate::Message;

const CARD_WIDTH: f32 = 240.0;
const THUMB_HEIGHT: f32 = 192.0;

pub fn view<'a>(
    gallery: &'a Gallery,
    thumbnails: &'a HashMap<String, Preview>,
    failed: &HashSet<String>,
) -> Element<'a, Message> {
    let search = row![
        text_input("Search images...", gallery.query())
            .on_input(Message::SearchChanged)
            .padding(10)
            .width(Length::Fill),
        button("Refresh").on_press(Message::Refresh).padding(10),
    ]
    .spacing(10);

    let cards: Vec<Element<'a, Message>> = gallery
        .visible()
        .iter()
        .map(|record| {
            card(
                record,
                thumbnails.get(&record.id),
                failed.contains(&record.id),
                gallery.is_deleting(&record.id),
            )
        })
        .collect();

    let body: Element<'a, Message> = if cards.is_empty() {
        let message = if gallery.images().is_empty() {
            "No images yet. Upload one to get started."
        } else {
            "No images match your search."
        };
        container(text(message).size(16))
            .padding(40)
            .center_x(Length::Fill)
            .into()
    } else {
        Wrap::with_elements(cards)
            .spacing(16.0)
            .line_spacing(16.0)
            .into()
    };

    column![search, scrollable(body).height(Length::Fill)]
        .spacing(20)
        .into()
}

fn card<'a>(
    record: &'a ImageRecord,
    thumbnail: Option<&'a Preview>,
    failed: bool,
    deleting: bool,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match thumbnail {
        Some(preview) => image(preview.handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(THUMB_HEIGHT))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text(if failed { "Preview unavailable" } else { "Loading..." }).size(13))
            .width(Length::Fill)
            .height(Length::Fixed(THUMB_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(THUMB_HEIGHT))
            .into(),
    };

    let delete = button(text(if deleting { "Deleting..." } else { "Delete" }).size(12))
        .style(button::danger)
        .on_press_maybe((!deleting).then(|| Message::DeleteRequested(record.id.clone())));

    let heading = row![
        column![text(&record.title).size(18), text(&record.name).size(13)]
            .spacing(2)
            .width(Length::Fill),
        delete,
    ]
    .spacing(8);

    let chips: Vec<Element<'a, Message>> = record
        .keywords
        .iter()
        .filter(|keyword| !keyword.is_empty())
        .map(|keyword| {
            container(text(keyword).size(12))
                .padding([2, 8])
                .style(container::rounded_box)
                .into()
        })
        .collect();

    container(
        column![picture, heading, Wrap::with_elements(chips).spacing(6.0).line_spacing(6.0)]
            .spacing(10),
    )
    .padding(12)
    .width(Length::Fixed(CARD_WIDTH))
    .style(container::bordered_box)
    .into()
}
