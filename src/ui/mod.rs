/// Labeling screen
///
/// Layout: toolbar on top, the current image (or an empty state) in the
/// middle, navigation and label buttons plus statistics at the bottom.
use iced::widget::{button, column, container, horizontal_space, image, row, text};
use iced::{Alignment, Element, Length};

use snap_label::{Label, NavigationView};

use crate::Message;

mod empty_state;
mod stats_bar;

/// Build the whole window content
pub fn labeling_screen<'a>(
    view: Option<&'a NavigationView>,
    status: &'a str,
    scanning: bool,
) -> Element<'a, Message> {
    let body: Element<'a, Message> = match view {
        Some(NavigationView::Current {
            entry,
            index,
            total,
            has_prev,
            has_next,
            ..
        }) => {
            let picture = image(image::Handle::from_path(&entry.path))
                .width(Length::Fill)
                .height(Length::Fill);

            let position = text(format!("{} / {}  ·  {}", index + 1, total, entry.filename)).size(16);

            let controls = row![
                button("◀ Prev")
                    .on_press_maybe(has_prev.then_some(Message::Prev))
                    .padding(10),
                button(text("OK").size(20))
                    .on_press(Message::Label(Label::Ok))
                    .style(button::success)
                    .padding([10, 30]),
                button(text("NG").size(20))
                    .on_press(Message::Label(Label::Ng))
                    .style(button::danger)
                    .padding([10, 30]),
                button("Next ▶")
                    .on_press_maybe(has_next.then_some(Message::Next))
                    .padding(10),
            ]
            .spacing(20)
            .align_y(Alignment::Center);

            column![picture, position, controls]
                .spacing(12)
                .align_x(Alignment::Center)
                .into()
        }
        Some(NavigationView::Empty { all_done, .. }) => empty_state::view(*all_done),
        None => empty_state::view(false),
    };

    let toolbar = row![
        button("Scan Folder")
            .on_press_maybe((!scanning).then_some(Message::ScanFolder))
            .padding(10),
        button("Export CSV").on_press(Message::ExportCsv).padding(10),
        horizontal_space(),
        button("Clear Catalog")
            .on_press(Message::ClearCatalog)
            .style(button::secondary)
            .padding(10),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let footer = row![
        text(status).size(14),
        horizontal_space(),
        stats_bar::view(view.map(NavigationView::stats).unwrap_or_default()),
    ]
    .align_y(Alignment::Center);

    container(
        column![
            toolbar,
            container(body).width(Length::Fill).height(Length::Fill),
            footer
        ]
        .spacing(16),
    )
    .padding(20)
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}
