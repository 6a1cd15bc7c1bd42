/// Shown when there is no unlabeled image to display
use iced::widget::{column, container, text};
use iced::{Alignment, Element, Length};

use crate::Message;

/// `all_done` distinguishes a finished catalog from an empty one
pub fn view<'a>(all_done: bool) -> Element<'a, Message> {
    let (title, subtitle) = if all_done {
        (
            "All images labeled",
            "Export the results as CSV, or scan another folder.",
        )
    } else {
        (
            "No images yet",
            "Scan a folder to begin (.jpg, .jpeg and .png files).",
        )
    };

    let content = column![text(title).size(32), text(subtitle).size(16)]
        .spacing(12)
        .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
