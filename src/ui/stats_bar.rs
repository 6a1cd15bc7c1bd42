/// Running label counts
use iced::widget::{row, text};
use iced::Element;

use snap_label::Stats;

use crate::Message;

pub fn view<'a>(stats: Stats) -> Element<'a, Message> {
    row![
        text(format!("Total {}", stats.total)),
        text(format!("OK {}", stats.ok)),
        text(format!("NG {}", stats.ng)),
        text(format!("Unlabeled {}", stats.unlabeled)),
    ]
    .spacing(16)
    .into()
}
