/// One page cell: thumbnail, wrapped label, hover tooltip
use iced::alignment::Horizontal;
use iced::widget::{column, container, image, mouse_area, text, tooltip};
use iced::{Alignment, Border, Color, ContentFit, Element, Length, Size, Theme};

use crate::state::data::GridCell;
use crate::Message;

const CELL_PADDING: u16 = 8;
const LABEL_GAP: u16 = 6;

pub fn view<'a>(
    index: usize,
    cell: &'a GridCell,
    size: Size,
    thumbnail_box: Size,
    label_size: f32,
) -> Element<'a, Message> {
    let fitted = cell.thumbnail.fit(thumbnail_box);
    let selected = cell.selected;

    let content = column![
        image(cell.thumbnail.handle.clone())
            .width(fitted.width)
            .height(fitted.height)
            .content_fit(ContentFit::Contain),
        text(&cell.label)
            .size(label_size)
            .width(Length::Fill)
            .align_x(Horizontal::Center),
    ]
    .spacing(LABEL_GAP)
    .align_x(Alignment::Center);

    let frame = container(content)
        .width(size.width)
        .height(size.height)
        .padding(CELL_PADDING)
        .clip(true)
        .style(move |theme| style(theme, selected));

    tooltip(
        mouse_area(frame)
            .on_press(Message::CellPressed(index))
            .on_right_press(Message::CellRightPressed(index)),
        text(&cell.tooltip).size(12),
        tooltip::Position::Bottom,
    )
    .style(container::rounded_box)
    .into()
}

fn style(theme: &Theme, selected: bool) -> container::Style {
    let palette = theme.extended_palette();

    if selected {
        container::Style {
            background: Some(
                Color {
                    a: 0.35,
                    ..palette.primary.weak.color
                }
                .into(),
            ),
            border: Border {
                color: palette.primary.strong.color,
                width: 2.0,
                radius: 4.0.into(),
            },
            ..container::Style::default()
        }
    } else {
        container::Style {
            border: Border {
                color: palette.background.strong.color,
                width: 1.0,
                radius: 4.0.into(),
            },
            ..container::Style::default()
        }
    }
}
