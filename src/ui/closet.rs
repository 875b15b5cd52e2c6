use std::collections::HashMap;

use iced::widget::{button, column, container, image, row, scrollable, text, text_input, Space};
use iced::{ContentFit, Element, Length};

use crate::state::catalog::CatalogController;
use crate::state::data::GalleryCell;
use crate::{FlowHost, Message};

/// Category quick-filters offered above the grid.
const CATEGORIES: [&str; 4] = ["Tops", "Bottoms", "Shoes", "Dresses"];

const CELL_HEIGHT: f32 = 150.0;

/// Build the closet screen: search box, filter row, add button, and the
/// two-column gallery.
pub fn view<'a>(
    catalog: &'a CatalogController,
    thumbnails: &'a HashMap<i64, image::Handle>,
    uploading: bool,
    status: &'a str,
) -> Element<'a, Message> {
    let search = text_input("Search items...", &catalog.query().search)
        .on_input(Message::SearchChanged)
        .padding(8);

    let mut filters = row![filter_button("All", None, catalog)].spacing(8);
    for label in CATEGORIES {
        filters = filters.push(filter_button(label, Some(label), catalog));
    }
    let filters = filters.push(Space::with_width(Length::Fill)).push(
        button(text("+"))
            .on_press_maybe((!uploading).then_some(Message::AddPressed(FlowHost::Closet)))
            .padding([6, 12]),
    );

    let mut screen = column![search, filters].spacing(10).height(Length::Fill);

    if let Some(error) = catalog.last_error() {
        screen = screen.push(
            container(
                text(format!(
                    "Couldn't refresh: {error}. Showing your last loaded items."
                ))
                .style(text::danger),
            )
            .width(Length::Fill)
            .style(container::bordered_box)
            .padding(8),
        );
    }

    screen = screen.push(gallery(catalog, thumbnails));
    screen = screen.push(text(status).size(14));
    screen.into()
}

fn filter_button<'a>(
    label: &'a str,
    selection: Option<&str>,
    catalog: &CatalogController,
) -> Element<'a, Message> {
    let active =
        catalog.query().category.as_deref() == selection.map(str::to_lowercase).as_deref();
    let style = if active {
        button::primary
    } else {
        button::secondary
    };

    button(text(label))
        .style(style)
        .on_press(Message::FilterPicked(selection.map(str::to_string)))
        .padding([6, 12])
        .into()
}

fn gallery<'a>(
    catalog: &'a CatalogController,
    thumbnails: &'a HashMap<i64, image::Handle>,
) -> Element<'a, Message> {
    if catalog.items().is_empty() {
        return container(text("No items found."))
            .width(Length::Fill)
            .padding(20)
            .center_x(Length::Fill)
            .into();
    }

    let mut grid = column![].spacing(10);
    for pair in catalog.gallery_cells().chunks(2) {
        let mut cells = row![].spacing(10);
        for cell in pair {
            cells = cells.push(gallery_cell(cell.clone(), thumbnails));
        }
        grid = grid.push(cells);
    }

    scrollable(grid).height(Length::Fill).into()
}

/// Render one grid cell. Matched exhaustively, so a filler can never be
/// confused with a real item.
fn gallery_cell<'a>(
    cell: GalleryCell,
    thumbnails: &HashMap<i64, image::Handle>,
) -> Element<'a, Message> {
    match cell {
        GalleryCell::Item(item) => {
            let picture: Element<'a, Message> = match thumbnails.get(&item.id) {
                Some(handle) => image(handle.clone())
                    .width(Length::Fill)
                    .height(Length::Fixed(CELL_HEIGHT))
                    .content_fit(ContentFit::Cover)
                    .into(),
                // Shown until the thumbnail download lands.
                None => container(text(item.filename.clone()).size(12))
                    .center_x(Length::Fill)
                    .center_y(Length::Fixed(CELL_HEIGHT))
                    .into(),
            };

            let mut content = column![picture].spacing(4);
            if let Some(tags) = item.classification() {
                content = content.push(text(tags).size(11));
            }
            container(content).width(Length::FillPortion(1)).into()
        }
        GalleryCell::Filler => {
            // Invisible cell that keeps the last row two columns wide.
            container(Space::with_height(Length::Fixed(CELL_HEIGHT)))
                .width(Length::FillPortion(1))
                .into()
        }
    }
}
