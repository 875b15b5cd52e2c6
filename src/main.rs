use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use iced::widget::{button, column, image, row, text};
use iced::{Element, Length, Task, Theme};

mod api;
mod config;
mod media;
mod state;
mod ui;

use api::{ApiError, CatalogGateway, ClosetApi};
use config::Config;
use media::{Access, MediaLibrary, PickedImage, SystemLibrary};
use state::catalog::{CatalogController, FetchTicket};
use state::data::{ClothingItem, UploadReceipt};
use state::upload::{self, Step, UploadFlow};

/// Which of the two screens is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Closet,
    Upload,
}

/// Which screen is hosting a pick-and-upload invocation.
///
/// The closet reacts to a completed upload by refreshing the catalog; the
/// standalone upload screen just keeps the stored location next to its
/// local preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowHost {
    Closet,
    Preview,
}

/// Main application state
struct Wardrobe {
    screen: Screen,
    /// Catalog state behind the closet screen
    catalog: CatalogController,
    /// Pick-and-upload invocation hosted by the closet screen
    closet_flow: UploadFlow,
    /// Pick-and-upload invocation hosted by the standalone upload screen
    preview_flow: UploadFlow,
    /// Local preview of the image picked on the upload screen
    preview: Option<image::Handle>,
    /// Downloaded grid thumbnails, keyed by item id
    thumbnails: HashMap<i64, image::Handle>,
    /// Item ids with a thumbnail download in flight
    pending_thumbnails: HashSet<i64>,
    /// Status message to display to the user
    status: String,
    gateway: Arc<dyn CatalogGateway>,
    library: Arc<dyn MediaLibrary>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User switched between the closet and upload screens
    ScreenPicked(Screen),
    /// Search text changed on the closet screen
    SearchChanged(String),
    /// A category quick-filter was pressed; `None` is the "All" reset
    FilterPicked(Option<String>),
    /// A catalog fetch finished, tagged with its sequence number
    CatalogFetched(u64, Result<Vec<ClothingItem>, ApiError>),
    /// A grid thumbnail download finished
    ThumbnailFetched(i64, Result<Vec<u8>, ApiError>),
    /// The add/pick button was pressed on one of the screens
    AddPressed(FlowHost),
    /// The media-library permission gate answered
    AccessChecked(FlowHost, u64, Access),
    /// The picker closed, with or without an image
    ImagePicked(FlowHost, u64, Option<PickedImage>),
    /// The upload POST finished
    UploadFinished(FlowHost, u64, Result<UploadReceipt, ApiError>),
}

impl Wardrobe {
    /// Create a new instance of the application and start the first
    /// catalog fetch.
    fn new() -> (Self, Task<Message>) {
        let config = Config::load();

        let gateway: Arc<dyn CatalogGateway> = Arc::new(ClosetApi::new(config.api_base_url));
        let library: Arc<dyn MediaLibrary> = Arc::new(SystemLibrary);

        let mut app = Wardrobe {
            screen: Screen::Closet,
            catalog: CatalogController::new(),
            closet_flow: UploadFlow::new(),
            preview_flow: UploadFlow::new(),
            preview: None,
            thumbnails: HashMap::new(),
            pending_thumbnails: HashSet::new(),
            status: "Loading your closet...".to_string(),
            gateway,
            library,
        };

        let ticket = app.catalog.begin_refresh();
        let fetch = app.start_fetch(ticket);
        (app, fetch)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ScreenPicked(screen) => {
                self.screen = screen;
                Task::none()
            }
            Message::SearchChanged(text) => {
                let ticket = self.catalog.set_search(text);
                self.start_fetch(ticket)
            }
            Message::FilterPicked(selection) => {
                let ticket = self.catalog.set_filter(selection.as_deref());
                self.start_fetch(ticket)
            }
            Message::CatalogFetched(seq, result) => {
                if !self.catalog.apply_fetch(seq, result) {
                    return Task::none();
                }
                match self.catalog.last_error() {
                    None => {
                        self.status =
                            format!("{} items in your closet.", self.catalog.items().len());
                        self.fetch_missing_thumbnails()
                    }
                    Some(error) => {
                        log::warn!("catalog refresh failed: {error}");
                        self.status = "Couldn't refresh the closet.".to_string();
                        Task::none()
                    }
                }
            }
            Message::ThumbnailFetched(id, result) => {
                self.pending_thumbnails.remove(&id);
                match result {
                    Ok(bytes) => {
                        self.thumbnails.insert(id, image::Handle::from_bytes(bytes));
                    }
                    Err(error) => {
                        log::warn!("thumbnail download for item {id} failed: {error}");
                    }
                }
                Task::none()
            }
            Message::AddPressed(host) => {
                // Inert while an invocation is already running.
                let Some(token) = self.flow_mut(host).begin() else {
                    return Task::none();
                };
                let library = self.library.clone();
                Task::perform(
                    async move { library.request_access().await },
                    move |access| Message::AccessChecked(host, token, access),
                )
            }
            Message::AccessChecked(host, token, access) => {
                let step = self.flow_mut(host).access_checked(token, access);
                self.advance(host, token, step)
            }
            Message::ImagePicked(host, token, picked) => {
                let step = self.flow_mut(host).image_picked(token, picked);
                self.advance(host, token, step)
            }
            Message::UploadFinished(host, token, outcome) => {
                let step = self.flow_mut(host).upload_finished(token, outcome);
                self.advance(host, token, step)
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let tabs = row![
            screen_tab("Closet", Screen::Closet, self.screen),
            screen_tab("Upload", Screen::Upload, self.screen),
        ]
        .spacing(10);

        let content = match self.screen {
            Screen::Closet => ui::closet::view(
                &self.catalog,
                &self.thumbnails,
                self.closet_flow.busy(),
                &self.status,
            ),
            Screen::Upload => ui::upload::view(self.preview.as_ref(), &self.preview_flow),
        };

        column![tabs, content]
            .spacing(10)
            .padding(10)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn flow_mut(&mut self, host: FlowHost) -> &mut UploadFlow {
        match host {
            FlowHost::Closet => &mut self.closet_flow,
            FlowHost::Preview => &mut self.preview_flow,
        }
    }

    /// Launch the fetch a ticket stands for; the result comes back as a
    /// `CatalogFetched` message carrying the ticket's sequence number.
    fn start_fetch(&mut self, ticket: FetchTicket) -> Task<Message> {
        let gateway = self.gateway.clone();
        let FetchTicket { seq, query } = ticket;
        Task::perform(
            async move { gateway.fetch_closet(&query).await },
            move |result| Message::CatalogFetched(seq, result),
        )
    }

    /// Download thumbnails for items that don't have one yet.
    fn fetch_missing_thumbnails(&mut self) -> Task<Message> {
        let mut downloads = Vec::new();
        for item in self.catalog.items() {
            if self.thumbnails.contains_key(&item.id)
                || self.pending_thumbnails.contains(&item.id)
            {
                continue;
            }
            self.pending_thumbnails.insert(item.id);

            let id = item.id;
            let url = item.url.clone();
            let gateway = self.gateway.clone();
            downloads.push(Task::perform(
                async move { gateway.fetch_bytes(&url).await },
                move |result| Message::ThumbnailFetched(id, result),
            ));
        }
        Task::batch(downloads)
    }

    /// Run the next step of a pick-and-upload invocation.
    fn advance(&mut self, host: FlowHost, token: u64, step: Step) -> Task<Message> {
        match step {
            Step::Pick => {
                let library = self.library.clone();
                Task::perform(
                    async move { library.pick_image().await },
                    move |picked| Message::ImagePicked(host, token, picked),
                )
            }
            Step::Transmit(picked) => {
                match host {
                    FlowHost::Preview => {
                        // Show the local preview right away, before the
                        // upload lands.
                        self.preview = Some(image::Handle::from_path(&picked.path));
                    }
                    FlowHost::Closet => {
                        self.status = "Uploading...".to_string();
                    }
                }
                let gateway = self.gateway.clone();
                Task::perform(upload::transmit(gateway, picked), move |outcome| {
                    Message::UploadFinished(host, token, outcome)
                })
            }
            Step::Notify(receipt) => {
                log::info!("image stored at {}", receipt.url);
                match host {
                    FlowHost::Closet => {
                        self.status = "Added to your closet.".to_string();
                        let ticket = self.catalog.begin_refresh();
                        self.start_fetch(ticket)
                    }
                    // The upload screen renders the receipt straight from
                    // the flow phase.
                    FlowHost::Preview => Task::none(),
                }
            }
            Step::NotifyDenied => {
                log::warn!("media library access was refused");
                if host == FlowHost::Closet {
                    self.status = "Media library access was refused.".to_string();
                }
                Task::none()
            }
            Step::NotifyFailed(error) => {
                log::warn!("upload failed: {error}");
                if host == FlowHost::Closet {
                    self.status = format!("Upload failed: {error}");
                }
                Task::none()
            }
            Step::Nothing => Task::none(),
        }
    }
}

/// Tab button for the screen switcher
fn screen_tab(label: &str, target: Screen, current: Screen) -> Element<'_, Message> {
    let style = if target == current {
        button::primary
    } else {
        button::secondary
    };
    button(text(label))
        .style(style)
        .on_press(Message::ScreenPicked(target))
        .padding([6, 12])
        .into()
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("Wardrobe", Wardrobe::update, Wardrobe::view)
        .theme(Wardrobe::theme)
        .centered()
        .run_with(Wardrobe::new)
}
