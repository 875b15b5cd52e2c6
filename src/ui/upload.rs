use iced::widget::{button, column, container, image, text};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::upload::{UploadFlow, UploadPhase};
use crate::{FlowHost, Message};

/// Build the standalone upload screen: pick button, local preview of the
/// chosen image, and the stored location once the upload lands.
pub fn view<'a>(preview: Option<&'a image::Handle>, flow: &'a UploadFlow) -> Element<'a, Message> {
    let pick = button(text("Pick an image"))
        .on_press_maybe((!flow.busy()).then_some(Message::AddPressed(FlowHost::Preview)))
        .padding([8, 16]);

    let mut content = column![pick].spacing(20).align_x(Alignment::Center);

    if let Some(handle) = preview {
        content = content.push(
            image(handle.clone())
                .width(Length::Fixed(200.0))
                .height(Length::Fixed(200.0))
                .content_fit(ContentFit::Contain),
        );
    }

    content = content.push(phase_line(flow.phase()));

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// One line describing where the current invocation stands.
fn phase_line(phase: &UploadPhase) -> Element<'_, Message> {
    let line = match phase {
        UploadPhase::Idle => text("Pick an image to upload it."),
        UploadPhase::RequestingAccess => text("Asking for media library access..."),
        UploadPhase::Picking => text("Waiting for the picker..."),
        UploadPhase::Uploading => text("Uploading..."),
        UploadPhase::Denied => text("Media library access was refused.").style(text::danger),
        UploadPhase::Failed(error) => text(format!("Upload failed: {error}")).style(text::danger),
        UploadPhase::Done(receipt) => {
            text(format!("Stored at {}", receipt.url)).style(text::success)
        }
    };
    line.size(14).into()
}
