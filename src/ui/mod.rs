/// Screen views
///
/// One module per screen:
/// - The closet browser with its search, filters, and gallery (closet.rs)
/// - The standalone pick-upload-preview utility (upload.rs)

pub mod closet;
pub mod upload;
