//! Generated HTML directory listings.

use std::fmt::Write as _;
use std::io;
use std::path::Path;

use html_escape::encode_text;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters percent-encoded inside generated hrefs.
const HREF_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'&')
    .add(b'%')
    .add(b'/');

struct ListingItem {
    name: String,
    is_dir: bool,
}

/// Render a minimal HTML listing of `dir`'s immediate children.
///
/// `request_path` is the slash-terminated request path, used for the page
/// heading. Hrefs are relative, so directory entries carry a trailing slash
/// to keep links resolving under the listed directory.
pub async fn render(request_path: &str, dir: &Path) -> io::Result<String> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut items: Vec<ListingItem> = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let is_dir = entry.file_type().await?.is_dir();
        // Names that are not valid UTF-8 cannot be linked; skip them.
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        items.push(ListingItem { name, is_dir });
    }

    items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let heading = encode_text(request_path);
    let mut body = String::new();
    let _ = write!(
        body,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>Directory listing for {heading}</title></head>\
         <body><h1>Directory listing for {heading}</h1><hr><ul>"
    );

    for item in &items {
        let suffix = if item.is_dir { "/" } else { "" };
        let href = utf8_percent_encode(&item.name, HREF_ENCODE);
        let label = encode_text(&item.name);
        let _ = write!(body, "<li><a href=\"{href}{suffix}\">{label}{suffix}</a></li>");
    }

    body.push_str("</ul><hr></body></html>");
    Ok(body)
}
