//! Fetches the board document and its textures.

use std::collections::HashMap;

use futures::future::join_all;
use gloo::console;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlImageElement, Response};

use crate::config::AssetPaths;
use crate::error::LoadError;
use crate::model::BoardModel;

pub type IconCache = HashMap<String, HtmlImageElement>;

fn js_reason(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

pub async fn fetch_board(paths: &AssetPaths, board_id: &str) -> Result<BoardModel, LoadError> {
    let window = web_sys::window().ok_or(LoadError::NoWindow)?;
    let url = paths.board_document(board_id);
    let failed = |e: JsValue| LoadError::Fetch {
        url: url.clone(),
        reason: js_reason(e),
    };

    let response: Response = JsFuture::from(window.fetch_with_str(&url))
        .await
        .map_err(failed)?
        .dyn_into()
        .map_err(failed)?;
    if !response.ok() {
        return Err(LoadError::Status {
            url: url.clone(),
            status: response.status(),
        });
    }
    let body = JsFuture::from(response.text().map_err(failed)?)
        .await
        .map_err(failed)?;
    let text = body.as_string().ok_or_else(|| LoadError::Fetch {
        url: url.clone(),
        reason: "response body is not text".to_string(),
    })?;
    BoardModel::from_json(&text)
}

async fn load_image(url: String, texture: String) -> Result<(String, HtmlImageElement), LoadError> {
    let failed = |e: JsValue| LoadError::Image {
        texture: texture.clone(),
        reason: js_reason(e),
    };
    let img = HtmlImageElement::new().map_err(failed)?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(&url);
    JsFuture::from(img.decode()).await.map_err(failed)?;
    Ok((texture, img))
}

/// Requests every texture at once and waits for all of them. A texture that
/// fails is logged and left out; the others still load.
pub async fn load_icons<I>(paths: &AssetPaths, board_id: &str, textures: I) -> IconCache
where
    I: IntoIterator<Item = String>,
{
    let requests = textures
        .into_iter()
        .map(|t| load_image(paths.texture(board_id, &t), t));
    let mut icons = IconCache::new();
    for result in join_all(requests).await {
        match result {
            Ok((texture, img)) => {
                icons.insert(texture, img);
            }
            Err(e) => console::warn!(e.to_string()),
        }
    }
    icons
}
